//! # Series Math
//!
//! Numerical building blocks for univariate time series statistics.
//! This crate provides the pieces the forecasting crate is assembled from:
//!
//! - Dense linear systems and matrix inversion ([`linalg`])
//! - Ordinary least squares with inference statistics ([`ols`])
//! - Centered convolution filters ([`filters`])
//! - Lag polynomials and differencing ([`polynomial`])
//! - Bounded Nelder-Mead and numerical Hessians ([`optimize`])
//! - Normal distribution helpers ([`distributions`])

use thiserror::Error;

pub mod distributions;
pub mod filters;
pub mod linalg;
pub mod ols;
pub mod optimize;
pub mod polynomial;

/// Errors that can occur in numerical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Singular matrix: {0}")]
    Singular(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numerical operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Arithmetic mean of a slice, `None` when empty
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of the finite values in a slice, ignoring `NaN`s
pub fn nan_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}
