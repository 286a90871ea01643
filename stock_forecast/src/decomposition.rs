//! Classical additive seasonal decomposition
//!
//! `observed = trend + seasonal + residual`. The trend is a centered moving
//! average spanning one cycle, so the first and last `period / 2` trend and
//! residual values are `NaN`. The seasonal component repeats the mean
//! detrended value of each phase, shifted to sum to zero over a cycle.

use crate::error::{ForecastError, Result};
use series_math::filters::{convolution_filter, seasonal_mean_filter};
use series_math::nan_mean;

/// Seasonal period used by the dashboard decomposition
pub const DECOMPOSITION_PERIOD: usize = 12;

/// Components of an additive decomposition, all as long as the input
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub period: usize,
    pub observed: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
}

impl Decomposition {
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// One cycle of seasonal effects, indexed by phase
    pub fn seasonal_pattern(&self) -> &[f64] {
        &self.seasonal[..self.period.min(self.seasonal.len())]
    }
}

/// Decompose `series` additively with the given period
pub fn seasonal_decompose(series: &[f64], period: usize) -> Result<Decomposition> {
    if period < 2 {
        return Err(ForecastError::InvalidParameter(format!(
            "Decomposition period must be at least 2, got {}",
            period
        )));
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::DataError(
            "Decomposition requires finite values".to_string(),
        ));
    }
    let n = series.len();
    if n < 2 * period {
        return Err(ForecastError::InsufficientData {
            needed: 2 * period,
            got: n,
        });
    }

    let trend = convolution_filter(series, &seasonal_mean_filter(period)?)?;
    let detrended: Vec<f64> = series.iter().zip(&trend).map(|(x, t)| x - t).collect();

    let mut pattern: Vec<f64> = (0..period)
        .map(|phase| nan_mean(detrended.iter().skip(phase).step_by(period).copied()))
        .collect();
    let pattern_mean = pattern.iter().sum::<f64>() / period as f64;
    for v in pattern.iter_mut() {
        *v -= pattern_mean;
    }

    let seasonal: Vec<f64> = (0..n).map(|t| pattern[t % period]).collect();
    let residual: Vec<f64> = detrended
        .iter()
        .zip(&seasonal)
        .map(|(d, s)| d - s)
        .collect();

    Ok(Decomposition {
        period,
        observed: series.to_vec(),
        trend,
        seasonal,
        residual,
    })
}
