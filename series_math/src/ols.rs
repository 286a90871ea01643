//! Ordinary least squares regression
//!
//! Fits `y = X β + ε` and reports the inference statistics needed by unit-root
//! tests: standard errors, t-values and information criteria.

use crate::linalg::Matrix;
use crate::{MathError, Result};
use std::f64::consts::PI;

/// Fitted least squares regression
#[derive(Debug, Clone)]
pub struct OlsResult {
    /// Estimated coefficients, one per regressor column
    pub params: Vec<f64>,
    /// Standard errors of the coefficients
    pub std_errors: Vec<f64>,
    /// Residual sum of squares
    pub ssr: f64,
    /// Number of observations
    pub nobs: usize,
}

impl OlsResult {
    /// Number of estimated coefficients
    pub fn k(&self) -> usize {
        self.params.len()
    }

    /// t-statistic of each coefficient
    pub fn t_values(&self) -> Vec<f64> {
        self.params
            .iter()
            .zip(&self.std_errors)
            .map(|(b, se)| b / se)
            .collect()
    }

    /// Gaussian log-likelihood evaluated at the estimates
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * ((2.0 * PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    /// Akaike information criterion
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.k() as f64
    }

    /// Bayesian information criterion
    pub fn bic(&self) -> f64 {
        -2.0 * self.log_likelihood() + self.k() as f64 * (self.nobs as f64).ln()
    }
}

/// Fit `y` on the given regressor columns (include a column of ones for an intercept)
pub fn ols(y: &[f64], columns: &[Vec<f64>]) -> Result<OlsResult> {
    let n = y.len();
    let k = columns.len();

    if k == 0 {
        return Err(MathError::InvalidInput(
            "At least one regressor is required".to_string(),
        ));
    }
    if n <= k {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} observations for {} regressors, have {}",
            k, k, n
        )));
    }

    let x = Matrix::from_columns(columns)?;
    if x.rows() != n {
        return Err(MathError::InvalidInput(format!(
            "Regressors have {} rows but response has {}",
            x.rows(),
            n
        )));
    }

    let xtx_inv = x.gram().invert()?;
    let xty = x.transpose_mul_vec(y)?;
    let params = xtx_inv.mul_vec(&xty)?;

    let fitted = x.mul_vec(&params)?;
    let ssr: f64 = y
        .iter()
        .zip(&fitted)
        .map(|(obs, fit)| (obs - fit).powi(2))
        .sum();

    let sigma2 = ssr / (n - k) as f64;
    let std_errors = xtx_inv
        .diagonal()
        .into_iter()
        .map(|v| (sigma2 * v).max(0.0).sqrt())
        .collect();

    Ok(OlsResult {
        params,
        std_errors,
        ssr,
        nobs: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_line() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 + 2.0 * v).collect();
        let fit = ols(&y, &[vec![1.0; 10], x]).unwrap();

        assert_relative_eq!(fit.params[0], 3.0, epsilon = 1e-9);
        assert_relative_eq!(fit.params[1], 2.0, epsilon = 1e-9);
        assert!(fit.ssr < 1e-12);
    }

    #[test]
    fn test_standard_errors_match_closed_form() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.1, 3.9, 6.2, 7.8, 10.1];
        let fit = ols(&y, &[vec![1.0; 5], x.clone()]).unwrap();

        // Slope standard error: sqrt(s^2 / Sxx)
        let x_mean = 3.0;
        let sxx: f64 = x.iter().map(|v| (v - x_mean).powi(2)).sum();
        let s2 = fit.ssr / 3.0;
        assert_relative_eq!(fit.std_errors[1], (s2 / sxx).sqrt(), epsilon = 1e-10);
        assert_eq!(fit.t_values().len(), 2);
    }

    #[test]
    fn test_information_criteria() {
        let y = vec![1.0, 2.5, 2.0, 4.0, 3.5, 5.0];
        let fit = ols(&y, &[vec![1.0; 6]]).unwrap();
        let llf = fit.log_likelihood();
        assert_relative_eq!(fit.aic(), -2.0 * llf + 2.0);
        assert_relative_eq!(fit.bic(), -2.0 * llf + (6.0f64).ln());
    }

    #[test]
    fn test_too_few_observations() {
        let result = ols(&[1.0, 2.0], &[vec![1.0, 1.0], vec![0.0, 1.0]]);
        assert!(matches!(result, Err(MathError::InsufficientData(_))));
    }
}
