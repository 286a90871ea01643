//! Standard normal helpers backed by `statrs`

use crate::{MathError, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal};

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| MathError::CalculationError(e.to_string()))
}

/// `P(Z <= x)` for a standard normal `Z`
pub fn normal_cdf(x: f64) -> Result<f64> {
    Ok(standard_normal()?.cdf(x))
}

/// Inverse CDF of the standard normal
pub fn normal_quantile(p: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(MathError::InvalidInput(format!(
            "Probability must be in [0, 1], got {}",
            p
        )));
    }
    Ok(standard_normal()?.inverse_cdf(p))
}

/// Two-sided p-value of a z statistic
pub fn two_sided_p_value(z: f64) -> Result<f64> {
    if z.is_nan() {
        return Ok(f64::NAN);
    }
    Ok(2.0 * (1.0 - normal_cdf(z.abs())?))
}

/// Upper tail probability `P(X > x)` of a chi-squared variable with `df` degrees of freedom
pub fn chi_squared_sf(x: f64, df: f64) -> Result<f64> {
    let dist = ChiSquared::new(df).map_err(|e| MathError::InvalidInput(e.to_string()))?;
    if x <= 0.0 {
        return Ok(1.0);
    }
    Ok(1.0 - dist.cdf(x))
}

/// Two-sided p-value of a variance ratio against an F distribution with `(df1, df2)` degrees of freedom
pub fn f_two_sided_p_value(ratio: f64, df1: f64, df2: f64) -> Result<f64> {
    if ratio.is_nan() {
        return Ok(f64::NAN);
    }
    let dist =
        FisherSnedecor::new(df1, df2).map_err(|e| MathError::InvalidInput(e.to_string()))?;
    let lower = dist.cdf(ratio.max(0.0));
    Ok((2.0 * lower.min(1.0 - lower)).min(1.0))
}
