//! Augmented Dickey-Fuller unit-root test
//!
//! Regression with a constant:
//! `Δy_t = α + β y_{t-1} + Σ γ_i Δy_{t-i} + ε_t`, with the number of lagged
//! differences chosen by AIC. The null hypothesis is a unit root, so a small
//! p-value means the series looks stationary.

use crate::error::{ForecastError, Result};
use series_math::distributions::normal_cdf;
use series_math::ols::{ols, OlsResult};
use series_math::polynomial::{difference, lag_columns};
use tracing::debug;

/// p-value below which a series is reported as stationary
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

// MacKinnon (1994) p-value surface, one variable, constant term
const TAU_MAX_C: f64 = 2.74;
const TAU_MIN_C: f64 = -18.83;
const TAU_STAR_C: f64 = -1.61;
const TAU_C_SMALLP: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_C_LARGEP: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

// MacKinnon (2010) finite-sample critical value response surfaces
const CRIT_1PCT: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRIT_5PCT: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRIT_10PCT: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// Critical values of the test statistic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalValues {
    pub one_pct: f64,
    pub five_pct: f64,
    pub ten_pct: f64,
}

impl CriticalValues {
    fn for_nobs(nobs: usize) -> Self {
        let surface = |b: &[f64; 4]| {
            let n = nobs as f64;
            b[0] + b[1] / n + b[2] / n.powi(2) + b[3] / n.powi(3)
        };
        Self {
            one_pct: surface(&CRIT_1PCT),
            five_pct: surface(&CRIT_5PCT),
            ten_pct: surface(&CRIT_10PCT),
        }
    }
}

/// Outcome of an ADF test
#[derive(Debug, Clone)]
pub struct AdfResult {
    /// t-statistic of the lagged level coefficient
    pub statistic: f64,
    /// MacKinnon approximate p-value
    pub p_value: f64,
    /// Number of lagged differences in the final regression
    pub used_lag: usize,
    /// Observations in the final regression
    pub nobs: usize,
    pub critical_values: CriticalValues,
    /// Best AIC found during lag selection
    pub ic_best: f64,
}

impl AdfResult {
    /// Whether the unit-root null is rejected at [`SIGNIFICANCE_LEVEL`]
    pub fn is_stationary(&self) -> bool {
        self.p_value < SIGNIFICANCE_LEVEL
    }
}

/// Lag selection settings
#[derive(Debug, Clone, Default)]
pub struct AdfOptions {
    /// Largest number of lagged differences to consider.
    /// Defaults to `ceil(12 (n / 100)^(1/4))`.
    pub max_lag: Option<usize>,
}

/// ADF test with default lag selection
pub fn adf_test(series: &[f64]) -> Result<AdfResult> {
    adf_test_with(series, &AdfOptions::default())
}

/// ADF test with explicit options
pub fn adf_test_with(series: &[f64], options: &AdfOptions) -> Result<AdfResult> {
    let n = series.len();
    if series.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::DataError(
            "ADF test requires finite values".to_string(),
        ));
    }
    if n < 4 {
        return Err(ForecastError::InsufficientData { needed: 4, got: n });
    }
    let (min, max) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if min == max {
        return Err(ForecastError::DataError(
            "ADF test is undefined for a constant series".to_string(),
        ));
    }

    let default_lag = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let ceiling = (n / 2).checked_sub(2).ok_or(ForecastError::InsufficientData {
        needed: 4,
        got: n,
    })?;
    let max_lag = options.max_lag.unwrap_or(default_lag).min(ceiling);

    let diff = difference(series, 1);

    // All candidate lags share the sample left after dropping `max_lag` rows
    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=max_lag {
        let fit = adf_regression(series, &diff, lag, max_lag)?;
        let aic = fit.aic();
        if best.map_or(true, |(best_aic, _)| aic < best_aic) {
            best = Some((aic, lag));
        }
    }
    let (ic_best, used_lag) = best.ok_or_else(|| {
        ForecastError::ModelError("ADF lag selection found no candidate".to_string())
    })?;

    let fit = adf_regression(series, &diff, used_lag, used_lag)?;
    let statistic = fit.t_values()[1];
    if !statistic.is_finite() {
        return Err(ForecastError::ModelError(
            "ADF regression produced a non-finite statistic".to_string(),
        ));
    }

    let p_value = mackinnon_p_value(statistic)?;
    debug!(statistic, p_value, used_lag, nobs = fit.nobs, "ADF test");

    Ok(AdfResult {
        statistic,
        p_value,
        used_lag,
        nobs: fit.nobs,
        critical_values: CriticalValues::for_nobs(fit.nobs),
        ic_best,
    })
}

/// Regress `Δy_t` on `[1, y_{t-1}, Δy_{t-1}, ..., Δy_{t-lag}]` for `t >= skip`
fn adf_regression(level: &[f64], diff: &[f64], lag: usize, skip: usize) -> Result<OlsResult> {
    let rows = skip..diff.len();
    let y: Vec<f64> = diff[rows.clone()].to_vec();

    let mut columns = Vec::with_capacity(lag + 2);
    columns.push(vec![1.0; y.len()]);
    columns.push(rows.clone().map(|t| level[t]).collect());
    columns.extend(lag_columns(diff, skip).into_iter().take(lag));

    Ok(ols(&y, &columns)?)
}

/// MacKinnon approximate p-value for the constant-only ADF regression
pub fn mackinnon_p_value(statistic: f64) -> Result<f64> {
    if statistic > TAU_MAX_C {
        return Ok(1.0);
    }
    if statistic < TAU_MIN_C {
        return Ok(0.0);
    }

    let coefs: &[f64] = if statistic <= TAU_STAR_C {
        &TAU_C_SMALLP
    } else {
        &TAU_C_LARGEP
    };
    let poly: f64 = coefs
        .iter()
        .enumerate()
        .map(|(i, c)| c * statistic.powi(i as i32))
        .sum();

    Ok(normal_cdf(poly)?)
}
