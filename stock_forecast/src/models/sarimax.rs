//! Seasonal ARIMA estimated by conditional sum of squares
//!
//! The model is `φ(B) Φ(B^s) (1-B)^d (1-B^s)^D y_t = θ(B) Θ(B^s) ε_t` with no
//! trend or exogenous terms. Coefficients are fitted on the differenced
//! series by minimizing the sum of squared one-step residuals, with
//! pre-sample residuals set to zero. The search runs over unconstrained
//! values mapped onto stationary AR and invertible MA operators, so every fit
//! satisfies both conditions.

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use serde::{Deserialize, Serialize};
use series_math::distributions::normal_quantile;
use series_math::optimize::{nelder_mead, numerical_hessian, NelderMeadOptions};
use series_math::polynomial::{
    apply, ar_polynomial, constrain_invertible, constrain_stationary, differencing_polynomial,
    ma_polynomial, multiply, psi_weights,
};
use std::f64::consts::PI;
use std::fmt;
use tracing::{debug, warn};

/// Box on the unconstrained search values; partial autocorrelations stay within 1 - 2e-4 of one
const UNCONSTRAINED_BOUND: f64 = 50.0;

/// Non-seasonal `(p, d, q)` order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Order {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl Order {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

/// Seasonal `(P, D, Q, s)` order. A period of 0 or 1 means no seasonal part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeasonalOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub period: usize,
}

impl SeasonalOrder {
    pub fn new(p: usize, d: usize, q: usize, period: usize) -> Self {
        Self { p, d, q, period }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.period > 1 && self.p + self.d + self.q > 0
    }

    /// The order actually estimated: all zeros when there is no seasonal part
    fn effective(&self) -> Self {
        if self.period > 1 {
            *self
        } else {
            Self::none()
        }
    }
}

/// Order and seasonal order together, displayed as `SARIMAX(p, d, q)x(P, D, Q, s)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SarimaxSpec {
    pub order: Order,
    pub seasonal: SeasonalOrder,
}

impl fmt::Display for SarimaxSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SARIMAX({}, {}, {})", self.order.p, self.order.d, self.order.q)?;
        if self.seasonal.is_active() {
            write!(
                f,
                "x({}, {}, {}, {})",
                self.seasonal.p, self.seasonal.d, self.seasonal.q, self.seasonal.period
            )?;
        }
        Ok(())
    }
}

impl SarimaxSpec {
    /// Number of estimated ARMA coefficients (sigma2 excluded)
    fn coefficient_count(&self) -> usize {
        self.order.p + self.order.q + self.seasonal.p + self.seasonal.q
    }

    /// Degree of the differencing polynomial
    fn differencing_degree(&self) -> usize {
        self.order.d + self.seasonal.d * self.seasonal.period
    }

    /// Degree of the combined AR polynomial
    fn ar_degree(&self) -> usize {
        self.order.p + self.seasonal.p * self.seasonal.period
    }

    /// Split a flat parameter vector into `(ar, ma, seasonal ar, seasonal ma)`
    fn split<'a>(&self, params: &'a [f64]) -> (&'a [f64], &'a [f64], &'a [f64], &'a [f64]) {
        let (ar, rest) = params.split_at(self.order.p);
        let (ma, rest) = rest.split_at(self.order.q);
        let (sar, sma) = rest.split_at(self.seasonal.p);
        (ar, ma, sar, sma)
    }

    /// Coefficients for a vector of unconstrained search values, block by block
    fn constrain(&self, unconstrained: &[f64]) -> Vec<f64> {
        let (ar, ma, sar, sma) = self.split(unconstrained);
        let mut params = constrain_stationary(ar);
        params.extend(constrain_invertible(ma));
        params.extend(constrain_stationary(sar));
        params.extend(constrain_invertible(sma));
        params
    }

    /// Full AR and MA lag polynomials `φ(B)Φ(B^s)` and `θ(B)Θ(B^s)`
    fn polynomials(&self, params: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let (ar, ma, sar, sma) = self.split(params);
        let period = self.seasonal.period.max(1);
        (
            multiply(&ar_polynomial(ar, 1), &ar_polynomial(sar, period)),
            multiply(&ma_polynomial(ma, 1), &ma_polynomial(sma, period)),
        )
    }

    /// Names of the parameters in the order they are stored, then `sigma2`
    pub fn parameter_names(&self) -> Vec<String> {
        let period = self.seasonal.period;
        let mut names = Vec::with_capacity(self.coefficient_count() + 1);
        names.extend((1..=self.order.p).map(|i| format!("ar.L{}", i)));
        names.extend((1..=self.order.q).map(|i| format!("ma.L{}", i)));
        names.extend((1..=self.seasonal.p).map(|i| format!("ar.S.L{}", i * period)));
        names.extend((1..=self.seasonal.q).map(|i| format!("ma.S.L{}", i * period)));
        names.push("sigma2".to_string());
        names
    }
}

/// One-step residuals of the ARMA recursion `ar(B) w_t = ma(B) e_t`.
///
/// Residuals before the first index with a full AR history are zero.
fn conditional_residuals(w: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let start = ar.len().saturating_sub(1);
    let mut e = vec![0.0; w.len()];
    for t in start..w.len() {
        let mut value: f64 = ar.iter().enumerate().map(|(i, a)| a * w[t - i]).sum();
        for (j, m) in ma.iter().enumerate().skip(1) {
            if j > t {
                break;
            }
            value -= m * e[t - j];
        }
        e[t] = value;
    }
    e
}

fn sum_of_squares(residuals: &[f64]) -> f64 {
    residuals.iter().map(|e| e * e).sum()
}

/// Gaussian log-likelihood of `n` residuals with sum of squares `css` and variance `sigma2`
fn gaussian_loglik(css: f64, sigma2: f64, n: f64) -> f64 {
    -0.5 * n * (2.0 * PI * sigma2).ln() - css / (2.0 * sigma2)
}

/// Seasonal ARIMA model specification
#[derive(Debug, Clone)]
pub struct SarimaxModel {
    name: String,
    spec: SarimaxSpec,
    optimizer: NelderMeadOptions,
}

impl SarimaxModel {
    /// Create a model. A seasonal period below 2 drops the seasonal part.
    pub fn new(order: Order, seasonal: SeasonalOrder) -> Result<Self> {
        let spec = SarimaxSpec {
            order,
            seasonal: seasonal.effective(),
        };
        if seasonal.period <= 1 && seasonal.p + seasonal.d + seasonal.q > 0 {
            debug!(period = seasonal.period, "seasonal period below 2, fitting without seasonal terms");
        }

        let period = spec.seasonal.period;
        let ar_overlap = spec.seasonal.p > 0 && spec.order.p >= period;
        let ma_overlap = spec.seasonal.q > 0 && spec.order.q >= period;
        if ar_overlap || ma_overlap {
            return Err(ForecastError::InvalidParameter(format!(
                "Lags up to {} appear in both the seasonal and non-seasonal terms",
                period
            )));
        }

        Ok(Self {
            name: spec.to_string(),
            spec,
            optimizer: NelderMeadOptions {
                max_iter: 5000,
                ..NelderMeadOptions::default()
            },
        })
    }

    /// Replace the simplex search settings
    pub fn with_optimizer(mut self, options: NelderMeadOptions) -> Self {
        self.optimizer = options;
        self
    }

    pub fn spec(&self) -> SarimaxSpec {
        self.spec
    }

    /// Smallest series length the model can be fitted on
    pub fn min_observations(&self) -> usize {
        self.spec.differencing_degree() + self.spec.ar_degree() + self.spec.coefficient_count() + 2
    }

    /// Fit the model to `data`
    pub fn fit(&self, data: &[f64]) -> Result<TrainedSarimax> {
        if data.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(
                "SARIMAX requires finite values".to_string(),
            ));
        }
        let needed = self.min_observations();
        if data.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: data.len(),
            });
        }

        let spec = self.spec;
        let delta = differencing_polynomial(spec.order.d, spec.seasonal.d, spec.seasonal.period);
        let w = apply(&delta, data);
        let start = spec.ar_degree();
        let n_eff = (w.len() - start) as f64;
        let k = spec.coefficient_count();

        let css = |params: &[f64]| {
            let (ar, ma) = spec.polynomials(params);
            sum_of_squares(&conditional_residuals(&w, &ar, &ma)[start..])
        };

        let (params, iterations, converged) = if k == 0 {
            (Vec::new(), 0, true)
        } else {
            let bounds = vec![(-UNCONSTRAINED_BOUND, UNCONSTRAINED_BOUND); k];
            let objective = |unconstrained: &[f64]| css(&spec.constrain(unconstrained));
            let minimum = nelder_mead(objective, &vec![0.0; k], Some(&bounds), &self.optimizer)?;
            (spec.constrain(&minimum.point), minimum.iterations, minimum.converged)
        };
        if converged {
            debug!(model = %self.name, iterations, "optimizer converged");
        } else {
            warn!(model = %self.name, iterations, "optimizer did not converge");
        }

        let (ar, ma) = spec.polynomials(&params);
        let residuals = conditional_residuals(&w, &ar, &ma);
        let css_value = sum_of_squares(&residuals[start..]);
        let sigma2 = css_value / n_eff;
        if !(sigma2.is_finite() && sigma2 > 0.0) {
            return Err(ForecastError::ModelError(format!(
                "Residual variance is degenerate ({})",
                sigma2
            )));
        }

        let std_errors = standard_errors(&css, &params, sigma2, n_eff);

        Ok(TrainedSarimax {
            name: self.name.clone(),
            spec,
            history: data.to_vec(),
            differenced: w,
            residuals,
            params,
            std_errors,
            sigma2,
            log_likelihood: -0.5 * n_eff * ((2.0 * PI * sigma2).ln() + 1.0),
            n_effective: n_eff as usize,
            iterations,
            converged,
        })
    }
}

/// Standard errors of `(coefficients, sigma2)` from the inverse Hessian of the
/// negative log-likelihood. Entries with no usable curvature are `NaN`.
fn standard_errors<F>(css: F, params: &[f64], sigma2: f64, n_eff: f64) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let k = params.len();
    let negloglik = |theta: &[f64]| -gaussian_loglik(css(&theta[..k]), theta[k], n_eff);

    let mut theta = params.to_vec();
    theta.push(sigma2);
    match numerical_hessian(negloglik, &theta).invert() {
        Ok(cov) => cov
            .diagonal()
            .into_iter()
            .map(|v| if v.is_finite() && v > 0.0 { v.sqrt() } else { f64::NAN })
            .collect(),
        Err(e) => {
            warn!(error = %e, "information matrix is singular, standard errors unavailable");
            vec![f64::NAN; k + 1]
        }
    }
}

/// Fitted seasonal ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedSarimax {
    name: String,
    spec: SarimaxSpec,
    history: Vec<f64>,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    params: Vec<f64>,
    std_errors: Vec<f64>,
    sigma2: f64,
    log_likelihood: f64,
    n_effective: usize,
    iterations: usize,
    converged: bool,
}

impl TrainedSarimax {
    pub fn spec(&self) -> SarimaxSpec {
        self.spec
    }

    /// Estimated ARMA coefficients in the order of [`SarimaxSpec::parameter_names`]
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Standard errors of the coefficients followed by that of `sigma2`
    pub fn std_errors(&self) -> &[f64] {
        &self.std_errors
    }

    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Number of estimated parameters, `sigma2` included
    pub fn n_params(&self) -> usize {
        self.params.len() + 1
    }

    /// Length of the series the model was fitted on
    pub fn nobs(&self) -> usize {
        self.history.len()
    }

    /// Residuals that entered the likelihood
    pub fn n_effective(&self) -> usize {
        self.n_effective
    }

    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood + 2.0 * self.n_params() as f64
    }

    pub fn bic(&self) -> f64 {
        -2.0 * self.log_likelihood + self.n_params() as f64 * (self.n_effective as f64).ln()
    }

    pub fn hqic(&self) -> f64 {
        -2.0 * self.log_likelihood
            + 2.0 * self.n_params() as f64 * (self.n_effective as f64).ln().ln()
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Residuals that entered the likelihood, oldest first
    pub fn residuals(&self) -> &[f64] {
        &self.residuals[self.spec.ar_degree()..]
    }

    /// One-step-ahead in-sample predictions; `NaN` where no prediction exists
    pub fn in_sample_predictions(&self) -> Vec<f64> {
        let offset = self.spec.differencing_degree() + self.spec.ar_degree();
        self.history
            .iter()
            .enumerate()
            .map(|(t, y)| {
                if t < offset {
                    f64::NAN
                } else {
                    y - self.residuals[t - self.spec.differencing_degree()]
                }
            })
            .collect()
    }

    /// Point forecasts and 95% intervals for the next `steps` observations
    pub fn predict(&self, steps: usize) -> Result<ForecastResult> {
        self.predict_with_level(steps, 0.95)
    }

    /// Point forecasts with intervals at the given confidence level
    pub fn predict_with_level(&self, steps: usize, level: f64) -> Result<ForecastResult> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Confidence level must be in (0, 1), got {}",
                level
            )));
        }

        let (ar, ma) = self.spec.polynomials(&self.params);
        let delta = differencing_polynomial(
            self.spec.order.d,
            self.spec.seasonal.d,
            self.spec.seasonal.period,
        );

        // ARMA recursion on the differenced scale with future shocks at zero
        let mut w = self.differenced.clone();
        let mut e = self.residuals.clone();
        for _ in 0..steps {
            let t = w.len();
            let mut next = 0.0;
            for (i, a) in ar.iter().enumerate().skip(1) {
                next -= a * w[t - i];
            }
            for (j, m) in ma.iter().enumerate().skip(1) {
                if j <= t {
                    next += m * e[t - j];
                }
            }
            w.push(next);
            e.push(0.0);
        }

        // Undo the differencing: y_t = w_t - Σ_{i>=1} δ_i y_{t-i}
        let mut y = self.history.clone();
        for h in 0..steps {
            let t = y.len();
            let mut next = w[self.differenced.len() + h];
            for (i, c) in delta.iter().enumerate().skip(1) {
                next -= c * y[t - i];
            }
            y.push(next);
        }
        let values = y[self.history.len()..].to_vec();

        let psi = psi_weights(&multiply(&ar, &delta), &ma, steps);
        let z = normal_quantile(0.5 + level / 2.0)?;
        let mut cumulative = 0.0;
        let intervals = values
            .iter()
            .zip(&psi)
            .map(|(v, p)| {
                cumulative += p * p;
                let half = z * (self.sigma2 * cumulative).sqrt();
                (v - half, v + half)
            })
            .collect();

        ForecastResult::new_with_intervals(values, steps, intervals)
    }
}

impl ForecastModel for SarimaxModel {
    type Trained = TrainedSarimax;

    fn train(&self, data: &[f64]) -> Result<Self::Trained> {
        self.fit(data)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedSarimax {
    fn forecast(&self, horizons: usize) -> Result<ForecastResult> {
        self.predict(horizons)
    }

    fn fitted_values(&self) -> Vec<f64> {
        self.in_sample_predictions()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
