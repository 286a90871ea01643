//! Text summary of a fitted SARIMAX model

use crate::error::{ForecastError, Result};
use crate::models::sarimax::TrainedSarimax;
use serde::Serialize;
use series_math::distributions::{
    chi_squared_sf, f_two_sided_p_value, normal_quantile, two_sided_p_value,
};
use series_math::mean;
use std::fmt;

const WIDTH: usize = 78;
const HALF: usize = 38;
/// Columns reserved for the labels of the model header
const LABEL_WIDTH: usize = 19;

/// One row of the parameter table
#[derive(Debug, Clone, Serialize)]
pub struct ParameterEstimate {
    pub name: String,
    pub coef: f64,
    pub std_err: f64,
    pub z: f64,
    pub p_value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Tests on the model residuals
#[derive(Debug, Clone, Serialize)]
pub struct ResidualDiagnostics {
    /// Ljung-Box Q at lag 1
    pub ljung_box: f64,
    pub ljung_box_p: f64,
    pub jarque_bera: f64,
    pub jarque_bera_p: f64,
    /// Sum of squares of the last third of residuals over the first third
    pub heteroskedasticity: f64,
    pub heteroskedasticity_p: f64,
    pub skew: f64,
    pub kurtosis: f64,
}

impl ResidualDiagnostics {
    pub fn from_residuals(residuals: &[f64]) -> Result<Self> {
        let mean = mean(residuals).ok_or(ForecastError::InsufficientData { needed: 1, got: 0 })?;
        let n = residuals.len() as f64;
        let centered: Vec<f64> = residuals.iter().map(|e| e - mean).collect();
        let moment = |k: i32| centered.iter().map(|c| c.powi(k)).sum::<f64>() / n;
        let (m2, m3, m4) = (moment(2), moment(3), moment(4));

        let r1 = centered.windows(2).map(|w| w[0] * w[1]).sum::<f64>() / (n * m2);
        let ljung_box = n * (n + 2.0) * r1 * r1 / (n - 1.0);

        let skew = m3 / m2.powf(1.5);
        let kurtosis = m4 / (m2 * m2);
        let jarque_bera = n / 6.0 * (skew * skew + (kurtosis - 3.0).powi(2) / 4.0);

        let h = (residuals.len() as f64 / 3.0).round() as usize;
        let (heteroskedasticity, heteroskedasticity_p) = if h == 0 {
            (f64::NAN, f64::NAN)
        } else {
            let head: f64 = residuals[..h].iter().map(|e| e * e).sum();
            let tail: f64 = residuals[residuals.len() - h..].iter().map(|e| e * e).sum();
            let ratio = tail / head;
            (ratio, f_two_sided_p_value(ratio, h as f64, h as f64)?)
        };

        Ok(Self {
            ljung_box,
            ljung_box_p: chi_squared_sf(ljung_box, 1.0)?,
            jarque_bera,
            jarque_bera_p: chi_squared_sf(jarque_bera, 2.0)?,
            heteroskedasticity,
            heteroskedasticity_p,
            skew,
            kurtosis,
        })
    }
}

/// Everything the summary table shows
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub dep_variable: String,
    pub model: String,
    pub nobs: usize,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
    pub parameters: Vec<ParameterEstimate>,
    pub diagnostics: ResidualDiagnostics,
    pub converged: bool,
}

impl TrainedSarimax {
    /// Summary table for a model fitted on the column `dep_variable`
    pub fn summary(&self, dep_variable: &str) -> Result<ModelSummary> {
        let z_crit = normal_quantile(0.975)?;
        let mut values = self.params().to_vec();
        values.push(self.sigma2());

        let parameters = self
            .spec()
            .parameter_names()
            .into_iter()
            .zip(values)
            .zip(self.std_errors())
            .map(|((name, coef), std_err)| -> Result<ParameterEstimate> {
                let z = coef / std_err;
                Ok(ParameterEstimate {
                    name,
                    coef,
                    std_err: *std_err,
                    z,
                    p_value: two_sided_p_value(z)?,
                    lower: coef - z_crit * std_err,
                    upper: coef + z_crit * std_err,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ModelSummary {
            dep_variable: dep_variable.to_string(),
            model: self.spec().to_string(),
            nobs: self.nobs(),
            log_likelihood: self.log_likelihood(),
            aic: self.aic(),
            bic: self.bic(),
            hqic: self.hqic(),
            parameters,
            diagnostics: ResidualDiagnostics::from_residuals(self.residuals())?,
            converged: self.converged(),
        })
    }
}

/// `label` left aligned and `value` right aligned within `width` columns
fn cell(label: &str, value: &str, width: usize) -> String {
    let pad = width.saturating_sub(label.len());
    format!("{}{:>pad$}", label, value, pad = pad)
}

fn header_row(left: (&str, &str), right: (&str, &str)) -> String {
    format!(
        "{}   {}",
        cell(left.0, left.1, HALF),
        cell(right.0, right.1, WIDTH - HALF - 3)
    )
}

/// Split a model name after each `x` joining two orders so every line fits `width`
fn wrap_model_name(name: &str, width: usize) -> Vec<String> {
    if name.len() <= width {
        return vec![name.to_string()];
    }
    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, _) in name.match_indices(")x(") {
        pieces.push(&name[start..i + 2]);
        start = i + 2;
    }
    pieces.push(&name[start..]);

    let mut lines: Vec<String> = Vec::new();
    for piece in pieces {
        match lines.last_mut() {
            Some(line) if line.len() + piece.len() <= width => line.push_str(piece),
            _ => lines.push(piece.to_string()),
        }
    }
    lines
}

/// Write two independent label/value columns side by side
fn write_columns(
    f: &mut fmt::Formatter<'_>,
    left: &[(&str, String)],
    right: &[(&str, String)],
) -> fmt::Result {
    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).map_or(("", ""), |(k, v)| (*k, v.as_str()));
        let r = right.get(i).map_or(("", ""), |(k, v)| (*k, v.as_str()));
        writeln!(f, "{}", header_row(l, r))?;
    }
    Ok(())
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let double = "=".repeat(WIDTH);
        let single = "-".repeat(WIDTH);

        writeln!(f, "{:^width$}", "SARIMAX Results", width = WIDTH)?;
        writeln!(f, "{}", double)?;

        let mut left = vec![("Dep. Variable:", self.dep_variable.clone())];
        for (i, line) in wrap_model_name(&self.model, HALF - LABEL_WIDTH)
            .into_iter()
            .enumerate()
        {
            left.push((if i == 0 { "Model:" } else { "" }, line));
        }
        left.push(("Sample:", "0".to_string()));
        left.push(("", format!("- {}", self.nobs)));
        left.push(("Covariance Type:", "approx".to_string()));
        let right = [
            ("No. Observations:", self.nobs.to_string()),
            ("Log Likelihood", format!("{:.3}", self.log_likelihood)),
            ("AIC", format!("{:.3}", self.aic)),
            ("BIC", format!("{:.3}", self.bic)),
            ("HQIC", format!("{:.3}", self.hqic)),
        ];
        write_columns(f, &left, &right)?;

        writeln!(f, "{}", double)?;
        writeln!(
            f,
            "{:<10}{:>11}{:>11}{:>11}{:>11}{:>12}{:>12}",
            "", "coef", "std err", "z", "P>|z|", "[0.025", "0.975]"
        )?;
        writeln!(f, "{}", single)?;
        for p in &self.parameters {
            writeln!(
                f,
                "{:<10}{:>11.4}{:>11.3}{:>11.3}{:>11.3}{:>12.3}{:>12.3}",
                p.name, p.coef, p.std_err, p.z, p.p_value, p.lower, p.upper
            )?;
        }

        let d = &self.diagnostics;
        writeln!(f, "{}", double)?;
        let left = [
            ("Ljung-Box (L1) (Q):", format!("{:.2}", d.ljung_box)),
            ("Prob(Q):", format!("{:.2}", d.ljung_box_p)),
            ("Heteroskedasticity (H):", format!("{:.2}", d.heteroskedasticity)),
            ("Prob(H) (two-sided):", format!("{:.2}", d.heteroskedasticity_p)),
        ];
        let right = [
            ("Jarque-Bera (JB):", format!("{:.2}", d.jarque_bera)),
            ("Prob(JB):", format!("{:.2}", d.jarque_bera_p)),
            ("Skew:", format!("{:.2}", d.skew)),
            ("Kurtosis:", format!("{:.2}", d.kurtosis)),
        ];
        write_columns(f, &left, &right)?;
        writeln!(f, "{}", double)?;

        writeln!(f)?;
        writeln!(f, "Warnings:")?;
        writeln!(
            f,
            "[1] Covariance matrix calculated from a numerical Hessian of the conditional likelihood."
        )?;
        if !self.converged {
            writeln!(
                f,
                "[2] The optimizer reached its iteration limit before converging."
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sarimax::{Order, SarimaxModel, SeasonalOrder};
    use approx::assert_relative_eq;

    fn series(n: usize) -> Vec<f64> {
        let mut state = 99u64;
        let mut level = 50.0;
        (0..n)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                level += ((state >> 11) as f64 / (1u64 << 53) as f64) - 0.5;
                level
            })
            .collect()
    }

    fn summary() -> ModelSummary {
        SarimaxModel::new(Order::new(1, 1, 1), SeasonalOrder::new(1, 0, 0, 5))
            .unwrap()
            .fit(&series(150))
            .unwrap()
            .summary("Close")
            .unwrap()
    }

    #[test]
    fn test_parameter_rows() {
        let s = summary();
        let names: Vec<&str> = s.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ar.L1", "ma.L1", "ar.S.L5", "sigma2"]);
        for p in &s.parameters {
            if p.std_err.is_finite() {
                assert_relative_eq!(p.z, p.coef / p.std_err, epsilon = 1e-12);
                assert!(p.lower < p.coef && p.coef < p.upper);
            }
        }
    }

    #[test]
    fn test_rendered_table() {
        let text = summary().to_string();
        assert!(text.contains("SARIMAX Results"));
        assert!(text.contains("Dep. Variable:"));
        assert!(text.contains("Close"));
        assert!(text.lines().any(|l| l.starts_with("Model:") && l.contains("SARIMAX(1, 1, 1)x")));
        assert!(text.contains("(1, 0, 0, 5)"));
        assert!(text.contains("No. Observations:"));
        assert!(text.contains("sigma2"));
        assert!(text.contains("Ljung-Box (L1) (Q):"));
        assert!(text.lines().any(|l| l.starts_with("ar.S.L5")));
    }

    #[test]
    fn test_diagnostics_of_symmetric_residuals() {
        let residuals: Vec<f64> = (0..60).map(|t| if t % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let d = ResidualDiagnostics::from_residuals(&residuals).unwrap();
        assert_relative_eq!(d.skew, 0.0, epsilon = 1e-12);
        assert_relative_eq!(d.kurtosis, 1.0, epsilon = 1e-12);
        assert_relative_eq!(d.heteroskedasticity, 1.0, epsilon = 1e-12);
        // Alternating signs are perfectly anti-correlated at lag one
        assert!(d.ljung_box > 50.0);
        assert!(d.ljung_box_p < 1e-6);
    }

    #[test]
    fn test_diagnostics_need_residuals() {
        assert!(ResidualDiagnostics::from_residuals(&[]).is_err());
    }

    #[test]
    fn test_long_model_name_wraps() {
        assert_eq!(wrap_model_name("SARIMAX(1, 1, 1)", 19), vec!["SARIMAX(1, 1, 1)"]);
        assert_eq!(
            wrap_model_name("SARIMAX(2, 1, 2)x(2, 1, 2, 12)", 19),
            vec!["SARIMAX(2, 1, 2)x", "(2, 1, 2, 12)"]
        );
    }

    #[test]
    fn test_header_lines_stay_aligned() {
        let mut s = summary();
        s.model = "SARIMAX(2, 1, 2)x(2, 1, 2, 12)".to_string();
        let text = s.to_string();
        let header: Vec<&str> = text.lines().skip(2).take(6).collect();

        assert!(header[1].starts_with("Model:") && header[1].contains("SARIMAX(2, 1, 2)x"));
        assert!(header[1].contains("Log Likelihood"));
        assert!(header[2].trim_start().starts_with("(2, 1, 2, 12)"));
        assert!(header[2].contains("AIC"));
        // The right column starts at the same offset on every row
        for line in &header {
            assert!(line.len() <= WIDTH, "{:?}", line);
            assert_eq!(&line[HALF..HALF + 3], "   ", "{:?}", line);
        }
        assert!(header[5].starts_with("Covariance Type:"));
    }
}
