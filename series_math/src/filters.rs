//! Linear filters over time series
//!
//! Centered (two-sided) convolution filters, used to extract the trend of a
//! series in classical decomposition.

use crate::{MathError, Result};

/// Symmetric moving-average weights that span exactly one seasonal cycle.
///
/// Even periods use the `2 x period` centered average, weights
/// `[0.5, 1, ..., 1, 0.5] / period`. Odd periods use `period` equal weights.
pub fn seasonal_mean_filter(period: usize) -> Result<Vec<f64>> {
    if period == 0 {
        return Err(MathError::InvalidInput(
            "Period must be greater than zero".to_string(),
        ));
    }

    let p = period as f64;
    if period % 2 == 0 {
        let mut weights = vec![1.0 / p; period + 1];
        weights[0] = 0.5 / p;
        weights[period] = 0.5 / p;
        Ok(weights)
    } else {
        Ok(vec![1.0 / p; period])
    }
}

/// Apply a two-sided convolution filter.
///
/// The output has the length of `series`; positions where the filter window
/// does not fit entirely inside the series are `NaN`.
pub fn convolution_filter(series: &[f64], weights: &[f64]) -> Result<Vec<f64>> {
    let m = weights.len();
    if m == 0 {
        return Err(MathError::InvalidInput(
            "Filter weights cannot be empty".to_string(),
        ));
    }

    let n = series.len();
    let mut out = vec![f64::NAN; n];
    if n < m {
        return Ok(out);
    }

    let half = m.div_ceil(2);
    let head = half - 1;
    let tail = half - m % 2;

    for (t, slot) in out.iter_mut().enumerate().take(n - tail).skip(head) {
        *slot = weights
            .iter()
            .enumerate()
            .map(|(k, w)| w * series[t + head - k])
            .sum();
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_even_period_weights() {
        let w = seasonal_mean_filter(12).unwrap();
        assert_eq!(w.len(), 13);
        assert_relative_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(w[0], 1.0 / 24.0);
    }

    #[test]
    fn test_odd_period_weights() {
        let w = seasonal_mean_filter(5).unwrap();
        assert_eq!(w, vec![0.2; 5]);
    }

    #[test]
    fn test_centered_average_edges() {
        let series: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let out = convolution_filter(&series, &[1.0 / 3.0; 3]).unwrap();

        assert_eq!(out.len(), 10);
        assert!(out[0].is_nan());
        assert!(out[9].is_nan());
        for (t, v) in out.iter().enumerate().take(9).skip(1) {
            assert_relative_eq!(*v, t as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_linear_trend_preserved_by_seasonal_filter() {
        let series: Vec<f64> = (0..40).map(|i| 5.0 + 0.5 * i as f64).collect();
        let out = convolution_filter(&series, &seasonal_mean_filter(12).unwrap()).unwrap();

        assert_eq!(out.iter().filter(|v| v.is_nan()).count(), 12);
        for t in 6..34 {
            assert_relative_eq!(out[t], series[t], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_short_series_is_all_missing() {
        let out = convolution_filter(&[1.0, 2.0], &[0.25, 0.5, 0.25]).unwrap();
        assert!(out.iter().all(|v| v.is_nan()));
    }
}
