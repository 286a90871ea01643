//! Lag polynomials and differencing
//!
//! A lag polynomial is stored as its coefficient vector `c`, where `c[i]`
//! multiplies `B^i` (the backshift operator applied `i` times). Index zero is
//! the coefficient of the current observation.

/// Multiply two lag polynomials
pub fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        if *x == 0.0 {
            continue;
        }
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Polynomial `1 - c_1 B^step - c_2 B^{2 step} - ...`, the form of an AR operator
pub fn ar_polynomial(coefficients: &[f64], step: usize) -> Vec<f64> {
    let mut poly = vec![0.0; coefficients.len() * step + 1];
    poly[0] = 1.0;
    for (i, c) in coefficients.iter().enumerate() {
        poly[(i + 1) * step] = -c;
    }
    poly
}

/// Polynomial `1 + c_1 B^step + c_2 B^{2 step} + ...`, the form of an MA operator
pub fn ma_polynomial(coefficients: &[f64], step: usize) -> Vec<f64> {
    let mut poly = vec![0.0; coefficients.len() * step + 1];
    poly[0] = 1.0;
    for (i, c) in coefficients.iter().enumerate() {
        poly[(i + 1) * step] = *c;
    }
    poly
}

/// The differencing operator `(1 - B)^d (1 - B^s)^D`
pub fn differencing_polynomial(d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..d {
        poly = multiply(&poly, &[1.0, -1.0]);
    }
    if period > 0 {
        let mut seasonal = vec![0.0; period + 1];
        seasonal[0] = 1.0;
        seasonal[period] = -1.0;
        for _ in 0..seasonal_d {
            poly = multiply(&poly, &seasonal);
        }
    }
    poly
}

/// Apply a lag polynomial to a series.
///
/// Returns `Σ c_i x_{t-i}` for every `t` with a full history, so the output is
/// shorter than the input by the polynomial degree.
pub fn apply(poly: &[f64], series: &[f64]) -> Vec<f64> {
    let degree = poly.len().saturating_sub(1);
    if poly.is_empty() || series.len() <= degree {
        return Vec::new();
    }

    (degree..series.len())
        .map(|t| {
            poly.iter()
                .enumerate()
                .map(|(i, c)| c * series[t - i])
                .sum()
        })
        .collect()
}

/// Apply `d` rounds of first differencing
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Lagged copies of a series.
///
/// Column `k` (zero based) holds `x_{t-k-1}` for `t` in `maxlag..n`.
pub fn lag_columns(series: &[f64], maxlag: usize) -> Vec<Vec<f64>> {
    let n = series.len();
    if n <= maxlag {
        return vec![Vec::new(); maxlag];
    }
    (1..=maxlag)
        .map(|lag| (maxlag..n).map(|t| series[t - lag]).collect())
        .collect()
}

/// Coefficients of `ma(B) / ar(B)` expanded to `n` terms.
///
/// Both polynomials carry their leading coefficient (expected to be one for
/// `ar`). The result gives the psi weights of the moving-average representation.
pub fn psi_weights(ar: &[f64], ma: &[f64], n: usize) -> Vec<f64> {
    let lead = ar.first().copied().unwrap_or(1.0);
    let mut psi = Vec::with_capacity(n);
    for j in 0..n {
        let mut value = ma.get(j).copied().unwrap_or(0.0);
        for i in 1..=j.min(ar.len().saturating_sub(1)) {
            value -= ar[i] * psi[j - i];
        }
        psi.push(value / lead);
    }
    psi
}

/// Map unconstrained reals to the coefficients of a stationary AR operator.
///
/// Each value becomes a partial autocorrelation `x / sqrt(1 + x^2)` in
/// `(-1, 1)`, and the Durbin-Levinson recursion turns those into `φ` with
/// every root of `1 - φ_1 B - ... - φ_p B^p` outside the unit circle. Zeros map
/// to zeros.
pub fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let mut poly: Vec<f64> = Vec::with_capacity(unconstrained.len());
    for x in unconstrained {
        let r = x / (1.0 + x * x).sqrt();
        let k = poly.len();
        let mut next: Vec<f64> = (0..k).map(|i| poly[i] - r * poly[k - 1 - i]).collect();
        next.push(r);
        poly = next;
    }
    poly
}

/// Map unconstrained reals to the coefficients of an invertible MA operator
/// `1 + θ_1 B + ... + θ_q B^q`
pub fn constrain_invertible(unconstrained: &[f64]) -> Vec<f64> {
    let flipped: Vec<f64> = unconstrained.iter().map(|x| -x).collect();
    constrain_stationary(&flipped).iter().map(|c| -c).collect()
}

/// Whether every root of the lag polynomial lies strictly outside the unit circle.
///
/// Steps the polynomial down one degree at a time (Schur-Cohn); it is stable
/// when every reflection coefficient along the way has magnitude below one.
pub fn is_stable(poly: &[f64]) -> bool {
    let lead = match poly.first() {
        Some(&c) if c != 0.0 => c,
        _ => return false,
    };
    let mut a: Vec<f64> = poly[1..].iter().map(|c| c / lead).collect();
    while a.last() == Some(&0.0) {
        a.pop();
    }
    while let Some(&r) = a.last() {
        if !(r.abs() < 1.0) {
            return false;
        }
        let k = a.len();
        let denom = 1.0 - r * r;
        a = (0..k - 1).map(|i| (a[i] - r * a[k - 2 - i]) / denom).collect();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_multiply() {
        // (1 - B)(1 + B) = 1 - B^2
        assert_eq!(multiply(&[1.0, -1.0], &[1.0, 1.0]), vec![1.0, 0.0, -1.0]);
    }

    #[rstest]
    #[case(1, 0, 0, vec![1.0, -1.0])]
    #[case(2, 0, 0, vec![1.0, -2.0, 1.0])]
    #[case(0, 1, 4, vec![1.0, 0.0, 0.0, 0.0, -1.0])]
    #[case(1, 1, 2, vec![1.0, -1.0, -1.0, 1.0])]
    fn test_differencing_polynomial(
        #[case] d: usize,
        #[case] seasonal_d: usize,
        #[case] period: usize,
        #[case] expected: Vec<f64>,
    ) {
        assert_eq!(differencing_polynomial(d, seasonal_d, period), expected);
    }

    #[test]
    fn test_apply_matches_difference() {
        let series = vec![1.0, 4.0, 9.0, 16.0, 25.0];
        let poly = differencing_polynomial(2, 0, 0);
        assert_eq!(apply(&poly, &series), difference(&series, 2));
        assert_eq!(difference(&series, 2), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_seasonal_ar_polynomial() {
        assert_eq!(ar_polynomial(&[0.5], 3), vec![1.0, 0.0, 0.0, -0.5]);
        assert_eq!(ma_polynomial(&[0.2, 0.1], 1), vec![1.0, 0.2, 0.1]);
    }

    #[test]
    fn test_lag_columns() {
        let cols = lag_columns(&[1.0, 2.0, 3.0, 4.0, 5.0], 2);
        assert_eq!(cols[0], vec![2.0, 3.0, 4.0]);
        assert_eq!(cols[1], vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_psi_weights_random_walk() {
        // 1 / (1 - B) = 1 + B + B^2 + ...
        let psi = psi_weights(&[1.0, -1.0], &[1.0], 5);
        assert_eq!(psi, vec![1.0; 5]);
    }

    #[test]
    fn test_psi_weights_ar1() {
        let psi = psi_weights(&ar_polynomial(&[0.5], 1), &[1.0], 4);
        assert_eq!(psi, vec![1.0, 0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_constrain_stationary_single_lag() {
        // One lag is the partial autocorrelation itself
        let phi = constrain_stationary(&[1.0]);
        assert!((phi[0] - 1.0 / 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(constrain_stationary(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[rstest]
    #[case(vec![3.0, 3.0])]
    #[case(vec![-8.0, 5.0, 12.0])]
    #[case(vec![40.0, -40.0, 40.0, -40.0])]
    fn test_constrained_operators_are_stable(#[case] unconstrained: Vec<f64>) {
        let phi = constrain_stationary(&unconstrained);
        assert!(is_stable(&ar_polynomial(&phi, 1)));
        let theta = constrain_invertible(&unconstrained);
        assert!(is_stable(&ma_polynomial(&theta, 1)));
    }

    #[test]
    fn test_is_stable() {
        assert!(is_stable(&ar_polynomial(&[0.5], 1)));
        assert!(is_stable(&ar_polynomial(&[0.5, 0.3], 1)));
        // φ_1 + φ_2 > 1 has a root inside the unit circle
        assert!(!is_stable(&ar_polynomial(&[0.99, 0.0129], 1)));
        assert!(!is_stable(&[1.0, -1.0]));
        assert!(is_stable(&[1.0]));
        // Seasonal products of stable factors stay stable
        let product = multiply(&ar_polynomial(&[0.4], 1), &ar_polynomial(&[0.7], 12));
        assert!(is_stable(&product));
    }
}
