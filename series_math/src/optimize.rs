//! Derivative-free minimization and numerical curvature
//!
//! The Nelder-Mead simplex search clamps every trial point into its box
//! bounds, which keeps ARMA coefficients inside the region where the
//! conditional likelihood is well behaved.

use crate::linalg::Matrix;
use crate::{MathError, Result};

/// Settings for the simplex search
#[derive(Debug, Clone)]
pub struct NelderMeadOptions {
    /// Maximum number of iterations
    pub max_iter: usize,
    /// Stop once the spread of objective values across the simplex falls below this
    pub tolerance: f64,
    /// Size of the initial simplex steps
    pub initial_step: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iter: 2000,
            tolerance: 1e-10,
            initial_step: 0.1,
        }
    }
}

/// Outcome of a minimization
#[derive(Debug, Clone)]
pub struct Minimum {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations used
    pub iterations: usize,
    /// Whether the tolerance was reached before `max_iter`
    pub converged: bool,
}

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

fn clamp(point: &mut [f64], bounds: Option<&[(f64, f64)]>) {
    if let Some(bounds) = bounds {
        for (v, (lo, hi)) in point.iter_mut().zip(bounds) {
            *v = v.clamp(*lo, *hi);
        }
    }
}

/// Move `from` through `through` by factor `coef`: `through + coef (through - from)`
fn line_point(from: &[f64], through: &[f64], coef: f64) -> Vec<f64> {
    from.iter()
        .zip(through)
        .map(|(f, t)| t + coef * (t - f))
        .collect()
}

/// Minimize `objective` starting from `initial`
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    options: &NelderMeadOptions,
) -> Result<Minimum>
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return Err(MathError::InvalidInput(
            "Cannot optimize over zero parameters".to_string(),
        ));
    }
    if let Some(b) = bounds {
        if b.len() != n {
            return Err(MathError::InvalidInput(format!(
                "Expected {} bounds, got {}",
                n,
                b.len()
            )));
        }
    }

    let eval = |p: &[f64]| {
        let v = objective(p);
        if v.is_nan() {
            f64::INFINITY
        } else {
            v
        }
    };

    let mut start = initial.to_vec();
    clamp(&mut start, bounds);

    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
    simplex.push((start.clone(), eval(&start)));
    for i in 0..n {
        let mut vertex = start.clone();
        vertex[i] += if vertex[i].abs() > 1e-8 {
            options.initial_step * vertex[i].abs()
        } else {
            options.initial_step
        };
        clamp(&mut vertex, bounds);
        // A vertex clamped back onto the start collapses the simplex
        if vertex == start {
            vertex[i] -= options.initial_step;
            clamp(&mut vertex, bounds);
        }
        let value = eval(&vertex);
        simplex.push((vertex, value));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iter {
        iterations += 1;
        simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let best = simplex[0].1;
        let worst = simplex[n].1;
        if (worst - best).abs() <= options.tolerance * (1.0 + best.abs()) {
            converged = true;
            break;
        }

        let centroid: Vec<f64> = (0..n)
            .map(|j| simplex[..n].iter().map(|(p, _)| p[j]).sum::<f64>() / n as f64)
            .collect();

        let mut reflected = line_point(&simplex[n].0, &centroid, REFLECT);
        clamp(&mut reflected, bounds);
        let reflected_value = eval(&reflected);

        if reflected_value < best {
            let mut expanded = line_point(&simplex[n].0, &centroid, EXPAND);
            clamp(&mut expanded, bounds);
            let expanded_value = eval(&expanded);
            simplex[n] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
            continue;
        }

        if reflected_value < simplex[n - 1].1 {
            simplex[n] = (reflected, reflected_value);
            continue;
        }

        let (base, base_value) = if reflected_value < worst {
            (reflected, reflected_value)
        } else {
            (simplex[n].0.clone(), worst)
        };
        let mut contracted: Vec<f64> = centroid
            .iter()
            .zip(&base)
            .map(|(c, b)| c + CONTRACT * (b - c))
            .collect();
        clamp(&mut contracted, bounds);
        let contracted_value = eval(&contracted);

        if contracted_value < base_value {
            simplex[n] = (contracted, contracted_value);
            continue;
        }

        let anchor = simplex[0].0.clone();
        for vertex in simplex.iter_mut().skip(1) {
            let mut shrunk: Vec<f64> = anchor
                .iter()
                .zip(&vertex.0)
                .map(|(a, v)| a + SHRINK * (v - a))
                .collect();
            clamp(&mut shrunk, bounds);
            let value = eval(&shrunk);
            *vertex = (shrunk, value);
        }
    }

    simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let (point, value) = simplex.swap_remove(0);

    Ok(Minimum {
        point,
        value,
        iterations,
        converged,
    })
}

/// Central-difference Hessian of `f` at `x`
pub fn numerical_hessian<F>(f: F, x: &[f64]) -> Matrix
where
    F: Fn(&[f64]) -> f64,
{
    let n = x.len();
    let steps: Vec<f64> = x
        .iter()
        .map(|v| f64::EPSILON.powf(1.0 / 4.0) * v.abs().max(1e-2))
        .collect();

    let shifted = |i: usize, si: f64, j: usize, sj: f64| {
        let mut p = x.to_vec();
        p[i] += si;
        p[j] += sj;
        f(&p)
    };

    let mut h = Matrix::zeros(n, n);
    for i in 0..n {
        for j in i..n {
            let (hi, hj) = (steps[i], steps[j]);
            let value = (shifted(i, hi, j, hj) - shifted(i, hi, j, -hj) - shifted(i, -hi, j, hj)
                + shifted(i, -hi, j, -hj))
                / (4.0 * hi * hj);
            h.set(i, j, value);
            h.set(j, i, value);
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_minimum() {
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2),
            &[0.0, 0.0],
            None,
            &NelderMeadOptions::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.point[0], 2.0, epsilon = 1e-3);
        assert_relative_eq!(result.point[1], -1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_bounds_are_respected() {
        let bounds = [(-0.5, 0.5)];
        let result = nelder_mead(
            |x| (x[0] - 3.0).powi(2),
            &[0.0],
            Some(&bounds),
            &NelderMeadOptions::default(),
        )
        .unwrap();

        assert!(result.point[0] <= 0.5);
        assert_relative_eq!(result.point[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_problem_is_an_error() {
        let result = nelder_mead(|_| 0.0, &[], None, &NelderMeadOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_hessian_of_quadratic() {
        let h = numerical_hessian(|x| 3.0 * x[0] * x[0] + x[0] * x[1] + 2.0 * x[1] * x[1], &[0.3, -0.2]);
        assert_relative_eq!(h.get(0, 0), 6.0, epsilon = 1e-4);
        assert_relative_eq!(h.get(0, 1), 1.0, epsilon = 1e-4);
        assert_relative_eq!(h.get(1, 1), 4.0, epsilon = 1e-4);
    }
}
