//! Small dense linear algebra
//!
//! Row-major matrices sized for regression design matrices with a handful of
//! columns. Systems are solved by Gauss-Jordan elimination with partial pivoting.

use crate::{MathError, Result};

const PIVOT_EPSILON: f64 = 1e-12;

/// Dense row-major matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a zero-filled matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create an identity matrix
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    /// Build a matrix from equally long columns
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self> {
        let cols = columns.len();
        let rows = columns.first().map(|c| c.len()).unwrap_or(0);
        if columns.iter().any(|c| c.len() != rows) {
            return Err(MathError::InvalidInput(
                "All columns must have the same length".to_string(),
            ));
        }

        let mut m = Self::zeros(rows, cols);
        for (j, column) in columns.iter().enumerate() {
            for (i, &v) in column.iter().enumerate() {
                m.set(i, j, v);
            }
        }
        Ok(m)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Diagonal entries of a square matrix
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.rows.min(self.cols)).map(|i| self.get(i, i)).collect()
    }

    /// Compute `Aᵀ A`
    pub fn gram(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.cols);
        for a in 0..self.cols {
            for b in a..self.cols {
                let mut sum = 0.0;
                for r in 0..self.rows {
                    sum += self.get(r, a) * self.get(r, b);
                }
                out.set(a, b, sum);
                out.set(b, a, sum);
            }
        }
        out
    }

    /// Compute `Aᵀ y`
    pub fn transpose_mul_vec(&self, y: &[f64]) -> Result<Vec<f64>> {
        if y.len() != self.rows {
            return Err(MathError::InvalidInput(format!(
                "Vector length ({}) doesn't match matrix rows ({})",
                y.len(),
                self.rows
            )));
        }

        Ok((0..self.cols)
            .map(|c| (0..self.rows).map(|r| self.get(r, c) * y[r]).sum())
            .collect())
    }

    /// Compute `A x`
    pub fn mul_vec(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.cols {
            return Err(MathError::InvalidInput(format!(
                "Vector length ({}) doesn't match matrix columns ({})",
                x.len(),
                self.cols
            )));
        }

        Ok((0..self.rows)
            .map(|r| (0..self.cols).map(|c| self.get(r, c) * x[c]).sum())
            .collect())
    }

    /// Solve `A x = b` for a square `A`
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        if b.len() != self.rows {
            return Err(MathError::InvalidInput(format!(
                "Right-hand side length ({}) doesn't match matrix rows ({})",
                b.len(),
                self.rows
            )));
        }
        let rhs = Matrix {
            rows: b.len(),
            cols: 1,
            data: b.to_vec(),
        };
        let solved = self.gauss_jordan(rhs)?;
        Ok(solved.data)
    }

    /// Inverse of a square matrix
    pub fn invert(&self) -> Result<Matrix> {
        self.gauss_jordan(Matrix::identity(self.rows))
    }

    fn gauss_jordan(&self, mut rhs: Matrix) -> Result<Matrix> {
        if self.rows != self.cols {
            return Err(MathError::InvalidInput(format!(
                "Matrix must be square, got {}x{}",
                self.rows, self.cols
            )));
        }

        let n = self.rows;
        let mut a = self.clone();

        for col in 0..n {
            let pivot_row = (col..n)
                .max_by(|&x, &y| {
                    a.get(x, col)
                        .abs()
                        .partial_cmp(&a.get(y, col).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or(col);

            let pivot = a.get(pivot_row, col);
            if !pivot.is_finite() || pivot.abs() < PIVOT_EPSILON {
                return Err(MathError::Singular(format!(
                    "zero pivot in column {}",
                    col
                )));
            }

            if pivot_row != col {
                a.swap_rows(pivot_row, col);
                rhs.swap_rows(pivot_row, col);
            }

            let inv_pivot = 1.0 / a.get(col, col);
            a.scale_row(col, inv_pivot);
            rhs.scale_row(col, inv_pivot);

            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = a.get(row, col);
                if factor == 0.0 {
                    continue;
                }
                for k in 0..n {
                    let v = a.get(row, k) - factor * a.get(col, k);
                    a.set(row, k, v);
                }
                for k in 0..rhs.cols {
                    let v = rhs.get(row, k) - factor * rhs.get(col, k);
                    rhs.set(row, k, v);
                }
            }
        }

        Ok(rhs)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for k in 0..self.cols {
            self.data.swap(a * self.cols + k, b * self.cols + k);
        }
    }

    fn scale_row(&mut self, row: usize, factor: f64) {
        for k in 0..self.cols {
            self.data[row * self.cols + k] *= factor;
        }
    }
}
