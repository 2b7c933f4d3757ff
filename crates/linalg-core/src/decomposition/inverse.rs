use log::trace;

use crate::config::SolverConfig;
use crate::error::{LinalgError, Result};
use crate::math::dense::Dense;
use crate::math::Matrix;

impl Matrix {
    /// Inverse with the default [`SolverConfig`].
    pub fn inverse(&self) -> Result<Matrix> {
        self.inverse_with(&SolverConfig::default())
    }

    /// Gauss-Jordan elimination on `[self | I]` with partial pivoting.
    ///
    /// A pivot whose magnitude falls below `config.singular_threshold`
    /// yields [`LinalgError::SingularMatrix`] carrying that pivot.
    pub fn inverse_with(&self, config: &SolverConfig) -> Result<Matrix> {
        self.ensure_square("inverse")?;
        let n = self.rows();
        let a = self.to_dense();
        let mut aug = Dense::zeros(n, 2 * n);
        for r in 0..n {
            for c in 0..n {
                aug[(r, c)] = a[(r, c)];
            }
            aug[(r, n + r)] = 1.0;
        }

        for j in 0..n {
            let mut best = j;
            for r in (j + 1)..n {
                if aug[(r, j)].abs() > aug[(best, j)].abs() {
                    best = r;
                }
            }
            let pivot = aug[(best, j)];
            if pivot.abs() < config.singular_threshold {
                return Err(LinalgError::SingularMatrix {
                    operation: "inverse",
                    pivot,
                });
            }
            if best != j {
                trace!("inverse: swapping rows {} and {} for column {}", j, best, j);
                aug.swap_rows(j, best);
            }
            for c in 0..2 * n {
                aug[(j, c)] /= pivot;
            }
            for r in (0..n).filter(|&r| r != j) {
                let factor = aug[(r, j)];
                if factor == 0.0 {
                    continue;
                }
                for c in 0..2 * n {
                    let delta = factor * aug[(j, c)];
                    aug[(r, c)] -= delta;
                }
            }
        }

        Ok(Matrix::create(n, n, |r, c| aug[(r, n + c)]))
    }

    /// Integer matrix power: `0` gives the identity, `1` a copy, `-1` the
    /// inverse. Larger magnitudes multiply repeatedly and invert the
    /// product when `n` is negative.
    pub fn pow(&self, n: i32) -> Result<Matrix> {
        self.ensure_square("pow")?;
        match n {
            0 => Ok(Matrix::identity(self.rows())),
            1 => Ok(self.copy()),
            -1 => self.inverse(),
            _ => {
                let base = self.to_dense();
                let mut acc = base.clone();
                for _ in 1..n.unsigned_abs() {
                    acc = acc.matmul(&base);
                }
                let product = Matrix::from_dense(acc);
                if n < 0 {
                    product.inverse()
                } else {
                    Ok(product)
                }
            }
        }
    }
}
