//! Partial pivoting and Doolittle LU factorization.
use log::trace;

use crate::error::{LinalgError, Result};
use crate::math::dense::Dense;
use crate::math::Matrix;

/// Row permutation that brings the largest-magnitude entry of each column
/// onto the diagonal, along with the row-swapped working copy and the
/// number of swaps performed.
fn pivot_dense(a: &Dense) -> (Dense, Dense, usize) {
    let n = a.nrows();
    let mut work = a.clone();
    let mut p = Dense::identity(n);
    let mut swaps = 0;
    for j in 0..n {
        let mut best = j;
        for r in (j + 1)..n {
            if work[(r, j)].abs() > work[(best, j)].abs() {
                best = r;
            }
        }
        if best != j {
            trace!("pivot: swapping rows {} and {} for column {}", j, best, j);
            work.swap_rows(j, best);
            p.swap_rows(j, best);
            swaps += 1;
        }
    }
    (p, work, swaps)
}

/// Determinant by elimination of the pivoted copy.
pub(crate) fn lu_determinant(a: &Dense) -> f64 {
    let n = a.nrows();
    let (_, mut work, swaps) = pivot_dense(a);
    let mut det = if swaps % 2 == 0 { 1.0 } else { -1.0 };
    for j in 0..n {
        let pivot = work[(j, j)];
        if pivot == 0.0 {
            return 0.0;
        }
        det *= pivot;
        for i in (j + 1)..n {
            let factor = work[(i, j)] / pivot;
            for c in j..n {
                let delta = factor * work[(j, c)];
                work[(i, c)] -= delta;
            }
        }
    }
    det
}

impl Matrix {
    /// Permutation matrix `P` such that `P * self` has, column by column,
    /// the largest remaining absolute value on the diagonal.
    pub fn pivot(&self) -> Result<Matrix> {
        self.ensure_square("pivot")?;
        let (p, _, _) = pivot_dense(&self.to_dense());
        Ok(Matrix::from_dense(p))
    }

    /// Factors `P * self == L * U` with `P` from [`Matrix::pivot`], `L`
    /// unit lower-triangular and `U` upper-triangular.
    ///
    /// The permutation is chosen before elimination, so a zero can still
    /// reach the diagonal of `U` for a non-singular input. That case fails
    /// with [`LinalgError::InvalidOperation`] naming the column; `det` and
    /// `inverse` are unaffected.
    pub fn lu(&self) -> Result<(Matrix, Matrix, Matrix)> {
        self.ensure_square("lu")?;
        let n = self.rows();
        let (p, m, _) = pivot_dense(&self.to_dense());
        let mut l = Dense::identity(n);
        let mut u = Dense::zeros(n, n);
        for j in 0..n {
            for i in 0..=j {
                let s: f64 = (0..i).map(|k| l[(i, k)] * u[(k, j)]).sum();
                u[(i, j)] = m[(i, j)] - s;
            }
            let ujj = u[(j, j)];
            if ujj == 0.0 && j + 1 < n {
                return Err(LinalgError::InvalidOperation(format!(
                    "lu: zero pivot in column {} after static pivoting",
                    j
                )));
            }
            for i in (j + 1)..n {
                let s: f64 = (0..j).map(|k| l[(i, k)] * u[(k, j)]).sum();
                l[(i, j)] = (m[(i, j)] - s) / ujj;
            }
        }
        Ok((
            Matrix::from_dense(p),
            Matrix::from_dense(l),
            Matrix::from_dense(u),
        ))
    }
}
