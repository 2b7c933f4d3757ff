//! QR factorization by modified Gram-Schmidt, and determinants.
use crate::decomposition::lu::lu_determinant;
use crate::error::Result;
use crate::math::dense::Dense;
use crate::math::Matrix;

impl Matrix {
    /// Factors `self == Q * R` with orthonormal columns in `Q` (`rows x cols`)
    /// and upper-triangular `R` (`cols x cols`).
    ///
    /// Each column is orthogonalized against the already-finished ones,
    /// one projection at a time. A column that is linearly dependent on
    /// the previous ones has zero residual norm: its `R` diagonal is zero
    /// and it leaves a zero column in `Q`.
    pub fn qr(&self) -> (Matrix, Matrix) {
        let (m, n) = self.shape();
        let mut v = self.to_dense();
        let mut q = Dense::zeros(m, n);
        let mut r = Dense::zeros(n, n);
        for j in 0..n {
            for i in 0..j {
                let rij: f64 = (0..m).map(|k| q[(k, i)] * v[(k, j)]).sum();
                r[(i, j)] = rij;
                for k in 0..m {
                    let delta = rij * q[(k, i)];
                    v[(k, j)] -= delta;
                }
            }
            let norm = v.column_norm(j);
            r[(j, j)] = norm;
            if norm > 0.0 {
                for k in 0..m {
                    q[(k, j)] = v[(k, j)] / norm;
                }
            }
        }
        (Matrix::from_dense(q), Matrix::from_dense(r))
    }

    /// Determinant of a square matrix.
    ///
    /// Sizes up to 3x3 use the closed-form expansions. Larger matrices go
    /// through [`Matrix::qr`]: `det(Q)` (which is `±1` for a full-rank
    /// input, found by elimination) times the product of `R`'s diagonal.
    /// A zero on that diagonal means the columns are dependent and the
    /// determinant is exactly `0`.
    pub fn det(&self) -> Result<f64> {
        self.ensure_square("det")?;
        let a = |r, c| self.at(r, c);
        let det = match self.rows() {
            0 => 1.0,
            1 => a(0, 0),
            2 => a(0, 0) * a(1, 1) - a(0, 1) * a(1, 0),
            3 => {
                a(0, 0) * (a(1, 1) * a(2, 2) - a(1, 2) * a(2, 1))
                    - a(0, 1) * (a(1, 0) * a(2, 2) - a(1, 2) * a(2, 0))
                    + a(0, 2) * (a(1, 0) * a(2, 1) - a(1, 1) * a(2, 0))
            }
            _ => {
                let (q, r) = self.qr();
                let diag = r.diag();
                if diag.iter().any(|x| x == 0.0) {
                    0.0
                } else {
                    lu_determinant(&q.to_dense()) * diag.prod()
                }
            }
        };
        Ok(det)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn qr_reconstructs_input() {
        let a = Matrix::from_rows(&[
            [12.0, -51.0, 4.0],
            [6.0, 167.0, -68.0],
            [-4.0, 24.0, -41.0],
        ]);
        let (q, r) = a.qr();
        assert!((&q * &r).approx_eq(&a, 1e-9));
        assert_abs_diff_eq!(a.norm() - (&q * &r).norm(), 0.0, epsilon = 1e-9);
        assert!((&q.t() * &q).approx_eq(&Matrix::identity(3), 1e-12));
        for i in 0..3 {
            for j in 0..i {
                assert_eq!(r.get(i, j).unwrap(), 0.0);
            }
        }
    }

    #[test]
    fn qr_of_tall_matrix() {
        let a = Matrix::from_rows(&[[1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let (q, r) = a.qr();
        assert_eq!(q.shape(), (3, 2));
        assert_eq!(r.shape(), (2, 2));
        assert!((&q * &r).approx_eq(&a, 1e-12));
    }

    #[test]
    fn qr_zero_column_leaves_zero_q_column() {
        let a = Matrix::from_rows(&[[1.0, 0.0], [2.0, 0.0]]);
        let (q, r) = a.qr();
        assert_eq!(q.col(1).unwrap().to_vec(), vec![0.0, 0.0]);
        assert_eq!(r.get(1, 1).unwrap(), 0.0);
    }

    #[test]
    fn closed_form_determinants() {
        assert_eq!(Matrix::from_rows(&[[7.0]]).det().unwrap(), 7.0);
        assert_eq!(Matrix::from_rows(&[[4.0, 3.0], [3.0, 2.0]]).det().unwrap(), -1.0);
        let a = Matrix::from_rows(&[[-2.0, 2.0, 3.0], [-1.0, 1.0, 3.0], [2.0, 0.0, 1.0]]);
        assert_eq!(a.det().unwrap(), 6.0);
    }

    #[test]
    fn determinant_via_qr() {
        let a = Matrix::from_rows(&[
            [1.0, 0.0, 2.0, -1.0],
            [3.0, 0.0, 0.0, 5.0],
            [2.0, 1.0, 4.0, -3.0],
            [1.0, 0.0, 5.0, 0.0],
        ]);
        assert_abs_diff_eq!(a.det().unwrap(), 30.0, epsilon = 1e-9);
        let mut d = Matrix::identity(4);
        d.set(3, 3, -4.0).unwrap();
        d.set(1, 1, 2.0).unwrap();
        assert_abs_diff_eq!(d.det().unwrap(), -8.0, epsilon = 1e-12);
    }

    #[test]
    fn determinant_of_dependent_columns_is_zero() {
        let mut a = Matrix::identity(4);
        a.set(2, 2, 0.0).unwrap();
        assert_eq!(a.det().unwrap(), 0.0);
        assert!(Matrix::zeros(4, 3).det().is_err());
    }
}
