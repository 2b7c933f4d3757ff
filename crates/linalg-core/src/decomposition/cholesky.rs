use crate::error::{LinalgError, Result};
use crate::math::Matrix;

impl Matrix {
    /// Lower-triangular `L` with `L * L.t() == self` for a symmetric
    /// positive-definite matrix.
    ///
    /// Uses outer-product elimination on a working copy. A non-positive
    /// diagonal entry at step `k` means the input is not positive-definite
    /// and yields [`LinalgError::SingularMatrix`]. Symmetry is not checked;
    /// only the lower triangle of the input contributes to the result.
    pub fn cholesky(&self) -> Result<Matrix> {
        self.ensure_square("cholesky")?;
        let n = self.rows();
        let mut a = self.to_dense();
        for k in 0..n {
            let akk = a[(k, k)];
            if akk <= 0.0 {
                return Err(LinalgError::SingularMatrix {
                    operation: "cholesky",
                    pivot: akk,
                });
            }
            let root = akk.sqrt();
            a[(k, k)] = root;
            for i in (k + 1)..n {
                a[(i, k)] /= root;
            }
            for j in (k + 1)..n {
                let ajk = a[(j, k)];
                for i in j..n {
                    let delta = a[(i, k)] * ajk;
                    a[(i, j)] -= delta;
                }
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                a[(i, j)] = 0.0;
            }
        }
        Ok(Matrix::from_dense(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textbook_factorization() {
        let a = Matrix::from_rows(&[[25.0, 15.0, -5.0], [15.0, 18.0, 0.0], [-5.0, 0.0, 11.0]]);
        let l = a.cholesky().unwrap();
        let expected = Matrix::from_rows(&[[5.0, 0.0, 0.0], [3.0, 3.0, 0.0], [-1.0, 1.0, 3.0]]);
        assert!(l.approx_eq(&expected, 1e-12));
        assert!((&l * &l.t()).approx_eq(&a, 1e-9));
    }

    #[test]
    fn input_is_untouched() {
        let a = Matrix::from_rows(&[[4.0, 2.0], [2.0, 3.0]]);
        let before = a.copy();
        let _ = a.cholesky().unwrap();
        assert_eq!(a, before);
    }

    #[test]
    fn rejects_indefinite_and_non_square() {
        let a = Matrix::from_rows(&[[1.0, 2.0], [2.0, 1.0]]);
        assert!(matches!(
            a.cholesky(),
            Err(LinalgError::SingularMatrix { operation: "cholesky", .. })
        ));
        assert!(matches!(
            Matrix::zeros(2, 3).cholesky(),
            Err(LinalgError::InvalidOperation(_))
        ));
    }
}
