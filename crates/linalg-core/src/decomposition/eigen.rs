//! Jacobi eigenvalue solver for symmetric matrices.
//!
//! Each sweep visits every upper off-diagonal pair `(p, q)` and applies the
//! plane rotation that annihilates `A[p, q]`, accumulating the rotations in
//! `V`. The off-diagonal Frobenius norm shrinks monotonically for symmetric
//! input; iteration stops once it drops under the configured tolerance or
//! the sweep bound is hit.
use std::f64::consts::FRAC_1_SQRT_2;

use log::{debug, warn};

use crate::config::SolverConfig;
use crate::error::{LinalgError, Result};
use crate::math::dense::Dense;
use crate::math::{Matrix, Vector};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvdState {
    Iterating,
    Converged,
}

/// Eigen-decomposition of a symmetric matrix.
///
/// Construct with [`Evd::new`], then drive it with [`Evd::compute`]. A run
/// that exhausts its sweep bound leaves the solver in
/// [`EvdState::Iterating`], so a later `compute_with` call resumes from
/// where it stopped.
#[derive(Debug)]
pub struct Evd {
    a: Dense,
    v: Dense,
    state: EvdState,
    sweeps: usize,
    eigenvalues: Vector,
    eigenvectors: Matrix,
}

impl Evd {
    pub fn new(matrix: &Matrix) -> Result<Evd> {
        matrix.ensure_square("eigen-decomposition")?;
        let n = matrix.rows();
        Ok(Evd {
            a: matrix.to_dense(),
            v: Dense::identity(n),
            state: EvdState::Iterating,
            sweeps: 0,
            eigenvalues: Vector::default(),
            eigenvectors: Matrix::zeros(0, 0),
        })
    }

    pub fn state(&self) -> EvdState {
        self.state
    }

    /// Total sweeps performed so far, across `compute` calls.
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Eigenvalues in descending order. Empty until converged.
    pub fn eigenvalues(&self) -> &Vector {
        &self.eigenvalues
    }

    /// Unit eigenvectors as columns, in the order of [`Evd::eigenvalues`].
    pub fn eigenvectors(&self) -> &Matrix {
        &self.eigenvectors
    }

    pub fn compute(&mut self) -> Result<()> {
        self.compute_with(&SolverConfig::default())
    }

    /// Sweeps until `off(A) <= config.eigen_tolerance`. Returns
    /// [`LinalgError::NotConverged`] after `config.max_sweeps` sweeps
    /// within this call.
    pub fn compute_with(&mut self, config: &SolverConfig) -> Result<()> {
        if self.state == EvdState::Converged {
            return Ok(());
        }
        let start = self.sweeps;
        loop {
            let off = self.off_norm();
            if off <= config.eigen_tolerance {
                debug!(
                    "Jacobi solver converged after {} sweeps (off-norm {:e})",
                    self.sweeps, off
                );
                self.finalize();
                return Ok(());
            }
            if self.sweeps - start >= config.max_sweeps {
                warn!(
                    "Jacobi solver stopped after {} sweeps with off-norm {:e} above tolerance {:e}",
                    self.sweeps, off, config.eigen_tolerance
                );
                return Err(LinalgError::NotConverged {
                    sweeps: self.sweeps,
                    off_norm: off,
                });
            }
            self.sweep();
            self.sweeps += 1;
            debug!("sweep {}: off-norm {:e}", self.sweeps, self.off_norm());
        }
    }

    /// Frobenius norm of the off-diagonal part of the working matrix.
    pub fn off_norm(&self) -> f64 {
        let n = self.a.nrows();
        let mut sum = 0.0;
        for i in 0..n {
            for j in (0..n).filter(|&j| j != i) {
                sum += self.a[(i, j)] * self.a[(i, j)];
            }
        }
        sum.sqrt()
    }

    fn sweep(&mut self) {
        let n = self.a.nrows();
        for p in 0..n {
            for q in (p + 1)..n {
                if let Some((c, s)) = self.schur(p, q) {
                    self.rotate(p, q, c, s);
                }
            }
        }
    }

    /// Cosine/sine of the rotation zeroing `A[p, q]`, or `None` when it is
    /// already zero.
    fn schur(&self, p: usize, q: usize) -> Option<(f64, f64)> {
        let apq = self.a[(p, q)];
        if apq == 0.0 {
            return None;
        }
        let (app, aqq) = (self.a[(p, p)], self.a[(q, q)]);
        if app == aqq {
            return Some((FRAC_1_SQRT_2, FRAC_1_SQRT_2));
        }
        let tau = (aqq - app) / (2.0 * apq);
        let t = if tau >= 0.0 {
            1.0 / (tau + (1.0 + tau * tau).sqrt())
        } else {
            -1.0 / (-tau + (1.0 + tau * tau).sqrt())
        };
        let c = 1.0 / (1.0 + t * t).sqrt();
        Some((c, t * c))
    }

    /// `A <- Jᵗ A J` and `V <- V J` for the rotation `J` in plane `(p, q)`.
    fn rotate(&mut self, p: usize, q: usize, c: f64, s: f64) {
        let n = self.a.nrows();
        for k in 0..n {
            let (akp, akq) = (self.a[(k, p)], self.a[(k, q)]);
            self.a[(k, p)] = c * akp - s * akq;
            self.a[(k, q)] = s * akp + c * akq;
        }
        for k in 0..n {
            let (apk, aqk) = (self.a[(p, k)], self.a[(q, k)]);
            self.a[(p, k)] = c * apk - s * aqk;
            self.a[(q, k)] = s * apk + c * aqk;
        }
        self.a[(p, q)] = 0.0;
        self.a[(q, p)] = 0.0;
        for k in 0..n {
            let (vkp, vkq) = (self.v[(k, p)], self.v[(k, q)]);
            self.v[(k, p)] = c * vkp - s * vkq;
            self.v[(k, q)] = s * vkp + c * vkq;
        }
    }

    fn finalize(&mut self) {
        let n = self.a.nrows();
        let diag: Vector = (0..n).map(|i| self.a[(i, i)]).collect();
        let order = diag.sort_order();
        let mut vectors = Dense::zeros(n, n);
        for (dst, &src) in order.iter().enumerate() {
            let norm = self.v.column_norm(src);
            let scale = if norm > 0.0 { 1.0 / norm } else { 1.0 };
            for k in 0..n {
                vectors[(k, dst)] = self.v[(k, src)] * scale;
            }
        }
        let values = diag.values();
        self.eigenvalues = order.iter().map(|&i| values[i]).collect();
        self.eigenvectors = Matrix::from_dense(vectors);
        self.state = EvdState::Converged;
    }
}

impl Matrix {
    /// Eigenvalues (descending) and matching unit eigenvectors (as columns)
    /// of a symmetric matrix, with the default [`SolverConfig`].
    pub fn evd(&self) -> Result<(Vector, Matrix)> {
        self.evd_with(&SolverConfig::default())
    }

    pub fn evd_with(&self, config: &SolverConfig) -> Result<(Vector, Matrix)> {
        let mut evd = Evd::new(self)?;
        evd.compute_with(config)?;
        Ok((evd.eigenvalues().clone(), evd.eigenvectors().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn known_spectrum() {
        let a = Matrix::from_rows(&[[2.0, 0.0, 0.0], [0.0, 3.0, 4.0], [0.0, 4.0, 9.0]]);
        let (values, _) = a.evd().unwrap();
        assert!(values.approx_eq(&Vector::from_vec(vec![11.0, 2.0, 1.0]), 1e-9));
    }

    #[test]
    fn eigenpairs_satisfy_definition() {
        let a = Matrix::from_rows(&[[4.0, 1.0, 2.0], [1.0, 3.0, 0.0], [2.0, 0.0, 5.0]]);
        let mut evd = Evd::new(&a).unwrap();
        evd.compute().unwrap();
        assert_eq!(evd.state(), EvdState::Converged);
        let values = evd.eigenvalues();
        let vectors = evd.eigenvectors();
        for i in 1..values.len() {
            assert!(values.get(i - 1).unwrap() >= values.get(i).unwrap());
        }
        assert_abs_diff_eq!(values.sum(), a.trace().unwrap(), epsilon = 1e-9);
        for i in 0..3 {
            let v = vectors.col(i).unwrap();
            let lambda = values.get(i).unwrap();
            assert_abs_diff_eq!(v.norm(2.0), 1.0, epsilon = 1e-12);
            assert!((&a * &v).approx_eq(&(&v * lambda), 1e-8));
        }
    }

    #[test]
    fn two_by_two_converges_in_one_sweep() {
        let a = Matrix::from_rows(&[[2.0, 1.0], [1.0, 2.0]]);
        let mut evd = Evd::new(&a).unwrap();
        evd.compute_with(&SolverConfig::new(1e-10, 1)).unwrap();
        assert_eq!(evd.sweeps(), 1);
        assert!(evd
            .eigenvalues()
            .approx_eq(&Vector::from_vec(vec![3.0, 1.0]), 1e-12));
    }

    #[test]
    fn sweep_bound_reports_not_converged() {
        let a = Matrix::from_rows(&[[2.0, 1.0], [1.0, 2.0]]);
        let mut evd = Evd::new(&a).unwrap();
        let err = evd.compute_with(&SolverConfig::new(1e-10, 0)).unwrap_err();
        assert!(matches!(err, LinalgError::NotConverged { sweeps: 0, .. }));
        assert_eq!(evd.state(), EvdState::Iterating);
        assert!(evd.eigenvalues().is_empty());
        evd.compute().unwrap();
        assert_eq!(evd.state(), EvdState::Converged);
    }

    #[test]
    fn diagonal_input_needs_no_sweeps() {
        let a = Matrix::from_rows(&[[1.0, 0.0], [0.0, 5.0]]);
        let mut evd = Evd::new(&a).unwrap();
        evd.compute().unwrap();
        assert_eq!(evd.sweeps(), 0);
        assert_eq!(evd.eigenvalues().to_vec(), vec![5.0, 1.0]);
        assert_eq!(
            evd.eigenvectors(),
            &Matrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]])
        );
    }

    #[test]
    fn non_square_input_is_rejected() {
        assert!(matches!(
            Evd::new(&Matrix::zeros(2, 3)),
            Err(LinalgError::InvalidOperation(_))
        ));
    }
}
