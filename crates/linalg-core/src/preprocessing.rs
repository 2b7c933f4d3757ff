//! In-place row/column normalization and a per-column standard scaler.
//!
//! `normalize` and `center` mutate the receiver and therefore fail on
//! transpose views. The scaler is fitted once and applied to new matrices.
use crate::config::Axis;
use crate::error::{LinalgError, Result};
use crate::math::{Matrix, Vector};

impl Matrix {
    /// Scales every row (`Axis::Row`) or column (`Axis::Col`) to unit
    /// Euclidean length. All-zero vectors are left as they are.
    pub fn normalize(&mut self, axis: Axis) -> Result<()> {
        if self.is_view() {
            return Err(LinalgError::read_only("normalize"));
        }
        let count = match axis {
            Axis::Row => self.rows(),
            Axis::Col => self.cols(),
        };
        for i in 0..count {
            let v = self.vector(i, axis)?;
            let norm = v.norm(2.0);
            if norm > 0.0 {
                self.set_vector(i, axis, &(&v / norm))?;
            }
        }
        Ok(())
    }

    /// Subtracts the mean row (`Axis::Row`) or mean column (`Axis::Col`)
    /// from every row/column, leaving each row/column vector centered on
    /// the origin of its space.
    pub fn center(&mut self, axis: Axis) -> Result<()> {
        if self.is_view() {
            return Err(LinalgError::read_only("center"));
        }
        let mean = self.mean_axis(axis)?;
        let count = match axis {
            Axis::Row => self.rows(),
            Axis::Col => self.cols(),
        };
        for i in 0..count {
            let v = self.vector(i, axis)?;
            self.set_vector(i, axis, &v.checked_sub(&mean)?)?;
        }
        Ok(())
    }
}

/// Per-column mean/std standardization.
#[derive(Clone, Debug, PartialEq)]
pub struct Scaler {
    pub mean: Vector,
    pub std: Vector,
}

impl Scaler {
    /// Minimum stddev to avoid division by zero when transforming.
    const MIN_STD: f64 = 1e-12;

    /// Fits column means and population standard deviations. Rows are
    /// samples, columns are features.
    pub fn fit(x: &Matrix) -> Result<Scaler> {
        let (nrows, ncols) = x.shape();
        if nrows == 0 || ncols == 0 {
            return Err(LinalgError::InvalidOperation(
                "Scaler::fit requires a non-empty matrix".into(),
            ));
        }
        let mean = x.mean_axis(Axis::Row)?;
        let std: Vector = x
            .vectors(Axis::Col)
            .zip(mean.iter())
            .map(|(col, m)| {
                let var = col.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / nrows as f64;
                var.sqrt().max(Scaler::MIN_STD)
            })
            .collect();
        Ok(Scaler { mean, std })
    }

    /// Standardizes every row of `x` with the fitted statistics.
    pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
        if x.cols() != self.mean.len() {
            return Err(LinalgError::length_mismatch(
                "Scaler::transform",
                self.mean.len(),
                x.cols(),
            ));
        }
        let (mean, std) = (self.mean.values(), self.std.values());
        Ok(Matrix::create(x.rows(), x.cols(), |r, c| {
            (x.at(r, c) - mean[c]) / std[c]
        }))
    }

    pub fn fit_transform(x: &Matrix) -> Result<(Scaler, Matrix)> {
        let scaler = Scaler::fit(x)?;
        let out = scaler.transform(x)?;
        Ok((scaler, out))
    }
}
