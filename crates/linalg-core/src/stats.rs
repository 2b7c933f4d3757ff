//! Descriptive statistics over vectors and matrix axes.
//!
//! Dispersion measures are sample estimates (divide by `n - 1`), computed
//! with `statrs` over every element of the vector.
use std::ops::Range;

use statrs::statistics::{Data, Median, Statistics};

use crate::config::Axis;
use crate::error::{LinalgError, Result};
use crate::math::{Matrix, Vector};

fn require_len(v: &Vector, min: usize, statistic: &str) -> Result<()> {
    if v.len() < min {
        return Err(LinalgError::InvalidOperation(format!(
            "{} needs at least {} element(s), got {}",
            statistic,
            min,
            v.len()
        )));
    }
    Ok(())
}

fn require_same_len(a: &Vector, b: &Vector, operation: &'static str) -> Result<()> {
    if a.len() != b.len() {
        return Err(LinalgError::length_mismatch(operation, a.len(), b.len()));
    }
    Ok(())
}

impl Vector {
    pub fn mean(&self) -> Result<f64> {
        require_len(self, 1, "mean")?;
        Ok(self.iter().mean())
    }

    /// Sample variance.
    pub fn variance(&self) -> Result<f64> {
        require_len(self, 2, "variance")?;
        Ok(self.iter().variance())
    }

    /// Sample standard deviation.
    pub fn std_dev(&self) -> Result<f64> {
        require_len(self, 2, "standard deviation")?;
        Ok(self.iter().std_dev())
    }

    pub fn median(&self) -> Result<f64> {
        require_len(self, 1, "median")?;
        Ok(Data::new(self.to_vec()).median())
    }

    /// Sample covariance between two equal-length vectors.
    pub fn covariance(&self, other: &Vector) -> Result<f64> {
        require_same_len(self, other, "covariance")?;
        require_len(self, 2, "covariance")?;
        Ok(self.iter().covariance(other.iter()))
    }

    /// Pearson correlation. Fails when either vector has zero variance.
    pub fn correlation(&self, other: &Vector) -> Result<f64> {
        let cov = self.covariance(other)?;
        let denom = self.std_dev()? * other.std_dev()?;
        if denom == 0.0 {
            return Err(LinalgError::InvalidOperation(
                "correlation is undefined for a constant vector".into(),
            ));
        }
        Ok(cov / denom)
    }

    /// Splits `[min, max]` into `k` half-open ranges of equal width. The
    /// last upper bound sits just above `max` so every element falls in
    /// exactly one range.
    pub fn segment(&self, k: usize) -> Result<Vec<Range<f64>>> {
        require_len(self, 1, "segment")?;
        if k == 0 {
            return Err(LinalgError::InvalidOperation(
                "segment count must be at least 1".into(),
            ));
        }
        let (Some(min), Some(max)) = (self.min(), self.max()) else {
            return Err(LinalgError::InvalidOperation("segment needs a non-empty vector".into()));
        };
        if min == max && k > 1 {
            return Err(LinalgError::InvalidOperation(format!(
                "cannot split a constant vector (all values {}) into {} segments",
                min, k
            )));
        }
        let width = (max - min) / k as f64;
        let upper = max + (f64::EPSILON * max.abs()).max(f64::MIN_POSITIVE);
        Ok((0..k)
            .map(|i| {
                let start = min + width * i as f64;
                let end = if i + 1 == k {
                    upper
                } else {
                    min + width * (i + 1) as f64
                };
                start..end
            })
            .collect())
    }

    /// Indices that order the values from largest to smallest. Ties keep
    /// their original order. Uses IEEE total ordering, so a positive NaN
    /// ranks first and `0.0` ranks ahead of `-0.0`.
    pub fn sort_order(&self) -> Vec<usize> {
        let values = self.values();
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
        order
    }
}

impl Matrix {
    /// Collapses `axis`: `Axis::Row` sums down the rows (one value per
    /// column), `Axis::Col` sums across the columns (one value per row).
    pub fn sum_axis(&self, axis: Axis) -> Vector {
        self.vectors(axis.flip()).map(|v| v.sum()).collect()
    }

    /// Mean with the same reduction convention as [`Matrix::sum_axis`].
    pub fn mean_axis(&self, axis: Axis) -> Result<Vector> {
        self.vectors(axis.flip()).map(|v| v.mean()).collect()
    }

    /// Sample standard deviation with the [`Matrix::sum_axis`] convention.
    pub fn std_dev_axis(&self, axis: Axis) -> Result<Vector> {
        self.vectors(axis.flip()).map(|v| v.std_dev()).collect()
    }

    /// Sample covariance matrix treating each row (`Axis::Row`) or column
    /// (`Axis::Col`) as one variable.
    pub fn covariance(&self, axis: Axis) -> Result<Matrix> {
        let vars: Vec<Vector> = self.vectors(axis).collect();
        let n = vars.len();
        let mut out = Matrix::zeros(n, n);
        for i in 0..n {
            for j in i..n {
                let c = vars[i].covariance(&vars[j])?;
                out.set(i, j, c)?;
                out.set(j, i, c)?;
            }
        }
        Ok(out)
    }

    /// Pearson correlation matrix with the [`Matrix::covariance`] convention.
    pub fn correlation(&self, axis: Axis) -> Result<Matrix> {
        let vars: Vec<Vector> = self.vectors(axis).collect();
        let n = vars.len();
        let mut out = Matrix::identity(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let c = vars[i].correlation(&vars[j])?;
                out.set(i, j, c)?;
                out.set(j, i, c)?;
            }
        }
        Ok(out)
    }
}
