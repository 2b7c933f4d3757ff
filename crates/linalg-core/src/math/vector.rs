use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::rc::Rc;

use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::Normal;

use crate::config::Axis;
use crate::error::{LinalgError, Result};
use crate::math::matrix::Matrix;

/// Backing buffer shared between a matrix, its transpose views and any
/// reference-mode vectors extracted from those views.
pub(crate) type Storage = Rc<RefCell<Vec<f64>>>;

/// Handle into a matrix buffer: one fixed row or column of a row-major grid.
#[derive(Clone)]
struct MatrixRef {
    storage: Storage,
    rows: usize,
    cols: usize,
    index: usize,
    column: bool,
}

impl MatrixRef {
    // Length comes from the referenced grid, never from a local count.
    fn len(&self) -> usize {
        if self.column {
            self.rows
        } else {
            self.cols
        }
    }

    #[inline]
    fn offset(&self, i: usize) -> usize {
        if self.column {
            i * self.cols + self.index
        } else {
            self.index * self.cols + i
        }
    }

    fn read(&self, i: usize) -> f64 {
        self.storage.borrow()[self.offset(i)]
    }

    fn gather(&self) -> Vec<f64> {
        let data = self.storage.borrow();
        (0..self.len()).map(|i| data[self.offset(i)]).collect()
    }
}

enum Repr {
    Owned(Vec<f64>),
    Ref(MatrixRef),
}

/// One-dimensional `f64` container.
///
/// A vector either owns its values or, when it was pulled out of a
/// transpose view with [`Matrix::vector`], reads straight through the
/// matrix buffer. Reference-mode vectors observe later writes to the
/// source matrix and reject every write of their own; call
/// [`Vector::copy`] to get an independent, mutable value.
///
/// `Vector` shares storage through `Rc`, so it is neither `Send` nor `Sync`.
pub struct Vector {
    repr: Repr,
}

impl Vector {
    /// Zero-filled vector of length `len`.
    pub fn new(len: usize) -> Self {
        Self::zeros(len)
    }

    pub fn zeros(len: usize) -> Self {
        Self::from_vec(vec![0.0; len])
    }

    pub fn ones(len: usize) -> Self {
        Self::from_vec(vec![1.0; len])
    }

    pub fn from_elem(len: usize, value: f64) -> Self {
        Self::from_vec(vec![value; len])
    }

    pub fn from_vec(data: Vec<f64>) -> Self {
        Self {
            repr: Repr::Owned(data),
        }
    }

    /// Copies the slice; never aliases.
    pub fn from_slice(data: &[f64]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Builds `[f(0), f(1), ..., f(len - 1)]`.
    pub fn create<F>(len: usize, f: F) -> Self
    where
        F: FnMut(usize) -> f64,
    {
        (0..len).map(f).collect()
    }

    /// Uniform samples from `[0, 1)` using the thread-local generator.
    pub fn rand(len: usize) -> Self {
        Self::rand_with(len, &mut rand::thread_rng())
    }

    pub fn rand_with<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        (0..len).map(|_| rng.gen::<f64>()).collect()
    }

    /// Normally distributed samples with the given mean and standard deviation.
    pub fn randn(len: usize, mean: f64, std_dev: f64) -> Result<Self> {
        Self::randn_with(len, mean, std_dev, &mut rand::thread_rng())
    }

    pub fn randn_with<R: Rng + ?Sized>(
        len: usize,
        mean: f64,
        std_dev: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let normal = Normal::new(mean, std_dev).map_err(|e| {
            LinalgError::InvalidOperation(format!(
                "invalid normal distribution N({}, {}): {}",
                mean, std_dev, e
            ))
        })?;
        Ok((0..len).map(|_| normal.sample(rng)).collect())
    }

    /// Concatenates vectors end to end.
    pub fn combine(parts: &[&Vector]) -> Self {
        let mut values = Vec::with_capacity(parts.iter().map(|v| v.len()).sum());
        for part in parts {
            values.extend(part.iter());
        }
        Self::from_vec(values)
    }

    /// Reference constructor: row (`column == false`) or column `index` of a
    /// `rows x cols` row-major buffer. Never copies.
    pub(crate) fn from_matrix_ref(
        storage: Storage,
        rows: usize,
        cols: usize,
        index: usize,
        column: bool,
    ) -> Self {
        Self {
            repr: Repr::Ref(MatrixRef {
                storage,
                rows,
                cols,
                index,
                column,
            }),
        }
    }

    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Owned(data) => data.len(),
            Repr::Ref(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when this vector aliases a matrix buffer.
    pub fn is_view(&self) -> bool {
        matches!(self.repr, Repr::Ref(_))
    }

    pub fn shape(&self) -> (usize,) {
        (self.len(),)
    }

    /// Unchecked read; panics past the end like slice indexing.
    #[inline]
    pub(crate) fn at(&self, i: usize) -> f64 {
        match &self.repr {
            Repr::Owned(data) => data[i],
            Repr::Ref(r) => {
                assert!(i < r.len(), "vector index {} out of range {}", i, r.len());
                r.read(i)
            }
        }
    }

    fn check_index(&self, i: usize) -> Result<()> {
        if i >= self.len() {
            return Err(LinalgError::IndexOutOfRange {
                index: i,
                bound: self.len(),
            });
        }
        Ok(())
    }

    fn owned_mut(&mut self, operation: &str) -> Result<&mut Vec<f64>> {
        match &mut self.repr {
            Repr::Owned(data) => Ok(data),
            Repr::Ref(_) => Err(LinalgError::read_only(operation)),
        }
    }

    pub fn get(&self, i: usize) -> Result<f64> {
        self.check_index(i)?;
        Ok(self.at(i))
    }

    pub fn set(&mut self, i: usize, value: f64) -> Result<()> {
        self.check_index(i)?;
        let data = self.owned_mut("set a vector element")?;
        data[i] = value;
        Ok(())
    }

    /// Overwrites every element for which `predicate` holds.
    pub fn set_where<P>(&mut self, predicate: P, value: f64) -> Result<()>
    where
        P: Fn(f64) -> bool,
    {
        let data = self.owned_mut("set vector elements")?;
        for x in data.iter_mut().filter(|x| predicate(**x)) {
            *x = value;
        }
        Ok(())
    }

    /// Overwrites the listed positions with `value`. All indices are
    /// validated before the first write.
    pub fn set_indices<I>(&mut self, indices: I, value: f64) -> Result<()>
    where
        I: IntoIterator<Item = usize>,
    {
        let indices: Vec<usize> = indices.into_iter().collect();
        for &i in &indices {
            self.check_index(i)?;
        }
        let data = self.owned_mut("set vector elements")?;
        for i in indices {
            data[i] = value;
        }
        Ok(())
    }

    /// Values in order; works for both representations.
    pub fn iter(&self) -> impl Iterator<Item = f64> + Clone + '_ {
        (0..self.len()).map(move |i| self.at(i))
    }

    /// Borrowed for owned vectors, gathered for reference-mode vectors.
    pub fn values(&self) -> Cow<'_, [f64]> {
        match &self.repr {
            Repr::Owned(data) => Cow::Borrowed(data.as_slice()),
            Repr::Ref(r) => Cow::Owned(r.gather()),
        }
    }

    /// Only owned vectors expose a contiguous slice.
    pub fn as_slice(&self) -> Option<&[f64]> {
        match &self.repr {
            Repr::Owned(data) => Some(data),
            Repr::Ref(_) => None,
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values().into_owned()
    }

    /// Independent, owned deep copy.
    pub fn copy(&self) -> Vector {
        Vector::from_vec(self.to_vec())
    }

    pub fn map<F>(&self, f: F) -> Vector
    where
        F: FnMut(f64) -> f64,
    {
        self.iter().map(f).collect()
    }

    /// Lazy sequence of the values matching `predicate`, in original order.
    /// The iterator is `Clone`, so it can be restarted.
    pub fn slice<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = f64> + Clone + 'a
    where
        P: Fn(f64) -> bool + Clone + 'a,
    {
        self.iter().filter(move |x| predicate(*x))
    }

    /// Lazy sequence of the positions whose value matches `predicate`.
    pub fn indices<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = usize> + Clone + 'a
    where
        P: Fn(f64) -> bool + Clone + 'a,
    {
        self.iter()
            .enumerate()
            .filter(move |(_, x)| predicate(*x))
            .map(|(i, _)| i)
    }

    pub fn select(&self, indices: &[usize]) -> Result<Vector> {
        indices
            .iter()
            .map(|&i| self.get(i))
            .collect::<Result<Vec<f64>>>()
            .map(Vector::from_vec)
    }

    pub fn dot(&self, other: &Vector) -> Result<f64> {
        if self.len() != other.len() {
            return Err(LinalgError::length_mismatch("dot", self.len(), other.len()));
        }
        let (a, b) = (self.values(), other.values());
        Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
    }

    /// Generalized p-norm.
    ///
    /// `p == 1` sums absolute values. `f64::MAX` (or `+inf`) returns the
    /// largest absolute value and `f64::MIN` (or `-inf`) the smallest; these
    /// sentinels approximate the L∞ / L-∞ norms and are not derived from the
    /// limit of the general formula.
    pub fn norm(&self, p: f64) -> f64 {
        if p == f64::MAX || p == f64::INFINITY {
            return self.iter().map(f64::abs).fold(0.0, f64::max);
        }
        if p == f64::MIN || p == f64::NEG_INFINITY {
            return self.iter().map(f64::abs).fold(f64::INFINITY, f64::min);
        }
        if p == 1.0 {
            return self.iter().map(f64::abs).sum();
        }
        if p == 2.0 {
            return self.iter().map(|x| x * x).sum::<f64>().sqrt();
        }
        self.iter()
            .map(|x| x.abs().powf(p))
            .sum::<f64>()
            .powf(1.0 / p)
    }

    /// Returns a copy scaled to unit p-norm; a zero vector is returned unchanged.
    pub fn normalized(&self, p: f64) -> Vector {
        let n = self.norm(p);
        if n == 0.0 {
            return self.copy();
        }
        self.map(|x| x / n)
    }

    pub fn sum(&self) -> f64 {
        self.iter().sum()
    }

    pub fn prod(&self) -> f64 {
        self.iter().product()
    }

    pub fn min(&self) -> Option<f64> {
        self.iter().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.iter().reduce(f64::max)
    }

    /// Position of the first smallest value.
    pub fn arg_min(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, x) in self.iter().enumerate() {
            if best.map_or(true, |(_, b)| x < b) {
                best = Some((i, x));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Position of the first largest value.
    pub fn arg_max(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, x) in self.iter().enumerate() {
            if best.map_or(true, |(_, b)| x > b) {
                best = Some((i, x));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Positions of the `k` largest values, largest first.
    pub fn top(&self, k: usize) -> Vec<usize> {
        self.sort_order().into_iter().take(k).collect()
    }

    pub fn reverse(&self) -> Vector {
        let mut values = self.to_vec();
        values.reverse();
        Vector::from_vec(values)
    }

    /// `self * other^T` as a `len x other.len` matrix.
    pub fn outer(&self, other: &Vector) -> Matrix {
        let (a, b) = (self.values(), other.values());
        let mut data = Vec::with_capacity(a.len() * b.len());
        for x in a.iter() {
            data.extend(b.iter().map(|y| x * y));
        }
        Matrix::from_row_major(a.len(), b.len(), data)
    }

    /// Square matrix with this vector on its diagonal.
    pub fn diag(&self) -> Matrix {
        let n = self.len();
        let mut data = vec![0.0; n * n];
        for (i, x) in self.iter().enumerate() {
            data[i * n + i] = x;
        }
        Matrix::from_row_major(n, n, data)
    }

    /// Embeds as a single row (`Axis::Row`, 1 x n) or column (`Axis::Col`, n x 1).
    pub fn to_matrix(&self, axis: Axis) -> Matrix {
        let n = self.len();
        match axis {
            Axis::Row => Matrix::from_row_major(1, n, self.to_vec()),
            Axis::Col => Matrix::from_row_major(n, 1, self.to_vec()),
        }
    }

    /// Elementwise equality within an absolute tolerance.
    pub fn approx_eq(&self, other: &Vector, tol: f64) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| (a - b).abs() <= tol)
    }

    /// Hash over the values, consistent with `==` (`-0.0` and `0.0` hash
    /// alike). Vectors deliberately do not implement `Hash`.
    pub fn value_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.len().hash(&mut hasher);
        for x in self.iter() {
            canonical_bits(x).hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Converts to an `ndarray` vector.
    pub fn to_array1(&self) -> ndarray::Array1<f64> {
        ndarray::Array1::from_vec(self.to_vec())
    }
}

pub(crate) fn canonical_bits(x: f64) -> u64 {
    if x == 0.0 {
        0.0f64.to_bits()
    } else if x.is_nan() {
        f64::NAN.to_bits()
    } else {
        x.to_bits()
    }
}

impl Clone for Vector {
    /// Deep copy; a cloned reference-mode vector owns its values.
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Vector) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("view", &self.is_view())
            .field("data", &self.values())
            .finish()
    }
}

impl Default for Vector {
    fn default() -> Self {
        Vector::from_vec(Vec::new())
    }
}

impl From<Vec<f64>> for Vector {
    fn from(value: Vec<f64>) -> Self {
        Vector::from_vec(value)
    }
}

impl From<&[f64]> for Vector {
    fn from(value: &[f64]) -> Self {
        Vector::from_slice(value)
    }
}

impl From<Vector> for Vec<f64> {
    fn from(value: Vector) -> Self {
        match value.repr {
            Repr::Owned(data) => data,
            Repr::Ref(r) => r.gather(),
        }
    }
}

impl From<&ndarray::Array1<f64>> for Vector {
    fn from(value: &ndarray::Array1<f64>) -> Self {
        value.iter().copied().collect()
    }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Vector::from_vec(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_set_are_bounds_checked() {
        let mut v = Vector::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(v.get(2).unwrap(), 3.0);
        assert!(matches!(
            v.get(3),
            Err(LinalgError::IndexOutOfRange { index: 3, bound: 3 })
        ));
        v.set(0, 9.0).unwrap();
        assert_eq!(v.get(0).unwrap(), 9.0);
        assert!(v.set(5, 1.0).is_err());
    }

    #[test]
    fn set_where_mutates_matching_elements() {
        let mut v = Vector::from_vec(vec![-1.0, 2.0, -3.0, 4.0]);
        v.set_where(|x| x < 0.0, 0.0).unwrap();
        assert_eq!(v.to_vec(), vec![0.0, 2.0, 0.0, 4.0]);
    }

    #[test]
    fn set_indices_validates_before_writing() {
        let mut v = Vector::zeros(4);
        assert!(v.set_indices(vec![0, 9], 1.0).is_err());
        assert_eq!(v.to_vec(), vec![0.0; 4]);
        v.set_indices(vec![1, 3], 7.0).unwrap();
        assert_eq!(v.to_vec(), vec![0.0, 7.0, 0.0, 7.0]);
    }

    #[test]
    fn slice_and_indices_keep_order() {
        let v = Vector::from_vec(vec![1.2, 2.2, 2.1, 5.2, 0.2, 6.7, 8.8]);
        let small: Vec<f64> = v.slice(|x| x <= 5.0).collect();
        assert_eq!(small, vec![1.2, 2.2, 2.1, 0.2]);
        let idx: Vec<usize> = v.indices(|x| x <= 5.0).collect();
        assert_eq!(idx, vec![0, 1, 2, 4]);
    }

    #[test]
    fn slice_is_restartable() {
        let v = Vector::from_vec(vec![1.0, 10.0, 2.0]);
        let it = v.slice(|x| x < 5.0);
        let first: Vec<f64> = it.clone().collect();
        let second: Vec<f64> = it.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn norm_variants() {
        let v = Vector::from_vec(vec![3.0, -4.0]);
        assert_eq!(v.norm(1.0), 7.0);
        assert_eq!(v.norm(2.0), 5.0);
        assert_eq!(v.norm(f64::MAX), 4.0);
        assert_eq!(v.norm(f64::MIN), 3.0);
        assert!((v.norm(3.0) - (27.0f64 + 64.0).powf(1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn dot_requires_equal_length() {
        let a = Vector::from_vec(vec![1.0, 2.0, 3.0]);
        let b = Vector::from_vec(vec![4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b).unwrap(), 32.0);
        assert!(matches!(
            a.dot(&Vector::zeros(2)),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn arg_extrema_pick_first_occurrence() {
        let v = Vector::from_vec(vec![1.0, 5.0, 5.0, -2.0, -2.0]);
        assert_eq!(v.arg_max(), Some(1));
        assert_eq!(v.arg_min(), Some(3));
        assert_eq!(Vector::default().arg_max(), None);
    }

    #[test]
    fn to_matrix_orientations() {
        let v = Vector::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(v.to_matrix(Axis::Row).shape(), (1, 3));
        assert_eq!(v.to_matrix(Axis::Col).shape(), (3, 1));
    }

    #[test]
    fn value_hash_follows_equality() {
        let a = Vector::from_vec(vec![0.0, 1.5]);
        let b = Vector::from_vec(vec![-0.0, 1.5]);
        assert_eq!(a, b);
        assert_eq!(a.value_hash(), b.value_hash());
        assert_ne!(a.value_hash(), Vector::from_vec(vec![1.5, 0.0]).value_hash());
    }

    #[test]
    fn outer_and_diag_shapes() {
        let a = Vector::from_vec(vec![1.0, 2.0]);
        let b = Vector::from_vec(vec![3.0, 4.0, 5.0]);
        let o = a.outer(&b);
        assert_eq!(o.shape(), (2, 3));
        assert_eq!(o.get(1, 2).unwrap(), 10.0);
        let d = b.diag();
        assert_eq!(d.trace().unwrap(), 12.0);
    }
}
