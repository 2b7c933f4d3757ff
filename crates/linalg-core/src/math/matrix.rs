use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::Normal;

use crate::config::Axis;
use crate::error::{LinalgError, Result};
use crate::math::dense::Dense;
use crate::math::vector::{canonical_bits, Storage, Vector};

/// Dense row-major `f64` matrix.
///
/// The buffer lives behind an `Rc<RefCell<_>>` so that [`Matrix::t`] can
/// return an O(1) transpose that aliases it. Such a view is read-only:
/// every mutating call on it returns [`LinalgError::InvalidOperation`].
/// Writes made through the owning matrix stay visible through its views.
///
/// `Clone` is a deep copy, exactly like [`Matrix::copy`]. Because storage
/// is shared through `Rc`, matrices are neither `Send` nor `Sync`; the
/// single-writer discipline is enforced at compile time.
pub struct Matrix {
    storage: Storage,
    rows: usize,
    cols: usize,
    /// Logical (r, c) lives at physical (c, r) of the shared buffer.
    transposed: bool,
    /// Aliases another matrix's buffer; all writes are rejected.
    view: bool,
}

impl Matrix {
    /// Caller guarantees `data.len() == rows * cols`.
    pub(crate) fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self {
            storage: Rc::new(RefCell::new(data)),
            rows,
            cols,
            transposed: false,
            view: false,
        }
    }

    pub(crate) fn from_dense(dense: Dense) -> Self {
        let (rows, cols) = (dense.nrows(), dense.ncols());
        Self::from_row_major(rows, cols, dense.into_vec())
    }

    pub(crate) fn to_dense(&self) -> Dense {
        Dense::from_parts(self.rows, self.cols, self.to_row_major())
    }

    /// Zero-filled `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::zeros(rows, cols)
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_row_major(rows, cols, vec![0.0; rows * cols])
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::from_elem(rows, cols, 1.0)
    }

    pub fn from_elem(rows: usize, cols: usize, value: f64) -> Self {
        Self::from_row_major(rows, cols, vec![value; rows * cols])
    }

    pub fn identity(n: usize) -> Self {
        Self::from_dense(Dense::identity(n))
    }

    pub fn from_shape_vec(shape: (usize, usize), data: Vec<f64>) -> Result<Self> {
        let (rows, cols) = shape;
        if data.len() != rows * cols {
            return Err(LinalgError::DimensionMismatch {
                operation: "from_shape_vec",
                expected: format!("{} elements for {}x{}", rows * cols, rows, cols),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self::from_row_major(rows, cols, data))
    }

    /// Builds from a rectangular 2-D array.
    pub fn from_rows<const C: usize>(rows: &[[f64; C]]) -> Self {
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self::from_row_major(rows.len(), C, data)
    }

    /// Builds from a jagged array. Fails on zero rows and on ragged rows.
    pub fn from_jagged(rows: &[Vec<f64>]) -> Result<Self> {
        let first = rows.first().ok_or_else(|| {
            LinalgError::InvalidOperation("cannot build a matrix from an empty jagged array".into())
        })?;
        let cols = first.len();
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(LinalgError::length_mismatch("from_jagged", cols, row.len()));
            }
            data.extend_from_slice(row);
        }
        Ok(Self::from_row_major(rows.len(), cols, data))
    }

    /// Stacks vectors as rows (`Axis::Row`) or columns (`Axis::Col`).
    pub fn from_vectors(vectors: &[Vector], axis: Axis) -> Result<Self> {
        let first = vectors.first().ok_or_else(|| {
            LinalgError::InvalidOperation("cannot build a matrix from zero vectors".into())
        })?;
        let n = first.len();
        let mut data = Vec::with_capacity(vectors.len() * n);
        for v in vectors {
            if v.len() != n {
                return Err(LinalgError::length_mismatch("from_vectors", n, v.len()));
            }
            data.extend(v.iter());
        }
        let m = Self::from_row_major(vectors.len(), n, data);
        Ok(match axis {
            Axis::Row => m,
            Axis::Col => m.transpose(),
        })
    }

    /// Builds `m[(r, c)] = f(r, c)`.
    pub fn create<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self::from_row_major(rows, cols, data)
    }

    /// Uniform samples from `[0, 1)` using the thread-local generator.
    pub fn rand(rows: usize, cols: usize) -> Self {
        Self::rand_with(rows, cols, &mut rand::thread_rng())
    }

    pub fn rand_with<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        Self::create(rows, cols, |_, _| rng.gen::<f64>())
    }

    /// Normally distributed samples with the given mean and standard deviation.
    pub fn randn(rows: usize, cols: usize, mean: f64, std_dev: f64) -> Result<Self> {
        Self::randn_with(rows, cols, mean, std_dev, &mut rand::thread_rng())
    }

    pub fn randn_with<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
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
        Ok(Self::create(rows, cols, |_, _| normal.sample(rng)))
    }

    /// Lays a vector out as `rows x cols`, row-major for `Axis::Row`,
    /// column-major for `Axis::Col`.
    pub fn from_vector(v: &Vector, rows: usize, cols: usize, axis: Axis) -> Result<Self> {
        if v.len() != rows * cols {
            return Err(LinalgError::InvalidOperation(format!(
                "cannot reshape {} elements into {}x{}",
                v.len(),
                rows,
                cols
            )));
        }
        let values = v.values();
        Ok(match axis {
            Axis::Row => Self::from_row_major(rows, cols, values.into_owned()),
            Axis::Col => Self::create(rows, cols, |r, c| values[c * rows + r]),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// True for read-only aliases produced by [`Matrix::t`].
    pub fn is_view(&self) -> bool {
        self.view
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        if self.transposed {
            col * self.rows + row
        } else {
            row * self.cols + col
        }
    }

    /// Unchecked read; panics past the end like slice indexing.
    #[inline]
    pub(crate) fn at(&self, row: usize, col: usize) -> f64 {
        self.storage.borrow()[self.offset(row, col)]
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows {
            return Err(LinalgError::IndexOutOfRange {
                index: row,
                bound: self.rows,
            });
        }
        if col >= self.cols {
            return Err(LinalgError::IndexOutOfRange {
                index: col,
                bound: self.cols,
            });
        }
        Ok(())
    }

    fn ensure_writable(&self, operation: &str) -> Result<()> {
        if self.view {
            return Err(LinalgError::read_only(operation));
        }
        Ok(())
    }

    pub(crate) fn ensure_square(&self, operation: &str) -> Result<()> {
        if !self.is_square() {
            return Err(LinalgError::not_square(operation, self.shape()));
        }
        Ok(())
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_bounds(row, col)?;
        Ok(self.at(row, col))
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_bounds(row, col)?;
        self.ensure_writable("set a matrix element")?;
        let offset = self.offset(row, col);
        self.storage.borrow_mut()[offset] = value;
        Ok(())
    }

    fn axis_len(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.rows,
            Axis::Col => self.cols,
        }
    }

    /// Row or column `index`, assumed in range.
    fn extract_vector(&self, index: usize, axis: Axis) -> Vector {
        if self.view {
            let (src_rows, src_cols) = if self.transposed {
                (self.cols, self.rows)
            } else {
                (self.rows, self.cols)
            };
            // A logical row of a transposed view is a physical column.
            let column = (axis == Axis::Col) != self.transposed;
            return Vector::from_matrix_ref(
                Rc::clone(&self.storage),
                src_rows,
                src_cols,
                index,
                column,
            );
        }
        let data = self.storage.borrow();
        match axis {
            Axis::Row => {
                let start = index * self.cols;
                Vector::from_slice(&data[start..start + self.cols])
            }
            Axis::Col => (0..self.rows)
                .map(|r| data[r * self.cols + index])
                .collect(),
        }
    }

    /// Row (`Axis::Row`) or column (`Axis::Col`) `index`.
    ///
    /// Owning matrices hand back an independent copy. Transpose views hand
    /// back a reference-mode vector that reads through the shared buffer.
    pub fn vector(&self, index: usize, axis: Axis) -> Result<Vector> {
        let bound = self.axis_len(axis);
        if index >= bound {
            return Err(LinalgError::IndexOutOfRange { index, bound });
        }
        Ok(self.extract_vector(index, axis))
    }

    pub fn row(&self, index: usize) -> Result<Vector> {
        self.vector(index, Axis::Row)
    }

    pub fn col(&self, index: usize) -> Result<Vector> {
        self.vector(index, Axis::Col)
    }

    /// Every row or every column, in order.
    pub fn vectors(&self, axis: Axis) -> impl Iterator<Item = Vector> + '_ {
        (0..self.axis_len(axis)).map(move |i| self.extract_vector(i, axis))
    }

    /// Writes `v` into row/column `index` starting at position 0. `v` may be
    /// shorter than the opposite dimension but not longer.
    pub fn set_vector(&mut self, index: usize, axis: Axis, v: &Vector) -> Result<()> {
        let bound = self.axis_len(axis);
        if index >= bound {
            return Err(LinalgError::IndexOutOfRange { index, bound });
        }
        let capacity = self.axis_len(axis.flip());
        if v.len() > capacity {
            return Err(LinalgError::length_mismatch("set_vector", capacity, v.len()));
        }
        self.ensure_writable("set a matrix row or column")?;
        // `v` may alias this buffer; read it before borrowing mutably.
        let values = v.to_vec();
        let offsets: Vec<usize> = (0..values.len())
            .map(|k| match axis {
                Axis::Row => self.offset(index, k),
                Axis::Col => self.offset(k, index),
            })
            .collect();
        let mut data = self.storage.borrow_mut();
        for (offset, value) in offsets.into_iter().zip(values) {
            data[offset] = value;
        }
        Ok(())
    }

    pub fn set_row(&mut self, index: usize, v: &Vector) -> Result<()> {
        self.set_vector(index, Axis::Row, v)
    }

    pub fn set_col(&mut self, index: usize, v: &Vector) -> Result<()> {
        self.set_vector(index, Axis::Col, v)
    }

    /// O(1) transpose sharing this buffer. The result is read-only.
    pub fn t(&self) -> Matrix {
        Matrix {
            storage: Rc::clone(&self.storage),
            rows: self.cols,
            cols: self.rows,
            transposed: !self.transposed,
            view: true,
        }
    }

    /// Deep-copied transpose.
    pub fn transpose(&self) -> Matrix {
        Matrix::create(self.cols, self.rows, |r, c| self.at(c, r))
    }

    /// Independent deep copy; always owning, even when `self` is a view.
    pub fn copy(&self) -> Matrix {
        Matrix::from_row_major(self.rows, self.cols, self.to_row_major())
    }

    /// Values in logical row-major order.
    pub fn to_row_major(&self) -> Vec<f64> {
        if !self.transposed {
            return self.storage.borrow().clone();
        }
        let data = self.storage.borrow();
        let mut out = Vec::with_capacity(self.rows * self.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.push(data[self.offset(r, c)]);
            }
        }
        out
    }

    /// Flattens row-major (`Axis::Row`) or column-major (`Axis::Col`).
    pub fn unshape(&self, axis: Axis) -> Vector {
        match axis {
            Axis::Row => Vector::from_vec(self.to_row_major()),
            Axis::Col => {
                let mut out = Vec::with_capacity(self.rows * self.cols);
                for c in 0..self.cols {
                    for r in 0..self.rows {
                        out.push(self.at(r, c));
                    }
                }
                Vector::from_vec(out)
            }
        }
    }

    /// Re-lays the elements as `rows x cols`, reading and writing in the
    /// order selected by `axis`.
    pub fn reshape(&self, rows: usize, cols: usize, axis: Axis) -> Result<Matrix> {
        Matrix::from_vector(&self.unshape(axis), rows, cols, axis)
    }

    pub fn map<F>(&self, mut f: F) -> Matrix
    where
        F: FnMut(f64) -> f64,
    {
        let data = self.to_row_major().into_iter().map(|x| f(x)).collect();
        Matrix::from_row_major(self.rows, self.cols, data)
    }

    /// Positions of the rows/cols for which `predicate` holds.
    pub fn indices<P>(&self, predicate: P, axis: Axis) -> Vec<usize>
    where
        P: Fn(&Vector) -> bool,
    {
        self.vectors(axis)
            .enumerate()
            .filter(|(_, v)| predicate(v))
            .map(|(i, _)| i)
            .collect()
    }

    /// New matrix keeping the rows/cols for which `predicate` holds, in order.
    pub fn select<P>(&self, predicate: P, axis: Axis) -> Matrix
    where
        P: Fn(&Vector) -> bool,
    {
        let kept: Vec<Vector> = self.vectors(axis).filter(|v| predicate(v)).collect();
        self.assemble(kept, axis)
    }

    /// New matrix made of the listed rows/cols (repeats allowed).
    pub fn select_indices(&self, indices: &[usize], axis: Axis) -> Result<Matrix> {
        let picked = indices
            .iter()
            .map(|&i| self.vector(i, axis))
            .collect::<Result<Vec<Vector>>>()?;
        Ok(self.assemble(picked, axis))
    }

    // Vectors share the opposite dimension of `self`; zero vectors give an
    // empty matrix of the right orientation.
    fn assemble(&self, vectors: Vec<Vector>, axis: Axis) -> Matrix {
        let width = self.axis_len(axis.flip());
        let count = vectors.len();
        let mut data = Vec::with_capacity(count * width);
        for v in &vectors {
            data.extend(v.iter());
        }
        let m = Matrix::from_row_major(count, width, data);
        match axis {
            Axis::Row => m,
            Axis::Col => m.transpose(),
        }
    }

    /// Inserts `v` as a new row/column before `index` (`index == len` appends).
    pub fn insert(&self, v: &Vector, index: usize, axis: Axis) -> Result<Matrix> {
        let width = self.axis_len(axis.flip());
        if v.len() != width {
            return Err(LinalgError::length_mismatch("insert", width, v.len()));
        }
        let bound = self.axis_len(axis);
        if index > bound {
            return Err(LinalgError::IndexOutOfRange {
                index,
                bound: bound + 1,
            });
        }
        let mut vectors: Vec<Vector> = self.vectors(axis).map(|x| x.copy()).collect();
        vectors.insert(index, v.copy());
        Ok(self.assemble(vectors, axis))
    }

    /// Drops row/column `index`.
    pub fn remove(&self, index: usize, axis: Axis) -> Result<Matrix> {
        let bound = self.axis_len(axis);
        if index >= bound {
            return Err(LinalgError::IndexOutOfRange { index, bound });
        }
        let vectors: Vec<Vector> = self
            .vectors(axis)
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, v)| v)
            .collect();
        Ok(self.assemble(vectors, axis))
    }

    /// Copies the `rows x cols` block whose top-left corner is `(row, col)`.
    pub fn extract(&self, row: usize, col: usize, rows: usize, cols: usize) -> Result<Matrix> {
        if row + rows > self.rows || col + cols > self.cols {
            return Err(LinalgError::DimensionMismatch {
                operation: "extract",
                expected: format!("block within {}x{}", self.rows, self.cols),
                actual: format!("{}x{} block at ({}, {})", rows, cols, row, col),
            });
        }
        Ok(Matrix::create(rows, cols, |r, c| self.at(row + r, col + c)))
    }

    /// Side by side: `[self | other]`. Row counts must match.
    pub fn stack(&self, other: &Matrix) -> Result<Matrix> {
        if self.rows != other.rows {
            return Err(LinalgError::shape_mismatch(
                "stack",
                (self.rows, other.cols),
                other.shape(),
            ));
        }
        Ok(Matrix::create(self.rows, self.cols + other.cols, |r, c| {
            if c < self.cols {
                self.at(r, c)
            } else {
                other.at(r, c - self.cols)
            }
        }))
    }

    /// On top of each other: `[self; other]`. Column counts must match.
    pub fn vstack(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.cols {
            return Err(LinalgError::shape_mismatch(
                "vstack",
                (other.rows, self.cols),
                other.shape(),
            ));
        }
        let mut data = self.to_row_major();
        data.extend(other.to_row_major());
        Ok(Matrix::from_row_major(self.rows + other.rows, self.cols, data))
    }

    /// Stable sort of rows/cols by a scalar key, using IEEE total ordering
    /// of the keys.
    ///
    /// Returns the sorted matrix and, for each new position, the original
    /// index of the row/column that landed there.
    pub fn sort<K>(&self, key: K, axis: Axis, ascending: bool) -> (Matrix, Vector)
    where
        K: Fn(&Vector) -> f64,
    {
        let mut keyed: Vec<(usize, f64, Vector)> = self
            .vectors(axis)
            .enumerate()
            .map(|(i, v)| {
                let k = key(&v);
                (i, k, v)
            })
            .collect();
        keyed.sort_by(|a, b| {
            let ord = a.1.total_cmp(&b.1);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        let order: Vector = keyed.iter().map(|(i, _, _)| *i as f64).collect();
        let vectors = keyed.into_iter().map(|(_, _, v)| v).collect();
        (self.assemble(vectors, axis), order)
    }

    /// Main diagonal (length `min(rows, cols)`).
    pub fn diag(&self) -> Vector {
        (0..self.rows.min(self.cols)).map(|i| self.at(i, i)).collect()
    }

    pub fn trace(&self) -> Result<f64> {
        self.ensure_square("trace")?;
        Ok(self.diag().sum())
    }

    pub fn sum(&self) -> f64 {
        self.storage.borrow().iter().sum()
    }

    pub fn min(&self) -> Option<f64> {
        self.storage.borrow().iter().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.storage.borrow().iter().copied().reduce(f64::max)
    }

    /// Frobenius norm.
    pub fn norm(&self) -> f64 {
        self.storage
            .borrow()
            .iter()
            .map(|x| x * x)
            .sum::<f64>()
            .sqrt()
    }

    /// Elementwise equality within an absolute tolerance.
    pub fn approx_eq(&self, other: &Matrix, tol: f64) -> bool {
        self.shape() == other.shape()
            && (0..self.rows)
                .all(|r| (0..self.cols).all(|c| (self.at(r, c) - other.at(r, c)).abs() <= tol))
    }

    /// Hash over shape and values, consistent with `==`. Matrices
    /// deliberately do not implement `Hash`.
    pub fn value_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.shape().hash(&mut hasher);
        for x in self.to_row_major() {
            canonical_bits(x).hash(&mut hasher);
        }
        hasher.finish()
    }

    pub fn to_array2(&self) -> Result<ndarray::Array2<f64>> {
        ndarray::Array2::from_shape_vec((self.rows, self.cols), self.to_row_major()).map_err(|e| {
            LinalgError::DimensionMismatch {
                operation: "to_array2",
                expected: format!("{}x{}", self.rows, self.cols),
                actual: e.to_string(),
            }
        })
    }
}

impl Clone for Matrix {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl PartialEq for Matrix {
    /// Exact elementwise equality; view/owner status is ignored.
    fn eq(&self, other: &Matrix) -> bool {
        self.shape() == other.shape()
            && (0..self.rows).all(|r| (0..self.cols).all(|c| self.at(r, c) == other.at(r, c)))
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("view", &self.view)
            .field("data", &self.to_row_major())
            .finish()
    }
}

impl From<&ndarray::Array2<f64>> for Matrix {
    fn from(value: &ndarray::Array2<f64>) -> Self {
        let (rows, cols) = value.dim();
        Matrix::from_row_major(rows, cols, value.iter().copied().collect())
    }
}
