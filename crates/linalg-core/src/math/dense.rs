//! Row-major scratch grid used as the working copy inside the algorithms.
//!
//! `Matrix` shares its buffer through a reference-counted cell, which makes
//! element access go through a runtime borrow. The decompositions instead
//! copy into a `Dense`, work with plain indexing, and hand the result back
//! as a fresh `Matrix`.
use std::ops::{Index, IndexMut};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Dense {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Dense {
    pub(crate) fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    pub(crate) fn identity(n: usize) -> Self {
        let mut out = Self::zeros(n, n);
        for i in 0..n {
            out[(i, i)] = 1.0;
        }
        out
    }

    /// Caller guarantees `data.len() == rows * cols`.
    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { data, rows, cols }
    }

    pub(crate) fn nrows(&self) -> usize {
        self.rows
    }

    pub(crate) fn ncols(&self) -> usize {
        self.cols
    }

    pub(crate) fn into_vec(self) -> Vec<f64> {
        self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub(crate) fn row_slice(&self, row: usize) -> &[f64] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for c in 0..self.cols {
            self.data.swap(a * self.cols + c, b * self.cols + c);
        }
    }

    pub(crate) fn column_norm(&self, col: usize) -> f64 {
        (0..self.rows)
            .map(|r| self[(r, col)] * self[(r, col)])
            .sum::<f64>()
            .sqrt()
    }

    pub(crate) fn matmul(&self, other: &Dense) -> Dense {
        debug_assert_eq!(self.cols, other.rows);
        let mut out = Dense::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let aik = self[(i, k)];
                if aik == 0.0 {
                    continue;
                }
                let row = other.row_slice(k);
                for (j, &bkj) in row.iter().enumerate() {
                    out.data[i * other.cols + j] += aik * bkj;
                }
            }
        }
        out
    }
}

impl Index<(usize, usize)> for Dense {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let offset = self.offset(index.0, index.1);
        &self.data[offset]
    }
}

impl IndexMut<(usize, usize)> for Dense {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(index.0, index.1);
        &mut self.data[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_rows_moves_whole_rows() {
        let mut d = Dense::from_parts(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        d.swap_rows(0, 1);
        assert_eq!(d.row_slice(0), &[4.0, 5.0, 6.0]);
        assert_eq!(d.row_slice(1), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn matmul_with_identity_is_noop() {
        let d = Dense::from_parts(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(d.matmul(&Dense::identity(2)), d);
    }
}
