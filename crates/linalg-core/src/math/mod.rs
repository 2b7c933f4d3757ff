//! Dense `Matrix` and `Vector` containers.
//!
//! The two types are designed together: a matrix hands out vectors for its
//! rows and columns, and a vector pulled from a transpose view reads
//! through the matrix buffer instead of copying it.
pub(crate) mod dense;
pub mod matrix;
pub mod ops;
pub mod parse;
pub mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
