//! JSON persistence for matrices and vectors.
//!
//! A matrix is stored as an array of row arrays and a vector as a flat
//! array of numbers. Values written by this module read back bit-for-bit.
//! The reader/writer functions work on any `std::io` stream and report
//! [`LinalgError`](crate::LinalgError); the `save`/`load` methods on
//! [`Matrix`](crate::Matrix) and [`Vector`](crate::Vector) open files and
//! return `anyhow` errors carrying the path.
pub mod json;

pub use json::{read_matrix, read_vector, write_matrix, write_vector};
