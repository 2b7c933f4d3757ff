//! linalg-core: dense matrix and vector numerics for machine-learning code.
//!
//! This crate provides a row-major [`Matrix`] with O(1) transpose views, a
//! [`Vector`] that can either own its data or read a row/column of a matrix
//! in place, checked arithmetic with panicking operator overloads, and the
//! classical decompositions (Cholesky, LU, QR, Gauss-Jordan inverse and a
//! Jacobi eigen-solver). Statistics, normalization, text parsing and JSON
//! persistence round out the toolkit.
//!
//! Everything is synchronous and single-threaded. Fallible calls return
//! [`Result`] with a [`LinalgError`]; the library only logs through the
//! `log` facade and never installs a logger.
pub mod config;
pub mod decomposition;
pub mod error;
pub mod io;
pub mod math;
pub mod preprocessing;
pub mod stats;

pub use config::{Axis, SolverConfig};
pub use decomposition::{Evd, EvdState};
pub use error::{LinalgError, Result};
pub use math::{Matrix, Vector};
pub use preprocessing::Scaler;
