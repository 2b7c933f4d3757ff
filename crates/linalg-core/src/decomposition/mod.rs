//! Factorizations and solvers built on [`Matrix`](crate::Matrix).
//!
//! Every entry point validates its input, copies it into a scratch grid and
//! returns freshly allocated factors. The input matrix is never mutated and
//! the factors never alias it.
pub mod cholesky;
pub mod eigen;
pub mod inverse;
pub mod lu;
pub mod qr;

pub use eigen::{Evd, EvdState};
