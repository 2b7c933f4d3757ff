use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Orientation used whenever a matrix is read or written one vector at a time.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    Row,
    Col,
}

impl Axis {
    /// The other orientation.
    pub fn flip(self) -> Axis {
        match self {
            Axis::Row => Axis::Col,
            Axis::Col => Axis::Row,
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "row" | "rows" => Ok(Axis::Row),
            "col" | "cols" | "column" | "columns" => Ok(Axis::Col),
            _ => Err(format!("Unknown axis: {}. Expected 'row' or 'col'", s)),
        }
    }
}

/// Numeric knobs for the decompositions and the diagnostic renderer.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Off-diagonal Frobenius norm at which the Jacobi solver stops.
    pub eigen_tolerance: f64,
    /// Upper bound on full Jacobi sweeps before reporting non-convergence.
    pub max_sweeps: usize,
    /// Smallest pivot magnitude Gauss-Jordan inversion accepts.
    pub singular_threshold: f64,
    /// Digits after the decimal point when a matrix is rendered.
    pub display_precision: usize,
}

impl SolverConfig {
    pub fn new(eigen_tolerance: f64, max_sweeps: usize) -> Self {
        Self {
            eigen_tolerance,
            max_sweeps,
            ..Self::default()
        }
    }

    pub fn with_singular_threshold(mut self, threshold: f64) -> Self {
        self.singular_threshold = threshold;
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            eigen_tolerance: 1e-10,
            max_sweeps: 100,
            singular_threshold: 1e-11,
            display_precision: 4,
        }
    }
}
