use std::error::Error;
use std::fmt;

/// Result alias used by every fallible call in the crate.
pub type Result<T> = std::result::Result<T, LinalgError>;

/// Errors raised by matrix/vector construction, arithmetic and decompositions.
///
/// Every variant carries enough context (operation, offending shape or
/// index) to diagnose the failure without a debugger.
#[derive(Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Operand shapes are incompatible for the requested operation.
    DimensionMismatch {
        operation: &'static str,
        expected: String,
        actual: String,
    },
    /// A row, column or element index is outside `[0, bound)`.
    IndexOutOfRange { index: usize, bound: usize },
    /// A factorization or inversion met a pivot it cannot divide by.
    SingularMatrix { operation: &'static str, pivot: f64 },
    /// The call is not valid for this instance (read-only view, non-square input, ...).
    InvalidOperation(String),
    /// The Jacobi eigen-solver ran out of sweeps.
    NotConverged { sweeps: usize, off_norm: f64 },
    /// Bracket-syntax text could not be parsed.
    Parse { input: String, reason: String },
    /// A persisted matrix/vector could not be encoded or decoded.
    Serialization(String),
}

impl LinalgError {
    pub(crate) fn shape_mismatch(
        operation: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        LinalgError::DimensionMismatch {
            operation,
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }

    pub(crate) fn length_mismatch(operation: &'static str, expected: usize, actual: usize) -> Self {
        LinalgError::DimensionMismatch {
            operation,
            expected: format!("length {}", expected),
            actual: format!("length {}", actual),
        }
    }

    pub(crate) fn read_only(operation: &str) -> Self {
        LinalgError::InvalidOperation(format!(
            "cannot {} through a read-only transpose view",
            operation
        ))
    }

    pub(crate) fn not_square(operation: &str, shape: (usize, usize)) -> Self {
        LinalgError::InvalidOperation(format!(
            "{} requires a square matrix, got {}x{}",
            operation, shape.0, shape.1
        ))
    }
}

impl fmt::Display for LinalgError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LinalgError::DimensionMismatch {
                operation,
                expected,
                actual,
            } => write!(
                f,
                "dimension mismatch in {}: expected {}, got {}",
                operation, expected, actual
            ),
            LinalgError::IndexOutOfRange { index, bound } => {
                write!(f, "index {} out of range for dimension of size {}", index, bound)
            }
            LinalgError::SingularMatrix { operation, pivot } => write!(
                f,
                "singular matrix in {}: pivot {:e} cannot be eliminated",
                operation, pivot
            ),
            LinalgError::InvalidOperation(msg) => write!(f, "invalid operation: {}", msg),
            LinalgError::NotConverged { sweeps, off_norm } => write!(
                f,
                "eigen-decomposition did not converge after {} sweeps (off-diagonal norm {:e})",
                sweeps, off_norm
            ),
            LinalgError::Parse { input, reason } => {
                write!(f, "failed to parse '{}': {}", input, reason)
            }
            LinalgError::Serialization(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl Error for LinalgError {}

impl From<serde_json::Error> for LinalgError {
    fn from(err: serde_json::Error) -> Self {
        LinalgError::Serialization(err.to_string())
    }
}
