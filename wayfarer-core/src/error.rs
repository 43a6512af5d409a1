//! Caller-visible failures of an optimisation request.

use thiserror::Error;

use crate::{InvalidMatrixError, MatrixError, SolveConfigError};

/// Errors returned by the public `solve` operation.
///
/// Exact-solver timeouts never appear here: they are recovered by falling
/// back to the approximate solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The request contained no places.
    #[error("a trip needs at least one place")]
    EmptyInput,
    /// The supplied cost matrix is malformed.
    #[error("invalid cost matrix: {0}")]
    InvalidMatrix(#[source] InvalidMatrixError),
    /// No cost matrix could be derived from the places.
    #[error("cannot derive cost matrix: {0}")]
    Matrix(#[source] MatrixError),
    /// The configuration was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] SolveConfigError),
    /// The approximate solver could not produce a tour.
    #[error("solver {solver} unavailable: {reason}")]
    SolverUnavailable {
        /// Name of the failing solver.
        solver: &'static str,
        /// Human-readable cause.
        reason: String,
    },
}

impl From<InvalidMatrixError> for SolveError {
    fn from(err: InvalidMatrixError) -> Self {
        match err {
            InvalidMatrixError::Empty => Self::EmptyInput,
            other => Self::InvalidMatrix(other),
        }
    }
}

impl From<MatrixError> for SolveError {
    fn from(err: MatrixError) -> Self {
        match err {
            MatrixError::Empty => Self::EmptyInput,
            MatrixError::Invalid(invalid) => Self::from(invalid),
            other @ MatrixError::MissingCoordinates { .. } => Self::Matrix(other),
        }
    }
}
