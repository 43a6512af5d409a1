use thiserror::Error;

use crate::PlaceId;

/// A caller-supplied cost matrix violates an invariant.
///
/// Raised by [`CostMatrix::from_rows`](super::CostMatrix::from_rows) and
/// [`CostMatrix::from_flat`](super::CostMatrix::from_flat). Validation runs
/// before any solver work, so these failures are never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidMatrixError {
    /// The matrix has no rows.
    #[error("cost matrix must contain at least one row")]
    Empty,
    /// A row length differs from the number of rows.
    #[error("cost matrix row {row} has {found} entries, expected {expected}")]
    NotSquare {
        /// Offending row index.
        row: usize,
        /// Number of rows, which every row length must match.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// Flat storage does not hold `size * size` entries.
    #[error("flat cost matrix of size {size} needs {expected} entries, found {found}")]
    FlatLength {
        /// Declared matrix dimension.
        size: usize,
        /// Required number of entries.
        expected: usize,
        /// Supplied number of entries.
        found: usize,
    },
    /// A diagonal entry is not zero.
    #[error("cost from place {index} to itself must be zero, found {value}")]
    NonZeroDiagonal {
        /// Place index of the diagonal entry.
        index: usize,
        /// Supplied value.
        value: f64,
    },
    /// An off-diagonal entry is negative.
    #[error("cost from place {from} to place {to} is negative ({value})")]
    Negative {
        /// Origin index.
        from: usize,
        /// Destination index.
        to: usize,
        /// Supplied value.
        value: f64,
    },
    /// An entry is NaN.
    #[error("cost from place {from} to place {to} is not a number")]
    NotANumber {
        /// Origin index.
        from: usize,
        /// Destination index.
        to: usize,
    },
    /// The matrix dimension differs from the number of places.
    #[error("cost matrix covers {size} places but {places} were supplied")]
    PlaceCountMismatch {
        /// Number of places in the request.
        places: usize,
        /// Matrix dimension.
        size: usize,
    },
}

/// Errors from [`MatrixProvider::cost_matrix`](super::MatrixProvider::cost_matrix).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// No places were provided.
    ///
    /// Providers require at least one place. Callers should reject empty
    /// trips before asking for a matrix.
    #[error("at least one place is required")]
    Empty,
    /// A place has no coordinate, so no distance can be derived.
    #[error("place {id} at index {index} has no coordinate")]
    MissingCoordinates {
        /// Position of the place in the request.
        index: usize,
        /// Identifier of the place.
        id: PlaceId,
    },
    /// The derived matrix failed validation.
    #[error(transparent)]
    Invalid(#[from] InvalidMatrixError),
}
