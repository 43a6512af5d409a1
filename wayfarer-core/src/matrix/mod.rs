//! Pairwise travel costs between the places of a trip.
//!
//! [`CostMatrix`] is the only input the solvers consume. It is either derived
//! from coordinates by a [`MatrixProvider`] or supplied directly by callers
//! holding precomputed road or travel-time costs, in which case it is
//! validated on construction.

mod error;
mod provider;

pub use error::{InvalidMatrixError, MatrixError};
pub use provider::{HaversineMatrixProvider, MatrixProvider, Rounding};

use crate::TourMode;

/// Dense `N×N` travel-cost matrix stored in row-major order.
///
/// Invariants upheld by every constructor:
///
/// - the diagonal is zero;
/// - off-diagonal entries are finite and non-negative, or
///   [`CostMatrix::UNREACHABLE`];
/// - the matrix is square and non-empty.
///
/// The matrix may be asymmetric; `cost(i, j)` and `cost(j, i)` are unrelated.
///
/// # Examples
/// ```
/// use wayfarer_core::{CostMatrix, TourMode};
///
/// # fn main() -> Result<(), wayfarer_core::InvalidMatrixError> {
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0.0, 1.0, 4.0],
///     vec![5.0, 0.0, 1.0],
///     vec![1.0, 6.0, 0.0],
/// ])?;
/// assert_eq!(matrix.size(), 3);
/// assert_eq!(matrix.tour_cost(&[0, 1, 2], TourMode::Path), 2.0);
/// assert_eq!(matrix.tour_cost(&[0, 1, 2], TourMode::Cycle), 3.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    size: usize,
    costs: Vec<f64>,
}

impl CostMatrix {
    /// Sentinel cost for a pair that cannot be travelled.
    ///
    /// It compares greater than any finite tour cost, so solvers avoid such
    /// legs whenever a feasible alternative exists.
    pub const UNREACHABLE: f64 = f64::INFINITY;

    /// Build a matrix from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMatrixError`] when the rows are empty, ragged, or
    /// contain a non-zero diagonal, a negative entry, or NaN.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, InvalidMatrixError> {
        let size = rows.len();
        if size == 0 {
            return Err(InvalidMatrixError::Empty);
        }
        let mut costs = Vec::with_capacity(size.saturating_mul(size));
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(InvalidMatrixError::NotSquare {
                    row: row_index,
                    expected: size,
                    found: row.len(),
                });
            }
            costs.extend(row);
        }
        Self::from_flat(size, costs)
    }

    /// Build a matrix from row-major storage.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMatrixError`] when `costs` does not hold
    /// `size * size` entries or violates a matrix invariant.
    pub fn from_flat(size: usize, costs: Vec<f64>) -> Result<Self, InvalidMatrixError> {
        if size == 0 {
            return Err(InvalidMatrixError::Empty);
        }
        let expected = size.saturating_mul(size);
        if costs.len() != expected {
            return Err(InvalidMatrixError::FlatLength {
                size,
                expected,
                found: costs.len(),
            });
        }
        let matrix = Self { size, costs };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Build a matrix by evaluating `cost` for every ordered pair.
    ///
    /// The diagonal is forced to zero without calling `cost`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMatrixError`] when `size` is zero or `cost` yields a
    /// negative or NaN value.
    pub fn from_fn<F>(size: usize, mut cost: F) -> Result<Self, InvalidMatrixError>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut costs = Vec::with_capacity(size.saturating_mul(size));
        for from in 0..size {
            for to in 0..size {
                costs.push(if from == to { 0.0 } else { cost(from, to) });
            }
        }
        Self::from_flat(size, costs)
    }

    fn validate(&self) -> Result<(), InvalidMatrixError> {
        for (from, row) in self.rows().enumerate() {
            for (to, &value) in row.iter().enumerate() {
                if value.is_nan() {
                    return Err(InvalidMatrixError::NotANumber { from, to });
                }
                if from == to {
                    if value != 0.0 {
                        return Err(InvalidMatrixError::NonZeroDiagonal { index: from, value });
                    }
                } else if value < 0.0 {
                    return Err(InvalidMatrixError::Negative { from, to, value });
                }
            }
        }
        Ok(())
    }

    /// Number of places covered by the matrix.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Cost of travelling from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if the flattened index falls outside the matrix. Debug builds
    /// also reject any index not below [`CostMatrix::size`]. Solvers only
    /// query indices drawn from `0..size`.
    #[must_use]
    #[inline]
    #[expect(
        clippy::indexing_slicing,
        reason = "hot path for the solvers; indices are bounded by the matrix size"
    )]
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        debug_assert!(
            from < self.size && to < self.size,
            "cost matrix index ({from}, {to}) out of range for size {}",
            self.size
        );
        self.costs[from * self.size + to]
    }

    /// Cost of travelling from `from` to `to`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<f64> {
        self.row(from).and_then(|row| row.get(to)).copied()
    }

    /// Costs of leaving `from`, indexed by destination.
    #[must_use]
    pub fn row(&self, from: usize) -> Option<&[f64]> {
        self.rows().nth(from)
    }

    /// Iterate the rows of the matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.costs.chunks_exact(self.size)
    }

    /// Copy the matrix into nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Whether `cost(i, j)` and `cost(j, i)` agree within `tolerance`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "symmetry check compares floating-point costs"
    )]
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..self.size).all(|from| {
            (from.saturating_add(1)..self.size).all(|to| {
                let forward = self.cost(from, to);
                let backward = self.cost(to, from);
                forward == backward || (forward - backward).abs() <= tolerance
            })
        })
    }

    /// Total cost of visiting `order` in sequence.
    ///
    /// In [`TourMode::Cycle`] the leg from the last place back to the first
    /// is included. Orders of fewer than two places cost nothing.
    ///
    /// # Panics
    ///
    /// Panics if `order` contains an index outside the matrix.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "tour costs are floating-point sums"
    )]
    pub fn tour_cost(&self, order: &[usize], mode: TourMode) -> f64 {
        let legs: f64 = order
            .windows(2)
            .map(|pair| match pair {
                [from, to] => self.cost(*from, *to),
                _ => 0.0,
            })
            .sum();
        match (mode, order.first(), order.last()) {
            (TourMode::Cycle, Some(&first), Some(&last)) if order.len() > 1 => {
                legs + self.cost(last, first)
            }
            _ => legs,
        }
    }
}
