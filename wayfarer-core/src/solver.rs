//! Seam for approximate solvers.
//!
//! The orchestrator only knows this trait, so alternative heuristics or
//! external routing libraries can be plugged in without touching it.

use std::time::Duration;

use thiserror::Error;

use crate::{CostMatrix, Tour, TourError, TourMode};

/// Input handed to an [`ApproximateSolver`].
#[derive(Debug, Clone, Copy)]
pub struct ApproximateProblem<'a> {
    /// Validated cost matrix with at least two places.
    pub matrix: &'a CostMatrix,
    /// Whether the tour returns to the start.
    pub mode: TourMode,
    /// Wall-clock budget for improving the initial tour.
    pub budget: Duration,
    /// Seed for randomised components; `None` selects a fixed default.
    pub seed: Option<u64>,
}

/// Errors returned by [`ApproximateSolver::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApproximateError {
    /// The backend failed to produce a tour.
    #[error("solver {solver} unavailable: {reason}")]
    Unavailable {
        /// Name of the failing backend.
        solver: &'static str,
        /// Human-readable cause.
        reason: String,
    },
    /// The backend produced an order that is not a valid tour.
    #[error("solver produced an invalid tour: {0}")]
    InvalidTour(#[from] TourError),
}

/// Produce a good, not necessarily optimal, tour quickly.
///
/// Implementations must return a permutation of `0..matrix.size()` starting
/// at `0` and should respect `budget`. They must be `Send + Sync` so that
/// independent requests can be solved on separate threads.
///
/// # Examples
/// ```rust
/// use std::time::Duration;
/// use wayfarer_core::{
///     ApproximateError, ApproximateProblem, ApproximateSolver, CostMatrix, Tour, TourMode,
/// };
///
/// struct Identity;
///
/// impl ApproximateSolver for Identity {
///     fn name(&self) -> &'static str {
///         "identity"
///     }
///
///     fn solve(&self, problem: &ApproximateProblem<'_>) -> Result<Tour, ApproximateError> {
///         let size = problem.matrix.size();
///         Ok(Tour::new((0..size).collect(), size)?)
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matrix = CostMatrix::from_fn(3, |_, _| 1.0)?;
/// let problem = ApproximateProblem {
///     matrix: &matrix,
///     mode: TourMode::Path,
///     budget: Duration::from_millis(10),
///     seed: None,
/// };
/// assert_eq!(Identity.solve(&problem)?.order(), &[0, 1, 2]);
/// # Ok(())
/// # }
/// ```
pub trait ApproximateSolver: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Produce a tour for `problem`.
    ///
    /// # Errors
    ///
    /// Returns [`ApproximateError`] when no valid tour can be produced.
    fn solve(&self, problem: &ApproximateProblem<'_>) -> Result<Tour, ApproximateError>;
}

impl<S> ApproximateSolver for Box<S>
where
    S: ApproximateSolver + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&self, problem: &ApproximateProblem<'_>) -> Result<Tour, ApproximateError> {
        (**self).solve(problem)
    }
}
