//! `TripOptimizer` implementation.

use std::time::Instant;

use log::{debug, warn};
use wayfarer_core::{
    ApproximateProblem, ApproximateSolver, CostMatrix, HaversineMatrixProvider,
    InvalidMatrixError, MatrixProvider, Place, Solution, SolveConfig, SolveError, Strategy, Tour,
};
use wayfarer_solver_dp::{ExactError, HeldKarpSolver};
use wayfarer_solver_heuristic::LocalSearchSolver;

use crate::plan::{Plan, plan};

/// Orders the places of a trip, choosing the cheapest adequate tier.
///
/// The optimiser owns no per-request state, so one instance can serve
/// concurrent requests from several threads.
///
/// # Examples
/// ```
/// use wayfarer_core::{Place, SolveConfig, Strategy, TourMode};
/// use wayfarer_optimizer::TripOptimizer;
///
/// # fn main() -> Result<(), wayfarer_core::SolveError> {
/// let places = [
///     Place::from_lat_lon(1, 0.0, 0.0),
///     Place::from_lat_lon(2, 0.0, 0.01),
///     Place::from_lat_lon(3, 0.01, 0.01),
///     Place::from_lat_lon(4, 0.01, 0.0),
/// ];
/// let config = SolveConfig::default().with_tour_mode(TourMode::Cycle);
/// let solution = <TripOptimizer>::default().solve(&places, None, &config)?;
/// assert_eq!(solution.strategy, Strategy::Exact);
/// assert!(solution.is_exact);
/// assert_eq!(solution.tour.len(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TripOptimizer<A = LocalSearchSolver, P = HaversineMatrixProvider> {
    exact: HeldKarpSolver,
    approximate: A,
    provider: P,
}

impl TripOptimizer {
    /// Optimiser with haversine distances and the local search fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A, P> TripOptimizer<A, P> {
    /// Optimiser with an explicit fallback solver and matrix provider.
    #[must_use]
    pub const fn with_parts(approximate: A, provider: P) -> Self {
        Self {
            exact: HeldKarpSolver::new(),
            approximate,
            provider,
        }
    }

    /// Replace the fallback solver.
    #[must_use]
    pub fn with_approximate<B>(self, approximate: B) -> TripOptimizer<B, P> {
        TripOptimizer {
            exact: self.exact,
            approximate,
            provider: self.provider,
        }
    }

    /// Replace the matrix provider used when no matrix is supplied.
    #[must_use]
    pub fn with_provider<Q>(self, provider: Q) -> TripOptimizer<A, Q> {
        TripOptimizer {
            exact: self.exact,
            approximate: self.approximate,
            provider,
        }
    }

    /// Fallback solver.
    #[must_use]
    pub const fn approximate(&self) -> &A {
        &self.approximate
    }

    /// Matrix provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }
}

impl<A, P> TripOptimizer<A, P>
where
    A: ApproximateSolver,
    P: MatrixProvider,
{
    /// Order `places`, starting and (in cycle mode) ending at the first.
    ///
    /// A supplied `matrix` is used as-is and must have one row per place;
    /// otherwise the provider derives one from the place coordinates.
    ///
    /// # Errors
    ///
    /// - [`SolveError::InvalidConfig`] when `config` is rejected;
    /// - [`SolveError::EmptyInput`] when `places` is empty;
    /// - [`SolveError::InvalidMatrix`] when the supplied matrix does not
    ///   match `places`, or the provider produced a malformed one;
    /// - [`SolveError::Matrix`] when the provider cannot build a matrix;
    /// - [`SolveError::SolverUnavailable`] when the fallback solver fails.
    pub fn solve(
        &self,
        places: &[Place],
        matrix: Option<CostMatrix>,
        config: &SolveConfig,
    ) -> Result<Solution, SolveError> {
        config.validate()?;
        if places.is_empty() {
            return Err(SolveError::EmptyInput);
        }
        let costs = match matrix {
            Some(supplied) if supplied.size() != places.len() => {
                return Err(InvalidMatrixError::PlaceCountMismatch {
                    places: places.len(),
                    size: supplied.size(),
                }
                .into());
            }
            Some(supplied) => supplied,
            None => self.provider.cost_matrix(places)?,
        };
        self.solve_matrix(&costs, config)
    }

    /// Order the places described by `matrix` alone.
    ///
    /// # Errors
    ///
    /// [`SolveError::InvalidConfig`] and [`SolveError::SolverUnavailable`],
    /// as for [`TripOptimizer::solve`].
    pub fn solve_matrix(
        &self,
        matrix: &CostMatrix,
        config: &SolveConfig,
    ) -> Result<Solution, SolveError> {
        config.validate()?;
        let started_at = Instant::now();
        let size = matrix.size();
        let tier = plan(size, config);
        debug!("routing {size} places to the {tier:?} tier");
        match tier {
            Plan::Trivial => Ok(Solution {
                tour: Tour::trivial(),
                total_cost: 0.0,
                is_exact: true,
                timed_out: false,
                elapsed: started_at.elapsed(),
                strategy: Strategy::Trivial,
            }),
            Plan::Exact => self.exact_or_fallback(matrix, config, started_at),
            Plan::Approximate => self.approximate_tour(matrix, config, started_at, false),
        }
    }

    fn exact_or_fallback(
        &self,
        matrix: &CostMatrix,
        config: &SolveConfig,
        started_at: Instant,
    ) -> Result<Solution, SolveError> {
        let deadline = started_at.checked_add(config.time_budget);
        match self
            .exact
            .solve_until(matrix, config.tour_mode, started_at, deadline)
        {
            Ok(exact) => Ok(Solution {
                tour: exact.tour,
                total_cost: exact.cost,
                is_exact: true,
                timed_out: false,
                elapsed: started_at.elapsed(),
                strategy: Strategy::Exact,
            }),
            Err(ExactError::TimedOut { elapsed }) => {
                warn!(
                    "exact solver exceeded its {:?} budget after {elapsed:?} on {} places; falling back to {}",
                    config.time_budget,
                    matrix.size(),
                    self.approximate.name()
                );
                self.approximate_tour(matrix, config, started_at, true)
            }
            Err(err) => {
                warn!(
                    "exact solver failed: {err}; falling back to {}",
                    self.approximate.name()
                );
                self.approximate_tour(matrix, config, started_at, false)
            }
        }
    }

    fn approximate_tour(
        &self,
        matrix: &CostMatrix,
        config: &SolveConfig,
        started_at: Instant,
        timed_out: bool,
    ) -> Result<Solution, SolveError> {
        let solver = self.approximate.name();
        let problem = ApproximateProblem {
            matrix,
            mode: config.tour_mode,
            budget: config.improvement_budget,
            seed: config.random_seed,
        };
        let unavailable = |reason: String| SolveError::SolverUnavailable { solver, reason };
        let order = self
            .approximate
            .solve(&problem)
            .map_err(|err| unavailable(err.to_string()))?
            .into_order();
        // Fallback solvers are pluggable; re-check the permutation.
        let tour = Tour::new(order, matrix.size()).map_err(|err| unavailable(err.to_string()))?;
        let total_cost = matrix.tour_cost(tour.order(), config.tour_mode);
        Ok(Solution {
            tour,
            total_cost,
            is_exact: false,
            timed_out,
            elapsed: started_at.elapsed(),
            strategy: Strategy::Approximate,
        })
    }
}

/// Solve a trip with the default [`TripOptimizer`].
///
/// # Errors
///
/// See [`TripOptimizer::solve`].
///
/// # Examples
/// ```
/// use wayfarer_core::{CostMatrix, Place, SolveConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let places = [
///     Place::without_location(1),
///     Place::without_location(2),
///     Place::without_location(3),
/// ];
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0.0, 1.0, 4.0],
///     vec![5.0, 0.0, 1.0],
///     vec![1.0, 6.0, 0.0],
/// ])?;
/// let solution = wayfarer_optimizer::solve(&places, Some(matrix), &SolveConfig::default())?;
/// assert_eq!(solution.place_ids(&places), vec![1, 2, 3]);
/// assert_eq!(solution.total_cost, 2.0);
/// # Ok(())
/// # }
/// ```
pub fn solve(
    places: &[Place],
    matrix: Option<CostMatrix>,
    config: &SolveConfig,
) -> Result<Solution, SolveError> {
    TripOptimizer::new().solve(places, matrix, config)
}
