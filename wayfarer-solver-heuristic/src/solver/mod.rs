//! `LocalSearchSolver` implementation.

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wayfarer_core::{
    ApproximateError, ApproximateProblem, ApproximateSolver, CostMatrix, Tour, TourMode,
};

use crate::construct::{nearest_neighbour, randomised_greedy};
use crate::cost::LegCost;
use crate::two_opt::improve;

/// Seed used when a problem does not supply one, so runs stay reproducible.
const DEFAULT_SEED: u64 = 0;

/// Configuration for [`LocalSearchSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSearchConfig {
    /// Upper bound on 2-opt scans per constructed tour.
    pub max_passes: usize,
    /// Randomised constructions tried after the nearest-neighbour tour.
    pub restarts: usize,
    /// Number of cheapest unvisited places each randomised step chooses from.
    pub candidate_pool: usize,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            max_passes: 1_000,
            restarts: 8,
            candidate_pool: 3,
        }
    }
}

/// Nearest-neighbour construction followed by 2-opt, with seeded restarts.
///
/// The nearest-neighbour tour is always built and improved first, so the
/// result is never worse than plain 2-opt from the greedy start. Restarts
/// only run while the problem's budget lasts; the best tour wins and ties
/// keep the earlier one. With the same seed and enough budget to finish,
/// repeated calls return the same tour.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use wayfarer_core::{ApproximateProblem, ApproximateSolver, CostMatrix, TourMode};
/// use wayfarer_solver_heuristic::LocalSearchSolver;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0.0, 1.0, 1.5, 1.0],
///     vec![1.0, 0.0, 1.0, 1.5],
///     vec![1.5, 1.0, 0.0, 1.0],
///     vec![1.0, 1.5, 1.0, 0.0],
/// ])?;
/// let problem = ApproximateProblem {
///     matrix: &matrix,
///     mode: TourMode::Cycle,
///     budget: Duration::from_millis(50),
///     seed: Some(7),
/// };
/// let tour = LocalSearchSolver::default().solve(&problem)?;
/// assert_eq!(matrix.tour_cost(tour.order(), TourMode::Cycle), 4.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalSearchSolver {
    config: LocalSearchConfig,
}

impl LocalSearchSolver {
    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: LocalSearchConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &LocalSearchConfig {
        &self.config
    }

    fn polish(
        &self,
        mut order: Vec<usize>,
        matrix: &CostMatrix,
        mode: TourMode,
        deadline: Option<Instant>,
    ) -> (Vec<usize>, LegCost) {
        improve(&mut order, matrix, mode, deadline, self.config.max_passes);
        let cost = LegCost::of_tour(matrix, &order, mode);
        (order, cost)
    }
}

impl ApproximateSolver for LocalSearchSolver {
    fn name(&self) -> &'static str {
        "local-search"
    }

    fn solve(&self, problem: &ApproximateProblem<'_>) -> Result<Tour, ApproximateError> {
        let started_at = Instant::now();
        let deadline = started_at.checked_add(problem.budget);
        let matrix = problem.matrix;
        let size = matrix.size();
        if size <= 1 {
            return Ok(Tour::trivial());
        }

        let (mut best_order, mut best_cost) =
            self.polish(nearest_neighbour(matrix), matrix, problem.mode, deadline);
        let mut rng = ChaCha8Rng::seed_from_u64(problem.seed.unwrap_or(DEFAULT_SEED));
        let mut restarts_run = 0_usize;
        for _ in 0..self.config.restarts {
            if deadline.is_some_and(|limit| Instant::now() >= limit) {
                break;
            }
            let start = randomised_greedy(matrix, self.config.candidate_pool, &mut rng);
            let (order, cost) = self.polish(start, matrix, problem.mode, deadline);
            restarts_run = restarts_run.saturating_add(1);
            if cost.saves_over(best_cost) {
                best_order = order;
                best_cost = cost;
            }
        }

        log::debug!(
            "local search ordered {size} places with cost {} after {restarts_run} restarts in {:?}",
            best_cost.total(),
            started_at.elapsed()
        );
        Ok(Tour::new(best_order, size)?)
    }
}
