//! `VrpTourSolver` implementation backed by `vrp-core`.

use std::time::Instant;

use wayfarer_core::{ApproximateError, ApproximateProblem, ApproximateSolver, Tour};

use crate::vrp::solve_order;

const SOLVER_NAME: &str = "vrp";

/// Configuration for [`VrpTourSolver`].
#[derive(Debug, Clone)]
pub struct VrpTourSolverConfig {
    /// Upper bound on `vrp-core` generations.
    pub max_generations: usize,
}

impl Default for VrpTourSolverConfig {
    fn default() -> Self {
        Self {
            max_generations: 200,
        }
    }
}

/// Approximate solver delegating to the `vrp-core` metaheuristics.
///
/// The search stops after `max_generations` or once the problem's budget has
/// passed. `vrp-core` counts time in whole seconds, so the budget is rounded
/// up to at least one second; a run that outlives the exact budget is logged
/// but still returned.
///
/// # Examples
/// ```no_run
/// use std::time::Duration;
/// use wayfarer_core::{ApproximateProblem, ApproximateSolver, CostMatrix, TourMode};
/// use wayfarer_solver_vrp::VrpTourSolver;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matrix = CostMatrix::from_fn(5, |from, to| if from < to { 1.0 } else { 2.0 })?;
/// let problem = ApproximateProblem {
///     matrix: &matrix,
///     mode: TourMode::Path,
///     budget: Duration::from_secs(1),
///     seed: None,
/// };
/// let tour = VrpTourSolver::default().solve(&problem)?;
/// assert_eq!(tour.len(), 5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct VrpTourSolver {
    config: VrpTourSolverConfig,
}

impl VrpTourSolver {
    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpTourSolverConfig) -> Self {
        Self { config }
    }
}

impl ApproximateSolver for VrpTourSolver {
    fn name(&self) -> &'static str {
        SOLVER_NAME
    }

    fn solve(&self, problem: &ApproximateProblem<'_>) -> Result<Tour, ApproximateError> {
        let started_at = Instant::now();
        let size = problem.matrix.size();
        if size <= 1 {
            return Ok(Tour::trivial());
        }

        let order = solve_order(
            problem.matrix,
            problem.mode,
            self.config.max_generations,
            problem.budget,
        )
        .map_err(|err| unavailable(err.to_string()))?;
        if order.len() != size {
            return Err(unavailable(format!(
                "{} of {} places were left unassigned",
                size.saturating_sub(order.len()),
                size.saturating_sub(1)
            )));
        }

        let elapsed = started_at.elapsed();
        if elapsed > problem.budget {
            log::warn!(
                "vrp-core search took {elapsed:?}, beyond its {:?} budget",
                problem.budget
            );
        }
        Tour::new(order, size).map_err(|err| unavailable(err.to_string()))
    }
}

const fn unavailable(reason: String) -> ApproximateError {
    ApproximateError::Unavailable {
        solver: SOLVER_NAME,
        reason,
    }
}
