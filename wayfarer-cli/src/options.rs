//! Solver options shared by `solve` and `bench`.

use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use wayfarer_core::{ApproximateSolver, SolveConfig, TourMode};
use wayfarer_optimizer::TripOptimizer;
use wayfarer_solver_heuristic::LocalSearchSolver;

use crate::CliError;

pub(crate) const ARG_TIME_BUDGET_MS: &str = "time-budget-ms";
pub(crate) const ARG_EXACT_THRESHOLD: &str = "exact-threshold";
pub(crate) const ARG_MODE: &str = "mode";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_IMPROVEMENT_BUDGET_MS: &str = "improvement-budget-ms";
pub(crate) const ARG_SOLVER: &str = "solver";

/// Backend used when a trip is too large for the exact solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum SolverKind {
    /// Nearest neighbour with 2-opt and seeded restarts.
    #[default]
    LocalSearch,
    /// The `vrp-core` metaheuristic.
    Vrp,
}

/// Optimiser used by the CLI commands.
pub(crate) type CliOptimizer = TripOptimizer<Box<dyn ApproximateSolver>>;

/// Merged solver options before defaults are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SolverOptions {
    pub(crate) time_budget_ms: Option<u64>,
    pub(crate) exact_threshold: Option<usize>,
    pub(crate) mode: Option<TourMode>,
    pub(crate) seed: Option<u64>,
    pub(crate) improvement_budget_ms: Option<u64>,
    pub(crate) solver: Option<SolverKind>,
}

impl SolverOptions {
    /// Overlay the options on [`SolveConfig::default`] and validate.
    pub(crate) fn solve_config(&self) -> Result<SolveConfig, CliError> {
        let defaults = SolveConfig::default();
        let config = SolveConfig {
            time_budget: self
                .time_budget_ms
                .map_or(defaults.time_budget, Duration::from_millis),
            exact_size_threshold: self
                .exact_threshold
                .unwrap_or(defaults.exact_size_threshold),
            tour_mode: self.mode.unwrap_or(defaults.tour_mode),
            random_seed: self.seed.or(defaults.random_seed),
            improvement_budget: self
                .improvement_budget_ms
                .map_or(defaults.improvement_budget, Duration::from_millis),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build the optimiser for the selected backend.
    pub(crate) fn optimizer(&self) -> Result<CliOptimizer, CliError> {
        let fallback = approximate_solver(self.solver.unwrap_or_default())?;
        Ok(TripOptimizer::new().with_approximate(fallback))
    }
}

fn approximate_solver(kind: SolverKind) -> Result<Box<dyn ApproximateSolver>, CliError> {
    match kind {
        SolverKind::LocalSearch => Ok(Box::new(LocalSearchSolver::default())),
        SolverKind::Vrp => vrp_solver(),
    }
}

#[cfg(feature = "solver-vrp")]
fn vrp_solver() -> Result<Box<dyn ApproximateSolver>, CliError> {
    Ok(Box::new(wayfarer_optimizer::VrpTourSolver::default()))
}

#[cfg(not(feature = "solver-vrp"))]
const fn vrp_solver() -> Result<Box<dyn ApproximateSolver>, CliError> {
    Err(CliError::MissingFeature {
        feature: "solver-vrp",
        action: "--solver vrp",
    })
}
