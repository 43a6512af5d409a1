//! Facade crate for the Wayfarer trip optimisation engine.
//!
//! This crate re-exports the core domain types, the solver tiers and the
//! optimiser that chooses between them. The vehicle routing backend sits
//! behind the `solver-vrp` feature flag.

#![forbid(unsafe_code)]

pub use wayfarer_core::{
    ApproximateError, ApproximateProblem, ApproximateSolver, CostMatrix, HaversineMatrixProvider,
    InvalidMatrixError, MatrixError, MatrixProvider, Place, PlaceId, Rounding, Solution,
    SolveConfig, SolveConfigError, SolveError, Strategy, Tour, TourError, TourMode,
};

pub use wayfarer_optimizer::{Plan, TripOptimizer, plan, solve};
pub use wayfarer_solver_dp::{ExactError, HeldKarpSolver, MAX_EXACT_PLACES};
pub use wayfarer_solver_heuristic::{LocalSearchConfig, LocalSearchSolver};

#[cfg(feature = "solver-vrp")]
pub use wayfarer_solver_vrp::{VrpTourSolver, VrpTourSolverConfig};
