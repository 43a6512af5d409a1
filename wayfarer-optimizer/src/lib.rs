//! Solver selection for Wayfarer trips.
//!
//! [`TripOptimizer`] decides, per request, which tier orders the places:
//!
//! - a single place needs no solver;
//! - small trips are solved exactly by Held–Karp within the time budget;
//! - larger trips, and exact runs that exceed their budget, fall back to an
//!   [`ApproximateSolver`](wayfarer_core::ApproximateSolver).
//!
//! A valid request always yields a tour. The only caller-visible failures
//! are invalid input and an approximate solver that cannot produce a tour.
//!
//! [`solve`] runs the default optimiser: haversine distances, the exact
//! solver and the local search heuristic.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod optimizer;
mod plan;

pub use optimizer::{TripOptimizer, solve};
pub use plan::{Plan, plan};

#[cfg(feature = "solver-vrp")]
#[cfg_attr(docsrs, doc(cfg(feature = "solver-vrp")))]
pub use wayfarer_solver_vrp::{VrpTourSolver, VrpTourSolverConfig};
