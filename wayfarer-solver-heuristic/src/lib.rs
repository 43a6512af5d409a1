//! Heuristic trip ordering for Wayfarer.
//!
//! [`LocalSearchSolver`] is the default
//! [`ApproximateSolver`](wayfarer_core::ApproximateSolver). It builds a
//! nearest-neighbour tour from place `0`, improves it with 2-opt segment
//! reversals, and then spends any remaining budget on seeded randomised
//! restarts. Every move is evaluated against the full cost matrix, so
//! asymmetric costs are handled exactly.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod construct;
mod cost;
mod solver;
mod two_opt;

pub use solver::{LocalSearchConfig, LocalSearchSolver};
