//! `vrp-core` backed approximate solver for Wayfarer.
//!
//! This crate provides [`VrpTourSolver`], an alternative
//! [`ApproximateSolver`](wayfarer_core::ApproximateSolver). It models the trip
//! as a single-vehicle routing problem with one job per place other than the
//! start, asks the `vrp-core` metaheuristics to minimise distance, and reads
//! the visiting order back from the best solution found.
//!
//! Library failures and solutions that leave a place unvisited are reported
//! as [`ApproximateError::Unavailable`](wayfarer_core::ApproximateError).

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod solver;
mod vrp;

pub use solver::{VrpTourSolver, VrpTourSolverConfig};
