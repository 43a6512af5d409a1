//! Core domain types for the Wayfarer trip optimisation engine.
//!
//! This crate defines the data model shared by every solver: places, cost
//! matrices, tours and solutions. It also hosts the [`MatrixProvider`] and
//! [`ApproximateSolver`] seams so that solver crates can be swapped without
//! touching the orchestrator. Constructors return `Result` to surface invalid
//! input before any computation begins.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod matrix;
pub mod place;
pub mod solution;
pub mod solver;
pub mod tour;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{SolveConfig, SolveConfigError};
pub use error::SolveError;
pub use matrix::{
    CostMatrix, HaversineMatrixProvider, InvalidMatrixError, MatrixError, MatrixProvider, Rounding,
};
pub use place::{Place, PlaceId};
pub use solution::{Solution, Strategy};
pub use solver::{ApproximateError, ApproximateProblem, ApproximateSolver};
pub use tour::{Tour, TourError, TourMode, TourModeParseError};
