//! Exact trip ordering for Wayfarer.
//!
//! [`HeldKarpSolver`] finds the cheapest visiting order that starts at place
//! `0` using Held–Karp dynamic programming over subsets. The table grows as
//! `N·2ᴺ`, so the solver refuses inputs above [`MAX_EXACT_PLACES`] and polls a
//! wall-clock deadline while it fills the table. A run that exceeds its
//! deadline returns [`ExactError::TimedOut`] and no partial tour; callers are
//! expected to fall back to a heuristic.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod solver;
mod table;

pub use solver::{ExactError, ExactTour, HeldKarpSolver, MAX_EXACT_PLACES};
