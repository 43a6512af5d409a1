//! Shared test harness modules for the Wayfarer CLI.

use super::*;

mod bench_steps;
mod helpers;
mod solve_steps;
