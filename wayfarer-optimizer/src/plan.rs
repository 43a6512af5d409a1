//! Tier selection from trip size and configuration.

use wayfarer_core::SolveConfig;
use wayfarer_solver_dp::MAX_EXACT_PLACES;

/// The tier a trip is routed to before any solver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// At most one place; the tour is fixed.
    Trivial,
    /// Small enough to try the exact solver first.
    Exact,
    /// Too large for the exact solver; go straight to the heuristic.
    Approximate,
}

/// Choose the tier for a trip of `size` places.
///
/// The configured threshold is clamped to [`MAX_EXACT_PLACES`], so a large
/// threshold can never send an oversized table to the exact solver.
///
/// # Examples
/// ```
/// use wayfarer_core::SolveConfig;
/// use wayfarer_optimizer::{Plan, plan};
///
/// let config = SolveConfig::default();
/// assert_eq!(plan(1, &config), Plan::Trivial);
/// assert_eq!(plan(13, &config), Plan::Exact);
/// assert_eq!(plan(14, &config), Plan::Approximate);
/// ```
#[must_use]
pub fn plan(size: usize, config: &SolveConfig) -> Plan {
    let threshold = config.exact_size_threshold.min(MAX_EXACT_PLACES);
    if size <= 1 {
        Plan::Trivial
    } else if size <= threshold {
        Plan::Exact
    } else {
        Plan::Approximate
    }
}
