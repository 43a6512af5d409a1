//! Tuning knobs for a single optimisation request.

use std::time::Duration;

use thiserror::Error;

use crate::TourMode;

/// Parameters controlling how a trip is optimised.
///
/// # Examples
/// ```rust
/// use std::time::Duration;
/// use wayfarer_core::{SolveConfig, TourMode};
///
/// let config = SolveConfig::default()
///     .with_time_budget(Duration::from_millis(500))
///     .with_tour_mode(TourMode::Cycle)
///     .with_random_seed(Some(7));
/// assert_eq!(config.exact_size_threshold, 13);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolveConfig {
    /// Wall-clock budget for the exact solver.
    pub time_budget: Duration,
    /// Largest trip solved exactly; larger trips go straight to the
    /// approximate solver.
    pub exact_size_threshold: usize,
    /// Whether the tour returns to the start.
    pub tour_mode: TourMode,
    /// Seed for the randomised restarts of the approximate solver.
    pub random_seed: Option<u64>,
    /// Wall-clock budget for the approximate solver's improvement phase.
    pub improvement_budget: Duration,
}

impl SolveConfig {
    /// Default exact-solver budget.
    pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(3);
    /// Default size threshold for exact solving.
    pub const DEFAULT_EXACT_SIZE_THRESHOLD: usize = 13;
    /// Default approximate improvement budget.
    pub const DEFAULT_IMPROVEMENT_BUDGET: Duration = Duration::from_secs(1);

    /// Replace the exact-solver budget.
    #[must_use]
    pub const fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    /// Replace the exact size threshold.
    #[must_use]
    pub const fn with_exact_size_threshold(mut self, threshold: usize) -> Self {
        self.exact_size_threshold = threshold;
        self
    }

    /// Replace the tour mode.
    #[must_use]
    pub const fn with_tour_mode(mut self, tour_mode: TourMode) -> Self {
        self.tour_mode = tour_mode;
        self
    }

    /// Replace the random seed.
    #[must_use]
    pub const fn with_random_seed(mut self, random_seed: Option<u64>) -> Self {
        self.random_seed = random_seed;
        self
    }

    /// Replace the approximate improvement budget.
    #[must_use]
    pub const fn with_improvement_budget(mut self, improvement_budget: Duration) -> Self {
        self.improvement_budget = improvement_budget;
        self
    }

    /// Check the configuration before any work starts.
    ///
    /// A zero `exact_size_threshold` is accepted and sends every trip of two
    /// or more places to the approximate solver.
    ///
    /// # Errors
    ///
    /// Returns [`SolveConfigError::ZeroTimeBudget`] when `time_budget` is
    /// zero.
    pub const fn validate(&self) -> Result<(), SolveConfigError> {
        if self.time_budget.is_zero() {
            return Err(SolveConfigError::ZeroTimeBudget);
        }
        Ok(())
    }
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            time_budget: Self::DEFAULT_TIME_BUDGET,
            exact_size_threshold: Self::DEFAULT_EXACT_SIZE_THRESHOLD,
            tour_mode: TourMode::Path,
            random_seed: None,
            improvement_budget: Self::DEFAULT_IMPROVEMENT_BUDGET,
        }
    }
}

/// Errors returned by [`SolveConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveConfigError {
    /// The exact solver was given no time at all.
    #[error("time budget must be greater than zero")]
    ZeroTimeBudget,
}
