//! `HeldKarpSolver` implementation.

use std::time::{Duration, Instant};

use thiserror::Error;
use wayfarer_core::{CostMatrix, Tour, TourError, TourMode};

use crate::table::{DpTable, FROM_START, bits, masks_with_popcount};

/// Largest trip the exact solver accepts.
///
/// The state table holds `2^(N-1)·(N-1)` entries; at this size that is
/// roughly 20 MB, which keeps a single call well inside commodity memory.
pub const MAX_EXACT_PLACES: usize = 18;

/// Number of subsets processed between deadline checks inside a layer.
const DEADLINE_CHECK_INTERVAL: usize = 4096;

/// Errors returned by [`HeldKarpSolver`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExactError {
    /// The deadline passed before the table was complete.
    #[error("exact solver exceeded its budget after {elapsed:?}")]
    TimedOut {
        /// Time spent before giving up.
        elapsed: Duration,
    },
    /// The trip is larger than [`MAX_EXACT_PLACES`].
    #[error("exact solver supports at most {max} places, got {size}")]
    TooManyPlaces {
        /// Number of places requested.
        size: usize,
        /// Supported maximum.
        max: usize,
    },
    /// Reconstruction produced an order that is not a tour.
    #[error("exact solver reconstructed an invalid tour: {0}")]
    InvalidTour(#[from] TourError),
}

/// An optimal tour and its cost.
#[derive(Debug, Clone, PartialEq)]
pub struct ExactTour {
    /// Optimal visiting order starting at place `0`.
    pub tour: Tour,
    /// Total cost of `tour` under the requested mode.
    pub cost: f64,
}

/// Exact solver based on Held–Karp dynamic programming.
///
/// Ties between equally cheap tours are broken deterministically: candidate
/// predecessors and final places are scanned in ascending index order and a
/// candidate only replaces the incumbent when it is strictly cheaper.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use wayfarer_core::{CostMatrix, TourMode};
/// use wayfarer_solver_dp::HeldKarpSolver;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0.0, 1.0, 4.0],
///     vec![5.0, 0.0, 1.0],
///     vec![1.0, 6.0, 0.0],
/// ])?;
/// let exact = HeldKarpSolver::new().solve(&matrix, TourMode::Path, Duration::from_secs(1))?;
/// assert_eq!(exact.tour.order(), &[0, 1, 2]);
/// assert_eq!(exact.cost, 2.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct HeldKarpSolver;

impl HeldKarpSolver {
    /// Construct the solver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Solve within `budget`, measured from now.
    ///
    /// # Errors
    ///
    /// Returns [`ExactError::TooManyPlaces`] before allocating when the
    /// matrix exceeds [`MAX_EXACT_PLACES`], and [`ExactError::TimedOut`]
    /// when the budget runs out.
    pub fn solve(
        &self,
        matrix: &CostMatrix,
        mode: TourMode,
        budget: Duration,
    ) -> Result<ExactTour, ExactError> {
        let started_at = Instant::now();
        let deadline = started_at.checked_add(budget);
        self.solve_until(matrix, mode, started_at, deadline)
    }

    /// Solve until `deadline`; `None` means unbounded.
    ///
    /// `started_at` is only used to report elapsed time on timeout.
    ///
    /// # Errors
    ///
    /// See [`HeldKarpSolver::solve`].
    pub fn solve_until(
        &self,
        matrix: &CostMatrix,
        mode: TourMode,
        started_at: Instant,
        deadline: Option<Instant>,
    ) -> Result<ExactTour, ExactError> {
        let size = matrix.size();
        if size > MAX_EXACT_PLACES {
            return Err(ExactError::TooManyPlaces {
                size,
                max: MAX_EXACT_PLACES,
            });
        }
        if size <= 1 {
            return Ok(ExactTour {
                tour: Tour::trivial(),
                cost: 0.0,
            });
        }

        let clock = Deadline {
            started_at,
            deadline,
        };
        let width = size.saturating_sub(1);
        let mut table = DpTable::new(width);
        for bit in 0..width {
            table.set(1 << bit, bit, matrix.cost(0, place(bit)), FROM_START);
        }
        for layer in 2..=width {
            clock.check()?;
            fill_layer(&mut table, matrix, width, layer, &clock)?;
        }
        clock.check()?;

        let (last, cost) = best_final(&table, matrix, width, mode);
        let order = reconstruct(&table, last);
        let tour = Tour::new(order, size)?;
        log::debug!(
            "held-karp solved {size} places in {:?} with cost {cost}",
            started_at.elapsed()
        );
        Ok(ExactTour { tour, cost })
    }
}

struct Deadline {
    started_at: Instant,
    deadline: Option<Instant>,
}

impl Deadline {
    fn check(&self) -> Result<(), ExactError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                let elapsed = self.started_at.elapsed();
                log::debug!("held-karp gave up after {elapsed:?}");
                Err(ExactError::TimedOut { elapsed })
            }
            _ => Ok(()),
        }
    }
}

/// Place index represented by mask bit `bit`.
const fn place(bit: usize) -> usize {
    bit.saturating_add(1)
}

/// Fill every state whose subset has `layer` places.
///
/// Layers must be filled in increasing order: each state reads only states
/// one place smaller.
#[expect(
    clippy::float_arithmetic,
    reason = "path costs are floating-point sums"
)]
fn fill_layer(
    table: &mut DpTable,
    matrix: &CostMatrix,
    width: usize,
    layer: usize,
    clock: &Deadline,
) -> Result<(), ExactError> {
    for (visited, mask) in masks_with_popcount(width, layer).enumerate() {
        if visited > 0 && visited.is_multiple_of(DEADLINE_CHECK_INTERVAL) {
            clock.check()?;
        }
        for last in bits(mask) {
            let previous = mask ^ (1 << last);
            let mut best: Option<(f64, usize)> = None;
            for via in bits(previous) {
                let candidate = table.cost(previous, via) + matrix.cost(place(via), place(last));
                if best.is_none_or(|(best_cost, _)| candidate < best_cost) {
                    best = Some((candidate, via));
                }
            }
            if let Some((cost, via)) = best {
                table.set(mask, last, cost, pred_bit(via));
            }
        }
    }
    Ok(())
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "bits are below MAX_EXACT_PLACES, far under u8::MAX"
)]
const fn pred_bit(bit: usize) -> u8 {
    bit as u8
}

/// Cheapest complete state, scanning final places in ascending order.
#[expect(
    clippy::float_arithmetic,
    reason = "the return leg is added to the path cost"
)]
fn best_final(table: &DpTable, matrix: &CostMatrix, width: usize, mode: TourMode) -> (usize, f64) {
    let full = table.full_mask();
    let mut best: Option<(usize, f64)> = None;
    for last in 0..width {
        let closing = match mode {
            TourMode::Path => 0.0,
            TourMode::Cycle => matrix.cost(place(last), 0),
        };
        let total = table.cost(full, last) + closing;
        if best.is_none_or(|(_, best_cost)| total < best_cost) {
            best = Some((last, total));
        }
    }
    best.unwrap_or((0, f64::INFINITY))
}

/// Walk predecessors back from `last` and return the visiting order.
fn reconstruct(table: &DpTable, last: usize) -> Vec<usize> {
    let mut mask = table.full_mask();
    let mut current = last;
    let mut reversed = Vec::with_capacity(mask.count_ones() as usize + 1);
    while mask != 0 {
        reversed.push(place(current));
        let Some(pred) = table.pred(mask, current) else {
            break;
        };
        mask ^= 1 << current;
        if pred == FROM_START {
            break;
        }
        current = usize::from(pred);
    }
    reversed.push(0);
    reversed.reverse();
    reversed
}

#[cfg(test)]
mod tests;
