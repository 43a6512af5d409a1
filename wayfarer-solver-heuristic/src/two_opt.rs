//! 2-opt improvement by segment reversal.
//!
//! Reversing `order[i..=j]` replaces the legs entering and leaving the
//! segment and flips the direction of every leg inside it. Inside legs are
//! re-costed in the reverse direction, so the move is exact for asymmetric
//! matrices. Position `0` never moves. Moves are ranked by [`LegCost`], so a
//! reversal that removes an unreachable leg is taken even while others
//! remain.

use std::time::Instant;

use wayfarer_core::{CostMatrix, TourMode};

use crate::cost::LegCost;

/// Outcome of [`improve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Improvement {
    /// Full scans performed.
    pub(crate) passes: usize,
    /// Reversals applied.
    pub(crate) moves: usize,
    /// Whether the deadline cut the search short.
    pub(crate) interrupted: bool,
}

/// Apply first-improvement 2-opt moves until no move helps, `max_passes`
/// scans have run, or `deadline` passes.
pub(crate) fn improve(
    order: &mut [usize],
    matrix: &CostMatrix,
    mode: TourMode,
    deadline: Option<Instant>,
    max_passes: usize,
) -> Improvement {
    let mut outcome = Improvement::default();
    if order.len() < 3 {
        return outcome;
    }
    while outcome.passes < max_passes {
        outcome.passes = outcome.passes.saturating_add(1);
        let mut improved = false;
        for start in 1..order.len().saturating_sub(1) {
            if deadline.is_some_and(|limit| Instant::now() >= limit) {
                outcome.interrupted = true;
                return outcome;
            }
            if let Some(end) = first_improving_end(order, matrix, mode, start) {
                if let Some(segment) = order.get_mut(start..=end) {
                    segment.reverse();
                }
                outcome.moves = outcome.moves.saturating_add(1);
                improved = true;
            }
        }
        if !improved {
            break;
        }
    }
    outcome
}

/// Find the first `end` such that reversing `order[start..=end]` lowers the
/// tour cost.
fn first_improving_end(
    order: &[usize],
    matrix: &CostMatrix,
    mode: TourMode,
    start: usize,
) -> Option<usize> {
    let before = *order.get(start.checked_sub(1)?)?;
    let first = *order.get(start)?;
    let mut forward = LegCost::default();
    let mut backward = LegCost::default();
    let mut previous = first;
    for end in start.saturating_add(1)..order.len() {
        let last = *order.get(end)?;
        forward += LegCost::between(matrix, previous, last);
        backward += LegCost::between(matrix, last, previous);
        previous = last;

        let after = successor(order, end, mode);
        let old_cost = LegCost::between(matrix, before, first)
            + forward
            + after.map_or_else(LegCost::default, |next| LegCost::between(matrix, last, next));
        let new_cost = LegCost::between(matrix, before, last)
            + backward
            + after.map_or_else(LegCost::default, |next| LegCost::between(matrix, first, next));
        if new_cost.saves_over(old_cost) {
            return Some(end);
        }
    }
    None
}

/// Place visited after position `index`, wrapping to the start in cycle mode.
fn successor(order: &[usize], index: usize, mode: TourMode) -> Option<usize> {
    match order.get(index.saturating_add(1)) {
        Some(&next) => Some(next),
        None => match mode {
            TourMode::Path => None,
            TourMode::Cycle => order.first().copied(),
        },
    }
}
