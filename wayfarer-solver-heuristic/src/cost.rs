//! Leg sums that keep unreachable legs countable.

use std::ops::{Add, AddAssign};

use wayfarer_core::{CostMatrix, TourMode};

/// Smallest saving worth applying; guards against cycling on rounding noise.
const MIN_SAVING: f64 = 1e-9;

/// A sum of legs, split into the number of unreachable legs and the total of
/// the finite ones.
///
/// Fewer unreachable legs always rank cheaper, whatever the finite total, so
/// a search can still make progress on a matrix with gaps. Plain `f64` sums
/// would collapse every such tour to infinity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct LegCost {
    unreachable: usize,
    finite: f64,
}

impl LegCost {
    /// Cost of a single leg.
    pub(crate) const fn leg(cost: f64) -> Self {
        if cost.is_finite() {
            Self {
                unreachable: 0,
                finite: cost,
            }
        } else {
            Self {
                unreachable: 1,
                finite: 0.0,
            }
        }
    }

    /// Cost of travelling `from` to `to`.
    pub(crate) fn between(matrix: &CostMatrix, from: usize, to: usize) -> Self {
        Self::leg(matrix.cost(from, to))
    }

    /// Cost of visiting `order`, returning to the start in cycle mode.
    pub(crate) fn of_tour(matrix: &CostMatrix, order: &[usize], mode: TourMode) -> Self {
        let legs = order
            .windows(2)
            .map(|pair| match pair {
                [from, to] => Self::between(matrix, *from, *to),
                _ => Self::default(),
            })
            .fold(Self::default(), Add::add);
        match (mode, order.first(), order.last()) {
            (TourMode::Cycle, Some(&first), Some(&last)) if order.len() > 1 => {
                legs + Self::between(matrix, last, first)
            }
            _ => legs,
        }
    }

    /// Whether `self` is meaningfully cheaper than `incumbent`.
    #[expect(
        clippy::float_arithmetic,
        reason = "savings are compared as floating-point differences"
    )]
    pub(crate) const fn saves_over(self, incumbent: Self) -> bool {
        if self.unreachable != incumbent.unreachable {
            return self.unreachable < incumbent.unreachable;
        }
        incumbent.finite - self.finite > MIN_SAVING
    }

    /// The sum as a plain cost; infinite when any leg is unreachable.
    pub(crate) const fn total(self) -> f64 {
        if self.unreachable > 0 {
            CostMatrix::UNREACHABLE
        } else {
            self.finite
        }
    }
}

impl Add for LegCost {
    type Output = Self;

    #[expect(clippy::float_arithmetic, reason = "finite legs are summed")]
    fn add(self, rhs: Self) -> Self {
        Self {
            unreachable: self.unreachable.saturating_add(rhs.unreachable),
            finite: self.finite + rhs.finite,
        }
    }
}

impl AddAssign for LegCost {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
