//! The result of optimising a trip.

use std::fmt;
use std::time::Duration;

use crate::{Place, PlaceId, Tour};

/// Which tier produced a [`Solution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strategy {
    /// A single place; no solver ran.
    Trivial,
    /// Held–Karp dynamic programming finished within its budget.
    Exact,
    /// The heuristic tier produced the tour.
    Approximate,
}

impl Strategy {
    /// Lowercase name used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trivial => "trivial",
            Self::Exact => "exact",
            Self::Approximate => "approximate",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An optimised visiting order together with its cost and provenance.
///
/// `is_exact` is true only when the tour is provably optimal. `timed_out`
/// is true only when the exact solver ran out of budget and the tour came
/// from the fallback.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Solution {
    /// Place indices in visiting order, starting at `0`.
    pub tour: Tour,
    /// Sum of leg costs under the requested tour mode.
    pub total_cost: f64,
    /// Whether the tour is optimal.
    pub is_exact: bool,
    /// Whether the exact solver exceeded its budget.
    pub timed_out: bool,
    /// Wall-clock time spent solving.
    pub elapsed: Duration,
    /// Tier that produced the tour.
    pub strategy: Strategy,
}

impl Solution {
    /// Map the tour back to the identifiers of `places`.
    ///
    /// Indices beyond `places` are skipped, which only happens when `places`
    /// is not the slice the solution was computed for.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use wayfarer_core::{Place, Solution, Strategy, Tour};
    ///
    /// # fn main() -> Result<(), wayfarer_core::TourError> {
    /// let places = [
    ///     Place::without_location(10),
    ///     Place::without_location(20),
    ///     Place::without_location(30),
    /// ];
    /// let solution = Solution {
    ///     tour: Tour::new(vec![0, 2, 1], 3)?,
    ///     total_cost: 5.0,
    ///     is_exact: true,
    ///     timed_out: false,
    ///     elapsed: Duration::ZERO,
    ///     strategy: Strategy::Exact,
    /// };
    /// assert_eq!(solution.place_ids(&places), vec![10, 30, 20]);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn place_ids(&self, places: &[Place]) -> Vec<PlaceId> {
        self.tour
            .order()
            .iter()
            .filter_map(|&index| places.get(index).map(|place| place.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Strategy::Trivial, "trivial")]
    #[case(Strategy::Exact, "exact")]
    #[case(Strategy::Approximate, "approximate")]
    fn strategy_names_are_lowercase(#[case] strategy: Strategy, #[case] expected: &str) {
        assert_eq!(strategy.to_string(), expected);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn serialises_tour_as_plain_indices() {
        let solution = Solution {
            tour: Tour::new(vec![0, 1], 2).expect("valid tour"),
            total_cost: 1.5,
            is_exact: false,
            timed_out: true,
            elapsed: Duration::from_millis(2),
            strategy: Strategy::Approximate,
        };
        let value = serde_json::to_value(&solution).expect("encode solution");
        assert_eq!(value["tour"], serde_json::json!([0, 1]));
        assert_eq!(value["strategy"], "approximate");
        assert_eq!(value["timed_out"], true);
    }
}
