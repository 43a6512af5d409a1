//! Visiting orders over the places of a trip.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Whether a tour ends at its last place or returns to the start.
///
/// Trips are itineraries: by default the traveller does not come back to the
/// first place, so the final leg is not charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TourMode {
    /// Open path starting at index `0` with no return leg.
    #[default]
    Path,
    /// Closed cycle that returns from the last place to index `0`.
    Cycle,
}

impl TourMode {
    /// Lowercase name used in configuration files and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Cycle => "cycle",
        }
    }
}

impl fmt::Display for TourMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`TourMode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tour mode {0:?}; expected \"path\" or \"cycle\"")]
pub struct TourModeParseError(pub String);

impl FromStr for TourMode {
    type Err = TourModeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "path" => Ok(Self::Path),
            "cycle" => Ok(Self::Cycle),
            _ => Err(TourModeParseError(value.to_owned())),
        }
    }
}

/// Reasons a visiting order is not a valid tour.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// The order does not visit every place.
    #[error("tour visits {found} places but the trip has {expected}")]
    WrongLength {
        /// Number of places in the trip.
        expected: usize,
        /// Number of entries in the order.
        found: usize,
    },
    /// An entry does not index a place.
    #[error("tour entry {index} is outside a trip of {size} places")]
    OutOfRange {
        /// Offending place index.
        index: usize,
        /// Number of places in the trip.
        size: usize,
    },
    /// A place is visited more than once.
    #[error("tour visits place {index} more than once")]
    Duplicate {
        /// Place index that repeats.
        index: usize,
    },
    /// The order does not begin at the fixed start index.
    #[error("tour must start at place 0, found {found}")]
    StartNotFirst {
        /// First entry of the order.
        found: usize,
    },
}

/// An ordered permutation of place indices beginning at index `0`.
///
/// # Examples
/// ```
/// use wayfarer_core::Tour;
///
/// # fn main() -> Result<(), wayfarer_core::TourError> {
/// let tour = Tour::new(vec![0, 2, 1], 3)?;
/// assert_eq!(tour.order(), &[0, 2, 1]);
/// assert!(Tour::new(vec![0, 2, 2], 3).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tour {
    order: Vec<usize>,
}

impl Tour {
    /// Validate `order` as a tour over `size` places.
    ///
    /// # Errors
    ///
    /// Returns a [`TourError`] when `order` is not a permutation of
    /// `0..size` or does not start at index `0`.
    pub fn new(order: Vec<usize>, size: usize) -> Result<Self, TourError> {
        if order.len() != size {
            return Err(TourError::WrongLength {
                expected: size,
                found: order.len(),
            });
        }
        if let Some(&first) = order.first()
            && first != 0
        {
            return Err(TourError::StartNotFirst { found: first });
        }
        let mut seen = vec![false; size];
        for &index in &order {
            let slot = seen
                .get_mut(index)
                .ok_or(TourError::OutOfRange { index, size })?;
            if *slot {
                return Err(TourError::Duplicate { index });
            }
            *slot = true;
        }
        Ok(Self { order })
    }

    /// The single-place tour.
    #[must_use]
    pub fn trivial() -> Self {
        Self { order: vec![0] }
    }

    /// Place indices in visiting order.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Number of places visited.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the tour visits no places.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consume the tour and return the underlying order.
    #[must_use]
    pub fn into_order(self) -> Vec<usize> {
        self.order
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.order
    }
}
