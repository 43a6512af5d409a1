//! Places a traveller wants to visit.

use geo::Coord;

/// Opaque identifier assigned to a place by the caller.
pub type PlaceId = u64;

/// A location included in a trip.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. A place may
/// omit its coordinate when the caller supplies a precomputed cost matrix.
///
/// # Examples
/// ```
/// use wayfarer_core::Place;
///
/// let place = Place::from_lat_lon(7, 16.05, 108.2);
/// assert_eq!(place.id, 7);
/// assert_eq!(place.latitude(), Some(16.05));
/// assert_eq!(place.longitude(), Some(108.2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Place {
    /// Caller-assigned identifier.
    pub id: PlaceId,
    /// Geospatial position, if known.
    pub location: Option<Coord<f64>>,
}

impl Place {
    /// Construct a place at `location`.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use wayfarer_core::Place;
    ///
    /// let place = Place::new(1, Coord { x: 108.2, y: 16.05 });
    /// assert!(place.location.is_some());
    /// ```
    #[must_use]
    pub const fn new(id: PlaceId, location: Coord<f64>) -> Self {
        Self {
            id,
            location: Some(location),
        }
    }

    /// Construct a place from latitude and longitude in degrees.
    #[must_use]
    pub const fn from_lat_lon(id: PlaceId, latitude: f64, longitude: f64) -> Self {
        Self::new(
            id,
            Coord {
                x: longitude,
                y: latitude,
            },
        )
    }

    /// Construct a place with no coordinate.
    ///
    /// Such places can only be optimised against a caller-supplied matrix.
    ///
    /// # Examples
    /// ```
    /// use wayfarer_core::Place;
    ///
    /// let place = Place::without_location(3);
    /// assert!(place.location.is_none());
    /// ```
    #[must_use]
    pub const fn without_location(id: PlaceId) -> Self {
        Self { id, location: None }
    }

    /// Latitude in degrees, if the place has a coordinate.
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.location.map(|coord| coord.y)
    }

    /// Longitude in degrees, if the place has a coordinate.
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.location.map(|coord| coord.x)
    }
}
