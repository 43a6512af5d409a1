//! Matrix provider trait and the great-circle implementation.

use geo::Coord;

use super::CostMatrix;
use super::error::MatrixError;
use crate::Place;

/// Mean earth radius in metres used by [`HaversineMatrixProvider`].
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Derive a cost matrix for a set of places.
///
/// Implementers must return a square `n×n` matrix where `n == places.len()`.
/// `matrix.cost(i, j)` is the cost of travelling from `places[i]` to
/// `places[j]`.
///
/// # Examples
///
/// ```rust
/// use wayfarer_core::{CostMatrix, MatrixError, MatrixProvider, Place};
///
/// struct UnitProvider;
///
/// impl MatrixProvider for UnitProvider {
///     fn cost_matrix(&self, places: &[Place]) -> Result<CostMatrix, MatrixError> {
///         if places.is_empty() {
///             return Err(MatrixError::Empty);
///         }
///         Ok(CostMatrix::from_fn(places.len(), |_, _| 1.0)?)
///     }
/// }
///
/// let matrix = UnitProvider.cost_matrix(&[Place::without_location(1)])?;
/// assert_eq!(matrix.size(), 1);
/// # Ok::<(), MatrixError>(())
/// ```
pub trait MatrixProvider: Send + Sync {
    /// Return the cost matrix for `places`.
    ///
    /// Implementations must return `Err(MatrixError::Empty)` when `places`
    /// is empty.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError`] when the places cannot be costed.
    fn cost_matrix(&self, places: &[Place]) -> Result<CostMatrix, MatrixError>;
}

/// Rounding applied to each derived distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rounding {
    /// Keep full floating-point precision.
    #[default]
    Exact,
    /// Truncate to whole metres, matching integer-metre routing services.
    WholeMetres,
}

/// Great-circle distances in metres between place coordinates.
///
/// # Examples
/// ```
/// use wayfarer_core::{HaversineMatrixProvider, MatrixProvider, Place};
///
/// # fn main() -> Result<(), wayfarer_core::MatrixError> {
/// let places = [
///     Place::from_lat_lon(1, 0.0, 0.0),
///     Place::from_lat_lon(2, 0.0, 1.0),
/// ];
/// let matrix = HaversineMatrixProvider::default().cost_matrix(&places)?;
/// let metres = matrix.cost(0, 1);
/// assert!((metres - 111_195.0).abs() < 1.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HaversineMatrixProvider {
    rounding: Rounding,
}

impl HaversineMatrixProvider {
    /// Construct a provider applying `rounding` to every entry.
    #[must_use]
    pub const fn new(rounding: Rounding) -> Self {
        Self { rounding }
    }

    /// Rounding applied by this provider.
    #[must_use]
    pub const fn rounding(&self) -> Rounding {
        self.rounding
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "the haversine formula is floating-point trigonometry"
    )]
    fn distance_m(&self, from: Coord<f64>, to: Coord<f64>) -> f64 {
        let lat_from = from.y.to_radians();
        let lat_to = to.y.to_radians();
        let half_dlat = ((to.y - from.y).to_radians() / 2.0).sin();
        let half_dlon = ((to.x - from.x).to_radians() / 2.0).sin();
        let h = half_dlat * half_dlat + lat_from.cos() * lat_to.cos() * half_dlon * half_dlon;
        let metres = 2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin();
        match self.rounding {
            Rounding::Exact => metres,
            Rounding::WholeMetres => metres.trunc(),
        }
    }
}

impl MatrixProvider for HaversineMatrixProvider {
    fn cost_matrix(&self, places: &[Place]) -> Result<CostMatrix, MatrixError> {
        if places.is_empty() {
            return Err(MatrixError::Empty);
        }
        let coords = places
            .iter()
            .enumerate()
            .map(|(index, place)| {
                place.location.ok_or(MatrixError::MissingCoordinates {
                    index,
                    id: place.id,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let matrix = CostMatrix::from_fn(coords.len(), |from, to| {
            match (coords.get(from), coords.get(to)) {
                (Some(&origin), Some(&destination)) => self.distance_m(origin, destination),
                _ => CostMatrix::UNREACHABLE,
            }
        })?;
        log::debug!("derived haversine cost matrix for {} places", places.len());
        Ok(matrix)
    }
}
