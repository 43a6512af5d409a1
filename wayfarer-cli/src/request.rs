//! JSON trip requests read by `wayfarer solve`.
//!
//! ```json
//! {
//!   "places": [
//!     { "id": 1, "lat": 16.06, "lon": 108.22 },
//!     { "id": 2, "lat": 16.05, "lon": 108.25 }
//!   ],
//!   "matrix": [[0, 3100], [null, 0]]
//! }
//! ```
//!
//! `matrix` is optional; when present it replaces the haversine distances
//! and `null` entries mark unreachable legs. Coordinates may then be
//! omitted.

use std::io::BufReader;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wayfarer_core::{CostMatrix, InvalidMatrixError, Place, PlaceId};
use wayfarer_fs::open_utf8_file;

use crate::CliError;

/// Problems with a decoded trip request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TripRequestError {
    /// Only one of `lat` and `lon` was given.
    #[error("place {id} has only one of lat and lon")]
    PartialCoordinates {
        /// Offending place.
        id: PlaceId,
    },
    /// The supplied matrix is malformed.
    #[error("invalid matrix: {0}")]
    InvalidMatrix(#[from] InvalidMatrixError),
}

/// A trip as it appears on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TripRequest {
    /// Places in input order; the first is the start.
    pub(crate) places: Vec<PlaceRecord>,
    /// Optional row-major costs; `null` means unreachable.
    #[serde(default)]
    pub(crate) matrix: Option<Vec<Vec<Option<f64>>>>,
}

/// A single place entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlaceRecord {
    pub(crate) id: PlaceId,
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    #[serde(default)]
    pub(crate) lon: Option<f64>,
}

impl PlaceRecord {
    fn to_place(self) -> Result<Place, TripRequestError> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(Place::from_lat_lon(self.id, lat, lon)),
            (None, None) => Ok(Place::without_location(self.id)),
            _ => Err(TripRequestError::PartialCoordinates { id: self.id }),
        }
    }
}

impl TripRequest {
    /// Convert the entries into places.
    pub(crate) fn places(&self) -> Result<Vec<Place>, TripRequestError> {
        self.places.iter().map(|record| record.to_place()).collect()
    }

    /// Build the supplied matrix, if any.
    pub(crate) fn cost_matrix(&self) -> Result<Option<CostMatrix>, TripRequestError> {
        let Some(rows) = &self.matrix else {
            return Ok(None);
        };
        let dense = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cost| cost.unwrap_or(CostMatrix::UNREACHABLE))
                    .collect()
            })
            .collect();
        Ok(Some(CostMatrix::from_rows(dense)?))
    }
}

/// Loads a JSON-encoded [`TripRequest`] from disk.
pub(crate) fn load_trip_request(path: &Utf8Path) -> Result<TripRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenTripRequest {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseTripRequest {
        path: path.to_path_buf(),
        source,
    })
}
