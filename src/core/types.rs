//! Core data types for the wayfinding engine

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rejected coordinate input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Geographic position in decimal degrees (WGS84 lat/lon on a spherical model)
///
/// Deserialization goes through [`Coordinate::new`], so out-of-range input is
/// rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Unchecked wire form of [`Coordinate`]
#[derive(Deserialize)]
struct RawCoordinate {
    #[serde(alias = "lat", alias = "Latitud")]
    latitude: f64,
    #[serde(alias = "lon", alias = "long", alias = "Longitud")]
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// Create a coordinate from values already known to be in range
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Point of interest the user can be guided to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: u32,
    pub name: String,
    pub location: Coordinate,
}

impl Destination {
    pub fn new(id: u32, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id,
            name: name.into(),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(4.660982, -74.059616).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert_eq!(
            Coordinate::new(95.0, 0.0),
            Err(CoordinateError::LatitudeOutOfRange(95.0))
        );
        assert!(matches!(
            Coordinate::new(0.0, -200.0),
            Err(CoordinateError::LongitudeOutOfRange(_))
        ));
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_coordinate_field_aliases() {
        let coord: Coordinate = serde_json::from_str(r#"{"lat": 4.66, "lon": -74.05}"#).unwrap();
        assert_eq!(coord, Coordinate::new_unchecked(4.66, -74.05));
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let result: Result<Coordinate, _> =
            serde_json::from_str(r#"{"latitude": 120.0, "longitude": 0.0}"#);
        let error = result.unwrap_err().to_string();
        assert!(error.contains("latitude 120"), "unexpected error: {}", error);

        assert!(serde_json::from_str::<Coordinate>(r#"{"Latitud": 4.66, "Longitud": -190.0}"#).is_err());
    }
}
