//! Destination catalog contract and a JSON-backed catalog

use crate::core::{Coordinate, CoordinateError, Destination};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// How a destination is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationQuery<'a> {
    Id(u32),
    /// Case-insensitive, surrounding whitespace ignored
    Name(&'a str),
}

/// Source of points of interest
pub trait DestinationCatalog {
    fn list(&self) -> Vec<Destination>;

    /// Find a single destination by id or name
    fn resolve(&self, query: DestinationQuery<'_>) -> Option<Destination> {
        let destinations = self.list();
        match query {
            DestinationQuery::Id(id) => destinations.into_iter().find(|d| d.id == id),
            DestinationQuery::Name(name) => {
                let name = name.trim();
                destinations
                    .into_iter()
                    .find(|d| d.name.trim().eq_ignore_ascii_case(name))
            }
        }
    }
}

impl DestinationCatalog for Vec<Destination> {
    fn list(&self) -> Vec<Destination> {
        self.clone()
    }
}

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("destination {id} has an invalid location: {source}")]
    InvalidLocation {
        id: u32,
        #[source]
        source: CoordinateError,
    },
}

/// Point-of-interest record as stored in data files
///
/// Deployed files use either English or Spanish field names.
#[derive(Debug, Deserialize)]
struct PoiRecord {
    #[serde(alias = "Id", alias = "ID")]
    id: u32,
    #[serde(alias = "Nombre", alias = "nombre")]
    name: String,
    #[serde(alias = "Latitud", alias = "lat")]
    latitude: f64,
    #[serde(alias = "Longitud", alias = "lon")]
    longitude: f64,
}

impl TryFrom<PoiRecord> for Destination {
    type Error = CatalogError;

    fn try_from(record: PoiRecord) -> Result<Self, Self::Error> {
        let location = Coordinate::new(record.latitude, record.longitude).map_err(|source| {
            CatalogError::InvalidLocation {
                id: record.id,
                source,
            }
        })?;
        Ok(Destination::new(record.id, record.name, location))
    }
}

/// Catalog backed by a JSON array of points of interest
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    destinations: Vec<Destination>,
}

impl JsonCatalog {
    /// Parse a JSON array of `{id, name, latitude, longitude}` records
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<PoiRecord> = serde_json::from_str(json)?;
        let destinations = records
            .into_iter()
            .map(Destination::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = destinations.len(), "loaded destination catalog");
        Ok(Self { destinations })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(&path).map_err(|source| CatalogError::Io {
            path: path.as_ref().to_string_lossy().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

impl DestinationCatalog for JsonCatalog {
    fn list(&self) -> Vec<Destination> {
        self.destinations.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POIS: &str = r#"[
        { "id": 1, "Nombre": "Biblioteca", "Latitud": 4.660982, "Longitud": -74.059616 },
        { "id": 2, "name": "Cafeteria", "latitude": 4.661226, "longitude": -74.059538 },
        { "id": 3, "name": "Gym", "lat": 4.6625, "lon": -74.0581 }
    ]"#;

    #[test]
    fn test_load_mixed_field_names() {
        let catalog = JsonCatalog::from_json_str(POIS).unwrap();
        assert_eq!(catalog.len(), 3);

        let library = catalog.resolve(DestinationQuery::Id(1)).unwrap();
        assert_eq!(library.name, "Biblioteca");
        assert_eq!(library.location, Coordinate::new_unchecked(4.660982, -74.059616));
    }

    #[test]
    fn test_resolve_by_name() {
        let catalog = JsonCatalog::from_json_str(POIS).unwrap();
        let cafe = catalog.resolve(DestinationQuery::Name("  cafeteria ")).unwrap();
        assert_eq!(cafe.id, 2);
        assert!(catalog.resolve(DestinationQuery::Name("Pool")).is_none());
        assert!(catalog.resolve(DestinationQuery::Id(99)).is_none());
    }

    #[test]
    fn test_invalid_location_rejected() {
        let json = r#"[{ "id": 7, "name": "Nowhere", "latitude": 120.0, "longitude": 0.0 }]"#;
        assert!(matches!(
            JsonCatalog::from_json_str(json),
            Err(CatalogError::InvalidLocation { id: 7, .. })
        ));
        assert!(matches!(
            JsonCatalog::from_json_str("not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_vec_catalog() {
        let catalog = vec![Destination::new(5, "Gate", Coordinate::new_unchecked(0.0, 0.0))];
        assert_eq!(catalog.resolve(DestinationQuery::Name("GATE")).map(|d| d.id), Some(5));
    }
}
