//! Charging station entity.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ConnectorType, StationStatus};
use crate::geo::Coordinate;

/// Stable identity of a charging station.
///
/// Taken from the directory's UUID when it parses, otherwise generated.
/// Two records with the same id are the same station.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(Uuid);

impl StationId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// A fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a UUID string, returning `None` when it is malformed.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One charging location.
///
/// `connector_types` is never empty and holds no duplicates.
/// `cached_at` belongs to the station cache: records straight from the
/// directory carry `None`, and the cache stamps it on every upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,

    /// Numeric id assigned by the directory, when known.
    pub directory_id: Option<i64>,

    pub name: String,
    pub operator_name: Option<String>,
    pub address: String,
    pub location: Coordinate,
    pub connector_types: Vec<ConnectorType>,

    /// Number of physical plugs, at least 1.
    pub number_of_points: u32,

    pub status: StationStatus,
    pub usage_cost: Option<String>,

    /// When the directory last updated this record.
    pub last_updated: DateTime<Utc>,

    /// When this record entered the local cache.
    pub cached_at: Option<DateTime<Utc>>,
}

impl Station {
    /// Whether the station offers at least one of `connectors`.
    ///
    /// An empty `connectors` slice matches every station.
    pub fn offers_any(&self, connectors: &[ConnectorType]) -> bool {
        connectors.is_empty() || self.connector_types.iter().any(|c| connectors.contains(c))
    }

    /// Whether the station has a CCS or Tesla connector.
    pub fn has_fast_connector(&self) -> bool {
        self.connector_types.iter().any(|c| c.is_fast())
    }

    /// Highest nominal power across the station's connectors, in kW.
    pub fn max_power_kw(&self) -> u32 {
        self.connector_types
            .iter()
            .map(|c| c.nominal_power_kw())
            .max()
            .unwrap_or(0)
    }

    /// Great-circle distance from `point` to this station, in kilometers.
    pub fn distance_km_from(&self, point: &Coordinate) -> f64 {
        point.distance_km(&self.location)
    }

    /// Comma-separated connector labels, e.g. "CCS, CHAdeMO".
    pub fn connector_summary(&self) -> String {
        self.connector_types
            .iter()
            .map(|c| c.short_name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A minimal available CCS station at the given position.
    pub fn station_at(name: &str, latitude: f64, longitude: f64) -> Station {
        let now = Utc::now();
        Station {
            id: StationId::generate(),
            directory_id: None,
            name: name.to_string(),
            operator_name: None,
            address: String::new(),
            location: Coordinate::new(latitude, longitude),
            connector_types: vec![ConnectorType::Ccs],
            number_of_points: 1,
            status: StationStatus::Available,
            usage_cost: None,
            last_updated: now,
            cached_at: None,
        }
    }

    pub fn with_connectors(mut station: Station, connectors: &[ConnectorType]) -> Station {
        station.connector_types = connectors.to_vec();
        station
    }
}
