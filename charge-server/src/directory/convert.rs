//! Conversion from directory DTOs to domain types.
//!
//! Each record is normalized on its own. A record that cannot be placed on
//! a map is skipped; everything else degrades to a sensible default instead
//! of failing, so one bad record never costs the rest of the batch.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{ConnectorType, Station, StationId, StationStatus};
use crate::geo::Coordinate;

use super::types::{Connection, PoiRecord};

/// Name used when the directory gives a location no title.
pub const DEFAULT_STATION_NAME: &str = "Charging Station";

/// Reason a record was skipped during conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// No address block at all
    #[error("record has no address information")]
    MissingAddress,

    /// Address present but without usable coordinates
    #[error("record has no usable coordinates")]
    MissingLocation,

    /// Raw JSON did not match the record shape
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Convert raw JSON records into stations, skipping the ones that fail.
///
/// `fetched_at` stands in for a missing or unparseable update timestamp.
pub fn convert_records(records: Vec<serde_json::Value>, fetched_at: DateTime<Utc>) -> Vec<Station> {
    let total = records.len();
    let mut stations = Vec::with_capacity(total);

    for value in records {
        let record = match serde_json::from_value::<PoiRecord>(value) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "Skipping malformed directory record");
                continue;
            }
        };

        match convert_record(&record, fetched_at) {
            Ok(station) => stations.push(station),
            Err(e) => {
                debug!(directory_id = ?record.id, error = %e, "Skipping directory record");
            }
        }
    }

    debug!(
        received = total,
        kept = stations.len(),
        "Normalized directory records"
    );

    stations
}

/// Convert a single directory record into a station.
pub fn convert_record(
    record: &PoiRecord,
    fetched_at: DateTime<Utc>,
) -> Result<Station, ConversionError> {
    let address = record
        .address_info
        .as_ref()
        .ok_or(ConversionError::MissingAddress)?;

    let location = match (address.latitude, address.longitude) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Coordinate::new(lat, lon),
        _ => return Err(ConversionError::MissingLocation),
    };

    let id = record
        .uuid
        .as_deref()
        .and_then(StationId::parse)
        .unwrap_or_else(StationId::generate);

    let name = address
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_STATION_NAME)
        .to_string();

    let number_of_points = record
        .number_of_points
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(1);

    let last_updated = record
        .date_last_status_update
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(fetched_at);

    Ok(Station {
        id,
        directory_id: record.id,
        name,
        operator_name: record.operator_info.as_ref().and_then(|o| o.title.clone()),
        address: address.formatted(),
        location,
        connector_types: connector_types(record.connections.as_deref().unwrap_or(&[])),
        number_of_points,
        status: StationStatus::from_directory_code(record.status_type_id),
        usage_cost: record.usage_cost.clone(),
        last_updated,
        cached_at: None,
    })
}

/// Map connections to connector types.
///
/// Unmapped codes are dropped, duplicates removed keeping first-seen order,
/// and an empty result falls back to CCS.
pub fn connector_types(connections: &[Connection]) -> Vec<ConnectorType> {
    let mut connectors = Vec::new();

    for code in connections.iter().filter_map(|c| c.connection_type_id) {
        if let Some(connector) = ConnectorType::from_directory_code(code)
            && !connectors.contains(&connector)
        {
            connectors.push(connector);
        }
    }

    if connectors.is_empty() {
        connectors.push(ConnectorType::Ccs);
    }

    connectors
}

/// Parse an ISO-8601 / RFC 3339 timestamp, with or without fractional seconds.
///
/// Timestamps without an offset are taken as UTC.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
