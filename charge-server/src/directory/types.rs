//! Directory API response DTOs.
//!
//! These types mirror the Open Charge Map POI JSON. Every field is optional
//! because the directory omits fields freely; deciding what is required
//! happens during conversion, not decoding.

use serde::Deserialize;

/// One point of interest (a charging location).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PoiRecord {
    /// Numeric directory identifier.
    #[serde(rename = "ID")]
    pub id: Option<i64>,

    /// Directory UUID string.
    #[serde(rename = "UUID")]
    pub uuid: Option<String>,

    pub operator_info: Option<OperatorInfo>,

    pub address_info: Option<AddressInfo>,

    pub connections: Option<Vec<Connection>>,

    pub number_of_points: Option<i64>,

    #[serde(rename = "StatusTypeID")]
    pub status_type_id: Option<i64>,

    /// Free-text pricing description.
    pub usage_cost: Option<String>,

    /// ISO-8601 timestamp of the last status update.
    pub date_last_status_update: Option<String>,
}

/// Network operator details.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperatorInfo {
    #[serde(rename = "ID")]
    pub id: Option<i64>,
    pub title: Option<String>,
    #[serde(rename = "WebsiteURL")]
    pub website_url: Option<String>,
}

/// Location and postal address.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddressInfo {
    pub title: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub town: Option<String>,
    pub state_or_province: Option<String>,
    pub postcode: Option<String>,
    #[serde(rename = "CountryID")]
    pub country_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AddressInfo {
    /// Join the non-empty street, town, state and postcode with ", ".
    pub fn formatted(&self) -> String {
        [
            &self.address_line1,
            &self.town,
            &self.state_or_province,
            &self.postcode,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A single plug (or group of identical plugs) at a location.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Connection {
    #[serde(rename = "ID")]
    pub id: Option<i64>,
    #[serde(rename = "ConnectionTypeID")]
    pub connection_type_id: Option<i64>,
    #[serde(rename = "PowerKW")]
    pub power_kw: Option<f64>,
    pub quantity: Option<i64>,
    #[serde(rename = "LevelID")]
    pub level_id: Option<i64>,
    #[serde(rename = "StatusTypeID")]
    pub status_type_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "ID": 12345,
        "UUID": "550e8400-e29b-41d4-a716-446655440000",
        "OperatorInfo": { "ID": 1, "Title": "ChargePoint" },
        "AddressInfo": {
            "Title": "Downtown Charging Hub",
            "AddressLine1": "123 Main Street",
            "Town": "San Francisco",
            "StateOrProvince": "CA",
            "Postcode": "94102",
            "Latitude": 37.7749,
            "Longitude": -122.4194
        },
        "Connections": [
            { "ID": 1, "ConnectionTypeID": 33, "PowerKW": 150 },
            { "ID": 2, "ConnectionTypeID": 2, "PowerKW": 50 }
        ],
        "NumberOfPoints": 4,
        "StatusTypeID": 50,
        "UsageCost": "$0.35/kWh"
    }"#;

    #[test]
    fn decode_full_record() {
        let poi: PoiRecord = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(poi.id, Some(12345));
        assert_eq!(
            poi.uuid.as_deref(),
            Some("550e8400-e29b-41d4-a716-446655440000")
        );
        assert_eq!(
            poi.operator_info.and_then(|o| o.title).as_deref(),
            Some("ChargePoint")
        );
        let address = poi.address_info.unwrap();
        assert_eq!(address.latitude, Some(37.7749));
        assert_eq!(address.longitude, Some(-122.4194));
        let connections = poi.connections.unwrap();
        assert_eq!(connections.len(), 2);
        assert_eq!(connections[0].connection_type_id, Some(33));
        assert_eq!(connections[0].power_kw, Some(150.0));
        assert_eq!(poi.number_of_points, Some(4));
        assert_eq!(poi.status_type_id, Some(50));
        assert_eq!(poi.usage_cost.as_deref(), Some("$0.35/kWh"));
    }

    #[test]
    fn decode_empty_object() {
        let poi: PoiRecord = serde_json::from_str("{}").unwrap();
        assert!(poi.id.is_none());
        assert!(poi.address_info.is_none());
    }

    #[test]
    fn formatted_address_skips_blank_parts() {
        let address = AddressInfo {
            address_line1: Some("123 Main Street".into()),
            town: Some("".into()),
            state_or_province: Some("CA".into()),
            postcode: None,
            ..Default::default()
        };
        assert_eq!(address.formatted(), "123 Main Street, CA");
    }
}
