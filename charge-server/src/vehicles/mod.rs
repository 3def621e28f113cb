//! Catalog of known electric vehicles.
//!
//! Loaded from a JSON array of entries. Used to pre-fill a
//! [`VehicleProfile`] instead of asking for battery figures by hand.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{ConnectorType, VehicleProfile};

/// Error loading a vehicle catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read vehicle catalog {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse vehicle catalog: {message}")]
    Parse { message: String },
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleEntry {
    pub id: String,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub variant: String,
    pub year: u16,
    pub battery_capacity_kwh: f64,
    pub usable_capacity_kwh: f64,
    pub range_km: u32,
    pub range_miles: u32,
    pub max_dc_charging_kw: u32,

    /// Connector names as written in the catalog, e.g. "CCS", "Type 2".
    pub connector_types: Vec<String>,
}

impl VehicleEntry {
    /// "Brand Model Variant", without a trailing space when there is no
    /// variant.
    pub fn display_name(&self) -> String {
        if self.variant.is_empty() {
            format!("{} {}", self.brand, self.model)
        } else {
            format!("{} {} {}", self.brand, self.model, self.variant)
        }
    }

    /// Recognised connectors, in catalog order. Unknown names are skipped.
    pub fn connectors(&self) -> Vec<ConnectorType> {
        let mut connectors = Vec::new();
        for name in &self.connector_types {
            if let Ok(connector) = ConnectorType::parse(name)
                && !connectors.contains(&connector)
            {
                connectors.push(connector);
            }
        }
        connectors
    }

    /// Planning profile for this vehicle.
    pub fn profile(&self) -> VehicleProfile {
        VehicleProfile::new(
            self.usable_capacity_kwh,
            f64::from(self.range_km),
            f64::from(self.max_dc_charging_kw),
            self.connectors(),
        )
    }

    fn matches(&self, needle: &str) -> bool {
        [&self.brand, &self.model, &self.variant]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// In-memory vehicle catalog.
#[derive(Debug, Clone, Default)]
pub struct VehicleCatalog {
    vehicles: Vec<VehicleEntry>,
}

impl VehicleCatalog {
    pub fn new(vehicles: Vec<VehicleEntry>) -> Self {
        Self { vehicles }
    }

    /// Parse a catalog from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let vehicles = serde_json::from_str(json).map_err(|e| CatalogError::Parse {
            message: e.to_string(),
        })?;
        Ok(Self { vehicles })
    }

    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn all(&self) -> &[VehicleEntry] {
        &self.vehicles
    }

    /// Case-insensitive substring match on brand, model or variant. An
    /// empty query returns everything.
    pub fn search(&self, query: &str) -> Vec<&VehicleEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.vehicles.iter().collect();
        }
        self.vehicles.iter().filter(|v| v.matches(&needle)).collect()
    }

    pub fn get(&self, id: &str) -> Option<&VehicleEntry> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Vehicles that can use `connector`.
    pub fn with_connector(&self, connector: ConnectorType) -> Vec<&VehicleEntry> {
        self.vehicles
            .iter()
            .filter(|v| v.connectors().contains(&connector))
            .collect()
    }

    /// Distinct brands, sorted.
    pub fn brands(&self) -> Vec<&str> {
        self.vehicles
            .iter()
            .map(|v| v.brand.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CATALOG: &str = r#"[
        {
            "id": "tesla-model-3-lr",
            "brand": "Tesla",
            "model": "Model 3",
            "variant": "Long Range",
            "year": 2024,
            "batteryCapacityKwh": 82.0,
            "usableCapacityKwh": 75.0,
            "rangeKm": 560,
            "rangeMiles": 348,
            "maxDcChargingKw": 250,
            "connectorTypes": ["Tesla", "CCS"]
        },
        {
            "id": "nissan-leaf",
            "brand": "Nissan",
            "model": "Leaf",
            "variant": "",
            "year": 2022,
            "batteryCapacityKwh": 40.0,
            "usableCapacityKwh": 39.0,
            "rangeKm": 270,
            "rangeMiles": 168,
            "maxDcChargingKw": 50,
            "connectorTypes": ["CHAdeMO", "Type 2", "Mystery"]
        },
        {
            "id": "tesla-model-y",
            "brand": "Tesla",
            "model": "Model Y",
            "year": 2024,
            "batteryCapacityKwh": 75.0,
            "usableCapacityKwh": 72.0,
            "rangeKm": 500,
            "rangeMiles": 310,
            "maxDcChargingKw": 250,
            "connectorTypes": ["TESLA"]
        }
    ]"#;

    fn catalog() -> VehicleCatalog {
        VehicleCatalog::from_json(CATALOG).unwrap()
    }

    #[test]
    fn parses_entries() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("tesla-model-y").unwrap().variant, "");
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = catalog();
        let ids: Vec<&str> = catalog.search("model").iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["tesla-model-3-lr", "tesla-model-y"]);

        assert_eq!(catalog.search("LONG range").len(), 1);
        assert_eq!(catalog.search("  ").len(), 3);
        assert!(catalog.search("porsche").is_empty());
    }

    #[test]
    fn connectors_skip_unknown() {
        let leaf = catalog().get("nissan-leaf").cloned().unwrap();
        assert_eq!(
            leaf.connectors(),
            vec![ConnectorType::Chademo, ConnectorType::Type2]
        );
        assert_eq!(leaf.display_name(), "Nissan Leaf");
    }

    #[test]
    fn with_connector_filters() {
        let catalog = catalog();
        let ids: Vec<&str> = catalog
            .with_connector(ConnectorType::Tesla)
            .iter()
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(ids, vec!["tesla-model-3-lr", "tesla-model-y"]);
        assert_eq!(catalog.with_connector(ConnectorType::J1772).len(), 0);
    }

    #[test]
    fn brands_are_unique_and_sorted() {
        assert_eq!(catalog().brands(), vec!["Nissan", "Tesla"]);
    }

    #[test]
    fn profile_from_entry() {
        let entry = catalog().get("tesla-model-3-lr").cloned().unwrap();
        let profile = entry.profile();
        assert_eq!(profile.usable_capacity_kwh, 75.0);
        assert_eq!(profile.range_km, 560.0);
        assert_eq!(profile.max_dc_charging_kw, 250.0);
        assert_eq!(
            profile.connector_types,
            vec![ConnectorType::Tesla, ConnectorType::Ccs]
        );
        assert!(profile.validate().is_ok());
        assert_eq!(entry.display_name(), "Tesla Model 3 Long Range");
    }

    #[test]
    fn load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vehicles.json");
        std::fs::write(&path, CATALOG).unwrap();

        assert_eq!(VehicleCatalog::load(&path).unwrap().len(), 3);
    }

    #[test]
    fn load_errors() {
        let dir = tempdir().unwrap();
        let missing = VehicleCatalog::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, CatalogError::Io { .. }));

        let bad = VehicleCatalog::from_json("{}").unwrap_err();
        assert!(matches!(bad, CatalogError::Parse { .. }));
    }
}
