//! Charging connector standards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unrecognized connector name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown connector type: {0}")]
pub struct InvalidConnectorType(String);

/// A plug standard offered by a charging station or accepted by a vehicle.
///
/// The set is closed: directory codes outside the mapping table are dropped
/// during normalization instead of producing an "other" variant.
///
/// # Examples
///
/// ```
/// use charge_server::domain::ConnectorType;
///
/// assert_eq!(ConnectorType::from_directory_code(32), Some(ConnectorType::Ccs));
/// assert_eq!(ConnectorType::from_directory_code(99), None);
/// assert_eq!(ConnectorType::Tesla.directory_code(), 30);
///
/// let parsed = ConnectorType::parse("type 2").unwrap();
/// assert_eq!(parsed, ConnectorType::Type2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorType {
    #[serde(rename = "CCS")]
    Ccs,
    #[serde(rename = "CHAdeMO")]
    Chademo,
    Tesla,
    J1772,
    Type2,
}

impl ConnectorType {
    /// All connector types, in declaration order.
    pub const ALL: [ConnectorType; 5] = [
        ConnectorType::Ccs,
        ConnectorType::Chademo,
        ConnectorType::Tesla,
        ConnectorType::J1772,
        ConnectorType::Type2,
    ];

    /// Map a directory connection type code to a connector.
    ///
    /// Returns `None` for codes with no mapping.
    pub fn from_directory_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ConnectorType::J1772),
            2 => Some(ConnectorType::Chademo),
            25 => Some(ConnectorType::Type2),
            8 | 27 | 30 => Some(ConnectorType::Tesla),
            32 | 33 => Some(ConnectorType::Ccs),
            _ => None,
        }
    }

    /// The code sent to the directory when filtering by this connector.
    pub fn directory_code(self) -> i64 {
        match self {
            ConnectorType::Ccs => 33,
            ConnectorType::Chademo => 2,
            ConnectorType::Tesla => 30,
            ConnectorType::J1772 => 1,
            ConnectorType::Type2 => 25,
        }
    }

    /// Short label, e.g. "CCS" or "Type 2".
    pub fn short_name(self) -> &'static str {
        match self {
            ConnectorType::Ccs => "CCS",
            ConnectorType::Chademo => "CHAdeMO",
            ConnectorType::Tesla => "Tesla",
            ConnectorType::J1772 => "J1772",
            ConnectorType::Type2 => "Type 2",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            ConnectorType::Ccs => "CCS (Combined Charging System)",
            ConnectorType::Chademo => "CHAdeMO",
            ConnectorType::Tesla => "Tesla Supercharger",
            ConnectorType::J1772 => "J1772 (Level 2)",
            ConnectorType::Type2 => "Type 2 (Mennekes)",
        }
    }

    /// Whether this is a DC fast-charging standard the planner favours.
    pub fn is_fast(self) -> bool {
        matches!(self, ConnectorType::Ccs | ConnectorType::Tesla)
    }

    /// Nominal peak power in kW, used for "most powerful first" ordering.
    pub fn nominal_power_kw(self) -> u32 {
        match self {
            ConnectorType::Ccs => 350,
            ConnectorType::Tesla => 250,
            ConnectorType::Chademo => 100,
            ConnectorType::Type2 => 22,
            ConnectorType::J1772 => 19,
        }
    }

    /// Parse a connector name, ignoring case and surrounding whitespace.
    ///
    /// Accepts "CCS", "CHAdeMO", "Tesla", "J1772", "Type2" and "Type 2".
    pub fn parse(s: &str) -> Result<Self, InvalidConnectorType> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CCS" => Ok(ConnectorType::Ccs),
            "CHADEMO" => Ok(ConnectorType::Chademo),
            "TESLA" => Ok(ConnectorType::Tesla),
            "J1772" => Ok(ConnectorType::J1772),
            "TYPE2" | "TYPE 2" => Ok(ConnectorType::Type2),
            _ => Err(InvalidConnectorType(s.to_string())),
        }
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
