//! Vehicle characteristics used for range and charging estimates.

use serde::{Deserialize, Serialize};

use super::ConnectorType;

/// Error returned when a vehicle profile cannot be used for planning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid vehicle profile: {reason}")]
pub struct InvalidVehicleProfile {
    reason: &'static str,
}

/// Battery, range and charging capability of one vehicle.
///
/// Treated as immutable for the duration of a planning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub usable_capacity_kwh: f64,

    /// Range at 100% charge.
    pub range_km: f64,

    pub max_dc_charging_kw: f64,

    /// Connectors the vehicle can plug into.
    pub connector_types: Vec<ConnectorType>,
}

impl VehicleProfile {
    pub fn new(
        usable_capacity_kwh: f64,
        range_km: f64,
        max_dc_charging_kw: f64,
        connector_types: Vec<ConnectorType>,
    ) -> Self {
        Self {
            usable_capacity_kwh,
            range_km,
            max_dc_charging_kw,
            connector_types,
        }
    }

    /// Check that the numbers can drive range and charging-time arithmetic.
    pub fn validate(&self) -> Result<(), InvalidVehicleProfile> {
        if !(self.range_km.is_finite() && self.range_km > 0.0) {
            return Err(InvalidVehicleProfile {
                reason: "range must be positive",
            });
        }
        if !(self.usable_capacity_kwh.is_finite() && self.usable_capacity_kwh > 0.0) {
            return Err(InvalidVehicleProfile {
                reason: "usable capacity must be positive",
            });
        }
        if !(self.max_dc_charging_kw.is_finite() && self.max_dc_charging_kw > 0.0) {
            return Err(InvalidVehicleProfile {
                reason: "DC charging power must be positive",
            });
        }
        Ok(())
    }
}

impl Default for VehicleProfile {
    /// A generic mid-size EV for when no vehicle has been chosen.
    fn default() -> Self {
        Self {
            usable_capacity_kwh: 70.0,
            range_km: 400.0,
            max_dc_charging_kw: 150.0,
            connector_types: vec![ConnectorType::Ccs],
        }
    }
}
