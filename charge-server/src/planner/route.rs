//! Planned route types.

use serde::Serialize;

use crate::domain::Station;
use crate::geo::Coordinate;

/// A charging halt inserted into a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargingStop {
    pub station: Station,

    /// Distance driven from the start to this station, in kilometers.
    pub distance_from_start_km: f64,

    pub arrival_charge_percent: u8,
    pub departure_charge_percent: u8,
    pub charging_time_minutes: u32,

    /// Minutes from departure until arrival here, counting driving and
    /// charging at earlier stops.
    pub cumulative_elapsed_minutes: u32,
}

/// Why stop insertion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteCompletion {
    /// The destination is within range of the last stop (or the start).
    Complete,
    /// A search point had no usable candidates. The stops so far are kept.
    NoStationsFound,
    /// The best candidate was effectively the current position.
    Stalled,
    /// The route needed more stops than the planner will insert.
    StopLimitReached,
}

impl RouteCompletion {
    /// Whether the route reaches the destination within range.
    pub fn is_complete(self) -> bool {
        self == RouteCompletion::Complete
    }
}

/// A trip from start to destination with any charging stops it needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRoute {
    pub destination: Coordinate,
    pub destination_name: String,

    /// Estimated road distance, in kilometers.
    pub total_distance_km: f64,

    /// Stops in driving order; empty when none are needed.
    pub stops: Vec<ChargingStop>,

    pub drive_time_minutes: u32,
    pub charging_time_minutes: u32,
    pub completion: RouteCompletion,
}

impl PlannedRoute {
    /// Driving plus charging time, in minutes.
    pub fn total_time_minutes(&self) -> u32 {
        self.drive_time_minutes + self.charging_time_minutes
    }
}
