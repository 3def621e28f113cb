//! Station list filtering and ordering.
//!
//! Pure functions over a list of stations and the viewer's position. The
//! order of application is fixed: connector filter, sort, then the
//! heading filter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{ConnectorType, Station};
use crate::geo::{self, Coordinate};

/// Below this speed the heading filter does nothing, in m/s (about 5 km/h).
pub const MIN_HEADING_SPEED_MPS: f64 = 1.4;

/// Stations within this many degrees either side of the heading count as
/// ahead.
pub const HEADING_TOLERANCE_DEGREES: f64 = 45.0;

/// How a station list is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Nearest first.
    #[default]
    Distance,
    /// Highest connector power first.
    Power,
    /// Most likely to be free first.
    Availability,
}

impl SortMode {
    /// Parse a sort mode name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Some(SortMode::Distance),
            "power" => Some(SortMode::Power),
            "availability" => Some(SortMode::Availability),
            _ => None,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortMode::Distance => "distance",
            SortMode::Power => "power",
            SortMode::Availability => "availability",
        };
        f.write_str(name)
    }
}

/// Direction and speed of travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Degrees clockwise from north.
    pub heading_degrees: f64,
    pub speed_mps: f64,
}

impl Motion {
    pub fn new(heading_degrees: f64, speed_mps: f64) -> Self {
        Self {
            heading_degrees,
            speed_mps,
        }
    }

    /// Whether we are moving fast enough for the heading to mean anything.
    pub fn is_moving(&self) -> bool {
        self.speed_mps >= MIN_HEADING_SPEED_MPS
    }
}

/// Caller preferences for a station list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseOptions {
    /// Keep stations offering any of these; empty keeps all.
    pub connectors: Vec<ConnectorType>,
    pub sort: SortMode,

    /// Keep only stations ahead of the viewer. Needs `motion`.
    pub ahead_only: bool,
    pub motion: Option<Motion>,
}

/// Keep stations that share at least one connector with `preferred`.
pub fn filter_by_connectors(stations: Vec<Station>, preferred: &[ConnectorType]) -> Vec<Station> {
    if preferred.is_empty() {
        return stations;
    }
    stations
        .into_iter()
        .filter(|s| s.offers_any(preferred))
        .collect()
}

/// Sort in place by `mode`. Ties in power or availability fall back to
/// distance.
pub fn sort_stations(stations: &mut [Station], location: &Coordinate, mode: SortMode) {
    stations.sort_by(|a, b| {
        a.distance_km_from(location)
            .total_cmp(&b.distance_km_from(location))
    });

    match mode {
        SortMode::Distance => {}
        SortMode::Power => stations.sort_by_key(|s| std::cmp::Reverse(s.max_power_kw())),
        SortMode::Availability => stations.sort_by_key(|s| s.status.availability_rank()),
    }
}

/// Keep stations whose bearing from `location` is within
/// [`HEADING_TOLERANCE_DEGREES`] of the heading.
///
/// Does nothing when `motion` is absent or slower than
/// [`MIN_HEADING_SPEED_MPS`].
pub fn filter_ahead(
    stations: Vec<Station>,
    location: &Coordinate,
    motion: Option<Motion>,
) -> Vec<Station> {
    let Some(motion) = motion.filter(Motion::is_moving) else {
        return stations;
    };

    stations
        .into_iter()
        .filter(|s| {
            let bearing = geo::bearing_degrees(*location, s.location);
            geo::angle_difference(motion.heading_degrees, bearing).abs()
                <= HEADING_TOLERANCE_DEGREES
        })
        .collect()
}

/// Apply the full filter-and-order contract.
pub fn apply(stations: Vec<Station>, location: &Coordinate, options: &BrowseOptions) -> Vec<Station> {
    let mut stations = filter_by_connectors(stations, &options.connectors);
    sort_stations(&mut stations, location, options.sort);

    if options.ahead_only {
        filter_ahead(stations, location, options.motion)
    } else {
        stations
    }
}
