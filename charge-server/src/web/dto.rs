//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::browser::{BrowseOptions, BrowseRequest, BrowseResult, DataSource, Motion, SortMode};
use crate::domain::{ConnectorType, Station, VehicleProfile};
use crate::geo::Coordinate;
use crate::planner::PlannedRoute;
use crate::stations::CacheStats;
use crate::vehicles::VehicleEntry;

use super::routes::AppError;

/// Query for nearby stations.
#[derive(Debug, Default, Deserialize)]
pub struct NearbyParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// Search radius in kilometers (defaults to 10)
    pub radius_km: Option<f64>,

    /// Maximum results from the directory (defaults to 200)
    pub max_results: Option<usize>,

    /// Comma-separated connector names, e.g. "CCS,Type2"
    pub connectors: Option<String>,

    /// "distance", "power" or "availability"
    pub sort: Option<String>,

    /// Degrees clockwise from north
    pub heading: Option<f64>,

    /// Meters per second
    pub speed: Option<f64>,

    /// Only stations ahead of the heading
    pub ahead: Option<bool>,
}

impl NearbyParams {
    /// Convert to a browse request, rejecting unknown connector or sort
    /// names.
    pub fn to_request(&self) -> Result<BrowseRequest, AppError> {
        let location = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        };

        let connectors = match &self.connectors {
            Some(list) => parse_connectors(list)?,
            None => Vec::new(),
        };

        let sort = match &self.sort {
            Some(name) => SortMode::parse(name).ok_or_else(|| AppError::BadRequest {
                message: format!("Unknown sort mode: {name}"),
            })?,
            None => SortMode::default(),
        };

        let motion = match (self.heading, self.speed) {
            (Some(heading), Some(speed)) => Some(Motion::new(heading, speed)),
            _ => None,
        };

        let mut request = BrowseRequest::new(location).with_options(BrowseOptions {
            connectors,
            sort,
            ahead_only: self.ahead.unwrap_or(false),
            motion,
        });
        if let Some(radius_km) = self.radius_km {
            request = request.with_radius_km(radius_km);
        }
        if let Some(max_results) = self.max_results {
            request.max_results = max_results;
        }

        Ok(request)
    }
}

fn parse_connectors(list: &str) -> Result<Vec<ConnectorType>, AppError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            ConnectorType::parse(s).map_err(|e| AppError::BadRequest {
                message: e.to_string(),
            })
        })
        .collect()
}

/// A station in list results.
#[derive(Debug, Serialize)]
pub struct StationResult {
    #[serde(flatten)]
    pub station: Station,

    /// Distance from the query location in kilometers
    pub distance_km: Option<f64>,

    /// Highest connector power in kW
    pub max_power_kw: u32,

    /// e.g. "CCS, Type 2"
    pub connector_summary: String,
}

impl StationResult {
    pub fn new(station: Station, from: Option<&Coordinate>) -> Self {
        Self {
            distance_km: from.map(|c| station.distance_km_from(c)),
            max_power_kw: station.max_power_kw(),
            connector_summary: station.connector_summary(),
            station,
        }
    }
}

/// Response for a nearby-stations query.
#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub stations: Vec<StationResult>,
    pub source: DataSource,
    pub offline: bool,
}

impl BrowseResponse {
    pub fn new(result: BrowseResult, location: Option<&Coordinate>) -> Self {
        Self {
            stations: result
                .stations
                .into_iter()
                .map(|s| StationResult::new(s, location))
                .collect(),
            source: result.source,
            offline: result.offline,
        }
    }
}

/// Request to plan a route.
#[derive(Debug, Deserialize)]
pub struct PlanRouteBody {
    pub start: Coordinate,
    pub destination: Coordinate,
    pub destination_name: Option<String>,

    /// Explicit vehicle figures. Takes precedence over `vehicle_id`.
    pub vehicle: Option<VehicleProfile>,

    /// Catalog id of the vehicle
    pub vehicle_id: Option<String>,

    pub current_charge_percent: u8,
    pub safety_buffer_km: Option<f64>,
    pub prefer_fast_charging: Option<bool>,
}

/// Response for route planning.
#[derive(Debug, Serialize)]
pub struct PlanRouteResponse {
    #[serde(flatten)]
    pub route: PlannedRoute,

    pub total_time_minutes: u32,
}

impl From<PlannedRoute> for PlanRouteResponse {
    fn from(route: PlannedRoute) -> Self {
        Self {
            total_time_minutes: route.total_time_minutes(),
            route,
        }
    }
}

/// Response for cache statistics.
#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub stations: CacheStats,

    /// Entries in the short-lived directory response cache
    pub directory_responses: u64,
}

/// Query for cache invalidation.
#[derive(Debug, Default, Deserialize)]
pub struct InvalidateParams {
    /// Only drop stale entries (defaults to false)
    pub stale_only: Option<bool>,
}

/// Response for cache invalidation.
#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub removed: usize,
}

/// Query for vehicle search.
#[derive(Debug, Default, Deserialize)]
pub struct VehicleSearchParams {
    pub q: Option<String>,
}

/// Response for vehicle search.
#[derive(Debug, Serialize)]
pub struct VehicleSearchResponse {
    pub vehicles: Vec<VehicleEntry>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
