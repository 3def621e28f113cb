//! Greedy charging-stop insertion.
//!
//! Walks forward from the start, and whenever the destination is out of
//! range, looks for a charger a little short of where the battery would
//! run down. One directory query per stop, strictly in sequence: each
//! search point depends on where the previous stop landed.

use tracing::{debug, info, warn};

use crate::directory::{DirectoryError, NearbyQuery, StationProvider};
use crate::domain::{InvalidVehicleProfile, VehicleProfile};
use crate::geo::{self, Coordinate};

use super::policy::{
    ARRIVAL_CHARGE_FLOOR_PERCENT, DEFAULT_SAFETY_BUFFER_KM, MAX_CANDIDATES, MAX_STOPS, MIN_LEG_KM,
    ROAD_DISTANCE_FACTOR, SEARCH_RADIUS_KM, SEARCH_RANGE_FRACTION, TARGET_CHARGE_PERCENT,
    charging_minutes, drive_minutes,
};
use super::rank::select_best_station;
use super::route::{ChargingStop, PlannedRoute, RouteCompletion};

/// Error from route planning.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A directory query failed outright.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The request cannot be planned.
    #[error("invalid plan request: {0}")]
    InvalidRequest(String),
}

impl From<InvalidVehicleProfile> for PlanError {
    fn from(err: InvalidVehicleProfile) -> Self {
        PlanError::InvalidRequest(err.to_string())
    }
}

/// Request for a planned route.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub start: Coordinate,
    pub destination: Coordinate,
    pub destination_name: String,
    pub vehicle: VehicleProfile,

    /// Battery level at departure, 0 to 100.
    pub current_charge_percent: u8,

    /// Range held back on every leg, in kilometers.
    pub safety_buffer_km: f64,

    /// Favour CCS and Tesla stations when ranking candidates.
    pub prefer_fast_charging: bool,
}

impl PlanRequest {
    /// Create a request with the default safety buffer and fast-charging
    /// preference.
    pub fn new(
        start: Coordinate,
        destination: Coordinate,
        destination_name: impl Into<String>,
        vehicle: VehicleProfile,
        current_charge_percent: u8,
    ) -> Self {
        Self {
            start,
            destination,
            destination_name: destination_name.into(),
            vehicle,
            current_charge_percent,
            safety_buffer_km: DEFAULT_SAFETY_BUFFER_KM,
            prefer_fast_charging: true,
        }
    }

    pub fn with_safety_buffer_km(mut self, km: f64) -> Self {
        self.safety_buffer_km = km;
        self
    }

    pub fn with_fast_charging_preference(mut self, prefer: bool) -> Self {
        self.prefer_fast_charging = prefer;
        self
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), PlanError> {
        self.vehicle.validate()?;

        if self.current_charge_percent > 100 {
            return Err(PlanError::InvalidRequest(
                "current charge must be between 0 and 100 percent".to_string(),
            ));
        }

        if !(self.safety_buffer_km.is_finite() && self.safety_buffer_km >= 0.0) {
            return Err(PlanError::InvalidRequest(
                "safety buffer must be a non-negative distance".to_string(),
            ));
        }

        for point in [&self.start, &self.destination] {
            if !(point.latitude.is_finite()
                && point.longitude.is_finite()
                && (-90.0..=90.0).contains(&point.latitude)
                && (-180.0..=180.0).contains(&point.longitude))
            {
                return Err(PlanError::InvalidRequest(format!(
                    "coordinate out of range: {}, {}",
                    point.latitude, point.longitude
                )));
            }
        }

        Ok(())
    }
}

/// Range-aware route planner.
///
/// Queries `provider` directly at each search point; it is meant to be
/// given the live directory rather than a cache.
pub struct RoutePlanner<P> {
    provider: P,
}

impl<P: StationProvider> RoutePlanner<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Plan a route, inserting charging stops where range runs short.
    ///
    /// Running out of candidates is not an error: the route planned so far
    /// comes back with [`RouteCompletion::NoStationsFound`].
    pub async fn plan_route(&self, request: &PlanRequest) -> Result<PlannedRoute, PlanError> {
        request.validate()?;

        let vehicle = &request.vehicle;
        let destination = request.destination;
        let buffer = request.safety_buffer_km;
        let total_distance_km = request.start.distance_km(&destination) * ROAD_DISTANCE_FACTOR;

        let range_at = |charge: i32| vehicle.range_km * f64::from(charge) / 100.0 - buffer;

        let mut charge = i32::from(request.current_charge_percent);

        if range_at(charge) >= total_distance_km {
            debug!(total_distance_km, "Destination within range, no stops needed");
            return Ok(PlannedRoute {
                destination,
                destination_name: request.destination_name.clone(),
                total_distance_km,
                stops: Vec::new(),
                drive_time_minutes: drive_minutes(total_distance_km),
                charging_time_minutes: 0,
                completion: RouteCompletion::Complete,
            });
        }

        let mut stops: Vec<ChargingStop> = Vec::new();
        let mut position = request.start;
        let mut travelled_km = 0.0;
        let mut drive_time = 0u32;
        let mut charging_time = 0u32;
        let mut completion = RouteCompletion::Complete;

        while travelled_km < total_distance_km {
            let remaining_km = total_distance_km - travelled_km;
            let available_km = range_at(charge);
            if available_km >= remaining_km {
                break;
            }

            if stops.len() >= MAX_STOPS {
                warn!(stops = stops.len(), remaining_km, "Stop limit reached");
                completion = RouteCompletion::StopLimitReached;
                break;
            }

            let search_km = available_km * SEARCH_RANGE_FRACTION;
            let search_point = geo::interpolate(position, destination, search_km / remaining_km);
            let query = NearbyQuery::new(search_point, SEARCH_RADIUS_KM, MAX_CANDIDATES)
                .with_connectors(&vehicle.connector_types);

            let candidates: Vec<_> = self
                .provider
                .fetch_nearby(&query)
                .await?
                .into_iter()
                .filter(|s| s.offers_any(&vehicle.connector_types))
                .collect();

            let Some(best) = select_best_station(
                &candidates,
                &position,
                &destination,
                request.prefer_fast_charging,
            ) else {
                info!(
                    stops = stops.len(),
                    latitude = search_point.latitude,
                    longitude = search_point.longitude,
                    "No charging stations near search point, returning partial route"
                );
                completion = RouteCompletion::NoStationsFound;
                break;
            };

            let leg_km = position.distance_km(&best.location);
            if leg_km < MIN_LEG_KM {
                warn!(station = %best.id, leg_km, "Best candidate makes no progress");
                completion = RouteCompletion::Stalled;
                break;
            }

            let charge_used = (leg_km / vehicle.range_km * 100.0) as i32;
            let arrival = (charge - charge_used).max(ARRIVAL_CHARGE_FLOOR_PERCENT);
            let stop_minutes =
                charging_minutes(arrival, vehicle.usable_capacity_kwh, vehicle.max_dc_charging_kw);

            travelled_km += leg_km;
            drive_time += drive_minutes(leg_km);

            debug!(
                station = %best.id,
                name = %best.name,
                leg_km,
                arrival,
                stop_minutes,
                "Inserted charging stop"
            );

            stops.push(ChargingStop {
                station: best.clone(),
                distance_from_start_km: travelled_km,
                arrival_charge_percent: percent(arrival),
                departure_charge_percent: percent(TARGET_CHARGE_PERCENT),
                charging_time_minutes: stop_minutes,
                cumulative_elapsed_minutes: drive_time + charging_time,
            });

            charging_time += stop_minutes;
            position = best.location;
            charge = TARGET_CHARGE_PERCENT;
        }

        drive_time += drive_minutes(total_distance_km - travelled_km);

        info!(
            total_distance_km,
            stops = stops.len(),
            drive_time,
            charging_time,
            ?completion,
            "Planned route"
        );

        Ok(PlannedRoute {
            destination,
            destination_name: request.destination_name.clone(),
            total_distance_km,
            stops,
            drive_time_minutes: drive_time,
            charging_time_minutes: charging_time,
            completion,
        })
    }
}

fn percent(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}
