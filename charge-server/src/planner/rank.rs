//! Candidate ranking for charging stops.
//!
//! A candidate is scored by how far it pulls the route off the direct
//! line, with a flat bonus for fast chargers. Lower is better.

use crate::domain::Station;
use crate::geo::Coordinate;

use super::policy::FAST_CHARGER_BONUS;

/// Extra kilometers driven by going via `station` instead of straight to
/// `destination`.
pub fn detour_km(current: &Coordinate, station: &Station, destination: &Coordinate) -> f64 {
    let via = current.distance_km(&station.location) + station.location.distance_km(destination);
    via - current.distance_km(destination)
}

/// Score a candidate stop.
pub fn score_candidate(
    current: &Coordinate,
    station: &Station,
    destination: &Coordinate,
    prefer_fast_charging: bool,
) -> f64 {
    let bonus = if prefer_fast_charging && station.has_fast_connector() {
        FAST_CHARGER_BONUS
    } else {
        0.0
    };
    detour_km(current, station, destination) - bonus
}

/// Pick the lowest-scoring candidate.
///
/// Equal scores keep the earlier candidate. Returns `None` when
/// `candidates` is empty.
pub fn select_best_station<'a>(
    candidates: &'a [Station],
    current: &Coordinate,
    destination: &Coordinate,
    prefer_fast_charging: bool,
) -> Option<&'a Station> {
    let mut best: Option<(&Station, f64)> = None;

    for station in candidates {
        let score = score_candidate(current, station, destination, prefer_fast_charging);
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((station, score)),
        }
    }

    best.map(|(station, _)| station)
}
