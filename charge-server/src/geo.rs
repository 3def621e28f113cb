//! Geometry helpers for coordinates on the Earth's surface.
//!
//! Distances use the haversine great-circle formula on a spherical Earth.
//! Interpolation is a straight line in latitude/longitude space, which is
//! an approximation: it is not geodesic-exact and makes no attempt to be
//! well behaved near the poles or across the antimeridian.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another coordinate in kilometers.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        distance_meters(*self, *other) / 1000.0
    }
}

/// Great-circle distance between two coordinates in meters.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h marginally above 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Initial bearing from `from` towards `to`, in degrees within [0, 360).
pub fn bearing_degrees(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Point at `fraction` of the way along the straight line from `from` to `to`.
///
/// `fraction` is clamped to [0, 1].
pub fn interpolate(from: Coordinate, to: Coordinate, fraction: f64) -> Coordinate {
    let t = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };

    Coordinate {
        latitude: from.latitude + (to.latitude - from.latitude) * t,
        longitude: from.longitude + (to.longitude - from.longitude) * t,
    }
}

/// Signed difference `b - a` between two angles, normalized to [-180, 180].
///
/// Positive means `b` is clockwise of `a`.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let diff = (b - a).rem_euclid(360.0);
    if diff > 180.0 { diff - 360.0 } else { diff }
}

fn normalize_degrees(deg: f64) -> f64 {
    let n = deg.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if n >= 360.0 { 0.0 } else { n }
}
