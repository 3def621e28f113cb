//! Fixed planning constants.
//!
//! These are tuning choices with no calibration behind them. They are
//! kept as named constants so tests can reason about exact outputs.

/// Multiplier from straight-line to estimated road distance.
pub const ROAD_DISTANCE_FACTOR: f64 = 1.3;

/// Range held back on every leg, in kilometers.
pub const DEFAULT_SAFETY_BUFFER_KM: f64 = 50.0;

/// Charge level each stop charges up to, in percent.
pub const TARGET_CHARGE_PERCENT: i32 = 80;

/// Lowest arrival charge the planner reports, in percent.
pub const ARRIVAL_CHARGE_FLOOR_PERCENT: i32 = 10;

/// Share of the nominal DC power actually delivered over a session.
pub const CHARGING_EFFICIENCY: f64 = 0.7;

/// Average driving speed used for time estimates, in km/h.
pub const AVERAGE_SPEED_KMH: f64 = 80.0;

/// Look for chargers this far along the usable range.
pub const SEARCH_RANGE_FRACTION: f64 = 0.8;

/// Radius searched around each search point, in kilometers.
pub const SEARCH_RADIUS_KM: f64 = 20.0;

/// Candidates requested per search point.
pub const MAX_CANDIDATES: usize = 10;

/// Score reduction for stations with a CCS or Tesla connector.
pub const FAST_CHARGER_BONUS: f64 = 10.0;

/// Hard ceiling on inserted stops for a single route.
pub const MAX_STOPS: usize = 20;

/// A chosen station closer than this to the current position makes no
/// progress, in kilometers.
pub const MIN_LEG_KM: f64 = 1.0;

/// Whole minutes to drive `km` at [`AVERAGE_SPEED_KMH`], truncated.
pub fn drive_minutes(km: f64) -> u32 {
    (km.max(0.0) / AVERAGE_SPEED_KMH * 60.0) as u32
}

/// Whole minutes to charge from `arrival_percent` to
/// [`TARGET_CHARGE_PERCENT`], truncated. Zero when already at or above
/// the target.
pub fn charging_minutes(
    arrival_percent: i32,
    usable_capacity_kwh: f64,
    max_dc_charging_kw: f64,
) -> u32 {
    let needed_percent = (TARGET_CHARGE_PERCENT - arrival_percent).max(0);
    let kwh_needed = f64::from(needed_percent) / 100.0 * usable_capacity_kwh;
    let effective_kw = max_dc_charging_kw * CHARGING_EFFICIENCY;
    (kwh_needed / effective_kw * 60.0) as u32
}
