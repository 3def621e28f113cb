//! Range-aware route planner.
//!
//! Given a start, a destination and a vehicle, decides where to stop and
//! charge so the battery never drops below the safety buffer. Distances
//! are straight-line estimates inflated by a fixed road factor; there is
//! no real routing.

mod plan;
pub mod policy;
mod rank;
mod route;


pub use plan::{PlanError, PlanRequest, RoutePlanner};
pub use rank::{detour_km, score_candidate, select_best_station};
pub use route::{ChargingStop, PlannedRoute, RouteCompletion};
