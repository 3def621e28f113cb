//! Domain types for charging stations and vehicles.
//!
//! These types are the normalized model every other layer works with.
//! Raw directory records are converted into them once, at the edge, and
//! the invariants documented on each type hold from then on.

mod connector;
mod station;
mod status;
mod vehicle;

pub use connector::{ConnectorType, InvalidConnectorType};
pub use station::{Station, StationId};
pub use status::StationStatus;
pub use vehicle::{InvalidVehicleProfile, VehicleProfile};

#[cfg(test)]
pub(crate) use station::fixtures;
