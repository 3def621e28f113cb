//! Charging-station directory client.
//!
//! Queries the Open Charge Map POI API and normalizes its records into
//! domain [`Station`](crate::domain::Station)s.
//!
//! Key characteristics of the directory:
//! - It caps `distance` and `maxresults` server-side (500 each)
//! - Records omit fields freely, so every raw field is optional
//! - Connector types arrive as numeric codes with several codes per standard

mod client;
mod convert;
mod error;
mod provider;
mod types;

pub use client::{DEFAULT_BASE_URL, DirectoryClient, DirectoryConfig};
pub use convert::{
    ConversionError, DEFAULT_STATION_NAME, connector_types, convert_record, convert_records,
};
pub use error::DirectoryError;
pub use provider::{MAX_RADIUS_KM, MAX_RESULTS, NearbyQuery, StationProvider};
pub use types::{AddressInfo, Connection, OperatorInfo, PoiRecord};
