//! Station browsing: the list a map or list view renders.

pub mod filter;
mod service;

pub use filter::{BrowseOptions, Motion, SortMode};
pub use service::{
    BrowseError, BrowseRequest, BrowseResult, DEFAULT_MAX_RESULTS, DEFAULT_RADIUS_KM, DataSource,
    StationBrowser,
};
