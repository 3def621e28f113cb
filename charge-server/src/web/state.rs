//! Application state for the web layer.

use std::sync::Arc;

use crate::browser::StationBrowser;
use crate::cache::{CacheConfig, CachedDirectoryClient};
use crate::directory::DirectoryClient;
use crate::planner::RoutePlanner;
use crate::stations::StationCache;
use crate::vehicles::VehicleCatalog;

/// Browser over the response-cached directory.
pub type Browser = StationBrowser<CachedDirectoryClient<DirectoryClient>>;

/// Shared application state.
///
/// The planner talks to the directory directly; only the browser goes
/// through the response cache.
#[derive(Clone)]
pub struct AppState {
    pub browser: Arc<Browser>,
    pub planner: Arc<RoutePlanner<DirectoryClient>>,

    /// Uncached client for single-station lookups.
    pub directory: DirectoryClient,

    pub cache: Arc<StationCache>,
    pub vehicles: Arc<VehicleCatalog>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        directory: DirectoryClient,
        cache: Arc<StationCache>,
        vehicles: VehicleCatalog,
        cache_config: &CacheConfig,
    ) -> Self {
        let cached = CachedDirectoryClient::new(directory.clone(), cache_config);

        Self {
            browser: Arc::new(StationBrowser::new(cached, cache.clone())),
            planner: Arc::new(RoutePlanner::new(directory.clone())),
            directory,
            cache,
            vehicles: Arc::new(vehicles),
        }
    }
}
