use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use charge_server::cache::CacheConfig;
use charge_server::config::AppConfig;
use charge_server::directory::DirectoryClient;
use charge_server::stations::{JsonFileStore, StationCache};
use charge_server::vehicles::VehicleCatalog;
use charge_server::web::{AppState, create_router};

/// How often stale stations are dropped from the cache (1 hour).
const STALE_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("charge_server=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    if config.api_key.is_none() {
        warn!("OCM_API_KEY not set, using anonymous directory access");
    }

    let directory =
        DirectoryClient::new(config.directory()).expect("Failed to create directory client");

    let cache = match &config.station_cache_path {
        Some(path) => {
            match StationCache::open(config.station_cache(), JsonFileStore::new(path)) {
                Ok(cache) => cache,
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "Unreadable station cache, starting in memory");
                    StationCache::in_memory(config.station_cache())
                }
            }
        }
        None => StationCache::in_memory(config.station_cache()),
    };
    let cache = Arc::new(cache);

    let vehicles = match &config.vehicle_catalog_path {
        Some(path) => VehicleCatalog::load(path).expect("Failed to load vehicle catalog"),
        None => VehicleCatalog::default(),
    };
    info!(vehicles = vehicles.len(), "Loaded vehicle catalog");

    // Spawn background task to drop stale stations hourly
    let sweep_cache = cache.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STALE_SWEEP_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match sweep_cache.invalidate_stale().await {
                Ok(removed) => info!(removed, "Swept stale stations"),
                Err(e) => error!(error = %e, "Failed to sweep stale stations"),
            }
        }
    });

    let state = AppState::new(directory, cache, vehicles, &CacheConfig::default());
    let app = create_router(state);

    let addr = config.bind_addr;
    info!(%addr, "EV charging server listening");
    info!("  GET  /health            - Health check");
    info!("  GET  /stations/nearby   - Stations near a point");
    info!("  GET  /stations/:id      - Station by directory id");
    info!("  POST /routes/plan       - Plan a route with charging stops");
    info!("  GET  /cache/stats       - Station cache statistics");
    info!("  POST /cache/invalidate  - Clear the station cache");
    info!("  GET  /vehicles          - Search the vehicle catalog");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
