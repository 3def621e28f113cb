//! Offline-first station browsing.
//!
//! Two sequential phases: read the local cache, then refresh from the
//! directory. The cached phase always completes first so a caller can
//! show something before the network answers.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::directory::{DirectoryError, NearbyQuery, StationProvider};
use crate::domain::Station;
use crate::geo::Coordinate;
use crate::stations::StationCache;

use super::filter::{self, BrowseOptions};

/// Default browse radius, in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Default number of stations requested from the directory.
pub const DEFAULT_MAX_RESULTS: usize = 200;

/// Error from station browsing.
#[derive(Debug, thiserror::Error)]
pub enum BrowseError {
    /// No position was supplied.
    #[error("current location unavailable")]
    LocationUnavailable,

    /// The directory failed and there was nothing cached to fall back on.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Where a station list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Cache,
    Live,
}

/// A filtered, ordered station list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowseResult {
    pub stations: Vec<Station>,
    pub source: DataSource,

    /// The directory could not be reached; `stations` is cached data.
    pub offline: bool,
}

/// A browse request.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseRequest {
    /// Viewer position; `None` when it could not be determined.
    pub location: Option<Coordinate>,
    pub radius_km: f64,
    pub max_results: usize,
    pub options: BrowseOptions,
}

impl BrowseRequest {
    pub fn new(location: Option<Coordinate>) -> Self {
        Self {
            location,
            radius_km: DEFAULT_RADIUS_KM,
            max_results: DEFAULT_MAX_RESULTS,
            options: BrowseOptions::default(),
        }
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_options(mut self, options: BrowseOptions) -> Self {
        self.options = options;
        self
    }

    fn location(&self) -> Result<Coordinate, BrowseError> {
        self.location.ok_or(BrowseError::LocationUnavailable)
    }
}

/// Combines the station cache with live directory results.
pub struct StationBrowser<P> {
    provider: P,
    cache: Arc<StationCache>,
}

impl<P: StationProvider> StationBrowser<P> {
    pub fn new(provider: P, cache: Arc<StationCache>) -> Self {
        Self { provider, cache }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &Arc<StationCache> {
        &self.cache
    }

    /// Phase one: cached stations within the radius, stale ones included.
    pub async fn load_cached(&self, request: &BrowseRequest) -> Result<BrowseResult, BrowseError> {
        let location = request.location()?;
        let cached = self
            .cache
            .query_near(location, request.radius_km, true)
            .await;

        Ok(BrowseResult {
            stations: filter::apply(cached, &location, &request.options),
            source: DataSource::Cache,
            offline: false,
        })
    }

    /// Phase two: fetch from the directory and update the cache.
    ///
    /// On a directory failure, falls back to `cached` marked offline,
    /// unless it is empty, in which case the error is returned.
    pub async fn refresh(
        &self,
        request: &BrowseRequest,
        cached: BrowseResult,
    ) -> Result<BrowseResult, BrowseError> {
        let location = request.location()?;
        let query = NearbyQuery::new(location, request.radius_km, request.max_results)
            .with_connectors(&request.options.connectors);

        let fresh = match self.provider.fetch_nearby(&query).await {
            Ok(fresh) => fresh,
            Err(e) if cached.stations.is_empty() => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, cached = cached.stations.len(), "Directory unavailable, showing cached stations");
                return Ok(BrowseResult {
                    offline: true,
                    ..cached
                });
            }
        };

        debug!(fetched = fresh.len(), "Refreshed stations from directory");

        if let Err(e) = self.cache.upsert(fresh.clone()).await {
            warn!(error = %e, "Failed to cache fetched stations");
        }

        Ok(BrowseResult {
            stations: filter::apply(fresh, &location, &request.options),
            source: DataSource::Live,
            offline: false,
        })
    }

    /// Run both phases, handing the cached result to `on_cached` before
    /// the directory is queried.
    pub async fn browse_with<F>(
        &self,
        request: &BrowseRequest,
        on_cached: F,
    ) -> Result<BrowseResult, BrowseError>
    where
        F: FnOnce(&BrowseResult),
    {
        let cached = self.load_cached(request).await?;
        on_cached(&cached);
        self.refresh(request, cached).await
    }

    /// Run both phases and return the final list.
    pub async fn browse(&self, request: &BrowseRequest) -> Result<BrowseResult, BrowseError> {
        self.browse_with(request, |_| {}).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::ConnectorType;
    use crate::domain::fixtures::{station_at, with_connectors};
    use crate::stations::StationCacheConfig;

    /// Directory double whose response can be swapped between calls.
    struct MockProvider {
        response: Mutex<Result<Vec<Station>, u16>>,
        queries: Mutex<Vec<NearbyQuery>>,
    }

    impl MockProvider {
        fn returning(stations: Vec<Station>) -> Self {
            Self {
                response: Mutex::new(Ok(stations)),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                response: Mutex::new(Err(status)),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn set_failing(&self, status: u16) {
            *self.response.lock().unwrap() = Err(status);
        }
    }

    impl StationProvider for MockProvider {
        async fn fetch_nearby(&self, query: &NearbyQuery) -> Result<Vec<Station>, DirectoryError> {
            self.queries.lock().unwrap().push(query.clone());
            match &*self.response.lock().unwrap() {
                Ok(stations) => Ok(stations.clone()),
                Err(status) => Err(DirectoryError::Http {
                    status: *status,
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    fn here() -> Coordinate {
        Coordinate::new(51.5, -0.1)
    }

    fn cache() -> Arc<StationCache> {
        Arc::new(StationCache::in_memory(StationCacheConfig::default()))
    }

    #[tokio::test]
    async fn missing_location_is_an_error() {
        let browser = StationBrowser::new(MockProvider::returning(Vec::new()), cache());
        let err = browser.browse(&BrowseRequest::new(None)).await.unwrap_err();
        assert!(matches!(err, BrowseError::LocationUnavailable));
        assert!(browser.provider().queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn live_results_are_sorted_and_cached() {
        let stations = vec![
            station_at("Far", 51.55, -0.1),
            station_at("Near", 51.501, -0.1),
        ];
        let browser = StationBrowser::new(MockProvider::returning(stations), cache());

        let result = browser
            .browse(&BrowseRequest::new(Some(here())))
            .await
            .unwrap();

        assert_eq!(result.source, DataSource::Live);
        assert!(!result.offline);
        let names: Vec<&str> = result.stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Near", "Far"]);

        let cached = browser.cache().query(false).await;
        assert_eq!(cached.len(), 2);
        assert!(cached.iter().all(|s| s.cached_at.is_some()));
    }

    #[tokio::test]
    async fn query_carries_connectors_and_radius() {
        let browser = StationBrowser::new(MockProvider::returning(Vec::new()), cache());
        let request = BrowseRequest::new(Some(here()))
            .with_radius_km(25.0)
            .with_options(BrowseOptions {
                connectors: vec![ConnectorType::Chademo],
                ..Default::default()
            });

        browser.browse(&request).await.unwrap();

        let queries = browser.provider().queries.lock().unwrap().clone();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].radius_km, 25.0);
        assert_eq!(queries[0].max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(queries[0].connectors, vec![ConnectorType::Chademo]);
    }

    #[tokio::test]
    async fn offline_falls_back_to_cache() {
        let browser = StationBrowser::new(
            MockProvider::returning(vec![station_at("Cached", 51.501, -0.1)]),
            cache(),
        );
        let request = BrowseRequest::new(Some(here()));
        browser.browse(&request).await.unwrap();

        browser.provider().set_failing(503);
        let result = browser.browse(&request).await.unwrap();

        assert!(result.offline);
        assert_eq!(result.source, DataSource::Cache);
        assert_eq!(result.stations.len(), 1);
        assert_eq!(result.stations[0].name, "Cached");
    }

    #[tokio::test]
    async fn offline_with_empty_cache_is_an_error() {
        let browser = StationBrowser::new(MockProvider::failing(503), cache());
        let err = browser
            .browse(&BrowseRequest::new(Some(here())))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BrowseError::Directory(DirectoryError::Http { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn cached_phase_runs_before_refresh() {
        let cache = cache();
        cache
            .upsert(vec![station_at("Old", 51.502, -0.1)])
            .await
            .unwrap();
        let browser = StationBrowser::new(
            MockProvider::returning(vec![station_at("New", 51.503, -0.1)]),
            cache,
        );

        let mut seen = Vec::new();
        let result = browser
            .browse_with(&BrowseRequest::new(Some(here())), |cached| {
                seen = cached.stations.iter().map(|s| s.name.clone()).collect();
                assert_eq!(cached.source, DataSource::Cache);
            })
            .await
            .unwrap();

        assert_eq!(seen, vec!["Old"]);
        assert_eq!(result.stations.len(), 1);
        assert_eq!(result.stations[0].name, "New");
    }

    #[tokio::test]
    async fn cached_phase_respects_radius_and_filter() {
        let cache = cache();
        cache
            .upsert(vec![
                with_connectors(station_at("Near Tesla", 51.501, -0.1), &[ConnectorType::Tesla]),
                station_at("Near CCS", 51.502, -0.1),
                station_at("Too far", 52.5, -0.1),
            ])
            .await
            .unwrap();
        let browser = StationBrowser::new(MockProvider::returning(Vec::new()), cache);

        let request = BrowseRequest::new(Some(here())).with_options(BrowseOptions {
            connectors: vec![ConnectorType::Ccs],
            ..Default::default()
        });
        let cached = browser.load_cached(&request).await.unwrap();

        let names: Vec<&str> = cached.stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Near CCS"]);
    }
}
