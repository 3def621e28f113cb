//! Short-lived response cache in front of the station directory.
//!
//! Map views re-issue the same nearby query as the user pans back and
//! forth. We cache each response for a minute, keyed on a rounded
//! position so that jitter below ~100 m shares an entry.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::directory::{DirectoryError, NearbyQuery, StationProvider};
use crate::domain::{ConnectorType, Station};

/// Cache key: (lat × 1000, lon × 1000, radius × 10, max results, connectors).
type QueryKey = (i64, i64, i64, usize, Vec<ConnectorType>);

/// Cached nearby response.
type QueryEntry = Arc<Vec<Station>>;

/// Configuration for the response cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Compute the cache key for a query.
fn query_key(query: &NearbyQuery) -> QueryKey {
    let mut connectors = query.connectors.clone();
    connectors.sort_by_key(|c| c.directory_code());
    connectors.dedup();

    (
        (query.center.latitude * 1000.0).round() as i64,
        (query.center.longitude * 1000.0).round() as i64,
        (query.radius_km * 10.0).round() as i64,
        query.max_results,
        connectors,
    )
}

/// Station provider with response caching.
///
/// Wraps any provider and caches successful nearby responses. Failures
/// are never cached.
pub struct CachedDirectoryClient<P> {
    inner: P,
    responses: MokaCache<QueryKey, QueryEntry>,
}

impl<P: StationProvider + Sync> CachedDirectoryClient<P> {
    /// Create a new cached client.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let responses = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, responses }
    }

    /// Get nearby stations, using the cache if available.
    pub async fn fetch_nearby_shared(
        &self,
        query: &NearbyQuery,
    ) -> Result<QueryEntry, DirectoryError> {
        let key = query_key(query);

        if let Some(cached) = self.responses.get(&key).await {
            tracing::debug!(entries = cached.len(), "Nearby query served from cache");
            return Ok(cached);
        }

        let stations = Arc::new(self.inner.fetch_nearby(query).await?);
        self.responses.insert(key, stations.clone()).await;

        Ok(stations)
    }

    /// Access the underlying provider for operations that bypass the cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.responses.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.responses.invalidate_all();
    }
}

impl<P: StationProvider + Sync> StationProvider for CachedDirectoryClient<P> {
    async fn fetch_nearby(&self, query: &NearbyQuery) -> Result<Vec<Station>, DirectoryError> {
        let shared = self.fetch_nearby_shared(query).await?;
        Ok(shared.as_ref().clone())
    }
}
