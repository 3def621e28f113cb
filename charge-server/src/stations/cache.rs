//! Bounded, persisted cache of previously seen stations.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{Station, StationId};
use crate::geo::Coordinate;

use super::error::StationCacheError;
use super::store::{MemoryStore, StationStore};

/// Default maximum number of cached stations.
pub const DEFAULT_CAPACITY: usize = 500;

/// Default age after which a cached station is stale: 24 hours.
pub const DEFAULT_STALE_AFTER_HOURS: i64 = 24;

/// Configuration for the station cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationCacheConfig {
    /// Maximum number of stations kept. The oldest by `cached_at` go first.
    pub capacity: usize,
    /// Entries older than this are stale.
    pub stale_after: Duration,
}

impl StationCacheConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }
}

impl Default for StationCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            stale_after: Duration::hours(DEFAULT_STALE_AFTER_HOURS),
        }
    }
}

/// Point-in-time cache summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub valid: usize,
    pub stale: usize,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct Entry {
    station: Station,
    /// Insertion sequence, orders entries that share a `cached_at`.
    seq: u64,
}

#[derive(Debug, Clone, Default)]
struct Entries {
    by_id: HashMap<StationId, Entry>,
    next_seq: u64,
}

impl Entries {
    fn from_snapshot(stations: Vec<Station>) -> Self {
        let mut entries = Entries::default();
        for station in stations {
            entries.insert(station);
        }
        entries
    }

    fn insert(&mut self, station: Station) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_id.insert(station.id, Entry { station, seq });
    }

    /// Entries oldest first.
    fn ordered(&self) -> Vec<&Entry> {
        let mut ordered: Vec<&Entry> = self.by_id.values().collect();
        ordered.sort_by_key(|e| (e.station.cached_at, e.seq));
        ordered
    }

    fn snapshot(&self) -> Vec<Station> {
        self.ordered().into_iter().map(|e| e.station.clone()).collect()
    }

    /// Drop the oldest entries until at most `capacity` remain.
    fn evict_to(&mut self, capacity: usize) -> usize {
        let excess = self.by_id.len().saturating_sub(capacity);
        if excess == 0 {
            return 0;
        }
        let doomed: Vec<StationId> = self
            .ordered()
            .into_iter()
            .take(excess)
            .map(|e| e.station.id)
            .collect();
        for id in &doomed {
            self.by_id.remove(id);
        }
        doomed.len()
    }
}

/// Offline-first station cache.
///
/// Every mutation is computed on a copy, written to the store, and only
/// then swapped in. A store failure leaves the cache exactly as it was.
/// Mutations serialize on an internal lock; readers never see a partial
/// update.
pub struct StationCache {
    config: StationCacheConfig,
    store: Box<dyn StationStore>,
    entries: Mutex<Entries>,
}

impl StationCache {
    /// Open a cache over `store`, loading whatever it already holds.
    pub fn open(
        config: StationCacheConfig,
        store: impl StationStore + 'static,
    ) -> Result<Self, StationCacheError> {
        let mut entries = Entries::from_snapshot(store.load()?);
        let evicted = entries.evict_to(config.capacity);
        if evicted > 0 {
            warn!(evicted, capacity = config.capacity, "Loaded cache exceeded capacity");
        }
        info!(stations = entries.by_id.len(), "Opened station cache");

        Ok(Self {
            config,
            store: Box::new(store),
            entries: Mutex::new(entries),
        })
    }

    /// A cache that lives only as long as the process.
    pub fn in_memory(config: StationCacheConfig) -> Self {
        Self {
            config,
            store: Box::new(MemoryStore),
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn config(&self) -> &StationCacheConfig {
        &self.config
    }

    /// Insert or replace stations by id, stamping each with the current time.
    pub async fn upsert(&self, stations: Vec<Station>) -> Result<(), StationCacheError> {
        self.upsert_at(stations, Utc::now()).await
    }

    /// Insert or replace stations by id, stamping each with `now`.
    ///
    /// Later stations in the batch count as more recent than earlier ones,
    /// so a duplicate id within the batch resolves to its last occurrence.
    pub async fn upsert_at(
        &self,
        stations: Vec<Station>,
        now: DateTime<Utc>,
    ) -> Result<(), StationCacheError> {
        if stations.is_empty() {
            return Ok(());
        }
        let incoming = stations.len();

        let mut current = self.entries.lock().await;
        let mut next = current.clone();
        for mut station in stations {
            station.cached_at = Some(now);
            next.insert(station);
        }
        let evicted = next.evict_to(self.config.capacity);

        self.store.save(&next.snapshot())?;
        *current = next;

        debug!(incoming, evicted, total = current.by_id.len(), "Upserted stations");
        Ok(())
    }

    /// Cached stations, most recently cached first.
    pub async fn query(&self, include_stale: bool) -> Vec<Station> {
        self.query_at(include_stale, Utc::now()).await
    }

    pub async fn query_at(&self, include_stale: bool, now: DateTime<Utc>) -> Vec<Station> {
        let entries = self.entries.lock().await;
        entries
            .ordered()
            .into_iter()
            .rev()
            .filter(|e| include_stale || !self.is_stale(&e.station, now))
            .map(|e| e.station.clone())
            .collect()
    }

    /// Cached stations within `radius_km` of `center`, nearest first.
    pub async fn query_near(
        &self,
        center: Coordinate,
        radius_km: f64,
        include_stale: bool,
    ) -> Vec<Station> {
        self.query_near_at(center, radius_km, include_stale, Utc::now())
            .await
    }

    pub async fn query_near_at(
        &self,
        center: Coordinate,
        radius_km: f64,
        include_stale: bool,
        now: DateTime<Utc>,
    ) -> Vec<Station> {
        let mut near: Vec<(f64, Station)> = self
            .query_at(include_stale, now)
            .await
            .into_iter()
            .map(|s| (s.distance_km_from(&center), s))
            .filter(|(d, _)| *d <= radius_km)
            .collect();
        near.sort_by(|a, b| a.0.total_cmp(&b.0));
        near.into_iter().map(|(_, s)| s).collect()
    }

    /// Remove every entry.
    pub async fn invalidate_all(&self) -> Result<(), StationCacheError> {
        let mut current = self.entries.lock().await;
        self.store.save(&[])?;
        let removed = current.by_id.len();
        *current = Entries::default();

        info!(removed, "Invalidated station cache");
        Ok(())
    }

    /// Remove stale entries, returning how many were dropped.
    pub async fn invalidate_stale(&self) -> Result<usize, StationCacheError> {
        self.invalidate_stale_at(Utc::now()).await
    }

    pub async fn invalidate_stale_at(&self, now: DateTime<Utc>) -> Result<usize, StationCacheError> {
        let mut current = self.entries.lock().await;
        let mut next = current.clone();
        next.by_id.retain(|_, e| !self.is_stale(&e.station, now));
        let removed = current.by_id.len() - next.by_id.len();
        if removed == 0 {
            return Ok(0);
        }

        self.store.save(&next.snapshot())?;
        *current = next;

        info!(removed, "Dropped stale stations");
        Ok(removed)
    }

    pub async fn stats(&self) -> CacheStats {
        self.stats_at(Utc::now()).await
    }

    pub async fn stats_at(&self, now: DateTime<Utc>) -> CacheStats {
        let entries = self.entries.lock().await;
        let stale = entries
            .by_id
            .values()
            .filter(|e| self.is_stale(&e.station, now))
            .count();
        let times = || entries.by_id.values().filter_map(|e| e.station.cached_at);

        CacheStats {
            total: entries.by_id.len(),
            valid: entries.by_id.len() - stale,
            stale,
            oldest: times().min(),
            newest: times().max(),
        }
    }

    /// Whether any non-stale station is cached.
    pub async fn has_valid(&self) -> bool {
        self.has_valid_at(Utc::now()).await
    }

    pub async fn has_valid_at(&self, now: DateTime<Utc>) -> bool {
        let entries = self.entries.lock().await;
        entries
            .by_id
            .values()
            .any(|e| !self.is_stale(&e.station, now))
    }

    fn is_stale(&self, station: &Station, now: DateTime<Utc>) -> bool {
        match station.cached_at {
            Some(cached_at) => now - cached_at > self.config.stale_after,
            None => true,
        }
    }
}
