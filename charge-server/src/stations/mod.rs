//! Local station cache.
//!
//! Remembers stations seen in directory responses so the app can still
//! show something when the directory is unreachable. Bounded in size and
//! aged out after a day.

mod cache;
mod error;
mod store;

pub use cache::{
    CacheStats, DEFAULT_CAPACITY, DEFAULT_STALE_AFTER_HOURS, StationCache, StationCacheConfig,
};
pub use error::StationCacheError;
pub use store::{JsonFileStore, MemoryStore, StationStore};
