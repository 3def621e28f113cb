//! Durable backends for the station cache.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::Station;

use super::error::StationCacheError;

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// Persistence for the full cache snapshot.
///
/// `save` replaces the whole snapshot; it either succeeds completely or
/// leaves the previous snapshot in place.
pub trait StationStore: Send + Sync {
    /// Load the persisted snapshot, oldest entry first.
    fn load(&self) -> Result<Vec<Station>, StationCacheError>;

    /// Replace the persisted snapshot, oldest entry first.
    fn save(&self, stations: &[Station]) -> Result<(), StationCacheError>;
}

/// Store that keeps nothing beyond the process lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStore;

impl StationStore for MemoryStore {
    fn load(&self) -> Result<Vec<Station>, StationCacheError> {
        Ok(Vec::new())
    }

    fn save(&self, _stations: &[Station]) -> Result<(), StationCacheError> {
        Ok(())
    }
}

/// Snapshot file contents.
#[derive(Debug, Serialize, Deserialize)]
struct CachedStations {
    version: u32,
    stations: Vec<Station>,
}

/// JSON file store.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so readers never observe a half-written snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "stations".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StationStore for JsonFileStore {
    /// A missing file is an empty cache; an unreadable one is an error.
    fn load(&self) -> Result<Vec<Station>, StationCacheError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StationCacheError::storage(format!(
                    "failed to read cache file: {e}"
                )));
            }
        };

        let cached: CachedStations = serde_json::from_str(&contents)
            .map_err(|e| StationCacheError::storage(format!("failed to parse cache file: {e}")))?;

        if cached.version != FORMAT_VERSION {
            return Err(StationCacheError::storage(format!(
                "unsupported cache file version {}",
                cached.version
            )));
        }

        Ok(cached.stations)
    }

    fn save(&self, stations: &[Station]) -> Result<(), StationCacheError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                StationCacheError::storage(format!("failed to create cache directory: {e}"))
            })?;
        }

        let snapshot = CachedStations {
            version: FORMAT_VERSION,
            stations: stations.to_vec(),
        };
        let json = serde_json::to_string(&snapshot)
            .map_err(|e| StationCacheError::storage(format!("failed to serialize cache: {e}")))?;

        let temp = self.temp_path();
        std::fs::write(&temp, json)
            .map_err(|e| StationCacheError::storage(format!("failed to write cache file: {e}")))?;
        std::fs::rename(&temp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&temp);
            StationCacheError::storage(format!("failed to replace cache file: {e}"))
        })?;

        Ok(())
    }
}
