//! Application configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::directory::{DEFAULT_BASE_URL, DirectoryConfig};
use crate::stations::{DEFAULT_CAPACITY, StationCacheConfig};

/// Default HTTP listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default directory request timeout in seconds.
const DEFAULT_DIRECTORY_TIMEOUT_SECS: u64 = 30;

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {variable}: {value:?} ({reason})")]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
    pub reason: String,
}

/// Settings for the whole server.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub directory_base_url: String,
    pub directory_timeout_secs: u64,
    pub bind_addr: SocketAddr,

    /// JSON file backing the station cache. `None` keeps it in memory.
    pub station_cache_path: Option<PathBuf>,
    pub station_cache_capacity: usize,

    pub vehicle_catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_key: get("OCM_API_KEY"),
            directory_base_url: get("OCM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            directory_timeout_secs: parse_or(
                "DIRECTORY_TIMEOUT_SECS",
                get("DIRECTORY_TIMEOUT_SECS"),
                DEFAULT_DIRECTORY_TIMEOUT_SECS,
            )?,
            bind_addr: parse_or(
                "CHARGE_BIND_ADDR",
                get("CHARGE_BIND_ADDR"),
                SocketAddr::from(([127, 0, 0, 1], 3000)),
            )?,
            station_cache_path: get("STATION_CACHE_PATH").map(PathBuf::from),
            station_cache_capacity: parse_or(
                "STATION_CACHE_CAPACITY",
                get("STATION_CACHE_CAPACITY"),
                DEFAULT_CAPACITY,
            )?,
            vehicle_catalog_path: get("VEHICLE_CATALOG_PATH").map(PathBuf::from),
        })
    }

    pub fn directory(&self) -> DirectoryConfig {
        DirectoryConfig::new(self.api_key.clone())
            .with_base_url(&self.directory_base_url)
            .with_timeout(self.directory_timeout_secs)
    }

    pub fn station_cache(&self) -> StationCacheConfig {
        StationCacheConfig::default().with_capacity(self.station_cache_capacity)
    }
}

fn parse_or<T>(variable: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError {
            variable,
            reason: e.to_string(),
            value,
        }),
    }
}
