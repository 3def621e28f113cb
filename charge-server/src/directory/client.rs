//! Open Charge Map HTTP client.
//!
//! Provides async methods for querying the directory and converting its
//! records to domain stations.

use chrono::Utc;
use tracing::debug;

use crate::domain::Station;

use super::convert::convert_records;
use super::error::DirectoryError;
use super::provider::{NearbyQuery, StationProvider};

/// Default base URL for the directory's POI endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openchargemap.io/v3/poi/";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the directory client.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// API key, sent as the `key` query parameter. Anonymous access works
    /// with lower rate limits.
    pub api_key: Option<String>,
    /// Base URL for the POI endpoint
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectoryConfig {
    /// Create a new config with an optional API key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Directory API client.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl DirectoryClient {
    /// Create a new directory client with the given configuration.
    pub fn new(config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    /// Fetch stations around a point.
    ///
    /// Records the directory returns but that cannot be normalized are
    /// skipped; only transport, status and payload-shape failures are errors.
    pub async fn fetch_nearby(&self, query: &NearbyQuery) -> Result<Vec<Station>, DirectoryError> {
        let records = self.get_records(&self.nearby_params(query)).await?;
        let stations = convert_records(records, Utc::now());

        debug!(
            lat = query.center.latitude,
            lon = query.center.longitude,
            radius_km = query.radius_km,
            count = stations.len(),
            "Fetched nearby stations"
        );

        Ok(stations)
    }

    /// Fetch a single station by its numeric directory id.
    ///
    /// Returns `Ok(None)` when the directory has no such record or it
    /// cannot be normalized.
    pub async fn fetch_station(&self, directory_id: i64) -> Result<Option<Station>, DirectoryError> {
        let mut params = vec![
            ("chargepointid", directory_id.to_string()),
            ("output", "json".to_string()),
            ("compact", "false".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }

        let records = self.get_records(&params).await?;
        Ok(convert_records(records, Utc::now()).into_iter().next())
    }

    /// Query parameters for a nearby search.
    fn nearby_params(&self, query: &NearbyQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("output", "json".to_string()),
            ("latitude", query.center.latitude.to_string()),
            ("longitude", query.center.longitude.to_string()),
            ("distance", query.radius_km.to_string()),
            ("distanceunit", "km".to_string()),
            ("maxresults", query.max_results.to_string()),
            ("compact", "false".to_string()),
            ("verbose", "false".to_string()),
        ];

        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }

        if !query.connectors.is_empty() {
            let codes = query
                .connectors
                .iter()
                .map(|c| c.directory_code().to_string())
                .collect::<Vec<_>>()
                .join(",");
            params.push(("connectiontypeid", codes));
        }

        params
    }

    /// GET the POI endpoint and decode the top-level JSON array.
    ///
    /// Records stay as raw JSON values so a single malformed record can be
    /// skipped without failing the whole response.
    async fn get_records(
        &self,
        params: &[(&'static str, String)],
    ) -> Result<Vec<serde_json::Value>, DirectoryError> {
        let response = self.http.get(&self.base_url).query(params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Http {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| DirectoryError::Decode {
            message: e.to_string(),
        })
    }
}

impl StationProvider for DirectoryClient {
    async fn fetch_nearby(&self, query: &NearbyQuery) -> Result<Vec<Station>, DirectoryError> {
        DirectoryClient::fetch_nearby(self, query).await
    }
}
