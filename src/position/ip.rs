//! IP-based position
//!
//! Uses ip-api.com to approximate the device position, with a file-based
//! cache of the last fix. A cached fix is reused while it is younger than
//! the caller's `max_cached_age`.

use crate::constants::api::{IP_API_URL, USER_AGENT};
use crate::constants::storage::{APP_DIR_NAME, IP_FIX_CACHE_FILE};
use crate::coord::Coordinate;
use crate::error::ResolutionError;
use crate::position::{PositionOptions, PositionSource};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// IP position source with caching
#[derive(Debug)]
pub struct IpPositionSource {
    client: reqwest::Client,
    endpoint: String,
    cache_path: Option<PathBuf>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    message: Option<String>,
}

/// Cached fix
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedFix {
    coordinate: Coordinate,
    /// Unix time in milliseconds
    timestamp: i64,
}

impl IpPositionSource {
    /// Create an IP source with the default cache path
    pub fn new() -> Self {
        let cache_path = dirs::cache_dir().map(|p| p.join(APP_DIR_NAME).join(IP_FIX_CACHE_FILE));

        Self {
            client: Self::build_client(),
            endpoint: IP_API_URL.to_string(),
            cache_path,
        }
    }

    /// Create an IP source with a specific cache path
    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self {
            client: Self::build_client(),
            endpoint: IP_API_URL.to_string(),
            cache_path: Some(cache_path),
        }
    }

    /// Create an IP source without caching
    pub fn without_cache() -> Self {
        Self {
            client: Self::build_client(),
            endpoint: IP_API_URL.to_string(),
            cache_path: None,
        }
    }

    /// Point the source at another ip-api compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_client() -> reqwest::Client {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default()
    }

    /// Fetch a fresh fix from the IP API
    async fn fetch_fix(&self, timeout: Duration) -> Result<Coordinate, ResolutionError> {
        let response = self
            .client
            .get(&self.endpoint)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ResolutionError::timeout(format!("IP location request timed out: {}", e))
                } else {
                    ResolutionError::position_unavailable(format!("IP location request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(ResolutionError::position_unavailable(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response.json().await.map_err(|e| {
            ResolutionError::position_unavailable(format!("Failed to parse IP location response: {}", e))
        })?;

        if data.status != "success" {
            let reason = data.message.unwrap_or_else(|| "unknown reason".to_string());
            return Err(ResolutionError::position_unavailable(format!(
                "IP location lookup failed: {}",
                reason
            )));
        }

        let (Some(lat), Some(lng)) = (data.lat, data.lon) else {
            return Err(ResolutionError::position_unavailable("No coordinates in IP location response"));
        };

        let coordinate = Coordinate::new(lat, lng);
        coordinate
            .validate()
            .map_err(|e| ResolutionError::position_unavailable(e.to_string()))?;
        Ok(coordinate)
    }

    /// Load the cached fix if it is no older than `max_age`
    fn load_cache(&self, max_age: Duration) -> Option<Coordinate> {
        let cache_path = self.cache_path.as_ref()?;
        let content = fs::read_to_string(cache_path).ok()?;
        let cached: CachedFix = serde_json::from_str(&content).ok()?;

        let age_ms = chrono::Utc::now().timestamp_millis() - cached.timestamp;
        let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);

        if (0..=max_age_ms).contains(&age_ms) {
            Some(cached.coordinate)
        } else {
            None
        }
    }

    /// Save the fix to cache
    fn save_cache(&self, coordinate: Coordinate) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let cached = CachedFix {
            coordinate,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };

        if let Ok(content) = serde_json::to_string_pretty(&cached) {
            if let Err(e) = fs::write(cache_path, content) {
                debug!("Could not write IP fix cache {}: {}", cache_path.display(), e);
            }
        }
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        if let Some(cache_path) = &self.cache_path {
            let _ = fs::remove_file(cache_path);
        }
    }
}

impl Default for IpPositionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionSource for IpPositionSource {
    async fn get_current_position(&self, options: PositionOptions) -> Result<Coordinate, ResolutionError> {
        if options.high_accuracy {
            debug!("High accuracy requested; IP geolocation is city-level at best");
        }

        if let Some(cached) = self.load_cache(options.max_cached_age) {
            debug!("Using cached IP fix {}", cached);
            return Ok(cached);
        }

        let coordinate = self.fetch_fix(options.timeout).await?;
        self.save_cache(coordinate);
        Ok(coordinate)
    }
}
