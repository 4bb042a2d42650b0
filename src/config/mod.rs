//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/delivery-locator/config.toml

pub mod defaults;

use crate::constants::storage::APP_DIR_NAME;
use crate::coord::Coordinate;
use crate::eligibility::ServiceArea;
use crate::error::{Error, Result};
use crate::position::SourceKind;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Device position settings
    #[serde(default)]
    pub position: PositionConfig,

    /// Reverse geocoding provider
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Delivery service area
    #[serde(default = "default_service_area")]
    pub service_area: ServiceArea,

    /// Persisted location state
    #[serde(default)]
    pub store: StoreConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Device position settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionConfig {
    /// Where positions come from: "ip", "fixed" or "none"
    #[serde(default = "default_position_source")]
    pub source: SourceKind,

    /// Latitude for the fixed source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    /// Longitude for the fixed source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,

    /// Give up acquiring a position after this many milliseconds
    #[serde(default = "default_position_timeout")]
    pub timeout_ms: u64,

    /// Reuse a cached fix no older than this many milliseconds
    #[serde(default = "default_max_cached_age")]
    pub max_cached_age_ms: u64,

    /// Prefer a precise fix over a fast one
    #[serde(default)]
    pub high_accuracy: bool,

    /// Whether the user allows location access
    #[serde(default = "default_true")]
    pub permission_granted: bool,
}

/// Reverse geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL; requests go to `{base_url}/geocode`
    #[serde(default)]
    pub base_url: String,

    /// Provider API key
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_secs: u64,
}

/// Persisted location state settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Explicit state file; defaults to the XDG data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of static assets served at `/`
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

// Default value functions for serde
fn default_position_source() -> SourceKind {
    DEFAULT_POSITION_SOURCE.parse().unwrap_or(SourceKind::Ip)
}
fn default_position_timeout() -> u64 {
    DEFAULT_POSITION_TIMEOUT_MS
}
fn default_max_cached_age() -> u64 {
    DEFAULT_MAX_CACHED_AGE_MS
}
fn default_true() -> bool {
    true
}
fn default_geocoding_timeout() -> u64 {
    DEFAULT_GEOCODING_TIMEOUT_SECS
}
fn default_service_area() -> ServiceArea {
    ServiceArea::radius(
        Coordinate::new(DEFAULT_SERVICE_CENTER_LAT, DEFAULT_SERVICE_CENTER_LNG),
        DEFAULT_SERVICE_RADIUS_METERS,
    )
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_static_dir() -> String {
    DEFAULT_STATIC_DIR.to_string()
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            source: default_position_source(),
            lat: None,
            lng: None,
            timeout_ms: default_position_timeout(),
            max_cached_age_ms: default_max_cached_age(),
            high_accuracy: false,
            permission_granted: true,
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            timeout_secs: default_geocoding_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for ServiceArea {
    fn default() -> Self {
        default_service_area()
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        self.service_area.validate()?;

        if self.position.source == SourceKind::Fixed {
            match (self.position.lat, self.position.lng) {
                (Some(lat), Some(lng)) => {
                    Coordinate::try_new(lat, lng)?;
                }
                _ => {
                    return Err(Error::Config(
                        "position.source = \"fixed\" requires position.lat and position.lng"
                            .to_string(),
                    ))
                }
            }
        }

        if self.position.timeout_ms == 0 {
            return Err(Error::Config("position.timeout_ms must be positive".to_string()));
        }

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["position", "source"] => Some(self.position.source.to_string()),
            ["position", "lat"] => self.position.lat.map(|v| v.to_string()),
            ["position", "lng"] => self.position.lng.map(|v| v.to_string()),
            ["position", "timeout_ms"] => Some(self.position.timeout_ms.to_string()),
            ["position", "max_cached_age_ms"] => Some(self.position.max_cached_age_ms.to_string()),
            ["position", "high_accuracy"] => Some(self.position.high_accuracy.to_string()),
            ["position", "permission_granted"] => {
                Some(self.position.permission_granted.to_string())
            }

            ["geocoding", "base_url"] => Some(self.geocoding.base_url.clone()),
            ["geocoding", "api_key"] => Some(self.geocoding.api_key.clone()),
            ["geocoding", "timeout_secs"] => Some(self.geocoding.timeout_secs.to_string()),

            ["service_area", "shape"] => Some(self.service_area.shape().to_string()),
            ["service_area", "radius_meters"] => match &self.service_area {
                ServiceArea::Radius { radius_meters, .. } => Some(radius_meters.to_string()),
                ServiceArea::Polygon { .. } => None,
            },
            ["service_area", "center_lat"] => match &self.service_area {
                ServiceArea::Radius { center, .. } => Some(center.lat.to_string()),
                ServiceArea::Polygon { .. } => None,
            },
            ["service_area", "center_lng"] => match &self.service_area {
                ServiceArea::Radius { center, .. } => Some(center.lng.to_string()),
                ServiceArea::Polygon { .. } => None,
            },

            ["store", "path"] => self.store.path.as_ref().map(|p| p.display().to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            ["server", "static_dir"] => Some(self.server.static_dir.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["position", "source"] => {
                self.position.source = value.parse().map_err(Error::Config)?;
            }
            ["position", "lat"] => {
                self.position.lat = Some(parse_value(value, "latitude")?);
            }
            ["position", "lng"] => {
                self.position.lng = Some(parse_value(value, "longitude")?);
            }
            ["position", "timeout_ms"] => {
                self.position.timeout_ms = parse_value(value, "timeout")?;
            }
            ["position", "max_cached_age_ms"] => {
                self.position.max_cached_age_ms = parse_value(value, "cache age")?;
            }
            ["position", "high_accuracy"] => {
                self.position.high_accuracy = parse_value(value, "boolean")?;
            }
            ["position", "permission_granted"] => {
                self.position.permission_granted = parse_value(value, "boolean")?;
            }

            ["geocoding", "base_url"] => {
                self.geocoding.base_url = value.to_string();
            }
            ["geocoding", "api_key"] => {
                self.geocoding.api_key = value.to_string();
            }
            ["geocoding", "timeout_secs"] => {
                self.geocoding.timeout_secs = parse_value(value, "timeout")?;
            }

            ["service_area", "radius_meters"] => {
                let radius: f64 = parse_value(value, "radius")?;
                match &mut self.service_area {
                    ServiceArea::Radius { radius_meters, .. } => *radius_meters = radius,
                    ServiceArea::Polygon { .. } => return Err(polygon_key_error(key)),
                }
            }
            ["service_area", "center_lat"] => {
                let lat: f64 = parse_value(value, "latitude")?;
                match &mut self.service_area {
                    ServiceArea::Radius { center, .. } => center.lat = lat,
                    ServiceArea::Polygon { .. } => return Err(polygon_key_error(key)),
                }
            }
            ["service_area", "center_lng"] => {
                let lng: f64 = parse_value(value, "longitude")?;
                match &mut self.service_area {
                    ServiceArea::Radius { center, .. } => center.lng = lng,
                    ServiceArea::Polygon { .. } => return Err(polygon_key_error(key)),
                }
            }

            ["store", "path"] => {
                self.store.path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = parse_value(value, "port")?;
            }
            ["server", "static_dir"] => {
                self.server.static_dir = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        self.validate()
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "position.source",
            "position.lat",
            "position.lng",
            "position.timeout_ms",
            "position.max_cached_age_ms",
            "position.high_accuracy",
            "position.permission_granted",
            "geocoding.base_url",
            "geocoding.api_key",
            "geocoding.timeout_secs",
            "service_area.shape",
            "service_area.radius_meters",
            "service_area.center_lat",
            "service_area.center_lng",
            "store.path",
            "server.host",
            "server.port",
            "server.static_dir",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", what, value)))
}

fn polygon_key_error(key: &str) -> Error {
    Error::Config(format!(
        "{} only applies to a radius service area; edit the polygon in the config file",
        key
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    fn with_temp_config<F: FnOnce()>(f: F) {
        let temp_dir = TempDir::new().unwrap();
        env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        f();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.position.source, SourceKind::Ip);
        assert_eq!(config.position.timeout_ms, 10_000);
        assert_eq!(config.position.max_cached_age_ms, 300_000);
        assert!(config.position.permission_granted);
        assert_eq!(config.geocoding.timeout_secs, 5);
        assert_eq!(config.service_area.shape(), "radius");
        assert_eq!(config.server.port, 7878);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("position.source"), Some("ip".to_string()));

        config.set("position.lat", "12.9716").unwrap();
        config.set("position.lng", "77.5946").unwrap();
        config.set("position.source", "fixed").unwrap();
        assert_eq!(config.get("position.source"), Some("fixed".to_string()));
        assert_eq!(config.position.lat, Some(12.9716));

        config.set("service_area.radius_meters", "5000").unwrap();
        assert_eq!(config.get("service_area.radius_meters"), Some("5000".to_string()));
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("position.timeout_ms", "soon").is_err());
        assert!(config.set("service_area.radius_meters", "-5").is_err());
        assert!(config.set("position.source", "gps").is_err());
    }

    #[test]
    fn test_fixed_source_requires_coordinates() {
        let mut config = Config::default();
        assert!(config.set("position.source", "fixed").is_err());
    }

    #[test]
    fn test_polygon_rejects_radius_keys() {
        let mut config = Config::default();
        config.service_area = ServiceArea::polygon(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 1.0),
        ]);

        assert_eq!(config.get("service_area.shape"), Some("polygon".to_string()));
        assert_eq!(config.get("service_area.radius_meters"), None);
        assert!(config.set("service_area.radius_meters", "100").is_err());
    }

    #[test]
    fn test_save_and_load() {
        with_temp_config(|| {
            let mut config = Config::default();
            config.geocoding.base_url = "https://geo.test".to_string();
            config.geocoding.api_key = "secret".to_string();
            config.save().unwrap();

            let loaded = Config::load().unwrap();
            assert_eq!(loaded.geocoding.base_url, "https://geo.test");
            assert_eq!(loaded.geocoding.api_key, "secret");
        });
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let loaded: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded.service_area, config.service_area);
        assert_eq!(loaded.position.timeout_ms, 10_000);
        assert_eq!(loaded.server.port, 7878);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [service_area]
            shape = "polygon"
            vertices = [
                { lat = 12.90, lng = 77.50 },
                { lat = 12.90, lng = 77.70 },
                { lat = 13.10, lng = 77.70 },
                { lat = 13.10, lng = 77.50 },
            ]
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.service_area.shape(), "polygon");
        assert_eq!(config.position.source, SourceKind::Ip);
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [service_area]
            shape = "radius"
            radius_meters = 0.0
            center = { lat = 0.0, lng = 0.0 }
            "#,
        )
        .unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7878");
    }

    #[test]
    fn test_available_keys() {
        let keys = Config::available_keys();
        assert!(keys.contains(&"position.source"));
        assert!(keys.contains(&"geocoding.api_key"));
        assert!(keys.contains(&"service_area.radius_meters"));
    }
}
