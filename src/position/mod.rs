//! Device position sources
//!
//! A `PositionSource` answers "where is this device right now" with a single
//! suspending call. Hosts without GPS get an IP-based approximation or a
//! user-supplied fix; `DevicePosition` picks one from config.

pub mod fixed;
pub mod ip;

use crate::config::{Config, PositionConfig};
use crate::coord::Coordinate;
use crate::error::{Error, ResolutionError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Knobs passed through to the position source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    /// Upper bound before the request must fail with `Timeout`
    pub timeout: Duration,
    /// A cached fix no older than this may be returned
    pub max_cached_age: Duration,
    /// Hint that a precise fix is preferred over a fast one
    pub high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(crate::config::defaults::DEFAULT_POSITION_TIMEOUT_MS),
            max_cached_age: Duration::from_millis(crate::config::defaults::DEFAULT_MAX_CACHED_AGE_MS),
            high_accuracy: false,
        }
    }
}

impl From<&PositionConfig> for PositionOptions {
    fn from(config: &PositionConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            max_cached_age: Duration::from_millis(config.max_cached_age_ms),
            high_accuracy: config.high_accuracy,
        }
    }
}

/// Trait for device position sources
///
/// Implementations must be thread-safe (Send + Sync) so a resolver can run
/// them on a spawned task.
pub trait PositionSource: Send + Sync {
    /// Get the current position
    ///
    /// Fails with `Unsupported`, `PermissionDenied`, `PositionUnavailable`
    /// or `Timeout`.
    fn get_current_position(
        &self,
        options: PositionOptions,
    ) -> impl std::future::Future<Output = std::result::Result<Coordinate, ResolutionError>> + Send;
}

/// Which position source to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Approximate position from the public IP address
    Ip,
    /// Coordinates supplied by the user
    Fixed,
    /// No geolocation capability
    None,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ip => write!(f, "ip"),
            Self::Fixed => write!(f, "fixed"),
            Self::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ip" => Ok(Self::Ip),
            "fixed" | "manual" => Ok(Self::Fixed),
            "none" | "disabled" => Ok(Self::None),
            _ => Err(format!("Unknown position source: {}", s)),
        }
    }
}

/// The configured position capability of this host
#[derive(Debug)]
pub enum DevicePosition {
    Ip(ip::IpPositionSource),
    Fixed(fixed::FixedPositionSource),
    Unsupported,
    /// The user has withheld permission; no source is consulted
    Denied,
}

impl DevicePosition {
    /// Build the source named in `[position]`
    pub fn from_config(config: &Config) -> Result<Self> {
        let position = &config.position;

        if !position.permission_granted {
            return Ok(Self::Denied);
        }

        match position.source {
            SourceKind::Ip => Ok(Self::Ip(ip::IpPositionSource::new())),
            SourceKind::Fixed => {
                let (Some(lat), Some(lng)) = (position.lat, position.lng) else {
                    return Err(Error::Config(
                        "position.source = \"fixed\" requires position.lat and position.lng".to_string(),
                    ));
                };
                Ok(Self::Fixed(fixed::FixedPositionSource::new(Coordinate::try_new(lat, lng)?)))
            }
            SourceKind::None => Ok(Self::Unsupported),
        }
    }

    /// A fixed source, bypassing config (CLI `--lat/--lng`)
    pub fn fixed(coordinate: Coordinate) -> Self {
        Self::Fixed(fixed::FixedPositionSource::new(coordinate))
    }
}

impl PositionSource for DevicePosition {
    async fn get_current_position(&self, options: PositionOptions) -> std::result::Result<Coordinate, ResolutionError> {
        match self {
            Self::Ip(source) => source.get_current_position(options).await,
            Self::Fixed(source) => source.get_current_position(options).await,
            Self::Unsupported => Err(ResolutionError::unsupported(
                "No geolocation capability is configured on this host",
            )),
            Self::Denied => Err(ResolutionError::permission_denied(
                "Location permission has not been granted",
            )),
        }
    }
}
