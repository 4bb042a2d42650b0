//! Error types for delivery-locator

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for delivery-locator operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid service area: {0}")]
    InvalidServiceArea(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Location store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Location unavailable: {0}")]
    Resolution(#[from] ResolutionError),
}

/// Result type alias for delivery-locator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why a resolution attempt (or one of its steps) failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionErrorKind {
    /// The host exposes no geolocation capability at all
    Unsupported,
    /// The user withheld location permission
    PermissionDenied,
    /// The platform could not determine a fix
    PositionUnavailable,
    /// No fix arrived within the configured timeout
    Timeout,
    /// The reverse-geocoding provider could not be reached or answered badly
    NetworkFailure,
}

impl ResolutionErrorKind {
    /// Whether this failure ends the attempt.
    ///
    /// Only geocoding failures are absorbed (the record degrades instead).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::NetworkFailure)
    }
}

impl std::fmt::Display for ResolutionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "unsupported"),
            Self::PermissionDenied => write!(f, "permission_denied"),
            Self::PositionUnavailable => write!(f, "position_unavailable"),
            Self::Timeout => write!(f, "timeout"),
            Self::NetworkFailure => write!(f, "network_failure"),
        }
    }
}

/// Terminal outcome of a failed step, never mutated once produced
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct ResolutionError {
    pub kind: ResolutionErrorKind,
    pub message: String,
}

impl ResolutionError {
    pub fn new(kind: ResolutionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ResolutionErrorKind::Unsupported, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ResolutionErrorKind::PermissionDenied, message)
    }

    pub fn position_unavailable(message: impl Into<String>) -> Self {
        Self::new(ResolutionErrorKind::PositionUnavailable, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ResolutionErrorKind::Timeout, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ResolutionErrorKind::NetworkFailure, message)
    }
}
