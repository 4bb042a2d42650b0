//! Centralized constants for the delivery-locator crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters (WGS84 approximation)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

    /// Sentinel used for address fields the provider could not fill
    pub const UNKNOWN_PLACE: &str = "Unknown";
}

/// External API endpoints
pub mod api {
    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// User agent sent to external services
    pub const USER_AGENT: &str = concat!("delivery-locator/", env!("CARGO_PKG_VERSION"));
}

/// Storage file names
pub mod storage {
    /// Application directory name (for XDG paths)
    pub const APP_DIR_NAME: &str = "delivery-locator";

    /// Persisted location state file name
    pub const LOCATION_STATE_FILE: &str = "location.json";

    /// Cached IP fix file name
    pub const IP_FIX_CACHE_FILE: &str = "ip_fix_cache.json";
}
