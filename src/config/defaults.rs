//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default position source
pub const DEFAULT_POSITION_SOURCE: &str = "ip";

/// Default upper bound on acquiring a position, in milliseconds
pub const DEFAULT_POSITION_TIMEOUT_MS: u64 = 10_000;

/// Default age of a cached fix that may be reused, in milliseconds (5 minutes)
pub const DEFAULT_MAX_CACHED_AGE_MS: u64 = 5 * 60 * 1000;

/// Default per-request timeout for the reverse geocoder, in seconds
pub const DEFAULT_GEOCODING_TIMEOUT_SECS: u64 = 5;

/// Default service area center (Bengaluru)
pub const DEFAULT_SERVICE_CENTER_LAT: f64 = 12.9716;
pub const DEFAULT_SERVICE_CENTER_LNG: f64 = 77.5946;

/// Default service area radius in meters
pub const DEFAULT_SERVICE_RADIUS_METERS: f64 = 10_000.0;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Default static asset directory served by `serve`
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";
