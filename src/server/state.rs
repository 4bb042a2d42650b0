//! Server shared state
//!
//! Holds configuration and the resolver shared by all handlers.

use crate::config::Config;
use crate::error::Result;
use crate::position::DevicePosition;
use crate::resolver::DeviceResolver;
use crate::store::FileLocationStore;
use std::time::Instant;

/// Resolver type the server runs with
pub type ServerResolver = DeviceResolver<FileLocationStore>;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// The one resolver every request goes through
    pub resolver: ServerResolver,

    started_at: Instant,
}

impl AppState {
    /// Create application state from config
    pub fn new(config: Config) -> Result<Self> {
        let position = DevicePosition::from_config(&config)?;
        let store = FileLocationStore::from_option(config.store.path.as_deref())?;
        let resolver = DeviceResolver::from_config(&config, position, store)?;
        Ok(Self::with_resolver(config, resolver))
    }

    /// Create application state around an existing resolver
    pub fn with_resolver(config: Config, resolver: ServerResolver) -> Self {
        Self {
            config,
            resolver,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
