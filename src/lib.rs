//! delivery-locator: location resolution and delivery eligibility
//!
//! A library and CLI tool that acquires the device position, turns it into a
//! human-readable address through a reverse-geocoding API, and decides
//! whether that point lies inside a configured delivery service area.
//!
//! ## Features
//!
//! - Position sources: IP geolocation, fixed coordinates
//! - Reverse geocoding with graceful fallback to coordinates-only records
//! - Single-flight resolver with observable state transitions
//! - Radius and polygon service areas
//! - Persisted last location and "setup skipped" flag
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use delivery_locator::coord::Coordinate;
//! use delivery_locator::eligibility::{evaluate, ServiceArea};
//!
//! let center = Coordinate::new(12.9716, 77.5946); // Bengaluru
//! let area = ServiceArea::radius(center, 10_000.0);
//!
//! let verdict = evaluate(Coordinate::new(12.98, 77.60), &area);
//! assert!(verdict.within_service_area);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod eligibility;
pub mod error;
pub mod format;
pub mod geo;
pub mod position;
pub mod record;
pub mod resolver;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinate;
pub use eligibility::{DeliveryVerdict, ServiceArea};
pub use error::{Error, ResolutionError, ResolutionErrorKind, Result};
pub use record::{LocationRecord, Resolution, ResolutionQuality};
pub use resolver::{LocationResolver, ResolverState};
