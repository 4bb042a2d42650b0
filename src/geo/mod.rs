//! Reverse geocoding
//!
//! Turns coordinates into place names. Partial data from the provider is not
//! a failure: each missing field falls back to a sentinel. Transport and
//! payload problems surface as `NetworkFailure`, which the resolver absorbs.

pub mod http;

use crate::constants::geo::UNKNOWN_PLACE;
use crate::coord::Coordinate;
use crate::error::ResolutionError;
use serde::{Deserialize, Serialize};

/// Place names for a coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDetails {
    pub city: String,
    pub state: String,
    pub country: String,
    pub formatted_address: String,
}

impl AddressDetails {
    /// Address with every field set to its fallback
    pub fn unknown(coordinate: Coordinate) -> Self {
        Self {
            city: UNKNOWN_PLACE.to_string(),
            state: UNKNOWN_PLACE.to_string(),
            country: UNKNOWN_PLACE.to_string(),
            formatted_address: coordinate.to_decimal_string(),
        }
    }
}

/// Trait for reverse-geocoding providers
///
/// Implementations make a single attempt; retry policy belongs to the caller.
pub trait GeocodingGateway: Send + Sync {
    /// Reverse geocode coordinates to an address
    fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> impl std::future::Future<Output = Result<AddressDetails, ResolutionError>> + Send;
}
