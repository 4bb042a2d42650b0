//! HTTP reverse-geocoding gateway
//!
//! Request: `GET {base_url}/geocode?lat={lat}&lon={lon}&key={key}&limit=1`
//! Response: `{"results": [{"components": {"city", "town", "state", "country"}, "formatted"}]}`
//!
//! Any provider (or the marketplace's API proxy) that speaks this shape can
//! sit behind `base_url`.

use crate::config::GeocodingConfig;
use crate::constants::api::USER_AGENT;
use crate::constants::geo::UNKNOWN_PLACE;
use crate::coord::Coordinate;
use crate::error::{Error, ResolutionError, Result};
use crate::geo::{AddressDetails, GeocodingGateway};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Reverse geocoder over HTTP
#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    components: Components,
    #[serde(default)]
    formatted: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Components {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl HttpGeocoder {
    /// Create a geocoder for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a geocoder from the `[geocoding]` config section
    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Whether both an endpoint and a key are set
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }

    fn request_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/geocode?lat={}&lon={}&key={}&limit=1",
            self.base_url,
            coordinate.lat,
            coordinate.lng,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Map the first result to address details, defaulting each missing field
    fn to_address(response: GeocodeResponse, coordinate: Coordinate) -> std::result::Result<AddressDetails, ResolutionError> {
        let first = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ResolutionError::network("Geocoder returned no results"))?;

        let components = first.components;
        let or_unknown = |value: Option<String>| value.unwrap_or_else(|| UNKNOWN_PLACE.to_string());

        Ok(AddressDetails {
            city: or_unknown(
                non_empty(components.city)
                    .or_else(|| non_empty(components.town))
                    .or_else(|| non_empty(components.village)),
            ),
            state: or_unknown(non_empty(components.state)),
            country: or_unknown(non_empty(components.country)),
            formatted_address: non_empty(first.formatted)
                .unwrap_or_else(|| coordinate.to_decimal_string()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl GeocodingGateway for HttpGeocoder {
    async fn reverse_geocode(&self, coordinate: Coordinate) -> std::result::Result<AddressDetails, ResolutionError> {
        if !self.is_configured() {
            return Err(ResolutionError::network("Geocoding endpoint or API key not configured"));
        }

        debug!(lat = coordinate.lat, lng = coordinate.lng, "Reverse geocoding");

        let response = self
            .client
            .get(self.request_url(coordinate))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ResolutionError::network(format!("Geocoder request timed out: {}", e))
                } else {
                    ResolutionError::network(format!("Geocoder request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(ResolutionError::network(format!(
                "Geocoder returned status: {}",
                response.status()
            )));
        }

        let parsed: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| ResolutionError::network(format!("Failed to parse geocoder response: {}", e)))?;

        Self::to_address(parsed, coordinate)
    }
}
