//! Resolved location records

use crate::coord::Coordinate;
use crate::eligibility::{evaluate, DeliveryVerdict, ServiceArea};
use crate::geo::AddressDetails;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How much of a record came from the reverse geocoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionQuality {
    /// Place names came from a successful reverse-geocoding call
    Full,
    /// Only the coordinate is known
    Degraded,
}

impl std::fmt::Display for ResolutionQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Degraded => write!(f, "degraded"),
        }
    }
}

/// Outcome of one successful resolution attempt
///
/// Immutable once built; the next attempt produces a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub coordinate: Coordinate,
    pub city: String,
    pub state: String,
    pub country: String,
    pub formatted_address: String,
    pub resolution_quality: ResolutionQuality,
    pub resolved_at: DateTime<Utc>,
}

impl LocationRecord {
    /// Record backed by geocoder output
    pub fn full(coordinate: Coordinate, address: AddressDetails) -> Self {
        Self {
            coordinate,
            city: address.city,
            state: address.state,
            country: address.country,
            formatted_address: address.formatted_address,
            resolution_quality: ResolutionQuality::Full,
            resolved_at: Utc::now(),
        }
    }

    /// Coordinates-only record
    pub fn degraded(coordinate: Coordinate) -> Self {
        let address = AddressDetails::unknown(coordinate);
        Self {
            resolution_quality: ResolutionQuality::Degraded,
            ..Self::full(coordinate, address)
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.resolution_quality == ResolutionQuality::Degraded
    }
}

/// A record together with its delivery verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub record: LocationRecord,
    pub verdict: DeliveryVerdict,
}

impl Resolution {
    /// Attach a freshly computed verdict to `record`
    pub fn evaluate(record: LocationRecord, area: &ServiceArea) -> Self {
        let verdict = evaluate(record.coordinate, area);
        Self { record, verdict }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_record() {
        let record = LocationRecord::degraded(Coordinate::new(12.9716, 77.5946));

        assert!(record.is_degraded());
        assert_eq!(record.city, "Unknown");
        assert_eq!(record.state, "Unknown");
        assert_eq!(record.country, "Unknown");
        assert_eq!(record.formatted_address, "12.9716, 77.5946");
    }

    #[test]
    fn test_record_serialization() {
        let record = LocationRecord::full(
            Coordinate::new(12.9716, 77.5946),
            AddressDetails {
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                country: "India".to_string(),
                formatted_address: "Bengaluru, Karnataka, India".to_string(),
            },
        );

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"resolution_quality\":\"full\""));

        let parsed: LocationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_resolution_verdict_follows_area() {
        let record = LocationRecord::degraded(Coordinate::new(0.05, 0.0));

        let near = ServiceArea::radius(Coordinate::new(0.0, 0.0), 10_000.0);
        let far = ServiceArea::radius(Coordinate::new(45.0, 45.0), 10_000.0);

        assert!(Resolution::evaluate(record.clone(), &near).verdict.within_service_area);
        assert!(!Resolution::evaluate(record, &far).verdict.within_service_area);
    }
}
