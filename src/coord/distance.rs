//! Great-circle distance

use crate::constants::geo::EARTH_RADIUS_METERS;
use crate::coord::Coordinate;

/// Calculate the distance between two points in meters (Haversine formula)
///
/// # Arguments
/// * `p1` - First point
/// * `p2` - Second point
///
/// # Returns
/// Distance in meters
pub fn haversine_distance(p1: Coordinate, p2: Coordinate) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();
    let delta_lng = (p2.lng - p1.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Check if a point is within a circle
pub fn is_in_circle(point: Coordinate, center: Coordinate, radius_meters: f64) -> bool {
    haversine_distance(point, center) <= radius_meters
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);

        // One degree of arc on a 6371 km sphere
        assert_relative_eq!(haversine_distance(a, b), 111_194.9, max_relative = 1e-4);
    }

    #[test]
    fn test_haversine_symmetric_and_zero() {
        let a = Coordinate::new(12.9716, 77.5946);
        let b = Coordinate::new(13.0827, 80.2707);

        assert_eq!(haversine_distance(a, a), 0.0);
        assert_relative_eq!(haversine_distance(a, b), haversine_distance(b, a));
    }

    #[test]
    fn test_is_in_circle() {
        let center = Coordinate::new(40.7128, -74.0060);
        let radius = 1000.0;

        assert!(is_in_circle(center, center, radius));

        // ~440m north
        let inside = Coordinate::new(40.7128 + 0.004, -74.0060);
        assert!(is_in_circle(inside, center, radius));

        // ~2.2km north
        let outside = Coordinate::new(40.7128 + 0.02, -74.0060);
        assert!(!is_in_circle(outside, center, radius));
    }
}
