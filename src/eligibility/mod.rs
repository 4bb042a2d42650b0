//! Delivery eligibility
//!
//! Decides whether a coordinate falls inside the configured service area.
//! The service area is either a circle (center + radius, tested with
//! haversine distance) or a polygon (tested with ray casting, longitude as
//! x and latitude as y). Evaluation is pure: no I/O, same input, same
//! verdict.

use crate::coord::distance::is_in_circle;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Geographic region that receives deliveries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ServiceArea {
    /// Everything within `radius_meters` of `center`
    Radius {
        radius_meters: f64,
        center: Coordinate,
    },
    /// Everything inside a closed ring of vertices (first vertex need not be repeated)
    Polygon { vertices: Vec<Coordinate> },
}

impl ServiceArea {
    /// Circular service area
    pub fn radius(center: Coordinate, radius_meters: f64) -> Self {
        Self::Radius {
            center,
            radius_meters,
        }
    }

    /// Polygonal service area
    pub fn polygon(vertices: Vec<Coordinate>) -> Self {
        Self::Polygon { vertices }
    }

    /// Shape name as used in config ("radius" or "polygon")
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Radius { .. } => "radius",
            Self::Polygon { .. } => "polygon",
        }
    }

    /// Check the area is usable
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Radius {
                center,
                radius_meters,
            } => {
                center
                    .validate()
                    .map_err(|e| Error::InvalidServiceArea(format!("center: {}", e)))?;
                if !radius_meters.is_finite() || *radius_meters <= 0.0 {
                    return Err(Error::InvalidServiceArea(format!(
                        "radius must be positive, got {}",
                        radius_meters
                    )));
                }
            }
            Self::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(Error::InvalidServiceArea(format!(
                        "polygon needs at least 3 vertices, got {}",
                        vertices.len()
                    )));
                }
                for (i, vertex) in vertices.iter().enumerate() {
                    vertex
                        .validate()
                        .map_err(|e| Error::InvalidServiceArea(format!("vertex {}: {}", i, e)))?;
                }
            }
        }
        Ok(())
    }
}

/// Result of testing a coordinate against the service area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryVerdict {
    pub within_service_area: bool,
}

/// Evaluate a coordinate against a service area
pub fn evaluate(coordinate: Coordinate, area: &ServiceArea) -> DeliveryVerdict {
    let within_service_area = match area {
        ServiceArea::Radius {
            center,
            radius_meters,
        } => is_in_circle(coordinate, *center, *radius_meters),
        ServiceArea::Polygon { vertices } => point_in_polygon(coordinate, vertices),
    };

    DeliveryVerdict {
        within_service_area,
    }
}

/// Even-odd ray casting; fewer than 3 vertices is never "inside"
fn point_in_polygon(point: Coordinate, vertices: &[Coordinate]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let (x, y) = (point.lng, point.lat);
    let mut inside = false;
    let mut j = vertices.len() - 1;

    for i in 0..vertices.len() {
        let (xi, yi) = (vertices[i].lng, vertices[i].lat);
        let (xj, yj) = (vertices[j].lng, vertices[j].lat);

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}
