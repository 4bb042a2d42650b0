//! User-supplied position

use crate::coord::Coordinate;
use crate::error::ResolutionError;
use crate::position::{PositionOptions, PositionSource};

/// Always reports the same coordinate
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionSource {
    coordinate: Coordinate,
}

impl FixedPositionSource {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

impl PositionSource for FixedPositionSource {
    async fn get_current_position(&self, _options: PositionOptions) -> Result<Coordinate, ResolutionError> {
        Ok(self.coordinate)
    }
}
