use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Horizontal wind described by speed and heading
///
/// The heading is the direction the wind blows TO, measured in the
/// horizontal x-z plane: 0 blows down-range (+x, a tailwind for a launch
/// towards +x), PI blows back at the launcher (headwind), PI/2 blows
/// across the range towards +z.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindConditions {
    pub speed: f64,     // m/s
    pub direction: f64, // radians
}

impl WindConditions {
    pub fn new(speed: f64, direction: f64) -> Self {
        Self { speed, direction }
    }

    /// Build from a heading given in degrees
    pub fn from_degrees(speed: f64, direction_deg: f64) -> Self {
        Self::new(speed, direction_deg.to_radians())
    }

    /// Wind velocity vector consumed by the integrator
    pub fn to_vector(&self) -> Vector3<f64> {
        if self.speed.is_nan() || self.direction.is_nan() {
            return Vector3::zeros();
        }

        Vector3::new(
            self.speed * self.direction.cos(),
            0.0,
            self.speed * self.direction.sin(),
        )
    }
}
