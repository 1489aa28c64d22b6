//! Launch parameters for a single simulation run.

use std::fs;
use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ANGLE_DEGREES, DEFAULT_GRAVITY_MPS2, DEFAULT_INITIAL_VELOCITY, DEFAULT_MASS_KG,
    DEFAULT_MAX_TIME, DEFAULT_TIME_STEP, STANDARD_AIR_DENSITY,
};
use crate::error::{ProjectileError, Result};
use crate::wind::WindConditions;

/// Everything one run depends on
///
/// Values are SI: metres, seconds, kilograms, m/s. Every field has a default,
/// so a JSON parameter file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub initial_velocity: f64,     // m/s
    pub angle_degrees: f64,        // degrees above horizontal
    pub gravity: f64,              // m/s²
    pub mass: f64,                 // kg
    pub drag_coefficient: f64,     // Cd, dimensionless
    pub cross_sectional_area: f64, // m²
    pub initial_height: f64,       // m
    pub wind: Vector3<f64>,        // m/s
    pub air_density: f64,          // kg/m³
    pub time_step: f64,            // s
    pub max_time: f64,             // s
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_velocity: DEFAULT_INITIAL_VELOCITY,
            angle_degrees: DEFAULT_ANGLE_DEGREES,
            gravity: DEFAULT_GRAVITY_MPS2,
            mass: DEFAULT_MASS_KG,
            drag_coefficient: 0.0,
            cross_sectional_area: 0.0,
            initial_height: 0.0,
            wind: Vector3::zeros(),
            air_density: STANDARD_AIR_DENSITY,
            time_step: DEFAULT_TIME_STEP,
            max_time: DEFAULT_MAX_TIME,
        }
    }
}

impl SimulationParameters {
    /// Load a parameter file (JSON)
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_wind(mut self, wind: WindConditions) -> Self {
        self.wind = wind.to_vector();
        self
    }

    pub fn angle_radians(&self) -> f64 {
        self.angle_degrees.to_radians()
    }

    /// Launch velocity vector in the x-y plane
    pub fn launch_velocity(&self) -> Vector3<f64> {
        let theta = self.angle_radians();
        Vector3::new(
            self.initial_velocity * theta.cos(),
            self.initial_velocity * theta.sin(),
            0.0,
        )
    }

    pub fn launch_position(&self) -> Vector3<f64> {
        Vector3::new(0.0, self.initial_height, 0.0)
    }

    /// Whether the drag term contributes anything
    pub fn has_drag(&self) -> bool {
        self.drag_coefficient > 0.0 && self.cross_sectional_area > 0.0 && self.air_density > 0.0
    }

    /// ½·ρ·Cd·A / m, the factor in front of |v_rel|·v_rel
    pub fn drag_factor(&self) -> f64 {
        if !self.has_drag() || self.mass <= 0.0 {
            return 0.0;
        }
        0.5 * self.air_density * self.drag_coefficient * self.cross_sectional_area / self.mass
    }

    /// Reject parameters outside their physical range
    ///
    /// A zero launch speed is accepted (the projectile simply falls).
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("initial_velocity", self.initial_velocity),
            ("angle_degrees", self.angle_degrees),
            ("gravity", self.gravity),
            ("mass", self.mass),
            ("drag_coefficient", self.drag_coefficient),
            ("cross_sectional_area", self.cross_sectional_area),
            ("initial_height", self.initial_height),
            ("air_density", self.air_density),
            ("time_step", self.time_step),
            ("max_time", self.max_time),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(ProjectileError::invalid(name, value, "must be finite"));
            }
        }
        for (axis, value) in [("wind.x", self.wind.x), ("wind.y", self.wind.y), ("wind.z", self.wind.z)] {
            if !value.is_finite() {
                return Err(ProjectileError::invalid(axis, value, "must be finite"));
            }
        }

        if self.initial_velocity < 0.0 {
            return Err(ProjectileError::invalid(
                "initial_velocity",
                self.initial_velocity,
                "must not be negative",
            ));
        }
        if !(0.0..=90.0).contains(&self.angle_degrees) {
            return Err(ProjectileError::invalid(
                "angle_degrees",
                self.angle_degrees,
                "must lie in [0, 90]",
            ));
        }

        let positive = [
            ("gravity", self.gravity),
            ("mass", self.mass),
            ("time_step", self.time_step),
            ("max_time", self.max_time),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(ProjectileError::invalid(name, value, "must be positive"));
            }
        }

        let non_negative = [
            ("drag_coefficient", self.drag_coefficient),
            ("cross_sectional_area", self.cross_sectional_area),
            ("initial_height", self.initial_height),
            ("air_density", self.air_density),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(ProjectileError::invalid(name, value, "must not be negative"));
            }
        }

        Ok(())
    }
}
