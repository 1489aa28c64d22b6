use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Position, velocity and acceleration of the projectile at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    pub t: f64,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub acceleration: Vector3<f64>,
}

impl KinematicState {
    pub fn new(
        t: f64,
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        acceleration: Vector3<f64>,
    ) -> Self {
        Self {
            t,
            position,
            velocity,
            acceleration,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Component-wise linear blend, `frac = 0` gives `self`, `1` gives `other`
    pub fn lerp(&self, other: &KinematicState, frac: f64) -> KinematicState {
        KinematicState {
            t: self.t + (other.t - self.t) * frac,
            position: self.position.lerp(&other.position, frac),
            velocity: self.velocity.lerp(&other.velocity, frac),
            acceleration: self.acceleration.lerp(&other.acceleration, frac),
        }
    }
}

/// Mechanical energy of the projectile at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyState {
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

impl EnergyState {
    /// Energy of `state` for a projectile of `mass` under `gravity`,
    /// with potential measured from ground level
    pub fn of(state: &KinematicState, mass: f64, gravity: f64) -> Self {
        let kinetic = 0.5 * mass * state.velocity.norm_squared();
        let potential = mass * gravity * state.position.y;
        Self {
            kinetic,
            potential,
            total: kinetic + potential,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn state(t: f64, y: f64, vy: f64) -> KinematicState {
        KinematicState::new(
            t,
            Vector3::new(t * 2.0, y, 0.0),
            Vector3::new(2.0, vy, 0.0),
            Vector3::new(0.0, -9.8, 0.0),
        )
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = state(0.0, 1.0, 4.0);
        let b = state(1.0, 3.0, -2.0);
        let mid = a.lerp(&b, 0.5);

        assert_relative_eq!(mid.t, 0.5);
        assert_relative_eq!(mid.position.x, 1.0);
        assert_relative_eq!(mid.position.y, 2.0);
        assert_relative_eq!(mid.velocity.y, 1.0);
        assert_relative_eq!(mid.acceleration.y, -9.8);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = state(0.0, 1.0, 4.0);
        let b = state(1.0, 3.0, -2.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_relative_eq!(a.lerp(&b, 1.0).position.y, b.position.y);
    }

    #[test]
    fn test_energy_split() {
        let s = state(0.0, 2.0, 0.0);
        let e = EnergyState::of(&s, 3.0, 10.0);

        assert_relative_eq!(e.kinetic, 0.5 * 3.0 * 4.0);
        assert_relative_eq!(e.potential, 60.0);
        assert_relative_eq!(e.total, 66.0);
    }
}
