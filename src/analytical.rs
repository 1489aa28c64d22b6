//! Closed-form, drag-free projectile motion.
//!
//! Nothing here validates its inputs; callers go through
//! [`SimulationParameters::validate`](crate::SimulationParameters::validate)
//! first when they care.

use nalgebra::Vector3;

use crate::metrics::TrajectoryMetrics;
use crate::params::SimulationParameters;
use crate::state::{EnergyState, KinematicState};

/// Exact vacuum trajectory for a launch from `(0, h0, 0)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticalSolver {
    pub initial_velocity: f64, // m/s
    pub angle_degrees: f64,    // degrees
    pub gravity: f64,          // m/s²
    pub initial_height: f64,   // m
}

impl AnalyticalSolver {
    pub fn new(initial_velocity: f64, angle_degrees: f64, gravity: f64, initial_height: f64) -> Self {
        Self {
            initial_velocity,
            angle_degrees,
            gravity,
            initial_height,
        }
    }

    pub fn from_params(params: &SimulationParameters) -> Self {
        Self::new(
            params.initial_velocity,
            params.angle_degrees,
            params.gravity,
            params.initial_height,
        )
    }

    fn vx(&self) -> f64 {
        self.initial_velocity * self.angle_degrees.to_radians().cos()
    }

    fn vy(&self) -> f64 {
        self.initial_velocity * self.angle_degrees.to_radians().sin()
    }

    pub fn position(&self, t: f64) -> Vector3<f64> {
        Vector3::new(
            self.vx() * t,
            self.initial_height + self.vy() * t - 0.5 * self.gravity * t * t,
            0.0,
        )
    }

    pub fn velocity(&self, t: f64) -> Vector3<f64> {
        Vector3::new(self.vx(), self.vy() - self.gravity * t, 0.0)
    }

    pub fn acceleration(&self) -> Vector3<f64> {
        Vector3::new(0.0, -self.gravity, 0.0)
    }

    pub fn state(&self, t: f64) -> KinematicState {
        KinematicState::new(t, self.position(t), self.velocity(t), self.acceleration())
    }

    pub fn energy(&self, t: f64, mass: f64) -> EnergyState {
        EnergyState::of(&self.state(t), mass, self.gravity)
    }

    /// Time until the projectile returns to `y = 0`
    pub fn time_of_flight(&self) -> f64 {
        let vy = self.vy();
        (vy + (vy * vy + 2.0 * self.gravity * self.initial_height).sqrt()) / self.gravity
    }

    pub fn range(&self) -> f64 {
        self.vx() * self.time_of_flight()
    }

    pub fn max_height(&self) -> f64 {
        let vy = self.vy();
        self.initial_height + vy * vy / (2.0 * self.gravity)
    }

    /// Zero for a horizontal launch, where the launch point is the apex
    pub fn time_to_apex(&self) -> f64 {
        self.vy().max(0.0) / self.gravity
    }

    /// Closed-form summary of the whole flight
    pub fn metrics(&self) -> TrajectoryMetrics {
        let time_of_flight = self.time_of_flight();
        let time_to_apex = self.time_to_apex();
        let impact = self.velocity(time_of_flight);

        TrajectoryMetrics {
            range: self.range(),
            max_height: self.max_height(),
            time_of_flight,
            time_to_apex,
            apex_distance: self.vx() * time_to_apex,
            impact_velocity: impact.norm(),
            impact_angle_degrees: impact.y.atan2(impact.x).to_degrees(),
            impact_energy: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_classic_45_degree_launch() {
        let solver = AnalyticalSolver::new(10.0, 45.0, 9.8, 0.0);

        assert!((solver.range() - 10.2).abs() < 0.05);
        assert!((solver.max_height() - 2.55).abs() < 0.05);
        assert!((solver.time_of_flight() - 1.44).abs() < 0.05);
    }

    #[test]
    fn test_vertical_launch() {
        let solver = AnalyticalSolver::new(15.0, 90.0, 9.8, 0.0);

        assert!(solver.range().abs() < 1e-9);
        for i in 0..10 {
            assert!(solver.position(i as f64 * 0.3).x.abs() < 1e-9);
        }
        assert_relative_eq!(solver.max_height(), 15.0 * 15.0 / (2.0 * 9.8), epsilon = 1e-9);
    }

    #[test]
    fn test_lands_at_ground() {
        let solver = AnalyticalSolver::new(12.0, 30.0, 9.81, 3.0);
        let tof = solver.time_of_flight();

        assert!(solver.position(tof).y.abs() < 1e-9);
        assert!(solver.position(tof * 0.5).y > 0.0);
    }

    #[test]
    fn test_zero_velocity_from_height() {
        let solver = AnalyticalSolver::new(0.0, 45.0, 9.8, 4.9);

        assert_relative_eq!(solver.time_of_flight(), 1.0, epsilon = 1e-12);
        assert_eq!(solver.range(), 0.0);
        assert_relative_eq!(solver.max_height(), 4.9);
        assert_eq!(solver.time_to_apex(), 0.0);
    }

    #[test]
    fn test_zero_velocity_on_ground() {
        let solver = AnalyticalSolver::new(0.0, 0.0, 9.8, 0.0);
        assert_eq!(solver.time_of_flight(), 0.0);
        assert_eq!(solver.range(), 0.0);
    }

    #[test]
    fn test_metrics_are_symmetric_from_ground() {
        let metrics = AnalyticalSolver::new(20.0, 60.0, 9.81, 0.0).metrics();

        assert_relative_eq!(metrics.time_to_apex * 2.0, metrics.time_of_flight, epsilon = 1e-9);
        assert_relative_eq!(metrics.apex_distance * 2.0, metrics.range, epsilon = 1e-9);
        assert_relative_eq!(metrics.impact_velocity, 20.0, epsilon = 1e-9);
        assert_relative_eq!(metrics.impact_angle_degrees, -60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_energy_is_constant() {
        let solver = AnalyticalSolver::new(18.0, 40.0, 9.81, 1.5);
        let e0 = solver.energy(0.0, 2.0).total;
        let tof = solver.time_of_flight();

        for i in 1..=20 {
            let e = solver.energy(tof * i as f64 / 20.0, 2.0).total;
            assert_relative_eq!(e, e0, max_relative = 1e-10);
        }
    }
}
