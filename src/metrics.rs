use serde::{Deserialize, Serialize};

use crate::error::{ProjectileError, Result};
use crate::state::{EnergyState, KinematicState};

/// Summary of a completed flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryMetrics {
    pub range: f64,                // m, x of the last sample
    pub max_height: f64,           // m
    pub time_of_flight: f64,       // s
    pub time_to_apex: f64,         // s
    pub apex_distance: f64,        // m, x at the apex
    pub impact_velocity: f64,      // m/s
    pub impact_angle_degrees: f64, // negative when descending
    pub impact_energy: Option<f64>, // J, kinetic, when an energy series was given
}

/// Derives [`TrajectoryMetrics`] from a sampled run
pub struct MetricsExtractor;

impl MetricsExtractor {
    /// Summarise `states`; `energies` may be empty or parallel to `states`
    ///
    /// Ties for the highest point resolve to the earliest sample.
    pub fn extract(states: &[KinematicState], energies: &[EnergyState]) -> Result<TrajectoryMetrics> {
        let last = states
            .last()
            .ok_or_else(|| ProjectileError::degenerate("no samples to summarise"))?;

        let apex = states
            .iter()
            .fold(&states[0], |best, s| if s.position.y > best.position.y { s } else { best });

        let impact_energy = if energies.len() == states.len() {
            energies.last().map(|e| e.kinetic)
        } else {
            None
        };

        Ok(TrajectoryMetrics {
            range: last.position.x,
            max_height: apex.position.y,
            time_of_flight: last.t,
            time_to_apex: apex.t,
            apex_distance: apex.position.x,
            impact_velocity: last.velocity.norm(),
            impact_angle_degrees: last.velocity.y.atan2(last.velocity.x).to_degrees(),
            impact_energy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn sample(t: f64, x: f64, y: f64, vx: f64, vy: f64) -> KinematicState {
        KinematicState::new(
            t,
            Vector3::new(x, y, 0.0),
            Vector3::new(vx, vy, 0.0),
            Vector3::new(0.0, -9.8, 0.0),
        )
    }

    #[test]
    fn test_empty_run_is_degenerate() {
        let err = MetricsExtractor::extract(&[], &[]).unwrap_err();
        assert!(matches!(err, ProjectileError::DegenerateRun(_)));
    }

    #[test]
    fn test_basic_summary() {
        let states = vec![
            sample(0.0, 0.0, 0.0, 3.0, 4.0),
            sample(0.5, 1.5, 1.2, 3.0, 0.0),
            sample(1.0, 3.0, 0.0, 3.0, -3.0),
        ];
        let metrics = MetricsExtractor::extract(&states, &[]).unwrap();

        assert_relative_eq!(metrics.range, 3.0);
        assert_relative_eq!(metrics.max_height, 1.2);
        assert_relative_eq!(metrics.time_of_flight, 1.0);
        assert_relative_eq!(metrics.time_to_apex, 0.5);
        assert_relative_eq!(metrics.apex_distance, 1.5);
        assert_relative_eq!(metrics.impact_velocity, 18f64.sqrt());
        assert_relative_eq!(metrics.impact_angle_degrees, -45.0);
        assert_eq!(metrics.impact_energy, None);
    }

    #[test]
    fn test_impact_energy_from_series() {
        let states = vec![sample(0.0, 0.0, 0.0, 3.0, 4.0), sample(1.0, 3.0, 0.0, 3.0, -4.0)];
        let energies: Vec<EnergyState> = states.iter().map(|s| EnergyState::of(s, 2.0, 9.8)).collect();
        let metrics = MetricsExtractor::extract(&states, &energies).unwrap();

        assert_eq!(metrics.impact_energy, Some(25.0));
    }

    #[test]
    fn test_first_apex_wins_ties() {
        let states = vec![
            sample(0.0, 0.0, 2.0, 0.0, 0.0),
            sample(0.1, 0.0, 2.0, 0.0, 0.0),
            sample(0.2, 0.0, 0.0, 0.0, -2.0),
        ];
        let metrics = MetricsExtractor::extract(&states, &[]).unwrap();
        assert_eq!(metrics.time_to_apex, 0.0);
    }

    #[test]
    fn test_single_point() {
        let states = vec![sample(0.0, 0.0, 0.0, 0.0, 0.0)];
        let metrics = MetricsExtractor::extract(&states, &[]).unwrap();

        assert_eq!(metrics.range, 0.0);
        assert_eq!(metrics.time_of_flight, 0.0);
        assert_eq!(metrics.impact_velocity, 0.0);
        assert!(metrics.impact_angle_degrees.is_finite());
    }
}
