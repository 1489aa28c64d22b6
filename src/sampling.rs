//! Fixed-count trajectory views for renderers.
//!
//! Drag-free launches are evaluated in closed form. Anything with drag is
//! integrated first and then linearly resampled onto an even time grid.
//! Either way the flight must land within `max_time`.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::analytical::AnalyticalSolver;
use crate::constants::{
    MIN_SAMPLE_INTERVALS, MIN_VECTOR_SAMPLES, MIN_VELOCITY_THRESHOLD, NUMERICAL_TOLERANCE,
};
use crate::error::{ProjectileError, Result};
use crate::integrator::{NumericalIntegrator, Termination};
use crate::params::SimulationParameters;
use crate::state::KinematicState;

/// Which derivative an arrow visualises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VectorKind {
    Velocity,
    Acceleration,
}

/// One arrow: anchored at the projectile, unit direction plus length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorSample {
    pub t: f64,
    pub origin: Vector3<f64>,
    pub direction: Vector3<f64>,
    pub magnitude: f64,
}

impl VectorSample {
    fn from_vector(t: f64, origin: Vector3<f64>, vector: Vector3<f64>) -> Self {
        let magnitude = vector.norm();
        if magnitude > MIN_VELOCITY_THRESHOLD {
            Self {
                t,
                origin,
                direction: vector / magnitude,
                magnitude,
            }
        } else {
            Self {
                t,
                origin,
                direction: Vector3::zeros(),
                magnitude: 0.0,
            }
        }
    }
}

/// A landed flight, ready to be cut into even samples
enum Flight {
    Closed {
        solver: AnalyticalSolver,
        time_of_flight: f64,
    },
    Integrated(Vec<KinematicState>),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrajectorySampler {
    integrator: NumericalIntegrator,
}

impl TrajectorySampler {
    pub fn new(integrator: NumericalIntegrator) -> Self {
        Self { integrator }
    }

    /// `n + 1` evenly spaced states from launch to ground impact
    ///
    /// `n` is raised to at least 1, so at least two states come back. The
    /// last state always sits on the ground; a flight that does not land
    /// within `max_time` is a [`ProjectileError::DegenerateRun`].
    pub fn sample(&self, params: &SimulationParameters, n: usize) -> Result<Vec<KinematicState>> {
        let flight = self.flight(params)?;
        Self::even_states(&flight, n)
    }

    /// Reshape an existing run onto `n + 1` evenly spaced times
    pub fn resample(states: &[KinematicState], n: usize) -> Result<Vec<KinematicState>> {
        let n = n.max(MIN_SAMPLE_INTERVALS);
        let (first, last) = match (states.first(), states.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ProjectileError::degenerate("no samples to resample")),
        };

        let start = first.t;
        let span = last.t - start;

        let samples = (0..=n)
            .map(|i| {
                if i == n {
                    *last
                } else {
                    interpolate(states, start + span * i as f64 / n as f64)
                }
            })
            .collect();

        Ok(samples)
    }

    /// `k` arrows (at least 2) spread evenly over the flight
    pub fn vector_samples(
        &self,
        params: &SimulationParameters,
        k: usize,
        kind: VectorKind,
    ) -> Result<Vec<VectorSample>> {
        let flight = self.flight(params)?;
        Self::arrows(&flight, k, kind)
    }

    /// [`sample`](Self::sample) and [`vector_samples`](Self::vector_samples)
    /// from a single flight
    pub fn sample_with_vectors(
        &self,
        params: &SimulationParameters,
        n: usize,
        k: usize,
        kind: VectorKind,
    ) -> Result<(Vec<KinematicState>, Vec<VectorSample>)> {
        let flight = self.flight(params)?;
        Ok((Self::even_states(&flight, n)?, Self::arrows(&flight, k, kind)?))
    }

    fn flight(&self, params: &SimulationParameters) -> Result<Flight> {
        if params.has_drag() {
            let simulation = self.integrator.integrate(params);
            if simulation.termination != Termination::GroundImpact {
                return Err(ProjectileError::degenerate(format!(
                    "flight did not land ({})",
                    simulation.termination.as_str()
                )));
            }
            return Ok(Flight::Integrated(simulation.states));
        }

        let solver = AnalyticalSolver::from_params(params);
        let time_of_flight = solver.time_of_flight();
        if !time_of_flight.is_finite() || time_of_flight < 0.0 {
            return Err(ProjectileError::degenerate(format!(
                "no ground impact for time of flight {time_of_flight}"
            )));
        }
        if time_of_flight > params.max_time + NUMERICAL_TOLERANCE {
            return Err(ProjectileError::degenerate(format!(
                "flight did not land (time of flight {time_of_flight:.3} s exceeds max_time {} s)",
                params.max_time
            )));
        }

        Ok(Flight::Closed {
            solver,
            time_of_flight,
        })
    }

    fn even_states(flight: &Flight, n: usize) -> Result<Vec<KinematicState>> {
        let n = n.max(MIN_SAMPLE_INTERVALS);

        match flight {
            Flight::Integrated(states) => Self::resample(states, n),
            Flight::Closed {
                solver,
                time_of_flight,
            } => Ok((0..=n)
                .map(|i| {
                    let t = if i == n {
                        *time_of_flight
                    } else {
                        time_of_flight * i as f64 / n as f64
                    };
                    let mut state = solver.state(t);
                    if i == n || state.position.y < 0.0 {
                        state.position.y = 0.0;
                    }
                    state
                })
                .collect()),
        }
    }

    fn arrows(flight: &Flight, k: usize, kind: VectorKind) -> Result<Vec<VectorSample>> {
        let k = k.max(MIN_VECTOR_SAMPLES);
        let states = Self::even_states(flight, k - 1)?;

        Ok(states
            .iter()
            .map(|s| {
                let vector = match kind {
                    VectorKind::Velocity => s.velocity,
                    VectorKind::Acceleration => s.acceleration,
                };
                VectorSample::from_vector(s.t, s.position, vector)
            })
            .collect())
    }
}

/// State at time `t`, clamped to the ends of the run
fn interpolate(states: &[KinematicState], t: f64) -> KinematicState {
    let first = &states[0];
    let last = &states[states.len() - 1];

    if t <= first.t {
        return *first;
    }
    if t >= last.t {
        return *last;
    }

    // Binary search for the bracketing interval
    let mut left = 0;
    let mut right = states.len() - 1;

    while right - left > 1 {
        let mid = (left + right) / 2;
        if states[mid].t <= t {
            left = mid;
        } else {
            right = mid;
        }
    }

    let a = &states[left];
    let b = &states[right];
    let dt = b.t - a.t;
    if dt.abs() < f64::EPSILON {
        return *a;
    }

    let mut state = a.lerp(b, (t - a.t) / dt);
    state.t = t;
    state
}
