//! Fixed-step trajectory integration with optional quadratic drag.
//!
//! Each step evaluates gravity plus drag against the air-relative velocity
//! `v - wind`, advances velocity first and then position with the updated
//! velocity. The run stops at ground impact, at `max_time`, or at the
//! iteration cap, whichever comes first. A ground crossing is resolved by
//! blending the last two samples so the final sample sits exactly at `y = 0`.

use log::{debug, trace, warn};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_ITERATIONS, INITIAL_STATE_CAPACITY, NUMERICAL_TOLERANCE};
use crate::error::Result;
use crate::metrics::{MetricsExtractor, TrajectoryMetrics};
use crate::params::SimulationParameters;
use crate::state::{EnergyState, KinematicState};

/// Stepping scheme used by [`NumericalIntegrator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegrationMethod {
    /// `v += a·dt`, then `p += v·dt`
    #[default]
    Euler,
    /// Classic fourth-order Runge-Kutta on the same force model
    Rk4,
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    GroundImpact,
    MaxTime,
    IterationLimit,
    /// Nothing was integrated (bad step, bad time bound, or below ground)
    Degenerate,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::GroundImpact => "ground_impact",
            Termination::MaxTime => "max_time",
            Termination::IterationLimit => "iteration_limit",
            Termination::Degenerate => "degenerate",
        }
    }
}

/// A completed run: kinematic samples with parallel energy samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub states: Vec<KinematicState>,
    pub energies: Vec<EnergyState>,
    pub termination: Termination,
}

impl Simulation {
    fn degenerate() -> Self {
        Self {
            states: Vec::new(),
            energies: Vec::new(),
            termination: Termination::Degenerate,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn last(&self) -> Option<&KinematicState> {
        self.states.last()
    }

    pub fn metrics(&self) -> Result<TrajectoryMetrics> {
        MetricsExtractor::extract(&self.states, &self.energies)
    }
}

/// Explicit fixed-step integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericalIntegrator {
    method: IntegrationMethod,
    max_iterations: usize,
}

impl Default for NumericalIntegrator {
    fn default() -> Self {
        Self::new(IntegrationMethod::default())
    }
}

impl NumericalIntegrator {
    pub fn new(method: IntegrationMethod) -> Self {
        Self {
            method,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn method(&self) -> IntegrationMethod {
        self.method
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Gravity plus quadratic drag against the air-relative velocity
    pub fn acceleration(params: &SimulationParameters, velocity: &Vector3<f64>) -> Vector3<f64> {
        let gravity = Vector3::new(0.0, -params.gravity, 0.0);
        let k = params.drag_factor();
        if k == 0.0 {
            return gravity;
        }

        let v_rel = velocity - params.wind;
        gravity - v_rel * (k * v_rel.norm())
    }

    /// Advance `(position, velocity)` by one step of `dt`
    fn advance(
        &self,
        params: &SimulationParameters,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        dt: f64,
    ) -> (Vector3<f64>, Vector3<f64>) {
        match self.method {
            IntegrationMethod::Euler => {
                let a = Self::acceleration(params, velocity);
                let v = velocity + a * dt;
                let p = position + v * dt;
                (p, v)
            }
            IntegrationMethod::Rk4 => {
                // The force model has no explicit position or time dependence,
                // so each stage only needs the trial velocity.
                let h2 = 0.5 * dt;

                let k1_v = Self::acceleration(params, velocity);
                let k1_p = *velocity;

                let v2 = velocity + k1_v * h2;
                let k2_v = Self::acceleration(params, &v2);
                let k2_p = v2;

                let v3 = velocity + k2_v * h2;
                let k3_v = Self::acceleration(params, &v3);
                let k3_p = v3;

                let v4 = velocity + k3_v * dt;
                let k4_v = Self::acceleration(params, &v4);
                let k4_p = v4;

                let v = velocity + (k1_v + k2_v * 2.0 + k3_v * 2.0 + k4_v) * (dt / 6.0);
                let p = position + (k1_p + k2_p * 2.0 + k3_p * 2.0 + k4_p) * (dt / 6.0);
                (p, v)
            }
        }
    }

    /// Run one simulation to completion
    ///
    /// Does not validate `params`; a non-positive step or time bound, or a
    /// launch below ground, produces an empty [`Simulation`].
    pub fn integrate(&self, params: &SimulationParameters) -> Simulation {
        let dt = params.time_step;
        let max_time = params.max_time;

        if !(dt > 0.0 && dt.is_finite()) || !(max_time > 0.0) {
            debug!("skipping run: time_step={dt}, max_time={max_time}");
            return Simulation::degenerate();
        }

        let position = params.launch_position();
        if !(position.y >= 0.0) {
            debug!("skipping run: launch height {} is below ground", position.y);
            return Simulation::degenerate();
        }

        let velocity = params.launch_velocity();
        let mut current = KinematicState::new(
            0.0,
            position,
            velocity,
            Self::acceleration(params, &velocity),
        );

        // Reserve for a typical flight only; long runs grow on demand.
        let expected = ((max_time / dt).ceil() as usize)
            .saturating_add(2)
            .min(self.max_iterations.saturating_add(2))
            .min(INITIAL_STATE_CAPACITY);
        let mut states = Vec::with_capacity(expected);
        let mut energies = Vec::with_capacity(expected);

        debug!(
            "integrating {:?}: v0={} m/s, angle={} deg, dt={dt}, max_time={max_time}, drag={}",
            self.method,
            params.initial_velocity,
            params.angle_degrees,
            params.has_drag()
        );

        states.push(current);
        energies.push(EnergyState::of(&current, params.mass, params.gravity));

        let mut steps = 0usize;
        let termination = loop {
            if steps >= self.max_iterations {
                warn!(
                    "iteration cap of {} reached at t={:.6}s before impact",
                    self.max_iterations, current.t
                );
                break Termination::IterationLimit;
            }

            // Time from the step count, so long runs do not accumulate drift.
            let t_next = (steps + 1) as f64 * dt;
            if t_next > max_time + NUMERICAL_TOLERANCE {
                break Termination::MaxTime;
            }

            let (p, v) = self.advance(params, &current.position, &current.velocity, dt);
            let next = KinematicState::new(t_next, p, v, Self::acceleration(params, &v));
            steps += 1;

            if next.position.y < 0.0 {
                let impact = ground_crossing(&current, &next);
                if impact.t <= current.t + NUMERICAL_TOLERANCE {
                    // Impact coincides with the previous sample.
                    states.pop();
                    energies.pop();
                }
                states.push(impact);
                energies.push(EnergyState::of(&impact, params.mass, params.gravity));
                break Termination::GroundImpact;
            }

            states.push(next);
            energies.push(EnergyState::of(&next, params.mass, params.gravity));
            current = next;
        };

        debug!(
            "run finished after {steps} steps with {} samples ({})",
            states.len(),
            termination.as_str()
        );

        Simulation {
            states,
            energies,
            termination,
        }
    }
}

/// Blend the last sample above ground with the first one below it
fn ground_crossing(above: &KinematicState, below: &KinematicState) -> KinematicState {
    let y_prev = above.position.y;
    let y_cur = below.position.y;
    let denom = y_prev - y_cur;
    let frac = if denom > 0.0 { y_prev / denom } else { 0.0 };

    let mut impact = above.lerp(below, frac);
    impact.position.y = 0.0;
    trace!("ground crossing at t={:.6}s (fraction {frac:.4})", impact.t);
    impact
}
