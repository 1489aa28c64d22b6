// Solver facade - owns one parameter set plus the engine configuration
use log::debug;
use serde::Serialize;

use crate::analytical::AnalyticalSolver;
use crate::error::Result;
use crate::integrator::{IntegrationMethod, NumericalIntegrator, Simulation};
use crate::metrics::TrajectoryMetrics;
use crate::params::SimulationParameters;
use crate::sampling::{TrajectorySampler, VectorKind, VectorSample};
use crate::state::KinematicState;

// Trajectory result
#[derive(Debug, Clone, Serialize)]
pub struct TrajectoryResult {
    pub metrics: TrajectoryMetrics,
    pub analytical: Option<TrajectoryMetrics>, // closed-form reference when drag is off
    pub simulation: Simulation,
    pub sampled_points: Option<Vec<KinematicState>>, // evenly resampled run
}

// Trajectory solver
#[derive(Debug, Clone)]
pub struct TrajectorySolver {
    params: SimulationParameters,
    integrator: NumericalIntegrator,
    sample_count: Option<usize>,
}

impl TrajectorySolver {
    pub fn new(params: SimulationParameters) -> Self {
        Self {
            params,
            integrator: NumericalIntegrator::default(),
            sample_count: None,
        }
    }

    pub fn set_method(&mut self, method: IntegrationMethod) {
        self.integrator = NumericalIntegrator::new(method)
            .with_max_iterations(self.integrator.max_iterations());
    }

    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        self.integrator = self.integrator.with_max_iterations(max_iterations);
    }

    pub fn set_time_step(&mut self, step: f64) {
        self.params.time_step = step;
    }

    pub fn set_sample_count(&mut self, count: Option<usize>) {
        self.sample_count = count;
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn integrator(&self) -> &NumericalIntegrator {
        &self.integrator
    }

    pub fn sampler(&self) -> TrajectorySampler {
        TrajectorySampler::new(self.integrator)
    }

    /// Validate, integrate and summarise
    pub fn solve(&self) -> Result<TrajectoryResult> {
        self.params.validate()?;

        let simulation = self.integrator.integrate(&self.params);
        let metrics = simulation.metrics()?;

        let analytical = if self.params.has_drag() {
            None
        } else {
            Some(AnalyticalSolver::from_params(&self.params).metrics())
        };

        let sampled_points = match self.sample_count {
            Some(n) => Some(TrajectorySampler::resample(&simulation.states, n)?),
            None => None,
        };

        debug!(
            "solved: range={:.3} m, max_height={:.3} m, tof={:.3} s",
            metrics.range, metrics.max_height, metrics.time_of_flight
        );

        Ok(TrajectoryResult {
            metrics,
            analytical,
            simulation,
            sampled_points,
        })
    }

    /// Validated [`TrajectorySampler::sample`]
    pub fn sample(&self, n: usize) -> Result<Vec<KinematicState>> {
        self.params.validate()?;
        self.sampler().sample(&self.params, n)
    }

    /// Validated [`TrajectorySampler::vector_samples`]
    pub fn vector_samples(&self, k: usize, kind: VectorKind) -> Result<Vec<VectorSample>> {
        self.params.validate()?;
        self.sampler().vector_samples(&self.params, k, kind)
    }

    /// Validated [`TrajectorySampler::sample_with_vectors`]
    pub fn sample_with_vectors(
        &self,
        n: usize,
        k: usize,
        kind: VectorKind,
    ) -> Result<(Vec<KinematicState>, Vec<VectorSample>)> {
        self.params.validate()?;
        self.sampler().sample_with_vectors(&self.params, n, k, kind)
    }
}
