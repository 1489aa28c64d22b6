//! # Projectile Engine
//!
//! Projectile kinematics and fixed-step trajectory integration: closed-form
//! drag-free motion, Euler/RK4 stepping with quadratic drag and wind,
//! fixed-count resampling for renderers, and flight metrics.

// Re-export the main types and functions
pub use analytical::AnalyticalSolver;
pub use error::{ProjectileError, Result};
pub use integrator::{IntegrationMethod, NumericalIntegrator, Simulation, Termination};
pub use metrics::{MetricsExtractor, TrajectoryMetrics};
pub use monte_carlo::{run_batch, run_monte_carlo, FieldStatistics, MonteCarloParams, MonteCarloResults};
pub use params::SimulationParameters;
pub use sampling::{TrajectorySampler, VectorKind, VectorSample};
pub use solver::{TrajectoryResult, TrajectorySolver};
pub use state::{EnergyState, KinematicState};
pub use wind::WindConditions;

// Module declarations
pub mod constants;
mod analytical;
mod error;
mod integrator;
mod metrics;
mod monte_carlo;
mod params;
mod sampling;
mod solver;
mod state;
mod wind;
