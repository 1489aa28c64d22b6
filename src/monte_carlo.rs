//! Parallel batch runs and launch-dispersion statistics.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{ProjectileError, Result};
use crate::integrator::NumericalIntegrator;
use crate::metrics::TrajectoryMetrics;
use crate::params::SimulationParameters;

/// Launch dispersion settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonteCarloParams {
    pub num_sims: usize,
    pub velocity_std: f64,  // m/s
    pub angle_std_deg: f64, // degrees
    pub seed: Option<u64>,  // fixed seed for reproducible runs
}

impl Default for MonteCarloParams {
    fn default() -> Self {
        Self {
            num_sims: 1000,
            velocity_std: 0.5,
            angle_std_deg: 1.0,
            seed: None,
        }
    }
}

/// Statistics for a single output field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStatistics {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub percentiles: Vec<(f64, f64)>, // (percentile, value) pairs
}

/// Results from Monte Carlo simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloResults {
    pub range: FieldStatistics,
    pub max_height: FieldStatistics,
    pub time_of_flight: FieldStatistics,
    pub impact_velocity: FieldStatistics,
    pub valid_runs: usize,
    pub failed_runs: usize,
}

/// Simulate independent parameter sets in parallel
///
/// One entry per input, in input order. Invalid parameter sets come back as
/// errors without affecting the others.
pub fn run_batch(
    params: &[SimulationParameters],
    integrator: &NumericalIntegrator,
) -> Vec<Result<TrajectoryMetrics>> {
    params
        .par_iter()
        .map(|p| {
            p.validate()?;
            integrator.integrate(p).metrics()
        })
        .collect()
}

/// Perturb launch speed and angle with normal noise and summarise the spread
pub fn run_monte_carlo(
    base: &SimulationParameters,
    mc: &MonteCarloParams,
    integrator: &NumericalIntegrator,
) -> Result<MonteCarloResults> {
    base.validate()?;
    if mc.num_sims == 0 {
        return Err(ProjectileError::invalid("num_sims", 0.0, "must be positive"));
    }

    for (name, std) in [("velocity_std", mc.velocity_std), ("angle_std", mc.angle_std_deg)] {
        if !(std >= 0.0 && std.is_finite()) {
            return Err(ProjectileError::invalid(name, std, "must be finite and non-negative"));
        }
    }

    let velocity_dist = Normal::new(base.initial_velocity, mc.velocity_std).map_err(|_| {
        ProjectileError::invalid("velocity_std", mc.velocity_std, "must be finite and non-negative")
    })?;
    let angle_dist = Normal::new(base.angle_degrees, mc.angle_std_deg).map_err(|_| {
        ProjectileError::invalid("angle_std", mc.angle_std_deg, "must be finite and non-negative")
    })?;

    let mut rng = match mc.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Draw sequentially so a seed fixes every run regardless of thread count.
    let samples: Vec<SimulationParameters> = (0..mc.num_sims)
        .map(|_| SimulationParameters {
            initial_velocity: velocity_dist.sample(&mut rng).max(0.0),
            angle_degrees: angle_dist.sample(&mut rng).clamp(0.0, 90.0),
            ..base.clone()
        })
        .collect();

    debug!("running {} dispersed trajectories", samples.len());
    let outcomes = run_batch(&samples, integrator);

    let valid: Vec<TrajectoryMetrics> = outcomes.into_iter().filter_map(|r| r.ok()).collect();
    let valid_runs = valid.len();
    let failed_runs = mc.num_sims - valid_runs;

    if valid.is_empty() {
        return Err(ProjectileError::degenerate("no successful simulations"));
    }

    info!("monte carlo: {valid_runs} valid runs, {failed_runs} failed");

    Ok(MonteCarloResults {
        range: field_statistics(valid.iter().map(|m| m.range).collect()),
        max_height: field_statistics(valid.iter().map(|m| m.max_height).collect()),
        time_of_flight: field_statistics(valid.iter().map(|m| m.time_of_flight).collect()),
        impact_velocity: field_statistics(valid.iter().map(|m| m.impact_velocity).collect()),
        valid_runs,
        failed_runs,
    })
}

/// Sample statistics; `values` must not be empty
fn field_statistics(mut values: Vec<f64>) -> FieldStatistics {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = if values.len() > 1 {
        values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)
    } else {
        0.0 // Single sample has no variance
    };

    let percentiles = [0.05, 0.25, 0.50, 0.75, 0.95]
        .iter()
        .map(|&p| (p, percentile(&values, p)))
        .collect();

    FieldStatistics {
        mean,
        std: variance.sqrt(),
        min: values[0],
        max: values[values.len() - 1],
        percentiles,
    }
}

/// Linear-interpolated percentile of sorted data
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = p * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytical::AnalyticalSolver;
    use approx::assert_relative_eq;

    fn seeded(num_sims: usize) -> MonteCarloParams {
        MonteCarloParams {
            num_sims,
            velocity_std: 0.5,
            angle_std_deg: 1.0,
            seed: Some(7),
        }
    }

    #[test]
    fn test_percentile() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 0.5), 3.0);
        assert_eq!(percentile(&values, 1.0), 5.0);
        assert_relative_eq!(percentile(&values, 0.125), 1.5);
        assert_eq!(percentile(&[4.2], 0.9), 4.2);
    }

    #[test]
    fn test_field_statistics() {
        let stats = field_statistics(vec![3.0, 1.0, 2.0]);
        assert_relative_eq!(stats.mean, 2.0);
        assert_relative_eq!(stats.std, 1.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.percentiles.len(), 5);
    }

    #[test]
    fn test_batch_preserves_order() {
        let params: Vec<SimulationParameters> = [10.0, 20.0, 30.0]
            .iter()
            .map(|&v| SimulationParameters {
                initial_velocity: v,
                ..Default::default()
            })
            .collect();
        let results = run_batch(&params, &NumericalIntegrator::default());

        let ranges: Vec<f64> = results.iter().map(|r| r.as_ref().unwrap().range).collect();
        assert!(ranges[0] < ranges[1] && ranges[1] < ranges[2]);
    }

    #[test]
    fn test_batch_reports_invalid_entries() {
        let params = vec![
            SimulationParameters::default(),
            SimulationParameters {
                mass: 0.0,
                ..Default::default()
            },
        ];
        let results = run_batch(&params, &NumericalIntegrator::default());

        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ProjectileError::InvalidParameter { .. })));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let base = SimulationParameters::default();
        let integrator = NumericalIntegrator::default();
        let a = run_monte_carlo(&base, &seeded(64), &integrator).unwrap();
        let b = run_monte_carlo(&base, &seeded(64), &integrator).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_spread_centres_on_nominal() {
        let base = SimulationParameters {
            time_step: 0.002,
            ..Default::default()
        };
        let nominal = AnalyticalSolver::from_params(&base).range();
        let results = run_monte_carlo(&base, &seeded(400), &NumericalIntegrator::default()).unwrap();

        assert_eq!(results.valid_runs, 400);
        assert_eq!(results.failed_runs, 0);
        assert!((results.range.mean - nominal).abs() < 1.0);
        assert!(results.range.std > 0.0);
        assert!(results.range.min <= results.range.mean && results.range.mean <= results.range.max);
    }

    #[test]
    fn test_zero_spread_matches_single_run() {
        let base = SimulationParameters::default();
        let integrator = NumericalIntegrator::default();
        let mc = MonteCarloParams {
            num_sims: 5,
            velocity_std: 0.0,
            angle_std_deg: 0.0,
            seed: Some(1),
        };
        let single = integrator.integrate(&base).metrics().unwrap();
        let results = run_monte_carlo(&base, &mc, &integrator).unwrap();

        assert_relative_eq!(results.range.mean, single.range, epsilon = 1e-9);
        assert!(results.range.std < 1e-9);
        assert_eq!(results.range.min, single.range);
    }

    #[test]
    fn test_rejects_bad_settings() {
        let base = SimulationParameters::default();
        let integrator = NumericalIntegrator::default();

        let none = MonteCarloParams {
            num_sims: 0,
            ..seeded(1)
        };
        assert!(run_monte_carlo(&base, &none, &integrator).is_err());

        let negative = MonteCarloParams {
            velocity_std: -1.0,
            ..seeded(10)
        };
        assert!(matches!(
            run_monte_carlo(&base, &negative, &integrator),
            Err(ProjectileError::InvalidParameter { name: "velocity_std", .. })
        ));

        let negative_angle = MonteCarloParams {
            angle_std_deg: -0.5,
            ..seeded(10)
        };
        assert!(matches!(
            run_monte_carlo(&base, &negative_angle, &integrator),
            Err(ProjectileError::InvalidParameter { name: "angle_std", .. })
        ));

        let infinite = MonteCarloParams {
            velocity_std: f64::INFINITY,
            ..seeded(10)
        };
        assert!(run_monte_carlo(&base, &infinite, &integrator).is_err());
    }
}
