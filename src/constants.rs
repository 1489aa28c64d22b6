/// Physical and numerical constants used by the trajectory engine

/// Default gravitational acceleration in m/s²
pub const DEFAULT_GRAVITY_MPS2: f64 = 9.81;

/// Standard air density at sea level (kg/m³)
///
/// This is the ρ of the quadratic drag term when the caller does not
/// supply one.
pub const STANDARD_AIR_DENSITY: f64 = 1.225;

/// Default fixed integration step (s)
pub const DEFAULT_TIME_STEP: f64 = 0.01;

/// Default upper bound on simulated time (s)
pub const DEFAULT_MAX_TIME: f64 = 10.0;

/// Default launch speed (m/s) and angle (degrees) for the demo parameter set
pub const DEFAULT_INITIAL_VELOCITY: f64 = 20.0;
pub const DEFAULT_ANGLE_DEGREES: f64 = 45.0;

/// Default projectile mass (kg)
pub const DEFAULT_MASS_KG: f64 = 1.0;

/// Hard cap on integration steps per run
///
/// A run at `max_time = 10 s` and `dt = 1e-5 s` takes exactly this many
/// steps; anything finer is cut off and flagged as `IterationLimit`.
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000_000;

// Numerical stability constants
/// General numerical tolerance for floating point comparisons
pub const NUMERICAL_TOLERANCE: f64 = 1e-9;

/// Minimum vector magnitude treated as non-zero
pub const MIN_VELOCITY_THRESHOLD: f64 = 1e-9;

/// Samples reserved up front for one run
pub const INITIAL_STATE_CAPACITY: usize = 4096;

/// Smallest useful sample count for resampled trajectories
pub const MIN_SAMPLE_INTERVALS: usize = 1;

/// Smallest useful arrow count for vector samples
pub const MIN_VECTOR_SAMPLES: usize = 2;
