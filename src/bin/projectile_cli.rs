use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use projectile_engine::{
    run_monte_carlo, EnergyState, IntegrationMethod, KinematicState, MonteCarloParams,
    MonteCarloResults, NumericalIntegrator, ProjectileError, SimulationParameters,
    TrajectoryMetrics, TrajectoryResult, TrajectorySolver, VectorKind, VectorSample,
    WindConditions,
};

#[derive(Parser)]
#[command(name = "projectile")]
#[command(version)]
#[command(about = "Projectile trajectory simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a single trajectory
    Trajectory {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        output: OutputFormat,

        /// Full output (show all trajectory points)
        #[arg(long)]
        full: bool,
    },

    /// Evenly resample a trajectory for plotting
    Sample {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Number of intervals (n + 1 points are produced)
        #[arg(short = 'n', long, default_value = "50")]
        points: usize,

        /// Also emit this many velocity/acceleration arrows
        #[arg(short = 'k', long)]
        vectors: Option<usize>,

        /// Quantity the arrows show
        #[arg(long, value_enum, default_value = "velocity")]
        kind: ArrowKind,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "json")]
        output: SampleOutput,
    },

    /// Run Monte Carlo launch dispersion
    MonteCarlo {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Number of simulations
        #[arg(short = 'n', long, default_value = "1000")]
        num_sims: usize,

        /// Velocity standard deviation (m/s)
        #[arg(long, default_value = "0.5")]
        velocity_std: f64,

        /// Angle standard deviation (degrees)
        #[arg(long, default_value = "1.0")]
        angle_std: f64,

        /// Random seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "summary")]
        output: MonteCarloOutput,
    },

    /// Display engine information
    Info,
}

/// Launch parameters; each flag overrides the defaults or the config file
#[derive(Args, Debug, Clone)]
struct LaunchArgs {
    /// Parameter file (JSON)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Initial velocity (m/s)
    #[arg(short = 'v', long)]
    velocity: Option<f64>,

    /// Launch angle (degrees, 0-90)
    #[arg(short = 'a', long)]
    angle: Option<f64>,

    /// Gravitational acceleration (m/s²)
    #[arg(short = 'g', long)]
    gravity: Option<f64>,

    /// Mass (kg)
    #[arg(short = 'm', long)]
    mass: Option<f64>,

    /// Drag coefficient (0 disables drag)
    #[arg(long)]
    drag_coefficient: Option<f64>,

    /// Cross-sectional area (m²)
    #[arg(long)]
    area: Option<f64>,

    /// Launch height (m)
    #[arg(long)]
    height: Option<f64>,

    /// Air density (kg/m³)
    #[arg(long)]
    air_density: Option<f64>,

    /// Wind speed (m/s)
    #[arg(long)]
    wind_speed: Option<f64>,

    /// Wind direction (degrees, 0 = blowing down-range, 90 = across)
    #[arg(long, default_value = "0.0")]
    wind_direction: f64,

    /// Time step (seconds)
    #[arg(long)]
    time_step: Option<f64>,

    /// Maximum simulated time (seconds)
    #[arg(long)]
    max_time: Option<f64>,

    /// Integration method
    #[arg(long, value_enum, default_value = "euler")]
    method: Method,

    /// Cap on integration steps
    #[arg(long)]
    max_iterations: Option<usize>,
}

impl LaunchArgs {
    fn parameters(&self) -> Result<SimulationParameters, ProjectileError> {
        let mut params = match &self.config {
            Some(path) => SimulationParameters::from_json_file(path)?,
            None => SimulationParameters::default(),
        };

        let overrides = [
            (self.velocity, &mut params.initial_velocity),
            (self.angle, &mut params.angle_degrees),
            (self.gravity, &mut params.gravity),
            (self.mass, &mut params.mass),
            (self.drag_coefficient, &mut params.drag_coefficient),
            (self.area, &mut params.cross_sectional_area),
            (self.height, &mut params.initial_height),
            (self.air_density, &mut params.air_density),
            (self.time_step, &mut params.time_step),
            (self.max_time, &mut params.max_time),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value;
            }
        }

        if let Some(speed) = self.wind_speed {
            params = params.with_wind(WindConditions::from_degrees(speed, self.wind_direction));
        }

        Ok(params)
    }

    fn solver(&self) -> Result<TrajectorySolver, ProjectileError> {
        let mut solver = TrajectorySolver::new(self.parameters()?);
        solver.set_method(self.method.into());
        if let Some(n) = self.max_iterations {
            solver.set_max_iterations(n);
        }
        Ok(solver)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Euler,
    Rk4,
}

impl From<Method> for IntegrationMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Euler => IntegrationMethod::Euler,
            Method::Rk4 => IntegrationMethod::Rk4,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ArrowKind {
    Velocity,
    Acceleration,
}

impl From<ArrowKind> for VectorKind {
    fn from(kind: ArrowKind) -> Self {
        match kind {
            ArrowKind::Velocity => VectorKind::Velocity,
            ArrowKind::Acceleration => VectorKind::Acceleration,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SampleOutput {
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MonteCarloOutput {
    Summary,
    Json,
    Csv,
}

#[derive(Debug, Serialize)]
struct TrajectoryPoint {
    time: f64,
    x: f64,
    y: f64,
    z: f64,
    vx: f64,
    vy: f64,
    vz: f64,
    kinetic_energy: f64,
    potential_energy: f64,
    total_energy: f64,
}

impl TrajectoryPoint {
    fn new(state: &KinematicState, energy: &EnergyState) -> Self {
        Self {
            time: state.t,
            x: state.position.x,
            y: state.position.y,
            z: state.position.z,
            vx: state.velocity.x,
            vy: state.velocity.y,
            vz: state.velocity.z,
            kinetic_energy: energy.kinetic,
            potential_energy: energy.potential,
            total_energy: energy.total,
        }
    }
}

#[derive(Debug, Serialize)]
struct TrajectoryReport<'a> {
    parameters: &'a SimulationParameters,
    termination: &'static str,
    metrics: &'a TrajectoryMetrics,
    analytical: Option<&'a TrajectoryMetrics>,
    trajectory: Vec<TrajectoryPoint>,
}

#[derive(Debug, Serialize)]
struct SampleReport<'a> {
    points: &'a [KinematicState],
    vectors: Option<&'a [VectorSample]>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Trajectory { launch, output, full } => {
            let solver = launch.solver()?;
            let result = solver.solve()?;
            display_trajectory(solver.params(), &result, output, full)?;
        }

        Commands::Sample {
            launch,
            points,
            vectors,
            kind,
            output,
        } => {
            let solver = launch.solver()?;
            let (samples, arrows) = match vectors {
                Some(k) => {
                    let (samples, arrows) = solver.sample_with_vectors(points, k, kind.into())?;
                    (samples, Some(arrows))
                }
                None => (solver.sample(points)?, None),
            };
            display_samples(&samples, arrows.as_deref(), output)?;
        }

        Commands::MonteCarlo {
            launch,
            num_sims,
            velocity_std,
            angle_std,
            seed,
            output,
        } => {
            let base = launch.parameters()?;
            let mut integrator = NumericalIntegrator::new(launch.method.into());
            if let Some(n) = launch.max_iterations {
                integrator = integrator.with_max_iterations(n);
            }
            let mc = MonteCarloParams {
                num_sims,
                velocity_std,
                angle_std_deg: angle_std,
                seed,
            };
            let result = run_monte_carlo(&base, &mc, &integrator)?;
            display_monte_carlo_results(&result, output)?;
        }

        Commands::Info => {
            println!("╔════════════════════════════════════════╗");
            println!("║      PROJECTILE ENGINE v{:<15}║", env!("CARGO_PKG_VERSION"));
            println!("╠════════════════════════════════════════╣");
            println!("║ Projectile kinematics and numerical    ║");
            println!("║ trajectory integration.                ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Features:                              ║");
            println!("║ • Closed-form drag-free solutions      ║");
            println!("║ • Euler and RK4 integration            ║");
            println!("║ • Quadratic drag with wind             ║");
            println!("║ • Even resampling and vector arrows    ║");
            println!("║ • Monte Carlo launch dispersion        ║");
            println!("╚════════════════════════════════════════╝");
        }
    }

    Ok(())
}

fn display_trajectory(
    params: &SimulationParameters,
    result: &TrajectoryResult,
    format: OutputFormat,
    full: bool,
) -> Result<(), Box<dyn Error>> {
    let sim = &result.simulation;

    match format {
        OutputFormat::Json => {
            let report = TrajectoryReport {
                parameters: params,
                termination: sim.termination.as_str(),
                metrics: &result.metrics,
                analytical: result.analytical.as_ref(),
                trajectory: sim
                    .states
                    .iter()
                    .zip(&sim.energies)
                    .map(|(s, e)| TrajectoryPoint::new(s, e))
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        OutputFormat::Csv => {
            println!("time,x,y,z,vx,vy,vz,kinetic,potential,total");
            for (s, e) in sim.states.iter().zip(&sim.energies) {
                println!(
                    "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
                    s.t,
                    s.position.x,
                    s.position.y,
                    s.position.z,
                    s.velocity.x,
                    s.velocity.y,
                    s.velocity.z,
                    e.kinetic,
                    e.potential,
                    e.total
                );
            }
        }

        OutputFormat::Table => {
            let m = &result.metrics;
            println!("╔════════════════════════════════════════╗");
            println!("║         TRAJECTORY RESULTS             ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Range:             {:>8.3} m          ║", m.range);
            println!("║ Max Height:        {:>8.3} m          ║", m.max_height);
            println!("║ Time of Flight:    {:>8.3} s          ║", m.time_of_flight);
            println!("║ Time to Apex:      {:>8.3} s          ║", m.time_to_apex);
            println!("║ Impact Velocity:   {:>8.3} m/s        ║", m.impact_velocity);
            println!("║ Impact Angle:      {:>8.2} deg        ║", m.impact_angle_degrees);
            if let Some(energy) = m.impact_energy {
                println!("║ Impact Energy:     {:>8.2} J          ║", energy);
            }
            println!("║ Termination:       {:<20}║", sim.termination.as_str());
            if let Some(exact) = &result.analytical {
                println!("╠════════════════════════════════════════╣");
                println!("║ CLOSED FORM (no drag)                  ║");
                println!("║ Range:             {:>8.3} m          ║", exact.range);
                println!("║ Max Height:        {:>8.3} m          ║", exact.max_height);
                println!("║ Time of Flight:    {:>8.3} s          ║", exact.time_of_flight);
            }
            println!("╚════════════════════════════════════════╝");

            let step = if full { 1 } else { (sim.len() / 10).max(1) };
            println!();
            println!("┌──────────┬──────────┬──────────┬──────────┬──────────┐");
            println!("│ Time (s) │  X (m)   │  Y (m)   │  Z (m)   │ Vel(m/s) │");
            println!("├──────────┼──────────┼──────────┼──────────┼──────────┤");
            for (i, s) in sim.states.iter().enumerate() {
                if i % step == 0 || i == sim.len() - 1 {
                    println!(
                        "│ {:>8.3} │ {:>8.3} │ {:>8.3} │ {:>8.3} │ {:>8.3} │",
                        s.t,
                        s.position.x,
                        s.position.y,
                        s.position.z,
                        s.speed()
                    );
                }
            }
            println!("└──────────┴──────────┴──────────┴──────────┴──────────┘");
        }
    }

    Ok(())
}

fn display_samples(
    samples: &[KinematicState],
    vectors: Option<&[VectorSample]>,
    format: SampleOutput,
) -> Result<(), Box<dyn Error>> {
    match format {
        SampleOutput::Json => {
            let report = SampleReport {
                points: samples,
                vectors,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        SampleOutput::Csv => {
            println!("time,x,y,z,vx,vy,vz,ax,ay,az");
            for s in samples {
                println!(
                    "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
                    s.t,
                    s.position.x,
                    s.position.y,
                    s.position.z,
                    s.velocity.x,
                    s.velocity.y,
                    s.velocity.z,
                    s.acceleration.x,
                    s.acceleration.y,
                    s.acceleration.z
                );
            }
            if let Some(arrows) = vectors {
                println!();
                println!("time,origin_x,origin_y,origin_z,dir_x,dir_y,dir_z,magnitude");
                for a in arrows {
                    println!(
                        "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
                        a.t,
                        a.origin.x,
                        a.origin.y,
                        a.origin.z,
                        a.direction.x,
                        a.direction.y,
                        a.direction.z,
                        a.magnitude
                    );
                }
            }
        }
    }

    Ok(())
}

fn display_monte_carlo_results(
    result: &MonteCarloResults,
    format: MonteCarloOutput,
) -> Result<(), Box<dyn Error>> {
    match format {
        MonteCarloOutput::Summary => {
            println!("╔════════════════════════════════════════╗");
            println!("║      MONTE CARLO SIMULATION            ║");
            println!("║      {:>6} valid / {:>6} failed      ║", result.valid_runs, result.failed_runs);
            println!("╠════════════════════════════════════════╣");
            println!("║ RANGE STATISTICS                       ║");
            println!("║ Mean:              {:>8.3} m          ║", result.range.mean);
            println!("║ Std Dev:           {:>8.3} m          ║", result.range.std);
            println!("║ Min:               {:>8.3} m          ║", result.range.min);
            println!("║ Max:               {:>8.3} m          ║", result.range.max);
            println!("╠════════════════════════════════════════╣");
            println!("║ IMPACT VELOCITY                        ║");
            println!("║ Mean:              {:>8.3} m/s        ║", result.impact_velocity.mean);
            println!("║ Std Dev:           {:>8.3} m/s        ║", result.impact_velocity.std);
            println!("╠════════════════════════════════════════╣");
            println!("║ MAX HEIGHT                             ║");
            println!("║ Mean:              {:>8.3} m          ║", result.max_height.mean);
            println!("║ Std Dev:           {:>8.3} m          ║", result.max_height.std);
            println!("╚════════════════════════════════════════╝");
        }

        MonteCarloOutput::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }

        MonteCarloOutput::Csv => {
            println!("metric,mean,std,min,max");
            for (name, stats) in [
                ("range", &result.range),
                ("max_height", &result.max_height),
                ("time_of_flight", &result.time_of_flight),
                ("impact_velocity", &result.impact_velocity),
            ] {
                println!(
                    "{},{:.4},{:.4},{:.4},{:.4}",
                    name, stats.mean, stats.std, stats.min, stats.max
                );
            }
        }
    }

    Ok(())
}
