//! memprobe - run the reference access, sensor and branch workloads.

use clap::{Args, Parser, Subcommand};
use memprobe::{
    branch_mix, AccessSuite, KernelError, MemprobeConfig, SensorPipeline, SensorReport,
    SuiteReport,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memprobe")]
#[command(about = "Deterministic cache and pipeline microbenchmarks", long_about = None)]
struct Cli {
    /// TOML file overriding the compiled-in constants
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    access: AccessArgs,

    /// Workload to run; all of them when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Matrix multiply plus sequential, strided and random scans
    Access(AccessArgs),

    /// Sensor preprocessing pipeline
    Sensor(SensorArgs),

    /// Alternating add/subtract integer loop
    Branch {
        #[arg(short, long)]
        iterations: Option<u64>,
    },

    /// Run every workload
    All,
}

#[derive(Args)]
struct AccessArgs {
    /// Matrix dimension
    #[arg(long)]
    size: Option<usize>,

    /// Access stride of the first strided pass
    #[arg(long)]
    stride: Option<usize>,

    /// PRNG seed of the first random pass
    #[arg(long)]
    seed: Option<u32>,

    /// Random-access draw count
    #[arg(long)]
    iterations: Option<usize>,

    /// Extra rounds after the first
    #[arg(long)]
    repeats: Option<u32>,
}

#[derive(Args)]
struct SensorArgs {
    /// Number of sensors
    #[arg(long)]
    sensors: Option<usize>,

    /// Samples per sensor
    #[arg(long)]
    samples: Option<usize>,

    /// Moving-average window
    #[arg(long)]
    window: Option<usize>,

    /// PRNG seed
    #[arg(long)]
    seed: Option<u32>,
}

impl AccessArgs {
    fn apply(&self, config: &mut MemprobeConfig) {
        let access = &mut config.access;
        if let Some(v) = self.size {
            access.size = v;
        }
        if let Some(v) = self.stride {
            access.stride = v;
        }
        if let Some(v) = self.seed {
            access.seed = v;
        }
        if let Some(v) = self.iterations {
            access.iterations = v;
        }
        if let Some(v) = self.repeats {
            access.repeats = v;
        }
    }
}

impl SensorArgs {
    fn apply(&self, config: &mut MemprobeConfig) {
        let sensor = &mut config.sensor;
        if let Some(v) = self.sensors {
            sensor.num_sensors = v;
        }
        if let Some(v) = self.samples {
            sensor.samples_per_sensor = v;
        }
        if let Some(v) = self.window {
            sensor.filter_window = v;
        }
        if let Some(v) = self.seed {
            sensor.seed = v;
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), KernelError> {
    let mut config = match &cli.config {
        Some(path) => MemprobeConfig::load(path)?,
        None => MemprobeConfig::default(),
    };

    cli.access.apply(&mut config);

    match cli.command.unwrap_or(Commands::All) {
        Commands::Access(args) => {
            args.apply(&mut config);
            run_access(&config)
        }
        Commands::Sensor(args) => {
            args.apply(&mut config);
            run_sensor(&config)
        }
        Commands::Branch { iterations } => {
            run_branch(iterations.unwrap_or(config.branch_iterations));
            Ok(())
        }
        Commands::All => {
            run_access(&config)?;
            run_sensor(&config)?;
            run_branch(config.branch_iterations);
            Ok(())
        }
    }
}

fn run_access(config: &MemprobeConfig) -> Result<(), KernelError> {
    let mut suite = AccessSuite::new(config.access.clone())?;
    let report = suite.run()?;
    print_access(config, &report);
    Ok(())
}

fn run_sensor(config: &MemprobeConfig) -> Result<(), KernelError> {
    let report = SensorPipeline::new(config.sensor.clone()).run()?;
    print_sensor(&report);
    Ok(())
}

fn run_branch(iterations: u64) {
    info!(iterations, "running branch loop");
    println!("{}", branch_mix(iterations));
}

fn print_access(config: &MemprobeConfig, report: &SuiteReport) {
    let cfg = &config.access;
    let mid = (cfg.size / 2).saturating_sub(1);
    println!("Matrix multiply result[0][0] = {:.6}", report.matrix_origin);
    println!("Sequential sum = {:.6}", report.first.sequential);
    println!("Strided sum (stride={}) = {:.6}", cfg.stride, report.first.strided);
    println!("Random sum = {:.6}", report.first.random);
    println!(
        "Final results: matrix[{mid}][{mid}]={:.6}, sums={:.6},{:.6},{:.6}",
        report.matrix_probe, report.last.sequential, report.last.strided, report.last.random
    );
}

fn print_sensor(report: &SensorReport) {
    for (sensor, avg) in report.per_sensor_means.iter().enumerate() {
        println!("Sensor {}: Avg = {:.4}", sensor, avg);
    }
    let stats = &report.stats;
    println!("Aggregate Statistics:");
    println!("  Min value: {:.4}", stats.min);
    println!("  Max value: {:.4}", stats.max);
    if let Some(mean) = stats.mean() {
        println!("  Average: {:.4}", mean);
    }
    println!(
        "  Anomalies detected: {} ({:.2}%)",
        stats.anomaly_count,
        report.anomaly_percent()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("memprobe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_arguments_selects_every_workload() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert!(cli.access.size.is_none());
    }

    #[test]
    fn access_options_work_at_top_level() {
        let cli = parse(&["--size", "4", "--stride", "2", "--seed", "7", "--iterations", "10"]);
        let mut config = MemprobeConfig::default();
        cli.access.apply(&mut config);
        assert_eq!(config.access.size, 4);
        assert_eq!(config.access.stride, 2);
        assert_eq!(config.access.seed, 7);
        assert_eq!(config.access.iterations, 10);
    }

    #[test]
    fn small_default_run_succeeds() {
        assert_eq!(run(parse(&["--size", "4"])), Ok(()));
    }

    #[test]
    fn access_subcommand_succeeds() {
        assert_eq!(run(parse(&["access", "--size", "4"])), Ok(()));
    }

    #[test]
    fn zero_stride_exits_with_precondition_status() {
        let err = run(parse(&["access", "--stride", "0"])).unwrap_err();
        assert!(matches!(err, KernelError::PreconditionViolation(_)));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn oversized_sensor_buffer_exits_with_allocation_status() {
        let sensors = usize::MAX.to_string();
        let err = run(parse(&["sensor", "--sensors", &sensors, "--samples", "2"])).unwrap_err();
        assert!(matches!(err, KernelError::AllocationFailure { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        let err = Cli::try_parse_from(["memprobe", "--bogus"]).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }
}
