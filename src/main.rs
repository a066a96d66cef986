//! # dpam CLI
//!
//! Benchmarks distributed PAM over a list of `(n, p)` configurations and appends
//! the phase timings to a result file.

use std::{
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dpam::group::WorkerPool;
use dpam::harness::{
    points::{generate_points, load_points, write_points},
    settings::parse_settings,
    Benchmark, BenchmarkConfig,
};

/// Distributed k-medoids (PAM) benchmark
#[derive(Parser, Debug)]
#[command(name = "dpam", version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info", global = true, env = "DPAM_LOG_LEVEL")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every configuration of a settings file
    Run {
        /// Lines of `n p`
        settings: PathBuf,

        /// Row-major point coordinates
        input: PathBuf,

        /// Result file, appended to
        output: PathBuf,

        /// Coordinates per point
        #[arg(short, long, default_value = "5", env = "DPAM_DIM")]
        dim: usize,

        /// Runs per configuration
        #[arg(short, long, default_value = "3", env = "DPAM_REPEATS")]
        repeats: usize,

        /// k = n / medoid-ratio
        #[arg(long, default_value = "50", env = "DPAM_MEDOID_RATIO")]
        medoid_ratio: usize,

        /// SWAP iteration cap, 0 for none
        #[arg(long, default_value = "0", env = "DPAM_MAX_ITER")]
        max_iter: usize,

        /// Workers in the global pool (defaults to available parallelism)
        #[arg(short, long, env = "DPAM_POOL_SIZE")]
        pool_size: Option<usize>,
    },

    /// Write uniformly random points for benchmarking
    Generate {
        output: PathBuf,

        #[arg(short = 'n', long)]
        count: usize,

        #[arg(short, long, default_value = "5")]
        dim: usize,

        #[arg(short, long, default_value = "0")]
        seed: u64,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    match args.command {
        Commands::Run {
            settings,
            input,
            output,
            dim,
            repeats,
            medoid_ratio,
            max_iter,
            pool_size,
        } => {
            let settings_file = File::open(&settings)
                .with_context(|| format!("cannot open settings {}", settings.display()))?;
            let settings = parse_settings(BufReader::new(settings_file))?;
            if settings.is_empty() {
                warn!("no configurations to run");
                return Ok(());
            }

            let max_n = settings.iter().map(|s| s.n).max().unwrap_or(0);
            let input_file = File::open(&input)
                .with_context(|| format!("cannot open input {}", input.display()))?;
            let points = load_points(BufReader::new(input_file), max_n, dim)
                .with_context(|| format!("cannot load {} points from {}", max_n, input.display()))?;

            let pool = pool_size.map_or_else(WorkerPool::available, WorkerPool::new);
            info!(
                configurations = settings.len(),
                pool = pool.size(),
                "starting benchmark"
            );

            let config = BenchmarkConfig {
                dim,
                repeats,
                medoid_ratio,
                max_iter,
            };
            let out = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&output)
                .with_context(|| format!("cannot open output {}", output.display()))?;

            let written = Benchmark::new(pool, &points, config)
                .run_all(&settings, &mut BufWriter::new(out))?;
            info!(written, output = %output.display(), "benchmark finished");
        }
        Commands::Generate {
            output,
            count,
            dim,
            seed,
        } => {
            let values = generate_points(count, dim, seed);
            let out = File::create(&output)
                .with_context(|| format!("cannot create {}", output.display()))?;
            write_points(BufWriter::new(out), &values, dim)?;
            info!(count, dim, output = %output.display(), "points written");
        }
    }

    Ok(())
}
