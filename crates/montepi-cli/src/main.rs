//! montepi - Monte Carlo π benchmark.
//!
//! Samples points in the unit square on the CPU device and reports the
//! estimate of π against the reference value.
//!
//! # Examples
//!
//! ```bash
//! # Default 120,000,000 points
//! montepi
//!
//! # Ten million points, with device and dispatch details on stderr
//! RUST_LOG=debug montepi 10000000
//! ```
//!
//! Any device fault aborts the process without printing the result block.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use montepi_core::prelude::*;
use montepi_cpu::CpuDevice;

mod args;
mod report;

/// Monte Carlo estimation of π with counter-based random streams
#[derive(Parser)]
#[command(name = "montepi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of points to sample (zero or non-numeric selects 120000000)
    #[arg(allow_hyphen_values = true)]
    points: Option<String>,

    /// Further arguments are accepted and ignored
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    #[allow(dead_code)]
    rest: Vec<String>,
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn on_device_fault(faults: &FaultList) {
    println!("Caught asynchronous device fault:");
    for fault in faults.iter() {
        println!("{}", fault);
    }
    error!("Terminating after {}", faults);
    std::process::abort();
}

fn run(n_points: u64) -> Result<PiEstimate> {
    let device = CpuDevice::builder()
        .fault_handler(on_device_fault)
        .build()?;
    info!("Running on {}", device.device_info());
    PiEstimator::default().estimate(&device, n_points)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging();

    let n_points = args::parse_points(cli.points.as_deref(), DEFAULT_POINTS);
    print!("{}", report::header(n_points));

    match run(n_points) {
        Ok(estimate) => {
            print!("{}", report::results(&estimate));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            println!("Failure");
            std::process::abort();
        }
    }
}
