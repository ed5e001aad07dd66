//! npbkit CLI - NAS Parallel Benchmarks profiling summarizer
//!
//! # Commands
//!
//! - `summarize` - Per-benchmark metrics, h-means and power split from a CSV
//! - `time` - Time a benchmark, splitting initialization from the main kernel
//! - `config` - Print the effective energy model
//! - `info` - Show version info

use clap::Parser;
use npbkit::cli::{entrypoint, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "npbkit=debug" } else { "npbkit=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(err) = entrypoint(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
