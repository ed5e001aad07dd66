//! Command-line definitions and per-command handlers

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::collect::{time_benchmark, TimeOptions, DEFAULT_OMP_NUM_THREADS};
use crate::config::EnergyModelConfig;
use crate::error::{NpbError, Result};
use crate::record::{load_csv, Arch};
use crate::report::render_text;
use crate::summary::Summary;

/// npbkit - NAS Parallel Benchmarks profiling summarizer
///
/// Computes per-benchmark throughput, memory traffic and energy-per-operation
/// from collected CPU/GPU profiling data.
#[derive(Parser, Debug)]
#[command(name = "npbkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// npbkit subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a profiling CSV
    ///
    /// Examples:
    ///   npbkit summarize
    ///   npbkit summarize --data runs.csv --format json --output summary.json
    Summarize {
        /// Profiling data
        #[arg(short, long, default_value = "./data.csv")]
        data: PathBuf,

        /// Energy-model TOML (paper defaults if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Time a benchmark and split initialization from the main kernel
    ///
    /// Examples:
    ///   npbkit time --command ./bin/cg.C.x
    Time {
        /// Path to the benchmark (run through `sh -c`)
        #[arg(short, long)]
        command: String,

        /// OMP_NUM_THREADS for the run
        #[arg(short, long, default_value_t = DEFAULT_OMP_NUM_THREADS)]
        threads: usize,
    },
    /// Print the effective energy model as TOML
    Config {
        /// Energy-model TOML (paper defaults if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show version and default model
    Info,
}

/// Arguments of the `summarize` command
#[derive(Debug, Clone)]
pub struct SummarizeConfig {
    /// Profiling data path
    pub data: PathBuf,
    /// Optional energy-model file
    pub config: Option<PathBuf>,
    /// `text` or `json`
    pub format: String,
    /// Optional output file
    pub output: Option<PathBuf>,
}

/// Render `summary` in the requested format
pub fn format_summary(summary: &Summary, format: &str) -> Result<String> {
    match format {
        "text" => Ok(render_text(summary)),
        "json" => summary.to_json(),
        other => Err(NpbError::UnsupportedOperation {
            operation: "summarize".to_string(),
            reason: format!("unknown format '{other}' (expected text or json)"),
        }),
    }
}

/// Load, model and render; returns the rendered report
pub fn summarize_to_string(data: &Path, config: Option<&Path>, format: &str) -> Result<String> {
    let model = EnergyModelConfig::load(config)?;
    let records = load_csv(data)?;
    let summary = Summary::build(&records, &model)?;
    format_summary(&summary, format)
}

/// `npbkit summarize`
pub fn handle_summarize(cfg: SummarizeConfig) -> Result<()> {
    let rendered = summarize_to_string(&cfg.data, cfg.config.as_deref(), &cfg.format)?;

    match cfg.output {
        Some(path) => {
            fs::write(&path, rendered).map_err(|e| NpbError::IoError {
                message: format!("Failed to write '{}': {e}", path.display()),
            })?;
            tracing::info!(path = %path.display(), "report written");
        },
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        },
    }
    Ok(())
}

/// `npbkit time`
pub fn handle_time(command: &str, threads: usize) -> Result<()> {
    if threads == 0 {
        return Err(NpbError::InvalidConfiguration(
            "--threads must be at least 1".to_string(),
        ));
    }
    let options = TimeOptions::new(command).with_threads(threads);
    let split = time_benchmark(&options, io::stdout().lock())?;
    print!("{split}");
    Ok(())
}

/// `npbkit config`
pub fn handle_config(config: Option<&Path>) -> Result<()> {
    let model = EnergyModelConfig::load(config)?;
    print!("{}", model.to_toml()?);
    Ok(())
}

/// `npbkit info`
pub fn print_info() {
    let model = EnergyModelConfig::default();
    println!("npbkit v{}", crate::VERSION);
    println!("NAS Parallel Benchmarks profiling summarizer");
    println!();
    println!("Default energy model:");
    for arch in Arch::ALL {
        let p = model.params(arch);
        println!(
            "  [{arch}] {:.1} W board power, {:.1} pJ/bit memory energy",
            p.power_w, p.mem_energy_pj_bit
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_summarize_defaults() {
        let cli = Cli::try_parse_from(["npbkit", "summarize"]).unwrap();
        match cli.command {
            Commands::Summarize {
                data,
                config,
                format,
                output,
            } => {
                assert_eq!(data, PathBuf::from("./data.csv"));
                assert!(config.is_none());
                assert_eq!(format, "text");
                assert!(output.is_none());
            },
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parsing_summarize_options() {
        let cli = Cli::try_parse_from([
            "npbkit",
            "summarize",
            "--data",
            "runs.csv",
            "--config",
            "model.toml",
            "-f",
            "json",
            "-o",
            "out.json",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Summarize {
                data,
                config,
                format,
                output,
            } => {
                assert_eq!(data, PathBuf::from("runs.csv"));
                assert_eq!(config, Some(PathBuf::from("model.toml")));
                assert_eq!(format, "json");
                assert_eq!(output, Some(PathBuf::from("out.json")));
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parsing_time() {
        let cli = Cli::try_parse_from(["npbkit", "time", "-c", "./bin/cg.C.x"]).unwrap();
        match cli.command {
            Commands::Time { command, threads } => {
                assert_eq!(command, "./bin/cg.C.x");
                assert_eq!(threads, DEFAULT_OMP_NUM_THREADS);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parsing_time_requires_command() {
        assert!(Cli::try_parse_from(["npbkit", "time"]).is_err());
    }

    #[test]
    fn test_cli_parsing_info_and_config() {
        let cli = Cli::try_parse_from(["npbkit", "info"]).unwrap();
        assert!(matches!(cli.command, Commands::Info));

        let cli = Cli::try_parse_from(["npbkit", "config", "-c", "m.toml"]).unwrap();
        match cli.command {
            Commands::Config { config } => assert_eq!(config, Some(PathBuf::from("m.toml"))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_format_summary_rejects_unknown() {
        let summary = Summary::build(&[], &EnergyModelConfig::default()).unwrap();
        let err = format_summary(&summary, "xml").unwrap_err();
        assert!(matches!(err, NpbError::UnsupportedOperation { .. }));
        assert!(format_summary(&summary, "json").is_ok());
        assert!(format_summary(&summary, "text").is_ok());
    }

    #[test]
    fn test_time_rejects_zero_threads() {
        assert!(handle_time("true", 0).is_err());
    }
}
