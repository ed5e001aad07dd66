//! # npbkit
//!
//! Profiling-data summarizer and energy model for NAS Parallel Benchmarks
//! runs on a CPU (AMD EPYC 7742) and a GPU (NVIDIA A100).
//!
//! ## Pipeline
//!
//! ```text
//! collector (npbkit time) ──► data.csv ──► record ──► energy ──► summary ──► report
//! ```
//!
//! ## Example
//!
//! ```rust
//! use npbkit::{parse_csv, EnergyModelConfig, Summary};
//!
//! let csv = "BENCHMARK,CLASS,ARCH,INIT_TIME,RUN_TIME,OPS_MOPS_S,MEM_BW_RD_GB_S,MEM_BW_WR_GB_S,\n\
//!            CG,C,cpu,1.2,20.0,5000.0,30.0,10.0,\n\
//!            CG,C,gpu,0.4,4.0,25000.0,600.0,100.0,\n";
//! let records = parse_csv(csv.as_bytes()).unwrap();
//! let summary = Summary::build(&records, &EnergyModelConfig::default()).unwrap();
//!
//! assert_eq!(summary.rows.len(), 2);
//! assert!((summary.comparisons[0].speedup - 5.0).abs() < 1e-12);
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)] // Allow technical terms without backticks
#![allow(clippy::uninlined_format_args)] // Prefer explicit format args
#![allow(clippy::float_cmp)] // Allow float comparisons in tests

/// CLI command implementations (extracted for testability)
pub mod cli;
/// Benchmark timing wrapper
pub mod collect;
pub mod config;
/// Energy model applied to each profiled run
pub mod energy;
pub mod error;
/// Profiling-data CSV schema
pub mod record;
pub mod report;
pub mod stats;
pub mod summary;

// Re-exports for convenience
pub use config::{ArchParams, EnergyModelConfig};
pub use energy::{DerivedMetrics, RunEnergy};
pub use error::{NpbError, Result};
pub use record::{load_csv, parse_csv, Arch, ProfileRecord};
pub use report::render_text;
pub use summary::Summary;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
