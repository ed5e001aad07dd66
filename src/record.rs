//! Profiling-data CSV schema
//!
//! One row per benchmark run, as written by the collector:
//!
//! ```text
//! BENCHMARK,CLASS,ARCH,INIT_TIME,RUN_TIME,OPS_MOPS_S,MEM_BW_RD_GB_S,MEM_BW_WR_GB_S,
//! ```
//!
//! Columns are matched by header name. Unknown columns (including the empty
//! one produced by a trailing comma) are ignored.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NpbError, Result};

/// Hardware platform a run was measured on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Arch {
    /// Host processor (AMD EPYC 7742 in the paper)
    Cpu,
    /// Accelerator (NVIDIA A100 in the paper)
    Gpu,
}

impl Arch {
    /// Fixed reporting order
    pub const ALL: [Arch; 2] = [Arch::Cpu, Arch::Gpu];

    /// Lowercase name as it appears in the CSV and the report
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Arch::Cpu => "cpu",
            Arch::Gpu => "gpu",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = NpbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Arch::Cpu),
            "gpu" => Ok(Arch::Gpu),
            other => Err(NpbError::FormatError {
                reason: format!("unknown architecture '{other}' (expected cpu or gpu)"),
            }),
        }
    }
}

impl TryFrom<String> for Arch {
    type Error = NpbError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A single profiled benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// NPB kernel name (CG, EP, FT, MG, ...)
    #[serde(rename = "BENCHMARK")]
    pub benchmark: String,
    /// NPB problem class (A, B, C, ...)
    #[serde(rename = "CLASS")]
    pub class: String,
    /// Platform the run was measured on
    #[serde(rename = "ARCH")]
    pub arch: Arch,
    /// Initialization phase duration (seconds)
    #[serde(rename = "INIT_TIME", default, deserialize_with = "csv::invalid_option")]
    pub init_time_s: Option<f64>,
    /// Main kernel duration (seconds)
    #[serde(rename = "RUN_TIME", default, deserialize_with = "csv::invalid_option")]
    pub run_time_s: Option<f64>,
    /// Reported operation rate (Mop/s total)
    #[serde(rename = "OPS_MOPS_S")]
    pub ops_mops_s: f64,
    /// Average memory read bandwidth (GB/s, decimal)
    #[serde(rename = "MEM_BW_RD_GB_S")]
    pub mem_bw_rd_gb_s: f64,
    /// Average memory write bandwidth (GB/s, decimal)
    #[serde(rename = "MEM_BW_WR_GB_S")]
    pub mem_bw_wr_gb_s: f64,
}

impl ProfileRecord {
    /// `BENCHMARK.CLASS`, e.g. `CG.C`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}.{}", self.benchmark, self.class)
    }
}

/// Parse profiling rows from any reader, preserving file order
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<ProfileRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row_idx, result) in csv_reader.deserialize::<ProfileRecord>().enumerate() {
        let record = result.map_err(|e| NpbError::FormatError {
            reason: format!("row {}: {e}", row_idx + 1),
        })?;
        tracing::debug!(row = row_idx + 1, label = %record.label(), arch = %record.arch, "parsed row");
        records.push(record);
    }

    Ok(records)
}

/// Load profiling rows from a CSV file
pub fn load_csv(path: &Path) -> Result<Vec<ProfileRecord>> {
    let file = File::open(path).map_err(|e| NpbError::IoError {
        message: format!("Failed to open '{}': {e}", path.display()),
    })?;
    let records = parse_csv(file)?;
    tracing::info!(path = %path.display(), rows = records.len(), "loaded profiling data");
    Ok(records)
}
