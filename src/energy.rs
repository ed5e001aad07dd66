//! Per-run energy model
//!
//! Splits a fixed board power budget into a memory share, charged at a flat
//! energy per bit moved, and a compute share holding the remainder. The
//! measured main-kernel runtime, when present, turns those powers into a
//! projected energy for the run.

use serde::{Deserialize, Serialize};

use crate::config::EnergyModelConfig;
use crate::error::{NpbError, Result};
use crate::record::ProfileRecord;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const BITS_PER_BYTE: f64 = 8.0;
const PICO: f64 = 1e-12;

/// Projected energy of the main kernel (Joules)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunEnergy {
    /// Whole-board energy
    pub total_j: f64,
    /// Compute share
    pub compute_j: f64,
    /// Memory share
    pub memory_j: f64,
}

/// Metrics derived from one [`ProfileRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Operation rate (billions of operations per second)
    pub g_ops_s: f64,
    /// Combined read + write DRAM bandwidth (GiB/s)
    pub mem_bw_gib_s: f64,
    /// DRAM traffic per operation (bytes)
    pub bytes_op: f64,
    /// Board energy per operation (nJ)
    pub nj_op: f64,
    /// Board power not attributed to memory traffic (W)
    pub cmp_power_w: f64,
    /// Power attributed to memory traffic (W)
    pub mem_power_w: f64,
    /// Projection over the measured runtime, if the row has one
    pub run_energy: Option<RunEnergy>,
}

impl DerivedMetrics {
    /// Apply the energy model to a single row
    pub fn compute(record: &ProfileRecord, config: &EnergyModelConfig) -> Result<Self> {
        if !record.ops_mops_s.is_finite() || record.ops_mops_s <= 0.0 {
            return Err(NpbError::InvalidValue {
                metric: format!("{} [{}] OPS_MOPS_S", record.label(), record.arch),
                value: record.ops_mops_s,
            });
        }
        for (column, value) in [
            ("MEM_BW_RD_GB_S", record.mem_bw_rd_gb_s),
            ("MEM_BW_WR_GB_S", record.mem_bw_wr_gb_s),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(NpbError::InvalidValue {
                    metric: format!("{} [{}] {column}", record.label(), record.arch),
                    value,
                });
            }
        }

        let params = config.params(record.arch);

        let g_ops_s = record.ops_mops_s / 1e3;
        let ops_s = ensure_finite(record, "OPS_MOPS_S", record.ops_mops_s * 1e6)?;

        let mem_bw_bytes_s = ensure_finite(
            record,
            "MEM_BW_RD_GB_S + MEM_BW_WR_GB_S",
            (record.mem_bw_rd_gb_s + record.mem_bw_wr_gb_s) * 1e9,
        )?;
        let mem_bw_gib_s = mem_bw_bytes_s / BYTES_PER_GIB;

        let mem_power_w = ensure_finite(
            record,
            "memory power",
            mem_bw_bytes_s * BITS_PER_BYTE * params.mem_energy_pj_bit * PICO,
        )?;
        let cmp_power_w = params.power_w - mem_power_w;
        if cmp_power_w < 0.0 {
            tracing::warn!(
                label = %record.label(),
                arch = %record.arch,
                mem_power_w,
                power_w = params.power_w,
                "memory power exceeds board power budget"
            );
        }

        let bytes_op = ensure_finite(record, "bytes/op", mem_bw_bytes_s / ops_s)?;
        let nj_op = ensure_finite(record, "nJ/op", params.power_w * 1e9 / ops_s)?;

        let run_energy = record
            .run_time_s
            .filter(|t| t.is_finite() && *t >= 0.0)
            .map(|t| RunEnergy {
                total_j: params.power_w * t,
                compute_j: cmp_power_w * t,
                memory_j: mem_power_w * t,
            });

        Ok(Self {
            g_ops_s,
            mem_bw_gib_s,
            bytes_op,
            nj_op,
            cmp_power_w,
            mem_power_w,
            run_energy,
        })
    }
}

/// Derived values that overflow are reported against the row they came from
fn ensure_finite(record: &ProfileRecord, column: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NpbError::InvalidValue {
            metric: format!("{} [{}] {column}", record.label(), record.arch),
            value,
        })
    }
}
