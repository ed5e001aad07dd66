//! Summarizer pipeline
//!
//! Turns the loaded rows into the three report sections (per-benchmark
//! metrics, per-architecture harmonic means, average power split) plus the
//! GPU-vs-CPU comparison for benchmarks measured on both platforms.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::EnergyModelConfig;
use crate::energy::DerivedMetrics;
use crate::error::{NpbError, Result};
use crate::record::{Arch, ProfileRecord};
use crate::stats::{arithmetic_mean, geometric_mean, harmonic_mean};

/// Derived metrics of one row, in file order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRow {
    /// Platform
    pub arch: Arch,
    /// `BENCHMARK.CLASS`
    pub label: String,
    /// Energy-model output
    pub metrics: DerivedMetrics,
}

/// Running arrays of every derived metric for one architecture
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchSeries {
    /// G ops/s
    pub g_ops_s: Vec<f64>,
    /// GiB/s
    pub mem_bw_gib_s: Vec<f64>,
    /// bytes/op
    pub bytes_op: Vec<f64>,
    /// nJ/op
    pub nj_op: Vec<f64>,
    /// W (compute)
    pub cmp_power_w: Vec<f64>,
    /// W (memory)
    pub mem_power_w: Vec<f64>,
}

impl ArchSeries {
    /// Append one row's metrics
    pub fn push(&mut self, m: &DerivedMetrics) {
        self.g_ops_s.push(m.g_ops_s);
        self.mem_bw_gib_s.push(m.mem_bw_gib_s);
        self.bytes_op.push(m.bytes_op);
        self.nj_op.push(m.nj_op);
        self.cmp_power_w.push(m.cmp_power_w);
        self.mem_power_w.push(m.mem_power_w);
    }

    /// Number of rows collected
    #[must_use]
    pub fn len(&self) -> usize {
        self.g_ops_s.len()
    }

    /// True when no rows were collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.g_ops_s.is_empty()
    }

    /// Series that are harmonic-mean aggregated; the power series are not
    #[must_use]
    pub fn mean_columns(&self) -> [(&'static str, &[f64]); 4] {
        [
            ("g_ops_s", self.g_ops_s.as_slice()),
            ("mem_bw_gib_s", self.mem_bw_gib_s.as_slice()),
            ("bytes_op", self.bytes_op.as_slice()),
            ("nj_op", self.nj_op.as_slice()),
        ]
    }
}

/// Named aggregate value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricMean {
    /// Series name
    pub metric: String,
    /// Aggregate
    pub value: f64,
}

/// Average power split for one architecture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvgPower {
    /// Board power budget (W)
    pub power_w: f64,
    /// Mean compute power (W)
    pub avg_cmp_power_w: f64,
    /// Budget minus mean compute power (W)
    pub avg_mem_power_w: f64,
    /// Memory share of the budget (%)
    pub pct_mem_power: f64,
}

impl AvgPower {
    fn from_series(series: &ArchSeries, power_w: f64) -> Result<Self> {
        let avg_cmp_power_w = arithmetic_mean("cmp_power_w", &series.cmp_power_w)?;
        let avg_mem_power_w = power_w - avg_cmp_power_w;
        Ok(Self {
            power_w,
            avg_cmp_power_w,
            avg_mem_power_w,
            pct_mem_power: avg_mem_power_w / power_w * 100.0,
        })
    }
}

/// Aggregates for one architecture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchAggregate {
    /// Platform
    pub arch: Arch,
    /// Rows contributing
    pub runs: usize,
    /// Harmonic means in reporting order
    pub hmeans: Vec<MetricMean>,
    /// Power split
    pub power: AvgPower,
}

/// GPU-vs-CPU comparison for one `BENCHMARK.CLASS`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// `BENCHMARK.CLASS`
    pub label: String,
    /// CPU rate (G ops/s)
    pub cpu_g_ops_s: f64,
    /// GPU rate (G ops/s)
    pub gpu_g_ops_s: f64,
    /// GPU rate over CPU rate
    pub speedup: f64,
    /// CPU energy per op (nJ)
    pub cpu_nj_op: f64,
    /// GPU energy per op (nJ)
    pub gpu_nj_op: f64,
    /// CPU nJ/op over GPU nJ/op
    pub energy_ratio: f64,
}

/// Everything the report prints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Per-benchmark rows, file order
    pub rows: Vec<BenchmarkRow>,
    /// Per-architecture aggregates, `cpu` then `gpu`
    pub aggregates: Vec<ArchAggregate>,
    /// Benchmarks present on both platforms, first-appearance order
    pub comparisons: Vec<Comparison>,
    /// Geometric mean of [`Comparison::speedup`]
    pub geomean_speedup: Option<f64>,
}

impl Summary {
    /// Run the full pipeline over `records`
    pub fn build(records: &[ProfileRecord], config: &EnergyModelConfig) -> Result<Self> {
        let mut rows = Vec::with_capacity(records.len());
        let mut series: HashMap<Arch, ArchSeries> = HashMap::new();

        for record in records {
            let metrics = DerivedMetrics::compute(record, config)?;
            series.entry(record.arch).or_default().push(&metrics);
            rows.push(BenchmarkRow {
                arch: record.arch,
                label: record.label(),
                metrics,
            });
        }

        let mut aggregates = Vec::new();
        for arch in Arch::ALL {
            let Some(arch_series) = series.get(&arch).filter(|s| !s.is_empty()) else {
                tracing::warn!(%arch, "no rows for architecture; skipping aggregates");
                continue;
            };

            let hmeans = arch_series
                .mean_columns()
                .into_iter()
                .map(|(metric, values)| {
                    harmonic_mean(metric, values).map(|value| MetricMean {
                        metric: metric.to_string(),
                        value,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            aggregates.push(ArchAggregate {
                arch,
                runs: arch_series.len(),
                hmeans,
                power: AvgPower::from_series(arch_series, config.params(arch).power_w)?,
            });
        }

        let comparisons = compare_platforms(&rows);
        let geomean_speedup = if comparisons.is_empty() {
            None
        } else {
            let speedups: Vec<f64> = comparisons.iter().map(|c| c.speedup).collect();
            Some(geometric_mean("speedup", &speedups)?)
        };

        Ok(Self {
            rows,
            aggregates,
            comparisons,
            geomean_speedup,
        })
    }

    /// Aggregates for `arch`, if it had rows
    #[must_use]
    pub fn aggregate(&self, arch: Arch) -> Option<&ArchAggregate> {
        self.aggregates.iter().find(|a| a.arch == arch)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| NpbError::FormatError {
            reason: format!("JSON serialization failed: {e}"),
        })
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| NpbError::FormatError {
            reason: format!("invalid summary JSON: {e}"),
        })
    }
}

/// Pair the first CPU and first GPU row of every label
fn compare_platforms(rows: &[BenchmarkRow]) -> Vec<Comparison> {
    let mut order: Vec<&str> = Vec::new();
    let mut firsts: HashMap<(&str, Arch), &DerivedMetrics> = HashMap::new();

    for row in rows {
        if !order.contains(&row.label.as_str()) {
            order.push(row.label.as_str());
        }
        firsts.entry((row.label.as_str(), row.arch)).or_insert(&row.metrics);
    }

    order
        .into_iter()
        .filter_map(|label| {
            let cpu = firsts.get(&(label, Arch::Cpu))?;
            let gpu = firsts.get(&(label, Arch::Gpu))?;
            Some(Comparison {
                label: label.to_string(),
                cpu_g_ops_s: cpu.g_ops_s,
                gpu_g_ops_s: gpu.g_ops_s,
                speedup: gpu.g_ops_s / cpu.g_ops_s,
                cpu_nj_op: cpu.nj_op,
                gpu_nj_op: gpu.nj_op,
                energy_ratio: cpu.nj_op / gpu.nj_op,
            })
        })
        .collect()
}
