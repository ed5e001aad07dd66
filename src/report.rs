//! Text rendering of a [`Summary`]
//!
//! The layout matches the figures pipeline of the paper: one section banner
//! per block, one line per row, two decimals throughout.

use std::fmt;

use crate::summary::Summary;

const RULE: &str = "-------------------------";

/// Plain-text report; renders through [`fmt::Display`]
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'a> {
    summary: &'a Summary,
}

impl<'a> TextReport<'a> {
    /// Wrap a summary for rendering
    #[must_use]
    pub fn new(summary: &'a Summary) -> Self {
        Self { summary }
    }
}

fn banner(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{RULE} {title} {RULE}")
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;

        banner(f, "per-benchmark")?;
        for row in &s.rows {
            let m = &row.metrics;
            writeln!(
                f,
                "[{}] {}: {:.2} G ops/s | {:.2} GiB/s | {:.2} bytes/op | {:.2} nJ/op| {:.2} W (compute) | {:.2} W (memory) ",
                row.arch, row.label, m.g_ops_s, m.mem_bw_gib_s, m.bytes_op, m.nj_op, m.cmp_power_w, m.mem_power_w
            )?;
        }

        banner(f, "h-means")?;
        for agg in &s.aggregates {
            for mean in &agg.hmeans {
                writeln!(f, "[{}] {}: {:.2}", agg.arch, mean.metric, mean.value)?;
            }
        }

        banner(f, "avg. power")?;
        for agg in &s.aggregates {
            let p = &agg.power;
            writeln!(
                f,
                "[{}] avg. cmp. power = {:.2}; avg. mem. power = {:.2}  ({:.2}%)",
                agg.arch, p.avg_cmp_power_w, p.avg_mem_power_w, p.pct_mem_power
            )?;
        }

        if s.rows.iter().any(|r| r.metrics.run_energy.is_some()) {
            banner(f, "run energy")?;
            for row in &s.rows {
                if let Some(e) = &row.metrics.run_energy {
                    writeln!(
                        f,
                        "[{}] {}: {:.2} J (total) | {:.2} J (compute) | {:.2} J (memory)",
                        row.arch, row.label, e.total_j, e.compute_j, e.memory_j
                    )?;
                }
            }
        }

        if !s.comparisons.is_empty() {
            banner(f, "speedup")?;
            for c in &s.comparisons {
                writeln!(
                    f,
                    "[gpu/cpu] {}: {:.2}x speedup | {:.2}x energy/op",
                    c.label, c.speedup, c.energy_ratio
                )?;
            }
            if let Some(geo) = s.geomean_speedup {
                writeln!(f, "[gpu/cpu] geomean speedup: {geo:.2}x")?;
            }
        }

        Ok(())
    }
}

/// Render the full text report
#[must_use]
pub fn render_text(summary: &Summary) -> String {
    TextReport::new(summary).to_string()
}
