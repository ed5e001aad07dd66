//! Benchmark timing wrapper
//!
//! Runs an NPB binary, echoes its output, and splits wall time into the
//! initialization phase and the main kernel(s). NPB prints an
//! `Initialization time` line once setup is done and a `Mop/s total` line in
//! its final report; both are picked up from the merged stdout/stderr stream.
//!
//! GPU runs are profiled with Nsight Systems instead, where the kernel region
//! is selected on the timeline.

use std::fmt;
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{NpbError, Result};

/// Marks the end of the initialization phase
pub const SPLIT_MARKER: &str = "Initialization time";
/// Line carrying the total operation rate
pub const MOP_S_MARKER: &str = "Mop/s total";
/// Default OpenMP thread count (one per EPYC 7742 core)
pub const DEFAULT_OMP_NUM_THREADS: usize = 64;

/// Options for [`time_benchmark`]
#[derive(Debug, Clone)]
pub struct TimeOptions {
    /// Shell command line of the benchmark
    pub command: String,
    /// Value for `OMP_NUM_THREADS`
    pub omp_num_threads: usize,
}

impl TimeOptions {
    /// Options with the default thread count
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            omp_num_threads: DEFAULT_OMP_NUM_THREADS,
        }
    }

    /// Override the thread count
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.omp_num_threads = threads;
        self
    }
}

/// Tracks the phase markers in a stream of output lines
#[derive(Debug, Clone, Default)]
pub struct OutputScanner {
    init_elapsed: Option<Duration>,
    mop_s: Option<f64>,
}

impl OutputScanner {
    /// Empty scanner
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line observed `elapsed` after the benchmark started
    ///
    /// Only the first occurrence of each marker is kept.
    pub fn observe(&mut self, line: &str, elapsed: Duration) {
        if self.init_elapsed.is_none() && line.contains(SPLIT_MARKER) {
            self.init_elapsed = Some(elapsed);
        }
        if self.mop_s.is_none() && line.contains(MOP_S_MARKER) {
            self.mop_s = parse_mop_s(line);
            if self.mop_s.is_none() {
                tracing::warn!(line, "could not parse Mop/s value");
            }
        }
    }

    /// Elapsed time at the split marker, if seen
    #[must_use]
    pub fn init_elapsed(&self) -> Option<Duration> {
        self.init_elapsed
    }

    /// Parsed operation rate, if seen
    #[must_use]
    pub fn mop_s(&self) -> Option<f64> {
        self.mop_s
    }

    /// Close the scan with the total wall time
    #[must_use]
    pub fn finish(&self, total: Duration) -> TimingSplit {
        let total_s = total.as_secs_f64();
        let init_s = self.init_elapsed.map_or(0.0, |d| d.as_secs_f64());
        TimingSplit {
            init_s,
            run_s: total_s - init_s,
            total_s,
            mop_s: self.mop_s,
        }
    }
}

/// `Mop/s total = <value>` carries the rate as the 4th token
fn parse_mop_s(line: &str) -> Option<f64> {
    line.split_whitespace().nth(3)?.parse().ok()
}

/// Wall-time breakdown of one benchmark run (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingSplit {
    /// Until the split marker; zero if it never appeared
    pub init_s: f64,
    /// Remainder of the run
    pub run_s: f64,
    /// Whole run
    pub total_s: f64,
    /// Reported operation rate
    pub mop_s: Option<f64>,
}

impl fmt::Display for TimingSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "-".repeat(40))?;
        writeln!(f, "Initialization duration: {:.2} seconds", self.init_s)?;
        writeln!(f, "Runtime duration: {:.2} seconds", self.run_s)?;
        writeln!(f, "Total execution duration: {:.2} seconds", self.total_s)?;
        match self.mop_s {
            Some(v) => writeln!(f, "Mop/s: {v:.2}"),
            None => writeln!(f, "Mop/s: n/a"),
        }
    }
}

/// Run the benchmark, echo its output to `echo`, and time it
pub fn time_benchmark<W: Write>(options: &TimeOptions, mut echo: W) -> Result<TimingSplit> {
    let shell_line = format!("{{ {}\n}} 2>&1", options.command);
    tracing::info!(
        command = %options.command,
        omp_num_threads = options.omp_num_threads,
        "starting benchmark"
    );

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(&shell_line)
        .env("OMP_NUM_THREADS", options.omp_num_threads.to_string())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| NpbError::CommandFailed {
            command: options.command.clone(),
            reason: format!("spawn failed: {e}"),
        })?;

    let start = Instant::now();
    let mut scanner = OutputScanner::new();

    let stdout = child.stdout.take().ok_or_else(|| NpbError::CommandFailed {
        command: options.command.clone(),
        reason: "stdout not captured".to_string(),
    })?;
    if let Err(err) = pump_output(stdout, &mut echo, &mut scanner, start) {
        // reap before surfacing; a dropped Child keeps running
        let _ = child.kill();
        let _ = child.wait();
        tracing::warn!(command = %options.command, error = %err, "benchmark killed");
        return Err(err);
    }

    let status = child.wait()?;
    let total = start.elapsed();
    if !status.success() {
        tracing::warn!(command = %options.command, %status, "benchmark exited unsuccessfully");
    }

    let split = scanner.finish(total);
    tracing::debug!(?split, "timing complete");
    Ok(split)
}

/// Echo and scan every line of `output` until EOF
///
/// Lines are raw bytes; invalid UTF-8 is replaced for scanning only.
fn pump_output<R: Read, W: Write>(
    output: R,
    echo: &mut W,
    scanner: &mut OutputScanner,
    start: Instant,
) -> Result<()> {
    let mut reader = BufReader::new(output);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        echo.write_all(&buf)?;
        if buf.last() != Some(&b'\n') {
            echo.write_all(b"\n")?;
        }
        let line = String::from_utf8_lossy(&buf);
        scanner.observe(line.trim_end_matches(['\n', '\r']), start.elapsed());
    }
}
