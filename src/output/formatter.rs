//! Core formatting trait and the plain text implementation
//!
//! The plain formatter prints the classic summary lines, one metric per line,
//! with latencies in milliseconds at two decimal places.

use crate::{
    error::{AppError, Result},
    executor::RunReport,
    stats::{to_ms, LatencyStats, REPORTED_PERCENTILES},
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format the run header (target and plan); shown in verbose mode
    fn format_header(&self, report: &RunReport) -> Result<String>;

    /// Format total round-trips and throughput
    fn format_summary(&self, report: &RunReport) -> Result<String>;

    /// Format average/min/max latency
    fn format_latency(&self, latency: &LatencyStats) -> Result<String>;

    /// Format worker outcomes, wall time and percentiles; shown in verbose mode
    fn format_details(&self, report: &RunReport) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Whether the header and details sections belong in the report
    fn is_verbose(&self) -> bool;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
        }
    }
}

pub(crate) fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format output: {}", e))
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }
}

impl OutputFormatter for PlainFormatter {
    fn is_verbose(&self) -> bool {
        self.options.verbose_mode
    }

    fn format_header(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "Echo Load Test Results").map_err(fmt_err)?;
        writeln!(output, "{}", "=".repeat(40)).map_err(fmt_err)?;
        writeln!(output, "Target: {}", report.target).map_err(fmt_err)?;
        writeln!(output, "Connections: {}", report.connections).map_err(fmt_err)?;
        writeln!(output, "Payload: {} bytes", report.payload_size).map_err(fmt_err)?;
        write!(output, "Duration: {} s", report.duration.as_secs_f64()).map_err(fmt_err)?;
        Ok(output)
    }

    fn format_summary(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "Total echo count: {}", report.total_completed()).map_err(fmt_err)?;
        write!(output, "QPS: {:.2}", report.throughput.qps).map_err(fmt_err)?;
        Ok(output)
    }

    fn format_latency(&self, latency: &LatencyStats) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "Avg latency: {:.2} ms", latency.avg_ms()).map_err(fmt_err)?;
        writeln!(output, "Min latency: {:.2} ms", latency.min_ms()).map_err(fmt_err)?;
        write!(output, "Max latency: {:.2} ms", latency.max_ms()).map_err(fmt_err)?;
        Ok(output)
    }

    fn format_details(&self, report: &RunReport) -> Result<String> {
        let outcomes = &report.outcomes;
        let mut output = String::new();

        writeln!(
            output,
            "Workers: {} completed, {} peer closed, {} connect failed, {} I/O failed, {} panicked",
            outcomes.completed, outcomes.peer_closed, outcomes.connect_failed, outcomes.io_failed, outcomes.panicked
        ).map_err(fmt_err)?;
        writeln!(output, "Elapsed: {:.2} s", report.elapsed.as_secs_f64()).map_err(fmt_err)?;
        write!(output, "Samples: {}", report.aggregate.all_latencies.len()).map_err(fmt_err)?;

        if let Some(latency) = &report.latency {
            for p in REPORTED_PERCENTILES {
                if let Some(value) = latency.percentile_ms(p) {
                    write!(output, "\nP{} latency: {:.2} ms", p as u32, value).map_err(fmt_err)?;
                }
            }
        }

        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("Warning: {}", warning))
    }
}

/// Render a duration the way the summary lines do
pub fn format_ms(duration: std::time::Duration) -> String {
    format!("{:.2} ms", to_ms(duration))
}
