//! Colored formatter implementation with terminal color support
//!
//! Prints the same lines as the plain formatter, with latency values tinted
//! by how fast the echo round-trip was.

use crate::{
    error::Result,
    executor::RunReport,
    stats::{LatencyStats, REPORTED_PERCENTILES},
};
use super::formatter::{fmt_err, FormattingOptions, OutputFormatter};
use std::fmt::Write as _;
use colored::*;

/// Performance level classification for color coding
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceLevel {
    Excellent,  // < 1ms
    Good,       // 1-5ms
    Fair,       // 5-20ms
    Poor,       // 20-100ms
    VeryPoor,   // > 100ms
}

impl PerformanceLevel {
    /// Determine performance level from a round-trip time in milliseconds
    pub fn from_round_trip(time_ms: f64) -> Self {
        if time_ms < 1.0 {
            Self::Excellent
        } else if time_ms < 5.0 {
            Self::Good
        } else if time_ms < 20.0 {
            Self::Fair
        } else if time_ms < 100.0 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    /// Get color for this performance level
    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Magenta,
            Self::VeryPoor => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn dimmed(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.dimmed()
        } else {
            text.normal()
        }
    }

    /// Format a latency with color coding
    fn format_latency_colored(&self, latency_ms: f64) -> ColoredString {
        let formatted = format!("{:.2} ms", latency_ms);
        let performance = PerformanceLevel::from_round_trip(latency_ms);
        self.colorize(&formatted, performance.color())
    }

    /// Color a worker count: green when zero failures, red otherwise
    fn format_failures(&self, count: u32, label: &str) -> ColoredString {
        let text = format!("{} {}", count, label);
        let color = if count == 0 {
            self.color_scheme.success
        } else {
            self.color_scheme.error
        };
        self.colorize(&text, color)
    }
}

impl OutputFormatter for ColoredFormatter {
    fn is_verbose(&self) -> bool {
        self.options.verbose_mode
    }

    fn format_header(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();
        writeln!(
            output,
            "{}",
            self.colorize("Echo Load Test Results", self.color_scheme.header).bold()
        ).map_err(fmt_err)?;
        writeln!(output, "{}", self.dimmed(&"=".repeat(40))).map_err(fmt_err)?;
        writeln!(
            output,
            "{} {}",
            self.bold("Target:"),
            self.colorize(&report.target.to_string(), self.color_scheme.info)
        ).map_err(fmt_err)?;
        writeln!(output, "{} {}", self.bold("Connections:"), report.connections).map_err(fmt_err)?;
        writeln!(output, "{} {} bytes", self.bold("Payload:"), report.payload_size).map_err(fmt_err)?;
        write!(
            output,
            "{} {} s",
            self.bold("Duration:"),
            report.duration.as_secs_f64()
        ).map_err(fmt_err)?;
        Ok(output)
    }

    fn format_summary(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();
        writeln!(
            output,
            "{} {}",
            self.bold("Total echo count:"),
            self.colorize(&report.total_completed().to_string(), self.color_scheme.info)
        ).map_err(fmt_err)?;

        let qps = format!("{:.2}", report.throughput.qps);
        let qps_color = if report.total_completed() > 0 {
            self.color_scheme.success
        } else {
            self.color_scheme.warning
        };
        write!(output, "{} {}", self.bold("QPS:"), self.colorize(&qps, qps_color)).map_err(fmt_err)?;
        Ok(output)
    }

    fn format_latency(&self, latency: &LatencyStats) -> Result<String> {
        let mut output = String::new();
        writeln!(
            output,
            "{} {}",
            self.bold("Avg latency:"),
            self.format_latency_colored(latency.avg_ms())
        ).map_err(fmt_err)?;
        writeln!(
            output,
            "{} {}",
            self.bold("Min latency:"),
            self.format_latency_colored(latency.min_ms())
        ).map_err(fmt_err)?;
        write!(
            output,
            "{} {}",
            self.bold("Max latency:"),
            self.format_latency_colored(latency.max_ms())
        ).map_err(fmt_err)?;
        Ok(output)
    }

    fn format_details(&self, report: &RunReport) -> Result<String> {
        let outcomes = &report.outcomes;
        let mut output = String::new();

        writeln!(
            output,
            "{} {}, {} peer closed, {}, {}, {}",
            self.bold("Workers:"),
            self.colorize(&format!("{} completed", outcomes.completed), self.color_scheme.success),
            outcomes.peer_closed,
            self.format_failures(outcomes.connect_failed, "connect failed"),
            self.format_failures(outcomes.io_failed, "I/O failed"),
            self.format_failures(outcomes.panicked, "panicked"),
        ).map_err(fmt_err)?;
        writeln!(
            output,
            "{} {}",
            self.bold("Elapsed:"),
            self.dimmed(&format!("{:.2} s", report.elapsed.as_secs_f64()))
        ).map_err(fmt_err)?;
        write!(
            output,
            "{} {}",
            self.bold("Samples:"),
            report.aggregate.all_latencies.len()
        ).map_err(fmt_err)?;

        if let Some(latency) = &report.latency {
            for p in REPORTED_PERCENTILES {
                if let Some(value) = latency.percentile_ms(p) {
                    write!(
                        output,
                        "\n{} {}",
                        self.bold(&format!("P{} latency:", p as u32)),
                        self.format_latency_colored(value)
                    ).map_err(fmt_err)?;
                }
            }
        }

        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!(
            "{} {}",
            self.colorize("Warning:", self.color_scheme.warning).bold(),
            warning
        ))
    }
}
