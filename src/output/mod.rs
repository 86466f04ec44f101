//! Output formatting and display system
//!
//! This module renders a finished [`RunReport`] as terminal text, colored or
//! plain. The standard report is the round-trip count, QPS and, when any
//! latency was sampled, the average/min/max latency lines.

mod formatter;
mod colored;

pub use formatter::{
    format_ms,
    OutputFormatter,
    PlainFormatter,
    FormattingOptions,
};
pub use colored::{
    ColoredFormatter,
    ColorScheme,
    PerformanceLevel,
};

use crate::{error::Result, executor::RunReport};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }
}

/// Main output coordinator that handles all result display
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
}

impl OutputCoordinator {
    /// Create a new output coordinator with the specified formatter
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self { formatter }
    }

    /// Render the complete report
    ///
    /// Verbose formatters wrap the summary in the header and per-worker details.
    pub fn display_report(&self, report: &RunReport) -> Result<String> {
        let verbose = self.formatter.is_verbose();
        let mut sections = Vec::new();

        if verbose {
            sections.push(self.formatter.format_header(report)?);
        }

        sections.push(self.formatter.format_summary(report)?);

        if let Some(ref latency) = report.latency {
            sections.push(self.formatter.format_latency(latency)?);
        }

        if verbose {
            sections.push(self.formatter.format_details(report)?);
        }

        Ok(sections.join("\n"))
    }

    /// Render a configuration warning
    pub fn display_warning(&self, warning: &str) -> Result<String> {
        self.formatter.format_warning(warning)
    }
}
