//! Configuration validation utilities and rules
//!
//! Hard errors come from [`Config::validate`]; this module adds the advisory
//! checks that flag settings likely to produce misleading measurements.

use crate::{
    models::Config,
    error::Result,
};
use colored::*;
use std::net::IpAddr;

/// Connections above this usually hit the default file descriptor limit
pub const FD_WARNING_THRESHOLD: u32 = 1024;
/// Runs shorter than this give noisy statistics
pub const SHORT_DURATION_SECS: u64 = 3;
/// Echoes above this size may arrive split across several reads
pub const LARGE_PAYLOAD_BYTES: usize = 64 * 1024;

/// Configuration validator with advisory rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration, returning warnings when it is usable
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        config.validate()?;

        warnings.extend(Self::validate_target(config));
        warnings.extend(Self::validate_load_settings(config));

        Ok(warnings)
    }

    /// Check where the load is aimed
    fn validate_target(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let host = config.host.trim_start_matches('[').trim_end_matches(']');

        match host.parse::<IpAddr>() {
            Ok(ip) if ip.is_loopback() => {}
            Ok(ip) if ip.is_unspecified() => {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Target {} is the unspecified address; connections go to the local host", ip)
                ));
            }
            Ok(ip) => {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Target {} is not a loopback address; make sure you are allowed to load it", ip)
                ));
            }
            Err(_) if host.eq_ignore_ascii_case("localhost") => {}
            Err(_) => {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Target host '{}' is not a loopback address; make sure you are allowed to load it", host)
                ));
            }
        }

        if config.port < 1024 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Target port {} is a well-known port", config.port)
            ));
        }

        warnings
    }

    /// Check connection count, duration and payload size
    fn validate_load_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.connections > FD_WARNING_THRESHOLD {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "{} connections may exceed the open file limit (check `ulimit -n`)",
                    config.connections
                )
            ));
        }

        if config.duration_seconds < SHORT_DURATION_SECS {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Duration of {}s may not provide reliable statistics (recommended: >= {}s)",
                    config.duration_seconds, SHORT_DURATION_SECS
                )
            ));
        } else if config.duration_seconds > 3600 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Long duration of {}s; latency samples are kept in memory for the whole run", config.duration_seconds)
            ));
        }

        if config.payload_size > LARGE_PAYLOAD_BYTES {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Payload of {} bytes may be echoed back in several segments; each round-trip reads once",
                    config.payload_size
                )
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Warning => Color::Yellow,
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if use_color {
            format!("{} {}", tag.color(self.level.color()).bold(), self.message)
        } else {
            format!("{} {}", tag, self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
