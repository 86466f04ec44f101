//! Command-line interface module

use crate::logging::LogFormat;
use crate::models::config::parse_payload_byte;
use clap::Parser;

/// Echo Load Tester - Drive concurrent TCP echo round-trips and report throughput and latency
///
/// Every option can also be set through the environment or a `.env` file in
/// the working directory; command-line values take precedence.
#[derive(Parser, Debug, Clone)]
#[command(name = "elt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Echo server host name or IP address [env: TARGET_HOST] [default: 127.0.0.1]
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Echo server TCP port [env: TARGET_PORT] [default: 8080]
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Number of concurrent connections [env: CONNECTIONS] [default: 500]
    #[arg(short, long, value_name = "N")]
    pub connections: Option<u32>,

    /// Payload size in bytes [env: PAYLOAD_SIZE] [default: 1024]
    #[arg(short = 's', long, value_name = "BYTES")]
    pub payload_size: Option<usize>,

    /// Character the payload is filled with [env: PAYLOAD_BYTE] [default: x]
    #[arg(long, value_name = "CHAR", value_parser = parse_payload_byte)]
    pub payload_byte: Option<u8>,

    /// Test duration in seconds [env: DURATION_SECONDS] [default: 30]
    #[arg(short, long, value_name = "SECONDS")]
    pub duration: Option<u64>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log output format: console, json or compact [env: LOG_FORMAT]
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        Ok(())
    }

    /// Explicit color choice from the flags, if any
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled, falling back to terminal detection
    pub fn use_colors(&self) -> bool {
        self.color_override().unwrap_or_else(supports_color)
    }
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
