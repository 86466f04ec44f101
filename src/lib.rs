//! Echo Load Tester
//!
//! A concurrent load generator for TCP echo services. It opens a fixed number
//! of persistent connections, drives send/receive round-trips on each until a
//! deadline, and reports aggregate throughput and latency.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod stats;

// Re-export commonly used types
pub use error::{AppError, Result, WorkerError};
pub use executor::{LoadDriver, RunReport};
pub use models::{AggregateResult, Config, RunPlan, WorkerOutcome, WorkerResult};
pub use stats::{LatencyStats, ThroughputStats};
pub use output::{OutputFormatter, ColoredFormatter, PlainFormatter, OutputFormatterFactory};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Build metadata stamped by build.rs
pub const BUILD_TIME: Option<&str> = option_env!("BUILD_TIME");
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");
pub const TARGET_TRIPLE: Option<&str> = option_env!("TARGET_TRIPLE");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_HOST: &str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_CONNECTIONS: u32 = 500;
    pub const DEFAULT_PAYLOAD_SIZE: usize = 1024;
    pub const DEFAULT_PAYLOAD_BYTE: u8 = b'x';
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(30);
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    pub const DEFAULT_LOG_FORMAT: &str = "console";

    /// Hard upper bounds enforced by configuration validation
    pub const MAX_CONNECTIONS: u32 = 100_000;
    pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;
    pub const MAX_DURATION_SECS: u64 = 86_400;
}
