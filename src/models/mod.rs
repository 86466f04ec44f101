//! Data models and structures for the echo load tester

pub mod config;
pub mod metrics;
pub mod plan;

// Re-export main model types
pub use config::Config;
pub use metrics::{AggregateResult, OutcomeBreakdown, WorkerOutcome, WorkerResult};
pub use plan::RunPlan;
