//! Load execution engine
//!
//! The [`LoadDriver`] spawns one worker task per connection on the tokio
//! multi-threaded runtime, waits for every one of them to reach a terminal
//! state, and only then folds their results into an aggregate. Workers share
//! nothing mutable while they run: each returns its own result slot.

pub mod worker;

pub use worker::{drive_round_trips, worker_run};

use crate::{
    error::{AppError, Result, WorkerError},
    logging::{Logger, WorkerLogger},
    models::{AggregateResult, Config, OutcomeBreakdown, RunPlan, WorkerOutcome, WorkerResult},
    stats::{LatencyStats, ThroughputStats},
};
use futures::future::join_all;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinError;

/// Everything known about a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Address the workers connected to
    pub target: SocketAddr,
    /// Number of workers started
    pub connections: u32,
    /// Payload size in bytes
    pub payload_size: usize,
    /// Configured test duration
    pub duration: Duration,
    /// Wall-clock time from first spawn to last join
    pub elapsed: Duration,
    /// Merged worker results
    pub aggregate: AggregateResult,
    /// Workers per terminal state
    pub outcomes: OutcomeBreakdown,
    /// Throughput over the configured duration
    pub throughput: ThroughputStats,
    /// Latency summary, absent when no sample was recorded
    pub latency: Option<LatencyStats>,
}

impl RunReport {
    /// Derive the report from merged results
    pub fn new(
        plan: &RunPlan,
        elapsed: Duration,
        aggregate: AggregateResult,
        outcomes: OutcomeBreakdown,
    ) -> Self {
        let throughput = ThroughputStats::new(aggregate.total_completed, plan.duration);
        let latency = LatencyStats::from_aggregate(&aggregate);

        Self {
            target: plan.target,
            connections: plan.connections,
            payload_size: plan.payload_size(),
            duration: plan.duration,
            elapsed,
            aggregate,
            outcomes,
            throughput,
            latency,
        }
    }

    /// Total completed round-trips
    pub fn total_completed(&self) -> u64 {
        self.aggregate.total_completed
    }

    /// Whether every worker failed
    pub fn all_failed(&self) -> bool {
        self.connections > 0 && self.outcomes.failed() == self.connections
    }
}

/// Orchestrates the concurrent workers of one load run
pub struct LoadDriver {
    logger: Logger,
    worker_logger: WorkerLogger,
}

impl LoadDriver {
    /// Create a driver logging through `logger`
    pub fn new(logger: Logger) -> Self {
        let worker_logger = WorkerLogger::from_logger(logger.clone());
        Self {
            logger: logger.named("DRIVER"),
            worker_logger,
        }
    }

    /// Resolve the configured target and run the load test
    pub async fn run_config(&self, config: &Config) -> Result<RunReport> {
        let target = resolve_target(config).await?;
        let plan = RunPlan::from_config(config, target);
        Ok(self.run(plan).await)
    }

    /// Run every worker of the plan to completion and aggregate their results
    ///
    /// There is no timeout on the join: a worker stuck in connect, write or
    /// read holds up the whole run.
    pub async fn run(&self, plan: RunPlan) -> RunReport {
        let plan = Arc::new(plan);

        crate::log_info!(
            self.logger,
            "Starting {} workers against {} for {:?} ({} byte payload)",
            plan.connections,
            plan.target,
            plan.duration,
            plan.payload_size()
        );

        let started = Instant::now();
        let handles: Vec<_> = (0..plan.connections)
            .map(|worker_id| {
                tokio::spawn(worker_run(worker_id, Arc::clone(&plan), self.worker_logger.clone()))
            })
            .collect();

        let joined = join_all(handles).await;
        let elapsed = started.elapsed();

        let mut aggregate = AggregateResult::new();
        let mut outcomes = OutcomeBreakdown::default();
        for (worker_id, joined) in (0u32..).zip(joined) {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(join_error) => self.panicked_outcome(worker_id, join_error).await,
            };
            outcomes.record(&outcome);
            aggregate.merge(outcome.into_result());
        }

        crate::log_debug!(
            self.logger,
            "All workers joined after {:?}: {} round-trips, {} samples, {} failed workers",
            elapsed,
            aggregate.total_completed,
            aggregate.all_latencies.len(),
            outcomes.failed()
        );

        RunReport::new(&plan, elapsed, aggregate, outcomes)
    }

    async fn panicked_outcome(&self, worker_id: u32, join_error: JoinError) -> WorkerOutcome {
        let error = WorkerError::Panicked(panic_message(join_error));
        self.worker_logger.log_failure(worker_id, &error, 0).await;
        WorkerOutcome::Failed {
            partial: WorkerResult::new(),
            error,
        }
    }
}

/// Resolve `host:port` once, before any worker starts
///
/// IPv4 addresses win over IPv6 ones, so `localhost` reaches a server bound
/// to `127.0.0.1` even where the resolver lists `::1` first.
pub async fn resolve_target(config: &Config) -> Result<SocketAddr> {
    let target = config.target();
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host(target.as_str())
        .await
        .map_err(|e| AppError::network(format!("Failed to resolve {}: {}", target, e)))?
        .collect();

    preferred_address(&addrs)
        .ok_or_else(|| AppError::network(format!("{} resolved to no addresses", target)))
}

/// First IPv4 address, falling back to the first address of any family
fn preferred_address(addrs: &[SocketAddr]) -> Option<SocketAddr> {
    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

fn panic_message(join_error: JoinError) -> String {
    match join_error.try_into_panic() {
        Ok(payload) => {
            if let Some(message) = payload.downcast_ref::<&str>() {
                (*message).to_string()
            } else if let Some(message) = payload.downcast_ref::<String>() {
                message.clone()
            } else {
                "non-string panic payload".to_string()
            }
        }
        Err(join_error) => join_error.to_string(),
    }
}
