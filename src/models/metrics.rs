//! Per-worker and aggregate result data models

use crate::error::WorkerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Round-trip counts and latency samples gathered by one worker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerResult {
    /// Round-trips whose read returned at least one byte
    pub completed: u64,

    /// One sample per iteration that reached its read, in iteration order.
    /// An iteration whose read hit EOF still contributes a sample, so this can
    /// be one longer than `completed`.
    pub latencies: Vec<Duration>,
}

impl WorkerResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample for an iteration whose read returned data
    pub fn record_round_trip(&mut self, elapsed: Duration) {
        self.latencies.push(elapsed);
        self.completed += 1;
    }

    /// Record a sample for an iteration whose read returned no data
    pub fn record_empty_read(&mut self, elapsed: Duration) {
        self.latencies.push(elapsed);
    }

    /// Number of recorded latency samples
    pub fn sample_count(&self) -> usize {
        self.latencies.len()
    }
}

/// Terminal state of a worker, always carrying the work it managed to do
#[derive(Debug)]
pub enum WorkerOutcome {
    /// The deadline passed with the connection still healthy
    Completed(WorkerResult),
    /// A read returned zero bytes and the loop stopped
    PeerClosed(WorkerResult),
    /// Connect, send or receive failed; `partial` holds progress made before that
    Failed {
        partial: WorkerResult,
        error: WorkerError,
    },
}

impl WorkerOutcome {
    /// Borrow the result regardless of how the worker ended
    pub fn result(&self) -> &WorkerResult {
        match self {
            Self::Completed(result) | Self::PeerClosed(result) => result,
            Self::Failed { partial, .. } => partial,
        }
    }

    /// Take the result regardless of how the worker ended
    pub fn into_result(self) -> WorkerResult {
        match self {
            Self::Completed(result) | Self::PeerClosed(result) => result,
            Self::Failed { partial, .. } => partial,
        }
    }

    /// The failure, if any
    pub fn error(&self) -> Option<&WorkerError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Short label for logs and summaries
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::PeerClosed(_) => "peer closed",
            Self::Failed { error, .. } => error.kind(),
        }
    }
}

/// Totals merged from every worker after all of them have terminated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Sum of completed round-trips across workers
    pub total_completed: u64,

    /// Every latency sample from every worker, grouped by worker in merge order
    pub all_latencies: Vec<Duration>,
}

impl AggregateResult {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one worker's result into the aggregate
    pub fn merge(&mut self, result: WorkerResult) {
        self.total_completed += result.completed;
        self.all_latencies.extend(result.latencies);
    }
}

impl FromIterator<WorkerResult> for AggregateResult {
    fn from_iter<I: IntoIterator<Item = WorkerResult>>(iter: I) -> Self {
        let mut aggregate = Self::new();
        for result in iter {
            aggregate.merge(result);
        }
        aggregate
    }
}

/// How many workers ended in each terminal state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeBreakdown {
    pub completed: u32,
    pub peer_closed: u32,
    pub connect_failed: u32,
    pub io_failed: u32,
    pub panicked: u32,
}

impl OutcomeBreakdown {
    /// Count one worker outcome
    pub fn record(&mut self, outcome: &WorkerOutcome) {
        match outcome {
            WorkerOutcome::Completed(_) => self.completed += 1,
            WorkerOutcome::PeerClosed(_) => self.peer_closed += 1,
            WorkerOutcome::Failed { error, .. } => match error {
                WorkerError::Connect { .. } => self.connect_failed += 1,
                WorkerError::Send(_) | WorkerError::Receive(_) => self.io_failed += 1,
                WorkerError::Panicked(_) => self.panicked += 1,
            },
        }
    }

    /// Workers that ended with an error
    pub fn failed(&self) -> u32 {
        self.connect_failed + self.io_failed + self.panicked
    }

    /// Total workers counted
    pub fn total(&self) -> u32 {
        self.completed + self.peer_closed + self.failed()
    }
}
