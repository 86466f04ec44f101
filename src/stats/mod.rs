//! Latency and throughput statistics for a finished load run

use crate::models::AggregateResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Percentiles reported in verbose output
pub const REPORTED_PERCENTILES: [f64; 3] = [50.0, 90.0, 99.0];

/// Summary of the latency samples of a run
///
/// Only exists when there is at least one sample; an empty run has no latency
/// section at all rather than zeroed or NaN figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Number of samples summarised
    pub count: usize,
    /// Arithmetic mean
    pub avg: Duration,
    /// Smallest sample
    pub min: Duration,
    /// Largest sample
    pub max: Duration,
    /// Median
    pub p50: Duration,
    /// 90th percentile
    pub p90: Duration,
    /// 99th percentile
    pub p99: Duration,
}

impl LatencyStats {
    /// Summarise samples; returns None when there are none
    pub fn from_samples(samples: &[Duration]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let total_nanos: u128 = sorted.iter().map(Duration::as_nanos).sum();
        let avg_nanos = total_nanos / sorted.len() as u128;

        Some(Self {
            count: sorted.len(),
            avg: nanos_to_duration(avg_nanos),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p50: percentile_of_sorted(&sorted, 50.0),
            p90: percentile_of_sorted(&sorted, 90.0),
            p99: percentile_of_sorted(&sorted, 99.0),
        })
    }

    /// Summarise the latencies of an aggregate
    pub fn from_aggregate(aggregate: &AggregateResult) -> Option<Self> {
        Self::from_samples(&aggregate.all_latencies)
    }

    pub fn avg_ms(&self) -> f64 {
        to_ms(self.avg)
    }

    pub fn min_ms(&self) -> f64 {
        to_ms(self.min)
    }

    pub fn max_ms(&self) -> f64 {
        to_ms(self.max)
    }

    /// Look up one of the precomputed percentiles
    pub fn percentile_ms(&self, percentile: f64) -> Option<f64> {
        match percentile as u32 {
            50 => Some(to_ms(self.p50)),
            90 => Some(to_ms(self.p90)),
            99 => Some(to_ms(self.p99)),
            _ => None,
        }
    }
}

/// Round-trip throughput over the configured test duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThroughputStats {
    /// Completed round-trips across all workers
    pub total_completed: u64,
    /// Configured test duration the rate is computed over
    pub duration: Duration,
    /// Round-trips per second
    pub qps: f64,
}

impl ThroughputStats {
    /// Compute QPS as `total / duration`; a zero duration yields 0 rather than infinity
    pub fn new(total_completed: u64, duration: Duration) -> Self {
        let secs = duration.as_secs_f64();
        let qps = if secs > 0.0 {
            total_completed as f64 / secs
        } else {
            0.0
        };

        Self {
            total_completed,
            duration,
            qps,
        }
    }
}

/// Nearest-rank percentile over already sorted samples
pub fn percentile_of_sorted(sorted: &[Duration], percentile: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }

    let clamped = percentile.clamp(0.0, 100.0);
    let rank = ((clamped / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}

/// Duration as fractional milliseconds
pub fn to_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn nanos_to_duration(nanos: u128) -> Duration {
    let secs = (nanos / 1_000_000_000) as u64;
    let subsec = (nanos % 1_000_000_000) as u32;
    Duration::new(secs, subsec)
}
