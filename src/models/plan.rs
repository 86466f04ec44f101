//! Executor-facing view of a load run

use super::Config;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Everything a worker needs, fixed before the first connection opens
#[derive(Debug, Clone, Serialize)]
pub struct RunPlan {
    /// Resolved echo server address
    pub target: SocketAddr,
    /// Number of workers, one connection each
    pub connections: u32,
    /// Request bytes shared read-only by all workers
    #[serde(skip)]
    pub payload: Arc<[u8]>,
    /// How long each worker keeps issuing round-trips
    pub duration: Duration,
}

impl RunPlan {
    /// Build a plan with a payload of `payload_size` copies of `payload_byte`
    pub fn new(
        target: SocketAddr,
        connections: u32,
        payload_size: usize,
        payload_byte: u8,
        duration: Duration,
    ) -> Self {
        Self {
            target,
            connections,
            payload: vec![payload_byte; payload_size].into(),
            duration,
        }
    }

    /// Build a plan from validated configuration and an already resolved target
    pub fn from_config(config: &Config, target: SocketAddr) -> Self {
        Self::new(
            target,
            config.connections,
            config.payload_size,
            config.payload_byte,
            config.duration(),
        )
    }

    /// Payload size in bytes, which is also the read size
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }
}
