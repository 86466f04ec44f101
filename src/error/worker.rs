//! Failure taxonomy for individual load workers
//!
//! Worker failures never abort a run. They travel back to the driver inside
//! a [`WorkerOutcome`](crate::models::WorkerOutcome) next to whatever partial
//! progress the worker made.

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Why a worker stopped before its deadline
#[derive(Error, Debug)]
pub enum WorkerError {
    /// The TCP connection could not be established
    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The payload could not be written in full
    #[error("send failed: {0}")]
    Send(#[source] io::Error),

    /// The read returned an error (a clean zero-byte EOF is not an error)
    #[error("receive failed: {0}")]
    Receive(#[source] io::Error),

    /// The worker task panicked; the message is the panic payload if it was a string
    #[error("worker panicked: {0}")]
    Panicked(String),
}

impl WorkerError {
    /// Short tag used in log fields and the outcome breakdown
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::Send(_) => "send",
            Self::Receive(_) => "receive",
            Self::Panicked(_) => "panic",
        }
    }
}
