//! A single load worker: one connection, send/receive until the deadline

use crate::{
    error::WorkerError,
    logging::WorkerLogger,
    models::{RunPlan, WorkerOutcome, WorkerResult},
};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Run one worker to completion
///
/// Connects once, then repeats write-payload / read-echo until the deadline,
/// the peer closes, or an I/O error occurs. Failures are logged here, as they
/// happen, and returned with the progress made so far; nothing escapes as an
/// error. The socket is dropped, and therefore closed, on every path.
pub async fn worker_run(worker_id: u32, plan: Arc<RunPlan>, logger: WorkerLogger) -> WorkerOutcome {
    let mut stream = match TcpStream::connect(plan.target).await {
        Ok(stream) => stream,
        Err(source) => {
            let error = WorkerError::Connect { addr: plan.target, source };
            logger.log_failure(worker_id, &error, 0).await;
            return WorkerOutcome::Failed {
                partial: WorkerResult::new(),
                error,
            };
        }
    };

    let outcome = drive_round_trips(&mut stream, &plan).await;
    drop(stream);

    match &outcome {
        WorkerOutcome::Failed { partial, error } => {
            logger.log_failure(worker_id, error, partial.completed).await;
        }
        WorkerOutcome::PeerClosed(result) => {
            logger.log_peer_closed(worker_id, result.completed).await;
        }
        WorkerOutcome::Completed(_) => {}
    }
    logger.log_finished(worker_id, &outcome).await;

    outcome
}

/// The round-trip loop over an established stream
///
/// Each iteration writes the whole payload, then performs a single read of up
/// to `payload.len()` bytes. The iteration's latency is recorded before the
/// EOF check, so an iteration that observes the peer closing still yields a
/// sample without counting as completed.
pub async fn drive_round_trips<S>(stream: &mut S, plan: &RunPlan) -> WorkerOutcome
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let deadline = Instant::now() + plan.duration;
    let mut result = WorkerResult::new();
    let mut buf = vec![0u8; plan.payload_size()];

    while Instant::now() < deadline {
        let started = Instant::now();

        if let Err(e) = stream.write_all(&plan.payload).await {
            return WorkerOutcome::Failed {
                partial: result,
                error: WorkerError::Send(e),
            };
        }

        let read = match stream.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                return WorkerOutcome::Failed {
                    partial: result,
                    error: WorkerError::Receive(e),
                };
            }
        };

        let elapsed = started.elapsed();
        if read == 0 {
            result.record_empty_read(elapsed);
            return WorkerOutcome::PeerClosed(result);
        }
        result.record_round_trip(elapsed);
    }

    WorkerOutcome::Completed(result)
}
