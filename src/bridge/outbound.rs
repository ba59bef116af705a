// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::errors::{BridgeError, RemoteError};
use crate::observability::messages::bridge::{DispatcherStopped, OutboundJobFailed};
use crate::observability::messages::StructuredLog;

/// Boxed unit of work that runs on the event loop.
pub type BoxedWork<T> = Pin<Box<dyn Future<Output = Result<T, RemoteError>> + Send + 'static>>;

/// A fire-and-forget command waiting in the outbound queue.
pub(crate) struct OutboundJob {
    pub label: String,
    pub work: BoxedWork<()>,
}

/// Drain the outbound queue one job at a time, in submission order.
///
/// Runs on the event loop until every sender is gone or `shutdown` fires.
/// A job still running after `job_timeout` is dropped so the jobs behind it
/// can proceed. Job failures have no caller to return to, so they are logged here.
pub(crate) async fn dispatch(
    mut jobs: mpsc::Receiver<OutboundJob>,
    job_timeout: Option<Duration>,
    shutdown: CancellationToken,
) {
    let mut processed: u64 = 0;

    loop {
        let job = tokio::select! {
            _ = shutdown.cancelled() => break,
            job = jobs.recv() => match job {
                Some(job) => job,
                None => break,
            },
        };

        let OutboundJob { label, work } = job;
        let result = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = run_job(work, job_timeout) => result,
        };

        if let Err(error) = result {
            OutboundJobFailed {
                label: &label,
                error: &error,
            }
            .log();
        }
        processed += 1;
    }

    DispatcherStopped { processed }.log();
}

async fn run_job(work: BoxedWork<()>, job_timeout: Option<Duration>) -> Result<(), BridgeError> {
    match job_timeout {
        Some(limit) => match tokio::time::timeout(limit, work).await {
            Ok(result) => result.map_err(BridgeError::from),
            Err(_) => Err(BridgeError::Timeout(limit)),
        },
        None => work.await.map_err(BridgeError::from),
    }
}
