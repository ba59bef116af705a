// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Handoff from synchronous worker threads into the event loop.
//!
//! The editor connections live on a tokio runtime. Node code runs on
//! worker threads (plain threads, `spawn_blocking` threads, or workers of a
//! multi-threaded runtime) and must not block the loop, so every remote
//! operation crosses over through [`EventLoopBridge`] in one of two modes:
//!
//! * [`EventLoopBridge::run`] - spawn the work on the loop and block the
//!   calling thread on a one-shot completion channel (with an optional
//!   timeout) until it yields a value or an error.
//! * [`EventLoopBridge::submit`] - push the work into a bounded outbound
//!   queue drained by a single dispatcher task; the caller does not wait
//!   for the remote side.
//!
//! ```text
//! worker thread ──run()────► handle.spawn(work) ──result──► crossbeam one-shot ──► caller
//! worker thread ──submit()─► mpsc (bounded) ──► dispatcher task ──► work (errors logged)
//! ```
//!
//! The configured call timeout bounds every wait: a waiting call, a
//! blocked submit, and each outbound job on the dispatcher.

mod outbound;

pub use outbound::BoxedWork;

use std::future::Future;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc::{
    self,
    error::{SendTimeoutError, TrySendError},
};
use tokio_util::sync::CancellationToken;

use crate::config::{BridgeConfig, OverflowPolicy};
use crate::errors::{BridgeError, RemoteError};
use crate::observability::messages::bridge::{
    CallCompleted, CallScheduled, CallTimedOut, OutboundJobDropped,
};
use crate::observability::messages::StructuredLog;
use outbound::OutboundJob;

/// Schedules remote work on the event loop from any thread that may block.
pub struct EventLoopBridge {
    handle: Handle,
    call_timeout: Option<Duration>,
    outbound: mpsc::Sender<OutboundJob>,
    capacity: usize,
    overflow: OverflowPolicy,
    shutdown: CancellationToken,
}

/// Block the calling thread on `wait`, if that thread is allowed to block.
///
/// Only a current-thread runtime's own thread is refused: blocking it would
/// stall the loop that has to complete the work. Workers of a multi-threaded
/// runtime hand their scheduler off through `block_in_place` first; plain and
/// `spawn_blocking` threads block directly.
fn block_outside_loop<R>(wait: impl FnOnce() -> R) -> Result<R, BridgeError> {
    match Handle::try_current() {
        Err(_) => Ok(wait()),
        Ok(current) => match current.runtime_flavor() {
            RuntimeFlavor::CurrentThread => Err(BridgeError::CalledFromEventLoop),
            _ => Ok(tokio::task::block_in_place(wait)),
        },
    }
}

impl EventLoopBridge {
    /// Create a bridge onto the runtime behind `handle` and start its outbound dispatcher.
    pub fn new(handle: Handle, config: &BridgeConfig) -> Self {
        let capacity = config.send_queue_capacity.max(1);
        let call_timeout = config.call_timeout();
        let (outbound, jobs) = mpsc::channel(capacity);
        let shutdown = CancellationToken::new();
        handle.spawn(outbound::dispatch(jobs, call_timeout, shutdown.clone()));

        Self {
            handle,
            call_timeout,
            outbound,
            capacity,
            overflow: config.overflow,
            shutdown,
        }
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Run `work` on the event loop and block until it finishes.
    ///
    /// Errors from the work are returned as `BridgeError::Remote`. When the
    /// configured timeout elapses first, the task is aborted and
    /// `BridgeError::Timeout` is returned.
    pub fn run<F, T>(&self, label: &str, work: F) -> Result<T, BridgeError>
    where
        F: Future<Output = Result<T, RemoteError>> + Send + 'static,
        T: Send + 'static,
    {
        if matches!(
            Handle::try_current().map(|h| h.runtime_flavor()),
            Ok(RuntimeFlavor::CurrentThread)
        ) {
            return Err(BridgeError::CalledFromEventLoop);
        }

        let scheduled = CallScheduled { label, wait: true };
        let span = scheduled.span("bridge_run");
        let _guard = span.enter();
        scheduled.log();

        let started = Instant::now();
        let (done, completion) = crossbeam_channel::bounded(1);
        let task = self.handle.spawn(async move {
            // The receiver is gone if the caller already timed out.
            let _ = done.send(work.await);
        });

        let call_timeout = self.call_timeout;
        let received = block_outside_loop(move || match call_timeout {
            Some(timeout) => completion.recv_timeout(timeout),
            None => completion
                .recv()
                .map_err(|_| RecvTimeoutError::Disconnected),
        });

        let outcome = match received {
            Err(refused) => {
                task.abort();
                Err(refused)
            }
            Ok(Ok(result)) => result.map_err(BridgeError::from),
            Ok(Err(RecvTimeoutError::Timeout)) => {
                task.abort();
                let timeout = call_timeout.unwrap_or_default();
                CallTimedOut { label, timeout }.log();
                Err(BridgeError::Timeout(timeout))
            }
            Ok(Err(RecvTimeoutError::Disconnected)) => Err(BridgeError::Cancelled),
        };

        CallCompleted {
            label,
            success: outcome.is_ok(),
            duration: started.elapsed(),
        }
        .log();
        outcome
    }

    /// Queue `work` for the event loop without waiting for it.
    ///
    /// `Ok` means the job was accepted, not that the remote side saw it.
    /// Under `OverflowPolicy::Block` a full queue blocks the caller for at
    /// most the call timeout, then fails with `Timeout`; under `DropNewest`
    /// the job is logged and rejected with `QueueFull`.
    pub fn submit<F>(&self, label: impl Into<String>, work: F) -> Result<(), BridgeError>
    where
        F: Future<Output = Result<(), RemoteError>> + Send + 'static,
    {
        let label = label.into();
        CallScheduled {
            label: &label,
            wait: false,
        }
        .log();

        let job = OutboundJob {
            label,
            work: Box::pin(work),
        };

        match self.overflow {
            OverflowPolicy::Block => {
                let outbound = self.outbound.clone();
                let handle = &self.handle;
                match self.call_timeout {
                    Some(timeout) => {
                        let sent = block_outside_loop(move || {
                            handle.block_on(outbound.send_timeout(job, timeout))
                        })?;
                        match sent {
                            Ok(()) => Ok(()),
                            Err(SendTimeoutError::Timeout(job)) => {
                                CallTimedOut {
                                    label: &job.label,
                                    timeout,
                                }
                                .log();
                                Err(BridgeError::Timeout(timeout))
                            }
                            Err(SendTimeoutError::Closed(_)) => Err(BridgeError::LoopClosed),
                        }
                    }
                    None => block_outside_loop(move || handle.block_on(outbound.send(job)))?
                        .map_err(|_| BridgeError::LoopClosed),
                }
            }
            OverflowPolicy::DropNewest => match self.outbound.try_send(job) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(job)) => {
                    OutboundJobDropped {
                        label: &job.label,
                        capacity: self.capacity,
                    }
                    .log();
                    Err(BridgeError::QueueFull(self.capacity))
                }
                Err(TrySendError::Closed(_)) => Err(BridgeError::LoopClosed),
            },
        }
    }

    /// Stop the outbound dispatcher. Queued jobs that have not started are abandoned.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl std::fmt::Debug for EventLoopBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoopBridge")
            .field("call_timeout", &self.call_timeout)
            .field("capacity", &self.capacity)
            .field("overflow", &self.overflow)
            .field("shut_down", &self.shutdown.is_cancelled())
            .finish()
    }
}
