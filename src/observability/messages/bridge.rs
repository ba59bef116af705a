// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for handing work from worker threads to the event loop.
//!
//! This module contains message types for logging events related to:
//! * Waiting calls (scheduled, completed, timed out)
//! * Fire-and-forget jobs (queued, dropped, failed)
//! * Outbound dispatcher lifecycle

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A unit of work was scheduled on the event loop.
///
/// # Log Level
/// `debug!` - Per-call diagnostic
///
/// # Example
/// ```
/// use canvas_bridge::observability::messages::bridge::CallScheduled;
///
/// let msg = CallScheduled {
///     label: "get_image",
///     wait: true,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct CallScheduled<'a> {
    pub label: &'a str,
    pub wait: bool,
}

impl Display for CallScheduled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let mode = if self.wait { "waiting" } else { "fire-and-forget" };
        write!(f, "Scheduled '{}' on event loop ({})", self.label, mode)
    }
}

impl StructuredLog for CallScheduled<'_> {
    fn log(&self) {
        tracing::debug!(label = self.label, wait = self.wait, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "bridge_call",
            span_name = name,
            label = self.label,
            wait = self.wait,
        )
    }
}

/// A waiting call returned to its caller.
///
/// # Log Level
/// `debug!` - Per-call diagnostic
pub struct CallCompleted<'a> {
    pub label: &'a str,
    pub success: bool,
    pub duration: Duration,
}

impl Display for CallCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Call '{}' completed: success={}, duration={:?}",
            self.label, self.success, self.duration
        )
    }
}

impl StructuredLog for CallCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            label = self.label,
            success = self.success,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "bridge_call_completed",
            span_name = name,
            label = self.label,
            success = self.success,
            duration = ?self.duration,
        )
    }
}

/// A waiting call exceeded its timeout and the scheduled task was aborted.
///
/// # Log Level
/// `warn!` - Remote side may have disconnected mid-call
///
/// # Example
/// ```
/// use canvas_bridge::observability::messages::bridge::CallTimedOut;
/// use std::time::Duration;
///
/// let msg = CallTimedOut {
///     label: "get_image",
///     timeout: Duration::from_secs(30),
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct CallTimedOut<'a> {
    pub label: &'a str,
    pub timeout: Duration,
}

impl Display for CallTimedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Call '{}' timed out after {:?}; task aborted",
            self.label, self.timeout
        )
    }
}

impl StructuredLog for CallTimedOut<'_> {
    fn log(&self) {
        tracing::warn!(
            label = self.label,
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "bridge_call_timed_out",
            span_name = name,
            label = self.label,
            timeout = ?self.timeout,
        )
    }
}

/// A fire-and-forget job was dropped because the outbound queue was full.
///
/// # Log Level
/// `warn!` - Degraded behavior, the remote side never sees this job
pub struct OutboundJobDropped<'a> {
    pub label: &'a str,
    pub capacity: usize,
}

impl Display for OutboundJobDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dropped outbound job '{}': queue full (capacity {})",
            self.label, self.capacity
        )
    }
}

impl StructuredLog for OutboundJobDropped<'_> {
    fn log(&self) {
        tracing::warn!(label = self.label, capacity = self.capacity, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "outbound_job_dropped",
            span_name = name,
            label = self.label,
            capacity = self.capacity,
        )
    }
}

/// A fire-and-forget job failed on the event loop.
///
/// Nobody is waiting for these jobs, so this log line is the only place
/// the failure is observable.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct OutboundJobFailed<'a> {
    pub label: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for OutboundJobFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Outbound job '{}' failed: {}", self.label, self.error)
    }
}

impl StructuredLog for OutboundJobFailed<'_> {
    fn log(&self) {
        tracing::error!(label = self.label, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "outbound_job_failed",
            span_name = name,
            label = self.label,
            error = %self.error,
        )
    }
}

/// The outbound dispatcher exited.
///
/// # Log Level
/// `info!` - Lifecycle event
pub struct DispatcherStopped {
    pub processed: u64,
}

impl Display for DispatcherStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Outbound dispatcher stopped after {} jobs",
            self.processed
        )
    }
}

impl StructuredLog for DispatcherStopped {
    fn log(&self) {
        tracing::info!(processed = self.processed, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dispatcher_stopped",
            span_name = name,
            processed = self.processed,
        )
    }
}
