// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for crossing from a worker thread into the event loop.

use std::time::Duration;
use thiserror::Error;

use crate::errors::RemoteError;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// The unit of work itself failed; re-raised on the calling thread.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Waiting call did not complete in time. The scheduled task was aborted.
    #[error("Bridge call timed out after {0:?}")]
    Timeout(Duration),

    /// The task was dropped before reporting a result (runtime shut down or task panicked).
    #[error("Bridge call was cancelled before it completed")]
    Cancelled,

    /// A blocking call was issued from a thread that is running inside the event loop.
    #[error("Blocking bridge call issued from inside the event loop")]
    CalledFromEventLoop,

    /// The outbound queue is full and the overflow policy drops new jobs.
    #[error("Outbound queue is full (capacity {0})")]
    QueueFull(usize),

    /// The outbound dispatcher has stopped.
    #[error("Outbound queue is closed")]
    LoopClosed,
}
