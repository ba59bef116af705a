// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors surfaced by the remote layer protocol.

use thiserror::Error;

/// Failure reported by a `LayerProtocol` implementation.
///
/// These originate on the event loop and cross back to the calling worker
/// thread through the bridge when the call was made in waiting mode.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// The remote side rejected or failed the operation.
    #[error("Remote operation failed: {0}")]
    Failed(String),

    /// The backend instance went away while the call was in flight.
    #[error("Backend instance '{0}' disconnected")]
    Disconnected(String),
}
