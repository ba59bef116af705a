// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Top-level error for fetch/send transfers and the node surface.

use thiserror::Error;

use crate::errors::{BridgeError, CodecError, ResolveError};

#[derive(Error, Debug)]
pub enum TransferError {
    /// No live backend connection at all.
    #[error("Photoshop is not connected")]
    NotConnected,

    #[error("Backend instance '{0}' not found")]
    InstanceNotFound(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("Opacity {0} is outside [0.01, 1.0]")]
    InvalidOpacity(f32),

    #[error("Missing required input '{0}'")]
    MissingInput(&'static str),

    #[error("Text encoding failed: {0}")]
    Encoding(#[from] anyhow::Error),
}
