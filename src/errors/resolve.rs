// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised while resolving node inputs into concrete remote targets.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("No layer or group was supplied")]
    MissingLayer,

    /// Linked addressing was requested but the item carries no document.
    #[error("Layer at index {0} is not a linked layer reference")]
    UnlinkedLayer(usize),

    #[error("Invalid document reference: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error("Index {index} out of range for {len} supplied values")]
    IndexOutOfRange { index: usize, len: usize },
}
