// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised while converting between raw pixel buffers and tensors.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Unsupported number of components: {0} (expected 1, 3 or 4)")]
    UnsupportedPixelFormat(usize),

    #[error(
        "Malformed pixel buffer for {width}x{height}x{components}: expected {expected} bytes, got {actual}"
    )]
    MalformedBuffer {
        width: u32,
        height: u32,
        components: usize,
        expected: usize,
        actual: usize,
    },

    /// Every candidate frame was dropped, nothing left to return.
    #[error("No frames decoded: the batch is empty")]
    EmptyBatch,

    #[error("Tensor shape error: {0}")]
    ShapeMismatch(#[from] ndarray::ShapeError),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
}
