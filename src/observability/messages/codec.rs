// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pixel buffer decoding.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A decoded frame did not match the batch's reference geometry and was left out.
///
/// # Log Level
/// `debug!` - Expected behavior, not an error
///
/// # Example
/// ```
/// use canvas_bridge::observability::messages::codec::FrameDropped;
///
/// let msg = FrameDropped {
///     index: 2,
///     width: 20,
///     height: 20,
///     batch_width: 10,
///     batch_height: 10,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct FrameDropped {
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub batch_width: u32,
    pub batch_height: u32,
}

impl Display for FrameDropped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dropped frame {}: {}x{} does not match batch geometry {}x{}",
            self.index, self.width, self.height, self.batch_width, self.batch_height
        )
    }
}

impl StructuredLog for FrameDropped {
    fn log(&self) {
        tracing::debug!(
            index = self.index,
            width = self.width,
            height = self.height,
            batch_width = self.batch_width,
            batch_height = self.batch_height,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "frame_dropped",
            span_name = name,
            index = self.index,
            width = self.width,
            height = self.height,
        )
    }
}
