// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] for emitting the same data as structured `tracing` fields.
//!
//! # Organization
//!
//! * `bridge` - Scheduling, completion, timeouts and outbound queue events
//! * `transfer` - Fetch and send lifecycle, change tokens
//! * `codec` - Frames excluded from a batch
//!
//! # Usage Pattern
//!
//! ```rust
//! use canvas_bridge::observability::messages::transfer::FetchStarted;
//! use canvas_bridge::observability::messages::StructuredLog;
//!
//! let msg = FetchStarted {
//!     instance_id: "ps1",
//!     document: "doc1",
//!     item_count: 2,
//! };
//!
//! let span = msg.span("fetch");
//! let _guard = span.enter();
//! msg.log();
//! ```

pub mod bridge;
pub mod codec;
pub mod transfer;

use std::fmt::Display;
use tracing::Span;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog: Display {
    /// Emit the message at its documented level.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
