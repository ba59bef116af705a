// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for fetch/send transfers and change detection.
//!
//! This module contains message types for logging events related to:
//! * Fetch lifecycle (start, per-layer completion, completion)
//! * Send submission
//! * Change tokens that cannot be tied to a canvas state

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A fetch of one or more layers started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use canvas_bridge::observability::messages::transfer::FetchStarted;
///
/// let msg = FetchStarted {
///     instance_id: "ps1",
///     document: "doc1",
///     item_count: 3,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct FetchStarted<'a> {
    pub instance_id: &'a str,
    pub document: &'a str,
    pub item_count: usize,
}

impl Display for FetchStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Fetching {} layer(s) from document '{}' on instance '{}'",
            self.item_count, self.document, self.instance_id
        )
    }
}

impl StructuredLog for FetchStarted<'_> {
    fn log(&self) {
        tracing::info!(
            instance_id = self.instance_id,
            document = self.document,
            item_count = self.item_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "fetch",
            span_name = name,
            instance_id = self.instance_id,
            document = self.document,
            item_count = self.item_count,
        )
    }
}

/// One layer came back from the remote side.
///
/// # Log Level
/// `debug!` - Per-item diagnostic
pub struct LayerFetched<'a> {
    pub layer: &'a str,
    pub width: u32,
    pub height: u32,
    pub components: usize,
    pub duration: Duration,
}

impl Display for LayerFetched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Fetched layer '{}': {}x{}x{} in {:?}",
            self.layer, self.width, self.height, self.components, self.duration
        )
    }
}

impl StructuredLog for LayerFetched<'_> {
    fn log(&self) {
        tracing::debug!(
            layer = self.layer,
            width = self.width,
            height = self.height,
            components = self.components,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "layer_fetched",
            span_name = name,
            layer = self.layer,
            width = self.width,
            height = self.height,
        )
    }
}

/// All layers of a fetch were decoded.
///
/// # Log Level
/// `info!` - Important operational event
pub struct FetchCompleted<'a> {
    pub instance_id: &'a str,
    pub item_count: usize,
    pub duration: Duration,
}

impl Display for FetchCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Fetched {} layer(s) from instance '{}' in {:?}",
            self.item_count, self.instance_id, self.duration
        )
    }
}

impl StructuredLog for FetchCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            instance_id = self.instance_id,
            item_count = self.item_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "fetch_completed",
            span_name = name,
            instance_id = self.instance_id,
            item_count = self.item_count,
            duration = ?self.duration,
        )
    }
}

/// A multi-image send was handed to the outbound queue.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use canvas_bridge::observability::messages::transfer::SendQueued;
///
/// let msg = SendQueued {
///     instance_id: "ps1",
///     document: "doc1",
///     image_count: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct SendQueued<'a> {
    pub instance_id: &'a str,
    pub document: &'a str,
    pub image_count: usize,
}

impl Display for SendQueued<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Queued {} image(s) for document '{}' on instance '{}'",
            self.image_count, self.document, self.instance_id
        )
    }
}

impl StructuredLog for SendQueued<'_> {
    fn log(&self) {
        tracing::info!(
            instance_id = self.instance_id,
            document = self.document,
            image_count = self.image_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "send",
            span_name = name,
            instance_id = self.instance_id,
            document = self.document,
            image_count = self.image_count,
        )
    }
}

/// A change token could not be tied to a canvas state, so a random one was issued.
///
/// # Log Level
/// `debug!` - Expected for unresolved documents
pub struct ChangeTokenVolatile<'a> {
    pub reason: &'a str,
}

impl Display for ChangeTokenVolatile<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Issuing volatile change token: {}", self.reason)
    }
}

impl StructuredLog for ChangeTokenVolatile<'_> {
    fn log(&self) {
        tracing::debug!(reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("change_token", span_name = name, reason = self.reason)
    }
}
