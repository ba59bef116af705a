// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout the bridge. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent between the human-readable line and the structured fields
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::bridge` - Worker thread to event loop handoff
//! * `messages::transfer` - Fetch/send orchestration and change detection
//! * `messages::codec` - Pixel buffer decoding
//!
//! # Usage
//!
//! ```rust
//! use canvas_bridge::observability::messages::bridge::OutboundJobFailed;
//! use canvas_bridge::observability::messages::StructuredLog;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
//! let msg = OutboundJobFailed {
//!     label: "send_images",
//!     error: &error,
//! };
//!
//! msg.log();
//! ```

pub mod messages;
