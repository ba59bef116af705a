// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `LayerProtocol` implementations.
//!
//! # Available Backends
//!
//! ## Loopback Backend
//! In-memory canvas keyed by `(document, layer)`:
//! - **Fetch**: returns the stored pixel buffer for a layer
//! - **Send**: stores every image and bumps the instance's canvas state
//! - **Use Case**: demos, local testing, anything without a live editor
//!
//! ## Stub Backend (Test-Only)
//! - **RecordingProtocol**: counts and records calls, can gate sends and fail on demand
//! - **Note**: NOT available in production builds
//!
//! A networked editor connection implements the same trait and plugs into
//! `TransferOrchestrator` unchanged:
//! ```text
//! TransferOrchestrator → EventLoopBridge → LayerProtocol → editor
//! ```

pub mod loopback;
#[cfg(test)]
pub mod stub;
