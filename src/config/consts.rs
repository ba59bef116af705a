// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Default timeout for waiting bridge calls (30 seconds)
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 30_000;
/// Default capacity of the fire-and-forget outbound queue
pub const DEFAULT_SEND_QUEUE_CAPACITY: usize = 32;
/// Side length of the all-zero mask emitted for frames without alpha
pub const DEFAULT_MASK_PLACEHOLDER_SIZE: usize = 64;
/// Default tracing filter directive
pub const DEFAULT_LOG_FILTER: &str = "info";
/// Lowest opacity factor accepted by the opacity nodes
pub const MIN_OPACITY: f32 = 0.01;
/// Highest opacity factor accepted by the opacity nodes
pub const MAX_OPACITY: f32 = 1.0;
