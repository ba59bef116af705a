// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_CALL_TIMEOUT_MS, DEFAULT_LOG_FILTER, DEFAULT_MASK_PLACEHOLDER_SIZE,
    DEFAULT_SEND_QUEUE_CAPACITY,
};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for the bridge.
///
/// Every section is optional; a missing section takes its defaults.
/// It is typically loaded from a YAML configuration file.
///
/// # Fields
/// * `bridge` - Worker thread to event loop handoff (timeouts, outbound queue)
/// * `codec` - Pixel buffer decoding options
/// * `logging` - Tracing filter used by the binary
///
/// # Example
/// ```yaml
/// bridge:
///   call_timeout_ms: 30000
///   send_queue_capacity: 32
///   overflow: block
/// codec:
///   mask_placeholder_size: 64
/// logging:
///   filter: "canvas_bridge=debug,info"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What the outbound queue does when a fire-and-forget job arrives and it is full.
///
/// # Variants
/// * `Block` - The submitting worker thread waits for a free slot
/// * `DropNewest` - The new job is logged and rejected with `BridgeError::QueueFull`
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    #[default]
    Block,
    DropNewest,
}

/// Options for `EventLoopBridge`.
///
/// # Fields
/// * `call_timeout_ms` - Timeout for waiting calls; `null` waits forever
/// * `send_queue_capacity` - Bound of the fire-and-forget queue
/// * `overflow` - Backpressure decision when that queue is full
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: Option<u64>,
    #[serde(default = "default_send_queue_capacity")]
    pub send_queue_capacity: usize,
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: default_call_timeout_ms(),
            send_queue_capacity: default_send_queue_capacity(),
            overflow: OverflowPolicy::default(),
        }
    }
}

impl BridgeConfig {
    /// Timeout for waiting calls, if any.
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }
}

fn default_call_timeout_ms() -> Option<u64> {
    Some(DEFAULT_CALL_TIMEOUT_MS)
}

fn default_send_queue_capacity() -> usize {
    DEFAULT_SEND_QUEUE_CAPACITY
}

/// Options for `ImageCodec`.
#[derive(Debug, Clone, Deserialize)]
pub struct CodecConfig {
    /// Side of the all-zero mask emitted for frames without an alpha channel.
    #[serde(default = "default_mask_placeholder_size")]
    pub mask_placeholder_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            mask_placeholder_size: default_mask_placeholder_size(),
        }
    }
}

fn default_mask_placeholder_size() -> usize {
    DEFAULT_MASK_PLACEHOLDER_SIZE
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Config {
    /// Reject values that would make the bridge unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();
        if self.bridge.send_queue_capacity == 0 {
            problems.push("bridge.send_queue_capacity must be at least 1".to_string());
        }
        if self.bridge.call_timeout_ms == Some(0) {
            problems.push("bridge.call_timeout_ms must be positive or null".to_string());
        }
        if self.codec.mask_placeholder_size == 0 {
            problems.push("codec.mask_placeholder_size must be at least 1".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems.join("; ")))
        }
    }
}

/// Load a config from a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let content = fs::read_to_string(path)?;
    match extension.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        Some("toml") => Ok(toml::from_str(&content)?),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load and validate a config file
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    cfg.validate()?;
    Ok(cfg)
}
