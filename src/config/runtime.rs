// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use tokio::runtime::Handle;

use crate::bridge::EventLoopBridge;
use crate::codec::ImageCodec;
use crate::config::Config;
use crate::engine::{ChangeDetector, TransferOrchestrator};
use crate::registry::InstanceRegistry;
use crate::traits::LayerProtocol;

/// Wires registry, bridge, codec and orchestrator together from configuration.
///
/// # Examples
///
/// ```no_run
/// use canvas_bridge::backends::loopback::LoopbackCanvas;
/// use canvas_bridge::config::{Config, RuntimeBuilder};
/// use std::sync::Arc;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let (registry, orchestrator, detector) = RuntimeBuilder::from_config(
///     &Config::default(),
///     rt.handle().clone(),
///     Arc::new(LoopbackCanvas::new()),
/// );
/// registry.register("ps1");
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build a ready-to-use transfer runtime.
    ///
    /// Returns the shared `InstanceRegistry` (for the connection side to
    /// populate), the `TransferOrchestrator` and a `ChangeDetector` over the
    /// same registry. The bridge's dispatcher is spawned on `handle`.
    pub fn from_config(
        cfg: &Config,
        handle: Handle,
        protocol: Arc<dyn LayerProtocol>,
    ) -> (InstanceRegistry, Arc<TransferOrchestrator>, ChangeDetector) {
        let registry = InstanceRegistry::new();
        let bridge = Arc::new(EventLoopBridge::new(handle, &cfg.bridge));
        let codec = ImageCodec::new(&cfg.codec);
        let orchestrator = Arc::new(TransferOrchestrator::new(
            registry.clone(),
            bridge,
            protocol,
            codec,
        ));
        let detector = ChangeDetector::new(registry.clone());
        (registry, orchestrator, detector)
    }
}
