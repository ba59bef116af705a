// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fetching layers as image batches and sending image batches to layers.
//!
//! Both directions follow the same shape:
//!
//! 1. **Validation**: a live backend exists, the document resolves, its instance is registered
//! 2. **Resolution**: every item's layer, bound and flags are resolved up front, so a bad
//!    input fails before any remote side effect
//! 3. **Transfer**: remote calls cross into the event loop through `EventLoopBridge`,
//!    one at a time in item order
//!
//! Fetches wait for each layer; sends are queued fire-and-forget.

use ndarray::Axis;
use std::sync::Arc;
use std::time::Instant;

use crate::bridge::EventLoopBridge;
use crate::codec::{ImageBlob, ImageCodec, ImageTensor, MaskTensor};
use crate::errors::{ResolveError, TransferError};
use crate::observability::messages::transfer::{
    FetchCompleted, FetchStarted, LayerFetched, SendQueued,
};
use crate::observability::messages::StructuredLog;
use crate::registry::{BackendInstance, InstanceRegistry};
use crate::resolve::{index_or_broadcast, resolve, Addressing, LayerOrGroup};
use crate::traits::{GetImageRequest, LayerProtocol, SendImagesRequest};

/// Typed inputs of a fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub addressing: Addressing,
    pub layer_or_group: Vec<LayerOrGroup>,
    /// Broadcast per item; empty means no bound.
    pub bounds: Vec<Option<String>>,
    /// Broadcast per item; empty means full layer bounds.
    pub selection_only: Vec<bool>,
}

/// Typed inputs of a send.
#[derive(Debug, Clone, PartialEq)]
pub struct SendRequest {
    pub addressing: Addressing,
    /// `[batch, height, width, channels]`, one target layer per frame.
    pub images: ImageTensor,
    pub layer_or_group: Vec<LayerOrGroup>,
    pub bounds: Vec<Option<String>>,
}

/// One image tensor and one mask tensor per fetched item, in item order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutput {
    pub images: Vec<ImageTensor>,
    pub masks: Vec<MaskTensor>,
}

pub struct TransferOrchestrator {
    registry: InstanceRegistry,
    bridge: Arc<EventLoopBridge>,
    protocol: Arc<dyn LayerProtocol>,
    codec: ImageCodec,
}

impl TransferOrchestrator {
    pub fn new(
        registry: InstanceRegistry,
        bridge: Arc<EventLoopBridge>,
        protocol: Arc<dyn LayerProtocol>,
        codec: ImageCodec,
    ) -> Self {
        Self {
            registry,
            bridge,
            protocol,
            codec,
        }
    }

    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    pub fn codec(&self) -> &ImageCodec {
        &self.codec
    }

    /// Fail with `NotConnected` unless some backend instance is live.
    pub fn ensure_connected(&self) -> Result<(), TransferError> {
        if self.registry.has_live_instance() {
            Ok(())
        } else {
            Err(TransferError::NotConnected)
        }
    }

    /// Look the instance up again and make sure it is still connected.
    fn live_instance(&self, instance_id: &str) -> Result<Arc<BackendInstance>, TransferError> {
        let instance = self
            .registry
            .get(instance_id)
            .ok_or_else(|| TransferError::InstanceNotFound(instance_id.to_string()))?;
        if !instance.is_connected() {
            return Err(TransferError::NotConnected);
        }
        Ok(instance)
    }

    /// Fetch every requested layer as an image and a mask.
    pub fn fetch(&self, request: &FetchRequest) -> Result<FetchOutput, TransferError> {
        self.ensure_connected()?;
        let target = resolve(&request.addressing, &request.layer_or_group)?;
        let instance_id = target.document.instance_id.as_str();
        self.live_instance(instance_id)?;

        let calls = request
            .layer_or_group
            .iter()
            .enumerate()
            .map(|(index, item)| -> Result<GetImageRequest, ResolveError> {
                Ok(GetImageRequest {
                    document_identify: target.document.identify.clone(),
                    layer_identify: target.layer_identify(item, index)?,
                    bound_identify: index_or_broadcast(&request.bounds, index, None)?,
                    selection_only: index_or_broadcast(&request.selection_only, index, false)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let started_msg = FetchStarted {
            instance_id,
            document: &target.document.identify,
            item_count: calls.len(),
        };
        let span = started_msg.span("transfer_fetch");
        let _guard = span.enter();
        started_msg.log();

        let start_time = Instant::now();
        let mut output = FetchOutput::default();

        for call in calls {
            let instance = self.live_instance(instance_id)?;
            let protocol = Arc::clone(&self.protocol);
            let layer = call.layer_identify.clone();

            let call_started = Instant::now();
            let remote = self
                .bridge
                .run("get_image", async move { protocol.get_image(instance, call).await })?;
            let blob = ImageBlob::from_remote(remote.blob, remote.width, remote.height)?;

            LayerFetched {
                layer: &layer,
                width: blob.width,
                height: blob.height,
                components: blob.components,
                duration: call_started.elapsed(),
            }
            .log();

            let decoded = self.codec.decode(std::slice::from_ref(&blob))?;
            output.images.push(decoded.images);
            output.masks.push(decoded.masks);
        }

        FetchCompleted {
            instance_id,
            item_count: output.images.len(),
            duration: start_time.elapsed(),
        }
        .log();

        Ok(output)
    }

    /// Encode every frame of the batch and queue one multi-image send.
    ///
    /// Returns once the send is queued; remote failures are only logged.
    pub fn send(&self, request: &SendRequest) -> Result<(), TransferError> {
        self.ensure_connected()?;
        let target = resolve(&request.addressing, &request.layer_or_group)?;
        let instance_id = target.document.instance_id.as_str();
        let instance = self.live_instance(instance_id)?;

        let frame_count = request.images.len_of(Axis(0));
        let mut layer_identifies = Vec::with_capacity(frame_count);
        let mut bounds_identify = Vec::with_capacity(frame_count);
        for index in 0..frame_count {
            let item = broadcast_layer(&request.layer_or_group, index)?;
            layer_identifies.push(target.layer_identify(item, index)?);
            bounds_identify.push(index_or_broadcast(&request.bounds, index, None)?);
        }

        if frame_count == 0 {
            return Ok(());
        }

        let image_blobs = self.codec.encode_batch(&request.images)?;
        let send = SendImagesRequest {
            document_identify: target.document.identify.clone(),
            image_blobs,
            layer_identifies,
            bounds_identify,
        };

        SendQueued {
            instance_id,
            document: &target.document.identify,
            image_count: frame_count,
        }
        .log();

        let protocol = Arc::clone(&self.protocol);
        self.bridge
            .submit("send_images", async move { protocol.send_images(instance, send).await })?;
        Ok(())
    }
}

/// Target layer of frame `index`: one layer is shared by every frame, otherwise positional.
fn broadcast_layer(layers: &[LayerOrGroup], index: usize) -> Result<&LayerOrGroup, ResolveError> {
    match layers {
        [] => Err(ResolveError::MissingLayer),
        [only] => Ok(only),
        many => many.get(index).ok_or(ResolveError::IndexOutOfRange {
            index,
            len: many.len(),
        }),
    }
}

impl std::fmt::Debug for TransferOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferOrchestrator")
            .field("registry", &self.registry)
            .field("bridge", &self.bridge)
            .field("protocol", &self.protocol.name())
            .field("codec", &self.codec)
            .finish()
    }
}
