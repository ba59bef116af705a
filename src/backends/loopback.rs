// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::codec::ImageBlob;
use crate::errors::RemoteError;
use crate::registry::BackendInstance;
use crate::traits::{GetImageRequest, LayerProtocol, RemoteImage, SendImagesRequest};

type LayerKey = (String, String);

/// In-memory canvas that answers fetches from, and applies sends to, a layer map.
#[derive(Debug, Default)]
pub struct LoopbackCanvas {
    layers: Mutex<HashMap<LayerKey, ImageBlob>>,
}

impl LoopbackCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or overwrite one layer.
    pub fn put_layer(&self, document: impl Into<String>, layer: impl Into<String>, blob: ImageBlob) {
        self.lock().insert((document.into(), layer.into()), blob);
    }

    pub fn layer(&self, document: &str, layer: &str) -> Option<ImageBlob> {
        self.lock()
            .get(&(document.to_string(), layer.to_string()))
            .cloned()
    }

    pub fn layer_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<LayerKey, ImageBlob>> {
        self.layers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn ensure_connected(instance: &BackendInstance) -> Result<(), RemoteError> {
    if instance.is_connected() {
        Ok(())
    } else {
        Err(RemoteError::Disconnected(instance.id().to_string()))
    }
}

#[async_trait]
impl LayerProtocol for LoopbackCanvas {
    async fn get_image(
        &self,
        instance: Arc<BackendInstance>,
        request: GetImageRequest,
    ) -> Result<RemoteImage, RemoteError> {
        ensure_connected(&instance)?;
        let blob = self
            .layer(&request.document_identify, &request.layer_identify)
            .ok_or_else(|| {
                RemoteError::Failed(format!(
                    "layer '{}' not found in document '{}'",
                    request.layer_identify, request.document_identify
                ))
            })?;

        tracing::debug!(
            document = %request.document_identify,
            layer = %request.layer_identify,
            bound = ?request.bound_identify,
            selection_only = request.selection_only,
            "Loopback get_image"
        );

        Ok(RemoteImage {
            blob: blob.buffer,
            width: blob.width,
            height: blob.height,
        })
    }

    async fn send_images(
        &self,
        instance: Arc<BackendInstance>,
        request: SendImagesRequest,
    ) -> Result<(), RemoteError> {
        ensure_connected(&instance)?;
        let count = request.image_blobs.len();
        if request.layer_identifies.len() != count || request.bounds_identify.len() != count {
            return Err(RemoteError::Failed(format!(
                "{} images, {} layers and {} bounds do not line up",
                count,
                request.layer_identifies.len(),
                request.bounds_identify.len()
            )));
        }

        {
            let mut layers = self.lock();
            for (blob, layer) in request.image_blobs.into_iter().zip(request.layer_identifies) {
                layers.insert((request.document_identify.clone(), layer), blob);
            }
        }

        let state = instance.bump_canvas_state();
        tracing::debug!(
            document = %request.document_identify,
            image_count = count,
            canvas_state = state,
            "Loopback send_images"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "loopback"
    }
}
