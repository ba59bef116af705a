// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use crate::codec::ImageBlob;
use crate::errors::RemoteError;
use crate::registry::BackendInstance;

/// Parameters of one remote `get_image` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetImageRequest {
    pub document_identify: String,
    pub layer_identify: String,
    pub bound_identify: Option<String>,
    pub selection_only: bool,
}

/// Raw payload returned by `get_image`. The component count is implied by the length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteImage {
    pub blob: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Parameters of one multi-image `send_images` call; the three lists are parallel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendImagesRequest {
    pub document_identify: String,
    pub image_blobs: Vec<ImageBlob>,
    pub layer_identifies: Vec<String>,
    pub bounds_identify: Vec<Option<String>>,
}

/// Network protocol spoken with the image editor.
///
/// Implementations run on the event loop that owns the connections; the
/// transfer code reaches them through `EventLoopBridge`.
#[async_trait]
pub trait LayerProtocol: Send + Sync {
    async fn get_image(
        &self,
        instance: Arc<BackendInstance>,
        request: GetImageRequest,
    ) -> Result<RemoteImage, RemoteError>;

    async fn send_images(
        &self,
        instance: Arc<BackendInstance>,
        request: SendImagesRequest,
    ) -> Result<(), RemoteError>;

    fn name(&self) -> &'static str;
}
