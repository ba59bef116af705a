// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tokio::sync::Notify;

use crate::errors::RemoteError;
use crate::registry::BackendInstance;
use crate::traits::{GetImageRequest, LayerProtocol, RemoteImage, SendImagesRequest};

/// A protocol that records every call for assertions.
///
/// Fetches answer with a fixed image. Sends can be held behind a gate to
/// observe that callers do not wait for them.
#[derive(Default)]
pub struct RecordingProtocol {
    pub get_calls: AtomicUsize,
    pub send_calls: AtomicUsize,
    pub sends_completed: AtomicUsize,
    gets: Mutex<Vec<GetImageRequest>>,
    sends: Mutex<Vec<SendImagesRequest>>,
    image: Option<RemoteImage>,
    send_gate: Option<Arc<Notify>>,
    failure: Option<RemoteError>,
}

impl RecordingProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every fetch with this image.
    pub fn with_image(mut self, image: RemoteImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Hold every send until the gate is notified.
    pub fn with_send_gate(mut self, gate: Arc<Notify>) -> Self {
        self.send_gate = Some(gate);
        self
    }

    /// Fail every call with this error.
    pub fn failing(mut self, error: RemoteError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn gets(&self) -> Vec<GetImageRequest> {
        self.gets.lock().unwrap().clone()
    }

    pub fn sends(&self) -> Vec<SendImagesRequest> {
        self.sends.lock().unwrap().clone()
    }

    pub fn remote_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst) + self.send_calls.load(Ordering::SeqCst)
    }

    /// Poll until `count` sends have completed or `timeout` elapses.
    pub fn wait_for_sends(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.sends_completed.load(Ordering::SeqCst) >= count {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }
}

#[async_trait]
impl LayerProtocol for RecordingProtocol {
    async fn get_image(
        &self,
        _instance: Arc<BackendInstance>,
        request: GetImageRequest,
    ) -> Result<RemoteImage, RemoteError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.gets.lock().unwrap().push(request);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.image
            .clone()
            .ok_or_else(|| RemoteError::Failed("no image scripted".to_string()))
    }

    async fn send_images(
        &self,
        _instance: Arc<BackendInstance>,
        request: SendImagesRequest,
    ) -> Result<(), RemoteError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.send_gate {
            gate.notified().await;
        }
        self.sends.lock().unwrap().push(request);
        self.sends_completed.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
