// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Key of the counter the remote side bumps whenever the canvas changes.
pub const CANVAS_STATE_ID: &str = "canvasStateID";

/// A live connection to one image-editor instance.
///
/// Created by the connection handshake and torn down on disconnect; the
/// transfer code only reads it. `data` mirrors the state the remote side
/// pushes (document list, `canvasStateID`, ...).
#[derive(Debug)]
pub struct BackendInstance {
    instance_id: String,
    connected: AtomicBool,
    data: RwLock<Map<String, Value>>,
}

impl BackendInstance {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            connected: AtomicBool::new(true),
            data: RwLock::new(Map::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.instance_id
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::Release);
    }

    /// Snapshot of one entry of the instance's data map.
    pub fn data_value(&self, key: &str) -> Option<Value> {
        self.read_data().get(key).cloned()
    }

    pub fn set_data(&self, key: impl Into<String>, value: Value) {
        self.write_data().insert(key.into(), value);
    }

    /// Current canvas state counter, if the remote side has reported one.
    pub fn canvas_state_id(&self) -> Option<Value> {
        self.data_value(CANVAS_STATE_ID).filter(|v| !v.is_null())
    }

    /// Increment the canvas state counter and return the new value.
    ///
    /// A missing or non-numeric counter restarts at 1.
    pub fn bump_canvas_state(&self) -> u64 {
        let mut data = self.write_data();
        let next = data
            .get(CANVAS_STATE_ID)
            .and_then(Value::as_u64)
            .map_or(1, |current| current.wrapping_add(1));
        data.insert(CANVAS_STATE_ID.to_string(), Value::from(next));
        next
    }

    fn read_data(&self) -> RwLockReadGuard<'_, Map<String, Value>> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_data(&self) -> RwLockWriteGuard<'_, Map<String, Value>> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
