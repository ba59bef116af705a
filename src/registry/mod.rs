// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Registry of live backend instances.
//!
//! The registry is shared between the connection-management side (which
//! inserts and removes instances as editors connect and disconnect) and the
//! transfer side (which only looks instances up). Lookups hand out an
//! `Arc<BackendInstance>`, so an instance removed between a liveness check
//! and its use stays valid for the caller; callers re-check
//! [`BackendInstance::is_connected`] right before issuing remote work.

mod instance;

pub use instance::{BackendInstance, CANVAS_STATE_ID};

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe map of instance id -> backend connection.
#[derive(Clone, Default)]
pub struct InstanceRegistry {
    inner: Arc<RwLock<HashMap<String, Arc<BackendInstance>>>>,
}

impl InstanceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an instance, replacing any previous one with the same id.
    pub fn insert(&self, instance: Arc<BackendInstance>) -> Option<Arc<BackendInstance>> {
        self.write()
            .insert(instance.id().to_string(), instance)
    }

    /// Create, insert and return a fresh connected instance.
    pub fn register(&self, instance_id: impl Into<String>) -> Arc<BackendInstance> {
        let instance = Arc::new(BackendInstance::new(instance_id));
        self.insert(Arc::clone(&instance));
        instance
    }

    /// Remove an instance and mark it disconnected for anyone still holding it.
    pub fn remove(&self, instance_id: &str) -> Option<Arc<BackendInstance>> {
        let removed = self.write().remove(instance_id);
        if let Some(instance) = &removed {
            instance.mark_disconnected();
        }
        removed
    }

    /// Get an instance by id
    pub fn get(&self, instance_id: &str) -> Option<Arc<BackendInstance>> {
        self.read().get(instance_id).cloned()
    }

    /// Check if an instance exists
    pub fn contains(&self, instance_id: &str) -> bool {
        self.read().contains_key(instance_id)
    }

    /// True when at least one connected instance is registered.
    pub fn has_live_instance(&self) -> bool {
        self.read().values().any(|instance| instance.is_connected())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Get all instance ids
    pub fn ids(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<BackendInstance>>> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<BackendInstance>>> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for InstanceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let map = self.read();
        f.debug_struct("InstanceRegistry")
            .field("instance_count", &map.len())
            .field("instance_ids", &map.keys().collect::<Vec<_>>())
            .finish()
    }
}
