// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;
use uuid::Uuid;

use crate::observability::messages::transfer::ChangeTokenVolatile;
use crate::observability::messages::StructuredLog;
use crate::registry::InstanceRegistry;
use crate::resolve::{resolve, Addressing, DocumentRef, LayerOrGroup};

/// Cache-invalidation token for a document.
///
/// Equal tokens across calls mean nothing changed remotely in between.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeToken {
    /// The owning instance's `canvasStateID`, verbatim.
    CanvasState(Value),
    /// Fresh per call; the document could not be tied to a canvas state.
    Volatile(Uuid),
}

impl ChangeToken {
    fn volatile(reason: &str) -> Self {
        ChangeTokenVolatile { reason }.log();
        ChangeToken::Volatile(Uuid::new_v4())
    }
}

/// Produces [`ChangeToken`]s from the instance registry.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    registry: InstanceRegistry,
}

impl ChangeDetector {
    pub fn new(registry: InstanceRegistry) -> Self {
        Self { registry }
    }

    pub fn token_for(&self, document: Option<&DocumentRef>) -> ChangeToken {
        let Some(document) = document else {
            return ChangeToken::volatile("no document");
        };
        let Some(instance) = self.registry.get(&document.instance_id) else {
            return ChangeToken::volatile("instance not registered");
        };
        match instance.canvas_state_id() {
            Some(state) => ChangeToken::CanvasState(state),
            None => ChangeToken::volatile("instance has no canvas state"),
        }
    }

    /// Token for a node's raw addressing inputs; unresolvable inputs yield a volatile token.
    pub fn token_for_inputs(
        &self,
        addressing: &Addressing,
        layer_or_group: &[LayerOrGroup],
    ) -> ChangeToken {
        match resolve(addressing, layer_or_group) {
            Ok(target) => self.token_for(Some(&target.document)),
            Err(_) => ChangeToken::volatile("document could not be resolved"),
        }
    }
}
