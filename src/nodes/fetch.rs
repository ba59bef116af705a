// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::engine::{ChangeDetector, ChangeToken, FetchOutput, FetchRequest, TransferOrchestrator};
use crate::errors::TransferError;
use crate::resolve::{parse_selection_flag, Addressing, LayerOrGroup};

/// Raw inputs of [`FetchLayerNode`] as the host hands them over.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchInputs {
    pub layer_or_group: Vec<LayerOrGroup>,
    pub addressing: Addressing,
    pub bound: Vec<Option<String>>,
    /// String-encoded booleans; empty means `"false"` for every item.
    pub selection_only: Vec<String>,
}

/// Reads layers out of the editor.
#[derive(Debug, Clone)]
pub struct FetchLayerNode {
    orchestrator: Arc<TransferOrchestrator>,
    detector: ChangeDetector,
}

impl FetchLayerNode {
    pub fn new(orchestrator: Arc<TransferOrchestrator>, detector: ChangeDetector) -> Self {
        Self {
            orchestrator,
            detector,
        }
    }

    /// Host pre-flight check: fails with `NotConnected` when no editor is live.
    pub fn validate(&self) -> Result<(), TransferError> {
        self.orchestrator.ensure_connected()
    }

    pub fn execute(&self, inputs: &FetchInputs) -> Result<FetchOutput, TransferError> {
        let request = FetchRequest {
            addressing: inputs.addressing.clone(),
            layer_or_group: inputs.layer_or_group.clone(),
            bounds: inputs.bound.clone(),
            selection_only: inputs
                .selection_only
                .iter()
                .map(|flag| parse_selection_flag(flag))
                .collect(),
        };
        self.orchestrator.fetch(&request)
    }

    /// Cache key for the host: equal tokens mean the cached output is still valid.
    pub fn is_changed(&self, inputs: &FetchInputs) -> ChangeToken {
        self.detector
            .token_for_inputs(&inputs.addressing, &inputs.layer_or_group)
    }
}
