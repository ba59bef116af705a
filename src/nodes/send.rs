// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::codec::ImageTensor;
use crate::engine::{SendRequest, TransferOrchestrator};
use crate::errors::TransferError;
use crate::resolve::{Addressing, LayerOrGroup};

#[derive(Debug, Clone, PartialEq)]
pub struct SendInputs {
    pub images: ImageTensor,
    pub layer_or_group: Vec<LayerOrGroup>,
    pub addressing: Addressing,
    pub bound: Vec<Option<String>>,
}

/// Writes an image batch into editor layers without waiting for the editor.
#[derive(Debug, Clone)]
pub struct SendLayerNode {
    orchestrator: Arc<TransferOrchestrator>,
}

impl SendLayerNode {
    pub fn new(orchestrator: Arc<TransferOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub fn validate(&self) -> Result<(), TransferError> {
        self.orchestrator.ensure_connected()
    }

    pub fn execute(&self, inputs: SendInputs) -> Result<(), TransferError> {
        let request = SendRequest {
            addressing: inputs.addressing,
            images: inputs.images,
            layer_or_group: inputs.layer_or_group,
            bounds: inputs.bound,
        };
        self.orchestrator.send(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::RecordingProtocol;
    use crate::config::{Config, RuntimeBuilder};
    use crate::resolve::DocumentRef;
    use ndarray::Array4;
    use std::time::Duration;
    use tokio::runtime::Runtime;

    #[test]
    fn test_execute_queues_one_send() {
        let rt = Runtime::new().unwrap();
        let protocol = Arc::new(RecordingProtocol::new());
        let (registry, orchestrator, _) =
            RuntimeBuilder::from_config(&Config::default(), rt.handle().clone(), protocol.clone());
        let node = SendLayerNode::new(orchestrator);

        assert!(matches!(node.validate(), Err(TransferError::NotConnected)));
        registry.register("ps1");

        let inputs = SendInputs {
            images: Array4::<f32>::ones((2, 1, 1, 3)),
            layer_or_group: vec![LayerOrGroup::id("x"), LayerOrGroup::id("y")],
            addressing: Addressing::unlinked(&DocumentRef::new("doc1", "ps1")).unwrap(),
            bound: vec![],
        };
        node.execute(inputs).unwrap();

        assert!(protocol.wait_for_sends(1, Duration::from_secs(5)));
        let sends = protocol.sends();
        assert_eq!(sends[0].layer_identifies, vec!["x", "y"]);
        assert_eq!(sends[0].image_blobs[1].buffer, vec![255u8, 255, 255, 255]);
    }
}
