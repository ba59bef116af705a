// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Duration;

use ndarray::{s, Array4};
use serde_json::json;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::Notify;

use crate::backends::loopback::LoopbackCanvas;
use crate::backends::stub::RecordingProtocol;
use crate::bridge::EventLoopBridge;
use crate::codec::{ImageBlob, ImageCodec};
use crate::config::{BridgeConfig, Config, RuntimeBuilder};
use crate::engine::{ChangeToken, FetchRequest, SendRequest, TransferOrchestrator};
use crate::errors::{BridgeError, RemoteError, ResolveError, TransferError};
use crate::registry::{InstanceRegistry, CANVAS_STATE_ID};
use crate::resolve::{Addressing, DocumentRef, LayerOrGroup};
use crate::traits::{LayerProtocol, RemoteImage};

/// Integration tests for fetch/send against recording and loopback protocols.
///
/// Transfers block their caller, so they run from the test thread against an
/// explicitly built multi-threaded runtime rather than inside `#[tokio::test]`.
#[cfg(test)]
mod tests {
    use super::*;

    struct Harness {
        _rt: Runtime,
        registry: InstanceRegistry,
        protocol: Arc<RecordingProtocol>,
        orchestrator: TransferOrchestrator,
    }

    fn harness(protocol: RecordingProtocol) -> Harness {
        let rt = Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        let registry = InstanceRegistry::new();
        let protocol = Arc::new(protocol);
        let bridge = Arc::new(EventLoopBridge::new(rt.handle().clone(), &BridgeConfig::default()));
        let dyn_protocol: Arc<dyn LayerProtocol> = protocol.clone();
        let orchestrator =
            TransferOrchestrator::new(registry.clone(), bridge, dyn_protocol, ImageCodec::default());

        Harness {
            _rt: rt,
            registry,
            protocol,
            orchestrator,
        }
    }

    fn red_2x2() -> RemoteImage {
        RemoteImage {
            blob: [255, 0, 0, 255].repeat(4),
            width: 2,
            height: 2,
        }
    }

    fn unlinked(instance_id: &str) -> Addressing {
        Addressing::unlinked(&DocumentRef::new("doc1", instance_id)).unwrap()
    }

    fn fetch_request(addressing: Addressing, layers: &[&str]) -> FetchRequest {
        FetchRequest {
            addressing,
            layer_or_group: layers.iter().map(|l| LayerOrGroup::id(*l)).collect(),
            bounds: vec![],
            selection_only: vec![],
        }
    }

    fn green(frames: usize) -> Array4<f32> {
        let mut images = Array4::<f32>::zeros((frames, 2, 2, 3));
        images.slice_mut(s![.., .., .., 1]).fill(1.0);
        images
    }

    #[test]
    fn test_fetch_red_layer_gives_red_image_and_empty_mask() {
        let h = harness(RecordingProtocol::new().with_image(red_2x2()));
        h.registry.register("ps1");

        let output = h
            .orchestrator
            .fetch(&fetch_request(unlinked("ps1"), &["L1"]))
            .unwrap();

        assert_eq!(output.images.len(), 1);
        assert_eq!(output.masks.len(), 1);
        let image = &output.images[0];
        assert_eq!(image.shape(), &[1, 2, 2, 3]);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(image.slice(s![0, y, x, ..]).to_vec(), vec![1.0, 0.0, 0.0]);
            }
        }
        assert_eq!(output.masks[0].shape(), &[1, 2, 2]);
        assert!(output.masks[0].iter().all(|&v| v == 0.0));

        let gets = h.protocol.gets();
        assert_eq!(gets[0].document_identify, "doc1");
        assert_eq!(gets[0].layer_identify, "L1");
        assert_eq!(gets[0].bound_identify, None);
        assert!(!gets[0].selection_only);
    }

    #[test]
    fn test_fetch_resolves_each_item_in_order() {
        let h = harness(RecordingProtocol::new().with_image(red_2x2()));
        h.registry.register("ps1");
        let document = DocumentRef::new("doc1", "ps1");

        let request = FetchRequest {
            addressing: Addressing::Linked,
            layer_or_group: vec![
                LayerOrGroup::linked("a", document.clone()),
                LayerOrGroup::linked("b", document.clone()),
                LayerOrGroup::linked("c", document),
            ],
            bounds: vec![Some("sel".to_string())],
            selection_only: vec![true, false, true],
        };
        let output = h.orchestrator.fetch(&request).unwrap();

        assert_eq!(output.images.len(), 3);
        let gets = h.protocol.gets();
        let layers: Vec<_> = gets.iter().map(|g| g.layer_identify.as_str()).collect();
        assert_eq!(layers, vec!["a", "b", "c"]);
        assert!(gets.iter().all(|g| g.bound_identify.as_deref() == Some("sel")));
        let flags: Vec<_> = gets.iter().map(|g| g.selection_only).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_fetch_index_out_of_range_before_any_remote_call() {
        let h = harness(RecordingProtocol::new().with_image(red_2x2()));
        h.registry.register("ps1");

        let mut request = fetch_request(unlinked("ps1"), &["a", "b", "c"]);
        request.bounds = vec![Some("x".to_string()), Some("y".to_string())];
        let result = h.orchestrator.fetch(&request);

        assert!(matches!(
            result,
            Err(TransferError::Resolve(ResolveError::IndexOutOfRange { index: 2, len: 2 }))
        ));
        assert_eq!(h.protocol.remote_calls(), 0);
    }

    #[test]
    fn test_linked_addressing_rejects_raw_ids() {
        let h = harness(RecordingProtocol::new().with_image(red_2x2()));
        h.registry.register("ps1");

        let result = h
            .orchestrator
            .fetch(&fetch_request(Addressing::Linked, &["L1"]));

        assert!(matches!(
            result,
            Err(TransferError::Resolve(ResolveError::UnlinkedLayer(0)))
        ));
        assert_eq!(h.protocol.remote_calls(), 0);
    }

    #[test]
    fn test_fetch_remote_failure_is_reraised() {
        let h = harness(
            RecordingProtocol::new().failing(RemoteError::Failed("layer is locked".to_string())),
        );
        h.registry.register("ps1");

        let result = h.orchestrator.fetch(&fetch_request(unlinked("ps1"), &["L1"]));

        match result {
            Err(TransferError::Bridge(BridgeError::Remote(RemoteError::Failed(msg)))) => {
                assert_eq!(msg, "layer is locked")
            }
            other => panic!("Expected remote failure, got {:?}", other),
        }
    }

    #[test]
    fn test_send_returns_before_remote_acknowledges() {
        let gate = Arc::new(Notify::new());
        let h = harness(RecordingProtocol::new().with_send_gate(Arc::clone(&gate)));
        h.registry.register("ps1");

        let request = SendRequest {
            addressing: unlinked("ps1"),
            images: green(1),
            layer_or_group: vec![LayerOrGroup::id("L1")],
            bounds: vec![],
        };
        h.orchestrator.send(&request).unwrap();

        assert_eq!(h.protocol.sends_completed.load(std::sync::atomic::Ordering::SeqCst), 0);

        gate.notify_one();
        assert!(h.protocol.wait_for_sends(1, Duration::from_secs(5)));

        let sends = h.protocol.sends();
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].document_identify, "doc1");
        assert_eq!(sends[0].layer_identifies, vec!["L1".to_string()]);
        assert_eq!(sends[0].bounds_identify, vec![None]);
        assert_eq!(sends[0].image_blobs.len(), 1);
        assert_eq!(sends[0].image_blobs[0].buffer, [0u8, 255, 0, 255].repeat(4));
        assert_eq!(sends[0].image_blobs[0].components, 4);
    }

    #[test]
    fn test_send_broadcasts_single_layer_over_batch() {
        let h = harness(RecordingProtocol::new());
        h.registry.register("ps1");

        let request = SendRequest {
            addressing: unlinked("ps1"),
            images: green(3),
            layer_or_group: vec![LayerOrGroup::id("L1")],
            bounds: vec![Some("b0".to_string()), None, Some("b2".to_string())],
        };
        h.orchestrator.send(&request).unwrap();
        assert!(h.protocol.wait_for_sends(1, Duration::from_secs(5)));

        let sends = h.protocol.sends();
        assert_eq!(sends[0].image_blobs.len(), 3);
        assert_eq!(sends[0].layer_identifies, vec!["L1"; 3]);
        assert_eq!(
            sends[0].bounds_identify,
            vec![Some("b0".to_string()), None, Some("b2".to_string())]
        );
    }

    #[test]
    fn test_send_layer_count_mismatch_fails_before_queueing() {
        let h = harness(RecordingProtocol::new());
        h.registry.register("ps1");

        let request = SendRequest {
            addressing: unlinked("ps1"),
            images: green(3),
            layer_or_group: vec![LayerOrGroup::id("a"), LayerOrGroup::id("b")],
            bounds: vec![],
        };
        let result = h.orchestrator.send(&request);

        assert!(matches!(
            result,
            Err(TransferError::Resolve(ResolveError::IndexOutOfRange { index: 2, len: 2 }))
        ));
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(h.protocol.remote_calls(), 0);
    }

    #[test]
    fn test_unknown_instance_fails_without_remote_calls() {
        let h = harness(RecordingProtocol::new().with_image(red_2x2()));
        h.registry.register("ps1");

        let fetched = h.orchestrator.fetch(&fetch_request(unlinked("ps9"), &["L1"]));
        assert!(matches!(fetched, Err(TransferError::InstanceNotFound(ref id)) if id == "ps9"));

        let sent = h.orchestrator.send(&SendRequest {
            addressing: unlinked("ps9"),
            images: green(1),
            layer_or_group: vec![LayerOrGroup::id("L1")],
            bounds: vec![],
        });
        assert!(matches!(sent, Err(TransferError::InstanceNotFound(ref id)) if id == "ps9"));

        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(h.protocol.remote_calls(), 0);
    }

    #[test]
    fn test_not_connected() {
        let h = harness(RecordingProtocol::new().with_image(red_2x2()));

        let result = h.orchestrator.fetch(&fetch_request(unlinked("ps1"), &["L1"]));
        assert!(matches!(result, Err(TransferError::NotConnected)));
        assert_eq!(
            TransferError::NotConnected.to_string(),
            "Photoshop is not connected"
        );

        // Another instance is live, but the addressed one has dropped.
        h.registry.register("ps2");
        h.registry.register("ps1").mark_disconnected();
        let result = h.orchestrator.fetch(&fetch_request(unlinked("ps1"), &["L1"]));
        assert!(matches!(result, Err(TransferError::NotConnected)));
        assert_eq!(h.protocol.remote_calls(), 0);
    }

    #[test]
    fn test_empty_batch_send_is_a_no_op() {
        let h = harness(RecordingProtocol::new());
        h.registry.register("ps1");

        let request = SendRequest {
            addressing: unlinked("ps1"),
            images: Array4::<f32>::zeros((0, 2, 2, 3)),
            layer_or_group: vec![LayerOrGroup::id("L1")],
            bounds: vec![],
        };
        h.orchestrator.send(&request).unwrap();

        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(h.protocol.remote_calls(), 0);
    }

    #[test]
    fn test_loopback_round_trip_changes_token() {
        let rt = Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        let canvas = Arc::new(LoopbackCanvas::new());
        canvas.put_layer("doc1", "bg", ImageBlob::new([255, 0, 0, 255].repeat(4), 2, 2, 4));
        let (registry, orchestrator, detector) =
            RuntimeBuilder::from_config(&Config::default(), rt.handle().clone(), canvas.clone());
        registry.register("ps1").set_data(CANVAS_STATE_ID, json!(0));
        let document = DocumentRef::new("doc1", "ps1");

        let before = detector.token_for(Some(&document));
        assert_eq!(before, ChangeToken::CanvasState(json!(0)));

        let fetched = orchestrator
            .fetch(&fetch_request(unlinked("ps1"), &["bg"]))
            .unwrap();
        orchestrator
            .send(&SendRequest {
                addressing: unlinked("ps1"),
                images: fetched.images[0].mapv(|v| v * 0.5),
                layer_or_group: vec![LayerOrGroup::id("result")],
                bounds: vec![],
            })
            .unwrap();

        let mut stored = None;
        for _ in 0..200 {
            stored = canvas.layer("doc1", "result");
            if stored.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        let stored = stored.expect("send never reached the canvas");
        assert_eq!(stored.buffer, [127u8, 0, 0, 255].repeat(4));

        let mut after = detector.token_for(Some(&document));
        for _ in 0..200 {
            if after != before {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
            after = detector.token_for(Some(&document));
        }
        assert_eq!(after, ChangeToken::CanvasState(json!(1)));
    }
}
