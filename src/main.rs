// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{anyhow, Context};
use canvas_bridge::backends::loopback::LoopbackCanvas;
use canvas_bridge::codec::ImageBlob;
use canvas_bridge::config::{load_and_validate_config, Config, LoggingConfig, RuntimeBuilder};
use canvas_bridge::engine::ChangeDetector;
use canvas_bridge::nodes::{FetchInputs, FetchLayerNode, ImageTimesOpacity, SendInputs, SendLayerNode};
use canvas_bridge::registry::CANVAS_STATE_ID;
use canvas_bridge::resolve::{Addressing, DocumentRef, LayerOrGroup};
use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tokio::runtime::Builder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const INSTANCE_ID: &str = "ps1";
const DOCUMENT: &str = "doc1";
const SOURCE_LAYER: &str = "background";
const TARGET_LAYER: &str = "result";

fn init_tracing(logging: &LoggingConfig) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// 4x4 opaque gradient: red grows left to right, blue top to bottom.
fn seed_layer() -> ImageBlob {
    let mut buffer = Vec::with_capacity(4 * 4 * 4);
    for y in 0..4u8 {
        for x in 0..4u8 {
            buffer.extend_from_slice(&[x * 85, 0, y * 85, 255]);
        }
    }
    ImageBlob::new(buffer, 4, 4, 4)
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [config.yaml|config.toml]", args[0]);
        std::process::exit(1);
    }

    let cfg = match args.get(1) {
        Some(path) => load_and_validate_config(path)
            .with_context(|| format!("failed to load config '{}'", path))?,
        None => Config::default(),
    };
    init_tracing(&cfg.logging);

    let rt = Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start event loop")?;

    let canvas = Arc::new(LoopbackCanvas::new());
    canvas.put_layer(DOCUMENT, SOURCE_LAYER, seed_layer());

    let (registry, orchestrator, detector) =
        RuntimeBuilder::from_config(&cfg, rt.handle().clone(), canvas.clone());
    registry
        .register(INSTANCE_ID)
        .set_data(CANVAS_STATE_ID, serde_json::json!(0));

    println!("🎨 Canvas Bridge Loopback Demo");
    println!("══════════════════════════════");
    println!("Instance: {}  Document: {}", INSTANCE_ID, DOCUMENT);
    println!();

    let fetch_node = FetchLayerNode::new(Arc::clone(&orchestrator), detector.clone());
    let send_node = SendLayerNode::new(orchestrator);

    // Transfers block their caller, so they run on a plain worker thread outside the loop.
    let worker = thread::spawn(move || run_demo(fetch_node, send_node, detector, canvas));
    worker
        .join()
        .map_err(|_| anyhow!("worker thread panicked"))??;

    println!("\n🎉 Demo complete!");
    Ok(())
}

fn run_demo(
    fetch_node: FetchLayerNode,
    send_node: SendLayerNode,
    detector: ChangeDetector,
    canvas: Arc<LoopbackCanvas>,
) -> anyhow::Result<()> {
    let addressing = Addressing::unlinked(&DocumentRef::new(DOCUMENT, INSTANCE_ID))?;
    let fetch_inputs = FetchInputs {
        layer_or_group: vec![LayerOrGroup::id(SOURCE_LAYER)],
        addressing: addressing.clone(),
        bound: vec![],
        selection_only: vec!["false".to_string()],
    };

    fetch_node.validate()?;
    let before = fetch_node.is_changed(&fetch_inputs);
    println!("🔖 Change token before: {:?}", before);

    let start = Instant::now();
    let fetched = fetch_node.execute(&fetch_inputs)?;
    let image = fetched
        .images
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("fetch returned no image"))?;
    println!(
        "📥 Fetched '{}' as {:?} in {:?}",
        SOURCE_LAYER,
        image.shape(),
        start.elapsed()
    );

    let dimmed = ImageTimesOpacity.execute(&image, 0.5)?;
    send_node.execute(SendInputs {
        images: dimmed,
        layer_or_group: vec![LayerOrGroup::id(TARGET_LAYER)],
        addressing,
        bound: vec![],
    })?;
    println!("📤 Queued '{}' at 50% opacity", TARGET_LAYER);

    let deadline = Instant::now() + Duration::from_secs(5);
    let written = loop {
        if let Some(blob) = canvas.layer(DOCUMENT, TARGET_LAYER) {
            break blob;
        }
        if Instant::now() >= deadline {
            return Err(anyhow!("send to '{}' did not land within 5s", TARGET_LAYER));
        }
        thread::sleep(Duration::from_millis(10));
    };
    println!(
        "🖼️  '{}' now holds {}x{} pixels, first pixel {:?}",
        TARGET_LAYER,
        written.width,
        written.height,
        &written.buffer[..written.components]
    );

    let after = detector.token_for(Some(&DocumentRef::new(DOCUMENT, INSTANCE_ID)));
    println!("🔖 Change token after:  {:?}", after);
    println!(
        "   Cached fetch output is {}",
        if after == before { "still valid" } else { "stale" }
    );
    Ok(())
}
