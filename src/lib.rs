// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // LayerProtocol implementations
pub mod bridge;     // worker thread -> event loop handoff
pub mod codec;      // pixel buffers <-> tensors
pub mod config;     // config loading + runtime wiring
pub mod engine;     // fetch/send orchestration, change tokens
pub mod errors;     // error handling
pub mod nodes;      // host-facing nodes
pub mod observability;
pub mod registry;   // live backend instances
pub mod resolve;    // document/layer addressing
pub mod traits;     // protocol + encoder abstractions
