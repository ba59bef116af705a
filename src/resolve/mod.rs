// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Resolution of node inputs into concrete remote targets.
//!
//! Nodes receive their targets in one of two shapes: a list of linked layer
//! references (each carrying its document), or a list of raw layer ids plus
//! a serialized document. This module turns either shape into a
//! [`ResolvedTarget`] and applies the per-item broadcast rule to optional
//! inputs such as bounds and selection flags.

mod params;
mod types;

pub use params::{index_or_broadcast, parse_selection_flag, resolve};
pub use types::{Addressing, DocumentRef, LayerOrGroup, LinkedLayer, ResolvedTarget};
