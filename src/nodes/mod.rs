// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Host-facing nodes.
//!
//! ## Transfer nodes
//! - **FetchLayerNode**: layers → one image and one mask tensor per item
//! - **SendLayerNode**: image batch → layers, fire-and-forget
//!
//! ## Tensor helpers
//! - **ImageTimesOpacity** / **MaskTimesOpacity**: scale samples by an opacity factor
//! - **RegionalTextEncode**: per-mask prompt conditioning
//!
//! Transfer nodes run on host worker threads; they block on fetches and never
//! on sends.

pub mod fetch;
pub mod opacity;
pub mod regional;
pub mod send;

pub use fetch::{FetchInputs, FetchLayerNode};
pub use opacity::{ImageTimesOpacity, MaskTimesOpacity};
pub use regional::RegionalTextEncode;
pub use send::{SendInputs, SendLayerNode};
