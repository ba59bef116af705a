// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use ndarray::{Array2, Array3};

use crate::codec::MaskTensor;

/// Output of a text encoder for one prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedText {
    pub cond: Array3<f32>,
    pub pooled: Option<Array2<f32>>,
}

/// One region of a regional conditioning: an encoded prompt restricted to a mask.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditioningEntry {
    pub cond: Array3<f32>,
    pub pooled: Option<Array2<f32>>,
    pub mask: MaskTensor,
    pub mask_strength: f32,
    pub set_area_to_bounds: bool,
}

/// Concatenated regions, in the order they were supplied.
pub type Conditioning = Vec<ConditioningEntry>;

/// External text encoder (tokenize + encode).
pub trait TextEncoder: Send + Sync {
    fn encode(&self, text: &str) -> anyhow::Result<EncodedText>;
}
