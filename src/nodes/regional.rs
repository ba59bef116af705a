// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use ndarray::{ArrayD, Axis, Ix3};
use std::sync::Arc;

use crate::codec::MaskTensor;
use crate::errors::{CodecError, TransferError};
use crate::traits::{Conditioning, ConditioningEntry, TextEncoder};

/// Builds one conditioning entry per prompt, each restricted to its mask.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionalTextEncode;

impl RegionalTextEncode {
    /// Encode `texts[i]` under `masks[i]` with strength `strengths[i]` (1.0 when absent).
    ///
    /// Only the first encoder is used. Masks may be `[h, w]` or `[b, h, w]`;
    /// the stored mask is inverted so that masked-out regions carry weight.
    pub fn execute(
        &self,
        encoders: &[Arc<dyn TextEncoder>],
        texts: &[String],
        masks: &[ArrayD<f32>],
        strengths: &[f32],
    ) -> Result<Conditioning, TransferError> {
        let encoder = encoders.first().ok_or(TransferError::MissingInput("clip"))?;

        texts
            .iter()
            .enumerate()
            .map(|(i, text)| -> Result<ConditioningEntry, TransferError> {
                let mask = masks.get(i).ok_or(TransferError::MissingInput("masks"))?;
                let encoded = encoder.encode(text)?;
                Ok(ConditioningEntry {
                    cond: encoded.cond,
                    pooled: encoded.pooled,
                    mask: promote_mask(mask)?.mapv(|v| 1.0 - v),
                    mask_strength: strengths.get(i).copied().unwrap_or(1.0),
                    set_area_to_bounds: false,
                })
            })
            .collect()
    }
}

fn promote_mask(mask: &ArrayD<f32>) -> Result<MaskTensor, CodecError> {
    let mask = if mask.ndim() < 3 {
        mask.clone().insert_axis(Axis(0))
    } else {
        mask.clone()
    };
    Ok(mask.into_dimensionality::<Ix3>()?)
}
