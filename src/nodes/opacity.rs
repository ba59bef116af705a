// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::codec::{ImageTensor, MaskTensor};
use crate::config::consts::{MAX_OPACITY, MIN_OPACITY};
use crate::errors::TransferError;

fn checked_opacity(opacity: f32) -> Result<f32, TransferError> {
    // NaN falls outside the range as well.
    if (MIN_OPACITY..=MAX_OPACITY).contains(&opacity) {
        Ok(opacity)
    } else {
        Err(TransferError::InvalidOpacity(opacity))
    }
}

/// Multiplies every image sample by an opacity factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTimesOpacity;

impl ImageTimesOpacity {
    pub fn execute(&self, images: &ImageTensor, opacity: f32) -> Result<ImageTensor, TransferError> {
        let opacity = checked_opacity(opacity)?;
        Ok(images.mapv(|v| v * opacity))
    }
}

/// Multiplies every mask sample by an opacity factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskTimesOpacity;

impl MaskTimesOpacity {
    pub fn execute(&self, masks: &MaskTensor, opacity: f32) -> Result<MaskTensor, TransferError> {
        let opacity = checked_opacity(opacity)?;
        Ok(masks.mapv(|v| v * opacity))
    }
}
