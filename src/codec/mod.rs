// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Conversion between wire-level pixel buffers and batch tensors.
//!
//! The remote editor speaks raw, row-major 8-bit pixel buffers
//! ([`ImageBlob`]). Nodes work on normalized `f32` tensors:
//!
//! * [`ImageTensor`] - `[batch, height, width, channels]`, RGB after decode
//! * [`MaskTensor`] - `[batch, height, width]`, inverted alpha (0 = opaque)
//!
//! Decoding batches frames that share the first frame's geometry and drops
//! the rest; encoding always produces RGBA.

mod decode;
mod encode;

use ndarray::{Array3, Array4};

use crate::config::CodecConfig;
use crate::errors::CodecError;

pub use decode::Decoded;

/// `[batch, height, width, channels]`, samples in `[0.0, 1.0]`.
pub type ImageTensor = Array4<f32>;

/// `[batch, height, width]`, samples in `[0.0, 1.0]`.
pub type MaskTensor = Array3<f32>;

/// Pixel layout of a raw buffer, selected by its component count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Gray,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn from_components(components: usize) -> Result<Self, CodecError> {
        match components {
            1 => Ok(PixelFormat::Gray),
            3 => Ok(PixelFormat::Rgb),
            4 => Ok(PixelFormat::Rgba),
            other => Err(CodecError::UnsupportedPixelFormat(other)),
        }
    }

    pub fn components(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::Rgba)
    }
}

/// Raw pixel buffer as exchanged with the remote editor.
///
/// Invariant checked by [`ImageBlob::format`]:
/// `buffer.len() == width * height * components`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub buffer: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub components: usize,
}

impl ImageBlob {
    pub fn new(buffer: Vec<u8>, width: u32, height: u32, components: usize) -> Self {
        Self {
            buffer,
            width,
            height,
            components,
        }
    }

    /// Build a blob from a remote payload, inferring the component count
    /// from the buffer length.
    pub fn from_remote(buffer: Vec<u8>, width: u32, height: u32) -> Result<Self, CodecError> {
        let pixels = pixel_count(width, height)?;
        let components = buffer.len() / pixels;
        if components * pixels != buffer.len() {
            return Err(CodecError::MalformedBuffer {
                width,
                height,
                components,
                expected: components * pixels,
                actual: buffer.len(),
            });
        }
        Ok(Self::new(buffer, width, height, components))
    }

    /// Validate the buffer against its declared geometry and return its pixel format.
    pub fn format(&self) -> Result<PixelFormat, CodecError> {
        let format = PixelFormat::from_components(self.components)?;
        let expected = pixel_count(self.width, self.height)? * self.components;
        if self.buffer.len() != expected {
            return Err(CodecError::MalformedBuffer {
                width: self.width,
                height: self.height,
                components: self.components,
                expected,
                actual: self.buffer.len(),
            });
        }
        Ok(format)
    }
}

fn pixel_count(width: u32, height: u32) -> Result<usize, CodecError> {
    if width == 0 || height == 0 {
        return Err(CodecError::InvalidFrame(format!(
            "empty geometry {}x{}",
            width, height
        )));
    }
    Ok(width as usize * height as usize)
}

/// Stateless converter between [`ImageBlob`]s and tensors.
#[derive(Debug, Clone)]
pub struct ImageCodec {
    mask_placeholder_size: usize,
}

impl ImageCodec {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            mask_placeholder_size: config.mask_placeholder_size,
        }
    }

    pub fn mask_placeholder_size(&self) -> usize {
        self.mask_placeholder_size
    }
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self::new(&CodecConfig::default())
    }
}
