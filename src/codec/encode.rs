// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use ndarray::{ArrayView3, Axis};

use crate::codec::{ImageBlob, ImageCodec, ImageTensor, PixelFormat};
use crate::errors::CodecError;

impl ImageCodec {
    /// Encode one `[height, width, channels]` frame as an RGBA blob.
    ///
    /// Samples are scaled to `[0, 255]`, clamped and truncated to `u8`.
    /// Gray and RGB frames get an opaque alpha channel.
    pub fn encode(&self, frame: ArrayView3<'_, f32>) -> Result<ImageBlob, CodecError> {
        let (height, width, channels) = frame.dim();
        let format = PixelFormat::from_components(channels)?;
        let width = dimension(width, "width")?;
        let height = dimension(height, "height")?;
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidFrame(format!(
                "empty geometry {}x{}",
                width, height
            )));
        }

        // `iter` walks in logical row-major order whatever the memory layout.
        let bytes: Vec<u8> = frame.iter().copied().map(quantize).collect();
        let image = match format {
            PixelFormat::Gray => GrayImage::from_raw(width, height, bytes).map(DynamicImage::ImageLuma8),
            PixelFormat::Rgb => RgbImage::from_raw(width, height, bytes).map(DynamicImage::ImageRgb8),
            PixelFormat::Rgba => RgbaImage::from_raw(width, height, bytes).map(DynamicImage::ImageRgba8),
        }
        .ok_or_else(|| {
            CodecError::InvalidFrame(format!("{}x{} {:?} frame", width, height, format))
        })?;

        Ok(ImageBlob::new(image.to_rgba8().into_raw(), width, height, 4))
    }

    /// Encode every frame of a batch, in batch order.
    pub fn encode_batch(&self, images: &ImageTensor) -> Result<Vec<ImageBlob>, CodecError> {
        images
            .axis_iter(Axis(0))
            .map(|frame| self.encode(frame))
            .collect()
    }
}

fn quantize(sample: f32) -> u8 {
    (sample * 255.0).clamp(0.0, 255.0) as u8
}

fn dimension(value: usize, name: &str) -> Result<u32, CodecError> {
    u32::try_from(value)
        .map_err(|_| CodecError::InvalidFrame(format!("{} {} exceeds u32", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, Array4};

    #[test]
    fn test_encode_green_rgb_adds_opaque_alpha() {
        let mut frame = Array3::<f32>::zeros((2, 3, 3));
        frame.index_axis_mut(Axis(2), 1).fill(1.0);

        let blob = ImageCodec::default().encode(frame.view()).unwrap();

        assert_eq!(blob.width, 3);
        assert_eq!(blob.height, 2);
        assert_eq!(blob.components, 4);
        assert_eq!(blob.buffer, [0, 255, 0, 255].repeat(6));
    }

    #[test]
    fn test_encode_gray_replicates_channels() {
        let frame = Array3::<f32>::from_elem((1, 2, 1), 0.5);

        let blob = ImageCodec::default().encode(frame.view()).unwrap();

        assert_eq!(blob.buffer, [127, 127, 127, 255].repeat(2));
    }

    #[test]
    fn test_encode_clamps_out_of_range_samples() {
        let frame = Array3::from_shape_vec((1, 1, 4), vec![-0.5, 2.0, 1.0, 0.0]).unwrap();

        let blob = ImageCodec::default().encode(frame.view()).unwrap();

        assert_eq!(blob.buffer, vec![0, 255, 255, 0]);
    }

    #[test]
    fn test_encode_rejects_two_channels() {
        let frame = Array3::<f32>::zeros((2, 2, 2));
        let result = ImageCodec::default().encode(frame.view());
        assert!(matches!(result, Err(CodecError::UnsupportedPixelFormat(2))));
    }

    #[test]
    fn test_encode_then_decode_within_quantization() {
        let codec = ImageCodec::default();
        let samples: Vec<f32> = (0..4 * 3 * 4).map(|i| (i as f32 * 0.37) % 1.0).collect();
        let frame = Array3::from_shape_vec((4, 3, 4), samples).unwrap();

        let blob = codec.encode(frame.view()).unwrap();
        let decoded = codec.decode(&[blob]).unwrap();

        let step = 1.0 / 255.0;
        for y in 0..4 {
            for x in 0..3 {
                for c in 0..3 {
                    let diff = (decoded.images[[0, y, x, c]] - frame[[y, x, c]]).abs();
                    assert!(diff <= step, "color diff {} at {},{},{}", diff, y, x, c);
                }
                let alpha = 1.0 - decoded.masks[[0, y, x]];
                assert!((alpha - frame[[y, x, 3]]).abs() <= step);
            }
        }
    }

    #[test]
    fn test_encode_batch_preserves_order() {
        let mut batch = Array4::<f32>::zeros((3, 1, 1, 3));
        batch[[1, 0, 0, 0]] = 1.0;
        batch[[2, 0, 0, 2]] = 1.0;

        let blobs = ImageCodec::default().encode_batch(&batch).unwrap();

        assert_eq!(blobs.len(), 3);
        assert_eq!(blobs[0].buffer, vec![0, 0, 0, 255]);
        assert_eq!(blobs[1].buffer, vec![255, 0, 0, 255]);
        assert_eq!(blobs[2].buffer, vec![0, 0, 255, 255]);
    }
}
