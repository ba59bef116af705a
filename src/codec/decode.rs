// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use ndarray::{Array3, Array4, Axis};

use crate::codec::{ImageBlob, ImageCodec, ImageTensor, MaskTensor, PixelFormat};
use crate::errors::CodecError;
use crate::observability::messages::codec::FrameDropped;
use crate::observability::messages::StructuredLog;

/// Output of [`ImageCodec::decode`]: color frames and their masks, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub images: ImageTensor,
    pub masks: MaskTensor,
}

impl Decoded {
    pub fn frame_count(&self) -> usize {
        self.images.len_of(Axis(0))
    }
}

impl ImageCodec {
    /// Decode raw buffers into an RGB batch and a mask batch.
    ///
    /// The first frame fixes the batch geometry; later frames with a
    /// different width or height are skipped. Frames with alpha get
    /// `1 - alpha` as their mask, others an all-zero placeholder.
    pub fn decode(&self, blobs: &[ImageBlob]) -> Result<Decoded, CodecError> {
        let mut images: Vec<Array4<f32>> = Vec::with_capacity(blobs.len());
        let mut masks: Vec<Array3<f32>> = Vec::with_capacity(blobs.len());
        let mut geometry: Option<(u32, u32)> = None;

        for (index, blob) in blobs.iter().enumerate() {
            let format = blob.format()?;

            match geometry {
                None => geometry = Some((blob.width, blob.height)),
                Some((batch_width, batch_height))
                    if (batch_width, batch_height) != (blob.width, blob.height) =>
                {
                    FrameDropped {
                        index,
                        width: blob.width,
                        height: blob.height,
                        batch_width,
                        batch_height,
                    }
                    .log();
                    continue;
                }
                Some(_) => {}
            }

            images.push(color_frame(blob, format)?);
            masks.push(self.mask_frame(blob, format)?);
        }

        if images.is_empty() {
            return Err(CodecError::EmptyBatch);
        }

        Ok(Decoded {
            images: stack(images)?,
            masks: stack(masks)?,
        })
    }

    fn mask_frame(&self, blob: &ImageBlob, format: PixelFormat) -> Result<Array3<f32>, CodecError> {
        if !format.has_alpha() {
            let side = self.mask_placeholder_size;
            return Ok(Array3::zeros((1, side, side)));
        }

        let inverted_alpha: Vec<f32> = blob
            .buffer
            .chunks_exact(4)
            .map(|px| 1.0 - normalize(px[3]))
            .collect();
        Ok(Array3::from_shape_vec(
            (1, blob.height as usize, blob.width as usize),
            inverted_alpha,
        )?)
    }
}

fn color_frame(blob: &ImageBlob, format: PixelFormat) -> Result<Array4<f32>, CodecError> {
    let (width, height) = (blob.width, blob.height);
    let buffer = blob.buffer.clone();
    let image = match format {
        PixelFormat::Gray => GrayImage::from_raw(width, height, buffer).map(DynamicImage::ImageLuma8),
        PixelFormat::Rgb => RgbImage::from_raw(width, height, buffer).map(DynamicImage::ImageRgb8),
        PixelFormat::Rgba => RgbaImage::from_raw(width, height, buffer).map(DynamicImage::ImageRgba8),
    }
    .ok_or_else(|| {
        CodecError::InvalidFrame(format!(
            "buffer does not fit {}x{} {:?}",
            width, height, format
        ))
    })?;

    let samples: Vec<f32> = image.to_rgb8().into_raw().into_iter().map(normalize).collect();
    Ok(Array4::from_shape_vec(
        (1, height as usize, width as usize, 3),
        samples,
    )?)
}

fn stack<D>(mut frames: Vec<ndarray::Array<f32, D>>) -> Result<ndarray::Array<f32, D>, CodecError>
where
    D: ndarray::RemoveAxis,
{
    if frames.len() == 1 {
        if let Some(frame) = frames.pop() {
            return Ok(frame);
        }
    }
    let views: Vec<_> = frames.iter().map(|frame| frame.view()).collect();
    Ok(ndarray::concatenate(Axis(0), &views)?)
}

fn normalize(sample: u8) -> f32 {
    f32::from(sample) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;
    use ndarray::s;

    fn solid(width: u32, height: u32, pixel: &[u8]) -> ImageBlob {
        let buffer = pixel.repeat((width * height) as usize);
        ImageBlob::new(buffer, width, height, pixel.len())
    }

    #[test]
    fn test_decode_opaque_red_rgba() {
        let codec = ImageCodec::default();
        let blob = ImageBlob::new([255, 0, 0, 255].repeat(4), 2, 2, 4);

        let decoded = codec.decode(&[blob]).unwrap();

        assert_eq!(decoded.images.shape(), &[1, 2, 2, 3]);
        assert_eq!(decoded.masks.shape(), &[1, 2, 2]);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(decoded.images.slice(s![0, y, x, ..]).to_vec(), vec![1.0, 0.0, 0.0]);
            }
        }
        assert!(decoded.masks.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_mask_is_inverted_alpha() {
        let codec = ImageCodec::default();
        let blob = ImageBlob::new(vec![10, 20, 30, 0, 10, 20, 30, 255], 2, 1, 4);

        let decoded = codec.decode(&[blob]).unwrap();

        assert_eq!(decoded.masks[[0, 0, 0]], 1.0);
        assert_eq!(decoded.masks[[0, 0, 1]], 0.0);
        assert!((decoded.images[[0, 0, 0, 1]] - 20.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_gray_expands_to_rgb_with_placeholder_mask() {
        let codec = ImageCodec::new(&CodecConfig {
            mask_placeholder_size: 8,
        });
        let blob = solid(3, 2, &[51]);

        let decoded = codec.decode(&[blob]).unwrap();

        assert_eq!(decoded.images.shape(), &[1, 2, 3, 3]);
        assert!(decoded.images.iter().all(|&v| (v - 0.2).abs() < 1e-6));
        assert_eq!(decoded.masks.shape(), &[1, 8, 8]);
        assert!(decoded.masks.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_decode_rgb_uses_default_placeholder() {
        let decoded = ImageCodec::default()
            .decode(&[solid(4, 4, &[0, 128, 255])])
            .unwrap();

        assert_eq!(decoded.masks.shape(), &[1, 64, 64]);
        assert_eq!(decoded.images[[0, 3, 3, 2]], 1.0);
    }

    #[test]
    fn test_unsupported_component_count() {
        let blob = ImageBlob::new(vec![0; 8], 2, 2, 2);
        let result = ImageCodec::default().decode(&[blob]);
        assert!(matches!(result, Err(CodecError::UnsupportedPixelFormat(2))));
    }

    #[test]
    fn test_malformed_buffer_rejected() {
        let blob = ImageBlob::new(vec![0; 15], 2, 2, 4);
        let result = ImageCodec::default().decode(&[blob]);
        assert!(matches!(
            result,
            Err(CodecError::MalformedBuffer {
                expected: 16,
                actual: 15,
                ..
            })
        ));
    }

    #[test]
    fn test_geometry_mismatch_drops_frame_in_order() {
        let codec = ImageCodec::default();
        let blobs = vec![
            solid(10, 10, &[255, 0, 0, 255]),
            solid(10, 10, &[0, 255, 0, 255]),
            solid(20, 20, &[0, 0, 255, 255]),
        ];

        let decoded = codec.decode(&blobs).unwrap();

        assert_eq!(decoded.frame_count(), 2);
        assert_eq!(decoded.images.shape(), &[2, 10, 10, 3]);
        assert_eq!(decoded.masks.shape(), &[2, 10, 10]);
        assert_eq!(decoded.images[[0, 0, 0, 0]], 1.0);
        assert_eq!(decoded.images[[1, 0, 0, 1]], 1.0);
    }

    #[test]
    fn test_empty_input_is_empty_batch() {
        let result = ImageCodec::default().decode(&[]);
        assert!(matches!(result, Err(CodecError::EmptyBatch)));
    }

    #[test]
    fn test_from_remote_infers_components() {
        let blob = ImageBlob::from_remote(vec![0; 12], 2, 2).unwrap();
        assert_eq!(blob.components, 3);

        assert!(matches!(
            ImageBlob::from_remote(vec![0; 10], 2, 2),
            Err(CodecError::MalformedBuffer { actual: 10, .. })
        ));
        assert!(matches!(
            ImageBlob::from_remote(vec![], 0, 2),
            Err(CodecError::InvalidFrame(_))
        ));
    }
}
