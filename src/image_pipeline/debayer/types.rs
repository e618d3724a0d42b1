//! Types for demosaiced images

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Interleaved pixel buffer as produced by the demosaic stage.
///
/// Dimensions, channel count and bit depth are fixed at construction and the
/// byte length always equals `width * height * channels * bits_per_channel / 8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    bits_per_channel: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        bits_per_channel: u32,
        data: Vec<u8>,
    ) -> Result<Self> {
        if bits_per_channel == 0 || bits_per_channel % 8 != 0 {
            return Err(PipelineError::UnsupportedFormat(format!(
                "{} bits per channel is not byte aligned",
                bits_per_channel
            )));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .and_then(|n| n.checked_mul(bits_per_channel as usize / 8))
            .ok_or(PipelineError::InvalidDimensions(width, height))?;
        if data.len() != expected {
            return Err(PipelineError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            bits_per_channel,
            data,
        })
    }

    /// 8-bit interleaved RGB.
    pub fn rgb8(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, 3, 8, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn bits_per_channel(&self) -> u32 {
        self.bits_per_channel
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.channels * self.bits_per_channel as usize / 8
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Bytes of the pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.bytes_per_pixel();
        let start = (y * self.width + x) * bpp;
        Some(&self.data[start..start + bpp])
    }

    /// Same geometry and format, new contents. Length is checked by the caller's
    /// construction path, so this stays private to the crate.
    pub(crate) fn with_data(&self, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            bits_per_channel: self.bits_per_channel,
            data,
        }
    }
}
