//! RAW image data types

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::numeric::resolve_maximum;
use crate::image_pipeline::raw::cfa::CfaDescriptor;

/// Sensor calibration reported by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalibrationConstants {
    /// Raw value of a photosite that received no light.
    pub black_level: u32,
    /// Brightest valid raw value. 0 means the decoder did not report one.
    pub sensor_maximum: u32,
}

impl CalibrationConstants {
    pub fn new(black_level: u32, sensor_maximum: u32) -> Self {
        Self {
            black_level,
            sensor_maximum,
        }
    }

    /// Denominator used to map raw samples onto `[0, 1]`. Never zero.
    pub fn normalization_max(&self) -> f32 {
        resolve_maximum(self.sensor_maximum)
    }
}

/// Camera family understood by the downstream ISP model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFamily {
    Pixel,
    Samsung,
    Iphone,
}

impl DeviceFamily {
    pub fn from_model(model: &str) -> Option<Self> {
        if model.contains("iPhone") {
            Some(DeviceFamily::Iphone)
        } else if model.contains("Samsung") || model.contains("Galaxy") {
            Some(DeviceFamily::Samsung)
        } else if model.contains("Pixel") {
            Some(DeviceFamily::Pixel)
        } else {
            None
        }
    }

    /// Numeric id expected by the model; unknown devices map to -1.
    pub fn model_id(family: Option<Self>) -> i32 {
        match family {
            Some(DeviceFamily::Pixel) => 0,
            Some(DeviceFamily::Samsung) => 1,
            Some(DeviceFamily::Iphone) => 2,
            None => -1,
        }
    }
}

/// Descriptive fields the decoder extracts alongside the sensor data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetadata {
    pub make: String,
    pub model: String,
    pub raw_width: usize,
    pub raw_height: usize,
    /// Camera white balance multipliers in R, G, B, (G2/E) order.
    pub wb_coeffs: [f32; 4],
    pub black_level: u32,
    pub maximum: u32,
    /// Row-major 2x2 CFA letters, e.g. `"RGGB"`.
    pub cfa_pattern: String,
}

impl RawMetadata {
    pub fn device_family(&self) -> Option<DeviceFamily> {
        DeviceFamily::from_model(&self.model)
    }

    pub fn device_id(&self) -> i32 {
        DeviceFamily::model_id(self.device_family())
    }
}

/// Represents decoded RAW image data
#[derive(Debug, Clone)]
pub struct RawImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Raw pixel data (single channel Bayer pattern)
    pub data: Vec<u16>,
    /// Actual bits per sample from the sensor (e.g., 12, 14, or 16)
    pub bits_per_sample: u32,
    /// Filter layout of the sensor
    pub cfa: CfaDescriptor,
    /// Black and white levels
    pub calibration: CalibrationConstants,
    pub metadata: RawMetadata,
}

impl RawImageData {
    /// Borrows the sensor samples as a bounds-checked mosaic plane.
    pub fn mosaic_plane(&self) -> Result<RawMosaicPlane<'_>> {
        RawMosaicPlane::new(self.width, self.height, &self.data)
    }
}

/// Read-only view of a single-channel sensor mosaic.
#[derive(Debug, Clone, Copy)]
pub struct RawMosaicPlane<'a> {
    width: usize,
    height: usize,
    samples: &'a [u16],
}

impl<'a> RawMosaicPlane<'a> {
    /// Fails when `samples` holds fewer than `width * height` values.
    pub fn new(width: usize, height: usize, samples: &'a [u16]) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .ok_or(PipelineError::InvalidDimensions(width, height))?;
        if samples.len() < expected {
            return Err(PipelineError::BufferSizeMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples: &samples[..expected],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn samples(&self) -> &'a [u16] {
        self.samples
    }

    /// One sensor row.
    #[inline]
    pub fn row(&self, row: usize) -> &'a [u16] {
        let start = row * self.width;
        &self.samples[start..start + self.width]
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u16> {
        if row < self.height && col < self.width {
            Some(self.samples[row * self.width + col])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_rejects_short_buffer() {
        let data = vec![0u16; 5];
        let result = RawMosaicPlane::new(3, 2, &data);
        assert!(matches!(
            result,
            Err(PipelineError::BufferSizeMismatch { expected: 6, actual: 5 })
        ));
    }

    #[test]
    fn test_plane_indexing() {
        let data: Vec<u16> = (0..6).collect();
        let plane = RawMosaicPlane::new(3, 2, &data).unwrap();
        assert_eq!(plane.get(1, 2), Some(5));
        assert_eq!(plane.get(2, 0), None);
        assert_eq!(plane.row(1), &[3, 4, 5]);
    }

    #[test]
    fn test_device_family_mapping() {
        assert_eq!(DeviceFamily::from_model("iPhone 15 Pro"), Some(DeviceFamily::Iphone));
        assert_eq!(DeviceFamily::from_model("Galaxy S23"), Some(DeviceFamily::Samsung));
        assert_eq!(DeviceFamily::from_model("Pixel 8"), Some(DeviceFamily::Pixel));

        let metadata = RawMetadata {
            model: "ILCE-7M4".to_string(),
            ..Default::default()
        };
        assert_eq!(metadata.device_id(), -1);
    }

    #[test]
    fn test_uncalibrated_maximum() {
        assert_eq!(CalibrationConstants::new(512, 0).normalization_max(), 65535.0);
        assert_eq!(CalibrationConstants::new(512, 16383).normalization_max(), 16383.0);
    }
}
