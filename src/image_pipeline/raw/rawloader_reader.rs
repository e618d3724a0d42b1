//! RAW image reader implementation using the rawloader library.
//!
//! rawloader handles the container formats (ARW, CR2, NEF, DNG, RAF, ...). This
//! module converts its output into sensor samples plus the CFA tile, the
//! calibration levels and the descriptive metadata the pipeline needs.

use std::io::Cursor;

use rawloader::RawImageData as RawloaderImageData;
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raw::cfa::{CfaColor, CfaDescriptor};
use crate::image_pipeline::raw::reader::RawImageReader;
use crate::image_pipeline::raw::types::{CalibrationConstants, RawImageData, RawMetadata};

/// RAW image reader that uses the rawloader library for decoding.
pub struct RawLoaderReader;

/// Default bit depth when no white level information is available from the RAW file.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

impl RawImageReader for RawLoaderReader {
    /// Decodes a RAW file held in memory.
    ///
    /// Float sensor data (normalized 0.0-1.0) is rescaled to the full u16 range,
    /// in which case the reported sensor maximum becomes `u16::MAX` as well.
    /// Images that are not a single-channel mosaic are rejected.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rawtensor_rs::image_pipeline::{RawImageReader, RawLoaderReader};
    ///
    /// let raw_bytes = std::fs::read("image.arw").unwrap();
    /// let image = RawLoaderReader.read_raw(&raw_bytes).unwrap();
    /// println!("{} {}", image.metadata.make, image.cfa);
    /// ```
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;

        let width = decoded.width;
        let height = decoded.height;

        debug!("Decoded image: {}x{}, {} component(s) per pixel", width, height, decoded.cpp);

        if decoded.cpp != 1 {
            return Err(PipelineError::UnsupportedFormat(format!(
                "expected a single-channel sensor mosaic, got {} components per pixel",
                decoded.cpp
            )));
        }

        let (data, is_float) = match decoded.data {
            RawloaderImageData::Integer(values) => (values, false),
            RawloaderImageData::Float(values) => (
                values.iter().map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16).collect(),
                true,
            ),
        };

        let max_white_level = if is_float {
            u16::MAX
        } else {
            decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX)
        };
        let bits_per_sample = if max_white_level == 0 {
            DEFAULT_BITS_PER_SAMPLE
        } else {
            // e.g. 4095 -> 12 bits, 16383 -> 14 bits
            U16_BITS - max_white_level.leading_zeros()
        };

        let black_level = if is_float { 0 } else { decoded.blacklevels[0] as u32 };
        let calibration = CalibrationConstants::new(black_level, max_white_level as u32);
        let cfa = CfaDescriptor::from_fn(|row, col| CfaColor::from_index(decoded.cfa.color_at(row, col)));

        debug!(
            "Calculated bits_per_sample: {} (max white level: {}), black level: {}, CFA: {}",
            bits_per_sample, max_white_level, black_level, cfa
        );

        let metadata = RawMetadata {
            make: decoded.clean_make.clone(),
            model: decoded.clean_model.clone(),
            raw_width: width,
            raw_height: height,
            wb_coeffs: decoded.wb_coeffs,
            black_level,
            maximum: max_white_level as u32,
            cfa_pattern: cfa.pattern_name(),
        };

        Ok(RawImageData {
            width,
            height,
            data,
            bits_per_sample,
            cfa,
            calibration,
            metadata,
        })
    }
}
