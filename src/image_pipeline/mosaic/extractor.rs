use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::numeric::{normalize_sample, u8_to_unit};
use crate::image_pipeline::debayer::PixelBuffer;
use crate::image_pipeline::mosaic::types::{NormalizedTensor, PlanarRgb};
use crate::image_pipeline::raw::{CalibrationConstants, CfaDescriptor, RawImageData, RawMosaicPlane};

/// Splits an RGGB mosaic into four half-resolution normalized planes.
///
/// Each disjoint 2x2 tile contributes one sample to each plane; there is no
/// interpolation. An odd trailing row or column is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MosaicExtractor;

impl MosaicExtractor {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, fields(width = plane.width(), height = plane.height(), cfa = %cfa))]
    pub fn extract(
        &self,
        plane: &RawMosaicPlane<'_>,
        cfa: &CfaDescriptor,
        calibration: &CalibrationConstants,
    ) -> Result<NormalizedTensor> {
        if !cfa.is_rggb() {
            return Err(PipelineError::UnsupportedCfa(cfa.pattern_name()));
        }

        let out_width = plane.width() / 2;
        let out_height = plane.height() / 2;
        if out_width == 0 || out_height == 0 {
            debug!("Mosaic too small for a 2x2 tile, returning empty tensor");
            return Ok(NormalizedTensor::empty());
        }

        let max_value = calibration.normalization_max();
        debug!(
            "Extracting Bayer channels: {}x{} -> {}x{}, max value {}",
            plane.width(),
            plane.height(),
            out_width,
            out_height,
            max_value
        );

        let plane_len = out_width * out_height;
        let mut data = vec![0.0f32; plane_len * NormalizedTensor::PLANES];
        let (r_plane, rest) = data.split_at_mut(plane_len);
        let (g1_plane, rest) = rest.split_at_mut(plane_len);
        let (g2_plane, b_plane) = rest.split_at_mut(plane_len);

        r_plane
            .par_chunks_mut(out_width)
            .zip(g1_plane.par_chunks_mut(out_width))
            .zip(g2_plane.par_chunks_mut(out_width))
            .zip(b_plane.par_chunks_mut(out_width))
            .enumerate()
            .for_each(|(row, (((r, g1), g2), b))| {
                let top = plane.row(2 * row);
                let bottom = plane.row(2 * row + 1);
                for col in 0..out_width {
                    let raw_col = 2 * col;
                    r[col] = normalize_sample(top[raw_col], max_value);
                    g1[col] = normalize_sample(top[raw_col + 1], max_value);
                    g2[col] = normalize_sample(bottom[raw_col], max_value);
                    b[col] = normalize_sample(bottom[raw_col + 1], max_value);
                }
            });

        NormalizedTensor::new(out_width, out_height, data)
    }

    /// Convenience wrapper over [`MosaicExtractor::extract`] for decoder output.
    pub fn extract_raw(&self, raw_image: &RawImageData) -> Result<NormalizedTensor> {
        let plane = raw_image.mosaic_plane()?;
        self.extract(&plane, &raw_image.cfa, &raw_image.calibration)
    }

    /// Converts the first three channels of an 8-bit buffer into R, G, B float planes.
    pub fn planar_rgb(&self, buffer: &PixelBuffer) -> Result<PlanarRgb> {
        if buffer.channels() < 3 || buffer.bits_per_channel() != 8 {
            return Err(PipelineError::UnsupportedFormat(format!(
                "planar RGB needs 8-bit samples with at least 3 channels, got {} channel(s) at {} bits",
                buffer.channels(),
                buffer.bits_per_channel()
            )));
        }

        let pixel_count = buffer.pixel_count();
        let stride = buffer.bytes_per_pixel();
        let mut data = vec![0.0f32; pixel_count * PlanarRgb::PLANES];
        if pixel_count > 0 {
            let (r_plane, rest) = data.split_at_mut(pixel_count);
            let (g_plane, b_plane) = rest.split_at_mut(pixel_count);
            r_plane
                .par_iter_mut()
                .zip(g_plane.par_iter_mut())
                .zip(b_plane.par_iter_mut())
                .zip(buffer.data().par_chunks_exact(stride))
                .for_each(|(((r, g), b), pixel)| {
                    *r = u8_to_unit(pixel[0]);
                    *g = u8_to_unit(pixel[1]);
                    *b = u8_to_unit(pixel[2]);
                });
        }

        PlanarRgb::new(buffer.width(), buffer.height(), data)
    }
}
