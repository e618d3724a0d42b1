use std::io::Cursor;

use anyhow::{Result, anyhow, bail};
use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use rayon::prelude::*;
use tracing::info;

use crate::image_pipeline::common::numeric::unit_to_u8;
use crate::image_pipeline::debayer::types::PixelBuffer;
use crate::image_pipeline::raw::{CfaDescriptor, RawImageData};

/// Bilinear demosaic on the CPU, followed by black level subtraction, camera
/// white balance and sRGB encoding to 8 bits per channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuDebayer;

impl CpuDebayer {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, raw_image: &RawImageData) -> Result<PixelBuffer> {
        let width = raw_image.width;
        let height = raw_image.height;
        info!("Starting CPU debayering for image {}x{}", width, height);

        let cfa = bayer_cfa(&raw_image.cfa)
            .ok_or_else(|| anyhow!("CFA pattern {} cannot be demosaiced", raw_image.cfa))?;

        if raw_image.data.len() < width * height {
            bail!(
                "sensor data holds {} samples, expected {}",
                raw_image.data.len(),
                width * height
            );
        }

        // bayer only supports 8 and 16 bit input
        let (bayer_depth, raster_depth, bytes_per_sample) = if raw_image.bits_per_sample <= 8 {
            (BayerDepth::Depth8, RasterDepth::Depth8, 1)
        } else {
            (BayerDepth::Depth16LE, RasterDepth::Depth16, 2)
        };

        let bayer_bytes: Vec<u8> = if bytes_per_sample == 1 {
            raw_image.data.iter().map(|&val| val.min(u8::MAX as u16) as u8).collect()
        } else {
            raw_image.data.iter().flat_map(|&val| val.to_le_bytes()).collect()
        };

        let mut demosaiced = vec![0u8; width * height * 3 * bytes_per_sample];
        {
            let mut output_raster = RasterMut::new(width, height, raster_depth, &mut demosaiced);
            let mut cursor = Cursor::new(&bayer_bytes[..]);

            info!("Running demosaic with depth={:?}, CFA={}, algo=Linear", bayer_depth, raw_image.cfa);
            bayer::run_demosaic(&mut cursor, bayer_depth, cfa, Demosaic::Linear, &mut output_raster)
                .map_err(|e| anyhow!("Demosaic failed: {:?}", e))?;
        }

        let black_level = raw_image.calibration.black_level as f32;
        let white_level = raw_image.calibration.normalization_max();
        let range = (white_level - black_level).max(1.0);
        let [wb_r, wb_g, wb_b] = white_balance(&raw_image.metadata.wb_coeffs);

        let mut rgb = vec![0u8; width * height * 3];
        rgb.par_chunks_exact_mut(3)
            .zip(demosaiced.par_chunks_exact(bytes_per_sample * 3))
            .for_each(|(out, pixel_bytes)| {
                let (r_raw, g_raw, b_raw) = if bytes_per_sample == 1 {
                    (pixel_bytes[0] as f32, pixel_bytes[1] as f32, pixel_bytes[2] as f32)
                } else {
                    (
                        u16::from_le_bytes([pixel_bytes[0], pixel_bytes[1]]) as f32,
                        u16::from_le_bytes([pixel_bytes[2], pixel_bytes[3]]) as f32,
                        u16::from_le_bytes([pixel_bytes[4], pixel_bytes[5]]) as f32,
                    )
                };

                let r_lin = ((r_raw - black_level).max(0.0) / range) * wb_r;
                let g_lin = ((g_raw - black_level).max(0.0) / range) * wb_g;
                let b_lin = ((b_raw - black_level).max(0.0) / range) * wb_b;

                out[0] = unit_to_u8(srgb_encode(r_lin));
                out[1] = unit_to_u8(srgb_encode(g_lin));
                out[2] = unit_to_u8(srgb_encode(b_lin));
            });

        Ok(PixelBuffer::rgb8(width, height, rgb)?)
    }
}

fn bayer_cfa(cfa: &CfaDescriptor) -> Option<CFA> {
    match cfa.pattern_name().as_str() {
        "RGGB" => Some(CFA::RGGB),
        "BGGR" => Some(CFA::BGGR),
        "GBRG" => Some(CFA::GBRG),
        "GRBG" => Some(CFA::GRBG),
        _ => None,
    }
}

/// Multipliers relative to green. Missing or non-finite coefficients fall back to 1.
fn white_balance(coeffs: &[f32; 4]) -> [f32; 3] {
    let green = coeffs[1];
    if !green.is_finite() || green <= 0.0 {
        return [1.0, 1.0, 1.0];
    }
    let relative = |c: f32| if c.is_finite() && c > 0.0 { c / green } else { 1.0 };
    [relative(coeffs[0]), 1.0, relative(coeffs[2])]
}

#[inline]
fn srgb_encode(linear: f32) -> f32 {
    let linear = linear.clamp(0.0, 1.0);
    if linear <= 0.003_130_8 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}
