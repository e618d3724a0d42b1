//! Saturation and vibrance adjustment of demosaiced 8-bit buffers.

use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::color::hsl::{Hsl, hsl_to_rgb, rgb_to_hsl};
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::numeric::{clamp_unit, u8_to_unit, unit_to_u8};
use crate::image_pipeline::debayer::PixelBuffer;

/// Buffers with at least this many pixels are processed on the rayon pool.
const PARALLEL_THRESHOLD: usize = 100_000;

/// Knob magnitude beyond which every pixel is already fully saturated or grey.
const KNOB_LIMIT: f32 = 1.0e6;

/// Maps NaN to 0 and bounds infinities so the per-pixel math stays finite.
#[inline]
fn sanitize_knob(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-KNOB_LIMIT, KNOB_LIMIT)
    }
}

/// Saturation and vibrance, each nominally in -1.0..=1.0.
///
/// Values outside that range are accepted; the per-pixel saturation is clamped
/// to `[0, 1]` after each step so extreme settings saturate rather than fail.
/// A NaN knob counts as 0 and infinite knobs are bounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorAdjustmentParams {
    pub saturation: f32,
    pub vibrance: f32,
}

impl ColorAdjustmentParams {
    /// Range of the user-facing knobs (-100..=100).
    pub const USER_SCALE: f32 = 100.0;

    pub fn new(saturation: f32, vibrance: f32) -> Self {
        Self {
            saturation: sanitize_knob(saturation),
            vibrance: sanitize_knob(vibrance),
        }
    }

    /// Builds parameters from the -100..=100 knobs shown to users.
    pub fn from_user_scale(saturation: f32, vibrance: f32) -> Self {
        Self::new(saturation / Self::USER_SCALE, vibrance / Self::USER_SCALE)
    }

    pub fn is_identity(&self) -> bool {
        sanitize_knob(self.saturation) == 0.0 && sanitize_knob(self.vibrance) == 0.0
    }

    /// Applies the saturation step, then vibrance on the updated saturation.
    ///
    /// Vibrance is scaled by `1 - s`, so nearly saturated colors receive almost
    /// no extra boost.
    #[inline]
    pub fn apply(&self, hsl: Hsl) -> Hsl {
        // Achromatic pixels stay put whatever the knobs say.
        if hsl.s == 0.0 {
            return hsl;
        }
        // Struct literals bypass `new`.
        let saturation = sanitize_knob(self.saturation);
        let vibrance = sanitize_knob(self.vibrance);

        let mut s = hsl.s;
        if saturation != 0.0 {
            s = clamp_unit(s * (1.0 + saturation));
        }
        if vibrance != 0.0 {
            let vibrance_amount = vibrance * (1.0 - s);
            s = clamp_unit(s * (1.0 + vibrance_amount));
        }
        Hsl { s, ..hsl }
    }

    /// Adjusts a single 8-bit RGB triple.
    #[inline]
    pub fn apply_rgb(&self, rgb: [u8; 3]) -> [u8; 3] {
        let hsl = rgb_to_hsl(u8_to_unit(rgb[0]), u8_to_unit(rgb[1]), u8_to_unit(rgb[2]));
        let (r, g, b) = hsl_to_rgb(self.apply(hsl));
        [unit_to_u8(r), unit_to_u8(g), unit_to_u8(b)]
    }
}

/// Applies [`ColorAdjustmentParams`] to whole buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorAdjuster {
    params: ColorAdjustmentParams,
}

impl ColorAdjuster {
    pub fn new(params: ColorAdjustmentParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ColorAdjustmentParams {
        &self.params
    }

    /// Returns an adjusted copy of `buffer`; the input is never modified.
    ///
    /// Only the first three bytes of each pixel are touched. Fails with
    /// [`PipelineError::UnsupportedFormat`] unless the buffer has 8-bit samples
    /// and at least three channels.
    pub fn adjust(&self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        if buffer.channels() < 3 || buffer.bits_per_channel() != 8 {
            return Err(PipelineError::UnsupportedFormat(format!(
                "color adjustment needs 8-bit samples with at least 3 channels, got {} channel(s) at {} bits",
                buffer.channels(),
                buffer.bits_per_channel()
            )));
        }

        if self.params.is_identity() {
            return Ok(buffer.clone());
        }

        debug!(
            saturation = self.params.saturation,
            vibrance = self.params.vibrance,
            "Adjusting {}x{} buffer",
            buffer.width(),
            buffer.height()
        );

        let mut data = buffer.data().to_vec();
        let stride = buffer.bytes_per_pixel();
        let params = self.params;
        let adjust_pixel = |pixel: &mut [u8]| {
            let [r, g, b] = params.apply_rgb([pixel[0], pixel[1], pixel[2]]);
            pixel[0] = r;
            pixel[1] = g;
            pixel[2] = b;
        };

        if buffer.pixel_count() >= PARALLEL_THRESHOLD {
            data.par_chunks_exact_mut(stride).for_each(adjust_pixel);
        } else {
            data.chunks_exact_mut(stride).for_each(adjust_pixel);
        }

        Ok(buffer.with_data(data))
    }
}
