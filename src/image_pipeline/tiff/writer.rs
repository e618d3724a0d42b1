use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::debayer::PixelBuffer;
use crate::image_pipeline::mosaic::NormalizedTensor;
use crate::image_pipeline::tiff::types::PipelineConfig;

/// Sink for the two pipeline products.
pub trait TiffWriter {
    /// Writes a developed 8-bit RGB or RGBA image.
    fn write_rgb_tiff(&self, image: &PixelBuffer, output: &mut dyn Write, config: &PipelineConfig) -> Result<()>;

    /// Writes the four tensor planes, one page each, in R, G1, G2, B order.
    fn write_tensor_tiff(&self, tensor: &NormalizedTensor, output: &mut dyn Write, config: &PipelineConfig) -> Result<()>;
}

