use std::io::{Cursor, Write};

use tiff::encoder::colortype::{Gray32Float, RGB8, RGBA8};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::PixelBuffer;
use crate::image_pipeline::mosaic::NormalizedTensor;
use crate::image_pipeline::tiff::types::{PipelineConfig, TiffCompression};
use crate::image_pipeline::tiff::writer::TiffWriter;

/// TIFF writer backed by the `tiff` crate. Images are encoded into memory and
/// then copied to the output, so any `Write` works.
pub struct StandardTiffWriter;

fn compression(config: &PipelineConfig) -> Compression {
    match config.compression {
        TiffCompression::None => Compression::Uncompressed,
        TiffCompression::Lzw => Compression::Lzw,
        TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
        TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
        TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
    }
}

fn encode_error(e: impl ToString) -> PipelineError {
    PipelineError::EncodeError(e.to_string())
}

fn dimension(value: usize, image: (usize, usize)) -> Result<u32> {
    u32::try_from(value).map_err(|_| PipelineError::InvalidDimensions(image.0, image.1))
}

impl TiffWriter for StandardTiffWriter {
    fn write_rgb_tiff(&self, image: &PixelBuffer, output: &mut dyn Write, config: &PipelineConfig) -> Result<()> {
        debug!(
            "Encoding RGB TIFF image: {}x{}, {} channel(s)",
            image.width(),
            image.height(),
            image.channels()
        );

        if image.bits_per_channel() != 8 {
            return Err(PipelineError::UnsupportedFormat(format!(
                "TIFF output supports 8-bit images, got {} bits",
                image.bits_per_channel()
            )));
        }

        let size = (image.width(), image.height());
        let width = dimension(image.width(), size)?;
        let height = dimension(image.height(), size)?;

        let color_channels = image.channels();
        if color_channels != 3 && color_channels != 4 {
            return Err(PipelineError::UnsupportedFormat(format!(
                "TIFF output supports 3 or 4 channels, got {}",
                color_channels
            )));
        }

        let mut buffer: Vec<u8> = Vec::new();
        {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
                .map_err(encode_error)?
                .with_compression(compression(config));

            if let Some(predictor_val) = config.predictor {
                let predictor = match predictor_val {
                    2 => Predictor::Horizontal,
                    _ => Predictor::None,
                };
                encoder = encoder.with_predictor(predictor);
            }

            let written = if color_channels == 3 {
                encoder.write_image::<RGB8>(width, height, image.data())
            } else {
                encoder.write_image::<RGBA8>(width, height, image.data())
            };
            written.map_err(encode_error)?;
        }

        output.write_all(&buffer)?;

        debug!("RGB TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }

    fn write_tensor_tiff(&self, tensor: &NormalizedTensor, output: &mut dyn Write, config: &PipelineConfig) -> Result<()> {
        debug!("Encoding tensor TIFF: 4 planes of {}x{}", tensor.width(), tensor.height());

        if tensor.is_empty() {
            return Err(PipelineError::InvalidDimensions(tensor.width(), tensor.height()));
        }

        let size = (tensor.width(), tensor.height());
        let width = dimension(tensor.width(), size)?;
        let height = dimension(tensor.height(), size)?;

        let mut buffer: Vec<u8> = Vec::new();
        {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
                .map_err(encode_error)?
                .with_compression(compression(config));

            for (channel, plane) in tensor.planes() {
                debug!("Writing tensor page {:?}", channel);
                encoder
                    .write_image::<Gray32Float>(width, height, plane)
                    .map_err(encode_error)?;
            }
        }

        output.write_all(&buffer)?;

        debug!("Tensor TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
