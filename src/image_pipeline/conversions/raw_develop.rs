use std::io::Write;
use std::path::Path;

use tracing::{info, instrument};

use crate::image_pipeline::{
    color::ColorAdjuster,
    common::error::{PipelineError, Result},
    debayer::{CpuDebayer, PixelBuffer},
    mosaic::{MosaicExtractor, NormalizedTensor, PlanarRgb},
    raw::{RawImageData, RawImageReader, RawLoaderReader, RawMetadata},
    tiff::{PipelineConfig, StandardTiffWriter, TiffWriter},
};

/// Decodes RAW files and produces either a developed, color-adjusted RGB image
/// or the normalized Bayer tensor for the ISP model.
pub struct RawDevelopPipeline<R: RawImageReader, W: TiffWriter> {
    reader: R,
    writer: W,
    debayer: CpuDebayer,
    extractor: MosaicExtractor,
    config: PipelineConfig,
}

impl RawDevelopPipeline<RawLoaderReader, StandardTiffWriter> {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_custom(RawLoaderReader, StandardTiffWriter, config)
    }
}

impl<R: RawImageReader, W: TiffWriter> RawDevelopPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: PipelineConfig) -> Self {
        Self {
            reader,
            writer,
            debayer: CpuDebayer::new(),
            extractor: MosaicExtractor::new(),
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    fn decode(&self, input_data: &[u8]) -> Result<RawImageData> {
        let raw_image = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.read_raw(input_data)?
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = raw_image.width,
                height = raw_image.height
            ).entered();
            self.validate_dimensions(raw_image.width, raw_image.height)?;
        }

        Ok(raw_image)
    }

    /// Decode, demosaic and apply the configured saturation/vibrance.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn develop_image(&self, input_data: &[u8]) -> Result<PixelBuffer> {
        let raw_image = self.decode(input_data)?;

        let rgb = {
            let _span = tracing::info_span!("debayer").entered();
            self.debayer
                .process(&raw_image)
                .map_err(|e| PipelineError::DecodeError(format!("{:#}", e)))?
        };

        let _span = tracing::info_span!("adjust_color",
            saturation = self.config.color.saturation,
            vibrance = self.config.color.vibrance
        ).entered();
        ColorAdjuster::new(self.config.color).adjust(&rgb)
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn develop(&self, input_data: &[u8], output: &mut dyn Write) -> Result<()> {
        info!("Starting RAW develop");

        let image = self.develop_image(input_data)?;

        {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_rgb_tiff(&image, output, &self.config)?;
        }

        info!(
            width = image.width(),
            height = image.height(),
            "Develop complete"
        );
        Ok(())
    }

    /// Decode and split the sensor mosaic into the R, G1, G2, B tensor.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn extract_tensor(&self, input_data: &[u8]) -> Result<NormalizedTensor> {
        let raw_image = self.decode(input_data)?;

        let _span = tracing::info_span!("extract_mosaic", cfa = %raw_image.cfa).entered();
        self.extractor.extract_raw(&raw_image)
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn extract(&self, input_data: &[u8], output: &mut dyn Write) -> Result<NormalizedTensor> {
        info!("Starting Bayer tensor extraction");

        let tensor = self.extract_tensor(input_data)?;

        {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_tensor_tiff(&tensor, output, &self.config)?;
        }

        info!(
            width = tensor.width(),
            height = tensor.height(),
            "Extraction complete"
        );
        Ok(tensor)
    }

    /// Developed image as R, G, B float planes, the full-resolution companion
    /// to the Bayer tensor.
    pub fn develop_planar(&self, input_data: &[u8]) -> Result<PlanarRgb> {
        let image = self.develop_image(input_data)?;
        self.extractor.planar_rgb(&image)
    }

    pub fn metadata(&self, input_data: &[u8]) -> Result<RawMetadata> {
        Ok(self.decode(input_data)?.metadata)
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn develop_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input_path: P, output_path: Q) -> Result<()> {
        let input_data = read_input(input_path.as_ref())?;
        // decode before creating the output so a failed run leaves no empty file behind
        let image = self.develop_image(&input_data)?;
        let mut output_file = create_output(output_path.as_ref())?;

        let _span = tracing::info_span!("encode_tiff").entered();
        self.writer.write_rgb_tiff(&image, &mut output_file, &self.config)
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn extract_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<NormalizedTensor> {
        let input_data = read_input(input_path.as_ref())?;
        let tensor = self.extract_tensor(&input_data)?;
        let mut output_file = create_output(output_path.as_ref())?;

        {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_tensor_tiff(&tensor, &mut output_file, &self.config)?;
        }
        Ok(tensor)
    }

    pub fn metadata_file<P: AsRef<Path>>(&self, input_path: P) -> Result<RawMetadata> {
        let input_data = read_input(input_path.as_ref())?;
        self.metadata(&input_data)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PipelineConfig) {
        self.config = config;
    }
}

fn read_input(input_path: &Path) -> Result<Vec<u8>> {
    info!(input = %input_path.display(), "Reading input file");
    let _span = tracing::info_span!("read_input_file").entered();
    std::fs::read(input_path)
        .map_err(|e| PipelineError::InputReadError(format!("{}: {}", input_path.display(), e)))
}

fn create_output(output_path: &Path) -> Result<std::fs::File> {
    info!(output = %output_path.display(), "Creating output file");
    let _span = tracing::info_span!("create_output_file").entered();
    std::fs::File::create(output_path)
        .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", output_path.display(), e)))
}
