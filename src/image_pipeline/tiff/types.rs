//! Pipeline configuration types

use crate::image_pipeline::color::ColorAdjustmentParams;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// Immutable settings for one pipeline. Every call reads from this value, so
/// there is no ordering between "set" and "process" steps.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Compression method to use
    pub compression: TiffCompression,
    /// Predictor value for integer images (typically 2 for horizontal differencing).
    /// Float tensor pages are always written without a predictor.
    pub predictor: Option<u16>,
    /// Whether to reject zero-sized images before processing
    pub validate_dimensions: bool,
    /// Saturation and vibrance applied to developed images
    pub color: ColorAdjustmentParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::None,
            predictor: None,
            validate_dimensions: true,
            color: ColorAdjustmentParams::default(),
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
    saturation: Option<f32>,
    vibrance: Option<f32>,
}

impl PipelineConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    /// Saturation knob on the user scale, -100 to 100.
    pub fn saturation(mut self, saturation: f32) -> Self {
        self.saturation = Some(saturation);
        self
    }

    /// Vibrance knob on the user scale, -100 to 100.
    pub fn vibrance(mut self, vibrance: f32) -> Self {
        self.vibrance = Some(vibrance);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        let color = ColorAdjustmentParams::from_user_scale(
            self.saturation.unwrap_or(0.0),
            self.vibrance.unwrap_or(0.0),
        );
        PipelineConfig {
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            color,
        }
    }
}
