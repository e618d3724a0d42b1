//! Image processing pipeline module
//!
//! RAW decoding and demosaicing feed two independent numeric stages: HSL based
//! saturation/vibrance adjustment of the developed image, and extraction of the
//! sensor mosaic into a normalized R, G1, G2, B tensor for ISP models.

pub mod raw;
pub mod debayer;
pub mod color;
pub mod mosaic;
pub mod tiff;
pub mod conversions;
pub mod common;

pub use common::{
    PipelineError,
    Result,
};

pub use raw::{
    CalibrationConstants,
    CfaColor,
    CfaDescriptor,
    DeviceFamily,
    RawImageData,
    RawImageReader,
    RawLoaderReader,
    RawMetadata,
    RawMosaicPlane,
};

pub use debayer::{
    CpuDebayer,
    PixelBuffer,
};

pub use color::{
    ColorAdjuster,
    ColorAdjustmentParams,
    Hsl,
};

pub use mosaic::{
    BayerChannel,
    MosaicExtractor,
    NormalizedTensor,
    PlanarRgb,
};

pub use self::tiff::{
    TiffCompression,
    PipelineConfig,
    PipelineConfigBuilder,
    TiffWriter,
    StandardTiffWriter,
};

pub use conversions::{
    RawDevelopPipeline,
};
