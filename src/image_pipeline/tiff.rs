//! TIFF writing module
//!
//! Writes developed images and ML tensors, plus the configuration shared by the pipelines.

mod writer;
mod standard_tiff_writer;
pub mod types;

pub use writer::TiffWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{PipelineConfig, PipelineConfigBuilder, TiffCompression};
