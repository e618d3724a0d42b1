//! Bayer mosaic extraction module
//!
//! Turns sensor data into the normalized planar tensors consumed by the ISP model.

pub mod extractor;
pub mod types;

pub use extractor::MosaicExtractor;
pub use types::{BayerChannel, NormalizedTensor, PlanarRgb};
