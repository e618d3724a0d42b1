//! RAW image reading module
//!
//! Format-agnostic access to decoded sensor data, its CFA layout and calibration.

mod reader;
mod rawloader_reader;
pub mod cfa;
pub mod types;

pub use reader::RawImageReader;
pub use rawloader_reader::RawLoaderReader;
pub use cfa::{CfaColor, CfaDescriptor};
pub use types::{CalibrationConstants, DeviceFamily, RawImageData, RawMetadata, RawMosaicPlane};
