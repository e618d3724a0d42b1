use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::RawImageData;

/// Source of decoded sensor data. Parsing the RAW container is entirely the
/// implementor's job.
pub trait RawImageReader {
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData>;
}
