//! Pipeline conversions module
//!
//! Orchestrates decoding, demosaicing, color adjustment, tensor extraction and output.

mod raw_develop;


pub use raw_develop::RawDevelopPipeline;
