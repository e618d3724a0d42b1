use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode RAW image: {0}")]
    DecodeError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Buffer size mismatch: expected {expected} samples, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported CFA pattern: {0} (only RGGB is supported)")]
    UnsupportedCfa(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
