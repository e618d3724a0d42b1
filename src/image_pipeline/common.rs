//! Common utilities module
//!
//! This module contains the error type and numeric helpers shared across the pipeline.

pub mod error;
pub mod numeric;

pub use error::{PipelineError, Result};
