//! Debayering module for converting Bayer pattern RAW images to RGB

pub mod cpu_debayer;
pub mod types;

pub use cpu_debayer::CpuDebayer;
pub use types::PixelBuffer;
