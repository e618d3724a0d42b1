//! Color adjustment module
//!
//! HSL based saturation and vibrance controls applied after demosaicing.

pub mod adjust;
pub mod hsl;

#[cfg(test)]
mod tests;

pub use adjust::{ColorAdjuster, ColorAdjustmentParams};
pub use hsl::{Hsl, hsl_to_rgb, rgb_to_hsl};
