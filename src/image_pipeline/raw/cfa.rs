//! Color filter array description.

use std::fmt;

/// Color of a single photosite filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfaColor {
    Red,
    Green,
    Blue,
    /// Anything outside the RGB primaries (emerald, cyan, ...).
    Other,
}

impl CfaColor {
    /// Maps the color indices used by rawloader (0 = R, 1 = G, 2 = B).
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => CfaColor::Red,
            1 => CfaColor::Green,
            2 => CfaColor::Blue,
            _ => CfaColor::Other,
        }
    }

    pub fn from_char(c: char) -> Self {
        match c.to_ascii_uppercase() {
            'R' => CfaColor::Red,
            'G' => CfaColor::Green,
            'B' => CfaColor::Blue,
            _ => CfaColor::Other,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            CfaColor::Red => 'R',
            CfaColor::Green => 'G',
            CfaColor::Blue => 'B',
            CfaColor::Other => 'U',
        }
    }
}

/// The 2x2 tile of a Bayer mosaic, anchored at sensor position (0, 0).
///
/// # Example
/// ```
/// use rawtensor_rs::image_pipeline::{CfaColor, CfaDescriptor};
///
/// let cfa = CfaDescriptor::from_pattern("RGGB");
/// assert_eq!(cfa.color_at(0, 0), CfaColor::Red);
/// assert_eq!(cfa.color_at(3, 3), CfaColor::Blue);
/// assert!(cfa.is_rggb());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfaDescriptor {
    tile: [[CfaColor; 2]; 2],
}

impl CfaDescriptor {
    pub const RGGB: CfaDescriptor = CfaDescriptor {
        tile: [
            [CfaColor::Red, CfaColor::Green],
            [CfaColor::Green, CfaColor::Blue],
        ],
    };

    pub fn new(tile: [[CfaColor; 2]; 2]) -> Self {
        Self { tile }
    }

    /// Builds the tile from a four-letter row-major pattern such as `"GRBG"`.
    /// Missing letters are treated as unknown filters.
    pub fn from_pattern(pattern: &str) -> Self {
        let mut colors = pattern.chars().map(CfaColor::from_char);
        let mut next = || colors.next().unwrap_or(CfaColor::Other);
        let top = [next(), next()];
        let bottom = [next(), next()];
        Self { tile: [top, bottom] }
    }

    /// Samples a decoder's `(row, col) -> color` lookup over the first tile.
    pub fn from_fn<F: Fn(usize, usize) -> CfaColor>(color_at: F) -> Self {
        Self {
            tile: [
                [color_at(0, 0), color_at(0, 1)],
                [color_at(1, 0), color_at(1, 1)],
            ],
        }
    }

    #[inline]
    pub fn color_at(&self, row: usize, col: usize) -> CfaColor {
        self.tile[row % 2][col % 2]
    }

    pub fn is_rggb(&self) -> bool {
        *self == Self::RGGB
    }

    pub fn pattern_name(&self) -> String {
        self.tile.iter().flatten().map(|c| c.as_char()).collect()
    }
}

impl fmt::Display for CfaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern_name())
    }
}
