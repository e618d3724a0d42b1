//! Planar float tensors handed to the ISP model.

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Channel order of a [`NormalizedTensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BayerChannel {
    R = 0,
    G1 = 1,
    G2 = 2,
    B = 3,
}

impl BayerChannel {
    pub const ALL: [BayerChannel; 4] = [
        BayerChannel::R,
        BayerChannel::G1,
        BayerChannel::G2,
        BayerChannel::B,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Offset of this channel inside an RGGB tile as `(row, col)`.
    pub fn tile_offset(self) -> (usize, usize) {
        match self {
            BayerChannel::R => (0, 0),
            BayerChannel::G1 => (0, 1),
            BayerChannel::G2 => (1, 0),
            BayerChannel::B => (1, 1),
        }
    }
}

/// Four equally sized planes (R, G1, G2, B) stored back to back, samples in `[0, 1]`.
///
/// The planes carry no header; consumers need `width` and `height` alongside
/// the data.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl NormalizedTensor {
    pub const PLANES: usize = 4;

    /// Wraps `data` holding four `width x height` planes.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        check_planar_len(width, height, Self::PLANES, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn plane_len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn plane(&self, channel: BayerChannel) -> &[f32] {
        let len = self.plane_len();
        let start = channel.index() * len;
        &self.data[start..start + len]
    }

    pub fn planes(&self) -> impl Iterator<Item = (BayerChannel, &[f32])> {
        BayerChannel::ALL.into_iter().map(move |c| (c, self.plane(c)))
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }
}

/// Three planes (R, G, B) of a demosaiced image, samples in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarRgb {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl PlanarRgb {
    pub const PLANES: usize = 3;

    /// Wraps `data` holding three `width x height` planes.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        check_planar_len(width, height, Self::PLANES, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Plane 0, 1 or 2; `None` past the blue plane.
    pub fn plane(&self, index: usize) -> Option<&[f32]> {
        if index >= Self::PLANES {
            return None;
        }
        let len = self.width * self.height;
        Some(&self.data[index * len..(index + 1) * len])
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }
}

fn check_planar_len(width: usize, height: usize, planes: usize, actual: usize) -> Result<()> {
    let expected = width
        .checked_mul(height)
        .and_then(|len| len.checked_mul(planes))
        .ok_or(PipelineError::InvalidDimensions(width, height))?;
    if actual != expected {
        return Err(PipelineError::BufferSizeMismatch { expected, actual });
    }
    Ok(())
}
