//! Foreground masks and cell-center point sampling.

use crate::foundation::core::FrameSize;
use crate::foundation::error::{DimensionsError, DimensionsResult};
use crate::grid::GridGeometry;

/// A cell is foreground when its sampled confidence is strictly above this value.
pub const FOREGROUND_THRESHOLD: u8 = 128;

/// Per-pixel foreground confidence (0..=255), one byte per pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct ForegroundMask {
    size: FrameSize,
    confidence: Vec<u8>,
}

impl std::fmt::Debug for ForegroundMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForegroundMask")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl ForegroundMask {
    /// Wrap a single-channel confidence buffer.
    pub fn from_confidence(size: FrameSize, confidence: Vec<u8>) -> DimensionsResult<Self> {
        if confidence.len() != size.pixel_count() {
            return Err(DimensionsError::validation(format!(
                "mask buffer has {} bytes, expected {} for {size}",
                confidence.len(),
                size.pixel_count()
            )));
        }
        Ok(Self { size, confidence })
    }

    /// Take channel 0 of an RGBA8 buffer as the confidence channel.
    pub fn from_rgba_channel0(size: FrameSize, rgba: &[u8]) -> DimensionsResult<Self> {
        if rgba.len() != size.rgba_len() {
            return Err(DimensionsError::validation(format!(
                "mask rgba buffer has {} bytes, expected {} for {size}",
                rgba.len(),
                size.rgba_len()
            )));
        }
        let confidence = rgba.chunks_exact(4).map(|px| px[0]).collect();
        Ok(Self { size, confidence })
    }

    /// Uniform mask, handy for full-foreground or empty scenes.
    pub fn filled(size: FrameSize, value: u8) -> Self {
        Self {
            size,
            confidence: vec![value; size.pixel_count()],
        }
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.confidence
    }

    /// Confidence at a mask pixel. Coordinates are clamped to the mask bounds.
    pub fn confidence_at(&self, x: u32, y: u32) -> u8 {
        let x = x.min(self.size.width - 1) as usize;
        let y = y.min(self.size.height - 1) as usize;
        self.confidence[y * self.size.width as usize + x]
    }

    /// Confidence at a canvas pixel, mapped proportionally when the mask's native resolution
    /// differs from the canvas.
    pub fn confidence_at_canvas(&self, canvas: FrameSize, x: u32, y: u32) -> u8 {
        if canvas == self.size {
            return self.confidence_at(x, y);
        }
        let mx = scale_coord(x, canvas.width, self.size.width);
        let my = scale_coord(y, canvas.height, self.size.height);
        self.confidence_at(mx, my)
    }
}

/// Map a pixel coordinate between two resolutions: `floor(v / from * to)`.
pub(crate) fn scale_coord(v: u32, from: u32, to: u32) -> u32 {
    ((f64::from(v) / f64::from(from)) * f64::from(to)).floor() as u32
}

/// Answers "is this cell foreground?" for one frame's mask and grid.
#[derive(Debug, Clone, Copy)]
pub struct MaskSampler<'a> {
    mask: &'a ForegroundMask,
    grid: GridGeometry,
}

impl<'a> MaskSampler<'a> {
    pub fn new(mask: &'a ForegroundMask, grid: GridGeometry) -> Self {
        Self { mask, grid }
    }

    /// Canvas pixel sampled for a cell: its nominal center, clamped into the frame.
    pub fn sample_point(&self, col: u32, row: u32) -> (u32, u32) {
        self.grid.cell_center(col, row)
    }

    pub fn confidence(&self, col: u32, row: u32) -> u8 {
        let (x, y) = self.sample_point(col, row);
        self.mask.confidence_at_canvas(self.grid.frame(), x, y)
    }

    pub fn is_foreground(&self, col: u32, row: u32) -> bool {
        self.confidence(col, row) > FOREGROUND_THRESHOLD
    }
}

#[cfg(test)]
#[path = "../tests/unit/mask.rs"]
mod tests;
