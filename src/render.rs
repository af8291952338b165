//! Frame renderers and the CPU rasterizer they feed.
//!
//! Renderers never touch pixels: [`cells`], [`text_art`], [`watermark`] and [`overlay`] each
//! emit [`display_list::DisplayList`] commands, and [`cpu::CpuRasterizer`] turns a list into a
//! premultiplied [`FrameRGBA`].

pub mod blur;
pub mod cells;
pub mod composite;
pub mod cpu;
pub mod display_list;
pub mod overlay;
pub mod text;
pub mod text_art;
pub mod watermark;

use crate::foundation::core::FrameSize;
use crate::foundation::error::{DimensionsError, DimensionsResult};
use crate::frame::VideoFrame;
use crate::grid::GridGeometry;
use crate::mask::ForegroundMask;
use crate::palette::PaletteCursor;
use crate::params::RenderParams;

/// Everything a cell renderer reads for one tick.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub grid: &'a GridGeometry,
    pub params: &'a RenderParams,
    pub time: f64,
    pub color_time: f64,
    pub palette: &'a PaletteCursor,
    pub mask: Option<&'a ForegroundMask>,
    pub video: Option<&'a VideoFrame>,
}

/// Per-tick counters reported by the renderers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Cells whose mask sample was evaluated.
    pub cells_evaluated: usize,
    pub foreground_cells: usize,
}

/// Rasterized frame. `data` is RGBA8, premultiplied when `premultiplied` is set.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl std::fmt::Debug for FrameRGBA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRGBA")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("premultiplied", &self.premultiplied)
            .finish_non_exhaustive()
    }
}

impl FrameRGBA {
    /// Fully transparent premultiplied frame.
    pub fn transparent(size: FrameSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            data: vec![0; size.rgba_len()],
            premultiplied: true,
        }
    }

    pub fn size(&self) -> DimensionsResult<FrameSize> {
        FrameSize::new(self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y.min(self.height.saturating_sub(1)) as usize) * self.width as usize
            + x.min(self.width.saturating_sub(1)) as usize)
            * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Composite a premultiplied layer of the same size on top of this frame.
    pub fn composite_over(&mut self, layer: &FrameRGBA) -> DimensionsResult<()> {
        if layer.width != self.width || layer.height != self.height {
            return Err(DimensionsError::validation(format!(
                "layer size {}x{} does not match frame {}x{}",
                layer.width, layer.height, self.width, self.height
            )));
        }
        if !self.premultiplied || !layer.premultiplied {
            return Err(DimensionsError::validation(
                "layer composite requires premultiplied frames",
            ));
        }
        composite::over_in_place(&mut self.data, &layer.data, 1.0)
    }

    /// Straight-alpha copy of the pixel data, as expected by image encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Opaque RGBA8 with any remaining transparency flattened over `bg`.
    pub fn to_opaque_rgba8(&self, bg: [u8; 3]) -> Vec<u8> {
        use crate::foundation::math::mul_div255_u16;

        let straight_src;
        let src = if self.premultiplied {
            &self.data
        } else {
            straight_src = self.to_premultiplied();
            &straight_src
        };
        let mut out = vec![0u8; src.len()];
        for (d, s) in out.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
            let inv = 255u16 - u16::from(s[3]);
            for c in 0..3 {
                d[c] = (u16::from(s[c]) + mul_div255_u16(u16::from(bg[c]), inv)).min(255) as u8;
            }
            d[3] = 255;
        }
        out
    }

    fn to_premultiplied(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .flat_map(|p| crate::foundation::core::Rgba8::new(p[0], p[1], p[2], p[3]).to_premul())
            .collect()
    }
}
