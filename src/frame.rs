//! Raw camera frames and the brightness sampling used by the text-art renderer.

use crate::foundation::core::{FrameSize, Rgba8};
use crate::foundation::error::{DimensionsError, DimensionsResult};

/// Straight-alpha RGBA8 camera frame at its native resolution.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoFrame {
    size: FrameSize,
    rgba: Vec<u8>,
}

impl std::fmt::Debug for VideoFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoFrame")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl VideoFrame {
    pub fn from_rgba(size: FrameSize, rgba: Vec<u8>) -> DimensionsResult<Self> {
        if rgba.len() != size.rgba_len() {
            return Err(DimensionsError::validation(format!(
                "video frame has {} bytes, expected {} for {size}",
                rgba.len(),
                size.rgba_len()
            )));
        }
        Ok(Self { size, rgba })
    }

    pub fn from_image(img: image::RgbaImage) -> DimensionsResult<Self> {
        let size = FrameSize::new(img.width(), img.height())?;
        Self::from_rgba(size, img.into_raw())
    }

    pub fn filled(size: FrameSize, color: Rgba8) -> Self {
        Self {
            size,
            rgba: color.to_array().repeat(size.pixel_count()),
        }
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        let x = x.min(self.size.width - 1) as usize;
        let y = y.min(self.size.height - 1) as usize;
        let i = (y * self.size.width as usize + x) * 4;
        Rgba8::new(
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        )
    }

    /// Pixel under a canvas coordinate, mapped proportionally into this frame's resolution.
    pub fn pixel_at_canvas(&self, canvas: FrameSize, x: u32, y: u32) -> Rgba8 {
        let vx = crate::mask::scale_coord(x, canvas.width, self.size.width);
        let vy = crate::mask::scale_coord(y, canvas.height, self.size.height);
        self.pixel(vx, vy)
    }
}

/// Rec. 601 luma in `0..=255`.
pub fn luminance(c: Rgba8) -> f64 {
    f64::from(c.r) * 0.299 + f64::from(c.g) * 0.587 + f64::from(c.b) * 0.114
}

/// Normalized luma with a 0.7 gamma lift, in `0..=1`.
pub fn contrast_enhanced(c: Rgba8) -> f64 {
    (luminance(c) / 255.0).powf(0.7)
}
