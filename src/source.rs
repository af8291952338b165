//! Camera and segmentation producers consumed by the capture worker.
//!
//! Both are traits so the pipeline runs headless: image sequences stand in for a camera and
//! for a segmentation model, and synthetic implementations need no files at all.

use std::path::{Path, PathBuf};

use crate::foundation::core::FrameSize;
use crate::foundation::error::{DimensionsError, DimensionsResult};
use crate::frame::VideoFrame;
use crate::mask::ForegroundMask;

/// Why a frame source could not be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionFailure {
    PermissionDenied,
    NotFound,
    Busy,
    Other(String),
}

impl AcquisitionFailure {
    pub fn from_io(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::ResourceBusy | std::io::ErrorKind::WouldBlock => Self::Busy,
            _ => Self::Other(err.to_string()),
        }
    }

    /// Message shown to the user in the status line.
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied => {
                "Camera permission denied. Please allow camera access.".to_owned()
            }
            Self::NotFound => "No camera found on this device.".to_owned(),
            Self::Busy => "Camera is already in use by another application.".to_owned(),
            Self::Other(detail) => format!("Error: {detail}"),
        }
    }

    pub fn into_error(self) -> DimensionsError {
        DimensionsError::acquisition(self.user_message())
    }
}

/// Producer of camera frames at native resolution.
pub trait FrameSource: Send {
    /// Acquire the device. Returns the native frame size.
    fn open(&mut self) -> DimensionsResult<FrameSize>;

    /// Next frame. Failures are reported as capture errors and are not fatal.
    fn next_frame(&mut self) -> DimensionsResult<VideoFrame>;

    fn describe(&self) -> String;
}

/// Segmentation oracle: frame in, per-pixel foreground confidence out.
pub trait Segmenter: Send {
    /// Load the model. Failure is fatal to the session.
    fn load(&mut self) -> DimensionsResult<()>;

    fn segment(&mut self, frame: &VideoFrame) -> DimensionsResult<ForegroundMask>;

    fn describe(&self) -> String;
}

/// Image files in `path` (or `path` itself when it is a file), sorted by name.
fn list_images(path: &Path) -> std::io::Result<Vec<PathBuf>> {
    let meta = std::fs::metadata(path)?;
    if meta.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && image::ImageFormat::from_path(p).is_ok())
        .collect();
    files.sort();
    Ok(files)
}

fn decode_rgba(path: &Path) -> DimensionsResult<image::RgbaImage> {
    let img = image::open(path).map_err(|e| {
        DimensionsError::capture(format!("failed to decode '{}': {e}", path.display()))
    })?;
    Ok(img.to_rgba8())
}

/// Loops over a directory of still images as if they were camera frames.
#[derive(Debug)]
pub struct ImageSequenceSource {
    path: PathBuf,
    files: Vec<PathBuf>,
    size: Option<FrameSize>,
    cursor: usize,
}

impl ImageSequenceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            files: Vec::new(),
            size: None,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn open(&mut self) -> DimensionsResult<FrameSize> {
        let files =
            list_images(&self.path).map_err(|e| AcquisitionFailure::from_io(&e).into_error())?;
        let first = files
            .first()
            .ok_or_else(|| AcquisitionFailure::NotFound.into_error())?;
        let img = decode_rgba(first)
            .map_err(|e| AcquisitionFailure::Other(e.to_string()).into_error())?;
        let size = FrameSize::new(img.width(), img.height())
            .map_err(|e| AcquisitionFailure::Other(e.to_string()).into_error())?;
        tracing::info!(
            source = %self.path.display(),
            frames = files.len(),
            %size,
            "image sequence opened"
        );
        self.files = files;
        self.size = Some(size);
        self.cursor = 0;
        Ok(size)
    }

    fn next_frame(&mut self) -> DimensionsResult<VideoFrame> {
        if self.files.is_empty() {
            return Err(DimensionsError::capture("image sequence is not open"));
        }
        let path = &self.files[self.cursor % self.files.len()];
        self.cursor = self.cursor.wrapping_add(1);
        let mut img = decode_rgba(path)?;
        if let Some(size) = self.size
            && (img.width() != size.width || img.height() != size.height)
        {
            img = image::imageops::resize(
                &img,
                size.width,
                size.height,
                image::imageops::FilterType::Triangle,
            );
        }
        VideoFrame::from_image(img)
    }

    fn describe(&self) -> String {
        format!("images:{}", self.path.display())
    }
}

/// Moving color test pattern; needs no device.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    size: FrameSize,
    frame_index: u64,
}

impl SyntheticSource {
    pub fn new(size: FrameSize) -> Self {
        Self {
            size,
            frame_index: 0,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn open(&mut self) -> DimensionsResult<FrameSize> {
        self.frame_index = 0;
        Ok(self.size)
    }

    fn next_frame(&mut self) -> DimensionsResult<VideoFrame> {
        let (w, h) = (self.size.width, self.size.height);
        let phase = (self.frame_index % 256) as u32;
        self.frame_index += 1;

        let mut rgba = Vec::with_capacity(self.size.rgba_len());
        for y in 0..h {
            for x in 0..w {
                let r = (x * 255 / w.max(1)) as u8;
                let g = (y * 255 / h.max(1)) as u8;
                let b = ((x + y + phase * 4) % 256) as u8;
                rgba.extend_from_slice(&[r, g, b, 255]);
            }
        }
        VideoFrame::from_rgba(self.size, rgba)
    }

    fn describe(&self) -> String {
        format!("synthetic:{}", self.size)
    }
}

/// Replays precomputed masks (channel 0 of each image) in a loop.
#[derive(Debug)]
pub struct MaskSequenceSegmenter {
    path: PathBuf,
    files: Vec<PathBuf>,
    cursor: usize,
}

impl MaskSequenceSegmenter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            files: Vec::new(),
            cursor: 0,
        }
    }
}

impl Segmenter for MaskSequenceSegmenter {
    fn load(&mut self) -> DimensionsResult<()> {
        let files = list_images(&self.path).map_err(|e| {
            DimensionsError::model_load(format!(
                "cannot read masks at '{}': {e}",
                self.path.display()
            ))
        })?;
        if files.is_empty() {
            return Err(DimensionsError::model_load(format!(
                "no mask images found at '{}'",
                self.path.display()
            )));
        }
        tracing::info!(masks = files.len(), source = %self.path.display(), "mask sequence loaded");
        self.files = files;
        self.cursor = 0;
        Ok(())
    }

    fn segment(&mut self, _frame: &VideoFrame) -> DimensionsResult<ForegroundMask> {
        if self.files.is_empty() {
            return Err(DimensionsError::capture("mask sequence is not loaded"));
        }
        let path = &self.files[self.cursor % self.files.len()];
        self.cursor = self.cursor.wrapping_add(1);
        let img = decode_rgba(path)?;
        let size = FrameSize::new(img.width(), img.height())?;
        ForegroundMask::from_rgba_channel0(size, img.as_raw())
    }

    fn describe(&self) -> String {
        format!("masks:{}", self.path.display())
    }
}

/// Synthetic head-and-shoulders silhouette that sways slowly from side to side.
#[derive(Debug, Clone, Default)]
pub struct SilhouetteSegmenter {
    calls: u64,
    sway: bool,
}

impl SilhouetteSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn swaying(mut self) -> Self {
        self.sway = true;
        self
    }

    /// Whether the normalized point `(u, v)` lies inside the silhouette centered at `cx`.
    pub fn contains(cx: f64, u: f64, v: f64) -> bool {
        let in_ellipse = |ex: f64, ey: f64, rx: f64, ry: f64| {
            let dx = (u - ex) / rx;
            let dy = (v - ey) / ry;
            dx * dx + dy * dy <= 1.0
        };
        let head = in_ellipse(cx, 0.38, 0.13, 0.2);
        let neck = (u - cx).abs() <= 0.05 && (0.5..=0.72).contains(&v);
        let shoulders = v >= 0.68 && in_ellipse(cx, 1.05, 0.36, 0.38);
        head || neck || shoulders
    }
}

impl Segmenter for SilhouetteSegmenter {
    fn load(&mut self) -> DimensionsResult<()> {
        self.calls = 0;
        Ok(())
    }

    fn segment(&mut self, frame: &VideoFrame) -> DimensionsResult<ForegroundMask> {
        let size = frame.size();
        let cx = if self.sway {
            0.5 + (self.calls as f64 * 0.05).sin() * 0.05
        } else {
            0.5
        };
        self.calls += 1;

        let (w, h) = (f64::from(size.width), f64::from(size.height));
        let mut confidence = Vec::with_capacity(size.pixel_count());
        for y in 0..size.height {
            let v = (f64::from(y) + 0.5) / h;
            for x in 0..size.width {
                let u = (f64::from(x) + 0.5) / w;
                confidence.push(if Self::contains(cx, u, v) { 255 } else { 0 });
            }
        }
        ForegroundMask::from_confidence(size, confidence)
    }

    fn describe(&self) -> String {
        "silhouette".to_owned()
    }
}

#[cfg(test)]
#[path = "../tests/unit/source.rs"]
mod tests;
