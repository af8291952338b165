use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::foundation::error::{DimensionsError, DimensionsResult};
use crate::render::FrameRGBA;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Recording,
    Screenshot,
}

impl ExportKind {
    pub fn success_message(self) -> &'static str {
        match self {
            Self::Recording => "Recording saved",
            Self::Screenshot => "Screenshot saved",
        }
    }

    pub fn failure_message(self, err: &DimensionsError) -> String {
        match self {
            Self::Recording => format!("Recording failed: {err}"),
            Self::Screenshot => format!("Download failed: {err}"),
        }
    }
}

/// A background export whose outcome is picked up by polling.
#[derive(Debug)]
pub struct ExportJob {
    kind: ExportKind,
    handle: Option<JoinHandle<DimensionsResult<PathBuf>>>,
}

impl ExportJob {
    pub fn new(kind: ExportKind, handle: JoinHandle<DimensionsResult<PathBuf>>) -> Self {
        Self {
            kind,
            handle: Some(handle),
        }
    }

    pub fn kind(&self) -> ExportKind {
        self.kind
    }

    /// Outcome once the worker is done, without blocking. Yields `Some` at most once.
    pub fn try_finish(&mut self) -> Option<DimensionsResult<PathBuf>> {
        if !self.handle.as_ref()?.is_finished() {
            return None;
        }
        self.wait()
    }

    /// Block until the worker is done. Yields `Some` at most once.
    pub fn wait(&mut self) -> Option<DimensionsResult<PathBuf>> {
        let handle = self.handle.take()?;
        Some(handle.join().unwrap_or_else(|_| {
            Err(DimensionsError::capture("export worker panicked"))
        }))
    }
}

/// Encode `frame` as PNG at `path` on a background thread.
pub fn spawn_screenshot(frame: Arc<FrameRGBA>, path: PathBuf) -> DimensionsResult<ExportJob> {
    let handle = std::thread::Builder::new()
        .name("dimensions-screenshot".to_owned())
        .spawn(move || write_png(&frame, &path).map(|()| path))
        .map_err(|e| DimensionsError::capture(format!("failed to spawn screenshot worker: {e}")))?;
    Ok(ExportJob::new(ExportKind::Screenshot, handle))
}

/// Write a frame as straight-alpha PNG.
pub fn write_png(frame: &FrameRGBA, path: &std::path::Path) -> DimensionsResult<()> {
    crate::capture::ffmpeg::ensure_parent_dir(path)?;
    let rgba = frame.to_straight_rgba8();
    image::save_buffer_with_format(
        path,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| DimensionsError::capture(format!("write png '{}': {e}", path.display())))
}
