use crate::foundation::core::{Fps, FrameSize};
use crate::foundation::error::DimensionsResult;
use crate::render::FrameRGBA;

/// Configuration handed to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub size: FrameSize,
    pub fps: Fps,
}

/// Consumer of recorded frames.
///
/// `push_frame` is called with strictly increasing indices between `begin` and `end`.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> DimensionsResult<()>;
    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> DimensionsResult<()>;
    fn end(&mut self) -> DimensionsResult<()>;
}

/// Keeps recorded frames in memory. Used by tests and the bench.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[(u64, FrameRGBA)] {
        &self.frames
    }

    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> DimensionsResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> DimensionsResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> DimensionsResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Forwards to a shared sink so callers can inspect it after the encoder thread is done.
impl<S: FrameSink> FrameSink for std::sync::Arc<std::sync::Mutex<S>> {
    fn begin(&mut self, cfg: SinkConfig) -> DimensionsResult<()> {
        self.lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .begin(cfg)
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> DimensionsResult<()> {
        self.lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_frame(idx, frame)
    }

    fn end(&mut self) -> DimensionsResult<()> {
        self.lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .end()
    }
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn begin(&mut self, cfg: SinkConfig) -> DimensionsResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> DimensionsResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn end(&mut self) -> DimensionsResult<()> {
        (**self).end()
    }
}
