use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, SyncSender, TrySendError};
use std::time::{Duration, Instant};

use crate::capture::export::{ExportJob, ExportKind};
use crate::capture::sink::{FrameSink, SinkConfig};
use crate::foundation::error::{DimensionsError, DimensionsResult};
use crate::render::FrameRGBA;

pub const RECORD_FPS: u32 = 30;
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Capture every n-th tick so a `tick_fps` loop records at roughly `record_fps`.
pub fn capture_interval(tick_fps: f64, record_fps: u32) -> u64 {
    if !tick_fps.is_finite() || record_fps == 0 {
        return 1;
    }
    (tick_fps / f64::from(record_fps)).round().max(1.0) as u64
}

/// `MM:SS`, minutes not capped at 59.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Counters for an in-progress recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingStats {
    pub ticks_seen: u64,
    pub frames_queued: u64,
    pub frames_dropped: u64,
}

struct ActiveRecording {
    tx: SyncSender<Arc<FrameRGBA>>,
    encoder: std::thread::JoinHandle<DimensionsResult<PathBuf>>,
    started: Instant,
    interval: u64,
    stats: RecordingStats,
}

/// Hands every n-th tick's frame to an encoder thread without ever blocking the tick.
///
/// Frames are dropped when the encoder falls behind and its queue is full.
pub struct Recorder {
    tick_fps: f64,
    queue_capacity: usize,
    active: Option<ActiveRecording>,
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("tick_fps", &self.tick_fps)
            .field("recording", &self.is_recording())
            .finish()
    }
}

impl Recorder {
    pub fn new(tick_fps: f64) -> Self {
        Self {
            tick_fps,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            active: None,
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn stats(&self) -> Option<RecordingStats> {
        self.active.as_ref().map(|a| a.stats)
    }

    /// Elapsed recording time as `MM:SS`, while recording.
    pub fn elapsed_label(&self) -> Option<String> {
        self.active
            .as_ref()
            .map(|a| format_elapsed(a.started.elapsed()))
    }

    /// Start encoding into `sink`. `path` is reported back when the recording is saved.
    ///
    /// The sink is opened on the caller's thread so a missing encoder fails here.
    pub fn start<S>(&mut self, mut sink: S, cfg: SinkConfig, path: PathBuf) -> DimensionsResult<()>
    where
        S: FrameSink + 'static,
    {
        if self.active.is_some() {
            return Err(DimensionsError::validation("recording already in progress"));
        }
        sink.begin(cfg)?;
        let (tx, rx) = std::sync::mpsc::sync_channel::<Arc<FrameRGBA>>(self.queue_capacity);
        let encoder = std::thread::Builder::new()
            .name("dimensions-encoder".to_owned())
            .spawn(move || encode_loop(&mut sink, rx).map(|()| path))
            .map_err(|e| DimensionsError::capture(format!("failed to spawn encoder: {e}")))?;

        let interval = capture_interval(self.tick_fps, cfg.fps.as_f64().round() as u32);
        tracing::info!(interval, "recording started");
        self.active = Some(ActiveRecording {
            tx,
            encoder,
            started: Instant::now(),
            interval,
            stats: RecordingStats::default(),
        });
        Ok(())
    }

    /// Offer this tick's frame. Only every n-th tick is queued.
    ///
    /// Returns the finished job when the encoder thread has gone away; the recording is over.
    pub fn on_tick(&mut self, frame: &Arc<FrameRGBA>) -> Option<ExportJob> {
        let active = self.active.as_mut()?;
        let tick = active.stats.ticks_seen;
        active.stats.ticks_seen += 1;
        if tick % active.interval != 0 {
            return None;
        }
        match active.tx.try_send(Arc::clone(frame)) {
            Ok(()) => active.stats.frames_queued += 1,
            Err(TrySendError::Full(_)) => {
                active.stats.frames_dropped += 1;
                tracing::trace!("encoder queue full; frame dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::warn!("encoder exited while recording");
                return self.stop();
            }
        }
        None
    }

    /// Stop recording. Finalization continues on the encoder thread; poll the returned job.
    pub fn stop(&mut self) -> Option<ExportJob> {
        let active = self.active.take()?;
        tracing::info!(
            queued = active.stats.frames_queued,
            dropped = active.stats.frames_dropped,
            elapsed = %format_elapsed(active.started.elapsed()),
            "recording stopping"
        );
        drop(active.tx);
        Some(ExportJob::new(ExportKind::Recording, active.encoder))
    }
}

fn encode_loop(sink: &mut dyn FrameSink, rx: Receiver<Arc<FrameRGBA>>) -> DimensionsResult<()> {
    let mut idx = 0u64;
    let mut first_err = None;
    for frame in rx {
        if first_err.is_some() {
            continue;
        }
        if let Err(e) = sink.push_frame(idx, &frame) {
            first_err = Some(e);
        }
        idx += 1;
    }
    let ended = sink.end();
    match first_err {
        Some(e) => Err(e),
        None => ended,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/recorder.rs"]
mod tests;
