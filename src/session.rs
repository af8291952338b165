//! A running visualizer: source and segmenter on a capture worker, animation on the tick loop.
//!
//! Start-up order:
//! 1. open the frame source (camera),
//! 2. load the segmenter,
//! 3. spawn the capture worker that publishes the latest frame and mask into mailboxes.
//!
//! Everything else happens on the thread that calls [`Session::run`] or [`Session::tick`]:
//! control messages are drained, one frame is rendered, recording and exports are serviced.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::capture::export::{ExportJob, ExportKind, spawn_screenshot};
use crate::capture::ffmpeg::{WebmCodec, WebmSink, WebmSinkOpts};
use crate::capture::naming::{unique_export_path, unix_millis_now};
use crate::capture::recorder::Recorder;
use crate::capture::sink::{FrameSink, SinkConfig};
use crate::config::SessionConfig;
use crate::driver::{Animator, Control, LoopReport, Scheduler, TickInputs, TickOutput};
use crate::foundation::core::{Fps, FrameSize};
use crate::foundation::error::{DimensionsError, DimensionsResult};
use crate::frame::VideoFrame;
use crate::mailbox::Mailbox;
use crate::mask::ForegroundMask;
use crate::render::FrameRGBA;
use crate::render::cpu::CpuRasterizer;
use crate::render::text::TextLayoutEngine;
use crate::source::{FrameSource, Segmenter};
use crate::status::{StatusBoard, StatusKind};

pub const STATUS_REQUESTING_CAMERA: &str = "Requesting camera access...";
pub const STATUS_LOADING_MODEL: &str = "Loading segmentation model...";
pub const STATUS_RUNNING: &str = "Camera active - Segmentation running";
pub const STATUS_RECORDING: &str = "Recording...";

/// Builds the sink a new recording writes into.
pub type SinkFactory = Box<dyn FnMut(&Path) -> DimensionsResult<Box<dyn FrameSink>> + Send>;

/// Status-line text for a start-up or capture failure.
pub fn status_message(err: &DimensionsError) -> String {
    match err {
        DimensionsError::Acquisition(msg) => msg.clone(),
        DimensionsError::ModelLoad(msg) => format!("Failed to load segmentation model: {msg}"),
        DimensionsError::Capture(msg) => format!("Error: {msg}"),
        other => format!("Error: {other}"),
    }
}

fn webm_sink_factory(bg_rgb: [u8; 3]) -> SinkFactory {
    let mut codec: Option<WebmCodec> = None;
    Box::new(move |path: &Path| {
        let codec = *codec.get_or_insert_with(WebmCodec::probe);
        let mut opts = WebmSinkOpts::new(path.to_path_buf(), codec);
        opts.bg_rgb = bg_rgb;
        Ok(Box::new(WebmSink::new(opts)) as Box<dyn FrameSink>)
    })
}

/// A camera frame and the mask segmented from it, published together.
#[derive(Debug)]
pub struct CapturedFrame {
    pub video: VideoFrame,
    pub mask: ForegroundMask,
}

pub struct Session {
    config: SessionConfig,
    canvas: FrameSize,
    status: Arc<StatusBoard>,
    running: Arc<AtomicBool>,
    control_tx: Sender<Control>,
    control_rx: Receiver<Control>,
    captures: Arc<Mailbox<CapturedFrame>>,
    presented: Arc<Mailbox<FrameRGBA>>,
    capture: Option<JoinHandle<()>>,
    animator: Animator,
    recorder: Recorder,
    exports: Vec<ExportJob>,
    sink_factory: SinkFactory,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("canvas", &self.canvas)
            .field("running", &self.is_running())
            .field("recorder", &self.recorder)
            .field("pending_exports", &self.exports.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Acquire the source, load the segmenter and start the capture worker.
    ///
    /// Failures are posted as an error status before being returned.
    pub fn start(
        config: SessionConfig,
        source: Box<dyn FrameSource>,
        segmenter: Box<dyn Segmenter>,
    ) -> DimensionsResult<Self> {
        Self::start_with_status(config, source, segmenter, Arc::new(StatusBoard::new()))
    }

    /// Like [`Session::start`], posting to a board the caller already holds.
    #[tracing::instrument(
        skip_all,
        fields(source = %source.describe(), segmenter = %segmenter.describe())
    )]
    pub fn start_with_status(
        config: SessionConfig,
        mut source: Box<dyn FrameSource>,
        mut segmenter: Box<dyn Segmenter>,
        status: Arc<StatusBoard>,
    ) -> DimensionsResult<Self> {
        config.validate()?;

        status.post(StatusKind::Active, STATUS_REQUESTING_CAMERA);
        let canvas = source.open().inspect_err(|e| {
            status.post(StatusKind::Error, status_message(e));
        })?;

        status.post(StatusKind::Active, STATUS_LOADING_MODEL);
        segmenter.load().inspect_err(|e| {
            status.post(StatusKind::Error, status_message(e));
        })?;

        let text = TextLayoutEngine::discover(config.font.as_deref());
        let animator = Animator::new(canvas, config.render.clone(), CpuRasterizer::new(text))?;
        let tick_fps = config.tick_fps()?;
        let bg = config.render.background.to_rgba8();

        let running = Arc::new(AtomicBool::new(true));
        let captures = Arc::new(Mailbox::new());
        let capture = spawn_capture_worker(
            source,
            segmenter,
            CaptureShared {
                running: Arc::clone(&running),
                captures: Arc::clone(&captures),
                status: Arc::clone(&status),
            },
            Duration::from_secs_f64(1.0 / f64::from(config.capture_fps)),
        )?;

        status.post(StatusKind::Active, STATUS_RUNNING);
        let (control_tx, control_rx) = std::sync::mpsc::channel();
        tracing::info!(%canvas, fps = config.fps, "session started");

        Ok(Self {
            canvas,
            status,
            running,
            control_tx,
            control_rx,
            captures,
            presented: Arc::new(Mailbox::new()),
            capture: Some(capture),
            animator,
            recorder: Recorder::new(tick_fps.as_f64()),
            exports: Vec::new(),
            sink_factory: webm_sink_factory([bg.r, bg.g, bg.b]),
            config,
        })
    }

    /// Record into sinks built by `factory` instead of spawning `ffmpeg`.
    pub fn with_sink_factory(mut self, factory: SinkFactory) -> Self {
        self.sink_factory = factory;
        self
    }

    pub fn canvas(&self) -> FrameSize {
        self.canvas
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn status(&self) -> Arc<StatusBoard> {
        Arc::clone(&self.status)
    }

    pub fn controls(&self) -> Sender<Control> {
        self.control_tx.clone()
    }

    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Latest frame as shown to the viewer.
    /// Latest capture worker output.
    pub fn captures(&self) -> Arc<Mailbox<CapturedFrame>> {
        Arc::clone(&self.captures)
    }

    pub fn presented(&self) -> Arc<Mailbox<FrameRGBA>> {
        Arc::clone(&self.presented)
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn recording_elapsed(&self) -> Option<String> {
        self.recorder.elapsed_label()
    }

    pub fn pending_exports(&self) -> usize {
        self.exports.len()
    }

    /// One frame: drain controls, render, feed the recorder, publish, service exports.
    pub fn tick(&mut self) -> DimensionsResult<TickOutput> {
        let screenshot = self.drain_controls();

        let capture = self.captures.latest();
        let out = self.animator.tick(TickInputs {
            mask: capture.as_deref().map(|c| &c.mask),
            video: capture.as_deref().map(|c| &c.video),
        })?;

        if let Some(job) = self.recorder.on_tick(&out.frame) {
            self.exports.push(job);
        }
        if self.config.grid_overlay {
            let presented = self.animator.present(&out.frame)?;
            self.presented.publish(presented);
        } else {
            self.presented.publish_arc(Arc::clone(&out.frame));
        }

        if screenshot {
            self.take_screenshot(Arc::clone(&out.frame));
        }
        self.poll_exports();
        Ok(out)
    }

    /// Run the tick loop paced at the configured fps until stopped.
    pub fn run(&mut self) -> LoopReport {
        self.run_for(None)
    }

    #[tracing::instrument(skip(self))]
    pub fn run_for(&mut self, max_ticks: Option<u64>) -> LoopReport {
        let interval = Fps::new(self.config.fps, 1)
            .map(Fps::frame_duration)
            .unwrap_or(Duration::from_millis(16));
        let mut scheduler = Scheduler::new(Arc::clone(&self.running)).with_frame_interval(interval);
        if let Some(n) = max_ticks {
            scheduler = scheduler.with_max_ticks(n);
        }
        scheduler.run(|_| self.tick().map(|_| ()))
    }

    /// Stop the loop and the capture worker, then finish every pending export.
    #[tracing::instrument(skip(self))]
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(job) = self.recorder.stop() {
            self.exports.push(job);
        }
        for mut job in std::mem::take(&mut self.exports) {
            if let Some(outcome) = job.wait() {
                self.report_export(job.kind(), outcome);
            }
        }
        if let Some(handle) = self.capture.take()
            && handle.join().is_err()
        {
            tracing::error!("capture worker panicked");
        }
    }

    /// Returns whether a screenshot was requested.
    fn drain_controls(&mut self) -> bool {
        let mut screenshot = false;
        loop {
            match self.control_rx.try_recv() {
                Ok(Control::Update(update)) => {
                    tracing::debug!(?update, "parameter update");
                    if let Err(e) = self.animator.apply(update) {
                        tracing::warn!(error = %e, "parameter update rejected");
                    }
                }
                Ok(Control::ToggleRecording) => self.toggle_recording(),
                Ok(Control::Screenshot) => screenshot = true,
                Ok(Control::Stop) => self.running.store(false, Ordering::SeqCst),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        screenshot
    }

    fn toggle_recording(&mut self) {
        if let Some(job) = self.recorder.stop() {
            self.exports.push(job);
            return;
        }
        let path = unique_export_path(&self.config.export_dir, unix_millis_now(), "webm");
        let started = Fps::new(self.config.record_fps, 1).and_then(|fps| {
            let sink = (self.sink_factory)(&path)?;
            self.recorder.start(
                sink,
                SinkConfig {
                    size: self.canvas,
                    fps,
                },
                path.clone(),
            )
        });
        match started {
            Ok(()) => {
                tracing::info!(path = %path.display(), "recording to file");
                self.status.post(StatusKind::Error, STATUS_RECORDING);
            }
            Err(e) => self
                .status
                .post(StatusKind::Error, format!("Recording failed: {e}")),
        }
    }

    fn take_screenshot(&mut self, layer: Arc<FrameRGBA>) {
        let path = unique_export_path(&self.config.export_dir, unix_millis_now(), "png");
        match spawn_screenshot(layer, path) {
            Ok(job) => self.exports.push(job),
            Err(e) => self
                .status
                .post(StatusKind::Error, format!("Download failed: {e}")),
        }
    }

    fn poll_exports(&mut self) {
        let mut i = 0;
        while i < self.exports.len() {
            match self.exports[i].try_finish() {
                Some(outcome) => {
                    let job = self.exports.swap_remove(i);
                    self.report_export(job.kind(), outcome);
                }
                None => i += 1,
            }
        }
    }

    fn report_export(&self, kind: ExportKind, outcome: DimensionsResult<PathBuf>) {
        match outcome {
            Ok(path) => {
                tracing::info!(path = %path.display(), ?kind, "export saved");
                self.status.post(StatusKind::Active, kind.success_message());
            }
            Err(e) => self.status.post(StatusKind::Error, kind.failure_message(&e)),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

struct CaptureShared {
    running: Arc<AtomicBool>,
    captures: Arc<Mailbox<CapturedFrame>>,
    status: Arc<StatusBoard>,
}

fn spawn_capture_worker(
    mut source: Box<dyn FrameSource>,
    mut segmenter: Box<dyn Segmenter>,
    shared: CaptureShared,
    interval: Duration,
) -> DimensionsResult<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("dimensions-capture".to_owned())
        .spawn(move || {
            let mut last_failed = false;
            while shared.running.load(Ordering::SeqCst) {
                let step = source.next_frame().and_then(|video| {
                    let mask = segmenter.segment(&video)?;
                    Ok(CapturedFrame { video, mask })
                });
                match step {
                    Ok(capture) => {
                        shared.captures.publish(capture);
                        last_failed = false;
                    }
                    // Report a failure streak once.
                    Err(e) if !last_failed => {
                        tracing::warn!(error = %e, "capture failed");
                        shared.status.post(StatusKind::Error, status_message(&e));
                        last_failed = true;
                    }
                    Err(_) => {}
                }
                std::thread::sleep(interval);
            }
            tracing::debug!("capture worker exited");
        })
        .map_err(|e| DimensionsError::capture(format!("failed to spawn capture worker: {e}")))
}
