//! Dimensions renders a person, separated from the background by a segmentation mask, as an
//! animated grid of spreadsheet cells or as ASCII-style text art.
//!
//! # Pipeline overview
//!
//! 1. **Capture**: a [`FrameSource`] yields camera frames and a [`Segmenter`] turns each one into
//!    a [`ForegroundMask`]. A worker thread publishes the latest of both into [`Mailbox`]es.
//! 2. **Compose**: every tick the [`Animator`] advances its clocks and palette, then runs exactly
//!    one renderer (color cells, or text art when text is set) into a [`DisplayList`].
//! 3. **Rasterize**: [`CpuRasterizer`] turns the list into a premultiplied [`FrameRGBA`].
//! 4. **Export** (optional): frames are streamed to the system `ffmpeg` binary as WebM, or
//!    written as PNG screenshots.
//!
//! Live parameter changes, recording toggles and screenshots reach a running [`Session`] as
//! [`Control`] messages, applied at the start of the next tick.
#![forbid(unsafe_code)]

pub mod capture;
pub mod color;
pub mod config;
pub mod driver;
pub mod foundation;
pub mod frame;
pub mod grid;
pub mod mailbox;
pub mod mask;
pub mod palette;
pub mod params;
pub mod render;
pub mod session;
pub mod source;
pub mod status;
pub mod wave;

pub use capture::{
    ExportJob, ExportKind, FrameSink, InMemorySink, Recorder, SinkConfig, WebmCodec, WebmSink,
    WebmSinkOpts,
};
pub use color::{ColorValue, Hsl};
pub use config::{SegmenterConfig, SessionConfig, SourceConfig};
pub use driver::{
    AnimationClock, Animator, ComposedTick, Control, LoopReport, RenderMode, Scheduler,
    TickInputs, TickOutput,
};
pub use foundation::core::{Fps, FrameSize, Point, Rect, Rgba8};
pub use foundation::error::{DimensionsError, DimensionsResult};
pub use frame::VideoFrame;
pub use grid::{GridGeometry, SpreadsheetHeaders, column_label};
pub use mailbox::Mailbox;
pub use mask::{ForegroundMask, MaskSampler};
pub use palette::PaletteCursor;
pub use params::{ParamUpdate, RenderParams};
pub use render::cpu::CpuRasterizer;
pub use render::display_list::{DisplayList, DrawOp};
pub use render::text::TextLayoutEngine;
pub use render::{FrameRGBA, RenderStats};
pub use session::{CapturedFrame, Session};
pub use source::{
    AcquisitionFailure, FrameSource, ImageSequenceSource, MaskSequenceSegmenter, Segmenter,
    SilhouetteSegmenter, SyntheticSource,
};
pub use status::{Status, StatusBoard, StatusKind};
pub use wave::{WavePattern, WaveSample};
