//! Recording and still export of rendered frames.

pub mod export;
pub mod ffmpeg;
pub mod naming;
pub mod recorder;
pub mod sink;

pub use export::{ExportJob, ExportKind};
pub use ffmpeg::{WebmCodec, WebmSink, WebmSinkOpts};
pub use recorder::Recorder;
pub use sink::{FrameSink, InMemorySink, SinkConfig};
