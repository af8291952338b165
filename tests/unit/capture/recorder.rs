use super::*;
use crate::capture::sink::InMemorySink;
use crate::foundation::core::{Fps, FrameSize};
use std::sync::Mutex;

fn cfg() -> SinkConfig {
    SinkConfig {
        size: FrameSize::new(4, 4).unwrap(),
        fps: Fps::new(RECORD_FPS, 1).unwrap(),
    }
}

fn frame() -> Arc<FrameRGBA> {
    Arc::new(FrameRGBA::transparent(FrameSize::new(4, 4).unwrap()))
}

struct FailingSink;

impl FrameSink for FailingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> DimensionsResult<()> {
        Ok(())
    }
    fn push_frame(&mut self, _idx: u64, _frame: &FrameRGBA) -> DimensionsResult<()> {
        Err(DimensionsError::capture("encoder rejected frame"))
    }
    fn end(&mut self) -> DimensionsResult<()> {
        Ok(())
    }
}

#[test]
fn interval_targets_thirty_fps() {
    assert_eq!(capture_interval(60.0, 30), 2);
    assert_eq!(capture_interval(30.0, 30), 1);
    assert_eq!(capture_interval(144.0, 30), 5);
    assert_eq!(capture_interval(20.0, 30), 1);
    assert_eq!(capture_interval(f64::NAN, 30), 1);
}

#[test]
fn elapsed_is_minutes_and_seconds() {
    assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00");
    assert_eq!(format_elapsed(Duration::from_secs(75)), "01:15");
    assert_eq!(format_elapsed(Duration::from_secs(3600)), "60:00");
}

#[test]
fn records_every_other_tick_at_sixty_fps() {
    let sink = Arc::new(Mutex::new(InMemorySink::new()));
    let mut rec = Recorder::new(60.0).with_queue_capacity(64);
    rec.start(Arc::clone(&sink), cfg(), PathBuf::from("mem.webm"))
        .unwrap();
    assert!(rec.is_recording());
    assert!(rec.elapsed_label().is_some());
    assert!(rec.start(InMemorySink::new(), cfg(), PathBuf::new()).is_err());

    let f = frame();
    for _ in 0..10 {
        rec.on_tick(&f);
    }
    let stats = rec.stats().unwrap();
    assert_eq!(stats.ticks_seen, 10);
    assert_eq!(stats.frames_queued + stats.frames_dropped, 5);

    let mut job = rec.stop().unwrap();
    assert!(!rec.is_recording());
    assert_eq!(job.kind(), ExportKind::Recording);
    assert_eq!(job.wait().unwrap().unwrap(), PathBuf::from("mem.webm"));

    let sink = sink.lock().unwrap();
    assert!(sink.ended());
    assert_eq!(sink.frames().len() as u64, stats.frames_queued);
    let indices: Vec<u64> = sink.frames().iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, (0..stats.frames_queued).collect::<Vec<_>>());
}

#[test]
fn full_queue_drops_instead_of_blocking() {
    struct SlowSink(std::sync::mpsc::Receiver<()>);
    impl FrameSink for SlowSink {
        fn begin(&mut self, _cfg: SinkConfig) -> DimensionsResult<()> {
            Ok(())
        }
        fn push_frame(&mut self, _idx: u64, _frame: &FrameRGBA) -> DimensionsResult<()> {
            let _ = self.0.recv();
            Ok(())
        }
        fn end(&mut self) -> DimensionsResult<()> {
            Ok(())
        }
    }

    let (release_tx, release_rx) = std::sync::mpsc::channel();
    let mut rec = Recorder::new(30.0).with_queue_capacity(1);
    rec.start(SlowSink(release_rx), cfg(), PathBuf::from("slow.webm"))
        .unwrap();
    let f = frame();
    for _ in 0..20 {
        rec.on_tick(&f);
    }
    let stats = rec.stats().unwrap();
    assert!(stats.frames_dropped > 0);
    assert!(stats.frames_queued <= 2);

    drop(release_tx);
    let mut job = rec.stop().unwrap();
    assert!(job.wait().unwrap().is_ok());
}

#[test]
fn encoder_failure_surfaces_when_finalized() {
    let mut rec = Recorder::new(30.0);
    rec.start(FailingSink, cfg(), PathBuf::from("bad.webm")).unwrap();
    rec.on_tick(&frame());
    let mut job = rec.stop().unwrap();
    let err = job.wait().unwrap().unwrap_err();
    assert!(ExportKind::Recording
        .failure_message(&err)
        .starts_with("Recording failed: "));
}

#[test]
fn sink_that_cannot_open_fails_start() {
    struct NoEncoder;
    impl FrameSink for NoEncoder {
        fn begin(&mut self, _cfg: SinkConfig) -> DimensionsResult<()> {
            Err(DimensionsError::capture("ffmpeg not found"))
        }
        fn push_frame(&mut self, _idx: u64, _frame: &FrameRGBA) -> DimensionsResult<()> {
            Ok(())
        }
        fn end(&mut self) -> DimensionsResult<()> {
            Ok(())
        }
    }

    let mut rec = Recorder::new(30.0);
    let err = rec
        .start(NoEncoder, cfg(), PathBuf::from("none.webm"))
        .unwrap_err();
    assert!(matches!(err, DimensionsError::Capture(_)));
    assert!(!rec.is_recording());
    assert!(rec.on_tick(&frame()).is_none());
}

#[test]
fn encoder_exit_ends_the_recording_on_the_next_tick() {
    struct CrashingSink;
    impl FrameSink for CrashingSink {
        fn begin(&mut self, _cfg: SinkConfig) -> DimensionsResult<()> {
            Ok(())
        }
        fn push_frame(&mut self, _idx: u64, _frame: &FrameRGBA) -> DimensionsResult<()> {
            panic!("encoder crashed");
        }
        fn end(&mut self) -> DimensionsResult<()> {
            Ok(())
        }
    }

    let mut rec = Recorder::new(30.0);
    rec.start(CrashingSink, cfg(), PathBuf::from("crash.webm"))
        .unwrap();
    let f = frame();
    let mut job = None;
    for _ in 0..400 {
        job = rec.on_tick(&f);
        if job.is_some() {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }

    let mut job = job.expect("encoder exit should end the recording");
    assert!(!rec.is_recording());
    assert_eq!(job.kind(), ExportKind::Recording);
    assert!(job.wait().unwrap().is_err());
}

#[test]
fn stop_without_recording_is_none() {
    assert!(Recorder::new(60.0).stop().is_none());
}
