use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::capture::sink::{FrameSink, SinkConfig};
use crate::foundation::error::{DimensionsError, DimensionsResult};
use crate::render::FrameRGBA;

/// WebM video codec, in order of preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebmCodec {
    Vp9,
    Vp8,
    /// Whatever ffmpeg picks for `.webm`.
    Default,
}

impl WebmCodec {
    /// Pick the best codec listed in `ffmpeg -encoders` output.
    pub fn choose(encoders_listing: &str) -> Self {
        let has = |name: &str| {
            encoders_listing
                .lines()
                .any(|line| line.split_whitespace().nth(1) == Some(name))
        };
        if has("libvpx-vp9") {
            Self::Vp9
        } else if has("libvpx") {
            Self::Vp8
        } else {
            Self::Default
        }
    }

    /// Ask the installed ffmpeg which encoders it has.
    pub fn probe() -> Self {
        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();
        match output {
            Ok(out) if out.status.success() => {
                let codec = Self::choose(&String::from_utf8_lossy(&out.stdout));
                tracing::debug!(?codec, "probed webm codec");
                codec
            }
            _ => Self::Default,
        }
    }

    fn encoder_args(self) -> &'static [&'static str] {
        match self {
            Self::Vp9 => &[
                "-c:v",
                "libvpx-vp9",
                "-deadline",
                "realtime",
                "-b:v",
                "0",
                "-crf",
                "32",
            ],
            Self::Vp8 => &["-c:v", "libvpx", "-deadline", "realtime", "-b:v", "2M"],
            Self::Default => &[],
        }
    }
}

#[derive(Clone, Debug)]
pub struct WebmSinkOpts {
    pub out_path: PathBuf,
    pub codec: WebmCodec,
    /// Color used to flatten any transparency (straight RGB).
    pub bg_rgb: [u8; 3],
}

impl WebmSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>, codec: WebmCodec) -> Self {
        Self {
            out_path: out_path.into(),
            codec,
            bg_rgb: [0, 0, 0],
        }
    }
}

/// Streams raw frames into a system `ffmpeg` producing WebM.
pub struct WebmSink {
    opts: WebmSinkOpts,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    cfg: Option<SinkConfig>,
    last_idx: Option<u64>,
}

impl WebmSink {
    pub fn new(opts: WebmSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }

    fn build_command(&self, cfg: SinkConfig) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.size.width, cfg.size.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
            // yuv420p needs even dimensions.
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-pix_fmt",
            "yuv420p",
        ]);
        cmd.args(self.opts.codec.encoder_args());
        cmd.args(["-f", "webm"]).arg(&self.opts.out_path);
        cmd
    }
}

impl FrameSink for WebmSink {
    fn begin(&mut self, cfg: SinkConfig) -> DimensionsResult<()> {
        ensure_parent_dir(&self.opts.out_path)?;
        if !is_ffmpeg_on_path() {
            return Err(DimensionsError::capture(
                "ffmpeg is required for recording, but was not found on PATH",
            ));
        }

        let mut child = self.build_command(cfg).spawn().map_err(|e| {
            DimensionsError::capture(format!("failed to spawn ffmpeg: {e}"))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DimensionsError::capture("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| DimensionsError::capture("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        tracing::info!(
            out = %self.opts.out_path.display(),
            codec = ?self.opts.codec,
            size = %cfg.size,
            "ffmpeg recording started"
        );
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> DimensionsResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| DimensionsError::capture("webm sink not started"))?;
        if self.last_idx.is_some_and(|last| idx <= last) {
            return Err(DimensionsError::capture(
                "webm sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);
        if frame.width != cfg.size.width || frame.height != cfg.size.height {
            return Err(DimensionsError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}",
                frame.width, frame.height, cfg.size
            )));
        }

        let opaque = frame.to_opaque_rgba8(self.opts.bg_rgb);
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(DimensionsError::capture("webm sink is already finalized"));
        };
        use std::io::Write as _;
        stdin.write_all(&opaque).map_err(|e| {
            DimensionsError::capture(format!("failed to write frame to ffmpeg: {e}"))
        })
    }

    fn end(&mut self) -> DimensionsResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| DimensionsError::capture("webm sink not started"))?;
        let status = child
            .wait()
            .map_err(|e| DimensionsError::capture(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| DimensionsError::capture("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| DimensionsError::capture(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        if !status.success() {
            return Err(DimensionsError::capture(format!(
                "ffmpeg exited with status {status}: {}",
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        self.cfg = None;
        Ok(())
    }
}

impl Drop for WebmSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> DimensionsResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
