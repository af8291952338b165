//! Session configuration file and environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Fps, FrameSize};
use crate::foundation::error::{DimensionsError, DimensionsResult};
use crate::params::RenderParams;
use crate::source::{
    FrameSource, ImageSequenceSource, MaskSequenceSegmenter, Segmenter, SilhouetteSegmenter,
    SyntheticSource,
};

pub const ENV_FONT: &str = "DIMENSIONS_FONT";
pub const ENV_EXPORT_DIR: &str = "DIMENSIONS_EXPORT_DIR";

/// Where camera frames come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum SourceConfig {
    Synthetic { width: u32, height: u32 },
    Images { path: PathBuf },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Synthetic {
            width: 1280,
            height: 720,
        }
    }
}

impl SourceConfig {
    pub fn build(&self) -> DimensionsResult<Box<dyn FrameSource>> {
        Ok(match self {
            Self::Synthetic { width, height } => {
                Box::new(SyntheticSource::new(FrameSize::new(*width, *height)?))
            }
            Self::Images { path } => Box::new(ImageSequenceSource::new(path.clone())),
        })
    }
}

/// Where foreground masks come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum SegmenterConfig {
    Silhouette {
        #[serde(default)]
        sway: bool,
    },
    Masks {
        path: PathBuf,
    },
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self::Silhouette { sway: true }
    }
}

impl SegmenterConfig {
    pub fn build(&self) -> Box<dyn Segmenter> {
        match self {
            Self::Silhouette { sway: true } => Box::new(SilhouetteSegmenter::new().swaying()),
            Self::Silhouette { sway: false } => Box::new(SilhouetteSegmenter::new()),
            Self::Masks { path } => Box::new(MaskSequenceSegmenter::new(path.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub render: RenderParams,
    /// Tick rate of the render loop.
    pub fps: u32,
    /// Frame rate of recordings.
    pub record_fps: u32,
    /// Pace of the capture worker.
    pub capture_fps: u32,
    pub source: SourceConfig,
    pub segmenter: SegmenterConfig,
    /// Monospace font for text. Discovered from system paths when unset.
    pub font: Option<PathBuf>,
    pub export_dir: PathBuf,
    /// Composite the grid lines into the presented frame.
    pub grid_overlay: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            render: RenderParams::default(),
            fps: 60,
            record_fps: crate::capture::recorder::RECORD_FPS,
            capture_fps: 30,
            source: SourceConfig::default(),
            segmenter: SegmenterConfig::default(),
            font: None,
            export_dir: PathBuf::from("."),
            grid_overlay: true,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(s: &str) -> DimensionsResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| DimensionsError::validation(format!("invalid session config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> DimensionsResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            DimensionsError::validation(format!("read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> DimensionsResult<()> {
        self.render.validate()?;
        for (name, v) in [
            ("fps", self.fps),
            ("record_fps", self.record_fps),
            ("capture_fps", self.capture_fps),
        ] {
            if v == 0 {
                return Err(DimensionsError::validation(format!("{name} must be >= 1")));
            }
        }
        if let SourceConfig::Synthetic { width, height } = self.source {
            FrameSize::new(width, height)?;
        }
        Ok(())
    }

    pub fn tick_fps(&self) -> DimensionsResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Override the font path and export directory from `lookup(name)`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(font) = lookup(ENV_FONT).filter(|v| !v.trim().is_empty()) {
            self.font = Some(PathBuf::from(font));
        }
        if let Some(dir) = lookup(ENV_EXPORT_DIR).filter(|v| !v.trim().is_empty()) {
            self.export_dir = PathBuf::from(dir);
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_env_overrides(|name| std::env::var(name).ok());
    }
}
