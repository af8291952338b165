//! Live render parameters and the updates that mutate them.

use crate::color::ColorValue;
use crate::foundation::error::{DimensionsError, DimensionsResult};
use crate::wave::WavePattern;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CELL_SIZE: u32 = 20;
pub const DEFAULT_WAVE_SPEED: f64 = 0.015;
pub const MAX_SPECTRUM_OFFSET: u16 = 360;

/// Parameters read by the renderers every tick. Last write wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderParams {
    /// Cell edge length in pixels.
    pub cell_size: u32,
    pub background: ColorValue,
    /// `0` sweeps the full hue circle; `1..=360` anchors hues at that angle.
    pub spectrum_offset: u16,
    pub wave_pattern: WavePattern,
    /// Free-form text, stored uppercased. Non-empty switches to text-art mode.
    pub user_text: String,
    /// Animation clock increment per tick.
    pub wave_speed: f64,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            background: ColorValue::white(),
            spectrum_offset: 0,
            wave_pattern: WavePattern::Radial,
            user_text: String::new(),
            wave_speed: DEFAULT_WAVE_SPEED,
        }
    }
}

impl RenderParams {
    pub fn validate(&self) -> DimensionsResult<()> {
        if self.cell_size == 0 {
            return Err(DimensionsError::validation("cell_size must be >= 1"));
        }
        if self.spectrum_offset > MAX_SPECTRUM_OFFSET {
            return Err(DimensionsError::validation(format!(
                "spectrum_offset must be in 0..={MAX_SPECTRUM_OFFSET}"
            )));
        }
        if !self.wave_speed.is_finite() || self.wave_speed < 0.0 {
            return Err(DimensionsError::validation(
                "wave_speed must be finite and >= 0",
            ));
        }
        Ok(())
    }

    pub fn text_mode(&self) -> bool {
        !self.user_text.is_empty()
    }

    /// Apply one update. Returns `true` when the grid geometry must be regenerated.
    pub fn apply(&mut self, update: ParamUpdate) -> DimensionsResult<bool> {
        match update {
            ParamUpdate::CellSize(size) => {
                if size == 0 {
                    return Err(DimensionsError::validation("cell_size must be >= 1"));
                }
                let changed = size != self.cell_size;
                self.cell_size = size;
                Ok(changed)
            }
            ParamUpdate::Background(color) => {
                self.background = color;
                Ok(false)
            }
            ParamUpdate::SpectrumOffset(offset) => {
                if offset > MAX_SPECTRUM_OFFSET {
                    return Err(DimensionsError::validation(format!(
                        "spectrum_offset must be in 0..={MAX_SPECTRUM_OFFSET}"
                    )));
                }
                self.spectrum_offset = offset;
                Ok(false)
            }
            ParamUpdate::WavePattern(pattern) => {
                self.wave_pattern = pattern;
                Ok(false)
            }
            ParamUpdate::Text(text) => {
                self.user_text = text.to_uppercase();
                Ok(false)
            }
            ParamUpdate::ClearText => {
                self.user_text.clear();
                Ok(false)
            }
            ParamUpdate::WaveSpeed(speed) => {
                if !speed.is_finite() || speed < 0.0 {
                    return Err(DimensionsError::validation(
                        "wave_speed must be finite and >= 0",
                    ));
                }
                self.wave_speed = speed;
                Ok(false)
            }
        }
    }

    /// Human-readable spectrum label as shown next to the hue control.
    pub fn spectrum_label(&self) -> String {
        if self.spectrum_offset == 0 {
            "Rainbow".to_owned()
        } else {
            format!("{}°", self.spectrum_offset)
        }
    }
}

/// A single externally issued parameter change.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamUpdate {
    CellSize(u32),
    Background(ColorValue),
    SpectrumOffset(u16),
    WavePattern(WavePattern),
    Text(String),
    ClearText,
    WaveSpeed(f64),
}
