//! Spatial wave field that modulates per-cell color and scale over time.

use serde::{Deserialize, Serialize};

/// Selectable spatial wave functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WavePattern {
    /// Rings expanding from the grid center.
    #[default]
    Radial,
    Horizontal,
    Vertical,
    /// Oblique interference of the two diagonals.
    Sinusoidal,
    /// Per-cell pseudo-random phase, deterministic in position and time.
    Random,
}

impl WavePattern {
    pub const ALL: [Self; 5] = [
        Self::Radial,
        Self::Horizontal,
        Self::Vertical,
        Self::Sinusoidal,
        Self::Random,
    ];

    /// Exact (case-insensitive) lookup by selector name.
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Parse a selector name. Unknown names fall back to [`WavePattern::Radial`].
    pub fn from_name(name: &str) -> Self {
        Self::lookup(name).unwrap_or_else(|| {
            tracing::debug!(pattern = name, "unknown wave pattern, using radial");
            Self::Radial
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Radial => "radial",
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Sinusoidal => "sinusoidal",
            Self::Random => "random",
        }
    }
}

impl std::fmt::Display for WavePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The two oscillation signals of a cell. `wave` spans `[0.2, 0.8]`, `wave2` spans `[0.3, 0.7]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSample {
    pub wave: f64,
    pub wave2: f64,
}

/// Evaluate the wave field for one cell.
pub fn wave_at(
    pattern: WavePattern,
    col: u32,
    row: u32,
    cols: u32,
    rows: u32,
    time: f64,
) -> WaveSample {
    let c = f64::from(col);
    let r = f64::from(row);

    match pattern {
        WavePattern::Horizontal => WaveSample {
            wave: (c * 0.3 - time * 2.0).sin() * 0.3 + 0.5,
            wave2: (c * 0.2 + time * 1.5).cos() * 0.2 + 0.5,
        },
        WavePattern::Vertical => WaveSample {
            wave: (r * 0.3 - time * 2.0).sin() * 0.3 + 0.5,
            wave2: (r * 0.2 + time * 1.5).cos() * 0.2 + 0.5,
        },
        WavePattern::Sinusoidal => WaveSample {
            wave: ((c + r) * 0.2 - time * 2.0).sin() * 0.3 + 0.5,
            wave2: ((c - r) * 0.15 + time * 1.5).cos() * 0.2 + 0.5,
        },
        WavePattern::Random => {
            let seed = c * 12.9898 + r * 78.233;
            let random = (seed + time * 2.0).sin() * 0.5 + 0.5;
            WaveSample {
                wave: random * 0.6 + 0.2,
                wave2: (seed * 1.5 + time * 1.5).cos() * 0.2 + 0.5,
            }
        }
        WavePattern::Radial => {
            let dx = c - f64::from(cols) / 2.0;
            let dy = r - f64::from(rows) / 2.0;
            let distance = (dx * dx + dy * dy).sqrt();
            WaveSample {
                wave: (distance * 0.15 - time * 2.0).sin() * 0.3 + 0.5,
                wave2: (distance * 0.1 + time * 1.5).cos() * 0.2 + 0.5,
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/wave.rs"]
mod tests;
