//! The looping color palette behind the cell renderer.

use crate::color::Hsl;
use crate::foundation::math::{fract, lerp};

/// Ordered palette stops, cycled by the color clock.
pub const PALETTE: [Hsl; 10] = [
    Hsl::new(280.0, 95.0, 65.0),  // purple
    Hsl::new(200.0, 100.0, 60.0), // cyan
    Hsl::new(330.0, 100.0, 65.0), // hot pink
    Hsl::new(160.0, 90.0, 60.0),  // lime
    Hsl::new(40.0, 100.0, 65.0),  // orange
    Hsl::new(260.0, 95.0, 70.0),  // violet
    Hsl::new(120.0, 85.0, 55.0),  // emerald
    Hsl::new(0.0, 90.0, 60.0),    // red
    Hsl::new(60.0, 95.0, 60.0),   // yellow
    Hsl::new(300.0, 90.0, 65.0),  // magenta
];

/// Position in [`PALETTE`].
///
/// `consumed_steps` counts whole units of the color clock already turned into index advances,
/// so each integer step of the clock moves the index exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaletteCursor {
    index: usize,
    consumed_steps: u64,
}

impl PaletteCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Hsl {
        PALETTE[self.index]
    }

    pub fn next(&self) -> Hsl {
        PALETTE[(self.index + 1) % PALETTE.len()]
    }

    /// Advance by at most one entry if the clock's integer part has moved past the steps
    /// already consumed. Returns whether the index changed.
    pub fn advance(&mut self, color_time: f64) -> bool {
        let whole = color_time.max(0.0).floor() as u64;
        if whole > self.consumed_steps {
            self.consumed_steps += 1;
            self.index = (self.index + 1) % PALETTE.len();
            true
        } else {
            false
        }
    }

    /// Current color blended toward the next one by `color_time mod 1`.
    pub fn blend(&self, color_time: f64) -> Hsl {
        let t = fract(color_time);
        let a = self.current();
        let b = self.next();
        Hsl::new(lerp(a.h, b.h, t), lerp(a.s, b.s, t), lerp(a.l, b.l, t))
    }
}

#[cfg(test)]
#[path = "../tests/unit/palette.rs"]
mod tests;
