//! Animated gradient cells over the foreground silhouette.

use crate::color::Hsl;
use crate::foundation::core::{Point, Rect};
use crate::foundation::math::wrap_hue;
use crate::mask::MaskSampler;
use crate::render::display_list::{DisplayList, DrawOp, LinearGradient, Paint};
use crate::render::text::TextMetrics;
use crate::render::{FrameInputs, RenderStats};
use crate::wave::wave_at;

const CELL_RADIUS: f64 = 3.0;
const HIGHLIGHT_RADIUS: f64 = 2.0;
const HIGHLIGHT_ALPHA: f64 = 0.3;

/// Styling for one foreground cell, derived from the palette blend and the wave field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    /// Fraction of the cell edge covered by the tile, in `[0.96, 0.99]`.
    pub scale: f64,
}

impl CellStyle {
    pub fn new(base: Hsl, spectrum_offset: u16, wave: f64, wave2: f64) -> Self {
        Self {
            hue: wrap_hue(base.h + f64::from(spectrum_offset) + wave * 15.0 - 7.5),
            saturation: (base.s + wave2 * 8.0).min(100.0),
            lightness: (base.l + wave * 15.0 - 5.0).min(85.0),
            scale: 0.95 + wave * 0.05,
        }
    }

    fn shade(&self, dl: f64) -> Hsl {
        Hsl::new(self.hue, self.saturation, self.lightness + dl)
    }

    pub fn gradient_stops(&self) -> [Hsl; 3] {
        [self.shade(15.0), self.shade(0.0), self.shade(-10.0)]
    }

    pub fn border(&self) -> Hsl {
        Hsl::new(
            self.hue,
            (self.saturation + 10.0).min(100.0),
            (self.lightness + 25.0).min(90.0),
        )
    }

    pub fn highlight(&self) -> Hsl {
        Hsl::new(
            self.hue,
            self.saturation,
            (self.lightness + 30.0).min(95.0),
        )
    }
}

/// Paint the background and, when a mask is present and no text is set, one tile per
/// foreground cell followed by the watermark.
pub fn render_cells(
    inputs: &FrameInputs<'_>,
    metrics: &mut dyn TextMetrics,
) -> (DisplayList, RenderStats) {
    let grid = inputs.grid;
    let mut list = DisplayList::with_capacity(grid.frame(), 1);
    list.fill_background(inputs.params.background.to_rgba8());
    let mut stats = RenderStats::default();

    let Some(mask) = inputs.mask else {
        return (list, stats);
    };
    if inputs.params.text_mode() {
        return (list, stats);
    }

    let sampler = MaskSampler::new(mask, *grid);
    let base = inputs.palette.blend(inputs.color_time);
    let cell = f64::from(grid.cell_size());

    for (col, row) in grid.cells() {
        stats.cells_evaluated += 1;
        if !sampler.is_foreground(col, row) {
            continue;
        }
        stats.foreground_cells += 1;

        let w = wave_at(
            inputs.params.wave_pattern,
            col,
            row,
            grid.cols(),
            grid.rows(),
            inputs.time,
        );
        let style = CellStyle::new(base, inputs.params.spectrum_offset, w.wave, w.wave2);
        let (x, y) = grid.cell_origin(col, row);
        push_cell(&mut list, x, y, cell, &style);
    }

    crate::render::watermark::push_watermark(&mut list, metrics);
    (list, stats)
}

fn push_cell(list: &mut DisplayList, x: f64, y: f64, cell: f64, style: &CellStyle) {
    let scaled = cell * style.scale;
    let inset = (cell - scaled) / 2.0;

    let tile = Rect::from_origin_size(
        (x + inset + 1.0, y + inset + 1.0),
        (scaled - 2.0, scaled - 2.0),
    );
    let [top, mid, bottom] = style.gradient_stops();
    list.push(DrawOp::FillRoundedRect {
        rect: tile,
        radius: CELL_RADIUS,
        paint: Paint::LinearGradient(LinearGradient {
            start: Point::new(x, y),
            end: Point::new(x + scaled, y + scaled),
            stops: [
                (0.0, top.to_rgba8()),
                (0.5, mid.to_rgba8()),
                (1.0, bottom.to_rgba8()),
            ],
        }),
    });
    list.push(DrawOp::StrokeRoundedRect {
        rect: tile,
        radius: CELL_RADIUS,
        color: style.border().to_rgba8(),
        width: 2.0,
    });

    let highlight = Rect::from_origin_size(
        (x + inset + 3.0, y + inset + 3.0),
        (scaled - 6.0, scaled - 6.0),
    );
    list.push(DrawOp::StrokeRoundedRect {
        rect: highlight,
        radius: HIGHLIGHT_RADIUS,
        color: style.highlight().to_rgba8_alpha(HIGHLIGHT_ALPHA),
        width: 1.0,
    });
}

#[cfg(test)]
#[path = "../../tests/unit/render/cells.rs"]
mod tests;
