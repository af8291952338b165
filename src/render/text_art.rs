//! Brightness-mapped ASCII art over the foreground silhouette.

use crate::color::Hsl;
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::frame::contrast_enhanced;
use crate::mask::MaskSampler;
use crate::render::display_list::{DisplayList, DrawOp, Paint, TextAlign, TextBaseline, TextRun};
use crate::render::text::TextMetrics;
use crate::render::{FrameInputs, RenderStats};

pub const DEFAULT_CHARS: [char; 8] = ['@', '#', '*', '+', '=', '-', ':', '.'];
pub const GLYPHS_PER_CELL: usize = 5;
const SATURATION: f64 = 85.0;

/// Glyph font size for a cell edge: `max(6, floor(cell * 0.3))`.
pub fn font_size_for_cell(cell_size: u32) -> f32 {
    (f64::from(cell_size) * 0.3).floor().max(6.0) as f32
}

/// Quantized brightness with a slow diagonal ripple.
pub fn density_level(contrast: f64, col: u32, row: u32, time: f64, wave_speed: f64) -> i64 {
    let ripple = (f64::from(col + row) * 0.1 + time * wave_speed * 50.0).sin() * 2.0;
    (contrast * 16.0 + ripple).floor() as i64
}

/// The five glyphs drawn in a cell at `density`. Brighter cells get sparser strings.
///
/// `chars` is the user text or [`DEFAULT_CHARS`]; an index past its end yields a space.
pub fn glyph_string(density: i64, chars: &[char], col: u32, row: u32) -> String {
    let pick = |i: usize| chars.get(i).copied().unwrap_or(' ');
    let len = chars.len();
    let diag = (col + row) as usize;

    (0..GLYPHS_PER_CELL)
        .map(|i| match density {
            14.. => {
                if i == 2 {
                    '.'
                } else {
                    ' '
                }
            }
            12..=13 => {
                if i % 2 == 0 {
                    ' '
                } else {
                    '.'
                }
            }
            10..=11 => [' ', '.', ' ', ':', ' '][i],
            8..=9 => {
                if i % 2 == 0 {
                    pick(len.wrapping_sub(1))
                } else {
                    '/'
                }
            }
            6..=7 => {
                if i == 2 {
                    pick(len / 2)
                } else {
                    ['/', '\\', '*', '/', '\\'][i]
                }
            }
            4..=5 => {
                if i % 2 == 0 {
                    pick(diag % len.max(1))
                } else {
                    '*'
                }
            }
            2..=3 => pick((diag + i) % len.saturating_sub(2).max(3)),
            _ => pick(i % len.clamp(1, 3)),
        })
        .collect()
}

/// Cell fill color: a rotating rainbow when `offset == 0`, otherwise a 120 degree band
/// starting at `offset`.
pub fn cell_color(
    spectrum_offset: u16,
    col: u32,
    cols: u32,
    time: f64,
    wave_speed: f64,
    contrast: f64,
) -> Hsl {
    let across = f64::from(col) / f64::from(cols);
    let hue = if spectrum_offset == 0 {
        let rotation = (time * wave_speed * 666.0).rem_euclid(360.0);
        (across * 360.0 + rotation).rem_euclid(360.0)
    } else {
        (f64::from(spectrum_offset) + across * 120.0).rem_euclid(360.0)
    };
    Hsl::new(hue, SATURATION, (30.0 + contrast * 40.0).min(70.0))
}

/// Paint the background and, when both a mask and a camera frame are available, one
/// colored glyph cell per foreground cell followed by the watermark.
pub fn render_text_art(
    inputs: &FrameInputs<'_>,
    metrics: &mut dyn TextMetrics,
) -> (DisplayList, RenderStats) {
    let grid = inputs.grid;
    let frame = grid.frame();
    let mut list = DisplayList::with_capacity(frame, 1);
    list.fill_background(inputs.params.background.to_rgba8());
    let mut stats = RenderStats::default();

    let (Some(mask), Some(video)) = (inputs.mask, inputs.video) else {
        return (list, stats);
    };

    let chars: Vec<char> = if inputs.params.user_text.is_empty() {
        DEFAULT_CHARS.to_vec()
    } else {
        inputs.params.user_text.chars().collect()
    };
    let sampler = MaskSampler::new(mask, *grid);
    let cell = f64::from(grid.cell_size());
    let font_size = font_size_for_cell(grid.cell_size());
    let wave_speed = inputs.params.wave_speed;

    for (col, row) in grid.cells() {
        stats.cells_evaluated += 1;
        if !sampler.is_foreground(col, row) {
            continue;
        }
        stats.foreground_cells += 1;

        let (sx, sy) = sampler.sample_point(col, row);
        let contrast = contrast_enhanced(video.pixel_at_canvas(frame, sx, sy));
        let density = density_level(contrast, col, row, inputs.time, wave_speed);
        let text = glyph_string(density, &chars, col, row);
        let fill = cell_color(
            inputs.params.spectrum_offset,
            col,
            grid.cols(),
            inputs.time,
            wave_speed,
            contrast,
        );

        let (x, y) = grid.cell_origin(col, row);
        list.push(DrawOp::FillRect {
            rect: Rect::from_origin_size((x + 1.0, y + 1.0), (cell - 2.0, cell - 2.0)),
            paint: Paint::Solid(fill.to_rgba8()),
        });
        list.push(DrawOp::Text(TextRun {
            text,
            origin: Point::new(x + 1.0, y + cell / 2.0 - f64::from(font_size) / 2.0),
            font_size,
            color: if contrast > 0.5 {
                Rgba8::BLACK
            } else {
                Rgba8::WHITE
            },
            align: TextAlign::Left,
            baseline: TextBaseline::Top,
            glow: None,
        }));
    }

    crate::render::watermark::push_watermark(&mut list, metrics);
    (list, stats)
}

#[cfg(test)]
#[path = "../../tests/unit/render/text_art.rs"]
mod tests;
