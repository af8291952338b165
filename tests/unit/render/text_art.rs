use super::*;
use crate::foundation::core::FrameSize;
use crate::frame::VideoFrame;
use crate::grid::GridGeometry;
use crate::mask::ForegroundMask;
use crate::palette::PaletteCursor;
use crate::params::RenderParams;
use crate::render::text::MonospaceMetrics;

#[test]
fn brightest_density_is_a_lone_dot() {
    assert_eq!(glyph_string(15, &DEFAULT_CHARS, 3, 4), "  .  ");
    assert_eq!(glyph_string(14, &DEFAULT_CHARS, 0, 0), "  .  ");
    assert_eq!(glyph_string(12, &DEFAULT_CHARS, 0, 0), " . . ");
    assert_eq!(glyph_string(10, &DEFAULT_CHARS, 0, 0), " . : ");
}

#[test]
fn darkest_density_cycles_the_first_three_chars() {
    let s = glyph_string(1, &DEFAULT_CHARS, 5, 7);
    assert_eq!(s, "@#*@#");
    assert!(s.chars().all(|c| "@#*".contains(c)));
    assert_eq!(glyph_string(-3, &DEFAULT_CHARS, 0, 0), "@#*@#");
}

#[test]
fn mid_densities_mix_user_chars_and_strokes() {
    let chars: Vec<char> = "HELLO".chars().collect();
    assert_eq!(glyph_string(8, &chars, 0, 0), "O/O/O");
    assert_eq!(glyph_string(6, &chars, 0, 0), "/\\L/\\");
    assert_eq!(glyph_string(4, &chars, 1, 1), "L*L*L");
    // (col + row + i) mod max(3, 5 - 2)
    assert_eq!(glyph_string(2, &chars, 0, 0), "HELHE");
}

#[test]
fn short_user_text_pads_with_spaces() {
    let chars = ['A'];
    assert_eq!(glyph_string(2, &chars, 0, 0), "A  A ");
    assert_eq!(glyph_string(0, &chars, 0, 0), "AAAAA");
}

#[test]
fn font_size_has_a_floor_of_six() {
    assert_eq!(font_size_for_cell(10), 6.0);
    assert_eq!(font_size_for_cell(20), 6.0);
    assert_eq!(font_size_for_cell(40), 12.0);
}

#[test]
fn rainbow_and_band_hues() {
    let c = cell_color(0, 0, 10, 0.0, 0.015, 1.0);
    assert_eq!(c.h, 0.0);
    assert_eq!(c.l, 70.0);
    assert_eq!(c.s, 85.0);
    let c = cell_color(200, 5, 10, 3.0, 0.015, 0.0);
    assert!((c.h - 260.0).abs() < 1e-9);
    assert_eq!(c.l, 30.0);
}

#[test]
fn needs_both_mask_and_video() {
    let frame = FrameSize::new(40, 40).unwrap();
    let grid = GridGeometry::new(frame, 20).unwrap();
    let params = RenderParams::default();
    let palette = PaletteCursor::new();
    let mask = ForegroundMask::filled(frame, 255);
    let inputs = FrameInputs {
        grid: &grid,
        params: &params,
        time: 0.0,
        color_time: 0.0,
        palette: &palette,
        mask: Some(&mask),
        video: None,
    };
    let (list, stats) = render_text_art(&inputs, &mut MonospaceMetrics);
    assert_eq!(list.len(), 1);
    assert_eq!(stats.cells_evaluated, 0);
}

#[test]
fn dark_frame_draws_white_glyphs_on_filled_cells() {
    let frame = FrameSize::new(40, 20).unwrap();
    let grid = GridGeometry::new(frame, 20).unwrap();
    let params = RenderParams {
        user_text: "OK".into(),
        ..RenderParams::default()
    };
    let palette = PaletteCursor::new();
    let mask = ForegroundMask::filled(frame, 255);
    let video = VideoFrame::filled(FrameSize::new(4, 2).unwrap(), Rgba8::BLACK);
    let inputs = FrameInputs {
        grid: &grid,
        params: &params,
        time: 0.0,
        color_time: 0.0,
        palette: &palette,
        mask: Some(&mask),
        video: Some(&video),
    };
    let (list, stats) = render_text_art(&inputs, &mut MonospaceMetrics);
    assert_eq!(stats.foreground_cells, 2);
    // background + 2 * (fill + text) + watermark
    assert_eq!(list.len(), 1 + 4 + 4);
    let runs: Vec<_> = list.text_runs().collect();
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0].color, Rgba8::WHITE);
    assert_eq!(runs[0].baseline, TextBaseline::Top);
    assert_eq!(runs[0].origin, Point::new(1.0, 7.0));
    assert_eq!(runs[0].text.chars().count(), GLYPHS_PER_CELL);
}
