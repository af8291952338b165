use super::*;
use crate::foundation::core::FrameSize;
use crate::grid::GridGeometry;
use crate::mask::ForegroundMask;
use crate::palette::PaletteCursor;
use crate::params::RenderParams;
use crate::render::text::MonospaceMetrics;

fn inputs<'a>(
    grid: &'a GridGeometry,
    params: &'a RenderParams,
    palette: &'a PaletteCursor,
    mask: Option<&'a ForegroundMask>,
) -> FrameInputs<'a> {
    FrameInputs {
        grid,
        params,
        time: 1.0,
        color_time: 0.25,
        palette,
        mask,
        video: None,
    }
}

#[test]
fn style_follows_palette_and_wave() {
    let style = CellStyle::new(Hsl::new(280.0, 95.0, 65.0), 0, 0.5, 0.5);
    assert!((style.hue - 280.0).abs() < 1e-9);
    assert!((style.saturation - 99.0).abs() < 1e-9);
    assert!((style.lightness - 67.5).abs() < 1e-9);
    assert!((style.scale - 0.975).abs() < 1e-9);
}

#[test]
fn style_clamps_and_wraps() {
    let style = CellStyle::new(Hsl::new(350.0, 100.0, 80.0), 20, 0.8, 0.7);
    assert!((style.hue - 14.5).abs() < 1e-9);
    assert_eq!(style.saturation, 100.0);
    assert_eq!(style.lightness, 85.0);
    assert_eq!(style.border().l, 90.0);
    assert_eq!(style.highlight().l, 95.0);
    let [top, mid, bottom] = style.gradient_stops();
    assert_eq!((top.l, mid.l, bottom.l), (100.0, 85.0, 75.0));
}

#[test]
fn no_mask_paints_background_only() {
    let frame = FrameSize::new(80, 40).unwrap();
    let grid = GridGeometry::new(frame, 20).unwrap();
    let params = RenderParams::default();
    let palette = PaletteCursor::new();
    let (list, stats) =
        render_cells(&inputs(&grid, &params, &palette, None), &mut MonospaceMetrics);
    assert_eq!(list.len(), 1);
    assert_eq!(stats, RenderStats::default());
}

#[test]
fn text_mode_suppresses_cells() {
    let frame = FrameSize::new(80, 40).unwrap();
    let grid = GridGeometry::new(frame, 20).unwrap();
    let params = RenderParams {
        user_text: "HI".into(),
        ..RenderParams::default()
    };
    let palette = PaletteCursor::new();
    let mask = ForegroundMask::filled(frame, 255);
    let (list, _) = render_cells(
        &inputs(&grid, &params, &palette, Some(&mask)),
        &mut MonospaceMetrics,
    );
    assert_eq!(list.len(), 1);
}

#[test]
fn each_foreground_cell_emits_three_ops_then_watermark() {
    let frame = FrameSize::new(80, 40).unwrap();
    let grid = GridGeometry::new(frame, 20).unwrap();
    let params = RenderParams::default();
    let palette = PaletteCursor::new();
    let mut conf = vec![0u8; frame.pixel_count()];
    // Foreground only under the center of cell (1, 0).
    conf[10 * 80 + 30] = 255;
    let mask = ForegroundMask::from_confidence(frame, conf).unwrap();
    let (list, stats) = render_cells(
        &inputs(&grid, &params, &palette, Some(&mask)),
        &mut MonospaceMetrics,
    );
    assert_eq!(stats.cells_evaluated, 8);
    assert_eq!(stats.foreground_cells, 1);
    // background + 3 cell ops + 4 watermark ops
    assert_eq!(list.len(), 8);
    let DrawOp::FillRoundedRect { rect, radius, .. } = &list.ops()[1] else {
        panic!("expected the cell tile");
    };
    assert_eq!(*radius, CELL_RADIUS);
    assert!(rect.x0 > 20.0 && rect.x1 < 40.0);
}
