//! Bottom-right credit badge drawn on top of both visualizations.

use crate::foundation::core::{Point, Rect, Rgba8};
use crate::render::display_list::{
    DisplayList, DrawOp, Glow, LinearGradient, Paint, TextAlign, TextBaseline, TextRun,
};
use crate::render::text::TextMetrics;

pub const WATERMARK_TEXT: &str = "DIMENSIONS BY LIVIA ELLEN";
pub const WATERMARK_FONT_SIZE: f32 = 10.0;
const PADDING: f64 = 12.0;
const MARGIN: f64 = 10.0;
const GLOW_BLUR_PX: f32 = 8.0;

const TERMINAL_GREEN: Rgba8 = Rgba8::rgb(0, 255, 0);

/// Badge rectangle for a frame, sized from the measured text advance.
pub fn watermark_rect(frame_width: f64, frame_height: f64, text_advance: f64) -> Rect {
    let w = text_advance + PADDING * 2.0;
    let h = f64::from(WATERMARK_FONT_SIZE) + PADDING * 2.0;
    Rect::from_origin_size((frame_width - w - MARGIN, frame_height - h - MARGIN), (w, h))
}

pub fn push_watermark(list: &mut DisplayList, metrics: &mut dyn TextMetrics) {
    let frame = list.size();
    let advance = metrics.advance(WATERMARK_TEXT, WATERMARK_FONT_SIZE);
    let rect = watermark_rect(f64::from(frame.width), f64::from(frame.height), advance);

    let top = Rgba8::with_alpha_f(0, 17, 0, 0.9);
    let bottom = Rgba8::with_alpha_f(0, 0, 0, 0.9);
    list.push(DrawOp::FillRect {
        rect,
        paint: Paint::LinearGradient(LinearGradient {
            start: Point::new(rect.x0, rect.y0),
            end: Point::new(rect.x0, rect.y1),
            stops: [
                (0.0, top),
                (0.5, Rgba8::with_alpha_f(0, 9, 0, 0.9)),
                (1.0, bottom),
            ],
        }),
    });
    list.push(DrawOp::StrokeRect {
        rect,
        color: TERMINAL_GREEN,
        width: 2.0,
    });
    list.push(DrawOp::StrokeRect {
        rect: rect.inset(-2.0),
        color: Rgba8::with_alpha_f(0, 255, 0, 0.5),
        width: 1.0,
    });
    list.push(DrawOp::Text(TextRun {
        text: WATERMARK_TEXT.to_owned(),
        origin: rect.center(),
        font_size: WATERMARK_FONT_SIZE,
        color: TERMINAL_GREEN,
        align: TextAlign::Center,
        baseline: TextBaseline::Middle,
        glow: Some(Glow {
            color: TERMINAL_GREEN,
            blur_px: GLOW_BLUR_PX,
        }),
    }));
}
