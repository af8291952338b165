use crate::foundation::core::{FrameSize, Point, Rect, Rgba8};
use crate::foundation::error::{DimensionsError, DimensionsResult};
use crate::render::FrameRGBA;
use crate::render::display_list::{DisplayList, DrawOp, Paint, TextAlign, TextBaseline, TextRun};
use crate::render::text::{TextLayoutEngine, TextMetrics};

const PATH_TOLERANCE: f64 = 0.1;

/// `vello_cpu` rasterizer for [`DisplayList`]s.
///
/// Ops are drawn in order into one render context. A text run with a glow splits the list: the
/// ops before it are flushed, the blurred glow layer is composited on top, and drawing resumes.
#[derive(Debug)]
pub struct CpuRasterizer {
    text: TextLayoutEngine,
    warned_no_font: bool,
}

impl CpuRasterizer {
    pub fn new(text: TextLayoutEngine) -> Self {
        Self {
            text,
            warned_no_font: false,
        }
    }

    pub fn text_engine(&self) -> &TextLayoutEngine {
        &self.text
    }

    pub fn metrics(&mut self) -> &mut dyn TextMetrics {
        &mut self.text
    }

    pub fn render(&mut self, list: &DisplayList) -> DimensionsResult<FrameRGBA> {
        let size = list.size();
        let (w, h) = pixmap_dims(size)?;
        let mut acc = vello_cpu::Pixmap::new(w, h);
        let mut acc_is_empty = true;

        let mut batch_start = 0;
        for (i, op) in list.ops().iter().enumerate() {
            let DrawOp::Text(run) = op else {
                continue;
            };
            let Some(glow) = run.glow else {
                continue;
            };
            self.flush_batch(&list.ops()[batch_start..i], &mut acc, &mut acc_is_empty)?;
            batch_start = i;

            let mut glow_run = run.clone();
            glow_run.color = glow.color;
            glow_run.glow = None;
            let mut layer = vello_cpu::Pixmap::new(w, h);
            self.draw_ops(std::slice::from_ref(&DrawOp::Text(glow_run)), &mut layer)?;
            let (radius, sigma) = crate::render::blur::glow_kernel_params(glow.blur_px);
            let blurred = crate::render::blur::blur_rgba8_premul(
                layer.data_as_u8_slice(),
                u32::from(w),
                u32::from(h),
                radius,
                sigma,
            )?;
            crate::render::composite::over_in_place(acc.data_as_u8_slice_mut(), &blurred, 1.0)?;
            acc_is_empty = false;
        }
        self.flush_batch(&list.ops()[batch_start..], &mut acc, &mut acc_is_empty)?;

        Ok(FrameRGBA {
            width: size.width,
            height: size.height,
            data: acc.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn flush_batch(
        &mut self,
        ops: &[DrawOp],
        acc: &mut vello_cpu::Pixmap,
        acc_is_empty: &mut bool,
    ) -> DimensionsResult<()> {
        if ops.is_empty() {
            return Ok(());
        }
        if *acc_is_empty {
            self.draw_ops(ops, acc)?;
            *acc_is_empty = false;
            return Ok(());
        }
        // render_to_pixmap overwrites its target, so later batches go through a scratch layer.
        let mut layer = vello_cpu::Pixmap::new(acc.width(), acc.height());
        self.draw_ops(ops, &mut layer)?;
        crate::render::composite::over_in_place(
            acc.data_as_u8_slice_mut(),
            layer.data_as_u8_slice(),
            1.0,
        )
    }

    fn draw_ops(&mut self, ops: &[DrawOp], target: &mut vello_cpu::Pixmap) -> DimensionsResult<()> {
        let mut ctx = vello_cpu::RenderContext::new(target.width(), target.height());
        for op in ops {
            self.draw_op(&mut ctx, op)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(target);
        Ok(())
    }

    fn draw_op(&mut self, ctx: &mut vello_cpu::RenderContext, op: &DrawOp) -> DimensionsResult<()> {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::FillRect { rect, paint } => {
                set_fill_paint(ctx, paint);
                ctx.fill_rect(&rect_to_cpu(*rect));
            }
            DrawOp::FillRoundedRect {
                rect,
                radius,
                paint,
            } => {
                set_fill_paint(ctx, paint);
                ctx.fill_path(&rounded_rect_path(*rect, *radius));
            }
            DrawOp::StrokeRect { rect, color, width } => {
                ctx.set_paint(color_to_cpu(*color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_rect(&rect_to_cpu(*rect));
            }
            DrawOp::StrokeRoundedRect {
                rect,
                radius,
                color,
                width,
            } => {
                ctx.set_paint(color_to_cpu(*color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_path(&rounded_rect_path(*rect, *radius));
            }
            DrawOp::Line {
                from,
                to,
                color,
                width,
            } => {
                let mut path = vello_cpu::kurbo::BezPath::new();
                path.move_to(point_to_cpu(*from));
                path.line_to(point_to_cpu(*to));
                ctx.set_paint(color_to_cpu(*color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_path(&path);
            }
            DrawOp::Text(run) => self.draw_text(ctx, run)?,
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        run: &TextRun,
    ) -> DimensionsResult<()> {
        let Some(font) = self.text.font_data().cloned() else {
            if !self.warned_no_font {
                tracing::warn!("no font loaded; skipping text runs");
                self.warned_no_font = true;
            }
            return Ok(());
        };
        let Some(layout) = self.text.layout(&run.text, run.font_size)? else {
            return Ok(());
        };

        let dx = match run.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => f64::from(layout.width()) / 2.0,
        };
        let dy = match run.baseline {
            TextBaseline::Top => 0.0,
            TextBaseline::Middle => f64::from(layout.height()) / 2.0,
        };
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            run.origin.x - dx,
            run.origin.y - dy,
        )));
        ctx.set_paint(color_to_cpu(run.color));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let glyphs = glyph_run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(glyph_run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

fn pixmap_dims(size: FrameSize) -> DimensionsResult<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| DimensionsError::validation("frame width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| DimensionsError::validation("frame height exceeds u16"))?;
    Ok((w, h))
}

fn set_fill_paint(ctx: &mut vello_cpu::RenderContext, paint: &Paint) {
    match paint {
        Paint::Solid(c) => ctx.set_paint(color_to_cpu(*c)),
        Paint::LinearGradient(g) => {
            let stops = g.stops.map(|(offset, c)| (offset, color_to_cpu(c)));
            let gradient =
                vello_cpu::peniko::Gradient::new_linear(point_to_cpu(g.start), point_to_cpu(g.end))
                    .with_stops(stops);
            ctx.set_paint(gradient);
        }
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn rounded_rect_path(r: Rect, radius: f64) -> vello_cpu::kurbo::BezPath {
    use vello_cpu::kurbo::Shape as _;

    let radius = radius.min(r.width().abs() / 2.0).min(r.height().abs() / 2.0).max(0.0);
    vello_cpu::kurbo::RoundedRect::new(r.x0, r.y0, r.x1, r.y1, radius).to_path(PATH_TOLERANCE)
}
