use crate::foundation::core::{FrameSize, Point, Rect, Rgba8};

/// Fill paint for rects and rounded rects.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba8),
    LinearGradient(LinearGradient),
}

/// Linear gradient in canvas space with three ordered stops.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: [(f32, Rgba8); 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
}

/// Soft halo drawn under a text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Rgba8,
    pub blur_px: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub origin: Point,
    pub font_size: f32,
    pub color: Rgba8,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub glow: Option<Glow>,
}

/// One drawing command. Commands are painted in list order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        paint: Paint,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f64,
        paint: Paint,
    },
    StrokeRect {
        rect: Rect,
        color: Rgba8,
        width: f64,
    },
    StrokeRoundedRect {
        rect: Rect,
        radius: f64,
        color: Rgba8,
        width: f64,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgba8,
        width: f64,
    },
    Text(TextRun),
}

/// Ordered drawing commands for one frame-sized layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    size: FrameSize,
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(size: FrameSize) -> Self {
        Self {
            size,
            ops: Vec::new(),
        }
    }

    pub fn with_capacity(size: FrameSize, capacity: usize) -> Self {
        Self {
            size,
            ops: Vec::with_capacity(capacity),
        }
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// Fill the whole layer with one color.
    pub fn fill_background(&mut self, color: Rgba8) {
        self.push(DrawOp::FillRect {
            rect: self.size.rect(),
            paint: Paint::Solid(color),
        });
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
    }
}
