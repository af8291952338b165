//! Faint spreadsheet grid lines, presented on top of the cell layer.

use crate::foundation::core::{Point, Rgba8};
use crate::grid::GridGeometry;
use crate::render::display_list::{DisplayList, DrawOp};

pub const GRID_LINE_ALPHA: f64 = 0.08;

/// One vertical line per multiple of the cell size across the width, then one horizontal
/// line per multiple down the height, both edges inclusive.
pub fn grid_overlay(grid: &GridGeometry) -> DisplayList {
    let frame = grid.frame();
    let step = grid.cell_size() as usize;
    let color = Rgba8::with_alpha_f(255, 255, 255, GRID_LINE_ALPHA);
    let (w, h) = (f64::from(frame.width), f64::from(frame.height));

    let verticals = (0..=frame.width).step_by(step).map(|x| {
        let x = f64::from(x);
        (Point::new(x, 0.0), Point::new(x, h))
    });
    let horizontals = (0..=frame.height).step_by(step).map(|y| {
        let y = f64::from(y);
        (Point::new(0.0, y), Point::new(w, y))
    });

    let mut list = DisplayList::new(frame);
    for (from, to) in verticals.chain(horizontals) {
        list.push(DrawOp::Line {
            from,
            to,
            color,
            width: 1.0,
        });
    }
    list
}
