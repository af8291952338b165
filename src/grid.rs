//! Cell grid geometry and spreadsheet-style headers.

use crate::foundation::core::FrameSize;
use crate::foundation::error::{DimensionsError, DimensionsResult};

/// Square-cell grid covering a frame. The last column/row may extend past the frame edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    frame: FrameSize,
    cell_size: u32,
    cols: u32,
    rows: u32,
}

impl GridGeometry {
    pub fn new(frame: FrameSize, cell_size: u32) -> DimensionsResult<Self> {
        if cell_size == 0 {
            return Err(DimensionsError::validation("cell_size must be >= 1"));
        }
        Ok(Self {
            frame,
            cell_size,
            cols: frame.width.div_ceil(cell_size),
            rows: frame.height.div_ceil(cell_size),
        })
    }

    pub fn frame(&self) -> FrameSize {
        self.frame
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_count(&self) -> usize {
        (self.cols as usize) * (self.rows as usize)
    }

    /// Top-left pixel of a cell.
    pub fn cell_origin(&self, col: u32, row: u32) -> (f64, f64) {
        let s = f64::from(self.cell_size);
        (f64::from(col) * s, f64::from(row) * s)
    }

    /// Nominal cell center, floored and clamped to the last frame pixel.
    pub fn cell_center(&self, col: u32, row: u32) -> (u32, u32) {
        let half = u64::from(self.cell_size) / 2;
        let x = u64::from(col) * u64::from(self.cell_size) + half;
        let y = u64::from(row) * u64::from(self.cell_size) + half;
        (
            x.min(u64::from(self.frame.width - 1)) as u32,
            y.min(u64::from(self.frame.height - 1)) as u32,
        )
    }

    /// Iterate `(col, row)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + use<> {
        let (cols, rows) = (self.cols, self.rows);
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (col, row)))
    }
}

/// Spreadsheet column label for a 0-based index: bijective base-26 (`A`..`Z`, `AA`, ...).
pub fn column_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index as u64 + 1;
    while n > 0 {
        n -= 1;
        label.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

/// Column and row headers for the current grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetHeaders {
    pub columns: Vec<String>,
    pub rows: Vec<String>,
    /// Pixel extent of every header cell.
    pub cell_size: u32,
}

impl SpreadsheetHeaders {
    pub fn for_grid(grid: &GridGeometry) -> Self {
        Self {
            columns: (0..grid.cols() as usize).map(column_label).collect(),
            rows: (1..=grid.rows()).map(|r| r.to_string()).collect(),
            cell_size: grid.cell_size(),
        }
    }

    /// `A1`-style reference for a cell.
    pub fn cell_ref(&self, col: u32, row: u32) -> Option<String> {
        let c = self.columns.get(col as usize)?;
        let r = self.rows.get(row as usize)?;
        Some(format!("{c}{r}"))
    }
}

#[cfg(test)]
#[path = "../tests/unit/grid.rs"]
mod tests;
