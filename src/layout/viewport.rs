//! Scroll offset to logical index mapping and surface placement.

use super::SizeTable;
use crate::types::GridConfig;

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlap of two rectangles, `None` when they do not overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > x && bottom > y).then_some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// Convert a pixel offset into a non-negative integer offset.
///
/// Negative and NaN offsets are treated as 0; fractional offsets round down.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn pixel_offset(offset: f64) -> u64 {
    if offset.is_nan() || offset <= 0.0 {
        return 0;
    }
    // Saturating float-to-int cast; scroll extents stay far below u64::MAX.
    offset.floor() as u64
}

/// Map a scroll offset onto the first visible index of `table`.
///
/// Returns `(start_index, start_offset)`: the number of leading entries whose
/// end edge is at or before `offset`, clamped to the last index, and the pixel
/// where that index begins. An entry starting exactly at `offset` is the first
/// visible one.
pub fn map_offset_to_index(offset: f64, table: &SizeTable) -> (u32, u64) {
    if table.is_empty() {
        return (0, 0);
    }
    let index = table
        .leading_count(pixel_offset(offset))
        .min(table.len() - 1);
    (index, table.offset_of(index))
}

/// Where the four surfaces sit inside the scroll container.
///
/// The surfaces are pinned to the visible corner of the container, so their
/// position follows the scroll offsets while the spacer provides the
/// scrollable extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceLayout {
    pub corner: Rect,
    pub col_header: Rect,
    pub row_header: Rect,
    pub grid: Rect,
    /// Size of the scroll spacer: content extent plus headers
    pub content_width: f64,
    pub content_height: f64,
}

/// Visible window of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Horizontal scroll offset of the container
    pub scroll_left: f64,
    /// Vertical scroll offset of the container
    pub scroll_top: f64,
    /// Container client width (headers included)
    pub width: f64,
    /// Container client height (headers included)
    pub height: f64,
    pub start_row: u32,
    pub start_row_offset: u64,
    pub start_col: u32,
    pub start_col_offset: u64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Store the latest scroll offsets and recompute the start indices.
    pub fn update(
        &mut self,
        scroll_left: f64,
        scroll_top: f64,
        rows: &SizeTable,
        cols: &SizeTable,
    ) {
        self.scroll_left = sanitize(scroll_left);
        self.scroll_top = sanitize(scroll_top);
        let (row, row_offset) = map_offset_to_index(self.scroll_top, rows);
        let (col, col_offset) = map_offset_to_index(self.scroll_left, cols);
        self.start_row = row;
        self.start_row_offset = row_offset;
        self.start_col = col;
        self.start_col_offset = col_offset;
    }

    /// Recompute the start indices after sizes changed (resize, insert, delete).
    pub fn refresh(&mut self, rows: &SizeTable, cols: &SizeTable) {
        self.update(self.scroll_left, self.scroll_top, rows, cols);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = sanitize(width);
        self.height = sanitize(height);
    }

    /// Width of the grid body surface.
    pub fn body_width(&self, config: &GridConfig) -> f64 {
        (self.width - f64::from(config.row_header_width)).max(0.0)
    }

    /// Height of the grid body surface.
    pub fn body_height(&self, config: &GridConfig) -> f64 {
        (self.height - f64::from(config.col_header_height)).max(0.0)
    }

    /// Surface-local x of a column's left edge on the grid/column-header surfaces.
    #[allow(clippy::cast_precision_loss)]
    pub fn col_x(&self, cols: &SizeTable, col: u32) -> f64 {
        cols.offset_of(col) as f64 - self.scroll_left
    }

    /// Surface-local y of a row's top edge on the grid/row-header surfaces.
    #[allow(clippy::cast_precision_loss)]
    pub fn row_y(&self, rows: &SizeTable, row: u32) -> f64 {
        rows.offset_of(row) as f64 - self.scroll_top
    }

    /// Column under a surface-local x, or `None` past the last column.
    pub fn col_at(&self, cols: &SizeTable, x: f64) -> Option<u32> {
        cols.index_at(pixel_offset(self.scroll_left + x.max(0.0)))
    }

    /// Row under a surface-local y, or `None` past the last row.
    pub fn row_at(&self, rows: &SizeTable, y: f64) -> Option<u32> {
        rows.index_at(pixel_offset(self.scroll_top + y.max(0.0)))
    }

    /// Absolute positions of corner, headers and grid in container coordinates.
    #[allow(clippy::cast_precision_loss)]
    pub fn surface_layout(
        &self,
        config: &GridConfig,
        rows: &SizeTable,
        cols: &SizeTable,
    ) -> SurfaceLayout {
        let rhw = f64::from(config.row_header_width);
        let chh = f64::from(config.col_header_height);
        let body_w = self.body_width(config);
        let body_h = self.body_height(config);
        let left = self.scroll_left;
        let top = self.scroll_top;
        SurfaceLayout {
            corner: Rect::new(left, top, rhw, chh),
            col_header: Rect::new(left + rhw, top, body_w, chh),
            row_header: Rect::new(left, top + chh, rhw, body_h),
            grid: Rect::new(left + rhw, top + chh, body_w, body_h),
            content_width: cols.total() as f64 + rhw,
            content_height: rows.total() as f64 + chh,
        }
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}
