//! Selection overlay geometry.
//!
//! These helpers keep selection math testable without depending on Canvas APIs.

use crate::layout::{Rect, SizeTable, Viewport};
use crate::types::CellRange;

/// Selection rectangle on the grid surface, clipped to the visible area.
///
/// An edge that was clipped away is not drawn, so a range continuing off
/// screen keeps an open side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub rect: Rect,
    pub draw_top: bool,
    pub draw_bottom: bool,
    pub draw_left: bool,
    pub draw_right: bool,
}

/// Surface-local `[start, end)` span of indices `first..=last`, clipped to `[0, extent]`.
#[allow(clippy::cast_precision_loss)]
pub fn axis_span(
    table: &SizeTable,
    scroll: f64,
    first: u32,
    last: u32,
    extent: f64,
) -> Option<(f64, f64, bool, bool)> {
    if first >= table.len() {
        return None;
    }
    let start = table.offset_of(first) as f64 - scroll;
    let end = table.end_of(last.min(table.len() - 1)) as f64 - scroll;
    if end <= 0.0 || start >= extent {
        return None;
    }
    let clipped_start = start.max(0.0);
    let clipped_end = end.min(extent);
    Some((clipped_start, clipped_end, start >= 0.0, end <= extent))
}

/// Where `range` lands on a grid surface of `(width, height)`.
pub fn selection_rect(
    range: CellRange,
    viewport: &Viewport,
    rows: &SizeTable,
    cols: &SizeTable,
    surface: (f64, f64),
) -> Option<SelectionRect> {
    let (x1, x2, left, right) = axis_span(
        cols,
        viewport.scroll_left,
        range.start_col,
        range.end_col,
        surface.0,
    )?;
    let (y1, y2, top, bottom) = axis_span(
        rows,
        viewport.scroll_top,
        range.start_row,
        range.end_row,
        surface.1,
    )?;
    Some(SelectionRect {
        rect: Rect::new(x1, y1, x2 - x1, y2 - y1),
        draw_top: top,
        draw_bottom: bottom,
        draw_left: left,
        draw_right: right,
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::error::Axis;
    use crate::types::CellPos;

    fn tables() -> (SizeTable, SizeTable) {
        (
            SizeTable::new(Axis::Row, 1000, 30, 20),
            SizeTable::new(Axis::Column, 100, 100, 20),
        )
    }

    #[test]
    fn test_visible_range_has_all_edges() {
        let (rows, cols) = tables();
        let vp = Viewport::default();
        let range = CellRange::from_corners(CellPos::new(1, 1), CellPos::new(2, 3));
        let sel = selection_rect(range, &vp, &rows, &cols, (800.0, 600.0)).unwrap();
        assert_eq!(sel.rect, Rect::new(100.0, 30.0, 300.0, 60.0));
        assert!(sel.draw_top && sel.draw_bottom);
        assert!(sel.draw_left && sel.draw_right);
    }

    #[test]
    fn test_range_scrolled_partly_off_top() {
        let (rows, cols) = tables();
        let mut vp = Viewport::default();
        vp.update(0.0, 45.0, &rows, &cols);
        let range = CellRange::from_corners(CellPos::new(0, 0), CellPos::new(3, 0));
        let sel = selection_rect(range, &vp, &rows, &cols, (800.0, 600.0)).unwrap();
        assert_eq!(sel.rect.y, 0.0);
        assert_eq!(sel.rect.height, 75.0);
        assert!(!sel.draw_top);
        assert!(sel.draw_bottom);
    }

    #[test]
    fn test_range_entirely_off_screen() {
        let (rows, cols) = tables();
        let vp = Viewport::default();
        let range = CellRange::single(CellPos::new(500, 0));
        let sel = selection_rect(range, &vp, &rows, &cols, (800.0, 600.0));
        assert!(sel.is_none());
    }

    #[test]
    fn test_full_column_clipped_at_bottom() {
        let (rows, cols) = tables();
        let vp = Viewport::default();
        let range = CellRange {
            start_row: 0,
            end_row: 999,
            start_col: 2,
            end_col: 2,
        };
        let sel = selection_rect(range, &vp, &rows, &cols, (800.0, 600.0)).unwrap();
        assert_eq!(sel.rect.height, 600.0);
        assert!(!sel.draw_bottom);
    }
}
