//! Pointer hit testing and the prioritized handler list.
//!
//! All coordinates are relative to the visible box of the scroll container
//! (client coordinates minus the container's bounding rect), so the headers
//! always sit at the top and left edges regardless of scroll position.

use crate::error::Axis;
use crate::layout::{pixel_offset, SizeTable, Viewport};
use crate::types::{CellPos, GridConfig};

/// Borrowed state needed to resolve a pointer position.
#[derive(Clone, Copy)]
pub struct HitContext<'a> {
    pub config: &'a GridConfig,
    pub viewport: &'a Viewport,
    pub rows: &'a SizeTable,
    pub cols: &'a SizeTable,
}

/// Target of a hit test (what was pressed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Near the trailing edge of `index`. `insert` when in the outer half of
    /// the header, where a press inserts a new line instead of resizing.
    Boundary { axis: Axis, index: u32, insert: bool },
    ColumnHeader(u32),
    RowHeader(u32),
    Cell(CellPos),
}

impl HitTarget {
    /// CSS cursor shown while hovering the target.
    pub fn cursor(&self) -> &'static str {
        match self {
            Self::Boundary { insert: true, .. } => "cell",
            Self::Boundary {
                axis: Axis::Column, ..
            } => "col-resize",
            Self::Boundary { axis: Axis::Row, .. } => "row-resize",
            Self::ColumnHeader(_) | Self::RowHeader(_) | Self::Cell(_) => "default",
        }
    }
}

/// One entry of the dispatcher's handler list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerHandler {
    ColumnBoundary,
    RowBoundary,
    ColumnHeader,
    RowHeader,
    GridBody,
}

impl PointerHandler {
    /// Whether this handler claims the position, and for what.
    pub fn hit_test(self, ctx: &HitContext<'_>, x: f64, y: f64) -> Option<HitTarget> {
        let rhw = f64::from(ctx.config.row_header_width);
        let chh = f64::from(ctx.config.col_header_height);
        let in_width = x >= rhw && x < ctx.viewport.width;
        let in_height = y >= chh && y < ctx.viewport.height;
        let in_col_header = in_width && (0.0..chh).contains(&y);
        let in_row_header = in_height && (0.0..rhw).contains(&x);
        let handle = ctx.config.resize_handle;

        match self {
            Self::ColumnBoundary if in_col_header => {
                let offset = ctx.viewport.scroll_left + (x - rhw);
                boundary_near(ctx.cols, offset, handle).map(|index| HitTarget::Boundary {
                    axis: Axis::Column,
                    index,
                    insert: y < chh / 2.0,
                })
            }
            Self::RowBoundary if in_row_header => {
                let offset = ctx.viewport.scroll_top + (y - chh);
                boundary_near(ctx.rows, offset, handle).map(|index| HitTarget::Boundary {
                    axis: Axis::Row,
                    index,
                    insert: x < rhw / 2.0,
                })
            }
            Self::ColumnHeader if in_col_header => ctx
                .viewport
                .col_at(ctx.cols, x - rhw)
                .map(HitTarget::ColumnHeader),
            Self::RowHeader if in_row_header => ctx
                .viewport
                .row_at(ctx.rows, y - chh)
                .map(HitTarget::RowHeader),
            Self::GridBody if in_width && in_height => {
                let col = ctx.viewport.col_at(ctx.cols, x - rhw)?;
                let row = ctx.viewport.row_at(ctx.rows, y - chh)?;
                Some(HitTarget::Cell(CellPos::new(row, col)))
            }
            _ => None,
        }
    }
}

/// Trailing edge within `handle` pixels of `offset`.
#[allow(clippy::cast_precision_loss)]
fn boundary_near(table: &SizeTable, offset: f64, handle: f64) -> Option<u32> {
    let last = table.len().checked_sub(1)?;
    let Some(index) = table.index_at(pixel_offset(offset)) else {
        // Just past the final edge still grabs the last line.
        return ((offset - table.total() as f64).abs() < handle).then_some(last);
    };
    if (table.end_of(index) as f64 - offset) < handle {
        return Some(index);
    }
    if index > 0 && (offset - table.offset_of(index) as f64) < handle {
        return Some(index - 1);
    }
    None
}

/// Gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Live resize of one line; `origin` is the pointer coordinate on the
    /// resized axis when the drag started.
    Resize {
        axis: Axis,
        index: u32,
        origin: f64,
        start_size: u32,
    },
    SelectCells,
    SelectRows,
    SelectColumns,
}

/// Prioritized handler list. The first handler that claims a pointer-down
/// owns the gesture until pointer-up.
#[derive(Debug, Clone)]
pub struct PointerDispatcher {
    handlers: Vec<PointerHandler>,
    active: Option<Gesture>,
}

impl Default for PointerDispatcher {
    fn default() -> Self {
        Self {
            handlers: vec![
                PointerHandler::ColumnBoundary,
                PointerHandler::RowBoundary,
                PointerHandler::ColumnHeader,
                PointerHandler::RowHeader,
                PointerHandler::GridBody,
            ],
            active: None,
        }
    }
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handlers(&self) -> &[PointerHandler] {
        &self.handlers
    }

    /// First handler in registration order that claims `(x, y)`.
    pub fn hit(&self, ctx: &HitContext<'_>, x: f64, y: f64) -> Option<HitTarget> {
        self.handlers
            .iter()
            .find_map(|handler| handler.hit_test(ctx, x, y))
    }

    pub fn active(&self) -> Option<Gesture> {
        self.active
    }

    pub fn activate(&mut self, gesture: Gesture) {
        self.active = Some(gesture);
    }

    /// End the active gesture, returning it.
    pub fn release(&mut self) -> Option<Gesture> {
        self.active.take()
    }
}
