use super::{CellPos, CellRange};

/// Which interpretation of the selection is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionKind {
    #[default]
    None,
    /// Rectangular cell range (a single cell is a degenerate range)
    Range,
    /// Whole row(s), from a row header
    Rows,
    /// Whole column(s), from a column header
    Columns,
}

/// Selection state. Only one variant is active at a time, so header and grid
/// highlights can never contradict each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Range { start: CellPos, end: CellPos },
    Rows { start: u32, end: u32 },
    Columns { start: u32, end: u32 },
}

impl Selection {
    pub fn kind(&self) -> SelectionKind {
        match self {
            Self::None => SelectionKind::None,
            Self::Range { .. } => SelectionKind::Range,
            Self::Rows { .. } => SelectionKind::Rows,
            Self::Columns { .. } => SelectionKind::Columns,
        }
    }

    /// Normalized bounds, clipped to the grid extent.
    ///
    /// Row and column selections cover the full extent of the open axis.
    pub fn selected_range(&self, total_rows: u32, total_cols: u32) -> Option<CellRange> {
        if total_rows == 0 || total_cols == 0 {
            return None;
        }
        let last_row = total_rows - 1;
        let last_col = total_cols - 1;
        let range = match *self {
            Self::None => return None,
            Self::Range { start, end } => CellRange::from_corners(start, end),
            Self::Rows { start, end } => CellRange {
                start_row: start.min(end),
                end_row: start.max(end),
                start_col: 0,
                end_col: last_col,
            },
            Self::Columns { start, end } => CellRange {
                start_row: 0,
                end_row: last_row,
                start_col: start.min(end),
                end_col: start.max(end),
            },
        };
        if range.start_row > last_row || range.start_col > last_col {
            return None;
        }
        Some(CellRange {
            end_row: range.end_row.min(last_row),
            end_col: range.end_col.min(last_col),
            ..range
        })
    }

    /// Normalized `(first, last)` rows of a whole-row selection.
    pub fn row_span(&self) -> Option<(u32, u32)> {
        match *self {
            Self::Rows { start, end } => Some((start.min(end), start.max(end))),
            _ => None,
        }
    }

    /// Normalized `(first, last)` columns of a whole-column selection.
    pub fn col_span(&self) -> Option<(u32, u32)> {
        match *self {
            Self::Columns { start, end } => Some((start.min(end), start.max(end))),
            _ => None,
        }
    }
}

/// Selection model driven by pointer gestures.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    selection: Selection,
    dragging: bool,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn kind(&self) -> SelectionKind {
        self.selection.kind()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Pointer-down inside the grid body. Clears any header selection.
    pub fn begin_cell(&mut self, pos: CellPos) {
        self.selection = Selection::Range {
            start: pos,
            end: pos,
        };
        self.dragging = true;
    }

    /// Pointer-down inside the row header. Clears any cell range.
    pub fn begin_rows(&mut self, row: u32) {
        self.selection = Selection::Rows {
            start: row,
            end: row,
        };
        self.dragging = true;
    }

    /// Pointer-down inside the column header. Clears any cell range.
    pub fn begin_columns(&mut self, col: u32) {
        self.selection = Selection::Columns {
            start: col,
            end: col,
        };
        self.dragging = true;
    }

    /// Move the moving corner of the active selection. Returns true if it changed.
    pub fn extend_to(&mut self, pos: CellPos) -> bool {
        let next = match self.selection {
            Selection::None => return false,
            Selection::Range { start, .. } => Selection::Range { start, end: pos },
            Selection::Rows { start, .. } => Selection::Rows {
                start,
                end: pos.row,
            },
            Selection::Columns { start, .. } => Selection::Columns {
                start,
                end: pos.col,
            },
        };
        let changed = next != self.selection;
        self.selection = next;
        changed
    }

    /// Set a range programmatically (no drag in progress).
    pub fn select_range(&mut self, start: CellPos, end: CellPos) {
        self.selection = Selection::Range { start, end };
        self.dragging = false;
    }

    /// Collapse to a single cell, used when the editor moves.
    pub fn select_cell(&mut self, pos: CellPos) {
        self.select_range(pos, pos);
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn clear(&mut self) {
        self.selection = Selection::None;
        self.dragging = false;
    }

    /// Anchor cell of a range selection.
    pub fn anchor(&self) -> Option<CellPos> {
        match self.selection {
            Selection::Range { start, .. } => Some(start),
            _ => None,
        }
    }

    pub fn selected_range(&self, total_rows: u32, total_cols: u32) -> Option<CellRange> {
        self.selection.selected_range(total_rows, total_cols)
    }
}
