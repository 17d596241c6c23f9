//! Reversible grid mutations.
//!
//! Every user-visible change to sizes or cell data goes through a [`Command`],
//! so the history can replay it in both directions.

use crate::error::{Axis, GridError, Result};
use crate::layout::SizeTable;
use crate::store::SparseCellStore;
use crate::types::{CellEntry, GridConfig};

/// The mutable state commands operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    pub rows: SizeTable,
    pub cols: SizeTable,
    pub cells: SparseCellStore,
}

impl GridModel {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            rows: SizeTable::new(
                Axis::Row,
                config.total_rows,
                config.cell_height,
                config.min_size,
            ),
            cols: SizeTable::new(
                Axis::Column,
                config.total_cols,
                config.cell_width,
                config.min_size,
            ),
            cells: SparseCellStore::new(),
        }
    }

    pub fn total_rows(&self) -> u32 {
        self.rows.len()
    }

    pub fn total_cols(&self) -> u32 {
        self.cols.len()
    }

    /// Fail with `IndexOutOfRange` unless `(row, col)` lies inside the grid.
    pub fn check_cell(&self, row: u32, col: u32) -> Result<()> {
        if row >= self.total_rows() {
            return Err(GridError::IndexOutOfRange {
                axis: Axis::Row,
                index: row,
                len: self.total_rows(),
            });
        }
        if col >= self.total_cols() {
            return Err(GridError::IndexOutOfRange {
                axis: Axis::Column,
                index: col,
                len: self.total_cols(),
            });
        }
        Ok(())
    }

    fn table_mut(&mut self, axis: Axis) -> &mut SizeTable {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.cols,
        }
    }

    fn insert_line(&mut self, axis: Axis, index: u32, size: u32) -> Result<()> {
        self.table_mut(axis).insert_at(index, size)?;
        match axis {
            Axis::Row => self.cells.insert_row(index),
            Axis::Column => self.cells.insert_column(index),
        }
        Ok(())
    }

    fn remove_line(&mut self, axis: Axis, index: u32) -> Result<(u32, Vec<CellEntry>)> {
        let table = self.table_mut(axis);
        if table.len() <= 1 {
            return Err(GridError::Other(format!("cannot remove the last {axis}")));
        }
        let size = table.remove_at(index)?;
        let removed = match axis {
            Axis::Row => self.cells.delete_row(index),
            Axis::Column => self.cells.delete_column(index),
        };
        Ok((size, removed))
    }
}

/// A reversible mutation.
///
/// `undo` after `execute` restores the exact prior sizes and cell data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    EditCell {
        row: u32,
        col: u32,
        old_value: Option<String>,
        new_value: String,
    },
    ResizeRow {
        index: u32,
        old_size: u32,
        new_size: u32,
    },
    ResizeColumn {
        index: u32,
        old_size: u32,
        new_size: u32,
    },
    /// Cells found in the inserted row on undo are kept for redo.
    InsertRow {
        index: u32,
        size: u32,
        captured: Vec<CellEntry>,
    },
    InsertColumn {
        index: u32,
        size: u32,
        captured: Vec<CellEntry>,
    },
    /// Size and cells are captured when the row is removed.
    DeleteRow {
        index: u32,
        size: u32,
        removed: Vec<CellEntry>,
    },
    DeleteColumn {
        index: u32,
        size: u32,
        removed: Vec<CellEntry>,
    },
}

impl Command {
    /// Edit of a single cell from its stored value to `new_value`.
    pub fn edit_cell(model: &GridModel, row: u32, col: u32, new_value: impl Into<String>) -> Self {
        Self::EditCell {
            row,
            col,
            old_value: model.cells.get_cell_value(row, col).map(str::to_string),
            new_value: new_value.into(),
        }
    }

    pub fn insert_row(index: u32, size: u32) -> Self {
        Self::InsertRow {
            index,
            size,
            captured: Vec::new(),
        }
    }

    pub fn insert_column(index: u32, size: u32) -> Self {
        Self::InsertColumn {
            index,
            size,
            captured: Vec::new(),
        }
    }

    pub fn delete_row(index: u32) -> Self {
        Self::DeleteRow {
            index,
            size: 0,
            removed: Vec::new(),
        }
    }

    pub fn delete_column(index: u32) -> Self {
        Self::DeleteColumn {
            index,
            size: 0,
            removed: Vec::new(),
        }
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::EditCell { .. } => "edit-cell",
            Self::ResizeRow { .. } => "resize-row",
            Self::ResizeColumn { .. } => "resize-column",
            Self::InsertRow { .. } => "insert-row",
            Self::InsertColumn { .. } => "insert-column",
            Self::DeleteRow { .. } => "delete-row",
            Self::DeleteColumn { .. } => "delete-column",
        }
    }

    /// Apply the mutation. On error the model is left unchanged.
    pub fn execute(&mut self, model: &mut GridModel) -> Result<()> {
        match self {
            Self::EditCell {
                row,
                col,
                new_value,
                ..
            } => {
                model.check_cell(*row, *col)?;
                model.cells.set_cell_value(*row, *col, new_value.as_str());
            }
            Self::ResizeRow {
                index, new_size, ..
            } => {
                *new_size = model.rows.set(*index, *new_size)?;
            }
            Self::ResizeColumn {
                index, new_size, ..
            } => {
                *new_size = model.cols.set(*index, *new_size)?;
            }
            Self::InsertRow {
                index,
                size,
                captured,
            } => {
                model.insert_line(Axis::Row, *index, *size)?;
                model.cells.restore(captured);
            }
            Self::InsertColumn {
                index,
                size,
                captured,
            } => {
                model.insert_line(Axis::Column, *index, *size)?;
                model.cells.restore(captured);
            }
            Self::DeleteRow {
                index,
                size,
                removed,
            } => {
                (*size, *removed) = model.remove_line(Axis::Row, *index)?;
            }
            Self::DeleteColumn {
                index,
                size,
                removed,
            } => {
                (*size, *removed) = model.remove_line(Axis::Column, *index)?;
            }
        }
        Ok(())
    }

    /// Revert a previously executed mutation.
    pub fn undo(&mut self, model: &mut GridModel) -> Result<()> {
        match self {
            Self::EditCell {
                row,
                col,
                old_value,
                ..
            } => {
                model.check_cell(*row, *col)?;
                match old_value {
                    Some(v) => model.cells.set_cell_value(*row, *col, v.as_str()),
                    None => model.cells.clear_cell(*row, *col),
                };
            }
            Self::ResizeRow {
                index, old_size, ..
            } => {
                model.rows.set(*index, *old_size)?;
            }
            Self::ResizeColumn {
                index, old_size, ..
            } => {
                model.cols.set(*index, *old_size)?;
            }
            Self::InsertRow {
                index, captured, ..
            } => {
                let (_, cells) = model.remove_line(Axis::Row, *index)?;
                *captured = cells;
            }
            Self::InsertColumn {
                index, captured, ..
            } => {
                let (_, cells) = model.remove_line(Axis::Column, *index)?;
                *captured = cells;
            }
            Self::DeleteRow {
                index,
                size,
                removed,
            } => {
                model.insert_line(Axis::Row, *index, *size)?;
                model.cells.restore(removed);
            }
            Self::DeleteColumn {
                index,
                size,
                removed,
            } => {
                model.insert_line(Axis::Column, *index, *size)?;
                model.cells.restore(removed);
            }
        }
        Ok(())
    }
}
