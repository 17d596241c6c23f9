//! Sparse cell storage.
//!
//! Only populated cells consume memory. Keys are ordered row-major, so range
//! queries walk just the populated cells of the requested rows and whole-row
//! splices can split the map instead of rewriting it.

use std::collections::BTreeMap;

use crate::types::{CellEntry, CellPos, CellRange};

/// Map from cell position to its text. Absence means empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseCellStore {
    cells: BTreeMap<CellPos, String>,
}

impl SparseCellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` at `(row, col)`. The empty string clears the cell.
    ///
    /// Returns the previous value, if any.
    pub fn set_cell_value(
        &mut self,
        row: u32,
        col: u32,
        value: impl Into<String>,
    ) -> Option<String> {
        let value = value.into();
        let pos = CellPos::new(row, col);
        if value.is_empty() {
            self.cells.remove(&pos)
        } else {
            self.cells.insert(pos, value)
        }
    }

    pub fn get_cell_value(&self, row: u32, col: u32) -> Option<&str> {
        self.cells.get(&CellPos::new(row, col)).map(String::as_str)
    }

    pub fn clear_cell(&mut self, row: u32, col: u32) -> Option<String> {
        self.cells.remove(&CellPos::new(row, col))
    }

    pub fn has_data(&self, row: u32, col: u32) -> bool {
        self.cells.contains_key(&CellPos::new(row, col))
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// All populated cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellPos, &str)> + '_ {
        self.cells.iter().map(|(pos, v)| (*pos, v.as_str()))
    }

    /// Populated cells inside `range`, row-major, without touching empty cells.
    pub fn get_range(&self, range: CellRange) -> impl Iterator<Item = (CellPos, &str)> + '_ {
        let lo = CellPos::new(range.start_row, range.start_col);
        let hi = CellPos::new(range.end_row, range.end_col);
        let cols = range.start_col..=range.end_col;
        self.cells
            .range(lo..=hi)
            .filter(move |(pos, _)| cols.contains(&pos.col))
            .map(|(pos, v)| (*pos, v.as_str()))
    }

    /// Shift every cell with `row >= at` down by one.
    pub fn insert_row(&mut self, at: u32) {
        let tail = self.cells.split_off(&CellPos::new(at, 0));
        // Rows at u32::MAX cannot move further and are dropped.
        self.cells.extend(
            tail.into_iter()
                .filter_map(|(pos, v)| Some((CellPos::new(pos.row.checked_add(1)?, pos.col), v))),
        );
    }

    /// Remove row `at`, shifting every cell with `row > at` up by one.
    ///
    /// Returns the removed cells.
    pub fn delete_row(&mut self, at: u32) -> Vec<CellEntry> {
        let mut tail = self.cells.split_off(&CellPos::new(at, 0));
        let rest = match at.checked_add(1) {
            Some(next) => tail.split_off(&CellPos::new(next, 0)),
            None => BTreeMap::new(),
        };
        let removed = tail
            .into_iter()
            .map(|(pos, value)| CellEntry::new(pos.row, pos.col, value))
            .collect();
        self.cells.extend(
            rest.into_iter()
                .map(|(pos, v)| (CellPos::new(pos.row - 1, pos.col), v)),
        );
        removed
    }

    /// Shift every cell with `col >= at` right by one.
    pub fn insert_column(&mut self, at: u32) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .filter_map(|(pos, v)| {
                let col = if pos.col >= at {
                    pos.col.checked_add(1)?
                } else {
                    pos.col
                };
                Some((CellPos::new(pos.row, col), v))
            })
            .collect();
    }

    /// Remove column `at`, shifting every cell with `col > at` left by one.
    ///
    /// Returns the removed cells in row order.
    pub fn delete_column(&mut self, at: u32) -> Vec<CellEntry> {
        let cells = std::mem::take(&mut self.cells);
        let mut removed = Vec::new();
        for (pos, value) in cells {
            if pos.col == at {
                removed.push(CellEntry::new(pos.row, pos.col, value));
            } else if pos.col > at {
                self.cells.insert(CellPos::new(pos.row, pos.col - 1), value);
            } else {
                self.cells.insert(pos, value);
            }
        }
        removed
    }

    /// Write back entries captured by a delete.
    pub fn restore(&mut self, entries: &[CellEntry]) {
        for entry in entries {
            self.set_cell_value(entry.row, entry.col, entry.value.as_str());
        }
    }

    /// Owned copy of every populated cell, row-major.
    pub fn snapshot(&self) -> Vec<CellEntry> {
        self.cells
            .iter()
            .map(|(pos, v)| CellEntry::new(pos.row, pos.col, v.as_str()))
            .collect()
    }
}
