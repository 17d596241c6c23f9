//! In-place cell editing.
//!
//! [`CellEditor`] holds the state of the editing surface: which cell is open,
//! the text loaded from the store and the draft typed since. It never touches
//! the store itself; the grid turns a dirty draft into an
//! [`EditCell`](mutation::Command::EditCell) command on commit.

pub mod history;
#[cfg(target_arch = "wasm32")]
pub(crate) mod input;
pub mod mutation;

pub use history::CommandManager;
pub use mutation::{Command, GridModel};

use crate::layout::{Rect, SizeTable};
use crate::types::{CellPos, GridConfig};

/// Inset of the editing surface inside the cell border.
const EDITOR_INSET: f64 = 2.0;

/// Keys the editor reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Enter,
    Tab,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl EditorKey {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            _ => return None,
        })
    }

    /// Cell the cursor moves to from `from`, clamped to the grid.
    ///
    /// Returns `None` for Escape, which closes the editor instead.
    pub fn target(
        self,
        from: CellPos,
        shift: bool,
        total_rows: u32,
        total_cols: u32,
    ) -> Option<CellPos> {
        let last_row = total_rows.saturating_sub(1);
        let last_col = total_cols.saturating_sub(1);
        let up = CellPos::new(from.row.saturating_sub(1), from.col);
        let down = CellPos::new((from.row.saturating_add(1)).min(last_row), from.col);
        let left = CellPos::new(from.row, from.col.saturating_sub(1));
        let right = CellPos::new(from.row, (from.col.saturating_add(1)).min(last_col));
        match self {
            Self::Escape => None,
            Self::Enter if shift => Some(up),
            Self::Enter | Self::ArrowDown => Some(down),
            Self::Tab if shift => Some(left),
            Self::Tab | Self::ArrowRight => Some(right),
            Self::ArrowUp => Some(up),
            Self::ArrowLeft => Some(left),
        }
    }
}

/// A draft that differs from the stored value and must become a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub cell: CellPos,
    pub value: String,
}

/// Editing surface state.
#[derive(Debug, Clone, Default)]
pub struct CellEditor {
    cell: Option<CellPos>,
    original: String,
    draft: String,
    focused: bool,
}

impl CellEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open on `cell` with its stored value (or empty).
    pub fn open(&mut self, cell: CellPos, stored: Option<&str>) {
        let value = stored.unwrap_or_default().to_string();
        self.cell = Some(cell);
        self.draft.clone_from(&value);
        self.original = value;
        self.focused = true;
    }

    pub fn close(&mut self) {
        self.cell = None;
        self.original.clear();
        self.draft.clear();
        self.focused = false;
    }

    pub fn is_open(&self) -> bool {
        self.cell.is_some()
    }

    pub fn cell(&self) -> Option<CellPos> {
        self.cell
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the draft with the text currently in the input.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if self.cell.is_some() {
            self.draft = text.into();
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused && self.cell.is_some();
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// True when the draft differs from what was loaded.
    pub fn is_dirty(&self) -> bool {
        self.cell.is_some() && self.draft != self.original
    }

    /// The edit a commit would record, if any.
    ///
    /// Identical text is a no-op; an emptied populated cell becomes a clear.
    pub fn pending_edit(&self) -> Option<PendingEdit> {
        let cell = self.cell?;
        if !self.is_dirty() {
            return None;
        }
        Some(PendingEdit {
            cell,
            value: self.draft.clone(),
        })
    }

    /// Record that the draft is now what the store holds.
    pub fn mark_committed(&mut self) {
        self.original.clone_from(&self.draft);
    }

    /// Reload a clean editor after the stored value changed underneath it.
    pub fn reload(&mut self, stored: Option<&str>) {
        if self.is_open() && !self.is_dirty() {
            let value = stored.unwrap_or_default();
            self.original = value.to_string();
            self.draft = value.to_string();
        }
    }

    /// Where the editing surface sits, in scroll-container coordinates.
    #[allow(clippy::cast_precision_loss)]
    pub fn overlay_rect(
        &self,
        rows: &SizeTable,
        cols: &SizeTable,
        config: &GridConfig,
    ) -> Option<Rect> {
        let cell = self.cell?;
        let width = cols.get(cell.col).ok()?;
        let height = rows.get(cell.row).ok()?;
        Some(Rect::new(
            cols.offset_of(cell.col) as f64 + f64::from(config.row_header_width) + EDITOR_INSET,
            rows.offset_of(cell.row) as f64 + f64::from(config.col_header_height) + EDITOR_INSET,
            (f64::from(width) - 2.0 * EDITOR_INSET).max(0.0),
            (f64::from(height) - 2.0 * EDITOR_INSET).max(0.0),
        ))
    }
}
