//! One grid instance.
//!
//! [`Grid`] owns every piece of state of a grid: sizes and cells, viewport,
//! selection, the cell editor, undo history and the gesture in progress. The
//! host feeds it DOM events in container coordinates and redraws when it
//! asks for a frame; nothing here depends on the browser, so whole
//! interaction sequences run in native tests.

mod frame;
mod pointer;

pub use frame::{AutoScroll, FrameScheduler};
pub use pointer::{Gesture, HitContext, HitTarget, PointerDispatcher, PointerHandler};

use tracing::{debug, warn};

use crate::aggregate::Aggregates;
use crate::editor::{CellEditor, Command, CommandManager, EditorKey, GridModel};
use crate::error::{Axis, Result};
use crate::import::{Delimiter, ImportFormat};
use crate::layout::{Rect, SizeTable, SurfaceLayout, Viewport};
use crate::render::{RenderCoordinator, RenderParams, RenderSummary, Surfaces};
use crate::types::{CellPos, CellRange, GridConfig, Selection, SelectionModel};

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on Windows/Linux, Cmd on macOS.
    fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// What the host must do after a frame besides redrawing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameOutcome {
    /// New scroll offsets for the container (auto-scroll or keyboard navigation).
    pub scroll_to: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryStep {
    Undo,
    Redo,
}

/// A virtualized grid and its interaction state.
#[derive(Debug)]
pub struct Grid {
    config: GridConfig,
    model: GridModel,
    viewport: Viewport,
    selection: SelectionModel,
    editor: CellEditor,
    /// Bumped whenever the editor opens, moves or reloads, so the host knows
    /// when to rewrite the input's text.
    editor_generation: u64,
    history: CommandManager,
    coordinator: RenderCoordinator,
    dispatcher: PointerDispatcher,
    frames: FrameScheduler,
    frame_wanted: bool,
    auto_scroll: AutoScroll,
    scroll_request: Option<(f64, f64)>,
    last_summary: Option<RenderSummary>,
}

impl Grid {
    /// Create a grid with a zero-sized viewport.
    pub fn new(config: GridConfig) -> Result<Self> {
        Self::with_size(config, 0.0, 0.0)
    }

    /// Create a grid whose scroll container is `width × height` logical pixels.
    pub fn with_size(config: GridConfig, width: f64, height: f64) -> Result<Self> {
        config.validate()?;
        let model = GridModel::new(&config);
        let mut viewport = Viewport::new(0.0, 0.0);
        viewport.resize(width, height);
        debug!(
            rows = config.total_rows,
            cols = config.total_cols,
            width,
            height,
            "grid created"
        );
        Ok(Self {
            config,
            model,
            viewport,
            selection: SelectionModel::new(),
            editor: CellEditor::new(),
            editor_generation: 0,
            history: CommandManager::new(),
            coordinator: RenderCoordinator::new(),
            dispatcher: PointerDispatcher::new(),
            frames: FrameScheduler::new(),
            frame_wanted: false,
            auto_scroll: AutoScroll::default(),
            scroll_request: None,
            last_summary: None,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn model(&self) -> &GridModel {
        &self.model
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> Selection {
        self.selection.selection()
    }

    pub fn editor(&self) -> &CellEditor {
        &self.editor
    }

    pub fn history(&self) -> &CommandManager {
        &self.history
    }

    pub fn frames(&self) -> &FrameScheduler {
        &self.frames
    }

    pub fn dispatcher(&self) -> &PointerDispatcher {
        &self.dispatcher
    }

    fn hit_context(&self) -> HitContext<'_> {
        HitContext {
            config: &self.config,
            viewport: &self.viewport,
            rows: &self.model.rows,
            cols: &self.model.cols,
        }
    }

    fn table(&self, axis: Axis) -> &SizeTable {
        match axis {
            Axis::Row => &self.model.rows,
            Axis::Column => &self.model.cols,
        }
    }

    fn table_mut(&mut self, axis: Axis) -> &mut SizeTable {
        match axis {
            Axis::Row => &mut self.model.rows,
            Axis::Column => &mut self.model.cols,
        }
    }

    // ---- frames -------------------------------------------------------

    /// Request a redraw; remembers whether the host has to schedule a frame.
    fn invalidate(&mut self) {
        if self.frames.request() {
            self.frame_wanted = true;
        }
    }

    /// True once after a new frame became pending. The host then calls
    /// `requestAnimationFrame`.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_wanted)
    }

    /// The host dropped its pending animation frame.
    pub fn cancel_frame(&mut self) {
        self.frames.cancel();
        self.frame_wanted = false;
        self.auto_scroll.stop();
    }

    /// Record a scroll event. Returns true when this event requested the frame.
    pub fn on_scroll(&mut self, scroll_left: f64, scroll_top: f64) -> bool {
        self.frames.set_scroll(scroll_left, scroll_top);
        let requested = self.frames.request();
        if requested {
            self.frame_wanted = true;
        }
        requested
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
        self.invalidate();
    }

    /// Animation-frame callback: applies the latest scroll and steps auto-scroll.
    /// The host redraws with [`render`](Self::render) afterwards.
    pub fn on_frame(&mut self) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        if let Some((left, top)) = self.frames.begin() {
            self.viewport.update(left, top, &self.model.rows, &self.model.cols);
        }
        if let Some((left, top)) = self.scroll_request.take() {
            outcome.scroll_to = Some((left, top));
        }

        let selecting = matches!(
            self.dispatcher.active(),
            Some(Gesture::SelectCells | Gesture::SelectRows | Gesture::SelectColumns)
        );
        if selecting && self.auto_scroll.is_active() {
            let current = (self.viewport.scroll_left, self.viewport.scroll_top);
            let next = self.auto_scroll.step(current, self.max_scroll());
            if moved(current, next) {
                self.viewport.update(next.0, next.1, &self.model.rows, &self.model.cols);
                outcome.scroll_to = Some(next);
                let (x, y) = self.auto_scroll.pointer();
                self.extend_drag(x, y);
                // Keep stepping until pointer-up, the pointer leaves the edge
                // or the scroll hits its limit.
                self.invalidate();
            }
        }
        outcome
    }

    /// Largest scroll offsets the spacer allows.
    fn max_scroll(&self) -> (f64, f64) {
        let layout = self.surface_layout();
        (
            (layout.content_width - self.viewport.width).max(0.0),
            (layout.content_height - self.viewport.height).max(0.0),
        )
    }

    /// Redraw headers and grid.
    pub fn render(&mut self, surfaces: Surfaces<'_>) -> RenderSummary {
        let params = RenderParams {
            config: &self.config,
            model: &self.model,
            viewport: &self.viewport,
            selection: self.selection.selection(),
        };
        let summary = self.coordinator.render(&params, surfaces);
        self.last_summary = Some(summary);
        summary
    }

    /// Summary of the last drawn frame.
    pub fn last_summary(&self) -> Option<RenderSummary> {
        self.last_summary
    }

    /// Frames drawn so far.
    pub fn frames_rendered(&self) -> u64 {
        self.coordinator.frames()
    }

    pub fn surface_layout(&self) -> SurfaceLayout {
        self.viewport.surface_layout(&self.config, &self.model.rows, &self.model.cols)
    }

    // ---- pointer ------------------------------------------------------

    /// CSS cursor for a hover at `(x, y)`.
    pub fn cursor_at(&self, x: f64, y: f64) -> &'static str {
        if let Some(Gesture::Resize { axis, .. }) = self.dispatcher.active() {
            return match axis {
                Axis::Row => "row-resize",
                Axis::Column => "col-resize",
            };
        }
        self.dispatcher
            .hit(&self.hit_context(), x, y)
            .map_or("default", |target| target.cursor())
    }

    /// Start a gesture. Returns false when no handler claimed the position.
    pub fn on_pointer_down(&mut self, x: f64, y: f64) -> bool {
        let Some(target) = self.dispatcher.hit(&self.hit_context(), x, y) else {
            return false;
        };
        debug!(?target, x, y, "pointer down");

        match target {
            HitTarget::Boundary {
                axis,
                index,
                insert: true,
            } => {
                self.close_editor();
                let size = self
                    .table(axis)
                    .get(index)
                    .unwrap_or_else(|_| self.table(axis).default_size());
                let result = match axis {
                    Axis::Row => self.insert_row_sized(index + 1, size),
                    Axis::Column => self.insert_column_sized(index + 1, size),
                };
                if let Err(e) = result {
                    warn!(error = %e, %axis, index, "insert rejected");
                }
            }
            HitTarget::Boundary {
                axis,
                index,
                insert: false,
            } => {
                let Ok(start_size) = self.table(axis).get(index) else {
                    return false;
                };
                let origin = match axis {
                    Axis::Row => y,
                    Axis::Column => x,
                };
                self.dispatcher.activate(Gesture::Resize {
                    axis,
                    index,
                    origin,
                    start_size,
                });
            }
            HitTarget::ColumnHeader(col) => {
                self.close_editor();
                self.selection.begin_columns(col);
                self.dispatcher.activate(Gesture::SelectColumns);
            }
            HitTarget::RowHeader(row) => {
                self.close_editor();
                self.selection.begin_rows(row);
                self.dispatcher.activate(Gesture::SelectRows);
            }
            HitTarget::Cell(pos) => {
                self.show_editor(pos);
                self.selection.begin_cell(pos);
                self.dispatcher.activate(Gesture::SelectCells);
            }
        }
        self.invalidate();
        true
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        match self.dispatcher.active() {
            None => {}
            Some(Gesture::Resize {
                axis,
                index,
                origin,
                start_size,
            }) => {
                let pos = match axis {
                    Axis::Row => y,
                    Axis::Column => x,
                };
                let proposed = f64::from(start_size) + (pos - origin);
                // Sizes at or below the floor are not applied while dragging.
                if proposed > f64::from(self.config.min_size) {
                    let size = to_size(proposed);
                    if self.table_mut(axis).set(index, size).is_ok() {
                        self.viewport.refresh(&self.model.rows, &self.model.cols);
                        self.invalidate();
                    }
                }
            }
            Some(Gesture::SelectCells | Gesture::SelectRows | Gesture::SelectColumns) => {
                let bounds = Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height);
                if self.auto_scroll.track(
                    x,
                    y,
                    bounds,
                    self.config.edge_threshold,
                    self.config.auto_scroll_step,
                ) {
                    self.invalidate();
                }
                self.extend_drag(x, y);
            }
        }
    }

    pub fn on_pointer_up(&mut self) {
        self.auto_scroll.stop();
        match self.dispatcher.release() {
            Some(Gesture::Resize {
                axis,
                index,
                start_size,
                ..
            }) => {
                let final_size = self.table(axis).get(index).unwrap_or(start_size);
                if final_size != start_size {
                    let cmd = match axis {
                        Axis::Row => Command::ResizeRow {
                            index,
                            old_size: start_size,
                            new_size: final_size,
                        },
                        Axis::Column => Command::ResizeColumn {
                            index,
                            old_size: start_size,
                            new_size: final_size,
                        },
                    };
                    if let Err(e) = self.history.execute(cmd, &mut self.model) {
                        warn!(error = %e, "resize rejected");
                    }
                }
                self.invalidate();
            }
            Some(_) => {
                self.selection.end_drag();
                self.invalidate();
            }
            None => {}
        }
    }

    /// Move the selection's moving corner to the cell under `(x, y)`,
    /// clamped to the visible body.
    fn extend_drag(&mut self, x: f64, y: f64) {
        let pos = self.cell_under_clamped(x, y);
        if self.selection.extend_to(pos) {
            self.invalidate();
        }
    }

    fn cell_under_clamped(&self, x: f64, y: f64) -> CellPos {
        let body_w = self.viewport.body_width(&self.config);
        let body_h = self.viewport.body_height(&self.config);
        let local_x =
            (x - f64::from(self.config.row_header_width)).clamp(0.0, (body_w - 1.0).max(0.0));
        let local_y =
            (y - f64::from(self.config.col_header_height)).clamp(0.0, (body_h - 1.0).max(0.0));
        let col = self
            .viewport
            .col_at(&self.model.cols, local_x)
            .unwrap_or_else(|| self.model.total_cols().saturating_sub(1));
        let row = self
            .viewport
            .row_at(&self.model.rows, local_y)
            .unwrap_or_else(|| self.model.total_rows().saturating_sub(1));
        CellPos::new(row, col)
    }

    // ---- keyboard -----------------------------------------------------

    /// Handle a key press. Returns true when the grid consumed it and the
    /// host should prevent the default action.
    ///
    /// Undo/redo shortcuts are left to the native text field while the
    /// editor has focus and holds an uncommitted draft.
    pub fn on_key_down(&mut self, key: &str, mods: Modifiers) -> bool {
        if mods.command() {
            let step = match key.to_ascii_lowercase().as_str() {
                "z" if mods.shift => HistoryStep::Redo,
                "z" => HistoryStep::Undo,
                "y" => HistoryStep::Redo,
                _ => return false,
            };
            if self.editor.is_focused() && self.editor.is_dirty() {
                return false;
            }
            let ran = match step {
                HistoryStep::Undo => self.undo(),
                HistoryStep::Redo => self.redo(),
            };
            debug!(?step, ran, "history shortcut");
            return true;
        }

        let Some(key) = EditorKey::from_key(key) else {
            return false;
        };
        let Some(cell) = self.editor.cell() else {
            return false;
        };
        let (total_rows, total_cols) = (self.model.total_rows(), self.model.total_cols());
        match key.target(cell, mods.shift, total_rows, total_cols) {
            None => self.cancel_editor(),
            Some(next) => {
                self.show_editor(next);
                self.selection.select_cell(next);
                self.ensure_visible(next);
            }
        }
        self.invalidate();
        true
    }

    /// Scroll so that `cell` lies inside the grid body.
    #[allow(clippy::cast_precision_loss)]
    fn ensure_visible(&mut self, cell: CellPos) {
        let body_w = self.viewport.body_width(&self.config);
        let body_h = self.viewport.body_height(&self.config);
        let left = scroll_for(
            self.viewport.scroll_left,
            self.model.cols.offset_of(cell.col) as f64,
            self.model.cols.end_of(cell.col) as f64,
            body_w,
        );
        let top = scroll_for(
            self.viewport.scroll_top,
            self.model.rows.offset_of(cell.row) as f64,
            self.model.rows.end_of(cell.row) as f64,
            body_h,
        );
        let current = (self.viewport.scroll_left, self.viewport.scroll_top);
        if moved(current, (left, top)) {
            self.viewport.update(left, top, &self.model.rows, &self.model.cols);
            self.scroll_request = Some((left, top));
        }
    }

    // ---- editor -------------------------------------------------------

    /// Commit any pending edit, then open the editor on `cell`.
    fn show_editor(&mut self, cell: CellPos) {
        if let Err(e) = self.commit_editor() {
            warn!(error = %e, "commit before move failed");
        }
        let stored = self.model.cells.get_cell_value(cell.row, cell.col);
        self.editor.open(cell, stored);
        self.editor_generation += 1;
    }

    /// Commit and hide the editor.
    fn close_editor(&mut self) {
        if let Err(e) = self.commit_editor() {
            warn!(error = %e, "commit on close failed");
        }
        if self.editor.is_open() {
            self.editor.close();
            self.editor_generation += 1;
        }
    }

    /// Escape: discard the draft, hide the editor and clear the selection.
    fn cancel_editor(&mut self) {
        self.editor.close();
        self.editor_generation += 1;
        self.selection.clear();
    }

    /// Text typed into the editing surface.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.editor.set_draft(text);
    }

    pub fn set_editor_focused(&mut self, focused: bool) {
        self.editor.set_focused(focused);
    }

    /// Turn a dirty draft into an `EditCell` command. Returns whether a
    /// command was recorded; unchanged text is a no-op.
    pub fn commit_editor(&mut self) -> Result<bool> {
        let Some(edit) = self.editor.pending_edit() else {
            return Ok(false);
        };
        let cmd = Command::edit_cell(&self.model, edit.cell.row, edit.cell.col, edit.value);
        self.history.execute(cmd, &mut self.model)?;
        self.editor.mark_committed();
        self.invalidate();
        Ok(true)
    }

    /// Editing surface rectangle in scroll-container coordinates.
    pub fn editor_rect(&self) -> Option<Rect> {
        self.editor.overlay_rect(&self.model.rows, &self.model.cols, &self.config)
    }

    /// The part of [`editor_rect`](Self::editor_rect) that is not under a
    /// header. `None` once the editing cell has scrolled out of the body.
    pub fn editor_clip(&self) -> Option<Rect> {
        self.editor_rect()?.intersect(&self.surface_layout().grid)
    }

    /// Current draft, if the editor is open.
    pub fn editor_value(&self) -> Option<&str> {
        self.editor.is_open().then(|| self.editor.draft())
    }

    pub fn editor_generation(&self) -> u64 {
        self.editor_generation
    }

    /// Reload the editor after the store changed underneath it.
    fn sync_editor(&mut self) {
        let Some(cell) = self.editor.cell() else {
            return;
        };
        if self.model.check_cell(cell.row, cell.col).is_err() {
            self.editor.close();
        } else {
            let stored = self.model.cells.get_cell_value(cell.row, cell.col);
            self.editor.reload(stored);
        }
        self.editor_generation += 1;
    }

    // ---- cells --------------------------------------------------------

    /// Set a cell through the undo history. Returns false when the value
    /// was already stored.
    pub fn set_cell_value(&mut self, row: u32, col: u32, value: impl Into<String>) -> Result<bool> {
        self.model.check_cell(row, col)?;
        let value = value.into();
        let stored = self.model.cells.get_cell_value(row, col).unwrap_or_default();
        if stored == value {
            return Ok(false);
        }
        let cmd = Command::edit_cell(&self.model, row, col, value);
        self.history.execute(cmd, &mut self.model)?;
        if self.editor.cell() == Some(CellPos::new(row, col)) {
            self.sync_editor();
        }
        self.invalidate();
        Ok(true)
    }

    pub fn get_cell_value(&self, row: u32, col: u32) -> Option<&str> {
        self.model.cells.get_cell_value(row, col)
    }

    // ---- structure ----------------------------------------------------

    fn apply_structural(&mut self, cmd: Command) -> Result<()> {
        self.history.execute(cmd, &mut self.model)?;
        self.viewport.refresh(&self.model.rows, &self.model.cols);
        self.sync_editor();
        self.invalidate();
        Ok(())
    }

    /// Insert a row of the default height before `index`.
    pub fn insert_row(&mut self, index: u32) -> Result<()> {
        self.insert_row_sized(index, self.model.rows.default_size())
    }

    /// Insert a column of the default width before `index`.
    pub fn insert_column(&mut self, index: u32) -> Result<()> {
        self.insert_column_sized(index, self.model.cols.default_size())
    }

    fn insert_row_sized(&mut self, index: u32, size: u32) -> Result<()> {
        self.apply_structural(Command::insert_row(index, size))
    }

    fn insert_column_sized(&mut self, index: u32, size: u32) -> Result<()> {
        self.apply_structural(Command::insert_column(index, size))
    }

    pub fn delete_row(&mut self, index: u32) -> Result<()> {
        self.apply_structural(Command::delete_row(index))
    }

    pub fn delete_column(&mut self, index: u32) -> Result<()> {
        self.apply_structural(Command::delete_column(index))
    }

    /// Resize a row through the undo history; the size is clamped to the floor.
    pub fn resize_row(&mut self, index: u32, size: u32) -> Result<()> {
        let old_size = self.model.rows.get(index)?;
        self.apply_structural(Command::ResizeRow {
            index,
            old_size,
            new_size: size,
        })
    }

    /// Resize a column through the undo history; the size is clamped to the floor.
    pub fn resize_column(&mut self, index: u32, size: u32) -> Result<()> {
        let old_size = self.model.cols.get(index)?;
        self.apply_structural(Command::ResizeColumn {
            index,
            old_size,
            new_size: size,
        })
    }

    // ---- history ------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let ran = self.history.undo(&mut self.model);
        if ran {
            self.after_history_step();
        }
        ran
    }

    pub fn redo(&mut self) -> bool {
        let ran = self.history.redo(&mut self.model);
        if ran {
            self.after_history_step();
        }
        ran
    }

    fn after_history_step(&mut self) {
        self.viewport.refresh(&self.model.rows, &self.model.cols);
        self.sync_editor();
        self.invalidate();
    }

    // ---- selection ----------------------------------------------------

    /// Select the rectangle spanned by two corners.
    pub fn select_range(&mut self, start: CellPos, end: CellPos) -> Result<()> {
        self.model.check_cell(start.row, start.col)?;
        self.model.check_cell(end.row, end.col)?;
        self.close_editor();
        self.selection.select_range(start, end);
        self.invalidate();
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.invalidate();
    }

    /// Normalized selected range, if any.
    pub fn get_selection(&self) -> Option<CellRange> {
        self.selection
            .selected_range(self.model.total_rows(), self.model.total_cols())
    }

    /// Range-dependent toolbar actions are available.
    pub fn toolbar_enabled(&self) -> bool {
        self.get_selection().is_some()
    }

    /// Aggregates of the selected range.
    pub fn aggregate(&self) -> Option<Aggregates> {
        self.get_selection()
            .map(|range| Aggregates::compute(&self.model.cells, range))
    }

    // ---- import -------------------------------------------------------

    /// Replace all cell data with `text`. Nothing is written unless the whole
    /// input parses and fits the grid. Clears the undo history.
    pub fn load(&mut self, format: ImportFormat, text: &str) -> Result<usize> {
        let batch = format.parse(text)?;
        batch.check_extent(self.model.total_rows(), self.model.total_cols())?;
        let count = batch.len();

        self.editor.close();
        self.editor_generation += 1;
        self.selection.clear();
        batch.write_into(&mut self.model.cells);
        self.history.clear();
        self.invalidate();
        debug!(cells = count, ?format, "imported");
        Ok(count)
    }

    pub fn load_json(&mut self, text: &str) -> Result<usize> {
        self.load(ImportFormat::Json, text)
    }

    pub fn load_csv(&mut self, text: &str) -> Result<usize> {
        self.load(ImportFormat::Delimited(Delimiter::Comma), text)
    }

    pub fn load_tsv(&mut self, text: &str) -> Result<usize> {
        self.load(ImportFormat::Delimited(Delimiter::Tab), text)
    }
}

/// Scroll offset that brings `[start, end)` into a window of `extent` pixels.
fn scroll_for(current: f64, start: f64, end: f64, extent: f64) -> f64 {
    if start < current {
        start
    } else if end > current + extent {
        (end - extent).max(0.0)
    } else {
        current
    }
}

fn moved(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() > f64::EPSILON || (a.1 - b.1).abs() > f64::EPSILON
}

/// Round a dragged size to whole pixels.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_size(v: f64) -> u32 {
    // Callers only pass values above the floor; `as` saturates on overflow.
    v.round() as u32
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    fn grid() -> Grid {
        let config = GridConfig {
            cell_width: 100,
            cell_height: 30,
            total_rows: 1000,
            total_cols: 50,
            ..GridConfig::default()
        };
        Grid::with_size(config, 800.0, 600.0).unwrap()
    }

    // Container coordinates of the center of a cell when not scrolled.
    fn cell_xy(row: u32, col: u32) -> (f64, f64) {
        (50.0 + f64::from(col) * 100.0 + 50.0, 30.0 + f64::from(row) * 30.0 + 15.0)
    }

    fn click(g: &mut Grid, (x, y): (f64, f64)) {
        g.on_pointer_down(x, y);
        g.on_pointer_up();
    }

    #[test]
    fn test_click_opens_editor_and_selects() {
        let mut g = grid();
        g.set_cell_value(2, 1, "hi").unwrap();
        click(&mut g, cell_xy(2, 1));
        assert_eq!(g.editor().cell(), Some(CellPos::new(2, 1)));
        assert_eq!(g.editor_value(), Some("hi"));
        let expected = CellRange::single(CellPos::new(2, 1));
        assert_eq!(g.get_selection(), Some(expected));
        assert!(g.toolbar_enabled());
    }

    #[test]
    fn test_drag_extends_range() {
        let mut g = grid();
        let (x0, y0) = cell_xy(1, 1);
        let (x1, y1) = cell_xy(4, 3);
        g.on_pointer_down(x0, y0);
        g.on_pointer_move(x1, y1);
        g.on_pointer_up();
        let range = g.get_selection().unwrap();
        assert_eq!((range.start_row, range.end_row), (1, 4));
        assert_eq!((range.start_col, range.end_col), (1, 3));
        assert_eq!(g.dispatcher().active(), None);
    }

    #[test]
    fn test_header_click_commits_and_closes_editor() {
        let mut g = grid();
        click(&mut g, cell_xy(0, 0));
        g.set_draft("typed");
        // Column C header.
        click(&mut g, (50.0 + 250.0, 20.0));
        assert_eq!(g.get_cell_value(0, 0), Some("typed"));
        assert!(!g.editor().is_open());
        assert_eq!(g.selection(), Selection::Columns { start: 2, end: 2 });
    }

    #[test]
    fn test_enter_commits_and_moves_down() {
        let mut g = grid();
        click(&mut g, cell_xy(3, 2));
        g.set_draft("x");
        assert!(g.on_key_down("Enter", Modifiers::default()));
        assert_eq!(g.get_cell_value(3, 2), Some("x"));
        assert_eq!(g.editor().cell(), Some(CellPos::new(4, 2)));

        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        g.on_key_down("Enter", shift);
        g.on_key_down("Enter", shift);
        assert_eq!(g.editor().cell(), Some(CellPos::new(2, 2)));
        assert_eq!(g.history().undo_len(), 1);
    }

    #[test]
    fn test_arrow_up_clamps_at_zero() {
        let mut g = grid();
        click(&mut g, cell_xy(0, 0));
        g.on_key_down("ArrowUp", Modifiers::default());
        g.on_key_down("ArrowLeft", Modifiers::default());
        assert_eq!(g.editor().cell(), Some(CellPos::new(0, 0)));
    }

    #[test]
    fn test_escape_cancels() {
        let mut g = grid();
        click(&mut g, cell_xy(1, 1));
        g.set_draft("discard me");
        assert!(g.on_key_down("Escape", Modifiers::default()));
        assert_eq!(g.get_cell_value(1, 1), None);
        assert!(!g.editor().is_open());
        assert_eq!(g.selection(), Selection::None);
        assert!(!g.history().can_undo());
    }

    #[test]
    fn test_navigation_scrolls_into_view() {
        let mut g = grid();
        // Body is 570 px tall: rows 0..=18 fit.
        click(&mut g, cell_xy(18, 0));
        g.take_frame_request();
        g.on_key_down("ArrowDown", Modifiers::default());
        assert_eq!(g.viewport().scroll_top, 600.0 - 570.0);
        let outcome = g.on_frame();
        assert_eq!(outcome.scroll_to, Some((0.0, 30.0)));
    }

    #[test]
    fn test_undo_shortcut_left_to_dirty_focused_input() {
        let mut g = grid();
        g.set_cell_value(0, 0, "a").unwrap();
        click(&mut g, cell_xy(5, 5));
        g.set_editor_focused(true);
        g.set_draft("typing");
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        assert!(!g.on_key_down("z", ctrl));
        assert_eq!(g.get_cell_value(0, 0), Some("a"));

        g.set_draft("");
        assert!(g.on_key_down("z", ctrl));
        assert_eq!(g.get_cell_value(0, 0), None);
        let redo = Modifiers {
            meta: true,
            shift: true,
            ..Modifiers::default()
        };
        assert!(g.on_key_down("Z", redo));
        assert_eq!(g.get_cell_value(0, 0), Some("a"));
    }

    #[test]
    fn test_undo_reloads_clean_editor() {
        let mut g = grid();
        click(&mut g, cell_xy(1, 1));
        g.set_draft("v1");
        g.commit_editor().unwrap();
        assert!(g.undo());
        assert_eq!(g.editor_value(), Some(""));
        assert!(g.redo());
        assert_eq!(g.editor_value(), Some("v1"));
    }

    #[test]
    fn test_drag_resize_column_records_one_command() {
        let mut g = grid();
        // Boundary between columns 5 and 6 sits at x = 50 + 600.
        g.on_pointer_down(650.0, 20.0);
        let active = g.dispatcher().active();
        assert!(matches!(active, Some(Gesture::Resize { .. })));
        assert_eq!(g.cursor_at(0.0, 0.0), "col-resize");
        g.on_pointer_move(680.0, 20.0);
        g.on_pointer_move(710.0, 20.0);
        assert_eq!(g.model().cols.get(5).unwrap(), 160);
        g.on_pointer_up();
        assert_eq!(g.history().undo_len(), 1);
        assert!(g.undo());
        assert_eq!(g.model().cols.get(5).unwrap(), 100);
        assert!(g.redo());
        assert_eq!(g.model().cols.get(5).unwrap(), 160);
    }

    #[test]
    fn test_drag_resize_respects_floor() {
        let mut g = grid();
        // Boundary below row 0 sits at y = 30 + 30.
        g.on_pointer_down(40.0, 60.0);
        // 30 - 15 = 15 is under the floor and not applied.
        g.on_pointer_move(40.0, 45.0);
        assert_eq!(g.model().rows.get(0).unwrap(), 30);
        g.on_pointer_move(40.0, 52.0);
        assert_eq!(g.model().rows.get(0).unwrap(), 22);
        g.on_pointer_up();
        assert_eq!(g.history().undo_len(), 1);
    }

    #[test]
    fn test_release_without_change_records_nothing() {
        let mut g = grid();
        g.on_pointer_down(650.0, 20.0);
        g.on_pointer_up();
        assert!(!g.history().can_undo());
    }

    #[test]
    fn test_insert_zone_adds_column() {
        let mut g = grid();
        g.set_cell_value(0, 1, "b").unwrap();
        g.resize_column(0, 120).unwrap();
        // Upper half of the header, at the right edge of column A.
        g.on_pointer_down(50.0 + 120.0, 5.0);
        g.on_pointer_up();
        assert_eq!(g.model().total_cols(), 51);
        assert_eq!(g.model().cols.get(1).unwrap(), 120);
        assert_eq!(g.get_cell_value(0, 2), Some("b"));
        assert!(g.undo());
        assert_eq!(g.model().total_cols(), 50);
        assert_eq!(g.get_cell_value(0, 1), Some("b"));
    }

    #[test]
    fn test_auto_scroll_steps_each_frame() {
        let mut g = grid();
        let (x, y) = cell_xy(2, 2);
        g.on_pointer_down(x, y);
        g.on_frame();
        g.on_pointer_move(x, 590.0);
        assert!(g.take_frame_request());
        let outcome = g.on_frame();
        assert_eq!(outcome.scroll_to, Some((0.0, 20.0)));
        assert!(g.frames().is_pending());
        let outcome = g.on_frame();
        assert_eq!(outcome.scroll_to, Some((0.0, 40.0)));

        g.on_pointer_up();
        g.on_frame();
        let outcome = g.on_frame();
        assert_eq!(outcome.scroll_to, None);
        // The drag end follows the rows that scrolled in.
        let range = g.get_selection().unwrap();
        assert!(range.end_row > 18);
    }

    #[test]
    fn test_auto_scroll_stops_at_scroll_limit() {
        let mut g = grid();
        let (x, y) = cell_xy(2, 2);
        g.on_pointer_down(x, y);
        g.on_frame();
        g.take_frame_request();

        // Near the top edge while already at scroll_top 0.
        g.on_pointer_move(x, 35.0);
        assert!(g.take_frame_request());
        let outcome = g.on_frame();
        assert_eq!(outcome.scroll_to, None);
        assert!(!g.frames().is_pending());
        assert!(!g.take_frame_request());

        // Moving again along the edge asks for one more frame.
        g.on_pointer_move(x + 10.0, 35.0);
        assert!(g.take_frame_request());
        g.on_frame();
        assert!(!g.frames().is_pending());
    }

    #[test]
    fn test_scroll_events_coalesce() {
        let mut g = grid();
        assert!(g.on_scroll(0.0, 30.0));
        assert!(!g.on_scroll(0.0, 900.0));
        assert!(!g.on_scroll(0.0, 3000.0));
        assert!(g.take_frame_request());
        assert!(!g.take_frame_request());
        g.on_frame();
        assert_eq!(g.viewport().start_row, 100);
        assert_eq!(g.frames().requests(), 1);
    }

    #[test]
    fn test_render_reports_toolbar_state() {
        let mut g = grid();
        let layout = g.surface_layout();
        let mut corner = RecordingSurface::new(layout.corner.width, layout.corner.height);
        let mut col_header =
            RecordingSurface::new(layout.col_header.width, layout.col_header.height);
        let mut row_header =
            RecordingSurface::new(layout.row_header.width, layout.row_header.height);
        let mut body = RecordingSurface::new(layout.grid.width, layout.grid.height);

        let summary = g.render(Surfaces {
            corner: &mut corner,
            col_header: &mut col_header,
            row_header: &mut row_header,
            grid: &mut body,
        });
        assert!(!summary.toolbar_enabled);

        click(&mut g, cell_xy(0, 0));
        let summary = g.render(Surfaces {
            corner: &mut corner,
            col_header: &mut col_header,
            row_header: &mut row_header,
            grid: &mut body,
        });
        assert!(summary.toolbar_enabled);
        assert_eq!(g.frames_rendered(), 2);
    }

    #[test]
    fn test_import_failure_keeps_state() {
        let mut g = grid();
        g.set_cell_value(0, 0, "keep").unwrap();
        assert!(g.load_csv("a,\"b").is_err());
        assert_eq!(g.get_cell_value(0, 0), Some("keep"));
        assert!(g.history().can_undo());

        assert_eq!(g.load_csv("x,y\n1,2").unwrap(), 4);
        assert_eq!(g.get_cell_value(0, 0), Some("x"));
        assert!(!g.history().can_undo());
    }

    #[test]
    fn test_set_cell_value_bounds_checked() {
        let mut g = grid();
        assert!(g.set_cell_value(1000, 0, "x").is_err());
        assert!(g.set_cell_value(0, 0, "").is_ok());
        assert!(!g.history().can_undo());
    }
}
