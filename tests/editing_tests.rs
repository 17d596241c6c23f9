//! Editing and undo/redo tests
//!
//! Sparse store splicing, command reversibility, editor commits and
//! row/column resizing through the history.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use canvasgrid::editor::{Command, CommandManager, GridModel};
use canvasgrid::{CellEntry, Grid, GridConfig, GridError, Modifiers, SparseCellStore};
use test_case::test_case;

const NO_MODS: Modifiers = Modifiers {
    shift: false,
    ctrl: false,
    meta: false,
};

fn config() -> GridConfig {
    GridConfig {
        cell_width: 100,
        cell_height: 30,
        total_rows: 1_000,
        total_cols: 50,
        ..GridConfig::default()
    }
}

fn grid() -> Grid {
    Grid::with_size(config(), 800.0, 600.0).unwrap()
}

/// Container coordinates of the center of a visible cell (no scroll).
fn cell_xy(row: u32, col: u32) -> (f64, f64) {
    (
        50.0 + f64::from(col) * 100.0 + 50.0,
        30.0 + f64::from(row) * 30.0 + 15.0,
    )
}

fn click(grid: &mut Grid, row: u32, col: u32) {
    let (x, y) = cell_xy(row, col);
    assert!(grid.on_pointer_down(x, y));
    grid.on_pointer_up();
}

fn cells(store: &SparseCellStore) -> Vec<(u32, u32, String)> {
    store
        .iter()
        .map(|(pos, v)| (pos.row, pos.col, v.to_string()))
        .collect()
}

/// Store with {3: "a", 5: "b"} in column 0
fn store_a_b() -> SparseCellStore {
    let mut store = SparseCellStore::new();
    store.set_cell_value(3, 0, "a");
    store.set_cell_value(5, 0, "b");
    store
}

// ============================================================================
// Sparse store
// ============================================================================

#[test_case(0, 0, "Name" ; "origin")]
#[test_case(99_999, 999, "last" ; "far corner")]
#[test_case(7, 3, "  padded  " ; "whitespace kept")]
#[test_case(12, 1, "-3.5e2" ; "numeric text")]
fn test_store_round_trip(row: u32, col: u32, value: &str) {
    let mut store = SparseCellStore::new();
    store.set_cell_value(row, col, value);
    assert_eq!(store.get_cell_value(row, col), Some(value));
    assert!(store.has_data(row, col));

    assert_eq!(store.clear_cell(row, col).as_deref(), Some(value));
    assert!(!store.has_data(row, col));
    assert!(store.is_empty());
}

#[test]
fn test_store_empty_value_clears() {
    let mut store = store_a_b();
    store.set_cell_value(3, 0, "");
    assert!(!store.has_data(3, 0));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_insert_row_shifts_following_rows() {
    let mut store = store_a_b();
    store.insert_row(4);
    assert_eq!(
        cells(&store),
        vec![(3, 0, "a".to_string()), (6, 0, "b".to_string())]
    );
}

#[test]
fn test_delete_row_shifts_and_returns_removed() {
    let mut store = store_a_b();
    let removed = store.delete_row(3);
    assert_eq!(removed, vec![CellEntry::new(3, 0, "a")]);
    assert_eq!(cells(&store), vec![(4, 0, "b".to_string())]);
}

#[test]
fn test_column_splices() {
    let mut store = SparseCellStore::new();
    store.set_cell_value(0, 1, "x");
    store.set_cell_value(0, 4, "y");
    store.set_cell_value(2, 4, "z");

    store.insert_column(2);
    assert_eq!(store.get_cell_value(0, 1), Some("x"));
    assert_eq!(store.get_cell_value(0, 5), Some("y"));
    assert_eq!(store.get_cell_value(2, 5), Some("z"));

    let removed = store.delete_column(5);
    assert_eq!(removed.len(), 2);
    assert_eq!(cells(&store), vec![(0, 1, "x".to_string())]);

    store.restore(&removed);
    assert_eq!(store.get_cell_value(2, 5), Some("z"));
}

// ============================================================================
// Command reversibility
// ============================================================================

fn populated_model() -> GridModel {
    let mut model = GridModel::new(&GridConfig {
        total_rows: 20,
        total_cols: 10,
        ..GridConfig::default()
    });
    model.cells.set_cell_value(3, 0, "a");
    model.cells.set_cell_value(5, 2, "b");
    model.cells.set_cell_value(5, 9, "c");
    model.rows.set(5, 55).unwrap();
    model.cols.set(2, 120).unwrap();
    model
}

#[test_case(|m: &GridModel| Command::edit_cell(m, 3, 0, "changed") ; "edit populated")]
#[test_case(|m: &GridModel| Command::edit_cell(m, 8, 8, "new") ; "edit empty")]
#[test_case(|m: &GridModel| Command::edit_cell(m, 5, 2, "") ; "clear cell")]
#[test_case(|_: &GridModel| Command::ResizeRow { index: 5, old_size: 55, new_size: 80 } ; "resize row")]
#[test_case(|_: &GridModel| Command::ResizeColumn { index: 2, old_size: 120, new_size: 20 } ; "resize column")]
#[test_case(|_: &GridModel| Command::insert_row(4, 30) ; "insert row")]
#[test_case(|_: &GridModel| Command::insert_column(0, 70) ; "insert column")]
#[test_case(|_: &GridModel| Command::delete_row(5) ; "delete row")]
#[test_case(|_: &GridModel| Command::delete_column(2) ; "delete column")]
fn test_execute_undo_symmetry(build: fn(&GridModel) -> Command) {
    let mut model = populated_model();
    let before = model.clone();
    let mut cmd = build(&model);

    cmd.execute(&mut model).unwrap();
    let after = model.clone();
    assert_ne!(after, before, "{} changed nothing", cmd.label());

    cmd.undo(&mut model).unwrap();
    assert_eq!(model, before);

    cmd.execute(&mut model).unwrap();
    assert_eq!(model, after);
}

#[test]
fn test_history_round_trip() {
    let mut model = populated_model();
    let before = model.clone();
    let mut history = CommandManager::new();

    history.execute(Command::delete_row(3), &mut model).unwrap();
    history.execute(Command::insert_column(1, 70), &mut model).unwrap();
    let edit = Command::edit_cell(&model, 0, 0, "hello");
    history.execute(edit, &mut model).unwrap();
    let after = model.clone();

    while history.undo(&mut model) {}
    assert_eq!(model, before);
    assert_eq!(history.redo_len(), 3);

    while history.redo(&mut model) {}
    assert_eq!(model, after);
    assert!(!history.can_redo());
}

#[test]
fn test_new_command_discards_redo() {
    let mut model = populated_model();
    let mut history = CommandManager::new();
    history.execute(Command::insert_row(0, 30), &mut model).unwrap();
    assert!(history.undo(&mut model));
    assert!(history.can_redo());

    let edit = Command::edit_cell(&model, 1, 1, "x");
    history.execute(edit, &mut model).unwrap();
    assert!(!history.can_redo());
    assert_eq!(history.undo_len(), 1);
}

#[test]
fn test_failed_command_is_not_recorded() {
    let mut model = populated_model();
    let before = model.clone();
    let mut history = CommandManager::new();
    let err = history
        .execute(Command::delete_row(20), &mut model)
        .unwrap_err();
    assert!(matches!(err, GridError::IndexOutOfRange { index: 20, .. }));
    assert_eq!(history.undo_len(), 0);
    assert_eq!(model, before);
}

#[test]
fn test_empty_history_is_a_no_op() {
    let mut g = grid();
    assert!(!g.undo());
    assert!(!g.redo());
}

// ============================================================================
// Editor commits
// ============================================================================

#[test]
fn test_commit_same_text_twice_records_once() {
    let mut g = grid();
    click(&mut g, 2, 1);
    g.set_draft("hello");
    assert!(g.commit_editor().unwrap());
    g.set_draft("hello");
    assert!(!g.commit_editor().unwrap());

    assert_eq!(g.get_cell_value(2, 1), Some("hello"));
    assert_eq!(g.history().undo_len(), 1);
}

#[test]
fn test_commit_unchanged_value_records_nothing() {
    let mut g = grid();
    g.set_cell_value(2, 1, "same").unwrap();
    let depth = g.history().undo_len();

    click(&mut g, 2, 1);
    assert_eq!(g.editor_value(), Some("same"));
    g.set_draft("same");
    assert!(!g.commit_editor().unwrap());
    assert_eq!(g.history().undo_len(), depth);
}

#[test]
fn test_commit_empty_text_clears_cell() {
    let mut g = grid();
    g.set_cell_value(4, 4, "gone").unwrap();
    click(&mut g, 4, 4);
    g.set_draft("");
    assert!(g.commit_editor().unwrap());
    assert_eq!(g.get_cell_value(4, 4), None);

    assert!(g.undo());
    assert_eq!(g.get_cell_value(4, 4), Some("gone"));
}

#[test]
fn test_enter_commits_and_moves_down() {
    let mut g = grid();
    click(&mut g, 0, 0);
    g.set_draft("Name");
    assert!(g.on_key_down("Enter", NO_MODS));

    assert_eq!(g.get_cell_value(0, 0), Some("Name"));
    assert_eq!(g.editor().cell().map(|c| (c.row, c.col)), Some((1, 0)));
    assert_eq!(g.editor_value(), Some(""));
}

#[test]
fn test_clicking_another_cell_commits() {
    let mut g = grid();
    click(&mut g, 1, 1);
    g.set_draft("first");
    click(&mut g, 3, 3);
    assert_eq!(g.get_cell_value(1, 1), Some("first"));
    assert_eq!(g.editor().cell().map(|c| (c.row, c.col)), Some((3, 3)));
}

#[test]
fn test_escape_discards_draft() {
    let mut g = grid();
    g.set_cell_value(1, 1, "kept").unwrap();
    click(&mut g, 1, 1);
    g.set_draft("typo");
    assert!(g.on_key_down("Escape", NO_MODS));

    assert_eq!(g.get_cell_value(1, 1), Some("kept"));
    assert!(!g.editor().is_open());
    assert_eq!(g.get_selection(), None);
}

#[test]
fn test_set_cell_value_bounds() {
    let mut g = grid();
    assert!(g.set_cell_value(1_000, 0, "x").is_err());
    assert!(g.set_cell_value(0, 50, "x").is_err());
    assert!(g.set_cell_value(999, 49, "x").unwrap());
    assert!(!g.set_cell_value(999, 49, "x").unwrap());
}

// ============================================================================
// Resize persistence
// ============================================================================

#[test]
fn test_resize_column_then_undo() {
    let mut g = grid();
    let widths_before = g.model().cols.sizes().to_vec();
    assert_eq!(g.model().cols.get(5).unwrap(), 100);

    g.resize_column(5, 160).unwrap();
    assert_eq!(g.model().cols.get(5).unwrap(), 160);

    assert!(g.undo());
    assert_eq!(g.model().cols.get(5).unwrap(), 100);
    assert_eq!(g.model().cols.sizes(), widths_before.as_slice());
}

#[test]
fn test_drag_resize_column_then_undo() {
    let mut g = grid();
    // Trailing edge of column 5 sits at 50 + 600 in container coordinates.
    assert!(g.on_pointer_down(650.0, 20.0));
    g.on_pointer_move(680.0, 20.0);
    g.on_pointer_move(710.0, 20.0);
    g.on_pointer_up();

    assert_eq!(g.model().cols.get(5).unwrap(), 160);
    assert_eq!(g.history().undo_len(), 1);
    assert_eq!(g.model().cols.get(4).unwrap(), 100);
    assert_eq!(g.model().cols.get(6).unwrap(), 100);

    assert!(g.undo());
    assert_eq!(g.model().cols.get(5).unwrap(), 100);
    assert!(g.redo());
    assert_eq!(g.model().cols.get(5).unwrap(), 160);
}

#[test]
fn test_drag_resize_row() {
    let mut g = grid();
    // Bottom edge of row 1 sits at 30 + 60.
    assert!(g.on_pointer_down(40.0, 90.0));
    g.on_pointer_move(40.0, 130.0);
    g.on_pointer_up();
    assert_eq!(g.model().rows.get(1).unwrap(), 70);
    assert_eq!(g.model().rows.total(), 999 * 30 + 70);
}

#[test]
fn test_resize_is_clamped_to_floor() {
    let mut g = grid();
    g.resize_row(3, 1).unwrap();
    assert_eq!(g.model().rows.get(3).unwrap(), 20);
    assert!(g.undo());
    assert_eq!(g.model().rows.get(3).unwrap(), 30);
}

#[test]
fn test_structural_edits_move_cells() {
    let mut g = grid();
    g.set_cell_value(3, 0, "a").unwrap();
    g.set_cell_value(5, 0, "b").unwrap();

    g.insert_row(4).unwrap();
    assert_eq!(g.get_cell_value(6, 0), Some("b"));
    assert_eq!(g.model().total_rows(), 1_001);

    g.delete_row(3).unwrap();
    assert_eq!(g.get_cell_value(3, 0), None);
    assert_eq!(g.get_cell_value(5, 0), Some("b"));

    assert!(g.undo());
    assert!(g.undo());
    assert_eq!(g.get_cell_value(3, 0), Some("a"));
    assert_eq!(g.get_cell_value(5, 0), Some("b"));
    assert_eq!(g.model().total_rows(), 1_000);
}
