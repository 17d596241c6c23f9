//! Selection and aggregate tests
//!
//! Range normalization, header selections, drag gestures and the toolbar
//! aggregates, plus the full load-scroll-select-sum scenario.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use canvasgrid::render::{RecordingSurface, Surfaces};
use canvasgrid::{
    AggregateKind, CellPos, CellRange, Grid, GridConfig, Selection, SelectionKind, SelectionModel,
};
use test_case::test_case;

fn grid() -> Grid {
    let config = GridConfig {
        cell_width: 100,
        cell_height: 30,
        total_rows: 1_000,
        total_cols: 50,
        ..GridConfig::default()
    };
    Grid::with_size(config, 800.0, 600.0).unwrap()
}

fn cell_xy(row: u32, col: u32) -> (f64, f64) {
    (
        50.0 + f64::from(col) * 100.0 + 50.0,
        30.0 + f64::from(row) * 30.0 + 15.0,
    )
}

fn range(start_row: u32, end_row: u32, start_col: u32, end_col: u32) -> CellRange {
    CellRange {
        start_row,
        end_row,
        start_col,
        end_col,
    }
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn test_reversed_corners_normalize() {
    let mut model = SelectionModel::new();
    model.select_range(CellPos::new(5, 2), CellPos::new(1, 7));
    assert_eq!(model.selected_range(100, 100), Some(range(1, 5, 2, 7)));
}

#[test_case((0, 0), (0, 0), range(0, 0, 0, 0) ; "single cell")]
#[test_case((9, 9), (2, 3), range(2, 9, 3, 9) ; "both reversed")]
#[test_case((2, 9), (9, 3), range(2, 9, 3, 9) ; "columns reversed")]
fn test_grid_select_range(start: (u32, u32), end: (u32, u32), expected: CellRange) {
    let mut g = grid();
    g.select_range(CellPos::new(start.0, start.1), CellPos::new(end.0, end.1))
        .unwrap();
    assert_eq!(g.get_selection(), Some(expected));
    assert!(g.toolbar_enabled());
}

#[test]
fn test_select_range_rejects_out_of_range() {
    let mut g = grid();
    let past_last_row = g.select_range(CellPos::new(0, 0), CellPos::new(1_000, 0));
    assert!(past_last_row.is_err());
    let past_last_col = g.select_range(CellPos::new(0, 50), CellPos::new(0, 0));
    assert!(past_last_col.is_err());
    assert_eq!(g.get_selection(), None);
}

#[test]
fn test_clear_selection_disables_toolbar() {
    let mut g = grid();
    assert!(!g.toolbar_enabled());
    g.select_range(CellPos::new(1, 1), CellPos::new(2, 2)).unwrap();
    assert!(g.toolbar_enabled());
    g.clear_selection();
    assert!(!g.toolbar_enabled());
    assert_eq!(g.aggregate(), None);
}

// ============================================================================
// Pointer gestures
// ============================================================================

#[test]
fn test_drag_selects_range() {
    let mut g = grid();
    let (x0, y0) = cell_xy(4, 3);
    let (x1, y1) = cell_xy(1, 1);
    assert!(g.on_pointer_down(x0, y0));
    g.on_pointer_move(x1, y1);
    g.on_pointer_up();

    assert_eq!(g.get_selection(), Some(range(1, 4, 1, 3)));
    assert_eq!(
        g.selection(),
        Selection::Range {
            start: CellPos::new(4, 3),
            end: CellPos::new(1, 1),
        }
    );
    assert_eq!(g.dispatcher().active(), None);
}

#[test]
fn test_column_header_selects_whole_columns() {
    let mut g = grid();
    // Middle of column C's header, below the insert zone.
    assert!(g.on_pointer_down(300.0, 20.0));
    assert_eq!(g.selection().kind(), SelectionKind::Columns);
    assert_eq!(g.get_selection(), Some(range(0, 999, 2, 2)));

    g.on_pointer_move(500.0, 20.0);
    g.on_pointer_up();
    assert_eq!(g.selection(), Selection::Columns { start: 2, end: 4 });
    assert_eq!(g.get_selection(), Some(range(0, 999, 2, 4)));
}

#[test]
fn test_row_header_selects_whole_rows() {
    let mut g = grid();
    assert!(g.on_pointer_down(40.0, 135.0));
    assert_eq!(g.selection(), Selection::Rows { start: 3, end: 3 });

    g.on_pointer_move(40.0, 225.0);
    g.on_pointer_up();
    assert_eq!(g.get_selection(), Some(range(3, 6, 0, 49)));
}

#[test]
fn test_header_click_commits_and_closes_editor() {
    let mut g = grid();
    let (x, y) = cell_xy(2, 2);
    g.on_pointer_down(x, y);
    g.on_pointer_up();
    g.set_draft("typed");

    g.on_pointer_down(300.0, 20.0);
    g.on_pointer_up();
    assert_eq!(g.get_cell_value(2, 2), Some("typed"));
    assert!(!g.editor().is_open());
}

#[test]
fn test_cell_click_replaces_header_selection() {
    let mut g = grid();
    g.on_pointer_down(40.0, 135.0);
    g.on_pointer_up();
    let (x, y) = cell_xy(0, 0);
    g.on_pointer_down(x, y);
    g.on_pointer_up();
    assert_eq!(g.selection().kind(), SelectionKind::Range);
    assert_eq!(g.get_selection(), Some(range(0, 0, 0, 0)));
}

#[test]
fn test_corner_is_not_claimed() {
    let mut g = grid();
    assert!(!g.on_pointer_down(10.0, 10.0));
    assert_eq!(g.get_selection(), None);
}

// ============================================================================
// Aggregates
// ============================================================================

#[test]
fn test_aggregates_skip_non_numeric() {
    let mut g = grid();
    g.set_cell_value(0, 0, "10").unwrap();
    g.set_cell_value(1, 0, "abc").unwrap();
    g.set_cell_value(2, 0, "-2.5").unwrap();
    g.set_cell_value(9, 9, "1000").unwrap();
    g.select_range(CellPos::new(0, 0), CellPos::new(5, 0)).unwrap();

    let agg = g.aggregate().unwrap();
    assert_eq!(agg.sum, 7.5);
    assert_eq!(agg.min, Some(-2.5));
    assert_eq!(agg.max, Some(10.0));
    assert_eq!(agg.count, 3);
    assert_eq!(agg.numeric_count, 2);
    assert_eq!(agg.average, Some(3.75));
}

#[test]
fn test_aggregates_of_text_only_range() {
    let mut g = grid();
    g.set_cell_value(0, 0, "a").unwrap();
    g.select_range(CellPos::new(0, 0), CellPos::new(3, 3)).unwrap();

    let agg = g.aggregate().unwrap();
    assert_eq!(agg.get(AggregateKind::Sum), Some(0.0));
    assert_eq!(agg.get(AggregateKind::Count), Some(1.0));
    assert_eq!(agg.get(AggregateKind::Average), None);
    assert_eq!(agg.get(AggregateKind::Min), None);
}

#[test]
fn test_aggregates_over_column_selection() {
    let mut g = grid();
    g.set_cell_value(0, 2, "1").unwrap();
    g.set_cell_value(998, 2, "2").unwrap();
    g.set_cell_value(5, 3, "100").unwrap();
    g.on_pointer_down(300.0, 20.0);
    g.on_pointer_up();
    assert_eq!(g.aggregate().unwrap().sum, 3.0);
}

#[test_case("sum", Some(AggregateKind::Sum))]
#[test_case("MIN", Some(AggregateKind::Min))]
#[test_case("max", Some(AggregateKind::Max))]
#[test_case("count", Some(AggregateKind::Count))]
#[test_case("avg", Some(AggregateKind::Average))]
#[test_case(" average ", Some(AggregateKind::Average))]
#[test_case("median", None)]
fn test_aggregate_names(name: &str, expected: Option<AggregateKind>) {
    assert_eq!(AggregateKind::from_name(name), expected);
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_name_scroll_select_sum() {
    let config = GridConfig {
        total_rows: 100_000,
        total_cols: 1_000,
        cell_width: 100,
        cell_height: 30,
        visible_rows: Some(35),
        visible_cols: Some(25),
        ..GridConfig::default()
    };
    // Body of 2500×1050: exactly 25 columns and 35 rows.
    let mut g = Grid::with_size(config, 2550.0, 1080.0).unwrap();

    g.set_cell_value(0, 0, "Name").unwrap();
    assert_eq!(g.get_cell_value(0, 0), Some("Name"));

    g.on_scroll(0.0, 3000.0);
    g.on_frame();
    assert_eq!(g.viewport().start_row, 100);

    let layout = g.surface_layout();
    let mut corner = RecordingSurface::new(layout.corner.width, layout.corner.height);
    let mut col_header = RecordingSurface::new(layout.col_header.width, layout.col_header.height);
    let mut row_header = RecordingSurface::new(layout.row_header.width, layout.row_header.height);
    let mut body = RecordingSurface::new(layout.grid.width, layout.grid.height);
    let summary = g.render(Surfaces {
        corner: &mut corner,
        col_header: &mut col_header,
        row_header: &mut row_header,
        grid: &mut body,
    });
    assert_eq!(summary.start_row, 100);
    assert_eq!(summary.rows, 35);
    assert_eq!(summary.cols, 25);
    assert_eq!(row_header.texts().first().copied(), Some("101"));
    assert!(body.find_text("Name").is_none());

    g.set_cell_value(50, 3, "42").unwrap();
    g.select_range(CellPos::new(0, 3), CellPos::new(50, 3)).unwrap();
    assert_eq!(g.get_selection(), Some(range(0, 50, 3, 3)));
    assert_eq!(g.aggregate().unwrap().get(AggregateKind::Sum), Some(42.0));
}
