//! Rendering tests
//!
//! Draws grids into recording surfaces and checks labels, text placement,
//! selection layers and that redraws are stable.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use canvasgrid::layout::Rect;
use canvasgrid::render::{DrawOp, RecordingSurface, RenderSummary, Surfaces, TextAlign};
use canvasgrid::{CellPos, Grid, GridConfig};

/// The four surfaces of one grid, sized from its layout.
struct Screen {
    corner: RecordingSurface,
    col_header: RecordingSurface,
    row_header: RecordingSurface,
    grid: RecordingSurface,
}

impl Screen {
    fn for_grid(g: &Grid) -> Self {
        let layout = g.surface_layout();
        Self {
            corner: RecordingSurface::new(layout.corner.width, layout.corner.height),
            col_header: RecordingSurface::new(layout.col_header.width, layout.col_header.height),
            row_header: RecordingSurface::new(layout.row_header.width, layout.row_header.height),
            grid: RecordingSurface::new(layout.grid.width, layout.grid.height),
        }
    }

    fn draw(&mut self, g: &mut Grid) -> RenderSummary {
        g.render(Surfaces {
            corner: &mut self.corner,
            col_header: &mut self.col_header,
            row_header: &mut self.row_header,
            grid: &mut self.grid,
        })
    }
}

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

fn text_op(surface: &RecordingSurface, text: &str) -> (f64, f64, TextAlign) {
    match surface.find_text(text) {
        Some(DrawOp::Text { x, y, align, .. }) => (*x, *y, *align),
        other => panic!("no text {text:?}: {other:?}"),
    }
}

// ============================================================================
// Headers
// ============================================================================

#[test]
fn test_header_labels() {
    let mut g = grid();
    let mut screen = Screen::for_grid(&g);
    let summary = screen.draw(&mut g);

    // 750px body at 100px columns: A..H, the last one partial.
    assert_eq!(summary.cols, 8);
    assert_eq!(
        screen.col_header.texts(),
        vec!["A", "B", "C", "D", "E", "F", "G", "H"]
    );
    // 570px body at 30px rows: 19 rows.
    assert_eq!(summary.rows, 19);
    assert_eq!(screen.row_header.texts().first().copied(), Some("1"));
    assert_eq!(screen.row_header.texts().last().copied(), Some("19"));
}

#[test]
fn test_header_labels_follow_scroll() {
    let mut g = grid();
    g.on_scroll(2600.0, 300.0);
    g.on_frame();
    let mut screen = Screen::for_grid(&g);
    screen.draw(&mut g);

    assert_eq!(screen.col_header.texts().first().copied(), Some("AA"));
    assert_eq!(screen.row_header.texts().first().copied(), Some("11"));
    let (x, _, align) = text_op(&screen.col_header, "AA");
    assert_eq!(x, 50.0);
    assert_eq!(align, TextAlign::Center);
}

#[test]
fn test_corner_has_no_text() {
    let mut g = grid();
    let mut screen = Screen::for_grid(&g);
    screen.draw(&mut g);
    assert!(screen.corner.texts().is_empty());
    assert!(!screen.corner.frame().is_empty());
}

// ============================================================================
// Cells
// ============================================================================

#[test]
fn test_numbers_right_text_left() {
    let mut g = grid();
    g.set_cell_value(0, 0, "Name").unwrap();
    g.set_cell_value(0, 1, "42").unwrap();
    let mut screen = Screen::for_grid(&g);
    screen.draw(&mut g);

    assert_eq!(text_op(&screen.grid, "Name"), (4.0, 15.0, TextAlign::Left));
    assert_eq!(text_op(&screen.grid, "42"), (196.0, 15.0, TextAlign::Right));
}

#[test]
fn test_cells_move_with_scroll() {
    let mut g = grid();
    g.set_cell_value(1, 0, "row two").unwrap();
    g.set_cell_value(0, 0, "hidden").unwrap();
    g.on_scroll(0.0, 30.0);
    g.on_frame();
    let mut screen = Screen::for_grid(&g);
    screen.draw(&mut g);

    assert_eq!(text_op(&screen.grid, "row two").1, 15.0);
    assert!(screen.grid.find_text("hidden").is_none());
}

#[test]
fn test_only_visible_cells_are_drawn() {
    let mut g = grid();
    for row in 0..100 {
        g.set_cell_value(row, 0, format!("r{row}")).unwrap();
    }
    let mut screen = Screen::for_grid(&g);
    screen.draw(&mut g);
    assert_eq!(screen.grid.texts().len(), 19);
}

#[test]
fn test_shrunk_rows_and_columns_fill_the_body() {
    let mut g = grid();
    for i in 0..40 {
        g.resize_row(i, 20).unwrap();
        g.resize_column(i, 50).unwrap();
    }
    g.set_cell_value(25, 14, "bottom right").unwrap();
    let mut screen = Screen::for_grid(&g);
    let summary = screen.draw(&mut g);

    // 570px at 20px rows and 750px at 50px columns.
    assert_eq!(summary.rows, 29);
    assert_eq!(summary.cols, 15);
    assert_eq!(screen.row_header.texts().last().copied(), Some("29"));
    assert_eq!(screen.col_header.texts().last().copied(), Some("O"));
    assert_eq!(
        text_op(&screen.grid, "bottom right"),
        (704.0, 510.0, TextAlign::Left)
    );
}

#[test]
fn test_configured_counts_cap_the_frame() {
    let config = GridConfig {
        cell_width: 100,
        cell_height: 30,
        visible_rows: Some(5),
        visible_cols: Some(3),
        ..GridConfig::default()
    };
    let mut g = Grid::with_size(config, 800.0, 600.0).unwrap();
    let mut screen = Screen::for_grid(&g);
    let summary = screen.draw(&mut g);
    assert_eq!((summary.rows, summary.cols), (5, 3));
    assert_eq!(screen.col_header.texts(), vec!["A", "B", "C"]);
}

#[test]
fn test_redraw_is_idempotent() {
    let mut g = grid();
    g.set_cell_value(2, 2, "x").unwrap();
    g.select_range(CellPos::new(1, 1), CellPos::new(3, 3)).unwrap();
    let mut screen = Screen::for_grid(&g);

    screen.draw(&mut g);
    let first = (
        screen.col_header.frame().to_vec(),
        screen.row_header.frame().to_vec(),
        screen.grid.frame().to_vec(),
    );
    screen.draw(&mut g);
    let second = (
        screen.col_header.frame().to_vec(),
        screen.row_header.frame().to_vec(),
        screen.grid.frame().to_vec(),
    );
    assert_eq!(first, second);
    assert_eq!(g.frames_rendered(), 2);
}

// ============================================================================
// Selection layers
// ============================================================================

#[test]
fn test_range_overlay() {
    let mut g = grid();
    g.select_range(CellPos::new(1, 1), CellPos::new(2, 2)).unwrap();
    let mut screen = Screen::for_grid(&g);
    let summary = screen.draw(&mut g);

    let fill = g.config().header.range_fill.clone();
    assert_eq!(
        screen.grid.fills(&fill),
        vec![Rect::new(100.0, 30.0, 200.0, 60.0)]
    );
    assert!(summary.toolbar_enabled);

    // Touched headers get the light tint.
    let tint = g.config().header.selected_bg_color.clone();
    assert_eq!(screen.col_header.fills(&tint).len(), 2);
    assert_eq!(screen.row_header.fills(&tint).len(), 2);
}

#[test]
fn test_single_cell_has_border_only() {
    let mut g = grid();
    g.select_range(CellPos::new(1, 1), CellPos::new(1, 1)).unwrap();
    let mut screen = Screen::for_grid(&g);
    screen.draw(&mut g);

    let fill = g.config().header.range_fill.clone();
    assert!(screen.grid.fills(&fill).is_empty());
    let border = g.config().header.range_border.clone();
    let lines = screen
        .grid
        .frame()
        .iter()
        .filter(|op| matches!(op, DrawOp::Line { color, .. } if *color == border))
        .count();
    assert_eq!(lines, 4);
}

#[test]
fn test_column_selection_highlights() {
    let mut g = grid();
    g.on_pointer_down(300.0, 20.0);
    g.on_pointer_up();
    let mut screen = Screen::for_grid(&g);
    screen.draw(&mut g);

    let style = g.config().header.clone();
    assert_eq!(
        screen.col_header.fills(&style.active_bg_color),
        vec![Rect::new(200.0, 0.0, 100.0, 30.0)]
    );
    assert_eq!(
        screen.grid.fills(&style.row_col_tint),
        vec![Rect::new(200.0, 0.0, 100.0, 570.0)]
    );
    // Every visible row is touched by a column selection.
    assert_eq!(screen.row_header.fills(&style.selected_bg_color).len(), 19);
}

#[test]
fn test_toolbar_disabled_without_selection() {
    let mut g = grid();
    let mut screen = Screen::for_grid(&g);
    assert!(!screen.draw(&mut g).toolbar_enabled);
    assert_eq!(g.last_summary().map(|s| s.toolbar_enabled), Some(false));
}

// ============================================================================
// Layout of the host surfaces
// ============================================================================

#[test]
fn test_surface_layout_follows_scroll() {
    let mut g = grid();
    g.on_scroll(120.0, 45.0);
    g.on_frame();
    let layout = g.surface_layout();

    assert_eq!(layout.corner, Rect::new(120.0, 45.0, 50.0, 30.0));
    assert_eq!(layout.col_header, Rect::new(170.0, 45.0, 750.0, 30.0));
    assert_eq!(layout.row_header, Rect::new(120.0, 75.0, 50.0, 570.0));
    assert_eq!(layout.grid, Rect::new(170.0, 75.0, 750.0, 570.0));
    assert_eq!(layout.content_width, 5_050.0);
    assert_eq!(layout.content_height, 30_030.0);
}

#[test]
fn test_editor_rect_sits_inside_cell() {
    let mut g = grid();
    // Center of cell (1, 2)
    assert!(g.on_pointer_down(300.0, 75.0));
    g.on_pointer_up();
    assert_eq!(g.editor_rect(), Some(Rect::new(252.0, 62.0, 96.0, 26.0)));

    g.resize_column(0, 150).unwrap();
    assert_eq!(g.editor_rect(), Some(Rect::new(302.0, 62.0, 96.0, 26.0)));
}

#[test]
fn test_editor_clip_stops_at_headers() {
    let mut g = grid();
    assert!(g.on_pointer_down(300.0, 75.0));
    g.on_pointer_up();
    assert_eq!(g.editor_clip(), g.editor_rect());

    // Body now starts at y=75; the top of the input is under the column header.
    g.on_scroll(0.0, 45.0);
    g.on_frame();
    assert_eq!(g.editor_rect(), Some(Rect::new(252.0, 62.0, 96.0, 26.0)));
    assert_eq!(g.editor_clip(), Some(Rect::new(252.0, 75.0, 96.0, 13.0)));

    g.on_scroll(0.0, 300.0);
    g.on_frame();
    assert!(g.editor().is_open());
    assert_eq!(g.editor_clip(), None);
}
