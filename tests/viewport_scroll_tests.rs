//! Viewport and scroll mapping tests
//!
//! Offset to index mapping, prefix sums and per-frame scroll coalescing.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use canvasgrid::layout::{map_offset_to_index, SizeTable};
use canvasgrid::{Axis, Grid, GridConfig};
use test_case::test_case;

/// Rows of 30px with a few taller and shorter ones mixed in
fn mixed_rows() -> SizeTable {
    let mut rows = SizeTable::new(Axis::Row, 1_000, 30, 20);
    for (i, size) in [(3, 60), (4, 20), (10, 90), (11, 25), (500, 200), (999, 45)] {
        rows.set(i, size).unwrap();
    }
    rows
}

fn literal_sum(table: &SizeTable, start: u32, count: u32) -> u64 {
    table
        .sizes()
        .iter()
        .skip(start as usize)
        .take(count as usize)
        .map(|&s| u64::from(s))
        .sum()
}

// ============================================================================
// Offset mapping
// ============================================================================

#[test_case(0.0, 100, 0 ; "top")]
#[test_case(29.9, 100, 0 ; "inside first row")]
#[test_case(30.0, 100, 1 ; "exactly on second row")]
#[test_case(3000.0, 100_000, 100 ; "3000px at 30px rows")]
#[test_case(-50.0, 100, 0 ; "negative offset")]
#[test_case(1e12, 100, 99 ; "past the end clamps")]
fn test_start_index_uniform(offset: f64, len: u32, expected: u32) {
    let rows = SizeTable::new(Axis::Row, len, 30, 20);
    let (index, start) = map_offset_to_index(offset, &rows);
    assert_eq!(index, expected);
    assert_eq!(start, rows.offset_of(index));
}

#[test]
fn test_nan_offset_is_top() {
    let rows = SizeTable::new(Axis::Row, 100, 30, 20);
    assert_eq!(map_offset_to_index(f64::NAN, &rows), (0, 0));
}

#[test]
fn test_start_index_is_monotonic() {
    let rows = mixed_rows();
    let total = rows.total();
    let mut previous = 0;
    let mut offset = 0.0;
    while offset <= total as f64 + 100.0 {
        let (index, start) = map_offset_to_index(offset, &rows);
        assert!(
            index >= previous,
            "offset {offset}: start index went back from {previous} to {index}"
        );
        assert!(start as f64 <= offset.max(0.0));
        previous = index;
        offset += 7.5;
    }
}

#[test]
fn test_start_index_on_varied_sizes() {
    let rows = mixed_rows();
    // Rows 0..3 are 30px, row 3 is 60px, row 4 is 20px.
    assert_eq!(map_offset_to_index(90.0, &rows), (3, 90));
    assert_eq!(map_offset_to_index(149.0, &rows), (3, 90));
    assert_eq!(map_offset_to_index(150.0, &rows), (4, 150));
    assert_eq!(map_offset_to_index(170.0, &rows), (5, 170));
}

// ============================================================================
// Prefix sums
// ============================================================================

#[test]
fn test_prefix_sum_matches_literal_sum() {
    let rows = mixed_rows();
    for k in 0..=rows.len() {
        assert_eq!(rows.prefix_sum(0, k).unwrap(), literal_sum(&rows, 0, k), "k = {k}");
    }
}

#[test_case(0, 10 ; "leading")]
#[test_case(3, 2 ; "tall then short")]
#[test_case(400, 200 ; "spans the 200px row")]
#[test_case(990, 10 ; "trailing")]
fn test_prefix_sum_windows(start: u32, count: u32) {
    let rows = mixed_rows();
    let expected = literal_sum(&rows, start, count);
    assert_eq!(rows.prefix_sum(start, count).unwrap(), expected);
}

#[test]
fn test_prefix_sum_after_splice() {
    let mut rows = mixed_rows();
    rows.insert_at(5, 77).unwrap();
    rows.remove_at(0).unwrap();
    rows.insert_at(rows.len(), 33).unwrap();
    for k in (0..=rows.len()).step_by(13) {
        assert_eq!(rows.prefix_sum(0, k).unwrap(), literal_sum(&rows, 0, k), "k = {k}");
    }
    assert_eq!(rows.total(), literal_sum(&rows, 0, rows.len()));
}

#[test]
fn test_prefix_sum_out_of_range() {
    let rows = SizeTable::new(Axis::Row, 10, 30, 20);
    assert!(rows.prefix_sum(5, 6).is_err());
    assert_eq!(rows.prefix_sum(10, 0).unwrap(), 0);
}

// ============================================================================
// Frame coalescing
// ============================================================================

fn grid_800x600() -> Grid {
    let config = GridConfig {
        cell_width: 100,
        cell_height: 30,
        total_rows: 1_000,
        total_cols: 50,
        ..GridConfig::default()
    };
    Grid::with_size(config, 800.0, 600.0).unwrap()
}

#[test]
fn test_scroll_burst_requests_one_frame() {
    let mut grid = grid_800x600();
    let requested: Vec<bool> = (1..=10)
        .map(|i| grid.on_scroll(0.0, f64::from(i) * 100.0))
        .collect();

    assert_eq!(requested.iter().filter(|&&r| r).count(), 1);
    assert!(grid.take_frame_request());
    assert!(!grid.take_frame_request());
    assert_eq!(grid.frames().requests(), 1);

    // Nothing moves until the frame runs, then the last offsets win.
    assert_eq!(grid.viewport().start_row, 0);
    grid.on_frame();
    assert_eq!(grid.viewport().scroll_top, 1000.0);
    assert_eq!(grid.viewport().start_row, 33);
}

#[test]
fn test_scroll_after_frame_requests_again() {
    let mut grid = grid_800x600();
    assert!(grid.on_scroll(0.0, 300.0));
    grid.on_frame();
    assert!(grid.on_scroll(250.0, 600.0));
    grid.on_frame();
    assert_eq!(grid.viewport().start_row, 20);
    assert_eq!(grid.viewport().start_col, 2);
    assert_eq!(grid.frames().requests(), 2);
}

#[test]
fn test_horizontal_scroll_maps_columns() {
    let mut grid = grid_800x600();
    grid.on_scroll(1234.0, 0.0);
    grid.on_frame();
    let vp = grid.viewport();
    assert_eq!(vp.start_col, 12);
    assert_eq!(vp.start_col_offset, 1200);
    assert_eq!(vp.start_row, 0);
}
