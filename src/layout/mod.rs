//! Layout engine: per-axis sizes and the visible window.
//!
//! This module handles:
//! - Variable row heights and column widths with O(log n) prefix sums
//! - Mapping a scroll offset to the first visible row/column
//! - Hit testing and surface placement inside the scroll container

mod size_table;
mod viewport;

pub use size_table::SizeTable;
pub use viewport::{map_offset_to_index, pixel_offset, Rect, SurfaceLayout, Viewport};
