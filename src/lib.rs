//! canvasgrid - a virtualized spreadsheet grid for the web
//!
//! Renders 100,000 × 1,000 cell grids in the browser via WebAssembly and
//! Canvas 2D while only ever materializing the visible window:
//! - Variable row heights and column widths with O(log n) scroll mapping
//! - Sparse cell storage, in-place editing and linear undo/redo
//! - Cell, row, column and range selection with drag auto-scroll
//! - Drag resize and insert of rows and columns
//! - All-or-nothing JSON/CSV import and range aggregates
//!
//! The core is plain Rust and runs natively; the browser host is wasm32 only.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { CanvasGrid } from 'canvasgrid';
//! await init();
//! const grid = new CanvasGrid(document.getElementById('sheet'), { cellWidth: 100 });
//! grid.setCellValue(0, 0, 'Name');
//! grid.setToolbarCallback((enabled) => toolbar.disabled = !enabled);
//! ```

// Core modules
pub mod aggregate;
pub mod cell_ref;
pub mod editor;
pub mod error;
pub mod grid;
pub mod import;
pub mod store;
pub mod types;

// Rendering modules
pub mod layout;
pub mod render;
#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use aggregate::{AggregateKind, Aggregates};
pub use error::{Axis, GridError, Result};
pub use grid::{FrameOutcome, Grid, Modifiers};
pub use import::{Delimiter, ImportBatch, ImportFormat};
pub use layout::{SizeTable, Viewport};
pub use store::SparseCellStore;
#[cfg(target_arch = "wasm32")]
pub use viewer::CanvasGrid;

pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
