//! Structured error types for canvasgrid.
//!
//! Almost every failure inside the grid is local and recovered by clamping or
//! a no-op. What remains is surfaced through [`GridError`].

use std::fmt;

/// Which axis of the grid an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => f.write_str("row"),
            Self::Column => f.write_str("column"),
        }
    }
}

/// All errors that can occur in canvasgrid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Row or column index beyond the configured extent.
    #[error("{axis} index {index} out of range (len {len})")]
    IndexOutOfRange { axis: Axis, index: u32, len: u32 },

    /// Bulk import rejected; nothing was written.
    #[error("Import failed: {0}")]
    Import(String),

    /// JSON decoding error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid grid configuration.
    #[error("Invalid config: {0}")]
    Config(String),

    /// Rendering surface error.
    #[error("Render error: {0}")]
    Render(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
