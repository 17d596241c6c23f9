//! Rendering through a pluggable draw contract.
//!
//! This module provides:
//! - The `DrawSurface` trait and a recording implementation for tests
//! - The render coordinator that redraws headers and grid
//! - Selection overlay geometry
//! - Canvas 2D surfaces (wasm32 only)
//! - Color validation and drawing constants

pub mod backend;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod colors;
pub mod coordinator;
pub mod selection;

pub use backend::{DrawOp, DrawSurface, RecordingSurface, TextAlign, TextStyle};
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use colors::palette;
pub use coordinator::{RenderCoordinator, RenderParams, RenderSummary, Surfaces};
pub use selection::{selection_rect, SelectionRect};
