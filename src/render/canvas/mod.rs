//! Canvas 2D drawing surfaces.
//!
//! Each grid owns four canvases (corner, column header, row header, body)
//! pinned to the visible corner of the scroll container.

mod surface;

pub use surface::CanvasSurface;
