//! Data types shared across the grid.

mod cell;
mod config;
mod selection;

pub use cell::*;
pub use config::*;
pub use selection::*;
