//! Core data structures: piece geometry, pieces and the settled-cell grid.

pub use self::{grid::*, piece::*, shape::*};

pub(crate) mod grid;
pub(crate) mod piece;
pub(crate) mod shape;

/// Width of the playing grid in columns.
pub const GRID_WIDTH: usize = 10;
/// Height of the playing grid in rows.
pub const GRID_HEIGHT: usize = 20;
