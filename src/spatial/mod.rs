//! Spatial data structures of a level
//!
//! This module contains the grid model:
//! - Coordinates, directions and orientation
//! - Tile slots and their signatures
//! - Cells holding the layer stack
//! - The grid owning cells and regions

/// Grid cells with a fixed layer stack
pub mod cell;
/// Coordinates, directions and run orientation
pub mod coords;
/// Grid storage, layout and events
pub mod grid;
/// Tile signatures and slots
pub mod tile;

pub use grid::{Grid, GridEvent, GridLayout};
