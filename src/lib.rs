//! Layered tile grid for 2D platformer levels with merged collider regions
//!
//! Painting tiles onto the grid keeps a small set of axis-aligned collision and
//! trigger regions in sync: neighbouring solid tiles merge into one run, erasing
//! shrinks or splits runs, and gameplay markers (pickups, hazards, spawn points)
//! get their own trigger regions. Levels persist as JSON documents.

#![forbid(unsafe_code)]

/// Region bookkeeping: merging, splitting, painting and flood fill
pub mod algorithm;
/// Gameplay classification and sprite catalog lookups
pub mod catalog;
/// Input/output operations, configuration and error handling
pub mod io;
/// Grid, cells, tiles and coordinates
pub mod spatial;

pub use catalog::palette::{Brush, Palette, SpriteCatalog};
pub use io::error::{EditorError, Result};
pub use spatial::coords::{Point, TileRef};
pub use spatial::grid::{Grid, GridEvent};
