/// Start-point registry and spawn anchor bookkeeping
pub mod anchors;
/// Flood fill over same-family tiles
pub mod fill;
/// Neighbour scan merging painted tiles into regions
pub mod merge;
/// Paint, erase, line and interaction operations
pub mod paint;
/// Collider regions and their geometry
pub mod region;
/// Region removal and splitting
pub mod split;
/// Generational region arena
pub mod table;

pub use region::{Geometry, Region};
pub use table::{RegionId, RegionTable};
