//! Gameplay classification and sprite catalog lookups

/// Classification, interactions and the side-effect table
pub mod classification;
/// Sprite catalog trait and the built-in palette
pub mod palette;

pub use classification::{Classification, Interaction, Side};
pub use palette::{Brush, Palette, SpriteCatalog};
