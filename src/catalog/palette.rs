//! Sprite catalog boundary and the built-in palette
//!
//! The grid never looks sprites up itself. Callers resolve a [`Brush`] through
//! a [`SpriteCatalog`] and hand it to the paint operations, so the catalog can
//! live in whatever asset system the host uses.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::classification::Classification;
use crate::io::error::{EditorError, Result};
use crate::spatial::tile::{BlockKind, ColorType, Signature};

/// Lookup service mapping signatures to visuals and gameplay roles
pub trait SpriteCatalog {
    /// Visual handle for one sprite variant
    fn visual(&self, color: ColorType, kind: BlockKind, index: usize) -> Option<&str>;

    /// Gameplay classification of a (color, kind) set
    fn classification(&self, color: ColorType, kind: BlockKind) -> Classification;

    /// Sprite subdivisions per cell (x, y)
    fn subdivision(&self, color: ColorType, kind: BlockKind) -> [u32; 2];

    /// Number of sprite variants in the set, zero when unknown
    fn variant_count(&self, color: ColorType, kind: BlockKind) -> usize;

    /// Resolve a paintable brush
    ///
    /// Out-of-range variant indices wrap to the first variant.
    ///
    /// # Errors
    ///
    /// Returns `UnknownBrush` if the catalog has no sprites for the pair
    fn brush(&self, color: ColorType, kind: BlockKind, index: usize) -> Result<Brush> {
        let variants = self.variant_count(color, kind);
        if color == ColorType::None || kind == BlockKind::None || variants == 0 {
            return Err(EditorError::UnknownBrush { color, kind });
        }

        let index = if index < variants { index } else { 0 };
        Ok(Brush {
            signature: Signature::new(color, kind, index, self.subdivision(color, kind)),
            classification: self.classification(color, kind),
            variants,
        })
    }
}

/// A catalog-resolved signature ready to paint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    /// Signature written into painted tiles
    pub signature: Signature,
    /// Classification driving side effects
    pub classification: Classification,
    /// Number of variants available to random fills
    pub variants: usize,
}

impl Brush {
    /// Create a brush directly, bypassing any catalog
    pub const fn new(signature: Signature, classification: Classification, variants: usize) -> Self {
        Self {
            signature,
            classification,
            variants,
        }
    }

    /// Same brush painting a different sprite variant
    #[must_use]
    pub const fn with_index(mut self, index: usize) -> Self {
        self.signature.index = index;
        self
    }

    /// Block kind painted by this brush
    pub const fn kind(&self) -> BlockKind {
        self.signature.kind
    }
}

/// Sprites for one (color, kind) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteSet {
    /// Palette color
    pub color: ColorType,
    /// Block kind
    pub kind: BlockKind,
    /// Gameplay role of every sprite in the set
    pub classification: Classification,
    /// Subdivisions per cell (x, y)
    pub amount: [u32; 2],
    /// Visual handles, one per variant
    pub sprites: Vec<String>,
}

/// In-memory sprite catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    sets: Vec<SpriteSet>,
}

impl Palette {
    /// Create a palette from explicit sets
    pub const fn new(sets: Vec<SpriteSet>) -> Self {
        Self { sets }
    }

    /// Default Black and White sets shipped with the game
    pub fn standard() -> Self {
        const LAYOUT: [(BlockKind, Classification, [u32; 2], usize); 10] = [
            (BlockKind::Platform, Classification::Platform, [1, 2], 3),
            (BlockKind::Ground, Classification::Collider, [1, 1], 4),
            (BlockKind::Corner, Classification::Collider, [1, 1], 2),
            (BlockKind::SpawnPoint, Classification::StartPoint, [1, 1], 1),
            (BlockKind::Final, Classification::FinalPoint, [1, 1], 1),
            (BlockKind::Enemies, Classification::Enemy, [1, 1], 2),
            (BlockKind::Background, Classification::None, [1, 1], 3),
            (BlockKind::Collectables, Classification::Coin, [2, 2], 1),
            (BlockKind::JumpPad, Classification::JumpPad, [1, 2], 1),
            (BlockKind::CheckPoint, Classification::Checkpoint, [1, 1], 1),
        ];

        let mut sets = Vec::with_capacity(LAYOUT.len() * 2);
        for color in [ColorType::Black, ColorType::White] {
            for (kind, classification, amount, count) in LAYOUT {
                let sprites = (0..count)
                    .map(|i| format!("{color:?}_{kind:?}_{i}").to_lowercase())
                    .collect();
                sets.push(SpriteSet {
                    color,
                    kind,
                    classification,
                    amount,
                    sprites,
                });
            }
        }

        Self { sets }
    }

    /// Load a palette from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid palette
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EditorError::FileSystem {
            path: path.to_path_buf(),
            operation: "read palette",
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| EditorError::Serialization {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// All registered sets
    pub fn sets(&self) -> &[SpriteSet] {
        &self.sets
    }

    fn set(&self, color: ColorType, kind: BlockKind) -> Option<&SpriteSet> {
        self.sets
            .iter()
            .find(|set| set.color == color && set.kind == kind)
    }
}

impl SpriteCatalog for Palette {
    fn visual(&self, color: ColorType, kind: BlockKind, index: usize) -> Option<&str> {
        self.set(color, kind)
            .and_then(|set| set.sprites.get(index))
            .map(String::as_str)
    }

    fn classification(&self, color: ColorType, kind: BlockKind) -> Classification {
        self.set(color, kind)
            .map_or(Classification::None, |set| set.classification)
    }

    fn subdivision(&self, color: ColorType, kind: BlockKind) -> [u32; 2] {
        self.set(color, kind).map_or([1, 1], |set| set.amount)
    }

    fn variant_count(&self, color: ColorType, kind: BlockKind) -> usize {
        self.set(color, kind).map_or(0, |set| set.sprites.len())
    }
}
