//! Tile signatures and the per-layer tile slot

use serde::{Deserialize, Serialize};

use crate::algorithm::table::RegionId;
use crate::catalog::classification::Classification;
use crate::spatial::coords::{Orientation, TileRef};

/// Palette a sprite belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColorType {
    /// No palette (erases)
    None,
    /// Dark palette, lower player side
    Black,
    /// Light palette, upper player side
    White,
}

/// Semantic tile category, independent of visual variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockKind {
    /// Nothing painted
    None,
    /// One-way platform
    Platform,
    /// Solid ground (at most one per cell across layers)
    Ground,
    /// Ground corner piece
    Corner,
    /// Player spawn
    SpawnPoint,
    /// Level goal
    Final,
    /// Hazard
    Enemies,
    /// Decoration without gameplay role
    Background,
    /// Pickup
    Collectables,
    /// Launch pad
    JumpPad,
    /// Checkpoint
    CheckPoint,
}

impl BlockKind {
    /// Every kind in declaration order
    pub const ALL: [Self; 11] = [
        Self::None,
        Self::Platform,
        Self::Ground,
        Self::Corner,
        Self::SpawnPoint,
        Self::Final,
        Self::Enemies,
        Self::Background,
        Self::Collectables,
        Self::JumpPad,
        Self::CheckPoint,
    ];
}

/// Visual and semantic identity of a painted tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// Palette color
    pub color: ColorType,
    /// Block kind
    pub kind: BlockKind,
    /// Sprite variant within the (color, kind) set
    pub index: usize,
    /// Sprite subdivisions per cell (x, y)
    pub amount: [u32; 2],
}

impl Signature {
    /// Create a signature
    pub const fn new(color: ColorType, kind: BlockKind, index: usize, amount: [u32; 2]) -> Self {
        Self {
            color,
            kind,
            index,
            amount,
        }
    }

    /// Subdivision count with zero components treated as one
    pub fn subdivision(&self) -> [u32; 2] {
        [self.amount[0].max(1), self.amount[1].max(1)]
    }

    /// Whether two signatures differ at most in sprite variant
    pub fn same_family(&self, other: &Self) -> bool {
        self.color == other.color
            && self.kind == other.kind
            && self.subdivision() == other.subdivision()
    }
}

/// One paintable slot at (row, column, layer)
///
/// The slot lives as long as the grid. Erasing clears its contents but the
/// slot itself, and its world placement, persist.
#[derive(Debug, Clone, PartialEq)]
pub struct TileInstance {
    pub(crate) position: TileRef,
    pub(crate) signature: Option<Signature>,
    pub(crate) classification: Classification,
    pub(crate) orientation: Option<Orientation>,
    pub(crate) region: Option<RegionId>,
    pub(crate) placement: [f32; 2],
}

impl TileInstance {
    /// Create an empty slot
    pub const fn empty(position: TileRef, placement: [f32; 2]) -> Self {
        Self {
            position,
            signature: None,
            classification: Classification::None,
            orientation: None,
            region: None,
            placement,
        }
    }

    /// Coordinate of this slot
    pub const fn position(&self) -> TileRef {
        self.position
    }

    /// Painted signature, if any
    pub const fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Block kind, `BlockKind::None` when empty
    pub fn kind(&self) -> BlockKind {
        self.signature.map_or(BlockKind::None, |s| s.kind)
    }

    /// Gameplay classification marker
    pub const fn classification(&self) -> Classification {
        self.classification
    }

    /// Orientation of the region this tile belongs to
    pub const fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// Weak reference to the owning region
    pub const fn region(&self) -> Option<RegionId> {
        self.region
    }

    /// World position of the sprite
    pub const fn placement(&self) -> [f32; 2] {
        self.placement
    }

    /// Whether nothing is painted here
    pub const fn is_empty(&self) -> bool {
        self.signature.is_none()
    }

    /// Reset contents while keeping the slot
    pub(crate) const fn clear(&mut self) {
        self.signature = None;
        self.classification = Classification::None;
        self.orientation = None;
        self.region = None;
    }
}
