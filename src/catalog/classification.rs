//! Gameplay classification of tiles and the side-effect table keyed by it

use serde::{Deserialize, Serialize};

use crate::spatial::tile::ColorType;

/// Gameplay role resolved from a (color, kind) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Classification {
    /// Decoration, no collider
    #[default]
    None,
    /// One-way platform trigger
    Platform,
    /// Solid ground, merged into shared regions
    Collider,
    /// Pickup that disappears when collected
    Coin,
    /// Hazard restarting the level
    Enemy,
    /// Level goal
    FinalPoint,
    /// Player spawn anchor
    StartPoint,
    /// Launch pad
    JumpPad,
    /// Solid checkpoint block
    Checkpoint,
}

/// Interaction attached to a region, persisted by numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interaction {
    /// No interaction
    #[default]
    None,
    /// Restarts the level
    Damage,
    /// Finishes the level
    EndPoint,
    /// Adds a coin
    Coin,
    /// Launches the player
    JumpPad,
    /// Stops the player on top
    Checkpoint,
    /// Spawn location
    StartPoint,
}

impl Interaction {
    /// Persisted numeric code (0 = none)
    pub const fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Damage => 1,
            Self::EndPoint => 2,
            Self::Coin => 3,
            Self::JumpPad => 4,
            Self::Checkpoint => 5,
            Self::StartPoint => 6,
        }
    }

    /// Decode a persisted code
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Damage),
            2 => Some(Self::EndPoint),
            3 => Some(Self::Coin),
            4 => Some(Self::JumpPad),
            5 => Some(Self::Checkpoint),
            6 => Some(Self::StartPoint),
            _ => None,
        }
    }
}

/// Player side a spawn anchor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Player drawn with the light palette
    Upper,
    /// Player drawn with the dark palette
    Lower,
}

impl Side {
    /// Side owning a palette color
    pub const fn from_color(color: ColorType) -> Option<Self> {
        match color {
            ColorType::White => Some(Self::Upper),
            ColorType::Black => Some(Self::Lower),
            ColorType::None => None,
        }
    }
}

/// How a freshly painted tile acquires a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionPolicy {
    /// Strip markers and leave the tile without a region
    Detach,
    /// Run the merge scan against same-kind neighbours
    Merge,
    /// Own single-tile trigger region, always horizontal
    Trigger,
    /// Own single-tile solid region that never merges
    Solo,
}

/// Side effects applied after a tile is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Region acquisition rule
    pub region: RegionPolicy,
    /// Interaction attached to the region
    pub interaction: Interaction,
    /// Record the tile in the start-point registry
    pub spawn_anchor: bool,
    /// Erase the region's tiles when its interaction fires
    pub consumed_on_interact: bool,
}

impl Policy {
    const fn new(region: RegionPolicy, interaction: Interaction) -> Self {
        Self {
            region,
            interaction,
            spawn_anchor: false,
            consumed_on_interact: false,
        }
    }
}

impl Classification {
    /// Dispatch table entry for this classification
    pub const fn policy(self) -> Policy {
        match self {
            Self::None => Policy::new(RegionPolicy::Detach, Interaction::None),
            Self::Platform => Policy::new(RegionPolicy::Trigger, Interaction::None),
            Self::Collider => Policy::new(RegionPolicy::Merge, Interaction::None),
            Self::Coin => Policy {
                consumed_on_interact: true,
                ..Policy::new(RegionPolicy::Trigger, Interaction::Coin)
            },
            Self::Enemy => Policy::new(RegionPolicy::Trigger, Interaction::Damage),
            Self::FinalPoint => Policy::new(RegionPolicy::Trigger, Interaction::EndPoint),
            Self::StartPoint => Policy {
                spawn_anchor: true,
                ..Policy::new(RegionPolicy::Trigger, Interaction::StartPoint)
            },
            Self::JumpPad => Policy::new(RegionPolicy::Trigger, Interaction::JumpPad),
            Self::Checkpoint => Policy::new(RegionPolicy::Solo, Interaction::Checkpoint),
        }
    }

    /// Whether tiles of this classification join shared regions
    pub const fn merges(self) -> bool {
        matches!(self.policy().region, RegionPolicy::Merge)
    }
}
