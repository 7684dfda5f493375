//! Start-point registry and the spawn anchor side effects

use crate::catalog::classification::Side;
use crate::spatial::coords::TileRef;
use crate::spatial::grid::{Grid, GridEvent};

/// Ordered list of spawn anchors and the player side each one serves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartPoints {
    entries: Vec<(TileRef, Side)>,
}

impl StartPoints {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record an anchor, returning `false` if it was already present
    pub fn record(&mut self, at: TileRef, side: Side) -> bool {
        if self.entries.contains(&(at, side)) {
            return false;
        }
        self.entries.push((at, side));
        true
    }

    /// Remove every entry at `at`, returning the removed sides in order
    pub fn remove(&mut self, at: TileRef) -> Vec<Side> {
        let mut removed = Vec::new();
        self.entries.retain(|&(tile, side)| {
            if tile == at {
                removed.push(side);
                false
            } else {
                true
            }
        });
        removed
    }

    /// First anchor registered for a side
    pub fn first(&self, side: Side) -> Option<TileRef> {
        self.entries
            .iter()
            .find(|(_, s)| *s == side)
            .map(|(tile, _)| *tile)
    }

    /// Whether `at` is registered for any side
    pub fn contains(&self, at: TileRef) -> bool {
        self.entries.iter().any(|(tile, _)| *tile == at)
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = (TileRef, Side)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of entries
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Grid {
    /// Spawn location for a player side, the first one registered
    pub fn spawn_point(&self, side: Side) -> Option<TileRef> {
        self.anchors.first(side)
    }

    pub(crate) fn register_anchor(&mut self, at: TileRef, side: Side) {
        if self.anchors.record(at, side) {
            log::debug!("Start point {side:?} registered at {at}");
            self.emit(GridEvent::SpawnAnchorAdded { at, side });
        }
    }

    pub(crate) fn forget_anchor(&mut self, at: TileRef) {
        for side in self.anchors.remove(at) {
            log::debug!("Start point {side:?} removed from {at}");
            self.emit(GridEvent::SpawnAnchorRemoved { at, side });
        }
    }
}
