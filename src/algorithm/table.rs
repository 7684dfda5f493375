//! Generational slot arena owning every region
//!
//! Tiles refer to regions by [`RegionId`] only. Removing a region bumps the
//! slot's generation, so ids still held by stale tiles resolve to nothing
//! instead of aliasing whatever region later reuses the slot.

use std::fmt;

use crate::algorithm::region::Region;
use crate::io::configuration::MAX_GRID_TILES;

// Every slot index stays below the tile budget, so it always fits an id
const _: () = assert!(MAX_GRID_TILES <= u32::MAX as usize);

/// Weak handle to a region in a [`RegionTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId {
    index: u32,
    generation: u32,
}

impl RegionId {
    /// Slot index, also the persisted id
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Slot generation at the time the id was issued
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    region: Option<Box<Region>>,
}

/// Arena of regions indexed by slot
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    slots: Vec<Slot>,
}

impl RegionTable {
    /// Create an empty table
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Store a region in the lowest free slot and name it after that slot
    pub fn insert(&mut self, region: Region) -> RegionId {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.region.is_none())
            .unwrap_or(self.slots.len());
        self.insert_at(index, region)
    }

    /// Store a region in a specific slot, growing the table as needed
    ///
    /// Any region already in the slot is replaced. `index` must be below
    /// `MAX_GRID_TILES`.
    pub fn insert_at(&mut self, index: usize, mut region: Region) -> RegionId {
        debug_assert!(index < MAX_GRID_TILES, "slot {index} is past the tile budget");
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, Slot::default);
        }
        region.name = format!("Col{index}");

        let id = RegionId {
            index: index as u32,
            generation: 0,
        };
        match self.slots.get_mut(index) {
            Some(slot) => {
                slot.region = Some(Box::new(region));
                RegionId {
                    generation: slot.generation,
                    ..id
                }
            }
            None => id,
        }
    }

    /// Resolve an id, `None` if it is stale or was never issued
    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.region.as_deref())
    }

    /// Resolve an id mutably
    pub fn get_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.region.as_deref_mut())
    }

    /// Live id for a persisted slot index
    pub fn id_at(&self, index: usize) -> Option<RegionId> {
        let slot = self.slots.get(index)?;
        slot.region.as_ref()?;
        Some(RegionId {
            index: u32::try_from(index).ok()?,
            generation: slot.generation,
        })
    }

    /// Remove a region, invalidating every copy of its id
    pub fn remove(&mut self, id: RegionId) -> Option<Region> {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)?;
        let region = slot.region.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        Some(*region)
    }

    /// Live regions in slot order
    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let region = slot.region.as_deref()?;
            let id = RegionId {
                index: u32::try_from(index).ok()?,
                generation: slot.generation,
            };
            Some((id, region))
        })
    }

    /// Number of live regions
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.region.is_some()).count()
    }

    /// Whether no region is live
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.region.is_none())
    }
}
