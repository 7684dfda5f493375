//! Removing tiles from regions, splitting runs cut in the middle

use crate::algorithm::merge::find_pairs;
use crate::algorithm::region::Region;
use crate::catalog::classification::Classification;
use crate::spatial::coords::{Directions, TileRef};
use crate::spatial::grid::Grid;

/// Strip a tile's classification and take it out of its region
///
/// The tile keeps its signature. Once its marker is gone it is no longer a
/// merge candidate, so the split below cannot pull it straight back in.
pub fn detach(grid: &mut Grid, at: TileRef) {
    if let Some(tile) = grid.tile_mut(at) {
        tile.classification = Classification::None;
    }
    remove_in_list(grid, at);
}

/// Remove one member from its region
///
/// End members shrink the region in place. An interior member cuts the run
/// in two: the region is dropped and each remaining side is merged again as
/// if freshly painted, taking the lowest free slots. A side left with a single
/// tile may then join a region across the old axis.
pub fn remove_in_list(grid: &mut Grid, at: TileRef) {
    let Some(tile) = grid.tile_mut(at) else {
        return;
    };
    let Some(id) = tile.region.take() else {
        return;
    };
    tile.orientation = None;

    let Some(region) = grid.regions.get(id) else {
        return;
    };
    debug_assert!(
        region.contains(at),
        "tile {at} points at region {id} which does not list it"
    );
    let Some(position) = region.position_of(at) else {
        return;
    };

    let len = region.len();
    if len == 1 {
        grid.regions.remove(id);
        log::debug!("Region {id} removed with its last member {at}");
        return;
    }

    if position == 0 || position + 1 == len {
        if let Some(shrunk) = grid.regions.get_mut(id) {
            if position == 0 {
                shrunk.remove_first();
            } else {
                shrunk.remove_last();
            }
            if shrunk.len() == 1 && !shrunk.trigger {
                shrunk.orientation = None;
            }
        }
        grid.refresh_region(id);
        log::debug!("Region {id} shrunk by end member {at}");
        return;
    }

    let Some(removed) = grid.regions.remove(id) else {
        return;
    };
    let Some((before, rest)) = removed.members().split_at_checked(position) else {
        return;
    };
    let after = rest.get(1..).unwrap_or_default();
    log::debug!(
        "Region {id} split at {at} into runs of {} and {}",
        before.len(),
        after.len()
    );

    for run in [before, after] {
        for &member in run {
            if let Some(slot) = grid.tile_mut(member) {
                slot.region = None;
                slot.orientation = None;
            }
        }
        if !removed.is_trigger() && removed.tag().merges() {
            find_pairs(grid, run, Directions::ALL);
        } else {
            rebuild(grid, &removed, run);
        }
    }
}

/// Recreate a non-merging region over part of its former members
fn rebuild(grid: &mut Grid, template: &Region, run: &[TileRef]) {
    let orientation = if run.len() > 1 || template.is_trigger() {
        template.orientation()
    } else {
        None
    };
    let mut region = Region::new(run.to_vec(), orientation, template.amount());
    region.trigger = template.is_trigger();
    region.tag = template.tag();
    region.interaction = template.interaction();
    grid.insert_region(region);
}
