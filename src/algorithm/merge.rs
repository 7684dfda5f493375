//! Neighbour scan that grows collider regions as tiles are painted
//!
//! A freshly painted tile (or a straight run of them) looks at its four
//! neighbours in a fixed order. The first compatible neighbour decides which
//! region the run joins and locks the axis; a second compatible neighbour on
//! the far side of the run along the same axis has its region folded in, so
//! painting the gap between two runs joins them into one.

use crate::algorithm::region::Region;
use crate::algorithm::table::RegionId;
use crate::spatial::coords::{Direction, Directions, Orientation, TileRef};
use crate::spatial::grid::Grid;
use crate::spatial::tile::{BlockKind, Signature, TileInstance};

/// Merge a straight run of freshly painted tiles into the region structure
///
/// `points` must be detached merging tiles on one layer forming a gap-free
/// run; their order does not matter. Only neighbours in `mask` are probed,
/// and runs of two or more tiles only probe along their own axis. Returns the
/// region the run ended up in, or `None` for an empty or unpainted run.
pub fn find_pairs(grid: &mut Grid, points: &[TileRef], mask: Directions) -> Option<RegionId> {
    let run = sorted_run(points);
    let (first, last) = (*run.first()?, *run.last()?);
    let kind = grid.tile(first).filter(|tile| !tile.is_empty())?.kind();

    let mut mask = mask;
    if let Some(axis) = run_axis(&run) {
        mask &= axis.directions();
    }

    let mut joined: Option<(RegionId, Orientation)> = None;
    for direction in Direction::SCAN_ORDER {
        if !mask.contains(direction.flag()) {
            continue;
        }
        if let Some((_, axis)) = joined
            && (direction.orientation() != axis || !direction.is_after())
        {
            continue;
        }

        let probe = if direction.is_after() { last } else { first };
        let Some((neighbour, owner)) = candidate(grid, probe, direction, kind, &run) else {
            continue;
        };

        match joined {
            None => {
                let axis = direction.orientation();
                let id = owner.unwrap_or_else(|| {
                    let amount = subdivision(grid, neighbour);
                    grid.insert_region(Region::new(vec![neighbour], None, amount))
                });
                extend(grid, id, &run, axis);
                log::debug!(
                    "Run of {} at {first} joined region {id} towards {direction:?}",
                    run.len()
                );
                joined = Some((id, axis));
            }
            Some((id, axis)) => match owner {
                Some(other) if other != id => absorb(grid, id, other, axis),
                Some(_) => {}
                None => extend(grid, id, &[neighbour], axis),
            },
        }
    }

    match joined {
        Some((id, _)) => {
            stamp(grid, id, first);
            Some(id)
        }
        None => place_run(grid, &run),
    }
}

/// Give a run its own merging region without scanning neighbours
///
/// Orientation is inferred from the first two tiles and left unset for a
/// single tile.
pub fn place_run(grid: &mut Grid, points: &[TileRef]) -> Option<RegionId> {
    let run = sorted_run(points);
    let first = *run.first()?;
    grid.tile(first).filter(|tile| !tile.is_empty())?;

    let orientation = run_axis(&run);
    let id = grid.insert_region(Region::new(run, orientation, subdivision(grid, first)));
    stamp(grid, id, first);
    log::debug!("New region {id} anchored at {first}");
    Some(id)
}

fn sorted_run(points: &[TileRef]) -> Vec<TileRef> {
    let mut run = points.to_vec();
    match run_axis(&run) {
        Some(Orientation::Vertical) => run.sort_by_key(|tile| tile.row),
        Some(Orientation::Horizontal) => run.sort_by_key(|tile| tile.col),
        None => {}
    }
    run.dedup();
    run
}

fn run_axis(run: &[TileRef]) -> Option<Orientation> {
    match run {
        [a, b, ..] => Orientation::between(*a, *b),
        _ => None,
    }
}

fn subdivision(grid: &Grid, at: TileRef) -> [u32; 2] {
    grid.tile(at)
        .and_then(TileInstance::signature)
        .map_or([1, 1], Signature::subdivision)
}

/// Neighbour of `probe` that the run may merge with, plus its live region
fn candidate(
    grid: &Grid,
    probe: TileRef,
    direction: Direction,
    kind: BlockKind,
    run: &[TileRef],
) -> Option<(TileRef, Option<RegionId>)> {
    let neighbour = probe.step(direction)?;
    if run.contains(&neighbour) {
        return None;
    }

    let tile = grid.tile(neighbour)?;
    if tile.is_empty() || tile.kind() != kind || !tile.classification().merges() {
        return None;
    }

    match tile.region().and_then(|id| grid.region(id).map(|r| (id, r))) {
        Some((id, region)) => {
            let compatible = !region.is_trigger()
                && region
                    .orientation()
                    .is_none_or(|axis| axis == direction.orientation());
            compatible.then_some((neighbour, Some(id)))
        }
        None => Some((neighbour, None)),
    }
}

fn extend(grid: &mut Grid, id: RegionId, tiles: &[TileRef], axis: Orientation) {
    if let Some(region) = grid.regions.get_mut(id) {
        region.members.extend_from_slice(tiles);
        region.orientation = Some(axis);
        region.sort_members();
    }
    grid.refresh_region(id);
}

fn absorb(grid: &mut Grid, id: RegionId, other: RegionId, axis: Orientation) {
    let Some(absorbed) = grid.regions.remove(other) else {
        return;
    };
    log::debug!(
        "Region {other} ({} members) absorbed into {id}",
        absorbed.len()
    );
    extend(grid, id, absorbed.members(), axis);
}

/// Copy the run's classification onto its region
fn stamp(grid: &mut Grid, id: RegionId, from: TileRef) {
    let Some(classification) = grid.tile(from).map(TileInstance::classification) else {
        return;
    };
    if let Some(region) = grid.regions.get_mut(id) {
        region.trigger = false;
        region.tag = classification;
        region.interaction = classification.policy().interaction;
    }
}
