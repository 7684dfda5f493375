//! Painting, erasing, line drawing and interaction on the grid
//!
//! Every edit first resolves and validates its target, then mutates. A
//! rejected edit returns an error and leaves the grid exactly as it was.

use std::mem;

use crate::algorithm::merge::find_pairs;
use crate::algorithm::region::Region;
use crate::algorithm::split::detach;
use crate::catalog::classification::{Interaction, RegionPolicy, Side};
use crate::catalog::palette::Brush;
use crate::io::configuration::MAX_LAYERS;
use crate::io::error::{EditorError, Result};
use crate::spatial::cell::GridCell;
use crate::spatial::coords::{Direction, Directions, Orientation, Point, TileRef};
use crate::spatial::grid::{Grid, GridEvent};
use crate::spatial::tile::{BlockKind, Signature, TileInstance};

impl Grid {
    /// Paint one tile and run its classification side effect
    ///
    /// With `layer` unset the brush lands on the first layer of the cell that
    /// already holds its kind, otherwise on the active layer.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds`, `LayerOutOfRange`, `LayerConflict` or
    /// `GroundConflict` without touching the grid
    pub fn paint(&mut self, at: Point, layer: Option<usize>, brush: &Brush) -> Result<TileRef> {
        let target = self.resolve_target(at, layer, brush.kind(), false)?;
        if self.write_tile(target, brush) {
            self.apply_policy(target, Directions::ALL);
        }
        Ok(target)
    }

    /// Clear one tile, detaching it from its region
    ///
    /// With `layer` unset the topmost painted layer is erased.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds`, `LayerOutOfRange` or `EmptyTile`
    pub fn erase(&mut self, at: Point, layer: Option<usize>) -> Result<TileRef> {
        let cell = self.bounded_cell(at)?;
        let layer = match layer {
            Some(layer) => Self::check_layer(layer)?,
            None => cell
                .topmost_painted()
                .ok_or(EditorError::EmptyTile {
                    at: at.at_layer(self.active_layer()),
                })?,
        };

        let target = at.at_layer(layer);
        if self.tile(target).is_none_or(TileInstance::is_empty) {
            return Err(EditorError::EmptyTile { at: target });
        }
        self.clear_tile(target);
        Ok(target)
    }

    /// Paint a straight line from `from` (exclusive) to `to` (inclusive)
    ///
    /// Tiles failing a paint check are skipped. Consecutive merging tiles are
    /// merged as one run that only looks back towards `from`.
    ///
    /// # Errors
    ///
    /// Returns `NotAligned` if the endpoints share neither a row nor a column,
    /// `OutOfBounds` for an endpoint outside the grid, or `LayerOutOfRange`
    pub fn draw_line(
        &mut self,
        from: Point,
        to: Point,
        layer: Option<usize>,
        brush: &Brush,
    ) -> Result<Vec<TileRef>> {
        self.check_bounds(from)?;
        self.check_bounds(to)?;
        if let Some(layer) = layer {
            Self::check_layer(layer)?;
        }
        if from == to {
            return Ok(Vec::new());
        }
        let direction = Direction::towards(from, to).ok_or(EditorError::NotAligned { from, to })?;

        let merging = brush.classification.merges();
        let mut painted = Vec::new();
        let mut runs: Vec<Vec<TileRef>> = Vec::new();
        let mut run: Vec<TileRef> = Vec::new();

        let mut cell = from;
        while cell != to {
            let Some(next) = cell.step(direction) else {
                break;
            };
            cell = next;

            let target = match self.resolve_target(cell, layer, brush.kind(), false) {
                Ok(target) => target,
                Err(error) => {
                    log::warn!("Line skipped ({},{}): {error}", cell.row, cell.col);
                    runs.push(mem::take(&mut run));
                    continue;
                }
            };

            let changed = self.write_tile(target, brush);
            painted.push(target);
            if changed && merging {
                if run.last().is_some_and(|last| last.layer != target.layer) {
                    runs.push(mem::take(&mut run));
                }
                run.push(target);
            } else {
                runs.push(mem::take(&mut run));
                if changed {
                    self.apply_policy(target, Directions::ALL);
                }
            }
        }
        runs.push(run);

        let back = direction.opposite().flag();
        for pending in runs.iter().filter(|pending| !pending.is_empty()) {
            find_pairs(self, pending, back);
        }
        Ok(painted)
    }

    /// Fire the interaction of the region owning `at`
    ///
    /// Pickups that are consumed on interaction have all their tiles erased.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds`, `EmptyTile`, or `NoRegion` for a tile without a
    /// live region
    pub fn interact(&mut self, at: TileRef) -> Result<Interaction> {
        self.check_bounds(at.cell())?;
        let tile = self.tile(at).ok_or(EditorError::LayerOutOfRange {
            layer: at.layer,
            max_layers: MAX_LAYERS,
        })?;
        if tile.is_empty() {
            return Err(EditorError::EmptyTile { at });
        }
        let (id, region) = self.region_of(at).ok_or(EditorError::NoRegion { at })?;

        let interaction = region.interaction();
        let consumed = region.tag().policy().consumed_on_interact;
        let members = consumed.then(|| region.members().to_vec());

        self.emit(GridEvent::Interacted {
            at,
            region: id,
            interaction,
        });
        for member in members.unwrap_or_default() {
            self.clear_tile(member);
        }
        Ok(interaction)
    }

    fn bounded_cell(&self, at: Point) -> Result<&GridCell> {
        self.cell(at).ok_or(EditorError::OutOfBounds {
            cell: at,
            grid_dimensions: self.dimensions(),
        })
    }

    /// Validate a paint of `kind` at `at` and pick its layer
    ///
    /// With `replace` set a differently-kinded tile is overwritten instead of
    /// rejected.
    pub(crate) fn resolve_target(
        &self,
        at: Point,
        layer: Option<usize>,
        kind: BlockKind,
        replace: bool,
    ) -> Result<TileRef> {
        let cell = self.bounded_cell(at)?;
        let layer = match layer {
            Some(layer) => Self::check_layer(layer)?,
            None => cell.find_kind(kind).unwrap_or(self.active_layer()),
        };
        let target = at.at_layer(layer);

        let existing = cell.layer(layer).map_or(BlockKind::None, TileInstance::kind);
        if !replace && existing != BlockKind::None && existing != kind {
            return Err(EditorError::LayerConflict {
                at: target,
                existing,
                requested: kind,
            });
        }

        if kind == BlockKind::Ground
            && let Some(existing_layer) = cell.find_kind(BlockKind::Ground)
            && existing_layer != layer
        {
            return Err(EditorError::GroundConflict {
                cell: at,
                existing_layer,
            });
        }

        Ok(target)
    }

    /// Write the brush into a validated tile
    ///
    /// Returns `false` when only the sprite variant changed and the tile kept
    /// its region, so no side effect needs to run.
    pub(crate) fn write_tile(&mut self, target: TileRef, brush: &Brush) -> bool {
        let Some(tile) = self.tile(target) else {
            return false;
        };
        let policy = brush.classification.policy();
        let same_role = !tile.is_empty()
            && tile.kind() == brush.kind()
            && tile.classification() == brush.classification;
        let same_side = !policy.spawn_anchor
            || tile.signature().map(|s| s.color) == Some(brush.signature.color);
        let settled = same_role
            && same_side
            && (tile.region().is_some() || policy.region == RegionPolicy::Detach);

        if !settled && !tile.is_empty() {
            self.strip(target);
        }

        let placement = self
            .layout()
            .placement(target.cell(), brush.signature.subdivision());
        if let Some(slot) = self.tile_mut(target) {
            slot.signature = Some(brush.signature);
            slot.classification = brush.classification;
            slot.placement = placement;
        }

        if settled && let Some((id, _)) = self.region_of(target) {
            self.refresh_region(id);
        }
        !settled
    }

    /// Run the classification side effect of a freshly written tile
    pub(crate) fn apply_policy(&mut self, target: TileRef, mask: Directions) {
        let Some(tile) = self.tile(target) else {
            return;
        };
        let classification = tile.classification();
        let color = tile.signature().map(|signature| signature.color);
        let amount = tile.signature().map_or([1, 1], Signature::subdivision);
        let policy = classification.policy();

        let trigger = match policy.region {
            RegionPolicy::Detach => None,
            RegionPolicy::Merge => {
                find_pairs(self, &[target], mask);
                None
            }
            RegionPolicy::Trigger => Some(true),
            RegionPolicy::Solo => Some(false),
        };

        if let Some(trigger) = trigger {
            let orientation = trigger.then_some(Orientation::Horizontal);
            let mut region = Region::new(vec![target], orientation, amount);
            region.trigger = trigger;
            region.tag = classification;
            region.interaction = policy.interaction;
            self.insert_region(region);
        }

        if policy.spawn_anchor
            && let Some(side) = color.and_then(Side::from_color)
        {
            self.register_anchor(target, side);
        }
    }

    /// Undo every side effect of a painted tile, keeping its signature
    fn strip(&mut self, target: TileRef) {
        if self.anchors.contains(target) {
            self.forget_anchor(target);
        }
        detach(self, target);
    }

    /// Erase a tile and all of its side effects
    pub(crate) fn clear_tile(&mut self, target: TileRef) {
        self.strip(target);
        if let Some(tile) = self.tile_mut(target) {
            tile.clear();
        }
    }
}
