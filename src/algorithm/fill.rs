//! Flood fill over same-family tiles

use bitvec::prelude::*;
use rand::Rng;

use crate::catalog::palette::Brush;
use crate::io::error::Result;
use crate::spatial::coords::{Direction, Directions, Point, TileRef};
use crate::spatial::grid::Grid;
use crate::spatial::tile::{BlockKind, Signature};

impl Grid {
    /// Repaint the 4-connected area sharing the seed tile's family
    ///
    /// Two tiles are in the same family when they differ at most in sprite
    /// variant, or are both empty. Each filled tile gets a random variant and
    /// is painted (and merged) on its own. Tiles the brush cannot be painted on
    /// stop the fill at that cell. Filling an area with its own family does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` for a seed outside the grid or `LayerOutOfRange`
    /// for an explicit non-paintable layer
    pub fn fill<R: Rng + ?Sized>(
        &mut self,
        at: Point,
        layer: Option<usize>,
        brush: &Brush,
        rng: &mut R,
    ) -> Result<Vec<TileRef>> {
        self.check_bounds(at)?;
        let explicit = layer.map(Self::check_layer).transpose()?;
        let seed_layer = explicit.unwrap_or_else(|| {
            self.cell(at)
                .and_then(|cell| cell.find_kind(brush.kind()))
                .unwrap_or(self.active_layer())
        });

        let seed = self
            .tile(at.at_layer(seed_layer))
            .and_then(|tile| tile.signature().copied());
        if seed.is_some_and(|seed| seed.same_family(&brush.signature)) {
            return Ok(Vec::new());
        }
        let seed_kind = seed.map_or(BlockKind::None, |seed| seed.kind);

        let cols = self.cols();
        let mut visited = bitvec![0; self.rows() * cols];
        visited.set(at.row * cols + at.col, true);
        let mut stack = vec![at];
        let mut filled = Vec::new();

        while let Some(cell) = stack.pop() {
            let cell_layer = explicit.unwrap_or_else(|| {
                self.cell(cell)
                    .and_then(|c| c.find_kind(seed_kind))
                    .unwrap_or(seed_layer)
            });
            let current = self
                .tile(cell.at_layer(cell_layer))
                .and_then(|tile| tile.signature().copied());
            if !same_family(seed.as_ref(), current.as_ref()) {
                continue;
            }

            let target = match self.resolve_target(cell, Some(cell_layer), brush.kind(), true) {
                Ok(target) => target,
                Err(error) => {
                    log::warn!("Fill stopped at ({},{}): {error}", cell.row, cell.col);
                    continue;
                }
            };

            let variant = if brush.variants > 1 {
                rng.random_range(0..brush.variants)
            } else {
                0
            };
            let stroke = brush.with_index(variant);
            if self.write_tile(target, &stroke) {
                self.apply_policy(target, Directions::ALL);
            }
            filled.push(target);

            for direction in Direction::SCAN_ORDER {
                let Some(next) = cell.step(direction).filter(|next| self.contains(*next)) else {
                    continue;
                };
                let index = next.row * cols + next.col;
                if visited.get(index).is_some_and(|seen| !*seen) {
                    visited.set(index, true);
                    stack.push(next);
                }
            }
        }

        log::debug!("Filled {} tiles from ({},{})", filled.len(), at.row, at.col);
        Ok(filled)
    }
}

fn same_family(seed: Option<&Signature>, tile: Option<&Signature>) -> bool {
    match (seed, tile) {
        (Some(seed), Some(tile)) => seed.same_family(tile),
        (None, None) => true,
        _ => false,
    }
}
