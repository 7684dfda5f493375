//! Grid cell holding the depth-ordered tile stack

use crate::io::configuration::MAX_LAYERS;
use crate::spatial::coords::Point;
use crate::spatial::tile::{BlockKind, TileInstance};

/// One (row, column) coordinate with a fixed stack of `MAX_LAYERS` slots
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    position: Point,
    layers: Vec<TileInstance>,
}

impl GridCell {
    /// Create a cell whose slots are all empty
    pub fn new(position: Point, placement: [f32; 2]) -> Self {
        let layers = (0..MAX_LAYERS)
            .map(|layer| TileInstance::empty(position.at_layer(layer), placement))
            .collect();
        Self { position, layers }
    }

    /// Coordinate of this cell
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Slot at `layer`
    pub fn layer(&self, layer: usize) -> Option<&TileInstance> {
        self.layers.get(layer)
    }

    pub(crate) fn layer_mut(&mut self, layer: usize) -> Option<&mut TileInstance> {
        self.layers.get_mut(layer)
    }

    /// All slots, layer 0 first
    pub fn layers(&self) -> &[TileInstance] {
        &self.layers
    }

    /// Painted slots in layer order
    pub fn painted(&self) -> impl Iterator<Item = &TileInstance> {
        self.layers.iter().filter(|tile| !tile.is_empty())
    }

    /// First paintable layer already holding `kind`
    pub fn find_kind(&self, kind: BlockKind) -> Option<usize> {
        self.layers
            .iter()
            .skip(1)
            .find(|tile| !tile.is_empty() && tile.kind() == kind)
            .map(|tile| tile.position().layer)
    }

    /// Highest painted layer
    pub fn topmost_painted(&self) -> Option<usize> {
        self.layers
            .iter()
            .rev()
            .find(|tile| !tile.is_empty())
            .map(|tile| tile.position().layer)
    }

    /// Whether no layer is painted
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(TileInstance::is_empty)
    }
}
