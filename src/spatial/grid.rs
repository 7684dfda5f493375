//! The level grid owning cells, regions and the start-point registry
//!
//! `Grid` is a plain owned value. Editing operations live next to the
//! algorithms that implement them (`algorithm::paint`, `algorithm::fill`,
//! ...) as further `impl Grid` blocks; this module holds the storage,
//! bounds checks and world placement shared by all of them.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::algorithm::anchors::StartPoints;
use crate::algorithm::region::Region;
use crate::algorithm::table::{RegionId, RegionTable};
use crate::catalog::classification::{Interaction, Side};
use crate::io::configuration::{
    COLLIDER_UNIT, DEFAULT_ACTIVE_LAYER, DEFAULT_CELL_SIZE, DEFAULT_ORIGIN, MAX_GRID_DIMENSION,
    MAX_GRID_TILES, MAX_LAYERS,
};
use crate::io::error::{EditorError, Result, invalid_parameter, malformed};
use crate::spatial::cell::GridCell;
use crate::spatial::coords::{Point, TileRef};
use crate::spatial::tile::TileInstance;

/// World-space layout of a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    /// Size of one cell in world units
    pub cell_size: [f32; 2],
    /// World position of the bottom-left corner of cell (0, 0)
    pub origin: [f32; 2],
    /// Collider extent of one unsubdivided tile
    pub collider_unit: [f32; 2],
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            origin: DEFAULT_ORIGIN,
            collider_unit: COLLIDER_UNIT,
        }
    }
}

impl GridLayout {
    /// Centre of the first sub-cell of a tile with the given subdivision
    pub fn placement(&self, cell: Point, amount: [u32; 2]) -> [f32; 2] {
        let ux = amount[0].max(1) as f32;
        let uy = amount[1].max(1) as f32;
        [
            self.origin[0] + (cell.col as f32 * ux + 0.5) * self.cell_size[0] / ux,
            self.origin[1] + (cell.row as f32 * uy + 0.5) * self.cell_size[1] / uy,
        ]
    }
}

/// Notification for the level controller, drained with [`Grid::take_events`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    /// A start point was painted
    SpawnAnchorAdded {
        /// Tile holding the anchor
        at: TileRef,
        /// Player side it spawns
        side: Side,
    },
    /// A start point was erased
    SpawnAnchorRemoved {
        /// Tile that held the anchor
        at: TileRef,
        /// Player side it spawned
        side: Side,
    },
    /// A region's interaction fired
    Interacted {
        /// Tile that was touched
        at: TileRef,
        /// Region that owns the tile
        region: RegionId,
        /// Interaction that fired
        interaction: Interaction,
    },
}

/// Rectangular layered tile grid with its collider regions
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Array2<GridCell>,
    pub(crate) regions: RegionTable,
    pub(crate) anchors: StartPoints,
    active_layer: usize,
    layout: GridLayout,
    catalog: Option<String>,
    events: Vec<GridEvent>,
}

impl Grid {
    /// Create an empty grid with the default layout
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if either dimension is zero or larger than
    /// `MAX_GRID_DIMENSION`, or if the layer stack would exceed `MAX_GRID_TILES`
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::with_layout(rows, cols, GridLayout::default())
    }

    /// Create an empty grid with an explicit layout
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for out-of-range dimensions, a grid over the
    /// `MAX_GRID_TILES` budget, or a layout with non-positive cell or collider
    /// extents
    pub fn with_layout(rows: usize, cols: usize, layout: GridLayout) -> Result<Self> {
        for (parameter, value) in [("rows", rows), ("cols", cols)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
                ));
            }
        }
        if rows.saturating_mul(cols).saturating_mul(MAX_LAYERS) > MAX_GRID_TILES {
            return Err(invalid_parameter(
                "rows x cols",
                &format!("{rows}x{cols}"),
                &format!("more than {MAX_GRID_TILES} tiles across {MAX_LAYERS} layers"),
            ));
        }
        let extents = layout.cell_size.iter().chain(&layout.collider_unit);
        if extents.copied().any(|v| !v.is_finite() || v <= 0.0) {
            return Err(invalid_parameter(
                "layout",
                &format!("{layout:?}"),
                &"cell and collider extents must be positive",
            ));
        }

        let cells = Array2::from_shape_fn((rows, cols), |(row, col)| {
            let position = Point::new(row, col);
            GridCell::new(position, layout.placement(position, [1, 1]))
        });

        Ok(Self {
            cells,
            regions: RegionTable::new(),
            anchors: StartPoints::new(),
            active_layer: DEFAULT_ACTIVE_LAYER,
            layout,
            catalog: None,
            events: Vec::new(),
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// World layout
    pub const fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Name of the sprite catalog the level was authored with
    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    /// Record the sprite catalog name
    pub fn set_catalog(&mut self, catalog: Option<String>) {
        self.catalog = catalog;
    }

    /// Layer painted when no layer is given and no match exists
    pub const fn active_layer(&self) -> usize {
        self.active_layer
    }

    /// Change the default paint layer
    ///
    /// # Errors
    ///
    /// Returns `LayerOutOfRange` unless `layer` is a paintable layer
    pub fn set_active_layer(&mut self, layer: usize) -> Result<()> {
        self.active_layer = Self::check_layer(layer)?;
        Ok(())
    }

    /// Whether `cell` lies inside the grid
    pub fn contains(&self, cell: Point) -> bool {
        cell.row < self.rows() && cell.col < self.cols()
    }

    /// Fail with `OutOfBounds` unless `cell` lies inside the grid
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` for coordinates past the last row or column
    pub fn check_bounds(&self, cell: Point) -> Result<()> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(EditorError::OutOfBounds {
                cell,
                grid_dimensions: self.dimensions(),
            })
        }
    }

    /// Fail with `LayerOutOfRange` unless `layer` is paintable
    ///
    /// # Errors
    ///
    /// Returns `LayerOutOfRange` for layer 0 and layers past `MAX_LAYERS`
    pub const fn check_layer(layer: usize) -> Result<usize> {
        if layer >= 1 && layer < MAX_LAYERS {
            Ok(layer)
        } else {
            Err(EditorError::LayerOutOfRange {
                layer,
                max_layers: MAX_LAYERS,
            })
        }
    }

    /// Cell at a coordinate
    pub fn cell(&self, cell: Point) -> Option<&GridCell> {
        self.cells.get([cell.row, cell.col])
    }

    /// Tile slot at a coordinate and layer
    pub fn tile(&self, at: TileRef) -> Option<&TileInstance> {
        self.cell(at.cell()).and_then(|cell| cell.layer(at.layer))
    }

    pub(crate) fn tile_mut(&mut self, at: TileRef) -> Option<&mut TileInstance> {
        self.cells
            .get_mut([at.row, at.col])
            .and_then(|cell| cell.layer_mut(at.layer))
    }

    /// Cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }

    /// Every painted tile, row-major then by layer
    pub fn painted_tiles(&self) -> impl Iterator<Item = &TileInstance> {
        self.cells.iter().flat_map(GridCell::painted)
    }

    /// Region table
    pub const fn regions(&self) -> &RegionTable {
        &self.regions
    }

    /// Resolve a region id
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Region owning the tile at `at`
    pub fn region_of(&self, at: TileRef) -> Option<(RegionId, &Region)> {
        let id = self.tile(at)?.region?;
        self.regions.get(id).map(|region| (id, region))
    }

    /// Start-point registry
    pub const fn start_points(&self) -> &StartPoints {
        &self.anchors
    }

    /// Drain pending events in emission order
    pub fn take_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GridEvent) {
        self.events.push(event);
    }

    /// Store a region and point its members at it
    pub(crate) fn insert_region(&mut self, region: Region) -> RegionId {
        let id = self.regions.insert(region);
        self.refresh_region(id);
        id
    }

    /// Recompute anchor, geometry and member back-references of a region
    pub(crate) fn refresh_region(&mut self, id: RegionId) {
        let unit = self.layout.collider_unit;
        let Some(region) = self.regions.get_mut(id) else {
            return;
        };
        region.reanchor();
        let members = region.members.clone();
        let orientation = region.orientation;
        let anchor = region
            .head()
            .and_then(|head| self.tile(head))
            .map_or([0.0, 0.0], TileInstance::placement);

        if let Some(resized) = self.regions.get_mut(id) {
            resized.resize(unit, anchor);
        }
        for member in members {
            if let Some(tile) = self.tile_mut(member) {
                tile.region = Some(id);
                tile.orientation = orientation;
            }
        }
    }

    /// Check the structural invariants linking tiles and regions
    ///
    /// Every region must be a non-empty gap-free run whose members point back
    /// at it, every tile's region must exist and list the tile, and every
    /// merging tile must belong to a region.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` describing the first violation found
    pub fn audit(&self) -> Result<()> {
        for (id, region) in self.regions.iter() {
            if region.is_empty() {
                return Err(malformed(&format!("region {id} has no members")));
            }
            if !region.is_contiguous() {
                return Err(malformed(&format!(
                    "region {id} is not a straight gap-free run"
                )));
            }
            if region.head_idx() >= region.len() {
                return Err(malformed(&format!(
                    "region {id} anchor index {} is past its {} members",
                    region.head_idx(),
                    region.len()
                )));
            }
            for &member in region.members() {
                let owner = self.tile(member).and_then(TileInstance::region);
                if owner != Some(id) {
                    return Err(malformed(&format!(
                        "region {id} lists {member} which does not point back"
                    )));
                }
            }
        }

        for tile in self.painted_tiles() {
            match tile.region() {
                Some(id) => {
                    let listed = self
                        .regions
                        .get(id)
                        .is_some_and(|region| region.contains(tile.position()));
                    if !listed {
                        return Err(malformed(&format!(
                            "tile {} claims region {id} which does not list it",
                            tile.position()
                        )));
                    }
                }
                None if tile.classification().merges() => {
                    return Err(malformed(&format!(
                        "merging tile {} has no region",
                        tile.position()
                    )));
                }
                None => {}
            }
        }

        Ok(())
    }
}
