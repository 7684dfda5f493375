//! Level document format and grid persistence
//!
//! Levels are stored as camelCase JSON. Only painted tiles are written. A
//! document is validated completely before any grid is built from it, so a
//! bad file never produces a half-loaded level.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::algorithm::region::{Geometry, Region};
use crate::catalog::classification::{Classification, Interaction, Side};
use crate::io::configuration::{DOCUMENT_VERSION, MAX_LAYERS};
use crate::io::error::{EditorError, Result, malformed};
use crate::spatial::coords::{Orientation, Point, TileRef};
use crate::spatial::grid::{Grid, GridLayout};
use crate::spatial::tile::Signature;

/// Serialized level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDocument {
    /// Format version
    pub version: u32,
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Sprite catalog the level was authored with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    /// World layout
    #[serde(default)]
    pub layout: GridLayout,
    /// Cells holding at least one painted tile, row-major
    pub cells: Vec<CellRecord>,
    /// Regions in slot order
    pub regions: Vec<RegionRecord>,
    /// Spawn anchors, rebuilt from tiles when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_points: Option<Vec<StartPointRecord>>,
}

/// Painted tiles of one cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
    /// Painted layers
    pub blocks: Vec<BlockRecord>,
}

/// One painted tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    /// Layer index
    pub layer: usize,
    /// Painted signature
    pub signature: Signature,
    /// Classification marker
    #[serde(default)]
    pub classification: Classification,
    /// Orientation of the owning region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    /// Persisted id of the owning region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    /// World position of the sprite
    pub placement: [f32; 2],
}

/// One collider region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRecord {
    /// Persisted id (slot index)
    pub id: String,
    /// Display name
    pub name: String,
    /// Box extent
    pub size: [f32; 2],
    /// Box centre offset
    pub offset: [f32; 2],
    /// Anchor world position
    pub position: [f32; 2],
    /// Trigger volume flag
    pub is_trigger: bool,
    /// Growth axis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    /// Index of the anchor in `members`
    pub head_idx: usize,
    /// Classification tag
    #[serde(default)]
    pub tag: Classification,
    /// Interaction code
    #[serde(default)]
    pub interaction: u8,
    /// Member tiles in axis order
    pub members: Vec<TileRef>,
}

/// One spawn anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPointRecord {
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
    /// Layer index
    pub layer: usize,
    /// Player side
    pub side: Side,
}

impl LevelDocument {
    /// Read a document from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` if the file cannot be read and `Serialization` if
    /// it is not a level document
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EditorError::FileSystem {
            path: path.to_path_buf(),
            operation: "read level",
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| EditorError::Serialization {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the document as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `Serialization` or `FileSystem` on failure
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| EditorError::Serialization {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, content).map_err(|e| EditorError::FileSystem {
            path: path.to_path_buf(),
            operation: "write level",
            source: e,
        })
    }
}

impl Grid {
    /// Snapshot the grid as a document
    pub fn to_document(&self) -> LevelDocument {
        let cells = self
            .cells()
            .filter(|cell| !cell.is_empty())
            .map(|cell| CellRecord {
                row: cell.position().row,
                col: cell.position().col,
                blocks: cell
                    .painted()
                    .filter_map(|tile| {
                        Some(BlockRecord {
                            layer: tile.position().layer,
                            signature: *tile.signature()?,
                            classification: tile.classification(),
                            orientation: tile.orientation(),
                            region_id: tile.region().as_ref().map(ToString::to_string),
                            placement: tile.placement(),
                        })
                    })
                    .collect(),
            })
            .collect();

        let regions = self
            .regions()
            .iter()
            .map(|(id, region)| {
                let geometry = region.geometry();
                RegionRecord {
                    id: id.to_string(),
                    name: region.name().to_owned(),
                    size: geometry.size,
                    offset: geometry.offset,
                    position: geometry.position,
                    is_trigger: region.is_trigger(),
                    orientation: region.orientation(),
                    head_idx: region.head_idx(),
                    tag: region.tag(),
                    interaction: region.interaction().code(),
                    members: region.members().to_vec(),
                }
            })
            .collect();

        let start_points = self
            .start_points()
            .iter()
            .map(|(at, side)| StartPointRecord {
                row: at.row,
                col: at.col,
                layer: at.layer,
                side,
            })
            .collect();

        LevelDocument {
            version: DOCUMENT_VERSION,
            rows: self.rows(),
            cols: self.cols(),
            catalog: self.catalog().map(str::to_owned),
            layout: *self.layout(),
            cells,
            regions,
            start_points: Some(start_points),
        }
    }

    /// Build a grid from a document
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if the document is inconsistent in any way
    pub fn from_document(document: &LevelDocument) -> Result<Self> {
        if document.version == 0 || document.version > DOCUMENT_VERSION {
            return Err(malformed(&format!(
                "unsupported version {} (expected 1..={DOCUMENT_VERSION})",
                document.version
            )));
        }
        let mut grid = Self::with_layout(document.rows, document.cols, document.layout)
            .map_err(|e| malformed(&e))?;
        grid.set_catalog(document.catalog.clone());

        let blocks = collect_blocks(&grid, document)?;
        let regions = collect_regions(&grid, document, &blocks)?;

        for (&at, block) in &blocks {
            if let Some(tile) = grid.tile_mut(at) {
                tile.signature = Some(block.signature);
                tile.classification = block.classification;
                tile.orientation = block.orientation;
                tile.placement = block.placement;
            }
        }

        for (index, head, mut region) in regions {
            let head_idx = region.position_of(head).unwrap_or(0);
            let members = region.members.clone();
            region.head_idx = head_idx;
            let id = grid.regions.insert_at(index, region);
            for member in members {
                if let Some(tile) = grid.tile_mut(member) {
                    tile.region = Some(id);
                }
            }
        }

        match &document.start_points {
            Some(records) => {
                for record in records {
                    let at = TileRef::new(record.row, record.col, record.layer);
                    let is_anchor = blocks
                        .get(&at)
                        .is_some_and(|b| b.classification == Classification::StartPoint);
                    if !is_anchor {
                        return Err(malformed(&format!(
                            "start point {at} is not a start point tile"
                        )));
                    }
                    grid.anchors.record(at, record.side);
                }
            }
            None => {
                let anchors: Vec<_> = grid
                    .painted_tiles()
                    .filter(|tile| tile.classification() == Classification::StartPoint)
                    .filter_map(|tile| {
                        let side = Side::from_color(tile.signature()?.color)?;
                        Some((tile.position(), side))
                    })
                    .collect();
                for (at, side) in anchors {
                    grid.anchors.record(at, side);
                }
            }
        }

        log::info!(
            "Loaded {}x{} level with {} regions",
            grid.rows(),
            grid.cols(),
            grid.regions().len()
        );
        Ok(grid)
    }

    /// Load a level file
    ///
    /// # Errors
    ///
    /// Returns `FileSystem`, `Serialization` or `MalformedDocument`
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_document(&LevelDocument::from_json_file(path)?)
    }

    /// Replace this grid with a level file, keeping it untouched on failure
    ///
    /// # Errors
    ///
    /// Returns the load error, in which case `self` is unchanged
    pub fn reload_from(&mut self, path: &Path) -> Result<()> {
        *self = Self::load(path)?;
        Ok(())
    }

    /// Save the level to a file
    ///
    /// # Errors
    ///
    /// Returns `Serialization` or `FileSystem` on failure
    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_document().to_json_file(path)?;
        log::info!(
            "Saved {}x{} level with {} regions to {}",
            self.rows(),
            self.cols(),
            self.regions().len(),
            path.display()
        );
        Ok(())
    }
}

/// Validated painted tiles keyed by position
fn collect_blocks<'a>(
    grid: &Grid,
    document: &'a LevelDocument,
) -> Result<HashMap<TileRef, &'a BlockRecord>> {
    let mut blocks = HashMap::new();
    for cell in &document.cells {
        let position = Point::new(cell.row, cell.col);
        if !grid.contains(position) {
            return Err(malformed(&format!(
                "cell ({},{}) lies outside the {}x{} grid",
                cell.row, cell.col, document.rows, document.cols
            )));
        }
        for block in &cell.blocks {
            let at = position.at_layer(block.layer);
            if Grid::check_layer(block.layer).is_err() {
                return Err(malformed(&format!(
                    "tile {at} uses a layer outside 1..{MAX_LAYERS}"
                )));
            }
            if blocks.insert(at, block).is_some() {
                return Err(malformed(&format!("tile {at} is listed twice")));
            }
        }
    }
    Ok(blocks)
}

/// Validated regions as (slot, anchor member, region)
fn collect_regions(
    grid: &Grid,
    document: &LevelDocument,
    blocks: &HashMap<TileRef, &BlockRecord>,
) -> Result<Vec<(usize, TileRef, Region)>> {
    let mut seen_ids = HashSet::new();
    let mut owners: HashMap<TileRef, &str> = HashMap::new();
    let mut regions = Vec::with_capacity(document.regions.len());
    // A slot is only handed out while every lower one is live, and each live
    // region owns at least one painted tile
    let slot_limit = grid.rows() * grid.cols() * (MAX_LAYERS - 1);

    for record in &document.regions {
        let index: usize = record
            .id
            .parse()
            .map_err(|e| malformed(&format!("region id '{}' is not a slot index: {e}", record.id)))?;
        if index >= slot_limit || !seen_ids.insert(index) {
            return Err(malformed(&format!("region id '{}' is invalid or repeated", record.id)));
        }
        let interaction = Interaction::from_code(record.interaction).ok_or_else(|| {
            malformed(&format!(
                "region {index} has unknown interaction code {}",
                record.interaction
            ))
        })?;
        let head = *record.members.get(record.head_idx).ok_or_else(|| {
            malformed(&format!(
                "region {index} anchor index {} is past its {} members",
                record.head_idx,
                record.members.len()
            ))
        })?;

        for &member in &record.members {
            if !grid.contains(member.cell()) {
                return Err(malformed(&format!("region {index} member {member} is out of bounds")));
            }
            let points_back = blocks
                .get(&member)
                .and_then(|block| block.region_id.as_deref())
                == Some(record.id.as_str());
            if !points_back {
                return Err(malformed(&format!(
                    "region {index} member {member} does not point back at it"
                )));
            }
            if let Some(other) = owners.insert(member, record.id.as_str()) {
                return Err(malformed(&format!(
                    "tile {member} is claimed by regions {other} and {index}"
                )));
            }
        }

        let amount = blocks
            .get(&head)
            .map_or([1, 1], |block| block.signature.subdivision());
        let mut region = Region::new(record.members.clone(), record.orientation, amount);
        if !region.is_contiguous() {
            return Err(malformed(&format!(
                "region {index} is not a straight gap-free run"
            )));
        }
        region.trigger = record.is_trigger;
        region.tag = record.tag;
        region.interaction = interaction;
        region.geometry = Geometry {
            size: record.size,
            offset: record.offset,
            position: record.position,
        };
        regions.push((index, head, region));
    }

    for (at, block) in blocks {
        if let Some(id) = &block.region_id
            && owners.get(at).copied() != Some(id.as_str())
        {
            return Err(malformed(&format!(
                "tile {at} claims region '{id}' which does not list it"
            )));
        }
    }

    Ok(regions)
}
