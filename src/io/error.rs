//! Error types and context management for grid editing and persistence

use std::fmt;
use std::path::PathBuf;

use crate::spatial::coords::{Point, TileRef};
use crate::spatial::tile::{BlockKind, ColorType};

/// Main error type for all editing and persistence operations
#[derive(Debug)]
pub enum EditorError {
    /// Target cell lies outside the grid extent
    OutOfBounds {
        /// Requested cell
        cell: Point,
        /// Current grid dimensions (rows, cols)
        grid_dimensions: (usize, usize),
    },

    /// Requested layer is reserved or beyond the layer stack
    LayerOutOfRange {
        /// The invalid layer
        layer: usize,
        /// Number of layers per cell
        max_layers: usize,
    },

    /// Target tile already holds a different block kind
    LayerConflict {
        /// Tile that rejected the paint
        at: TileRef,
        /// Kind currently painted there
        existing: BlockKind,
        /// Kind that was requested
        requested: BlockKind,
    },

    /// Cell already holds a ground tile on another layer
    GroundConflict {
        /// Cell that rejected the paint
        cell: Point,
        /// Layer holding the existing ground tile
        existing_layer: usize,
    },

    /// Line endpoints share neither a row nor a column
    NotAligned {
        /// Line start
        from: Point,
        /// Line end
        to: Point,
    },

    /// Operation needs a painted tile but the slot is empty
    EmptyTile {
        /// The empty tile slot
        at: TileRef,
    },

    /// Tile does not belong to any region
    NoRegion {
        /// The detached tile
        at: TileRef,
    },

    /// Sprite catalog has no entry for the requested signature
    UnknownBrush {
        /// Requested palette color
        color: ColorType,
        /// Requested block kind
        kind: BlockKind,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Level document parsed but describes an impossible grid
    MalformedDocument {
        /// Description of the inconsistency
        reason: String,
    },

    /// Level document is not valid JSON for the expected schema
    Serialization {
        /// Path of the document
        path: PathBuf,
        /// Underlying serde error
        source: serde_json::Error,
    },

    /// Failed to save the preview image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                cell,
                grid_dimensions,
            } => {
                write!(
                    f,
                    "Cell ({},{}) is outside the grid (size {}x{})",
                    cell.row, cell.col, grid_dimensions.0, grid_dimensions.1
                )
            }
            Self::LayerOutOfRange { layer, max_layers } => {
                write!(
                    f,
                    "Layer {layer} is not paintable (valid layers are 1..{max_layers})"
                )
            }
            Self::LayerConflict {
                at,
                existing,
                requested,
            } => {
                write!(
                    f,
                    "Tile {at} already holds {existing:?}, cannot paint {requested:?}"
                )
            }
            Self::GroundConflict {
                cell,
                existing_layer,
            } => {
                write!(
                    f,
                    "Cell ({},{}) already holds ground on layer {existing_layer}",
                    cell.row, cell.col
                )
            }
            Self::NotAligned { from, to } => {
                write!(
                    f,
                    "Line from ({},{}) to ({},{}) is neither horizontal nor vertical",
                    from.row, from.col, to.row, to.col
                )
            }
            Self::EmptyTile { at } => write!(f, "Tile {at} is empty"),
            Self::NoRegion { at } => write!(f, "Tile {at} does not belong to a region"),
            Self::UnknownBrush { color, kind } => {
                write!(f, "No sprites registered for {color:?} {kind:?}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::MalformedDocument { reason } => {
                write!(f, "Malformed level document: {reason}")
            }
            Self::Serialization { path, source } => {
                write!(
                    f,
                    "Failed to parse level document '{}': {source}",
                    path.display()
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialization { source, .. } => Some(source),
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl EditorError {
    /// Whether the error is a rejected edit rather than a failure
    ///
    /// Rejected edits leave the grid untouched and are routinely ignored by
    /// interactive callers.
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::OutOfBounds { .. }
                | Self::LayerOutOfRange { .. }
                | Self::LayerConflict { .. }
                | Self::GroundConflict { .. }
                | Self::NotAligned { .. }
                | Self::EmptyTile { .. }
        )
    }
}

/// Convenience type alias for editor results
pub type Result<T> = std::result::Result<T, EditorError>;

impl From<std::io::Error> for EditorError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> EditorError {
    EditorError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a malformed document error
pub fn malformed(reason: &impl ToString) -> EditorError {
    EditorError::MalformedDocument {
        reason: reason.to_string(),
    }
}
