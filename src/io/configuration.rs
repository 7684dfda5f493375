//! Editor constants and runtime configuration defaults

// Layer stack
/// Number of tile layers stacked in every cell (layer 0 is reserved)
pub const MAX_LAYERS: usize = 10;
/// Layer painted when no layer is requested and none already holds the kind
pub const DEFAULT_ACTIVE_LAYER: usize = 1;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;
/// Maximum number of tile slots (rows x cols x layers) in one grid
pub const MAX_GRID_TILES: usize = 2_000_000;

// Geometry
/// Collider extent of one whole tile in world units (width, height)
pub const COLLIDER_UNIT: [f32; 2] = [0.89, 0.83];
/// World size of one grid cell (width, height)
pub const DEFAULT_CELL_SIZE: [f32; 2] = [0.9, 0.84];
/// World position of the lower-left corner of cell (0, 0)
pub const DEFAULT_ORIGIN: [f32; 2] = [0.0, 0.0];

// Persistence
/// Schema version written into level documents
pub const DOCUMENT_VERSION: u32 = 1;
/// Extension of level documents
pub const LEVEL_EXTENSION: &str = "json";
/// Suffix added to re-saved level filenames
pub const NORMALIZED_SUFFIX: &str = "_normalized";
/// Suffix added to preview image filenames
pub const PREVIEW_SUFFIX: &str = "_preview";

// Default values for configurable parameters
/// Fixed seed for reproducible fill variants
pub const DEFAULT_SEED: u64 = 42;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Preview output
/// Edge length in pixels of one cell in exported previews
pub const PREVIEW_CELL_PIXELS: u32 = 8;
