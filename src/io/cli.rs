//! Command-line interface for creating, editing and checking level files

use crate::catalog::palette::{Palette, SpriteCatalog};
use crate::io::configuration::{
    DEFAULT_SEED, LEVEL_EXTENSION, NORMALIZED_SUFFIX, PREVIEW_CELL_PIXELS, PREVIEW_SUFFIX,
};
use crate::io::error::{EditorError, Result, invalid_parameter, malformed};
use crate::io::image::export_grid_as_png;
use crate::io::progress::ProgressManager;
use crate::spatial::coords::Point;
use crate::spatial::grid::Grid;
use crate::spatial::tile::{BlockKind, ColorType};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "tilecollider")]
#[command(
    author,
    version,
    about = "Edit layered platformer levels and keep their colliders merged"
)]
/// Command-line arguments for the level tool
pub struct Cli {
    /// Sprite catalog JSON file (defaults to the built-in palette)
    #[arg(long, global = true, value_name = "FILE")]
    pub palette: Option<PathBuf>,

    /// Suppress progress output and informational logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Level operations
#[derive(Subcommand)]
pub enum Command {
    /// Create an empty level file
    New {
        /// Level file to create
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
        /// Number of rows
        #[arg(long)]
        rows: usize,
        /// Number of columns
        #[arg(long)]
        cols: usize,
        /// Name of the sprite catalog recorded in the level
        #[arg(long)]
        catalog: Option<String>,
    },

    /// Validate a level file or a directory of them
    Check {
        /// Level file or directory to check
        #[arg(value_name = "TARGET")]
        target: PathBuf,
        /// Re-save each valid level next to the original
        #[arg(short, long)]
        normalize: bool,
        /// Export a PNG preview of each valid level
        #[arg(short, long)]
        preview: bool,
        /// Process levels even if their outputs exist
        #[arg(long)]
        no_skip: bool,
    },

    /// Paint one tile
    Paint(BrushArgs),

    /// Flood fill from one tile
    Fill(BrushArgs),

    /// Erase one tile
    Erase {
        /// Level file to edit
        #[arg(value_name = "LEVEL")]
        level: PathBuf,
        /// Row of the cell
        #[arg(long)]
        row: usize,
        /// Column of the cell
        #[arg(long)]
        col: usize,
        /// Layer to erase (defaults to the topmost painted layer)
        #[arg(long)]
        layer: Option<usize>,
    },

    /// Paint a straight line of tiles
    Line {
        /// Level file to edit
        #[arg(value_name = "LEVEL")]
        level: PathBuf,
        /// Start cell as ROW,COL (not painted)
        #[arg(long, value_parser = parse_cell)]
        from: Point,
        /// End cell as ROW,COL
        #[arg(long, value_parser = parse_cell)]
        to: Point,
        /// Palette color
        #[arg(long, value_parser = parse_color)]
        color: ColorType,
        /// Block kind
        #[arg(long, value_parser = parse_kind)]
        kind: BlockKind,
        /// Target layer (defaults to automatic selection)
        #[arg(long)]
        layer: Option<usize>,
        /// Sprite variant
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
}

/// Arguments shared by single-tile brush operations
#[derive(Args)]
pub struct BrushArgs {
    /// Level file to edit
    #[arg(value_name = "LEVEL")]
    pub level: PathBuf,
    /// Row of the cell
    #[arg(long)]
    pub row: usize,
    /// Column of the cell
    #[arg(long)]
    pub col: usize,
    /// Palette color
    #[arg(long, value_parser = parse_color)]
    pub color: ColorType,
    /// Block kind
    #[arg(long, value_parser = parse_kind)]
    pub kind: BlockKind,
    /// Target layer (defaults to automatic selection)
    #[arg(long)]
    pub layer: Option<usize>,
    /// Sprite variant
    #[arg(long, default_value_t = 0)]
    pub index: usize,
    /// Random seed for fill variants
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter for this invocation
    pub const fn log_filter(&self) -> &'static str {
        if self.quiet { "warn" } else { "info" }
    }

    /// Load the sprite catalog selected on the command line
    ///
    /// # Errors
    ///
    /// Returns an error if the palette file cannot be read or parsed
    pub fn load_palette(&self) -> Result<Palette> {
        self.palette
            .as_deref()
            .map_or_else(|| Ok(Palette::standard()), Palette::from_json_file)
    }
}

/// Parse a cell written as `ROW,COL`
///
/// # Errors
///
/// Returns a message if the text is not two comma-separated indices
pub fn parse_cell(text: &str) -> std::result::Result<Point, String> {
    let (row, col) = text
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{text}'"))?;
    let row = row.trim().parse().map_err(|e| format!("bad row '{row}': {e}"))?;
    let col = col.trim().parse().map_err(|e| format!("bad column '{col}': {e}"))?;
    Ok(Point::new(row, col))
}

/// Parse a palette color name, ignoring case
///
/// # Errors
///
/// Returns a message for names other than `black` and `white`
pub fn parse_color(text: &str) -> std::result::Result<ColorType, String> {
    [ColorType::Black, ColorType::White]
        .into_iter()
        .find(|color| format!("{color:?}").eq_ignore_ascii_case(text))
        .ok_or_else(|| format!("unknown color '{text}' (expected black or white)"))
}

/// Parse a block kind name, ignoring case
///
/// # Errors
///
/// Returns a message for unknown names and for `none`
pub fn parse_kind(text: &str) -> std::result::Result<BlockKind, String> {
    BlockKind::ALL
        .into_iter()
        .filter(|kind| *kind != BlockKind::None)
        .find(|kind| format!("{kind:?}").eq_ignore_ascii_case(text))
        .ok_or_else(|| format!("unknown block kind '{text}'"))
}

/// Runs a parsed command, batching level checks with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run the command
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails; for `check` this includes any
    /// level failing validation
    pub fn process(&mut self) -> Result<()> {
        let palette = self.cli.load_palette()?;

        match &self.cli.command {
            Command::New {
                output,
                rows,
                cols,
                catalog,
            } => {
                if output.exists() {
                    return Err(invalid_parameter(
                        "output",
                        &output.display(),
                        &"file already exists",
                    ));
                }
                let mut grid = Grid::new(*rows, *cols)?;
                grid.set_catalog(catalog.clone());
                grid.save(output)
            }
            Command::Check {
                target,
                normalize,
                preview,
                no_skip,
            } => {
                let options = CheckOptions {
                    normalize: *normalize,
                    preview: *preview,
                    skip_existing: !*no_skip,
                };
                let target = target.clone();
                self.check(&target, options)
            }
            Command::Paint(args) => edit_level(&args.level, |grid| {
                let brush = palette.brush(args.color, args.kind, args.index)?;
                grid.paint(Point::new(args.row, args.col), args.layer, &brush)?;
                Ok(())
            }),
            Command::Fill(args) => edit_level(&args.level, |grid| {
                let brush = palette.brush(args.color, args.kind, args.index)?;
                let mut rng = StdRng::seed_from_u64(args.seed);
                let filled = grid.fill(Point::new(args.row, args.col), args.layer, &brush, &mut rng)?;
                log::info!("Filled {} tiles", filled.len());
                Ok(())
            }),
            Command::Erase {
                level,
                row,
                col,
                layer,
            } => edit_level(level, |grid| {
                grid.erase(Point::new(*row, *col), *layer)?;
                Ok(())
            }),
            Command::Line {
                level,
                from,
                to,
                color,
                kind,
                layer,
                index,
            } => edit_level(level, |grid| {
                let brush = palette.brush(*color, *kind, *index)?;
                let painted = grid.draw_line(*from, *to, *layer, &brush)?;
                log::info!("Painted {} tiles", painted.len());
                Ok(())
            }),
        }
    }

    fn check(&mut self, target: &Path, options: CheckOptions) -> Result<()> {
        let files = Self::collect_files(target, options)?;
        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        let mut failures = 0;
        for (index, file) in files.iter().enumerate() {
            if let Some(ref mut pm) = self.progress_manager {
                pm.start_file(index, file, options.stages());
            }
            let outcome = self.check_file(file, index, options);
            if let Err(ref error) = outcome {
                log::error!("{}: {error}", file.display());
                failures += 1;
            }
            if let Some(ref mut pm) = self.progress_manager {
                pm.complete_file(index, outcome.is_ok());
            }
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        if failures > 0 {
            return Err(malformed(&format!(
                "{failures} of {} levels failed validation",
                files.len()
            )));
        }
        Ok(())
    }

    fn check_file(&mut self, path: &Path, index: usize, options: CheckOptions) -> Result<()> {
        let grid = Grid::load(path)?;
        self.advance(index);

        grid.audit()?;
        self.advance(index);

        if options.normalize {
            grid.save(&Self::output_path(path, NORMALIZED_SUFFIX, LEVEL_EXTENSION))?;
            self.advance(index);
        }
        if options.preview && grid.painted_tiles().next().is_some() {
            export_grid_as_png(
                &grid,
                &Self::output_path(path, PREVIEW_SUFFIX, "png"),
                PREVIEW_CELL_PIXELS,
            )?;
            self.advance(index);
        }

        log::info!(
            "{}: {}x{} level, {} regions, {} start points",
            path.display(),
            grid.rows(),
            grid.cols(),
            grid.regions().len(),
            grid.start_points().len()
        );
        Ok(())
    }

    fn advance(&mut self, index: usize) {
        if let Some(ref mut pm) = self.progress_manager {
            pm.advance(index);
        }
    }

    fn collect_files(target: &Path, options: CheckOptions) -> Result<Vec<PathBuf>> {
        let is_level = |path: &Path| {
            path.extension().and_then(|s| s.to_str()) == Some(LEVEL_EXTENSION)
                && !Self::is_output(path)
        };

        if target.is_file() {
            if !is_level(target) {
                return Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &format!("level files must have the .{LEVEL_EXTENSION} extension"),
                ));
            }
            Ok(Self::should_process(target, options)
                .then(|| target.to_path_buf())
                .into_iter()
                .collect())
        } else if target.is_dir() {
            let read_error = |e| EditorError::FileSystem {
                path: target.to_path_buf(),
                operation: "read directory",
                source: e,
            };
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target).map_err(read_error)? {
                let path = entry.map_err(read_error)?.path();
                if is_level(&path) && Self::should_process(&path, options) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"must be a level file or directory",
            ))
        }
    }

    fn should_process(path: &Path, options: CheckOptions) -> bool {
        if !options.skip_existing || !(options.normalize || options.preview) {
            return true;
        }

        let normalized_done = !options.normalize
            || Self::output_path(path, NORMALIZED_SUFFIX, LEVEL_EXTENSION).exists();
        let preview_done =
            !options.preview || Self::output_path(path, PREVIEW_SUFFIX, "png").exists();
        if normalized_done && preview_done {
            log::info!("Skipping: {} (outputs exist)", path.display());
            false
        } else {
            true
        }
    }

    fn is_output(path: &Path) -> bool {
        path.file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem.ends_with(NORMALIZED_SUFFIX))
    }

    /// Sibling path `<stem><suffix>.<extension>`
    pub fn output_path(input_path: &Path, suffix: &str, extension: &str) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!("{}{suffix}.{extension}", stem.to_string_lossy());

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CheckOptions {
    normalize: bool,
    preview: bool,
    skip_existing: bool,
}

impl CheckOptions {
    const fn stages(self) -> usize {
        2 + self.normalize as usize + self.preview as usize
    }
}

/// Load a level, apply one edit and save it back in place
fn edit_level(path: &Path, edit: impl FnOnce(&mut Grid) -> Result<()>) -> Result<()> {
    let mut grid = Grid::load(path)?;
    edit(&mut grid)?;
    for event in grid.take_events() {
        log::info!("{event:?}");
    }
    grid.save(path)
}
