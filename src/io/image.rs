//! PNG preview export with automatic cropping and transparency handling

use image::{ImageBuffer, Rgba};
use std::path::Path;

use crate::io::error::{EditorError, Result};
use crate::spatial::grid::Grid;
use crate::spatial::tile::{BlockKind, ColorType, TileInstance};

#[derive(Debug)]
struct BoundingBox {
    min_row: usize,
    max_row: usize,
    min_col: usize,
    max_col: usize,
}

// Finds the minimal rectangle containing all painted cells
fn calculate_bounding_box(grid: &Grid) -> Option<BoundingBox> {
    let mut bbox: Option<BoundingBox> = None;

    for cell in grid.cells().filter(|cell| !cell.is_empty()) {
        let (row, col) = (cell.position().row, cell.position().col);
        bbox = Some(match bbox {
            None => BoundingBox {
                min_row: row,
                max_row: row,
                min_col: col,
                max_col: col,
            },
            Some(b) => BoundingBox {
                min_row: b.min_row.min(row),
                max_row: b.max_row.max(row),
                min_col: b.min_col.min(col),
                max_col: b.max_col.max(col),
            },
        });
    }

    bbox
}

/// Preview color of a painted tile
///
/// Hue follows the block kind, the palette color shifts brightness. Tiles
/// inside trigger regions are drawn half transparent.
pub fn tile_color(grid: &Grid, tile: &TileInstance) -> Rgba<u8> {
    let Some(signature) = tile.signature() else {
        return Rgba([0, 0, 0, 0]);
    };

    let base: [u8; 3] = match signature.kind {
        BlockKind::None => [0, 0, 0],
        BlockKind::Platform => [200, 140, 60],
        BlockKind::Ground => [110, 90, 70],
        BlockKind::Corner => [90, 75, 60],
        BlockKind::SpawnPoint => [60, 200, 90],
        BlockKind::Final => [230, 210, 40],
        BlockKind::Enemies => [220, 50, 50],
        BlockKind::Background => [120, 130, 150],
        BlockKind::Collectables => [250, 190, 20],
        BlockKind::JumpPad => [80, 160, 230],
        BlockKind::CheckPoint => [170, 90, 210],
    };
    let shade = |v: u8| match signature.color {
        ColorType::Black => v / 2,
        ColorType::White => v.saturating_add((255 - v) / 3),
        ColorType::None => v,
    };
    let trigger = grid
        .region_of(tile.position())
        .is_some_and(|(_, region)| region.is_trigger());
    let alpha = if trigger { 160 } else { 255 };

    Rgba([shade(base[0]), shade(base[1]), shade(base[2]), alpha])
}

/// Export the topmost painted tile of every cell as a PNG preview
///
/// Row 0 is the bottom of the level, so rows are flipped to image space.
/// Each cell becomes a `cell_pixels` square.
///
/// # Errors
///
/// Returns an error if:
/// - No tile has been painted
/// - `cell_pixels` is zero or the preview would be too large
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_grid_as_png(grid: &Grid, output_path: &Path, cell_pixels: u32) -> Result<()> {
    let bbox = calculate_bounding_box(grid).ok_or_else(|| EditorError::InvalidParameter {
        parameter: "grid",
        value: format!("{}x{}", grid.rows(), grid.cols()),
        reason: "No tiles have been painted".to_string(),
    })?;

    let too_large = || EditorError::InvalidParameter {
        parameter: "cell_pixels",
        value: cell_pixels.to_string(),
        reason: "preview dimensions overflow".to_string(),
    };
    if cell_pixels == 0 {
        return Err(too_large());
    }
    let cells_wide = u32::try_from(bbox.max_col - bbox.min_col + 1).ok();
    let cells_high = u32::try_from(bbox.max_row - bbox.min_row + 1).ok();
    let width = cells_wide
        .and_then(|cells| cells.checked_mul(cell_pixels))
        .ok_or_else(too_large)?;
    let height = cells_high
        .and_then(|cells| cells.checked_mul(cell_pixels))
        .ok_or_else(too_large)?;

    let mut img = ImageBuffer::from_pixel(width, height, Rgba([0, 0, 0, 0]));

    for cell in grid.cells() {
        let position = cell.position();
        if position.row < bbox.min_row
            || position.row > bbox.max_row
            || position.col < bbox.min_col
            || position.col > bbox.max_col
        {
            continue;
        }
        let Some(tile) = cell
            .topmost_painted()
            .and_then(|layer| cell.layer(layer))
        else {
            continue;
        };
        let color = tile_color(grid, tile);

        // Bounds were checked against the bounding box above
        let x0 = u32::try_from(position.col - bbox.min_col).unwrap_or(0) * cell_pixels;
        let y0 = u32::try_from(bbox.max_row - position.row).unwrap_or(0) * cell_pixels;
        for dy in 0..cell_pixels {
            for dx in 0..cell_pixels {
                img.put_pixel(x0 + dx, y0 + dy, color);
            }
        }
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| EditorError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| EditorError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
