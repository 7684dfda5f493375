//! Tests for PNG preview export including cropping and error handling

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use tilecollider::catalog::palette::{Brush, Palette, SpriteCatalog};
    use tilecollider::io::image::{export_grid_as_png, tile_color};
    use tilecollider::spatial::coords::{Point, TileRef};
    use tilecollider::spatial::grid::Grid;
    use tilecollider::spatial::tile::{BlockKind, ColorType};

    fn brush(color: ColorType, kind: BlockKind) -> Brush {
        Palette::standard().brush(color, kind, 0).unwrap()
    }

    // Tests the preview is cropped to painted cells and flipped vertically
    // Verified by writing row 0 at the top of the image
    #[test]
    fn test_export_crops_and_flips() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("nested").join("preview.png");
        let mut grid = Grid::new(6, 6).unwrap();
        grid.paint(Point::new(1, 1), None, &brush(ColorType::Black, BlockKind::Ground))
            .unwrap();
        grid.paint(Point::new(2, 3), None, &brush(ColorType::White, BlockKind::Platform))
            .unwrap();

        export_grid_as_png(&grid, &output, 4).unwrap();

        let img = image::open(&output).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (12, 8));

        let ground = grid.tile(TileRef::new(1, 1, 1)).unwrap();
        let platform = grid.tile(TileRef::new(2, 3, 1)).unwrap();
        assert_eq!(*img.get_pixel(0, 7), tile_color(&grid, ground));
        assert_eq!(*img.get_pixel(11, 0), tile_color(&grid, platform));
        assert_eq!(img.get_pixel(11, 7)[3], 0);
    }

    // Tests trigger tiles are drawn translucent and palettes differ
    // Verified by ignoring the trigger flag in tile_color
    #[test]
    fn test_tile_colors() {
        let mut grid = Grid::new(1, 3).unwrap();
        grid.paint(Point::new(0, 0), None, &brush(ColorType::Black, BlockKind::Ground))
            .unwrap();
        grid.paint(Point::new(0, 1), None, &brush(ColorType::White, BlockKind::Ground))
            .unwrap();
        grid.paint(Point::new(0, 2), None, &brush(ColorType::Black, BlockKind::Enemies))
            .unwrap();

        let dark = tile_color(&grid, grid.tile(TileRef::new(0, 0, 1)).unwrap());
        let light = tile_color(&grid, grid.tile(TileRef::new(0, 1, 1)).unwrap());
        let enemy = tile_color(&grid, grid.tile(TileRef::new(0, 2, 1)).unwrap());
        let empty = tile_color(&grid, grid.tile(TileRef::new(0, 0, 2)).unwrap());

        assert_eq!(dark[3], 255);
        assert_ne!(dark, light);
        assert!(light[0] > dark[0]);
        assert!(enemy[3] < 255);
        assert_eq!(empty[3], 0);
    }

    // Tests error when no tiles are painted
    // Verified by ignoring empty grid check
    #[test]
    fn test_export_empty_grid_error() {
        let temp_dir = TempDir::new().unwrap();
        let grid = Grid::new(3, 3).unwrap();

        let result = export_grid_as_png(&grid, &temp_dir.path().join("empty.png"), 4);
        assert!(result.is_err(), "Should fail when no tiles are painted");
    }

    // Tests zero-sized cells are rejected
    // Verified by removing the zero check
    #[test]
    fn test_export_zero_cell_pixels() {
        let temp_dir = TempDir::new().unwrap();
        let mut grid = Grid::new(2, 2).unwrap();
        grid.paint(Point::new(0, 0), None, &brush(ColorType::Black, BlockKind::Ground))
            .unwrap();

        let result = export_grid_as_png(&grid, &temp_dir.path().join("zero.png"), 0);
        assert!(result.is_err());
    }
}
