//! Tests for grid construction, bounds checks, placement and auditing

#[cfg(test)]
mod tests {
    use tilecollider::EditorError;
    use tilecollider::catalog::palette::{Palette, SpriteCatalog};
    use tilecollider::io::configuration::{
        DEFAULT_ACTIVE_LAYER, MAX_GRID_DIMENSION, MAX_GRID_TILES, MAX_LAYERS,
    };
    use tilecollider::spatial::coords::{Point, TileRef};
    use tilecollider::spatial::grid::{Grid, GridLayout};
    use tilecollider::spatial::tile::{BlockKind, ColorType};

    // Tests dimension validation on construction
    // Verified by accepting zero rows
    #[test]
    fn test_new_rejects_bad_dimensions() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(EditorError::InvalidParameter { parameter: "rows", .. })
        ));
        assert!(matches!(
            Grid::new(5, MAX_GRID_DIMENSION + 1),
            Err(EditorError::InvalidParameter { parameter: "cols", .. })
        ));

        let grid = Grid::new(4, 6).unwrap();
        assert_eq!(grid.dimensions(), (4, 6));
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 6);
        assert_eq!(grid.cells().count(), 24);
        assert!(grid.regions().is_empty());
    }

    // Tests grids whose layer stack exceeds the tile budget are refused
    // Verified by checking only the per-dimension limit
    #[test]
    fn test_new_rejects_oversized_grid() {
        assert!(matches!(
            Grid::new(MAX_GRID_DIMENSION, MAX_GRID_DIMENSION),
            Err(EditorError::InvalidParameter {
                parameter: "rows x cols",
                ..
            })
        ));

        let cols = MAX_GRID_TILES / MAX_LAYERS / 100 + 1;
        assert!(Grid::new(100, cols).is_err());
        assert!(Grid::new(1, cols).is_ok());
    }

    // Tests layouts with non-positive extents are rejected
    // Verified by removing the extent check
    #[test]
    fn test_with_layout_rejects_degenerate_cells() {
        let layout = GridLayout {
            cell_size: [0.0, 1.0],
            ..GridLayout::default()
        };
        assert!(Grid::with_layout(2, 2, layout).is_err());
    }

    // Tests bounds and layer checks
    // Verified by allowing layer 0 in check_layer
    #[test]
    fn test_bounds_and_layers() {
        let mut grid = Grid::new(3, 4).unwrap();

        assert!(grid.contains(Point::new(2, 3)));
        assert!(!grid.contains(Point::new(3, 0)));
        assert!(matches!(
            grid.check_bounds(Point::new(0, 4)),
            Err(EditorError::OutOfBounds { grid_dimensions: (3, 4), .. })
        ));

        assert!(Grid::check_layer(0).is_err());
        assert!(Grid::check_layer(MAX_LAYERS).is_err());
        assert_eq!(Grid::check_layer(MAX_LAYERS - 1).unwrap(), MAX_LAYERS - 1);

        assert_eq!(grid.active_layer(), DEFAULT_ACTIVE_LAYER);
        grid.set_active_layer(4).unwrap();
        assert_eq!(grid.active_layer(), 4);
        assert!(grid.set_active_layer(0).is_err());
        assert_eq!(grid.active_layer(), 4);

        assert!(grid.tile(TileRef::new(0, 0, MAX_LAYERS)).is_none());
        assert!(grid.tile(TileRef::new(0, 0, 0)).is_some());
    }

    // Tests world placement of tiles with and without subdivision
    // Verified by dropping the half-cell offset
    #[test]
    fn test_layout_placement() {
        let layout = GridLayout {
            cell_size: [1.0, 2.0],
            origin: [10.0, 20.0],
            ..GridLayout::default()
        };

        assert_eq!(layout.placement(Point::new(0, 0), [1, 1]), [10.5, 21.0]);
        assert_eq!(layout.placement(Point::new(1, 2), [1, 1]), [12.5, 23.0]);
        assert_eq!(layout.placement(Point::new(0, 1), [2, 2]), [11.25, 20.5]);
    }

    // Tests the audit passes for an edited grid and events drain once
    // Verified by skipping the back-reference update in refresh_region
    #[test]
    fn test_audit_and_events() {
        let palette = Palette::standard();
        let ground = palette.brush(ColorType::Black, BlockKind::Ground, 0).unwrap();
        let spawn = palette
            .brush(ColorType::White, BlockKind::SpawnPoint, 0)
            .unwrap();
        let mut grid = Grid::new(4, 4).unwrap();

        for col in 0..4 {
            grid.paint(Point::new(0, col), None, &ground).unwrap();
        }
        grid.paint(Point::new(1, 1), None, &spawn).unwrap();

        assert!(grid.audit().is_ok());
        assert_eq!(grid.take_events().len(), 1);
        assert!(grid.take_events().is_empty());

        let (id, region) = grid.region_of(TileRef::new(0, 2, 1)).unwrap();
        assert_eq!(region.len(), 4);
        assert_eq!(grid.region(id), Some(region));
        assert_eq!(grid.painted_tiles().count(), 5);
    }
}
