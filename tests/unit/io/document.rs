//! Tests for level document persistence and load-time validation

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use tilecollider::EditorError;
    use tilecollider::catalog::classification::{Classification, Interaction, Side};
    use tilecollider::catalog::palette::{Brush, Palette, SpriteCatalog};
    use tilecollider::io::configuration::{MAX_GRID_DIMENSION, MAX_LAYERS};
    use tilecollider::io::document::{LevelDocument, StartPointRecord};
    use tilecollider::spatial::coords::{Orientation, Point, TileRef};
    use tilecollider::spatial::grid::Grid;
    use tilecollider::spatial::tile::{BlockKind, ColorType};

    fn brush(color: ColorType, kind: BlockKind) -> Brush {
        Palette::standard().brush(color, kind, 0).unwrap()
    }

    fn sample_grid() -> Grid {
        let mut grid = Grid::new(4, 5).unwrap();
        grid.set_catalog(Some("forest".to_string()));
        let ground = brush(ColorType::Black, BlockKind::Ground);
        for col in 0..4 {
            grid.paint(Point::new(0, col), None, &ground).unwrap();
        }
        for row in 1..3 {
            grid.paint(Point::new(row, 4), None, &ground).unwrap();
        }
        grid.paint(
            Point::new(1, 1),
            None,
            &brush(ColorType::White, BlockKind::SpawnPoint),
        )
        .unwrap();
        grid.paint(
            Point::new(2, 2),
            Some(3),
            &brush(ColorType::White, BlockKind::Collectables),
        )
        .unwrap();
        grid.paint(
            Point::new(3, 0),
            None,
            &brush(ColorType::Black, BlockKind::Background),
        )
        .unwrap();
        grid
    }

    // Tests a saved level loads back with identical regions and anchors
    // Verified by dropping region geometry on save
    #[test]
    fn test_save_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("level.json");
        let grid = sample_grid();
        grid.save(&path).unwrap();

        let loaded = Grid::load(&path).unwrap();
        assert_eq!(loaded.dimensions(), (4, 5));
        assert_eq!(loaded.catalog(), Some("forest"));
        assert_eq!(loaded.painted_tiles().count(), grid.painted_tiles().count());
        assert_eq!(loaded.regions().len(), grid.regions().len());

        for ((id_a, a), (id_b, b)) in grid.regions().iter().zip(loaded.regions().iter()) {
            assert_eq!(id_a.index(), id_b.index());
            assert_eq!(a.members(), b.members());
            assert_eq!(a.orientation(), b.orientation());
            assert_eq!(a.is_trigger(), b.is_trigger());
            assert_eq!(a.tag(), b.tag());
            assert_eq!(a.interaction(), b.interaction());
            assert_eq!(a.geometry(), b.geometry());
            assert_eq!(a.head_idx(), b.head_idx());
            assert_eq!(a.name(), b.name());
        }

        assert_eq!(
            loaded.spawn_point(Side::Upper),
            Some(TileRef::new(1, 1, 1))
        );
        let (_, coin) = loaded.region_of(TileRef::new(2, 2, 3)).unwrap();
        assert_eq!(coin.interaction(), Interaction::Coin);
        let (_, column) = loaded.region_of(TileRef::new(2, 4, 1)).unwrap();
        assert_eq!(column.orientation(), Some(Orientation::Vertical));
        assert!(loaded.audit().is_ok());
        assert_eq!(loaded.to_document(), grid.to_document());
    }

    // Tests the JSON uses camelCase keys and string region ids
    // Verified by removing the serde rename attribute
    #[test]
    fn test_document_shape() {
        let document = sample_grid().to_document();
        let json = serde_json::to_value(&document).unwrap();

        assert!(json.get("startPoints").is_some());
        let region = &json["regions"][0];
        assert!(region.get("headIdx").is_some());
        assert!(region.get("isTrigger").is_some());
        assert!(region["id"].is_string());
        assert_eq!(region["name"], "Col0");
        assert!(json["cells"][0]["blocks"][0].get("regionId").is_some());
        assert_eq!(document.cells.len(), 9);
    }

    // Tests documents without start points rebuild them from tiles
    // Verified by leaving the registry empty when the field is absent
    #[test]
    fn test_missing_start_points_are_rebuilt() {
        let mut document = sample_grid().to_document();
        document.start_points = None;

        let grid = Grid::from_document(&document).unwrap();
        assert_eq!(grid.spawn_point(Side::Upper), Some(TileRef::new(1, 1, 1)));
        assert_eq!(grid.start_points().len(), 1);
    }

    // Tests start points must sit on start point tiles
    // Verified by trusting stored start points
    #[test]
    fn test_start_point_on_wrong_tile() {
        let mut document = sample_grid().to_document();
        document.start_points = Some(vec![StartPointRecord {
            row: 0,
            col: 0,
            layer: 1,
            side: Side::Lower,
        }]);

        assert!(matches!(
            Grid::from_document(&document),
            Err(EditorError::MalformedDocument { .. })
        ));
    }

    // Tests inconsistent back-references are refused
    // Verified by skipping the member back-pointer check
    #[test]
    fn test_dangling_region_reference() {
        let mut document = sample_grid().to_document();
        let block = document
            .cells
            .iter_mut()
            .flat_map(|cell| cell.blocks.iter_mut())
            .find(|block| block.classification == Classification::Collider)
            .unwrap();
        block.region_id = Some("42".to_string());

        assert!(Grid::from_document(&document).is_err());
    }

    // Tests broken regions are refused
    // Verified by skipping the contiguity check on load
    #[test]
    fn test_invalid_regions() {
        let base = sample_grid().to_document();

        let mut gap = base.clone();
        if let Some(region) = gap.regions.first_mut() {
            region.members.remove(1);
        }
        assert!(Grid::from_document(&gap).is_err());

        let mut head = base.clone();
        if let Some(region) = head.regions.first_mut() {
            region.head_idx = 99;
        }
        assert!(Grid::from_document(&head).is_err());

        let mut code = base.clone();
        if let Some(region) = code.regions.first_mut() {
            region.interaction = 200;
        }
        assert!(Grid::from_document(&code).is_err());

        let mut id = base.clone();
        if let Some(region) = id.regions.first_mut() {
            region.id = "first".to_string();
        }
        assert!(Grid::from_document(&id).is_err());

        let mut repeated = base;
        let copy = repeated.regions.first().cloned().unwrap();
        repeated.regions.push(copy);
        assert!(Grid::from_document(&repeated).is_err());
    }

    // Tests bad dimensions, layers and versions are refused
    // Verified by accepting layer 0 blocks
    #[test]
    fn test_invalid_grid_shape() {
        let base = sample_grid().to_document();

        let mut version = base.clone();
        version.version = 9;
        assert!(Grid::from_document(&version).is_err());

        let mut rows = base.clone();
        rows.rows = 0;
        assert!(Grid::from_document(&rows).is_err());

        let mut outside = base.clone();
        outside.cols = 2;
        assert!(Grid::from_document(&outside).is_err());

        let mut layer = base;
        if let Some(block) = layer.cells.first_mut().and_then(|c| c.blocks.first_mut()) {
            block.layer = 0;
        }
        assert!(Grid::from_document(&layer).is_err());
    }

    // Tests a document too large to allocate is refused before allocating
    // Verified by checking only the per-dimension limit
    #[test]
    fn test_oversized_document() {
        let mut document = sample_grid().to_document();
        document.rows = MAX_GRID_DIMENSION;
        document.cols = MAX_GRID_DIMENSION;

        assert!(matches!(
            Grid::from_document(&document),
            Err(EditorError::MalformedDocument { .. })
        ));
    }

    // Tests a region keeps a slot above the painted tile count across save
    // Verified by bounding region ids by the number of painted tiles
    #[test]
    fn test_sparse_region_slots_round_trip() {
        let ground = brush(ColorType::Black, BlockKind::Ground);
        let mut grid = Grid::new(1, 5).unwrap();
        for col in [0, 2, 4] {
            grid.paint(Point::new(0, col), None, &ground).unwrap();
        }
        grid.erase(Point::new(0, 0), None).unwrap();
        grid.erase(Point::new(0, 2), None).unwrap();

        let document = grid.to_document();
        assert_eq!(document.cells.len(), 1);
        assert_eq!(document.regions.len(), 1);
        assert_eq!(document.regions.first().unwrap().id, "2");

        let loaded = Grid::from_document(&document).unwrap();
        let (id, region) = loaded.region_of(TileRef::new(0, 4, 1)).unwrap();
        assert_eq!(id.index(), 2);
        assert_eq!(region.name(), "Col2");
        assert_eq!(loaded.to_document(), document);
    }

    // Tests region ids are bounded by the paintable tile slots
    // Verified by accepting any parseable id
    #[test]
    fn test_region_id_past_tile_slots() {
        let mut grid = Grid::new(1, 1).unwrap();
        grid.paint(
            Point::new(0, 0),
            None,
            &brush(ColorType::Black, BlockKind::Ground),
        )
        .unwrap();
        let base = grid.to_document();

        let with_id = |id: &str| {
            let mut document = base.clone();
            document.regions.first_mut().unwrap().id = id.to_string();
            let block = document.cells.first_mut().unwrap().blocks.first_mut().unwrap();
            block.region_id = Some(id.to_string());
            document
        };

        let last = (MAX_LAYERS - 2).to_string();
        let loaded = Grid::from_document(&with_id(&last)).unwrap();
        let (id, _) = loaded.regions().iter().next().unwrap();
        assert_eq!(id.index(), MAX_LAYERS - 2);

        let past = (MAX_LAYERS - 1).to_string();
        assert!(matches!(
            Grid::from_document(&with_id(&past)),
            Err(EditorError::MalformedDocument { .. })
        ));
        assert!(Grid::from_document(&with_id("9999999")).is_err());
    }

    // Tests a failed reload keeps the current level
    // Verified by clearing the grid before loading
    #[test]
    fn test_reload_failure_keeps_grid() {
        let temp_dir = TempDir::new().unwrap();
        let bad = temp_dir.path().join("bad.json");
        std::fs::write(&bad, "{\"version\": 1}").unwrap();

        let mut grid = sample_grid();
        let before = grid.to_document();
        assert!(matches!(
            grid.reload_from(&bad),
            Err(EditorError::Serialization { .. })
        ));
        assert_eq!(grid.to_document(), before);

        let good = temp_dir.path().join("good.json");
        Grid::new(2, 2).unwrap().save(&good).unwrap();
        grid.reload_from(&good).unwrap();
        assert_eq!(grid.dimensions(), (2, 2));
    }

    // Tests the document helpers report missing files
    // Verified by returning an empty document on read errors
    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = LevelDocument::from_json_file(&temp_dir.path().join("none.json"));
        assert!(matches!(result, Err(EditorError::FileSystem { .. })));
    }
}
