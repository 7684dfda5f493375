//! Tests for editor constants and layout defaults

#[cfg(test)]
mod tests {
    use tilecollider::io::configuration::{
        COLLIDER_UNIT, DEFAULT_ACTIVE_LAYER, DEFAULT_CELL_SIZE, DEFAULT_ORIGIN, DEFAULT_SEED,
        DOCUMENT_VERSION, LEVEL_EXTENSION, MAX_GRID_DIMENSION, MAX_GRID_TILES,
        MAX_INDIVIDUAL_PROGRESS_BARS,
        MAX_LAYERS, NORMALIZED_SUFFIX, PREVIEW_CELL_PIXELS, PREVIEW_SUFFIX,
    };
    use tilecollider::spatial::grid::GridLayout;

    // Tests the active layer is paintable
    // Verified by setting the default layer to 0
    #[test]
    fn test_active_layer_is_paintable() {
        assert_eq!(DEFAULT_ACTIVE_LAYER, 1);
        assert_eq!(MAX_LAYERS, 10);
    }

    // Tests layout defaults come from the geometry constants
    // Verified by swapping cell size and collider unit
    #[test]
    fn test_layout_defaults() {
        let layout = GridLayout::default();

        assert_eq!(layout.cell_size, DEFAULT_CELL_SIZE);
        assert_eq!(layout.collider_unit, COLLIDER_UNIT);
        assert_eq!(layout.origin, DEFAULT_ORIGIN);
        assert!(COLLIDER_UNIT.iter().all(|v| *v > 0.0));
    }

    // Tests maximum grid dimension value
    // Verified by reducing dimension limit
    #[test]
    fn test_max_grid_dimension() {
        assert_eq!(MAX_GRID_DIMENSION, 10_000);
    }

    // Tests the tile budget fits a region id
    // Verified by raising the budget past u32::MAX
    #[test]
    fn test_max_grid_tiles() {
        assert_eq!(MAX_GRID_TILES, 2_000_000);
        assert_eq!(u32::try_from(MAX_GRID_TILES).ok(), Some(2_000_000));
    }

    // Tests output suffixes are filesystem safe and distinct
    // Verified by adding special character
    #[test]
    fn test_output_suffixes() {
        for suffix in [NORMALIZED_SUFFIX, PREVIEW_SUFFIX] {
            assert!(suffix.starts_with('_'));
            assert!(
                suffix.chars().all(|ch| ch.is_alphanumeric() || ch == '_'),
                "Output suffix contains invalid character: {suffix}"
            );
        }
        assert_ne!(NORMALIZED_SUFFIX, PREVIEW_SUFFIX);
        assert_eq!(LEVEL_EXTENSION, "json");
    }

    // Tests remaining defaults
    // Verified by changing constant values
    #[test]
    fn test_misc_defaults() {
        assert_eq!(DEFAULT_SEED, 42);
        assert_eq!(DOCUMENT_VERSION, 1);
        assert_eq!(MAX_INDIVIDUAL_PROGRESS_BARS, 5);
        assert_eq!(PREVIEW_CELL_PIXELS, 8);
    }
}
