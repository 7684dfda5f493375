//! Tests for command-line interface parsing and file processing

#[cfg(test)]
mod tests {
    use clap::Parser;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use tilecollider::io::cli::{Cli, Command, FileProcessor, parse_cell, parse_color, parse_kind};
    use tilecollider::io::configuration::DEFAULT_SEED;
    use tilecollider::spatial::coords::{Point, TileRef};
    use tilecollider::spatial::grid::Grid;
    use tilecollider::spatial::tile::{BlockKind, ColorType};

    fn run(args: &[&str]) -> tilecollider::Result<()> {
        let cli = Cli::parse_from(std::iter::once("tilecollider").chain(args.iter().copied()));
        FileProcessor::new(cli).process()
    }

    fn new_level(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let path_str = path.to_str().unwrap();
        run(&["-q", "new", path_str, "--rows", "3", "--cols", "4"]).unwrap();
        path
    }

    // Tests parsing of the create command
    // Verified by renaming the rows flag
    #[test]
    fn test_parse_new() {
        let cli = Cli::parse_from([
            "tilecollider",
            "new",
            "level.json",
            "--rows",
            "4",
            "--cols",
            "6",
            "--catalog",
            "forest",
        ]);

        match cli.command {
            Command::New {
                output,
                rows,
                cols,
                catalog,
            } => {
                assert_eq!(output, PathBuf::from("level.json"));
                assert_eq!((rows, cols), (4, 6));
                assert_eq!(catalog.as_deref(), Some("forest"));
            }
            _ => panic!("expected the new command"),
        }
        assert!(!cli.quiet);
        assert!(cli.palette.is_none());
    }

    // Tests brush arguments use the custom parsers and default seed
    // Verified by making color parsing case sensitive
    #[test]
    fn test_parse_brush_args() {
        let cli = Cli::parse_from([
            "tilecollider",
            "fill",
            "level.json",
            "--row",
            "1",
            "--col",
            "2",
            "--color",
            "WHITE",
            "--kind",
            "jumppad",
        ]);

        let Command::Fill(args) = cli.command else {
            panic!("expected the fill command");
        };
        assert_eq!(args.color, ColorType::White);
        assert_eq!(args.kind, BlockKind::JumpPad);
        assert_eq!(args.seed, DEFAULT_SEED);
        assert_eq!(args.layer, None);
        assert_eq!(args.index, 0);
    }

    // Tests line endpoints parse as ROW,COL
    // Verified by swapping row and column in parse_cell
    #[test]
    fn test_parse_line() {
        let cli = Cli::parse_from([
            "tilecollider",
            "line",
            "level.json",
            "--from",
            "0,1",
            "--to",
            "3, 1",
            "--color",
            "black",
            "--kind",
            "ground",
            "--layer",
            "2",
        ]);

        let Command::Line {
            from, to, layer, ..
        } = cli.command
        else {
            panic!("expected the line command");
        };
        assert_eq!(from, Point::new(0, 1));
        assert_eq!(to, Point::new(3, 1));
        assert_eq!(layer, Some(2));
    }

    // Tests the value parsers reject bad input
    // Verified by accepting the none kind
    #[test]
    fn test_value_parsers() {
        assert_eq!(parse_cell("4,5"), Ok(Point::new(4, 5)));
        assert!(parse_cell("4").is_err());
        assert!(parse_cell("a,5").is_err());
        assert!(parse_cell("-1,5").is_err());

        assert_eq!(parse_color("Black"), Ok(ColorType::Black));
        assert!(parse_color("none").is_err());
        assert!(parse_color("red").is_err());

        assert_eq!(parse_kind("CheckPoint"), Ok(BlockKind::CheckPoint));
        assert!(parse_kind("none").is_err());
        assert!(parse_kind("lava").is_err());
    }

    // Tests quiet mode disables progress and lowers logging
    // Verified by inverting quiet flag logic
    #[test]
    fn test_quiet_flag() {
        let loud = Cli::parse_from(["tilecollider", "check", "levels"]);
        assert!(loud.should_show_progress());
        assert_eq!(loud.log_filter(), "info");

        let quiet = Cli::parse_from(["tilecollider", "check", "levels", "--quiet"]);
        assert!(!quiet.should_show_progress());
        assert_eq!(quiet.log_filter(), "warn");
    }

    // Tests output paths are siblings of the input
    // Verified by dropping the parent directory
    #[test]
    fn test_output_path() {
        assert_eq!(
            FileProcessor::output_path(Path::new("levels/intro.json"), "_preview", "png"),
            PathBuf::from("levels/intro_preview.png")
        );
        assert_eq!(
            FileProcessor::output_path(Path::new("intro.json"), "_normalized", "json"),
            PathBuf::from("intro_normalized.json")
        );
    }

    // Tests create, edit and check commands against real files
    // Verified by skipping the save after an edit
    #[test]
    fn test_edit_commands_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let level = new_level(temp_dir.path(), "level.json");
        let level_str = level.to_str().unwrap();

        run(&[
            "-q", "line", level_str, "--from", "0,0", "--to", "0,3", "--color", "black",
            "--kind", "ground",
        ])
        .unwrap();
        run(&[
            "-q", "paint", level_str, "--row", "0", "--col", "0", "--color", "black", "--kind",
            "ground",
        ])
        .unwrap();
        run(&["-q", "erase", level_str, "--row", "0", "--col", "2"]).unwrap();

        let grid = Grid::load(&level).unwrap();
        assert_eq!(grid.painted_tiles().count(), 3);
        assert_eq!(grid.regions().len(), 2);
        assert!(grid.tile(TileRef::new(0, 2, 1)).unwrap().is_empty());

        run(&["-q", "check", level_str]).unwrap();
    }

    // Tests rejected edits fail without rewriting the level
    // Verified by saving before applying the edit
    #[test]
    fn test_rejected_edit_leaves_file() {
        let temp_dir = TempDir::new().unwrap();
        let level = new_level(temp_dir.path(), "level.json");
        let level_str = level.to_str().unwrap();
        let before = fs::read_to_string(&level).unwrap();

        let result = run(&[
            "-q", "paint", level_str, "--row", "9", "--col", "0", "--color", "white", "--kind",
            "ground",
        ]);
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&level).unwrap(), before);
    }

    // Tests new refuses to overwrite an existing level
    // Verified by removing the existence check
    #[test]
    fn test_new_refuses_existing() {
        let temp_dir = TempDir::new().unwrap();
        let level = new_level(temp_dir.path(), "level.json");

        let result = run(&["-q", "new", level.to_str().unwrap(), "--rows", "2", "--cols", "2"]);
        assert!(result.is_err());
    }

    // Tests directory checks write outputs, skip done levels and report failures
    // Verified by processing normalized outputs as inputs
    #[test]
    fn test_check_directory() {
        let temp_dir = TempDir::new().unwrap();
        let level = new_level(temp_dir.path(), "a.json");
        let level_str = level.to_str().unwrap();
        run(&[
            "-q", "paint", level_str, "--row", "1", "--col", "1", "--color", "white", "--kind",
            "spawnpoint",
        ])
        .unwrap();
        let dir_str = temp_dir.path().to_str().unwrap();

        run(&["-q", "check", dir_str, "--normalize", "--preview"]).unwrap();
        let normalized = temp_dir.path().join("a_normalized.json");
        assert!(normalized.exists());
        assert!(temp_dir.path().join("a_preview.png").exists());

        // Outputs exist, so the second pass skips the level entirely
        fs::write(&level, "{ broken").unwrap();
        run(&["-q", "check", dir_str, "-n", "-p"]).unwrap();
        assert!(run(&["-q", "check", dir_str, "-n", "-p", "--no-skip"]).is_err());

        assert!(Grid::load(&normalized).is_ok());
    }

    // Tests checks reject unsupported targets
    // Verified by accepting any file extension
    #[test]
    fn test_check_invalid_targets() {
        let temp_dir = TempDir::new().unwrap();
        let text = temp_dir.path().join("notes.txt");
        fs::write(&text, "hello").unwrap();

        assert!(run(&["-q", "check", text.to_str().unwrap()]).is_err());
        assert!(run(&["-q", "check", "does/not/exist"]).is_err());
    }

    // Tests a missing palette file fails before any work
    // Verified by falling back to the standard palette on errors
    #[test]
    fn test_missing_palette() {
        let temp_dir = TempDir::new().unwrap();
        let level = new_level(temp_dir.path(), "level.json");

        let result = run(&[
            "--palette",
            "missing.json",
            "-q",
            "erase",
            level.to_str().unwrap(),
            "--row",
            "0",
            "--col",
            "0",
        ]);
        assert!(result.is_err());
    }
}
