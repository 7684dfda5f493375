//! CLI entry point for the level collider tool

use clap::Parser;
use tilecollider::io::cli::{Cli, FileProcessor};

fn main() -> tilecollider::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let mut processor = FileProcessor::new(cli);
    processor.process()
}
