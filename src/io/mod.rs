/// Command-line interface and batch processing
pub mod cli;
/// Editor constants and defaults
pub mod configuration;
/// Level document format and persistence
pub mod document;
/// Error types
pub mod error;
/// PNG preview export
pub mod image;
/// Batch progress display
pub mod progress;
