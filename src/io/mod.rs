//! Input/output operations, configuration and error handling

/// Command-line parsing and batch orchestration
pub mod cli;
/// Search constants and runtime defaults
pub mod configuration;
/// Error types shared across the crate
pub mod error;
/// Placement history interchange
pub mod history;
/// Target decoding and canvas export
pub mod image;
/// Progress display
pub mod progress;
/// Replay animation export
pub mod visualization;
