//! Input/output plumbing: command line, configuration, discovery, errors, logging and progress

/// Command-line parsing and the pipeline runner
pub mod cli;
/// Constants and the explicit pipeline configuration
pub mod configuration;
/// Eligible file listing and output path mirroring
pub mod discovery;
/// Error types and path context
pub mod error;
/// Logger initialisation
pub mod logging;
/// Progress bars for per-folder batches
pub mod progress;
