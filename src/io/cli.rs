//! Command-line interface running the statistics and normalization phases

use crate::io::configuration::{NORMALIZED_SUBFOLDER, PipelineConfig, STATS_SUFFIX};
use crate::io::error::Result;
use crate::io::logging::level_for_verbosity;
use crate::io::progress::ProgressManager;
use crate::pipeline::{self, PipelineSummary, Stage};
use clap::Parser;
use log::{LevelFilter, debug, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bandnorm")]
#[command(
    author,
    version,
    about = "Normalize GeoTIFF collections to zero mean and unit variance per band"
)]
/// Command-line arguments for the normalization pipeline
pub struct Cli {
    /// Folders to process (defaults to the built-in imagery folders)
    #[arg(value_name = "FOLDER")]
    pub folders: Vec<PathBuf>,

    /// Phases to run
    #[arg(long, value_enum, default_value_t = Stage::All)]
    pub stage: Stage,

    /// Subfolder receiving normalized rasters inside each folder
    #[arg(short, long, default_value = NORMALIZED_SUBFOLDER)]
    pub output_subfolder: String,

    /// Suffix appended to a folder path to name its statistics table
    #[arg(short, long, default_value = STATS_SUFFIX)]
    pub stats_suffix: String,

    /// Worker threads per folder (defaults to one per CPU)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Suppress progress bars
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level selected by the verbosity flags
    pub const fn log_level(&self) -> LevelFilter {
        level_for_verbosity(self.verbose)
    }

    /// Pipeline configuration described by the arguments
    pub fn config(&self) -> PipelineConfig {
        let mut config = if self.folders.is_empty() {
            PipelineConfig::default()
        } else {
            PipelineConfig::with_folders(self.folders.iter().cloned())
        };
        config.output_subfolder.clone_from(&self.output_subfolder);
        config.stats_suffix.clone_from(&self.stats_suffix);
        config.threads = self.threads;
        config
    }
}

/// Runs the pipeline described by the command line
pub struct PipelineRunner {
    cli: Cli,
    progress_manager: ProgressManager,
}

impl PipelineRunner {
    /// Create a runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = ProgressManager::new(cli.should_show_progress());
        Self {
            cli,
            progress_manager,
        }
    }

    /// Run the selected phases over the configured folders
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or any phase fails
    pub fn process(&mut self) -> Result<PipelineSummary> {
        let config = self.cli.config();
        debug!(
            "Running stage {:?} over {} folders, progress bars {}",
            self.cli.stage,
            config.folders.len(),
            if self.progress_manager.is_enabled() { "on" } else { "off" }
        );
        let summary = pipeline::run(&config, self.cli.stage, &self.progress_manager)?;
        info!(
            "Done: {} tables written, {} folders without data, {} files normalized, {} skipped",
            summary.folders_with_statistics,
            summary.folders_without_data,
            summary.files_written,
            summary.files_skipped
        );
        Ok(summary)
    }
}
