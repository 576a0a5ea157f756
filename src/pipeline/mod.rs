//! Two-phase pipeline: collect statistics for every folder, then normalize every folder

/// Statistics collection per folder
pub mod collector;
/// Per-folder worker pool
pub mod executor;
/// Band normalization per folder
pub mod normalizer;

use crate::io::configuration::PipelineConfig;
use crate::io::error::Result;
use crate::io::progress::ProgressManager;
use clap::ValueEnum;
use log::info;

/// Which phases a run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Stage {
    /// Statistics for every folder, then normalization for every folder
    #[default]
    All,
    /// Statistics only
    Stats,
    /// Normalization only, from existing tables
    Normalize,
}

impl Stage {
    /// Whether statistics are collected
    pub const fn collects(self) -> bool {
        matches!(self, Self::All | Self::Stats)
    }

    /// Whether folders are normalized
    pub const fn normalizes(self) -> bool {
        matches!(self, Self::All | Self::Normalize)
    }
}

/// Totals over a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Folders whose statistics table was written
    pub folders_with_statistics: usize,
    /// Folders without eligible files
    pub folders_without_data: usize,
    /// Folders normalized
    pub folders_normalized: usize,
    /// Normalized rasters written
    pub files_written: usize,
    /// Existing outputs left untouched
    pub files_skipped: usize,
}

/// Run the requested phases over every configured folder
///
/// Collection finishes for all folders before normalization starts. Folders
/// are processed one at a time; files within a folder run in parallel.
///
/// # Errors
///
/// Returns the first error encountered, including a missing statistics
/// table when a folder without data reaches normalization
pub fn run(
    config: &PipelineConfig,
    stage: Stage,
    progress: &ProgressManager,
) -> Result<PipelineSummary> {
    config.validate()?;
    let mut summary = PipelineSummary::default();

    if stage.collects() {
        info!("Starting calculation of global statistics...");
        for folder in &config.folders {
            match collector::collect_and_save(folder, config, progress)? {
                Some(_) => summary.folders_with_statistics += 1,
                None => summary.folders_without_data += 1,
            }
        }
    }

    if stage.normalizes() {
        info!("Starting normalization of images...");
        for folder in &config.folders {
            let report = normalizer::normalize_from_table(folder, config, progress)?;
            summary.folders_normalized += 1;
            summary.files_written += report.written;
            summary.files_skipped += report.skipped;
        }
        info!("Image normalization complete.");
    }

    Ok(summary)
}
