//! Normalization: rescale every band to zero mean and unit variance

use crate::analysis::statistics::{BandStatistics, FolderStatistics};
use crate::analysis::table::{read_stats_table, stats_table_path};
use crate::io::configuration::PipelineConfig;
use crate::io::discovery::{list_eligible_files, mirrored_output_path, output_root};
use crate::io::error::{PipelineError, Result, WithPath};
use crate::io::progress::ProgressManager;
use crate::pipeline::executor::FolderExecutor;
use crate::raster::profile::SampleType;
use crate::raster::{Raster, read_raster, write_raster};
use log::{debug, info};
use std::path::Path;

/// What happened to one source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// A normalized raster was written
    Written,
    /// The output already existed and was left untouched
    Skipped,
}

/// Files written and skipped in one folder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Normalized rasters written
    pub written: usize,
    /// Existing outputs left untouched
    pub skipped: usize,
}

impl NormalizeReport {
    fn record(mut self, outcome: FileOutcome) -> Self {
        match outcome {
            FileOutcome::Written => self.written += 1,
            FileOutcome::Skipped => self.skipped += 1,
        }
        self
    }
}

/// Rescale every band of `raster` with `(value - mean) / std`
///
/// The result is marked float32; all other profile fields are kept.
///
/// # Errors
///
/// Returns [`PipelineError::BandCountMismatch`] if the statistics do not
/// cover exactly the raster's bands
pub fn normalize_raster(
    mut raster: Raster,
    bands: &[BandStatistics],
    source: &Path,
) -> Result<Raster> {
    if raster.band_count() != bands.len() {
        return Err(PipelineError::BandCountMismatch {
            path: source.to_path_buf(),
            expected: bands.len(),
            found: raster.band_count(),
        });
    }

    for (mut band, stats) in raster.bands_mut().zip(bands) {
        band.mapv_inplace(|value| stats.normalize(value));
    }

    let profile = raster.profile().with_sample_type(SampleType::F32);
    raster.with_profile(profile)
}

/// Normalize one file into its mirrored location under `output_root`
///
/// Intermediate directories are created first. An existing output is never
/// rewritten.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created, the source
/// cannot be read, its band count differs from the statistics, or the output
/// cannot be written
pub fn normalize_file(
    source: &Path,
    source_root: &Path,
    output_root: &Path,
    stats: &FolderStatistics,
) -> Result<FileOutcome> {
    let target = mirrored_output_path(source, source_root, output_root)?;
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).with_path(parent, "create output directory")?;
    }

    if target.exists() {
        debug!(
            "Normalized file already exists, skipping: {}",
            target.display()
        );
        return Ok(FileOutcome::Skipped);
    }

    let normalized = normalize_raster(read_raster(source)?, &stats.bands, source)?;
    write_raster(&target, &normalized)?;
    Ok(FileOutcome::Written)
}

/// Normalize every eligible raster of `folder` with the given statistics
///
/// # Errors
///
/// Returns an error if the output root cannot be created, the folder cannot
/// be listed, or any file fails to normalize
pub fn normalize_folder(
    folder: &Path,
    stats: &FolderStatistics,
    config: &PipelineConfig,
    progress: &ProgressManager,
) -> Result<NormalizeReport> {
    let root = output_root(folder, &config.output_subfolder);
    std::fs::create_dir_all(&root).with_path(&root, "create output root")?;

    let files = list_eligible_files(folder, &config.extension)?;
    info!(
        "Normalizing images in folder: {} ({} files)",
        folder.display(),
        files.len()
    );

    let bar = progress.start_batch("normalize", folder, files.len());
    let outcomes = FolderExecutor::new(config.threads).run(&files, &bar, |file| {
        normalize_file(file, folder, &root, stats)
    });
    progress.finish_batch(&bar);

    let report = outcomes?
        .into_iter()
        .fold(NormalizeReport::default(), NormalizeReport::record);
    info!(
        "Finished normalizing folder: {} ({} written, {} skipped)",
        folder.display(),
        report.written,
        report.skipped
    );
    Ok(report)
}

/// Load a folder's statistics table and normalize the folder with it
///
/// # Errors
///
/// Returns [`PipelineError::MissingStatistics`] if the table is absent, or
/// any error from [`normalize_folder`]
pub fn normalize_from_table(
    folder: &Path,
    config: &PipelineConfig,
    progress: &ProgressManager,
) -> Result<NormalizeReport> {
    let table_path = stats_table_path(folder, &config.stats_suffix);
    let stats = read_stats_table(folder, &table_path)?;
    normalize_folder(folder, &stats, config, progress)
}
