//! Statistics collection: per-band global mean and standard deviation of a folder

use crate::analysis::statistics::{
    BandAccumulator, FolderStatistics, accumulate_raster, merge_partials,
};
use crate::analysis::table::{stats_table_path, write_stats_table};
use crate::io::configuration::PipelineConfig;
use crate::io::discovery::list_eligible_files;
use crate::io::error::{PipelineError, Result};
use crate::io::progress::ProgressManager;
use crate::pipeline::executor::FolderExecutor;
use crate::raster::{read_profile, read_raster};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Accumulate every band of one file, checking it has `expected_bands` bands
///
/// # Errors
///
/// Returns an error if the file cannot be read or its band count differs
pub fn accumulate_file(path: &Path, expected_bands: usize) -> Result<Vec<BandAccumulator>> {
    let raster = read_raster(path)?;
    if raster.band_count() != expected_bands {
        return Err(PipelineError::BandCountMismatch {
            path: path.to_path_buf(),
            expected: expected_bands,
            found: raster.band_count(),
        });
    }
    Ok(accumulate_raster(&raster))
}

/// Compute the global statistics of a folder's eligible rasters
///
/// The band count is fixed by the first file in sorted order. Returns
/// `Ok(None)` when the folder has no eligible files.
///
/// # Errors
///
/// Returns an error if:
/// - The folder cannot be listed
/// - Any file cannot be read or has a different band count
/// - A band ends up with no pixels
pub fn collect_folder_statistics(
    folder: &Path,
    config: &PipelineConfig,
    progress: &ProgressManager,
) -> Result<Option<FolderStatistics>> {
    let files = list_eligible_files(folder, &config.extension)?;
    let Some(first) = files.first() else {
        warn!(
            "No .{} files found in folder: {}",
            config.extension,
            folder.display()
        );
        return Ok(None);
    };
    let band_count = read_profile(first)?.band_count;

    info!(
        "Calculating global mean and standard deviation for folder: {} ({} files, {band_count} bands)",
        folder.display(),
        files.len()
    );

    let bar = progress.start_batch("statistics", folder, files.len());
    let partials = FolderExecutor::new(config.threads).run(&files, &bar, |file| {
        accumulate_file(file, band_count)
    });
    progress.finish_batch(&bar);

    // Partials are folded here, on the submitting thread
    let mut totals = vec![BandAccumulator::new(); band_count];
    for partial in &partials? {
        merge_partials(&mut totals, partial)?;
    }

    for (index, total) in totals.iter().enumerate() {
        debug!(
            "Band {} of {}: {} pixels, sum {}, sum of squares {}",
            index + 1,
            folder.display(),
            total.count(),
            total.sum(),
            total.sum_of_squares()
        );
    }

    let stats = FolderStatistics::from_accumulators(folder, &totals, files.len())?;
    for band in stats.bands.iter().filter(|b| b.is_degenerate()) {
        warn!(
            "Band {} of {} has std {}; normalized values will not be finite",
            band.band,
            folder.display(),
            band.std
        );
    }
    info!(
        "Finished calculating means and stds for folder: {}",
        folder.display()
    );
    Ok(Some(stats))
}

/// Collect a folder's statistics and persist them as its table
///
/// Returns the table path, or `None` for a folder without eligible files, in
/// which case no table is written.
///
/// # Errors
///
/// Returns an error if collection fails or the table cannot be written
pub fn collect_and_save(
    folder: &Path,
    config: &PipelineConfig,
    progress: &ProgressManager,
) -> Result<Option<PathBuf>> {
    let Some(stats) = collect_folder_statistics(folder, config, progress)? else {
        return Ok(None);
    };
    let table_path = stats_table_path(folder, &config.stats_suffix);
    write_stats_table(&table_path, &stats)?;
    info!(
        "Saved statistics for folder: {} to {}",
        folder.display(),
        table_path.display()
    );
    Ok(Some(table_path))
}
