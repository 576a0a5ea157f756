//! Statistics table persistence as `folder_path,band,mean,std` CSV

use crate::analysis::statistics::{BandStatistics, FolderStatistics};
use crate::io::error::{PipelineError, Result, WithPath};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct StatsRow {
    folder_path: String,
    band: usize,
    mean: f64,
    std: f64,
}

/// Path of a folder's statistics table: the folder path with `suffix` appended
///
/// Trailing separators are dropped first so the table lands next to the
/// folder rather than inside it.
pub fn stats_table_path(folder: &Path, suffix: &str) -> PathBuf {
    let trimmed: PathBuf = folder.components().collect();
    let mut name: OsString = trimmed.into_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn table_error<'a>(
    path: &'a Path,
    operation: &'static str,
) -> impl FnOnce(csv::Error) -> PipelineError + 'a {
    move |source| PipelineError::StatisticsTable {
        path: path.to_path_buf(),
        operation,
        source,
    }
}

fn invalid(path: &Path, reason: String) -> PipelineError {
    PipelineError::InvalidStatistics {
        path: path.to_path_buf(),
        reason,
    }
}

/// Write one row per band, replacing any existing table
///
/// # Errors
///
/// Returns an error if the table cannot be created or written
pub fn write_stats_table(path: &Path, stats: &FolderStatistics) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(table_error(path, "create"))?;
    let folder_path = stats.folder.display().to_string();
    for band in &stats.bands {
        writer
            .serialize(StatsRow {
                folder_path: folder_path.clone(),
                band: band.band,
                mean: band.mean,
                std: band.std,
            })
            .map_err(table_error(path, "write"))?;
    }
    writer.flush().with_path(path, "flush statistics table")?;
    Ok(())
}

/// Load a folder's table, requiring bands 1 to n in order
///
/// # Errors
///
/// Returns an error if:
/// - The table does not exist ([`PipelineError::MissingStatistics`])
/// - A row cannot be parsed
/// - The table is empty or its band indices are not 1 to n in order
pub fn read_stats_table(folder: &Path, path: &Path) -> Result<FolderStatistics> {
    if !path.is_file() {
        return Err(PipelineError::MissingStatistics {
            folder: folder.to_path_buf(),
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path).map_err(table_error(path, "open"))?;
    let mut bands = Vec::new();
    for (position, row) in reader.deserialize::<StatsRow>().enumerate() {
        let row = row.map_err(table_error(path, "parse"))?;
        let expected = position + 1;
        if row.band != expected {
            return Err(invalid(
                path,
                format!("row {expected} holds band {}, expected band {expected}", row.band),
            ));
        }
        bands.push(BandStatistics {
            band: row.band,
            mean: row.mean,
            std: row.std,
        });
    }

    if bands.is_empty() {
        return Err(invalid(path, "table has no band rows".to_string()));
    }

    Ok(FolderStatistics {
        folder: folder.to_path_buf(),
        bands,
        pixel_count: 0,
        file_count: 0,
    })
}
