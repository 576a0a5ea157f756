//! Pipeline constants and runtime configuration

use crate::io::error::{Result, invalid_parameter};
use std::path::{Component, Path, PathBuf};

/// Imagery folders processed when no folders are given on the command line
pub const DEFAULT_FOLDERS: [&str; 4] = [
    "/media/lkm413/storage3/DK_PEAT/images/Planet/DK/clipped_images",
    "/media/lkm413/storage3/DK_PEAT/images/S1",
    "/media/lkm413/storage3/DK_PEAT/images/S2",
    "/media/lkm413/storage3/DK_PEAT/images/DK_DSM",
];

/// Name of the subfolder, inside each source folder, receiving normalized rasters
pub const NORMALIZED_SUBFOLDER: &str = "normalized";

/// Suffix appended to a folder path to name its statistics table
pub const STATS_SUFFIX: &str = "_stats.csv";

/// Extension (case-sensitive, without dot) of eligible raster files
pub const RASTER_EXTENSION: &str = "tif";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Prefix of worker thread names
pub const WORKER_THREAD_PREFIX: &str = "bandnorm-worker";

/// Explicit configuration passed into the pipeline entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Folders to process, in order
    pub folders: Vec<PathBuf>,
    /// Output subfolder name created inside each folder
    pub output_subfolder: String,
    /// Suffix forming `<folder_path><suffix>` statistics table paths
    pub stats_suffix: String,
    /// Extension of eligible raster files
    pub extension: String,
    /// Worker count per folder pool; `None` uses one per CPU
    pub threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            folders: DEFAULT_FOLDERS.iter().map(PathBuf::from).collect(),
            output_subfolder: NORMALIZED_SUBFOLDER.to_string(),
            stats_suffix: STATS_SUFFIX.to_string(),
            extension: RASTER_EXTENSION.to_string(),
            threads: None,
        }
    }
}

impl PipelineConfig {
    /// Default configuration over the given folders
    pub fn with_folders<I, P>(folders: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            folders: folders.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Check that every field can be used to build paths
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::InvalidParameter`] if:
    /// - No folders are configured
    /// - The output subfolder is not a single plain path component
    /// - The statistics suffix or the extension is empty
    /// - The thread count is zero
    pub fn validate(&self) -> Result<()> {
        if self.folders.is_empty() {
            return Err(invalid_parameter(
                "folders",
                &"[]",
                &"at least one folder is required",
            ));
        }

        let mut components = Path::new(&self.output_subfolder).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal {
            return Err(invalid_parameter(
                "output_subfolder",
                &self.output_subfolder,
                &"must be a single directory name",
            ));
        }

        if self.stats_suffix.is_empty() {
            return Err(invalid_parameter(
                "stats_suffix",
                &self.stats_suffix,
                &"must not be empty",
            ));
        }

        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(invalid_parameter(
                "extension",
                &self.extension,
                &"must be a non-empty extension without a leading dot",
            ));
        }

        if self.threads == Some(0) {
            return Err(invalid_parameter(
                "threads",
                &0,
                &"must be at least 1",
            ));
        }

        Ok(())
    }
}
