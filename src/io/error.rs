//! Error types and path context for pipeline operations

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for all pipeline operations
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Failed to decode a raster file
    #[error("Failed to decode raster '{}': {source}", path.display())]
    RasterDecode {
        /// Path to the raster file
        path: PathBuf,
        /// Underlying TIFF decoding error
        source: tiff::TiffError,
    },

    /// Failed to encode a raster file
    #[error("Failed to encode raster '{}': {source}", path.display())]
    RasterEncode {
        /// Path where encoding was attempted
        path: PathBuf,
        /// Underlying TIFF encoding error
        source: tiff::TiffError,
    },

    /// Raster decoded but its layout cannot be handled
    #[error("Unsupported raster '{}': {reason}", path.display())]
    UnsupportedRaster {
        /// Path to the raster file
        path: PathBuf,
        /// Description of the unsupported layout
        reason: String,
    },

    /// A file does not have the band count of its folder
    #[error(
        "Band count mismatch in '{}': expected {expected} bands, found {found}",
        path.display()
    )]
    BandCountMismatch {
        /// Offending raster file
        path: PathBuf,
        /// Band count established for the folder
        expected: usize,
        /// Band count found in the file
        found: usize,
    },

    /// Normalization requested for a folder without a statistics table
    #[error(
        "No statistics table for folder '{}' (expected '{}')",
        folder.display(),
        path.display()
    )]
    MissingStatistics {
        /// Folder being normalized
        folder: PathBuf,
        /// Where the table was expected
        path: PathBuf,
    },

    /// Statistics table exists but violates the band layout
    #[error("Invalid statistics table '{}': {reason}", path.display())]
    InvalidStatistics {
        /// Path to the table
        path: PathBuf,
        /// Description of what is wrong with the table
        reason: String,
    },

    /// CSV read or write failure on a statistics table
    #[error("Failed to {operation} statistics table '{}': {source}", path.display())]
    StatisticsTable {
        /// Path to the table
        path: PathBuf,
        /// Operation being performed
        operation: &'static str,
        /// Underlying CSV error
        source: csv::Error,
    },

    /// Configuration value failed validation
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// General file system operation failure
    #[error("File system error during {operation} on '{}': {source}", path.display())]
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Numerical computation produced invalid result
    #[error("Computation error in {operation}: {reason}")]
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// The per-folder worker pool could not be started
    #[error("Failed to start worker pool: {source}")]
    WorkerPool {
        /// Underlying rayon error
        #[from]
        source: rayon::ThreadPoolBuildError,
    },
}

/// Convenience type alias for pipeline results
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Attaches the path and operation to bare I/O failures
pub trait WithPath<T> {
    /// Convert an I/O error into [`PipelineError::FileSystem`]
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path and operation applied
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::io::Result<T> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| PipelineError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> PipelineError {
    PipelineError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> PipelineError {
    PipelineError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

/// Create an unsupported raster error
pub fn unsupported_raster(path: &Path, reason: &impl ToString) -> PipelineError {
    PipelineError::UnsupportedRaster {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
