//! Per-band global statistics and normalization for GeoTIFF collections
//!
//! The pipeline first accumulates, for every configured folder, the mean and
//! population standard deviation of each band over all of the folder's
//! rasters and saves them as a CSV table next to the folder. It then rescales
//! every raster to zero mean and unit variance per band, writing float32
//! GeoTIFFs into a mirrored output subfolder.

#![forbid(unsafe_code)]

/// Band statistics accumulation and statistics tables
pub mod analysis;
/// Input/output plumbing and error handling
pub mod io;
/// Statistics and normalization phases
pub mod pipeline;
/// In-memory rasters and GeoTIFF input/output
pub mod raster;

pub use io::configuration::PipelineConfig;
pub use io::error::{PipelineError, Result};
