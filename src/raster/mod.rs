//! In-memory rasters and GeoTIFF input/output

/// Raster format profile and preserved GeoTIFF tags
pub mod profile;
/// GeoTIFF decoding into float32 band arrays
pub mod reader;
/// Float32 GeoTIFF encoding
pub mod writer;

use crate::io::error::{Result, computation_error};
use ndarray::{Array3, ArrayView2, ArrayViewMut2, Axis};
use profile::RasterProfile;

pub use reader::{read_profile, read_raster};
pub use writer::write_raster;

/// Raster samples as float32, indexed `(band, row, col)`, with their profile
#[derive(Debug, Clone)]
pub struct Raster {
    profile: RasterProfile,
    data: Array3<f32>,
}

impl Raster {
    /// Pair samples with a profile
    ///
    /// # Errors
    ///
    /// Returns an error if the array shape disagrees with the profile's
    /// band count, height and width
    pub fn new(profile: RasterProfile, data: Array3<f32>) -> Result<Self> {
        let expected = (
            profile.band_count,
            profile.height as usize,
            profile.width as usize,
        );
        if data.dim() != expected {
            return Err(computation_error(
                "raster construction",
                &format!(
                    "sample array shape {:?} does not match profile {expected:?}",
                    data.dim()
                ),
            ));
        }
        Ok(Self { profile, data })
    }

    /// Raster with every band filled from `fill(band, row, col)`
    pub fn from_fn<F>(profile: RasterProfile, mut fill: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f32,
    {
        let shape = (
            profile.band_count,
            profile.height as usize,
            profile.width as usize,
        );
        let data = Array3::from_shape_fn(shape, |(b, r, c)| fill(b, r, c));
        Self { profile, data }
    }

    /// Format profile
    pub const fn profile(&self) -> &RasterProfile {
        &self.profile
    }

    /// Replace the profile, keeping samples
    ///
    /// # Errors
    ///
    /// Returns an error if the new profile has different dimensions
    pub fn with_profile(self, profile: RasterProfile) -> Result<Self> {
        Self::new(profile, self.data)
    }

    /// Number of bands
    pub const fn band_count(&self) -> usize {
        self.profile.band_count
    }

    /// Zero-based band view
    pub fn band(&self, index: usize) -> Option<ArrayView2<'_, f32>> {
        (index < self.band_count()).then(|| self.data.index_axis(Axis(0), index))
    }

    /// Iterate over all bands in order
    pub fn bands(&self) -> impl Iterator<Item = ArrayView2<'_, f32>> {
        self.data.axis_iter(Axis(0))
    }

    /// Iterate mutably over all bands in order
    pub fn bands_mut(&mut self) -> impl Iterator<Item = ArrayViewMut2<'_, f32>> {
        self.data.axis_iter_mut(Axis(0))
    }

    /// Samples, `(band, row, col)`
    pub const fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// Pixel-interleaved samples (row, col, band), as stored in a chunky TIFF
    pub fn interleaved(&self) -> Vec<f32> {
        self.data.view().permuted_axes([1, 2, 0]).iter().copied().collect()
    }
}
