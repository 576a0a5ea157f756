//! Per-band accumulation of global mean and population standard deviation

use crate::io::error::{Result, computation_error};
use crate::raster::Raster;
use ndarray::ArrayView2;
use std::path::{Path, PathBuf};

/// Running pixel count, mean and sum of squared deviations for one band
///
/// Partial accumulators from different files combine with [`Self::merge`],
/// which applies the pairwise update of Chan, Golub and `LeVeque`. Sum and
/// sum of squares remain available for callers expecting the naive form.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
}

impl BandAccumulator {
    /// Accumulator over no pixels
    pub const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    /// Two-pass accumulation over every sample of a band
    pub fn from_band(band: ArrayView2<'_, f32>) -> Self {
        Self::from_samples(band.iter().copied())
    }

    /// Two-pass accumulation over a cloneable sample iterator
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: Iterator<Item = f32> + Clone,
    {
        let (count, sum) = samples
            .clone()
            .fold((0_u64, 0.0_f64), |(n, s), v| (n + 1, s + f64::from(v)));
        if count == 0 {
            return Self::new();
        }
        let mean = sum / count as f64;
        let m2 = samples
            .map(|v| {
                let d = f64::from(v) - mean;
                d * d
            })
            .sum();
        Self { count, mean, m2 }
    }

    /// Fold another partial accumulator into this one
    pub fn merge(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let weight = other.count as f64 / count as f64;
        self.mean += delta * weight;
        self.m2 += other.m2 + delta * delta * self.count as f64 * weight;
        self.count = count;
    }

    /// Pixels accumulated
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Arithmetic mean, `None` before any pixel
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Population standard deviation, `None` before any pixel
    pub fn population_std(&self) -> Option<f64> {
        (self.count > 0).then(|| (self.m2 / self.count as f64).max(0.0).sqrt())
    }

    /// Sum of all samples
    pub fn sum(&self) -> f64 {
        self.mean * self.count as f64
    }

    /// Sum of all squared samples
    pub fn sum_of_squares(&self) -> f64 {
        self.m2 + self.mean * self.mean * self.count as f64
    }
}

/// Accumulate every band of a raster
pub fn accumulate_raster(raster: &Raster) -> Vec<BandAccumulator> {
    raster.bands().map(BandAccumulator::from_band).collect()
}

/// Fold per-file accumulators band by band
///
/// # Errors
///
/// Returns an error if two partials disagree on band count
pub fn merge_partials(
    totals: &mut [BandAccumulator],
    partial: &[BandAccumulator],
) -> Result<()> {
    if totals.len() != partial.len() {
        return Err(computation_error(
            "statistics merge",
            &format!(
                "partial has {} bands, totals have {}",
                partial.len(),
                totals.len()
            ),
        ));
    }
    for (total, part) in totals.iter_mut().zip(partial) {
        total.merge(part);
    }
    Ok(())
}

/// Mean and standard deviation of one band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStatistics {
    /// One-based band index
    pub band: usize,
    /// Global mean
    pub mean: f64,
    /// Global population standard deviation
    pub std: f64,
}

impl BandStatistics {
    /// Rescale one sample to zero mean and unit variance
    ///
    /// Computed in float64 and narrowed once. A zero `std` yields a
    /// non-finite result.
    pub fn normalize(&self, value: f32) -> f32 {
        ((f64::from(value) - self.mean) / self.std) as f32
    }

    /// Whether dividing by `std` yields finite values
    pub fn is_degenerate(&self) -> bool {
        self.std == 0.0 || !self.std.is_finite() || !self.mean.is_finite()
    }
}

/// Global statistics of every band of one folder
#[derive(Debug, Clone, PartialEq)]
pub struct FolderStatistics {
    /// Folder the statistics describe
    pub folder: PathBuf,
    /// Statistics ordered by band, indices 1 to `bands.len()`
    pub bands: Vec<BandStatistics>,
    /// Pixels per band behind the statistics, zero when loaded from a table
    pub pixel_count: u64,
    /// Files behind the statistics, zero when loaded from a table
    pub file_count: usize,
}

impl FolderStatistics {
    /// Derive statistics from folder-wide accumulators
    ///
    /// # Errors
    ///
    /// Returns an error if no bands are given or a band saw no pixels
    pub fn from_accumulators(
        folder: &Path,
        totals: &[BandAccumulator],
        file_count: usize,
    ) -> Result<Self> {
        if totals.is_empty() {
            return Err(computation_error("band statistics", &"no bands accumulated"));
        }
        let bands = totals
            .iter()
            .enumerate()
            .map(|(index, acc)| match (acc.mean(), acc.population_std()) {
                (Some(mean), Some(std)) => Ok(BandStatistics {
                    band: index + 1,
                    mean,
                    std,
                }),
                _ => Err(computation_error(
                    "band statistics",
                    &format!("band {} has no pixels", index + 1),
                )),
            })
            .collect::<Result<Vec<_>>>()?;
        let pixel_count = totals.first().map_or(0, BandAccumulator::count);

        Ok(Self {
            folder: folder.to_path_buf(),
            bands,
            pixel_count,
            file_count,
        })
    }

    /// Number of bands
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }
}
