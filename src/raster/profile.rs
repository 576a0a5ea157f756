//! Raster format profile: dimensions, sample type, compression and GeoTIFF tags

use tiff::tags::Tag;

/// Sample data type of a decoded raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    /// Unsigned 8-bit integer
    U8,
    /// Unsigned 16-bit integer
    U16,
    /// Unsigned 32-bit integer
    U32,
    /// Unsigned 64-bit integer
    U64,
    /// Signed 8-bit integer
    I8,
    /// Signed 16-bit integer
    I16,
    /// Signed 32-bit integer
    I32,
    /// Signed 64-bit integer
    I64,
    /// IEEE 32-bit float
    F32,
    /// IEEE 64-bit float
    F64,
}

/// Compression scheme applied to strips or tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// No compression
    #[default]
    None,
    /// Lempel-Ziv-Welch
    Lzw,
    /// Deflate (zlib)
    Deflate,
}

impl Compression {
    /// Map a TIFF `Compression` tag value onto a scheme the encoder can reproduce
    ///
    /// Schemes the encoder cannot write (JPEG, `PackBits`, ...) fall back to none.
    pub const fn from_tag_value(value: u16) -> Self {
        match value {
            5 => Self::Lzw,
            8 | 32946 => Self::Deflate,
            _ => Self::None,
        }
    }
}

/// GeoTIFF tags copied verbatim from source to output
///
/// Codes follow the GeoTIFF 1.1 and GDAL private tag registrations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoTags {
    /// `ModelPixelScaleTag` (33550)
    pub pixel_scale: Option<Vec<f64>>,
    /// `ModelTiepointTag` (33922)
    pub tiepoints: Option<Vec<f64>>,
    /// `ModelTransformationTag` (34264)
    pub transformation: Option<Vec<f64>>,
    /// `GeoKeyDirectoryTag` (34735)
    pub key_directory: Option<Vec<u16>>,
    /// `GeoDoubleParamsTag` (34736)
    pub double_params: Option<Vec<f64>>,
    /// `GeoAsciiParamsTag` (34737)
    pub ascii_params: Option<String>,
    /// `GDAL_METADATA` (42112)
    pub gdal_metadata: Option<String>,
    /// `GDAL_NODATA` (42113)
    pub gdal_nodata: Option<String>,
}

/// Tag code of `ModelPixelScaleTag`
pub const MODEL_PIXEL_SCALE: u16 = 33550;
/// Tag code of `ModelTiepointTag`
pub const MODEL_TIEPOINT: u16 = 33922;
/// Tag code of `ModelTransformationTag`
pub const MODEL_TRANSFORMATION: u16 = 34264;
/// Tag code of `GeoKeyDirectoryTag`
pub const GEO_KEY_DIRECTORY: u16 = 34735;
/// Tag code of `GeoDoubleParamsTag`
pub const GEO_DOUBLE_PARAMS: u16 = 34736;
/// Tag code of `GeoAsciiParamsTag`
pub const GEO_ASCII_PARAMS: u16 = 34737;
/// Tag code of `GDAL_METADATA`
pub const GDAL_METADATA: u16 = 42112;
/// Tag code of `GDAL_NODATA`
pub const GDAL_NODATA: u16 = 42113;
/// Tag code of `ExtraSamples`
pub const EXTRA_SAMPLES: u16 = 338;

/// Resolve a numeric tag code to the decoder's tag key
///
/// Known codes map to their named variants, so lookups must go through here
/// rather than `Tag::Unknown`.
pub fn tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

/// Everything about a raster except its samples
#[derive(Debug, Clone, PartialEq)]
pub struct RasterProfile {
    /// Columns
    pub width: u32,
    /// Rows
    pub height: u32,
    /// Number of bands (samples per pixel)
    pub band_count: usize,
    /// Sample type as stored on disk
    pub sample_type: SampleType,
    /// Compression used on disk
    pub compression: Compression,
    /// Georeferencing and GDAL metadata
    pub geo: GeoTags,
}

impl RasterProfile {
    /// Profile of an uncompressed float32 raster without georeferencing
    pub fn float32(width: u32, height: u32, band_count: usize) -> Self {
        Self {
            width,
            height,
            band_count,
            sample_type: SampleType::F32,
            compression: Compression::None,
            geo: GeoTags::default(),
        }
    }

    /// Same profile with the sample type overridden, as written by the normalizer
    #[must_use]
    pub fn with_sample_type(&self, sample_type: SampleType) -> Self {
        Self {
            sample_type,
            ..self.clone()
        }
    }
}
