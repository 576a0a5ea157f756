//! Float32 GeoTIFF encoding with atomic placement

use crate::io::error::{PipelineError, Result, WithPath, unsupported_raster};
use crate::raster::Raster;
use crate::raster::profile::{
    Compression, EXTRA_SAMPLES, GDAL_METADATA, GDAL_NODATA, GEO_ASCII_PARAMS, GEO_DOUBLE_PARAMS,
    GEO_KEY_DIRECTORY, MODEL_PIXEL_SCALE, MODEL_TIEPOINT, MODEL_TRANSFORMATION, tag,
};
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use tiff::TiffResult;
use tiff::encoder::TiffEncoder;
use tiff::encoder::colortype::ColorType;
use tiff::encoder::{Compression as TiffCompression, DeflateLevel};
use tiff::tags::{PhotometricInterpretation, SampleFormat};

/// Largest band count the encoder is instantiated for
pub const MAX_WRITE_BANDS: usize = 32;

const IEEE_FLOAT: SampleFormat = SampleFormat::IEEEFP;

/// `N` float32 samples per pixel, chunky, min-is-black
struct Float32Bands<const N: usize>;

impl<const N: usize> ColorType for Float32Bands<N> {
    type Inner = f32;
    const TIFF_VALUE: PhotometricInterpretation = PhotometricInterpretation::BlackIsZero;
    const BITS_PER_SAMPLE: &'static [u16] = &[32; N];
    const SAMPLE_FORMAT: &'static [SampleFormat] = &[IEEE_FLOAT; N];

    // No predictor is ever configured for float output, so rows pass through
    fn horizontal_predict(row: &[f32], result: &mut Vec<f32>) {
        result.extend_from_slice(row);
    }
}

const fn tiff_compression(compression: Compression) -> TiffCompression {
    match compression {
        Compression::None => TiffCompression::Uncompressed,
        Compression::Lzw => TiffCompression::Lzw,
        Compression::Deflate => TiffCompression::Deflate(DeflateLevel::Balanced),
    }
}

fn encode_bands<W, C>(writer: W, raster: &Raster) -> TiffResult<()>
where
    W: Write + Seek,
    C: ColorType<Inner = f32>,
{
    let profile = raster.profile();
    let mut tiff = TiffEncoder::new(writer)?.with_compression(tiff_compression(profile.compression));
    let mut image = tiff.new_image::<C>(profile.width, profile.height)?;
    let directory = image.encoder();
    let geo = &profile.geo;

    // Samples past the first are unassociated extras, as GDAL writes them
    if raster.band_count() > 1 {
        let extra = vec![0_u16; raster.band_count() - 1];
        directory.write_tag(tag(EXTRA_SAMPLES), extra.as_slice())?;
    }

    for (code, values) in [
        (MODEL_PIXEL_SCALE, &geo.pixel_scale),
        (MODEL_TIEPOINT, &geo.tiepoints),
        (MODEL_TRANSFORMATION, &geo.transformation),
        (GEO_DOUBLE_PARAMS, &geo.double_params),
    ] {
        if let Some(values) = values {
            directory.write_tag(tag(code), values.as_slice())?;
        }
    }
    if let Some(keys) = &geo.key_directory {
        directory.write_tag(tag(GEO_KEY_DIRECTORY), keys.as_slice())?;
    }
    for (code, text) in [
        (GEO_ASCII_PARAMS, &geo.ascii_params),
        (GDAL_METADATA, &geo.gdal_metadata),
        (GDAL_NODATA, &geo.gdal_nodata),
    ] {
        if let Some(text) = text {
            directory.write_tag(tag(code), text.as_str())?;
        }
    }

    image.write_data(&raster.interleaved())
}

macro_rules! encode_by_band_count {
    ($writer:expr, $raster:expr, $($n:literal)+) => {
        match $raster.band_count() {
            $($n => Some(encode_bands::<_, Float32Bands<$n>>($writer, $raster)),)+
            _ => None,
        }
    };
}

fn encode<W: Write + Seek>(writer: W, raster: &Raster) -> Option<TiffResult<()>> {
    encode_by_band_count!(
        writer, raster,
        1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16
        17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32
    )
}

/// Write `raster` to `path` as a float32 GeoTIFF
///
/// Dimensions, band count, compression and GeoTIFF tags come from the
/// raster's profile; the sample type on disk is always IEEE float 32. The file
/// is staged next to `path` and renamed into place once fully encoded.
///
/// # Errors
///
/// Returns an error if:
/// - The band count is zero or above [`MAX_WRITE_BANDS`]
/// - The staging file cannot be created, written or renamed
/// - TIFF encoding fails
pub fn write_raster(path: &Path, raster: &Raster) -> Result<()> {
    if raster.band_count() == 0 || raster.band_count() > MAX_WRITE_BANDS {
        return Err(unsupported_raster(
            path,
            &format!(
                "cannot write {} bands (1 to {MAX_WRITE_BANDS} supported)",
                raster.band_count()
            ),
        ));
    }

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::Builder::new()
        .prefix(".bandnorm-")
        .suffix(".partial")
        .tempfile_in(directory)
        .with_path(directory, "create staging file")?;

    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        let encoded = encode(&mut writer, raster).ok_or_else(|| {
            unsupported_raster(path, &format!("{} bands", raster.band_count()))
        })?;
        encoded.map_err(|source| PipelineError::RasterEncode {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().with_path(path, "flush raster")?;
    }

    staged
        .persist(path)
        .map_err(|e| e.error)
        .with_path(path, "move raster into place")?;
    Ok(())
}
