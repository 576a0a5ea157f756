//! GeoTIFF decoding into float32 band arrays

use crate::io::error::{PipelineError, Result, WithPath, unsupported_raster};
use crate::raster::Raster;
use crate::raster::profile::{
    Compression, GDAL_METADATA, GDAL_NODATA, GEO_ASCII_PARAMS, GEO_DOUBLE_PARAMS,
    GEO_KEY_DIRECTORY, GeoTags, MODEL_PIXEL_SCALE, MODEL_TIEPOINT, MODEL_TRANSFORMATION,
    RasterProfile, SampleType, tag,
};
use ndarray::Array3;
use num_traits::AsPrimitive;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tiff::TiffResult;
use tiff::decoder::ifd::Value;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;

const PLANAR_SEPARATE: u16 = 2;

fn decode_error(path: &Path) -> impl FnOnce(tiff::TiffError) -> PipelineError + '_ {
    move |source| PipelineError::RasterDecode {
        path: path.to_path_buf(),
        source,
    }
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path).with_path(path, "open raster")?;
    Decoder::new(BufReader::new(file))
        .map(|decoder| decoder.with_limits(Limits::unlimited()))
        .map_err(decode_error(path))
}

// Single-valued tags decode as a scalar, multi-valued ones as a list
fn into_values(value: Value) -> Vec<Value> {
    match value {
        Value::List(values) => values,
        scalar => vec![scalar],
    }
}

fn find_u16<R: Read + Seek>(decoder: &mut Decoder<R>, tag: Tag) -> TiffResult<Option<u16>> {
    decoder.find_tag(tag)?.map(Value::into_u16).transpose()
}

// Per-sample tags may hold one value per band; all bands share the first one
fn find_first_u16<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    tag: Tag,
) -> TiffResult<Option<u16>> {
    decoder
        .find_tag(tag)?
        .and_then(|value| into_values(value).into_iter().next())
        .map(Value::into_u16)
        .transpose()
}

fn find_f64s<R: Read + Seek>(decoder: &mut Decoder<R>, code: u16) -> TiffResult<Option<Vec<f64>>> {
    decoder
        .find_tag(tag(code))?
        .map(|value| into_values(value).into_iter().map(Value::into_f64).collect())
        .transpose()
}

fn find_u16s<R: Read + Seek>(decoder: &mut Decoder<R>, code: u16) -> TiffResult<Option<Vec<u16>>> {
    decoder
        .find_tag(tag(code))?
        .map(|value| into_values(value).into_iter().map(Value::into_u16).collect())
        .transpose()
}

fn find_ascii<R: Read + Seek>(decoder: &mut Decoder<R>, code: u16) -> TiffResult<Option<String>> {
    decoder.find_tag(tag(code))?.map(Value::into_string).transpose()
}

fn read_geo_tags<R: Read + Seek>(decoder: &mut Decoder<R>) -> TiffResult<GeoTags> {
    Ok(GeoTags {
        pixel_scale: find_f64s(decoder, MODEL_PIXEL_SCALE)?,
        tiepoints: find_f64s(decoder, MODEL_TIEPOINT)?,
        transformation: find_f64s(decoder, MODEL_TRANSFORMATION)?,
        key_directory: find_u16s(decoder, GEO_KEY_DIRECTORY)?,
        double_params: find_f64s(decoder, GEO_DOUBLE_PARAMS)?,
        ascii_params: find_ascii(decoder, GEO_ASCII_PARAMS)?,
        gdal_metadata: find_ascii(decoder, GDAL_METADATA)?,
        gdal_nodata: find_ascii(decoder, GDAL_NODATA)?,
    })
}

const fn sample_type(format: u16, bits: u16) -> Option<SampleType> {
    // SampleFormat: 1 unsigned, 2 signed, 3 float
    match (format, bits) {
        (1, 8) => Some(SampleType::U8),
        (1, 16) => Some(SampleType::U16),
        (1, 32) => Some(SampleType::U32),
        (1, 64) => Some(SampleType::U64),
        (2, 8) => Some(SampleType::I8),
        (2, 16) => Some(SampleType::I16),
        (2, 32) => Some(SampleType::I32),
        (2, 64) => Some(SampleType::I64),
        (3, 32) => Some(SampleType::F32),
        (3, 64) => Some(SampleType::F64),
        _ => None,
    }
}

struct Header {
    width: u32,
    height: u32,
    samples: u16,
    bits: u16,
    format: u16,
    compression: u16,
    planar_configuration: u16,
    geo: GeoTags,
}

fn read_header<R: Read + Seek>(decoder: &mut Decoder<R>) -> TiffResult<Header> {
    let (width, height) = decoder.dimensions()?;
    Ok(Header {
        width,
        height,
        samples: find_u16(decoder, Tag::SamplesPerPixel)?.unwrap_or(1),
        bits: find_first_u16(decoder, Tag::BitsPerSample)?.unwrap_or(1),
        format: find_first_u16(decoder, Tag::SampleFormat)?.unwrap_or(1),
        compression: find_u16(decoder, Tag::Compression)?.unwrap_or(1),
        planar_configuration: find_u16(decoder, Tag::PlanarConfiguration)?.unwrap_or(1),
        geo: read_geo_tags(decoder)?,
    })
}

struct Layout {
    profile: RasterProfile,
    planar: bool,
}

fn read_layout<R: Read + Seek>(decoder: &mut Decoder<R>, path: &Path) -> Result<Layout> {
    let header = read_header(decoder).map_err(decode_error(path))?;

    if header.samples == 0 {
        return Err(unsupported_raster(path, &"raster declares zero bands"));
    }
    let sample_type = sample_type(header.format, header.bits).ok_or_else(|| {
        unsupported_raster(
            path,
            &format!(
                "sample format {} with {} bits per sample",
                header.format, header.bits
            ),
        )
    })?;

    Ok(Layout {
        profile: RasterProfile {
            width: header.width,
            height: header.height,
            band_count: usize::from(header.samples),
            sample_type,
            compression: Compression::from_tag_value(header.compression),
            geo: header.geo,
        },
        planar: header.planar_configuration == PLANAR_SEPARATE && header.samples > 1,
    })
}

/// Read a raster's profile without decoding its samples
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its header is not a
/// supported TIFF layout
pub fn read_profile(path: &Path) -> Result<RasterProfile> {
    let mut decoder = open_decoder(path)?;
    read_layout(&mut decoder, path).map(|layout| layout.profile)
}

fn into_f32<T: AsPrimitive<f32>>(samples: Vec<T>) -> Vec<f32> {
    samples.into_iter().map(AsPrimitive::as_).collect()
}

fn decoded_to_f32(result: DecodingResult, path: &Path) -> Result<Vec<f32>> {
    Ok(match result {
        DecodingResult::U8(v) => into_f32(v),
        DecodingResult::U16(v) => into_f32(v),
        DecodingResult::U32(v) => into_f32(v),
        DecodingResult::U64(v) => into_f32(v),
        DecodingResult::I8(v) => into_f32(v),
        DecodingResult::I16(v) => into_f32(v),
        DecodingResult::I32(v) => into_f32(v),
        DecodingResult::I64(v) => into_f32(v),
        DecodingResult::F32(v) => v,
        DecodingResult::F64(v) => into_f32(v),
        #[allow(unreachable_patterns)]
        _ => return Err(unsupported_raster(path, &"sample type has no float32 conversion")),
    })
}

/// Grid of strips or tiles making up one plane
struct ChunkGrid {
    width: usize,
    height: usize,
    chunk_width: usize,
    chunk_height: usize,
    across: usize,
    per_plane: usize,
}

impl ChunkGrid {
    fn new(width: u32, height: u32, (chunk_width, chunk_height): (u32, u32)) -> Option<Self> {
        let (width, height) = (width as usize, height as usize);
        let (chunk_width, chunk_height) = (chunk_width as usize, chunk_height as usize);
        if chunk_width == 0 || chunk_height == 0 {
            return None;
        }
        let across = width.div_ceil(chunk_width);
        let down = height.div_ceil(chunk_height);
        Some(Self {
            width,
            height,
            chunk_width,
            chunk_height,
            across,
            per_plane: across * down,
        })
    }

    /// Top-left pixel and cropped size of the chunk at `index` within a plane
    fn placement(&self, index: usize) -> (usize, usize, usize, usize) {
        let row = (index / self.across) * self.chunk_height;
        let col = (index % self.across) * self.chunk_width;
        let rows = self.chunk_height.min(self.height.saturating_sub(row));
        let cols = self.chunk_width.min(self.width.saturating_sub(col));
        (row, col, rows, cols)
    }
}

// Separate planes are decoded chunk by chunk, one band at a time
fn read_planes<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    profile: &RasterProfile,
    path: &Path,
) -> Result<Array3<f32>> {
    let grid = ChunkGrid::new(profile.width, profile.height, decoder.chunk_dimensions())
        .ok_or_else(|| unsupported_raster(path, &"zero-sized strips or tiles"))?;
    let mut data = Array3::<f32>::zeros((
        profile.band_count,
        profile.height as usize,
        profile.width as usize,
    ));

    for band in 0..profile.band_count {
        for index in 0..grid.per_plane {
            let chunk_index = u32::try_from(band * grid.per_plane + index)
                .map_err(|_| unsupported_raster(path, &"too many strips or tiles"))?;
            let samples = decoded_to_f32(
                decoder.read_chunk(chunk_index).map_err(decode_error(path))?,
                path,
            )?;

            let (row, col, rows, cols) = grid.placement(index);
            // Edge tiles may come back cropped or padded to the full tile
            let stride = if samples.len() == rows * cols {
                cols
            } else if samples.len() == grid.chunk_height * grid.chunk_width {
                grid.chunk_width
            } else {
                return Err(unsupported_raster(
                    path,
                    &format!(
                        "chunk {chunk_index} holds {} samples, expected {}",
                        samples.len(),
                        rows * cols
                    ),
                ));
            };

            for (r, line) in samples.chunks(stride).take(rows).enumerate() {
                for (c, &value) in line.iter().take(cols).enumerate() {
                    if let Some(cell) = data.get_mut((band, row + r, col + c)) {
                        *cell = value;
                    }
                }
            }
        }
    }
    Ok(data)
}

/// Read every band of the first image in a TIFF file, cast to float32
///
/// Both pixel-interleaved and band-separate layouts are accepted, stored in
/// strips or tiles.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or decoded
/// - The sample type is not an 8 to 64 bit integer or float
/// - The decoded sample count does not match the declared dimensions
pub fn read_raster(path: &Path) -> Result<Raster> {
    let mut decoder = open_decoder(path)?;
    let Layout { profile, planar } = read_layout(&mut decoder, path)?;

    let data = if planar {
        read_planes(&mut decoder, &profile, path)?
    } else {
        let samples = decoded_to_f32(decoder.read_image().map_err(decode_error(path))?, path)?;
        let (bands, rows, cols) = (
            profile.band_count,
            profile.height as usize,
            profile.width as usize,
        );
        Array3::from_shape_vec((rows, cols, bands), samples)
            .map_err(|e| {
                unsupported_raster(
                    path,
                    &format!("decoded samples do not form {rows}x{cols}x{bands}: {e}"),
                )
            })?
            .permuted_axes([2, 0, 1])
            .as_standard_layout()
            .into_owned()
    };

    Raster::new(profile, data)
}
