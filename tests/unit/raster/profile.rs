//! Tests for raster profiles, compression mapping and GeoTIFF tag keys

#[cfg(test)]
mod tests {
    use bandnorm::raster::profile::{
        Compression, GEO_KEY_DIRECTORY, GeoTags, MODEL_PIXEL_SCALE, RasterProfile, SampleType, tag,
    };

    // Tests TIFF compression codes map onto writable schemes
    // Verified by dropping the Adobe deflate code
    #[test]
    fn test_compression_from_tag_value() {
        assert_eq!(Compression::from_tag_value(1), Compression::None);
        assert_eq!(Compression::from_tag_value(5), Compression::Lzw);
        assert_eq!(Compression::from_tag_value(8), Compression::Deflate);
        assert_eq!(Compression::from_tag_value(32946), Compression::Deflate);
        // JPEG and PackBits cannot be reproduced
        assert_eq!(Compression::from_tag_value(7), Compression::None);
        assert_eq!(Compression::from_tag_value(32773), Compression::None);
    }

    // Tests numeric tag codes survive the round trip through the tag enum
    // Verified by constructing Tag::Unknown directly
    #[test]
    fn test_tag_codes_round_trip() {
        assert_eq!(tag(MODEL_PIXEL_SCALE).to_u16(), MODEL_PIXEL_SCALE);
        assert_eq!(tag(GEO_KEY_DIRECTORY).to_u16(), GEO_KEY_DIRECTORY);
        assert_eq!(tag(42113).to_u16(), 42113);
    }

    // Tests float32 profile construction defaults
    // Verified by defaulting to LZW compression
    #[test]
    fn test_float32_profile() {
        let profile = RasterProfile::float32(4, 3, 2);
        assert_eq!((profile.width, profile.height), (4, 3));
        assert_eq!(profile.band_count, 2);
        assert_eq!(profile.sample_type, SampleType::F32);
        assert_eq!(profile.compression, Compression::None);
        assert_eq!(profile.geo, GeoTags::default());
    }

    // Tests overriding the sample type keeps everything else
    // Verified by resetting geo tags in with_sample_type
    #[test]
    fn test_with_sample_type_keeps_geo() {
        let mut profile = RasterProfile::float32(2, 2, 1);
        profile.sample_type = SampleType::U16;
        profile.compression = Compression::Lzw;
        profile.geo = GeoTags {
            pixel_scale: Some(vec![10.0, 10.0, 0.0]),
            tiepoints: Some(vec![0.0, 0.0, 0.0, 500_000.0, 6_200_000.0, 0.0]),
            ..GeoTags::default()
        };

        let float = profile.with_sample_type(SampleType::F32);
        assert_eq!(float.sample_type, SampleType::F32);
        assert_eq!(float.compression, Compression::Lzw);
        assert_eq!(float.geo, profile.geo);
    }
}
