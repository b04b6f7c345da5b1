//! Deterministic PNG writer.
//!
//! Fixed compression and filter settings give byte-identical files for
//! identical rasters, so exported maps can be compared by hash.

use std::io::Write;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::maps::{GrayRaster, MapRef, RgbRaster};

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// PNG export settings.
#[derive(Debug, Clone)]
pub struct PngConfig {
    pub compression: Compression,
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Smallest files, slowest encode.
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }

    /// Fastest encode, larger files.
    pub fn fast() -> Self {
        Self {
            compression: Compression::Fast,
            filter: FilterType::NoFilter,
        }
    }
}

fn encode<W: Write>(
    data: &[u8],
    width: u32,
    height: u32,
    color_type: ColorType,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let channels = match color_type {
        ColorType::Grayscale => 1,
        ColorType::Rgb => 3,
        other => {
            return Err(PngError::InvalidDimensions(format!(
                "unsupported color type {:?}",
                other
            )))
        }
    };
    let expected = width as usize * height as usize * channels;
    if width == 0 || height == 0 || data.len() != expected {
        return Err(PngError::InvalidDimensions(format!(
            "expected {} bytes for {}x{} {:?}, got {}",
            expected,
            width,
            height,
            color_type,
            data.len()
        )));
    }

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    // The png crate writes no timestamps unless asked to.
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(data)?;
    png_writer.finish()?;
    Ok(())
}

/// Write an RGB raster to any writer.
pub fn write_rgb_to_writer<W: Write>(
    raster: &RgbRaster,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    encode(
        &raster.data,
        raster.width,
        raster.height,
        ColorType::Rgb,
        writer,
        config,
    )
}

/// Write a grayscale raster to any writer.
pub fn write_gray_to_writer<W: Write>(
    raster: &GrayRaster,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    encode(
        &raster.data,
        raster.width,
        raster.height,
        ColorType::Grayscale,
        writer,
        config,
    )
}

/// Write any map of a material set to a writer.
pub fn write_map_to_writer<W: Write>(
    map: MapRef<'_>,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    match map {
        MapRef::Rgb(r) => write_rgb_to_writer(r, writer, config),
        MapRef::Gray(r) => write_gray_to_writer(r, writer, config),
    }
}

/// Compute the BLAKE3 hash of PNG data.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Encode a map in memory and return the bytes with their hash.
pub fn write_map_to_vec_with_hash(
    map: MapRef<'_>,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_map_to_writer(map, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_rgb() -> RgbRaster {
        let mut raster = RgbRaster::try_new(32, 32, "test").unwrap();
        for (i, px) in raster.data.chunks_exact_mut(3).enumerate() {
            let (x, y) = (i % 32, i / 32);
            px.copy_from_slice(&[(x * 8) as u8, (y * 8) as u8, 128]);
        }
        raster
    }

    #[test]
    fn test_rgb_deterministic() {
        let raster = gradient_rgb();
        let config = PngConfig::default();

        let (data1, hash1) = write_map_to_vec_with_hash(MapRef::Rgb(&raster), &config).unwrap();
        let (data2, hash2) = write_map_to_vec_with_hash(MapRef::Rgb(&raster), &config).unwrap();

        assert_eq!(data1, data2, "PNG data should be identical");
        assert_eq!(hash1, hash2, "PNG hashes should be identical");
        assert_eq!(&data1[1..4], b"PNG");
    }

    #[test]
    fn test_gray_round_trips_through_decoder() {
        let mut raster = GrayRaster::try_new(5, 3, "test").unwrap();
        for (i, v) in raster.data.iter_mut().enumerate() {
            *v = (i * 17) as u8;
        }
        let (data, _) =
            write_map_to_vec_with_hash(MapRef::Gray(&raster), &PngConfig::fast()).unwrap();

        let decoder = png::Decoder::new(std::io::Cursor::new(data));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (5, 3));
        assert_eq!(info.color_type, ColorType::Grayscale);
        assert_eq!(&buf[..info.buffer_size()], raster.data.as_slice());
    }

    #[test]
    fn test_mismatched_buffer_is_rejected() {
        let mut raster = GrayRaster::try_new(4, 4, "test").unwrap();
        raster.data.pop();
        let err = write_gray_to_writer(&raster, Vec::new(), &PngConfig::default()).unwrap_err();
        assert!(matches!(err, PngError::InvalidDimensions(_)));
    }
}
