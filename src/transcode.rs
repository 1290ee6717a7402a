//! # Image data
//!
//! CgBI files store the filtered raster as a headerless deflate stream, with every pixel in BGRA
//! order. A standard PNG wants a zlib stream with RGBA pixels. The filter bytes don't need to be
//! touched: PNG filters work byte by byte against the same channel of neighbouring pixels, so
//! swapping whole channels keeps every filtered row valid.
//!
//! ## Related Links
//!
//! - [PNG Specification, filtering](https://www.w3.org/TR/png/#9Filters)

use crate::{
    chunk::{ChunkRecord, ChunkType, ImageSize},
    error::TranscodeError,
};
use flate2::{read::DeflateDecoder, write::ZlibEncoder, Compression};
use log::warn;
use std::io::{Read, Write};

const BYTES_PER_PIXEL: usize = 4;

/// Rebuilds the data of a CgBI image as a single standard `IDAT` chunk.
pub fn transcode(compressed: &[u8], size: ImageSize) -> Result<ChunkRecord, TranscodeError> {
    transcode_with(compressed, size, Compression::default())
}

pub fn transcode_with(
    compressed: &[u8],
    size: ImageSize,
    compression: Compression,
) -> Result<ChunkRecord, TranscodeError> {
    let expected = raster_len(size)?;
    let mut raster = inflate_raw(compressed, expected)?;
    swap_red_blue(&mut raster, size.width as usize);
    let payload = deflate_zlib(&raster, compression)?;
    Ok(ChunkRecord::new(ChunkType::IDAT, payload))
}

/// Bytes in the filtered raster: one filter byte plus four per pixel, on every row.
pub fn raster_len(size: ImageSize) -> Result<usize, TranscodeError> {
    if size.width <= 0 || size.height <= 0 {
        return Err(TranscodeError::InvalidHeader("image dimensions must be positive"));
    }
    let too_large = || TranscodeError::ImageTooLarge { width: size.width, height: size.height };
    (size.width as usize)
        .checked_mul(BYTES_PER_PIXEL)
        .and_then(|pixels| pixels.checked_add(1))
        .and_then(|stride| stride.checked_mul(size.height as usize))
        .ok_or_else(too_large)
}

// Never reads more than one byte past `expected`.
fn inflate_raw(compressed: &[u8], expected: usize) -> Result<Vec<u8>, TranscodeError> {
    let mut raster = Vec::new();
    DeflateDecoder::new(compressed)
        .take((expected as u64).saturating_add(1))
        .read_to_end(&mut raster)
        .map_err(TranscodeError::Decode)?;

    if raster.len() < expected {
        return Err(TranscodeError::RasterSize { expected, actual: raster.len() });
    }
    if raster.len() > expected {
        warn!("image data is longer than the {} bytes IHDR declares, ignoring the rest", expected);
        raster.truncate(expected);
    }
    Ok(raster)
}

/// Turns BGRA rows into RGBA rows in place, leaving each row's filter byte alone.
pub fn swap_red_blue(raster: &mut [u8], width: usize) {
    let stride = width.saturating_mul(BYTES_PER_PIXEL).saturating_add(1);
    for row in raster.chunks_exact_mut(stride) {
        for pixel in row[1..].chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.swap(0, 2);
        }
    }
}

fn deflate_zlib(raster: &[u8], compression: Compression) -> Result<Vec<u8>, TranscodeError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(raster.len() / 2), compression);
    encoder.write_all(raster).map_err(TranscodeError::Encode)?;
    encoder.finish().map_err(TranscodeError::Encode)
}
