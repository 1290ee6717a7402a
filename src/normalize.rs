//! Rewrites a CgBI chunk list into a standard one.
//!
//! This happens in two steps. First every chunk is classified: `CgBI` is dropped, `IDAT`
//! payloads are concatenated (Apple splits one compressed stream across several chunks), and
//! everything else is kept in order. Then the collected stream is transcoded into one `IDAT`,
//! which goes right before the `IEND`.

use crate::{
    chunk::{ChunkRecord, ChunkType, ImageHeader},
    error::TranscodeError,
    transcode::transcode_with,
    Options, PngImage,
};
use log::{debug, info, warn};

pub fn normalize(image: &PngImage) -> Result<PngImage, TranscodeError> {
    normalize_with(image, &Options::default())
}

/// Builds a new image, `image` itself is never modified.
pub fn normalize_with(image: &PngImage, options: &Options) -> Result<PngImage, TranscodeError> {
    let layout = Layout::classify(image.chunks())?;
    let header = ImageHeader::parse(layout.header.payload())?;
    if !header.is_supported() {
        return Err(TranscodeError::UnsupportedPixelFormat {
            bit_depth: header.bit_depth,
            color_type: header.color_type,
            interlace: header.interlace,
        });
    }

    let idat = transcode_with(&layout.compressed, header.size, options.compression)?;
    info!(
        "merged {} IDAT chunks ({} bytes) into one of {} bytes",
        layout.idat_count,
        layout.compressed.len(),
        idat.payload().len()
    );

    let (before, after) = layout.kept.split_at(layout.end);
    let mut chunks = Vec::with_capacity(layout.kept.len() + 1);
    chunks.extend(before.iter().map(|&chunk| chunk.clone()));
    chunks.push(idat);
    chunks.extend(after.iter().map(|&chunk| chunk.clone()));
    Ok(PngImage::new(chunks))
}

struct Layout<'a> {
    /// Chunks copied to the output, in their original order.
    kept: Vec<&'a ChunkRecord>,
    /// Position of the first `IEND` within `kept`.
    end: usize,
    header: &'a ChunkRecord,
    compressed: Vec<u8>,
    idat_count: usize,
}

impl<'a> Layout<'a> {
    fn classify(chunks: &'a [ChunkRecord]) -> Result<Self, TranscodeError> {
        let mut kept = Vec::with_capacity(chunks.len());
        let mut end = None;
        let mut header = None;
        let mut early_idat = None;
        let mut compressed = Vec::new();
        let mut idat_count = 0;
        let mut is_cgbi = false;

        for (index, chunk) in chunks.iter().enumerate() {
            match chunk.chunk_type() {
                ChunkType::CGBI => {
                    if index != 0 {
                        warn!("CgBI chunk found at position {} instead of first", index);
                    }
                    debug!("chunk {}: dropping CgBI", index);
                    is_cgbi = true;
                }
                ChunkType::IDAT => {
                    debug!("chunk {}: collecting {} bytes of IDAT", index, chunk.payload().len());
                    if header.is_none() && early_idat.is_none() {
                        early_idat = Some(index);
                    }
                    compressed.extend_from_slice(chunk.payload());
                    idat_count += 1;
                }
                chunk_type => {
                    debug!("chunk {}: keeping {}", index, chunk_type);
                    match chunk_type {
                        ChunkType::IHDR if header.is_none() => header = Some(chunk),
                        ChunkType::IEND if end.is_none() => end = Some(kept.len()),
                        _ => (),
                    }
                    kept.push(chunk);
                }
            }
        }

        if !is_cgbi {
            return Err(TranscodeError::NotCgbi);
        }
        let header = header.ok_or(TranscodeError::MissingHeader)?;
        if let Some(index) = early_idat {
            return Err(TranscodeError::MisplacedHeader { index });
        }
        let end = end.ok_or(TranscodeError::MissingEnd)?;

        Ok(Self { kept, end, header, compressed, idat_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fixtures;

    fn types(image: &PngImage) -> Vec<ChunkType> {
        image.chunks().iter().map(ChunkRecord::chunk_type).collect()
    }

    #[test]
    fn rebuilds_chunk_list() {
        let image = PngImage::new(fixtures::cgbi_file(4, 3, 3));
        let normalized = normalize(&image).unwrap();
        assert_eq!(
            types(&normalized),
            [ChunkType::IHDR, ChunkType(*b"tEXt"), ChunkType::IDAT, ChunkType::IEND]
        );
        assert!(!normalized.is_cgbi());
        assert_eq!(normalized.size(), image.size());
    }

    #[test]
    fn passes_other_chunks_through() {
        let image = PngImage::new(fixtures::cgbi_file(2, 2, 1));
        let normalized = normalize(&image).unwrap();
        let keep = |chunk: &&ChunkRecord| {
            chunk.chunk_type() != ChunkType::IDAT && chunk.chunk_type() != ChunkType::CGBI
        };
        let before: Vec<_> = image.chunks().iter().filter(keep).collect();
        let after: Vec<_> = normalized.chunks().iter().filter(keep).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn split_and_single_idat_agree() {
        let single = normalize(&PngImage::new(fixtures::cgbi_file(6, 5, 1))).unwrap();
        let split = normalize(&PngImage::new(fixtures::cgbi_file(6, 5, 4))).unwrap();
        assert_eq!(single, split);
        assert_eq!(split.count(ChunkType::IDAT), 1);
    }

    #[test]
    fn raster_is_swapped() {
        let raster = fixtures::raster(3, 2);
        let mut chunks = vec![fixtures::cgbi(), fixtures::ihdr(3, 2, 8, 6)];
        chunks.extend(fixtures::idats(&raster, 2));
        chunks.push(fixtures::iend());
        let normalized = normalize(&PngImage::new(chunks)).unwrap();

        let idat = normalized.find(ChunkType::IDAT).unwrap();
        let mut expected = raster;
        crate::transcode::swap_red_blue(&mut expected, 3);
        assert_eq!(fixtures::zlib_inflate(idat.payload()), expected);
        assert!(idat.has_valid_checksum());
    }

    #[test]
    fn input_is_left_alone() {
        let image = PngImage::new(fixtures::cgbi_file(2, 2, 2));
        let copy = image.clone();
        normalize(&image).unwrap();
        assert_eq!(image, copy);
    }

    #[test]
    fn chunks_after_iend_stay_after() {
        let mut chunks = fixtures::cgbi_file(1, 1, 1);
        chunks.push(fixtures::text(b"trailing\0data"));
        let normalized = normalize(&PngImage::new(chunks)).unwrap();
        assert_eq!(
            types(&normalized),
            [
                ChunkType::IHDR,
                ChunkType(*b"tEXt"),
                ChunkType::IDAT,
                ChunkType::IEND,
                ChunkType(*b"tEXt")
            ]
        );
    }

    #[test]
    fn refuses_standard_png() {
        let image = PngImage::new(fixtures::cgbi_file(2, 2, 1));
        let normalized = normalize(&image).unwrap();
        assert!(matches!(normalize(&normalized), Err(TranscodeError::NotCgbi)));
    }

    #[test]
    fn missing_header() {
        let mut chunks = fixtures::cgbi_file(2, 2, 1);
        chunks.retain(|chunk| chunk.chunk_type() != ChunkType::IHDR);
        assert!(matches!(normalize(&PngImage::new(chunks)), Err(TranscodeError::MissingHeader)));
    }

    #[test]
    fn misplaced_header() {
        let raster = fixtures::raster(1, 1);
        let mut chunks = vec![fixtures::cgbi()];
        chunks.extend(fixtures::idats(&raster, 1));
        chunks.push(fixtures::ihdr(1, 1, 8, 6));
        chunks.push(fixtures::iend());
        assert!(matches!(
            normalize(&PngImage::new(chunks)),
            Err(TranscodeError::MisplacedHeader { index: 1 })
        ));
    }

    #[test]
    fn missing_end() {
        let mut chunks = fixtures::cgbi_file(2, 2, 1);
        chunks.pop();
        assert!(matches!(normalize(&PngImage::new(chunks)), Err(TranscodeError::MissingEnd)));
    }

    #[test]
    fn unsupported_pixel_format() {
        let mut chunks = fixtures::cgbi_file(2, 2, 1);
        chunks[1] = fixtures::ihdr(2, 2, 8, 2);
        assert!(matches!(
            normalize(&PngImage::new(chunks)),
            Err(TranscodeError::UnsupportedPixelFormat {
                bit_depth: 8,
                color_type: 2,
                interlace: 0
            })
        ));
    }

    #[test]
    fn corrupt_image_data() {
        let chunks = vec![
            fixtures::cgbi(),
            fixtures::ihdr(1, 1, 8, 6),
            ChunkRecord::new(ChunkType::IDAT, vec![0xFF; 8]),
            fixtures::iend(),
        ];
        assert!(matches!(normalize(&PngImage::new(chunks)), Err(TranscodeError::Decode(_))));
    }
}
