//! Splits a PNG byte buffer into chunks.
//!
//! The loop is driven by the buffer, not by the chunk types: it stops when the buffer is
//! exhausted, whether or not an `IEND` was seen. Every declared length is checked against what is
//! left before slicing.

use crate::{
    chunk::{compute_checksum, ChunkRecord, ChunkType, CHUNK_OVERHEAD},
    error::FormatError,
    utils::{read_stack, read_u32},
    Options, PngImage, SIGNATURE,
};
use log::debug;

pub fn parse(buffer: &[u8]) -> Result<PngImage, FormatError> {
    parse_with(buffer, &Options::default())
}

pub fn parse_with(buffer: &[u8], options: &Options) -> Result<PngImage, FormatError> {
    if !buffer.starts_with(SIGNATURE) {
        return Err(FormatError::BadSignature);
    }

    let mut chunks = Vec::new();
    let mut offset = SIGNATURE.len();
    while offset < buffer.len() {
        let index = chunks.len();
        let chunk = read_chunk(buffer, offset, index)?;
        debug!(
            "chunk {} ({}) at offset {}, {} bytes",
            index,
            chunk.chunk_type(),
            offset,
            chunk.payload().len()
        );
        if options.verify_checksums && !chunk.has_valid_checksum() {
            return Err(FormatError::ChecksumMismatch {
                index,
                offset,
                chunk_type: chunk.chunk_type(),
                declared: chunk.checksum(),
                computed: compute_checksum(chunk.chunk_type(), chunk.payload()),
            });
        }
        offset += chunk.encoded_len();
        chunks.push(chunk);
    }

    Ok(PngImage::new(chunks))
}

// Layout relative to `offset`: length at 0..4, type at 4..8, payload, then the checksum.
fn read_chunk(buffer: &[u8], offset: usize, index: usize) -> Result<ChunkRecord, FormatError> {
    let available = buffer.len() - offset;
    let truncated = |needed| FormatError::Truncated { index, offset, needed, available };

    let length = read_u32(buffer, offset).ok_or_else(|| truncated(CHUNK_OVERHEAD))? as usize;
    let needed = length.checked_add(CHUNK_OVERHEAD).ok_or_else(|| truncated(usize::MAX))?;
    if needed > available {
        return Err(truncated(needed));
    }

    let chunk_type =
        read_stack::<4>(buffer, offset + 4).map(ChunkType).ok_or_else(|| truncated(needed))?;
    let payload_start = offset + 8;
    let payload_end = payload_start + length;
    let payload = buffer[payload_start..payload_end].to_vec();
    let checksum = read_u32(buffer, payload_end).ok_or_else(|| truncated(needed))?;

    Ok(ChunkRecord::with_checksum(chunk_type, payload, checksum))
}
