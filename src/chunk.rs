//! # Chunks
//!
//! After the 8 byte signature, a PNG file is a sequence of chunks. Each one is laid out as:
//!
//! - 4 byte big endian length of the payload.
//! - 4 byte ASCII type tag.
//! - The payload itself.
//! - 4 byte big endian CRC-32 of the type tag and payload.
//!
//! Apple's toolchain adds a `CgBI` chunk in front of `IHDR` to mark files whose image data was
//! rewritten for the iPhone's graphics hardware.

use crate::{
    error::TranscodeError,
    utils::{read_i32, CRC},
};
use std::fmt;

/// Length field + type tag + checksum.
pub const CHUNK_OVERHEAD: usize = 4 + 4 + 4;

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const CGBI: Self = Self(*b"CgBI");
    pub const IHDR: Self = Self(*b"IHDR");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            if byte.is_ascii_graphic() {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{:02x}", byte)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({})", self)
    }
}

/// A single chunk, owning its payload.
#[derive(Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    chunk_type: ChunkType,
    payload: Vec<u8>,
    checksum: u32,
}

impl ChunkRecord {
    /// Creates a chunk and computes its checksum.
    pub fn new(chunk_type: ChunkType, payload: Vec<u8>) -> Self {
        let checksum = compute_checksum(chunk_type, &payload);
        Self { chunk_type, payload, checksum }
    }

    /// Creates a chunk keeping whatever checksum the file declared, even a wrong one.
    pub fn with_checksum(chunk_type: ChunkType, payload: Vec<u8>, checksum: u32) -> Self {
        Self { chunk_type, payload, checksum }
    }

    pub fn chunk_type(&self) -> ChunkType {
        self.chunk_type
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Size of the chunk once written, including length, type and checksum.
    pub fn encoded_len(&self) -> usize {
        CHUNK_OVERHEAD + self.payload.len()
    }

    pub fn has_valid_checksum(&self) -> bool {
        self.checksum == compute_checksum(self.chunk_type, &self.payload)
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl fmt::Debug for ChunkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkRecord")
            .field("chunk_type", &self.chunk_type)
            .field("payload", &(&self.payload[..self.payload.len().min(12)], self.payload.len()))
            .field("checksum", &format_args!("{:#010x}", self.checksum))
            .finish()
    }
}

/// CRC-32 of the type tag followed by the payload.
pub fn compute_checksum(chunk_type: ChunkType, payload: &[u8]) -> u32 {
    let mut digest = CRC.digest();
    digest.update(&chunk_type.0);
    digest.update(payload);
    digest.finalize()
}

/// Width and height as declared by `IHDR`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageSize {
    pub width: i32,
    pub height: i32,
}

impl ImageSize {
    /// Reads the first two fields of an `IHDR` payload.
    pub fn from_ihdr(payload: &[u8]) -> Option<Self> {
        Some(Self { width: read_i32(payload, 0)?, height: read_i32(payload, 4)? })
    }
}

/// The full `IHDR` payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageHeader {
    pub size: ImageSize,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression: u8,
    pub filter: u8,
    pub interlace: u8,
}

impl ImageHeader {
    pub const LENGTH: usize = 13;

    pub fn parse(payload: &[u8]) -> Result<Self, TranscodeError> {
        if payload.len() < Self::LENGTH {
            return Err(TranscodeError::InvalidHeader("IHDR is shorter than 13 bytes"));
        }
        let size = ImageSize::from_ihdr(payload)
            .ok_or(TranscodeError::InvalidHeader("IHDR is shorter than 13 bytes"))?;
        if size.width <= 0 || size.height <= 0 {
            return Err(TranscodeError::InvalidHeader("image dimensions must be positive"));
        }
        Ok(Self {
            size,
            bit_depth: payload[8],
            color_type: payload[9],
            compression: payload[10],
            filter: payload[11],
            interlace: payload[12],
        })
    }

    /// Apple only ships 8-bit, non-interlaced RGBA in CgBI files.
    pub fn is_supported(&self) -> bool {
        self.bit_depth == 8 && self.color_type == 6 && self.interlace == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fixtures;

    #[test]
    fn known_checksum() {
        let iend = ChunkRecord::new(ChunkType::IEND, Vec::new());
        assert_eq!(iend.checksum(), 0xAE426082);
        assert_eq!(iend.encoded_len(), 12);
        assert!(iend.has_valid_checksum());
    }

    #[test]
    fn keeps_declared_checksum() {
        let chunk = ChunkRecord::with_checksum(ChunkType::IEND, Vec::new(), 0xDEADBEEF);
        assert_eq!(chunk.checksum(), 0xDEADBEEF);
        assert!(!chunk.has_valid_checksum());
    }

    #[test]
    fn encoded_len_counts_overhead() {
        let chunk = ChunkRecord::new(ChunkType(*b"tEXt"), vec![0; 20]);
        assert_eq!(chunk.encoded_len(), 8 + 20 + 4);
    }

    #[test]
    fn display_escapes_binary() {
        assert_eq!(ChunkType::CGBI.to_string(), "CgBI");
        assert_eq!(ChunkType([b'a', 0, b'b', 0xFF]).to_string(), "a\\x00b\\xff");
    }

    #[test]
    fn parse_header() {
        let ihdr = fixtures::ihdr(57, 3, 8, 6);
        let header = ImageHeader::parse(ihdr.payload()).unwrap();
        assert_eq!(header.size, ImageSize { width: 57, height: 3 });
        assert!(header.is_supported());

        let palette = fixtures::ihdr(1, 1, 8, 3);
        assert!(!ImageHeader::parse(palette.payload()).unwrap().is_supported());
    }

    #[test]
    fn reject_bad_header() {
        assert!(matches!(ImageHeader::parse(&[0; 8]), Err(TranscodeError::InvalidHeader(_))));
        let negative = fixtures::ihdr(-1, 4, 8, 6);
        assert!(matches!(
            ImageHeader::parse(negative.payload()),
            Err(TranscodeError::InvalidHeader(_))
        ));
        let empty = fixtures::ihdr(0, 4, 8, 6);
        assert!(matches!(
            ImageHeader::parse(empty.payload()),
            Err(TranscodeError::InvalidHeader(_))
        ));
    }
}
