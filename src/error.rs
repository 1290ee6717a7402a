use crate::chunk::ChunkType;
use std::io;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All one-shot library functions return a `Result` with this error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is not a well-formed PNG chunk stream
    #[error(transparent)]
    Format(#[from] FormatError),
    /// The chunk stream was readable, but its pixel data could not be rebuilt
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    /// The OS encountered a problem while reading or writing a file
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while splitting a byte buffer into chunks.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("data does not start with the PNG signature")]
    BadSignature,
    /// A chunk declares more bytes than the buffer has left.
    #[error(
        "chunk {index} at offset {offset} is truncated: needs {needed} bytes, {available} available"
    )]
    Truncated { index: usize, offset: usize, needed: usize, available: usize },
    /// Only returned when checksum verification is turned on in [`Options`](crate::Options).
    #[error(
        "chunk {index} ({chunk_type}) at offset {offset} has checksum {declared:#010x}, expected {computed:#010x}"
    )]
    ChecksumMismatch {
        index: usize,
        offset: usize,
        chunk_type: ChunkType,
        declared: u32,
        computed: u32,
    },
}

/// Errors raised while rebuilding the image data of a CgBI file.
#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    /// Running the channel swap on a standard PNG would corrupt it, so we refuse.
    #[error("image has no CgBI chunk, it is probably already a standard PNG")]
    NotCgbi,
    #[error("image has no IHDR chunk")]
    MissingHeader,
    #[error("IDAT chunk {index} appears before the IHDR chunk")]
    MisplacedHeader { index: usize },
    #[error("invalid IHDR chunk: {0}")]
    InvalidHeader(&'static str),
    #[error(
        "unsupported pixel format (bit depth {bit_depth}, color type {color_type}, interlace {interlace}), only non-interlaced 8-bit RGBA is handled"
    )]
    UnsupportedPixelFormat { bit_depth: u8, color_type: u8, interlace: u8 },
    #[error("image has no IEND chunk")]
    MissingEnd,
    #[error("image of {width}x{height} pixels is too large to decode")]
    ImageTooLarge { width: i32, height: i32 },
    #[error("couldn't inflate image data: {0}")]
    Decode(#[source] io::Error),
    #[error("image data is {actual} bytes once inflated, expected {expected}")]
    RasterSize { expected: usize, actual: usize },
    #[error("couldn't deflate image data: {0}")]
    Encode(#[source] io::Error),
}
