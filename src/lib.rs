//! # CgBI Normalizer
//!
//! Apple's build tools rewrite every PNG that goes into an iOS app bundle: they add a `CgBI`
//! chunk, strip the zlib wrapper from the image data (which may also be split across several
//! `IDAT` chunks), and store pixels as BGRA. Most software outside of Apple's can't open those
//! files. This crate undoes the rewrite and produces a standard PNG.
//!
//! ```no_run
//! # fn main() -> cgbi_normalizer::Result<()> {
//! let bytes = std::fs::read("AppIcon60x60@2x.png")?;
//! let png = cgbi_normalizer::normalize_bytes(&bytes)?;
//! std::fs::write("AppIcon.png", png)?;
//! # Ok(())
//! # }
//! ```
//!
//! The steps are also available separately: [`parse`], [`normalize`], [`transcode`] and
//! [`serialize`].

mod chunk;
pub mod error;
mod image;
mod normalize;
mod options;
mod reader;
mod transcode;
mod utils;
mod writer;

pub use chunk::{compute_checksum, ChunkRecord, ChunkType, ImageHeader, ImageSize};
pub use error::{Error, FormatError, Result, TranscodeError};
pub use flate2::Compression;
pub use image::PngImage;
pub use normalize::{normalize, normalize_with};
pub use options::Options;
pub use reader::{parse, parse_with};
pub use transcode::{raster_len, swap_red_blue, transcode, transcode_with};
pub use writer::{serialize, write};

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

pub const SIGNATURE: &[u8] = b"\x89PNG\x0D\x0A\x1A\x0A";

/// Checks for the 8 byte PNG signature.
pub fn has_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(SIGNATURE)
}

/// Checks for the PNG signature followed directly by a `CgBI` chunk, which is where Apple puts it.
pub fn is_cgbi(bytes: &[u8]) -> bool {
    has_signature(bytes)
        && utils::read_stack::<4>(bytes, SIGNATURE.len() + 4) == Some(ChunkType::CGBI.0)
}

/// Parses, normalizes and serializes a CgBI file in one go.
pub fn normalize_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    normalize_bytes_with(bytes, &Options::default())
}

pub fn normalize_bytes_with(bytes: &[u8], options: &Options) -> Result<Vec<u8>> {
    let image = parse_with(bytes, options)?;
    let normalized = normalize_with(&image, options)?;
    Ok(serialize(&normalized))
}

/// Normalizes the file at `src` into a new file at `dest`.
///
/// `dest` must not exist yet. Nothing is created unless the conversion succeeds.
pub fn normalize_file(src: &Path, dest: &Path, options: &Options) -> Result<()> {
    let bytes = fs::read(src)?;
    let normalized = normalize_bytes_with(&bytes, options)?;
    let mut file = OpenOptions::new().write(true).create_new(true).open(dest)?;
    file.write_all(&normalized)?;
    log::info!("wrote {} bytes to {}", normalized.len(), dest.display());
    Ok(())
}
