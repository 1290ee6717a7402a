use crate::{ChunkRecord, PngImage, SIGNATURE};
use std::io::{self, Write};

/// Writes the signature and every chunk verbatim. Nothing is validated here.
pub fn serialize(image: &PngImage) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(image.encoded_len());
    buffer.extend_from_slice(SIGNATURE);
    for chunk in image.chunks() {
        encode_chunk(chunk, &mut buffer);
    }
    buffer
}

/// Same as [`serialize`], but straight into `dest`.
pub fn write(image: &PngImage, dest: &mut impl Write) -> io::Result<()> {
    dest.write_all(SIGNATURE)?;
    let mut buffer = Vec::new();
    for chunk in image.chunks() {
        buffer.clear();
        encode_chunk(chunk, &mut buffer);
        dest.write_all(&buffer)?;
    }
    Ok(())
}

fn encode_chunk(chunk: &ChunkRecord, buffer: &mut Vec<u8>) {
    // Payloads come either from a u32 length field or from our own deflate output
    buffer.extend_from_slice(&(chunk.payload().len() as u32).to_be_bytes());
    buffer.extend_from_slice(chunk.chunk_type().as_bytes());
    buffer.extend_from_slice(chunk.payload());
    buffer.extend_from_slice(&chunk.checksum().to_be_bytes());
}
