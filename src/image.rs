use crate::chunk::{ChunkRecord, ChunkType, ImageSize};

/// An ordered list of chunks, plus the size declared by the first `IHDR`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PngImage {
    chunks: Vec<ChunkRecord>,
    size: Option<ImageSize>,
}

impl PngImage {
    pub fn new(chunks: Vec<ChunkRecord>) -> Self {
        let size = chunks
            .iter()
            .find(|chunk| chunk.chunk_type() == ChunkType::IHDR)
            .and_then(|ihdr| ImageSize::from_ihdr(ihdr.payload()));
        Self { chunks, size }
    }

    pub fn chunks(&self) -> &[ChunkRecord] {
        &self.chunks
    }

    pub fn into_chunks(self) -> Vec<ChunkRecord> {
        self.chunks
    }

    /// `None` if there's no `IHDR`, or it is too short to hold a size.
    pub fn size(&self) -> Option<ImageSize> {
        self.size
    }

    pub fn find(&self, chunk_type: ChunkType) -> Option<&ChunkRecord> {
        self.chunks.iter().find(|chunk| chunk.chunk_type() == chunk_type)
    }

    pub fn contains(&self, chunk_type: ChunkType) -> bool {
        self.find(chunk_type).is_some()
    }

    pub fn count(&self, chunk_type: ChunkType) -> usize {
        self.chunks.iter().filter(|chunk| chunk.chunk_type() == chunk_type).count()
    }

    pub fn is_cgbi(&self) -> bool {
        self.contains(ChunkType::CGBI)
    }

    /// Size of the image once serialized, signature included.
    pub fn encoded_len(&self) -> usize {
        crate::SIGNATURE.len() + self.chunks.iter().map(ChunkRecord::encoded_len).sum::<usize>()
    }
}
