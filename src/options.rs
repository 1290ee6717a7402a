use flate2::Compression;

/// Knobs for a conversion. `Options::default()` matches what Apple's files need.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Recompute every chunk's CRC-32 while reading and reject mismatches.
    pub verify_checksums: bool,
    /// zlib level used for the rebuilt `IDAT` chunk.
    pub compression: Compression,
}

impl Default for Options {
    fn default() -> Self {
        Self { verify_checksums: false, compression: Compression::default() }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verify_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }

    /// Clamped to the 0-9 range zlib accepts.
    pub fn compression_level(mut self, level: u32) -> Self {
        self.compression = Compression::new(level.min(9));
        self
    }
}
