/// CRC-32 as used by PNG (ISO-HDLC, which is the IEEE polynomial).
pub(crate) const CRC: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);

/// Copies `N` bytes starting at `offset`, or `None` if the slice is too short.
pub(crate) fn read_stack<const N: usize>(src: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    src.get(offset..end)?.try_into().ok()
}

pub(crate) fn read_u32(src: &[u8], offset: usize) -> Option<u32> {
    read_stack::<4>(src, offset).map(u32::from_be_bytes)
}

pub(crate) fn read_i32(src: &[u8], offset: usize) -> Option<i32> {
    read_stack::<4>(src, offset).map(i32::from_be_bytes)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_fields() {
        let bytes = [0x00, 0x00, 0x01, 0x02, 0xFF, 0xFF, 0xFF, 0xFE];
        assert_eq!(read_u32(&bytes, 0), Some(0x0102));
        assert_eq!(read_i32(&bytes, 4), Some(-2));
        assert_eq!(read_stack::<2>(&bytes, 2), Some([0x01, 0x02]));
    }

    #[test]
    fn short_reads() {
        let bytes = [0x00, 0x01, 0x02];
        assert_eq!(read_u32(&bytes, 0), None);
        assert_eq!(read_stack::<2>(&bytes, 2), None);
        assert_eq!(read_stack::<1>(&bytes, usize::MAX), None);
    }

    #[test]
    fn iend_checksum() {
        assert_eq!(CRC.checksum(b"IEND"), 0xAE426082);
    }
}
