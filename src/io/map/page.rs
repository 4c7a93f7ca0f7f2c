//! Fixed-size page with a read cursor.
//!
//! A [`Page`] owns one 512-byte block of a `.map` file and hands out
//! little-endian fields at a cursor. Each read takes a slice sized exactly to
//! its field, so no scratch buffer is shared between reads. Decoders jump to
//! the format's fixed offsets with [`Page::seek`].

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{MapError, Result};

use super::block_type::BlockKind;
use super::constants::PAGE_SIZE;

/// One 512-byte page plus a read cursor in `0..=512`.
#[derive(Clone)]
pub struct Page {
    data: [u8; PAGE_SIZE],
    position: usize,
}

impl Page {
    /// Wrap a raw page with the cursor at 0.
    pub fn load(data: [u8; PAGE_SIZE]) -> Self {
        Self { data, position: 0 }
    }

    /// Copy a page out of the first 512 bytes of a slice.
    ///
    /// Bytes past the first page are not copied, so a whole file buffer can
    /// be passed to get page 0. Fails with `TruncatedPage` when fewer than
    /// 512 bytes are supplied.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < PAGE_SIZE {
            return Err(MapError::TruncatedPage {
                offset: 0,
                needed: PAGE_SIZE,
                available: bytes.len(),
            });
        }
        let mut data = [0u8; PAGE_SIZE];
        data.copy_from_slice(&bytes[..PAGE_SIZE]);
        Ok(Self::load(data))
    }

    /// Replace the page contents and reset the cursor.
    pub fn reload(&mut self, data: [u8; PAGE_SIZE]) {
        self.data = data;
        self.position = 0;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        PAGE_SIZE - self.position
    }

    pub fn as_bytes(&self) -> &[u8; PAGE_SIZE] {
        &self.data
    }

    /// Move the cursor to a literal offset.
    ///
    /// # Panics
    ///
    /// Offsets come from the format layout; anything past the page end is a
    /// bug in the caller.
    pub fn seek(&mut self, offset: usize) {
        assert!(
            offset <= PAGE_SIZE,
            "page offset {offset:#X} is beyond the {PAGE_SIZE}-byte page"
        );
        self.position = offset;
    }

    /// Advance the cursor over `count` reserved bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.take(count).map(|_| ())
    }

    /// Block kind named by byte 0. Leaves the cursor alone.
    pub fn peek_block_kind(&self) -> BlockKind {
        BlockKind::from_raw(self.data[0])
    }

    fn take(&mut self, count: usize) -> Result<&[u8]> {
        let available = self.remaining();
        if count > available {
            return Err(MapError::TruncatedPage {
                offset: self.position,
                needed: count,
                available,
            });
        }
        let start = self.position;
        self.position += count;
        Ok(&self.data[start..start + count])
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.take(8)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    /// Read three raw bytes (RGB color triplets).
    pub fn read_rgb(&mut self) -> Result<[u8; 3]> {
        let bytes = self.take(3)?;
        Ok([bytes[0], bytes[1], bytes[2]])
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("kind", &self.peek_block_kind())
            .field("position", &self.position)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(prefix: &[u8]) -> Page {
        let mut data = [0u8; PAGE_SIZE];
        data[..prefix.len()].copy_from_slice(prefix);
        Page::load(data)
    }

    #[test]
    fn test_reads_little_endian_and_advance() {
        let mut page = page_with(&[
            0xFE, // i8 -2
            0x34, 0x12, // i16 0x1234
            0x78, 0x56, 0x34, 0x12, // i32 0x12345678
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // i64 -1
        ]);
        assert_eq!(page.read_i8().unwrap(), -2);
        assert_eq!(page.read_i16().unwrap(), 0x1234);
        assert_eq!(page.read_i32().unwrap(), 0x12345678);
        assert_eq!(page.read_i64().unwrap(), -1);
        assert_eq!(page.position(), 15);
    }

    #[test]
    fn test_read_f64() {
        let mut page = page_with(&1.5f64.to_le_bytes());
        assert_eq!(page.read_f64().unwrap(), 1.5);
        assert_eq!(page.position(), 8);
    }

    #[test]
    fn test_read_past_end_is_truncated() {
        let mut page = page_with(&[]);
        page.seek(PAGE_SIZE - 2);
        let err = page.read_i32().unwrap_err();
        match err {
            MapError::TruncatedPage {
                offset,
                needed,
                available,
            } => {
                assert_eq!(offset, PAGE_SIZE - 2);
                assert_eq!(needed, 4);
                assert_eq!(available, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // Failed read leaves the cursor in place.
        assert_eq!(page.position(), PAGE_SIZE - 2);
        assert_eq!(page.read_i16().unwrap(), 0);
        assert!(page.read_u8().is_err());
    }

    #[test]
    fn test_seek_to_end_is_allowed() {
        let mut page = page_with(&[]);
        page.seek(PAGE_SIZE);
        assert_eq!(page.remaining(), 0);
    }

    #[test]
    #[should_panic]
    fn test_seek_beyond_page_panics() {
        let mut page = page_with(&[]);
        page.seek(PAGE_SIZE + 1);
    }

    #[test]
    fn test_peek_block_kind_has_no_side_effects() {
        let page = page_with(&[2]);
        assert_eq!(page.peek_block_kind(), BlockKind::Object);
        assert_eq!(page.position(), 0);

        let page = page_with(&[99]);
        assert_eq!(page.peek_block_kind(), BlockKind::RawUnknown);
    }

    #[test]
    fn test_reload_resets_cursor() {
        let mut page = page_with(&[1, 2, 3]);
        page.skip(3).unwrap();
        page.reload([7u8; PAGE_SIZE]);
        assert_eq!(page.position(), 0);
        assert_eq!(page.read_u8().unwrap(), 7);
    }

    #[test]
    fn test_from_slice_requires_full_page() {
        assert!(matches!(
            Page::from_slice(&[0u8; 100]),
            Err(MapError::TruncatedPage { available: 100, .. })
        ));
        assert!(Page::from_slice(&[0u8; PAGE_SIZE]).is_ok());
    }

    #[test]
    fn test_from_slice_takes_first_page_only() {
        let mut bytes = vec![1u8; PAGE_SIZE];
        bytes.extend_from_slice(&[2u8; 10]);
        let page = Page::from_slice(&bytes).unwrap();
        assert_eq!(page.as_bytes(), &[1u8; PAGE_SIZE]);
        assert_eq!(page.remaining(), PAGE_SIZE);
    }
}
