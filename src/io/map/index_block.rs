//! .MAP spatial index blocks (type 1).
//!
//! An index page holds up to 25 entries, each an integer MBR plus a pointer
//! to a child index page or an object page. The on-disk R-tree is never
//! rebuilt in memory: pages are decoded into one flat list in arrival order
//! and the tree is walked by following each entry's `id`.
//!
//! Page layout:
//!
//! ```text
//! 0x00  u8   block type (1)
//! 0x01  u8   link
//! 0x02  u16  entry count
//! 0x04  20 × count  entries: XMin, YMin, XMax, YMax, block pointer (i32 each)
//! ```

use log::trace;

use crate::error::Result;
use crate::types::IntRect;

use super::constants::index::LINK_OFFSET;
use super::page::Page;

/// One index entry: MBR plus child/object block pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IndexEntry {
    pub mbr: IntRect,
    /// File offset of a child index page or an object page.
    pub id: i32,
}

impl IndexEntry {
    pub const fn new(mbr: IntRect, id: i32) -> Self {
        Self { mbr, id }
    }
}

/// Header fields of one physical index page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexPageHeader {
    pub link: u8,
    pub entry_count: u16,
}

/// A logical index block: every page seen so far, entries concatenated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexBlock {
    pages: Vec<IndexPageHeader>,
    entries: Vec<IndexEntry>,
}

impl IndexBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a single index page.
    pub fn decode(page: &Page) -> Result<Self> {
        let mut block = Self::new();
        block.append(page)?;
        Ok(block)
    }

    /// Rebuild a logical block from its pages, in chain order.
    pub fn decode_pages(pages: &[Page]) -> Result<Self> {
        let mut block = Self::new();
        for page in pages {
            block.append(page)?;
        }
        Ok(block)
    }

    /// Decode a chained page and append its entries after the existing ones.
    ///
    /// On error the block is left unchanged.
    pub fn append(&mut self, page: &Page) -> Result<()> {
        let mut page = page.clone();
        page.seek(LINK_OFFSET);
        let link = page.read_u8()?;
        let entry_count = page.read_u16()?;

        let mut entries = Vec::with_capacity(usize::from(entry_count));
        for _ in 0..entry_count {
            let mbr = IntRect::new(
                page.read_i32()?,
                page.read_i32()?,
                page.read_i32()?,
                page.read_i32()?,
            );
            let id = page.read_i32()?;
            entries.push(IndexEntry::new(mbr, id));
        }
        trace!("index page: link {link}, {entry_count} entries");

        self.pages.push(IndexPageHeader { link, entry_count });
        self.entries.extend(entries);
        Ok(())
    }

    /// All entries, in page arrival order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Link byte of every page, in arrival order.
    pub fn links(&self) -> Vec<u8> {
        self.pages.iter().map(|p| p.link).collect()
    }

    /// Per-page headers, in arrival order.
    pub fn pages(&self) -> &[IndexPageHeader] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
