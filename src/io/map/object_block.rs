//! .MAP object data blocks (type 2).
//!
//! An object page holds a 20-byte header followed by a packed run of
//! geometry records. Records have no length prefix: the type code alone
//! determines how many bytes follow, so a single unknown code makes the rest
//! of the page unreadable.
//!
//! Page header:
//!
//! ```text
//! 0x00  u8   block type (2)
//! 0x01  u8   link
//! 0x02  i16  bytes used by records
//! 0x04  i32  center X
//! 0x08  i32  center Y
//! 0x0C  i32  first coordinate block
//! 0x10  i32  last coordinate block
//! 0x14  records...
//! ```

use log::{debug, trace};

use crate::error::{MapError, Result};
use crate::types::{IntRect, MapVertex};

use super::constants::object::{HEADER_SIZE, LINK_OFFSET};
use super::geometry_type::{
    CoordEncoding, FontStyle, FontStyleExt, GeometryKind, TextJustification,
};
use super::index_block::IndexEntry;
use super::page::Page;
use super::reader::MapReaderConfiguration;

/// Out-of-page coordinate data referenced by a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordBlockRef {
    /// File offset of the first coordinate block.
    pub ptr: i32,
    /// Byte length of the coordinate data (character count for text).
    pub size: i32,
}

/// Text record fields that have no slot in [`GeometryRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDetail {
    pub char_count: u16,
    pub justification: TextJustification,
    /// Rotation in tenths of a degree.
    pub angle: i16,
    pub font_style: FontStyle,
    pub font_style_ext: FontStyleExt,
    pub foreground: [u8; 3],
    pub background: [u8; 3],
    /// End point of the label line.
    pub arrow_end: MapVertex,
    pub height: i32,
    pub font_index: u8,
}

/// Kind-specific data of the extended geometry kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryDetail {
    Arc {
        /// Angles in tenths of a degree.
        start_angle: i16,
        end_angle: i16,
        /// Rectangle of the full ellipse the arc is cut from.
        ellipse_mbr: IntRect,
    },
    Region {
        section_count: i16,
        /// Base of the 16-bit deltas in the compressed form.
        compressed_origin: Option<MapVertex>,
    },
    RoundRect {
        x_radius: i32,
        y_radius: i32,
    },
    Text(TextDetail),
}

/// One decoded geometry record.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRecord {
    /// Raw type code.
    pub shape_type: u8,
    /// Bounding rectangle and record id. Points and lines only carry the id.
    pub mbr: IndexEntry,
    pub vertices: Vec<MapVertex>,
    pub label: Option<MapVertex>,
    pub coord_block: Option<CoordBlockRef>,
    /// Symbol, pen or style index.
    pub style: u8,
    pub brush: Option<u8>,
    /// Part offsets of multi-part kinds. Always empty: parts live in
    /// coordinate blocks.
    pub parts: Vec<i32>,
    pub detail: Option<GeometryDetail>,
}

impl GeometryRecord {
    fn new(shape_type: u8, id: i32) -> Self {
        Self {
            shape_type,
            mbr: IndexEntry::new(IntRect::default(), id),
            vertices: Vec::new(),
            label: None,
            coord_block: None,
            style: 0,
            brush: None,
            parts: Vec::new(),
            detail: None,
        }
    }

    pub fn id(&self) -> i32 {
        self.mbr.id
    }

    pub fn kind(&self) -> Option<GeometryKind> {
        GeometryKind::from_code(self.shape_type)
    }

    pub fn encoding(&self) -> CoordEncoding {
        CoordEncoding::from_code(self.shape_type)
    }
}

/// Header fields of one physical object page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectPageHeader {
    pub link: u8,
    pub bytes_used: i16,
    pub center: MapVertex,
    pub first_coord_block: i32,
    pub last_coord_block: i32,
    /// Polyline records decoded on this page but left out of the record list.
    pub withheld_polylines: usize,
}

/// Reads coordinates in one encoding, relative to one origin.
struct CoordReader {
    encoding: CoordEncoding,
    origin: MapVertex,
}

impl CoordReader {
    fn vertex(&self, page: &mut Page) -> Result<MapVertex> {
        match self.encoding {
            CoordEncoding::Compressed => {
                let dx = page.read_i16()?;
                let dy = page.read_i16()?;
                Ok(self.origin.offset(dx, dy))
            }
            CoordEncoding::Absolute => Ok(MapVertex::new(page.read_i32()?, page.read_i32()?)),
        }
    }

    fn rect(&self, page: &mut Page) -> Result<IntRect> {
        let min = self.vertex(page)?;
        let max = self.vertex(page)?;
        Ok(IntRect::new(min.x, min.y, max.x, max.y))
    }

    /// Radius or height: 16-bit in the compressed form, 32-bit otherwise.
    fn length(&self, page: &mut Page) -> Result<i32> {
        match self.encoding {
            CoordEncoding::Compressed => page.read_i16().map(i32::from),
            CoordEncoding::Absolute => page.read_i32(),
        }
    }
}

/// A logical object block: every page seen so far, records concatenated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectBlock {
    pages: Vec<ObjectPageHeader>,
    records: Vec<GeometryRecord>,
}

impl ObjectBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a single object page with the default configuration.
    pub fn decode(page: &Page) -> Result<Self> {
        Self::decode_with(page, &MapReaderConfiguration::default())
    }

    pub fn decode_with(page: &Page, config: &MapReaderConfiguration) -> Result<Self> {
        let mut block = Self::new();
        block.append_with(page, config)?;
        Ok(block)
    }

    /// Rebuild a logical block from its pages, in chain order.
    pub fn decode_pages(pages: &[Page], config: &MapReaderConfiguration) -> Result<Self> {
        let mut block = Self::new();
        for page in pages {
            block.append_with(page, config)?;
        }
        Ok(block)
    }

    pub fn append(&mut self, page: &Page) -> Result<()> {
        self.append_with(page, &MapReaderConfiguration::default())
    }

    /// Decode a chained page and append its records after the existing ones.
    ///
    /// On error the block is left unchanged.
    pub fn append_with(&mut self, page: &Page, config: &MapReaderConfiguration) -> Result<()> {
        let mut page = page.clone();
        page.seek(LINK_OFFSET);
        let link = page.read_u8()?;
        let bytes_used = page.read_i16()?;
        let center = MapVertex::new(page.read_i32()?, page.read_i32()?);
        let first_coord_block = page.read_i32()?;
        let last_coord_block = page.read_i32()?;

        let end = HEADER_SIZE + usize::try_from(bytes_used).unwrap_or(0);
        let mut records = Vec::new();
        let mut withheld_polylines = 0;

        while page.position() < end {
            let record = decode_record(&mut page, center, config)?;
            if record.kind() == Some(GeometryKind::Polyline) && !config.append_polylines {
                trace!("polyline {} decoded, not appended", record.id());
                withheld_polylines += 1;
                continue;
            }
            records.push(record);
        }
        debug!(
            "object page: link {link}, {bytes_used} bytes used, center {center}, {} records",
            records.len()
        );

        self.pages.push(ObjectPageHeader {
            link,
            bytes_used,
            center,
            first_coord_block,
            last_coord_block,
            withheld_polylines,
        });
        self.records.extend(records);
        Ok(())
    }

    /// All appended records, in page and record order.
    pub fn records(&self) -> &[GeometryRecord] {
        &self.records
    }

    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    /// Per-page headers, in arrival order.
    pub fn pages(&self) -> &[ObjectPageHeader] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Link byte of every page, in arrival order.
    pub fn links(&self) -> Vec<u8> {
        self.pages.iter().map(|p| p.link).collect()
    }

    pub fn withheld_polylines(&self) -> usize {
        self.pages.iter().map(|p| p.withheld_polylines).sum()
    }

    fn latest(&self) -> ObjectPageHeader {
        self.pages.last().copied().unwrap_or_default()
    }

    pub fn link(&self) -> u8 {
        self.latest().link
    }

    pub fn bytes_used(&self) -> i16 {
        self.latest().bytes_used
    }

    pub fn center(&self) -> MapVertex {
        self.latest().center
    }

    pub fn first_coord_block(&self) -> i32 {
        self.latest().first_coord_block
    }

    pub fn last_coord_block(&self) -> i32 {
        self.latest().last_coord_block
    }
}

fn decode_record(
    page: &mut Page,
    center: MapVertex,
    config: &MapReaderConfiguration,
) -> Result<GeometryRecord> {
    let offset = page.position();
    let code = page.read_u8()?;
    let id = page.read_i32()?;

    let kind = GeometryKind::from_code(code)
        .ok_or(MapError::UnknownGeometryType { code, offset })?;
    if kind.is_extended() && !config.decode_extended_kinds {
        return Err(MapError::UnsupportedGeometryKind {
            kind: kind.name(),
            code,
            offset,
        });
    }

    let coords = CoordReader {
        encoding: CoordEncoding::from_code(code),
        origin: center,
    };
    let mut record = GeometryRecord::new(code, id);

    match kind {
        GeometryKind::None => {}
        GeometryKind::Symbol => {
            record.vertices.push(coords.vertex(page)?);
            record.style = page.read_u8()?;
        }
        GeometryKind::Line => {
            record.vertices.push(coords.vertex(page)?);
            record.vertices.push(coords.vertex(page)?);
            record.style = page.read_u8()?;
        }
        GeometryKind::Polyline => {
            record.coord_block = Some(read_coord_block(page)?);
            record.label = Some(coords.vertex(page)?);
            record.mbr.mbr = coords.rect(page)?;
            record.style = page.read_u8()?;
        }
        GeometryKind::Arc => {
            let start_angle = page.read_i16()?;
            let end_angle = page.read_i16()?;
            let ellipse_mbr = coords.rect(page)?;
            record.mbr.mbr = coords.rect(page)?;
            record.style = page.read_u8()?;
            record.detail = Some(GeometryDetail::Arc {
                start_angle,
                end_angle,
                ellipse_mbr,
            });
        }
        GeometryKind::Region => {
            record.coord_block = Some(read_coord_block(page)?);
            let section_count = page.read_i16()?;
            let (label, coords) = match coords.encoding {
                CoordEncoding::Compressed => {
                    let dx = page.read_i16()?;
                    let dy = page.read_i16()?;
                    let origin = MapVertex::new(page.read_i32()?, page.read_i32()?);
                    let coords = CoordReader {
                        encoding: CoordEncoding::Compressed,
                        origin,
                    };
                    (origin.offset(dx, dy), coords)
                }
                CoordEncoding::Absolute => (coords.vertex(page)?, coords),
            };
            record.label = Some(label);
            record.mbr.mbr = coords.rect(page)?;
            record.style = page.read_u8()?;
            record.brush = Some(page.read_u8()?);
            record.detail = Some(GeometryDetail::Region {
                section_count,
                compressed_origin: match coords.encoding {
                    CoordEncoding::Compressed => Some(coords.origin),
                    CoordEncoding::Absolute => None,
                },
            });
        }
        GeometryKind::Text => {
            let ptr = page.read_i32()?;
            let char_count = page.read_u16()?;
            record.coord_block = Some(CoordBlockRef {
                ptr,
                size: i32::from(char_count),
            });
            let justification = TextJustification::from_bits_retain(page.read_u16()?);
            let angle = page.read_i16()?;
            let font_style = FontStyle::from_bits_retain(page.read_u8()?);
            let font_style_ext = FontStyleExt::from_bits_retain(page.read_u8()?);
            let foreground = page.read_rgb()?;
            let background = page.read_rgb()?;
            let arrow_end = coords.vertex(page)?;
            let height = coords.length(page)?;
            let font_index = page.read_u8()?;
            record.mbr.mbr = coords.rect(page)?;
            record.style = page.read_u8()?;
            record.detail = Some(GeometryDetail::Text(TextDetail {
                char_count,
                justification,
                angle,
                font_style,
                font_style_ext,
                foreground,
                background,
                arrow_end,
                height,
                font_index,
            }));
        }
        GeometryKind::Rect | GeometryKind::Ellipse => {
            record.mbr.mbr = coords.rect(page)?;
            record.style = page.read_u8()?;
            record.brush = Some(page.read_u8()?);
        }
        GeometryKind::RoundRect => {
            let x_radius = coords.length(page)?;
            let y_radius = coords.length(page)?;
            record.mbr.mbr = coords.rect(page)?;
            record.style = page.read_u8()?;
            record.brush = Some(page.read_u8()?);
            record.detail = Some(GeometryDetail::RoundRect { x_radius, y_radius });
        }
    }

    Ok(record)
}

fn read_coord_block(page: &mut Page) -> Result<CoordBlockRef> {
    Ok(CoordBlockRef {
        ptr: page.read_i32()?,
        size: page.read_i32()?,
    })
}
