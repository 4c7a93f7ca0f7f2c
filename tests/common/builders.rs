//! Synthetic `.map` page builders.
//!
//! Every builder produces a raw 512-byte page laid out exactly as MapInfo
//! writes it, so tests can assemble files page by page.

#![allow(dead_code)]

use mapinfo_map::io::map::constants::header::{MAGIC_COOKIE, OBJ_LEN_ARRAY};
use mapinfo_map::io::map::constants::PAGE_SIZE;
use mapinfo_map::io::map::geometry_type::codes;

pub type RawPage = [u8; PAGE_SIZE];

fn put_u8(data: &mut RawPage, at: usize, v: u8) {
    data[at] = v;
}

fn put_i16(data: &mut RawPage, at: usize, v: i16) {
    data[at..at + 2].copy_from_slice(&v.to_le_bytes());
}

fn put_i32(data: &mut RawPage, at: usize, v: i32) {
    data[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

fn put_f64(data: &mut RawPage, at: usize, v: f64) {
    data[at..at + 8].copy_from_slice(&v.to_le_bytes());
}

/// Page whose only content is its leading block-kind byte.
pub fn kind_page(kind: u8) -> RawPage {
    let mut data = [0u8; PAGE_SIZE];
    data[0] = kind;
    data
}

// ===========================================================================
// Header
// ===========================================================================

/// Builder for page 0.
#[derive(Clone)]
pub struct HeaderPageBuilder {
    data: RawPage,
}

impl HeaderPageBuilder {
    /// Header with the magic cookie, `version`, a 512-byte block size and
    /// the object length table in place.
    pub fn new(version: i16) -> Self {
        let mut data = [0u8; PAGE_SIZE];
        data[..OBJ_LEN_ARRAY.len()].copy_from_slice(&OBJ_LEN_ARRAY);
        put_i32(&mut data, 0x100, MAGIC_COOKIE);
        put_i16(&mut data, 0x104, version);
        put_i16(&mut data, 0x106, PAGE_SIZE as i16);
        put_f64(&mut data, 0x108, 1.0);
        Self { data }
    }

    pub fn magic(mut self, magic: i32) -> Self {
        put_i32(&mut self.data, 0x100, magic);
        self
    }

    pub fn coordsys_to_dist_units(mut self, value: f64) -> Self {
        put_f64(&mut self.data, 0x108, value);
        self
    }

    pub fn bounds(mut self, x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        for (i, v) in [x_min, y_min, x_max, y_max].into_iter().enumerate() {
            put_i32(&mut self.data, 0x110 + 4 * i, v);
        }
        self
    }

    pub fn block_pointers(mut self, index: i32, garbage: i32, tool: i32) -> Self {
        put_i32(&mut self.data, 0x130, index);
        put_i32(&mut self.data, 0x134, garbage);
        put_i32(&mut self.data, 0x138, tool);
        self
    }

    pub fn object_counts(mut self, points: i32, lines: i32, regions: i32, texts: i32) -> Self {
        put_i32(&mut self.data, 0x13C, points);
        put_i32(&mut self.data, 0x140, lines);
        put_i32(&mut self.data, 0x144, regions);
        put_i32(&mut self.data, 0x148, texts);
        self
    }

    pub fn max_coord_buf_size(mut self, size: i32) -> Self {
        put_i32(&mut self.data, 0x14C, size);
        self
    }

    /// The ten single-byte flags starting at 0x15E, in file order.
    pub fn flags(mut self, flags: [u8; 10]) -> Self {
        self.data[0x15E..0x168].copy_from_slice(&flags);
        self
    }

    pub fn precision(mut self, precision: u8) -> Self {
        put_u8(&mut self.data, 0x160, precision);
        self
    }

    pub fn quadrant(mut self, quadrant: u8) -> Self {
        put_u8(&mut self.data, 0x161, quadrant);
        self
    }

    pub fn tool_blocks(mut self, count: i16) -> Self {
        put_i16(&mut self.data, 0x168, count);
        self
    }

    pub fn datum_id(mut self, id: i16) -> Self {
        put_i16(&mut self.data, 0x16A, id);
        self
    }

    pub fn projection(mut self, proj: u8, ellipsoid: u8, units: u8) -> Self {
        put_u8(&mut self.data, 0x16D, proj);
        put_u8(&mut self.data, 0x16E, ellipsoid);
        put_u8(&mut self.data, 0x16F, units);
        self
    }

    pub fn scale(mut self, x: f64, y: f64) -> Self {
        put_f64(&mut self.data, 0x170, x);
        put_f64(&mut self.data, 0x178, y);
        self
    }

    pub fn displacement(mut self, x: f64, y: f64) -> Self {
        put_f64(&mut self.data, 0x180, x);
        put_f64(&mut self.data, 0x188, y);
        self
    }

    pub fn proj_params(mut self, params: [f64; 6]) -> Self {
        for (i, v) in params.into_iter().enumerate() {
            put_f64(&mut self.data, 0x190 + 8 * i, v);
        }
        self
    }

    pub fn datum_shift(mut self, x: f64, y: f64, z: f64) -> Self {
        put_f64(&mut self.data, 0x1C0, x);
        put_f64(&mut self.data, 0x1C8, y);
        put_f64(&mut self.data, 0x1D0, z);
        self
    }

    pub fn datum_params(mut self, params: [f64; 5]) -> Self {
        for (i, v) in params.into_iter().enumerate() {
            put_f64(&mut self.data, 0x1D8 + 8 * i, v);
        }
        self
    }

    pub fn build(self) -> RawPage {
        self.data
    }
}

/// Header continuation page (page 1 of version 500 files).
pub fn continuation_page(affine: Option<(u8, [f64; 6])>) -> RawPage {
    let mut data = [0u8; PAGE_SIZE];
    if let Some((units, params)) = affine {
        data[0] = 1;
        data[1] = units;
        for (i, v) in params.into_iter().enumerate() {
            put_f64(&mut data, 8 + 8 * i, v);
        }
    }
    data
}

// ===========================================================================
// Index
// ===========================================================================

/// Index page from `(x_min, y_min, x_max, y_max, id)` entries.
pub fn index_page(link: u8, entries: &[(i32, i32, i32, i32, i32)]) -> RawPage {
    let mut data = kind_page(1);
    data[1] = link;
    data[2..4].copy_from_slice(&(entries.len() as u16).to_le_bytes());
    for (n, &(x0, y0, x1, y1, id)) in entries.iter().enumerate() {
        let at = 4 + 20 * n;
        for (i, v) in [x0, y0, x1, y1, id].into_iter().enumerate() {
            put_i32(&mut data, at + 4 * i, v);
        }
    }
    data
}

// ===========================================================================
// Object
// ===========================================================================

/// Builder for object pages. `bytes_used` is the length of the records
/// added.
#[derive(Clone, Default)]
pub struct ObjectPageBuilder {
    link: u8,
    center: (i32, i32),
    coord_blocks: (i32, i32),
    body: Vec<u8>,
}

impl ObjectPageBuilder {
    pub fn new(center_x: i32, center_y: i32) -> Self {
        Self {
            center: (center_x, center_y),
            ..Default::default()
        }
    }

    pub fn link(mut self, link: u8) -> Self {
        self.link = link;
        self
    }

    pub fn coord_blocks(mut self, first: i32, last: i32) -> Self {
        self.coord_blocks = (first, last);
        self
    }

    fn u8(mut self, v: u8) -> Self {
        self.body.push(v);
        self
    }

    fn i16(mut self, v: i16) -> Self {
        self.body.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn i32(mut self, v: i32) -> Self {
        self.body.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn record(self, code: u8, id: i32) -> Self {
        self.u8(code).i32(id)
    }

    /// Arbitrary record bytes.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn none(self, id: i32) -> Self {
        self.record(codes::NONE, id)
    }

    pub fn symbol(self, id: i32, x: i32, y: i32, symbol: u8) -> Self {
        self.record(codes::SYMBOL, id).i32(x).i32(y).u8(symbol)
    }

    pub fn symbol_c(self, id: i32, dx: i16, dy: i16, symbol: u8) -> Self {
        self.record(codes::SYMBOL_C, id).i16(dx).i16(dy).u8(symbol)
    }

    pub fn line(self, id: i32, from: (i32, i32), to: (i32, i32), pen: u8) -> Self {
        self.record(codes::LINE, id)
            .i32(from.0)
            .i32(from.1)
            .i32(to.0)
            .i32(to.1)
            .u8(pen)
    }

    pub fn line_c(self, id: i32, from: (i16, i16), to: (i16, i16), pen: u8) -> Self {
        self.record(codes::LINE_C, id)
            .i16(from.0)
            .i16(from.1)
            .i16(to.0)
            .i16(to.1)
            .u8(pen)
    }

    pub fn pline(
        self,
        id: i32,
        coord_ptr: i32,
        coord_size: i32,
        label: (i32, i32),
        mbr: (i32, i32, i32, i32),
        style: u8,
    ) -> Self {
        self.record(codes::PLINE, id)
            .i32(coord_ptr)
            .i32(coord_size)
            .i32(label.0)
            .i32(label.1)
            .i32(mbr.0)
            .i32(mbr.1)
            .i32(mbr.2)
            .i32(mbr.3)
            .u8(style)
    }

    pub fn pline_c(
        self,
        id: i32,
        coord_ptr: i32,
        coord_size: i32,
        label: (i16, i16),
        mbr: (i16, i16, i16, i16),
        style: u8,
    ) -> Self {
        self.record(codes::PLINE_C, id)
            .i32(coord_ptr)
            .i32(coord_size)
            .i16(label.0)
            .i16(label.1)
            .i16(mbr.0)
            .i16(mbr.1)
            .i16(mbr.2)
            .i16(mbr.3)
            .u8(style)
    }

    pub fn rect(self, id: i32, mbr: (i32, i32, i32, i32), pen: u8, brush: u8) -> Self {
        self.record(codes::RECT, id)
            .i32(mbr.0)
            .i32(mbr.1)
            .i32(mbr.2)
            .i32(mbr.3)
            .u8(pen)
            .u8(brush)
    }

    pub fn build(self) -> RawPage {
        let mut data = kind_page(2);
        data[1] = self.link;
        put_i16(&mut data, 2, self.body.len() as i16);
        put_i32(&mut data, 4, self.center.0);
        put_i32(&mut data, 8, self.center.1);
        put_i32(&mut data, 12, self.coord_blocks.0);
        put_i32(&mut data, 16, self.coord_blocks.1);
        data[20..20 + self.body.len()].copy_from_slice(&self.body);
        data
    }
}
