//! .MAP header block reader.
//!
//! Page 0 of every `.map` file carries the global metadata: format version,
//! integer bounds, block pointers, object counts, coordinate precision and
//! the projection descriptor. Version 500 files continue on page 1 with the
//! optional affine transform.
//!
//! Several fields are only meaningful from a given version on; the rules are
//! gathered in [`VersionGates`].

use log::debug;

use crate::error::{MapError, Result};
use crate::types::{BoundingBox2D, IntRect, Vector2};

use super::constants::header::{
    AFFINE_PARAM_COUNT, AFFINE_RESERVED_BYTES, BLOCK_POINTERS_OFFSET,
    DATUM_ID_MIN_VERSION, DATUM_PARAMS_JUNK_MAX_VERSION, DATUM_PARAM_COUNT, FLAGS_OFFSET,
    MAGIC_COOKIE, MAGIC_OFFSET, OBJ_LEN_ARRAY, PRECISION_SCALE_MAX_VERSION, PROJ_PARAM_COUNT,
    VERSION_NUMBER,
};
use super::page::Page;

/// Version-conditional decode rules, computed once per header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionGates {
    /// Datum id is stored (V500+); older files leave junk there.
    pub has_datum_id: bool,
    /// Scale comes from `10^precision`, displacement is zero (V100 and older).
    pub scale_from_precision: bool,
    /// Trailing datum params are junk and read as 0.0 (V200 and older).
    pub datum_params_unused: bool,
    /// The header continues on a second page.
    pub has_continuation: bool,
}

impl VersionGates {
    pub fn new(version: i16) -> Self {
        Self {
            has_datum_id: version >= DATUM_ID_MIN_VERSION,
            scale_from_precision: version <= PRECISION_SCALE_MAX_VERSION,
            datum_params_unused: version <= DATUM_PARAMS_JUNK_MAX_VERSION,
            has_continuation: version == VERSION_NUMBER,
        }
    }
}

/// Six-parameter affine transform (A-F) from the continuation page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub units: u8,
    /// A, B, C, D, E, F
    pub params: [f64; AFFINE_PARAM_COUNT],
}

impl AffineTransform {
    /// `X' = A·x + B·y + C`, `Y' = D·x + E·y + F`
    pub fn apply(&self, point: Vector2) -> Vector2 {
        let [a, b, c, d, e, f] = self.params;
        Vector2::new(a * point.x + b * point.y + c, d * point.x + e * point.y + f)
    }
}

/// Projection parameters stored in the header
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectionInfo {
    pub proj_id: u8,
    pub ellipsoid_id: u8,
    pub units_id: u8,
    /// Same order as in a .MIF COORDSYS clause.
    pub proj_params: [f64; PROJ_PARAM_COUNT],
    pub datum_id: i16,
    pub datum_shift_x: f64,
    pub datum_shift_y: f64,
    pub datum_shift_z: f64,
    pub datum_params: [f64; DATUM_PARAM_COUNT],
    pub affine: Option<AffineTransform>,
}

impl ProjectionInfo {
    pub fn has_affine(&self) -> bool {
        self.affine.is_some()
    }
}

/// Decoded header block.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHeader {
    pub magic: i32,
    pub version: i16,
    pub block_size: i16,
    /// Miles per degree for lat/long maps, 1.0 otherwise.
    pub coordsys_to_dist_units: f64,
    pub bounds: IntRect,

    pub first_index_block: i32,
    pub first_garbage_block: i32,
    pub first_tool_block: i32,

    pub num_point_objects: i32,
    pub num_line_objects: i32,
    pub num_region_objects: i32,
    pub num_text_objects: i32,
    pub max_coord_buf_size: i32,

    pub dist_units_code: u8,
    pub max_spatial_index_depth: u8,
    pub coord_precision: u8,
    pub coord_origin_quadrant: u8,
    pub reflect_x_axis: u8,
    pub max_obj_len_array_id: u8,
    pub num_pen_defs: u8,
    pub num_brush_defs: u8,
    pub num_symbol_defs: u8,
    pub num_font_defs: u8,
    pub num_map_tool_blocks: i16,

    pub projection: ProjectionInfo,

    pub x_scale: f64,
    pub y_scale: f64,
    pub x_displacement: f64,
    pub y_displacement: f64,
}

impl FileHeader {
    /// Decode page 0 and, when given, the continuation page.
    ///
    /// The continuation page is ignored unless the header version has one
    /// (see [`VersionGates::has_continuation`]).
    pub fn decode(page: &Page, continuation: Option<&Page>) -> Result<Self> {
        let mut page = page.clone();
        let mut header = Self::read_main_page(&mut page)?;
        if let Some(continuation) = continuation {
            if header.has_continuation_page() {
                header.apply_continuation(continuation)?;
            } else {
                debug!(
                    "version {} has no continuation page, ignoring it",
                    header.version
                );
            }
        }
        debug!(
            "header: version {}, bounds {}, precision {}, affine {}",
            header.version,
            header.bounds,
            header.coord_precision,
            header.projection.has_affine()
        );
        Ok(header)
    }

    fn read_main_page(page: &mut Page) -> Result<Self> {
        page.seek(MAGIC_OFFSET);
        let magic = page.read_i32()?;
        if magic != MAGIC_COOKIE {
            return Err(MapError::InvalidMagicNumber {
                found: magic,
                expected: MAGIC_COOKIE,
            });
        }

        let version = page.read_i16()?;
        let block_size = page.read_i16()?;
        let coordsys_to_dist_units = page.read_f64()?;
        let bounds = IntRect::new(
            page.read_i32()?,
            page.read_i32()?,
            page.read_i32()?,
            page.read_i32()?,
        );
        let gates = VersionGates::new(version);

        // 16 bytes of default view
        page.seek(BLOCK_POINTERS_OFFSET);
        let first_index_block = page.read_i32()?;
        let first_garbage_block = page.read_i32()?;
        let first_tool_block = page.read_i32()?;
        let num_point_objects = page.read_i32()?;
        let num_line_objects = page.read_i32()?;
        let num_region_objects = page.read_i32()?;
        let num_text_objects = page.read_i32()?;
        let max_coord_buf_size = page.read_i32()?;

        // 14 reserved bytes
        page.seek(FLAGS_OFFSET);
        let dist_units_code = page.read_u8()?;
        let max_spatial_index_depth = page.read_u8()?;
        let coord_precision = page.read_u8()?;
        let coord_origin_quadrant = page.read_u8()?;
        let reflect_x_axis = page.read_u8()?;
        let max_obj_len_array_id = page.read_u8()?;
        let num_pen_defs = page.read_u8()?;
        let num_brush_defs = page.read_u8()?;
        let num_symbol_defs = page.read_u8()?;
        let num_font_defs = page.read_u8()?;
        let num_map_tool_blocks = page.read_i16()?;

        let mut projection = ProjectionInfo::default();
        projection.datum_id = page.read_i16()?;
        if !gates.has_datum_id {
            projection.datum_id = 0;
        }
        page.skip(1)?;
        projection.proj_id = page.read_u8()?;
        projection.ellipsoid_id = page.read_u8()?;
        projection.units_id = page.read_u8()?;

        let mut x_scale = page.read_f64()?;
        let mut y_scale = page.read_f64()?;
        let mut x_displacement = page.read_f64()?;
        let mut y_displacement = page.read_f64()?;
        if gates.scale_from_precision {
            x_scale = 10f64.powi(i32::from(coord_precision));
            y_scale = x_scale;
            x_displacement = 0.0;
            y_displacement = 0.0;
        }

        for param in projection.proj_params.iter_mut() {
            *param = page.read_f64()?;
        }
        projection.datum_shift_x = page.read_f64()?;
        projection.datum_shift_y = page.read_f64()?;
        projection.datum_shift_z = page.read_f64()?;
        for param in projection.datum_params.iter_mut() {
            let value = page.read_f64()?;
            *param = if gates.datum_params_unused { 0.0 } else { value };
        }

        Ok(Self {
            magic,
            version,
            block_size,
            coordsys_to_dist_units,
            bounds,
            first_index_block,
            first_garbage_block,
            first_tool_block,
            num_point_objects,
            num_line_objects,
            num_region_objects,
            num_text_objects,
            max_coord_buf_size,
            dist_units_code,
            max_spatial_index_depth,
            coord_precision,
            coord_origin_quadrant,
            reflect_x_axis,
            max_obj_len_array_id,
            num_pen_defs,
            num_brush_defs,
            num_symbol_defs,
            num_font_defs,
            num_map_tool_blocks,
            projection,
            x_scale,
            y_scale,
            x_displacement,
            y_displacement,
        })
    }

    /// Read the continuation page: the affine in-use byte and, when set, the
    /// affine units and params A-F.
    pub fn apply_continuation(&mut self, page: &Page) -> Result<()> {
        let mut page = page.clone();
        page.seek(0);
        self.projection.affine = None;

        let in_use = page.read_u8()?;
        if in_use != 0 {
            let units = page.read_u8()?;
            page.skip(AFFINE_RESERVED_BYTES)?;
            let mut params = [0.0; AFFINE_PARAM_COUNT];
            for param in params.iter_mut() {
                *param = page.read_f64()?;
            }
            self.projection.affine = Some(AffineTransform { units, params });
        }
        Ok(())
    }

    pub fn version_gates(&self) -> VersionGates {
        VersionGates::new(self.version)
    }

    /// True when page 1 of the file belongs to this header.
    pub fn has_continuation_page(&self) -> bool {
        self.version_gates().has_continuation
    }

    /// Stored length of a geometry record, from the object length table.
    pub fn object_length(code: u8) -> Option<usize> {
        OBJ_LEN_ARRAY
            .get(usize::from(code))
            .map(|len| usize::from(len & 0x7f))
    }

    /// Convert stored integer coordinates to real-world coordinates.
    ///
    /// Applies displacement and scale, flips axes for the coordinate origin
    /// quadrant, then the affine transform when present. Returns `None` when
    /// a scale is zero.
    pub fn int_to_coordsys(&self, x: i32, y: i32) -> Option<Vector2> {
        if self.x_scale == 0.0 || self.y_scale == 0.0 {
            return None;
        }
        let (x, y) = (f64::from(x), f64::from(y));

        let dx = match self.coord_origin_quadrant {
            0 | 2 | 3 => -(x + self.x_displacement) / self.x_scale,
            _ => (x - self.x_displacement) / self.x_scale,
        };
        let dy = match self.coord_origin_quadrant {
            0 | 3 | 4 => -(y + self.y_displacement) / self.y_scale,
            _ => (y - self.y_displacement) / self.y_scale,
        };

        let point = Vector2::new(dx, dy);
        Some(match &self.projection.affine {
            Some(affine) => affine.apply(point),
            None => point,
        })
    }

    /// Real-world extent of the integer bounds.
    pub fn bounds_coordsys(&self) -> Option<BoundingBox2D> {
        let min = self.int_to_coordsys(self.bounds.x_min, self.bounds.y_min)?;
        let max = self.int_to_coordsys(self.bounds.x_max, self.bounds.y_max)?;
        Some(BoundingBox2D::from_corners(min, max))
    }
}
