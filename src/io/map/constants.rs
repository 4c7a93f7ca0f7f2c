//! Page sizes, fixed field offsets, magic numbers and version thresholds for
//! the .MAP format.

/// Every block in a `.map` file is one 512-byte page.
pub const PAGE_SIZE: usize = 0x200;

/// Header block (page 0, plus the continuation page of version 500 files).
pub mod header {
    /// Magic cookie stored at [`MAGIC_OFFSET`].
    pub const MAGIC_COOKIE: i32 = 42424242;
    /// Version whose header spills into a second (continuation) page.
    pub const VERSION_NUMBER: i16 = 500;

    /// 0x100: magic, version, block size, distance scale, integer MBR
    pub const MAGIC_OFFSET: usize = 0x100;
    /// 0x130: block pointers, object counts, max coord buffer size
    /// (after 16 reserved bytes holding the default view)
    pub const BLOCK_POINTERS_OFFSET: usize = 0x130;
    /// 0x15E: single-byte flags, resource counts, projection descriptor
    /// (after 14 reserved bytes)
    pub const FLAGS_OFFSET: usize = 0x15E;

    /// Files below this version never populated the datum id.
    pub const DATUM_ID_MIN_VERSION: i16 = 500;
    /// Up to this version scale/displacement are derived from the precision.
    pub const PRECISION_SCALE_MAX_VERSION: i16 = 100;
    /// Up to this version the five trailing datum params hold junk.
    pub const DATUM_PARAMS_JUNK_MAX_VERSION: i16 = 200;

    pub const PROJ_PARAM_COUNT: usize = 6;
    pub const DATUM_PARAM_COUNT: usize = 5;
    pub const AFFINE_PARAM_COUNT: usize = 6;

    /// Reserved bytes between the affine units byte and the A-F params.
    pub const AFFINE_RESERVED_BYTES: usize = 6;

    /// Number of entries of [`OBJ_LEN_ARRAY`].
    pub const OBJ_LEN_ARRAY_SIZE: usize = 73;

    /// Object length per geometry type code, stored at the start of every
    /// header page. The length is `value & 0x7f`.
    pub const OBJ_LEN_ARRAY: [u8; OBJ_LEN_ARRAY_SIZE] = [
        0x00, 0x0a, 0x0e, 0x15, 0x0e, 0x16, 0x1b, 0xa2, 0xa6, 0xab, 0x1a, 0x2a, 0x2f, 0xa5,
        0xa9, 0xb5, 0xa7, 0xb5, 0xd9, 0x0f, 0x17, 0x23, 0x13, 0x1f, 0x2b, 0x0f, 0x17, 0x23,
        0x4f, 0x57, 0x63, 0x9c, 0xa4, 0xa9, 0xa0, 0xa8, 0xad, 0xa4, 0xa8, 0xad, 0x16, 0x1a,
        0x39, 0x0d, 0x11, 0x37, 0xa5, 0xa9, 0xb5, 0xa4, 0xa8, 0xad, 0xb2, 0xb6, 0xdc, 0xbd,
        0xbd, 0xf4, 0x2b, 0x2f, 0x55, 0xc8, 0xcc, 0xd8, 0xc7, 0xcb, 0xd0, 0xd3, 0xd7, 0xfd,
        0xc2, 0xc2, 0xf9,
    ];
}

/// Index block (type 1)
pub mod index {
    /// Type byte, link byte, 16-bit entry count.
    pub const HEADER_SIZE: usize = 4;
    /// Offset of the link byte.
    pub const LINK_OFFSET: usize = 1;
    /// Four MBR ints plus the child/object block pointer.
    pub const ENTRY_SIZE: usize = 20;
    pub const MAX_ENTRIES: usize = (super::PAGE_SIZE - HEADER_SIZE) / ENTRY_SIZE;
}

/// Object block (type 2)
pub mod object {
    /// Type, link, bytes used, center X/Y, first/last coord block.
    pub const HEADER_SIZE: usize = 20;
    /// Offset of the link byte.
    pub const LINK_OFFSET: usize = 1;
}
