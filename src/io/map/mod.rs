//! MapInfo .MAP binary geometry file support.
//!
//! A `.map` file is a sequence of 512-byte pages. Page 0 is the header; every
//! other page starts with a byte naming its block kind. This module decodes
//! the header, the spatial index and the in-page geometry records.
//!
//! # Module Structure
//!
//! - [`constants`] - Page size, header offsets, version thresholds, object length table
//! - [`page`] - 512-byte page with a little-endian read cursor
//! - [`block_type`] - Block kind of a page's leading byte
//! - [`geometry_type`] - Geometry type codes and the compressed-encoding parity rule
//! - [`header_block`] - File header and its continuation page
//! - [`index_block`] - Spatial index entries, accumulated across chained pages
//! - [`object_block`] - Geometry records, accumulated across chained pages
//! - [`reader`] - Page scan that routes pages to the block decoders

pub mod block_type;
pub mod constants;
pub mod geometry_type;
pub mod header_block;
pub mod index_block;
pub mod object_block;
pub mod page;
pub mod reader;

// Re-export commonly used types
pub use block_type::BlockKind;
pub use geometry_type::{CoordEncoding, FontStyle, FontStyleExt, GeometryKind, TextJustification};
pub use header_block::{AffineTransform, FileHeader, ProjectionInfo, VersionGates};
pub use index_block::{IndexBlock, IndexEntry, IndexPageHeader};
pub use object_block::{
    CoordBlockRef, GeometryDetail, GeometryRecord, ObjectBlock, ObjectPageHeader, TextDetail,
};
pub use page::Page;
pub use reader::{map_path_for, MapFile, MapFileReader, MapReaderConfiguration, ScanState};
