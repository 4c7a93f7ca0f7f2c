//! # mapinfo-map
//!
//! A pure Rust decoder for the MapInfo TAB dataset's binary `.map` file.
//!
//! The `.map` file holds the geometry half of a `.tab` dataset: a header page
//! with bounds, precision and projection, a paged R-tree of bounding
//! rectangles, and object pages packed with point, line and polyline
//! records. Attribute tables and feature assembly are left to the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mapinfo_map::io::map::MapFileReader;
//!
//! let map = MapFileReader::open("parcels.tab")?.read()?;
//! let header = map.require_geometry()?;
//! println!("version {}, bounds {}", header.version, header.bounds);
//!
//! for record in map.records() {
//!     println!("{:#04X} id {} {:?}", record.shape_type, record.id(), record.vertices);
//! }
//! # Ok::<(), mapinfo_map::error::MapError>(())
//! ```
//!
//! ## Architecture
//!
//! - `Page` - one 512-byte page with a little-endian cursor
//! - `FileHeader` - decoded header page (plus continuation page)
//! - `IndexBlock` / `ObjectBlock` - logical blocks accumulated from chained pages
//! - `MapFileReader` - scans the file and routes each page by position and kind

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod io;
pub mod notification;
pub mod types;

// Re-export commonly used types
pub use error::{MapError, Result};
pub use types::{BoundingBox2D, IntRect, MapVertex, Vector2};

// Re-export I/O types
pub use io::map::{
    BlockKind, FileHeader, GeometryKind, GeometryRecord, IndexBlock, IndexEntry, MapFile,
    MapFileReader, MapReaderConfiguration, ObjectBlock,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
