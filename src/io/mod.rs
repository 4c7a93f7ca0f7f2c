//! I/O module for reading MapInfo .MAP files

pub mod map;

pub use map::{MapFile, MapFileReader, MapReaderConfiguration};
