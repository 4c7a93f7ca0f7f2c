//! Shared test utilities for mapinfo-map integration tests.
//!
//! Page builders live in [`builders`]; this module assembles them into
//! in-memory streams or on-disk `.tab`/`.map` pairs and runs the reader.

#![allow(dead_code)]

pub mod builders;

use builders::RawPage;
use mapinfo_map::io::map::{MapFile, MapFileReader, MapReaderConfiguration};
use mapinfo_map::Result;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Concatenate pages into file bytes.
pub fn map_bytes(pages: &[RawPage]) -> Vec<u8> {
    pages.iter().flatten().copied().collect()
}

/// Decode pages from memory with the default configuration.
pub fn read_pages(pages: &[RawPage]) -> Result<MapFile> {
    read_pages_with(pages, MapReaderConfiguration::default())
}

pub fn read_pages_with(pages: &[RawPage], config: MapReaderConfiguration) -> Result<MapFile> {
    MapFileReader::from_reader(Cursor::new(map_bytes(pages)))
        .with_config(config)
        .read()
}

/// Decode raw bytes from memory.
pub fn read_bytes(bytes: Vec<u8>) -> Result<MapFile> {
    MapFileReader::from_reader(Cursor::new(bytes)).read()
}

/// Minimal `.tab` text; its content is never parsed by the reader.
pub const TAB_STUB: &str = "!table\n!version 300\n!charset WindowsLatin1\n\nDefinition Table\n  Type NATIVE Charset \"WindowsLatin1\"\n  Fields 1\n    ID Integer ;\n";

/// Write `<stem>.<tab_ext>` and, when `pages` is given, `<stem>.<map_ext>`
/// into `dir`. Returns the `.tab` path.
pub fn write_dataset(
    dir: &Path,
    stem: &str,
    tab_ext: &str,
    map_ext: &str,
    pages: Option<&[RawPage]>,
) -> PathBuf {
    let tab_path = dir.join(format!("{stem}.{tab_ext}"));
    fs::write(&tab_path, TAB_STUB).expect("write .tab");
    if let Some(pages) = pages {
        fs::write(dir.join(format!("{stem}.{map_ext}")), map_bytes(pages)).expect("write .map");
    }
    tab_path
}
