//! Error types for the .MAP decoder

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for .MAP decoding operations
#[derive(Debug, Error)]
pub enum MapError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A field needs more bytes than remain in the 512-byte page
    #[error("Truncated page: {needed} bytes needed at offset {offset:#X}, {available} available")]
    TruncatedPage {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The header sentinel at 0x100 is not the .MAP magic cookie
    #[error("Invalid magic number: expected {expected}, got {found}")]
    InvalidMagicNumber { found: i32, expected: i32 },

    /// Leading byte of a geometry record is outside the known type codes
    #[error("Unknown geometry type {code:#04X} at offset {offset:#X}")]
    UnknownGeometryType { code: u8, offset: usize },

    /// Known geometry kind whose decoding is not enabled
    #[error("Unsupported geometry kind {kind} (code {code:#04X}) at offset {offset:#X}")]
    UnsupportedGeometryKind {
        kind: &'static str,
        code: u8,
        offset: usize,
    },

    /// The `.map` sibling of a `.tab` dataset does not exist
    #[error("Missing optional file: {0}")]
    MissingOptionalFile(PathBuf),

    /// A dataset path could not be mapped to a `.map` file
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Decode failure inside the page starting at `page_offset`
    #[error("Failed to decode page at file offset {page_offset:#X}: {source}")]
    PageDecode {
        page_offset: u64,
        #[source]
        source: Box<MapError>,
    },
}

/// Result type alias for .MAP decoding operations
pub type Result<T> = std::result::Result<T, MapError>;

impl MapError {
    /// Wrap an error raised while decoding the page at `page_offset`.
    pub fn at_page(page_offset: u64, source: MapError) -> Self {
        MapError::PageDecode {
            page_offset,
            source: Box::new(source),
        }
    }

    /// Offset of the failing field inside its page, when known.
    pub fn page_local_offset(&self) -> Option<usize> {
        match self {
            MapError::TruncatedPage { offset, .. }
            | MapError::UnknownGeometryType { offset, .. }
            | MapError::UnsupportedGeometryKind { offset, .. } => Some(*offset),
            MapError::InvalidMagicNumber { .. } => Some(0x100),
            MapError::PageDecode { source, .. } => source.page_local_offset(),
            _ => None,
        }
    }

    /// Absolute byte offset in the `.map` file at which the error occurred.
    ///
    /// Falls back to the page start when the field offset is unknown.
    pub fn file_offset(&self) -> Option<u64> {
        match self {
            MapError::PageDecode {
                page_offset,
                source,
            } => Some(page_offset + source.page_local_offset().unwrap_or(0) as u64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MapError::InvalidMagicNumber {
            found: 7,
            expected: 42424242,
        };
        assert_eq!(
            err.to_string(),
            "Invalid magic number: expected 42424242, got 7"
        );
    }

    #[test]
    fn test_truncated_page_display() {
        let err = MapError::TruncatedPage {
            offset: 0x1FE,
            needed: 4,
            available: 2,
        };
        assert!(err.to_string().contains("0x1FE"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let map_err: MapError = io_err.into();
        assert!(matches!(map_err, MapError::Io(_)));
    }

    #[test]
    fn test_file_offset_combines_page_and_field() {
        let inner = MapError::UnknownGeometryType {
            code: 99,
            offset: 0x14,
        };
        let err = MapError::at_page(0x400, inner);
        assert_eq!(err.file_offset(), Some(0x414));
        assert_eq!(err.page_local_offset(), Some(0x14));
    }

    #[test]
    fn test_file_offset_without_field_offset() {
        let err = MapError::at_page(0x200, MapError::InvalidPath("x".into()));
        assert_eq!(err.file_offset(), Some(0x200));
    }
}
