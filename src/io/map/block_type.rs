//! .MAP block type codes.
//!
//! The first byte of every page except page 0 names the kind of block the
//! page holds. Page 0 is always the header, whatever its first byte says.

use std::fmt;

/// Block kind stored in the leading byte of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum BlockKind {
    /// Any leading byte outside the known kinds.
    RawUnknown = -1,
    Header = 0,
    Index = 1,
    Object = 2,
    Coord = 3,
    Garbage = 4,
    Tool = 5,
}

impl BlockKind {
    /// All kinds, in code order.
    pub const ALL: [BlockKind; 7] = [
        BlockKind::RawUnknown,
        BlockKind::Header,
        BlockKind::Index,
        BlockKind::Object,
        BlockKind::Coord,
        BlockKind::Garbage,
        BlockKind::Tool,
    ];

    /// Map a leading page byte to its kind.
    ///
    /// Never fails: unknown bytes become `RawUnknown` so the page can be
    /// skipped.
    pub fn from_raw(value: u8) -> Self {
        match value {
            0 => Self::Header,
            1 => Self::Index,
            2 => Self::Object,
            3 => Self::Coord,
            4 => Self::Garbage,
            5 => Self::Tool,
            _ => Self::RawUnknown,
        }
    }

    pub fn code(self) -> i8 {
        self as i8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::RawUnknown => "raw",
            Self::Header => "header",
            Self::Index => "index",
            Self::Object => "object",
            Self::Coord => "coordinate",
            Self::Garbage => "garbage",
            Self::Tool => "tool",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
