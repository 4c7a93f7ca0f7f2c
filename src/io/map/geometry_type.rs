//! Geometry record type codes.
//!
//! Every geometry kind has two type codes: a compressed one, with
//! coordinates stored as 16-bit deltas from the object block center, and an
//! absolute one with 32-bit coordinates. Compressed codes are exactly those
//! with `code % 3 == 1` (1, 4, 7, ...), and the absolute code is the
//! compressed code plus one.

use bitflags::bitflags;
use std::fmt;

/// Raw type codes.
pub mod codes {
    pub const NONE: u8 = 0x00;
    pub const SYMBOL_C: u8 = 0x01;
    pub const SYMBOL: u8 = 0x02;
    pub const LINE_C: u8 = 0x04;
    pub const LINE: u8 = 0x05;
    pub const PLINE_C: u8 = 0x07;
    pub const PLINE: u8 = 0x08;
    pub const ARC_C: u8 = 0x0a;
    pub const ARC: u8 = 0x0b;
    pub const REGION_C: u8 = 0x0d;
    pub const REGION: u8 = 0x0e;
    pub const TEXT_C: u8 = 0x10;
    pub const TEXT: u8 = 0x11;
    pub const RECT_C: u8 = 0x13;
    pub const RECT: u8 = 0x14;
    pub const ROUNDRECT_C: u8 = 0x16;
    pub const ROUNDRECT: u8 = 0x17;
    pub const ELLIPSE_C: u8 = 0x19;
    pub const ELLIPSE: u8 = 0x1a;
}

/// True for type codes whose coordinates are center-relative 16-bit deltas.
pub const fn is_compressed_code(code: u8) -> bool {
    code % 3 == 1
}

/// Physical coordinate encoding of a record, derived from its type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordEncoding {
    /// 16-bit signed deltas from the block center.
    Compressed,
    /// 32-bit absolute values.
    Absolute,
}

impl CoordEncoding {
    pub const fn from_code(code: u8) -> Self {
        if is_compressed_code(code) {
            CoordEncoding::Compressed
        } else {
            CoordEncoding::Absolute
        }
    }

    /// Bytes per stored coordinate value.
    pub const fn coord_size(self) -> usize {
        match self {
            CoordEncoding::Compressed => 2,
            CoordEncoding::Absolute => 4,
        }
    }
}

/// Logical geometry kind, shared by both codes of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    None,
    Symbol,
    Line,
    Polyline,
    Arc,
    Region,
    Text,
    Rect,
    RoundRect,
    Ellipse,
}

impl GeometryKind {
    /// Kind for a raw type code, `None` for codes this decoder does not know.
    pub fn from_code(code: u8) -> Option<Self> {
        use codes::*;
        let kind = match code {
            NONE => Self::None,
            SYMBOL_C | SYMBOL => Self::Symbol,
            LINE_C | LINE => Self::Line,
            PLINE_C | PLINE => Self::Polyline,
            ARC_C | ARC => Self::Arc,
            REGION_C | REGION => Self::Region,
            TEXT_C | TEXT => Self::Text,
            RECT_C | RECT => Self::Rect,
            ROUNDRECT_C | ROUNDRECT => Self::RoundRect,
            ELLIPSE_C | ELLIPSE => Self::Ellipse,
            _ => return None,
        };
        Some(kind)
    }

    /// Compressed and absolute codes of this kind. `None` has a single code.
    pub fn codes(self) -> (u8, u8) {
        use codes::*;
        match self {
            Self::None => (NONE, NONE),
            Self::Symbol => (SYMBOL_C, SYMBOL),
            Self::Line => (LINE_C, LINE),
            Self::Polyline => (PLINE_C, PLINE),
            Self::Arc => (ARC_C, ARC),
            Self::Region => (REGION_C, REGION),
            Self::Text => (TEXT_C, TEXT),
            Self::Rect => (RECT_C, RECT),
            Self::RoundRect => (ROUNDRECT_C, ROUNDRECT),
            Self::Ellipse => (ELLIPSE_C, ELLIPSE),
        }
    }

    /// Kinds whose in-page layout is only decoded on request.
    pub fn is_extended(self) -> bool {
        matches!(
            self,
            Self::Arc | Self::Region | Self::Text | Self::Rect | Self::RoundRect | Self::Ellipse
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Symbol => "symbol",
            Self::Line => "line",
            Self::Polyline => "polyline",
            Self::Arc => "arc",
            Self::Region => "region",
            Self::Text => "text",
            Self::Rect => "rectangle",
            Self::RoundRect => "rounded rectangle",
            Self::Ellipse => "ellipse",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Text justification, spacing and label line flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextJustification: u16 {
        const CENTER = 1 << 1;
        const RIGHT = 1 << 2;
        const LINE_SPACING_1_5 = 1 << 3;
        const LINE_SPACING_2_0 = 1 << 4;
        const LABEL_LINE_SIMPLE = 1 << 5;
        const LABEL_LINE_ARROW = 1 << 6;
    }
}

bitflags! {
    /// First font style byte of a text record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontStyle: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
        const OVERLINE = 1 << 3;
        const SHADOW = 1 << 5;
    }
}

bitflags! {
    /// Second font style byte of a text record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontStyleExt: u8 {
        const BOX = 1 << 0;
        const HALO = 1 << 1;
        const ALL_CAPS = 1 << 2;
        const EXPANDED = 1 << 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [GeometryKind; 10] = [
        GeometryKind::None,
        GeometryKind::Symbol,
        GeometryKind::Line,
        GeometryKind::Polyline,
        GeometryKind::Arc,
        GeometryKind::Region,
        GeometryKind::Text,
        GeometryKind::Rect,
        GeometryKind::RoundRect,
        GeometryKind::Ellipse,
    ];

    #[test]
    fn test_code_pairs_follow_parity() {
        for kind in ALL_KINDS.iter().skip(1) {
            let (compressed, absolute) = kind.codes();
            assert!(is_compressed_code(compressed), "{kind}");
            assert!(!is_compressed_code(absolute), "{kind}");
            assert_eq!(absolute, compressed + 1);
            assert_eq!(GeometryKind::from_code(compressed), Some(*kind));
            assert_eq!(GeometryKind::from_code(absolute), Some(*kind));
        }
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(GeometryKind::from_code(0x03), None);
        assert_eq!(GeometryKind::from_code(0x25), None);
        assert_eq!(GeometryKind::from_code(99), None);
    }

    #[test]
    fn test_encoding_sizes() {
        assert_eq!(CoordEncoding::from_code(codes::SYMBOL_C).coord_size(), 2);
        assert_eq!(CoordEncoding::from_code(codes::SYMBOL).coord_size(), 4);
        assert_eq!(CoordEncoding::from_code(codes::NONE), CoordEncoding::Absolute);
    }

    #[test]
    fn test_extended_kinds() {
        let extended: Vec<_> = ALL_KINDS.iter().filter(|k| k.is_extended()).collect();
        assert_eq!(extended.len(), 6);
        assert!(!GeometryKind::Polyline.is_extended());
    }

    #[test]
    fn test_text_flags_keep_unknown_bits() {
        let style = FontStyle::from_bits_retain(0b0001_0011);
        assert!(style.contains(FontStyle::BOLD | FontStyle::ITALIC));
        assert_eq!(style.bits(), 0b0001_0011);
    }
}
