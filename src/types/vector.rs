//! Vertex types: stored integer vertices and real-world coordinates

use std::fmt;

/// Vertex in the file's integer coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MapVertex {
    pub x: i32,
    pub y: i32,
}

impl MapVertex {
    pub const fn new(x: i32, y: i32) -> Self {
        MapVertex { x, y }
    }

    /// Offset this vertex by a pair of 16-bit deltas. Wraps on overflow.
    pub fn offset(self, dx: i16, dy: i16) -> Self {
        MapVertex::new(
            self.x.wrapping_add(i32::from(dx)),
            self.y.wrapping_add(i32::from(dy)),
        )
    }
}

impl fmt::Display for MapVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Real-world 2D coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);
}

impl Default for Vector2 {
    fn default() -> Self {
        Vector2::ZERO
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
