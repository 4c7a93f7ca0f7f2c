//! Bounding rectangles: the integer MBRs stored in the file and their
//! real-world counterpart

use super::{MapVertex, Vector2};
use std::fmt;

/// Integer minimum bounding rectangle (XMin, YMin, XMax, YMax), as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntRect {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl IntRect {
    pub const fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        IntRect {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> i64 {
        i64::from(self.x_max) - i64::from(self.x_min)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.y_max) - i64::from(self.y_min)
    }

    /// True when min exceeds max on either axis.
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    pub fn contains(&self, v: MapVertex) -> bool {
        v.x >= self.x_min && v.x <= self.x_max && v.y >= self.y_min && v.y <= self.y_max
    }

    /// Edge-touching rectangles intersect.
    pub fn intersects(&self, other: &IntRect) -> bool {
        self.x_min <= other.x_max
            && other.x_min <= self.x_max
            && self.y_min <= other.y_max
            && other.y_min <= self.y_max
    }
}

impl fmt::Display for IntRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MBR[({}, {}) -> ({}, {})]",
            self.x_min, self.y_min, self.x_max, self.y_max
        )
    }
}

/// Real-world 2D bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox2D {
    pub min: Vector2,
    pub max: Vector2,
}

impl BoundingBox2D {
    /// Box spanning two corners given in any order.
    ///
    /// Quadrant flips can swap the stored min/max after conversion.
    pub fn from_corners(a: Vector2, b: Vector2) -> Self {
        BoundingBox2D {
            min: Vector2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vector2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, point: Vector2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

impl fmt::Display for BoundingBox2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox2D[{} -> {}]", self.min, self.max)
    }
}
