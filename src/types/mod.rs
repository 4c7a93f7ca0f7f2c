//! Value types shared by the block decoders

pub mod bounds;
pub mod vector;

pub use bounds::{BoundingBox2D, IntRect};
pub use vector::{MapVertex, Vector2};
