//! Core value types: points, 2D vectors and bounding boxes

mod bounds;
mod point;
mod vector;

pub use bounds::BoundingBox2D;
pub use point::{Point, PointSequence};
pub use vector::Vector2;
