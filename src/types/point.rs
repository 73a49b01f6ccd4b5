//! Drawing point record

use super::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A drawing point.
///
/// `x` and `y` are the planar position in world units. `z` and `t` are
/// passthrough fields (height, timestamp) kept for export and persistence;
/// geometry code never reads them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<f64>,
}

/// Ordered point list; order defines the polyline.
pub type PointSequence = Vec<Point>;

impl Point {
    /// Create a planar point
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y, z: None, t: None }
    }

    /// Attach a z value
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Attach a t value
    pub fn with_t(mut self, t: f64) -> Self {
        self.t = Some(t);
        self
    }

    /// Planar position as a vector
    pub fn position(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    /// Planar point at the given position, without passthrough fields
    pub fn from_position(position: Vector2) -> Self {
        Point::new(position.x, position.y)
    }

    /// Weighted blend `a * wa + b * wb` of the planar positions.
    ///
    /// The result carries no `z`/`t`.
    pub fn blend(a: &Point, wa: f64, b: &Point, wb: f64) -> Self {
        Point::new(a.x * wa + b.x * wb, a.y * wa + b.y * wb)
    }

    /// `x` and `y` are both finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Vector2> for Point {
    fn from(v: Vector2) -> Self {
        Point::from_position(v)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}
