//! Axis-aligned extent of a point set

use super::{Point, Vector2};
use std::fmt;

/// World-space rectangle spanned by a set of points.
///
/// `min` is the corner with the smallest coordinates on both axes. A box
/// built from one point, or from repeated copies of it, has zero extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox2D {
    pub min: Vector2,
    pub max: Vector2,
}

impl BoundingBox2D {
    pub fn new(min: Vector2, max: Vector2) -> Self {
        BoundingBox2D { min, max }
    }

    /// Zero-extent box at `point`.
    pub fn from_point(point: Vector2) -> Self {
        Self::new(point, point)
    }

    /// Extent of the planar positions of `points`; `None` when empty.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::from_point(first.position()), |mut bbox, p| {
            bbox.expand_to_include(p.position());
            bbox
        }))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Width and height, each raised to at least `floor`.
    ///
    /// Used as a divisor when fitting, so a degenerate axis never yields an
    /// infinite zoom.
    pub fn extent_at_least(&self, floor: f64) -> Vector2 {
        Vector2::new(self.width().max(floor), self.height().max(floor))
    }

    pub fn center(&self) -> Vector2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: Vector2) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    pub fn expand_to_include(&mut self, point: Vector2) {
        self.min = Vector2::new(self.min.x.min(point.x), self.min.y.min(point.y));
        self.max = Vector2::new(self.max.x.max(point.x), self.max.y.max(point.y));
    }
}

impl fmt::Display for BoundingBox2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.min, self.max)
    }
}
