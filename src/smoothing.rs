//! Curve smoothing over point sequences.
//!
//! All functions are pure: they never mutate their input and always return
//! the same output for the same points and parameters. Sequences with fewer
//! than two points are returned unchanged.

use crate::types::Point;
use serde::{Deserialize, Serialize};

/// Chaikin corner cutting.
///
/// Each pass keeps the first and last point and replaces every edge
/// `(p0, p1)` with the points at 1/4 and 3/4 along it, so one pass turns
/// `n` points into `2n`.
pub fn chaikin(points: &[Point], iterations: usize) -> Vec<Point> {
    if points.len() < 2 {
        return points.to_vec();
    }

    let mut current = points.to_vec();
    for _ in 0..iterations {
        let mut next = Vec::with_capacity(current.len() * 2);
        next.push(current[0]);
        for edge in current.windows(2) {
            next.push(Point::blend(&edge[0], 0.75, &edge[1], 0.25));
            next.push(Point::blend(&edge[0], 0.25, &edge[1], 0.75));
        }
        next.push(current[current.len() - 1]);
        current = next;
    }
    current
}

/// Catmull-Rom interpolation.
///
/// Emits `segments_per_span` samples strictly inside every span, at
/// `t = s / (segments_per_span + 1)`. End tangents reuse the boundary point.
/// Every input point appears in the output, in order, as a span boundary.
pub fn catmull_rom(points: &[Point], segments_per_span: usize) -> Vec<Point> {
    if points.len() < 2 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut out = Vec::with_capacity(1 + last * (segments_per_span + 1));
    out.push(points[0]);

    for i in 0..last {
        let p0 = &points[i.saturating_sub(1)];
        let p1 = &points[i];
        let p2 = &points[i + 1];
        let p3 = &points[(i + 2).min(last)];

        for s in 1..=segments_per_span {
            let t = s as f64 / (segments_per_span + 1) as f64;
            let t2 = t * t;
            let t3 = t2 * t;

            let a0 = -0.5 * t3 + t2 - 0.5 * t;
            let a1 = 1.5 * t3 - 2.5 * t2 + 1.0;
            let a2 = -1.5 * t3 + 2.0 * t2 + 0.5 * t;
            let a3 = 0.5 * t3 - 0.5 * t2;

            out.push(Point::new(
                a0 * p0.x + a1 * p1.x + a2 * p2.x + a3 * p3.x,
                a0 * p0.y + a1 * p1.y + a2 * p2.y + a3 * p3.y,
            ));
        }
        out.push(*p2);
    }
    out
}

/// Cheap Bezier-like smoothing: `passes` single Chaikin iterations.
pub fn bezier_approx(points: &[Point], passes: usize) -> Vec<Point> {
    let mut out = points.to_vec();
    for _ in 0..passes {
        out = chaikin(&out, 1);
    }
    out
}

/// Maps a smoothing level to an algorithm.
///
/// | level | algorithm |
/// |-------|-----------|
/// | 0     | none |
/// | 1, 2  | Chaikin with that many iterations |
/// | 3     | Catmull-Rom with `catmull_rom_segments` samples per span |
/// | ≥ 4   | [`bezier_approx`] with `bezier_passes` passes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingPolicy {
    pub catmull_rom_segments: usize,
    pub bezier_passes: usize,
}

impl Default for SmoothingPolicy {
    fn default() -> Self {
        Self {
            catmull_rom_segments: 10,
            bezier_passes: 3,
        }
    }
}

impl SmoothingPolicy {
    /// Smooth `points` at `level`.
    pub fn apply(&self, points: &[Point], level: u32) -> Vec<Point> {
        match level {
            0 => points.to_vec(),
            1 | 2 => chaikin(points, level as usize),
            3 => catmull_rom(points, self.catmull_rom_segments),
            _ => bezier_approx(points, self.bezier_passes),
        }
    }
}

/// How the scene polyline is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawAlgorithm {
    /// Straight segments between the raw points.
    #[default]
    Linear,
    /// The smoothed curve only.
    Curved,
    /// Raw polyline and smoothed curve overlaid.
    Compare,
}

impl DrawAlgorithm {
    /// Whether this mode draws the smoothed curve.
    pub fn draws_curve(&self) -> bool {
        !matches!(self, DrawAlgorithm::Linear)
    }
}
