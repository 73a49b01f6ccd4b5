//! Tolerant point ingestion.
//!
//! [`parse_points`] accepts, in order of precedence:
//!
//! 1. A JSON array of point objects, or a JSON object with a `points` array.
//! 2. Newline separated records, one point per non-blank line, each either
//!    positional (`20,30`, `20 30`) or named (`x:20,y:30`, `x=20 y=30`).
//!
//! Parsing is all-or-nothing: the first bad record fails the whole input
//! and no partial list is returned.
//!
//! ```rust
//! use pointsketch::parse::parse_points;
//!
//! let points = parse_points("10,20\nx:20 y:30\n")?;
//! assert_eq!(points.len(), 2);
//! # Ok::<(), pointsketch::SketchError>(())
//! ```

pub(crate) mod grammar;
mod json;
mod line;

use crate::error::{Result, SketchError};
use crate::types::{Point, PointSequence};

/// Parse free-form text into a point list.
pub fn parse_points(text: &str) -> Result<PointSequence> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        if let Some(result) = json::points_from_json(&value) {
            let points = result?;
            tracing::debug!(count = points.len(), "parsed JSON point list");
            return Ok(points);
        }
    }

    let mut points = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match line::parse_line(line) {
            Some(point) => points.push(point),
            None => {
                return Err(SketchError::InvalidLine {
                    line: index + 1,
                    content: line.to_string(),
                })
            }
        }
    }

    tracing::debug!(count = points.len(), "parsed line-based point list");
    Ok(points)
}

/// Parse a single record line, for callers that already split their input.
pub fn parse_point_line(line: &str) -> Option<Point> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    line::parse_line(trimmed)
}

/// Format a point as a positional `x,y` record that [`parse_points`] reads back exactly.
pub fn format_point_line(point: &Point) -> String {
    format!("{},{}", point.x, point.y)
}
