//! DXF stream reader trait and common types

use crate::error::{Result, SketchError};
use crate::types::Point;

/// A DXF code/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct DxfCodePair {
    /// The DXF group code
    pub code: i32,
    /// Value text, trimmed
    pub value: String,
}

impl DxfCodePair {
    /// Create a new code/value pair
    pub fn new(code: i32, value: impl Into<String>) -> Self {
        Self {
            code,
            value: value.into(),
        }
    }

    /// True for a `0` record naming `entity`
    pub fn is_marker(&self, entity: &str) -> bool {
        self.code == 0 && self.value == entity
    }

    /// Get value as a finite double
    pub fn as_double(&self) -> Result<f64> {
        match self.value.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(self.invalid("a finite number")),
        }
    }

    /// Get value as i16
    pub fn as_i16(&self) -> Result<i16> {
        self.value.parse::<i16>().map_err(|_| self.invalid("an integer"))
    }

    fn invalid(&self, expected: &str) -> SketchError {
        SketchError::Parse(format!(
            "group code {} expects {}, found '{}'",
            self.code, expected, self.value
        ))
    }
}

/// Trait for reading DXF code/value pairs from a stream
pub trait DxfStreamReader {
    /// Read the next code/value pair
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>>;

    /// Push a pair back to be read again on next read_pair call
    fn push_back(&mut self, pair: DxfCodePair);
}

/// Assembles vertices from consecutive 10/20/30 pairs.
///
/// Code 10 starts a vertex; 20 and 30 complete the current one.
#[derive(Debug, Default)]
pub struct VertexCollector {
    current: Option<(f64, Option<f64>, Option<f64>)>,
    vertices: Vec<Point>,
}

impl VertexCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a coordinate pair. Returns `false` for codes that are not
    /// vertex coordinates.
    pub fn add(&mut self, pair: &DxfCodePair) -> Result<bool> {
        match pair.code {
            10 => {
                self.push_current()?;
                self.current = Some((pair.as_double()?, None, None));
            }
            20 | 30 => {
                let value = pair.as_double()?;
                let Some((_, y, z)) = self.current.as_mut() else {
                    return Err(SketchError::Parse(format!(
                        "group code {} before any vertex x coordinate",
                        pair.code
                    )));
                };
                if pair.code == 20 {
                    *y = Some(value);
                } else {
                    *z = Some(value);
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// All vertices in order
    pub fn finish(mut self) -> Result<Vec<Point>> {
        self.push_current()?;
        Ok(self.vertices)
    }

    fn push_current(&mut self) -> Result<()> {
        if let Some((x, y, z)) = self.current.take() {
            let y = y.ok_or_else(|| {
                SketchError::Parse(format!("vertex {} has no y coordinate", self.vertices.len()))
            })?;
            let mut point = Point::new(x, y);
            point.z = z;
            self.vertices.push(point);
        }
        Ok(())
    }
}
