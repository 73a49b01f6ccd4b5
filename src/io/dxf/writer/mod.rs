//! DXF writer module

mod section_writer;
mod stream_writer;
mod text_writer;

pub use section_writer::SectionWriter;
pub use stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
pub use text_writer::{format_double, DxfTextWriter};

use super::options::ExportOptions;
use crate::error::{Result, SketchError};
use crate::types::Point;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// DXF file writer for one polyline
pub struct DxfWriter<'a> {
    points: &'a [Point],
    options: ExportOptions,
}

impl<'a> DxfWriter<'a> {
    /// Create a new DXF writer over `points`
    pub fn new(points: &'a [Point], options: ExportOptions) -> Self {
        Self { points, options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Check the export preconditions: at least one point and only finite
    /// coordinates.
    pub fn validate(&self) -> Result<()> {
        if self.points.is_empty() {
            return Err(SketchError::EmptyExport);
        }
        for (index, point) in self.points.iter().enumerate() {
            let axes = [('x', Some(point.x)), ('y', Some(point.y)), ('z', point.z)];
            for (axis, value) in axes {
                if matches!(value, Some(v) if !v.is_finite()) {
                    return Err(SketchError::NonFiniteCoordinate { index, axis });
                }
            }
        }
        Ok(())
    }

    /// Write to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.write_to_writer(writer)
    }

    /// Write to any writer
    pub fn write_to_writer<W: Write>(&self, writer: W) -> Result<()> {
        self.validate()?;
        let mut stream_writer = DxfTextWriter::new(writer);
        self.write_dxf(&mut stream_writer)?;
        stream_writer.flush()
    }

    /// Write to a byte vector
    pub fn write_to_vec(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to_writer(&mut buffer)?;
        Ok(buffer)
    }

    /// Write to a string
    pub fn write_to_string(&self) -> Result<String> {
        let bytes = self.write_to_vec()?;
        String::from_utf8(bytes).map_err(|e| SketchError::Custom(e.to_string()))
    }

    /// Write DXF content to a stream writer
    fn write_dxf<W: DxfStreamWriter>(&self, writer: &mut W) -> Result<()> {
        let mut section_writer = SectionWriter::new(writer);
        section_writer.write_header(&self.options)?;
        section_writer.write_tables()?;
        section_writer.write_entities(self.points, &self.options)?;

        writer.write_eof()?;
        tracing::debug!(
            vertices = self.points.len(),
            dialect = ?self.options.dialect,
            "wrote DXF polyline"
        );
        Ok(())
    }
}

/// Serialize `points` as a DXF document
pub fn to_dxf_string(points: &[Point], options: &ExportOptions) -> Result<String> {
    DxfWriter::new(points, *options).write_to_string()
}

/// Convenience function to write `points` to a DXF file
pub fn write_dxf<P: AsRef<Path>>(points: &[Point], options: &ExportOptions, path: P) -> Result<()> {
    DxfWriter::new(points, *options).write_to_file(path)
}
