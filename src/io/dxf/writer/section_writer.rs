//! DXF section writers
//!
//! A point export is four records in order: HEADER, TABLES (empty),
//! ENTITIES holding one polyline, and the EOF marker.

use super::stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
use crate::error::Result;
use crate::io::dxf::options::{Dialect, ExportOptions, PolylineFlags};
use crate::types::Point;

/// Writes all DXF sections
pub struct SectionWriter<'a, W: DxfStreamWriter> {
    writer: &'a mut W,
}

impl<'a, W: DxfStreamWriter> SectionWriter<'a, W> {
    /// Create a new section writer
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }

    /// Write the HEADER section
    pub fn write_header(&mut self, options: &ExportOptions) -> Result<()> {
        self.writer.write_section_start("HEADER")?;

        self.writer.write_variable("$ACADVER")?;
        self.writer
            .write_string(1, options.version_label.to_dxf_string())?;

        self.writer.write_variable("$INSUNITS")?;
        self.writer.write_i16(70, options.units.code())?;

        self.writer.write_section_end()
    }

    /// Write the TABLES section (present but empty)
    pub fn write_tables(&mut self) -> Result<()> {
        self.writer.write_section_start("TABLES")?;
        self.writer.write_section_end()
    }

    /// Write the ENTITIES section with one polyline over `points`
    pub fn write_entities(&mut self, points: &[Point], options: &ExportOptions) -> Result<()> {
        self.writer.write_section_start("ENTITIES")?;
        let flags = options.polyline_flags();
        match options.dialect {
            Dialect::Compact => self.write_lwpolyline(points, flags)?,
            Dialect::Legacy => self.write_polyline(points, flags)?,
        }
        self.writer.write_section_end()
    }

    /// Write LWPOLYLINE entity
    fn write_lwpolyline(&mut self, points: &[Point], flags: PolylineFlags) -> Result<()> {
        self.writer.write_entity_type("LWPOLYLINE")?;
        let count = i32::try_from(points.len())
            .map_err(|_| format!("too many vertices for one LWPOLYLINE: {}", points.len()))?;
        self.writer.write_i32(90, count)?;
        self.writer.write_i16(70, flags.bits())?;
        // Constant width
        self.writer.write_double(43, 0.0)?;

        for point in points {
            self.writer.write_vertex(point)?;
        }
        Ok(())
    }

    /// Write POLYLINE entity with its VERTEX records and SEQEND
    fn write_polyline(&mut self, points: &[Point], flags: PolylineFlags) -> Result<()> {
        self.writer.write_entity_type("POLYLINE")?;
        // Entities follow flag (VERTEX records follow)
        self.writer.write_i16(66, 1)?;
        self.writer.write_i16(70, flags.bits())?;
        // Elevation and thickness
        self.writer.write_double(38, 0.0)?;
        self.writer.write_double(39, 0.0)?;

        for point in points {
            self.writer.write_entity_type("VERTEX")?;
            self.writer.write_vertex(point)?;
            self.writer.write_i16(70, 0)?;
        }

        self.writer.write_entity_type("SEQEND")
    }
}
