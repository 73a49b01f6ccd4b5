//! ASCII DXF writer

use super::stream_writer::DxfStreamWriter;
use crate::error::Result;
use std::io::Write;

const LINE_END: &str = "\r\n";

/// ASCII DXF stream writer. Every line ends with CRLF.
pub struct DxfTextWriter<W: Write> {
    writer: W,
}

impl<W: Write> DxfTextWriter<W> {
    /// Create a new ASCII DXF writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a DXF code right-aligned in a 3-character field
    fn write_code(&mut self, code: i32) -> Result<()> {
        write!(self.writer, "{:>3}{}", code, LINE_END)?;
        Ok(())
    }

    fn write_value(&mut self, value: impl std::fmt::Display) -> Result<()> {
        write!(self.writer, "{}{}", value, LINE_END)?;
        Ok(())
    }

    /// Get the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Shortest text that parses back to `value`; integral values keep one
/// decimal place (`5.0`).
pub fn format_double(value: f64) -> String {
    if value == value.trunc() {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl<W: Write> DxfStreamWriter for DxfTextWriter<W> {
    fn write_string(&mut self, code: i32, value: &str) -> Result<()> {
        self.write_code(code)?;
        self.write_value(value)
    }

    fn write_i16(&mut self, code: i32, value: i16) -> Result<()> {
        self.write_code(code)?;
        self.write_value(value)
    }

    fn write_i32(&mut self, code: i32, value: i32) -> Result<()> {
        self.write_code(code)?;
        self.write_value(value)
    }

    fn write_double(&mut self, code: i32, value: f64) -> Result<()> {
        self.write_code(code)?;
        self.write_value(format_double(value))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
