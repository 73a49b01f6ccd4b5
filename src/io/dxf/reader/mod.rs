//! DXF polyline reader
//!
//! Recovers the vertices of the first LWPOLYLINE or POLYLINE entity in the
//! ENTITIES section, so exported drawings can be imported again. Every
//! other section and entity is skipped.

mod stream_reader;
mod text_reader;

pub use stream_reader::{DxfCodePair, DxfStreamReader, VertexCollector};
pub use text_reader::DxfTextReader;

use super::options::{Dialect, PolylineFlags};
use crate::error::{Result, SketchError};
use crate::types::PointSequence;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A polyline read back from DXF.
#[derive(Debug, Clone, PartialEq)]
pub struct DxfPolyline {
    pub points: PointSequence,
    pub closed: bool,
    pub dialect: Dialect,
}

/// DXF file reader
pub struct DxfReader {
    reader: Box<dyn DxfStreamReader>,
}

impl DxfReader {
    /// Create a new DXF reader from any buffered reader
    pub fn from_reader<R: BufRead + 'static>(reader: R) -> Self {
        Self {
            reader: Box::new(DxfTextReader::new(reader)),
        }
    }

    /// Create a new DXF reader from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Create a reader over in-memory DXF text
    pub fn from_text(text: &str) -> Self {
        Self::from_reader(std::io::Cursor::new(text.as_bytes().to_vec()))
    }

    /// Read the first polyline entity.
    pub fn read_polyline(mut self) -> Result<DxfPolyline> {
        let mut in_entities = false;
        while let Some(pair) = self.reader.read_pair()? {
            if pair.code != 0 {
                continue;
            }
            match pair.value.as_str() {
                "SECTION" => {
                    let name = self.reader.read_pair()?;
                    in_entities = matches!(name, Some(ref p) if p.code == 2 && p.value == "ENTITIES");
                }
                "ENDSEC" => in_entities = false,
                "EOF" => break,
                "LWPOLYLINE" if in_entities => return self.read_lwpolyline(),
                "POLYLINE" if in_entities => return self.read_legacy_polyline(),
                _ => {}
            }
        }
        Err(SketchError::Parse("DXF contains no polyline entity".to_string()))
    }

    /// Read the first polyline's vertices.
    pub fn read_points(self) -> Result<PointSequence> {
        self.read_polyline().map(|polyline| polyline.points)
    }

    /// Pairs up to the next `0` record, which is pushed back.
    fn entity_body(&mut self) -> Result<Vec<DxfCodePair>> {
        let mut body = Vec::new();
        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            body.push(pair);
        }
        Ok(body)
    }

    fn read_lwpolyline(&mut self) -> Result<DxfPolyline> {
        let mut flags = PolylineFlags::empty();
        let mut vertices = VertexCollector::new();
        for pair in self.entity_body()? {
            if pair.code == 70 {
                flags = PolylineFlags::from_bits_truncate(pair.as_i16()?);
            } else {
                vertices.add(&pair)?;
            }
        }
        Ok(DxfPolyline {
            points: vertices.finish()?,
            closed: flags.contains(PolylineFlags::CLOSED),
            dialect: Dialect::Compact,
        })
    }

    fn read_legacy_polyline(&mut self) -> Result<DxfPolyline> {
        let mut flags = PolylineFlags::empty();
        for pair in self.entity_body()? {
            if pair.code == 70 {
                flags = PolylineFlags::from_bits_truncate(pair.as_i16()?);
            }
        }

        let mut vertices = VertexCollector::new();
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("VERTEX") {
                for field in self.entity_body()? {
                    vertices.add(&field)?;
                }
            } else if pair.is_marker("SEQEND") {
                break;
            } else {
                return Err(SketchError::Parse(format!(
                    "POLYLINE ended without SEQEND at '{}'",
                    pair.value
                )));
            }
        }

        Ok(DxfPolyline {
            points: vertices.finish()?,
            closed: flags.contains(PolylineFlags::CLOSED),
            dialect: Dialect::Legacy,
        })
    }
}
