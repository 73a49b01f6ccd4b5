//! DXF (Drawing Exchange Format) polyline export and re-import

mod options;
mod reader;
mod writer;

pub use options::{Dialect, DxfVersion, ExportOptions, PolylineFlags, UnitCode};
pub use reader::{DxfCodePair, DxfPolyline, DxfReader, DxfStreamReader, DxfTextReader};
pub use writer::{format_double, to_dxf_string, write_dxf};
pub use writer::{DxfStreamWriter, DxfStreamWriterExt, DxfTextWriter, DxfWriter, SectionWriter};
