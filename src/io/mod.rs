//! I/O for exchange formats

pub mod dxf;

pub use dxf::{DxfReader, DxfWriter, ExportOptions};
