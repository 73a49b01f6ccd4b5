//! Export options for DXF output.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Polyline encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// One LWPOLYLINE entity with inline vertices.
    #[default]
    Compact,
    /// POLYLINE header, one VERTEX per point, then SEQEND.
    Legacy,
}

/// Drawing units written to `$INSUNITS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCode {
    Inches = 1,
    #[default]
    Millimeters = 4,
}

impl UnitCode {
    pub fn code(&self) -> i16 {
        *self as i16
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(UnitCode::Inches),
            4 => Some(UnitCode::Millimeters),
            _ => None,
        }
    }
}

/// AutoCAD release label written to `$ACADVER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DxfVersion {
    /// AutoCAD 2007
    #[default]
    AC1021,
    /// AutoCAD 2010
    AC1024,
    /// AutoCAD 2013
    AC1032,
    /// AutoCAD 2018
    AC1036,
}

impl DxfVersion {
    pub fn to_dxf_string(&self) -> &'static str {
        match self {
            DxfVersion::AC1021 => "AC1021",
            DxfVersion::AC1024 => "AC1024",
            DxfVersion::AC1032 => "AC1032",
            DxfVersion::AC1036 => "AC1036",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "AC1021" => Some(DxfVersion::AC1021),
            "AC1024" => Some(DxfVersion::AC1024),
            "AC1032" => Some(DxfVersion::AC1032),
            "AC1036" => Some(DxfVersion::AC1036),
            _ => None,
        }
    }
}

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_dxf_string())
    }
}

impl FromStr for DxfVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DxfVersion::from_label(s).ok_or_else(|| format!("unsupported DXF version label '{}'", s))
    }
}

bitflags! {
    /// Group code 70 on POLYLINE and LWPOLYLINE.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PolylineFlags: i16 {
        const CLOSED = 1;
    }
}

/// Everything that shapes an export besides the points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub dialect: Dialect,
    /// Connect the last vertex back to the first.
    pub closed: bool,
    pub units: UnitCode,
    pub version_label: DxfVersion,
}

impl ExportOptions {
    pub fn polyline_flags(&self) -> PolylineFlags {
        if self.closed {
            PolylineFlags::CLOSED
        } else {
            PolylineFlags::empty()
        }
    }
}
