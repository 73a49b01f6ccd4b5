//! # pointsketch
//!
//! Building blocks for a 2D point-sequence drawing tool: tolerant point
//! import, live ingestion from a serial plotting device, viewport math,
//! curve smoothing and DXF polyline export.
//!
//! ## Features
//!
//! - Parse pasted text or files: JSON point lists, `x,y` lines, `x:1 y:2` records
//! - Stream points from a serial device with batched, loss-free scene updates
//! - World/screen mapping with zoom about a cursor and fit-to-bounds
//! - Chaikin, Catmull-Rom and iterative smoothing
//! - DXF export as LWPOLYLINE or POLYLINE/VERTEX/SEQEND, and re-import
//!
//! ## Quick Start
//!
//! ```rust
//! use pointsketch::{ExportOptions, Workspace};
//!
//! let mut workspace = Workspace::default();
//! workspace.import_text("10,20\n20,30\n30,20")?;
//!
//! let dxf = workspace.export_dxf(Some(1))?;
//! assert!(dxf.contains("LWPOLYLINE"));
//! # let _ = ExportOptions::default();
//! # Ok::<(), pointsketch::SketchError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`parse`] - text to [`Point`] lists
//! - [`stream`] - serial device sessions feeding a [`PointSink`]
//! - [`SceneStore`] - the shared, copy-on-write point list
//! - [`Viewport`] - camera state and view commands
//! - [`smoothing`] - pure curve transforms
//! - [`io::dxf`] - DXF writer and reader
//! - [`Workspace`] - one drawing session over all of the above
//!
//! The library logs through `tracing` and never installs a subscriber.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod io;
pub mod notification;
pub mod parse;
pub mod preferences;
pub mod scene;
pub mod smoothing;
pub mod stream;
pub mod types;
pub mod viewport;
pub mod workspace;

// Re-export commonly used types
pub use config::SketchConfig;
pub use error::{Result, SketchError};
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use types::{BoundingBox2D, Point, PointSequence, Vector2};

pub use parse::{format_point_line, parse_points};
pub use scene::{PointSink, SceneStore};
pub use smoothing::{bezier_approx, catmull_rom, chaikin, DrawAlgorithm, SmoothingPolicy};
pub use viewport::{CameraState, CameraTransition, ViewCommand, Viewport, ViewportConfig};

// Re-export I/O types
pub use io::dxf::{Dialect, DxfReader, DxfWriter, ExportOptions, UnitCode};

pub use preferences::{JsonFilePreferences, MemoryPreferences, PreferenceStore, ViewSettings};
pub use stream::{StreamConfig, StreamHandle, StreamIngestor};
pub use workspace::Workspace;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_config_matches_components() {
        let config = SketchConfig::default();
        assert_eq!(config.viewport, ViewportConfig::default());
        assert_eq!(config.stream.batch_size, 100);
        assert_eq!(config.export.units, UnitCode::Millimeters);
    }
}
