//! Error types for pointsketch

use std::io;
use thiserror::Error;

/// Main error type for pointsketch operations
#[derive(Debug, Error)]
pub enum SketchError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization failure outside of point ingestion
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A text record could not be turned into a point
    #[error("Unable to parse line {line}: \"{content}\". Expected x and y.")]
    InvalidLine { line: usize, content: String },

    /// Structural problem in ingested data (JSON mode, DXF input)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serial transport failure (open, read or write)
    #[error("Transport error: {0}")]
    Transport(String),

    /// A stream session is still running on this ingestor
    #[error("A stream session is already active; disconnect it first")]
    SessionActive,

    /// Operation not valid in the current stream state
    #[error("Invalid stream state: {0}")]
    InvalidState(String),

    /// Export was requested for an empty point list
    #[error("No points to export.")]
    EmptyExport,

    /// Export refused a coordinate that is NaN or infinite
    #[error("Point {index} has a non-finite {axis} coordinate")]
    NonFiniteCoordinate { index: usize, axis: char },

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for pointsketch operations
pub type Result<T> = std::result::Result<T, SketchError>;

impl From<String> for SketchError {
    fn from(s: String) -> Self {
        SketchError::Custom(s)
    }
}

impl From<&str> for SketchError {
    fn from(s: &str) -> Self {
        SketchError::Custom(s.to_string())
    }
}

impl SketchError {
    /// True for errors raised while ingesting user text.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, SketchError::InvalidLine { .. } | SketchError::Parse(_))
    }
}
