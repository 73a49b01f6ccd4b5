//! Live point ingestion from a serial device.
//!
//! The device streams ASCII lines: coordinates in centimeters while it
//! records, plus status, position and marker lines. [`StreamSession`] turns
//! those lines into batched appends on a [`PointSink`](crate::scene::PointSink);
//! [`StreamIngestor`] owns the connection lifecycle and the async read loop.

mod classifier;
mod ingestor;
mod session;
mod transport;

pub use classifier::{classify_line, parse_float_prefix, LineKind};
pub use ingestor::{
    IngestorState, ReadLoop, SessionStatus, StreamCommand, StreamHandle, StreamIngestor,
};
pub use session::StreamSession;
pub use transport::{ReplayPort, SerialPort};

use serde::{Deserialize, Serialize};

/// Stream tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub baud_rate: u32,
    /// Points buffered before one scene append.
    pub batch_size: usize,
    /// Factor from device coordinate units to scene units (cm to mm).
    pub unit_scale: f64,
    pub read_chunk_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            batch_size: 100,
            unit_scale: 10.0,
            read_chunk_size: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: StreamConfig = serde_json::from_str(r#"{"batch_size": 200}"#).unwrap();
        assert_eq!(config.batch_size, 200);
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.unit_scale, 10.0);
    }
}
