//! Serial transport abstraction.

use crate::error::{Result, SketchError};
use futures::io::{AsyncRead, AsyncWrite, Cursor, Sink};

/// A byte-oriented, full-duplex serial-like device.
///
/// `open` is called once per connection and yields independent read and
/// write halves. Reads and writes have no timeout.
pub trait SerialPort {
    type Reader: AsyncRead + Unpin;
    type Writer: AsyncWrite + Unpin;

    /// Human-readable port name for status and logs.
    fn describe(&self) -> String;

    /// Open the port at `baud_rate`.
    fn open(&mut self, baud_rate: u32) -> Result<(Self::Reader, Self::Writer)>;
}

/// Plays back a captured byte stream as if it came from a device.
///
/// Commands written to the port are discarded. The source can be opened
/// once; a second `open` fails.
#[derive(Debug)]
pub struct ReplayPort<R> {
    name: String,
    source: Option<R>,
}

impl<R: AsyncRead + Unpin> ReplayPort<R> {
    pub fn new(name: impl Into<String>, source: R) -> Self {
        Self {
            name: name.into(),
            source: Some(source),
        }
    }
}

impl ReplayPort<Cursor<Vec<u8>>> {
    /// Replay an in-memory capture.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(name, Cursor::new(bytes.into()))
    }
}

impl<R: AsyncRead + Unpin> SerialPort for ReplayPort<R> {
    type Reader = R;
    type Writer = Sink;

    fn describe(&self) -> String {
        format!("replay:{}", self.name)
    }

    fn open(&mut self, _baud_rate: u32) -> Result<(R, Sink)> {
        let source = self.source.take().ok_or_else(|| {
            SketchError::Transport(format!("{} has already been replayed", self.name))
        })?;
        Ok((source, futures::io::sink()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::io::AsyncReadExt;

    #[test]
    fn test_replay_port_opens_once() {
        let mut port = ReplayPort::from_bytes("log", b"1,2\n".to_vec());
        assert_eq!(port.describe(), "replay:log");

        let (mut reader, _writer) = port.open(115_200).unwrap();
        let mut text = String::new();
        block_on(reader.read_to_string(&mut text)).unwrap();
        assert_eq!(text, "1,2\n");

        assert!(matches!(port.open(115_200), Err(SketchError::Transport(_))));
    }
}
