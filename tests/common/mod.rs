//! Shared test utilities for pointsketch integration tests.
//!
//! Holds point fixtures, a scripted serial port whose reads and writes are
//! decided by the test, and DXF inspection helpers. Test crates import it via
//! `mod common;`.

#![allow(dead_code)]

use futures::io::{AsyncRead, AsyncWrite};
use pointsketch::stream::SerialPort;
use pointsketch::{Point, Result};
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

// ===========================================================================
// Fixtures
// ===========================================================================

/// The three-point "tent" used across the end-to-end tests.
pub const TENT_TEXT: &str = "10,20\n20,30\n30,20";

pub fn tent() -> Vec<Point> {
    vec![
        Point::new(10.0, 20.0),
        Point::new(20.0, 30.0),
        Point::new(30.0, 20.0),
    ]
}

/// `count` points on a horizontal zigzag.
pub fn zigzag(count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| Point::new(i as f64 * 5.0, if i % 2 == 0 { 0.0 } else { 5.0 }))
        .collect()
}

/// Unique path under the system temp directory.
pub fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("pointsketch-tests");
    let _ = std::fs::create_dir_all(&dir);
    dir.join(format!("{}-{}", std::process::id(), name))
}

// ===========================================================================
// Scripted serial port
// ===========================================================================

/// One step of a scripted read side.
#[derive(Debug, Clone)]
pub enum ReadStep {
    /// Bytes returned by the next read (split if the buffer is smaller).
    Data(Vec<u8>),
    /// Return `Pending` once, waking immediately.
    Yield,
    /// Fail the next read.
    Fail(io::ErrorKind),
}

impl ReadStep {
    pub fn text(text: &str) -> Self {
        ReadStep::Data(text.as_bytes().to_vec())
    }
}

/// Read half driven by a list of [`ReadStep`]s; end of stream after the last.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    steps: VecDeque<ReadStep>,
}

impl AsyncRead for ScriptedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        match self.steps.pop_front() {
            None => Poll::Ready(Ok(0)),
            Some(ReadStep::Yield) => {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            Some(ReadStep::Fail(kind)) => Poll::Ready(Err(io::Error::new(kind, "scripted failure"))),
            Some(ReadStep::Data(mut data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    let rest = data.split_off(n);
                    self.steps.push_front(ReadStep::Data(rest));
                }
                Poll::Ready(Ok(n))
            }
        }
    }
}

/// Write half that records bytes, or fails every write.
#[derive(Debug, Clone, Default)]
pub struct ScriptedWriter {
    pub written: Arc<Mutex<Vec<u8>>>,
    pub fail: bool,
}

impl ScriptedWriter {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.written.lock().unwrap()).into_owned()
    }
}

impl AsyncWrite for ScriptedWriter {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        if self.fail {
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone")));
        }
        self.written.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Port whose read side follows a script and whose writes are captured.
#[derive(Debug)]
pub struct ScriptedPort {
    reader: Option<ScriptedReader>,
    writer: ScriptedWriter,
}

impl ScriptedPort {
    pub fn new(steps: impl IntoIterator<Item = ReadStep>) -> Self {
        Self {
            reader: Some(ScriptedReader {
                steps: steps.into_iter().collect(),
            }),
            writer: ScriptedWriter::default(),
        }
    }

    /// Every write to the device fails.
    pub fn failing_writes(mut self) -> Self {
        self.writer.fail = true;
        self
    }

    /// Handle on the bytes written to the device.
    pub fn writer(&self) -> ScriptedWriter {
        self.writer.clone()
    }
}

impl SerialPort for ScriptedPort {
    type Reader = ScriptedReader;
    type Writer = ScriptedWriter;

    fn describe(&self) -> String {
        "scripted".to_string()
    }

    fn open(&mut self, _baud_rate: u32) -> Result<(ScriptedReader, ScriptedWriter)> {
        let reader = self.reader.take().unwrap_or_default();
        Ok((reader, self.writer.clone()))
    }
}

// ===========================================================================
// DXF helpers
// ===========================================================================

/// Group code / value pairs of a DXF document, values trimmed.
pub fn dxf_pairs(document: &str) -> Vec<(i32, String)> {
    let lines: Vec<&str> = document.split("\r\n").collect();
    lines
        .chunks(2)
        .filter(|pair| pair.len() == 2)
        .map(|pair| {
            let code = pair[0].trim().parse::<i32>().unwrap_or_else(|_| {
                panic!("bad group code line {:?}", pair[0]);
            });
            (code, pair[1].trim().to_string())
        })
        .collect()
}

/// Vertex coordinates written under group codes 10/20.
pub fn dxf_vertices(document: &str) -> Vec<(f64, f64)> {
    let pairs = dxf_pairs(document);
    let mut vertices = Vec::new();
    let mut x = None;
    for (code, value) in pairs {
        match code {
            10 => x = Some(value.parse::<f64>().unwrap()),
            20 => {
                let y = value.parse::<f64>().unwrap();
                vertices.push((x.take().expect("20 without 10"), y));
            }
            _ => {}
        }
    }
    vertices
}

/// Number of pairs `0 / <name>`.
pub fn count_entities(document: &str, name: &str) -> usize {
    dxf_pairs(document)
        .iter()
        .filter(|(code, value)| *code == 0 && value == name)
        .count()
}
