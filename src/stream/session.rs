//! Synchronous stream state: line assembly, classification and batching.
//!
//! [`StreamSession`] performs no I/O. The read loop hands it raw chunks and
//! command outcomes; the session decides what reaches the [`PointSink`].

use super::classifier::{classify_line, LineKind};
use super::StreamConfig;
use crate::notification::{NotificationCollection, NotificationType};
use crate::scene::PointSink;
use crate::types::{Point, Vector2};
use encoding_rs::{CoderResult, Decoder, UTF_8};
use std::fmt;

/// Per-connection stream state.
pub struct StreamSession {
    config: StreamConfig,
    decoder: Decoder,
    line_buffer: String,
    pending: Vec<Point>,
    recording: bool,
    last_position: Option<Vector2>,
    single_shot_pending: bool,
    status: String,
    notifications: NotificationCollection,
}

impl StreamSession {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            config,
            decoder: UTF_8.new_decoder(),
            line_buffer: String::new(),
            pending: Vec::with_capacity(config.batch_size),
            recording: false,
            last_position: None,
            single_shot_pending: false,
            status: String::new(),
            notifications: NotificationCollection::new(),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Last position reported by the device, in millimeters.
    pub fn last_position(&self) -> Option<Vector2> {
        self.last_position
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Points waiting for the next flush.
    pub fn pending(&self) -> &[Point] {
        &self.pending
    }

    /// Incomplete trailing line kept across chunks.
    pub fn line_buffer(&self) -> &str {
        &self.line_buffer
    }

    pub fn single_shot_pending(&self) -> bool {
        self.single_shot_pending
    }

    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        self.notifications.notify(notification_type, message);
    }

    pub fn take_notifications(&mut self) -> NotificationCollection {
        std::mem::take(&mut self.notifications)
    }

    /// Decode a raw chunk and process every line it completes.
    ///
    /// A multi-byte character split across chunks is held by the decoder
    /// until its remaining bytes arrive.
    pub fn feed(&mut self, bytes: &[u8], sink: &dyn PointSink) {
        let text = self.decode(bytes, false);
        self.feed_str(&text, sink);
    }

    /// Append decoded text and process every complete line.
    pub fn feed_str(&mut self, text: &str, sink: &dyn PointSink) {
        self.line_buffer.push_str(text);
        let Some(end) = self.line_buffer.rfind('\n') else {
            return;
        };

        let complete: String = self.line_buffer.drain(..=end).collect();
        for line in complete[..end].split('\n') {
            self.handle_line(line, sink);
        }
    }

    /// End of stream: the trailing fragment is a final line, then the
    /// batch is flushed.
    pub fn finish(&mut self, sink: &dyn PointSink) {
        let tail = self.decode(&[], true);
        self.line_buffer.push_str(&tail);
        let last = std::mem::take(&mut self.line_buffer);
        self.handle_line(&last, sink);
        self.flush(sink);
    }

    /// Deliver the pending batch, if any, as one append.
    pub fn flush(&mut self, sink: &dyn PointSink) {
        if self.pending.is_empty() {
            return;
        }
        let batch = std::mem::replace(&mut self.pending, Vec::with_capacity(self.config.batch_size));
        tracing::debug!(points = batch.len(), "flushing stream batch");
        sink.append_points(batch);
    }

    /// Change recording state. Leaving the recording state flushes.
    pub fn set_recording(&mut self, recording: bool, sink: &dyn PointSink) {
        if self.recording && !recording {
            self.flush(sink);
        }
        if self.recording != recording {
            tracing::info!(recording, "stream recording state changed");
        }
        self.recording = recording;
    }

    /// Capture the next position report as a single point.
    pub fn arm_single_shot(&mut self) {
        self.single_shot_pending = true;
    }

    fn handle_line(&mut self, line: &str, sink: &dyn PointSink) {
        match classify_line(line) {
            LineKind::Coordinate { x, y } => {
                let scale = self.config.unit_scale;
                let point = Point::new(x * scale, y * scale);
                if !point.is_finite() {
                    tracing::warn!(line, "coordinate overflows after unit scaling");
                    self.notifications.notify(
                        NotificationType::Warning,
                        format!("Ignored out-of-range coordinate: {}", line),
                    );
                    return;
                }
                if self.recording {
                    self.pending.push(point);
                    if self.pending.len() >= self.config.batch_size {
                        self.flush(sink);
                    }
                }
                self.last_position = Some(point.position());
            }
            LineKind::Status { text, recording } => {
                self.status = text.to_string();
                if let Some(recording) = recording {
                    self.set_recording(recording, sink);
                }
            }
            LineKind::Position { x, y } => {
                self.last_position = Some(Vector2::new(x, y));
                if self.single_shot_pending {
                    self.single_shot_pending = false;
                    sink.append_points(vec![Point::new(x, y)]);
                    self.status = format!("Single point: x={:.2}mm, y={:.2}mm", x, y);
                } else {
                    self.status = format!("Position mm: x={:.2}, y={:.2}", x, y);
                }
            }
            LineKind::RecordingStarted => {
                self.set_recording(true, sink);
                self.status = "Recording started.".to_string();
            }
            LineKind::RecordingStopped => {
                self.set_recording(false, sink);
                self.status = "Recording stopped.".to_string();
            }
            LineKind::Malformed(text) => {
                tracing::warn!(line = text, "ignoring malformed position report");
                self.notifications.notify(
                    NotificationType::Warning,
                    format!("Ignored malformed position report: {}", text),
                );
            }
            LineKind::Ignored => {
                tracing::trace!(line, "ignored device line");
            }
        }
    }

    fn decode(&mut self, bytes: &[u8], last: bool) -> String {
        let capacity = self
            .decoder
            .max_utf8_buffer_length(bytes.len())
            .unwrap_or(bytes.len() * 3 + 4);
        let mut text = String::with_capacity(capacity);
        let mut input = bytes;
        loop {
            let (result, read, _) = self.decoder.decode_to_string(input, &mut text, last);
            input = &input[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => text.reserve(input.len() * 3 + 4),
            }
        }
        if last {
            self.decoder = UTF_8.new_decoder();
        }
        text
    }
}

impl fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSession")
            .field("config", &self.config)
            .field("line_buffer", &self.line_buffer)
            .field("pending", &self.pending.len())
            .field("recording", &self.recording)
            .field("last_position", &self.last_position)
            .field("single_shot_pending", &self.single_shot_pending)
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneStore;

    fn recording_session(batch_size: usize) -> (StreamSession, SceneStore) {
        let config = StreamConfig {
            batch_size,
            ..StreamConfig::default()
        };
        let store = SceneStore::new();
        let mut session = StreamSession::new(config);
        session.set_recording(true, &store);
        (session, store)
    }

    #[test]
    fn test_split_line_across_chunks() {
        let (mut session, store) = recording_session(100);
        session.feed(b"1,2\n3,", &store);
        assert_eq!(session.line_buffer(), "3,");
        session.feed(b"4\n", &store);
        session.flush(&store);
        assert_eq!(
            *store.snapshot(),
            vec![Point::new(10.0, 20.0), Point::new(30.0, 40.0)]
        );
    }

    #[test]
    fn test_crlf_lines() {
        let (mut session, store) = recording_session(100);
        session.feed(b"5,6\r\n7,8\r\n", &store);
        assert_eq!(session.pending().len(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_batch_threshold_flushes() {
        let (mut session, store) = recording_session(3);
        session.feed_str("1,1\n2,2\n3,3\n4,4\n", &store);
        assert_eq!(store.len(), 3);
        assert_eq!(store.revision(), 1);
        assert_eq!(session.pending().len(), 1);
    }

    #[test]
    fn test_not_recording_tracks_position_only() {
        let store = SceneStore::new();
        let mut session = StreamSession::new(StreamConfig::default());
        session.feed_str("1.5,2\n", &store);
        assert!(session.pending().is_empty());
        assert_eq!(session.last_position(), Some(Vector2::new(15.0, 20.0)));
    }

    #[test]
    fn test_status_no_flushes() {
        let (mut session, store) = recording_session(100);
        session.feed_str("1,1\nStatus: Recording=NO\n", &store);
        assert!(!session.is_recording());
        assert_eq!(store.len(), 1);
        assert_eq!(session.status(), "Status: Recording=NO");
    }

    #[test]
    fn test_stopped_marker_flushes() {
        let (mut session, store) = recording_session(100);
        session.feed_str("1,1\n2,2\nRecording stopped\n", &store);
        assert_eq!(store.len(), 2);
        assert_eq!(session.status(), "Recording stopped.");
    }

    #[test]
    fn test_started_marker() {
        let store = SceneStore::new();
        let mut session = StreamSession::new(StreamConfig::default());
        session.feed_str("Recording started\n1,1\n", &store);
        assert!(session.is_recording());
        assert_eq!(session.pending().len(), 1);
    }

    #[test]
    fn test_single_shot_bypasses_batch() {
        let (mut session, store) = recording_session(100);
        session.arm_single_shot();
        session.feed_str("Position (mm): X=3.25 Y=7\n", &store);
        assert_eq!(*store.snapshot(), vec![Point::new(3.25, 7.0)]);
        assert!(!session.single_shot_pending());
        assert_eq!(session.status(), "Single point: x=3.25mm, y=7.00mm");

        session.feed_str("Position (mm): X=1 Y=1\n", &store);
        assert_eq!(store.len(), 1);
        assert_eq!(session.status(), "Position mm: x=1.00, y=1.00");
    }

    #[test]
    fn test_malformed_position_is_notified() {
        let store = SceneStore::new();
        let mut session = StreamSession::new(StreamConfig::default());
        session.feed_str("Position (mm): X=1\n", &store);
        assert!(session.notifications().has_type(NotificationType::Warning));
        assert_eq!(session.last_position(), None);
    }

    #[test]
    fn test_overflowing_coordinate_is_skipped() {
        let (mut session, store) = recording_session(1);
        session.feed_str(&format!("{},1\n", "9".repeat(308)), &store);
        assert!(session.pending().is_empty());
        assert!(store.is_empty());
        assert_eq!(session.last_position(), None);
        assert!(session.notifications().has_type(NotificationType::Warning));

        session.feed_str("2,3\n", &store);
        assert_eq!(*store.snapshot(), vec![Point::new(20.0, 30.0)]);
    }

    #[test]
    fn test_multibyte_split_across_chunks() {
        let store = SceneStore::new();
        let mut session = StreamSession::new(StreamConfig::default());
        let bytes = "Status: température\n".as_bytes();
        let split = bytes.iter().position(|&b| b == 0xC3).unwrap() + 1;
        session.feed(&bytes[..split], &store);
        session.feed(&bytes[split..], &store);
        assert_eq!(session.status(), "Status: température");
    }

    #[test]
    fn test_finish_processes_trailing_fragment() {
        let (mut session, store) = recording_session(100);
        session.feed_str("1,1\n2,2", &store);
        session.finish(&store);
        assert_eq!(store.len(), 2);
        assert!(session.line_buffer().is_empty());
    }
}
