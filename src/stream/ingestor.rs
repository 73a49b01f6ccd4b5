//! Connection state machine and the async read loop.
//!
//! ```text
//! Idle --select_port--> PortSelected --connect--> Connected <--> Recording
//!                                                     |
//!                         disconnect / EOF / read error v
//!                                                Disconnected
//! ```
//!
//! [`StreamIngestor::connect`] returns a [`StreamHandle`] for commands and a
//! [`ReadLoop`] future the caller drives on its executor. Commands travel
//! over a channel and are handled ahead of pending device reads.

use super::session::StreamSession;
use super::transport::SerialPort;
use super::StreamConfig;
use crate::error::{Result, SketchError};
use crate::notification::{NotificationCollection, NotificationType};
use crate::scene::PointSink;
use crate::types::Vector2;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use futures::{select_biased, FutureExt, StreamExt};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestorState {
    #[default]
    Idle,
    PortSelected,
    Connected,
    Recording,
    Disconnected,
}

impl fmt::Display for IngestorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::PortSelected => "port selected",
            Self::Connected => "connected",
            Self::Recording => "recording",
            Self::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}

/// Snapshot of a stream session for display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionStatus {
    pub state: IngestorState,
    pub recording: bool,
    /// Last device position in millimeters
    pub last_position: Option<Vector2>,
    pub message: String,
}

/// Commands accepted by a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamCommand {
    Record,
    Stop,
    Status,
    /// Request a status report and capture its position as one point.
    TakePoint,
    Disconnect,
}

impl StreamCommand {
    /// Line sent to the device, if any.
    pub fn device_line(&self) -> Option<&'static str> {
        match self {
            Self::Record => Some("record\n"),
            Self::Stop => Some("stop\n"),
            Self::Status | Self::TakePoint => Some("status\n"),
            Self::Disconnect => None,
        }
    }
}

type SharedStatus = Arc<Mutex<SessionStatus>>;

fn update_status(status: &SharedStatus, apply: impl FnOnce(&mut SessionStatus)) {
    let mut guard = status.lock().unwrap_or_else(PoisonError::into_inner);
    apply(&mut guard);
}

fn read_status(status: &SharedStatus) -> SessionStatus {
    status.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Owns the selected port and hands out at most one live session.
pub struct StreamIngestor<P: SerialPort> {
    config: StreamConfig,
    port: Option<P>,
    status: SharedStatus,
    active: Arc<AtomicBool>,
}

impl<P: SerialPort> StreamIngestor<P> {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            config,
            port: None,
            status: Arc::new(Mutex::new(SessionStatus {
                message: "Idle".to_string(),
                ..SessionStatus::default()
            })),
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        read_status(&self.status)
    }

    pub fn state(&self) -> IngestorState {
        self.status().state
    }

    /// True while a read loop from this ingestor has not finished.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Choose the port for the next connection.
    pub fn select_port(&mut self, port: P) -> Result<()> {
        if self.is_active() {
            return Err(SketchError::SessionActive);
        }
        let name = port.describe();
        self.port = Some(port);
        update_status(&self.status, |s| {
            *s = SessionStatus {
                state: IngestorState::PortSelected,
                message: "Port selected. Click Connect.".to_string(),
                ..SessionStatus::default()
            };
        });
        tracing::debug!(port = %name, "serial port selected");
        Ok(())
    }

    /// Open the selected port and start a session delivering into `sink`.
    ///
    /// Fails with [`SketchError::SessionActive`] while a previous read loop
    /// is still running.
    pub fn connect<S: PointSink>(
        &mut self,
        sink: S,
    ) -> Result<(StreamHandle, ReadLoop<P::Reader, P::Writer, S>)> {
        if self.is_active() {
            return Err(SketchError::SessionActive);
        }
        let Some(port) = self.port.as_mut() else {
            update_status(&self.status, |s| s.message = "No port selected.".to_string());
            return Err(SketchError::InvalidState("no port selected".to_string()));
        };

        let baud_rate = self.config.baud_rate;
        let (reader, writer) = match port.open(baud_rate) {
            Ok(halves) => halves,
            Err(e) => {
                tracing::error!(port = %port.describe(), error = %e, "failed to open port");
                update_status(&self.status, |s| s.message = "Failed to open port.".to_string());
                return Err(e);
            }
        };

        let mut session = StreamSession::new(self.config);
        let message = format!("Connected @{}", baud_rate);
        session.set_status(message.clone());
        session.notify(NotificationType::Info, message.clone());
        tracing::info!(port = %port.describe(), baud_rate, "serial port connected");

        update_status(&self.status, |s| {
            *s = SessionStatus {
                state: IngestorState::Connected,
                message,
                ..SessionStatus::default()
            };
        });
        self.active.store(true, Ordering::Release);

        let (commands_tx, commands_rx) = mpsc::unbounded();
        let handle = StreamHandle {
            commands: commands_tx,
            status: Arc::clone(&self.status),
        };
        let read_loop = ReadLoop {
            reader,
            writer,
            commands: commands_rx,
            session,
            sink,
            status: Arc::clone(&self.status),
            active: Arc::clone(&self.active),
            chunk_size: self.config.read_chunk_size.max(1),
            finished: false,
        };
        Ok((handle, read_loop))
    }
}

/// Cloneable command side of a session.
#[derive(Debug, Clone)]
pub struct StreamHandle {
    commands: UnboundedSender<StreamCommand>,
    status: SharedStatus,
}

impl StreamHandle {
    pub fn record(&self) -> Result<()> {
        self.send(StreamCommand::Record)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(StreamCommand::Stop)
    }

    pub fn request_status(&self) -> Result<()> {
        self.send(StreamCommand::Status)
    }

    pub fn take_point(&self) -> Result<()> {
        self.send(StreamCommand::TakePoint)
    }

    /// End the session. Calling it again, or after the session ended, is a
    /// no-op.
    pub fn disconnect(&self) {
        let _ = self.commands.unbounded_send(StreamCommand::Disconnect);
    }

    pub fn is_connected(&self) -> bool {
        !self.commands.is_closed()
    }

    pub fn status(&self) -> SessionStatus {
        read_status(&self.status)
    }

    /// Queue a command for the read loop.
    pub fn send(&self, command: StreamCommand) -> Result<()> {
        if command == StreamCommand::Disconnect {
            self.disconnect();
            return Ok(());
        }
        self.commands.unbounded_send(command).map_err(|_| {
            update_status(&self.status, |s| s.message = "Not connected.".to_string());
            SketchError::InvalidState("Not connected.".to_string())
        })
    }
}

enum LoopEvent {
    Command(Option<StreamCommand>),
    Read(std::io::Result<usize>),
}

enum Exit {
    Disconnected,
    EndOfStream,
    ReadFailed,
}

/// The session's read loop.
///
/// Drive it to completion with [`run`](ReadLoop::run). Dropping it unfinished
/// still flushes the pending batch and releases the ingestor.
pub struct ReadLoop<R, W, S>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    S: PointSink,
{
    reader: R,
    writer: W,
    commands: UnboundedReceiver<StreamCommand>,
    session: StreamSession,
    sink: S,
    status: SharedStatus,
    active: Arc<AtomicBool>,
    chunk_size: usize,
    finished: bool,
}

impl<R, W, S> ReadLoop<R, W, S>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    S: PointSink,
{
    /// Read until disconnect, end of stream or a read error.
    ///
    /// Returns the session's notifications.
    pub async fn run(mut self) -> NotificationCollection {
        let mut buf = vec![0u8; self.chunk_size];

        let exit = loop {
            let event = {
                let mut next_command = self.commands.next();
                let mut next_chunk = self.reader.read(&mut buf).fuse();
                select_biased! {
                    command = next_command => LoopEvent::Command(command),
                    read = next_chunk => LoopEvent::Read(read),
                }
            };

            match event {
                LoopEvent::Command(Some(StreamCommand::Disconnect)) | LoopEvent::Command(None) => {
                    break Exit::Disconnected;
                }
                LoopEvent::Command(Some(command)) => self.handle_command(command).await,
                LoopEvent::Read(Ok(0)) => {
                    self.session.finish(&self.sink);
                    break Exit::EndOfStream;
                }
                LoopEvent::Read(Ok(n)) => self.session.feed(&buf[..n], &self.sink),
                LoopEvent::Read(Err(e)) => {
                    tracing::error!(error = %e, "serial read failed");
                    self.session.set_status("Serial read error.");
                    self.session
                        .notify(NotificationType::Error, format!("Serial read error: {}", e));
                    break Exit::ReadFailed;
                }
            }
            self.publish();
        };

        if let Err(e) = self.writer.close().await {
            tracing::debug!(error = %e, "closing serial writer failed");
        }
        self.teardown(exit);
        self.session.take_notifications()
    }

    async fn handle_command(&mut self, command: StreamCommand) {
        let status = match command {
            StreamCommand::Record => {
                self.session.set_recording(true, &self.sink);
                "Recording..."
            }
            StreamCommand::Stop => {
                self.session.set_recording(false, &self.sink);
                "Recording stopped."
            }
            StreamCommand::Status => "Status requested...",
            StreamCommand::TakePoint => {
                self.session.arm_single_shot();
                "Requesting single point..."
            }
            StreamCommand::Disconnect => return,
        };

        let Some(line) = command.device_line() else {
            return;
        };
        match self.write_line(line).await {
            Ok(()) => self.session.set_status(status),
            Err(e) => {
                tracing::warn!(command = ?command, error = %e, "device write failed");
                self.session.set_status("Write failed.");
                self.session.notify(
                    NotificationType::Warning,
                    format!("Write failed for {:?}: {}", command, e),
                );
            }
        }
    }

    async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await
    }

    fn publish(&self) {
        let recording = self.session.is_recording();
        update_status(&self.status, |s| {
            s.state = if recording {
                IngestorState::Recording
            } else {
                IngestorState::Connected
            };
            s.recording = recording;
            s.last_position = self.session.last_position();
            s.message = self.session.status().to_string();
        });
    }

    fn teardown(&mut self, exit: Exit) {
        if self.finished {
            return;
        }
        self.finished = true;

        self.session.set_recording(false, &self.sink);
        self.session.flush(&self.sink);
        if !matches!(exit, Exit::ReadFailed) {
            self.session.set_status("Disconnected.");
        }
        self.session
            .notify(NotificationType::Info, "Disconnected.".to_string());
        self.commands.close();

        let message = self.session.status().to_string();
        let last_position = self.session.last_position();
        update_status(&self.status, |s| {
            s.state = IngestorState::Disconnected;
            s.recording = false;
            s.last_position = last_position;
            s.message = message;
        });
        self.active.store(false, Ordering::Release);
        tracing::info!(
            end_of_stream = matches!(exit, Exit::EndOfStream),
            "serial session ended"
        );
    }
}

impl<R, W, S> Drop for ReadLoop<R, W, S>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    S: PointSink,
{
    fn drop(&mut self) {
        self.teardown(Exit::Disconnected);
    }
}
