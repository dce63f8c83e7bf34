//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufWriter, ErrorKind};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::engine::Engine;
use crate::error::{KvError, Result};
use crate::protocol::{
    decode_command, encode_response, read_frame, write_frame, Command, Response,
    NOT_FOUND_PAYLOAD,
};

/// How long a worker waits on a quiet connection before moving on
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Outcome of one [`Connection::serve_next`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// A message arrived and was answered
    Served,
    /// Nothing arrived within the poll interval
    Idle,
    /// The peer went away or the idle timeout expired
    Closed,
}

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader; every read is one message
    reader: TcpStream,

    /// TCP stream writer (buffered, flushed per response)
    writer: BufWriter<TcpStream>,

    /// Reference to the storage engine
    engine: Arc<Engine>,

    /// Peer address for logging
    peer_addr: String,

    /// Close the connection after this long without a message
    idle_timeout: Option<Duration>,

    /// When the last message arrived
    last_activity: Instant,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, engine: Arc<Engine>) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Reads give up quickly so one quiet client cannot hold a worker
        let read_stream = stream.try_clone()?;
        read_stream.set_read_timeout(Some(IDLE_POLL_INTERVAL))?;

        tracing::debug!("Connection established from {}", peer_addr);

        Ok(Self {
            reader: read_stream,
            writer: BufWriter::new(stream),
            engine,
            peer_addr,
            idle_timeout: None,
            last_activity: Instant::now(),
        })
    }

    /// Configure timeouts (0 leaves a direction without timeout)
    ///
    /// `idle_ms` closes a connection that sends nothing for that long.
    pub fn set_timeouts(&mut self, idle_ms: u64, write_ms: u64) -> Result<()> {
        self.idle_timeout = (idle_ms > 0).then(|| Duration::from_millis(idle_ms));
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Wait briefly for one message and answer it
    ///
    /// Every message gets exactly one response. Malformed messages get a
    /// FAILURE response and the connection stays open.
    pub fn serve_next(&mut self) -> Result<ConnectionState> {
        let frame = match read_frame(&mut self.reader) {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::debug!("Client {} disconnected", self.peer_addr);
                return Ok(ConnectionState::Closed);
            }
            Err(KvError::Io(ref e)) if is_disconnect(e.kind()) => {
                tracing::debug!("Connection to {} closed: {}", self.peer_addr, e);
                return Ok(ConnectionState::Closed);
            }
            Err(KvError::Io(ref e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                return Ok(self.idle_state());
            }
            Err(e) => {
                tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                return Err(e);
            }
        };

        self.last_activity = Instant::now();
        let response = self.process_frame(&frame);
        self.respond(&response)
    }

    /// Decode one message and run it against the engine
    pub fn process_frame(&self, frame: &[u8]) -> Response {
        match decode_command(frame) {
            Ok(command) => {
                tracing::trace!("Received command from {}: {:?}", self.peer_addr, command);
                self.execute_command(command)
            }
            Err(e) => {
                tracing::warn!("Invalid request from {}: {}", self.peer_addr, e);
                Response::failure()
            }
        }
    }

    /// Execute a command and return a response
    fn execute_command(&self, command: Command) -> Response {
        match command {
            Command::Get { key } => {
                let value = self
                    .engine
                    .get(&key)
                    .unwrap_or_else(|| NOT_FOUND_PAYLOAD.to_string());
                tracing::debug!(key = %key, value = %value, "GET");
                Response::success(Some(value))
            }
            Command::Set { key, value } => {
                tracing::debug!(key = %key, value = %value, "SET");
                self.finish_write(&key, self.engine.set(&key, &value))
            }
            Command::Delete { key } => {
                tracing::debug!(key = %key, "DELETE");
                self.finish_write(&key, self.engine.delete(&key))
            }
        }
    }

    fn finish_write(&self, key: &str, result: Result<()>) -> Response {
        match result {
            Ok(()) => Response::success(None),
            Err(e) => {
                tracing::error!(key, "Engine error for {}: {}", self.peer_addr, e);
                Response::failure()
            }
        }
    }

    /// Send `response`, or a bare FAILURE if it cannot be encoded
    fn respond(&mut self, response: &Response) -> Result<ConnectionState> {
        let message = match encode_response(response) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Cannot encode response for {}: {}", self.peer_addr, e);
                encode_response(&Response::failure())?
            }
        };

        match write_frame(&mut self.writer, &message) {
            Ok(()) => Ok(ConnectionState::Served),
            Err(KvError::Io(ref e)) if is_disconnect(e.kind()) => {
                tracing::debug!(
                    "Client {} disconnected before response could be sent: {}",
                    self.peer_addr,
                    e
                );
                Ok(ConnectionState::Closed)
            }
            Err(e) => {
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                Err(e)
            }
        }
    }

    fn idle_state(&self) -> ConnectionState {
        match self.idle_timeout {
            Some(timeout) if self.last_activity.elapsed() >= timeout => {
                tracing::debug!("Closing idle connection from {}", self.peer_addr);
                ConnectionState::Closed
            }
            _ => ConnectionState::Idle,
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
    )
}
