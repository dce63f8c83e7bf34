//! Error types for sstkv
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for sstkv operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("SSTable {} is read only", .0.display())]
    ReadOnly(PathBuf),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Wire-level failures raised while encoding or decoding a message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Incomplete header: expected 3 bytes, got {0}")]
    IncompleteHeader(usize),

    #[error("Invalid protocol version, expected {expected} but got {got}")]
    InvalidVersion { expected: u8, got: u8 },

    #[error("Invalid command code: 0x{0:02x}")]
    InvalidCommandCode(u8),

    #[error("Invalid status code: 0x{0:02x}")]
    InvalidStatusCode(u8),

    #[error("Invalid payload length, expected {expected} but got {got}")]
    PayloadLengthMismatch { expected: usize, got: usize },

    #[error("Payload too large: {0} bytes (max 255)")]
    PayloadTooLarge(usize),

    #[error("Payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("SET payload is missing its value")]
    MissingValue,

    #[error("String contains an embedded NUL terminator")]
    EmbeddedTerminator,
}

impl KvError {
    /// True if this error came from the wire codec rather than the engine
    pub fn is_protocol(&self) -> bool {
        matches!(self, KvError::Protocol(_))
    }
}
