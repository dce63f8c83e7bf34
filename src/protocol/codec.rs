//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ```text
//! ┌───────────┬──────────────────┬─────────┬──────────────────────┐
//! │Version (1)│ Opcode/Status (1)│ Len (1) │ Payload (Len bytes)  │
//! └───────────┴──────────────────┴─────────┴──────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - GET:    key\0
//! - SET:    key\0value\0 (extra segments after the value are ignored)
//! - DELETE: key\0
//!
//! The length byte caps a payload at 255 bytes.

use std::io::{ErrorKind, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use super::{Command, Opcode, Response, Status};
use crate::error::{KvError, ProtocolError, Result};

/// Only supported protocol version
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Header size: version (1) + opcode/status (1) + length (1)
pub const HEADER_SIZE: usize = 3;

/// Largest payload the single length byte can describe
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

/// Largest possible message on the wire
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE;

/// Terminates every string in a payload
pub const TERMINATOR: u8 = 0x00;

/// GET payload sent back when the key does not exist
pub const NOT_FOUND_PAYLOAD: &str = "NONE";

// =============================================================================
// Strings
// =============================================================================

/// UTF-8 bytes of `value` followed by the terminator
pub fn encode_string(value: &str) -> Result<Vec<u8>> {
    if value.as_bytes().contains(&TERMINATOR) {
        return Err(ProtocolError::EmbeddedTerminator.into());
    }

    let mut bytes = Vec::with_capacity(value.len() + 1);
    bytes.extend_from_slice(value.as_bytes());
    bytes.push(TERMINATOR);
    Ok(bytes)
}

/// Text up to the last terminator (or all bytes if there is none)
pub fn decode_string(bytes: &[u8]) -> Result<String> {
    let end = bytes
        .iter()
        .rposition(|&b| b == TERMINATOR)
        .unwrap_or(bytes.len());

    String::from_utf8(bytes[..end].to_vec()).map_err(|_| ProtocolError::InvalidUtf8.into())
}

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
pub fn encode_command(command: &Command) -> Result<Bytes> {
    let payload = match command {
        Command::Get { key } | Command::Delete { key } => encode_string(key)?,
        Command::Set { key, value } => {
            let mut payload = encode_string(key)?;
            payload.extend_from_slice(&encode_string(value)?);
            payload
        }
    };

    encode_frame(command.opcode() as u8, &payload)
}

/// Decode a command from one complete message
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    check_header(bytes)?;
    let opcode = Opcode::try_from(bytes[1])?;
    let payload = checked_payload(bytes)?;
    let text = decode_string(payload)?;

    let command = match opcode {
        Opcode::Get => Command::Get { key: text },
        Opcode::Set => {
            // Anything after a second inner terminator is dropped
            let mut parts = text.split('\0');
            let key = parts.next().unwrap_or_default();
            let value = parts.next().ok_or(ProtocolError::MissingValue)?;
            Command::Set {
                key: key.to_string(),
                value: value.to_string(),
            }
        }
        Opcode::Delete => Command::Delete { key: text },
    };

    Ok(command)
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes; `None` payload encodes as zero length
pub fn encode_response(response: &Response) -> Result<Bytes> {
    let payload = match &response.payload {
        Some(text) => encode_string(text)?,
        None => Vec::new(),
    };

    encode_frame(response.status as u8, &payload)
}

/// Decode a response from one complete message
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    check_header(bytes)?;
    let status = Status::try_from(bytes[1])?;
    let payload = checked_payload(bytes)?;

    let payload = if payload.is_empty() {
        None
    } else {
        Some(decode_string(payload)?)
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Framing helpers
// =============================================================================

fn encode_frame(code: u8, payload: &[u8]) -> Result<Bytes> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(ProtocolError::PayloadTooLarge(payload.len()).into());
    }

    let mut message = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    message.put_u8(PROTOCOL_VERSION);
    message.put_u8(code);
    message.put_u8(payload.len() as u8);
    message.put_slice(payload);

    Ok(message.freeze())
}

fn check_header(bytes: &[u8]) -> Result<()> {
    if bytes.len() < HEADER_SIZE {
        return Err(ProtocolError::IncompleteHeader(bytes.len()).into());
    }
    if bytes[0] != PROTOCOL_VERSION {
        return Err(ProtocolError::InvalidVersion {
            expected: PROTOCOL_VERSION,
            got: bytes[0],
        }
        .into());
    }
    Ok(())
}

fn checked_payload(bytes: &[u8]) -> Result<&[u8]> {
    let declared = bytes[2] as usize;
    let payload = &bytes[HEADER_SIZE..];

    if payload.len() != declared {
        return Err(ProtocolError::PayloadLengthMismatch {
            expected: declared,
            got: payload.len(),
        }
        .into());
    }
    Ok(payload)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one message: a single read of at most [`MAX_FRAME_SIZE`] bytes.
///
/// Whatever one read returns is treated as a complete message; there is no
/// reassembly across reads. Returns `Ok(None)` once the peer has closed.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut buffer = [0u8; MAX_FRAME_SIZE];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => return Ok(None),
            Ok(n) => return Ok(Some(buffer[..n].to_vec())),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Write one message and flush it
pub fn write_frame<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<()> {
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    write_frame(writer, &encode_command(command)?)
}

/// Read a command from a stream; `Ok(None)` if the peer closed
pub fn read_command<R: Read>(reader: &mut R) -> Result<Option<Command>> {
    match read_frame(reader)? {
        Some(frame) => decode_command(&frame).map(Some),
        None => Ok(None),
    }
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    write_frame(writer, &encode_response(response)?)
}

/// Read a response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    match read_frame(reader)? {
        Some(frame) => decode_response(&frame),
        None => Err(KvError::Network(
            "Connection closed before a response arrived".to_string(),
        )),
    }
}
