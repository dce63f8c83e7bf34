//! Command definitions
//!
//! Represents requests from clients.

use crate::error::ProtocolError;

/// Request opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Get = 0x01,
    Set = 0x02,
    Delete = 0x03,
}

impl TryFrom<u8> for Opcode {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0x01 => Ok(Opcode::Get),
            0x02 => Ok(Opcode::Set),
            0x03 => Ok(Opcode::Delete),
            _ => Err(ProtocolError::InvalidCommandCode(code)),
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: String },

    /// Set a key-value pair
    Set { key: String, value: String },

    /// Delete a key
    Delete { key: String },
}

impl Command {
    /// Get the opcode
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::Get { .. } => Opcode::Get,
            Command::Set { .. } => Opcode::Set,
            Command::Delete { .. } => Opcode::Delete,
        }
    }

    /// The key this command addresses
    pub fn key(&self) -> &str {
        match self {
            Command::Get { key } | Command::Set { key, .. } | Command::Delete { key } => key,
        }
    }
}
