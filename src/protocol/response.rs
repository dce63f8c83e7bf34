//! Response definitions
//!
//! Represents responses to clients.

use serde::Serialize;

use crate::error::ProtocolError;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum Status {
    #[serde(rename = "SUCCESS")]
    Success = 0x00,
    #[serde(rename = "FAILURE")]
    Failure = 0x01,
}

impl TryFrom<u8> for Status {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0x00 => Ok(Status::Success),
            0x01 => Ok(Status::Failure),
            _ => Err(ProtocolError::InvalidStatusCode(code)),
        }
    }
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (the value for GET)
    pub payload: Option<String>,
}

impl Response {
    /// Create a SUCCESS response with optional payload
    pub fn success(payload: Option<String>) -> Self {
        Self {
            status: Status::Success,
            payload,
        }
    }

    /// Create a FAILURE response; failures never carry a payload
    pub fn failure() -> Self {
        Self {
            status: Status::Failure,
            payload: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}
