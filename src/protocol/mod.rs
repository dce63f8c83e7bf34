//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Message Format (requests and responses)
//! ```text
//! ┌───────────┬──────────┬─────────┬─────────────────────┐
//! │Version (1)│ Code (1) │ Len (1) │       Payload       │
//! └───────────┴──────────┴─────────┴─────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: GET    - Payload: key\0
//! - 0x02: SET    - Payload: key\0value\0
//! - 0x03: DELETE - Payload: key\0
//!
//! ### Status Codes
//! - 0x00: SUCCESS
//! - 0x01: FAILURE

mod codec;
mod command;
mod response;

pub use codec::{
    decode_command, decode_response, decode_string, encode_command, encode_response,
    encode_string, read_command, read_frame, read_response, write_command, write_frame,
    write_response, HEADER_SIZE, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, NOT_FOUND_PAYLOAD,
    PROTOCOL_VERSION, TERMINATOR,
};
pub use command::{Command, Opcode};
pub use response::{Response, Status};
