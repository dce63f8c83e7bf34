//! Codec Tests
//!
//! Tests for command and response encoding/decoding.

use std::io::Cursor;

use sstkv::protocol::{
    decode_command, decode_response, decode_string, encode_command, encode_response,
    encode_string, read_command, read_response, write_command, write_response, Command, Opcode,
    Response, Status, MAX_PAYLOAD_SIZE,
};
use sstkv::{KvError, ProtocolError};

// =============================================================================
// Helper Functions
// =============================================================================

fn protocol_error<T: std::fmt::Debug>(result: sstkv::Result<T>) -> ProtocolError {
    match result {
        Err(KvError::Protocol(e)) => e,
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

// =============================================================================
// String Encoding Tests
// =============================================================================

#[test]
fn test_encode_string_appends_terminator() {
    assert_eq!(encode_string("abc").unwrap(), b"abc\0".to_vec());
    assert_eq!(encode_string("").unwrap(), b"\0".to_vec());
}

#[test]
fn test_encode_string_rejects_embedded_terminator() {
    assert_eq!(
        protocol_error(encode_string("a\0b")),
        ProtocolError::EmbeddedTerminator
    );
}

#[test]
fn test_decode_string_cuts_at_last_terminator() {
    assert_eq!(decode_string(b"abc\0").unwrap(), "abc");
    assert_eq!(decode_string(b"key\0value\0").unwrap(), "key\0value");
    assert_eq!(decode_string(b"no-terminator").unwrap(), "no-terminator");
}

#[test]
fn test_decode_string_rejects_invalid_utf8() {
    assert_eq!(
        protocol_error(decode_string(&[0xff, 0xfe, 0x00])),
        ProtocolError::InvalidUtf8
    );
}

// =============================================================================
// Command Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_get() {
    let cmd = Command::Get {
        key: "foo".to_string(),
    };
    let encoded = encode_command(&cmd).unwrap();
    let decoded = decode_command(&encoded).unwrap();

    assert_eq!(decoded.opcode(), Opcode::Get);
    assert_eq!(decoded, cmd);
    assert_eq!(decoded.key(), "foo");
}

#[test]
fn test_encode_decode_set() {
    let cmd = Command::Set {
        key: "Entity".to_string(),
        value: "Value".to_string(),
    };
    let encoded = encode_command(&cmd).unwrap();

    assert_eq!(&encoded[3..], b"Entity\0Value\0");
    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_encode_decode_delete() {
    let cmd = Command::Delete {
        key: "todelete".to_string(),
    };
    let encoded = encode_command(&cmd).unwrap();

    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_encode_decode_set_empty_value() {
    let cmd = Command::Set {
        key: "key".to_string(),
        value: String::new(),
    };
    let encoded = encode_command(&cmd).unwrap();

    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_encode_decode_unicode() {
    let cmd = Command::Set {
        key: "ключ".to_string(),
        value: "値🦀".to_string(),
    };
    let encoded = encode_command(&cmd).unwrap();

    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_payload_at_limit() {
    // 254 bytes + terminator = 255
    let cmd = Command::Get {
        key: "k".repeat(MAX_PAYLOAD_SIZE - 1),
    };
    let encoded = encode_command(&cmd).unwrap();

    assert_eq!(encoded[2], 255);
    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_payload_over_limit_rejected() {
    let cmd = Command::Set {
        key: "k".repeat(200),
        value: "v".repeat(60),
    };

    assert_eq!(
        protocol_error(encode_command(&cmd)),
        ProtocolError::PayloadTooLarge(262)
    );
}

// =============================================================================
// Response Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_response_success() {
    let response = Response::success(Some("bar".to_string()));
    let encoded = encode_response(&response).unwrap();
    let decoded = decode_response(&encoded).unwrap();

    assert_eq!(decoded.status, Status::Success);
    assert_eq!(decoded.payload, Some("bar".to_string()));
    assert!(decoded.is_success());
}

#[test]
fn test_encode_decode_response_no_payload() {
    let response = Response::success(None);
    let encoded = encode_response(&response).unwrap();

    assert_eq!(&encoded[..], &[0x01, 0x00, 0x00]);
    assert_eq!(decode_response(&encoded).unwrap(), response);
}

#[test]
fn test_encode_decode_response_failure() {
    let encoded = encode_response(&Response::failure()).unwrap();
    let decoded = decode_response(&encoded).unwrap();

    assert_eq!(&encoded[..], &[0x01, 0x01, 0x00]);
    assert_eq!(decoded.status, Status::Failure);
    assert_eq!(decoded.payload, None);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_incomplete_header() {
    assert_eq!(
        protocol_error(decode_command(&[0x01, 0x01])),
        ProtocolError::IncompleteHeader(2)
    );
    assert_eq!(
        protocol_error(decode_response(&[])),
        ProtocolError::IncompleteHeader(0)
    );
}

#[test]
fn test_request_invalid_version() {
    assert_eq!(
        protocol_error(decode_command(&[0x02, 0x01, 0x00])),
        ProtocolError::InvalidVersion {
            expected: 0x01,
            got: 0x02
        }
    );
}

#[test]
fn test_request_invalid_command_code() {
    assert_eq!(
        protocol_error(decode_command(&[0x01, 0xff, 0x00])),
        ProtocolError::InvalidCommandCode(0xff)
    );
}

#[test]
fn test_response_invalid_version() {
    assert!(matches!(
        protocol_error(decode_response(&[0x02, 0x00, 0x00])),
        ProtocolError::InvalidVersion { got: 0x02, .. }
    ));
}

#[test]
fn test_response_invalid_status_code() {
    assert_eq!(
        protocol_error(decode_response(&[0x01, 0xff, 0x00])),
        ProtocolError::InvalidStatusCode(0xff)
    );
}

#[test]
fn test_request_payload_length_mismatch() {
    assert_eq!(
        protocol_error(decode_command(&[0x01, 0x01, 0x02, 0x41])),
        ProtocolError::PayloadLengthMismatch {
            expected: 2,
            got: 1
        }
    );
}

#[test]
fn test_request_payload_longer_than_declared() {
    assert_eq!(
        protocol_error(decode_command(&[0x01, 0x01, 0x01, 0x41, 0x00])),
        ProtocolError::PayloadLengthMismatch {
            expected: 1,
            got: 2
        }
    );
}

#[test]
fn test_response_payload_length_mismatch() {
    assert_eq!(
        protocol_error(decode_response(&[0x01, 0x00, 0x02, 0x41])),
        ProtocolError::PayloadLengthMismatch {
            expected: 2,
            got: 1
        }
    );
}

#[test]
fn test_set_without_separator() {
    assert_eq!(
        protocol_error(decode_command(&[0x01, 0x02, 0x04, b'k', b'e', b'y', 0x00])),
        ProtocolError::MissingValue
    );
}

#[test]
fn test_set_ignores_extra_segments() {
    let decoded = decode_command(&[0x01, 0x02, 0x06, b'k', 0x00, b'a', 0x00, b'b', 0x00]).unwrap();

    assert_eq!(
        decoded,
        Command::Set {
            key: "k".to_string(),
            value: "a".to_string(),
        }
    );
}

#[test]
fn test_protocol_error_is_flagged() {
    let err = decode_command(&[0x09, 0x01, 0x00]).unwrap_err();
    assert!(err.is_protocol());
}

// =============================================================================
// Stream Tests
// =============================================================================

#[test]
fn test_stream_write_read_command() {
    let cmd = Command::Set {
        key: "stream".to_string(),
        value: "value".to_string(),
    };
    let mut buffer = Vec::new();
    write_command(&mut buffer, &cmd).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_command(&mut cursor).unwrap(), Some(cmd));
    assert_eq!(read_command(&mut cursor).unwrap(), None);
}

#[test]
fn test_stream_write_read_response() {
    let response = Response::success(Some("NONE".to_string()));
    let mut buffer = Vec::new();
    write_response(&mut buffer, &response).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_response(&mut cursor).unwrap(), response);
}

#[test]
fn test_read_response_on_closed_stream() {
    let mut cursor = Cursor::new(Vec::new());
    assert!(matches!(
        read_response(&mut cursor),
        Err(KvError::Network(_))
    ));
}

// =============================================================================
// Wire Format Tests
// =============================================================================

#[test]
fn test_wire_format_get() {
    let encoded = encode_command(&Command::Get {
        key: "foo".to_string(),
    })
    .unwrap();

    assert_eq!(&encoded[..], &[0x01, 0x01, 0x04, b'f', b'o', b'o', 0x00]);
}

#[test]
fn test_wire_format_delete() {
    let encoded = encode_command(&Command::Delete {
        key: "k".to_string(),
    })
    .unwrap();

    assert_eq!(&encoded[..], &[0x01, 0x03, 0x02, b'k', 0x00]);
}

#[test]
fn test_wire_format_response_success() {
    let encoded = encode_response(&Response::success(Some("bar".to_string()))).unwrap();

    assert_eq!(&encoded[..], &[0x01, 0x00, 0x04, b'b', b'a', b'r', 0x00]);
}
