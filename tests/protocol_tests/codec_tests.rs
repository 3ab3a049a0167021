//! Codec Tests
//!
//! Tests for command and response encoding/decoding.

use std::io::Cursor;

use bytedev::error::DeviceError;
use bytedev::protocol::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, Command, Response, Status, HEADER_SIZE,
    MAX_PAYLOAD_SIZE,
};
use bytedev::Whence;

// =============================================================================
// Command Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_read() {
    let cmd = Command::Read { length: 1024 };
    let encoded = encode_command(&cmd);

    assert_eq!(encoded.len(), HEADER_SIZE + 4);
    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_encode_decode_write() {
    let cmd = Command::Write {
        data: b"hello".to_vec(),
    };
    let encoded = encode_command(&cmd);

    match decode_command(&encoded).unwrap() {
        Command::Write { data } => assert_eq!(data, b"hello"),
        _ => panic!("Expected WRITE command"),
    }
}

#[test]
fn test_encode_decode_write_empty() {
    let cmd = Command::Write { data: vec![] };
    let encoded = encode_command(&cmd);

    assert_eq!(encoded.len(), HEADER_SIZE);
    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_encode_decode_seek_negative_offset() {
    let cmd = Command::Seek {
        offset: -1023,
        whence: Whence::RelativeToEnd,
    };
    let encoded = encode_command(&cmd);

    assert_eq!(encoded.len(), HEADER_SIZE + 9);
    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_encode_seek_layout() {
    let cmd = Command::Seek {
        offset: 10,
        whence: Whence::RelativeToCurrent,
    };
    let encoded = encode_command(&cmd);

    assert_eq!(encoded[0], 0x03);
    assert_eq!(&encoded[1..5], &9u32.to_be_bytes());
    assert_eq!(&encoded[5..13], &10i64.to_be_bytes());
    assert_eq!(encoded[13], 1);
}

#[test]
fn test_encode_decode_stats_and_ping() {
    for cmd in [Command::Stats, Command::Ping] {
        let encoded = encode_command(&cmd);
        assert_eq!(encoded.len(), HEADER_SIZE);
        assert_eq!(decode_command(&encoded).unwrap(), cmd);
    }
}

// =============================================================================
// Command Error Tests
// =============================================================================

#[test]
fn test_decode_incomplete_header() {
    let result = decode_command(&[0x01, 0x00]);
    assert!(matches!(result, Err(DeviceError::Protocol(_))));
}

#[test]
fn test_decode_incomplete_payload() {
    let encoded = encode_command(&Command::Write {
        data: b"truncated".to_vec(),
    });
    let result = decode_command(&encoded[..encoded.len() - 3]);
    assert!(matches!(result, Err(DeviceError::Protocol(_))));
}

#[test]
fn test_decode_unknown_command() {
    let result = decode_command(&[0x7f, 0, 0, 0, 0]);
    assert!(matches!(result, Err(DeviceError::Protocol(_))));
}

#[test]
fn test_decode_read_with_wrong_payload_size() {
    let result = decode_command(&[0x01, 0, 0, 0, 2, 0, 1]);
    assert!(matches!(result, Err(DeviceError::Protocol(_))));
}

#[test]
fn test_decode_seek_with_unknown_whence() {
    let mut bytes = vec![0x03, 0, 0, 0, 9];
    bytes.extend_from_slice(&0i64.to_be_bytes());
    bytes.push(7);

    let result = decode_command(&bytes);
    assert!(matches!(result, Err(DeviceError::Protocol(_))));
}

#[test]
fn test_decode_ping_with_payload() {
    let result = decode_command(&[0x05, 0, 0, 0, 1, 0xaa]);
    assert!(matches!(result, Err(DeviceError::Protocol(_))));
}

#[test]
fn test_decode_payload_too_large() {
    let mut bytes = vec![0x02];
    bytes.extend_from_slice(&(MAX_PAYLOAD_SIZE + 1).to_be_bytes());

    let result = decode_command(&bytes);
    assert!(matches!(result, Err(DeviceError::Protocol(_))));
}

// =============================================================================
// Response Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_ok_with_payload() {
    let response = Response::ok(Some(b"abc       xyz".to_vec()));
    let decoded = decode_response(&encode_response(&response)).unwrap();

    assert_eq!(decoded, response);
    assert_eq!(decoded.status, Status::Ok);
}

#[test]
fn test_ok_without_payload() {
    let decoded = decode_response(&encode_response(&Response::ok(None))).unwrap();

    assert_eq!(decoded.status, Status::Ok);
    assert_eq!(decoded.payload, None);
}

#[test]
fn test_empty_payload_decodes_as_none() {
    let decoded = decode_response(&encode_response(&Response::ok(Some(vec![])))).unwrap();
    assert_eq!(decoded.payload, None);
}

#[test]
fn test_out_of_range_response() {
    let encoded = encode_response(&Response::out_of_range());

    assert_eq!(encoded[0], 0x01);
    let decoded = decode_response(&encoded).unwrap();
    assert_eq!(decoded.status, Status::OutOfRange);
}

#[test]
fn test_error_response_carries_message() {
    let decoded = decode_response(&encode_response(&Response::error("boom"))).unwrap();

    assert_eq!(decoded.status, Status::Error);
    assert_eq!(decoded.payload, Some(b"boom".to_vec()));
}

#[test]
fn test_decode_unknown_status() {
    let result = decode_response(&[0x09, 0, 0, 0, 0]);
    assert!(matches!(result, Err(DeviceError::Protocol(_))));
}

// =============================================================================
// Stream Tests
// =============================================================================

#[test]
fn test_stream_commands_in_sequence() {
    let mut buffer = Vec::new();
    let commands = vec![
        Command::Write {
            data: b"abc".to_vec(),
        },
        Command::Seek {
            offset: 0,
            whence: Whence::Absolute,
        },
        Command::Read { length: 3 },
    ];

    for cmd in &commands {
        write_command(&mut buffer, cmd).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for expected in &commands {
        assert_eq!(&read_command(&mut cursor).unwrap(), expected);
    }

    let eof = read_command(&mut cursor);
    assert!(matches!(eof, Err(DeviceError::Io(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof));
}

#[test]
fn test_stream_response() {
    let mut buffer = Vec::new();
    let response = Response::ok(Some(1023u64.to_be_bytes().to_vec()));
    write_response(&mut buffer, &response).unwrap();

    let decoded = read_response(&mut Cursor::new(buffer)).unwrap();
    assert_eq!(decoded, response);
}

#[test]
fn test_stream_rejects_oversized_frame_before_reading_payload() {
    let mut bytes = vec![0x02];
    bytes.extend_from_slice(&u32::MAX.to_be_bytes());

    let result = read_command(&mut Cursor::new(bytes));
    assert!(matches!(result, Err(DeviceError::Protocol(_))));
}
