//! Codec Tests
//!
//! Tests for request encoding and response frame decoding.

use std::io::{self, Cursor, Read};
use topic_client::protocol::{
    body_size, content_kind, decode_body, decode_body_as, decode_request, encode_request,
    is_protocol_frame, read_response, write_request, MAX_PAYLOAD_SIZE,
};
use topic_client::{ContentKind, DecodedBody, TopicError};

// =============================================================================
// Helper Functions
// =============================================================================

/// Build a reply frame whose SIZE is the body length
fn reply_frame(tag: u8, body: &[u8]) -> Vec<u8> {
    let size = body.len() as u16;
    let mut frame = vec![0x00, 0x83];
    frame.extend_from_slice(&size.to_be_bytes());
    frame.push(tag);
    frame.extend_from_slice(body);
    frame
}

fn text_reply(text: &str) -> Vec<u8> {
    let mut body = text.as_bytes().to_vec();
    body.push(0x00);
    reply_frame(0x06, &body)
}

// =============================================================================
// Request Encoding Tests
// =============================================================================

#[test]
fn test_encode_status_query_bytes() {
    let frame = encode_request("?status").unwrap();

    let mut expected = vec![0x00, 0x83, 0x00, 0x0D, 0x00, 0x00, 0x00, 0x00, 0x00];
    expected.extend_from_slice(b"?status");
    expected.push(0x00);

    assert_eq!(&frame[..], &expected[..]);
}

#[test]
fn test_encode_length_field_is_payload_plus_six() {
    for payload in ["", "a", "?ping", "?status&key=value", "x".repeat(1000).as_str()] {
        let frame = encode_request(payload).unwrap();
        let length = u16::from_be_bytes([frame[2], frame[3]]) as usize;

        assert_eq!(length, payload.len() + 6);
        assert_eq!(frame.len(), payload.len() + 10);
        assert_eq!(&frame[9..frame.len() - 1], payload.as_bytes());
        assert_eq!(frame[frame.len() - 1], 0x00);
    }
}

#[test]
fn test_encode_reserved_bytes_are_zero() {
    let frame = encode_request("?who").unwrap();
    assert_eq!(&frame[4..9], &[0u8; 5]);
}

#[test]
fn test_encode_payload_not_escaped() {
    let payload = "?say=hello world&x=%41";
    let frame = encode_request(payload).unwrap();
    assert_eq!(&frame[9..frame.len() - 1], payload.as_bytes());
}

#[test]
fn test_encode_max_payload_accepted() {
    let payload = "a".repeat(MAX_PAYLOAD_SIZE);
    let frame = encode_request(&payload).unwrap();
    assert_eq!(u16::from_be_bytes([frame[2], frame[3]]), u16::MAX);
}

#[test]
fn test_encode_oversized_payload_rejected() {
    let payload = "a".repeat(MAX_PAYLOAD_SIZE + 1);
    let result = encode_request(&payload);
    assert!(matches!(result, Err(TopicError::Config(_))));
}

#[test]
fn test_decode_request_recovers_query() {
    let frame = encode_request("?status").unwrap();
    assert_eq!(decode_request(&frame).unwrap(), "?status");
}

#[test]
fn test_decode_request_rejects_bad_marker() {
    let mut frame = encode_request("?status").unwrap().to_vec();
    frame[1] = 0x84;
    assert!(matches!(decode_request(&frame), Err(TopicError::Protocol(_))));
}

#[test]
fn test_decode_request_rejects_short_payload() {
    let frame = encode_request("?status").unwrap();
    let result = decode_request(&frame[..frame.len() - 3]);
    assert!(matches!(result, Err(TopicError::Protocol(_))));
}

// =============================================================================
// Marker Tests
// =============================================================================

#[test]
fn test_marker_detected() {
    assert!(is_protocol_frame(&[0x00, 0x83]));
    assert!(is_protocol_frame(&[0x00, 0x83, 0x00, 0x01, 0x06]));
}

#[test]
fn test_marker_rejects_other_prefixes() {
    assert!(!is_protocol_frame(&[0x00, 0x84]));
    assert!(!is_protocol_frame(&[0x83, 0x00]));
    assert!(!is_protocol_frame(b"HTTP/1.1 200 OK"));
}

#[test]
fn test_marker_short_buffers_do_not_panic() {
    assert!(!is_protocol_frame(&[]));
    assert!(!is_protocol_frame(&[0x00]));
}

#[test]
fn test_body_size_reads_big_endian() {
    assert_eq!(body_size(&[0x00, 0x83, 0x01, 0x02]), Some(0x0102));
    assert_eq!(body_size(&[0x00, 0x83, 0x01]), None);
}

// =============================================================================
// Body Decoding Tests
// =============================================================================

#[test]
fn test_decode_hello_frame() {
    let frame = [0x00, 0x83, 0x00, 0x0B, 0x06, 0x68, 0x65, 0x6C, 0x6C, 0x6F];
    let body = decode_body(&frame).unwrap();
    assert_eq!(body, DecodedBody::Ascii("hello".to_string()));
}

#[test]
fn test_decode_exact_size_field() {
    let frame = [0x00, 0x83, 0x00, 0x05, 0x06, b'h', b'e', b'l', b'l', b'o', b'!', b'!'];
    let body = decode_body(&frame).unwrap();
    assert_eq!(body, DecodedBody::Ascii("hello".to_string()));
}

#[test]
fn test_decode_strips_nul_terminator() {
    let frame = text_reply("version=515");
    assert_eq!(decode_body(&frame).unwrap().into_text(), "version=515");
}

#[test]
fn test_decode_zero_padded_buffer() {
    // A fixed-size read buffer leaves zeros after the reply
    let mut frame = text_reply("ok");
    frame.resize(1024, 0);
    assert_eq!(decode_body(&frame).unwrap().into_text(), "ok");
}

#[test]
fn test_decode_empty_body() {
    let frame = reply_frame(0x06, &[]);
    assert_eq!(decode_body(&frame).unwrap().into_text(), "");
}

#[test]
fn test_decode_unknown_tag() {
    let frame = reply_frame(0x01, b"data");
    let result = decode_body(&frame);
    assert!(matches!(result, Err(TopicError::UnknownContentTag(0x01))));
}

#[test]
fn test_decode_rejects_non_protocol_frame() {
    let result = decode_body(b"not a frame at all");
    assert!(matches!(result, Err(TopicError::Protocol(_))));
}

#[test]
fn test_decode_missing_tag() {
    let result = decode_body(&[0x00, 0x83, 0x00, 0x00]);
    assert!(matches!(result, Err(TopicError::Protocol(_))));
}

#[test]
fn test_decode_invalid_utf8_is_lossy() {
    let frame = reply_frame(0x06, &[b'a', 0xFF, b'b']);
    assert_eq!(decode_body(&frame).unwrap().into_text(), "a\u{FFFD}b");
}

// =============================================================================
// Tag Ambiguity Tests
// =============================================================================

#[test]
fn test_value_tag_classifies_as_ascii() {
    assert_eq!(content_kind(0x06), Some(ContentKind::Ascii));
    assert_eq!(content_kind(0x00), None);
    assert_eq!(content_kind(0x2A), None);
}

#[test]
fn test_float_path_unreachable_through_tag() {
    // Float replies share tag 0x06; tag-driven decode always picks ASCII.
    // Revisit once the numeric tag is confirmed against protocol docs.
    let frame = reply_frame(0x06, &1.5f32.to_be_bytes());
    let body = decode_body(&frame).unwrap();
    assert_eq!(body.kind(), ContentKind::Ascii);
}

#[test]
fn test_float_path_by_caller_choice() {
    let frame = reply_frame(0x06, &1.5f32.to_be_bytes());
    let body = decode_body_as(&frame, ContentKind::Float).unwrap();

    assert_eq!(body, DecodedBody::Float(1.5));
    assert_eq!(body.kind(), ContentKind::Float);
    assert_eq!(body.into_text(), "1.5");
}

#[test]
fn test_float_formatting_shortest_round_trip() {
    for value in [0.1f32, 42.0, -3.25, 1e-7, 123456.79] {
        let frame = reply_frame(0x06, &value.to_be_bytes());
        let text = decode_body_as(&frame, ContentKind::Float).unwrap().into_text();
        assert_eq!(text.parse::<f32>().unwrap(), value);
        assert!(!text.contains('e'));
    }
    let frame = reply_frame(0x06, &42.0f32.to_be_bytes());
    assert_eq!(decode_body_as(&frame, ContentKind::Float).unwrap().into_text(), "42");
}

#[test]
fn test_float_path_short_body() {
    let frame = reply_frame(0x06, &[0x3F, 0xC0]);
    let result = decode_body_as(&frame, ContentKind::Float);
    assert!(matches!(result, Err(TopicError::Protocol(_))));
}

#[test]
fn test_forced_decode_still_checks_tag() {
    let frame = reply_frame(0x09, &1.5f32.to_be_bytes());
    let result = decode_body_as(&frame, ContentKind::Float);
    assert!(matches!(result, Err(TopicError::UnknownContentTag(0x09))));
}

#[test]
fn test_request_then_reply_recovers_value() {
    let request = encode_request("?status").unwrap();
    assert_eq!(decode_request(&request).unwrap(), "?status");

    let text = decode_body(&text_reply("players=3")).unwrap();
    assert_eq!(text.into_text(), "players=3");

    let float = decode_body_as(&reply_frame(0x06, &0.75f32.to_be_bytes()), ContentKind::Float);
    assert_eq!(float.unwrap(), DecodedBody::Float(0.75));
}

// =============================================================================
// Stream-based I/O Tests
// =============================================================================

/// Serves its bytes, then reports a read timeout instead of end of stream
struct StallingReader {
    data: Cursor<Vec<u8>>,
}

impl Read for StallingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::TimedOut, "stalled")),
            n => Ok(n),
        }
    }
}

#[test]
fn test_read_response_exact_size_keeps_last_byte() {
    let bytes = vec![0x00, 0x83, 0x00, 0x05, 0x06, b'h', b'e', b'l', b'l', b'o'];
    let frame = read_response(&mut Cursor::new(bytes.clone())).unwrap();

    assert_eq!(frame, bytes);
    assert_eq!(decode_body(&frame).unwrap().into_text(), "hello");
}

#[test]
fn test_read_response_size_counting_tag_at_eof() {
    // SIZE = tag + "hello" + NUL, one byte short of a full frame
    let bytes = vec![0x00, 0x83, 0x00, 0x07, 0x06, b'h', b'e', b'l', b'l', b'o', 0x00];
    let frame = read_response(&mut Cursor::new(bytes.clone())).unwrap();

    assert_eq!(frame, bytes);
    assert_eq!(decode_body(&frame).unwrap().into_text(), "hello");
}

#[test]
fn test_read_response_timeout_on_final_byte_ends_frame() {
    let bytes = vec![0x00, 0x83, 0x00, 0x07, 0x06, b'h', b'e', b'l', b'l', b'o', 0x00];
    let mut reader = StallingReader { data: Cursor::new(bytes) };

    let frame = read_response(&mut reader).unwrap();
    assert_eq!(decode_body(&frame).unwrap().into_text(), "hello");
}

#[test]
fn test_read_response_timeout_mid_body_is_error() {
    let bytes = vec![0x00, 0x83, 0x00, 0x07, 0x06, b'h', b'e'];
    let mut reader = StallingReader { data: Cursor::new(bytes) };

    match read_response(&mut reader) {
        Err(TopicError::Connection(e)) => assert_eq!(e.kind(), io::ErrorKind::TimedOut),
        other => panic!("Expected timeout, got {:?}", other),
    }
}

#[test]
fn test_write_request_matches_encoding() {
    let mut buf = Vec::new();
    let written = write_request(&mut buf, "?status").unwrap();

    assert_eq!(written, buf.len());
    assert_eq!(buf, encode_request("?status").unwrap().to_vec());
}

#[test]
fn test_read_response_stops_at_size() {
    let mut bytes = text_reply("hello");
    let frame_len = bytes.len();
    bytes.extend_from_slice(b"trailing garbage");

    let frame = read_response(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(frame.len(), frame_len);
    assert_eq!(decode_body(&frame).unwrap().into_text(), "hello");
}

#[test]
fn test_read_response_larger_than_1024_bytes() {
    let text = "k=".to_string() + &"v".repeat(4000);
    let frame = read_response(&mut Cursor::new(text_reply(&text))).unwrap();
    assert_eq!(decode_body(&frame).unwrap().into_text(), text);
}

#[test]
fn test_read_response_truncated_body_returned() {
    let bytes = vec![0x00, 0x83, 0x00, 0x0B, 0x06, b'h', b'e', b'l', b'l', b'o'];
    let frame = read_response(&mut Cursor::new(bytes.clone())).unwrap();
    assert_eq!(frame, bytes);
}

#[test]
fn test_read_response_rejects_foreign_peer() {
    let result = read_response(&mut Cursor::new(b"SSH-2.0-OpenSSH".to_vec()));
    assert!(matches!(result, Err(TopicError::Protocol(_))));
}

#[test]
fn test_read_response_short_header() {
    let result = read_response(&mut Cursor::new(vec![0x00, 0x83, 0x00]));
    assert!(matches!(result, Err(TopicError::Protocol(_))));
}

#[test]
fn test_read_response_empty_stream() {
    let result = read_response(&mut Cursor::new(Vec::new()));
    match result {
        Err(TopicError::Connection(e)) => {
            assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof)
        }
        other => panic!("Expected connection error, got {:?}", other),
    }
}
