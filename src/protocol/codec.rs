//! Protocol codec
//!
//! Encoding and decoding functions for the TOPIC wire protocol.
//!
//! ## Wire Format
//!
//! ### Request
//! ```text
//! 00 83 | LEN (u16 BE) | 00 00 00 00 00 | PAYLOAD | 00
//! ```
//!
//! ### Response
//! ```text
//! 00 83 | SIZE (u16 BE) | TAG (u8) | BODY
//! ```
//!
//! SIZE is the body length, so a full frame is `5 + SIZE` bytes. Some servers
//! also count the tag byte in SIZE and NUL-terminate text, so the text slice
//! `[5 .. 5 + SIZE]` is clamped to the received bytes and trailing NULs are
//! dropped.

use std::io::{self, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, TopicError};
use super::{ContentKind, DecodedBody};

/// Fixed marker opening every frame in both directions
pub const MARKER: [u8; 2] = [0x00, 0x83];

/// Request header: marker (2) + length (2) + reserved (5)
pub const REQUEST_HEADER_SIZE: usize = 9;

/// Response header: marker (2) + size (2)
pub const RESPONSE_HEADER_SIZE: usize = 4;

/// Offset of the content tag in a response
pub const TAG_OFFSET: usize = 4;

/// Offset of the first body byte in a response
pub const BODY_OFFSET: usize = 5;

/// The "value follows" content tag
pub const TAG_VALUE: u8 = 0x06;

/// Reserved bytes (5) plus the terminating zero (1)
const LENGTH_OVERHEAD: usize = 6;
const RESERVED_LEN: usize = 5;

/// Largest payload whose length still fits the u16 length field
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize - LENGTH_OVERHEAD;

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a query into a request frame
///
/// The payload is sent verbatim; no escaping is applied.
pub fn encode_request(payload: &str) -> Result<Bytes> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(TopicError::Config(format!(
            "Query too large: {} bytes (max {})",
            payload.len(),
            MAX_PAYLOAD_SIZE
        )));
    }

    let mut frame = BytesMut::with_capacity(REQUEST_HEADER_SIZE + payload.len() + 1);
    frame.put_slice(&MARKER);
    frame.put_u16((payload.len() + LENGTH_OVERHEAD) as u16);
    frame.put_bytes(0x00, RESERVED_LEN);
    frame.put_slice(payload.as_bytes());
    frame.put_u8(0x00);

    Ok(frame.freeze())
}

/// Decode a request frame back into its query text
///
/// Server-side counterpart of `encode_request`, used by test peers.
pub fn decode_request(bytes: &[u8]) -> Result<String> {
    if !is_protocol_frame(bytes) {
        return Err(TopicError::Protocol(
            "Request is not a TOPIC frame".to_string(),
        ));
    }
    if bytes.len() < REQUEST_HEADER_SIZE + 1 {
        return Err(TopicError::Protocol(format!(
            "Incomplete request: expected at least {} bytes, got {}",
            REQUEST_HEADER_SIZE + 1,
            bytes.len()
        )));
    }

    let length = u16::from_be_bytes([bytes[2], bytes[3]]) as usize;
    let payload_len = length.checked_sub(LENGTH_OVERHEAD).ok_or_else(|| {
        TopicError::Protocol(format!("Request length field too small: {}", length))
    })?;

    let total_len = REQUEST_HEADER_SIZE + payload_len + 1;
    if bytes.len() < total_len {
        return Err(TopicError::Protocol(format!(
            "Incomplete request payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    let payload = &bytes[REQUEST_HEADER_SIZE..REQUEST_HEADER_SIZE + payload_len];
    String::from_utf8(payload.to_vec())
        .map_err(|e| TopicError::Protocol(format!("Request payload is not UTF-8: {}", e)))
}

// =============================================================================
// Response Inspection
// =============================================================================

/// True iff the buffer starts with the protocol marker
pub fn is_protocol_frame(response: &[u8]) -> bool {
    response.starts_with(&MARKER)
}

/// The big-endian SIZE field, if the header is present
pub fn body_size(response: &[u8]) -> Option<u16> {
    match response.get(2..RESPONSE_HEADER_SIZE) {
        Some(&[hi, lo]) => Some(u16::from_be_bytes([hi, lo])),
        _ => None,
    }
}

fn is_ascii_tag(tag: u8) -> bool {
    tag == TAG_VALUE
}

fn is_float_tag(tag: u8) -> bool {
    tag == TAG_VALUE
}

/// Classify a content tag
///
/// ASCII is tested first. The float test matches the same byte, so this never
/// yields `ContentKind::Float` until the tag assignment is settled.
pub fn content_kind(tag: u8) -> Option<ContentKind> {
    if is_ascii_tag(tag) {
        Some(ContentKind::Ascii)
    } else if is_float_tag(tag) {
        Some(ContentKind::Float)
    } else {
        None
    }
}

// =============================================================================
// Body Decoding
// =============================================================================

/// Decode the body of a response frame using its tag
pub fn decode_body(response: &[u8]) -> Result<DecodedBody> {
    let tag = checked_tag(response)?;
    match content_kind(tag) {
        Some(kind) => decode_kind(response, kind),
        None => Err(TopicError::UnknownContentTag(tag)),
    }
}

/// Decode the body of a response frame as a caller-chosen kind
///
/// The tag must still be a recognized one.
pub fn decode_body_as(response: &[u8], kind: ContentKind) -> Result<DecodedBody> {
    let tag = checked_tag(response)?;
    if content_kind(tag).is_none() {
        return Err(TopicError::UnknownContentTag(tag));
    }
    decode_kind(response, kind)
}

fn checked_tag(response: &[u8]) -> Result<u8> {
    if !is_protocol_frame(response) {
        return Err(TopicError::Protocol(
            "Response is not a TOPIC frame".to_string(),
        ));
    }
    response.get(TAG_OFFSET).copied().ok_or_else(|| {
        TopicError::Protocol(format!(
            "Incomplete response header: expected at least {} bytes, got {}",
            BODY_OFFSET,
            response.len()
        ))
    })
}

fn decode_kind(response: &[u8], kind: ContentKind) -> Result<DecodedBody> {
    match kind {
        ContentKind::Ascii => Ok(DecodedBody::Ascii(decode_ascii(response))),
        ContentKind::Float => decode_float(response).map(DecodedBody::Float),
    }
}

fn decode_ascii(response: &[u8]) -> String {
    let size = body_size(response).unwrap_or(0) as usize;
    let end = (BODY_OFFSET + size).min(response.len());
    let mut body = &response[BODY_OFFSET..end];

    while let [rest @ .., 0x00] = body {
        body = rest;
    }

    String::from_utf8_lossy(body).into_owned()
}

fn decode_float(response: &[u8]) -> Result<f32> {
    match response.get(BODY_OFFSET..BODY_OFFSET + 4) {
        Some(&[a, b, c, d]) => Ok(f32::from_be_bytes([a, b, c, d])),
        _ => Err(TopicError::Protocol(format!(
            "Float body needs 4 bytes, got {}",
            response.len().saturating_sub(BODY_OFFSET)
        ))),
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a request frame for `payload` to a stream
///
/// Returns the number of bytes written.
pub fn write_request<W: Write>(writer: &mut W, payload: &str) -> Result<usize> {
    let frame = encode_request(payload)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(frame.len())
}

/// Read a complete response frame from a stream
///
/// Reads the 4-byte header, rejects non-protocol peers straight away, then
/// reads the tag and SIZE body bytes. A peer that closes early yields the
/// bytes received so far. Servers that count the tag byte in SIZE send one
/// byte less than this; a read timeout on that last byte ends the frame.
pub fn read_response<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; RESPONSE_HEADER_SIZE];
    let got = read_up_to(reader, &mut header)?;

    if got == 0 {
        return Err(TopicError::Connection(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "peer closed the connection without replying",
        )));
    }
    if got < MARKER.len() || !is_protocol_frame(&header[..got]) {
        return Err(TopicError::Protocol(
            "Response is not a TOPIC frame".to_string(),
        ));
    }
    if got < RESPONSE_HEADER_SIZE {
        return Err(TopicError::Protocol(format!(
            "Incomplete response header: expected {} bytes, got {}",
            RESPONSE_HEADER_SIZE, got
        )));
    }

    let size = u16::from_be_bytes([header[2], header[3]]) as usize;
    let frame_len = BODY_OFFSET + size;

    let mut frame = Vec::with_capacity(frame_len);
    frame.extend_from_slice(&header);
    frame.resize(frame_len, 0);

    let last = frame_len - 1;
    let mut filled = RESPONSE_HEADER_SIZE + read_up_to(reader, &mut frame[RESPONSE_HEADER_SIZE..last])?;
    if filled == last {
        filled += read_final_byte(reader, &mut frame[last..])?;
    }
    frame.truncate(filled);

    Ok(frame)
}

/// Read the last frame byte, treating a read timeout as end of frame
fn read_final_byte<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                tracing::debug!("No byte after SIZE-1 body bytes; ending frame");
                return Ok(0);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Fill `buf` until it is full or the reader reports end of stream
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
