//! Protocol Module
//!
//! Frame codec for the TOPIC wire protocol. Pure functions, no I/O state.
//!
//! ## Protocol Format
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬──────────────┬─────────────┬──────┐
//! │ 00 83    │ Len (2)  │ Reserved (5) │   Payload   │  00  │
//! └──────────┴──────────┴──────────────┴─────────────┴──────┘
//! ```
//! `Len` is big-endian and equals `payload.len() + 6`.
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────┬─────────────────────────┐
//! │ 00 83    │ Size (2) │ Tag (1) │          Body           │
//! └──────────┴──────────┴─────────┴─────────────────────────┘
//! ```
//!
//! ### Content Tags
//! - 0x06: value follows (ASCII text; float shares the tag, see [`ContentKind`])

mod response;
mod codec;

pub use response::{ContentKind, DecodedBody};
pub use codec::{
    encode_request, decode_request, is_protocol_frame, body_size, content_kind,
    decode_body, decode_body_as, read_response, write_request,
    MARKER, REQUEST_HEADER_SIZE, RESPONSE_HEADER_SIZE, TAG_OFFSET, BODY_OFFSET,
    TAG_VALUE, MAX_PAYLOAD_SIZE,
};
