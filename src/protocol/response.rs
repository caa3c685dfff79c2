//! Response body definitions
//!
//! Represents the typed body of a decoded reply frame.

use std::fmt;

/// How a reply body is interpreted
///
/// Both kinds are announced by the same tag byte (0x06). Tag classification
/// tries ASCII first, so `Float` is only produced when a caller asks for it
/// through `decode_body_as`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Ascii,
    Float,
}

/// A decoded reply body
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    /// Text body, trailing NUL terminators removed
    Ascii(String),

    /// Big-endian IEEE-754 single precision value
    Float(f32),
}

impl DecodedBody {
    /// Which decode path produced this body
    pub fn kind(&self) -> ContentKind {
        match self {
            DecodedBody::Ascii(_) => ContentKind::Ascii,
            DecodedBody::Float(_) => ContentKind::Float,
        }
    }

    /// The text form returned to query callers
    pub fn into_text(self) -> String {
        match self {
            DecodedBody::Ascii(text) => text,
            other => other.to_string(),
        }
    }
}

impl fmt::Display for DecodedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedBody::Ascii(text) => f.write_str(text),
            // f32 Display is the shortest text that round-trips
            DecodedBody::Float(value) => write!(f, "{}", value),
        }
    }
}
