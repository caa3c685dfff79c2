//! Error types for the TOPIC client
//!
//! Provides a unified error type for all operations.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using TopicError
pub type Result<T> = std::result::Result<T, TopicError>;

/// Unified error type for TOPIC client operations
#[derive(Debug, Error)]
pub enum TopicError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("Read deadline of {0:?} elapsed before the reply was complete")]
    Timeout(Duration),

    // -------------------------------------------------------------------------
    // Frame Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unknown content tag: 0x{0:02x}")]
    UnknownContentTag(u8),

    // -------------------------------------------------------------------------
    // Status Errors
    // -------------------------------------------------------------------------
    #[error("Status parse error: {0}")]
    StatusParse(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TopicError {
    /// True for failures raised by the transport (dial, write, read, deadline)
    pub fn is_transport(&self) -> bool {
        matches!(self, TopicError::Connection(_) | TopicError::Timeout(_))
    }
}
