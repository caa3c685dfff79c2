//! # topic-client
//!
//! A client for the TOPIC binary query protocol spoken by multiplayer game
//! servers for small out-of-band status and admin queries:
//! - One TCP connection per query, closed on every exit path
//! - Fixed binary request frame, type-tagged reply frame
//! - `?status` convenience query mapped into a structured record
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TopicClient                             │
//! │            query(text) / status()                            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────────────┐
//!          │            │                     │
//!          ▼            ▼                     ▼
//!   ┌─────────────┐ ┌─────────────┐   ┌─────────────┐
//!   │  Connector  │ │ Frame Codec │   │   Status    │
//!   │ (TCP/mock)  │ │ (protocol)  │   │   Mapper    │
//!   └─────────────┘ └─────────────┘   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod status;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, TopicError};
pub use config::{ClientConfig, StatusParsePolicy};
pub use network::{Connector, Stream, TcpConnector, TopicClient};
pub use protocol::{ContentKind, DecodedBody};
pub use status::Status;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of topic-client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
