//! Status Module
//!
//! Maps the reply to a `?status` query into a fixed-shape record.
//!
//! ## Flow
//! ```text
//! "version=515&players=12&..."  ──parse_query──▶  key → [values]
//!                                                   │
//!                                        Status::from_query
//!                                                   ▼
//!                                                Status
//! ```

mod record;
mod query;

pub use record::{Status, STATUS_KEYS};
pub use query::{parse_query, validate_query, QueryValues};

/// The well-known status query
pub const STATUS_QUERY: &str = "?status";

/// Map key/value text into a Status record
///
/// Never fails. Unknown keys are ignored and missing keys stay empty.
pub fn parse_status(text: &str) -> Status {
    Status::from_query(&parse_query(text))
}
