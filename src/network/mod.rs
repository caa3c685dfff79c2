//! Network Module
//!
//! TCP transport and the query client.
//!
//! ## Architecture
//! - One connection per query, dropped (closed) on every exit path
//! - Transport behind the `Connector` trait so tests can script replies
//! - Single read deadline covering the whole reply

mod connector;
mod client;

pub use connector::{Connector, DeadlineReader, Stream, TcpConnector};
pub use client::TopicClient;
