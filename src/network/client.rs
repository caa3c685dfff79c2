//! Topic Client
//!
//! Issues queries over one short-lived connection each.

use std::io::{self, Write};
use std::time::Duration;

use crate::config::{ClientConfig, StatusParsePolicy};
use crate::error::{Result, TopicError};
use crate::protocol::{decode_body, encode_request, read_response, DecodedBody};
use crate::status::{parse_query, validate_query, Status, STATUS_QUERY};
use super::connector::{Connector, DeadlineReader, TcpConnector};

/// Client for a single TOPIC server
///
/// Holds only immutable settings, so one value can be shared across threads;
/// every call dials its own connection.
#[derive(Debug, Clone)]
pub struct TopicClient<C: Connector = TcpConnector> {
    /// Validated client configuration
    config: ClientConfig,

    /// Transport used to open a connection per call
    connector: C,
}

impl TopicClient<TcpConnector> {
    /// Create a TCP client for `address` (host:port) with a read timeout
    ///
    /// No network activity happens here.
    pub fn new(address: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        let config = ClientConfig::builder()
            .address(address)
            .read_timeout_ms(timeout_ms)
            .build();
        Self::from_config(config)
    }

    /// Create a TCP client from a full configuration
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::with_connector(config, TcpConnector)
    }
}

impl<C: Connector> TopicClient<C> {
    /// Create a client over a custom transport
    pub fn with_connector(config: ClientConfig, connector: C) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, connector })
    }

    /// Server address
    pub fn address(&self) -> &str {
        &self.config.address
    }

    /// Read deadline applied to each call
    pub fn timeout(&self) -> Duration {
        self.config.read_timeout()
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a query and return the reply body as text
    pub fn query(&self, text: &str) -> Result<String> {
        self.query_body(text).map(DecodedBody::into_text)
    }

    /// Send a query and return the typed reply body
    pub fn query_body(&self, text: &str) -> Result<DecodedBody> {
        let frame = self.exchange(text)?;
        let body = decode_body(&frame)?;
        tracing::trace!("Decoded {:?} body from {}", body.kind(), self.config.address);
        Ok(body)
    }

    /// Send a query and return the raw reply frame
    ///
    /// The frame has passed the marker check; the body is not decoded.
    pub fn exchange(&self, text: &str) -> Result<Vec<u8>> {
        let request = encode_request(text)?;

        let mut stream = self
            .connector
            .connect(&self.config.address, self.config.connect_timeout())?;
        tracing::debug!("Connected to {}", self.config.address);

        stream.write_all(&request)?;
        stream.flush()?;
        tracing::debug!("Sent {} byte query to {}", request.len(), self.config.address);

        let timeout = self.config.read_timeout();
        let mut reader = DeadlineReader::new(&mut stream, timeout);
        let frame = read_response(&mut reader).map_err(|e| match e {
            TopicError::Connection(io_err) if is_timeout(&io_err) => TopicError::Timeout(timeout),
            other => other,
        })?;
        tracing::debug!("Received {} byte reply from {}", frame.len(), self.config.address);

        Ok(frame)
    }

    /// Query `?status` and map the reply into a Status record
    ///
    /// Malformed key/value text is handled per `StatusParsePolicy`.
    pub fn status(&self) -> Result<Status> {
        let reply = self.query(STATUS_QUERY)?;

        if let Err(e) = validate_query(&reply) {
            match self.config.status_policy {
                StatusParsePolicy::Strict => return Err(e),
                StatusParsePolicy::BestEffort => {
                    tracing::warn!("Malformed status from {}: {}", self.config.address, e);
                }
            }
        }

        Ok(Status::from_query(&parse_query(&reply)))
    }
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}
