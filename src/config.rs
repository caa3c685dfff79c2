//! Configuration for the TOPIC client
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TopicError};

/// Main configuration for a TopicClient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server address (host:port)
    pub address: String,

    /// Read deadline per query (milliseconds), measured from the first read
    pub read_timeout_ms: u64,

    /// Dial timeout (milliseconds). `None` dials without a deadline.
    pub connect_timeout_ms: Option<u64>,

    // -------------------------------------------------------------------------
    // Status Configuration
    // -------------------------------------------------------------------------
    /// What to do when a `?status` reply is not a well-formed query string
    pub status_policy: StatusParsePolicy,
}

/// Handling of malformed key/value text in status replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusParsePolicy {
    /// Log the problem and map whatever pairs could be read
    #[default]
    BestEffort,

    /// Fail the call with `TopicError::StatusParse`
    Strict,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:1337".to_string(),
            read_timeout_ms: 5000,
            connect_timeout_ms: None,
            status_policy: StatusParsePolicy::BestEffort,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Read deadline as a Duration
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Dial timeout as a Duration, if one is configured
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    /// Check the preconditions a client relies on
    pub fn validate(&self) -> Result<()> {
        validate_address(&self.address)?;

        if self.read_timeout_ms == 0 {
            return Err(TopicError::Config(
                "read timeout must be greater than zero".to_string(),
            ));
        }
        if self.connect_timeout_ms == Some(0) {
            return Err(TopicError::Config(
                "connect timeout must be greater than zero when set".to_string(),
            ));
        }

        Ok(())
    }
}

/// Check that an address has the `host:port` shape
///
/// Bracketed IPv6 hosts (`[::1]:1337`) are accepted.
pub fn validate_address(address: &str) -> Result<()> {
    let (host, port) = address.rsplit_once(':').ok_or_else(|| {
        TopicError::Config(format!("address '{}' is missing a port", address))
    })?;

    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(TopicError::Config(format!(
            "address '{}' has an invalid host",
            address
        )));
    }

    port.parse::<u16>().map_err(|_| {
        TopicError::Config(format!("address '{}' has an invalid port '{}'", address, port))
    })?;

    Ok(())
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ConfigBuilder {
    config: ClientConfig,
}

impl ConfigBuilder {
    /// Set the server address (host:port)
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = address.into();
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the dial timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = Some(ms);
        self
    }

    /// Set the status parse policy
    pub fn status_policy(mut self, policy: StatusParsePolicy) -> Self {
        self.config.status_policy = policy;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
