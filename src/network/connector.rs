//! Byte-stream connector
//!
//! The transport seam of the client: dial, write, deadline-bounded read, close.
//! Closing is `Drop`.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

/// A connected, bidirectional byte stream
pub trait Stream: Read + Write {
    /// Bound the next read calls; `None` blocks indefinitely
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()>;
}

/// Opens streams to an address
pub trait Connector {
    type Stream: Stream;

    /// Dial `address` (host:port), optionally bounded by `timeout`
    fn connect(&self, address: &str, timeout: Option<Duration>) -> io::Result<Self::Stream>;
}

impl Stream for TcpStream {
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }
}

/// Plain TCP connector
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&self, address: &str, timeout: Option<Duration>) -> io::Result<TcpStream> {
        let stream = match timeout {
            None => TcpStream::connect(address)?,
            Some(timeout) => connect_with_timeout(address, timeout)?,
        };

        // Disable Nagle's algorithm; each query is a single small write
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

/// Try every resolved address in turn, returning the last failure
fn connect_with_timeout(address: &str, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in address.to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Dial {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("could not resolve {}", address),
        )
    }))
}

/// Reads from a stream under one absolute deadline
///
/// Every read re-arms the socket timeout with the time left, so a reply split
/// across many segments still has to finish by the deadline.
pub struct DeadlineReader<'a, S: Stream> {
    stream: &'a mut S,
    deadline: Instant,
}

impl<'a, S: Stream> DeadlineReader<'a, S> {
    /// Start the deadline now
    pub fn new(stream: &'a mut S, timeout: Duration) -> Self {
        Self {
            stream,
            deadline: Instant::now() + timeout,
        }
    }

    /// Time left before the deadline
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

impl<S: Stream> Read for DeadlineReader<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        if remaining.is_zero() {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "read deadline elapsed",
            ));
        }

        self.stream.set_read_timeout(Some(remaining))?;
        match self.stream.read(buf) {
            // Unix reports an expired socket timeout as WouldBlock
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                e.to_string(),
            )),
            other => other,
        }
    }
}
