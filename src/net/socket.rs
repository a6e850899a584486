use std::{
    io::{self, Read, Write},
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    time::Duration,
};

use bytes::{Bytes, BytesMut};

use super::{NetError, Stream};
use crate::log::{debug, warning};

/// Default channel deadline when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const FILL: usize = 8 * 1024;

/// Result of one read call.
///
/// End-of-data is an explicit value, not an error: once the peer
/// half-closes and all buffered bytes are consumed, reads return
/// [`ReadChunk::NoData`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadChunk {
    /// Next available chunk.
    Data(Bytes),
    /// The channel reports no more data.
    NoData,
}

impl ReadChunk {
    /// Returns the chunk bytes, [`None`] for end-of-data.
    #[inline]
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            ReadChunk::Data(bytes) => Some(bytes),
            ReadChunk::NoData => None,
        }
    }

    /// Returns `true` for the end-of-data value.
    #[inline]
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, ReadChunk::NoData)
    }
}

#[derive(Debug)]
struct Inner {
    stream: TcpStream,
    buffer: BytesMut,
    /// The channel reported a clean end-of-data.
    eof: bool,
}

/// Blocking TCP channel with a read/write deadline.
///
/// Constructed in a disconnected state with the peer known, or already
/// bound to an existing handle via [`Socket::from_stream`]. The handle
/// is owned exclusively and released exactly once, by
/// [`Socket::disconnect`] or on drop; a second disconnect is a no-op.
///
/// # Examples
///
/// ```no_run
/// use peerline::Socket;
///
/// let mut socket = Socket::new("example.com", 80);
/// socket.connect()?;
/// socket.write(b"GET / HTTP/1.0\r\nHost: example.com\r\n\r\n")?;
/// let _status = socket.read(1024)?;
/// # Ok::<_, peerline::net::NetError>(())
/// ```
#[derive(Debug)]
pub struct Socket {
    host: String,
    port: u16,
    timeout: Duration,
    inner: Option<Inner>,
}

impl Socket {
    /// Create a disconnected socket with the default deadline.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_timeout(host, port, DEFAULT_TIMEOUT)
    }

    /// Create a disconnected socket with an explicit deadline.
    pub fn with_timeout(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
            inner: None,
        }
    }

    /// Adopt an already connected handle, arming the default deadline.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] when the handle rejects the deadline.
    pub fn from_stream(stream: TcpStream) -> Result<Self, NetError> {
        let (host, port) = match stream.peer_addr() {
            Ok(SocketAddr::V4(addr)) => (addr.ip().to_string(), addr.port()),
            Ok(SocketAddr::V6(addr)) => (format!("[{}]", addr.ip()), addr.port()),
            Err(_) => (String::new(), 0),
        };
        let mut socket = Self {
            host,
            port,
            timeout: DEFAULT_TIMEOUT,
            inner: Some(Inner {
                stream,
                buffer: BytesMut::new(),
                eof: false,
            }),
        };
        socket.arm()?;
        Ok(socket)
    }

    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// The armed deadline.
    #[inline]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `true` while a live handle is owned.
    #[inline]
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.inner.is_some()
    }

    // ===== Lifecycle =====

    /// Establish the channel and arm the deadline.
    ///
    /// A no-op returning success when already connected.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::ConnectionFailed`] carrying host, port and
    /// the deadline used, on resolution or connect failure.
    pub fn connect(&mut self) -> Result<(), NetError> {
        if self.inner.is_some() {
            return Ok(());
        }

        let addr = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|err| self.failed(err))?
            .next()
            .ok_or_else(|| self.failed("host not found"))?;

        debug!("connecting to {}:{}", self.host, self.port);
        let stream = match self.timeout.is_zero() {
            false => TcpStream::connect_timeout(&addr, self.timeout),
            true => TcpStream::connect(&addr),
        }
        .map_err(|err| self.failed(err))?;

        self.inner = Some(Inner {
            stream,
            buffer: BytesMut::new(),
            eof: false,
        });
        self.arm()?;
        debug!("connected to {}:{}", self.host, self.port);
        Ok(())
    }

    /// Release the channel handle. A no-op when already disconnected.
    pub fn disconnect(&mut self) {
        if self.inner.take().is_some() {
            debug!("disconnected from {}:{}", self.host, self.port);
        }
    }

    /// Reconfigure the deadline; applied to the live channel and
    /// retained for later connects.
    ///
    /// A zero duration disarms the deadline entirely.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::ConnectionFailed`] when the live channel
    /// rejects the new deadline.
    pub fn set_timeout(&mut self, seconds: u64, micros: u32) -> Result<(), NetError> {
        self.timeout = Duration::from_secs(seconds) + Duration::from_micros(micros.into());
        if self.inner.is_some() {
            self.arm()?;
        }
        Ok(())
    }

    // ===== I/O =====

    /// Read the next line-bounded chunk, at most `max_len` bytes.
    ///
    /// The chunk ends at the first line feed, at `max_len` bytes, or
    /// at end-of-data, whichever comes first. Clean end-of-data with
    /// nothing buffered returns [`ReadChunk::NoData`].
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Timeout`] when the deadline elapsed,
    /// [`NetError::ConnectionFailed`] on any other primitive failure.
    pub fn read(&mut self, max_len: usize) -> Result<ReadChunk, NetError> {
        self.fill(max_len, true)
    }

    /// Read up to `max_len` bytes without stopping at line boundaries.
    ///
    /// # Errors
    ///
    /// See [`Socket::read`].
    pub fn read_binary(&mut self, max_len: usize) -> Result<ReadChunk, NetError> {
        self.fill(max_len, false)
    }

    /// Write `data`, returning the number of bytes actually written.
    ///
    /// # Errors
    ///
    /// See [`Socket::read`].
    pub fn write(&mut self, data: &[u8]) -> Result<usize, NetError> {
        let Some(inner) = self.inner.as_mut() else {
            return Err(self.failed("not connected"));
        };
        match inner.stream.write(data) {
            Ok(written) => Ok(written),
            Err(err) if is_deadline(&err) => Err(NetError::Timeout {
                length: data.len(),
                after: self.timeout,
            }),
            Err(err) => Err(failed(&self.host, self.port, self.timeout, err)),
        }
    }

    /// Returns `true` if disconnected or the channel has no more
    /// bytes. Buffered data counts as available.
    pub fn eof(&mut self) -> bool {
        let Some(inner) = self.inner.as_mut() else {
            return true;
        };
        if !inner.buffer.is_empty() {
            return false;
        }
        if inner.eof {
            return true;
        }
        inner.probe_eof()
    }

    // ===== Internals =====

    /// Arm the deadline on the live handle. Zero disarms.
    fn arm(&mut self) -> Result<(), NetError> {
        let timeout = (!self.timeout.is_zero()).then_some(self.timeout);
        let Some(inner) = self.inner.as_ref() else {
            return Ok(());
        };
        inner
            .stream
            .set_read_timeout(timeout)
            .and_then(|()| inner.stream.set_write_timeout(timeout))
            .map_err(|err| failed(&self.host, self.port, self.timeout, err))
    }

    /// Shared read loop for line-bounded and binary reads.
    ///
    /// A primitive failure that is not attributable to the deadline is
    /// mapped to `NoData` when the channel had already reported
    /// end-of-data, `ConnectionFailed` otherwise. The secondary
    /// end-of-data check happens after the failed call and is a
    /// timing-sensitive heuristic, not a guaranteed signal.
    fn fill(&mut self, max_len: usize, line_bounded: bool) -> Result<ReadChunk, NetError> {
        if max_len == 0 {
            return Ok(ReadChunk::Data(Bytes::new()));
        }
        let Some(inner) = self.inner.as_mut() else {
            return Err(failed(&self.host, self.port, self.timeout, "not connected"));
        };

        let mut chunk = [0u8; FILL];
        loop {
            if let Some(bytes) = inner.take(max_len, line_bounded) {
                return Ok(ReadChunk::Data(bytes));
            }
            if inner.eof {
                return Ok(ReadChunk::NoData);
            }

            match inner.stream.read(&mut chunk) {
                Ok(0) => inner.eof = true,
                Ok(n) => inner.buffer.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) if is_deadline(&err) => {
                    return Err(NetError::Timeout {
                        length: max_len,
                        after: self.timeout,
                    });
                }
                // secondary end-of-data probe after the failed call,
                // see the method doc
                Err(_) if inner.probe_eof() => {
                    debug!("read failed at end-of-data");
                    return Ok(ReadChunk::NoData);
                }
                Err(err) => {
                    return Err(failed(&self.host, self.port, self.timeout, err));
                }
            }
        }
    }

    fn failed(&self, reason: impl std::fmt::Display) -> NetError {
        failed(&self.host, self.port, self.timeout, reason)
    }
}

impl Inner {
    /// Take the next complete chunk out of the buffer, if one is
    /// ready.
    fn take(&mut self, max_len: usize, line_bounded: bool) -> Option<Bytes> {
        if line_bounded {
            let window = max_len.min(self.buffer.len());
            if let Some(at) = self.buffer[..window].iter().position(|b| *b == b'\n') {
                return Some(self.buffer.split_to(at + 1).freeze());
            }
            if self.buffer.len() >= max_len {
                return Some(self.buffer.split_to(max_len).freeze());
            }
            if self.eof && !self.buffer.is_empty() {
                let len = self.buffer.len();
                return Some(self.buffer.split_to(len).freeze());
            }
            None
        } else if !self.buffer.is_empty() {
            let len = self.buffer.len().min(max_len);
            Some(self.buffer.split_to(len).freeze())
        } else {
            None
        }
    }

    /// Peek one byte without blocking to learn whether the peer
    /// half-closed. Inconclusive probes report "more data may come".
    fn probe_eof(&mut self) -> bool {
        if self.stream.set_nonblocking(true).is_err() {
            return false;
        }
        let mut byte = [0u8; 1];
        let probe = self.stream.peek(&mut byte);
        if self.stream.set_nonblocking(false).is_err() {
            warning!("failed to restore blocking mode after probe");
        }
        match probe {
            Ok(0) => {
                self.eof = true;
                true
            }
            _ => false,
        }
    }
}

impl Stream for Socket {
    #[inline]
    fn read(&mut self, max_len: usize) -> Result<ReadChunk, NetError> {
        Socket::read(self, max_len)
    }

    #[inline]
    fn read_binary(&mut self, max_len: usize) -> Result<ReadChunk, NetError> {
        Socket::read_binary(self, max_len)
    }

    #[inline]
    fn write(&mut self, data: &[u8]) -> Result<usize, NetError> {
        Socket::write(self, data)
    }

    #[inline]
    fn eof(&mut self) -> bool {
        Socket::eof(self)
    }

    #[inline]
    fn set_timeout(&mut self, seconds: u64, micros: u32) -> Result<(), NetError> {
        Socket::set_timeout(self, seconds, micros)
    }
}

fn failed(host: &str, port: u16, timeout: Duration, reason: impl std::fmt::Display) -> NetError {
    NetError::ConnectionFailed {
        host: host.to_owned(),
        port: Some(port),
        timeout: Some(timeout),
        reason: reason.to_string(),
    }
}

/// Returns `true` when the error is attributable to the armed
/// deadline.
fn is_deadline(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut,
    )
}
