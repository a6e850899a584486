//! Blocking channel wrappers.
//!
//! [`Socket`] wraps one duplex byte channel with timeout-bounded
//! line/binary reads, writes and end-of-data detection. The lower
//! level [`BsdSocketConnection`] exposes address-family and socket
//! option control that [`Socket`] deliberately does not.
//!
//! Each instance exclusively owns its channel handle; handles are
//! never shared or handed between owners, so no internal locking is
//! needed. The handle is released exactly once, either by an explicit
//! disconnect or when the owning value is dropped, and double-close is
//! a safe no-op.
mod socket;
mod error;

#[cfg(unix)]
mod bsd;

#[cfg(test)]
mod test;

pub use error::NetError;
pub use socket::{DEFAULT_TIMEOUT, ReadChunk, Socket};

#[cfg(unix)]
pub use bsd::{BsdSocketConnection, SocketDomain, SocketKind, SocketProtocol};

/// Timeout-bounded blocking I/O over one duplex byte channel.
///
/// All calls may block the calling thread up to the configured
/// timeout; the timeout is the only cancellation mechanism.
pub trait Stream {
    /// Read the next line-bounded chunk, at most `max_len` bytes.
    ///
    /// Clean end-of-data returns [`ReadChunk::NoData`], not an error.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Timeout`] when the armed deadline elapsed,
    /// [`NetError::ConnectionFailed`] on any other primitive failure.
    fn read(&mut self, max_len: usize) -> Result<ReadChunk, NetError>;

    /// Read up to `max_len` bytes without stopping at line
    /// boundaries. Failure semantics match [`Stream::read`].
    ///
    /// # Errors
    ///
    /// See [`Stream::read`].
    fn read_binary(&mut self, max_len: usize) -> Result<ReadChunk, NetError>;

    /// Write `data`, returning the number of bytes actually written.
    ///
    /// # Errors
    ///
    /// See [`Stream::read`].
    fn write(&mut self, data: &[u8]) -> Result<usize, NetError>;

    /// Returns `true` if the channel is disconnected or reports no
    /// more bytes.
    fn eof(&mut self) -> bool;

    /// Reconfigure the channel deadline; retained for subsequent
    /// operations.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::ConnectionFailed`] when the live channel
    /// rejects the new deadline.
    fn set_timeout(&mut self, seconds: u64, micros: u32) -> Result<(), NetError>;
}
