use std::time::Duration;

/// A possible error value from channel operations.
///
/// End-of-data is not represented here: reads signal it through
/// [`ReadChunk::NoData`](super::ReadChunk) instead of an error. The
/// peer layer never retries; every failure propagates to the caller,
/// with [`NetError::Timeout`] split out so callers can choose to retry
/// with a longer deadline.
#[derive(Clone, PartialEq, Eq)]
pub enum NetError {
    /// Handle creation, connect, read, write or option application
    /// failed for a non-timeout reason.
    ConnectionFailed {
        host: String,
        port: Option<u16>,
        /// Deadline that was armed, when the operation had one.
        timeout: Option<Duration>,
        reason: String,
    },
    /// The operation failed because the configured deadline elapsed.
    Timeout {
        /// Requested transfer length.
        length: usize,
        /// The armed deadline.
        after: Duration,
    },
}

impl NetError {
    /// Returns `true` for the timeout variant.
    #[inline]
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, NetError::Timeout { .. })
    }
}

// ===== Error =====

impl std::fmt::Display for NetError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            NetError::ConnectionFailed { host, port, timeout, reason } => {
                write!(f, "connection to {host}")?;
                if let Some(port) = port {
                    write!(f, ":{port}")?;
                }
                write!(f, " failed: {reason}")?;
                if let Some(timeout) = timeout {
                    write!(f, " (timeout {}s)", timeout.as_secs_f64())?;
                }
                Ok(())
            }
            NetError::Timeout { length, after } => {
                write!(
                    f,
                    "transfer of {length} bytes timed out after {}s",
                    after.as_secs_f64(),
                )
            }
        }
    }
}

impl std::error::Error for NetError {}

impl std::fmt::Debug for NetError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}
