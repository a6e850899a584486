use std::{
    collections::BTreeMap,
    io,
    net::ToSocketAddrs,
    os::fd::AsRawFd,
};

use socket2::{Domain, Protocol, SockAddr, Socket as RawSocket, Type};

use super::NetError;
use crate::log::debug;

/// Address family of a [`BsdSocketConnection`].
///
/// Each variant carries its own connect strategy and knows whether a
/// port is mandatory for the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketDomain {
    /// IPv4.
    Inet,
    /// IPv6.
    Inet6,
    /// Local (unix) socket; the target is a filesystem path.
    Unix,
}

impl SocketDomain {
    /// Returns `true` when the family cannot connect without a port.
    #[inline]
    #[must_use]
    pub const fn requires_port(&self) -> bool {
        matches!(self, SocketDomain::Inet | SocketDomain::Inet6)
    }

    /// Family-specific connect call.
    fn connect(&self, socket: &RawSocket, target: &str, port: Option<u16>) -> io::Result<()> {
        match self {
            SocketDomain::Inet => socket.connect(&resolve(target, port, false)?),
            SocketDomain::Inet6 => socket.connect(&resolve(target, port, true)?),
            SocketDomain::Unix => socket.connect(&SockAddr::unix(target)?),
        }
    }
}

impl From<SocketDomain> for Domain {
    fn from(domain: SocketDomain) -> Self {
        match domain {
            SocketDomain::Inet => Domain::IPV4,
            SocketDomain::Inet6 => Domain::IPV6,
            SocketDomain::Unix => Domain::UNIX,
        }
    }
}

/// Resolve `target` to the first address of the requested family.
fn resolve(target: &str, port: Option<u16>, want_v6: bool) -> io::Result<SockAddr> {
    // the caller validates port presence for inet families
    let port = port.unwrap_or(0);
    let addr = (target, port)
        .to_socket_addrs()?
        .find(|addr| addr.is_ipv6() == want_v6)
        .ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no address for the requested family")
        })?;
    Ok(addr.into())
}

/// Communication style of the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketKind {
    Stream,
    Datagram,
    Raw,
    SeqPacket,
    #[cfg(any(target_os = "linux", target_os = "android"))]
    ReliableDatagram,
}

impl From<SocketKind> for Type {
    fn from(kind: SocketKind) -> Self {
        match kind {
            SocketKind::Stream => Type::STREAM,
            SocketKind::Datagram => Type::DGRAM,
            SocketKind::Raw => Type::RAW,
            SocketKind::SeqPacket => Type::SEQPACKET,
            #[cfg(any(target_os = "linux", target_os = "android"))]
            SocketKind::ReliableDatagram => Type::from(libc::SOCK_RDM),
        }
    }
}

/// Wire protocol of the handle. Local sockets take none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketProtocol {
    Tcp,
    Udp,
}

impl From<SocketProtocol> for Protocol {
    fn from(protocol: SocketProtocol) -> Self {
        match protocol {
            SocketProtocol::Tcp => Protocol::TCP,
            SocketProtocol::Udp => Protocol::UDP,
        }
    }
}

/// Low-level connection with address-family and socket-option control.
///
/// Options are numeric `(level, name)` pairs from the platform socket
/// option namespace, passed through unchanged. Options set before the
/// handle exists are queued and applied in `(level, name)` order right
/// after creation; options set on a live handle apply immediately.
/// Either way the value is cached for later retrieval.
///
/// The handle is owned exclusively and released exactly once, by
/// [`BsdSocketConnection::close`] or on drop; a second close is a
/// no-op.
#[derive(Debug)]
pub struct BsdSocketConnection {
    domain: SocketDomain,
    kind: SocketKind,
    protocol: Option<SocketProtocol>,
    socket: Option<RawSocket>,
    options: BTreeMap<(i32, i32), i32>,
}

impl BsdSocketConnection {
    /// Create an unconnected handle description.
    pub fn new(domain: SocketDomain, kind: SocketKind, protocol: Option<SocketProtocol>) -> Self {
        Self {
            domain,
            kind,
            protocol,
            socket: None,
            options: BTreeMap::new(),
        }
    }

    #[inline]
    pub const fn domain(&self) -> SocketDomain {
        self.domain
    }

    /// Returns `true` while a live handle is owned.
    #[inline]
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Borrow the live handle, if any.
    #[inline]
    pub fn as_socket(&self) -> Option<&RawSocket> {
        self.socket.as_ref()
    }

    /// Set a `(level, name)` option.
    ///
    /// Applied immediately when the handle is live, queued for the
    /// next [`connect`](Self::connect) otherwise. The value is cached
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::ConnectionFailed`] when a live handle
    /// rejects the option.
    pub fn set_option(&mut self, level: i32, name: i32, value: i32) -> Result<(), NetError> {
        if let Some(socket) = self.socket.as_ref() {
            apply(socket, level, name, value).map_err(|err| self.failed(None, None, err))?;
        }
        self.options.insert((level, name), value);
        Ok(())
    }

    /// Read back a `(level, name)` option.
    ///
    /// Cached values win; otherwise a live handle is queried directly.
    pub fn option(&self, level: i32, name: i32) -> Option<i32> {
        if let Some(value) = self.options.get(&(level, name)) {
            return Some(*value);
        }
        let socket = self.socket.as_ref()?;
        fetch(socket, level, name).ok()
    }

    /// Create the handle, apply queued options and connect.
    ///
    /// For inet families `target` is a hostname or address literal and
    /// a port is mandatory; for the local family `target` is a
    /// filesystem path and the port must be [`None`]. A no-op
    /// returning success when already connected.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::ConnectionFailed`] carrying the lower-level
    /// error code and description when handle creation, option
    /// application or the connect call fails.
    pub fn connect(&mut self, target: &str, port: Option<u16>) -> Result<(), NetError> {
        if self.socket.is_some() {
            return Ok(());
        }
        if self.domain.requires_port() && port.is_none() {
            return Err(NetError::ConnectionFailed {
                host: target.to_owned(),
                port: None,
                timeout: None,
                reason: "a port is required for this socket domain".to_owned(),
            });
        }

        let socket = RawSocket::new(
            self.domain.into(),
            self.kind.into(),
            self.protocol.map(Into::into),
        )
        .map_err(|err| self.failed(Some(target), port, err))?;

        // queued options, in (level, name) order
        for (&(level, name), &value) in &self.options {
            apply(&socket, level, name, value)
                .map_err(|err| self.failed(Some(target), port, err))?;
        }

        debug!("connecting {:?} socket to {target}", self.domain);
        self.domain
            .connect(&socket, target, port)
            .map_err(|err| self.failed(Some(target), port, err))?;

        self.socket = Some(socket);
        Ok(())
    }

    /// Release the handle. A no-op when already closed.
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            debug!("closed {:?} socket", self.domain);
        }
    }

    fn failed(&self, target: Option<&str>, port: Option<u16>, err: io::Error) -> NetError {
        let reason = match err.raw_os_error() {
            Some(code) => format!("{code}: {err}"),
            None => err.to_string(),
        };
        NetError::ConnectionFailed {
            host: target.unwrap_or_default().to_owned(),
            port,
            timeout: None,
            reason,
        }
    }
}

// ===== Raw option calls =====

fn apply(socket: &RawSocket, level: i32, name: i32, value: i32) -> io::Result<()> {
    let ret = unsafe {
        libc::setsockopt(
            socket.as_raw_fd(),
            level,
            name,
            (&value as *const i32).cast(),
            size_of::<i32>() as libc::socklen_t,
        )
    };
    match ret {
        0 => Ok(()),
        _ => Err(io::Error::last_os_error()),
    }
}

fn fetch(socket: &RawSocket, level: i32, name: i32) -> io::Result<i32> {
    let mut value: i32 = 0;
    let mut len = size_of::<i32>() as libc::socklen_t;
    let ret = unsafe {
        libc::getsockopt(
            socket.as_raw_fd(),
            level,
            name,
            (&mut value as *mut i32).cast(),
            &mut len,
        )
    };
    match ret {
        0 => Ok(value),
        _ => Err(io::Error::last_os_error()),
    }
}
