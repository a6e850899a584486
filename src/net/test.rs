use std::{
    io::{Read, Write},
    net::{TcpListener, TcpStream},
    thread,
    time::Duration,
};

use super::{NetError, ReadChunk, Socket};

fn listen() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

#[test]
fn test_connect_write_read() {
    let (listener, port) = listen();
    let peer = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 64];
        let n = stream.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"PING\n");
        stream.write_all(b"HELLO\nWORLD\n").unwrap();
    });

    let mut socket = Socket::new("127.0.0.1", port);
    socket.connect().unwrap();
    assert!(socket.is_connected());

    assert_eq!(socket.write(b"PING\n").unwrap(), 5);

    // line-bounded chunks
    let chunk = socket.read(1024).unwrap().into_bytes().unwrap();
    assert_eq!(&chunk[..], b"HELLO\n");

    // second line is buffered, so the channel is not at end-of-data
    assert!(!socket.eof());

    let chunk = socket.read(1024).unwrap().into_bytes().unwrap();
    assert_eq!(&chunk[..], b"WORLD\n");

    peer.join().unwrap();

    // peer half-closed and all bytes are consumed: reads report the
    // explicit no-data value instead of raising
    assert_eq!(socket.read(1024).unwrap(), ReadChunk::NoData);
    assert!(socket.eof());
}

#[test]
fn test_read_bounded_by_max_len() {
    let (listener, port) = listen();
    let peer = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream.write_all(b"ABCDEF\n").unwrap();
    });

    let mut socket = Socket::new("127.0.0.1", port);
    socket.connect().unwrap();

    let chunk = socket.read(3).unwrap().into_bytes().unwrap();
    assert_eq!(&chunk[..], b"ABC");
    let chunk = socket.read(1024).unwrap().into_bytes().unwrap();
    assert_eq!(&chunk[..], b"DEF\n");
    peer.join().unwrap();
}

#[test]
fn test_read_binary_ignores_line_boundary() {
    let (listener, port) = listen();
    let peer = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream.write_all(b"AB\nCD").unwrap();
    });

    let mut socket = Socket::new("127.0.0.1", port);
    socket.connect().unwrap();
    peer.join().unwrap();

    let chunk = socket.read_binary(1024).unwrap().into_bytes().unwrap();
    assert_eq!(&chunk[..], b"AB\nCD");
    assert_eq!(socket.read_binary(1024).unwrap(), ReadChunk::NoData);
}

#[test]
fn test_connect_idempotent() {
    let (listener, port) = listen();
    let mut socket = Socket::new("127.0.0.1", port);
    socket.connect().unwrap();
    socket.connect().unwrap();
    drop(listener);
}

#[test]
fn test_disconnect_is_safe_twice() {
    let (listener, port) = listen();
    let mut socket = Socket::new("127.0.0.1", port);
    socket.connect().unwrap();
    socket.disconnect();
    socket.disconnect();
    assert!(!socket.is_connected());
    assert!(socket.eof());

    // reads on a released channel are a failure, not a panic
    assert!(matches!(
        socket.read(16),
        Err(NetError::ConnectionFailed { .. }),
    ));
    drop(listener);
}

#[test]
fn test_unreachable_connect() {
    let (listener, port) = listen();
    // nothing listens on the port once the listener is gone
    drop(listener);

    let timeout = Duration::from_millis(250);
    let mut socket = Socket::with_timeout("127.0.0.1", port, timeout);
    match socket.connect() {
        Err(NetError::ConnectionFailed { host, port: p, timeout: t, .. }) => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(p, Some(port));
            assert_eq!(t, Some(timeout));
        }
        other => panic!("expected connection failure, got {other:?}"),
    }
    assert!(!socket.is_connected());
}

#[test]
fn test_read_timeout() {
    let (listener, port) = listen();
    let peer = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        // hold the channel open without writing
        thread::sleep(Duration::from_millis(500));
        drop(stream);
    });

    let mut socket = Socket::new("127.0.0.1", port);
    socket.connect().unwrap();
    socket.set_timeout(0, 100_000).unwrap();

    match socket.read(64) {
        Err(NetError::Timeout { length, after }) => {
            assert_eq!(length, 64);
            assert_eq!(after, Duration::from_millis(100));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    peer.join().unwrap();
}

#[test]
fn test_from_stream() {
    let (listener, port) = listen();
    let stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
    let socket = Socket::from_stream(stream).unwrap();
    assert!(socket.is_connected());
    assert_eq!(socket.host(), "127.0.0.1");
    assert_eq!(socket.port(), port);
    drop(listener);
}

#[test]
fn test_error_display() {
    let err = NetError::ConnectionFailed {
        host: "example.com".to_owned(),
        port: Some(80),
        timeout: Some(Duration::from_secs(30)),
        reason: "refused".to_owned(),
    };
    assert_eq!(
        err.to_string(),
        "connection to example.com:80 failed: refused (timeout 30s)",
    );

    let err = NetError::Timeout {
        length: 64,
        after: Duration::from_millis(1500),
    };
    assert!(err.is_timeout());
    assert_eq!(err.to_string(), "transfer of 64 bytes timed out after 1.5s");
}

// ===== BSD connection =====

#[cfg(unix)]
mod bsd {
    use std::{io::Read, net::TcpListener, os::unix::net::UnixListener, thread};

    use crate::net::{BsdSocketConnection, NetError, SocketDomain, SocketKind, SocketProtocol};

    #[test]
    fn test_requires_port() {
        assert!(SocketDomain::Inet.requires_port());
        assert!(SocketDomain::Inet6.requires_port());
        assert!(!SocketDomain::Unix.requires_port());
    }

    #[test]
    fn test_missing_port_is_rejected() {
        let mut conn = BsdSocketConnection::new(
            SocketDomain::Inet,
            SocketKind::Stream,
            Some(SocketProtocol::Tcp),
        );
        match conn.connect("127.0.0.1", None) {
            Err(NetError::ConnectionFailed { reason, .. }) => {
                assert!(reason.contains("port"), "unexpected reason: {reason}");
            }
            other => panic!("expected connection failure, got {other:?}"),
        }
    }

    #[test]
    fn test_queued_options_apply_on_connect() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut conn = BsdSocketConnection::new(
            SocketDomain::Inet,
            SocketKind::Stream,
            Some(SocketProtocol::Tcp),
        );
        // queued before the handle exists
        conn.set_option(libc::SOL_SOCKET, libc::SO_KEEPALIVE, 1).unwrap();
        assert_eq!(conn.option(libc::SOL_SOCKET, libc::SO_KEEPALIVE), Some(1));

        conn.connect("127.0.0.1", Some(port)).unwrap();
        assert!(conn.is_connected());
        assert_eq!(conn.option(libc::SOL_SOCKET, libc::SO_KEEPALIVE), Some(1));

        // uncached option read through the live handle
        assert_eq!(conn.option(libc::SOL_SOCKET, libc::SO_ACCEPTCONN), Some(0));

        // live option application
        conn.set_option(libc::SOL_SOCKET, libc::SO_OOBINLINE, 1).unwrap();
        assert_eq!(conn.option(libc::SOL_SOCKET, libc::SO_OOBINLINE), Some(1));

        conn.close();
        conn.close();
        assert!(!conn.is_connected());
    }

    #[test]
    fn test_unix_domain_connect() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("peerline-test-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let listener = UnixListener::bind(&path).unwrap();
        let accept = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1];
            let _ = stream.read(&mut buf);
        });

        let mut conn = BsdSocketConnection::new(SocketDomain::Unix, SocketKind::Stream, None);
        conn.connect(path.to_str().unwrap(), None).unwrap();
        assert!(conn.is_connected());
        conn.close();

        accept.join().unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_create_failure_carries_os_error() {
        // raw sockets need privileges a test run does not have
        let mut conn = BsdSocketConnection::new(
            SocketDomain::Inet,
            SocketKind::Raw,
            Some(SocketProtocol::Tcp),
        );
        if let Err(NetError::ConnectionFailed { reason, .. }) = conn.connect("127.0.0.1", Some(9)) {
            assert!(!reason.is_empty());
        }
    }
}
