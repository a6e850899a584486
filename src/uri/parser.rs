use super::{ParsedUri, UriError};
use crate::query::QueryString;

/// Parse and validate a non-empty URI string.
///
/// The accepted shape is
/// `scheme://[user[:pass]@]host[:port][/path][?query][#fragment]`.
pub(super) fn parse(raw: &str) -> Result<ParsedUri, UriError> {
    let (scheme, rest) = raw.split_once("://").ok_or(UriError::Scheme)?;
    validate_scheme(scheme)?;

    let (rest, fragment) = match rest.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment.to_owned())),
        None => (rest, None),
    };

    let (rest, query) = match rest.split_once('?') {
        Some((rest, query)) => (
            rest,
            QueryString::parse(query).map_err(UriError::Query)?,
        ),
        None => (rest, QueryString::new()),
    };

    let (authority, path) = match rest.find('/') {
        Some(at) => (&rest[..at], Some(rest[at..].to_owned())),
        None => (rest, None),
    };

    let (userinfo, hostport) = match authority.split_once('@') {
        Some((userinfo, hostport)) => (Some(userinfo), hostport),
        None => (None, authority),
    };

    let (user, password) = match userinfo {
        Some(userinfo) => match userinfo.split_once(':') {
            Some((user, password)) => {
                validate_userinfo(user)?;
                validate_userinfo(password)?;
                (Some(decode_component(user)), Some(decode_component(password)))
            }
            None => {
                validate_userinfo(userinfo)?;
                (Some(decode_component(userinfo)), None)
            }
        },
        None => (None, None),
    };

    let (host, port) = split_host(hostport)?;

    Ok(ParsedUri {
        scheme: Some(scheme.to_owned()),
        user,
        password,
        host: Some(host.to_ascii_lowercase()),
        port,
        path,
        fragment,
        query,
    })
}

// ===== Components =====

/// Scheme is one leading letter followed by letters, digits or `+`,
/// case-insensitive.
fn validate_scheme(scheme: &str) -> Result<(), UriError> {
    let mut bytes = scheme.as_bytes();
    match bytes {
        [first, ..] if first.is_ascii_alphabetic() => bytes = &bytes[1..],
        _ => return Err(UriError::Scheme),
    }
    while let [byte, rest @ ..] = bytes {
        if byte.is_ascii_alphanumeric() || *byte == b'+' {
            bytes = rest;
        } else {
            return Err(UriError::Scheme);
        }
    }
    Ok(())
}

/// User and password segments may not contain `@`, `:` or `/`.
fn validate_userinfo(segment: &str) -> Result<(), UriError> {
    if segment.contains(['@', ':', '/']) {
        return Err(UriError::Userinfo);
    }
    Ok(())
}

/// Split `host[:port]`, accepting dotted/label hosts, bracketed
/// literals and the empty host.
fn split_host(hostport: &str) -> Result<(&str, Option<u16>), UriError> {
    if hostport.is_empty() {
        return Ok((hostport, None));
    }

    if let Some(rest) = hostport.strip_prefix('[') {
        let close = rest.find(']').ok_or(UriError::Host)?;
        let literal = &rest[..close];
        if literal.is_empty() || !literal.bytes().all(is_literal_byte) {
            return Err(UriError::Host);
        }
        let host = &hostport[..close + 2];
        let port = match &rest[close + 1..] {
            "" => None,
            tail => Some(parse_port(tail.strip_prefix(':').ok_or(UriError::Host)?)?),
        };
        return Ok((host, port));
    }

    let (host, port) = match hostport.split_once(':') {
        Some((host, port)) => (host, Some(parse_port(port)?)),
        None => (hostport, None),
    };
    if !host.bytes().all(is_label_byte) {
        return Err(UriError::Host);
    }
    Ok((host, port))
}

fn parse_port(port: &str) -> Result<u16, UriError> {
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UriError::Port);
    }
    port.parse().map_err(|_| UriError::Port)
}

const fn is_label_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'%' | b'~')
}

const fn is_literal_byte(byte: u8) -> bool {
    byte.is_ascii_hexdigit() || matches!(byte, b':' | b'.')
}

/// Percent-decode a userinfo component. Unlike query decoding, `+` is
/// literal here.
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut rest = bytes;
    while let [byte, tail @ ..] = rest {
        match (*byte, tail) {
            (b'%', [hi, lo, next @ ..]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                out.push(hex(*hi) << 4 | hex(*lo));
                rest = next;
            }
            (other, _) => {
                out.push(other);
                rest = tail;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

const fn hex(byte: u8) -> u8 {
    match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'f' => byte - b'a' + 10,
        _ => byte - b'A' + 10,
    }
}
