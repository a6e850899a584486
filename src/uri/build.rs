use super::ParsedUri;

/// Port emission policy for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PortMode {
    /// Include the port whenever one is present.
    Always,
    /// Omit the port unconditionally.
    Never,
    /// Include the port only when it differs from the scheme default.
    NonDefault,
}

/// Reassemble the canonical string form.
///
/// Construction order: scheme, `://`, optional `user[:password]@`,
/// host, optional `:port`, path, optional `?query`, optional
/// `#fragment`.
pub(super) fn serialize(uri: &ParsedUri, mode: PortMode) -> String {
    let mut out = String::new();

    if let Some(scheme) = uri.scheme() {
        out.push_str(scheme);
        out.push_str("://");
    }

    if let Some(user) = uri.user() {
        encode_userinfo(&mut out, user);
        if let Some(password) = uri.password() {
            out.push(':');
            encode_userinfo(&mut out, password);
        }
        out.push('@');
    }

    if let Some(host) = uri.host() {
        out.push_str(host);
    }

    if let Some(port) = uri.port()
        && emit_port(uri, port, mode)
    {
        let mut buf = itoa::Buffer::new();
        out.push(':');
        out.push_str(buf.format(port));
    }

    if let Some(path) = uri.path() {
        out.push_str(path);
    }

    if !uri.query().is_empty() {
        out.push('?');
        out.push_str(&uri.query().build());
    }

    if let Some(fragment) = uri.fragment() {
        out.push('#');
        out.push_str(fragment);
    }

    out
}

fn emit_port(uri: &ParsedUri, port: u16, mode: PortMode) -> bool {
    match mode {
        PortMode::Always => true,
        PortMode::Never => false,
        PortMode::NonDefault => uri
            .scheme()
            .and_then(default_port)
            .is_none_or(|default| default != port),
    }
}

/// Well-known default ports. Unknown schemes have none, so
/// [`PortMode::NonDefault`] keeps their port.
pub(super) fn default_port(scheme: &str) -> Option<u16> {
    match scheme.to_ascii_lowercase().as_str() {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        "ftp" => Some(21),
        "ftps" => Some(990),
        "ssh" | "sftp" => Some(22),
        "telnet" => Some(23),
        _ => None,
    }
}

/// Percent-encode a userinfo component. Only the bytes that would
/// break the authority shape are escaped, so typical inputs round-trip
/// byte for byte.
fn encode_userinfo(out: &mut String, raw: &str) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    for byte in raw.bytes() {
        match byte {
            b'@' | b':' | b'/' | b'?' | b'#' | b'%' | b'[' | b']' | 0x00..=0x20 | 0x7F.. => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0xF) as usize] as char);
            }
            other => out.push(other as char),
        }
    }
}
