//! Percent encoding for query components.
//!
//! Follows the form-encoding dialect of [RFC1738]: space maps to `+`,
//! unreserved characters (`A-Z a-z 0-9 - _ .`) pass through, everything
//! else becomes `%XX` on the raw UTF-8 bytes.
//!
//! [RFC1738]: <https://datatracker.ietf.org/doc/html/rfc1738>

const HEX: &[u8; 16] = b"0123456789ABCDEF";

const fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.')
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Percent-encode a query component.
pub(crate) fn encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else if byte == b' ' {
            out.push('+');
        } else {
            out.push('%');
            out.push(HEX[(byte >> 4) as usize] as char);
            out.push(HEX[(byte & 0xF) as usize] as char);
        }
    }
    out
}

/// Percent-decode a query component.
///
/// Malformed escapes (`%` not followed by two hex digits) pass through
/// untouched rather than failing, matching common decoder behavior.
pub(crate) fn decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut rest = bytes;
    while let [byte, tail @ ..] = rest {
        match *byte {
            b'+' => {
                out.push(b' ');
                rest = tail;
            }
            b'%' => match tail {
                [hi, lo, next @ ..] => match (hex_value(*hi), hex_value(*lo)) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        rest = next;
                    }
                    _ => {
                        out.push(b'%');
                        rest = tail;
                    }
                },
                _ => {
                    out.push(b'%');
                    rest = tail;
                }
            },
            other => {
                out.push(other);
                rest = tail;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod test {
    use super::{decode, encode};

    #[test]
    fn test_encode() {
        assert_eq!(encode("plain-text_1.0"), "plain-text_1.0");
        assert_eq!(encode("a b"), "a+b");
        assert_eq!(encode("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode("naïve"), "na%C3%AFve");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode("plain"), "plain");
        assert_eq!(decode("a+b"), "a b");
        assert_eq!(decode("a%26b%3Dc"), "a&b=c");
        assert_eq!(decode("na%C3%AFve"), "naïve");

        // malformed escapes pass through
        assert_eq!(decode("100%"), "100%");
        assert_eq!(decode("%zz"), "%zz");
    }

    #[test]
    fn test_roundtrip() {
        for raw in ["hello world", "x=1&y=2", "100% sure", "päron"] {
            assert_eq!(decode(&encode(raw)), raw);
        }
    }
}
