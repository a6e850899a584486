/// A possible error value when binding a header.
#[derive(Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// Name is empty or contains a space, colon or line break.
    Name,
    /// Value contains a line break.
    Value,
}

// ===== Error =====

impl std::fmt::Display for HeaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            HeaderError::Name => f.write_str("header name is invalid"),
            HeaderError::Value => f.write_str("header value contains invalid character"),
        }
    }
}

impl std::error::Error for HeaderError {}

impl std::fmt::Debug for HeaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}
