use crate::query::QueryError;

/// A possible error value when parsing URI.
#[derive(Clone, PartialEq, Eq)]
pub enum UriError {
    /// Scheme is missing or contains invalid characters.
    Scheme,
    /// User or password segment contains `@`, `:` or `/`.
    Userinfo,
    /// Host is neither a dotted/label host, a bracketed literal, nor
    /// empty.
    Host,
    /// Port is not a decimal number in range.
    Port,
    /// Query component failed to parse.
    Query(QueryError),
}

// ===== Error =====

impl std::fmt::Display for UriError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            UriError::Scheme => f.write_str("URI scheme missing or invalid"),
            UriError::Userinfo => f.write_str("URI userinfo contains invalid character"),
            UriError::Host => f.write_str("URI host is invalid"),
            UriError::Port => f.write_str("URI port is invalid"),
            UriError::Query(err) => write!(f, "URI query is invalid: {err}"),
        }
    }
}

impl std::error::Error for UriError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UriError::Query(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Debug for UriError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl From<QueryError> for UriError {
    fn from(err: QueryError) -> Self {
        UriError::Query(err)
    }
}
