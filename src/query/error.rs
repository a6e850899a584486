/// A possible error value when parsing a query string.
#[derive(Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Parameter name contains `[` without a matching `]`, or a stray
    /// `]`, or text between segments.
    UnbalancedBrackets,
}

// ===== Error =====

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            QueryError::UnbalancedBrackets => {
                f.write_str("query parameter name contains unbalanced brackets")
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl std::fmt::Debug for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}
