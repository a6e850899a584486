//! Ordered `Name: Value` header blocks.
//!
//! Names are stored exactly as given, without case folding; lookup is
//! case-sensitive. Binding the same exact name again overwrites the
//! earlier value in place, so a block never carries duplicates.
//!
//! A [`HeaderList`] is a plain value: it is never shared between
//! requests by reference, each request gets its own copy or a fresh
//! instance.
mod parser;
mod build;
mod error;


pub use error::HeaderError;

/// Ordered case-sensitive header mapping.
///
/// # Examples
///
/// ```
/// use peerline::HeaderList;
///
/// let headers = HeaderList::parse("Content-Type: text/html\r\nX-Foo: bar\r\n");
/// assert_eq!(headers.get("Content-Type"), Some("text/html"));
/// assert_eq!(headers.get("content-type"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    entries: Vec<(String, String)>,
}

impl HeaderList {
    /// Create new empty [`HeaderList`].
    #[inline]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Parse a raw header block.
    ///
    /// Scans line by line for `Name: Value` pairs; lines that do not
    /// match are ignored, later duplicate names overwrite earlier
    /// ones. The name runs up to the first `:` and may not contain a
    /// space; one leading space and trailing line terminators are
    /// stripped from the value.
    #[inline]
    pub fn parse(raw: &str) -> Self {
        parser::parse(raw)
    }

    /// Returns the value bound to the exact `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if the exact `name` is present.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Returns the number of headers.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no header is present.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bind `value` to `name`, overwriting in place when the exact
    /// name already exists.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] when the name is empty or contains spaces, or
    /// when either component contains a line break.
    pub fn put(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, HeaderError> {
        let name = name.into();
        let value = value.into();

        if name.is_empty() || name.contains([' ', ':', '\r', '\n']) {
            return Err(HeaderError::Name);
        }
        if value.contains(['\r', '\n']) {
            return Err(HeaderError::Value);
        }

        self.put_unchecked(name, value);
        Ok(self)
    }

    /// Remove the header bound to the exact `name`, returning its
    /// value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let at = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(at).1)
    }

    /// Merge another header source with last-write-wins semantics.
    ///
    /// Accepts another [`HeaderList`], a raw header block, or literal
    /// name/value pairs:
    ///
    /// ```
    /// use peerline::HeaderList;
    ///
    /// let mut headers = HeaderList::parse("A: 1\r\n");
    /// headers.append("A: 2\r\nB: 3\r\n");
    /// headers.append([("C", "4")]);
    /// assert_eq!(headers.get("A"), Some("2"));
    /// assert_eq!(headers.len(), 3);
    /// ```
    pub fn append<A: Append>(&mut self, other: A) -> &mut Self {
        other.append_to(self);
        self
    }

    /// Iterate headers in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize back into a CRLF-terminated block.
    pub fn as_block(&self) -> String {
        let mut out = String::new();
        for (name, value) in self.iter() {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out
    }

    fn put_unchecked(&mut self, name: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }
}

// ===== Append =====

/// Types that can merge into a [`HeaderList`].
pub trait Append {
    fn append_to(self, list: &mut HeaderList);
}

impl Append for HeaderList {
    fn append_to(self, list: &mut HeaderList) {
        for (name, value) in self.entries {
            list.put_unchecked(name, value);
        }
    }
}

impl Append for &HeaderList {
    fn append_to(self, list: &mut HeaderList) {
        for (name, value) in self.iter() {
            list.put_unchecked(name.to_owned(), value.to_owned());
        }
    }
}

impl Append for &str {
    /// Raw block, parsed with the same rules as [`HeaderList::parse`].
    fn append_to(self, list: &mut HeaderList) {
        HeaderList::parse(self).append_to(list);
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> Append for [(K, V); N] {
    fn append_to(self, list: &mut HeaderList) {
        for (name, value) in self {
            list.put_unchecked(name.into(), value.into());
        }
    }
}

impl<K: Into<String>, V: Into<String>> Append for Vec<(K, V)> {
    fn append_to(self, list: &mut HeaderList) {
        for (name, value) in self {
            list.put_unchecked(name.into(), value.into());
        }
    }
}

// ===== Formatting =====

impl std::fmt::Display for HeaderList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_block())
    }
}
