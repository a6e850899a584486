//! URL-encoded query strings ([RFC1738])
//!
//! [RFC1738]: <https://datatracker.ietf.org/doc/html/rfc1738>
//!
//! # Bracket Notation
//!
//! Parameter names may carry a trailing sequence of `[...]` segments
//! describing nested containers:
//!
//! ```not_rust
//! a=1&b[]=2&b[]=3&c[x]=9
//! \_/ \________/ \_____/
//!  |       |        |
//! scalar  list     map
//! ```
//!
//! An empty pair (`[]`) appends to an implicit list; a named pair
//! (`[x]`) binds a key of a nested map. Keys preserve first-seen
//! insertion order, so serialization is deterministic.
mod encode;
mod parser;
mod error;

#[cfg(test)]
mod test;

pub use error::QueryError;
pub(crate) use encode::{decode, encode};

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Bare parameter without `=`, e.g. `flag` in `flag&a=1`.
    Absent,
    /// Plain textual value. A trailing `=` parses as an empty scalar.
    Scalar(String),
    /// Boolean value, serialized as `1`/`0`.
    Bool(bool),
    /// Implicit numeric sequence, built by `[]` segments.
    List(Vec<Value>),
    /// Nested named container, built by `[key]` segments.
    Map(Params),
}

impl Value {
    /// Returns the scalar text, if this value is a scalar.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list items, if this value is a list.
    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the nested parameters, if this value is a map.
    #[inline]
    pub fn as_map(&self) -> Option<&Params> {
        match self {
            Value::Map(params) => Some(params),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Scalar(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// Ordered `name -> Value` mapping.
///
/// Lookup is linear; parameter sets are small and iteration order is
/// part of the serialization contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, Value)>,
}

impl Params {
    /// Create new empty [`Params`].
    #[inline]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Bind `value` to `name`, overwriting in place when the name
    /// already exists, appending otherwise.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.get_mut(&name) {
            Some(slot) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Remove the entry bound to `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let at = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(at).1)
    }

    /// Returns `true` if an entry is bound to `name`.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Iterate entries in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the value slot for `name`, inserting [`Value::Absent`]
    /// when the name is new.
    pub(crate) fn slot(&mut self, name: String) -> &mut Value {
        if let Some(at) = self.entries.iter().position(|(k, _)| *k == name) {
            return &mut self.entries[at].1;
        }
        self.entries.push((name, Value::Absent));
        &mut self.entries.last_mut().unwrap().1
    }
}

/// Parsed query string.
///
/// # Examples
///
/// ```
/// use peerline::query::QueryString;
///
/// let query = QueryString::parse("a=1&b[]=2&b[]=3").unwrap();
/// assert_eq!(query.get("a").unwrap().as_str(), Some("1"));
/// assert_eq!(query.get("b").unwrap().as_list().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    params: Params,
}

impl QueryString {
    /// Create new empty [`QueryString`].
    #[inline]
    pub const fn new() -> Self {
        Self { params: Params::new() }
    }

    /// Parse a raw query string.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if a parameter name contains unbalanced
    /// brackets.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        parser::parse(raw)
    }

    /// Serialize back into URL-encoded form.
    ///
    /// Emission follows insertion order of top-level names. Booleans
    /// encode as `1`/`0`, absent values as the bare name.
    pub fn build(&self) -> String {
        let mut parts = Vec::new();
        for (name, value) in self.params.iter() {
            flatten(&encode(name), value, &mut parts);
        }
        parts.join("&")
    }

    /// Returns the value bound to `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Returns the value at a bracket path, e.g. `get_path("c[x]")`.
    ///
    /// Named segments walk nested maps; a numeric segment indexes a
    /// list. Returns [`None`] for a missing binding, a path that does
    /// not match the stored shape, or a malformed path.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let (base, segments) = parser::tokenize(path).ok()?;
        let mut value = self.params.get(&base)?;
        for segment in &segments {
            value = match (segment, value) {
                (parser::Segment::Key(key), Value::Map(params)) => params.get(key)?,
                (parser::Segment::Key(key), Value::List(items)) => {
                    items.get(key.parse::<usize>().ok()?)?
                }
                _ => return None,
            };
        }
        Some(value)
    }

    /// Bind `value` to `name`, overwriting any existing binding.
    #[inline]
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(name, value);
    }

    /// Remove the binding for `name`, returning its value.
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.params.remove(name)
    }

    /// Returns `true` if a top-level parameter is bound to `name`.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains(name)
    }

    /// Returns the number of top-level parameters.
    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if no parameter is present.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate top-level parameters in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.params.iter()
    }

    #[inline]
    pub(crate) fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }
}

// ===== Building =====

fn flatten(key: &str, value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Absent => out.push(key.to_owned()),
        Value::Scalar(s) => out.push(format!("{key}={}", encode(s))),
        Value::Bool(b) => out.push(format!("{key}={}", if *b { '1' } else { '0' })),
        Value::List(items) => {
            for item in items {
                flatten(&format!("{key}[]"), item, out);
            }
        }
        Value::Map(params) => {
            for (name, item) in params.iter() {
                flatten(&format!("{key}[{}]", encode(name)), item, out);
            }
        }
    }
}

// ===== Formatting =====

impl std::fmt::Display for QueryString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.build())
    }
}
