use std::time::SystemTime;

use base64ct::{Base64, Encoding};

use super::{HeaderError, HeaderList};
use crate::query::encode;

/// Convenience builders, pure sugar over [`HeaderList::put`].
impl HeaderList {
    /// Put a `User-Agent` header.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] when the agent string contains a line break.
    pub fn user_agent(&mut self, agent: &str) -> Result<&mut Self, HeaderError> {
        self.put("User-Agent", agent)
    }

    /// Put a `Referer` header.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] when the referer contains a line break.
    pub fn referer(&mut self, referer: &str) -> Result<&mut Self, HeaderError> {
        self.put("Referer", referer)
    }

    /// Put a `Cookie` header from name/value pairs.
    ///
    /// Values are percent-encoded; each pair renders as
    /// `name=value;`.
    ///
    /// ```
    /// use peerline::HeaderList;
    ///
    /// let mut headers = HeaderList::new();
    /// headers.cookie([("session", "a b"), ("lang", "en")]).unwrap();
    /// assert_eq!(headers.get("Cookie"), Some("session=a+b;lang=en;"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Err`] when a cookie name contains a line break or
    /// space.
    pub fn cookie<'a, I>(&mut self, pairs: I) -> Result<&mut Self, HeaderError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut value = String::new();
        for (name, item) in pairs {
            if name.is_empty() || name.contains([' ', '=', ';', '\r', '\n']) {
                return Err(HeaderError::Value);
            }
            value.push_str(name);
            value.push('=');
            value.push_str(&encode(item));
            value.push(';');
        }
        self.put("Cookie", value)
    }

    /// Put a basic `Authorization` header,
    /// `Basic base64(user:password)`.
    pub fn basic_authorization(
        &mut self,
        user: &str,
        password: &str,
    ) -> Result<&mut Self, HeaderError> {
        let token = Base64::encode_string(format!("{user}:{password}").as_bytes());
        self.put("Authorization", format!("Basic {token}"))
    }

    /// Put a `Date` header for the given time, GMT-qualified in the
    /// RFC 1123 shape (`Sun, 02 Oct 2016 14:44:11 GMT`).
    pub fn date(&mut self, time: SystemTime) -> Result<&mut Self, HeaderError> {
        self.put("Date", httpdate::fmt_http_date(time))
    }

    /// Put a `Date` header for the current time.
    pub fn date_now(&mut self) -> Result<&mut Self, HeaderError> {
        self.date(SystemTime::now())
    }
}
