//! Blocking Network Peer Toolkit
//!
//! The pieces needed to talk to a single remote peer over a synchronous
//! byte channel:
//!
//! - [`QueryString`], URL-encoded parameter sets with nested bracket
//!   notation (`a[b][]=1`),
//! - [`Uri`], URI parsing, validation and construction,
//! - [`HeaderList`], ordered `Name: Value` header blocks,
//! - [`Socket`], timeout-bounded blocking read/write over one
//!   exclusively owned channel handle.
//!
//! All I/O is blocking; every read or write call may park the calling
//! thread up to the configured timeout. No operation spawns background
//! work, and a channel handle is never shared between owners.
#![warn(missing_debug_implementations)]

mod log;

pub mod query;
pub mod uri;
pub mod headers;
pub mod net;

pub use query::QueryString;
pub use uri::Uri;
pub use headers::HeaderList;
pub use net::{Socket, Stream};

#[cfg(unix)]
pub use net::{BsdSocketConnection, SocketDomain};
