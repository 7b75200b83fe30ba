//! Single-pass, streaming JSON navigation.
//!
//! `jsonprobe` locates fragments of a JSON document by [RFC 6901] JSON
//! Pointer, lists all addressable paths, and lazily decodes values, while
//! returning byte-exact slices of the original input wherever possible. It
//! is built for workloads that project a few fields out of large documents,
//! or probe the same document many times: the stateful navigators cache
//! everything the scan passes and never reparse an already-scanned prefix.
//!
//! Returned slices alias the caller's buffer; nothing is copied until a
//! caller asks for a decoded value.
//!
//! ```
//! use jsonprobe::{find, find_key, KeyState};
//!
//! let doc = br#"{"user": {"name": "ada", "tags": ["admin", "ops"]}, "n": 3}"#;
//!
//! assert_eq!(find(doc, "/user/tags/1").unwrap(), Some(&b"\"ops\""[..]));
//! assert_eq!(find_key(doc, "n").unwrap(), Some(&b"3"[..]));
//!
//! // Repeated probes over one document: scan once, answer from cache after.
//! let mut state = KeyState::new(doc);
//! assert_eq!(state.find_key("n").unwrap(), Some(&b"3"[..]));
//! assert_eq!(state.find_key("user").unwrap(),
//!            Some(&br#"{"name": "ada", "tags": ["admin", "ops"]}"#[..]));
//! ```
//!
//! Navigators validate only what they walk over: bytes past a matched value
//! are never inspected.
//!
//! [RFC 6901]: https://datatracker.ietf.org/doc/html/rfc6901

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod find;
mod literal;
mod pointer;
mod scanner;
mod simple;
mod slice;
mod state;
mod value;

pub use error::{Error, SyntaxError, UnmarshalTypeError};
#[cfg(any(test, feature = "serde"))]
pub use find::find_decode;
pub use find::{find, find_index, find_key, find_many, first_find, list_pointers};
pub use simple::simple_unmarshal;
pub use state::{FindState, IndexState, KeyState, ScanState};
pub use value::{Array, Map, Value};

#[cfg(test)]
mod tests;
