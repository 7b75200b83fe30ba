//! Error types shared by the scanner and the navigators.

use alloc::string::String;

use thiserror::Error;

/// A malformed JSON document.
///
/// `offset` is the scanner position one past the offending byte, matching
/// the classic `encoding/json` convention so error positions stay stable
/// across ports of the same test vectors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{msg}")]
pub struct SyntaxError {
    pub msg: String,
    pub offset: usize,
}

/// A number that survived scanning but cannot be represented: it did not fit
/// an `i64` and did not parse as a finite `f64` either.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot unmarshal {value} into value of type {target}")]
pub struct UnmarshalTypeError {
    pub value: String,
    pub target: &'static str,
    pub offset: usize,
}

/// Any failure a navigator can report.
///
/// Not-found is never an error: lookups that come up empty return `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Type(#[from] UnmarshalTypeError),
    /// A negative index was passed to a `find_index` flavor.
    #[error("invalid array index")]
    InvalidArrayIndex,
    /// `next_value` was called without a preceding successful `scan_keys`.
    #[error("Not after object key")]
    NotAfterObjectKey,
    /// [`list_pointers`](crate::list_pointers) was handed an empty buffer.
    #[error("Invalid JSON")]
    EmptyDocument,
    /// [`list_pointers`](crate::list_pointers) hit a scan failure at the
    /// given byte offset.
    #[error("Error reading JSON object at offset {0}")]
    ReadFailed(usize),
    #[error("Object key is not a string")]
    KeyNotString,
    #[error("Unexpected array value, not in array")]
    UnexpectedArrayValue,
    #[error("Unexpected object key, not in object")]
    UnexpectedObjectKey,
    #[error("Unexpected object value, not in object")]
    UnexpectedObjectValue,
    /// The external decoder rejected a fragment handed over by
    /// [`find_decode`](crate::find_decode).
    #[cfg(any(test, feature = "serde"))]
    #[error("{0}")]
    Decode(String),
}
