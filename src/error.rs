//! Error types for traversal, registry and wrapper operations.
//!
//! This module contains the [`Error`] type which represents every failure a
//! traversal session, a backend, the [`Registry`](crate::Registry) or the
//! generic [`Value`](crate::Value) wrapper can report.
//!
//! # Example
//!
//! ```
//! use na_inspect::{Error, JsonReader, Result, Session};
//!
//! fn try_read(text: &str) -> Result<i64> {
//!     let mut reader = JsonReader::new(text)?;
//!     let mut value = 0i64;
//!     let mut session = Session::new(&mut reader);
//!     session.value().int64(&mut value, "", "");
//!     match session.finish() {
//!         Ok(()) => Ok(value),
//!         Err(Error::InvalidValue { expected, path }) => {
//!             println!("expected {expected} at {path}");
//!             Err(Error::InvalidValue { expected, path })
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//!
//! assert_eq!(try_read("42").unwrap(), 42);
//! assert!(try_read("\"x\"").is_err());
//! ```

use std::fmt::{self, Display};

use crate::Shape;

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// This type represents all possible errors that can occur while inspecting
/// a value.
///
/// # Variants
///
/// - [`MandatoryFieldAbsent`](Error::MandatoryFieldAbsent) - A mandatory field was missing on read
/// - [`WritingToReader`](Error::WritingToReader) / [`ReadingFromWriter`](Error::ReadingFromWriter) - Wrong direction
/// - [`CantWrite`](Error::CantWrite) - Decoding into a write-only wrapper
/// - [`NotFound`](Error::NotFound) - Registry lookup failed
#[derive(Debug)]
pub enum Error {
    Message(String),

    /// An I/O error occurred.
    IO(std::io::Error),

    /// A JSON document could not be parsed or produced.
    Json(serde_json::Error),

    /// A mandatory object field is absent from the payload.
    MandatoryFieldAbsent(String),

    /// A write-shaped operation was invoked on a reading session.
    WritingToReader,

    /// A read-shaped operation was invoked on a writing session.
    ReadingFromWriter,

    /// A by-copy [`Value`](crate::Value) was asked to absorb data.
    ///
    /// By-copy wrappers have no addressable slot to write back into.
    CantWrite,

    /// [`Value::guess`](crate::Value::guess) received raw bytes.
    ///
    /// Raw bytes may mean either a byte-string or a binary blob; pick one of
    /// [`Value::byte_string`](crate::Value::byte_string) or
    /// [`Value::bytes`](crate::Value::bytes) explicitly.
    Ambiguity,

    /// The wrapper does not model the requested shape or runtime type.
    Unsupported,

    /// The replacement value has a different fingerprint than the original.
    WrongType,

    /// No type is registered under this name.
    NotFound(String),

    /// A type name was registered twice.
    DuplicateType(String),

    /// A polymorphic value was decoded without a registry attached to the session.
    NoRegistry,

    /// Context methods were called out of order.
    CallOrder(&'static str),

    /// A container was closed after a different number of elements than negotiated.
    LengthMismatch { declared: usize, actual: usize },

    /// The input ended unexpectedly.
    EndOfFile,

    /// Extra bytes remain after the root value.
    TrailingData(usize),

    /// An unknown shape tag byte was encountered.
    InvalidShape(u8),

    /// The payload holds a different shape than the one being read.
    ShapeMismatch { expected: Shape, actual: Shape },

    /// A container or payload is longer than the format can express.
    ListTooLong(usize),

    /// A field name or map key is longer than the format can express.
    KeyTooLong(usize),

    /// Nesting exceeds the configured depth limit.
    DepthLimitExceeded(usize),

    /// A textual value could not be interpreted as the requested shape.
    InvalidValue { expected: &'static str, path: String },
}

impl Error {
    /// Returns `true` for the "not found" class of registry failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IO(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json(error)
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(message) => formatter.write_str(message),
            Error::IO(error) => formatter.write_str(&error.to_string()),
            Error::Json(error) => formatter.write_str(&error.to_string()),
            Error::MandatoryFieldAbsent(name) => {
                formatter.write_str(&format!("mandatory field is absent: {name}"))
            }
            Error::WritingToReader => formatter.write_str("writing to a reading inspector"),
            Error::ReadingFromWriter => formatter.write_str("reading from a writing inspector"),
            Error::CantWrite => formatter.write_str("trying to write into read only value"),
            Error::Ambiguity => formatter.write_str(
                "byte slice type is not supported in auto guessing due to ambiguity",
            ),
            Error::Unsupported => formatter.write_str("unsupported type"),
            Error::WrongType => formatter
                .write_str("new value should be of the same type as the one being replaced"),
            Error::NotFound(name) => formatter.write_str(&format!("type not found: {name}")),
            Error::DuplicateType(name) => {
                formatter.write_str(&format!("type is already registered: {name}"))
            }
            Error::NoRegistry => {
                formatter.write_str("polymorphic value read without a type registry")
            }
            Error::CallOrder(message) => {
                formatter.write_str(&format!("inspector call order violated: {message}"))
            }
            Error::LengthMismatch { declared, actual } => formatter.write_str(&format!(
                "container length mismatch: declared {declared}, visited {actual}"
            )),
            Error::EndOfFile => formatter.write_str("unexpected end of input"),
            Error::TrailingData(remaining_bytes) => formatter.write_str(&format!(
                "trailing data after end of input: {remaining_bytes} bytes remaining"
            )),
            Error::InvalidShape(tag) => {
                formatter.write_str(&format!("invalid shape tag: {tag:#04x}"))
            }
            Error::ShapeMismatch { expected, actual } => formatter.write_str(&format!(
                "shape mismatch: expected {}, got {}",
                expected.name(),
                actual.name()
            )),
            Error::ListTooLong(len) => formatter.write_str(&format!("list length too long: {len}")),
            Error::KeyTooLong(len) => formatter.write_str(&format!("key length too long: {len}")),
            Error::DepthLimitExceeded(depth) => {
                formatter.write_str(&format!("nesting depth limit exceeded: {depth}"))
            }
            Error::InvalidValue { expected, path } => {
                formatter.write_str(&format!("{expected} required at {path}"))
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IO(error) => Some(error),
            Error::Json(error) => Some(error),
            _ => None,
        }
    }
}
