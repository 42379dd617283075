//! JSON backend.
//!
//! The writer emits compact text; the reader parses with `serde_json` and
//! walks the resulting document.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use na_inspect::json;
//!
//! let mut scores = BTreeMap::new();
//! scores.insert("alice".to_owned(), 3i64);
//! scores.insert("bob".to_owned(), 5i64);
//!
//! let text = json::to_string(&mut scores).unwrap();
//! assert_eq!(text, r#"{"alice":3,"bob":5}"#);
//!
//! let decoded: BTreeMap<String, i64> = json::from_str(&text).unwrap();
//! assert_eq!(decoded, scores);
//! ```

use crate::{Inspectable, Registry, Result, Session};

mod read;
mod write;

pub use read::*;
pub use write::*;

pub fn to_string<T: Inspectable + ?Sized>(value: &mut T) -> Result<String> {
    let mut writer = JsonWriter::new();
    let mut session = Session::new(&mut writer);
    value.inspect(session.value());
    session.finish()?;
    Ok(writer.into_string())
}

pub fn from_str<T: Inspectable + Default>(text: &str) -> Result<T> {
    let mut reader = JsonReader::new(text)?;
    let mut value = T::default();
    let mut session = Session::new(&mut reader);
    value.inspect(session.value());
    session.finish()?;
    Ok(value)
}

/// Like [`from_str`], resolving polymorphic values through `registry`.
pub fn from_str_with<T: Inspectable + Default>(text: &str, registry: &Registry) -> Result<T> {
    let mut reader = JsonReader::new(text)?;
    let mut value = T::default();
    let mut session = Session::with_registry(&mut reader, registry);
    value.inspect(session.value());
    session.finish()?;
    Ok(value)
}
