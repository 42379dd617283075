//! Owned in-memory value tree.
//!
//! [`TreeWriter`] captures any [`Inspectable`] as a [`Node`], and
//! [`TreeReader`] decodes it back. With the `serde` feature `Node` implements
//! `Serialize` and `Deserialize`, so any serde format can carry it.
//!
//! # Example
//!
//! ```
//! use na_inspect::tree::{self, Node};
//!
//! let mut words = vec!["hello".to_owned(), "world".to_owned()];
//! let node = tree::to_node(&mut words).unwrap();
//! assert_eq!(node, Node::Array(vec!["hello".into(), "world".into()]));
//!
//! let decoded: Vec<String> = tree::from_node(node).unwrap();
//! assert_eq!(decoded, words);
//! ```

use crate::{Error, Inspectable, Registry, Result, Session};

mod node;
mod read;
mod write;

pub use node::*;
pub use read::*;
pub use write::*;

pub fn to_node<T: Inspectable + ?Sized>(value: &mut T) -> Result<Node> {
    let mut writer = TreeWriter::new();
    let mut session = Session::new(&mut writer);
    value.inspect(session.value());
    session.finish()?;
    writer
        .into_node()
        .ok_or(Error::CallOrder("no value was written"))
}

pub fn from_node<T: Inspectable + Default>(node: Node) -> Result<T> {
    let mut reader = TreeReader::new(node);
    let mut value = T::default();
    let mut session = Session::new(&mut reader);
    value.inspect(session.value());
    session.finish()?;
    Ok(value)
}

/// Like [`from_node`], resolving polymorphic values through `registry`.
pub fn from_node_with<T: Inspectable + Default>(node: Node, registry: &Registry) -> Result<T> {
    let mut reader = TreeReader::new(node);
    let mut value = T::default();
    let mut session = Session::with_registry(&mut reader, registry);
    value.inspect(session.value());
    session.finish()?;
    Ok(value)
}
