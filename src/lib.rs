//! Bidirectional structural serialization without reflection.
//!
//! A type implements [`Inspectable`] once, describing its shape through a
//! [`ValueInspector`]. The same code then encodes, decodes and documents the
//! type against any [`Backend`]: the tagged [`binary`] format, [`json`], the
//! in-memory [`tree`] or the [`docs`] generator.

pub use zerocopy::BigEndian;
pub use zerocopy::LittleEndian;
pub use zerocopy::NativeEndian;

mod backend;
pub mod binary;
mod config;
pub mod docs;
mod error;
mod fingerprint;
mod inspectable;
mod inspector;
pub mod json;
pub mod number;
mod registry;
mod scalar;
mod shape;
mod timestamp;
pub mod tree;
mod util;
mod wrapper;

pub use backend::*;
pub use binary::{BinaryReader, BinaryWriter};
pub use config::*;
pub use error::*;
pub use fingerprint::*;
pub use inspectable::*;
pub use inspector::*;
pub use json::{JsonReader, JsonWriter};
pub use registry::*;
pub use scalar::*;
pub use shape::*;
pub use timestamp::*;
pub use util::*;
pub use wrapper::*;
