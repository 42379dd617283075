//! The contract every wire format or documentation generator implements.
//!
//! A backend owns the output buffer or the input cursor and is the only
//! component aware of wire-format details. Contexts forward to it and never
//! call it again once an operation has failed.
//!
//! The contract is built around a *pending value*: after
//! [`object_value`](Backend::object_value), [`array_value`](Backend::array_value),
//! [`map_read_value`](Backend::map_read_value) or
//! [`map_write_value`](Backend::map_write_value) have succeeded, exactly one
//! call of [`value`](Backend::value) or one of the `start_*` methods follows
//! and encodes or decodes that position. The root value of a session is
//! pending from the start. Per-field, per-element and per-entry scalar
//! operations have default implementations in terms of those two steps, so a
//! backend only overrides them when it has a faster path.

use crate::{Error, Result, ScalarMut};

pub trait Backend {
    /// Direction of the backend; fixed for the lifetime of the instance.
    fn is_reading(&self) -> bool;

    /// Encodes or decodes the pending value as a scalar.
    fn value(&mut self, slot: ScalarMut<'_>, type_name: &str, description: &str) -> Result<()>;

    fn start_object(&mut self, type_name: &str, description: &str) -> Result<()>;

    fn end_object(&mut self) -> Result<()>;

    /// Makes the named field of the current object the pending value.
    ///
    /// Reading backends return `Ok(false)` when an optional field is absent and
    /// [`Error::MandatoryFieldAbsent`] when a mandatory one is. Writing backends
    /// always return `Ok(true)`.
    fn object_value(&mut self, name: &str, mandatory: bool, description: &str) -> Result<bool>;

    fn object_field(
        &mut self,
        slot: ScalarMut<'_>,
        name: &str,
        mandatory: bool,
        description: &str,
    ) -> Result<()> {
        if self.object_value(name, mandatory, description)? {
            self.value(slot, "", description)?;
        }
        Ok(())
    }

    fn start_array(&mut self, type_name: &str, value_type_name: &str, description: &str)
    -> Result<()>;

    fn end_array(&mut self) -> Result<()>;

    /// Negotiates the element count.
    ///
    /// `len` is authoritative when writing; reading backends ignore it and
    /// return the count found in the payload.
    fn array_len(&mut self, len: usize) -> Result<usize>;

    /// Makes the next element the pending value.
    fn array_value(&mut self) -> Result<()>;

    fn array_element(&mut self, slot: ScalarMut<'_>) -> Result<()> {
        self.array_value()?;
        self.value(slot, "", "")
    }

    fn start_map(&mut self, type_name: &str, value_type_name: &str, description: &str)
    -> Result<()>;

    fn end_map(&mut self) -> Result<()>;

    /// Negotiates the entry count, like [`array_len`](Backend::array_len).
    fn map_len(&mut self, len: usize) -> Result<usize>;

    /// Reads the key of the next entry.
    fn map_next_key(&mut self) -> Result<String> {
        Err(Error::ReadingFromWriter)
    }

    /// Makes the value of the entry whose key was just read the pending value.
    fn map_read_value(&mut self) -> Result<()> {
        Err(Error::ReadingFromWriter)
    }

    fn map_read(&mut self, slot: ScalarMut<'_>) -> Result<()> {
        self.map_read_value()?;
        self.value(slot, "", "")
    }

    /// Emits `key` and makes its value the pending value.
    fn map_write_value(&mut self, _key: &str) -> Result<()> {
        Err(Error::WritingToReader)
    }

    fn map_write(&mut self, key: &str, slot: ScalarMut<'_>) -> Result<()> {
        self.map_write_value(key)?;
        self.value(slot, "", "")
    }
}
