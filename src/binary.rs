//! Tagged binary backend in the NBT family, generic over byte order.
//!
//! # Example
//!
//! ```
//! use na_inspect::{BigEndian, binary};
//!
//! let mut numbers = vec![1i64, 2, 3];
//! let bytes = binary::to_vec_be(&mut numbers).unwrap();
//! let decoded: Vec<i64> = binary::from_slice::<BigEndian, _>(&bytes).unwrap();
//! assert_eq!(decoded, numbers);
//! ```

use zerocopy::{BigEndian, LittleEndian};

use crate::{ByteOrder, Inspectable, Registry, Result, Session};

mod read;
mod write;

pub use read::*;
pub use write::*;

/// Encodes `value` with byte order `O`.
pub fn to_vec<O: ByteOrder, T: Inspectable + ?Sized>(value: &mut T) -> Result<Vec<u8>> {
    let mut writer = BinaryWriter::<O>::new();
    let mut session = Session::new(&mut writer);
    value.inspect(session.value());
    session.finish()?;
    Ok(writer.into_vec())
}

pub fn to_vec_be<T: Inspectable + ?Sized>(value: &mut T) -> Result<Vec<u8>> {
    to_vec::<BigEndian, T>(value)
}

pub fn to_vec_le<T: Inspectable + ?Sized>(value: &mut T) -> Result<Vec<u8>> {
    to_vec::<LittleEndian, T>(value)
}

/// Decodes a `T` from bytes written with byte order `O`.
pub fn from_slice<O: ByteOrder, T: Inspectable + Default>(data: &[u8]) -> Result<T> {
    let mut reader = BinaryReader::<O>::new(data)?;
    let mut value = T::default();
    let mut session = Session::new(&mut reader);
    value.inspect(session.value());
    session.finish()?;
    Ok(value)
}

/// Like [`from_slice`], resolving polymorphic values through `registry`.
pub fn from_slice_with<O: ByteOrder, T: Inspectable + Default>(
    data: &[u8],
    registry: &Registry,
) -> Result<T> {
    let mut reader = BinaryReader::<O>::new(data)?;
    let mut value = T::default();
    let mut session = Session::with_registry(&mut reader, registry);
    value.inspect(session.value());
    session.finish()?;
    Ok(value)
}

pub fn from_slice_be<T: Inspectable + Default>(data: &[u8]) -> Result<T> {
    from_slice::<BigEndian, T>(data)
}

pub fn from_slice_le<T: Inspectable + Default>(data: &[u8]) -> Result<T> {
    from_slice::<LittleEndian, T>(data)
}
