use std::any::{Any, TypeId};

/// A cheap, comparable identity for a value's concrete type.
///
/// Two values of the same concrete type always have equal fingerprints within
/// one process run. Fingerprints are not stable across builds and must not be
/// persisted.
///
/// # Example
///
/// ```
/// use na_inspect::{Fingerprint, fingerprint};
///
/// assert_eq!(fingerprint(&1i64), Fingerprint::of::<i64>());
/// assert_ne!(fingerprint(&1i64), fingerprint(&1i32));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Fingerprint(TypeId);

impl Fingerprint {
    #[inline]
    pub fn of<T: ?Sized + Any>() -> Self {
        Fingerprint(TypeId::of::<T>())
    }

    #[inline]
    pub fn type_id(self) -> TypeId {
        self.0
    }
}

/// Fingerprint of a statically typed value.
#[inline]
pub fn fingerprint<T: ?Sized + Any>(_value: &T) -> Fingerprint {
    Fingerprint::of::<T>()
}

/// Fingerprint of the concrete type behind a `dyn Any`.
#[inline]
pub fn fingerprint_dyn(value: &dyn Any) -> Fingerprint {
    Fingerprint(value.type_id())
}
