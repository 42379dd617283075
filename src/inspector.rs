//! Traversal sessions and the four contexts application code calls against.
//!
//! A [`Session`] binds one [`Backend`] for one pass. [`Session::value`] hands
//! out the root [`ValueInspector`], which declares exactly one shape: a scalar,
//! or a nested [`ObjectInspector`], [`ArrayInspector`] or [`MapInspector`].
//!
//! The first failing backend call is stored in the session; every later call
//! on any context of that session returns a default value without touching
//! the backend. Check [`Session::finish`] once at the end.
//!
//! # Example
//!
//! ```
//! use na_inspect::{Inspectable, JsonWriter, ValueInspector, inspect};
//!
//! #[derive(Default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Inspectable for Point {
//!     fn inspect(&mut self, inspector: ValueInspector<'_>) {
//!         let mut object = inspector.object("demo.point", "a point");
//!         object.int32(&mut self.x, "x", true, "abscissa");
//!         object.int32(&mut self.y, "y", true, "ordinate");
//!         object.end();
//!     }
//! }
//!
//! let mut writer = JsonWriter::new();
//! inspect(&mut Point { x: 1, y: 2 }, &mut writer).unwrap();
//! assert_eq!(writer.into_string(), r#"{"x":1,"y":2}"#);
//! ```

use crate::{Backend, Error, Inspectable, Registry, Result};

mod array;
mod map;
mod object;
mod value;

pub use array::*;
pub use map::*;
pub use object::*;
pub use value::*;

pub(crate) struct State {
    reading: bool,
    error: Option<Error>,
}

/// Shared view over a session, reborrowed by every context.
pub(crate) struct Cx<'a> {
    backend: &'a mut dyn Backend,
    state: &'a mut State,
    registry: Option<&'a Registry>,
}

impl<'a> Cx<'a> {
    #[inline]
    pub(crate) fn is_poisoned(&self) -> bool {
        self.state.error.is_some()
    }

    #[inline]
    pub(crate) fn is_reading(&self) -> bool {
        self.state.reading
    }

    #[inline]
    pub(crate) fn registry(&self) -> Option<&'a Registry> {
        self.registry
    }

    pub(crate) fn reborrow(&mut self) -> Cx<'_> {
        Cx {
            backend: &mut *self.backend,
            state: &mut *self.state,
            registry: self.registry,
        }
    }

    /// Records `error` unless an earlier one is already stored.
    pub(crate) fn fail(&mut self, error: Error) {
        if self.state.error.is_none() {
            log::trace!("inspection aborted: {error}");
            self.state.error = Some(error);
        }
    }

    /// Runs one backend operation unless the session is already poisoned.
    #[inline]
    pub(crate) fn call<T: Default>(
        &mut self,
        operation: impl FnOnce(&mut dyn Backend) -> Result<T>,
    ) -> T {
        if self.is_poisoned() {
            return T::default();
        }
        match operation(&mut *self.backend) {
            Ok(value) => value,
            Err(error) => {
                self.fail(error);
                T::default()
            }
        }
    }

    /// Fails with the direction error when the session is not reading.
    pub(crate) fn expect_reading(&mut self) -> bool {
        if self.is_poisoned() {
            return false;
        }
        if !self.state.reading {
            self.fail(Error::ReadingFromWriter);
            return false;
        }
        true
    }

    /// Fails with the direction error when the session is not writing.
    pub(crate) fn expect_writing(&mut self) -> bool {
        if self.is_poisoned() {
            return false;
        }
        if self.state.reading {
            self.fail(Error::WritingToReader);
            return false;
        }
        true
    }
}

/// One complete encode or decode pass over a single backend.
///
/// The direction is taken from [`Backend::is_reading`] when the session is
/// created and never changes.
pub struct Session<'s> {
    backend: &'s mut dyn Backend,
    registry: Option<&'s Registry>,
    state: State,
}

impl<'s> Session<'s> {
    pub fn new(backend: &'s mut dyn Backend) -> Self {
        let reading = backend.is_reading();
        Self {
            backend,
            registry: None,
            state: State {
                reading,
                error: None,
            },
        }
    }

    /// Creates a session that resolves polymorphic values through `registry`.
    pub fn with_registry(backend: &'s mut dyn Backend, registry: &'s Registry) -> Self {
        let mut session = Self::new(backend);
        session.registry = Some(registry);
        session
    }

    /// The root context.
    pub fn value(&mut self) -> ValueInspector<'_> {
        ValueInspector::new(Cx {
            backend: &mut *self.backend,
            state: &mut self.state,
            registry: self.registry,
        })
    }

    /// Runs `value.inspect` against the root context.
    pub fn inspect<T: Inspectable + ?Sized>(&mut self, value: &mut T) -> &mut Self {
        value.inspect(self.value());
        self
    }

    pub fn is_reading(&self) -> bool {
        self.state.reading
    }

    pub fn registry(&self) -> Option<&'s Registry> {
        self.registry
    }

    /// The terminal error, if any operation has failed so far.
    pub fn error(&self) -> Option<&Error> {
        self.state.error.as_ref()
    }

    pub fn finish(self) -> Result<()> {
        match self.state.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Inspects `value` against `backend` in a fresh session.
pub fn inspect<T: Inspectable + ?Sized>(value: &mut T, backend: &mut dyn Backend) -> Result<()> {
    let mut session = Session::new(backend);
    value.inspect(session.value());
    session.finish()
}

/// Like [`inspect`], resolving polymorphic values through `registry`.
pub fn inspect_with<T: Inspectable + ?Sized>(
    value: &mut T,
    backend: &mut dyn Backend,
    registry: &Registry,
) -> Result<()> {
    let mut session = Session::with_registry(backend, registry);
    value.inspect(session.value());
    session.finish()
}
