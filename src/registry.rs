//! Name to constructor mapping for polymorphic payloads.
//!
//! Types that may travel behind a [`Dynamic`] slot are registered once at
//! startup; a decoding session then rebuilds them purely from the name
//! carried in the payload. The registry is plain data: build it before
//! spawning workers, then share it by reference or inside an `Arc`.
//!
//! # Example
//!
//! ```
//! use na_inspect::{Inspectable, Registry, ValueInspector};
//!
//! #[derive(Default)]
//! struct Ping(i64);
//!
//! impl Inspectable for Ping {
//!     fn inspect(&mut self, inspector: ValueInspector<'_>) {
//!         inspector.int64(&mut self.0, "demo.ping", "")
//!     }
//!
//!     fn type_name() -> &'static str {
//!         "demo.ping"
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.register_type::<Ping>().unwrap();
//! assert!(registry.contains("demo.ping"));
//! assert!(registry.register_type::<Ping>().is_err());
//! assert!(registry.construct("demo.pong").is_err_and(|e| e.is_not_found()));
//! ```

use std::{any::Any, collections::HashMap, fmt};

use crate::{EmptyObject, Error, Inspectable, Result, Shape, UnixMillis};

mod dynamic;

pub use dynamic::*;

/// An [`Inspectable`] that can be stored behind a trait object and downcast again.
pub trait Registrable: Inspectable + Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Inspectable + Any> Registrable for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Builds the zero value of a registered type.
pub type Constructor = fn() -> Box<dyn Registrable>;

fn construct_default<T: Registrable + Default>() -> Box<dyn Registrable> {
    Box::new(T::default())
}

/// One registered type.
#[derive(Clone)]
pub struct Registration {
    name: String,
    constructor: Constructor,
    description: Option<String>,
}

impl Registration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn construct(&self) -> Box<dyn Registrable> {
        (self.constructor)()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Process-wide table of registered types, keyed by name.
///
/// Registering a name twice is rejected with [`Error::DuplicateType`] so that
/// two unrelated types can never shadow each other.
#[derive(Clone)]
pub struct Registry {
    entries: HashMap<String, Registration>,
}

impl Default for Registry {
    /// See [`Registry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates a registry without any registrations.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Creates a registry with the crate's own types registered:
    ///
    /// - [`EmptyObject`] as `inspect.empty`
    /// - [`Shape`] as `inspect.typeid`
    /// - [`UnixMillis`] as `time.msecs`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, constructor, description) in [
            (
                EmptyObject::TYPE_NAME,
                construct_default::<EmptyObject> as Constructor,
                "object without fields",
            ),
            (
                Shape::TYPE_NAME,
                construct_default::<Shape>,
                "shape of an inspected value",
            ),
            (
                UnixMillis::TYPE_NAME,
                construct_default::<UnixMillis>,
                UnixMillis::DESCRIPTION,
            ),
        ] {
            registry.entries.insert(name.to_owned(), Registration {
                name: name.to_owned(),
                constructor,
                description: Some(description.to_owned()),
            });
        }
        registry
    }

    fn insert(&mut self, registration: Registration) -> Result<()> {
        if self.entries.contains_key(&registration.name) {
            log::warn!("type {} is already registered", registration.name);
            return Err(Error::DuplicateType(registration.name));
        }
        log::debug!("registering type {}", registration.name);
        self.entries.insert(registration.name.clone(), registration);
        Ok(())
    }

    /// Registers an auxiliary type without a description.
    pub fn register(&mut self, name: impl Into<String>, constructor: Constructor) -> Result<()> {
        self.insert(Registration {
            name: name.into(),
            constructor,
            description: None,
        })
    }

    /// Registers a type along with a human-readable description for documentation tooling.
    pub fn register_described(
        &mut self,
        name: impl Into<String>,
        constructor: Constructor,
        description: impl Into<String>,
    ) -> Result<()> {
        self.insert(Registration {
            name: name.into(),
            constructor,
            description: Some(description.into()),
        })
    }

    /// Registers `T::default` under [`Inspectable::type_name`].
    pub fn register_type<T: Registrable + Default>(&mut self) -> Result<()> {
        self.register(T::type_name(), construct_default::<T>)
    }

    /// Like [`register_type`](Registry::register_type), with a description.
    pub fn register_type_described<T: Registrable + Default>(
        &mut self,
        description: impl Into<String>,
    ) -> Result<()> {
        self.register_described(T::type_name(), construct_default::<T>, description)
    }

    /// Builds the zero value of the type registered under `name`.
    ///
    /// Fails with [`Error::NotFound`] for an unregistered name.
    pub fn construct(&self, name: &str) -> Result<Box<dyn Registrable>> {
        match self.entries.get(name) {
            Some(registration) => Ok(registration.construct()),
            None => {
                log::warn!("type {name} is not registered");
                Err(Error::NotFound(name.to_owned()))
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Registration> {
        self.entries.get(name)
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(Registration::description)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All registrations, in no particular order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Registration> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
