use std::{any::Any, fmt};

use crate::{Error, Inspectable, Registrable, ValueInspector};

/// A polymorphic slot: a value of any registered type, carried with its name.
///
/// Inspected as an object with a mandatory `type` field holding the
/// registered name and an optional `value` field holding the payload. When
/// reading, the payload is rebuilt through the session's
/// [`Registry`](crate::Registry); without one the session fails with
/// [`Error::NoRegistry`].
#[derive(Default)]
pub struct Dynamic {
    type_name: String,
    value: Option<Box<dyn Registrable>>,
}

impl Dynamic {
    pub const TYPE_NAME: &'static str = "inspect.dynamic";

    /// Wraps `value` under its [`Inspectable::type_name`].
    pub fn new<T: Registrable>(value: T) -> Self {
        Self {
            type_name: T::type_name().to_owned(),
            value: Some(Box::new(value)),
        }
    }

    /// Wraps an already boxed value registered as `type_name`.
    pub fn from_boxed(type_name: impl Into<String>, value: Box<dyn Registrable>) -> Self {
        Self {
            type_name: type_name.into(),
            value: Some(value),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn get(&self) -> Option<&dyn Registrable> {
        self.value.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut dyn Registrable> {
        match &mut self.value {
            Some(value) => Some(&mut **value),
            None => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.as_deref()?.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.get_mut()?.as_any_mut().downcast_mut()
    }

    pub fn into_inner(self) -> Option<Box<dyn Registrable>> {
        self.value
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dynamic")
            .field("type_name", &self.type_name)
            .field("is_set", &self.value.is_some())
            .finish()
    }
}

impl Inspectable for Dynamic {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let registry = inspector.registry();
        let mut object = inspector.object(Self::TYPE_NAME, "value of a registered type");
        object.string(&mut self.type_name, "type", true, "registered type name");
        if object.is_reading() {
            self.value = None;
            match registry {
                None => object.set_error(Error::NoRegistry),
                Some(registry) => match registry.construct(&self.type_name) {
                    Ok(value) => self.value = Some(value),
                    Err(error) => object.set_error(error),
                },
            }
        }
        if let Some(value) = &mut self.value {
            object.inspect(&mut **value, "value", false, "payload");
        }
        object.end();
    }

    fn type_name() -> &'static str {
        Self::TYPE_NAME
    }
}
