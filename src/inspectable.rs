use std::collections::{BTreeMap, HashMap};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{FloatFormat, Primitive, Shape, ValueInspector};

/// The single capability every serializable type implements.
///
/// `inspect` declares the value as exactly one shape and visits its fields or
/// elements in a fixed order. The same code runs for encoding and decoding;
/// only local decisions such as resizing storage look at
/// [`ValueInspector::is_reading`].
///
/// Failures are not returned here: they are recorded in the session and
/// observed once through [`Session::finish`](crate::Session::finish).
pub trait Inspectable {
    fn inspect(&mut self, inspector: ValueInspector<'_>);

    /// Name used by documentation backends and as the element type name of
    /// containers. Registered types return their registry name.
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}

macro_rules! define_primitive_inspectable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspectable for $ty {
                #[inline]
                fn inspect(&mut self, inspector: ValueInspector<'_>) {
                    inspector.scalar(
                        self.slot(FloatFormat::SHORTEST),
                        <$ty as Primitive>::SHAPE.name(),
                        "",
                    )
                }

                fn type_name() -> &'static str {
                    <$ty as Primitive>::SHAPE.name()
                }
            }
        )*
    };
}

define_primitive_inspectable!(
    isize,
    i32,
    i64,
    f32,
    f64,
    String,
    bool,
    BigInt,
    BigRational,
    BigDecimal
);

impl<T: Inspectable + ?Sized> Inspectable for Box<T> {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        (**self).inspect(inspector)
    }
}

impl<T: Inspectable + Default> Inspectable for Vec<T> {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut array = inspector.array(Shape::Array.name(), T::type_name(), "");
        let len = array.length(self.len());
        if array.is_reading() {
            self.clear();
            self.resize_with(len, T::default);
        }
        for element in self.iter_mut() {
            element.inspect(array.value());
        }
        array.end();
    }

    fn type_name() -> &'static str {
        Shape::Array.name()
    }
}

macro_rules! define_map_inspectable {
    ($($map:ident),*) => {
        $(
            impl<T: Inspectable + Default> Inspectable for $map<String, T> {
                fn inspect(&mut self, inspector: ValueInspector<'_>) {
                    let mut map = inspector.map(Shape::Map.name(), T::type_name(), "");
                    if map.is_reading() {
                        self.clear();
                        let len = map.get_length();
                        for _ in 0..len {
                            let key = map.next_key();
                            let mut value = T::default();
                            value.inspect(map.read_value());
                            self.insert(key, value);
                        }
                    } else {
                        map.set_length(self.len());
                        for (key, value) in self.iter_mut() {
                            value.inspect(map.write_value(key));
                        }
                    }
                    map.end();
                }

                fn type_name() -> &'static str {
                    Shape::Map.name()
                }
            }
        )*
    };
}

define_map_inspectable!(HashMap, BTreeMap);

impl Inspectable for Shape {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let reading = inspector.is_reading();
        let mut raw = *self as u8 as isize;
        inspector.int(&mut raw, Shape::TYPE_NAME, "shape of an inspected value");
        if reading {
            // unknown tags decode as `Invalid`
            *self = u8::try_from(raw)
                .ok()
                .and_then(Shape::from_u8)
                .unwrap_or(Shape::Invalid);
        }
    }

    fn type_name() -> &'static str {
        Shape::TYPE_NAME
    }
}

/// An object without fields, used where a message carries no payload.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct EmptyObject;

impl EmptyObject {
    pub const TYPE_NAME: &'static str = "inspect.empty";
}

impl Inspectable for EmptyObject {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        inspector.object(Self::TYPE_NAME, "object without fields").end();
    }

    fn type_name() -> &'static str {
        Self::TYPE_NAME
    }
}
