//! A generic holder that adapts a scalar or an [`Inspectable`] to the traversal contract.
//!
//! A [`Value`] remembers the [`Shape`] it was declared as and the
//! [`Fingerprint`] of the concrete type it holds. Reference forms borrow the
//! caller's variable and can be decoded into; value forms own a copy and are
//! write-only.
//!
//! ```
//! use na_inspect::{Error, Value};
//!
//! let mut x: isize = 5;
//! let mut wrapper = Value::int_ref(&mut x);
//! assert!(matches!(wrapper.replace(String::from("five")), Err(Error::WrongType)));
//! wrapper.replace(7isize).unwrap();
//! drop(wrapper);
//! assert_eq!(x, 7);
//! ```

use std::any::{Any, TypeId};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{
    Error, FloatFormat, Fingerprint, Inspectable, Registrable, Result, ScalarMut, Shape,
    ValueInspector, fingerprint_dyn,
};

/// Byte sequences that could be either a byte-string or bytes.
fn is_raw_bytes(type_id: TypeId) -> bool {
    #[cfg(feature = "shared")]
    if type_id == TypeId::of::<bytes::Bytes>() || type_id == TypeId::of::<bytes::BytesMut>() {
        return true;
    }
    type_id == TypeId::of::<Vec<u8>>()
        || type_id == TypeId::of::<Box<[u8]>>()
        || type_id == TypeId::of::<&'static [u8]>()
        || type_id == TypeId::of::<&'static mut [u8]>()
}

enum Data<'a> {
    Owned(Box<dyn Any>),
    Borrowed(&'a mut dyn Any),
    OwnedInspectable(Box<dyn Registrable>),
    BorrowedInspectable(&'a mut dyn Registrable),
}

/// Generic value wrapper; see the [module documentation](self).
pub struct Value<'a> {
    shape: Shape,
    fingerprint: Fingerprint,
    format: FloatFormat,
    data: Data<'a>,
}

macro_rules! typed_constructors {
    ($($owned:ident, $borrowed:ident($ty:ty) => $shape:ident;)*) => {
        $(
            pub fn $owned(value: $ty) -> Self {
                Self::owned(Shape::$shape, value, Self::DEFAULT_FORMAT)
            }

            pub fn $borrowed(value: &'a mut $ty) -> Self {
                Self::borrowed(Shape::$shape, value, Self::DEFAULT_FORMAT)
            }
        )*
    };
}

macro_rules! typed_float_constructors {
    ($($owned:ident, $borrowed:ident($ty:ty) => $shape:ident;)*) => {
        $(
            pub fn $owned(value: $ty, format: u8, precision: i32) -> Self {
                Self::owned(Shape::$shape, value, FloatFormat::new(format, precision))
            }

            pub fn $borrowed(value: &'a mut $ty, format: u8, precision: i32) -> Self {
                Self::borrowed(Shape::$shape, value, FloatFormat::new(format, precision))
            }
        )*
    };
}

impl<'a> Value<'a> {
    pub const TYPE_NAME: &'static str = "inspect.wrappers.value";

    /// Formatting used by constructors that take no explicit hint.
    pub const DEFAULT_FORMAT: FloatFormat = FloatFormat {
        format: b'g',
        precision: 16,
    };

    fn owned<T: Any>(shape: Shape, value: T, format: FloatFormat) -> Self {
        Self {
            shape,
            fingerprint: Fingerprint::of::<T>(),
            format,
            data: Data::Owned(Box::new(value)),
        }
    }

    fn borrowed<T: Any>(shape: Shape, value: &'a mut T, format: FloatFormat) -> Self {
        Self {
            shape,
            fingerprint: Fingerprint::of::<T>(),
            format,
            data: Data::Borrowed(value),
        }
    }

    typed_constructors! {
        int, int_ref(isize) => Int;
        int32, int32_ref(i32) => Int32;
        int64, int64_ref(i64) => Int64;
        string, string_ref(String) => String;
        byte_string, byte_string_ref(Vec<u8>) => ByteString;
        bytes, bytes_ref(Vec<u8>) => Bytes;
        bool, bool_ref(bool) => Bool;
        big_int, big_int_ref(BigInt) => BigInt;
    }

    typed_float_constructors! {
        float32, float32_ref(f32) => Float32;
        float64, float64_ref(f64) => Float64;
        big_float, big_float_ref(BigDecimal) => BigFloat;
    }

    pub fn rat(value: BigRational, precision: i32) -> Self {
        Self::owned(Shape::Rat, value, FloatFormat::new(b'g', precision))
    }

    pub fn rat_ref(value: &'a mut BigRational, precision: i32) -> Self {
        Self::borrowed(Shape::Rat, value, FloatFormat::new(b'g', precision))
    }

    /// Wraps an owned [`Inspectable`]; inspecting re-delegates to it.
    pub fn inspectable<T: Registrable>(value: T) -> Self {
        Self {
            shape: Shape::Value,
            fingerprint: Fingerprint::of::<T>(),
            format: Self::DEFAULT_FORMAT,
            data: Data::OwnedInspectable(Box::new(value)),
        }
    }

    pub fn inspectable_ref<T: Registrable>(value: &'a mut T) -> Self {
        Self {
            shape: Shape::Value,
            fingerprint: Fingerprint::of::<T>(),
            format: Self::DEFAULT_FORMAT,
            data: Data::BorrowedInspectable(value),
        }
    }

    /// Picks the typed constructor matching the runtime type of an owned value.
    ///
    /// Recognizes the primitive types and `Box<dyn Registrable>`. Raw byte
    /// sequences (`Vec<u8>`, `Box<[u8]>`, `&'static [u8]`, `bytes::Bytes`) fail
    /// with [`Error::Ambiguity`]; anything else with [`Error::Unsupported`].
    pub fn guess(value: Box<dyn Any>, format: u8, precision: i32) -> Result<Self> {
        macro_rules! try_owned {
            ($value:ident, $($ty:ty => |$v:ident| $ctor:expr;)*) => {
                $(
                    let $value = match $value.downcast::<$ty>() {
                        Ok($v) => return Ok($ctor),
                        Err(other) => other,
                    };
                )*
            };
        }

        try_owned! {
            value,
            isize => |v| Self::int(*v);
            i32 => |v| Self::int32(*v);
            i64 => |v| Self::int64(*v);
            f32 => |v| Self::float32(*v, format, precision);
            f64 => |v| Self::float64(*v, format, precision);
            String => |v| Self::string(*v);
            bool => |v| Self::bool(*v);
            BigInt => |v| Self::big_int(*v);
            BigRational => |v| Self::rat(*v, precision);
            BigDecimal => |v| Self::big_float(*v, format, precision);
        }
        let value = match value.downcast::<Box<dyn Registrable>>() {
            Ok(inspectable) => {
                let inspectable = *inspectable;
                return Ok(Self {
                    shape: Shape::Value,
                    fingerprint: fingerprint_dyn((*inspectable).as_any()),
                    format: FloatFormat::new(format, precision),
                    data: Data::OwnedInspectable(inspectable),
                });
            }
            Err(other) => other,
        };
        if is_raw_bytes(Any::type_id(&*value)) {
            return Err(Error::Ambiguity);
        }
        Err(Error::Unsupported)
    }

    /// Like [`guess`](Value::guess), producing a reference form.
    pub fn guess_ref(value: &'a mut dyn Any, format: u8, precision: i32) -> Result<Self> {
        let type_id = Any::type_id(&*value);

        macro_rules! try_borrowed {
            ($($ty:ty => |$v:ident| $ctor:expr;)*) => {
                $(
                    if type_id == TypeId::of::<$ty>() {
                        return match value.downcast_mut::<$ty>() {
                            Some($v) => Ok($ctor),
                            None => Err(Error::Unsupported),
                        };
                    }
                )*
            };
        }

        try_borrowed! {
            isize => |v| Self::int_ref(v);
            i32 => |v| Self::int32_ref(v);
            i64 => |v| Self::int64_ref(v);
            f32 => |v| Self::float32_ref(v, format, precision);
            f64 => |v| Self::float64_ref(v, format, precision);
            String => |v| Self::string_ref(v);
            bool => |v| Self::bool_ref(v);
            BigInt => |v| Self::big_int_ref(v);
            BigRational => |v| Self::rat_ref(v, precision);
            BigDecimal => |v| Self::big_float_ref(v, format, precision);
            Box<dyn Registrable> => |v| Self {
                shape: Shape::Value,
                fingerprint: fingerprint_dyn((**v).as_any()),
                format: FloatFormat::new(format, precision),
                data: Data::BorrowedInspectable(&mut **v),
            };
        }
        if is_raw_bytes(type_id) {
            return Err(Error::Ambiguity);
        }
        Err(Error::Unsupported)
    }

    /// A zero-valued, write-only value of a scalar shape.
    ///
    /// Container shapes and [`Shape::Value`] fail with [`Error::Unsupported`].
    pub fn default_value(shape: Shape) -> Result<Value<'static>> {
        let format = Self::DEFAULT_FORMAT;
        Ok(match shape {
            Shape::Int => Value::int(0),
            Shape::Int32 => Value::int32(0),
            Shape::Int64 => Value::int64(0),
            Shape::Float32 => Value::float32(0.0, format.format, format.precision),
            Shape::Float64 => Value::float64(0.0, format.format, format.precision),
            Shape::String => Value::string(String::new()),
            Shape::ByteString => Value::byte_string(Vec::new()),
            Shape::Bytes => Value::bytes(Vec::new()),
            Shape::Bool => Value::bool(false),
            Shape::BigInt => Value::big_int(BigInt::default()),
            Shape::Rat => Value::rat(BigRational::default(), format.precision),
            Shape::BigFloat => {
                Value::big_float(BigDecimal::default(), format.format, format.precision)
            }
            Shape::Invalid | Shape::Object | Shape::Array | Shape::Value | Shape::Map => {
                return Err(Error::Unsupported);
            }
        })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn format(&self) -> FloatFormat {
        self.format
    }

    /// `true` when the wrapper can be decoded into.
    pub fn is_ref(&self) -> bool {
        !matches!(self.data, Data::Owned(_))
    }

    pub fn set_format(&mut self, format: u8) {
        self.format.format = format;
    }

    pub fn set_precision(&mut self, precision: i32) {
        self.format.precision = precision;
    }

    pub fn set_format_precision(&mut self, format: u8, precision: i32) {
        self.format = FloatFormat::new(format, precision);
    }

    fn any_ref(&self) -> &dyn Any {
        match &self.data {
            Data::Owned(value) => &**value,
            Data::Borrowed(value) => &**value,
            Data::OwnedInspectable(value) => (**value).as_any(),
            Data::BorrowedInspectable(value) => (**value).as_any(),
        }
    }

    fn any_mut(&mut self) -> &mut dyn Any {
        match &mut self.data {
            Data::Owned(value) => &mut **value,
            Data::Borrowed(value) => &mut **value,
            Data::OwnedInspectable(value) => (**value).as_any_mut(),
            Data::BorrowedInspectable(value) => (**value).as_any_mut(),
        }
    }

    /// The wrapped value, if it is a `T`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.any_ref().downcast_ref()
    }

    /// Replaces the wrapped value.
    ///
    /// Fails with [`Error::WrongType`] unless `T` is the type the wrapper was
    /// built for. Reference forms write through to the borrowed variable.
    pub fn replace<T: Any>(&mut self, value: T) -> Result<()> {
        if Fingerprint::of::<T>() != self.fingerprint {
            return Err(Error::WrongType);
        }
        match self.any_mut().downcast_mut::<T>() {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::WrongType),
        }
    }

    /// Rebinds a reference-form scalar wrapper to another variable of the same type.
    pub fn replace_ref<T: Any>(&mut self, value: &'a mut T) -> Result<()> {
        if Fingerprint::of::<T>() != self.fingerprint || !matches!(self.data, Data::Borrowed(_)) {
            return Err(Error::WrongType);
        }
        self.data = Data::Borrowed(value);
        Ok(())
    }
}

impl Inspectable for Value<'_> {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        if inspector.is_reading() && !self.is_ref() {
            inspector.set_error(Error::CantWrite);
            return;
        }
        match &mut self.data {
            Data::OwnedInspectable(value) => return (**value).inspect(inspector),
            Data::BorrowedInspectable(value) => return (**value).inspect(inspector),
            Data::Owned(_) | Data::Borrowed(_) => {}
        }
        let format = self.format;
        let shape = self.shape;
        let data = self.any_mut();
        let slot = match shape {
            Shape::Int => data.downcast_mut().map(ScalarMut::Int),
            Shape::Int32 => data.downcast_mut().map(ScalarMut::Int32),
            Shape::Int64 => data.downcast_mut().map(ScalarMut::Int64),
            Shape::Float32 => data.downcast_mut().map(|v| ScalarMut::Float32(v, format)),
            Shape::Float64 => data.downcast_mut().map(|v| ScalarMut::Float64(v, format)),
            Shape::String => data.downcast_mut().map(ScalarMut::String),
            Shape::ByteString => data.downcast_mut().map(ScalarMut::ByteString),
            Shape::Bytes => data.downcast_mut().map(ScalarMut::Bytes),
            Shape::Bool => data.downcast_mut().map(ScalarMut::Bool),
            Shape::BigInt => data.downcast_mut().map(ScalarMut::BigInt),
            Shape::Rat => data
                .downcast_mut()
                .map(|v| ScalarMut::Rat(v, format.precision)),
            Shape::BigFloat => data.downcast_mut().map(|v| ScalarMut::BigFloat(v, format)),
            Shape::Invalid | Shape::Object | Shape::Array | Shape::Value | Shape::Map => None,
        };
        match slot {
            Some(slot) => inspector.scalar(slot, Self::TYPE_NAME, ""),
            None => inspector.set_error(Error::WrongType),
        }
    }

    fn type_name() -> &'static str {
        Self::TYPE_NAME
    }
}

impl std::fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Value")
            .field("shape", &self.shape)
            .field("is_ref", &self.is_ref())
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
