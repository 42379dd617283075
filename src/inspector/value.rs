use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{
    ArrayInspector, Error, FloatFormat, Inspectable, MapInspector, ObjectInspector, Primitive,
    Registry, ScalarMut, inspector::Cx,
};

/// The entry point of every traversal: declares one shape for one value.
///
/// Each method consumes the context, so a value can only declare itself once.
/// `type_name` and `description` are only used by documentation backends.
#[must_use = "a value inspector does nothing until a shape is declared"]
pub struct ValueInspector<'a> {
    cx: Cx<'a>,
}

macro_rules! value_scalars {
    ($($method:ident($ty:ty) => $variant:ident;)*) => {
        $(
            pub fn $method(self, value: &mut $ty, type_name: &str, description: &str) {
                self.scalar(ScalarMut::$variant(value), type_name, description)
            }
        )*
    };
}

impl<'a> ValueInspector<'a> {
    pub(crate) fn new(cx: Cx<'a>) -> Self {
        Self { cx }
    }

    pub fn is_reading(&self) -> bool {
        self.cx.is_reading()
    }

    /// The registry attached to the session, if any.
    pub fn registry(&self) -> Option<&'a Registry> {
        self.cx.registry()
    }

    /// Aborts the session with `error` unless it already failed.
    pub fn set_error(mut self, error: Error) {
        self.cx.fail(error)
    }

    /// Encodes or decodes a scalar through an explicit slot.
    pub fn scalar(mut self, slot: ScalarMut<'_>, type_name: &str, description: &str) {
        self.cx
            .call(|backend| backend.value(slot, type_name, description))
    }

    value_scalars! {
        int(isize) => Int;
        int32(i32) => Int32;
        int64(i64) => Int64;
        string(String) => String;
        byte_string(Vec<u8>) => ByteString;
        bytes(Vec<u8>) => Bytes;
        bool(bool) => Bool;
        big_int(BigInt) => BigInt;
    }

    pub fn float32(
        self,
        value: &mut f32,
        format: u8,
        precision: i32,
        type_name: &str,
        description: &str,
    ) {
        let format = FloatFormat::new(format, precision);
        self.scalar(ScalarMut::Float32(value, format), type_name, description)
    }

    pub fn float64(
        self,
        value: &mut f64,
        format: u8,
        precision: i32,
        type_name: &str,
        description: &str,
    ) {
        let format = FloatFormat::new(format, precision);
        self.scalar(ScalarMut::Float64(value, format), type_name, description)
    }

    pub fn rat(self, value: &mut BigRational, precision: i32, type_name: &str, description: &str) {
        self.scalar(ScalarMut::Rat(value, precision), type_name, description)
    }

    pub fn big_float(
        self,
        value: &mut BigDecimal,
        format: u8,
        precision: i32,
        type_name: &str,
        description: &str,
    ) {
        let format = FloatFormat::new(format, precision);
        self.scalar(ScalarMut::BigFloat(value, format), type_name, description)
    }

    /// Any [`Primitive`], floats using [`FloatFormat::SHORTEST`].
    pub fn primitive<T: Primitive>(self, value: &mut T, type_name: &str, description: &str) {
        self.scalar(value.slot(FloatFormat::SHORTEST), type_name, description)
    }

    /// Delegates to a nested [`Inspectable`].
    pub fn inspect<T: Inspectable + ?Sized>(self, value: &mut T) {
        value.inspect(self)
    }

    pub fn object(mut self, type_name: &str, description: &str) -> ObjectInspector<'a> {
        self.cx
            .call(|backend| backend.start_object(type_name, description));
        ObjectInspector::new(self.cx)
    }

    /// Opens an array whose elements are of type `value_type_name`.
    pub fn array(
        mut self,
        type_name: &str,
        value_type_name: &str,
        description: &str,
    ) -> ArrayInspector<'a> {
        self.cx
            .call(|backend| backend.start_array(type_name, value_type_name, description));
        ArrayInspector::new(self.cx)
    }

    /// Opens a string-keyed map whose values are of type `value_type_name`.
    pub fn map(
        mut self,
        type_name: &str,
        value_type_name: &str,
        description: &str,
    ) -> MapInspector<'a> {
        self.cx
            .call(|backend| backend.start_map(type_name, value_type_name, description));
        MapInspector::new(self.cx)
    }
}
