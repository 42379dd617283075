use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{
    Error, FloatFormat, Inspectable, Primitive, Registry, ScalarMut, ValueInspector, inspector::Cx,
};

/// A named-field aggregate.
///
/// Every field call takes the field name, a mandatory flag and a description.
/// A reading backend fails the session with [`Error::MandatoryFieldAbsent`]
/// for a missing mandatory field and leaves the slot untouched for a missing
/// optional one. Close with [`end`](ObjectInspector::end).
#[must_use = "an object must be closed with `end`"]
pub struct ObjectInspector<'a> {
    cx: Cx<'a>,
    fields: usize,
}

macro_rules! object_fields {
    ($($method:ident($ty:ty) => $variant:ident;)*) => {
        $(
            pub fn $method(&mut self, value: &mut $ty, name: &str, mandatory: bool, description: &str) {
                self.field_slot(ScalarMut::$variant(value), name, mandatory, description)
            }
        )*
    };
}

impl<'a> ObjectInspector<'a> {
    pub(crate) fn new(cx: Cx<'a>) -> Self {
        Self { cx, fields: 0 }
    }

    pub fn is_reading(&self) -> bool {
        self.cx.is_reading()
    }

    pub fn registry(&self) -> Option<&'a Registry> {
        self.cx.registry()
    }

    pub fn set_error(&mut self, error: Error) {
        self.cx.fail(error)
    }

    pub fn field_slot(
        &mut self,
        slot: ScalarMut<'_>,
        name: &str,
        mandatory: bool,
        description: &str,
    ) {
        self.fields += 1;
        self.cx
            .call(|backend| backend.object_field(slot, name, mandatory, description))
    }

    object_fields! {
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
        &mut self,
        value: &mut f32,
        format: u8,
        precision: i32,
        name: &str,
        mandatory: bool,
        description: &str,
    ) {
        let format = FloatFormat::new(format, precision);
        self.field_slot(ScalarMut::Float32(value, format), name, mandatory, description)
    }

    pub fn float64(
        &mut self,
        value: &mut f64,
        format: u8,
        precision: i32,
        name: &str,
        mandatory: bool,
        description: &str,
    ) {
        let format = FloatFormat::new(format, precision);
        self.field_slot(ScalarMut::Float64(value, format), name, mandatory, description)
    }

    pub fn rat(
        &mut self,
        value: &mut BigRational,
        precision: i32,
        name: &str,
        mandatory: bool,
        description: &str,
    ) {
        self.field_slot(ScalarMut::Rat(value, precision), name, mandatory, description)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn big_float(
        &mut self,
        value: &mut BigDecimal,
        format: u8,
        precision: i32,
        name: &str,
        mandatory: bool,
        description: &str,
    ) {
        let format = FloatFormat::new(format, precision);
        self.field_slot(ScalarMut::BigFloat(value, format), name, mandatory, description)
    }

    /// Any [`Primitive`] field, floats using [`FloatFormat::SHORTEST`].
    pub fn field<T: Primitive>(&mut self, value: &mut T, name: &str, mandatory: bool, description: &str) {
        self.field_slot(value.slot(FloatFormat::SHORTEST), name, mandatory, description)
    }

    /// A named nested value.
    ///
    /// Returns `None` when a reading backend reports an absent optional field,
    /// or when the session has already failed; callers skip the nested value
    /// in both cases.
    pub fn value(
        &mut self,
        name: &str,
        mandatory: bool,
        description: &str,
    ) -> Option<ValueInspector<'_>> {
        self.fields += 1;
        let present = self
            .cx
            .call(|backend| backend.object_value(name, mandatory, description));
        if present {
            Some(ValueInspector::new(self.cx.reborrow()))
        } else {
            None
        }
    }

    /// A named nested [`Inspectable`]; skipped when absent.
    pub fn inspect<T: Inspectable + ?Sized>(
        &mut self,
        value: &mut T,
        name: &str,
        mandatory: bool,
        description: &str,
    ) {
        if let Some(inspector) = self.value(name, mandatory, description) {
            value.inspect(inspector);
        }
    }

    pub fn end(mut self) {
        if self.cx.is_poisoned() {
            return;
        }
        log::trace!("closing object with {} fields", self.fields);
        self.cx.call(|backend| backend.end_object())
    }
}
