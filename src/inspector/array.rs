use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{
    Error, FloatFormat, Primitive, Registry, ScalarMut, ValueInspector, inspector::Cx,
};

/// An ordered, homogeneous sequence.
///
/// Negotiate the length first with [`length`](ArrayInspector::length) (or
/// [`get_length`](ArrayInspector::get_length) /
/// [`set_length`](ArrayInspector::set_length)), then visit exactly that many
/// elements in order and call [`end`](ArrayInspector::end).
///
/// ```
/// use na_inspect::{Inspectable, ValueInspector};
///
/// struct Numbers(Vec<i64>);
///
/// impl Inspectable for Numbers {
///     fn inspect(&mut self, inspector: ValueInspector<'_>) {
///         let mut array = inspector.array("numbers", "int64", "");
///         let len = array.length(self.0.len());
///         if array.is_reading() {
///             self.0.resize(len, 0);
///         }
///         for n in &mut self.0 {
///             array.int64(n);
///         }
///         array.end();
///     }
/// }
/// ```
#[must_use = "an array must be closed with `end`"]
pub struct ArrayInspector<'a> {
    cx: Cx<'a>,
    len: Option<usize>,
    pos: usize,
}

macro_rules! array_elements {
    ($($method:ident($ty:ty) => $variant:ident;)*) => {
        $(
            pub fn $method(&mut self, value: &mut $ty) {
                self.element(ScalarMut::$variant(value))
            }
        )*
    };
}

impl<'a> ArrayInspector<'a> {
    pub(crate) fn new(cx: Cx<'a>) -> Self {
        Self {
            cx,
            len: None,
            pos: 0,
        }
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

    /// Negotiates the element count.
    ///
    /// When writing, `len` is the count that gets written and is returned
    /// unchanged. When reading, `len` is ignored and the count found in the
    /// payload is returned; resize the backing storage to it.
    pub fn length(&mut self, len: usize) -> usize {
        if self.cx.is_poisoned() {
            return 0;
        }
        if self.len.is_some() {
            self.cx.fail(Error::CallOrder("array length negotiated twice"));
            return 0;
        }
        let len = self.cx.call(|backend| backend.array_len(len));
        if !self.cx.is_poisoned() {
            self.len = Some(len);
        }
        len
    }

    /// Reading-side form of [`length`](ArrayInspector::length).
    pub fn get_length(&mut self) -> usize {
        if !self.cx.expect_reading() {
            return 0;
        }
        self.length(0)
    }

    /// Writing-side form of [`length`](ArrayInspector::length).
    pub fn set_length(&mut self, len: usize) {
        if self.cx.expect_writing() {
            self.length(len);
        }
    }

    fn advance(&mut self) -> bool {
        if self.cx.is_poisoned() {
            return false;
        }
        match self.len {
            None => {
                self.cx.fail(Error::CallOrder(
                    "array element accessed before its length was negotiated",
                ));
                false
            }
            Some(len) if self.pos >= len => {
                self.cx.fail(Error::LengthMismatch {
                    declared: len,
                    actual: self.pos + 1,
                });
                false
            }
            Some(_) => {
                self.pos += 1;
                true
            }
        }
    }

    pub fn element(&mut self, slot: ScalarMut<'_>) {
        if self.advance() {
            self.cx.call(|backend| backend.array_element(slot))
        }
    }

    array_elements! {
        int(isize) => Int;
        int32(i32) => Int32;
        int64(i64) => Int64;
        string(String) => String;
        byte_string(Vec<u8>) => ByteString;
        bytes(Vec<u8>) => Bytes;
        bool(bool) => Bool;
        big_int(BigInt) => BigInt;
    }

    pub fn float32(&mut self, value: &mut f32, format: u8, precision: i32) {
        self.element(ScalarMut::Float32(value, FloatFormat::new(format, precision)))
    }

    pub fn float64(&mut self, value: &mut f64, format: u8, precision: i32) {
        self.element(ScalarMut::Float64(value, FloatFormat::new(format, precision)))
    }

    pub fn rat(&mut self, value: &mut BigRational, precision: i32) {
        self.element(ScalarMut::Rat(value, precision))
    }

    pub fn big_float(&mut self, value: &mut BigDecimal, format: u8, precision: i32) {
        self.element(ScalarMut::BigFloat(value, FloatFormat::new(format, precision)))
    }

    pub fn primitive<T: Primitive>(&mut self, value: &mut T) {
        self.element(value.slot(FloatFormat::SHORTEST))
    }

    /// The next element as a nested context.
    pub fn value(&mut self) -> ValueInspector<'_> {
        if self.advance() {
            self.cx.call(|backend| backend.array_value());
        }
        ValueInspector::new(self.cx.reborrow())
    }

    pub fn end(mut self) {
        if self.cx.is_poisoned() {
            return;
        }
        let declared = self.len.unwrap_or(0);
        if self.pos != declared {
            self.cx.fail(Error::LengthMismatch {
                declared,
                actual: self.pos,
            });
            return;
        }
        self.cx.call(|backend| backend.end_array())
    }
}
