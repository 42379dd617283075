use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{
    Error, FloatFormat, Primitive, Registry, ScalarMut, ValueInspector, inspector::Cx,
};

/// String-keyed pairs, exchanged sequentially.
///
/// The length is negotiated like an array's. A reading session then calls
/// [`next_key`](MapInspector::next_key) before each `read_*`; a writing
/// session calls `write_*` with the key. Duplicate keys overwrite on read.
///
/// ```
/// use std::collections::BTreeMap;
///
/// use na_inspect::{Inspectable, ValueInspector};
///
/// struct Counters(BTreeMap<String, i64>);
///
/// impl Inspectable for Counters {
///     fn inspect(&mut self, inspector: ValueInspector<'_>) {
///         let mut map = inspector.map("counters", "int64", "");
///         if map.is_reading() {
///             let len = map.get_length();
///             for _ in 0..len {
///                 let key = map.next_key();
///                 let value = map.read_int64();
///                 self.0.insert(key, value);
///             }
///         } else {
///             map.set_length(self.0.len());
///             for (key, value) in &self.0 {
///                 map.write_int64(key, *value);
///             }
///         }
///         map.end();
///     }
/// }
/// ```
#[must_use = "a map must be closed with `end`"]
pub struct MapInspector<'a> {
    cx: Cx<'a>,
    len: Option<usize>,
    pos: usize,
    key_pending: bool,
}

macro_rules! map_entries {
    ($($read:ident, $write:ident($ty:ty) => $variant:ident;)*) => {
        $(
            pub fn $read(&mut self) -> $ty {
                let mut value = <$ty>::default();
                self.read_slot(ScalarMut::$variant(&mut value));
                value
            }

            pub fn $write(&mut self, key: &str, mut value: $ty) {
                self.write_slot(key, ScalarMut::$variant(&mut value))
            }
        )*
    };
}

impl<'a> MapInspector<'a> {
    pub(crate) fn new(cx: Cx<'a>) -> Self {
        Self {
            cx,
            len: None,
            pos: 0,
            key_pending: false,
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

    /// Negotiates the entry count; see [`ArrayInspector::length`](crate::ArrayInspector::length).
    pub fn length(&mut self, len: usize) -> usize {
        if self.cx.is_poisoned() {
            return 0;
        }
        if self.len.is_some() {
            self.cx.fail(Error::CallOrder("map length negotiated twice"));
            return 0;
        }
        let len = self.cx.call(|backend| backend.map_len(len));
        if !self.cx.is_poisoned() {
            self.len = Some(len);
        }
        len
    }

    pub fn get_length(&mut self) -> usize {
        if !self.cx.expect_reading() {
            return 0;
        }
        self.length(0)
    }

    pub fn set_length(&mut self, len: usize) {
        if self.cx.expect_writing() {
            self.length(len);
        }
    }

    fn advance(&mut self) -> bool {
        match self.len {
            None => {
                self.cx.fail(Error::CallOrder(
                    "map entry accessed before its length was negotiated",
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

    /// Reads the key of the next entry. Must precede every value read.
    pub fn next_key(&mut self) -> String {
        if !self.cx.expect_reading() {
            return String::new();
        }
        if self.key_pending {
            self.cx
                .fail(Error::CallOrder("map key read before the previous value"));
            return String::new();
        }
        if !self.advance() {
            return String::new();
        }
        let key = self.cx.call(|backend| backend.map_next_key());
        self.key_pending = !self.cx.is_poisoned();
        key
    }

    fn take_key(&mut self) -> bool {
        if !self.cx.expect_reading() {
            return false;
        }
        if !self.key_pending {
            self.cx
                .fail(Error::CallOrder("map value read before its key"));
            return false;
        }
        self.key_pending = false;
        true
    }

    pub fn read_slot(&mut self, slot: ScalarMut<'_>) {
        if self.take_key() {
            self.cx.call(|backend| backend.map_read(slot))
        }
    }

    pub fn write_slot(&mut self, key: &str, slot: ScalarMut<'_>) {
        if self.cx.expect_writing() && self.advance() {
            self.cx.call(|backend| backend.map_write(key, slot))
        }
    }

    map_entries! {
        read_int, write_int(isize) => Int;
        read_int32, write_int32(i32) => Int32;
        read_int64, write_int64(i64) => Int64;
        read_string, write_string(String) => String;
        read_byte_string, write_byte_string(Vec<u8>) => ByteString;
        read_bytes, write_bytes(Vec<u8>) => Bytes;
        read_bool, write_bool(bool) => Bool;
        read_big_int, write_big_int(BigInt) => BigInt;
    }

    pub fn read_float32(&mut self, format: u8, precision: i32) -> f32 {
        let mut value = 0.0;
        self.read_slot(ScalarMut::Float32(&mut value, FloatFormat::new(format, precision)));
        value
    }

    pub fn write_float32(&mut self, key: &str, mut value: f32, format: u8, precision: i32) {
        self.write_slot(key, ScalarMut::Float32(&mut value, FloatFormat::new(format, precision)))
    }

    pub fn read_float64(&mut self, format: u8, precision: i32) -> f64 {
        let mut value = 0.0;
        self.read_slot(ScalarMut::Float64(&mut value, FloatFormat::new(format, precision)));
        value
    }

    pub fn write_float64(&mut self, key: &str, mut value: f64, format: u8, precision: i32) {
        self.write_slot(key, ScalarMut::Float64(&mut value, FloatFormat::new(format, precision)))
    }

    pub fn read_rat(&mut self, precision: i32) -> BigRational {
        let mut value = BigRational::default();
        self.read_slot(ScalarMut::Rat(&mut value, precision));
        value
    }

    pub fn write_rat(&mut self, key: &str, mut value: BigRational, precision: i32) {
        self.write_slot(key, ScalarMut::Rat(&mut value, precision))
    }

    pub fn read_big_float(&mut self, format: u8, precision: i32) -> BigDecimal {
        let mut value = BigDecimal::default();
        self.read_slot(ScalarMut::BigFloat(&mut value, FloatFormat::new(format, precision)));
        value
    }

    pub fn write_big_float(&mut self, key: &str, mut value: BigDecimal, format: u8, precision: i32) {
        self.write_slot(key, ScalarMut::BigFloat(&mut value, FloatFormat::new(format, precision)))
    }

    /// Reads any [`Primitive`] value, floats using [`FloatFormat::SHORTEST`].
    pub fn read<T: Primitive>(&mut self) -> T {
        let mut value = T::default();
        self.read_slot(value.slot(FloatFormat::SHORTEST));
        value
    }

    pub fn write<T: Primitive>(&mut self, key: &str, mut value: T) {
        self.write_slot(key, value.slot(FloatFormat::SHORTEST))
    }

    /// The value of the entry whose key was just read, as a nested context.
    pub fn read_value(&mut self) -> ValueInspector<'_> {
        if self.take_key() {
            self.cx.call(|backend| backend.map_read_value());
        }
        ValueInspector::new(self.cx.reborrow())
    }

    /// Writes `key` and returns its value as a nested context.
    pub fn write_value(&mut self, key: &str) -> ValueInspector<'_> {
        if self.cx.expect_writing() && self.advance() {
            self.cx.call(|backend| backend.map_write_value(key));
        }
        ValueInspector::new(self.cx.reborrow())
    }

    pub fn end(mut self) {
        if self.cx.is_poisoned() {
            return;
        }
        if self.key_pending {
            self.cx
                .fail(Error::CallOrder("map closed with an unread value"));
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
        self.cx.call(|backend| backend.end_map())
    }
}
