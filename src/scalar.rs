use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{FloatFormat, Shape};

/// A mutable slot for one scalar value, handed from a context to a [`Backend`](crate::Backend).
///
/// Writing backends read the slot; reading backends overwrite it.
#[derive(Debug)]
pub enum ScalarMut<'a> {
    Int(&'a mut isize),
    Int32(&'a mut i32),
    Int64(&'a mut i64),
    Float32(&'a mut f32, FloatFormat),
    Float64(&'a mut f64, FloatFormat),
    String(&'a mut String),
    ByteString(&'a mut Vec<u8>),
    Bytes(&'a mut Vec<u8>),
    Bool(&'a mut bool),
    BigInt(&'a mut BigInt),
    /// Rational with its decimal precision hint; negative means exact `n/d` text.
    Rat(&'a mut BigRational, i32),
    BigFloat(&'a mut BigDecimal, FloatFormat),
}

impl ScalarMut<'_> {
    pub const fn shape(&self) -> Shape {
        match self {
            ScalarMut::Int(_) => Shape::Int,
            ScalarMut::Int32(_) => Shape::Int32,
            ScalarMut::Int64(_) => Shape::Int64,
            ScalarMut::Float32(..) => Shape::Float32,
            ScalarMut::Float64(..) => Shape::Float64,
            ScalarMut::String(_) => Shape::String,
            ScalarMut::ByteString(_) => Shape::ByteString,
            ScalarMut::Bytes(_) => Shape::Bytes,
            ScalarMut::Bool(_) => Shape::Bool,
            ScalarMut::BigInt(_) => Shape::BigInt,
            ScalarMut::Rat(..) => Shape::Rat,
            ScalarMut::BigFloat(..) => Shape::BigFloat,
        }
    }

    /// Reborrows the slot for a shorter lifetime.
    pub fn reborrow(&mut self) -> ScalarMut<'_> {
        match self {
            ScalarMut::Int(v) => ScalarMut::Int(v),
            ScalarMut::Int32(v) => ScalarMut::Int32(v),
            ScalarMut::Int64(v) => ScalarMut::Int64(v),
            ScalarMut::Float32(v, f) => ScalarMut::Float32(v, *f),
            ScalarMut::Float64(v, f) => ScalarMut::Float64(v, *f),
            ScalarMut::String(v) => ScalarMut::String(v),
            ScalarMut::ByteString(v) => ScalarMut::ByteString(v),
            ScalarMut::Bytes(v) => ScalarMut::Bytes(v),
            ScalarMut::Bool(v) => ScalarMut::Bool(v),
            ScalarMut::BigInt(v) => ScalarMut::BigInt(v),
            ScalarMut::Rat(v, p) => ScalarMut::Rat(v, *p),
            ScalarMut::BigFloat(v, f) => ScalarMut::BigFloat(v, *f),
        }
    }
}

mod private {
    pub trait Sealed {}
}

/// Rust types that map onto exactly one scalar [`Shape`].
///
/// `Vec<u8>` is deliberately absent: it could be either a
/// [`Shape::ByteString`] or a [`Shape::Bytes`], so callers name the shape
/// through the typed context methods instead.
pub trait Primitive: private::Sealed + Default + 'static {
    const SHAPE: Shape;

    fn slot(&mut self, format: FloatFormat) -> ScalarMut<'_>;
}

macro_rules! define_primitive {
    ($ty:ty, $shape:ident, |$v:ident, $f:ident| $slot:expr) => {
        impl private::Sealed for $ty {}

        impl Primitive for $ty {
            const SHAPE: Shape = Shape::$shape;

            #[inline]
            fn slot(&mut self, $f: FloatFormat) -> ScalarMut<'_> {
                let $v = self;
                $slot
            }
        }
    };
}

define_primitive!(isize, Int, |v, _f| ScalarMut::Int(v));
define_primitive!(i32, Int32, |v, _f| ScalarMut::Int32(v));
define_primitive!(i64, Int64, |v, _f| ScalarMut::Int64(v));
define_primitive!(f32, Float32, |v, f| ScalarMut::Float32(v, f));
define_primitive!(f64, Float64, |v, f| ScalarMut::Float64(v, f));
define_primitive!(String, String, |v, _f| ScalarMut::String(v));
define_primitive!(bool, Bool, |v, _f| ScalarMut::Bool(v));
define_primitive!(BigInt, BigInt, |v, _f| ScalarMut::BigInt(v));
define_primitive!(BigRational, Rat, |v, f| ScalarMut::Rat(v, f.precision));
define_primitive!(BigDecimal, BigFloat, |v, f| ScalarMut::BigFloat(v, f));
