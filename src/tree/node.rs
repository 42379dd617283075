use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{Error, Result, ScalarMut, Shape};

/// An owned value tree, one variant per [`Shape`].
///
/// Objects and maps keep their entries in insertion order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Int(i64),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    ByteString(Vec<u8>),
    Bytes(Vec<u8>),
    Bool(bool),
    BigInt(BigInt),
    Rat(BigRational),
    BigFloat(BigDecimal),
    Object(Vec<(String, Node)>),
    Array(Vec<Node>),
    Map(Vec<(String, Node)>),
}

impl Node {
    pub const fn shape(&self) -> Shape {
        match self {
            Node::Int(_) => Shape::Int,
            Node::Int32(_) => Shape::Int32,
            Node::Int64(_) => Shape::Int64,
            Node::Float32(_) => Shape::Float32,
            Node::Float64(_) => Shape::Float64,
            Node::String(_) => Shape::String,
            Node::ByteString(_) => Shape::ByteString,
            Node::Bytes(_) => Shape::Bytes,
            Node::Bool(_) => Shape::Bool,
            Node::BigInt(_) => Shape::BigInt,
            Node::Rat(_) => Shape::Rat,
            Node::BigFloat(_) => Shape::BigFloat,
            Node::Object(_) => Shape::Object,
            Node::Array(_) => Shape::Array,
            Node::Map(_) => Shape::Map,
        }
    }

    /// Looks up an object field or map entry by name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Object(entries) | Node::Map(entries) => entries
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    /// Element `index` of an array.
    pub fn at(&self, index: usize) -> Option<&Node> {
        match self {
            Node::Array(elements) => elements.get(index),
            _ => None,
        }
    }

    /// Any of the fixed width integer variants, widened.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Int(v) | Node::Int64(v) => Some(*v),
            Node::Int32(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Either float variant, widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Float32(v) => Some(*v as f64),
            Node::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(v) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn from_slot(slot: &ScalarMut<'_>) -> Self {
        match slot {
            ScalarMut::Int(v) => Node::Int(**v as i64),
            ScalarMut::Int32(v) => Node::Int32(**v),
            ScalarMut::Int64(v) => Node::Int64(**v),
            ScalarMut::Float32(v, _) => Node::Float32(**v),
            ScalarMut::Float64(v, _) => Node::Float64(**v),
            ScalarMut::String(v) => Node::String((**v).clone()),
            ScalarMut::ByteString(v) => Node::ByteString((**v).clone()),
            ScalarMut::Bytes(v) => Node::Bytes((**v).clone()),
            ScalarMut::Bool(v) => Node::Bool(**v),
            ScalarMut::BigInt(v) => Node::BigInt((**v).clone()),
            ScalarMut::Rat(v, _) => Node::Rat((**v).clone()),
            ScalarMut::BigFloat(v, _) => Node::BigFloat((**v).clone()),
        }
    }

    /// Moves a scalar node into `slot`.
    ///
    /// Integer slots accept any integer node that fits; float slots accept
    /// either float node. Everything else must match exactly.
    pub(crate) fn store(self, slot: ScalarMut<'_>) -> Result<()> {
        let mismatch = Error::ShapeMismatch {
            expected: slot.shape(),
            actual: self.shape(),
        };
        match (slot, self) {
            (ScalarMut::Int(s), node) => {
                *s = node
                    .as_i64()
                    .and_then(|v| isize::try_from(v).ok())
                    .ok_or(mismatch)?
            }
            (ScalarMut::Int32(s), node) => {
                *s = node
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or(mismatch)?
            }
            (ScalarMut::Int64(s), node) => *s = node.as_i64().ok_or(mismatch)?,
            (ScalarMut::Float32(s, _), node) => *s = node.as_f64().ok_or(mismatch)? as f32,
            (ScalarMut::Float64(s, _), node) => *s = node.as_f64().ok_or(mismatch)?,
            (ScalarMut::String(s), Node::String(v)) => *s = v,
            (ScalarMut::ByteString(s), Node::ByteString(v)) => *s = v,
            (ScalarMut::Bytes(s), Node::Bytes(v)) => *s = v,
            (ScalarMut::Bool(s), Node::Bool(v)) => *s = v,
            (ScalarMut::BigInt(s), Node::BigInt(v)) => *s = v,
            (ScalarMut::Rat(s, _), Node::Rat(v)) => *s = v,
            (ScalarMut::BigFloat(s, _), Node::BigFloat(v)) => *s = v,
            _ => return Err(mismatch),
        }
        Ok(())
    }
}

macro_rules! node_from {
    ($($ty:ty => $variant:ident,)*) => {
        $(
            impl From<$ty> for Node {
                #[inline]
                fn from(value: $ty) -> Self {
                    Node::$variant(value)
                }
            }
        )*
    };
}

node_from! {
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    bool => Bool,
    BigInt => BigInt,
    BigRational => Rat,
    BigDecimal => BigFloat,
    Vec<Node> => Array,
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_owned())
    }
}
