/// The kind of value a context or a generic [`Value`](crate::Value) declares itself as.
///
/// Every scalar shape has exactly one [`ScalarMut`](crate::ScalarMut) variant.
/// The container shapes (`Object`, `Array`, `Map`) are opened through the
/// corresponding context, and `Value` stands for a nested [`Inspectable`](crate::Inspectable).
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Shape {
    #[default]
    Invalid = 0,
    Int = 1,
    Int32 = 2,
    Int64 = 3,
    Float32 = 4,
    Float64 = 5,
    String = 6,
    ByteString = 7,
    Bytes = 8,
    Bool = 9,
    BigInt = 10,
    Rat = 11,
    BigFloat = 12,
    Object = 13,
    Array = 14,
    Value = 15,
    Map = 16,
}

const NAMES: [&str; 17] = [
    "invalid",
    "int",
    "int32",
    "int64",
    "float32",
    "float64",
    "string",
    "byte_string",
    "bytes",
    "bool",
    "big_int",
    "rat",
    "big_float",
    "object",
    "array",
    "value",
    "map",
];

impl Shape {
    /// Type name this enum is registered and documented under.
    pub const TYPE_NAME: &'static str = "inspect.typeid";

    /// Returns the shape for a tag byte, or `None` when the byte is out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use na_inspect::Shape;
    ///
    /// assert_eq!(Shape::from_u8(6), Some(Shape::String));
    /// assert_eq!(Shape::from_u8(17), None);
    /// ```
    pub const fn from_u8(value: u8) -> Option<Self> {
        if value <= Shape::Map as u8 {
            // SAFETY: `Shape` is `repr(u8)` with contiguous discriminants 0..=16.
            Some(unsafe { std::mem::transmute::<u8, Shape>(value) })
        } else {
            None
        }
    }

    /// Lower-case name used by text and documentation backends.
    pub const fn name(self) -> &'static str {
        NAMES[self as usize]
    }

    /// Parses a name produced by [`Shape::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .position(|n| *n == name)
            .and_then(|index| Shape::from_u8(index as u8))
    }

    /// Returns `true` for shapes that carry a single primitive value.
    ///
    /// ```
    /// use na_inspect::Shape;
    ///
    /// assert!(Shape::Rat.is_scalar());
    /// assert!(!Shape::Object.is_scalar());
    /// assert!(!Shape::Invalid.is_scalar());
    /// ```
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::Int32
                | Self::Int64
                | Self::Float32
                | Self::Float64
                | Self::String
                | Self::ByteString
                | Self::Bytes
                | Self::Bool
                | Self::BigInt
                | Self::Rat
                | Self::BigFloat
        )
    }

    /// Returns `true` for `Object`, `Array` and `Map`.
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Object | Self::Array | Self::Map)
    }
}

/// Formatting hint for floating point and arbitrary precision values.
///
/// `format` is one of `b'e'`, `b'E'`, `b'f'`, `b'g'`, `b'G'`; a negative
/// `precision` asks for the shortest text that round-trips.
/// Binary backends ignore it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FloatFormat {
    pub format: u8,
    pub precision: i32,
}

impl FloatFormat {
    pub const SHORTEST: FloatFormat = FloatFormat {
        format: b'g',
        precision: -1,
    };

    pub const fn new(format: u8, precision: i32) -> Self {
        Self { format, precision }
    }
}

impl Default for FloatFormat {
    fn default() -> Self {
        Self::SHORTEST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for tag in 0..=16u8 {
            let shape = Shape::from_u8(tag).unwrap();
            assert_eq!(Shape::from_name(shape.name()), Some(shape));
            assert_eq!(shape as u8, tag);
        }
        assert_eq!(Shape::from_name("nope"), None);
    }
}
