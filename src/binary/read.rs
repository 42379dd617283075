use std::{collections::HashMap, marker::PhantomData};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use zerocopy::byteorder;

use crate::{Backend, ByteOrder, Error, ReaderConfig, Result, ScalarMut, Shape, cold_path};

/// Bounds-checked forward cursor over an encoded buffer.
struct Cursor<'de, O: ByteOrder> {
    data: &'de [u8],
    pos: usize,
    config: ReaderConfig,
    marker: PhantomData<O>,
}

macro_rules! read_number {
    ($($name:ident -> $ty:ty : $wire:ident[$size:literal];)*) => {
        $(
            #[inline]
            fn $name(&mut self) -> Result<$ty> {
                let mut raw = [0u8; $size];
                raw.copy_from_slice(self.take($size)?);
                Ok(byteorder::$wire::<O>::from_bytes(raw).get())
            }
        )*
    };
}

impl<'de, O: ByteOrder> Cursor<'de, O> {
    fn new(data: &'de [u8], pos: usize, config: ReaderConfig) -> Self {
        Self {
            data,
            pos,
            config,
            marker: PhantomData,
        }
    }

    #[inline]
    fn take(&mut self, len: usize) -> Result<&'de [u8]> {
        match self.pos.checked_add(len) {
            Some(end) if end <= self.data.len() => {
                let bytes = &self.data[self.pos..end];
                self.pos = end;
                Ok(bytes)
            }
            _ => {
                cold_path();
                Err(Error::EndOfFile)
            }
        }
    }

    #[inline]
    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    read_number! {
        u16 -> u16 : U16[2];
        u32 -> u32 : U32[4];
        i32 -> i32 : I32[4];
        i64 -> i64 : I64[8];
        f32 -> f32 : F32[4];
        f64 -> f64 : F64[8];
    }

    fn shape(&mut self) -> Result<Shape> {
        let tag = self.u8()?;
        Shape::from_u8(tag).ok_or_else(|| {
            cold_path();
            Error::InvalidShape(tag)
        })
    }

    /// Element count of a container, checked against the configured limit.
    fn count(&mut self) -> Result<usize> {
        let count = self.u32()? as usize;
        if count > self.config.max_len {
            cold_path();
            return Err(Error::ListTooLong(count));
        }
        Ok(count)
    }

    fn payload(&mut self) -> Result<&'de [u8]> {
        let len = self.u32()? as usize;
        self.take(len)
    }

    fn name(&mut self) -> Result<String> {
        let len = self.u16()? as usize;
        Ok(simd_cesu8::mutf8::decode_lossy(self.take(len)?).into_owned())
    }

    fn big_int(&mut self) -> Result<BigInt> {
        Ok(BigInt::from_signed_bytes_be(self.payload()?))
    }

    fn skip_value(&mut self, depth: usize) -> Result<()> {
        let shape = self.shape()?;
        self.skip_payload(shape, depth)
    }

    fn skip_payload(&mut self, shape: Shape, depth: usize) -> Result<()> {
        match shape {
            Shape::Bool => {
                self.take(1)?;
            }
            Shape::Int32 | Shape::Float32 => {
                self.take(4)?;
            }
            Shape::Int | Shape::Int64 | Shape::Float64 => {
                self.take(8)?;
            }
            Shape::String | Shape::ByteString | Shape::Bytes | Shape::BigInt => {
                self.payload()?;
            }
            Shape::Rat => {
                self.payload()?;
                self.payload()?;
            }
            Shape::BigFloat => {
                self.payload()?;
                self.take(8)?;
            }
            Shape::Object | Shape::Map => {
                if depth >= self.config.max_depth {
                    cold_path();
                    return Err(Error::DepthLimitExceeded(depth));
                }
                for _ in 0..self.count()? {
                    let len = self.u16()? as usize;
                    self.take(len)?;
                    self.skip_value(depth + 1)?;
                }
            }
            Shape::Array => {
                if depth >= self.config.max_depth {
                    cold_path();
                    return Err(Error::DepthLimitExceeded(depth));
                }
                for _ in 0..self.count()? {
                    self.skip_value(depth + 1)?;
                }
            }
            Shape::Invalid | Shape::Value => {
                cold_path();
                return Err(Error::InvalidShape(shape as u8));
            }
        }
        Ok(())
    }

    fn invalid(&self, expected: &'static str) -> Error {
        Error::InvalidValue {
            expected,
            path: format!("offset {}", self.pos),
        }
    }
}

enum Frame {
    Object {
        fields: HashMap<String, usize>,
    },
    Array {
        len: usize,
        read: usize,
        next: usize,
    },
    Map {
        len: usize,
        read: usize,
        next: usize,
        value_at: Option<usize>,
    },
}

/// Reading backend for the format produced by [`BinaryWriter`](crate::BinaryWriter).
///
/// The whole buffer is validated on construction, including the depth and
/// length limits of [`ReaderConfig`] and the absence of trailing bytes.
/// Object fields are indexed by name, so their order in the payload does not
/// matter; array elements and map entries are read in order.
pub struct BinaryReader<'de, O: ByteOrder> {
    data: &'de [u8],
    config: ReaderConfig,
    pending: Option<usize>,
    stack: Vec<Frame>,
    marker: PhantomData<O>,
}

impl<'de, O: ByteOrder> BinaryReader<'de, O> {
    pub fn new(data: &'de [u8]) -> Result<Self> {
        Self::with_config(data, ReaderConfig::default())
    }

    pub fn with_config(data: &'de [u8], config: ReaderConfig) -> Result<Self> {
        let mut cursor = Cursor::<O>::new(data, 0, config);
        cursor.skip_value(0)?;
        if cursor.pos != data.len() {
            cold_path();
            log::debug!("rejecting {} trailing bytes", data.len() - cursor.pos);
            return Err(Error::TrailingData(data.len() - cursor.pos));
        }
        Ok(Self {
            data,
            config,
            pending: Some(0),
            stack: Vec::new(),
            marker: PhantomData,
        })
    }

    fn cursor(&self, pos: usize) -> Cursor<'de, O> {
        Cursor::new(self.data, pos, self.config)
    }

    /// Takes the pending value and checks its tag against `expected`.
    fn open(&mut self, expected: Shape) -> Result<Cursor<'de, O>> {
        let Some(pos) = self.pending.take() else {
            cold_path();
            return Err(Error::CallOrder("no value is pending"));
        };
        let mut cursor = self.cursor(pos);
        let actual = cursor.shape()?;
        if actual != expected {
            cold_path();
            return Err(Error::ShapeMismatch { expected, actual });
        }
        Ok(cursor)
    }

    fn push(&mut self, frame: Frame) -> Result<()> {
        if self.stack.len() >= self.config.max_depth {
            cold_path();
            return Err(Error::DepthLimitExceeded(self.stack.len()));
        }
        self.stack.push(frame);
        Ok(())
    }

    fn pop(&mut self, shape: Shape) -> Result<()> {
        let matches = matches!(
            (self.stack.last(), shape),
            (Some(Frame::Object { .. }), Shape::Object)
                | (Some(Frame::Array { .. }), Shape::Array)
                | (Some(Frame::Map { .. }), Shape::Map)
        );
        if !matches {
            cold_path();
            return Err(Error::CallOrder("container closed without being opened"));
        }
        self.stack.pop();
        Ok(())
    }

    /// Skips one element at `next`, returning its start and advancing `next`.
    ///
    /// Fails once `read` reaches `len`.
    fn step(
        data: &'de [u8],
        config: ReaderConfig,
        (len, read): (usize, &mut usize),
        next: &mut usize,
    ) -> Result<usize> {
        if *read >= len {
            cold_path();
            return Err(Error::EndOfFile);
        }
        *read += 1;
        let start = *next;
        let mut cursor = Cursor::<O>::new(data, start, config);
        cursor.skip_value(0)?;
        *next = cursor.pos;
        Ok(start)
    }
}

impl<'de, O: ByteOrder> Backend for BinaryReader<'de, O> {
    fn is_reading(&self) -> bool {
        true
    }

    fn value(&mut self, slot: ScalarMut<'_>, _type_name: &str, _description: &str) -> Result<()> {
        let mut cursor = self.open(slot.shape())?;
        match slot {
            ScalarMut::Int(value) => {
                let wide = cursor.i64()?;
                *value = isize::try_from(wide).map_err(|_| cursor.invalid("int"))?;
            }
            ScalarMut::Int32(value) => *value = cursor.i32()?,
            ScalarMut::Int64(value) => *value = cursor.i64()?,
            ScalarMut::Float32(value, _) => *value = cursor.f32()?,
            ScalarMut::Float64(value, _) => *value = cursor.f64()?,
            ScalarMut::String(value) => {
                *value = simd_cesu8::mutf8::decode_lossy(cursor.payload()?).into_owned();
            }
            ScalarMut::ByteString(value) | ScalarMut::Bytes(value) => {
                value.clear();
                value.extend_from_slice(cursor.payload()?);
            }
            ScalarMut::Bool(value) => *value = cursor.u8()? != 0,
            ScalarMut::BigInt(value) => *value = cursor.big_int()?,
            ScalarMut::Rat(value, _) => {
                let numerator = cursor.big_int()?;
                let denominator = cursor.big_int()?;
                if denominator.is_zero() {
                    cold_path();
                    return Err(cursor.invalid("rat"));
                }
                *value = BigRational::new(numerator, denominator);
            }
            ScalarMut::BigFloat(value, _) => {
                let digits = cursor.big_int()?;
                let scale = cursor.i64()?;
                *value = BigDecimal::new(digits, scale);
            }
        }
        Ok(())
    }

    fn start_object(&mut self, _type_name: &str, _description: &str) -> Result<()> {
        let mut cursor = self.open(Shape::Object)?;
        let count = cursor.count()?;
        let mut fields = HashMap::with_capacity(count.min(64));
        for _ in 0..count {
            let name = cursor.name()?;
            fields.insert(name, cursor.pos);
            cursor.skip_value(0)?;
        }
        self.push(Frame::Object { fields })
    }

    fn end_object(&mut self) -> Result<()> {
        self.pop(Shape::Object)
    }

    fn object_value(&mut self, name: &str, mandatory: bool, _description: &str) -> Result<bool> {
        let Some(Frame::Object { fields }) = self.stack.last() else {
            cold_path();
            return Err(Error::CallOrder("field read outside of an object"));
        };
        match fields.get(name) {
            Some(&pos) => {
                self.pending = Some(pos);
                Ok(true)
            }
            None if mandatory => {
                cold_path();
                Err(Error::MandatoryFieldAbsent(name.to_owned()))
            }
            None => Ok(false),
        }
    }

    fn start_array(
        &mut self,
        _type_name: &str,
        _value_type_name: &str,
        _description: &str,
    ) -> Result<()> {
        let mut cursor = self.open(Shape::Array)?;
        let len = cursor.count()?;
        self.push(Frame::Array {
            len,
            read: 0,
            next: cursor.pos,
        })
    }

    fn end_array(&mut self) -> Result<()> {
        self.pop(Shape::Array)
    }

    fn array_len(&mut self, _len: usize) -> Result<usize> {
        match self.stack.last() {
            Some(Frame::Array { len, .. }) => Ok(*len),
            _ => {
                cold_path();
                Err(Error::CallOrder("array length read outside of an array"))
            }
        }
    }

    fn array_value(&mut self) -> Result<()> {
        let (data, config) = (self.data, self.config);
        let Some(Frame::Array { len, read, next }) = self.stack.last_mut() else {
            cold_path();
            return Err(Error::CallOrder("element read outside of an array"));
        };
        let start = Self::step(data, config, (*len, read), next)?;
        self.pending = Some(start);
        Ok(())
    }

    fn start_map(
        &mut self,
        _type_name: &str,
        _value_type_name: &str,
        _description: &str,
    ) -> Result<()> {
        let mut cursor = self.open(Shape::Map)?;
        let len = cursor.count()?;
        self.push(Frame::Map {
            len,
            read: 0,
            next: cursor.pos,
            value_at: None,
        })
    }

    fn end_map(&mut self) -> Result<()> {
        self.pop(Shape::Map)
    }

    fn map_len(&mut self, _len: usize) -> Result<usize> {
        match self.stack.last() {
            Some(Frame::Map { len, .. }) => Ok(*len),
            _ => {
                cold_path();
                Err(Error::CallOrder("map length read outside of a map"))
            }
        }
    }

    fn map_next_key(&mut self) -> Result<String> {
        let (data, config) = (self.data, self.config);
        let Some(Frame::Map {
            len,
            read,
            next,
            value_at,
        }) = self.stack.last_mut()
        else {
            cold_path();
            return Err(Error::CallOrder("key read outside of a map"));
        };
        if *read >= *len {
            cold_path();
            return Err(Error::EndOfFile);
        }
        let mut cursor = Cursor::<O>::new(data, *next, config);
        let key = cursor.name()?;
        *next = cursor.pos;
        *value_at = Some(Self::step(data, config, (*len, read), next)?);
        Ok(key)
    }

    fn map_read_value(&mut self) -> Result<()> {
        let Some(Frame::Map { value_at, .. }) = self.stack.last_mut() else {
            cold_path();
            return Err(Error::CallOrder("value read outside of a map"));
        };
        match value_at.take() {
            Some(pos) => {
                self.pending = Some(pos);
                Ok(())
            }
            None => {
                cold_path();
                Err(Error::CallOrder("map value read before its key"))
            }
        }
    }
}
