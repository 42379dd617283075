use std::{io::Write, marker::PhantomData};

use num_bigint::BigInt;
use zerocopy::byteorder;

use crate::{Backend, ByteOrder, Error, Result, ScalarMut, Shape, cold_path};

struct Frame {
    shape: Shape,
    count_at: usize,
    count: usize,
}

/// Writing backend for the tagged binary format.
///
/// Every value is a [`Shape`] tag byte followed by its payload. Objects and
/// maps hold a `u32` entry count and `(u16 name length, MUTF-8 name, value)`
/// entries; arrays hold a `u32` count and their values. Counts are patched
/// when the container is closed.
pub struct BinaryWriter<O: ByteOrder> {
    buf: Vec<u8>,
    stack: Vec<Frame>,
    marker: PhantomData<O>,
}

impl<O: ByteOrder> Default for BinaryWriter<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: ByteOrder> BinaryWriter<O> {
    pub fn new() -> Self {
        Self::with_capacity(128)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            stack: Vec::new(),
            marker: PhantomData,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    #[cfg(feature = "shared")]
    pub fn into_bytes(self) -> bytes::Bytes {
        bytes::Bytes::from(self.buf)
    }

    /// Copies the encoded bytes into `writer`.
    pub fn write_to(&self, mut writer: impl Write) -> Result<()> {
        writer.write_all(&self.buf).map_err(Error::IO)
    }

    #[inline]
    fn put_u16(&mut self, value: u16) {
        self.buf
            .extend_from_slice(&byteorder::U16::<O>::new(value).to_bytes());
    }

    #[inline]
    fn put_u32(&mut self, value: u32) {
        self.buf
            .extend_from_slice(&byteorder::U32::<O>::new(value).to_bytes());
    }

    #[inline]
    fn put_i32(&mut self, value: i32) {
        self.buf
            .extend_from_slice(&byteorder::I32::<O>::new(value).to_bytes());
    }

    #[inline]
    fn put_i64(&mut self, value: i64) {
        self.buf
            .extend_from_slice(&byteorder::I64::<O>::new(value).to_bytes());
    }

    fn put_len(&mut self, len: usize) -> Result<()> {
        match u32::try_from(len) {
            Ok(len) => {
                self.put_u32(len);
                Ok(())
            }
            Err(_) => {
                cold_path();
                Err(Error::ListTooLong(len))
            }
        }
    }

    fn put_payload(&mut self, payload: &[u8]) -> Result<()> {
        self.put_len(payload.len())?;
        self.buf.extend_from_slice(payload);
        Ok(())
    }

    fn put_name(&mut self, name: &str) -> Result<()> {
        let encoded = simd_cesu8::mutf8::encode(name);
        let Ok(len) = u16::try_from(encoded.len()) else {
            cold_path();
            return Err(Error::KeyTooLong(encoded.len()));
        };
        self.put_u16(len);
        self.buf.extend_from_slice(&encoded);
        Ok(())
    }

    fn put_big_int(&mut self, value: &BigInt) -> Result<()> {
        self.put_payload(&value.to_signed_bytes_be())
    }

    fn open(&mut self, shape: Shape) {
        self.buf.push(shape as u8);
        let count_at = self.buf.len();
        self.put_u32(0);
        self.stack.push(Frame {
            shape,
            count_at,
            count: 0,
        });
    }

    fn close(&mut self, shape: Shape) -> Result<()> {
        let frame = match self.stack.pop() {
            Some(frame) if frame.shape == shape => frame,
            Some(frame) => {
                cold_path();
                return Err(Error::ShapeMismatch {
                    expected: frame.shape,
                    actual: shape,
                });
            }
            None => {
                cold_path();
                return Err(Error::CallOrder("container closed without being opened"));
            }
        };
        let count = u32::try_from(frame.count).map_err(|_| Error::ListTooLong(frame.count))?;
        self.buf[frame.count_at..frame.count_at + 4]
            .copy_from_slice(&byteorder::U32::<O>::new(count).to_bytes());
        Ok(())
    }

    fn entry(&mut self, shape: Shape) -> Result<()> {
        match self.stack.last_mut() {
            Some(frame) if frame.shape == shape => {
                frame.count += 1;
                Ok(())
            }
            _ => {
                cold_path();
                Err(Error::CallOrder("entry written outside of its container"))
            }
        }
    }
}

impl<O: ByteOrder> Backend for BinaryWriter<O> {
    fn is_reading(&self) -> bool {
        false
    }

    fn value(&mut self, slot: ScalarMut<'_>, _type_name: &str, _description: &str) -> Result<()> {
        self.buf.push(slot.shape() as u8);
        match slot {
            ScalarMut::Int(value) => self.put_i64(*value as i64),
            ScalarMut::Int32(value) => self.put_i32(*value),
            ScalarMut::Int64(value) => self.put_i64(*value),
            ScalarMut::Float32(value, _) => self
                .buf
                .extend_from_slice(&byteorder::F32::<O>::new(*value).to_bytes()),
            ScalarMut::Float64(value, _) => self
                .buf
                .extend_from_slice(&byteorder::F64::<O>::new(*value).to_bytes()),
            ScalarMut::String(value) => {
                let encoded = simd_cesu8::mutf8::encode(value);
                self.put_payload(&encoded)?
            }
            ScalarMut::ByteString(value) | ScalarMut::Bytes(value) => self.put_payload(value)?,
            ScalarMut::Bool(value) => self.buf.push(*value as u8),
            ScalarMut::BigInt(value) => self.put_big_int(value)?,
            ScalarMut::Rat(value, _) => {
                self.put_big_int(value.numer())?;
                self.put_big_int(value.denom())?;
            }
            ScalarMut::BigFloat(value, _) => {
                let (digits, scale) = value.as_bigint_and_exponent();
                self.put_big_int(&digits)?;
                self.put_i64(scale);
            }
        }
        Ok(())
    }

    fn start_object(&mut self, _type_name: &str, _description: &str) -> Result<()> {
        self.open(Shape::Object);
        Ok(())
    }

    fn end_object(&mut self) -> Result<()> {
        self.close(Shape::Object)
    }

    fn object_value(&mut self, name: &str, _mandatory: bool, _description: &str) -> Result<bool> {
        self.entry(Shape::Object)?;
        self.put_name(name)?;
        Ok(true)
    }

    fn start_array(
        &mut self,
        _type_name: &str,
        _value_type_name: &str,
        _description: &str,
    ) -> Result<()> {
        self.open(Shape::Array);
        Ok(())
    }

    fn end_array(&mut self) -> Result<()> {
        self.close(Shape::Array)
    }

    fn array_len(&mut self, len: usize) -> Result<usize> {
        if len > u32::MAX as usize {
            cold_path();
            return Err(Error::ListTooLong(len));
        }
        Ok(len)
    }

    fn array_value(&mut self) -> Result<()> {
        self.entry(Shape::Array)
    }

    fn start_map(
        &mut self,
        _type_name: &str,
        _value_type_name: &str,
        _description: &str,
    ) -> Result<()> {
        self.open(Shape::Map);
        Ok(())
    }

    fn end_map(&mut self) -> Result<()> {
        self.close(Shape::Map)
    }

    fn map_len(&mut self, len: usize) -> Result<usize> {
        if len > u32::MAX as usize {
            cold_path();
            return Err(Error::ListTooLong(len));
        }
        Ok(len)
    }

    fn map_write_value(&mut self, key: &str) -> Result<()> {
        self.entry(Shape::Map)?;
        self.put_name(key)
    }
}
