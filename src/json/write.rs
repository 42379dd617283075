use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{
    Backend, Error, Result, ScalarMut,
    number::{format_big_float, format_f32, format_f64, format_rat},
};

/// Writing backend producing compact JSON text.
///
/// Objects and maps become JSON objects, arrays JSON arrays. Integers and
/// finite floats are numbers; non-finite floats, arbitrary precision numbers
/// and byte-strings are strings; bytes are unpadded URL-safe base64.
///
/// Byte-strings must be valid UTF-8. Anything else fails with
/// [`Error::InvalidValue`]; use bytes for binary data.
#[derive(Default)]
pub struct JsonWriter {
    out: String,
    stack: Vec<Level>,
    root_written: bool,
}

/// An open container.
struct Level {
    array: bool,
    entries: usize,
    /// Key of the latest object or map entry.
    key: String,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn separator(&mut self) {
        if let Some(level) = self.stack.last_mut() {
            if level.entries > 0 {
                self.out.push(',');
            }
            level.entries += 1;
        }
    }

    /// JSON path of the value being written.
    fn path(&self) -> String {
        let mut path = "$".to_owned();
        for level in &self.stack {
            if level.array {
                path.push('[');
                path.push_str(&level.entries.saturating_sub(1).to_string());
                path.push(']');
            } else {
                path.push('.');
                path.push_str(&level.key);
            }
        }
        path
    }

    fn begin_value(&mut self) -> Result<()> {
        if self.stack.is_empty() {
            if self.root_written {
                return Err(Error::CallOrder("more than one root value"));
            }
            self.root_written = true;
        }
        Ok(())
    }

    fn push_string(&mut self, value: &str) -> Result<()> {
        self.out.push_str(&serde_json::to_string(value)?);
        Ok(())
    }

    fn push_key(&mut self, key: &str) -> Result<()> {
        self.separator();
        if let Some(level) = self.stack.last_mut() {
            level.key.clear();
            level.key.push_str(key);
        }
        self.push_string(key)?;
        self.out.push(':');
        Ok(())
    }

    fn push_float(&mut self, text: String) -> Result<()> {
        if text.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
            self.push_string(&text)
        } else {
            self.out.push_str(&text);
            Ok(())
        }
    }

    fn open(&mut self, bracket: char) -> Result<()> {
        self.begin_value()?;
        self.out.push(bracket);
        self.stack.push(Level {
            array: bracket == '[',
            entries: 0,
            key: String::new(),
        });
        Ok(())
    }

    fn close(&mut self, bracket: char) -> Result<()> {
        if self.stack.pop().is_none() {
            return Err(Error::CallOrder("container closed without being opened"));
        }
        self.out.push(bracket);
        Ok(())
    }
}

impl Backend for JsonWriter {
    fn is_reading(&self) -> bool {
        false
    }

    fn value(&mut self, slot: ScalarMut<'_>, _type_name: &str, _description: &str) -> Result<()> {
        self.begin_value()?;
        match slot {
            ScalarMut::Int(value) => self.out.push_str(&value.to_string()),
            ScalarMut::Int32(value) => self.out.push_str(&value.to_string()),
            ScalarMut::Int64(value) => self.out.push_str(&value.to_string()),
            ScalarMut::Float32(value, format) => self.push_float(format_f32(*value, format))?,
            ScalarMut::Float64(value, format) => self.push_float(format_f64(*value, format))?,
            ScalarMut::String(value) => self.push_string(value)?,
            ScalarMut::ByteString(value) => match std::str::from_utf8(value) {
                Ok(text) => self.push_string(text)?,
                Err(_) => {
                    return Err(Error::InvalidValue {
                        expected: "utf-8 byte string",
                        path: self.path(),
                    });
                }
            },
            ScalarMut::Bytes(value) => self.push_string(&URL_SAFE_NO_PAD.encode(value))?,
            ScalarMut::Bool(value) => self.out.push_str(if *value { "true" } else { "false" }),
            ScalarMut::BigInt(value) => self.push_string(&value.to_string())?,
            ScalarMut::Rat(value, precision) => self.push_string(&format_rat(value, precision))?,
            ScalarMut::BigFloat(value, format) => {
                self.push_string(&format_big_float(value, format))?
            }
        }
        Ok(())
    }

    fn start_object(&mut self, _type_name: &str, _description: &str) -> Result<()> {
        self.open('{')
    }

    fn end_object(&mut self) -> Result<()> {
        self.close('}')
    }

    fn object_value(&mut self, name: &str, _mandatory: bool, _description: &str) -> Result<bool> {
        self.push_key(name)?;
        Ok(true)
    }

    fn start_array(
        &mut self,
        _type_name: &str,
        _value_type_name: &str,
        _description: &str,
    ) -> Result<()> {
        self.open('[')
    }

    fn end_array(&mut self) -> Result<()> {
        self.close(']')
    }

    fn array_len(&mut self, len: usize) -> Result<usize> {
        Ok(len)
    }

    fn array_value(&mut self) -> Result<()> {
        self.separator();
        Ok(())
    }

    fn start_map(
        &mut self,
        _type_name: &str,
        _value_type_name: &str,
        _description: &str,
    ) -> Result<()> {
        self.open('{')
    }

    fn end_map(&mut self) -> Result<()> {
        self.close('}')
    }

    fn map_len(&mut self, len: usize) -> Result<usize> {
        Ok(len)
    }

    fn map_write_value(&mut self, key: &str) -> Result<()> {
        self.push_key(key)
    }
}
