use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use num_bigint::BigInt;
use serde_json::{Map, Value as Json};

use crate::{
    Backend, Error, ReaderConfig, Result, ScalarMut,
    number::{parse_big_float, parse_f64, parse_rat},
};

struct Pending {
    value: Json,
    path: String,
}

impl Pending {
    fn invalid(&self, expected: &'static str) -> Error {
        Error::InvalidValue {
            expected,
            path: self.path.clone(),
        }
    }
}

enum Frame {
    Object {
        fields: Map<String, Json>,
        path: String,
    },
    Array {
        len: usize,
        elements: std::vec::IntoIter<Json>,
        index: usize,
        path: String,
    },
    Map {
        len: usize,
        entries: serde_json::map::IntoIter,
        value: Option<Pending>,
        path: String,
    },
}

/// Reading backend over a parsed JSON document.
///
/// Accepts what [`JsonWriter`](crate::JsonWriter) produces. Integers may also
/// be given for arbitrary precision fields, and `null` object members count as
/// absent. Errors carry a JSON path such as `$.items[2].name`.
pub struct JsonReader {
    config: ReaderConfig,
    pending: Option<Pending>,
    stack: Vec<Frame>,
}

impl JsonReader {
    pub fn new(text: &str) -> Result<Self> {
        Self::with_config(text, ReaderConfig::default())
    }

    /// Parses `text`, rejecting documents nested deeper than
    /// `config.max_depth` before they reach the parser.
    pub fn with_config(text: &str, config: ReaderConfig) -> Result<Self> {
        if nesting_depth(text) > config.max_depth {
            return Err(Error::DepthLimitExceeded(config.max_depth));
        }
        let mut deserializer = serde_json::Deserializer::from_str(text);
        deserializer.disable_recursion_limit();
        let mut stream = deserializer.into_iter::<Json>();
        let value = match stream.next() {
            Some(value) => value?,
            None => return Err(Error::EndOfFile),
        };
        let rest = text[stream.byte_offset()..].trim_start().len();
        if rest > 0 {
            log::debug!("rejecting {rest} trailing bytes of json");
            return Err(Error::TrailingData(rest));
        }
        Ok(Self::from_value_with_config(value, config))
    }

    pub fn from_value(value: Json) -> Self {
        Self::from_value_with_config(value, ReaderConfig::default())
    }

    pub fn from_value_with_config(value: Json, config: ReaderConfig) -> Self {
        Self {
            config,
            pending: Some(Pending {
                value,
                path: "$".to_owned(),
            }),
            stack: Vec::new(),
        }
    }

    fn take_pending(&mut self) -> Result<Pending> {
        self.pending
            .take()
            .ok_or(Error::CallOrder("no value is pending"))
    }

    fn push(&mut self, frame: Frame) -> Result<()> {
        if self.stack.len() >= self.config.max_depth {
            return Err(Error::DepthLimitExceeded(self.stack.len()));
        }
        self.stack.push(frame);
        Ok(())
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len > self.config.max_len {
            return Err(Error::ListTooLong(len));
        }
        Ok(())
    }

    fn pop(&mut self, expected: &'static str) -> Result<()> {
        let matches = matches!(
            (self.stack.last(), expected),
            (Some(Frame::Object { .. }), "object")
                | (Some(Frame::Array { .. }), "array")
                | (Some(Frame::Map { .. }), "map")
        );
        if !matches {
            return Err(Error::CallOrder("container closed without being opened"));
        }
        self.stack.pop();
        Ok(())
    }
}

/// Deepest container nesting in `text`, ignoring brackets inside strings.
fn nesting_depth(text: &str) -> usize {
    let (mut depth, mut deepest) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

fn big_int_text(value: &Json) -> Option<String> {
    match value {
        Json::String(text) => Some(text.clone()),
        Json::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

impl Backend for JsonReader {
    fn is_reading(&self) -> bool {
        true
    }

    fn value(&mut self, slot: ScalarMut<'_>, _type_name: &str, _description: &str) -> Result<()> {
        let pending = self.take_pending()?;
        let value = &pending.value;
        match slot {
            ScalarMut::Int(slot) => {
                *slot = value
                    .as_i64()
                    .and_then(|v| isize::try_from(v).ok())
                    .ok_or_else(|| pending.invalid("integer"))?;
            }
            ScalarMut::Int32(slot) => {
                *slot = value
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(|| pending.invalid("32-bit integer"))?;
            }
            ScalarMut::Int64(slot) => {
                *slot = value.as_i64().ok_or_else(|| pending.invalid("integer"))?;
            }
            ScalarMut::Float32(slot, _) => {
                let parsed = match value {
                    Json::Number(number) => number.as_f64(),
                    Json::String(text) => parse_f64(text),
                    _ => None,
                };
                *slot = parsed.ok_or_else(|| pending.invalid("floating point value"))? as f32;
            }
            ScalarMut::Float64(slot, _) => {
                let parsed = match value {
                    Json::Number(number) => number.as_f64(),
                    Json::String(text) => parse_f64(text),
                    _ => None,
                };
                *slot = parsed.ok_or_else(|| pending.invalid("floating point value"))?;
            }
            ScalarMut::String(slot) => {
                *slot = value
                    .as_str()
                    .ok_or_else(|| pending.invalid("string"))?
                    .to_owned();
            }
            ScalarMut::ByteString(slot) => {
                let text = value.as_str().ok_or_else(|| pending.invalid("string"))?;
                slot.clear();
                slot.extend_from_slice(text.as_bytes());
            }
            ScalarMut::Bytes(slot) => {
                let text = value
                    .as_str()
                    .ok_or_else(|| pending.invalid("base64 string"))?;
                *slot = URL_SAFE_NO_PAD
                    .decode(text)
                    .map_err(|_| pending.invalid("base64 string"))?;
            }
            ScalarMut::Bool(slot) => {
                *slot = value.as_bool().ok_or_else(|| pending.invalid("boolean"))?;
            }
            ScalarMut::BigInt(slot) => {
                *slot = big_int_text(value)
                    .and_then(|text| text.parse::<BigInt>().ok())
                    .ok_or_else(|| pending.invalid("large integer (as a string)"))?;
            }
            ScalarMut::Rat(slot, _) => {
                *slot = big_int_text(value)
                    .and_then(|text| parse_rat(&text))
                    .ok_or_else(|| pending.invalid("large fixed point value (as a string)"))?;
            }
            ScalarMut::BigFloat(slot, _) => {
                *slot = big_int_text(value)
                    .and_then(|text| parse_big_float(&text))
                    .ok_or_else(|| {
                        pending.invalid("large floating point value (as a string)")
                    })?;
            }
        }
        Ok(())
    }

    fn start_object(&mut self, _type_name: &str, _description: &str) -> Result<()> {
        let pending = self.take_pending()?;
        let Json::Object(fields) = pending.value else {
            return Err(pending.invalid("json object"));
        };
        self.check_len(fields.len())?;
        self.push(Frame::Object {
            fields,
            path: pending.path,
        })
    }

    fn end_object(&mut self) -> Result<()> {
        self.pop("object")
    }

    fn object_value(&mut self, name: &str, mandatory: bool, _description: &str) -> Result<bool> {
        let Some(Frame::Object { fields, path }) = self.stack.last_mut() else {
            return Err(Error::CallOrder("field read outside of an object"));
        };
        match fields.remove(name) {
            Some(value) if !value.is_null() => {
                self.pending = Some(Pending {
                    value,
                    path: format!("{path}.{name}"),
                });
                Ok(true)
            }
            _ if mandatory => Err(Error::MandatoryFieldAbsent(name.to_owned())),
            _ => Ok(false),
        }
    }

    fn start_array(
        &mut self,
        _type_name: &str,
        _value_type_name: &str,
        _description: &str,
    ) -> Result<()> {
        let pending = self.take_pending()?;
        let Json::Array(elements) = pending.value else {
            return Err(pending.invalid("array"));
        };
        self.check_len(elements.len())?;
        self.push(Frame::Array {
            len: elements.len(),
            elements: elements.into_iter(),
            index: 0,
            path: pending.path,
        })
    }

    fn end_array(&mut self) -> Result<()> {
        self.pop("array")
    }

    fn array_len(&mut self, _len: usize) -> Result<usize> {
        match self.stack.last() {
            Some(Frame::Array { len, .. }) => Ok(*len),
            _ => Err(Error::CallOrder("array length read outside of an array")),
        }
    }

    fn array_value(&mut self) -> Result<()> {
        let Some(Frame::Array {
            elements,
            index,
            path,
            ..
        }) = self.stack.last_mut()
        else {
            return Err(Error::CallOrder("element read outside of an array"));
        };
        let Some(value) = elements.next() else {
            return Err(Error::InvalidValue {
                expected: "another array element",
                path: path.clone(),
            });
        };
        self.pending = Some(Pending {
            value,
            path: format!("{path}[{index}]"),
        });
        *index += 1;
        Ok(())
    }

    fn start_map(
        &mut self,
        _type_name: &str,
        _value_type_name: &str,
        _description: &str,
    ) -> Result<()> {
        let pending = self.take_pending()?;
        let Json::Object(entries) = pending.value else {
            return Err(pending.invalid("json object"));
        };
        self.check_len(entries.len())?;
        self.push(Frame::Map {
            len: entries.len(),
            entries: entries.into_iter(),
            value: None,
            path: pending.path,
        })
    }

    fn end_map(&mut self) -> Result<()> {
        self.pop("map")
    }

    fn map_len(&mut self, _len: usize) -> Result<usize> {
        match self.stack.last() {
            Some(Frame::Map { len, .. }) => Ok(*len),
            _ => Err(Error::CallOrder("map length read outside of a map")),
        }
    }

    fn map_next_key(&mut self) -> Result<String> {
        let Some(Frame::Map {
            entries,
            value,
            path,
            ..
        }) = self.stack.last_mut()
        else {
            return Err(Error::CallOrder("key read outside of a map"));
        };
        let Some((key, entry)) = entries.next() else {
            return Err(Error::InvalidValue {
                expected: "another map entry",
                path: path.clone(),
            });
        };
        *value = Some(Pending {
            value: entry,
            path: format!("{path}.{key}"),
        });
        Ok(key)
    }

    fn map_read_value(&mut self) -> Result<()> {
        let Some(Frame::Map { value, .. }) = self.stack.last_mut() else {
            return Err(Error::CallOrder("value read outside of a map"));
        };
        match value.take() {
            Some(pending) => {
                self.pending = Some(pending);
                Ok(())
            }
            None => Err(Error::CallOrder("map value read before its key")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::nesting_depth;

    #[test]
    fn test_nesting_depth() {
        assert_eq!(nesting_depth("1"), 0);
        assert_eq!(nesting_depth(r#"{"a":[1,{"b":[]}]}"#), 4);
        assert_eq!(nesting_depth(r#"["[[[", "\"{{"]"#), 1);
        assert_eq!(nesting_depth("]]][["), 2);
    }
}
