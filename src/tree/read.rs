use crate::{Backend, Error, Result, ScalarMut, Shape, cold_path, tree::Node};

enum Frame {
    Object(Vec<(String, Node)>),
    Array {
        len: usize,
        elements: std::vec::IntoIter<Node>,
    },
    Map {
        len: usize,
        entries: std::vec::IntoIter<(String, Node)>,
        value: Option<Node>,
    },
}

/// Reading backend that consumes a [`Node`] tree.
pub struct TreeReader {
    pending: Option<Node>,
    stack: Vec<Frame>,
}

impl TreeReader {
    pub fn new(root: Node) -> Self {
        Self {
            pending: Some(root),
            stack: Vec::new(),
        }
    }

    fn take_pending(&mut self) -> Result<Node> {
        self.pending.take().ok_or_else(|| {
            cold_path();
            Error::CallOrder("no value is pending")
        })
    }

    fn close(&mut self, shape: Shape) -> Result<()> {
        let open = match self.stack.last() {
            Some(Frame::Object(_)) => Shape::Object,
            Some(Frame::Array { .. }) => Shape::Array,
            Some(Frame::Map { .. }) => Shape::Map,
            None => {
                cold_path();
                return Err(Error::CallOrder("container closed without being opened"));
            }
        };
        if open != shape {
            cold_path();
            return Err(Error::ShapeMismatch {
                expected: open,
                actual: shape,
            });
        }
        self.stack.pop();
        Ok(())
    }
}

fn mismatch(expected: Shape, node: &Node) -> Error {
    cold_path();
    Error::ShapeMismatch {
        expected,
        actual: node.shape(),
    }
}

impl Backend for TreeReader {
    fn is_reading(&self) -> bool {
        true
    }

    fn value(&mut self, slot: ScalarMut<'_>, _type_name: &str, _description: &str) -> Result<()> {
        self.take_pending()?.store(slot)
    }

    fn start_object(&mut self, _type_name: &str, _description: &str) -> Result<()> {
        match self.take_pending()? {
            Node::Object(fields) => {
                self.stack.push(Frame::Object(fields));
                Ok(())
            }
            node => Err(mismatch(Shape::Object, &node)),
        }
    }

    fn end_object(&mut self) -> Result<()> {
        self.close(Shape::Object)
    }

    fn object_value(&mut self, name: &str, mandatory: bool, _description: &str) -> Result<bool> {
        let Some(Frame::Object(fields)) = self.stack.last_mut() else {
            return Err(Error::CallOrder("field read outside of an object"));
        };
        match fields.iter().position(|(key, _)| key == name) {
            Some(index) => {
                self.pending = Some(fields.swap_remove(index).1);
                Ok(true)
            }
            None if mandatory => Err(Error::MandatoryFieldAbsent(name.to_owned())),
            None => Ok(false),
        }
    }

    fn start_array(
        &mut self,
        _type_name: &str,
        _value_type_name: &str,
        _description: &str,
    ) -> Result<()> {
        match self.take_pending()? {
            Node::Array(elements) => {
                self.stack.push(Frame::Array {
                    len: elements.len(),
                    elements: elements.into_iter(),
                });
                Ok(())
            }
            node => Err(mismatch(Shape::Array, &node)),
        }
    }

    fn end_array(&mut self) -> Result<()> {
        self.close(Shape::Array)
    }

    fn array_len(&mut self, _len: usize) -> Result<usize> {
        match self.stack.last() {
            Some(Frame::Array { len, .. }) => Ok(*len),
            _ => Err(Error::CallOrder("array length read outside of an array")),
        }
    }

    fn array_value(&mut self) -> Result<()> {
        let Some(Frame::Array { elements, .. }) = self.stack.last_mut() else {
            return Err(Error::CallOrder("element read outside of an array"));
        };
        self.pending = Some(elements.next().ok_or(Error::EndOfFile)?);
        Ok(())
    }

    fn start_map(
        &mut self,
        _type_name: &str,
        _value_type_name: &str,
        _description: &str,
    ) -> Result<()> {
        match self.take_pending()? {
            Node::Map(entries) => {
                self.stack.push(Frame::Map {
                    len: entries.len(),
                    entries: entries.into_iter(),
                    value: None,
                });
                Ok(())
            }
            node => Err(mismatch(Shape::Map, &node)),
        }
    }

    fn end_map(&mut self) -> Result<()> {
        self.close(Shape::Map)
    }

    fn map_len(&mut self, _len: usize) -> Result<usize> {
        match self.stack.last() {
            Some(Frame::Map { len, .. }) => Ok(*len),
            _ => Err(Error::CallOrder("map length read outside of a map")),
        }
    }

    fn map_next_key(&mut self) -> Result<String> {
        let Some(Frame::Map { entries, value, .. }) = self.stack.last_mut() else {
            return Err(Error::CallOrder("key read outside of a map"));
        };
        let (key, node) = entries.next().ok_or(Error::EndOfFile)?;
        *value = Some(node);
        Ok(key)
    }

    fn map_read_value(&mut self) -> Result<()> {
        let Some(Frame::Map { value, .. }) = self.stack.last_mut() else {
            return Err(Error::CallOrder("value read outside of a map"));
        };
        let node = value
            .take()
            .ok_or(Error::CallOrder("map value read before its key"))?;
        self.pending = Some(node);
        Ok(())
    }
}
