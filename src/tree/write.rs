use crate::{Backend, Error, Result, ScalarMut, cold_path, tree::Node};

enum Building {
    Object(Vec<(String, Node)>),
    Array(Vec<Node>),
    Map(Vec<(String, Node)>),
}

struct Frame {
    building: Building,
    key: Option<String>,
}

/// Writing backend that builds a [`Node`] tree.
#[derive(Default)]
pub struct TreeWriter {
    root: Option<Node>,
    stack: Vec<Frame>,
}

impl TreeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The finished tree; `None` if nothing was written or a container is still open.
    pub fn into_node(self) -> Option<Node> {
        if self.stack.is_empty() { self.root } else { None }
    }

    fn emit(&mut self, node: Node) -> Result<()> {
        let Some(frame) = self.stack.last_mut() else {
            if self.root.is_some() {
                cold_path();
                return Err(Error::CallOrder("more than one root value"));
            }
            self.root = Some(node);
            return Ok(());
        };
        match &mut frame.building {
            Building::Array(elements) => elements.push(node),
            Building::Object(entries) | Building::Map(entries) => {
                let Some(key) = frame.key.take() else {
                    cold_path();
                    return Err(Error::CallOrder("value written without a name"));
                };
                entries.push((key, node));
            }
        }
        Ok(())
    }

    fn open(&mut self, building: Building) {
        self.stack.push(Frame {
            building,
            key: None,
        });
    }

    fn close(&mut self) -> Result<Building> {
        match self.stack.pop() {
            Some(frame) => Ok(frame.building),
            None => {
                cold_path();
                Err(Error::CallOrder("container closed without being opened"))
            }
        }
    }

    fn name(&mut self, name: &str, map: bool) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame {
                building: Building::Object(_),
                key,
            }) if !map => {
                *key = Some(name.to_owned());
                Ok(())
            }
            Some(Frame {
                building: Building::Map(_),
                key,
            }) if map => {
                *key = Some(name.to_owned());
                Ok(())
            }
            _ => {
                cold_path();
                Err(Error::CallOrder("entry written outside of its container"))
            }
        }
    }
}

impl Backend for TreeWriter {
    fn is_reading(&self) -> bool {
        false
    }

    fn value(&mut self, slot: ScalarMut<'_>, _type_name: &str, _description: &str) -> Result<()> {
        self.emit(Node::from_slot(&slot))
    }

    fn start_object(&mut self, _type_name: &str, _description: &str) -> Result<()> {
        self.open(Building::Object(Vec::new()));
        Ok(())
    }

    fn end_object(&mut self) -> Result<()> {
        match self.close()? {
            Building::Object(entries) => self.emit(Node::Object(entries)),
            _ => Err(Error::CallOrder("object closed while another container is open")),
        }
    }

    fn object_value(&mut self, name: &str, _mandatory: bool, _description: &str) -> Result<bool> {
        self.name(name, false)?;
        Ok(true)
    }

    fn start_array(
        &mut self,
        _type_name: &str,
        _value_type_name: &str,
        _description: &str,
    ) -> Result<()> {
        self.open(Building::Array(Vec::new()));
        Ok(())
    }

    fn end_array(&mut self) -> Result<()> {
        match self.close()? {
            Building::Array(elements) => self.emit(Node::Array(elements)),
            _ => Err(Error::CallOrder("array closed while another container is open")),
        }
    }

    fn array_len(&mut self, len: usize) -> Result<usize> {
        if let Some(Frame {
            building: Building::Array(elements),
            ..
        }) = self.stack.last_mut()
        {
            elements.reserve(len);
        }
        Ok(len)
    }

    fn array_value(&mut self) -> Result<()> {
        match self.stack.last() {
            Some(Frame {
                building: Building::Array(_),
                ..
            }) => Ok(()),
            _ => Err(Error::CallOrder("element written outside of an array")),
        }
    }

    fn start_map(
        &mut self,
        _type_name: &str,
        _value_type_name: &str,
        _description: &str,
    ) -> Result<()> {
        self.open(Building::Map(Vec::new()));
        Ok(())
    }

    fn end_map(&mut self) -> Result<()> {
        match self.close()? {
            Building::Map(entries) => self.emit(Node::Map(entries)),
            _ => Err(Error::CallOrder("map closed while another container is open")),
        }
    }

    fn map_len(&mut self, len: usize) -> Result<usize> {
        Ok(len)
    }

    fn map_write_value(&mut self, key: &str) -> Result<()> {
        self.name(key, true)
    }
}
