//! Documentation backend.
//!
//! [`DocWriter`] walks a value like any writer, but instead of encoding it
//! records the declared type names, descriptions, field names, mandatory
//! flags and example values as a [`TypeDoc`] tree. `TypeDoc` renders as an
//! indented outline through `Display`.
//!
//! Object types are expanded once per writer; later occurrences of the same
//! type name are recorded as references. Arrays and maps contribute their
//! first element. When an array or map is empty and its element type name is
//! registered, a default element is constructed from the registry and
//! documented instead, unless that type is already being expanded.
//!
//! # Example
//!
//! ```
//! use na_inspect::{Inspectable, ValueInspector, docs};
//!
//! #[derive(Default)]
//! struct Login {
//!     user: String,
//!     remember: bool,
//! }
//!
//! impl Inspectable for Login {
//!     fn inspect(&mut self, inspector: ValueInspector<'_>) {
//!         let mut object = inspector.object("demo.login", "login request");
//!         object.string(&mut self.user, "user", true, "account name");
//!         object.bool(&mut self.remember, "remember", false, "keep the session");
//!         object.end();
//!     }
//! }
//!
//! let doc = docs::document(&mut Login::default()).unwrap();
//! assert_eq!(doc.type_name, "demo.login");
//! assert_eq!(doc.fields.len(), 2);
//! assert!(doc.fields[0].mandatory);
//! ```

use std::{collections::HashSet, fmt};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{
    Backend, Error, Inspectable, Registry, Result, ScalarMut, Session, Shape,
    number::{format_big_float, format_f32, format_f64, format_rat},
};

/// Documentation of one value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeDoc {
    pub type_name: String,
    pub shape: Shape,
    pub description: String,
    /// Element type name of arrays and maps.
    pub value_type_name: String,
    /// Example text of a scalar, taken from the documented value.
    pub example: Option<String>,
    pub fields: Vec<FieldDoc>,
    /// Documentation of the first element of an array or map.
    pub element: Option<Box<TypeDoc>>,
    /// Set when this object type was already expanded elsewhere.
    pub repeated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDoc {
    pub name: String,
    pub mandatory: bool,
    pub description: String,
    pub doc: TypeDoc,
}

impl TypeDoc {
    fn new(shape: Shape, type_name: &str, description: &str) -> Self {
        Self {
            type_name: if type_name.is_empty() {
                shape.name().to_owned()
            } else {
                type_name.to_owned()
            },
            shape,
            description: description.to_owned(),
            ..Self::default()
        }
    }

    /// Looks up a documented field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDoc> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn write_line(&self, f: &mut fmt::Formatter<'_>, description: &str) -> fmt::Result {
        write!(f, "{} <{}>", self.type_name, self.shape.name())?;
        if self.repeated {
            f.write_str(" (see above)")?;
        }
        if let Some(example) = &self.example {
            write!(f, " = {example}")?;
        }
        if !description.is_empty() {
            write!(f, ": {description}")?;
        }
        f.write_str("\n")
    }

    fn write_children(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = depth * 2;
        for field in &self.fields {
            let marker = if field.mandatory { "!" } else { "" };
            write!(f, "{:pad$}.{}{marker} ", "", field.name)?;
            let description = if field.description.is_empty() {
                &field.doc.description
            } else {
                &field.description
            };
            field.doc.write_line(f, description)?;
            field.doc.write_children(f, depth + 1)?;
        }
        if let Some(element) = &self.element {
            let label = if self.shape == Shape::Map { "{}" } else { "[]" };
            write!(f, "{:pad$}{label} ", "")?;
            element.write_line(f, &element.description)?;
            element.write_children(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_line(f, &self.description)?;
        self.write_children(f, 1)
    }
}

struct Frame {
    doc: TypeDoc,
    field: Option<(String, bool, String)>,
}

/// Writing backend that produces a [`TypeDoc`].
#[derive(Default)]
pub struct DocWriter<'r> {
    registry: Option<&'r Registry>,
    seen: HashSet<String>,
    stack: Vec<Frame>,
    root: Option<TypeDoc>,
    /// Depth of containers being skipped below an already documented object.
    muted: usize,
    reference: Option<TypeDoc>,
    /// Registered element types whose default element is being documented.
    expanding: HashSet<String>,
}

impl<'r> DocWriter<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `registry` to document the elements of empty arrays and maps.
    pub fn with_registry(registry: &'r Registry) -> Self {
        Self {
            registry: Some(registry),
            ..Self::default()
        }
    }

    pub fn into_doc(self) -> Option<TypeDoc> {
        if self.stack.is_empty() { self.root } else { None }
    }

    fn emit(&mut self, doc: TypeDoc) -> Result<()> {
        let Some(frame) = self.stack.last_mut() else {
            if self.root.is_some() {
                return Err(Error::CallOrder("more than one root value"));
            }
            self.root = Some(doc);
            return Ok(());
        };
        if frame.doc.shape == Shape::Object {
            let Some((name, mandatory, description)) = frame.field.take() else {
                return Err(Error::CallOrder("value written without a name"));
            };
            frame.doc.fields.push(FieldDoc {
                name,
                mandatory,
                description,
                doc,
            });
        } else if frame.doc.element.is_none() {
            frame.doc.element = Some(Box::new(doc));
        }
        Ok(())
    }

    fn open(&mut self, doc: TypeDoc) {
        self.stack.push(Frame { doc, field: None });
    }

    fn close(&mut self, shape: Shape) -> Result<()> {
        if self.muted > 0 {
            self.muted -= 1;
            return match self.reference.take() {
                Some(reference) if self.muted == 0 => self.emit(reference),
                reference => {
                    self.reference = reference;
                    Ok(())
                }
            };
        }
        match self.stack.pop() {
            Some(frame) if frame.doc.shape == shape => self.emit(frame.doc),
            _ => Err(Error::CallOrder("container closed without being opened")),
        }
    }

    /// Documents a default element of an empty array or map.
    fn expand_element(&mut self) -> Result<()> {
        let Some(registry) = self.registry else {
            return Ok(());
        };
        let Some(frame) = self.stack.last() else {
            return Ok(());
        };
        if frame.doc.element.is_some() {
            return Ok(());
        }
        let Some(registration) = registry.get(&frame.doc.value_type_name) else {
            return Ok(());
        };
        if !self.expanding.insert(registration.name().to_owned()) {
            let mut reference = TypeDoc::new(
                Shape::Value,
                registration.name(),
                registration.description().unwrap_or_default(),
            );
            reference.repeated = true;
            return self.emit(reference);
        }
        log::trace!("documenting {} from the registry", registration.name());
        let mut element = registration.construct();
        let mut session = Session::with_registry(self, registry);
        element.inspect(session.value());
        let result = session.finish();
        self.expanding.remove(registration.name());
        result
    }
}

fn example(slot: &ScalarMut<'_>) -> String {
    match slot {
        ScalarMut::Int(v) => v.to_string(),
        ScalarMut::Int32(v) => v.to_string(),
        ScalarMut::Int64(v) => v.to_string(),
        ScalarMut::Float32(v, format) => format_f32(**v, *format),
        ScalarMut::Float64(v, format) => format_f64(**v, *format),
        ScalarMut::String(v) => format!("{v:?}"),
        ScalarMut::ByteString(v) => format!("{:?}", String::from_utf8_lossy(v)),
        ScalarMut::Bytes(v) => URL_SAFE_NO_PAD.encode(v),
        ScalarMut::Bool(v) => v.to_string(),
        ScalarMut::BigInt(v) => v.to_string(),
        ScalarMut::Rat(v, precision) => format_rat(v, *precision),
        ScalarMut::BigFloat(v, format) => format_big_float(v, *format),
    }
}

impl Backend for DocWriter<'_> {
    fn is_reading(&self) -> bool {
        false
    }

    fn value(&mut self, slot: ScalarMut<'_>, type_name: &str, description: &str) -> Result<()> {
        if self.muted > 0 {
            return Ok(());
        }
        let mut doc = TypeDoc::new(slot.shape(), type_name, description);
        doc.example = Some(example(&slot));
        self.emit(doc)
    }

    fn start_object(&mut self, type_name: &str, description: &str) -> Result<()> {
        if self.muted > 0 {
            self.muted += 1;
            return Ok(());
        }
        let doc = TypeDoc::new(Shape::Object, type_name, description);
        if !type_name.is_empty() && !self.seen.insert(type_name.to_owned()) {
            self.muted = 1;
            self.reference = Some(TypeDoc {
                repeated: true,
                ..doc
            });
            return Ok(());
        }
        self.open(doc);
        Ok(())
    }

    fn end_object(&mut self) -> Result<()> {
        self.close(Shape::Object)
    }

    fn object_value(&mut self, name: &str, mandatory: bool, description: &str) -> Result<bool> {
        if self.muted > 0 {
            return Ok(true);
        }
        match self.stack.last_mut() {
            Some(frame) if frame.doc.shape == Shape::Object => {
                frame.field = Some((name.to_owned(), mandatory, description.to_owned()));
                Ok(true)
            }
            _ => Err(Error::CallOrder("field written outside of an object")),
        }
    }

    fn start_array(&mut self, type_name: &str, value_type_name: &str, description: &str)
    -> Result<()> {
        if self.muted > 0 {
            self.muted += 1;
            return Ok(());
        }
        let mut doc = TypeDoc::new(Shape::Array, type_name, description);
        doc.value_type_name = value_type_name.to_owned();
        self.open(doc);
        Ok(())
    }

    fn end_array(&mut self) -> Result<()> {
        if self.muted == 0 {
            self.expand_element()?;
        }
        self.close(Shape::Array)
    }

    fn array_len(&mut self, len: usize) -> Result<usize> {
        Ok(len)
    }

    fn array_value(&mut self) -> Result<()> {
        Ok(())
    }

    fn start_map(&mut self, type_name: &str, value_type_name: &str, description: &str)
    -> Result<()> {
        if self.muted > 0 {
            self.muted += 1;
            return Ok(());
        }
        let mut doc = TypeDoc::new(Shape::Map, type_name, description);
        doc.value_type_name = value_type_name.to_owned();
        self.open(doc);
        Ok(())
    }

    fn end_map(&mut self) -> Result<()> {
        if self.muted == 0 {
            self.expand_element()?;
        }
        self.close(Shape::Map)
    }

    fn map_len(&mut self, len: usize) -> Result<usize> {
        Ok(len)
    }

    fn map_write_value(&mut self, _key: &str) -> Result<()> {
        Ok(())
    }
}

/// Documents `value`.
pub fn document<T: Inspectable + ?Sized>(value: &mut T) -> Result<TypeDoc> {
    let mut writer = DocWriter::new();
    let mut session = Session::new(&mut writer);
    value.inspect(session.value());
    session.finish()?;
    writer
        .into_doc()
        .ok_or(Error::CallOrder("no value was documented"))
}

/// Like [`document`], expanding empty containers through `registry`.
pub fn document_with<T: Inspectable + ?Sized>(
    value: &mut T,
    registry: &Registry,
) -> Result<TypeDoc> {
    let mut writer = DocWriter::with_registry(registry);
    let mut session = Session::with_registry(&mut writer, registry);
    value.inspect(session.value());
    session.finish()?;
    writer
        .into_doc()
        .ok_or(Error::CallOrder("no value was documented"))
}
