//! Mandatory and optional object fields

use na_inspect::{Error, Inspectable, ValueInspector, binary, json, tree};

#[derive(Debug, Default, PartialEq)]
struct Partial {
    id: i64,
}

impl Inspectable for Partial {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut object = inspector.object("test.partial", "");
        object.int64(&mut self.id, "id", true, "");
        object.end();
    }
}

#[derive(Debug, Default, PartialEq)]
struct Full {
    id: i64,
    name: String,
    tags: Vec<String>,
}

impl Inspectable for Full {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut object = inspector.object("test.full", "");
        object.int64(&mut self.id, "id", true, "");
        object.string(&mut self.name, "name", true, "");
        object.inspect(&mut self.tags, "tags", false, "");
        object.end();
    }
}

#[derive(Debug, Default, PartialEq)]
struct Relaxed {
    id: i64,
    name: String,
    tags: Vec<String>,
}

impl Inspectable for Relaxed {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut object = inspector.object("test.relaxed", "");
        object.int64(&mut self.id, "id", true, "");
        object.string(&mut self.name, "name", false, "");
        object.inspect(&mut self.tags, "tags", false, "");
        object.end();
    }
}

#[test]
fn test_binary_missing_mandatory_field() {
    let bytes = binary::to_vec_be(&mut Partial { id: 7 }).unwrap();
    let error = binary::from_slice_be::<Full>(&bytes).unwrap_err();
    assert!(matches!(error, Error::MandatoryFieldAbsent(ref name) if name == "name"));
    assert_eq!(error.to_string(), "mandatory field is absent: name");
}

#[test]
fn test_binary_missing_optional_fields_default() {
    let bytes = binary::to_vec_be(&mut Partial { id: 7 }).unwrap();
    let decoded: Relaxed = binary::from_slice_be(&bytes).unwrap();
    assert_eq!(
        decoded,
        Relaxed {
            id: 7,
            ..Relaxed::default()
        }
    );
}

#[test]
fn test_json_missing_mandatory_field() {
    let error = json::from_str::<Full>(r#"{"id":1,"tags":[]}"#).unwrap_err();
    assert!(matches!(error, Error::MandatoryFieldAbsent(ref name) if name == "name"));
}

#[test]
fn test_json_null_counts_as_absent() {
    let decoded: Relaxed = json::from_str(r#"{"id":1,"name":null,"tags":null}"#).unwrap();
    assert_eq!(decoded.id, 1);
    assert!(decoded.name.is_empty());
    assert!(decoded.tags.is_empty());

    let error = json::from_str::<Full>(r#"{"id":1,"name":null}"#).unwrap_err();
    assert!(matches!(error, Error::MandatoryFieldAbsent(_)));
}

#[test]
fn test_tree_missing_mandatory_field() {
    let node = tree::to_node(&mut Partial { id: 3 }).unwrap();
    let error = tree::from_node::<Full>(node).unwrap_err();
    assert!(matches!(error, Error::MandatoryFieldAbsent(ref name) if name == "name"));
}

#[test]
fn test_absent_optional_field_keeps_existing_value() {
    let bytes = binary::to_vec_le(&mut Partial { id: 5 }).unwrap();
    let mut value = Relaxed {
        id: 0,
        name: "kept".to_owned(),
        tags: vec!["kept".to_owned()],
    };
    let mut reader = na_inspect::BinaryReader::<na_inspect::LittleEndian>::new(&bytes).unwrap();
    na_inspect::inspect(&mut value, &mut reader).unwrap();
    assert_eq!(value.id, 5);
    assert_eq!(value.name, "kept");
    assert_eq!(value.tags, vec!["kept".to_owned()]);
}

#[test]
fn test_field_order_does_not_matter_when_reading() {
    let decoded: Full = json::from_str(r#"{"tags":["a"],"name":"n","id":2}"#).unwrap();
    assert_eq!(
        decoded,
        Full {
            id: 2,
            name: "n".to_owned(),
            tags: vec!["a".to_owned()],
        }
    );
}

#[test]
fn test_nested_value_is_none_when_absent() {
    struct Probe {
        seen: Option<bool>,
    }

    impl Inspectable for Probe {
        fn inspect(&mut self, inspector: ValueInspector<'_>) {
            let mut object = inspector.object("test.probe", "");
            self.seen = Some(object.value("missing", false, "").is_some());
            object.end();
        }
    }

    let mut probe = Probe { seen: None };
    let mut reader = na_inspect::JsonReader::new("{}").unwrap();
    na_inspect::inspect(&mut probe, &mut reader).unwrap();
    assert_eq!(probe.seen, Some(false));
}
