//! Type registry and polymorphic payloads

use na_inspect::{
    Dynamic, EmptyObject, Error, Inspectable, Registrable, Registry, Shape, UnixMillis,
    ValueInspector, binary, json, tree,
};

#[derive(Debug, Default, Clone, PartialEq)]
struct TypeA {
    count: i32,
    label: String,
}

impl Inspectable for TypeA {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut object = inspector.object(Self::type_name(), "first demo type");
        object.int32(&mut self.count, "count", true, "");
        object.string(&mut self.label, "label", false, "");
        object.end();
    }

    fn type_name() -> &'static str {
        "demo.typeA"
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct TypeB {
    flags: Vec<bool>,
}

impl Inspectable for TypeB {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut object = inspector.object(Self::type_name(), "second demo type");
        object.inspect(&mut self.flags, "flags", true, "");
        object.end();
    }

    fn type_name() -> &'static str {
        "demo.typeB"
    }
}

#[derive(Default, Debug)]
struct LogRecord {
    message: String,
    extra: Dynamic,
}

impl Inspectable for LogRecord {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut object = inspector.object("demo.log", "log record");
        object.string(&mut self.message, "message", true, "");
        object.inspect(&mut self.extra, "extra", true, "extra data");
        object.end();
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_type::<TypeA>().unwrap();
    registry
        .register_type_described::<TypeB>("flags carried by a record")
        .unwrap();
    registry
}

#[test]
fn test_construct_by_name() {
    let registry = registry();
    let value = registry.construct("demo.typeA").unwrap();
    assert_eq!((*value).as_any().downcast_ref::<TypeA>(), Some(&TypeA::default()));
    assert_eq!(registry.description("demo.typeB"), Some("flags carried by a record"));
    assert_eq!(registry.description("demo.typeA"), None);
}

#[test]
fn test_unknown_name_is_not_found() {
    let registry = registry();
    let error = registry.construct("demo.missing").err().unwrap();
    assert!(error.is_not_found());
    assert_eq!(error.to_string(), "type not found: demo.missing");
}

#[test]
fn test_duplicate_registration_fails_fast() {
    let mut registry = registry();
    let error = registry.register_type::<TypeA>().unwrap_err();
    assert!(matches!(error, Error::DuplicateType(ref name) if name == "demo.typeA"));

    let error = registry
        .register_described("demo.typeB", || Box::new(TypeA::default()), "shadow")
        .unwrap_err();
    assert!(matches!(error, Error::DuplicateType(_)));
    let value = registry.construct("demo.typeB").unwrap();
    assert!((*value).as_any().is::<TypeB>());
}

#[test]
fn test_builtin_types() {
    let registry = Registry::new();
    assert!(registry.contains(EmptyObject::TYPE_NAME));
    assert!(registry.contains(Shape::TYPE_NAME));
    assert!(registry.contains(UnixMillis::TYPE_NAME));
    assert_eq!(registry.len(), registry.iter().count());

    let empty = Registry::empty();
    assert!(empty.is_empty());
    assert!(!empty.contains(UnixMillis::TYPE_NAME));
}

#[test]
fn test_dynamic_round_trip_binary() {
    let registry = registry();
    let original = TypeA {
        count: 42,
        label: "answer".to_owned(),
    };
    let mut record = LogRecord {
        message: "hello".to_owned(),
        extra: Dynamic::new(original.clone()),
    };
    let bytes = binary::to_vec_be(&mut record).unwrap();
    let decoded: LogRecord = binary::from_slice_with::<na_inspect::BigEndian, _>(&bytes, &registry).unwrap();
    assert_eq!(decoded.message, "hello");
    assert_eq!(decoded.extra.type_name(), "demo.typeA");
    assert_eq!(decoded.extra.downcast_ref::<TypeA>(), Some(&original));
}

#[test]
fn test_dynamic_round_trip_json() {
    let registry = registry();
    let mut record = LogRecord {
        message: "flags".to_owned(),
        extra: Dynamic::new(TypeB {
            flags: vec![true, false],
        }),
    };
    let text = json::to_string(&mut record).unwrap();
    assert_eq!(
        text,
        r#"{"message":"flags","extra":{"type":"demo.typeB","value":{"flags":[true,false]}}}"#
    );
    let decoded: LogRecord = json::from_str_with(&text, &registry).unwrap();
    let extra = decoded.extra.downcast_ref::<TypeB>().unwrap();
    assert_eq!(extra.flags, vec![true, false]);
}

#[test]
fn test_dynamic_round_trip_tree() {
    let registry = registry();
    let mut record = LogRecord {
        message: "tree".to_owned(),
        extra: Dynamic::new(UnixMillis::from_millis(5)),
    };
    let node = tree::to_node(&mut record).unwrap();
    let decoded: LogRecord = tree::from_node_with(node, &registry).unwrap();
    assert_eq!(
        decoded.extra.downcast_ref::<UnixMillis>(),
        Some(&UnixMillis::from_millis(5))
    );
}

#[test]
fn test_dynamic_with_unregistered_name() {
    let registry = registry();
    let text = r#"{"message":"m","extra":{"type":"demo.unknown","value":{}}}"#;
    let error = json::from_str_with::<LogRecord>(text, &registry).unwrap_err();
    assert!(error.is_not_found());
}

#[test]
fn test_dynamic_without_registry() {
    let text = r#"{"message":"m","extra":{"type":"demo.typeA","value":{"count":1}}}"#;
    let error = json::from_str::<LogRecord>(text).unwrap_err();
    assert!(matches!(error, Error::NoRegistry));
}

#[test]
fn test_registrable_downcasts() {
    let boxed: Box<dyn Registrable> = Box::new(TypeA {
        count: 1,
        label: String::new(),
    });
    let any = boxed.into_any();
    assert_eq!(any.downcast::<TypeA>().unwrap().count, 1);
}
