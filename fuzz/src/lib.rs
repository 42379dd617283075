use std::collections::{BTreeMap, HashMap};

use na_inspect::{
    BigEndian, Dynamic, Inspectable, LittleEndian, Registry, ValueInspector, binary, json, tree,
};
use num_bigint::BigInt;

#[derive(Default)]
struct TestObject {
    int_val: i32,
    long_val: i64,
    float_val: f32,
    double_val: f64,
    string_val: String,
    bytes_val: Vec<u8>,
    big_val: BigInt,
    list_ints: Vec<i32>,
    list_strings: Vec<String>,
    nested: Vec<TestObject>,
    map_vals: HashMap<String, i32>,
}

impl Inspectable for TestObject {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut object = inspector.object(Self::type_name(), "");
        object.int32(&mut self.int_val, "int_val", true, "");
        object.int64(&mut self.long_val, "long_val", false, "");
        object.float32(&mut self.float_val, b'g', -1, "float_val", false, "");
        object.float64(&mut self.double_val, b'g', -1, "double_val", false, "");
        object.string(&mut self.string_val, "string_val", false, "");
        object.bytes(&mut self.bytes_val, "bytes_val", false, "");
        object.big_int(&mut self.big_val, "big_val", false, "");
        object.inspect(&mut self.list_ints, "list_ints", false, "");
        object.inspect(&mut self.list_strings, "list_strings", false, "");
        object.inspect(&mut self.nested, "nested", false, "");
        object.inspect(&mut self.map_vals, "map_vals", false, "");
        object.end();
    }

    fn type_name() -> &'static str {
        "fuzz.object"
    }
}

#[derive(Default)]
struct Envelope {
    kind: String,
    payload: Dynamic,
}

impl Inspectable for Envelope {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut object = inspector.object("fuzz.envelope", "");
        object.string(&mut self.kind, "kind", true, "");
        object.inspect(&mut self.payload, "payload", false, "");
        object.end();
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    let _ = registry.register_type::<TestObject>();
    registry
}

/// Anything that decodes must encode again and decode to the same value.
fn reencode<T: Inspectable + Default>(mut value: T) {
    if let Ok(bytes) = binary::to_vec_be(&mut value) {
        assert!(binary::from_slice_be::<T>(&bytes).is_ok());
    }
    if let Ok(text) = json::to_string(&mut value) {
        assert!(json::from_str::<T>(&text).is_ok());
    }
}

pub fn test_binary(data: &[u8]) {
    if let Ok(value) = binary::from_slice::<BigEndian, TestObject>(data) {
        reencode(value);
    }
    if let Ok(value) = binary::from_slice::<LittleEndian, TestObject>(data) {
        reencode(value);
    }
    if let Ok(value) = binary::from_slice_be::<BTreeMap<String, Vec<i64>>>(data) {
        reencode(value);
    }
    let registry = registry();
    let _ = binary::from_slice_with::<BigEndian, Envelope>(data, &registry);
}

pub fn test_json(data: &[u8]) {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(value) = json::from_str::<TestObject>(text) {
        reencode(value);
    }
    let registry = registry();
    let _ = json::from_str_with::<Envelope>(text, &registry);
}

pub fn test_tree(data: &[u8]) {
    if let Ok(mut value) = binary::from_slice_le::<TestObject>(data) {
        if let Ok(node) = tree::to_node(&mut value) {
            assert!(tree::from_node::<TestObject>(node).is_ok());
        }
    }
}
