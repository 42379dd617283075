use std::collections::BTreeMap;

use na_inspect::{
    Error, Inspectable, Shape, ValueInspector,
    tree::{self, Node},
};

#[derive(Debug, Default, PartialEq)]
struct Pixel {
    x: i32,
    y: i32,
    alpha: f32,
    tags: Vec<String>,
}

impl Inspectable for Pixel {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut object = inspector.object("demo.pixel", "");
        object.int32(&mut self.x, "x", true, "");
        object.int32(&mut self.y, "y", true, "");
        object.float32(&mut self.alpha, b'g', -1, "alpha", false, "");
        object.inspect(&mut self.tags, "tags", false, "");
        object.end();
    }
}

fn pixel() -> Pixel {
    Pixel {
        x: 3,
        y: -4,
        alpha: 0.5,
        tags: vec!["edge".to_owned()],
    }
}

#[test]
fn test_node_structure() {
    let node = tree::to_node(&mut pixel()).unwrap();
    assert_eq!(
        node,
        Node::Object(vec![
            ("x".to_owned(), Node::Int32(3)),
            ("y".to_owned(), Node::Int32(-4)),
            ("alpha".to_owned(), Node::Float32(0.5)),
            ("tags".to_owned(), Node::Array(vec!["edge".into()])),
        ])
    );
    assert_eq!(node.shape(), Shape::Object);
    assert_eq!(node.get("y").and_then(Node::as_i64), Some(-4));
    assert_eq!(node.get("alpha").and_then(Node::as_f64), Some(0.5));
    assert_eq!(
        node.get("tags").and_then(|tags| tags.at(0)).and_then(Node::as_str),
        Some("edge")
    );
    assert!(node.get("missing").is_none());
    assert!(node.at(0).is_none());
}

#[test]
fn test_map_node_keeps_entry_order() {
    let mut map = BTreeMap::new();
    map.insert("b".to_owned(), 2i64);
    map.insert("a".to_owned(), 1i64);
    let node = tree::to_node(&mut map).unwrap();
    assert_eq!(
        node,
        Node::Map(vec![
            ("a".to_owned(), Node::Int64(1)),
            ("b".to_owned(), Node::Int64(2)),
        ])
    );
}

#[test]
fn test_integer_nodes_convert_across_widths() {
    assert_eq!(tree::from_node::<i64>(Node::Int32(5)).unwrap(), 5);
    assert_eq!(tree::from_node::<i32>(Node::Int64(-7)).unwrap(), -7);
    assert_eq!(tree::from_node::<isize>(Node::Int32(9)).unwrap(), 9);

    let error = tree::from_node::<i32>(Node::Int64(1 << 40)).unwrap_err();
    assert!(matches!(
        error,
        Error::ShapeMismatch {
            expected: Shape::Int32,
            actual: Shape::Int64
        }
    ));
}

#[test]
fn test_float_nodes_convert_across_widths() {
    assert_eq!(tree::from_node::<f64>(Node::Float32(1.5)).unwrap(), 1.5);
    assert_eq!(tree::from_node::<f32>(Node::Float64(0.25)).unwrap(), 0.25);
    assert!(tree::from_node::<f64>(Node::Int64(1)).is_err());
}

#[test]
fn test_other_shapes_must_match() {
    let error = tree::from_node::<String>(Node::Bytes(vec![1])).unwrap_err();
    assert!(matches!(
        error,
        Error::ShapeMismatch {
            expected: Shape::String,
            actual: Shape::Bytes
        }
    ));
    let error = tree::from_node::<Pixel>(Node::Array(Vec::new())).unwrap_err();
    assert!(matches!(error, Error::ShapeMismatch { .. }));
}

#[test]
fn test_hand_built_tree_decodes() {
    let node = Node::Object(vec![
        ("y".to_owned(), Node::Int(2)),
        ("x".to_owned(), Node::from(1i32)),
    ]);
    let decoded: Pixel = tree::from_node(node).unwrap();
    assert_eq!(
        decoded,
        Pixel {
            x: 1,
            y: 2,
            ..Pixel::default()
        }
    );
}

#[cfg(feature = "serde")]
#[test]
fn test_node_serde() {
    let node = Node::Object(vec![
        ("id".to_owned(), Node::Int32(1)),
        ("ok".to_owned(), Node::Bool(true)),
    ]);
    let text = serde_json::to_string(&node).unwrap();
    assert_eq!(text, r#"{"Object":[["id",{"Int32":1}],["ok",{"Bool":true}]]}"#);
    assert_eq!(serde_json::from_str::<Node>(&text).unwrap(), node);

    let node = tree::to_node(&mut pixel()).unwrap();
    let text = serde_json::to_string(&node).unwrap();
    let decoded: Pixel = tree::from_node(serde_json::from_str(&text).unwrap()).unwrap();
    assert_eq!(decoded, pixel());
}
