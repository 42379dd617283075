//! Array and map length negotiation

use std::collections::BTreeMap;

use na_inspect::{
    BigEndian, BinaryReader, Error, Inspectable, JsonReader, JsonWriter, Session, ValueInspector,
    binary, inspect, json, tree,
};

/// Records the length reported before any element is read.
#[derive(Default)]
struct Counted {
    reported: usize,
    values: Vec<i32>,
}

impl Inspectable for Counted {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut array = inspector.array("test.counted", "int32", "");
        let len = array.length(self.values.len());
        self.reported = len;
        if array.is_reading() {
            self.values.resize(len, 0);
        }
        for value in &mut self.values {
            array.int32(value);
        }
        array.end();
    }
}

#[derive(Default)]
struct CountedMap {
    reported: usize,
    values: BTreeMap<String, i64>,
}

impl Inspectable for CountedMap {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut map = inspector.map("test.counted_map", "int64", "");
        if map.is_reading() {
            self.reported = map.get_length();
            for _ in 0..self.reported {
                let key = map.next_key();
                let value = map.read_int64();
                self.values.insert(key, value);
            }
        } else {
            map.set_length(self.values.len());
            for (key, value) in &self.values {
                map.write_int64(key, *value);
            }
        }
        map.end();
    }
}

fn counted(n: usize) -> Counted {
    Counted {
        reported: 0,
        values: (0..n as i32).collect(),
    }
}

fn counted_map(n: usize) -> CountedMap {
    CountedMap {
        reported: 0,
        values: (0..n as i64).map(|i| (format!("k{i:05}"), i * 3)).collect(),
    }
}

#[test]
fn test_array_lengths_binary() {
    for n in [0, 1, 10_000] {
        let mut value = counted(n);
        let bytes = binary::to_vec_be(&mut value).unwrap();
        let decoded: Counted = binary::from_slice_be(&bytes).unwrap();
        assert_eq!(decoded.reported, n);
        assert_eq!(decoded.values, value.values);
    }
}

#[test]
fn test_array_lengths_json() {
    for n in [0, 1, 10_000] {
        let mut value = counted(n);
        let text = json::to_string(&mut value).unwrap();
        let decoded: Counted = json::from_str(&text).unwrap();
        assert_eq!(decoded.reported, n);
        assert_eq!(decoded.values, value.values);
    }
}

#[test]
fn test_map_lengths() {
    for n in [0, 1, 10_000] {
        let mut value = counted_map(n);

        let bytes = binary::to_vec_le(&mut value).unwrap();
        let decoded: CountedMap = binary::from_slice_le(&bytes).unwrap();
        assert_eq!(decoded.reported, n);
        assert_eq!(decoded.values, value.values);

        let text = json::to_string(&mut value).unwrap();
        let decoded: CountedMap = json::from_str(&text).unwrap();
        assert_eq!(decoded.reported, n);
        assert_eq!(decoded.values, value.values);

        let node = tree::to_node(&mut value).unwrap();
        let decoded: CountedMap = tree::from_node(node).unwrap();
        assert_eq!(decoded.reported, n);
        assert_eq!(decoded.values, value.values);
    }
}

#[test]
fn test_reader_ignores_requested_length() {
    struct Greedy(usize);

    impl Inspectable for Greedy {
        fn inspect(&mut self, inspector: ValueInspector<'_>) {
            let mut array = inspector.array("", "", "");
            self.0 = array.length(999);
            let mut scratch = 0i64;
            for _ in 0..self.0 {
                array.int64(&mut scratch);
            }
            array.end();
        }
    }

    let mut greedy = Greedy(0);
    let mut reader = JsonReader::new("[1,2,3]").unwrap();
    inspect(&mut greedy, &mut reader).unwrap();
    assert_eq!(greedy.0, 3);
}

#[test]
fn test_too_few_elements_fails_on_end() {
    struct Short;

    impl Inspectable for Short {
        fn inspect(&mut self, inspector: ValueInspector<'_>) {
            let mut array = inspector.array("", "", "");
            array.length(2);
            array.int32(&mut 1);
            array.end();
        }
    }

    let mut writer = JsonWriter::new();
    let error = inspect(&mut Short, &mut writer).unwrap_err();
    assert!(matches!(
        error,
        Error::LengthMismatch {
            declared: 2,
            actual: 1
        }
    ));
}

#[test]
fn test_too_many_elements_fails() {
    struct Long;

    impl Inspectable for Long {
        fn inspect(&mut self, inspector: ValueInspector<'_>) {
            let mut array = inspector.array("", "", "");
            array.length(1);
            array.int32(&mut 1);
            array.int32(&mut 2);
            array.end();
        }
    }

    let mut writer = JsonWriter::new();
    let error = inspect(&mut Long, &mut writer).unwrap_err();
    assert!(matches!(
        error,
        Error::LengthMismatch {
            declared: 1,
            actual: 2
        }
    ));
}

#[test]
fn test_element_before_length_fails() {
    struct Eager;

    impl Inspectable for Eager {
        fn inspect(&mut self, inspector: ValueInspector<'_>) {
            let mut array = inspector.array("", "", "");
            array.int32(&mut 1);
            array.end();
        }
    }

    let mut writer = JsonWriter::new();
    let error = inspect(&mut Eager, &mut writer).unwrap_err();
    assert!(matches!(error, Error::CallOrder(_)));
}

#[test]
fn test_direction_specific_length_calls() {
    struct GetOnWriter;

    impl Inspectable for GetOnWriter {
        fn inspect(&mut self, inspector: ValueInspector<'_>) {
            let mut array = inspector.array("", "", "");
            array.get_length();
            array.end();
        }
    }

    struct SetOnReader;

    impl Inspectable for SetOnReader {
        fn inspect(&mut self, inspector: ValueInspector<'_>) {
            let mut map = inspector.map("", "", "");
            map.set_length(0);
            map.end();
        }
    }

    let mut writer = JsonWriter::new();
    let error = inspect(&mut GetOnWriter, &mut writer).unwrap_err();
    assert!(matches!(error, Error::ReadingFromWriter));

    let bytes = binary::to_vec_be(&mut BTreeMap::<String, i32>::new()).unwrap();
    let mut reader = BinaryReader::<BigEndian>::new(&bytes).unwrap();
    let error = inspect(&mut SetOnReader, &mut reader).unwrap_err();
    assert!(matches!(error, Error::WritingToReader));
}

#[test]
fn test_map_value_read_before_key_fails() {
    struct Keyless;

    impl Inspectable for Keyless {
        fn inspect(&mut self, inspector: ValueInspector<'_>) {
            let mut map = inspector.map("", "", "");
            map.get_length();
            map.read_string();
            map.end();
        }
    }

    let mut reader = JsonReader::new(r#"{"a":"b"}"#).unwrap();
    let mut session = Session::new(&mut reader);
    session.inspect(&mut Keyless);
    assert!(matches!(session.error(), Some(Error::CallOrder(_))));
}

#[test]
fn test_map_duplicate_keys_overwrite() {
    struct Duplicated;

    impl Inspectable for Duplicated {
        fn inspect(&mut self, inspector: ValueInspector<'_>) {
            let mut map = inspector.map("", "int64", "");
            map.set_length(2);
            map.write_int64("a", 1);
            map.write_int64("a", 5);
            map.end();
        }
    }

    let bytes = binary::to_vec_be(&mut Duplicated).unwrap();
    let decoded: BTreeMap<String, i64> = binary::from_slice_be(&bytes).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded.get("a"), Some(&5));

    let mut value = CountedMap::default();
    let mut reader = JsonReader::from_value(serde_json::json!({"a": 1, "b": 2}));
    inspect(&mut value, &mut reader).unwrap();
    assert_eq!(value.reported, 2);
    assert_eq!(value.values.get("b"), Some(&2));
}
