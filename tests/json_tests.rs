use std::str::FromStr;

use bigdecimal::BigDecimal;
use na_inspect::{Error, Inspectable, JsonReader, ReaderConfig, ValueInspector, inspect, json};
use num_bigint::BigInt;
use num_rational::BigRational;

#[derive(Debug, Default, PartialEq)]
struct Record {
    id: i32,
    value: f64,
    array: Vec<String>,
}

impl Inspectable for Record {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut object = inspector.object("demo.record", "");
        object.int32(&mut self.id, "id", true, "");
        object.float64(&mut self.value, b'g', 16, "value", true, "");
        object.inspect(&mut self.array, "array", true, "");
        object.end();
    }
}

#[derive(Debug, Default, PartialEq)]
struct Blobs {
    raw: Vec<u8>,
    text: Vec<u8>,
}

impl Inspectable for Blobs {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut object = inspector.object("demo.blobs", "");
        object.bytes(&mut self.raw, "raw", true, "");
        object.byte_string(&mut self.text, "text", true, "");
        object.end();
    }
}

#[test]
fn test_compact_object_text() {
    let mut record = Record {
        id: 10,
        value: 1.34,
        array: vec!["hello".to_owned(), "world".to_owned(), "me".to_owned()],
    };
    let text = json::to_string(&mut record).unwrap();
    assert_eq!(text, r#"{"id":10,"value":1.34,"array":["hello","world","me"]}"#);
    assert_eq!(json::from_str::<Record>(&text).unwrap(), record);
}

#[test]
fn test_string_escaping() {
    let mut value = "quote \" backslash \\ newline \n tab \t".to_owned();
    let text = json::to_string(&mut value).unwrap();
    assert_eq!(text, r#""quote \" backslash \\ newline \n tab \t""#);
    assert_eq!(json::from_str::<String>(&text).unwrap(), value);
}

#[test]
fn test_bytes_are_unpadded_url_safe_base64() {
    let mut blobs = Blobs {
        raw: vec![0xfb, 0xff, 0x01],
        text: b"plain".to_vec(),
    };
    let text = json::to_string(&mut blobs).unwrap();
    assert_eq!(text, r#"{"raw":"-_8B","text":"plain"}"#);
    assert_eq!(json::from_str::<Blobs>(&text).unwrap(), blobs);

    let error = json::from_str::<Blobs>(r#"{"raw":"*not base64*","text":""}"#).unwrap_err();
    assert!(matches!(
        error,
        Error::InvalidValue { expected: "base64 string", ref path } if path == "$.raw"
    ));
}

#[test]
fn test_byte_strings_must_be_utf8() {
    let mut blobs = Blobs {
        raw: Vec::new(),
        text: "caf\u{e9}".as_bytes().to_vec(),
    };
    let text = json::to_string(&mut blobs).unwrap();
    assert_eq!(text, "{\"raw\":\"\",\"text\":\"caf\u{e9}\"}");
    assert_eq!(json::from_str::<Blobs>(&text).unwrap(), blobs);

    let mut blobs = Blobs {
        raw: Vec::new(),
        text: vec![0xff, 0x00, 0x80, b'a'],
    };
    let error = json::to_string(&mut blobs).unwrap_err();
    assert!(matches!(
        error,
        Error::InvalidValue { expected: "utf-8 byte string", ref path } if path == "$.text"
    ));

    let mut nested = vec![vec![b"ok".to_vec(), vec![0xc3]]];
    let mut wrapper = Lines(&mut nested);
    let error = json::to_string(&mut wrapper).unwrap_err();
    assert_eq!(error.to_string(), "utf-8 byte string required at $[0][1]");

    // bytes carry the same data without loss
    let mut blobs = Blobs {
        raw: vec![0xff, 0x00, 0x80, b'a'],
        text: Vec::new(),
    };
    let text = json::to_string(&mut blobs).unwrap();
    assert_eq!(json::from_str::<Blobs>(&text).unwrap(), blobs);
}

/// Nested lists of byte-strings.
struct Lines<'a>(&'a mut Vec<Vec<Vec<u8>>>);

impl Inspectable for Lines<'_> {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut outer = inspector.array("lines", "", "");
        outer.length(self.0.len());
        for group in self.0.iter_mut() {
            let mut inner = outer.value().array("group", "byte_string", "");
            inner.length(group.len());
            for line in group.iter_mut() {
                inner.value().byte_string(line, "", "");
            }
            inner.end();
        }
        outer.end();
    }
}

#[test]
fn test_arbitrary_precision_numbers_are_strings() {
    let mut big = BigInt::from_str("123456789012345678901234567890").unwrap();
    assert_eq!(
        json::to_string(&mut big).unwrap(),
        r#""123456789012345678901234567890""#
    );
    assert_eq!(json::from_str::<BigInt>("42").unwrap(), BigInt::from(42));

    let mut ratio = BigRational::new(BigInt::from(1), BigInt::from(3));
    assert_eq!(json::to_string(&mut ratio).unwrap(), r#""1/3""#);
    assert_eq!(json::from_str::<BigRational>(r#""0.25""#).unwrap(), BigRational::new(1.into(), 4.into()));

    let mut decimal = BigDecimal::from_str("2.50").unwrap();
    let text = json::to_string(&mut decimal).unwrap();
    assert_eq!(json::from_str::<BigDecimal>(&text).unwrap(), decimal);
    assert_eq!(json::from_str::<BigDecimal>("0.5").unwrap(), BigDecimal::from_str("0.5").unwrap());
}

#[test]
fn test_rat_with_fixed_precision() {
    struct Share(BigRational);

    impl Inspectable for Share {
        fn inspect(&mut self, inspector: ValueInspector<'_>) {
            inspector.rat(&mut self.0, 3, "", "");
        }
    }

    let mut share = Share(BigRational::new(BigInt::from(-2), BigInt::from(3)));
    assert_eq!(json::to_string(&mut share).unwrap(), r#""-0.667""#);
}

#[test]
fn test_non_finite_floats() {
    let mut values = vec![f64::INFINITY, f64::NEG_INFINITY, 0.5];
    let text = json::to_string(&mut values).unwrap();
    assert_eq!(text, r#"["+Inf","-Inf",0.5]"#);
    assert_eq!(json::from_str::<Vec<f64>>(&text).unwrap(), values);
}

#[test]
fn test_error_paths() {
    let error = json::from_str::<Record>(r#"{"id":1,"value":1,"array":["a",2]}"#).unwrap_err();
    assert!(matches!(
        error,
        Error::InvalidValue { expected: "string", ref path } if path == "$.array[1]"
    ));

    let error = json::from_str::<Record>(r#"{"id":"1","value":1,"array":[]}"#).unwrap_err();
    assert_eq!(error.to_string(), "32-bit integer required at $.id");

    let error = json::from_str::<Record>(r#"[1]"#).unwrap_err();
    assert!(matches!(error, Error::InvalidValue { expected: "json object", .. }));
}

#[test]
fn test_int32_out_of_range() {
    let error = json::from_str::<i32>("4294967296").unwrap_err();
    assert!(matches!(error, Error::InvalidValue { expected: "32-bit integer", .. }));
    assert_eq!(json::from_str::<i64>("4294967296").unwrap(), 4_294_967_296);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let decoded: Record =
        json::from_str(r#"{"id":1,"extra":{"deep":[1,2]},"value":2.5,"array":[]}"#).unwrap();
    assert_eq!(decoded.id, 1);
    assert_eq!(decoded.value, 2.5);
}

#[test]
fn test_reader_limits() {
    let config = ReaderConfig::default().with_max_depth(2);
    let error = JsonReader::with_config("[[[1]]]", config).err().unwrap();
    assert!(matches!(error, Error::DepthLimitExceeded(2)));

    let config = ReaderConfig::default().with_max_depth(3);
    let mut value: Vec<Vec<Vec<i64>>> = Vec::new();
    let mut reader = JsonReader::with_config("[[[1]]]", config).unwrap();
    inspect(&mut value, &mut reader).unwrap();
    assert_eq!(value, vec![vec![vec![1]]]);

    let config = ReaderConfig::default().with_max_len(2);
    let mut value: Vec<i64> = Vec::new();
    let mut reader = JsonReader::with_config("[1,2,3]", config).unwrap();
    let error = inspect(&mut value, &mut reader).unwrap_err();
    assert!(matches!(error, Error::ListTooLong(3)));
}

#[test]
fn test_nesting_up_to_the_configured_depth() {
    let deep = format!("{}{}", "[".repeat(300), "]".repeat(300));
    assert!(JsonReader::new(&deep).is_ok());

    let too_deep = format!("{}{}", "[".repeat(600), "]".repeat(600));
    let error = JsonReader::new(&too_deep).err().unwrap();
    assert!(matches!(error, Error::DepthLimitExceeded(512)));
}

#[test]
fn test_trailing_text_is_rejected() {
    assert!(JsonReader::new("[1] \n").is_ok());
    let error = JsonReader::new("[1] [2]").err().unwrap();
    assert!(matches!(error, Error::TrailingData(3)));
    assert!(matches!(JsonReader::new("  "), Err(Error::EndOfFile)));
}

#[test]
fn test_malformed_text() {
    assert!(matches!(json::from_str::<Record>("{\"id\":"), Err(Error::Json(_))));
}
