use std::borrow::Cow;

use crate::{
    EncodeError, EncodeOptions, Encoder, Map, Value, decode_str, encode_to_string, encode_to_vec,
};

fn sample() -> Value {
    let mut map = Map::new();
    map.insert(
        "x".to_string(),
        Value::Array(vec![Value::from(1), Value::from("two"), Value::Null, Value::Bool(true)]),
    );
    Value::Object(map)
}

#[test]
fn indented_output() {
    let expected = "{\n  \"x\": [\n    1,\n    \"two\",\n    null,\n    true\n  ]\n}";
    assert_eq!(encode_to_string(sample(), &EncodeOptions::default()).unwrap(), expected);
}

#[test]
fn compact_output() {
    assert_eq!(
        encode_to_string(sample(), &EncodeOptions::compact()).unwrap(),
        r#"{"x":[1,"two",null,true]}"#
    );
}

#[test]
fn custom_line_terminator() {
    let options = EncodeOptions { newline: Cow::Borrowed("\r\n"), ..EncodeOptions::default() };
    let out = encode_to_string(
        Value::Array(vec![Value::from(1), Value::from(2)]),
        &options,
    )
    .unwrap();
    assert_eq!(out, "[\r\n  1,\r\n  2\r\n]");
}

#[test]
fn empty_containers_stay_inline() {
    let mut map = Map::new();
    map.insert("a".to_string(), Value::Object(Map::new()));
    map.insert("b".to_string(), Value::Array(vec![]));
    let out = encode_to_string(Value::Object(map), &EncodeOptions::default()).unwrap();
    assert_eq!(out, "{\n  \"a\": {},\n  \"b\": []\n}");
}

#[test]
fn string_escapes() {
    let out = encode_to_string(Value::from("a/b\n\"c\"\\"), &EncodeOptions::compact()).unwrap();
    assert_eq!(out, r#""a\/b\n\"c\"\\""#);
}

#[test]
fn control_characters_are_escaped() {
    let out = encode_to_string(Value::from("a\u{0001}b"), &EncodeOptions::compact()).unwrap();
    assert_eq!(out, "\"a\\u0001b\"");
}

#[test]
fn numbers_keep_their_classification() {
    assert_eq!(encode_to_string(Value::from(1), &EncodeOptions::compact()).unwrap(), "1");
    assert_eq!(encode_to_string(Value::from(1.0), &EncodeOptions::compact()).unwrap(), "1.0");
    let big = encode_to_string(Value::from(1e300), &EncodeOptions::compact()).unwrap();
    assert!(decode_str(&big).unwrap().as_number().unwrap().as_i64().is_none());
}

#[test]
fn bytes_encode_as_base64_strings() {
    let out =
        encode_to_string(Value::Bytes(b"hello".to_vec()), &EncodeOptions::compact()).unwrap();
    assert_eq!(out, "\"aGVsbG8=\"");
}

#[test]
fn non_finite_numbers_are_unsupported() {
    let err = encode_to_string(Value::from(f64::NAN), &EncodeOptions::compact()).unwrap_err();
    assert!(matches!(err, EncodeError::Unsupported { .. }));
    assert!(
        encode_to_string(Value::from(f64::INFINITY), &EncodeOptions::compact()).is_err()
    );
}

#[test]
fn an_errored_encoder_yields_nothing_further() {
    let mut encoder = Encoder::new(EncodeOptions::compact());
    encoder.put(Value::Array(vec![Value::from(f64::NAN), Value::from(1)]));
    let mut saw_error = false;
    for chunk in encoder.by_ref() {
        if chunk.is_err() {
            saw_error = true;
            break;
        }
    }
    assert!(saw_error);
    assert!(encoder.next_chunk().is_none());
}

#[test]
fn chunked_pull_equals_full_serialization() {
    let mut encoder = Encoder::new(EncodeOptions::default());
    encoder.put(sample());
    let mut pulled = String::new();
    while let Some(chunk) = encoder.next_chunk() {
        pulled.push_str(&chunk.unwrap());
    }
    assert_eq!(pulled, encode_to_string(sample(), &EncodeOptions::default()).unwrap());
}

#[test]
fn byte_reads_fill_small_buffers() {
    let mut encoder = Encoder::new(EncodeOptions::compact());
    encoder.put(sample());
    let mut out = Vec::new();
    let mut buf = [0u8; 5];
    loop {
        let n = encoder.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(out, encode_to_vec(sample(), &EncodeOptions::compact()).unwrap());
}

#[test]
fn reencoding_requires_a_fresh_put() {
    let mut encoder = Encoder::new(EncodeOptions::compact());
    encoder.put(Value::from(1));
    assert_eq!(encoder.next_chunk().unwrap().unwrap(), "1");
    assert!(encoder.next_chunk().is_none());

    encoder.put(Value::from(2));
    assert_eq!(encoder.next_chunk().unwrap().unwrap(), "2");
    assert!(encoder.next_chunk().is_none());
}

#[test]
fn latin1_output_escapes_wide_characters() {
    let options = EncodeOptions {
        indent: 0,
        encoding: crate::TextEncoding::Latin1,
        ..EncodeOptions::default()
    };
    let out = encode_to_vec(Value::from("é\u{1F600}"), &options).unwrap();
    assert_eq!(out, b"\"\xE9\\uD83D\\uDE00\"");
}
