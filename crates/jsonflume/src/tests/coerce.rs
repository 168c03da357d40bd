use crate::{
    CoerceError, DecodeError, Decoder, Map, Value, bytes_from_value, decode_str,
};

fn decoded(text: &str) -> Decoder {
    let mut decoder = Decoder::new();
    decoder.feed(text).unwrap();
    decoder.finish().unwrap();
    decoder
}

#[test]
fn scalar_targets() {
    assert_eq!(decoded("42").get_as::<i64>().unwrap(), 42);
    assert_eq!(decoded("42").get_as::<i32>().unwrap(), 42);
    assert_eq!(decoded("42").get_as::<u64>().unwrap(), 42);
    assert_eq!(decoded("2.5").get_as::<f64>().unwrap(), 2.5);
    assert!(decoded("true").get_as::<bool>().unwrap());
    assert_eq!(decoded("\"hi\"").get_as::<String>().unwrap(), "hi");
}

#[test]
fn floats_widen_from_integers() {
    assert_eq!(decoded("3").get_as::<f64>().unwrap(), 3.0);
}

#[test]
fn container_targets() {
    assert_eq!(decoded("[1,2,3]").get_as::<Vec<i64>>().unwrap(), vec![1, 2, 3]);
    let map = decoded(r#"{"a":1}"#).get_as::<Map>().unwrap();
    assert_eq!(map.get("a"), Some(&Value::from(1)));
}

#[test]
fn option_treats_null_as_none() {
    assert_eq!(decoded("null").get_as::<Option<i64>>().unwrap(), None);
    assert_eq!(decoded("7").get_as::<Option<i64>>().unwrap(), Some(7));
}

#[test]
fn mismatches_are_coerce_errors() {
    let err = decoded("\"hi\"").get_as::<i64>().unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Coerce(CoerceError::Mismatch { expected: "integer", found: "string" })
    ));
}

#[test]
fn floats_do_not_silently_truncate() {
    assert!(decoded("1.5").get_as::<i64>().is_err());
}

#[test]
fn out_of_range_integers_are_rejected() {
    assert!(matches!(
        decoded("-1").get_as::<u64>().unwrap_err(),
        DecodeError::Coerce(CoerceError::OutOfRange(-1))
    ));
    assert!(decoded("3000000000").get_as::<i32>().is_err());
}

#[test]
fn bytes_round_trip_through_base64_strings() {
    let encoded = crate::encode_to_string(
        Value::Bytes(b"binary payload".to_vec()),
        &crate::EncodeOptions::compact(),
    )
    .unwrap();

    // Decoding yields a string; the caller knows the field is binary.
    let decoded = decode_str(&encoded).unwrap();
    assert!(decoded.is_string());
    assert_eq!(bytes_from_value(decoded).unwrap(), b"binary payload");
}

#[test]
fn invalid_base64_is_reported() {
    assert!(matches!(
        bytes_from_value(Value::from("not base64!")),
        Err(CoerceError::Base64(_))
    ));
}
