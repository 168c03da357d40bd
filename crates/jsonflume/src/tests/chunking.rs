use quickcheck::QuickCheck;

use crate::{DecodeState, Decoder, EncodeOptions, Value, encode_to_string, encode_to_vec};

fn test_count() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}

/// Property: feeding a document in arbitrarily sized character chunks must
/// yield the same value as feeding it whole.
#[test]
fn char_partition_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, splits: Vec<usize>) -> bool {
        let src = encode_to_string(value.clone(), &EncodeOptions::default()).unwrap();
        let chars: Vec<char> = src.chars().collect();

        let mut decoder = Decoder::new();
        let mut idx = 0;
        let mut remaining = chars.len();
        for s in splits {
            if remaining == 0 {
                break;
            }
            let size = 1 + (s % remaining);
            let chunk: String = chars[idx..idx + size].iter().collect();
            decoder.feed(&chunk).unwrap();
            idx += size;
            remaining -= size;
        }
        if remaining > 0 {
            let chunk: String = chars[idx..].iter().collect();
            decoder.feed(&chunk).unwrap();
        }

        decoder.finish().unwrap() == DecodeState::Ok && decoder.get().unwrap() == value
    }

    QuickCheck::new().tests(test_count()).quickcheck(prop as fn(Value, Vec<usize>) -> bool);
}

/// Property: byte chunks may be split anywhere, including inside a UTF-8
/// sequence; the transcoding carry must make the result identical.
#[test]
fn byte_partition_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, splits: Vec<usize>) -> bool {
        let src = encode_to_vec(value.clone(), &EncodeOptions::compact()).unwrap();

        let mut decoder = Decoder::new();
        let mut idx = 0;
        let mut remaining = src.len();
        for s in splits {
            if remaining == 0 {
                break;
            }
            let size = 1 + (s % remaining);
            decoder.feed_bytes(&src[idx..idx + size]).unwrap();
            idx += size;
            remaining -= size;
        }
        if remaining > 0 {
            decoder.feed_bytes(&src[idx..]).unwrap();
        }

        decoder.finish().unwrap() == DecodeState::Ok && decoder.get().unwrap() == value
    }

    QuickCheck::new().tests(test_count()).quickcheck(prop as fn(Value, Vec<usize>) -> bool);
}

#[test]
fn split_inside_escape_sequence() {
    let mut decoder = Decoder::new();
    decoder.feed("\"a\\").unwrap();
    decoder.feed("u00").unwrap();
    decoder.feed("41b\"").unwrap();
    assert_eq!(decoder.state(), DecodeState::Ok);
    assert_eq!(decoder.get().unwrap(), Value::from("aAb"));
}

#[test]
fn split_inside_surrogate_pair() {
    let mut decoder = Decoder::new();
    decoder.feed("\"\\uD8").unwrap();
    decoder.feed("3D\\uDE").unwrap();
    decoder.feed("00\"").unwrap();
    assert_eq!(decoder.get().unwrap(), Value::from("\u{1F600}"));
}

#[test]
fn split_inside_literal() {
    let mut decoder = Decoder::new();
    decoder.feed("[tr").unwrap();
    decoder.feed("ue, fal").unwrap();
    decoder.feed("se]").unwrap();
    assert_eq!(
        decoder.get().unwrap(),
        Value::Array(vec![Value::Bool(true), Value::Bool(false)])
    );
}
