use rstest::rstest;

use crate::{DecodeError, DecodeState, Decoder, decode_str};

#[rstest]
#[case::dangling_property(r#"{"a": }"#, DecodeState::Value)]
#[case::double_separator("[1,,2]", DecodeState::Value)]
#[case::trailing_comma_in_array("[1,]", DecodeState::Value)]
#[case::trailing_comma_in_object(r#"{"a":1,}"#, DecodeState::Name)]
#[case::unquoted_key("{a:1}", DecodeState::Name)]
#[case::missing_separator(r#"{"a" 1}"#, DecodeState::ValueSeparator)]
#[case::mismatched_close("[1}", DecodeState::ItemSeparator)]
#[case::close_without_open("}", DecodeState::Value)]
#[case::leading_separator(",", DecodeState::Value)]
#[case::bare_garbage("tru3", DecodeState::Value)]
#[case::out_of_range_integer("92233720368547758080", DecodeState::Value)]
#[case::malformed_float("1.2.3", DecodeState::Value)]
#[case::unterminated_string("\"ab", DecodeState::Value)]
#[case::bad_escape("\"a\\qb\"", DecodeState::Value)]
#[case::lone_high_surrogate("\"\\uD800\"", DecodeState::Value)]
#[case::lone_low_surrogate("\"\\uDC00\"", DecodeState::Value)]
#[case::control_character_in_string("\"a\u{0001}b\"", DecodeState::Value)]
#[case::stray_slash("/x", DecodeState::Whitespace)]
fn malformed_inputs(#[case] input: &str, #[case] expected_state: DecodeState) {
    match decode_str(input) {
        Err(DecodeError::Malformed { state, .. }) => assert_eq!(state, expected_state),
        other => panic!("expected Malformed for {input:?}, got {other:?}"),
    }
}

#[rstest]
#[case::empty("", DecodeState::Value)]
#[case::open_object("{", DecodeState::Name)]
#[case::missing_value(r#"{"a":"#, DecodeState::Value)]
#[case::open_array("[1,", DecodeState::Value)]
#[case::half_array("[1", DecodeState::ItemSeparator)]
#[case::unterminated_comment("[1 /* still open", DecodeState::Whitespace)]
fn premature_ends(#[case] input: &str, #[case] expected_state: DecodeState) {
    match decode_str(input) {
        Err(DecodeError::PrematureEnd { state, .. }) => assert_eq!(state, expected_state),
        other => panic!("expected PrematureEnd for {input:?}, got {other:?}"),
    }
}

#[test]
fn error_reports_the_pending_fragment() {
    let err = decode_str(r#"{"a": tru}"#).unwrap_err();
    let DecodeError::Malformed { fragment, state, .. } = &err else {
        panic!("expected Malformed, got {err:?}");
    };
    assert_eq!(fragment, "tru");
    assert_eq!(*state, DecodeState::Value);
    let message = err.to_string();
    assert!(message.contains("tru"), "missing fragment in {message:?}");
    assert!(message.contains("Value"), "missing state in {message:?}");
}

#[test]
fn error_reports_line_and_column() {
    let err = decode_str("[1,\n  }]").unwrap_err();
    let DecodeError::Malformed { line, column, .. } = err else {
        panic!("expected Malformed, got {err:?}");
    };
    assert_eq!(line, 2);
    assert_eq!(column, 3);
}

#[test]
fn trailing_data_is_rejected() {
    let err = decode_str("1 2").unwrap_err();
    let DecodeError::Malformed { reason, .. } = &err else {
        panic!("expected Malformed, got {err:?}");
    };
    assert!(reason.contains("trailing"), "unexpected reason {reason:?}");
}

#[test]
fn a_failed_decoder_stays_failed() {
    let mut decoder = Decoder::new();
    assert!(decoder.feed("[}").is_err());
    assert!(decoder.feed("[1]").is_err());
}

#[test]
fn get_before_completion_is_premature() {
    let mut decoder = Decoder::new();
    decoder.feed("{\"a\": 12").unwrap();
    match decoder.get() {
        Err(DecodeError::PrematureEnd { state, fragment }) => {
            assert_eq!(state, DecodeState::Value);
            assert_eq!(fragment, "12");
        }
        other => panic!("expected PrematureEnd, got {other:?}"),
    }
}

#[test]
fn invalid_byte_sequence_is_malformed() {
    let mut decoder = Decoder::new();
    assert!(matches!(decoder.feed_bytes(&[0xFF]), Err(DecodeError::Malformed { .. })));
}
