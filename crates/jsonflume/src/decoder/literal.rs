//! Classification of unquoted bare literals.
//!
//! Once the decoder terminates a run of non-structural characters it must be
//! one of `null`, `true`, `false`, or a number. Numbers with a `.` or
//! exponent marker parse as floats; everything else parses as a 64-bit
//! integer, with one legacy exception below.

use crate::value::{Number, Value};

/// `i64::MAX` as emitted by peers that round it through a double. Accepted
/// as the exact maximum for cross-platform numeric compatibility.
const DOUBLE_ROUNDED_LONG_MAX: &str = "9223372036854776000";

/// Classifies a completed bare literal into a [`Value`].
pub(crate) fn classify_literal(text: &str) -> Result<Value, &'static str> {
    match text {
        "null" => return Ok(Value::Null),
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        DOUBLE_ROUNDED_LONG_MAX => return Ok(Value::Number(Number::Int(i64::MAX))),
        _ => {}
    }

    let leading = text.chars().next().ok_or("empty literal")?;
    if leading != '-' && !leading.is_ascii_digit() {
        return Err("unrecognized bare literal");
    }

    if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| Value::Number(Number::Float(f)))
            .ok_or("invalid numeric literal")
    } else {
        text.parse::<i64>()
            .map(|i| Value::Number(Number::Int(i)))
            .map_err(|_| "invalid numeric literal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(classify_literal("null").unwrap(), Value::Null);
        assert_eq!(classify_literal("true").unwrap(), Value::Bool(true));
        assert_eq!(classify_literal("false").unwrap(), Value::Bool(false));
    }

    #[test]
    fn integers_stay_integers() {
        assert_eq!(classify_literal("1").unwrap(), Value::Number(Number::Int(1)));
        assert_eq!(classify_literal("-12").unwrap(), Value::Number(Number::Int(-12)));
        assert_eq!(
            classify_literal("9223372036854775807").unwrap(),
            Value::Number(Number::Int(i64::MAX))
        );
    }

    #[test]
    fn markers_select_float() {
        assert_eq!(classify_literal("1.0").unwrap(), Value::Number(Number::Float(1.0)));
        assert_eq!(classify_literal("1e2").unwrap(), Value::Number(Number::Float(100.0)));
        assert_eq!(classify_literal("-2.5E-1").unwrap(), Value::Number(Number::Float(-0.25)));
    }

    #[test]
    fn double_rounded_long_max_is_special_cased() {
        assert_eq!(
            classify_literal("9223372036854776000").unwrap(),
            Value::Number(Number::Int(i64::MAX))
        );
    }

    #[test]
    fn out_of_range_integer_is_an_error() {
        assert!(classify_literal("92233720368547758080").is_err());
    }

    #[test]
    fn overflowing_float_is_an_error() {
        assert!(classify_literal("1e999").is_err());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(classify_literal("trueish").is_err());
        assert!(classify_literal("nan").is_err());
        assert!(classify_literal("1.2.3").is_err());
        assert!(classify_literal("-").is_err());
    }
}
