//! Coercion of decoded values into caller types.
//!
//! [`FromValue`] is the decode-side half of the object-model capability: it
//! turns an assembled [`Value`] into a target shape without the codec ever
//! knowing about the caller's types. [`Decoder::get_as`] applies it to the
//! root value.
//!
//! [`Decoder::get_as`]: crate::Decoder::get_as

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

use crate::value::{Map, Number, Value};

/// A coercion failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    /// The value's shape does not match the target type.
    #[error("expected {expected}, found {found}")]
    Mismatch {
        /// What the target type required.
        expected: &'static str,
        /// What the value actually was.
        found: &'static str,
    },

    /// An integer does not fit the target integer type.
    #[error("integer {0} out of range for target type")]
    OutOfRange(i64),

    /// A string could not be Base64-decoded into bytes.
    #[error("invalid base64 payload: {0}")]
    Base64(String),
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(Number::Int(_)) => "integer",
        Value::Number(Number::Float(_)) => "float",
        Value::String(_) => "string",
        Value::Bytes(_) => "bytes",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Builds `Self` from a decoded [`Value`].
pub trait FromValue: Sized {
    /// Coerces `value`, consuming it.
    ///
    /// # Errors
    ///
    /// [`CoerceError`] when the value does not fit the target shape.
    fn from_value(value: Value) -> Result<Self, CoerceError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(CoerceError::Mismatch { expected: "boolean", found: kind(&other) }),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Number(Number::Int(i)) => Ok(i),
            other => Err(CoerceError::Mismatch { expected: "integer", found: kind(&other) }),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        let wide = i64::from_value(value)?;
        Self::try_from(wide).map_err(|_| CoerceError::OutOfRange(wide))
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        let wide = i64::from_value(value)?;
        Self::try_from(wide).map_err(|_| CoerceError::OutOfRange(wide))
    }
}

impl FromValue for f64 {
    /// Accepts both number variants, widening integers.
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            other => Err(CoerceError::Mismatch { expected: "number", found: kind(&other) }),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(CoerceError::Mismatch { expected: "string", found: kind(&other) }),
        }
    }
}

/// Recovers binary content from its Base64 string form.
///
/// Decoding never produces [`Value::Bytes`] on its own; a caller that knows
/// a field is binary applies this coercion to the decoded string.
///
/// # Errors
///
/// [`CoerceError`] when the value is neither bytes nor a Base64 string.
pub fn bytes_from_value(value: Value) -> Result<Vec<u8>, CoerceError> {
    match value {
        Value::Bytes(b) => Ok(b),
        Value::String(s) => {
            BASE64.decode(s.as_bytes()).map_err(|e| CoerceError::Base64(e.to_string()))
        }
        other => Err(CoerceError::Mismatch { expected: "base64 string", found: kind(&other) }),
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(CoerceError::Mismatch { expected: "array", found: kind(&other) }),
        }
    }
}

impl FromValue for Map {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Object(map) => Ok(map),
            other => Err(CoerceError::Mismatch { expected: "object", found: kind(&other) }),
        }
    }
}
