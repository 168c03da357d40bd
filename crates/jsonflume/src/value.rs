//! JSON value types and text-formatting helpers.
//!
//! This module defines the [`Value`] enum, which represents any decodable or
//! encodable JSON value, plus the helpers shared by the [`Display`]
//! implementation and the streaming encoder.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// An ordered mapping with string keys, as produced for JSON objects.
///
/// Insertion order is preserved: decoding and re-encoding an object keeps its
/// properties in document order.
pub type Map = indexmap::IndexMap<String, Value>;

/// An ordered sequence of values, as produced for JSON arrays.
pub type Array = Vec<Value>;

/// A JSON number.
///
/// Decoding chooses the variant from the literal itself: a literal containing
/// `.`, `e`, or `E` becomes [`Float`], anything else becomes [`Int`]. The two
/// variants never compare equal, so `1` and `1.0` stay distinguishable
/// through a round-trip.
///
/// [`Float`]: Number::Float
/// [`Int`]: Number::Int
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(untagged))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// A 64-bit signed integer.
    Int(i64),
    /// A double-precision float.
    Float(f64),
}

impl Number {
    /// Returns the value as `f64`, widening integers.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Returns the value as `i64` if it is an integer.
    #[must_use]
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(i),
            Self::Float(_) => None,
        }
    }
}

/// A JSON value as defined by [RFC 8259], extended with [`Bytes`].
///
/// # Examples
///
/// ```
/// use jsonflume::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// ```
///
/// [`Bytes`]: Value::Bytes
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(untagged))]
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// The `null` literal.
    #[default]
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// An integer or float, see [`Number`].
    Number(Number),
    /// A string.
    String(String),
    /// Raw bytes, encoded as a Base64 string.
    ///
    /// This is a one-directional convenience: decoding always yields
    /// [`Value::String`] for such fields. A caller that knows a field is
    /// binary recovers the bytes with [`bytes_from_value`].
    ///
    /// [`bytes_from_value`]: crate::bytes_from_value
    Bytes(Vec<u8>),
    /// An ordered sequence of values.
    Array(Array),
    /// An ordered string-keyed mapping.
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Number(Number::Int(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(Number::Float(v))
    }
}

impl From<Number> for Value {
    fn from(v: Number) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Bool`].
    ///
    /// [`Bool`]: Value::Bool
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(..))
    }

    /// Returns `true` if the value is [`Number`].
    ///
    /// [`Number`]: Value::Number
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// Returns the inner `bool` if the value is [`Bool`].
    ///
    /// [`Bool`]: Value::Bool
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the inner string slice if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner [`Number`] if the value is one.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the inner array if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the inner map if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }
}

static NULL: Value = Value::Null;

impl std::ops::Index<&str> for Value {
    type Output = Value;

    /// Looks up a property of an object, yielding `Null` for missing keys or
    /// non-object values.
    fn index(&self, key: &str) -> &Value {
        match self {
            Self::Object(map) => map.get(key).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

impl std::ops::Index<usize> for Value {
    type Output = Value;

    /// Looks up an array element, yielding `Null` out of bounds or for
    /// non-array values.
    fn index(&self, index: usize) -> &Value {
        match self {
            Self::Array(arr) => arr.get(index).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

/// Writes one code point as a `\uXXXX` escape, splitting astral scalars into
/// a UTF-16 surrogate pair.
fn write_unicode_escape<W: fmt::Write>(f: &mut W, c: char) -> fmt::Result {
    let cp = c as u32;
    if cp <= 0xFFFF {
        write!(f, "\\u{cp:04X}")
    } else {
        let v = cp - 0x1_0000;
        write!(f, "\\u{:04X}\\u{:04X}", 0xD800 + (v >> 10), 0xDC00 + (v & 0x3FF))
    }
}

/// Escapes a string for inclusion in a JSON string literal (without the
/// surrounding quotes).
///
/// Covers `"`, `\`, the short escapes `\n \r \t \f \b`, and all control
/// characters. `/` is escaped as `\/` — valid but non-canonical, preserved
/// for deterministic round-trips with peer implementations. When `latin1` is
/// set, every character above U+00FF is also `\u`-escaped so the result can
/// be transcoded to ISO-8859-1 without loss.
pub(crate) fn write_escaped_string<W: fmt::Write>(
    src: &str,
    f: &mut W,
    latin1: bool,
) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '/' => f.write_str("\\/")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{000C}' => f.write_str("\\f")?,
            '\u{0008}' => f.write_str("\\b")?,
            c if c.is_control() && c as u32 <= 0xFFFF => write_unicode_escape(f, c)?,
            c if latin1 && c as u32 > 0xFF => write_unicode_escape(f, c)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Formats a float so the emitted literal re-classifies as a float.
///
/// The shortest round-trip representation of a whole-valued double may lack
/// both `.` and an exponent; appending `.0` keeps the integer/float
/// distinction intact through decode.
pub(crate) fn format_float(f: f64) -> String {
    let s = format!("{f:?}");
    if s.contains(['.', 'e', 'E']) { s } else { s + ".0" }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(n) if n.is_finite() => f.write_str(&format_float(*n)),
            // Non-finite floats have no JSON form; Display is a debugging
            // convenience and renders them as null. The encoder errors.
            Self::Float(_) => f.write_str("null"),
        }
    }
}

impl fmt::Display for Value {
    /// Formats the value in compact wire form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => {
                f.write_str("\"")?;
                write_escaped_string(s, f, false)?;
                f.write_str("\"")
            }
            Value::Bytes(b) => write!(f, "\"{}\"", BASE64.encode(b)),
            Value::Array(arr) => {
                f.write_str("[")?;
                let mut first = true;
                for v in arr {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in map {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_str("\"")?;
                    write_escaped_string(k, f, false)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_compact() {
        let mut map = Map::new();
        map.insert("a".to_string(), Value::from(1));
        map.insert("b".to_string(), Value::Array(vec![Value::Null, Value::from(true)]));
        assert_eq!(Value::Object(map).to_string(), r#"{"a":1,"b":[null,true]}"#);
    }

    #[test]
    fn display_escapes_solidus() {
        assert_eq!(Value::from("a/b").to_string(), "\"a\\/b\"");
    }

    #[test]
    fn float_formatting_keeps_marker() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-0.5), "-0.5");
        assert!(format_float(1e300).contains(['.', 'e', 'E']));
    }

    #[test]
    fn int_and_float_are_distinct() {
        assert_ne!(Value::from(1), Value::from(1.0));
    }
}
