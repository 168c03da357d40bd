//! A streaming, incremental JSON codec.
//!
//! Two independent halves share one value model ([`Value`]):
//!
//! - [`Decoder`] is a push-based parse state machine. It accepts character or
//!   byte chunks split at arbitrary boundaries (mid-token, mid-escape,
//!   mid-UTF-8 sequence) and assembles one value tree per document, exposing
//!   its resumable [`DecodeState`] after every feed.
//! - [`Encoder`] is a lazy pull-based serializer. Given a root value it
//!   produces output in small chunks without ever materializing the whole
//!   document.
//!
//! ```rust
//! use jsonflume::{decode_str, encode_to_string, EncodeOptions, Value};
//!
//! let value = decode_str(r#"{"greeting": "hello"}"#).unwrap();
//! assert_eq!(value["greeting"], Value::from("hello"));
//!
//! let text = encode_to_string(value, &EncodeOptions::compact()).unwrap();
//! assert_eq!(text, r#"{"greeting":"hello"}"#);
//! ```
//!
//! Two non-standard extensions of the wire format are supported for
//! compatibility: C-style comments are tolerated in input (reported through
//! [`Decoder::on_comment`], never emitted), and `/` is escaped as `\/` in
//! output strings.

mod coerce;
mod decoder;
mod encoder;
mod encoding;
mod error;
mod introspect;
mod io;
mod value;

#[cfg(test)]
mod tests;

pub use coerce::{CoerceError, FromValue, bytes_from_value};
pub use decoder::{DecodeState, Decoder, decode_bytes, decode_str};
pub use encoder::{EncodeOptions, Encoder, encode_to_string, encode_to_vec};
pub use encoding::TextEncoding;
pub use error::{DecodeError, EncodeError};
pub use introspect::Introspect;
pub use io::{StreamError, decode_reader, encode_to_writer};
pub use value::{Array, Map, Number, Value};
