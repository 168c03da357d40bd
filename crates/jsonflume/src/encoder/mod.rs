//! The lazy pull-based streaming encoder.
//!
//! [`Encoder`] serializes a [`Value`] tree without materializing the whole
//! output: a depth-first pre-order walk is realized as an explicit stack of
//! container frames plus a queue of already-materialized text fragments, so
//! no recursion takes place and the caller pulls output in small chunks.
//!
//! # Examples
//!
//! ```rust
//! use jsonflume::{EncodeOptions, Encoder, Value};
//!
//! let mut encoder = Encoder::new(EncodeOptions::compact());
//! encoder.put(Value::Array(vec![Value::from(1), Value::Null]));
//!
//! let mut out = String::new();
//! while let Some(chunk) = encoder.next_chunk() {
//!     out.push_str(&chunk.unwrap());
//! }
//! assert_eq!(out, "[1,null]");
//! ```

use std::borrow::Cow;
use std::collections::VecDeque;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::encoding::{TextEncoding, transcode_out};
use crate::error::EncodeError;
use crate::value::{Number, Value, format_float, write_escaped_string};

/// Options controlling the serialized form.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Spaces of indentation added per nesting level. `0` selects compact
    /// mode: no indentation, no line terminators, no space after `:`.
    pub indent: usize,
    /// Line terminator between items when indenting.
    pub newline: Cow<'static, str>,
    /// Text encoding for byte-oriented reads.
    pub encoding: TextEncoding,
}

impl Default for EncodeOptions {
    /// Indented output: two spaces per level, `\n` line terminator, UTF-8.
    fn default() -> Self {
        Self { indent: 2, newline: Cow::Borrowed("\n"), encoding: TextEncoding::Utf8 }
    }
}

impl EncodeOptions {
    /// Compact single-line output.
    #[must_use]
    pub fn compact() -> Self {
        Self { indent: 0, ..Self::default() }
    }
}

/// One open container on the encode stack, holding the iterator over its
/// remaining children.
enum Frame {
    Array { iter: std::vec::IntoIter<Value>, first: bool },
    Object { iter: indexmap::map::IntoIter<String, Value>, first: bool },
}

/// What advancing the top frame produced.
enum Advance {
    ArrayChild(Value, bool),
    ObjectChild(String, Value, bool),
    Close(&'static str),
}

/// A lazy streaming JSON encoder.
///
/// Install a root with [`put`], then pull output with [`next_chunk`] (text)
/// or [`read`] (bytes in the configured encoding). Once the iterator is
/// exhausted, encoding is complete; re-encoding requires a fresh `put`.
///
/// Instances are single-threaded and non-reentrant; distinct instances are
/// fully independent.
///
/// [`put`]: Encoder::put
/// [`next_chunk`]: Encoder::next_chunk
/// [`read`]: Encoder::read
pub struct Encoder {
    opts: EncodeOptions,
    /// Root value staged by `put`, consumed by the first pull.
    start: Option<Value>,
    queue: VecDeque<Cow<'static, str>>,
    stack: Vec<Frame>,
    failed: bool,
    /// Transcoded bytes of a fragment partially drained by `read`.
    byte_tail: Vec<u8>,
    byte_pos: usize,
}

impl std::fmt::Debug for Encoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encoder")
            .field("opts", &self.opts)
            .field("depth", &self.stack.len())
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl Encoder {
    /// Creates an encoder with the given options and no root installed.
    #[must_use]
    pub fn new(opts: EncodeOptions) -> Self {
        Self {
            opts,
            start: None,
            queue: VecDeque::new(),
            stack: Vec::new(),
            failed: false,
            byte_tail: Vec::new(),
            byte_pos: 0,
        }
    }

    /// Installs a new root value and resets the output iterator.
    pub fn put(&mut self, root: Value) {
        self.start = Some(root);
        self.queue.clear();
        self.stack.clear();
        self.failed = false;
        self.byte_tail.clear();
        self.byte_pos = 0;
    }

    /// Pulls the next fragment of output text.
    ///
    /// Returns `None` once the installed value is fully serialized (or no
    /// value is installed). After an error, the encoder yields nothing
    /// further until the next [`put`].
    ///
    /// # Errors
    ///
    /// [`EncodeError::Unsupported`] for values with no JSON representation
    /// (non-finite numbers).
    ///
    /// [`put`]: Encoder::put
    #[allow(clippy::missing_panics_doc)]
    pub fn next_chunk(&mut self) -> Option<Result<Cow<'static, str>, EncodeError>> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(fragment) = self.queue.pop_front() {
                return Some(Ok(fragment));
            }
            if let Some(root) = self.start.take() {
                if let Err(err) = self.emit_value(root) {
                    self.failed = true;
                    return Some(Err(err));
                }
                continue;
            }
            self.stack.last_mut()?;
            if let Err(err) = self.advance() {
                self.failed = true;
                return Some(Err(err));
            }
        }
    }

    /// Advances the deepest open container by one child (or closes it),
    /// enqueueing the resulting fragments.
    fn advance(&mut self) -> Result<(), EncodeError> {
        let step = match self.stack.last_mut().expect("advance with an empty stack") {
            Frame::Array { iter, first } => match iter.next() {
                Some(child) => {
                    let lead = *first;
                    *first = false;
                    Advance::ArrayChild(child, lead)
                }
                None => Advance::Close("]"),
            },
            Frame::Object { iter, first } => match iter.next() {
                Some((key, child)) => {
                    let lead = *first;
                    *first = false;
                    Advance::ObjectChild(key, child, lead)
                }
                None => Advance::Close("}"),
            },
        };

        match step {
            Advance::Close(bracket) => {
                let level = self.stack.len() - 1;
                self.stack.pop();
                self.emit_break(level);
                self.queue.push_back(Cow::Borrowed(bracket));
                Ok(())
            }
            Advance::ArrayChild(child, first) => {
                let level = self.stack.len();
                self.emit_item_lead(first, level);
                self.emit_value(child)
            }
            Advance::ObjectChild(key, child, first) => {
                let level = self.stack.len();
                self.emit_item_lead(first, level);
                self.queue.push_back(Cow::Owned(quote_string(&key, self.latin1())));
                self.queue
                    .push_back(Cow::Borrowed(if self.opts.indent > 0 { ": " } else { ":" }));
                self.emit_value(child)
            }
        }
    }

    /// Separator and indentation in front of a container item.
    fn emit_item_lead(&mut self, first: bool, level: usize) {
        if !first {
            self.queue.push_back(Cow::Borrowed(","));
        }
        self.emit_break(level);
    }

    /// Line terminator plus indentation, when indenting.
    fn emit_break(&mut self, level: usize) {
        if self.opts.indent == 0 {
            return;
        }
        self.queue.push_back(self.opts.newline.clone());
        if level > 0 {
            self.queue.push_back(Cow::Owned(" ".repeat(self.opts.indent * level)));
        }
    }

    /// Enqueues the textual form of a value; containers enqueue their opener
    /// and push a frame so their children are produced on demand.
    fn emit_value(&mut self, value: Value) -> Result<(), EncodeError> {
        match value {
            Value::Null => self.queue.push_back(Cow::Borrowed("null")),
            Value::Bool(true) => self.queue.push_back(Cow::Borrowed("true")),
            Value::Bool(false) => self.queue.push_back(Cow::Borrowed("false")),
            Value::Number(Number::Int(i)) => self.queue.push_back(Cow::Owned(i.to_string())),
            Value::Number(Number::Float(f)) => {
                if !f.is_finite() {
                    return Err(EncodeError::Unsupported {
                        what: format!("non-finite number {f}"),
                    });
                }
                self.queue.push_back(Cow::Owned(format_float(f)));
            }
            Value::String(s) => {
                self.queue.push_back(Cow::Owned(quote_string(&s, self.latin1())));
            }
            Value::Bytes(b) => {
                self.queue.push_back(Cow::Owned(format!("\"{}\"", BASE64.encode(b))));
            }
            Value::Array(items) => {
                if items.is_empty() {
                    self.queue.push_back(Cow::Borrowed("[]"));
                } else {
                    self.queue.push_back(Cow::Borrowed("["));
                    self.stack.push(Frame::Array { iter: items.into_iter(), first: true });
                }
            }
            Value::Object(map) => {
                if map.is_empty() {
                    self.queue.push_back(Cow::Borrowed("{}"));
                } else {
                    self.queue.push_back(Cow::Borrowed("{"));
                    self.stack.push(Frame::Object { iter: map.into_iter(), first: true });
                }
            }
        }
        Ok(())
    }

    fn latin1(&self) -> bool {
        self.opts.encoding == TextEncoding::Latin1
    }

    /// Pulls the next chunk of output bytes in the configured encoding,
    /// filling `buf` as far as possible.
    ///
    /// Returns the number of bytes produced; `0` once the output is
    /// exhausted (or `buf` is empty).
    ///
    /// # Errors
    ///
    /// [`EncodeError::Unsupported`] as for [`next_chunk`].
    ///
    /// [`next_chunk`]: Encoder::next_chunk
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        let mut filled = 0;
        while filled < buf.len() {
            if self.byte_pos < self.byte_tail.len() {
                let n = (self.byte_tail.len() - self.byte_pos).min(buf.len() - filled);
                buf[filled..filled + n]
                    .copy_from_slice(&self.byte_tail[self.byte_pos..self.byte_pos + n]);
                self.byte_pos += n;
                filled += n;
                continue;
            }
            self.byte_tail.clear();
            self.byte_pos = 0;
            match self.next_chunk() {
                None => break,
                Some(Err(err)) => return Err(err),
                Some(Ok(fragment)) => {
                    transcode_out(self.opts.encoding, &fragment, &mut self.byte_tail);
                }
            }
        }
        Ok(filled)
    }
}

impl Iterator for Encoder {
    type Item = Result<Cow<'static, str>, EncodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk()
    }
}

/// Quotes and escapes a string for output.
fn quote_string(s: &str, latin1: bool) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    write_escaped_string(s, &mut out, latin1).expect("writing to a String cannot fail");
    out.push('"');
    out
}

/// Serializes a value to a string with the given options.
///
/// # Errors
///
/// [`EncodeError::Unsupported`] for values with no JSON representation.
pub fn encode_to_string(value: Value, options: &EncodeOptions) -> Result<String, EncodeError> {
    let mut encoder = Encoder::new(options.clone());
    encoder.put(value);
    let mut out = String::new();
    while let Some(chunk) = encoder.next_chunk() {
        out.push_str(&chunk?);
    }
    Ok(out)
}

/// Serializes a value to bytes in the options' text encoding.
///
/// # Errors
///
/// [`EncodeError::Unsupported`] for values with no JSON representation.
pub fn encode_to_vec(value: Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = Encoder::new(options.clone());
    encoder.put(value);
    let mut out = Vec::new();
    while let Some(chunk) = encoder.next_chunk() {
        transcode_out(options.encoding, &chunk?, &mut out);
    }
    Ok(out)
}
