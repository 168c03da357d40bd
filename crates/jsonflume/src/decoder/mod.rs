//! The push-based streaming decoder.
//!
//! [`Decoder`] consumes input in chunks — characters via [`Decoder::feed`],
//! or bytes via [`Decoder::feed_bytes`] through a configurable text encoding
//! — and incrementally assembles one [`Value`] per document. Chunk
//! boundaries are legal anywhere: mid-token, mid-escape, mid-surrogate-pair,
//! mid-UTF-8-sequence.
//!
//! # Examples
//!
//! ```rust
//! use jsonflume::{DecodeState, Decoder, Value};
//!
//! let mut decoder = Decoder::new();
//! assert_eq!(decoder.feed("{\"key\": [nu").unwrap(), DecodeState::Value);
//! assert_eq!(decoder.feed("ll, true]}").unwrap(), DecodeState::Ok);
//! let value = decoder.get().unwrap();
//! assert_eq!(value["key"][1], Value::Bool(true));
//! ```

mod escape_buffer;
mod literal;

use std::collections::VecDeque;
use std::fmt;
use std::mem;

use escape_buffer::UnicodeEscapeBuffer;
use literal::classify_literal;

use crate::coerce::FromValue;
use crate::encoding::{ByteDecoder, TextEncoding};
use crate::error::DecodeError;
use crate::value::{Array, Map, Value};

/// End-of-stream marker. [`Decoder::finish`] injects it to force completion
/// of a final unterminated bare literal; it may equally appear literally in
/// the input stream.
const END_OF_STREAM: char = '\u{1A}';

/// The decoder's externally visible parse state.
///
/// Returned by every feed call. `Ok` is terminal for the current document:
/// the container stack is empty and exactly one root value has been
/// assembled, retrievable with [`Decoder::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// Inside a comment; the pre-comment state is restored at its end.
    Whitespace,
    /// Expecting an object key (or `}` closing an empty object).
    Name,
    /// Expecting the `:` between a key and its value.
    ValueSeparator,
    /// Expecting a value or the start of a container. The initial state.
    Value,
    /// Expecting `,` or the closing bracket of the current container.
    ItemSeparator,
    /// A complete root value has been assembled.
    Ok,
}

/// One in-progress container on the decode stack.
enum Frame {
    Array(Array),
    Object { map: Map, pending_name: Option<String> },
}

/// Progress through a quoted string.
enum StringPart {
    /// Plain characters.
    Body,
    /// A backslash has been seen.
    Escape,
    /// Inside the hex digits of a `\uXXXX` escape.
    Unicode,
}

/// Accumulator for the quoted string currently being read.
struct StringAccum {
    quote: char,
    buf: String,
    part: StringPart,
    unicode: UnicodeEscapeBuffer,
    /// A high surrogate waiting for its partner escape.
    high_surrogate: Option<u16>,
    /// Whether this string is an object key.
    for_name: bool,
}

impl StringAccum {
    fn new(quote: char, for_name: bool) -> Self {
        Self {
            quote,
            buf: String::new(),
            part: StringPart::Body,
            unicode: UnicodeEscapeBuffer::new(),
            high_surrogate: None,
            for_name,
        }
    }
}

/// Progress through a comment.
enum CommentState {
    None,
    /// A `/` has been seen; the next character decides line vs. block.
    SlashSeen,
    Line(String),
    Block { text: String, star: bool },
}

/// A push-based, resumable JSON decoder.
///
/// All state is instance-local and mutated synchronously inside feed calls;
/// nothing blocks. Instances are single-threaded and non-reentrant; distinct
/// instances are fully independent.
///
/// Input fed past the point where a root value closes is retained
/// unconsumed, so a logically continuous stream of documents can be decoded
/// by alternating [`get`] with further feeds.
///
/// [`get`]: Decoder::get
pub struct Decoder {
    input: VecDeque<char>,
    bytes: ByteDecoder,

    state: DecodeState,
    /// State to restore when the current comment terminates.
    resume: DecodeState,
    stack: Vec<Frame>,
    pending: String,
    string: Option<StringAccum>,
    comment: CommentState,
    comment_hook: Option<Box<dyn FnMut(&str)>>,
    root: Option<Value>,

    line: usize,
    column: usize,
    consumed_any: bool,
    poisoned: bool,
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("state", &self.state)
            .field("depth", &self.stack.len())
            .field("pending", &self.pending)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish_non_exhaustive()
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Creates a decoder that transcodes byte input as UTF-8.
    #[must_use]
    pub fn new() -> Self {
        Self::with_encoding(TextEncoding::default())
    }

    /// Creates a decoder with an explicit text encoding for byte input.
    #[must_use]
    pub fn with_encoding(encoding: TextEncoding) -> Self {
        Self {
            input: VecDeque::new(),
            bytes: ByteDecoder::new(encoding),
            state: DecodeState::Value,
            resume: DecodeState::Value,
            stack: Vec::new(),
            pending: String::new(),
            string: None,
            comment: CommentState::None,
            comment_hook: None,
            root: None,
            line: 1,
            column: 0,
            consumed_any: false,
            poisoned: false,
        }
    }

    /// Installs a hook that receives the text of every comment consumed.
    ///
    /// Comments are a tolerated input extension; they are reported here and
    /// otherwise treated as whitespace.
    pub fn on_comment(&mut self, hook: impl FnMut(&str) + 'static) {
        self.comment_hook = Some(Box::new(hook));
    }

    /// The current parse state.
    #[must_use]
    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Feeds a chunk of text and advances the machine until a root value is
    /// complete or input runs out. Returns the state afterwards.
    ///
    /// # Errors
    ///
    /// Any structurally invalid input raises [`DecodeError::Malformed`]; the
    /// decoder cannot be used further and must be discarded.
    pub fn feed(&mut self, text: &str) -> Result<DecodeState, DecodeError> {
        if !text.is_empty() {
            self.consumed_any = true;
        }
        self.input.extend(text.chars());
        self.run()
    }

    /// Feeds a chunk of bytes, transcoded through the configured encoding.
    /// A multi-byte sequence split across chunks is carried until complete.
    ///
    /// # Errors
    ///
    /// Invalid byte sequences and structurally invalid input raise
    /// [`DecodeError::Malformed`].
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<DecodeState, DecodeError> {
        if !bytes.is_empty() {
            self.consumed_any = true;
        }
        if let Err(e) = self.bytes.push(bytes, &mut self.input) {
            return Err(self.malformed(e.reason()));
        }
        self.run()
    }

    /// Signals end of input: flushes the transcoding carry and injects the
    /// end-of-stream character to terminate a trailing bare literal.
    ///
    /// The decoder remains usable — callers interpret the returned state
    /// (anything but [`DecodeState::Ok`] means the document is incomplete).
    ///
    /// # Errors
    ///
    /// A truncated multi-byte sequence or structurally invalid tail raises
    /// [`DecodeError::Malformed`].
    pub fn finish(&mut self) -> Result<DecodeState, DecodeError> {
        self.consumed_any = true;
        let flushed = self.bytes.flush();
        flushed.map_err(|e| self.malformed(e.reason()))?;
        self.input.push_back(END_OF_STREAM);
        self.run()
    }

    /// Returns the assembled root value and re-arms the decoder for the next
    /// document in the same stream (buffered input is retained).
    ///
    /// # Errors
    ///
    /// [`DecodeError::PrematureEnd`] if no complete value is available, i.e.
    /// the state is not [`DecodeState::Ok`].
    pub fn get(&mut self) -> Result<Value, DecodeError> {
        match self.root.take() {
            Some(value) if self.state == DecodeState::Ok => {
                self.state = DecodeState::Value;
                Ok(value)
            }
            other => {
                self.root = other;
                Err(DecodeError::PrematureEnd {
                    state: self.state,
                    fragment: self.fragment(),
                })
            }
        }
    }

    /// Like [`get`], but coerces the value to a target shape through the
    /// [`FromValue`] capability.
    ///
    /// # Errors
    ///
    /// [`DecodeError::PrematureEnd`] if no value is ready, or
    /// [`DecodeError::Coerce`] if the value does not fit the target.
    ///
    /// [`get`]: Decoder::get
    pub fn get_as<T: FromValue>(&mut self) -> Result<T, DecodeError> {
        let value = self.get()?;
        Ok(T::from_value(value)?)
    }

    /// Clears all decode state, including buffered input.
    ///
    /// When nothing has been consumed yet (state [`DecodeState::Value`],
    /// empty stack, no pending text) this is a no-op, so a pipelined stream
    /// can be reset "between" documents without losing buffered input.
    pub fn reset(&mut self) {
        if !self.consumed_any
            && self.state == DecodeState::Value
            && self.stack.is_empty()
            && self.pending.is_empty()
            && self.string.is_none()
        {
            return;
        }
        self.input.clear();
        self.bytes.reset();
        self.state = DecodeState::Value;
        self.resume = DecodeState::Value;
        self.stack.clear();
        self.pending.clear();
        self.string = None;
        self.comment = CommentState::None;
        self.root = None;
        self.line = 1;
        self.column = 0;
        self.consumed_any = false;
        self.poisoned = false;
    }

    /// Whether buffered input beyond the completed root value contains
    /// anything other than whitespace and comments.
    #[must_use]
    pub fn has_trailing_input(&self) -> bool {
        if self.bytes.has_pending() {
            return true;
        }
        let mut iter = self.input.iter().copied();
        loop {
            match iter.next() {
                None => return false,
                Some(c) if c.is_whitespace() || c == END_OF_STREAM => {}
                Some('/') => match iter.next() {
                    Some('/') => {
                        for c in iter.by_ref() {
                            if c == '\n' {
                                break;
                            }
                        }
                    }
                    Some('*') => {
                        let mut star = false;
                        loop {
                            match iter.next() {
                                None => return false,
                                Some('/') if star => break,
                                Some(c) => star = c == '*',
                            }
                        }
                    }
                    _ => return true,
                },
                Some(_) => return true,
            }
        }
    }

    /// Drives the machine until the root value closes or input runs out.
    fn run(&mut self) -> Result<DecodeState, DecodeError> {
        if self.poisoned {
            return Err(self.malformed("decoder previously failed"));
        }
        while self.state != DecodeState::Ok {
            let Some(c) = self.input.pop_front() else {
                break;
            };
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
            if let Err(err) = self.step(c) {
                self.poisoned = true;
                return Err(err);
            }
        }
        Ok(self.state)
    }

    fn step(&mut self, c: char) -> Result<(), DecodeError> {
        if !matches!(self.comment, CommentState::None) {
            return self.step_comment(c);
        }
        if self.string.is_some() {
            return self.step_string(c);
        }

        match c {
            END_OF_STREAM => {
                if !self.pending.is_empty() {
                    self.flush_pending()?;
                }
                Ok(())
            }
            c if c.is_whitespace() => {
                if !self.pending.is_empty() {
                    self.flush_pending()?;
                }
                Ok(())
            }
            '/' => {
                if !self.pending.is_empty() {
                    self.flush_pending()?;
                }
                self.resume = self.state;
                self.state = DecodeState::Whitespace;
                self.comment = CommentState::SlashSeen;
                Ok(())
            }
            '{' => {
                self.require_value_start(c)?;
                self.stack.push(Frame::Object { map: Map::new(), pending_name: None });
                self.state = DecodeState::Name;
                Ok(())
            }
            '[' => {
                self.require_value_start(c)?;
                self.stack.push(Frame::Array(Array::new()));
                self.state = DecodeState::Value;
                Ok(())
            }
            quote @ ('"' | '\'') => match self.state {
                DecodeState::Name => {
                    self.string = Some(StringAccum::new(quote, true));
                    Ok(())
                }
                DecodeState::Value if self.pending.is_empty() => {
                    self.string = Some(StringAccum::new(quote, false));
                    Ok(())
                }
                _ => Err(self.unexpected(c)),
            },
            ':' => {
                if self.state == DecodeState::ValueSeparator {
                    self.state = DecodeState::Value;
                    Ok(())
                } else {
                    Err(self.unexpected(c))
                }
            }
            ',' => {
                if self.state == DecodeState::Value && !self.pending.is_empty() {
                    self.flush_pending()?;
                }
                if self.state != DecodeState::ItemSeparator {
                    return Err(self.unexpected(c));
                }
                match self.stack.last() {
                    Some(Frame::Object { .. }) => self.state = DecodeState::Name,
                    Some(Frame::Array(_)) => self.state = DecodeState::Value,
                    None => return Err(self.unexpected(c)),
                }
                Ok(())
            }
            '}' => {
                if self.state == DecodeState::Value && !self.pending.is_empty() {
                    self.flush_pending()?;
                }
                self.close_object()
            }
            ']' => {
                if self.state == DecodeState::Value && !self.pending.is_empty() {
                    self.flush_pending()?;
                }
                self.close_array()
            }
            c => {
                if self.state == DecodeState::Value {
                    self.pending.push(c);
                    Ok(())
                } else {
                    Err(self.unexpected(c))
                }
            }
        }
    }

    fn step_comment(&mut self, c: char) -> Result<(), DecodeError> {
        match &mut self.comment {
            CommentState::None => unreachable!("step_comment outside a comment"),
            CommentState::SlashSeen => match c {
                '/' => {
                    self.comment = CommentState::Line(String::new());
                    Ok(())
                }
                '*' => {
                    self.comment = CommentState::Block { text: String::new(), star: false };
                    Ok(())
                }
                _ => Err(self.unexpected(c)),
            },
            CommentState::Line(text) => {
                // A line comment ends at the newline or at end of stream.
                if c == '\n' || c == END_OF_STREAM {
                    let text = mem::take(text);
                    self.end_comment(&text);
                } else {
                    text.push(c);
                }
                Ok(())
            }
            CommentState::Block { text, star } => {
                if c == END_OF_STREAM {
                    // An unterminated block comment leaves the decoder in
                    // Whitespace; the stream entry points report it as a
                    // premature end.
                    return Ok(());
                }
                if *star && c == '/' {
                    let text = mem::take(text);
                    self.end_comment(&text);
                    return Ok(());
                }
                if *star {
                    text.push('*');
                }
                if c == '*' {
                    *star = true;
                } else {
                    *star = false;
                    text.push(c);
                }
                Ok(())
            }
        }
    }

    fn end_comment(&mut self, text: &str) {
        self.comment = CommentState::None;
        self.state = self.resume;
        if let Some(hook) = self.comment_hook.as_mut() {
            hook(text);
        }
    }

    fn step_string(&mut self, c: char) -> Result<(), DecodeError> {
        let Some(accum) = self.string.as_mut() else {
            unreachable!("step_string outside a string");
        };
        match accum.part {
            StringPart::Body => {
                if c == accum.quote {
                    if accum.high_surrogate.is_some() {
                        return Err(self.malformed("unpaired surrogate escape"));
                    }
                    return self.finish_string();
                }
                match c {
                    '\\' => {
                        accum.part = StringPart::Escape;
                        Ok(())
                    }
                    END_OF_STREAM => Err(self.malformed("unterminated string")),
                    c if (c as u32) < 0x20 => {
                        Err(self.malformed("unescaped control character in string"))
                    }
                    c => {
                        if accum.high_surrogate.is_some() {
                            return Err(self.malformed("unpaired surrogate escape"));
                        }
                        accum.buf.push(c);
                        Ok(())
                    }
                }
            }
            StringPart::Escape => {
                if accum.high_surrogate.is_some() && c != 'u' {
                    return Err(self.malformed("unpaired surrogate escape"));
                }
                let resolved = match c {
                    '"' | '\'' | '\\' | '/' => Some(c),
                    'n' => Some('\n'),
                    'r' => Some('\r'),
                    't' => Some('\t'),
                    'f' => Some('\u{000C}'),
                    'b' => Some('\u{0008}'),
                    'u' => None,
                    _ => return Err(self.malformed("invalid escape sequence")),
                };
                match resolved {
                    Some(ch) => {
                        accum.buf.push(ch);
                        accum.part = StringPart::Body;
                    }
                    None => {
                        accum.unicode.reset();
                        accum.part = StringPart::Unicode;
                    }
                }
                Ok(())
            }
            StringPart::Unicode => {
                let unit = match accum.unicode.feed(c) {
                    Ok(Some(unit)) => unit,
                    Ok(None) => return Ok(()),
                    Err(reason) => return Err(self.malformed(reason)),
                };
                accum.part = StringPart::Body;
                match accum.high_surrogate.take() {
                    Some(high) => {
                        if !(0xDC00..=0xDFFF).contains(&unit) {
                            return Err(self.malformed("unpaired surrogate escape"));
                        }
                        let scalar = 0x1_0000
                            + ((u32::from(high) - 0xD800) << 10)
                            + (u32::from(unit) - 0xDC00);
                        match char::from_u32(scalar) {
                            Some(ch) => {
                                accum.buf.push(ch);
                                Ok(())
                            }
                            None => Err(self.malformed("invalid unicode escape")),
                        }
                    }
                    None if (0xD800..=0xDBFF).contains(&unit) => {
                        accum.high_surrogate = Some(unit);
                        Ok(())
                    }
                    None if (0xDC00..=0xDFFF).contains(&unit) => {
                        Err(self.malformed("unpaired surrogate escape"))
                    }
                    None => match char::from_u32(u32::from(unit)) {
                        Some(ch) => {
                            accum.buf.push(ch);
                            Ok(())
                        }
                        None => Err(self.malformed("invalid unicode escape")),
                    },
                }
            }
        }
    }

    /// Routes a closed quoted string: object key or string value.
    fn finish_string(&mut self) -> Result<(), DecodeError> {
        let accum = self.string.take().expect("finish_string outside a string");
        if accum.for_name {
            match self.stack.last_mut() {
                Some(Frame::Object { pending_name, .. }) => {
                    *pending_name = Some(accum.buf);
                    self.state = DecodeState::ValueSeparator;
                    Ok(())
                }
                _ => Err(self.malformed("object key outside an object")),
            }
        } else {
            self.put_value(Value::String(accum.buf))
        }
    }

    /// `{` and `[` are only legal where a value may begin.
    fn require_value_start(&mut self, c: char) -> Result<(), DecodeError> {
        if self.state == DecodeState::Value && self.pending.is_empty() {
            Ok(())
        } else {
            Err(self.unexpected(c))
        }
    }

    /// Classifies the pending bare literal and routes it.
    fn flush_pending(&mut self) -> Result<(), DecodeError> {
        let value = classify_literal(&self.pending).map_err(|reason| self.malformed(reason))?;
        self.pending.clear();
        self.put_value(value)
    }

    /// Routes a completed value into the current container, or makes it the
    /// root when the stack is empty.
    fn put_value(&mut self, value: Value) -> Result<(), DecodeError> {
        match self.stack.last_mut() {
            None => {
                self.root = Some(value);
                self.state = DecodeState::Ok;
                Ok(())
            }
            Some(Frame::Array(arr)) => {
                arr.push(value);
                self.state = DecodeState::ItemSeparator;
                Ok(())
            }
            Some(Frame::Object { map, pending_name }) => match pending_name.take() {
                Some(name) => {
                    map.insert(name, value);
                    self.state = DecodeState::ItemSeparator;
                    Ok(())
                }
                None => Err(self.malformed("property value without a name")),
            },
        }
    }

    fn close_object(&mut self) -> Result<(), DecodeError> {
        let legal = match self.stack.last() {
            Some(Frame::Object { map, pending_name }) => match self.state {
                DecodeState::ItemSeparator => true,
                // Only a genuinely empty object may close from Name; a
                // dangling `,` re-enters Name with members already present.
                DecodeState::Name => map.is_empty() && pending_name.is_none(),
                _ => false,
            },
            _ => return Err(self.unexpected('}')),
        };
        if !legal {
            return Err(self.unexpected('}'));
        }
        let Some(Frame::Object { map, .. }) = self.stack.pop() else {
            unreachable!("checked above");
        };
        self.put_value(Value::Object(map))
    }

    fn close_array(&mut self) -> Result<(), DecodeError> {
        let legal = match self.stack.last() {
            Some(Frame::Array(arr)) => match self.state {
                DecodeState::ItemSeparator => true,
                DecodeState::Value => arr.is_empty() && self.pending.is_empty(),
                _ => false,
            },
            _ => return Err(self.unexpected(']')),
        };
        if !legal {
            return Err(self.unexpected(']'));
        }
        let Some(Frame::Array(arr)) = self.stack.pop() else {
            unreachable!("checked above");
        };
        self.put_value(Value::Array(arr))
    }

    /// Snapshot of the accumulated text for error reporting.
    fn fragment(&self) -> String {
        match &self.string {
            Some(accum) => accum.buf.clone(),
            None => self.pending.clone(),
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> DecodeError {
        DecodeError::Malformed {
            reason: reason.into(),
            fragment: self.fragment(),
            state: self.state,
            line: self.line,
            column: self.column,
        }
    }

    fn unexpected(&self, c: char) -> DecodeError {
        self.malformed(format!("unexpected character {c:?}"))
    }
}

/// Decodes one complete JSON document from a string.
///
/// # Errors
///
/// [`DecodeError::Malformed`] for invalid input or trailing data,
/// [`DecodeError::PrematureEnd`] if the text ends before the value closes.
pub fn decode_str(text: &str) -> Result<Value, DecodeError> {
    let mut decoder = Decoder::new();
    decoder.feed(text)?;
    complete(decoder)
}

/// Decodes one complete JSON document from bytes in the given encoding.
///
/// # Errors
///
/// As [`decode_str`], plus [`DecodeError::Malformed`] for byte sequences
/// invalid in the encoding.
pub fn decode_bytes(bytes: &[u8], encoding: TextEncoding) -> Result<Value, DecodeError> {
    let mut decoder = Decoder::with_encoding(encoding);
    decoder.feed_bytes(bytes)?;
    complete(decoder)
}

/// Shared tail of the read-to-completion entry points.
pub(crate) fn complete(mut decoder: Decoder) -> Result<Value, DecodeError> {
    let state = decoder.finish()?;
    if state != DecodeState::Ok {
        return Err(DecodeError::PrematureEnd { state, fragment: decoder.fragment() });
    }
    if decoder.has_trailing_input() {
        return Err(decoder.malformed("trailing data after value"));
    }
    decoder.get()
}
