//! Byte/character transcoding for the byte-oriented entry points.
//!
//! Both directions are incremental and chunk-boundary safe: a multi-byte
//! UTF-8 sequence may be split across any number of `feed_bytes` calls, with
//! the undecoded tail carried between calls.

use std::collections::VecDeque;

/// A named text encoding for byte-oriented decode/encode entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8 (the default).
    #[default]
    Utf8,
    /// ISO-8859-1, a 1:1 mapping between bytes and U+0000..=U+00FF.
    Latin1,
}

impl TextEncoding {
    /// Resolves an encoding from its conventional label, case-insensitively.
    ///
    /// ```
    /// use jsonflume::TextEncoding;
    ///
    /// assert_eq!(TextEncoding::for_label("UTF-8"), Some(TextEncoding::Utf8));
    /// assert_eq!(TextEncoding::for_label("iso-8859-1"), Some(TextEncoding::Latin1));
    /// assert_eq!(TextEncoding::for_label("utf-16"), None);
    /// ```
    #[must_use]
    pub fn for_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Self::Utf8),
            "iso-8859-1" | "latin-1" | "latin1" => Some(Self::Latin1),
            _ => None,
        }
    }
}

/// Why a byte sequence could not be transcoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TranscodeError {
    /// Bytes that are not valid in the configured encoding.
    Invalid,
    /// Input ended in the middle of a multi-byte sequence.
    Truncated,
}

impl TranscodeError {
    pub(crate) fn reason(self) -> &'static str {
        match self {
            Self::Invalid => "invalid byte sequence for encoding",
            Self::Truncated => "input ended inside a multi-byte sequence",
        }
    }
}

/// Expected length of a UTF-8 sequence from its lead byte.
///
/// Bytes that cannot lead a sequence report length 1 so they are rejected
/// immediately instead of being carried as an incomplete tail.
fn utf8_sequence_len(lead: u8) -> usize {
    match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 1,
    }
}

/// Incremental bytes-to-characters decoder with a cross-chunk carry.
#[derive(Debug, Clone)]
pub(crate) struct ByteDecoder {
    encoding: TextEncoding,
    carry: [u8; 4],
    carry_len: usize,
}

impl ByteDecoder {
    pub(crate) fn new(encoding: TextEncoding) -> Self {
        Self { encoding, carry: [0; 4], carry_len: 0 }
    }

    pub(crate) fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Decodes `bytes`, pushing complete characters into `out`. An
    /// incomplete trailing sequence is carried until the next call.
    pub(crate) fn push(
        &mut self,
        bytes: &[u8],
        out: &mut VecDeque<char>,
    ) -> Result<(), TranscodeError> {
        match self.encoding {
            TextEncoding::Latin1 => {
                out.extend(bytes.iter().map(|&b| char::from(b)));
                Ok(())
            }
            TextEncoding::Utf8 => self.push_utf8(bytes, out),
        }
    }

    fn push_utf8(&mut self, bytes: &[u8], out: &mut VecDeque<char>) -> Result<(), TranscodeError> {
        let mut rest = bytes;

        // Finish a sequence left over from the previous chunk first.
        while self.carry_len > 0 && !rest.is_empty() {
            let need = utf8_sequence_len(self.carry[0]);
            let take = (need - self.carry_len).min(rest.len());
            self.carry[self.carry_len..self.carry_len + take].copy_from_slice(&rest[..take]);
            self.carry_len += take;
            rest = &rest[take..];

            if self.carry_len < need {
                return Ok(());
            }
            let (ch, size) = bstr::decode_utf8(&self.carry[..self.carry_len]);
            match ch {
                Some(c) if size == self.carry_len => {
                    out.push_back(c);
                    self.carry_len = 0;
                }
                _ => return Err(TranscodeError::Invalid),
            }
        }

        while !rest.is_empty() {
            let (ch, size) = bstr::decode_utf8(rest);
            match ch {
                Some(c) => {
                    out.push_back(c);
                    rest = &rest[size..];
                }
                None => {
                    // An undecodable prefix that reaches the end of the chunk
                    // and is shorter than its lead byte promises is merely
                    // incomplete; anything else is invalid.
                    if size == rest.len() && size < utf8_sequence_len(rest[0]) {
                        self.carry[..size].copy_from_slice(rest);
                        self.carry_len = size;
                        return Ok(());
                    }
                    return Err(TranscodeError::Invalid);
                }
            }
        }
        Ok(())
    }

    /// Signals end of byte input; errors if a partial sequence is pending.
    pub(crate) fn flush(&mut self) -> Result<(), TranscodeError> {
        if self.carry_len > 0 {
            self.carry_len = 0;
            return Err(TranscodeError::Truncated);
        }
        Ok(())
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.carry_len > 0
    }

    pub(crate) fn reset(&mut self) {
        self.carry_len = 0;
    }
}

/// Transcodes already-escaped output text into bytes.
///
/// The encoder escapes everything above U+00FF before handing fragments to
/// this function when targeting Latin-1, so the lossy arm is unreachable for
/// its own output; stray characters map to `?` rather than panicking.
pub(crate) fn transcode_out(encoding: TextEncoding, text: &str, out: &mut Vec<u8>) {
    match encoding {
        TextEncoding::Utf8 => out.extend_from_slice(text.as_bytes()),
        TextEncoding::Latin1 => {
            for c in text.chars() {
                let cp = c as u32;
                out.push(if cp <= 0xFF { cp as u8 } else { b'?' });
            }
        }
    }
}
