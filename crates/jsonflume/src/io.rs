//! Stream-oriented convenience entry points.
//!
//! These layer the codec over `std::io` sources and sinks. Blocking happens
//! here, between feed and read calls — never inside the codec itself.

use std::io::{Read, Write};

use thiserror::Error;

use crate::decoder::{DecodeState, Decoder, complete};
use crate::encoder::{EncodeOptions, Encoder};
use crate::encoding::TextEncoding;
use crate::error::{DecodeError, EncodeError};
use crate::value::Value;

/// A failure while decoding from or encoding to an io stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The underlying reader or writer failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The stream's content could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The value could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Decodes one complete JSON document from a reader.
///
/// Reading stops as soon as the root value closes; buffered input past that
/// point is checked for trailing non-whitespace content.
///
/// # Errors
///
/// [`StreamError::Io`] for reader failures; [`DecodeError::PrematureEnd`]
/// (wrapped) when the stream ends before the value completes.
pub fn decode_reader<R: Read>(mut reader: R, encoding: TextEncoding) -> Result<Value, StreamError> {
    let mut decoder = Decoder::with_encoding(encoding);
    let mut buf = [0u8; 8192];
    while decoder.state() != DecodeState::Ok {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        decoder.feed_bytes(&buf[..n])?;
    }
    Ok(complete(decoder)?)
}

/// Encodes a value into a writer, in the options' text encoding.
///
/// # Errors
///
/// [`StreamError::Io`] for writer failures, [`StreamError::Encode`] for
/// unrepresentable values.
pub fn encode_to_writer<W: Write>(
    value: Value,
    options: &EncodeOptions,
    writer: &mut W,
) -> Result<(), StreamError> {
    let mut encoder = Encoder::new(options.clone());
    encoder.put(value);
    let mut buf = [0u8; 8192];
    loop {
        let n = encoder.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
    }
    writer.flush()?;
    Ok(())
}

impl Read for Encoder {
    /// Pulls serialized bytes, exactly as [`Encoder::read`], mapping encode
    /// failures to [`std::io::ErrorKind::InvalidData`].
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Encoder::read(self, buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
