//! Error types for decoding and encoding.
//!
//! Every error is raised synchronously from the call that detects it and
//! terminates that session: the decoder does not recover (discard it and
//! start a fresh one for the next record), and an errored encoder yields no
//! further chunks.

use thiserror::Error;

use crate::coerce::CoerceError;
use crate::decoder::DecodeState;

/// A decoding failure.
///
/// Messages carry the accumulated pending-text fragment and the state at the
/// time of failure so truncated or malformed input can be diagnosed without
/// re-running with tracing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Structurally invalid input: a bad escape, an unterminated string, a
    /// numeric literal that fails its parse strategy, or a structural
    /// character that is illegal in the current state.
    #[error("malformed input at {line}:{column}: {reason} (state {state:?}, pending {fragment:?})")]
    Malformed {
        /// What was wrong with the input.
        reason: String,
        /// The pending-text accumulator at the time of failure.
        fragment: String,
        /// The decoder state at the time of failure.
        state: DecodeState,
        /// 1-based line of the offending character.
        line: usize,
        /// 1-based column of the offending character.
        column: usize,
    },

    /// End of input was reached before a complete value was assembled.
    #[error("premature end of input (state {state:?}, pending {fragment:?})")]
    PrematureEnd {
        /// The decoder state when input ran out.
        state: DecodeState,
        /// The pending-text accumulator when input ran out.
        fragment: String,
    },

    /// A decoded value could not be coerced to the requested target shape.
    #[error(transparent)]
    Coerce(#[from] CoerceError),
}

/// An encoding failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// The encoder met a value with no JSON representation. It does not
    /// silently stringify such values.
    #[error("unsupported value: {what}")]
    Unsupported {
        /// Description of the offending value.
        what: String,
    },
}
