//! Accumulator for four-digit `\uXXXX` escape sequences.
//!
//! The buffer collects ASCII hex digits one at a time — the digits of a
//! single escape may arrive in different input chunks — and yields the raw
//! UTF-16 code unit once four have been seen. Surrogate pairing is the
//! decoder's job: an escape in the surrogate range is only meaningful in
//! combination with its partner escape.

#[derive(Debug, Clone, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    digits: [u8; 4],
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Discards any accumulated digits.
    pub(crate) fn reset(&mut self) {
        self.len = 0;
    }

    /// Feeds one character of the escape sequence.
    ///
    /// Returns `Ok(None)` while fewer than four digits have arrived and
    /// `Ok(Some(unit))` once the fourth digit completes the code unit,
    /// resetting the buffer for the next escape. Non-hex input is rejected.
    pub(crate) fn feed(&mut self, c: char) -> Result<Option<u16>, &'static str> {
        if !c.is_ascii_hexdigit() {
            return Err("invalid character in unicode escape");
        }

        self.digits[usize::from(self.len)] = c as u8;
        self.len += 1;
        if self.len < 4 {
            return Ok(None);
        }

        self.len = 0;
        let hex = std::str::from_utf8(&self.digits).map_err(|_| "invalid unicode escape")?;
        u16::from_str_radix(hex, 16)
            .map(Some)
            .map_err(|_| "invalid unicode escape")
    }
}
