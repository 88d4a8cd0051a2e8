//! UTF-8 codepoint decoding for the lexer.
//!
//! The decoder walks the raw source bytes with a classic UTF-8 state machine
//! and keeps a two-codepoint ring (current + lookahead) so the lexer can
//! always peek one codepoint ahead without re-decoding.
//!
//! Error policy:
//! - a malformed continuation byte yields the [`Codepoint::INVALID`] sentinel
//!   and decoding continues (the lexer reports an "unrecognized symbol"
//!   downstream instead of crashing);
//! - a lead byte announcing a sequence longer than 4 bytes is fatal
//!   ([`FatalError::InvalidUtf8`]), the one unrecoverable lexical error.

use crate::frontend::diagnostics::FatalError;
use crate::frontend::source::SourceBuffer;

/// A Unicode scalar value with the classification queries the lexer needs.
///
/// Values originate only from UTF-8 decoding or the reserved sentinels: `0`
/// for end of input, `0xFFFE` for a malformed sequence, `0xFFFD` for a
/// failed escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codepoint(u32);

impl Codepoint {
    /// End-of-input sentinel.
    pub const EOF: Codepoint = Codepoint(0);
    /// Replacement character, used when escape decoding fails.
    pub const REPLACEMENT: Codepoint = Codepoint(0xFFFD);
    /// Malformed-sequence sentinel, treated as an unknown symbol downstream.
    pub const INVALID: Codepoint = Codepoint(0xFFFE);

    pub fn from_char(c: char) -> Self {
        Codepoint(c as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_eof(self) -> bool {
        self.0 == 0
    }

    /// A real character, not EOF and not the malformed sentinel.
    pub fn is_valid(self) -> bool {
        !self.is_eof() && self.0 != Self::INVALID.0
    }

    pub fn as_char(self) -> Option<char> {
        char::from_u32(self.0)
    }

    pub fn is(self, c: char) -> bool {
        self.0 == c as u32
    }

    pub fn is_whitespace(self) -> bool {
        matches!(self.as_char(), Some(c) if c.is_whitespace()) && !self.is_eof()
    }

    /// Digit value in the given base, if this codepoint is one.
    ///
    /// Bases 2, 8, 10 and 16 are the ones the number lexer uses; hex accepts
    /// both letter cases.
    pub fn digit_value(self, base: u32) -> Option<u32> {
        self.as_char().and_then(|c| c.to_digit(base))
    }

    pub fn is_digit(self, base: u32) -> bool {
        self.digit_value(base).is_some()
    }

    pub fn is_ident_start(self) -> bool {
        matches!(self.as_char(), Some(c) if c.is_ascii_alphabetic() || c == '_')
    }

    pub fn is_ident_continue(self) -> bool {
        matches!(self.as_char(), Some(c) if c.is_ascii_alphanumeric() || c == '_')
    }
}

/// Streaming UTF-8 decoder with one codepoint of lookahead.
pub struct CodepointDecoder<'a> {
    bytes: &'a [u8],
    /// Byte offset of `current`.
    current_offset: usize,
    /// Byte offset of `lookahead`.
    next_offset: usize,
    /// Byte offset just past `lookahead`.
    after_offset: usize,
    current: Codepoint,
    lookahead: Codepoint,
}

impl<'a> CodepointDecoder<'a> {
    pub fn new(source: &'a SourceBuffer) -> Result<Self, FatalError> {
        let bytes = source.bytes();
        let (current, next_offset) = decode_at(bytes, 0)?;
        let (lookahead, after_offset) = decode_at(bytes, next_offset)?;
        Ok(Self {
            bytes,
            current_offset: 0,
            next_offset,
            after_offset,
            current,
            lookahead,
        })
    }

    /// The codepoint under the cursor. EOF sentinel past the end.
    pub fn current(&self) -> Codepoint {
        self.current
    }

    /// One codepoint past the cursor, without advancing.
    pub fn peek(&self) -> Codepoint {
        self.lookahead
    }

    /// Byte offset of the current codepoint.
    pub fn offset(&self) -> usize {
        self.current_offset
    }

    /// Advance the ring by one codepoint.
    pub fn bump(&mut self) -> Result<(), FatalError> {
        self.current = self.lookahead;
        self.current_offset = self.next_offset;
        self.next_offset = self.after_offset;
        let (next, after) = decode_at(self.bytes, self.after_offset)?;
        self.lookahead = next;
        self.after_offset = after;
        Ok(())
    }
}

/// Decode one codepoint at `offset`. Returns the codepoint and the offset
/// just past it; EOF decodes as the sentinel without advancing.
fn decode_at(bytes: &[u8], offset: usize) -> Result<(Codepoint, usize), FatalError> {
    let Some(&lead) = bytes.get(offset) else {
        return Ok((Codepoint::EOF, offset));
    };

    // 1-byte ASCII fast path.
    if lead < 0x80 {
        return Ok((Codepoint(lead as u32), offset + 1));
    }

    let (len, mut value) = match lead {
        0xC0..=0xDF => (2, (lead & 0x1F) as u32),
        0xE0..=0xEF => (3, (lead & 0x0F) as u32),
        0xF0..=0xF7 => (4, (lead & 0x07) as u32),
        // 0xF8.. announces a 5+ byte sequence: fatal, per the lexical model.
        0xF8..=0xFF => return Err(FatalError::InvalidUtf8 { offset }),
        // A bare continuation byte in lead position is malformed but local.
        _ => return Ok((Codepoint::INVALID, offset + 1)),
    };

    for i in 1..len {
        match bytes.get(offset + i) {
            // Continuation bytes must match 10xxxxxx.
            Some(&b) if b & 0xC0 == 0x80 => value = (value << 6) | (b & 0x3F) as u32,
            _ => return Ok((Codepoint::INVALID, offset + i)),
        }
    }

    if char::from_u32(value).is_none() {
        // Surrogate or out-of-range payload inside a well-formed frame.
        return Ok((Codepoint::INVALID, offset + len));
    }
    Ok((Codepoint(value), offset + len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder(text: &str) -> (SourceBuffer, Vec<(Codepoint, usize)>) {
        let buf = SourceBuffer::from_string("t.scar", text);
        let mut d = CodepointDecoder::new(&buf).unwrap();
        let mut out = Vec::new();
        while !d.current().is_eof() {
            out.push((d.current(), d.offset()));
            d.bump().unwrap();
        }
        (buf, out)
    }

    #[test]
    fn test_ascii_stream() {
        let (_, cps) = decoder("ab");
        assert_eq!(cps.len(), 2);
        assert!(cps[0].0.is('a'));
        assert!(cps[1].0.is('b'));
        assert_eq!(cps[1].1, 1);
    }

    #[test]
    fn test_multibyte_offsets() {
        // 'é' is 2 bytes, '€' is 3, '𝄞' is 4.
        let (_, cps) = decoder("é€𝄞x");
        assert_eq!(cps.len(), 4);
        assert!(cps[0].0.is('é'));
        assert!(cps[1].0.is('€'));
        assert!(cps[2].0.is('𝄞'));
        assert!(cps[3].0.is('x'));
        assert_eq!(cps[3].1, 2 + 3 + 4);
    }

    #[test]
    fn test_lookahead_does_not_advance() {
        let buf = SourceBuffer::from_string("t.scar", "xy");
        let d = CodepointDecoder::new(&buf).unwrap();
        assert!(d.current().is('x'));
        assert!(d.peek().is('y'));
        assert!(d.current().is('x'));
    }

    #[test]
    fn test_malformed_continuation_is_sentinel() {
        // 0xC3 expects a continuation byte; 'a' (0x61) is not one.
        let raw = [0xC3u8, 0x61];
        let (cp, next) = super::decode_at(&raw, 0).unwrap();
        assert_eq!(cp, Codepoint::INVALID);
        // Resumes at the offending byte so 'a' still lexes.
        let (cp2, _) = super::decode_at(&raw, next).unwrap();
        assert!(cp2.is('a'));
    }

    #[test]
    fn test_overlong_lead_is_fatal() {
        let raw = [0xF9u8, 0x80, 0x80, 0x80, 0x80];
        assert!(matches!(
            super::decode_at(&raw, 0),
            Err(FatalError::InvalidUtf8 { offset: 0 })
        ));
    }

    #[test]
    fn test_classification() {
        assert!(Codepoint::from_char(' ').is_whitespace());
        assert!(Codepoint::from_char('7').is_digit(10));
        assert!(!Codepoint::from_char('8').is_digit(8));
        assert_eq!(Codepoint::from_char('f').digit_value(16), Some(15));
        assert!(Codepoint::from_char('_').is_ident_start());
        assert!(Codepoint::from_char('9').is_ident_continue());
        assert!(!Codepoint::from_char('9').is_ident_start());
        assert!(!Codepoint::EOF.is_whitespace());
    }

    #[test]
    fn test_empty_input_is_eof() {
        let buf = SourceBuffer::from_string("t.scar", "");
        let d = CodepointDecoder::new(&buf).unwrap();
        assert!(d.current().is_eof());
        assert!(d.peek().is_eof());
    }
}
