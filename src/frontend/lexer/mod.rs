//! Lexer for the scar language.
//!
//! Consumes decoded codepoints and produces a finite token stream ending in
//! an [`TokenKind::Eof`] token. Handles:
//!
//! - keywords and identifiers (interned)
//! - integer/float literals with radix prefixes (`numbers` module)
//! - string and char literals with hex escapes
//! - single/double-character operators with greedy longest-match
//! - line and block comments
//!
//! Recovery: an unrecognized symbol is reported and produces an
//! [`TokenKind::Invalid`] token so one bad character never aborts the file.
//! An unterminated block comment is fatal, since there is no sensible
//! resumption point.
//!
//! ## Module structure
//!
//! - `tokens` - token types and the keyword table
//! - `numbers` - numeric literal scanning

mod numbers;
pub mod tokens;

pub use tokens::{KEYWORDS, Token, TokenKind};

use crate::frontend::ast::Span;
use crate::frontend::decode::{Codepoint, CodepointDecoder};
use crate::frontend::diagnostics::{Diagnostics, FatalError};
use crate::frontend::intern::Interner;
use crate::frontend::source::SourceBuffer;

/// Lexer state: the decoding cursor plus the growing token stream.
pub struct Lexer<'a> {
    decoder: CodepointDecoder<'a>,
    pub(super) interner: &'a mut Interner,
    pub(super) diags: &'a mut Diagnostics,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(
        source: &'a SourceBuffer,
        interner: &'a mut Interner,
        diags: &'a mut Diagnostics,
    ) -> Result<Self, FatalError> {
        Ok(Self {
            decoder: CodepointDecoder::new(source)?,
            interner,
            diags,
            tokens: Vec::new(),
        })
    }

    /// Tokenize the whole source.
    ///
    /// The returned stream is finite for any finite input and its last
    /// element is always `Eof`. Recoverable findings land in the diagnostics
    /// sink; only unrecoverable lexical errors return `Err`.
    pub fn lex(mut self) -> Result<Vec<Token>, FatalError> {
        loop {
            self.skip_trivia()?;
            let start = self.offset();
            if self.cur().is_eof() {
                self.tokens.push(Token::new(TokenKind::Eof, Span::new(start, start)));
                return Ok(self.tokens);
            }
            self.scan_token(start)?;
        }
    }

    // ========================================================================
    // Cursor helpers
    // ========================================================================

    pub(super) fn cur(&self) -> Codepoint {
        self.decoder.current()
    }

    pub(super) fn peek(&self) -> Codepoint {
        self.decoder.peek()
    }

    pub(super) fn offset(&self) -> usize {
        self.decoder.offset()
    }

    pub(super) fn bump(&mut self) -> Result<(), FatalError> {
        self.decoder.bump()
    }

    pub(super) fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, Span::new(start, self.offset())));
    }

    /// Consume the current codepoint and emit `double` if it matches
    /// `second`, else emit `single`. Implements greedy longest-match for
    /// two-character operators.
    fn operator(
        &mut self,
        start: usize,
        second: char,
        double: TokenKind,
        single: TokenKind,
    ) -> Result<(), FatalError> {
        self.bump()?;
        if self.cur().is(second) {
            self.bump()?;
            self.add_token(double, start);
        } else {
            self.add_token(single, start);
        }
        Ok(())
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Skip whitespace and comments. An unterminated block comment is fatal.
    fn skip_trivia(&mut self) -> Result<(), FatalError> {
        loop {
            if self.cur().is_whitespace() {
                self.bump()?;
            } else if self.cur().is('/') && self.peek().is('/') {
                while !self.cur().is_eof() && !self.cur().is('\n') {
                    self.bump()?;
                }
            } else if self.cur().is('/') && self.peek().is('*') {
                let start = self.offset();
                self.bump()?;
                self.bump()?;
                loop {
                    if self.cur().is_eof() {
                        return Err(FatalError::EofInComment {
                            span: Span::new(start, self.offset()),
                        });
                    }
                    if self.cur().is('*') && self.peek().is('/') {
                        self.bump()?;
                        self.bump()?;
                        break;
                    }
                    self.bump()?;
                }
            } else {
                return Ok(());
            }
        }
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self, start: usize) -> Result<(), FatalError> {
        let c = self.cur();

        if c.is_ident_start() {
            return self.scan_identifier(start);
        }
        if c.is_digit(10) {
            return self.scan_number(start);
        }

        match c.as_char() {
            Some('"') => return self.scan_string(start),
            Some('\'') => return self.scan_char(start),
            Some('(') => self.simple(TokenKind::LParen, start)?,
            Some(')') => self.simple(TokenKind::RParen, start)?,
            Some('{') => self.simple(TokenKind::LBrace, start)?,
            Some('}') => self.simple(TokenKind::RBrace, start)?,
            Some('[') => self.simple(TokenKind::LBracket, start)?,
            Some(']') => self.simple(TokenKind::RBracket, start)?,
            Some(',') => self.simple(TokenKind::Comma, start)?,
            Some(';') => self.simple(TokenKind::Semi, start)?,
            Some('.') => self.simple(TokenKind::Dot, start)?,
            Some('*') => self.simple(TokenKind::Star, start)?,
            Some('/') => self.simple(TokenKind::Slash, start)?,
            Some('%') => self.simple(TokenKind::Percent, start)?,
            Some('^') => self.simple(TokenKind::Caret, start)?,
            Some('~') => self.simple(TokenKind::Tilde, start)?,
            Some(':') => self.operator(start, ':', TokenKind::ColonColon, TokenKind::Colon)?,
            Some('=') => self.operator(start, '=', TokenKind::EqEq, TokenKind::Eq)?,
            Some('!') => self.operator(start, '=', TokenKind::BangEq, TokenKind::Bang)?,
            Some('<') => self.operator(start, '=', TokenKind::LtEq, TokenKind::Lt)?,
            Some('>') => self.operator(start, '=', TokenKind::GtEq, TokenKind::Gt)?,
            Some('&') => self.operator(start, '&', TokenKind::AmpAmp, TokenKind::Amp)?,
            Some('|') => self.operator(start, '|', TokenKind::PipePipe, TokenKind::Pipe)?,
            Some('+') => {
                self.bump()?;
                if self.cur().is('+') {
                    self.bump()?;
                    self.add_token(TokenKind::PlusPlus, start);
                } else {
                    self.add_token(TokenKind::Plus, start);
                }
            }
            Some('-') => {
                self.bump()?;
                if self.cur().is('>') {
                    self.bump()?;
                    self.add_token(TokenKind::Arrow, start);
                } else if self.cur().is('-') {
                    self.bump()?;
                    self.add_token(TokenKind::MinusMinus, start);
                } else {
                    self.add_token(TokenKind::Minus, start);
                }
            }
            _ => {
                // Unknown or malformed symbol: report, emit Invalid, move on.
                self.bump()?;
                let span = Span::new(start, self.offset());
                match c.as_char() {
                    Some(ch) => self.diags.error(format!("unrecognized symbol '{ch}'"), span),
                    None => self.diags.error("unrecognized symbol (malformed UTF-8)", span),
                }
                self.add_token(TokenKind::Invalid, start);
            }
        }
        Ok(())
    }

    fn simple(&mut self, kind: TokenKind, start: usize) -> Result<(), FatalError> {
        self.bump()?;
        self.add_token(kind, start);
        Ok(())
    }

    // ========================================================================
    // Identifiers and keywords
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) -> Result<(), FatalError> {
        let mut name = String::new();
        while self.cur().is_ident_continue() {
            if let Some(c) = self.cur().as_char() {
                name.push(c);
            }
            self.bump()?;
        }

        let kind = KEYWORDS
            .get(name.as_str())
            .copied()
            .unwrap_or_else(|| TokenKind::Ident(self.interner.intern(&name)));
        self.add_token(kind, start);
        Ok(())
    }

    // ========================================================================
    // String and char literals
    // ========================================================================

    fn scan_string(&mut self, start: usize) -> Result<(), FatalError> {
        self.bump()?; // opening quote
        let mut text = String::new();
        loop {
            let c = self.cur();
            if c.is_eof() || c.is('\n') {
                self.diags
                    .error("unterminated string literal", Span::new(start, self.offset()));
                break;
            }
            if c.is('"') {
                self.bump()?;
                break;
            }
            if c.is('\\') {
                text.push(self.scan_escape()?);
                continue;
            }
            match c.as_char() {
                Some(ch) => text.push(ch),
                None => {
                    self.diags.error(
                        "malformed UTF-8 in string literal",
                        Span::new(self.offset(), self.offset() + 1),
                    );
                    text.push('\u{FFFD}');
                }
            }
            self.bump()?;
        }
        let id = self.interner.intern(&text);
        self.add_token(TokenKind::Str(id), start);
        Ok(())
    }

    fn scan_char(&mut self, start: usize) -> Result<(), FatalError> {
        self.bump()?; // opening quote
        let value = if self.cur().is('\\') {
            self.scan_escape()?
        } else {
            match self.cur().as_char() {
                Some(ch) if ch != '\'' && ch != '\n' && !self.cur().is_eof() => {
                    self.bump()?;
                    ch
                }
                _ => {
                    self.diags
                        .error("empty char literal", Span::new(start, self.offset()));
                    '\u{FFFD}'
                }
            }
        };
        if self.cur().is('\'') {
            self.bump()?;
        } else {
            self.diags
                .error("unterminated char literal", Span::new(start, self.offset()));
        }
        self.add_token(TokenKind::CharLit(value), start);
        Ok(())
    }

    /// Decode one escape sequence after the backslash.
    ///
    /// Any failure (EOF mid-escape, wrong delimiter, non-hex digit, value
    /// outside the scalar range) maps to the replacement character plus a
    /// non-fatal diagnostic.
    fn scan_escape(&mut self) -> Result<char, FatalError> {
        let start = self.offset();
        self.bump()?; // backslash
        let c = self.cur();
        let decoded = match c.as_char() {
            Some('n') => {
                self.bump()?;
                Some('\n')
            }
            Some('r') => {
                self.bump()?;
                Some('\r')
            }
            Some('t') => {
                self.bump()?;
                Some('\t')
            }
            Some('\\') => {
                self.bump()?;
                Some('\\')
            }
            Some('\'') => {
                self.bump()?;
                Some('\'')
            }
            Some('"') => {
                self.bump()?;
                Some('"')
            }
            Some('0') => {
                self.bump()?;
                Some('\0')
            }
            Some('x') => {
                self.bump()?;
                self.hex_escape(2)?
            }
            Some('u') => {
                self.bump()?;
                self.unicode_escape()?
            }
            _ => {
                if !c.is_eof() {
                    self.bump()?;
                }
                None
            }
        };
        match decoded {
            Some(ch) => Ok(ch),
            None => {
                self.diags
                    .error("invalid escape sequence", Span::new(start, self.offset()));
                Ok('\u{FFFD}')
            }
        }
    }

    /// Read exactly `count` hex digits.
    fn hex_escape(&mut self, count: u32) -> Result<Option<char>, FatalError> {
        let mut value = 0u32;
        for _ in 0..count {
            match self.cur().digit_value(16) {
                Some(d) => {
                    value = value * 16 + d;
                    self.bump()?;
                }
                None => return Ok(None),
            }
        }
        Ok(char::from_u32(value))
    }

    /// Read `{`, up to six hex digits, `}`.
    fn unicode_escape(&mut self) -> Result<Option<char>, FatalError> {
        if !self.cur().is('{') {
            return Ok(None);
        }
        self.bump()?;
        let mut value = 0u32;
        let mut digits = 0;
        while let Some(d) = self.cur().digit_value(16) {
            if digits == 6 {
                return Ok(None);
            }
            value = value * 16 + d;
            digits += 1;
            self.bump()?;
        }
        if digits == 0 || !self.cur().is('}') {
            return Ok(None);
        }
        self.bump()?;
        Ok(char::from_u32(value))
    }
}

/// Convenience entry point: lex one source buffer.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(
    source: &SourceBuffer,
    interner: &mut Interner,
    diags: &mut Diagnostics,
) -> Result<Vec<Token>, FatalError> {
    Lexer::new(source, interner, diags)?.lex()
}

// ============================================================================
// TESTS
// ============================================================================
