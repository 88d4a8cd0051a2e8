//! Number scanning for the scar lexer.
//!
//! Handles integer literals with `0b`/`0o`/`0x` radix prefixes, underscore
//! digit separators, and decimal floating-point literals with fraction and
//! exponent parts. Fractions and exponents on a non-decimal base are reported
//! and skipped so lexing continues.

use super::Lexer;
use super::tokens::TokenKind;
use crate::frontend::ast::Span;
use crate::frontend::diagnostics::FatalError;

impl<'a> Lexer<'a> {
    /// Scan a numeric literal starting at the current (decimal digit)
    /// codepoint.
    pub(super) fn scan_number(&mut self, start: usize) -> Result<(), FatalError> {
        let mut base = 10u32;
        if self.cur().is('0') {
            base = match self.peek().as_char() {
                Some('b') => 2,
                Some('o') => 8,
                Some('x') => 16,
                _ => 10,
            };
            if base != 10 {
                // Consume "0" and the radix letter.
                self.bump()?;
                self.bump()?;
                if !self.cur().is_digit(base) {
                    // No digit after the prefix: nothing sensible to resume
                    // from, so this one is fatal.
                    return Err(FatalError::InvalidLiteral {
                        message: format!("expected base-{base} digit after radix prefix"),
                        span: Span::new(start, self.offset()),
                    });
                }
            }
        }

        let digits = self.digit_run(base)?;

        // Fraction: a '.' immediately followed by a digit. A lone '.' is
        // left for the parser (member access operator).
        let has_fraction = self.cur().is('.') && self.peek().is_digit(10);
        let has_exponent = self.cur().is('e') || self.cur().is('E');

        if base != 10 && (has_fraction || has_exponent) {
            self.diags.error(
                "float literals must use base 10",
                Span::new(start, self.offset()),
            );
            // Skip the fraction/exponent so one bad literal yields one error.
            if has_fraction {
                self.bump()?;
                self.digit_run(10)?;
            }
            self.skip_exponent()?;
            self.emit_integer(&digits, base, start);
            return Ok(());
        }

        if has_fraction || has_exponent {
            let mut text = digits;
            if has_fraction {
                text.push('.');
                self.bump()?;
                text.push_str(&self.digit_run(10)?);
            }
            if self.cur().is('e') || self.cur().is('E') {
                text.push('e');
                self.bump()?;
                if self.cur().is('+') || self.cur().is('-') {
                    if self.cur().is('-') {
                        text.push('-');
                    }
                    self.bump()?;
                }
                let exp = self.digit_run(10)?;
                if exp.is_empty() {
                    self.diags.error(
                        "missing digits after float exponent",
                        Span::new(start, self.offset()),
                    );
                    text.push('0');
                } else {
                    text.push_str(&exp);
                }
            }
            let value = text.parse::<f64>().unwrap_or_else(|_| {
                self.diags
                    .error(format!("invalid float literal '{text}'"), Span::new(start, self.offset()));
                0.0
            });
            self.add_token(TokenKind::Float(value), start);
            return Ok(());
        }

        self.emit_integer(&digits, base, start);
        Ok(())
    }

    /// Consume a run of digits in `base`, allowing `_` separators. Returns
    /// the digits without separators.
    fn digit_run(&mut self, base: u32) -> Result<String, FatalError> {
        let mut digits = String::new();
        loop {
            if self.cur().is_digit(base) {
                // Safe to unwrap: is_digit implies a valid char.
                if let Some(c) = self.cur().as_char() {
                    digits.push(c);
                }
                self.bump()?;
            } else if self.cur().is('_') {
                self.bump()?;
            } else {
                break;
            }
        }
        Ok(digits)
    }

    fn skip_exponent(&mut self) -> Result<(), FatalError> {
        if self.cur().is('e') || self.cur().is('E') {
            self.bump()?;
            if self.cur().is('+') || self.cur().is('-') {
                self.bump()?;
            }
            self.digit_run(10)?;
        }
        Ok(())
    }

    fn emit_integer(&mut self, digits: &str, base: u32, start: usize) {
        let value = match u64::from_str_radix(digits, base) {
            Ok(v) => v,
            Err(_) => {
                self.diags.error(
                    format!("integer literal '{digits}' is too large"),
                    Span::new(start, self.offset()),
                );
                0
            }
        };
        self.add_token(TokenKind::Int(value), start);
    }
}
