//! Diagnostics and error reporting for scar.
//!
//! Three tiers of failure flow through here:
//!
//! - **Fatal** ([`FatalError`]): unrecoverable, unwinds to the driver, no
//!   further phase runs.
//! - **Recoverable-local** ([`SyntaxError`]): caught inside the parser's
//!   recovery loop, reported into the sink, and then parsing continues.
//! - **Semantic**: verifier findings reported straight into the sink; codegen
//!   is gated on the sink's error count after the full pass.
//!
//! The [`Diagnostics`] sink accumulates everything in emission order and
//! flushes once per compilation as `file:line:col: level: message` lines.

use thiserror::Error;

use crate::frontend::ast::Span;
use crate::frontend::source::SourceBuffer;

/// Severity of a reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
    /// Internal invariant violation. User-visible but labelled as a compiler
    /// defect rather than a source error.
    Bug,
    /// Fatal condition that aborted the compilation.
    Fail,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Info => write!(f, "info"),
            Level::Warn => write!(f, "warning"),
            Level::Error => write!(f, "error"),
            Level::Bug => write!(f, "bug"),
            Level::Fail => write!(f, "fatal"),
        }
    }
}

/// One reported finding.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Option<Span>,
}

/// A recoverable syntax error raised inside the parser's statement loop.
///
/// Never escapes the parser: the statement dispatcher catches it, reports it
/// into the sink, and synchronizes to the next statement boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// An unrecoverable compilation error.
///
/// Propagates past every phase to the driver, which reports it and exits
/// nonzero. Nothing below the driver catches this.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("invalid UTF-8: codepoint at byte {offset} requires more than 4 bytes")]
    InvalidUtf8 { offset: usize },

    #[error("end of file inside block comment")]
    EofInComment { span: Span },

    #[error("invalid literal: {message}")]
    InvalidLiteral { message: String, span: Span },

    #[error("function '{name}' failed IR verification: {reason}")]
    BrokenFunction { name: String, reason: String },

    #[error("cannot write output to '{path}': {reason}")]
    WriteOutput { path: String, reason: String },

    #[error("internal compiler error: {0}")]
    Bug(String),
}

impl FatalError {
    /// Source location, when the failure has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            FatalError::InvalidUtf8 { offset } => Some(Span::new(*offset, *offset + 1)),
            FatalError::EofInComment { span } | FatalError::InvalidLiteral { span, .. } => Some(*span),
            FatalError::BrokenFunction { .. } | FatalError::WriteOutput { .. } | FatalError::Bug(_) => None,
        }
    }

    /// Presentation level: internal defects are labelled `bug`, user-facing
    /// fatal conditions `fatal`.
    pub fn level(&self) -> Level {
        match self {
            FatalError::BrokenFunction { .. } | FatalError::Bug(_) => Level::Bug,
            _ => Level::Fail,
        }
    }
}

/// Accumulating diagnostics sink for one compilation unit.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    errors: usize,
    warnings_off: bool,
    warnings_as_errors: bool,
}

impl Diagnostics {
    pub fn new(warnings_off: bool, warnings_as_errors: bool) -> Self {
        Self {
            entries: Vec::new(),
            errors: 0,
            warnings_off,
            warnings_as_errors,
        }
    }

    /// Report a finding. Warnings honor the `--Woff`/`--Werr` configuration.
    pub fn emit(&mut self, level: Level, message: impl Into<String>, span: Option<Span>) {
        let level = match level {
            Level::Warn if self.warnings_off => return,
            Level::Warn if self.warnings_as_errors => Level::Error,
            other => other,
        };
        if matches!(level, Level::Error | Level::Bug | Level::Fail) {
            self.errors += 1;
        }
        self.entries.push(Diagnostic {
            level,
            message: message.into(),
            span,
        });
    }

    pub fn error(&mut self, message: impl Into<String>, span: Span) {
        self.emit(Level::Error, message, Some(span));
    }

    pub fn warn(&mut self, message: impl Into<String>, span: Span) {
        self.emit(Level::Warn, message, Some(span));
    }

    pub fn syntax_error(&mut self, err: SyntaxError) {
        self.emit(Level::Error, err.message, Some(err.span));
    }

    pub fn fatal(&mut self, err: &FatalError) {
        self.emit(err.level(), err.to_string(), err.span());
    }

    /// Number of error-or-worse findings so far. Codegen is gated on this
    /// being zero after the verifier pass.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Render all collected diagnostics in emission order.
    ///
    /// Span-carrying entries are prefixed `file:line:col: `; the rest print
    /// bare `level: message` lines.
    pub fn render(&self, source: &SourceBuffer) -> Vec<String> {
        self.entries
            .iter()
            .map(|d| match d.span {
                Some(span) => {
                    let pos = source.position_at(span.start);
                    format!(
                        "{}:{}:{}: {}: {}",
                        source.file_name(),
                        pos.line,
                        pos.column,
                        d.level,
                        d.message
                    )
                }
                None => format!("{}: {}", d.level, d.message),
            })
            .collect()
    }

    /// Print everything to stderr, followed by the failure summary if any
    /// errors were collected.
    pub fn flush(&self, source: &SourceBuffer) {
        for line in self.render(source) {
            eprintln!("{line}");
        }
        if let Some(summary) = self.summary() {
            eprintln!("{summary}");
        }
    }

    /// The final summary line, present only when errors were collected.
    pub fn summary(&self) -> Option<String> {
        match self.errors {
            0 => None,
            1 => Some("failed due to the previous error".to_string()),
            n => Some(format!("failed due to {n} errors")),
        }
    }
}
