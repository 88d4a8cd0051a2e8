//! Source file access for the scar compiler.
//!
//! A [`SourceBuffer`] owns the raw bytes of one input file and supports the
//! random-access reads the lexer and diagnostics need: single bytes by
//! offset, substring slices for re-reading token text, and byte-offset to
//! line/column resolution.

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Errors that occur while loading a source file.
#[derive(Debug, Error)]
pub enum SourceFileError {
    #[error("cannot open '{path}': {reason}")]
    Open { path: String, reason: String },
}

/// A position in a source file. Line and column are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

/// An in-memory source file with random-access reads.
///
/// The buffer holds raw bytes rather than a `String` so the codepoint
/// decoder performs real UTF-8 validation instead of trusting the loader.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    file_name: String,
    bytes: Vec<u8>,
}

impl SourceBuffer {
    /// Load a source file from disk.
    pub fn open(path: &Path) -> Result<Self, SourceFileError> {
        let bytes = fs::read(path).map_err(|e| SourceFileError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            file_name: path.display().to_string(),
            bytes,
        })
    }

    /// Build a buffer from an in-memory string (tests, tooling).
    pub fn from_string(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: text.into().into_bytes(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte at `offset`, or 0 past the end of the buffer.
    pub fn byte_at(&self, offset: usize) -> u8 {
        self.bytes.get(offset).copied().unwrap_or(0)
    }

    /// Re-read a slice of the source, lossily decoded.
    ///
    /// With `stop_at_newline` the slice is cut at the first line break, which
    /// keeps single-line diagnostic excerpts single-line.
    pub fn substring(&self, offset: usize, length: usize, stop_at_newline: bool) -> String {
        let start = offset.min(self.bytes.len());
        let mut end = offset.saturating_add(length).min(self.bytes.len());
        if stop_at_newline {
            if let Some(nl) = self.bytes[start..end].iter().position(|&b| b == b'\n') {
                end = start + nl;
            }
        }
        String::from_utf8_lossy(&self.bytes[start..end]).into_owned()
    }

    /// Resolve a byte offset to a 1-based line/column position.
    pub fn position_at(&self, offset: usize) -> TextPosition {
        let offset = offset.min(self.bytes.len());
        let mut line = 1;
        let mut line_start = 0;
        for (i, &b) in self.bytes[..offset].iter().enumerate() {
            if b == b'\n' {
                line += 1;
                line_start = i + 1;
            }
        }
        TextPosition {
            line,
            column: offset - line_start + 1,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_at() {
        let buf = SourceBuffer::from_string("t.scar", "line 1\nline 2\nline 3");

        let pos = buf.position_at(0);
        assert_eq!((pos.line, pos.column), (1, 1));

        let pos = buf.position_at(7);
        assert_eq!((pos.line, pos.column), (2, 1));

        let pos = buf.position_at(10);
        assert_eq!((pos.line, pos.column), (2, 4));
    }

    #[test]
    fn test_position_past_end_clamps() {
        let buf = SourceBuffer::from_string("t.scar", "ab");
        let pos = buf.position_at(100);
        assert_eq!(pos.offset, 2);
        assert_eq!((pos.line, pos.column), (1, 3));
    }

    #[test]
    fn test_substring_stops_at_newline() {
        let buf = SourceBuffer::from_string("t.scar", "abc\ndef");
        assert_eq!(buf.substring(0, 7, true), "abc");
        assert_eq!(buf.substring(0, 7, false), "abc\ndef");
        assert_eq!(buf.substring(4, 3, true), "def");
    }

    #[test]
    fn test_byte_at_past_end_is_zero() {
        let buf = SourceBuffer::from_string("t.scar", "x");
        assert_eq!(buf.byte_at(0), b'x');
        assert_eq!(buf.byte_at(1), 0);
    }
}
