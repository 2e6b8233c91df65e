//! Input stream with position tracking
//!
//! Holds the document as a sequence of Unicode characters so the scanner can
//! address it by character index, look ahead one character for two-character
//! tokens (`<?`, `</`, `/>`, `?>`, `="`) and report positions that match what
//! a reader counts in an editor.

use std::fmt;

/// Character cursor over a fully materialized document
#[derive(Clone)]
pub struct InputStream {
    chars: Vec<char>,
    position: usize,
}

impl InputStream {
    /// Create a new input stream from a string
    pub fn new(input: &str) -> Self {
        InputStream {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    /// Get the current character without advancing
    pub fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    /// Look ahead at a character at offset from current position
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    /// Move the cursor forward by `count` characters, stopping at end of input
    pub fn skip(&mut self, count: usize) {
        self.position = (self.position + count).min(self.chars.len());
    }

    /// Get current position (character index, not byte offset)
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get total length in characters
    pub fn char_count(&self) -> usize {
        self.chars.len()
    }

    /// Character at an absolute position
    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    /// Get a substring from start to end positions, clamped to the input
    pub fn substring(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Get line and column for a position (for error messages)
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;

        for ch in self.chars.iter().take(pos) {
            if *ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }

        (line, col)
    }
}

impl fmt::Debug for InputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InputStream(pos={}, remaining={:?})",
            self.position,
            self.substring(self.position, self.position + 20)
        )
    }
}
