//! Scan errors and their rendering
//!
//! Errors keep the raw facts (state, position, offending names) as fields;
//! text is produced only by `Display` and [`ParseError::format_with_context`].

use crate::input_stream::InputStream;
use crate::state::ParserState;
use std::fmt;

/// Characters of surrounding input captured for an unexpected-character error.
pub const DEFAULT_CONTEXT_WIDTH: usize = 100;

/// Input around an offending character, split evenly before and after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    pub before: String,
    pub character: char,
    pub after: String,
}

impl ContextWindow {
    /// Capture `width` characters around `position` (half on each side).
    /// Returns `None` when `position` is past the end of input.
    pub fn around(stream: &InputStream, position: usize, width: usize) -> Option<Self> {
        let character = stream.char_at(position)?;
        let half = width / 2;
        Some(ContextWindow {
            before: stream.substring(position.saturating_sub(half), position),
            character,
            after: stream.substring(position + 1, position + 1 + half),
        })
    }
}

impl fmt::Display for ContextWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.before, self.character, self.after)
    }
}

/// Fatal scan failure. The scan stops at the first one and yields no stats.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The active state has no rule for this character
    #[error("XML parser error: {position}: found character {character:?} in state {state}; context: {context}")]
    UnexpectedCharacter {
        position: usize,
        state: ParserState,
        character: char,
        context: ContextWindow,
    },

    /// An anchor `href` that is not a `#fragment`
    #[error("Invalid link id {value:?} at position {position}: anchor href must start with '#'")]
    InvalidFragmentReference { position: usize, value: String },

    /// Closing tag does not match the innermost open tag
    #[error("Tag name mismatch at position {position}: <{expected}> ... </{found}>; open tags: [{}]", .open_tags.join(", "))]
    TagMismatch {
        position: usize,
        expected: String,
        found: String,
        open_tags: Vec<String>,
    },

    /// Input ended inside element content
    #[error("Unclosed tag <{tag}> at end of input; open tags: [{}]", .open_tags.join(", "))]
    UnclosedTag {
        position: usize,
        tag: String,
        open_tags: Vec<String>,
    },

    /// Input ended in the middle of a tag, or before the XML declaration
    #[error("Unexpected end of input at position {position} in state {state}")]
    UnexpectedEof { position: usize, state: ParserState },
}

impl ParseError {
    /// Build an unexpected-character error for the character under the cursor.
    pub(crate) fn unexpected(stream: &InputStream, state: ParserState) -> Self {
        let position = stream.position();
        match ContextWindow::around(stream, position, DEFAULT_CONTEXT_WIDTH) {
            Some(context) => ParseError::UnexpectedCharacter {
                position,
                state,
                character: context.character,
                context,
            },
            None => ParseError::UnexpectedEof { position, state },
        }
    }

    /// Get the position where the error occurred
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedCharacter { position, .. } => *position,
            ParseError::InvalidFragmentReference { position, .. } => *position,
            ParseError::TagMismatch { position, .. } => *position,
            ParseError::UnclosedTag { position, .. } => *position,
            ParseError::UnexpectedEof { position, .. } => *position,
        }
    }

    /// Format error with line and column looked up in the input
    pub fn format_with_context(&self, input: &str) -> String {
        let stream = InputStream::new(input);
        let (line, col) = stream.line_col(self.position());

        match self {
            ParseError::UnexpectedCharacter {
                state,
                character,
                context,
                ..
            } => {
                format!(
                    "Parse error at line {}, column {}: unexpected character {:?} in state {}\nContext: ...{}...",
                    line, col, character, state, context
                )
            }
            ParseError::InvalidFragmentReference { value, .. } => {
                format!(
                    "Parse error at line {}, column {}: invalid link id {:?}, anchor href must start with '#'",
                    line, col, value
                )
            }
            ParseError::TagMismatch {
                expected,
                found,
                open_tags,
                ..
            } => {
                format!(
                    "Parse error at line {}, column {}: tag name mismatch <{}> ... </{}>\nOpen tags: {}",
                    line,
                    col,
                    expected,
                    found,
                    open_tags.join(" > ")
                )
            }
            ParseError::UnclosedTag { tag, open_tags, .. } => {
                format!(
                    "Parse error at line {}, column {}: unclosed tag <{}> at end of input\nOpen tags: {}",
                    line,
                    col,
                    tag,
                    open_tags.join(" > ")
                )
            }
            ParseError::UnexpectedEof { state, .. } => {
                format!(
                    "Parse error at line {}, column {}: unexpected end of input in state {}",
                    line, col, state
                )
            }
        }
    }
}
