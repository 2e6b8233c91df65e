//! Scanner states

use std::fmt;

/// Current position of the scanner within the document grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParserState {
    /// Seeking the next `<`; whitespace is skipped.
    #[default]
    FindTag,
    /// Accumulating a start-tag or declaration name.
    ReadTagName,
    /// Between attributes, or before `>`, `/>` or `?>`.
    FindAttribute,
    /// Accumulating an attribute name that may still turn out to be a namespace prefix.
    ReadAttributeNameOfPrefix,
    /// Accumulating the local attribute name after a prefix colon.
    ReadAttributeName,
    /// Inside a double-quoted attribute value.
    ReadAttributeValue,
    /// Inside element text content.
    ReadContent,
    /// Accumulating a closing tag name after `</`.
    ReadPairedTagName,
}

impl ParserState {
    /// Name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ParserState::FindTag => "FIND_TAG",
            ParserState::ReadTagName => "READ_TAG_NAME",
            ParserState::FindAttribute => "FIND_ATTRIBUTE",
            ParserState::ReadAttributeNameOfPrefix => "READ_ATTRIBUTE_NAME_OF_PREFIX",
            ParserState::ReadAttributeName => "READ_ATTRIBUTE_NAME",
            ParserState::ReadAttributeValue => "READ_ATTRIBUTE_VALUE",
            ParserState::ReadContent => "READ_CONTENT",
            ParserState::ReadPairedTagName => "READ_PAIRED_TAG_NAME",
        }
    }
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
