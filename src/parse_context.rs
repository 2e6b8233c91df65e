//! Per-scan mutable state
//!
//! Everything the state machine accumulates lives in one [`ScanContext`]
//! owned by a single scan, so independent documents can be scanned from
//! several threads at once.

use crate::links::LinkCollector;
use crate::state::ParserState;
use crate::stats::{ScanReport, XmlStats};

/// Name of the only processing instruction the scanner accepts.
pub(crate) const DECLARATION_NAME: &str = "xml";

/// Buffers, open-tag stack and counters for one scan
#[derive(Debug, Clone, Default)]
pub(crate) struct ScanContext {
    /// Active state of the machine
    pub(crate) state: ParserState,

    /// Set once the `<?xml ... ?>` declaration has been consumed
    pub(crate) declaration_seen: bool,

    /// Name of the start tag (or declaration) being read
    pub(crate) tag_name: String,

    /// Name of the closing tag being read
    pub(crate) paired_tag_name: String,

    /// Position where `paired_tag_name` started
    pub(crate) paired_tag_start: usize,

    /// Local attribute name (namespace prefix stripped)
    pub(crate) attribute_name: String,

    /// Attribute value between the quotes
    pub(crate) attribute_value: String,

    /// Position where `attribute_value` started
    pub(crate) attribute_value_start: usize,

    /// Names of the elements opened but not yet closed, outermost first
    pub(crate) open_tags: Vec<String>,

    /// Letters and digits seen in text content
    pub(crate) letter_count: usize,

    /// Fragment references and element ids seen so far
    pub(crate) links: LinkCollector,
}

impl ScanContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Switch state
    pub(crate) fn transition(&mut self, next: ParserState) {
        if self.state != next {
            tracing::trace!(from = %self.state, to = %next, "state transition");
        }
        self.state = next;
    }

    /// Start reading a new start tag
    pub(crate) fn begin_tag(&mut self) {
        self.tag_name.clear();
        self.transition(ParserState::ReadTagName);
    }

    /// Push the current tag name onto the open-tag stack
    pub(crate) fn open_tag(&mut self) {
        self.open_tags.push(self.tag_name.clone());
    }

    /// Innermost open tag
    pub(crate) fn innermost_tag(&self) -> Option<&str> {
        self.open_tags.last().map(String::as_str)
    }

    /// Leave a tag that just ended: back to content while elements are still
    /// open, otherwise idle between top-level nodes.
    pub(crate) fn after_tag(&mut self) {
        if self.open_tags.is_empty() {
            self.transition(ParserState::FindTag);
        } else {
            self.transition(ParserState::ReadContent);
        }
    }

    /// Collapse the context into the result of the scan
    pub(crate) fn into_report(self) -> ScanReport {
        let broken_links: Vec<String> = self
            .links
            .broken_links()
            .into_iter()
            .map(str::to_string)
            .collect();

        ScanReport {
            stats: XmlStats {
                letter_count: self.letter_count,
                total_link_count: self.links.total_links(),
                broken_link_count: broken_links.len(),
            },
            broken_links,
        }
    }
}
