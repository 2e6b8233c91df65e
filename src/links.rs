//! Fragment link integrity
//!
//! The scanner feeds every anchor `href="#target"` and every `id="..."` it
//! meets into a [`LinkCollector`]. Resolution happens once, after the whole
//! document has been read, so an `id` declared after the link that points to
//! it still satisfies the link.

use std::collections::HashSet;

/// Link targets and element identifiers collected during one scan.
#[derive(Debug, Clone, Default)]
pub struct LinkCollector {
    references: Vec<String>,
    identifiers: Vec<String>,
}

impl LinkCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a link target (the part of the `href` after `#`).
    pub fn add_reference(&mut self, target: impl Into<String>) {
        self.references.push(target.into());
    }

    /// Record an element identifier verbatim.
    pub fn add_identifier(&mut self, id: impl Into<String>) {
        self.identifiers.push(id.into());
    }

    pub fn total_links(&self) -> usize {
        self.references.len()
    }

    pub fn broken_links(&self) -> Vec<&str> {
        find_broken_links(self.references.as_slice(), self.identifiers.as_slice())
    }
}

/// References whose target is not among `identifiers`, in reference order.
///
/// Duplicate identifiers collapse; duplicate references do not, so two links
/// to the same missing target count as two broken links.
pub fn find_broken_links<'a, S: AsRef<str>>(references: &'a [S], identifiers: &[S]) -> Vec<&'a str> {
    let declared: HashSet<&str> = identifiers.iter().map(|id| id.as_ref()).collect();
    let broken: Vec<&str> = references
        .iter()
        .map(|target| target.as_ref())
        .filter(|target| !declared.contains(target))
        .collect();

    tracing::debug!(
        links = references.len(),
        ids = declared.len(),
        broken = broken.len(),
        "resolved fragment links"
    );
    broken
}
