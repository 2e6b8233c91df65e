//! Scan results

use serde::Serialize;

/// Counts produced by a successful scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlStats {
    /// Letters and digits in text content (outside tags and attribute values)
    pub letter_count: usize,
    /// Anchor `href="#..."` references
    pub total_link_count: usize,
    /// References whose target id is never declared
    pub broken_link_count: usize,
}

/// Stats plus the targets of the broken links, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    #[serde(flatten)]
    pub stats: XmlStats,
    pub broken_links: Vec<String>,
}

impl From<ScanReport> for XmlStats {
    fn from(report: ScanReport) -> Self {
        report.stats
    }
}
