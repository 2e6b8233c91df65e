//! Character classification for the scanner
//!
//! Pure predicates over single characters. Content letters are restricted to a
//! fixed set of scripts (see [`Script`]); everything outside of them still
//! counts as content but never as a letter.

use std::sync::OnceLock;
use unicode_general_category::{get_general_category, GeneralCategory};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RangeSet {
    /// Sorted, non-overlapping ranges stored as (start, end) inclusive
    ranges: Vec<(char, char)>,
}

impl Default for RangeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeSet {
    /// Create an empty RangeSet
    pub fn new() -> Self {
        RangeSet { ranges: Vec::new() }
    }

    /// Create a RangeSet from a range
    pub fn from_range(start: char, end: char) -> Self {
        let mut set = RangeSet::new();
        set.add_range(start, end);
        set
    }

    /// Add a character to the set
    pub fn add_char(&mut self, ch: char) {
        self.add_range(ch, ch);
    }

    /// Add a range to the set
    pub fn add_range(&mut self, start: char, end: char) {
        if start > end {
            return;
        }
        self.ranges.push((start, end));
        self.normalize();
    }

    /// Normalize ranges: sort and merge overlapping/adjacent ranges
    fn normalize(&mut self) {
        if self.ranges.len() <= 1 {
            return;
        }
        self.ranges.sort_by_key(|r| r.0);
        let mut merged = Vec::with_capacity(self.ranges.len());
        let mut current = self.ranges[0];

        for &(start, end) in &self.ranges[1..] {
            if start as u32 <= current.1 as u32 + 1 {
                current.1 = current.1.max(end);
            } else {
                merged.push(current);
                current = (start, end);
            }
        }
        merged.push(current);
        self.ranges = merged;
    }

    /// Check if the set contains a character
    pub fn contains(&self, ch: char) -> bool {
        self.ranges
            .binary_search_by(|&(start, end)| {
                if end < ch {
                    std::cmp::Ordering::Less
                } else if start > ch {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }
}

/// Scripts whose letters count toward the letter total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Script {
    /// Basic Latin, Latin-1 Supplement, Latin Extended-A/B and Latin Extended Additional.
    Latin,
    /// The Russian alphabet: А..я plus Ё and ё, which live outside the main block.
    Cyrillic,
    /// The Greek alphabet with its tonos forms.
    Greek,
}

/// Every script [`is_content_letter`] accepts.
pub const CONTENT_SCRIPTS: [Script; 3] = [Script::Latin, Script::Cyrillic, Script::Greek];

impl Script {
    /// Code point ranges covered by the script. The ranges also hold some
    /// non-letters (`×`, `÷`, the Greek ano teleia, unassigned code points),
    /// which the general category check filters out.
    pub fn ranges(self) -> &'static RangeSet {
        static LATIN: OnceLock<RangeSet> = OnceLock::new();
        static CYRILLIC: OnceLock<RangeSet> = OnceLock::new();
        static GREEK: OnceLock<RangeSet> = OnceLock::new();

        match self {
            Script::Latin => LATIN.get_or_init(|| {
                let mut set = RangeSet::from_range('A', 'Z');
                set.add_range('a', 'z');
                set.add_range('\u{00C0}', '\u{024F}');
                set.add_range('\u{1E00}', '\u{1EFF}');
                set
            }),
            Script::Cyrillic => CYRILLIC.get_or_init(|| {
                let mut set = RangeSet::from_range('\u{0410}', '\u{044F}');
                set.add_char('\u{0401}');
                set.add_char('\u{0451}');
                set
            }),
            Script::Greek => GREEK.get_or_init(|| {
                let mut set = RangeSet::from_range('\u{0386}', '\u{038F}');
                set.add_range('\u{0391}', '\u{03A9}');
                set.add_range('\u{03AC}', '\u{03CE}');
                set
            }),
        }
    }

    pub fn contains(self, ch: char) -> bool {
        self.ranges().contains(ch)
    }
}

/// Whitespace between tags and attributes. A byte-order mark is accepted too,
/// since documents fetched from disk often start with one.
pub fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{FEFF}'
}

/// ASCII word character: letter, digit or underscore.
pub fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Tag and attribute name character.
pub fn is_identifier_char(ch: char) -> bool {
    is_word_char(ch) || ch == '-'
}

fn is_letter_category(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// Text content character counted as a letter: a decimal digit or a letter of
/// one of the [`CONTENT_SCRIPTS`].
pub fn is_content_letter(ch: char) -> bool {
    if ch.is_ascii_digit() {
        return true;
    }
    CONTENT_SCRIPTS.iter().any(|script| script.contains(ch)) && is_letter_category(ch)
}
