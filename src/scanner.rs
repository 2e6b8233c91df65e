//! Single-pass XML scanner
//!
//! Walks the document once, left to right, as an explicit state machine. Each
//! state handler looks at the character under the cursor (and at most one
//! character ahead) and either consumes it or fails with a positioned error.
//! The scan checks well-formedness of a restricted XML dialect, counts letters
//! in text content and collects fragment links and element ids for the link
//! resolver.
//!
//! Supported input:
//!
//! - one leading `<?xml ...?>` declaration (required)
//! - elements with double-quoted attributes, optionally namespace-prefixed
//!   (`l:href="#n1"`; only the local name is kept)
//! - self-closing elements (`<br/>`, `<img src="x"/>`)
//! - text content
//!
//! Comments, CDATA, DOCTYPE, processing instructions and entity references
//! are rejected.

use crate::charclass::{is_content_letter, is_identifier_char, is_whitespace, is_word_char};
use crate::error::ParseError;
use crate::input_stream::InputStream;
use crate::parse_context::{ScanContext, DECLARATION_NAME};
use crate::state::ParserState;
use crate::stats::{ScanReport, XmlStats};

/// Scan `document` and return its stats.
pub fn compute_stats(document: &str) -> Result<XmlStats, ParseError> {
    scan(document).map(|report| report.stats)
}

/// Scan `document` and return its stats together with the broken link targets.
pub fn scan(document: &str) -> Result<ScanReport, ParseError> {
    Scanner::new(document).run()
}

/// Characters consumed by one step
type Step = Result<usize, ParseError>;

/// State machine over one document
pub struct Scanner {
    stream: InputStream,
    ctx: ScanContext,
}

impl Scanner {
    pub fn new(document: &str) -> Self {
        Scanner {
            stream: InputStream::new(document),
            ctx: ScanContext::new(),
        }
    }

    /// Consume the whole document
    pub fn run(mut self) -> Result<ScanReport, ParseError> {
        tracing::debug!(chars = self.stream.char_count(), "scanning document");

        while let Some(ch) = self.stream.current() {
            let consumed = self.step(ch)?;
            self.stream.skip(consumed);
        }
        self.finish()?;

        let report = self.ctx.into_report();
        tracing::debug!(
            letters = report.stats.letter_count,
            links = report.stats.total_link_count,
            broken = report.stats.broken_link_count,
            "scan complete"
        );
        Ok(report)
    }

    fn step(&mut self, ch: char) -> Step {
        match self.ctx.state {
            ParserState::FindTag => self.find_tag(ch),
            ParserState::ReadTagName => self.read_tag_name(ch),
            ParserState::FindAttribute => self.find_attribute(ch),
            ParserState::ReadAttributeNameOfPrefix | ParserState::ReadAttributeName => {
                self.read_attribute_name(ch)
            }
            ParserState::ReadAttributeValue => self.read_attribute_value(ch),
            ParserState::ReadContent => self.read_content(ch),
            ParserState::ReadPairedTagName => self.read_paired_tag_name(ch),
        }
    }

    fn unexpected(&self) -> ParseError {
        ParseError::unexpected(&self.stream, self.ctx.state)
    }

    fn next_is(&self, expected: char) -> bool {
        self.stream.peek(1) == Some(expected)
    }

    fn find_tag(&mut self, ch: char) -> Step {
        if is_whitespace(ch) {
            return Ok(1);
        }
        if ch != '<' {
            return Err(self.unexpected());
        }
        if self.ctx.declaration_seen {
            self.ctx.begin_tag();
            Ok(1)
        } else if self.next_is('?') {
            self.ctx.begin_tag();
            Ok(2)
        } else {
            Err(self.unexpected())
        }
    }

    fn read_tag_name(&mut self, ch: char) -> Step {
        if is_identifier_char(ch) {
            self.ctx.tag_name.push(ch);
            return Ok(1);
        }
        if self.ctx.tag_name.is_empty() {
            return Err(self.unexpected());
        }

        let declared = self.ctx.declaration_seen;
        if is_whitespace(ch) && (declared || self.ctx.tag_name == DECLARATION_NAME) {
            self.ctx.open_tag();
            self.ctx.transition(ParserState::FindAttribute);
            return Ok(1);
        }
        if !declared {
            return Err(self.unexpected());
        }

        match ch {
            '>' => {
                self.ctx.open_tag();
                self.ctx.transition(ParserState::ReadContent);
                Ok(1)
            }
            // Self-closing, never pushed
            '/' if self.next_is('>') => {
                self.ctx.after_tag();
                Ok(2)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn find_attribute(&mut self, ch: char) -> Step {
        if is_whitespace(ch) {
            return Ok(1);
        }
        if is_word_char(ch) {
            self.ctx.attribute_name.clear();
            self.ctx.attribute_name.push(ch);
            self.ctx.transition(ParserState::ReadAttributeNameOfPrefix);
            return Ok(1);
        }

        match (self.ctx.declaration_seen, ch) {
            (false, '?') if self.next_is('>') => {
                tracing::debug!("XML declaration consumed");
                self.ctx.declaration_seen = true;
                self.ctx.open_tags.pop();
                self.ctx.after_tag();
                Ok(2)
            }
            (true, '>') => {
                self.ctx.transition(ParserState::ReadContent);
                Ok(1)
            }
            (true, '/') if self.next_is('>') => {
                self.ctx.open_tags.pop();
                self.ctx.after_tag();
                Ok(2)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn read_attribute_name(&mut self, ch: char) -> Step {
        if is_identifier_char(ch) {
            self.ctx.attribute_name.push(ch);
            return Ok(1);
        }

        match ch {
            // What we had was a namespace prefix; the name starts over, so
            // only the part after the last colon is kept
            ':' if !self.ctx.attribute_name.is_empty() => {
                self.ctx.attribute_name.clear();
                self.ctx.transition(ParserState::ReadAttributeName);
                Ok(1)
            }
            '=' if self.next_is('"') && !self.ctx.attribute_name.is_empty() => {
                self.ctx.attribute_value.clear();
                self.ctx.attribute_value_start = self.stream.position() + 2;
                self.ctx.transition(ParserState::ReadAttributeValue);
                Ok(2)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn read_attribute_value(&mut self, ch: char) -> Step {
        match ch {
            '"' => {
                self.finish_attribute()?;
                self.ctx.transition(ParserState::FindAttribute);
                Ok(1)
            }
            '&' | '<' => Err(self.unexpected()),
            _ => {
                self.ctx.attribute_value.push(ch);
                Ok(1)
            }
        }
    }

    /// Record a closed attribute value if it is a link or an element id
    fn finish_attribute(&mut self) -> Result<(), ParseError> {
        let ctx = &mut self.ctx;

        if ctx.tag_name == "a" && ctx.attribute_name == "href" {
            match ctx.attribute_value.strip_prefix('#') {
                Some(target) => ctx.links.add_reference(target),
                None => {
                    return Err(ParseError::InvalidFragmentReference {
                        position: ctx.attribute_value_start,
                        value: ctx.attribute_value.clone(),
                    })
                }
            }
        } else if ctx.attribute_name == "id" {
            ctx.links.add_identifier(ctx.attribute_value.as_str());
        }
        Ok(())
    }

    fn read_content(&mut self, ch: char) -> Step {
        match ch {
            '<' if self.next_is('/') => {
                self.ctx.paired_tag_name.clear();
                self.ctx.paired_tag_start = self.stream.position() + 2;
                self.ctx.transition(ParserState::ReadPairedTagName);
                Ok(2)
            }
            '<' => {
                self.ctx.begin_tag();
                Ok(1)
            }
            '>' | '&' => Err(self.unexpected()),
            _ => {
                if is_content_letter(ch) {
                    self.ctx.letter_count += 1;
                }
                Ok(1)
            }
        }
    }

    fn read_paired_tag_name(&mut self, ch: char) -> Step {
        if is_identifier_char(ch) {
            self.ctx.paired_tag_name.push(ch);
            return Ok(1);
        }
        if ch != '>' || self.ctx.paired_tag_name.is_empty() {
            return Err(self.unexpected());
        }

        match self.ctx.innermost_tag() {
            Some(open) if open == self.ctx.paired_tag_name => {
                self.ctx.open_tags.pop();
                self.ctx.after_tag();
                Ok(1)
            }
            open => Err(ParseError::TagMismatch {
                position: self.ctx.paired_tag_start,
                expected: open.unwrap_or_default().to_string(),
                found: self.ctx.paired_tag_name.clone(),
                open_tags: self.ctx.open_tags.clone(),
            }),
        }
    }

    /// Check the machine stopped in an accepting state
    fn finish(&self) -> Result<(), ParseError> {
        let position = self.stream.position();
        let state = self.ctx.state;

        match state {
            ParserState::FindTag if self.ctx.declaration_seen => Ok(()),
            ParserState::ReadContent => match self.ctx.innermost_tag() {
                Some(tag) => Err(ParseError::UnclosedTag {
                    position,
                    tag: tag.to_string(),
                    open_tags: self.ctx.open_tags.clone(),
                }),
                None => Err(ParseError::UnexpectedEof { position, state }),
            },
            _ => Err(ParseError::UnexpectedEof { position, state }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECL: &str = r#"<?xml version="1.0"?>"#;

    fn doc(body: &str) -> String {
        format!("{}{}", DECL, body)
    }

    fn stats(letters: usize, links: usize, broken: usize) -> XmlStats {
        XmlStats {
            letter_count: letters,
            total_link_count: links,
            broken_link_count: broken,
        }
    }

    #[test]
    fn test_resolved_link() {
        let input = doc(r##"<doc><p id="a">Hi</p><p><a href="#a">x</a></p></doc>"##);
        assert_eq!(compute_stats(&input), Ok(stats(3, 1, 0)));
    }

    #[test]
    fn test_missing_link_target() {
        let input = doc(r##"<doc><a href="#missing">y</a></doc>"##);
        assert_eq!(compute_stats(&input), Ok(stats(1, 1, 1)));
    }

    #[test]
    fn test_self_closing_and_greek() {
        let input = doc(r#"<doc><br/><p id="z">Ω</p></doc>"#);
        assert_eq!(compute_stats(&input), Ok(stats(1, 0, 0)));
    }

    #[test]
    fn test_greek_text() {
        let input = doc("<doc><p>Ἀ Λόγος ώρα</p></doc>");
        // Λ ό γ ο ς ώ ρ α; the breathing-mark Ἀ is outside the counted ranges
        assert_eq!(compute_stats(&input).unwrap().letter_count, 8);
    }

    #[test]
    fn test_last_prefix_wins() {
        let input = doc(r##"<doc><a x:l:href="#n"/><p a:b:c:id="n"/></doc>"##);
        assert_eq!(compute_stats(&input), Ok(stats(0, 1, 0)));
    }

    #[test]
    fn test_self_closing_with_attributes() {
        let input = doc(r#"<doc><img src="cover.jpg" id="c"/><p>ok</p></doc>"#);
        assert_eq!(compute_stats(&input), Ok(stats(2, 0, 0)));
    }

    #[test]
    fn test_cyrillic_and_digits() {
        let input = doc("<doc><p>Ёжик 2 раза, ok!</p></doc>");
        // Ё ж и к 2 р а з а o k
        assert_eq!(compute_stats(&input).unwrap().letter_count, 11);
    }

    #[test]
    fn test_id_declared_after_reference() {
        let input = doc(r##"<doc><a href="#n1">1</a><a href="#n2">2</a><section id="n2"/><p id="n1"/></doc>"##);
        assert_eq!(compute_stats(&input), Ok(stats(2, 2, 0)));
    }

    #[test]
    fn test_duplicate_broken_links_counted() {
        let input = doc(r##"<doc><a href="#x"/><a href="#x"/><a href="#y"/><p id="y"/></doc>"##);
        let report = scan(&input).unwrap();
        assert_eq!(report.stats, stats(0, 3, 2));
        assert_eq!(report.broken_links, vec!["x".to_string(), "x".to_string()]);
    }

    #[test]
    fn test_namespace_prefixed_href() {
        let input = format!(
            "{}\n<FictionBook xmlns:l=\"http://www.w3.org/1999/xlink\">\n  <body>\n    <p><a l:href=\"#note1\">1</a></p>\n    <section id=\"note1\"><p>Note</p></section>\n  </body>\n</FictionBook>\n",
            DECL
        );
        assert_eq!(compute_stats(&input), Ok(stats(5, 1, 0)));
    }

    #[test]
    fn test_id_keeps_leading_hash() {
        let input = doc(r##"<doc><p id="#a"/><a href="#a"/></doc>"##);
        assert_eq!(compute_stats(&input), Ok(stats(0, 1, 1)));
    }

    #[test]
    fn test_href_on_other_elements_is_ignored() {
        let input = doc(r#"<doc><link href="style.css"/></doc>"#);
        assert_eq!(compute_stats(&input), Ok(stats(0, 0, 0)));
    }

    #[test]
    fn test_attribute_values_not_counted() {
        let input = doc(r#"<doc title="Many words here"><p class="x y">ab</p></doc>"#);
        assert_eq!(compute_stats(&input).unwrap().letter_count, 2);
    }

    #[test]
    fn test_declaration_only() {
        assert_eq!(compute_stats(DECL), Ok(stats(0, 0, 0)));
    }

    #[test]
    fn test_whitespace_and_bom_around_root() {
        let input = format!("\u{FEFF}  {}\n\n<doc>a</doc>\n  ", DECL);
        assert_eq!(compute_stats(&input), Ok(stats(1, 0, 0)));
    }

    #[test]
    fn test_idempotent() {
        let input = doc(r##"<doc><a href="#q">x</a><b id="q">y</b><a href="#r"/></doc>"##);
        assert_eq!(compute_stats(&input), compute_stats(&input));
        assert_eq!(scan(&input), scan(&input));
    }

    #[test]
    fn test_tag_mismatch() {
        let input = doc(r#"<a id="x"><b></a>"#);
        match compute_stats(&input) {
            Err(ParseError::TagMismatch {
                position,
                expected,
                found,
                open_tags,
            }) => {
                assert_eq!(expected, "b");
                assert_eq!(found, "a");
                assert_eq!(open_tags, vec!["a".to_string(), "b".to_string()]);
                assert_eq!(position, DECL.len() + 15);
            }
            other => panic!("expected tag mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_fragment_reference() {
        let input = doc(r#"<a href="notAFragment">"#);
        match compute_stats(&input) {
            Err(ParseError::InvalidFragmentReference { position, value }) => {
                assert_eq!(value, "notAFragment");
                assert_eq!(position, DECL.len() + 9);
            }
            other => panic!("expected invalid reference, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_tag() {
        let input = doc("<doc><p>text");
        match compute_stats(&input) {
            Err(ParseError::UnclosedTag { tag, open_tags, .. }) => {
                assert_eq!(tag, "p");
                assert_eq!(open_tags.len(), 2);
            }
            other => panic!("expected unclosed tag, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_inside_tag() {
        let input = doc(r#"<doc attr="va"#);
        assert!(matches!(
            compute_stats(&input),
            Err(ParseError::UnexpectedEof {
                state: ParserState::ReadAttributeValue,
                ..
            })
        ));

        let input = doc("<doc></do");
        assert!(matches!(
            compute_stats(&input),
            Err(ParseError::UnexpectedEof {
                state: ParserState::ReadPairedTagName,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_and_missing_declaration() {
        assert!(matches!(
            compute_stats(""),
            Err(ParseError::UnexpectedEof {
                position: 0,
                state: ParserState::FindTag
            })
        ));
        assert!(matches!(
            compute_stats("<doc/>"),
            Err(ParseError::UnexpectedCharacter {
                position: 0,
                state: ParserState::FindTag,
                character: '<',
                ..
            })
        ));
    }

    #[test]
    fn test_other_processing_instruction_before_declaration() {
        assert!(matches!(
            compute_stats(r#"<?php echo="1"?>"#),
            Err(ParseError::UnexpectedCharacter {
                state: ParserState::ReadTagName,
                character: ' ',
                ..
            })
        ));
    }

    #[test]
    fn test_bare_gt_in_content() {
        let input = doc("<doc>a > b</doc>");
        match compute_stats(&input) {
            Err(ParseError::UnexpectedCharacter {
                position,
                state,
                character,
                context,
            }) => {
                assert_eq!(state, ParserState::ReadContent);
                assert_eq!(character, '>');
                assert_eq!(position, DECL.len() + 7);
                assert!(context.before.ends_with("<doc>a "));
                assert_eq!(context.after, " b</doc>");
            }
            other => panic!("expected unexpected character, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_constructs_fail() {
        for body in [
            "<doc><!-- comment --></doc>",
            "<doc><![CDATA[x]]></doc>",
            "<!DOCTYPE doc><doc/>",
            "<doc>&amp;</doc>",
            r#"<doc a="&lt;"/>"#,
            "<doc a='single'/>",
            "<doc><?pi x?></doc>",
        ] {
            let input = doc(body);
            assert!(
                matches!(compute_stats(&input), Err(ParseError::UnexpectedCharacter { .. })),
                "{} should fail",
                body
            );
        }
    }

    #[test]
    fn test_malformed_tags_fail() {
        for body in [
            "<></>",
            "< doc/>",
            "<doc></ doc>",
            "<doc></>",
            "<doc/ >",
            r#"<doc a ="x"/>"#,
            r#"<doc a:="x"/>"#,
            r#"<doc a::b="x"/>"#,
            "<doc a/>",
        ] {
            let input = doc(body);
            assert!(
                matches!(compute_stats(&input), Err(ParseError::UnexpectedCharacter { .. })),
                "{} should fail",
                body
            );
        }
    }

    #[test]
    fn test_text_outside_root_fails() {
        let input = doc("<doc/>trailing");
        assert!(matches!(
            compute_stats(&input),
            Err(ParseError::UnexpectedCharacter {
                state: ParserState::FindTag,
                character: 't',
                ..
            })
        ));
    }

    #[test]
    fn test_second_declaration_fails() {
        let input = doc(DECL);
        assert!(matches!(
            compute_stats(&input),
            Err(ParseError::UnexpectedCharacter {
                state: ParserState::ReadTagName,
                character: '?',
                ..
            })
        ));
    }

    #[test]
    fn test_stack_empty_after_success() {
        let input = doc("<a><b><c/></b><d></d></a>");
        let mut scanner = Scanner::new(&input);
        while let Some(ch) = scanner.stream.current() {
            let consumed = scanner.step(ch).unwrap();
            scanner.stream.skip(consumed);
        }
        assert!(scanner.ctx.open_tags.is_empty());
        assert_eq!(scanner.ctx.state, ParserState::FindTag);
        assert!(scanner.finish().is_ok());
    }

    #[test]
    fn test_hyphenated_names() {
        let input = doc(r#"<text-author data-x="1">Me</text-author>"#);
        assert_eq!(compute_stats(&input), Ok(stats(2, 0, 0)));
    }
}
