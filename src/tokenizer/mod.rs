//! Byte-level markup tokenizer.
//!
//! The tokenizer scans raw markup text and reports what it finds, in document
//! order, to a [`MarkupSink`]. It performs no tree construction and keeps no
//! document state; pairing up start and end tags is entirely the sink's
//! problem. [`crate::parser::Parser`] is the sink used by
//! [`crate::Document::parse_str`], but any `MarkupSink` implementation can be
//! driven through [`tokenize`].
//!
//! Scanning is byte-oriented. Every delimiter the grammar cares about is
//! ASCII, so slicing the input `&str` at scanner positions always lands on a
//! UTF-8 boundary and multi-byte text content passes through untouched.
//!
//! The tokenizer is strict: unterminated constructs and stray `<` characters
//! fail with [`ParseError::Tokenizer`] carrying the byte offset, rather than
//! being silently repaired.

use crate::error::ParseError;
use crate::tree::Doctype;

/// Receiver for tokenizer events.
///
/// All methods have no-op default implementations, so a sink only implements
/// the events it cares about. Events arrive in document order, and returning
/// an error from any callback aborts the scan immediately.
pub trait MarkupSink {
    /// Called for a start tag. `tag` and attribute keys are lowercased;
    /// attribute values are verbatim. `self_closing` is `true` for
    /// `<tag ... />`.
    fn start_tag(
        &mut self,
        tag: &str,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    ) -> Result<(), ParseError> {
        let _ = (tag, attributes, self_closing);
        Ok(())
    }

    /// Called for an end tag. `tag` is lowercased.
    fn end_tag(&mut self, tag: &str) -> Result<(), ParseError> {
        let _ = tag;
        Ok(())
    }

    /// Called for a run of character data between tags, verbatim.
    fn text(&mut self, content: &str) -> Result<(), ParseError> {
        let _ = content;
        Ok(())
    }

    /// Called for a comment, without the `<!--` and `-->` delimiters.
    fn comment(&mut self, content: &str) -> Result<(), ParseError> {
        let _ = content;
        Ok(())
    }

    /// Called for a CDATA section body, with no unescaping applied.
    fn data(&mut self, content: &str) -> Result<(), ParseError> {
        let _ = content;
        Ok(())
    }

    /// Called when a `<!DOCTYPE ...>` declaration is scanned.
    fn doctype(&mut self, doctype: Doctype) -> Result<(), ParseError> {
        let _ = doctype;
        Ok(())
    }

    /// Called exactly once, after the last byte of input has been consumed.
    fn end_of_input(&mut self) -> Result<(), ParseError> {
        Ok(())
    }
}

/// Scans `input` and reports every construct to `sink` in document order.
///
/// # Errors
///
/// Returns [`ParseError::Tokenizer`] for malformed markup (unterminated
/// comments, tags, or declarations, and `<` not opening a recognized
/// construct), or whatever error the sink itself returns.
pub fn tokenize<S: MarkupSink>(input: &str, sink: &mut S) -> Result<(), ParseError> {
    let mut scanner = Scanner { input, pos: 0 };
    scanner.run(sink)?;
    sink.end_of_input()
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

impl Scanner<'_> {
    fn run<S: MarkupSink>(&mut self, sink: &mut S) -> Result<(), ParseError> {
        while self.pos < self.input.len() {
            self.scan_text(sink)?;
            if self.pos >= self.input.len() {
                break;
            }
            // Positioned at '<'.
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.scan_comment(sink)?;
            } else if rest.starts_with("<![CDATA[") {
                self.scan_cdata(sink)?;
            } else if rest.starts_with("<!") {
                self.scan_declaration(sink)?;
            } else if rest.starts_with("<?") {
                self.scan_processing_instruction()?;
            } else if rest.starts_with("</") {
                self.scan_end_tag(sink)?;
            } else if rest[1..].bytes().next().is_some_and(|b| b.is_ascii_alphabetic()) {
                self.scan_start_tag(sink)?;
            } else {
                return Err(self.error("'<' does not open a tag, comment, or declaration"));
            }
        }
        Ok(())
    }

    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError::Tokenizer {
            message: message.to_string(),
            offset: self.pos,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Consumes up to the next `<` and reports the run as text if non-empty.
    fn scan_text<S: MarkupSink>(&mut self, sink: &mut S) -> Result<(), ParseError> {
        let start = self.pos;
        match self.rest().find('<') {
            Some(rel) => self.pos += rel,
            None => self.pos = self.input.len(),
        }
        if self.pos > start {
            sink.text(&self.input[start..self.pos])?;
        }
        Ok(())
    }

    fn scan_comment<S: MarkupSink>(&mut self, sink: &mut S) -> Result<(), ParseError> {
        let body_start = self.pos + 4;
        let Some(rel) = self.input[body_start..].find("-->") else {
            return Err(self.error("unterminated comment"));
        };
        sink.comment(&self.input[body_start..body_start + rel])?;
        self.pos = body_start + rel + 3;
        Ok(())
    }

    fn scan_cdata<S: MarkupSink>(&mut self, sink: &mut S) -> Result<(), ParseError> {
        let body_start = self.pos + 9;
        let Some(rel) = self.input[body_start..].find("]]>") else {
            return Err(self.error("unterminated CDATA section"));
        };
        sink.data(&self.input[body_start..body_start + rel])?;
        self.pos = body_start + rel + 3;
        Ok(())
    }

    /// Handles `<!...>` declarations. A DOCTYPE is classified and reported;
    /// any other declaration is skipped.
    fn scan_declaration<S: MarkupSink>(&mut self, sink: &mut S) -> Result<(), ParseError> {
        let body_start = self.pos + 2;
        let Some(rel) = self.input[body_start..].find('>') else {
            return Err(self.error("unterminated markup declaration"));
        };
        let body = &self.input[body_start..body_start + rel];
        // Byte comparison: slicing the str at 7 could split a multibyte
        // character in a non-doctype declaration.
        let is_doctype = body
            .as_bytes()
            .get(..7)
            .is_some_and(|head| head.eq_ignore_ascii_case(b"doctype"));
        if is_doctype {
            sink.doctype(Doctype::classify(&body[7..]))?;
        }
        self.pos = body_start + rel + 1;
        Ok(())
    }

    /// Skips a `<?...?>` processing instruction without reporting it.
    fn scan_processing_instruction(&mut self) -> Result<(), ParseError> {
        let body_start = self.pos + 2;
        let Some(rel) = self.input[body_start..].find("?>") else {
            return Err(self.error("unterminated processing instruction"));
        };
        self.pos = body_start + rel + 2;
        Ok(())
    }

    /// Scans a tag or attribute name and returns it lowercased. Empty when
    /// the scanner is not positioned at a name byte.
    fn scan_name(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_name_byte) {
            self.pos += 1;
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    fn scan_end_tag<S: MarkupSink>(&mut self, sink: &mut S) -> Result<(), ParseError> {
        self.pos += 2;
        let name = self.scan_name();
        if name.is_empty() {
            return Err(self.error("missing tag name in end tag"));
        }
        self.skip_whitespace();
        if self.peek() != Some(b'>') {
            return Err(self.error("unterminated end tag"));
        }
        self.pos += 1;
        sink.end_tag(&name)
    }

    fn scan_start_tag<S: MarkupSink>(&mut self, sink: &mut S) -> Result<(), ParseError> {
        self.pos += 1;
        let name = self.scan_name();
        let mut attributes: Vec<(String, String)> = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error("unterminated start tag")),
                Some(b'>') => {
                    self.pos += 1;
                    return sink.start_tag(&name, attributes, false);
                }
                Some(b'/') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.peek() == Some(b'>') {
                        self.pos += 1;
                        return sink.start_tag(&name, attributes, true);
                    }
                    return Err(self.error("expected '>' after '/' in tag"));
                }
                Some(_) => {
                    let key = self.scan_name();
                    if key.is_empty() {
                        return Err(self.error("malformed attribute name"));
                    }
                    self.skip_whitespace();
                    let value = if self.peek() == Some(b'=') {
                        self.pos += 1;
                        self.skip_whitespace();
                        self.scan_attribute_value()?
                    } else {
                        // Bare attribute, e.g. <input disabled>.
                        String::new()
                    };
                    attributes.push((key, value));
                }
            }
        }
    }

    fn scan_attribute_value(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                let start = self.pos;
                let Some(rel) = self.rest().find(quote as char) else {
                    return Err(self.error("unterminated quoted attribute value"));
                };
                self.pos = start + rel + 1;
                Ok(self.input[start..start + rel].to_string())
            }
            _ => {
                // Unquoted values run to the next whitespace or '>'.
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|b| !b.is_ascii_whitespace() && b != b'>')
                {
                    self.pos += 1;
                }
                Ok(self.input[start..self.pos].to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Start(String, Vec<(String, String)>, bool),
        End(String),
        Text(String),
        Comment(String),
        Data(String),
        Doctype(Doctype),
        Eof,
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl MarkupSink for Recorder {
        fn start_tag(
            &mut self,
            tag: &str,
            attributes: Vec<(String, String)>,
            self_closing: bool,
        ) -> Result<(), ParseError> {
            self.events
                .push(Event::Start(tag.to_string(), attributes, self_closing));
            Ok(())
        }

        fn end_tag(&mut self, tag: &str) -> Result<(), ParseError> {
            self.events.push(Event::End(tag.to_string()));
            Ok(())
        }

        fn text(&mut self, content: &str) -> Result<(), ParseError> {
            self.events.push(Event::Text(content.to_string()));
            Ok(())
        }

        fn comment(&mut self, content: &str) -> Result<(), ParseError> {
            self.events.push(Event::Comment(content.to_string()));
            Ok(())
        }

        fn data(&mut self, content: &str) -> Result<(), ParseError> {
            self.events.push(Event::Data(content.to_string()));
            Ok(())
        }

        fn doctype(&mut self, doctype: Doctype) -> Result<(), ParseError> {
            self.events.push(Event::Doctype(doctype));
            Ok(())
        }

        fn end_of_input(&mut self) -> Result<(), ParseError> {
            self.events.push(Event::Eof);
            Ok(())
        }
    }

    fn events(input: &str) -> Vec<Event> {
        let mut rec = Recorder::default();
        tokenize(input, &mut rec).unwrap();
        rec.events
    }

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_simple_element() {
        assert_eq!(
            events("<p>hi</p>"),
            vec![
                Event::Start("p".to_string(), vec![], false),
                Event::Text("hi".to_string()),
                Event::End("p".to_string()),
                Event::Eof,
            ]
        );
    }

    #[test]
    fn test_tag_names_are_lowercased() {
        assert_eq!(
            events("<DiV></DIV>"),
            vec![
                Event::Start("div".to_string(), vec![], false),
                Event::End("div".to_string()),
                Event::Eof,
            ]
        );
    }

    #[test]
    fn test_attributes_quoted_unquoted_bare() {
        assert_eq!(
            events(r#"<a HREF="x.html" id=main disabled>"#),
            vec![
                Event::Start(
                    "a".to_string(),
                    attrs(&[("href", "x.html"), ("id", "main"), ("disabled", "")]),
                    false
                ),
                Event::Eof,
            ]
        );
    }

    #[test]
    fn test_single_quoted_value_keeps_case() {
        assert_eq!(
            events("<a title='Hello World'>"),
            vec![
                Event::Start("a".to_string(), attrs(&[("title", "Hello World")]), false),
                Event::Eof,
            ]
        );
    }

    #[test]
    fn test_self_closing_tag() {
        assert_eq!(
            events("<br/><img src=\"i.png\" />"),
            vec![
                Event::Start("br".to_string(), vec![], true),
                Event::Start("img".to_string(), attrs(&[("src", "i.png")]), true),
                Event::Eof,
            ]
        );
    }

    #[test]
    fn test_comment() {
        assert_eq!(
            events("a<!-- hello <b> -->z"),
            vec![
                Event::Text("a".to_string()),
                Event::Comment(" hello <b> ".to_string()),
                Event::Text("z".to_string()),
                Event::Eof,
            ]
        );
    }

    #[test]
    fn test_cdata() {
        assert_eq!(
            events("<![CDATA[1 < 2 && 3 > 2]]>"),
            vec![Event::Data("1 < 2 && 3 > 2".to_string()), Event::Eof]
        );
    }

    #[test]
    fn test_doctype_html5() {
        assert_eq!(
            events("<!DOCTYPE html><html></html>"),
            vec![
                Event::Doctype(Doctype::Html5),
                Event::Start("html".to_string(), vec![], false),
                Event::End("html".to_string()),
                Event::Eof,
            ]
        );
    }

    #[test]
    fn test_doctype_legacy_public_identifier() {
        assert_eq!(
            events(r#"<!doctype html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN">"#),
            vec![Event::Doctype(Doctype::Xhtml10Strict), Event::Eof]
        );
    }

    #[test]
    fn test_multibyte_declaration_is_skipped() {
        // A declaration whose body is multibyte text is not a doctype; it
        // must be skipped, not sliced mid-character.
        assert_eq!(
            events("<!日本語テスト><r></r>"),
            vec![
                Event::Start("r".to_string(), vec![], false),
                Event::End("r".to_string()),
                Event::Eof,
            ]
        );
        assert_eq!(events("<!ok>"), vec![Event::Eof]);
    }

    #[test]
    fn test_processing_instruction_is_skipped() {
        assert_eq!(
            events("<?xml version=\"1.0\"?><r></r>"),
            vec![
                Event::Start("r".to_string(), vec![], false),
                Event::End("r".to_string()),
                Event::Eof,
            ]
        );
    }

    #[test]
    fn test_multibyte_text_passes_through() {
        assert_eq!(
            events("<p>héllo — wörld</p>"),
            vec![
                Event::Start("p".to_string(), vec![], false),
                Event::Text("héllo — wörld".to_string()),
                Event::End("p".to_string()),
                Event::Eof,
            ]
        );
    }

    #[test]
    fn test_end_tag_with_trailing_whitespace() {
        assert_eq!(
            events("<p></p  >"),
            vec![
                Event::Start("p".to_string(), vec![], false),
                Event::End("p".to_string()),
                Event::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_comment_errors() {
        let mut rec = Recorder::default();
        let err = tokenize("<!-- never closed", &mut rec).unwrap_err();
        assert!(matches!(err, ParseError::Tokenizer { offset: 0, .. }));
    }

    #[test]
    fn test_unterminated_start_tag_errors() {
        let mut rec = Recorder::default();
        let err = tokenize("<div class=\"x\"", &mut rec).unwrap_err();
        assert!(matches!(err, ParseError::Tokenizer { .. }));
    }

    #[test]
    fn test_stray_angle_bracket_errors() {
        let mut rec = Recorder::default();
        let err = tokenize("a < b", &mut rec).unwrap_err();
        assert_eq!(
            err,
            ParseError::Tokenizer {
                message: "'<' does not open a tag, comment, or declaration".to_string(),
                offset: 2,
            }
        );
        // The text before the failure was still reported.
        assert_eq!(rec.events, vec![Event::Text("a ".to_string())]);
    }

    #[test]
    fn test_sink_error_aborts_scan() {
        struct Failing;
        impl MarkupSink for Failing {
            fn text(&mut self, _: &str) -> Result<(), ParseError> {
                Err(ParseError::MismatchedTag {
                    tag: "x".to_string(),
                })
            }
        }
        let err = tokenize("boom<p></p>", &mut Failing).unwrap_err();
        assert!(matches!(err, ParseError::MismatchedTag { .. }));
    }
}
