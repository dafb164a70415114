//! Stack-based tree builder.
//!
//! The [`Parser`] consumes tokenizer events through the
//! [`MarkupSink`](crate::tokenizer::MarkupSink) trait and assembles a
//! [`Document`]. Construction is deferred: a node produced by an event is
//! not attached anywhere immediately. Instead it goes onto a pending stack,
//! and attachment happens when the enclosing element is closed, so children
//! always exist before their parent adopts them.
//!
//! An end tag must close the innermost open element. A closing tag whose
//! name does not match it (or that arrives with no element open at all)
//! fails the whole parse with [`ParseError::MismatchedTag`]; nothing is
//! auto-closed and no partial document survives. Whatever is still pending
//! at end of input is attached to the document root in document order.

use std::thread;

use crate::error::ParseError;
use crate::tokenizer::{tokenize, MarkupSink};
use crate::tree::{Doctype, Document, NodeId};

/// An entry on the pending stack.
///
/// `open` is true only for elements whose end tag has not arrived yet. Text,
/// comments, data sections, self-closed and already-closed elements sit on
/// the stack closed, waiting to be adopted.
struct Pending {
    node: NodeId,
    open: bool,
}

/// Builds a [`Document`] from markup events.
///
/// The usual entry point is [`Parser::parse_str`] (also available as
/// [`Document::parse_str`]), which drives the built-in tokenizer. A parser
/// can also be fed events directly through its `MarkupSink` implementation;
/// call [`MarkupSink::end_of_input`] and then [`Parser::into_document`] to
/// finish.
///
/// A parser handles one document and is consumed by it; parse another input
/// with a fresh parser.
pub struct Parser {
    doc: Document,
    pending: Vec<Pending>,
}

impl Parser {
    /// Creates a parser with an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            doc: Document::new(),
            pending: Vec::new(),
        }
    }

    /// Parses a complete markup string into a [`Document`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MismatchedTag`] when a closing tag does not
    /// match the innermost open element, or [`ParseError::Tokenizer`] when
    /// the input cannot be scanned.
    ///
    /// # Examples
    ///
    /// ```
    /// use sopa::parser::Parser;
    ///
    /// let doc = Parser::parse_str("<greeting>hello</greeting>").unwrap();
    /// let greeting = doc.first_child(doc.root()).unwrap();
    /// assert_eq!(doc.text_content(greeting), "hello");
    /// ```
    pub fn parse_str(input: &str) -> Result<Document, ParseError> {
        let mut parser = Self::new();
        tokenize(input, &mut parser)?;
        Ok(parser.doc)
    }

    /// Runs [`Parser::parse_str`] on a worker thread and returns the handle.
    ///
    /// The result is delivered through the join: `join()` yields the same
    /// `Result` the synchronous parse would have returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use sopa::parser::Parser;
    ///
    /// let handle = Parser::parse_str_async("<a></a>".to_string());
    /// let doc = handle.join().unwrap().unwrap();
    /// assert_eq!(doc.child_count(doc.root()), 1);
    /// ```
    #[must_use]
    pub fn parse_str_async(input: String) -> thread::JoinHandle<Result<Document, ParseError>> {
        thread::spawn(move || Self::parse_str(&input))
    }

    /// Consumes the parser and returns the document built so far.
    ///
    /// Meaningful after `end_of_input` has been delivered; before that,
    /// pending nodes are still detached.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.doc
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupSink for Parser {
    fn start_tag(
        &mut self,
        tag: &str,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    ) -> Result<(), ParseError> {
        let element = self.doc.create_element(tag);
        for (key, value) in attributes {
            // Duplicate keys: last write wins.
            self.doc.set_attribute(element, &key, &value);
        }
        self.pending.push(Pending {
            node: element,
            open: !self_closing,
        });
        Ok(())
    }

    fn end_tag(&mut self, tag: &str) -> Result<(), ParseError> {
        // Stored tags are lowercased at construction; lowercasing here makes
        // the match case-insensitive for any event source, not just the
        // built-in tokenizer.
        let tag = tag.to_ascii_lowercase();
        let Some(index) = self.pending.iter().rposition(|entry| entry.open) else {
            return Err(ParseError::MismatchedTag { tag });
        };
        let matched = self.pending[index].node;
        if self.doc.tag(matched) != Some(tag.as_str()) {
            return Err(ParseError::MismatchedTag { tag });
        }

        // Everything above the matched element is its content, already in
        // document order.
        let children = self.pending.split_off(index + 1);
        for entry in children {
            self.doc.append_unchecked(matched, entry.node);
        }
        self.pending[index].open = false;
        Ok(())
    }

    fn text(&mut self, content: &str) -> Result<(), ParseError> {
        // Inter-tag whitespace carries no content; a run that is whitespace
        // from end to end produces no node. Anything else is kept verbatim,
        // surrounding whitespace included.
        if content.chars().all(char::is_whitespace) {
            return Ok(());
        }
        let node = self.doc.create_text(content);
        self.pending.push(Pending { node, open: false });
        Ok(())
    }

    fn comment(&mut self, content: &str) -> Result<(), ParseError> {
        let node = self.doc.create_comment(content);
        self.pending.push(Pending { node, open: false });
        Ok(())
    }

    fn data(&mut self, content: &str) -> Result<(), ParseError> {
        let node = self.doc.create_data(content);
        self.pending.push(Pending { node, open: false });
        Ok(())
    }

    fn doctype(&mut self, doctype: Doctype) -> Result<(), ParseError> {
        self.doc.set_doctype(doctype);
        Ok(())
    }

    fn end_of_input(&mut self) -> Result<(), ParseError> {
        let root = self.doc.root();
        for entry in self.pending.drain(..) {
            self.doc.append_unchecked(root, entry.node);
        }
        Ok(())
    }
}
