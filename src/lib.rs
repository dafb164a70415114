//! sopa is an HTML/XML-like markup parser built around an arena-allocated
//! document tree.
//!
//! The crate has two halves:
//!
//! - [`tree`]: the document model. A [`Document`] owns every node in an
//!   arena; nodes are addressed by copyable [`NodeId`] handles and linked by
//!   parent/child/sibling edges. Mutations validate their structural
//!   preconditions and report [`TreeError`] instead of corrupting the tree,
//!   and [`tree::NodeIter`] cursors detect concurrent child-list mutation
//!   through per-node revision counters.
//! - [`tokenizer`] and [`parser`]: turning markup text into a tree. The
//!   tokenizer scans tags, text, comments, CDATA and doctype declarations
//!   and feeds a [`tokenizer::MarkupSink`]; the [`Parser`] is the sink that
//!   assembles the document, failing with [`ParseError::MismatchedTag`] on
//!   a closing tag that does not match the innermost open element.
//!
//! [`serial`] renders a tree (or subtree) back out as indented markup.
//!
//! # Quick start
//!
//! ```
//! use sopa::{serial::serialize_document, Document};
//!
//! let doc = Document::parse_str(
//!     "<!DOCTYPE html><html><body><p>Hello</p></body></html>",
//! )?;
//!
//! assert_eq!(doc.doctype(), sopa::Doctype::Html5);
//!
//! let html = doc.first_child(doc.root()).unwrap();
//! assert_eq!(doc.tag(html), Some("html"));
//! assert_eq!(doc.text_content(html), "Hello");
//!
//! println!("{}", serialize_document(&doc, 2));
//! # Ok::<(), sopa::ParseError>(())
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod parser;
pub mod serial;
pub mod tokenizer;
pub mod tree;

pub use error::{ParseError, TreeError};
pub use parser::Parser;
pub use tree::{Doctype, Document, NodeId, NodeKind};
