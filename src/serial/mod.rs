//! Indented markup serialization.
//!
//! Turns a subtree back into markup text, one node per line, with nesting
//! expressed by indentation. This is a structural dump rather than an exact
//! inverse of parsing: text content is written verbatim, attribute values
//! are minimally escaped so the output can be re-read, and attributes are
//! written in sorted key order so the output is deterministic.

use std::collections::BTreeMap;

use crate::tree::{Document, NodeId, NodeKind};

/// Serializes the subtree rooted at `id`, indenting each nesting level by
/// `indent_width` spaces. The result carries no trailing newline.
///
/// A childless element renders on a single line (`<br></br>`); an element
/// with children spreads over multiple lines, one child per line. Text
/// children are written verbatim but on their own indented line, never
/// inline with the enclosing tag, so mixed content dumps with the same
/// one-node-per-line shape as element content.
///
/// # Examples
///
/// ```
/// use sopa::{serial::serialize, Document};
///
/// let doc = Document::parse_str("<ul><li>one</li></ul>").unwrap();
/// let ul = doc.first_child(doc.root()).unwrap();
/// assert_eq!(
///     serialize(&doc, ul, 2),
///     "<ul>\n  <li>\n    one\n  </li>\n</ul>",
/// );
/// ```
#[must_use]
pub fn serialize(doc: &Document, id: NodeId, indent_width: usize) -> String {
    let mut out = String::new();
    write_node(doc, id, indent_width, 0, &mut out);
    out
}

/// Serializes the whole document: the doctype declaration (when one was
/// recognized) followed by every root child at indentation level zero.
#[must_use]
pub fn serialize_document(doc: &Document, indent_width: usize) -> String {
    let mut lines = Vec::new();
    if let Some(decl) = doc.doctype().declaration() {
        lines.push(decl.to_string());
    }
    for child in doc.children(doc.root()) {
        lines.push(serialize(doc, child, indent_width));
    }
    lines.join("\n")
}

fn write_node(doc: &Document, id: NodeId, width: usize, depth: usize, out: &mut String) {
    let pad = " ".repeat(width * depth);
    match &doc.node(id).kind {
        NodeKind::Text { content } => {
            out.push_str(&pad);
            out.push_str(content);
        }
        NodeKind::Comment { content } => {
            out.push_str(&pad);
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
        }
        NodeKind::Data { content } => {
            out.push_str(&pad);
            out.push_str("<![CDATA[");
            out.push_str(content);
            out.push_str("]]>");
        }
        NodeKind::Element { tag, attributes } => {
            out.push_str(&pad);
            out.push('<');
            out.push_str(tag);
            // BTreeMap gives sorted key order; HashMap iteration would make
            // the output nondeterministic.
            for (key, value) in attributes.iter().collect::<BTreeMap<_, _>>() {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape_attribute(value));
                out.push('"');
            }
            out.push('>');
            if doc.first_child(id).is_some() {
                for child in doc.children(id) {
                    out.push('\n');
                    write_node(doc, child, width, depth + 1, out);
                }
                out.push('\n');
                out.push_str(&pad);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        NodeKind::Document { .. } => {
            // Serializing the root directly lists its children unindented;
            // use serialize_document for the doctype line.
            let mut first = true;
            for child in doc.children(id) {
                if !first {
                    out.push('\n');
                }
                write_node(doc, child, width, depth, out);
                first = false;
            }
        }
    }
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
