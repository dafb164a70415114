//! Node type definitions.
//!
//! The `NodeKind` enum represents all node types in a document tree. Each
//! variant carries the node-type-specific payload (element tag and
//! attributes, text content). Navigation links (parent, children, siblings)
//! are stored in `NodeData`, not here.

use std::collections::HashMap;

/// The sentinel tag carried by the document root node.
pub const ROOT_TAG: &str = "__document__";

/// The kind of a node and its associated data.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The document root node — there is exactly one per `Document`. It
    /// behaves like an element whose tag is fixed to [`ROOT_TAG`].
    Document {
        /// Doctype classification of the parsed document.
        doctype: Doctype,
    },

    /// An element node, e.g., `<div class="x">`.
    Element {
        /// The tag name, lowercased at construction and immutable after.
        tag: String,
        /// Attribute map. Keys are unique; insertion order is not preserved
        /// and a duplicate key overwrites the previous value.
        attributes: HashMap<String, String>,
    },

    /// A text node containing character data, stored verbatim.
    Text {
        /// The raw text content.
        content: String,
    },

    /// A comment node, e.g., `<!-- ... -->`.
    Comment {
        /// The comment text (without the `<!--` and `-->` delimiters).
        content: String,
    },

    /// A raw data section, e.g., the body of `<![CDATA[...]]>`.
    Data {
        /// The data content, with no escaping applied.
        content: String,
    },
}

impl NodeKind {
    /// Returns `true` for kinds that carry a single string payload and no
    /// element semantics (text, comment, data).
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Text { .. } | Self::Comment { .. } | Self::Data { .. }
        )
    }
}

/// DOCTYPE classification of a document.
///
/// Detection happens in the tokenizer when a `<!DOCTYPE ...>` declaration is
/// scanned; the tree only stores the classified result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Doctype {
    /// No doctype declaration, or one that was not recognized.
    #[default]
    Unknown,
    /// HTML 4.01 Strict: no presentational or deprecated elements, no
    /// framesets.
    Html401Strict,
    /// HTML 4.01 Transitional: includes presentational and deprecated
    /// elements; no framesets.
    Html401Transitional,
    /// HTML 4.01 Frameset: HTML 4.01 Transitional plus frameset content.
    Html401Frameset,
    /// XHTML 1.0 Strict.
    Xhtml10Strict,
    /// XHTML 1.0 Transitional.
    Xhtml10Transitional,
    /// XHTML 1.0 Frameset.
    Xhtml10Frameset,
    /// XHTML 1.1 (XHTML 1.0 Strict plus modules).
    Xhtml11,
    /// HTML5: `<!DOCTYPE html>`.
    Html5,
}

impl Doctype {
    /// Classifies the body of a doctype declaration (the text between
    /// `<!DOCTYPE` and `>`).
    ///
    /// Matching is case-insensitive on the root name and matches the W3C
    /// public identifiers for the legacy HTML and XHTML doctypes. Anything
    /// unrecognized classifies as [`Doctype::Unknown`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sopa::tree::Doctype;
    ///
    /// assert_eq!(Doctype::classify("html"), Doctype::Html5);
    /// assert_eq!(
    ///     Doctype::classify(r#"html PUBLIC "-//W3C//DTD XHTML 1.1//EN""#),
    ///     Doctype::Xhtml11,
    /// );
    /// assert_eq!(Doctype::classify("banana"), Doctype::Unknown);
    /// ```
    #[must_use]
    pub fn classify(declaration: &str) -> Self {
        let decl = declaration.trim();
        if decl.eq_ignore_ascii_case("html") {
            return Self::Html5;
        }

        // Legacy doctypes are recognized by their public identifier.
        if decl.contains("-//W3C//DTD HTML 4.01 Transitional//EN") {
            Self::Html401Transitional
        } else if decl.contains("-//W3C//DTD HTML 4.01 Frameset//EN") {
            Self::Html401Frameset
        } else if decl.contains("-//W3C//DTD HTML 4.01//EN") {
            Self::Html401Strict
        } else if decl.contains("-//W3C//DTD XHTML 1.0 Strict//EN") {
            Self::Xhtml10Strict
        } else if decl.contains("-//W3C//DTD XHTML 1.0 Transitional//EN") {
            Self::Xhtml10Transitional
        } else if decl.contains("-//W3C//DTD XHTML 1.0 Frameset//EN") {
            Self::Xhtml10Frameset
        } else if decl.contains("-//W3C//DTD XHTML 1.1//EN") {
            Self::Xhtml11
        } else {
            Self::Unknown
        }
    }

    /// Returns the canonical `<!DOCTYPE ...>` declaration for this
    /// classification, or `None` for [`Doctype::Unknown`].
    #[must_use]
    pub fn declaration(self) -> Option<&'static str> {
        match self {
            Self::Unknown => None,
            Self::Html5 => Some("<!DOCTYPE html>"),
            Self::Html401Strict => Some(
                r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
            ),
            Self::Html401Transitional => Some(
                r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#,
            ),
            Self::Html401Frameset => Some(
                r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Frameset//EN" "http://www.w3.org/TR/html4/frameset.dtd">"#,
            ),
            Self::Xhtml10Strict => Some(
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#,
            ),
            Self::Xhtml10Transitional => Some(
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#,
            ),
            Self::Xhtml10Frameset => Some(
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Frameset//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-frameset.dtd">"#,
            ),
            Self::Xhtml11 => Some(
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">"#,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_html5() {
        assert_eq!(Doctype::classify("html"), Doctype::Html5);
        assert_eq!(Doctype::classify("HTML"), Doctype::Html5);
        assert_eq!(Doctype::classify("  html  "), Doctype::Html5);
    }

    #[test]
    fn test_classify_html401_variants() {
        assert_eq!(
            Doctype::classify(
                r#"HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd""#
            ),
            Doctype::Html401Strict
        );
        assert_eq!(
            Doctype::classify(
                r#"HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd""#
            ),
            Doctype::Html401Transitional
        );
        assert_eq!(
            Doctype::classify(
                r#"HTML PUBLIC "-//W3C//DTD HTML 4.01 Frameset//EN" "http://www.w3.org/TR/html4/frameset.dtd""#
            ),
            Doctype::Html401Frameset
        );
    }

    #[test]
    fn test_classify_xhtml_variants() {
        assert_eq!(
            Doctype::classify(r#"html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN""#),
            Doctype::Xhtml10Strict
        );
        assert_eq!(
            Doctype::classify(r#"html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN""#),
            Doctype::Xhtml10Transitional
        );
        assert_eq!(
            Doctype::classify(r#"html PUBLIC "-//W3C//DTD XHTML 1.0 Frameset//EN""#),
            Doctype::Xhtml10Frameset
        );
        assert_eq!(
            Doctype::classify(r#"html PUBLIC "-//W3C//DTD XHTML 1.1//EN""#),
            Doctype::Xhtml11
        );
    }

    #[test]
    fn test_declaration_round_trips_through_classify() {
        let all = [
            Doctype::Html401Strict,
            Doctype::Html401Transitional,
            Doctype::Html401Frameset,
            Doctype::Xhtml10Strict,
            Doctype::Xhtml10Transitional,
            Doctype::Xhtml10Frameset,
            Doctype::Xhtml11,
            Doctype::Html5,
        ];
        for doctype in all {
            let decl = doctype.declaration().unwrap();
            let body = decl
                .strip_prefix("<!DOCTYPE")
                .and_then(|s| s.strip_suffix('>'))
                .unwrap();
            assert_eq!(Doctype::classify(body), doctype);
        }
        assert_eq!(Doctype::Unknown.declaration(), None);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(Doctype::classify(""), Doctype::Unknown);
        assert_eq!(Doctype::classify("svg"), Doctype::Unknown);
        assert_eq!(Doctype::default(), Doctype::Unknown);
    }

    #[test]
    fn test_is_leaf() {
        assert!(NodeKind::Text {
            content: "x".to_string()
        }
        .is_leaf());
        assert!(NodeKind::Comment {
            content: "x".to_string()
        }
        .is_leaf());
        assert!(NodeKind::Data {
            content: "x".to_string()
        }
        .is_leaf());
        assert!(!NodeKind::Element {
            tag: "p".to_string(),
            attributes: HashMap::new()
        }
        .is_leaf());
        assert!(!NodeKind::Document {
            doctype: Doctype::Unknown
        }
        .is_leaf());
    }
}
