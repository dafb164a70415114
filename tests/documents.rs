//! End-to-end tests on realistic documents: parse, navigate, mutate,
//! serialize.

use sopa::serial::{serialize, serialize_document};
use sopa::tree::NodeIter;
use sopa::{Doctype, Document, NodeKind, ParseError};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <title>dump example</title>
  <link rel="stylesheet" type="text/css" href="theme.css"/>
  <body>
    <!--This is a comment.-->
    <div id="first_div" class="foo bar">
      <p>This is some text in a paragraph.</p>
      <br/>
      <p>This is more text in a paragraph.</p>
    </div>
  </body>
</html>
"#;

fn find_child(doc: &Document, parent: sopa::NodeId, tag: &str) -> sopa::NodeId {
    doc.children(parent)
        .find(|&c| doc.tag(c) == Some(tag))
        .unwrap_or_else(|| panic!("no <{tag}> under {parent:?}"))
}

#[test]
fn test_parse_realistic_page() {
    let doc = Document::parse_str(PAGE).unwrap();
    assert_eq!(doc.doctype(), Doctype::Html5);

    let html = doc.first_child(doc.root()).unwrap();
    assert_eq!(doc.tag(html), Some("html"));
    // title, link, body; indentation whitespace produced no text nodes.
    assert_eq!(doc.child_count(html), 3);

    let title = find_child(&doc, html, "title");
    assert_eq!(doc.text_content(title), "dump example");

    let link = find_child(&doc, html, "link");
    assert_eq!(doc.get_attribute(link, "rel"), Some("stylesheet"));
    assert_eq!(doc.get_attribute(link, "href"), Some("theme.css"));
    assert_eq!(doc.child_count(link), 0);

    let body = find_child(&doc, html, "body");
    let div = find_child(&doc, body, "div");
    assert_eq!(doc.get_attribute(div, "class"), Some("foo bar"));
    assert_eq!(doc.child_count(div), 3);

    // The comment survives as the body's first child.
    let first = doc.first_child(body).unwrap();
    assert!(matches!(doc.node(first).kind, NodeKind::Comment { .. }));
}

#[test]
fn test_mismatched_tag_fails_whole_parse() {
    let result = Document::parse_str("<html><body><p>text</body></html>");
    assert_eq!(
        result.unwrap_err(),
        ParseError::MismatchedTag {
            tag: "body".to_string()
        }
    );
}

#[test]
fn test_serialize_known_structure() {
    let doc = Document::parse_str(
        "<!DOCTYPE html><html><body><div id=\"d\"><p>hi</p><br/></div></body></html>",
    )
    .unwrap();
    assert_eq!(
        serialize_document(&doc, 4),
        "<!DOCTYPE html>\n\
         <html>\n\
         \x20   <body>\n\
         \x20       <div id=\"d\">\n\
         \x20           <p>\n\
         \x20               hi\n\
         \x20           </p>\n\
         \x20           <br></br>\n\
         \x20       </div>\n\
         \x20   </body>\n\
         </html>"
    );
}

#[test]
fn test_serialize_parse_is_stable_for_element_trees() {
    // Without inline text, indentation whitespace is dropped on re-parse, so
    // a serialize/parse cycle reaches a fixed point immediately.
    let doc = Document::parse_str(
        r#"<catalog><book id="1"><extra/></book><book id="2"></book></catalog>"#,
    )
    .unwrap();
    let once = serialize_document(&doc, 2);
    let doc2 = Document::parse_str(&once).unwrap();
    assert_eq!(serialize_document(&doc2, 2), once);
}

#[test]
fn test_prune_children_with_cursor() {
    let doc = &mut Document::parse_str(
        "<ul><li>keep</li><li>drop</li><li>keep</li><li>drop</li></ul>",
    )
    .unwrap();
    let ul = doc.first_child(doc.root()).unwrap();

    let mut iter = NodeIter::new(doc, ul);
    while let Some(li) = iter.next(doc).unwrap() {
        if doc.text_content(li) == "drop" {
            iter.destroy_current(doc).unwrap();
        }
    }

    assert_eq!(doc.child_count(ul), 2);
    let texts: Vec<String> = doc.children(ul).map(|c| doc.text_content(c)).collect();
    assert_eq!(texts, ["keep", "keep"]);
}

#[test]
fn test_cursor_fails_after_outside_mutation() {
    let doc = &mut Document::parse_str("<ul><li>a</li><li>b</li></ul>").unwrap();
    let ul = doc.first_child(doc.root()).unwrap();

    let mut iter = NodeIter::new(doc, ul);
    iter.next(doc).unwrap();

    // Mutate the list behind the cursor's back.
    let extra = doc.create_element("li");
    doc.add_child(ul, extra).unwrap();

    assert!(iter.next(doc).is_err());
}

#[test]
fn test_rebuild_document_after_parse() {
    let doc = &mut Document::parse_str("<html><body><div>old</div></body></html>").unwrap();
    let html = doc.first_child(doc.root()).unwrap();
    let body = find_child(doc, html, "body");
    let div = find_child(doc, body, "div");

    // Replace the old content wholesale.
    doc.destroy(div);
    assert_eq!(doc.child_count(body), 0);

    let fresh = doc.create_element("section");
    let text = doc.create_text("new");
    doc.add_child(fresh, text).unwrap();
    doc.add_child(body, fresh).unwrap();

    assert_eq!(
        serialize(doc, body, 2),
        "<body>\n  <section>\n    new\n  </section>\n</body>"
    );
}

#[test]
fn test_attribute_rewrite_roundtrip() {
    let doc = &mut Document::parse_str(r#"<a href="old.html">go</a>"#).unwrap();
    let a = doc.first_child(doc.root()).unwrap();

    doc.set_attribute(a, "href", "new.html");
    doc.set_attribute(a, "target", "_blank");
    assert!(doc.remove_attribute(a, "target"));

    assert_eq!(serialize(doc, a, 2), "<a href=\"new.html\">\n  go\n</a>");
}

#[test]
fn test_unclosed_tail_attaches_to_root() {
    let doc = Document::parse_str("<article><h1>Title</h1>trailing").unwrap();
    let root = doc.root();
    // Nothing closed the <article>, so nothing was ever attached to it; the
    // pending nodes all land on the root in document order.
    assert_eq!(doc.child_count(root), 3);
    let article = doc.first_child(root).unwrap();
    assert_eq!(doc.tag(article), Some("article"));
    assert_eq!(doc.child_count(article), 0);
    let h1 = doc.next_sibling(article).unwrap();
    assert_eq!(doc.tag(h1), Some("h1"));
    assert_eq!(doc.text_content(h1), "Title");
    let tail = doc.last_child(root).unwrap();
    assert_eq!(doc.text_content(tail), "trailing");
}

#[test]
fn test_legacy_doctype_detection() {
    let doc = Document::parse_str(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd"><html></html>"#,
    )
    .unwrap();
    assert_eq!(doc.doctype(), Doctype::Html401Transitional);
}
