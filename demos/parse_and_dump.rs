//! Parse a small HTML page and dump it back out with indentation.
//!
//! Run with: `cargo run --example parse_and_dump`
#![allow(clippy::expect_used)]

use sopa::serial::serialize_document;
use sopa::Document;

fn main() {
    let html = r#"<!DOCTYPE html>
<html>
  <title>dump example</title>
  <link rel="stylesheet" type="text/css" href="theme.css"/>
  <script type="text/javascript">
    for (let i = 0; i != 10; i++)
      alert ('count with me ' + i);
  </script>
  <body>
    <!--This is a comment.-->
    <div id="first_div" class="foo bar">
      <p>This is some text in a paragraph.</p>
      <br/>
      <p>This is some text in a paragraph.</p>
    </div>
  </body>
</html>
"#;

    let doc = Document::parse_str(html).expect("failed to parse HTML");

    println!("Doctype: {:?}", doc.doctype());
    println!("Dump:\n{}", serialize_document(&doc, 4));
}
