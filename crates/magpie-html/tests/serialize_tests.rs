//! Tests for HTML serialization.

use magpie_dom::{DomTree, NodeId};
use magpie_html::{inner_html, parse_document, serialize, serialize_node};

/// First element with the given tag name.
fn find_tag(tree: &DomTree, tag: &str) -> Option<NodeId> {
    tree.iter_elements().find(|&id| {
        tree.as_element(id)
            .is_some_and(|e| e.tag_name.eq_ignore_ascii_case(tag))
    })
}

#[test]
fn test_serialize_round_trips_through_parser() {
    let original = r#"<body><div id="app" class="wrap"><p>one</p><p>two</p></div></body>"#;
    let tree = parse_document(original);

    let html = serialize(&tree);
    let reparsed = parse_document(&html);

    let app = find_tag(&reparsed, "div").unwrap();
    let element = reparsed.as_element(app).unwrap();
    assert_eq!(element.id(), Some("app"));
    assert!(element.has_class("wrap"));
    assert_eq!(reparsed.text_content(app), "onetwo");
}

#[test]
fn test_serialize_emits_doctype() {
    let tree = parse_document("<p>x</p>");
    assert!(serialize(&tree).starts_with("<!DOCTYPE html>"));
}

#[test]
fn test_serialize_escapes_text_and_attributes() {
    let mut tree = parse_document(r#"<body><div id="t">safe</div></body>"#);
    let div = find_tag(&tree, "div").unwrap();
    assert!(tree.set_text_content(div, "a < b & c"));
    assert!(tree.set_attr(div, "title", "say \"hi\""));

    let html = serialize_node(&tree, div);
    assert!(html.contains("a &lt; b &amp; c"), "got {html}");
    assert!(html.contains("title=\"say &quot;hi&quot;\""), "got {html}");
}

#[test]
fn test_serialize_void_elements_without_closing_tag() {
    let tree = parse_document("<body><br><img src=pic.png></body>");
    let html = serialize(&tree);

    assert!(html.contains("<br>"));
    assert!(!html.contains("</br>"));
    assert!(html.contains(r#"<img src="pic.png">"#));
    assert!(!html.contains("</img>"));
}

#[test]
fn test_serialize_script_content_verbatim() {
    let tree = parse_document("<body><script>if (a < b) go();</script></body>");
    let html = serialize(&tree);

    // Raw text must not be entity-escaped.
    assert!(html.contains("if (a < b) go();"), "got {html}");
}

#[test]
fn test_serialize_attribute_order_is_deterministic() {
    let tree = parse_document(r#"<body><input type="text" name="q" id="search"></body>"#);
    let input = find_tag(&tree, "input").unwrap();

    // Attributes come out sorted regardless of source order.
    assert_eq!(
        serialize_node(&tree, input),
        r#"<input id="search" name="q" type="text">"#
    );
}

#[test]
fn test_inner_html_excludes_own_tags() {
    let tree = parse_document("<body><div><strong>3</strong> items</div></body>");
    let div = find_tag(&tree, "div").unwrap();

    assert_eq!(inner_html(&tree, div), "<strong>3</strong> items");
    assert_eq!(
        serialize_node(&tree, div),
        "<div><strong>3</strong> items</div>"
    );
}

#[test]
fn test_serialize_comments() {
    let tree = parse_document("<body><!-- keep me --><p>x</p></body>");
    assert!(serialize(&tree).contains("<!-- keep me -->"));
}
