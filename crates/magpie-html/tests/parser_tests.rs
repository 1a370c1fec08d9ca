//! Integration tests for HTML tokenization and tree construction.

use magpie_dom::{DomTree, NodeId, NodeType};
use magpie_html::{Token, Tokenizer, parse_document, parse_document_with_issues};

/// Tokenize a string to completion.
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(input.to_string());
    tokenizer.run();
    tokenizer.into_tokens()
}

/// First element with the given tag name.
fn find_tag(tree: &DomTree, tag: &str) -> Option<NodeId> {
    tree.iter_elements().find(|&id| {
        tree.as_element(id)
            .is_some_and(|e| e.tag_name.eq_ignore_ascii_case(tag))
    })
}

// ========== tokenizer ==========

#[test]
fn test_tokenize_simple_tag() {
    let tokens = tokenize("<p>hi</p>");
    assert_eq!(
        tokens,
        vec![
            Token::StartTag {
                name: "p".to_string(),
                attributes: vec![],
                self_closing: false,
            },
            Token::Character('h'),
            Token::Character('i'),
            Token::EndTag {
                name: "p".to_string()
            },
            Token::EndOfFile,
        ]
    );
}

#[test]
fn test_tokenize_attributes_all_quoting_styles() {
    let tokens = tokenize(r#"<input type="text" name='q' required value=abc>"#);
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("expected start tag, got {:?}", tokens[0]);
    };

    let get = |name: &str| {
        attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    };
    assert_eq!(get("type"), Some("text"));
    assert_eq!(get("name"), Some("q"));
    assert_eq!(get("required"), Some(""));
    assert_eq!(get("value"), Some("abc"));
}

#[test]
fn test_tokenize_uppercase_normalized() {
    let tokens = tokenize("<DIV CLASS=box></DIV>");
    assert!(matches!(
        &tokens[0],
        Token::StartTag { name, attributes, .. }
            if name == "div" && attributes[0].name == "class" && attributes[0].value == "box"
    ));
    assert!(matches!(&tokens[1], Token::EndTag { name } if name == "div"));
}

#[test]
fn test_tokenize_character_references() {
    let tokens = tokenize("a &amp; b");
    let text: String = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character(c) => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(text, "a & b");

    let numeric = tokenize("&#65;&#x42;");
    let text: String = numeric
        .iter()
        .filter_map(|t| match t {
            Token::Character(c) => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(text, "AB");
}

#[test]
fn test_tokenize_unknown_reference_is_literal() {
    let tokens = tokenize("AT&T");
    let text: String = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character(c) => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(text, "AT&T");
}

#[test]
fn test_tokenize_comment() {
    let tokens = tokenize("<!-- a - comment -->");
    assert_eq!(tokens[0], Token::Comment(" a - comment ".to_string()));
}

#[test]
fn test_tokenize_doctype() {
    let tokens = tokenize("<!DOCTYPE html><p></p>");
    assert_eq!(
        tokens[0],
        Token::Doctype {
            name: "html".to_string()
        }
    );
}

#[test]
fn test_tokenize_script_content_is_raw() {
    let tokens = tokenize("<script>if (a < b) { go(); }</script>");
    // The '<' inside must not open a tag.
    let text: String = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character(c) => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(text, "if (a < b) { go(); }");
    assert!(
        tokens
            .iter()
            .any(|t| matches!(t, Token::EndTag { name } if name == "script"))
    );
}

#[test]
fn test_tokenize_stray_lt_is_text() {
    let tokens = tokenize("1 < 2");
    let text: String = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character(c) => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(text, "1 < 2");
}

// ========== tree construction ==========

#[test]
fn test_parse_full_document_structure() {
    let tree = parse_document(
        "<!DOCTYPE html><html><head><title>t</title></head><body><p>hi</p></body></html>",
    );

    let html = tree.document_element().unwrap();
    assert_eq!(tree.as_element(html).unwrap().tag_name, "html");

    let body = tree.body().unwrap();
    let p = find_tag(&tree, "p").unwrap();
    assert_eq!(tree.parent(p), Some(body));
    assert_eq!(tree.text_content(p), "hi");
}

#[test]
fn test_parse_implied_html_head_body() {
    // A bare fragment still gets the standard scaffolding.
    let tree = parse_document("<p>only</p>");

    assert!(tree.document_element().is_some());
    assert!(tree.body().is_some());
    assert!(find_tag(&tree, "head").is_some());
    let p = find_tag(&tree, "p").unwrap();
    assert_eq!(tree.parent(p), tree.body());
}

#[test]
fn test_parse_void_elements_take_no_children() {
    let tree = parse_document("<body><br><img src=x><p>after</p></body>");

    let br = find_tag(&tree, "br").unwrap();
    let img = find_tag(&tree, "img").unwrap();
    let p = find_tag(&tree, "p").unwrap();

    assert!(tree.children(br).is_empty());
    assert!(tree.children(img).is_empty());
    // The p is a sibling of the voids, not a child.
    assert_eq!(tree.parent(p), tree.body());
}

#[test]
fn test_parse_nested_elements() {
    let tree = parse_document("<body><div><ul><li>a</li><li>b</li></ul></div></body>");

    let ul = find_tag(&tree, "ul").unwrap();
    let lis: Vec<NodeId> = tree
        .children(ul)
        .iter()
        .copied()
        .filter(|&id| tree.as_element(id).is_some())
        .collect();
    assert_eq!(lis.len(), 2);
    assert_eq!(tree.text_content(lis[0]), "a");
    assert_eq!(tree.text_content(lis[1]), "b");
}

#[test]
fn test_parse_li_auto_close() {
    // No </li> anywhere; each new <li> implies the previous one ends.
    let tree = parse_document("<body><ul><li>a<li>b<li>c</ul></body>");

    let ul = find_tag(&tree, "ul").unwrap();
    let lis: Vec<NodeId> = tree
        .children(ul)
        .iter()
        .copied()
        .filter(|&id| tree.as_element(id).is_some())
        .collect();
    assert_eq!(lis.len(), 3);
    assert_eq!(tree.text_content(lis[2]), "c");
}

#[test]
fn test_parse_p_auto_close_before_block() {
    let tree = parse_document("<body><p>para<div>block</div></body>");

    let p = find_tag(&tree, "p").unwrap();
    let div = find_tag(&tree, "div").unwrap();
    // The div must not end up inside the p.
    assert_eq!(tree.parent(div), tree.body());
    assert_eq!(tree.text_content(p), "para");
}

#[test]
fn test_parse_text_coalesced_into_one_node() {
    let tree = parse_document("<body><p>a &amp; b</p></body>");
    let p = find_tag(&tree, "p").unwrap();

    assert_eq!(tree.children(p).len(), 1);
    assert_eq!(tree.text_content(p), "a & b");
}

#[test]
fn test_parse_comment_nodes() {
    let tree = parse_document("<body><!-- note --><p>x</p></body>");
    let body = tree.body().unwrap();

    let has_comment = tree.children(body).iter().any(|&id| {
        matches!(
            tree.get(id).map(|n| &n.node_type),
            Some(NodeType::Comment(text)) if text == " note "
        )
    });
    assert!(has_comment);
}

#[test]
fn test_parse_stray_end_tag_reports_issue() {
    let (tree, issues) = parse_document_with_issues("<body><p>ok</p></span></body>");

    assert!(find_tag(&tree, "p").is_some());
    assert!(
        issues
            .iter()
            .any(|i| i.message.contains("no matching start tag"))
    );
}

#[test]
fn test_parse_self_closing_syntax() {
    let tree = parse_document("<body><div/><p>after</p></body>");

    let p = find_tag(&tree, "p").unwrap();
    // The self-closed div takes no children.
    assert_eq!(tree.parent(p), tree.body());
}
