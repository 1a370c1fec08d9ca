//! Tests for DOM tree construction, traversal, and mutation.

use magpie_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its `NodeId`.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

/// Helper to create an element with attributes.
fn alloc_element_with_attrs(tree: &mut DomTree, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let mut map = AttributesMap::new();
    for (name, value) in attrs {
        let _ = map.insert((*name).to_string(), (*value).to_string());
    }
    tree.alloc(NodeType::Element(ElementData {
        tag_name: tag.to_string(),
        attrs: map,
    }))
}

// ========== construction and traversal ==========

#[test]
fn test_new_tree_has_document_root() {
    let tree = DomTree::new();
    assert_eq!(tree.root(), NodeId::ROOT);
    assert_eq!(tree.len(), 1);
    assert!(matches!(
        tree.get(NodeId::ROOT).map(|n| &n.node_type),
        Some(NodeType::Document)
    ));
}

#[test]
fn test_append_child_sets_up_sibling_links() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(parent, a);
    tree.append_child(parent, b);

    assert_eq!(tree.children(parent), &[a, b]);
    assert_eq!(tree.parent(a), Some(parent));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.prev_sibling(a), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_ancestors_walk_to_root() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, body);
    let div = alloc_element(&mut tree, "div");
    tree.append_child(body, div);

    let ancestors: Vec<NodeId> = tree.ancestors(div).collect();
    assert_eq!(ancestors, vec![body, html, NodeId::ROOT]);
}

#[test]
fn test_descendants_preorder() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, body);
    let first = alloc_element(&mut tree, "p");
    let second = alloc_element(&mut tree, "p");
    tree.append_child(body, first);
    tree.append_child(body, second);
    let nested = alloc_element(&mut tree, "span");
    tree.append_child(first, nested);

    let order: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
    assert_eq!(order, vec![NodeId::ROOT, html, body, first, nested, second]);
}

#[test]
fn test_document_element_and_body() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, head);
    tree.append_child(html, body);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
}

#[test]
fn test_body_absent() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);

    assert_eq!(tree.body(), None);
}

// ========== element data ==========

#[test]
fn test_classes_preserve_document_order() {
    let mut tree = DomTree::new();
    let el = alloc_element_with_attrs(&mut tree, "div", &[("class", "zebra  apple mango")]);
    let element = tree.as_element(el).unwrap();

    assert_eq!(element.classes(), vec!["zebra", "apple", "mango"]);
    assert!(element.has_class("apple"));
    assert!(!element.has_class("banana"));
}

#[test]
fn test_empty_id_and_name_are_none() {
    let mut tree = DomTree::new();
    let el = alloc_element_with_attrs(&mut tree, "input", &[("id", ""), ("name", "")]);
    let element = tree.as_element(el).unwrap();

    assert_eq!(element.id(), None);
    assert_eq!(element.name(), None);
}

#[test]
fn test_id_and_name_accessors() {
    let mut tree = DomTree::new();
    let el = alloc_element_with_attrs(&mut tree, "input", &[("id", "q"), ("name", "query")]);
    let element = tree.as_element(el).unwrap();

    assert_eq!(element.id(), Some("q"));
    assert_eq!(element.name(), Some("query"));
}

// ========== same_tag_position ==========

#[test]
fn test_same_tag_position_counts_only_same_tag() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "ul");
    tree.append_child(NodeId::ROOT, parent);

    let li1 = alloc_element(&mut tree, "li");
    let div = alloc_element(&mut tree, "div");
    let li2 = alloc_element(&mut tree, "li");
    tree.append_child(parent, li1);
    tree.append_child(parent, div);
    tree.append_child(parent, li2);

    assert_eq!(tree.same_tag_position(li1), Some((1, 2)));
    assert_eq!(tree.same_tag_position(li2), Some((2, 2)));
    assert_eq!(tree.same_tag_position(div), Some((1, 1)));
}

#[test]
fn test_same_tag_position_ignores_text_nodes() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let p1 = alloc_element(&mut tree, "p");
    tree.append_child(parent, p1);
    let text = tree.alloc(NodeType::Text("between".to_string()));
    tree.append_child(parent, text);
    let p2 = alloc_element(&mut tree, "p");
    tree.append_child(parent, p2);

    assert_eq!(tree.same_tag_position(p2), Some((2, 2)));
    assert_eq!(tree.same_tag_position(text), None);
}

// ========== mutation ==========

#[test]
fn test_remove_child_patches_sibling_chain() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_set_attr_on_element() {
    let mut tree = DomTree::new();
    let el = alloc_element(&mut tree, "input");
    tree.append_child(NodeId::ROOT, el);

    assert!(tree.set_attr(el, "value", "hello"));
    assert_eq!(
        tree.as_element(el).unwrap().attrs.get("value"),
        Some(&"hello".to_string())
    );

    // Overwrite
    assert!(tree.set_attr(el, "value", "world"));
    assert_eq!(
        tree.as_element(el).unwrap().attrs.get("value"),
        Some(&"world".to_string())
    );
}

#[test]
fn test_set_attr_on_non_element_fails() {
    let mut tree = DomTree::new();
    let text = tree.alloc(NodeType::Text("plain".to_string()));
    tree.append_child(NodeId::ROOT, text);

    assert!(!tree.set_attr(text, "value", "x"));
}

#[test]
fn test_set_text_content_replaces_children() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, div);
    let old_span = alloc_element(&mut tree, "span");
    tree.append_child(div, old_span);
    let old_text = tree.alloc(NodeType::Text("old".to_string()));
    tree.append_child(old_span, old_text);

    assert!(tree.set_text_content(div, "new content"));

    assert_eq!(tree.children(div).len(), 1);
    assert_eq!(tree.text_content(div), "new content");
    assert_eq!(tree.parent(old_span), None);
}

#[test]
fn test_text_content_concatenates_descendants() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, div);
    let t1 = tree.alloc(NodeType::Text("Hello ".to_string()));
    tree.append_child(div, t1);
    let strong = alloc_element(&mut tree, "strong");
    tree.append_child(div, strong);
    let t2 = tree.alloc(NodeType::Text("world".to_string()));
    tree.append_child(strong, t2);

    assert_eq!(tree.text_content(div), "Hello world");
}
