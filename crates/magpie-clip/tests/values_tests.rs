//! Tests for value extraction and pasting.

use magpie_clip::{
    ExtractMode, PasteOutcome, Store, SyntheticEvent, Variable, extract_all, extract_by_selector,
    extract_value, extract_variable, paste_all, paste_by_selector, paste_value,
};
use magpie_dom::{DomTree, NodeId};
use magpie_html::{parse_document, serialize};
use magpie_selector::query_first;

const FORM: &str = r#"
<body>
  <h1 id="title">Order #1234</h1>
  <form>
    <input name="email" value="ada@example.com">
    <textarea name="notes">please hurry</textarea>
    <select name="size"><option value="m">M</option></select>
  </form>
  <div id="summary"><strong>3</strong> items</div>
  <div id="editor" contenteditable="true">draft</div>
  <a id="link" href="https://example.com/a">details</a>
</body>
"#;

/// Resolve a selector that must match (test convenience).
fn must_find(tree: &DomTree, selector: &str) -> NodeId {
    query_first(tree, selector).unwrap_or_else(|| panic!("nothing matches '{selector}'"))
}

// ========== extraction ==========

#[test]
fn test_extract_value_from_input() {
    let tree = parse_document(FORM);
    let input = must_find(&tree, "input[name=\"email\"]");

    assert_eq!(
        extract_value(&tree, input, ExtractMode::Value, None),
        "ada@example.com"
    );
}

#[test]
fn test_extract_value_from_textarea_reads_content() {
    let tree = parse_document(FORM);
    let textarea = must_find(&tree, "textarea");

    assert_eq!(
        extract_value(&tree, textarea, ExtractMode::Value, None),
        "please hurry"
    );
}

#[test]
fn test_extract_text_is_trimmed() {
    let tree = parse_document(FORM);
    let summary = must_find(&tree, "#summary");

    assert_eq!(
        extract_value(&tree, summary, ExtractMode::Text, None),
        "3 items"
    );
}

#[test]
fn test_extract_attribute() {
    let tree = parse_document(FORM);
    let link = must_find(&tree, "#link");

    assert_eq!(
        extract_value(&tree, link, ExtractMode::Attribute, Some("href")),
        "https://example.com/a"
    );
    // Missing attribute yields the empty string, not an error.
    assert_eq!(
        extract_value(&tree, link, ExtractMode::Attribute, Some("nope")),
        ""
    );
    assert_eq!(extract_value(&tree, link, ExtractMode::Attribute, None), "");
}

#[test]
fn test_extract_inner_html() {
    let tree = parse_document(FORM);
    let summary = must_find(&tree, "#summary");

    assert_eq!(
        extract_value(&tree, summary, ExtractMode::InnerHtml, None),
        "<strong>3</strong> items"
    );
}

#[test]
fn test_extract_by_selector_zero_match_is_none() {
    let tree = parse_document(FORM);

    assert!(extract_by_selector(&tree, "#does-not-exist", ExtractMode::Text, None).is_none());
    // Unparseable selectors are equally recoverable.
    assert!(extract_by_selector(&tree, "???", ExtractMode::Text, None).is_none());
}

// ========== pasting ==========

#[test]
fn test_paste_into_input_sets_value_and_events() {
    let mut tree = parse_document(FORM);
    let input = must_find(&tree, "input[name=\"email\"]");

    let outcome = paste_value(&mut tree, input, "new@example.com");
    assert_eq!(outcome, PasteOutcome::Value);
    assert!(outcome.succeeded());
    assert_eq!(
        outcome.dispatched_events(),
        &[SyntheticEvent::Input, SyntheticEvent::Change]
    );
    assert_eq!(
        extract_value(&tree, input, ExtractMode::Value, None),
        "new@example.com"
    );
}

#[test]
fn test_paste_into_textarea_replaces_content() {
    let mut tree = parse_document(FORM);
    let textarea = must_find(&tree, "textarea");

    let outcome = paste_value(&mut tree, textarea, "no rush");
    assert_eq!(outcome, PasteOutcome::Value);
    assert_eq!(
        extract_value(&tree, textarea, ExtractMode::Value, None),
        "no rush"
    );
}

#[test]
fn test_paste_into_contenteditable() {
    let mut tree = parse_document(FORM);
    let editor = must_find(&tree, "#editor");

    let outcome = paste_value(&mut tree, editor, "final text");
    assert_eq!(outcome, PasteOutcome::Editable);
    assert_eq!(outcome.dispatched_events(), &[SyntheticEvent::Input]);
    assert_eq!(tree.text_content(editor), "final text");
}

#[test]
fn test_paste_into_plain_element_falls_back_to_text() {
    let mut tree = parse_document(FORM);
    let title = must_find(&tree, "#title");

    let outcome = paste_value(&mut tree, title, "Order #9999");
    assert_eq!(outcome, PasteOutcome::TextContent);
    assert!(outcome.dispatched_events().is_empty());
    assert_eq!(tree.text_content(title), "Order #9999");
}

#[test]
fn test_paste_by_selector_zero_match_is_false() {
    let mut tree = parse_document(FORM);

    assert!(!paste_by_selector(&mut tree, "#does-not-exist", "x"));
    assert!(paste_by_selector(&mut tree, "#title", "x"));
}

#[test]
fn test_pasted_value_survives_serialization() {
    let mut tree = parse_document(FORM);
    assert!(paste_by_selector(
        &mut tree,
        "input[name=\"email\"]",
        "kept@example.com"
    ));

    let html = serialize(&tree);
    let reparsed = parse_document(&html);
    assert_eq!(
        extract_by_selector(&reparsed, "input[name=\"email\"]", ExtractMode::Value, None).as_deref(),
        Some("kept@example.com")
    );
}

// ========== bulk operations over a store ==========

/// A store with one variable per extraction mode.
fn form_store() -> Store {
    let mut store = Store::default();

    let mut email = Variable::new("email", "input[name=\"email\"]");
    email.extract_mode = ExtractMode::Value;
    let _ = store.add_variable(email);

    let mut summary = Variable::new("summary", "#summary");
    summary.extract_mode = ExtractMode::Text;
    let _ = store.add_variable(summary);

    let mut link = Variable::new("link", "#link");
    link.extract_mode = ExtractMode::Attribute;
    link.attribute_name = Some("href".to_string());
    let _ = store.add_variable(link);

    store
}

#[test]
fn test_extract_all_fills_values_and_provenance() {
    let tree = parse_document(FORM);
    let mut store = form_store();

    let extracted = extract_all(&mut store, &tree, Some("https://shop.test/order"));
    assert_eq!(extracted, 3);

    let email = store.variable_by_name("email").unwrap();
    assert_eq!(email.value.as_deref(), Some("ada@example.com"));
    assert_eq!(email.source_url.as_deref(), Some("https://shop.test/order"));
    assert!(email.extracted_at.is_some());

    assert_eq!(
        store.variable_by_name("summary").unwrap().value.as_deref(),
        Some("3 items")
    );
    assert_eq!(
        store.variable_by_name("link").unwrap().value.as_deref(),
        Some("https://example.com/a")
    );
}

#[test]
fn test_extract_all_skips_stale_selectors() {
    let tree = parse_document(FORM);
    let mut store = form_store();
    let _ = store.add_variable(Variable::new("gone", "#removed-from-page"));

    let extracted = extract_all(&mut store, &tree, None);
    assert_eq!(extracted, 3);
    assert!(store.variable_by_name("gone").unwrap().value.is_none());
}

#[test]
fn test_extract_variable_by_name() {
    let tree = parse_document(FORM);
    let mut store = form_store();

    let value = extract_variable(&mut store, "summary", &tree, Some("file.html"));
    assert_eq!(value.as_deref(), Some("3 items"));
    assert!(extract_variable(&mut store, "unknown", &tree, None).is_none());
}

#[test]
fn test_paste_all_prefers_paste_selector() {
    let mut tree = parse_document(FORM);
    let mut store = Store::default();

    // Extracted from the title, pasted into the editor.
    let mut moved = Variable::new("moved", "#title");
    moved.paste_selector = Some("#editor".to_string());
    moved.value = Some("relocated".to_string());
    let _ = store.add_variable(moved);

    // No paste selector: falls back to the extraction selector.
    let mut stay = Variable::new("stay", "#summary");
    stay.value = Some("in place".to_string());
    let _ = store.add_variable(stay);

    // No value: skipped entirely.
    let _ = store.add_variable(Variable::new("empty", "#link"));

    let pasted = paste_all(&store, &mut tree);
    assert_eq!(pasted, 2);

    let editor = must_find(&tree, "#editor");
    assert_eq!(tree.text_content(editor), "relocated");
    let title = must_find(&tree, "#title");
    assert_eq!(tree.text_content(title), "Order #1234"); // untouched
    let summary = must_find(&tree, "#summary");
    assert_eq!(tree.text_content(summary), "in place");
}
