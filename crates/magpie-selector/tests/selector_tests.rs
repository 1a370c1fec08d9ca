//! Integration tests for selector parsing, matching, and querying.

use magpie_dom::{DomTree, NodeId};
use magpie_html::parse_document;
use magpie_selector::{
    AttributeSelector, Combinator, PseudoClass, SimpleSelector, Specificity, count_matches,
    parse_selector, query_all, query_first,
};

/// Resolve the element with the given id attribute (test convenience).
fn by_id(tree: &DomTree, id: &str) -> NodeId {
    tree.iter_elements()
        .find(|&node| tree.as_element(node).is_some_and(|e| e.id() == Some(id)))
        .unwrap_or_else(|| panic!("no element with id '{id}'"))
}

// ========== parsing ==========

#[test]
fn test_parse_type_selector() {
    let selector = parse_selector("body").unwrap();
    assert_eq!(selector.specificity, Specificity(0, 0, 1));
    assert_eq!(selector.complex.subject.simple_selectors.len(), 1);
    assert!(selector.complex.combinators.is_empty());
    assert!(matches!(
        &selector.complex.subject.simple_selectors[0],
        SimpleSelector::Type(name) if name == "body"
    ));
}

#[test]
fn test_parse_class_selector() {
    let selector = parse_selector(".price").unwrap();
    assert_eq!(selector.specificity, Specificity(0, 1, 0));
    assert!(matches!(
        &selector.complex.subject.simple_selectors[0],
        SimpleSelector::Class(name) if name == "price"
    ));
}

#[test]
fn test_parse_id_selector() {
    let selector = parse_selector("#checkout-total").unwrap();
    assert_eq!(selector.specificity, Specificity(1, 0, 0));
    assert!(matches!(
        &selector.complex.subject.simple_selectors[0],
        SimpleSelector::Id(name) if name == "checkout-total"
    ));
}

#[test]
fn test_parse_compound_selector() {
    let selector = parse_selector("li.row:nth-of-type(2)").unwrap();
    assert_eq!(selector.specificity, Specificity(0, 2, 1));
    assert_eq!(selector.complex.subject.simple_selectors.len(), 3);
    assert!(matches!(
        &selector.complex.subject.simple_selectors[2],
        SimpleSelector::PseudoClass(PseudoClass::NthOfType(2))
    ));
}

#[test]
fn test_parse_child_combinator_chain() {
    let selector = parse_selector("div#app > ul li.row").unwrap();

    // Subject is "li.row"
    assert_eq!(selector.complex.subject.simple_selectors.len(), 2);

    // Right-to-left: (Descendant, ul), (Child, div#app)
    assert_eq!(selector.complex.combinators.len(), 2);
    assert_eq!(selector.complex.combinators[0].0, Combinator::Descendant);
    assert_eq!(selector.complex.combinators[1].0, Combinator::Child);

    assert_eq!(selector.specificity, Specificity(1, 1, 3));
}

#[test]
fn test_parse_sibling_combinators() {
    let next = parse_selector("h1 + p").unwrap();
    assert_eq!(next.complex.combinators[0].0, Combinator::NextSibling);

    let subsequent = parse_selector("h1 ~ p").unwrap();
    assert_eq!(
        subsequent.complex.combinators[0].0,
        Combinator::SubsequentSibling
    );
}

#[test]
fn test_parse_attribute_selectors() {
    let exists = parse_selector("[disabled]").unwrap();
    assert!(matches!(
        &exists.complex.subject.simple_selectors[0],
        SimpleSelector::Attribute(AttributeSelector::Exists(name)) if name == "disabled"
    ));

    let equals = parse_selector("input[name=\"email\"]").unwrap();
    assert!(matches!(
        &equals.complex.subject.simple_selectors[1],
        SimpleSelector::Attribute(AttributeSelector::Equals(name, value))
            if name == "name" && value == "email"
    ));

    let prefix = parse_selector("a[href^=https]").unwrap();
    assert!(matches!(
        &prefix.complex.subject.simple_selectors[1],
        SimpleSelector::Attribute(AttributeSelector::PrefixMatch(..))
    ));
}

#[test]
fn test_parse_escaped_identifier() {
    // escape_ident("1st") emits "\31 st"; the parser must read it back.
    let selector = parse_selector("p.\\31 st").unwrap();
    assert!(matches!(
        &selector.complex.subject.simple_selectors[1],
        SimpleSelector::Class(name) if name == "1st"
    ));

    let dotted = parse_selector("#a\\.b").unwrap();
    assert!(matches!(
        &dotted.complex.subject.simple_selectors[0],
        SimpleSelector::Id(name) if name == "a.b"
    ));
}

#[test]
fn test_unsupported_pseudo_degrades_to_never_match() {
    let selector = parse_selector("div:hover").unwrap();
    assert!(matches!(
        &selector.complex.subject.simple_selectors[1],
        SimpleSelector::NeverMatch
    ));

    // an+b notation is outside the supported grammar but must still parse.
    let nth = parse_selector("li:nth-of-type(2n+1)").unwrap();
    assert!(matches!(
        &nth.complex.subject.simple_selectors[1],
        SimpleSelector::NeverMatch
    ));
}

#[test]
fn test_parse_invalid_selectors() {
    assert!(parse_selector("").is_none());
    assert!(parse_selector("   ").is_none());
    assert!(parse_selector("> div").is_none());
    assert!(parse_selector("div >").is_none());
    assert!(parse_selector("[unterminated").is_none());
}

// ========== matching and querying ==========

const SHOP: &str = r#"
<html><body>
  <div id="app">
    <form name="checkout">
      <input name="email" class="field">
      <input name="promo" class="field optional" disabled>
    </form>
    <ul class="items">
      <li class="row">Apples</li>
      <li class="row featured">Pears</li>
      <li class="row">Plums</li>
    </ul>
  </div>
</body></html>
"#;

#[test]
fn test_query_by_id_and_class() {
    let tree = parse_document(SHOP);

    assert_eq!(query_all(&tree, "#app").len(), 1);
    assert_eq!(query_all(&tree, ".row").len(), 3);
    assert_eq!(query_all(&tree, "li.featured").len(), 1);
    assert_eq!(query_all(&tree, ".missing").len(), 0);
}

#[test]
fn test_query_results_in_tree_order() {
    let tree = parse_document(SHOP);
    let rows = query_all(&tree, "li.row");

    let texts: Vec<String> = rows
        .iter()
        .map(|&id| tree.text_content(id).trim().to_string())
        .collect();
    assert_eq!(texts, vec!["Apples", "Pears", "Plums"]);
}

#[test]
fn test_query_nth_of_type() {
    let tree = parse_document(SHOP);

    let second = query_all(&tree, "li:nth-of-type(2)");
    assert_eq!(second.len(), 1);
    assert_eq!(tree.text_content(second[0]).trim(), "Pears");

    assert_eq!(query_all(&tree, "li:nth-of-type(9)").len(), 0);
}

#[test]
fn test_query_combinators() {
    let tree = parse_document(SHOP);

    assert_eq!(query_all(&tree, "#app > ul > li").len(), 3);
    assert_eq!(query_all(&tree, "form input").len(), 2);
    // li following another li under the same parent
    assert_eq!(query_all(&tree, "li + li").len(), 2);
    assert_eq!(query_all(&tree, "li ~ li").len(), 2);
    // body is not a direct parent of li
    assert_eq!(query_all(&tree, "body > li").len(), 0);
}

#[test]
fn test_query_attribute_forms() {
    let tree = parse_document(SHOP);

    assert_eq!(query_all(&tree, "input[name=\"email\"]").len(), 1);
    assert_eq!(query_all(&tree, "[class~=optional]").len(), 1);
    assert_eq!(query_all(&tree, "input[disabled]").len(), 1);
    assert_eq!(query_all(&tree, "input:disabled").len(), 1);
    assert_eq!(query_all(&tree, "input:enabled").len(), 1);
}

#[test]
fn test_query_first_and_count() {
    let tree = parse_document(SHOP);

    let first = query_first(&tree, "li.row").unwrap();
    assert_eq!(tree.text_content(first).trim(), "Apples");

    assert_eq!(count_matches(&tree, "li.row"), 3);
    assert_eq!(count_matches(&tree, "table"), 0);
}

#[test]
fn test_unparseable_selector_matches_nothing() {
    let tree = parse_document(SHOP);
    assert_eq!(query_all(&tree, "li..row").len(), 0);
    assert!(query_first(&tree, "???").is_none());
}

#[test]
fn test_structural_pseudo_classes() {
    let tree = parse_document(SHOP);

    let first_child = query_all(&tree, "li:first-child");
    assert_eq!(first_child.len(), 1);
    assert_eq!(tree.text_content(first_child[0]).trim(), "Apples");

    let last = query_all(&tree, "li:last-of-type");
    assert_eq!(last.len(), 1);
    assert_eq!(tree.text_content(last[0]).trim(), "Plums");

    // #app holds both the form and the list, so neither is an only child.
    assert_eq!(query_all(&tree, "ul:only-child").len(), 0);
}

#[test]
fn test_query_first_agrees_with_id_lookup() {
    let tree = parse_document(SHOP);
    assert_eq!(query_first(&tree, "#app"), Some(by_id(&tree, "app")));
}
