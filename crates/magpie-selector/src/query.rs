//! Document-wide query engine.
//!
//! [§ 4.2.6 querySelectorAll](https://dom.spec.whatwg.org/#dom-parentnode-queryselectorall)
//!
//! "Returns all element descendants of node that match selectors."
//!
//! The generator calls this repeatedly to probe candidate selectors for
//! uniqueness; extraction and pasting call it to resolve stored selectors.
//! Every scan walks the whole document — no index or cache is maintained,
//! so results always reflect the tree as it is right now.

use magpie_common::warning::warn_once;
use magpie_dom::{DomTree, NodeId};

use crate::model::ParsedSelector;
use crate::parse::parse_selector;

/// All elements matching `selector`, in tree order.
///
/// An unparseable selector matches nothing (with a deduplicated warning) —
/// the original clipper wrapped `querySelectorAll` in a try/catch for the
/// same graceful degradation.
#[must_use]
pub fn query_all(tree: &DomTree, selector: &str) -> Vec<NodeId> {
    match parse_selector(selector) {
        Some(parsed) => query_all_parsed(tree, &parsed),
        None => {
            warn_once(
                "selector",
                &format!("unparseable selector '{selector}' treated as matching nothing"),
            );
            Vec::new()
        }
    }
}

/// All elements matching an already-parsed selector, in tree order.
#[must_use]
pub fn query_all_parsed(tree: &DomTree, parsed: &ParsedSelector) -> Vec<NodeId> {
    tree.iter_elements()
        .filter(|&id| parsed.matches_in_tree(tree, id))
        .collect()
}

/// [§ 4.2.6 querySelector](https://dom.spec.whatwg.org/#dom-parentnode-queryselector)
///
/// "Returns the first element that is a descendant of node that matches
/// selectors."
#[must_use]
pub fn query_first(tree: &DomTree, selector: &str) -> Option<NodeId> {
    let parsed = parse_selector(selector)?;
    tree.iter_elements()
        .find(|&id| parsed.matches_in_tree(tree, id))
}

/// Number of elements matching `selector`.
#[must_use]
pub fn count_matches(tree: &DomTree, selector: &str) -> usize {
    query_all(tree, selector).len()
}

/// Uniqueness probe: does `selector` resolve to exactly one element, and is
/// that element `target`?
///
/// This is the acceptance test every candidate the generator builds must
/// pass. (With candidates derived from the target's own attributes a single
/// match is necessarily the target; the identity check guards the invariant
/// anyway.)
#[must_use]
pub fn resolves_uniquely_to(tree: &DomTree, selector: &str, target: NodeId) -> bool {
    let matches = query_all(tree, selector);
    matches.len() == 1 && matches[0] == target
}
