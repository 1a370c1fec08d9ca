//! Selector matching against elements with DOM tree context.
//!
//! [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
//!
//! "A selector is said to match an element when..."
//!
//! Matching starts at the subject (rightmost compound) and walks the
//! combinator chain outward/upward through the tree.

use magpie_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::model::{
    AttributeSelector, Combinator, CompoundSelector, ParsedSelector, PseudoClass, SimpleSelector,
};

impl ParsedSelector {
    /// Match this selector against an element with full DOM tree context.
    ///
    /// Returns `false` when `node_id` is not an element.
    #[must_use]
    pub fn matches_in_tree(&self, tree: &DomTree, node_id: NodeId) -> bool {
        // The subject (rightmost compound) must match the element itself.
        if !compound_matches(&self.complex.subject, tree, node_id) {
            return false;
        }

        if self.complex.combinators.is_empty() {
            return true;
        }

        self.matches_combinators(tree, node_id)
    }

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
    ///
    /// Walk the combinator chain (stored right-to-left, from subject
    /// outward); for each combinator find an element in the required
    /// relationship that matches the paired compound.
    fn matches_combinators(&self, tree: &DomTree, subject_id: NodeId) -> bool {
        let mut current_id = subject_id;

        for (combinator, compound) in &self.complex.combinators {
            let next = match combinator {
                // "A selector of the form 'A B' represents an element B that
                // is an arbitrary descendant of some ancestor element A."
                Combinator::Descendant => tree
                    .ancestors(current_id)
                    .find(|&ancestor| compound_matches(compound, tree, ancestor)),

                // "A selector of the form 'A > B' represents an element B
                // that is a direct child of element A."
                Combinator::Child => tree
                    .parent(current_id)
                    .filter(|&parent| compound_matches(compound, tree, parent)),

                // "A selector of the form 'A + B' represents an element B
                // that immediately follows element A..."
                Combinator::NextSibling => previous_element_sibling(tree, current_id)
                    .filter(|&prev| compound_matches(compound, tree, prev)),

                // "A selector of the form 'A ~ B' represents an element B
                // that follows element A (not necessarily immediately)..."
                Combinator::SubsequentSibling => preceding_element_siblings(tree, current_id)
                    .into_iter()
                    .find(|&sibling| compound_matches(compound, tree, sibling)),
            };

            match next {
                Some(id) => current_id = id,
                None => return false,
            }
        }

        true
    }
}

/// Check if a compound selector matches an element, with tree context for
/// structural pseudo-classes.
pub(crate) fn compound_matches(
    compound: &CompoundSelector,
    tree: &DomTree,
    node_id: NodeId,
) -> bool {
    let Some(element) = tree.as_element(node_id) else {
        return false;
    };
    compound.simple_selectors.iter().all(|simple| match simple {
        SimpleSelector::PseudoClass(pc) => pseudo_class_matches(pc, tree, node_id, element),
        _ => simple_matches(simple, element),
    })
}

/// Match a non-structural simple selector against element data alone.
fn simple_matches(selector: &SimpleSelector, element: &ElementData) -> bool {
    match selector {
        // "A type selector... represents an element in the document tree
        // with the same qualified name as the identifier."
        SimpleSelector::Type(name) => element.tag_name.eq_ignore_ascii_case(name),

        // "...authors can use the 'period' (.) notation..."
        SimpleSelector::Class(class_name) => element.has_class(class_name),

        // "An ID selector represents an element instance that has an
        // identifier that matches the identifier in the ID selector."
        SimpleSelector::Id(id) => element.id() == Some(id.as_str()),

        // "...represents the qualified name of any element type."
        SimpleSelector::Universal => true,

        // Interactive/unsupported pseudos never match; structural
        // pseudo-classes are handled by `pseudo_class_matches` with tree
        // context, so reaching here means "no context available".
        SimpleSelector::NeverMatch | SimpleSelector::PseudoClass(_) => false,

        // [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
        SimpleSelector::Attribute(attr_sel) => attribute_matches(attr_sel, element),
    }
}

/// Match one attribute selector form.
fn attribute_matches(selector: &AttributeSelector, element: &ElementData) -> bool {
    match selector {
        // [attr] — has attribute
        AttributeSelector::Exists(name) => element.attrs.contains_key(name.as_str()),
        // [attr=value] — exact match
        AttributeSelector::Equals(name, val) => {
            element.attrs.get(name.as_str()).is_some_and(|v| v == val)
        }
        // [attr~=value] — space-separated word match
        AttributeSelector::Includes(name, val) => element
            .attrs
            .get(name.as_str())
            .is_some_and(|v| v.split_ascii_whitespace().any(|w| w == val)),
        // [attr|=value] — exact or prefix with hyphen
        AttributeSelector::DashMatch(name, val) => element
            .attrs
            .get(name.as_str())
            .is_some_and(|v| v == val || v.starts_with(&format!("{val}-"))),
        // [attr^=value] — starts with
        AttributeSelector::PrefixMatch(name, val) => element
            .attrs
            .get(name.as_str())
            .is_some_and(|v| v.starts_with(val.as_str())),
        // [attr$=value] — ends with
        AttributeSelector::SuffixMatch(name, val) => element
            .attrs
            .get(name.as_str())
            .is_some_and(|v| v.ends_with(val.as_str())),
        // [attr*=value] — substring
        AttributeSelector::SubstringMatch(name, val) => element
            .attrs
            .get(name.as_str())
            .is_some_and(|v| v.contains(val.as_str())),
    }
}

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// Match a structural pseudo-class against an element with tree context.
fn pseudo_class_matches(
    pc: &PseudoClass,
    tree: &DomTree,
    node_id: NodeId,
    element: &ElementData,
) -> bool {
    match pc {
        // "...an element that is the root of the document."
        PseudoClass::Root => tree.document_element() == Some(node_id),

        // "...an element that is first among its inclusive siblings."
        PseudoClass::FirstChild => tree.parent(node_id).is_some_and(|parent| {
            tree.children(parent)
                .iter()
                .find(|&&c| tree.as_element(c).is_some())
                == Some(&node_id)
        }),

        // "...an element that is last among its inclusive siblings."
        PseudoClass::LastChild => tree.parent(node_id).is_some_and(|parent| {
            tree.children(parent)
                .iter()
                .rev()
                .find(|&&c| tree.as_element(c).is_some())
                == Some(&node_id)
        }),

        // "...an element that is the first sibling of its type."
        PseudoClass::FirstOfType => tree.same_tag_position(node_id).is_some_and(|(n, _)| n == 1),

        // "...an element that is the last sibling of its type."
        PseudoClass::LastOfType => tree
            .same_tag_position(node_id)
            .is_some_and(|(n, count)| n == count),

        // "...an element that has an+b-1 siblings with the same expanded
        // element name before it in the document tree."
        PseudoClass::NthOfType(n) => tree
            .same_tag_position(node_id)
            .is_some_and(|(position, _)| position == *n),

        // "...an element that has no siblings."
        PseudoClass::OnlyChild => tree.parent(node_id).is_some_and(|parent| {
            tree.children(parent)
                .iter()
                .filter(|&&c| tree.as_element(c).is_some())
                .count()
                == 1
        }),

        // "...an element that has no children at all" — whitespace-only text
        // and comments don't count.
        PseudoClass::Empty => {
            tree.children(node_id)
                .iter()
                .all(|&c| match tree.get(c).map(|n| &n.node_type) {
                    Some(NodeType::Text(t)) => t.trim().is_empty(),
                    Some(NodeType::Comment(_)) => true,
                    _ => false,
                })
        }

        // :disabled — element has the disabled attribute
        PseudoClass::Disabled => element.attrs.contains_key("disabled"),

        // :enabled — element does not have the disabled attribute
        PseudoClass::Enabled => !element.attrs.contains_key("disabled"),
    }
}

/// [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
///
/// The immediately preceding element sibling (text/comment nodes skipped).
fn previous_element_sibling(tree: &DomTree, node_id: NodeId) -> Option<NodeId> {
    let mut current = tree.prev_sibling(node_id);
    while let Some(id) = current {
        if tree.as_element(id).is_some() {
            return Some(id);
        }
        current = tree.prev_sibling(id);
    }
    None
}

/// [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
///
/// All preceding element siblings, nearest first.
fn preceding_element_siblings(tree: &DomTree, node_id: NodeId) -> Vec<NodeId> {
    let mut siblings = Vec::new();
    let mut current = tree.prev_sibling(node_id);
    while let Some(id) = current {
        if tree.as_element(id).is_some() {
            siblings.push(id);
        }
        current = tree.prev_sibling(id);
    }
    siblings
}
