//! HTML serialization.
//!
//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! "The algorithm below serializes the children of the node being
//! serialized, not the node itself."
//!
//! Used after pasting to write the mutated document back out, and by the
//! inner-markup extraction mode. Output is not a byte-identical copy of the
//! input — attribute order follows the map and entities are re-escaped —
//! but it round-trips through the parser to an equivalent tree.

use magpie_dom::{DomTree, NodeId, NodeType};

use crate::is_void_element;

/// Serialize a whole document.
///
/// A `<!DOCTYPE html>` line is emitted up front; the original doctype is
/// not preserved through the DOM, and this is the only form that matters
/// to modern consumers.
#[must_use]
pub fn serialize(tree: &DomTree) -> String {
    let mut out = String::from("<!DOCTYPE html>");
    for &child in tree.children(tree.root()) {
        serialize_into(tree, child, &mut out);
    }
    out
}

/// Serialize one node, including its own tags.
#[must_use]
pub fn serialize_node(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    serialize_into(tree, id, &mut out);
    out
}

/// [§ 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
///
/// Serialize only the children of a node — the `innerHTML` getter's view.
#[must_use]
pub fn inner_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    for &child in tree.children(id) {
        serialize_into(tree, child, &mut out);
    }
    out
}

/// Append the serialization of `id` to `out`.
fn serialize_into(tree: &DomTree, id: NodeId, out: &mut String) {
    match tree.get(id).map(|n| &n.node_type) {
        Some(NodeType::Document) => {
            for &child in tree.children(id) {
                serialize_into(tree, child, out);
            }
        }
        Some(NodeType::Element(data)) => {
            out.push('<');
            out.push_str(&data.tag_name);

            // Deterministic attribute order: the map is unordered, and
            // stable output matters for tests and diffs.
            let mut attrs: Vec<(&String, &String)> = data.attrs.iter().collect();
            attrs.sort();
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attribute(value));
                out.push('"');
            }
            out.push('>');

            // "If current node is an area, base, basefont, bgsound, br, col,
            // embed, hr, img, input, link, meta... then continue on to the
            // next child node at this point."
            if is_void_element(&data.tag_name) {
                return;
            }

            // Raw text children are emitted verbatim; escaping would change
            // what a script means.
            let raw = data.tag_name.eq_ignore_ascii_case("script")
                || data.tag_name.eq_ignore_ascii_case("style");

            for &child in tree.children(id) {
                if raw {
                    if let Some(text) = tree.as_text(child) {
                        out.push_str(text);
                        continue;
                    }
                }
                serialize_into(tree, child, out);
            }

            out.push_str("</");
            out.push_str(&data.tag_name);
            out.push('>');
        }
        Some(NodeType::Text(text)) => out.push_str(&escape_text(text)),
        Some(NodeType::Comment(data)) => {
            out.push_str("<!--");
            out.push_str(data);
            out.push_str("-->");
        }
        None => {}
    }
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "Replace any occurrence of the '&' character by the string '&amp;'...
/// '<' by '&lt;', '>' by '&gt;'."
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Attribute-value escaping also covers the surrounding quote character.
fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
