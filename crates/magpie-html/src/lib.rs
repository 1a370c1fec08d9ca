//! HTML tokenizer, tree builder, and serializer for magpie.
//!
//! # Scope
//!
//! This crate implements the subset of HTML parsing a value-clipping tool
//! meets — documents are snapshots to query and lightly mutate, never pages
//! to render:
//!
//! - **Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, tag, and attribute states
//!   - Comment and DOCTYPE handling
//!   - Raw text for `<script>`/`<style>` content
//!   - Named and numeric character references (the common set)
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Insertion modes: Initial, BeforeHtml, BeforeHead, InHead, AfterHead,
//!     InBody, Text, AfterBody, AfterAfterBody
//!   - Implied html/head/body tags, void elements, p/li auto-closing
//!
//! - **Serializer** ([WHATWG § 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments))
//!   - Document and fragment (inner markup) serialization after pasting
//!
//! # Not Yet Implemented
//!
//! - Script data escape states (`<!--` inside `<script>`)
//! - Table parsing modes, templates, framesets
//! - Foreign content (SVG/MathML)
//! - Foster parenting and the adoption agency algorithm

/// HTML parser and tree construction.
pub mod parser;
/// HTML serialization back to markup.
pub mod serialize;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{InsertionMode, ParseIssue, Parser, print_tree};
pub use serialize::{inner_html, serialize, serialize_node};
pub use tokenizer::{Attribute, Token, Tokenizer};

use magpie_dom::DomTree;

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements only have a start tag; end tags must not be specified for
/// void elements." They never receive children and are serialized without a
/// closing tag.
pub const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Check whether a tag names a void element (case-insensitive).
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| tag.eq_ignore_ascii_case(void))
}

/// Parse an HTML document into a DOM tree.
///
/// This is the main entry point: tokenize, then build the tree. Parse
/// issues are dropped; use [`parse_document_with_issues`] to keep them.
#[must_use]
pub fn parse_document(html: &str) -> DomTree {
    let (tree, _) = parse_document_with_issues(html);
    tree
}

/// Parse an HTML document, also returning the issues the builder recorded.
#[must_use]
pub fn parse_document_with_issues(html: &str) -> (DomTree, Vec<ParseIssue>) {
    let mut tokenizer = Tokenizer::new(html.to_string());
    tokenizer.run();
    let parser = Parser::new(tokenizer.into_tokens());
    parser.run_with_issues()
}
