//! HTML tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! "The input to the tree construction stage is a sequence of tokens from
//! the tokenization stage."
//!
//! The builder keeps the insertion modes a snapshot document exercises and
//! is deliberately forgiving: misnested or unexpected markup is recorded as
//! a [`ParseIssue`] and parsing continues, because a clipping tool must
//! accept whatever markup real pages serve.

use strum_macros::Display;

use magpie_common::warning::warn_once;
use magpie_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::is_void_element;
use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary
/// operation of the tree construction stage."
///
/// Table, template, frameset, and foreign-content modes are omitted — their
/// content parses as ordinary nested elements, which is fidelity enough for
/// selector generation and value clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// "Parse errors are only errors with the content — they are not, for
/// instance, errors in the syntax of the specification itself."
#[derive(Debug, Clone)]
pub struct ParseIssue {
    /// Description of the parse error per the spec's error definitions.
    pub message: String,
    /// Index into the token stream where this error was encountered.
    pub token_index: usize,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML parser builds a DOM tree from a stream of tokens.
pub struct Parser {
    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    insertion_mode: InsertionMode,

    /// [§ 13.2.4.2 The original insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    ///
    /// Where to return after the Text mode ends.
    original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Stores `NodeId`s into the arena.
    stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    head_element_pointer: Option<NodeId>,

    /// DOM tree with parent/sibling pointers.
    /// `NodeId::ROOT` (index 0) is the Document node.
    tree: DomTree,

    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// Current position in the token stream.
    token_index: usize,

    /// Whether we've stopped parsing.
    stopped: bool,

    /// Parse issues encountered during parsing.
    issues: Vec<ParseIssue>,
}

impl Parser {
    /// Create a parser over a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            stack_of_open_elements: Vec::new(),
            head_element_pointer: None,
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            stopped: false,
            issues: Vec::new(),
        }
    }

    /// Run tree construction to completion and return the tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        let (tree, _) = self.run_with_issues();
        tree
    }

    /// Run tree construction, also returning the recorded parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        while !self.stopped && self.token_index < self.tokens.len() {
            let token = self.tokens[self.token_index].clone();
            self.process_token(&token);
            self.token_index += 1;
        }
        (self.tree, self.issues)
    }

    /// Record a parse issue at the current token.
    fn issue(&mut self, message: &str) {
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
        });
    }

    /// Reprocess the current token in a different insertion mode.
    ///
    /// "...reprocess the token" appears throughout § 13.2.6; switching the
    /// mode and dispatching again is the direct encoding.
    fn reprocess_in(&mut self, mode: InsertionMode, token: &Token) {
        self.insertion_mode = mode;
        self.process_token(token);
    }

    /// Dispatch one token according to the current insertion mode.
    fn process_token(&mut self, token: &Token) {
        match self.insertion_mode {
            InsertionMode::Initial => self.initial_mode(token),
            InsertionMode::BeforeHtml => self.before_html_mode(token),
            InsertionMode::BeforeHead => self.before_head_mode(token),
            InsertionMode::InHead => self.in_head_mode(token),
            InsertionMode::AfterHead => self.after_head_mode(token),
            InsertionMode::InBody => self.in_body_mode(token),
            InsertionMode::Text => self.text_mode(token),
            InsertionMode::AfterBody => self.after_body_mode(token),
            InsertionMode::AfterAfterBody => self.after_after_body_mode(token),
        }
    }

    // ===== Node insertion helpers =====

    /// The node new content is appended to.
    ///
    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    /// "The appropriate place for inserting a node... inside the current
    /// node, after its last child." (Foster parenting is not implemented.)
    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    /// Create an element node from a tag token and append it.
    ///
    /// [§ 13.2.6.1 Create an element for the token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    fn insert_element(&mut self, name: &str, attributes: &[Attribute]) -> NodeId {
        let mut attrs = AttributesMap::new();
        for attr in attributes {
            let _ = attrs.entry(attr.name.clone()).or_insert(attr.value.clone());
        }
        let element = self.tree.alloc(NodeType::Element(ElementData {
            tag_name: name.to_string(),
            attrs,
        }));
        self.tree.append_child(self.current_node(), element);
        element
    }

    /// Insert an element and push it onto the stack of open elements.
    fn insert_and_push(&mut self, name: &str, attributes: &[Attribute]) -> NodeId {
        let element = self.insert_element(name, attributes);
        self.stack_of_open_elements.push(element);
        element
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data."
    fn insert_character(&mut self, c: char) {
        let parent = self.current_node();
        if let Some(&last) = self.tree.children(parent).last() {
            if let Some(node) = self.tree.get_mut(last) {
                if let NodeType::Text(ref mut text) = node.node_type {
                    text.push(c);
                    return;
                }
            }
        }
        let text = self.tree.alloc(NodeType::Text(c.to_string()));
        self.tree.append_child(parent, text);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    fn insert_comment(&mut self, data: &str) {
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(self.current_node(), comment);
    }

    /// Tag name of the element on top of the stack.
    fn current_tag_name(&self) -> Option<&str> {
        self.stack_of_open_elements
            .last()
            .and_then(|&id| self.tree.as_element(id))
            .map(|e| e.tag_name.as_str())
    }

    // ===== Insertion modes =====

    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    fn initial_mode(&mut self, token: &Token) {
        match token {
            // "Ignore the token." (whitespace)
            Token::Character(c) if c.is_ascii_whitespace() => {}
            Token::Comment(data) => self.insert_comment(&data.clone()),
            // "Then, switch the insertion mode to 'before html'."
            Token::Doctype { .. } => self.insertion_mode = InsertionMode::BeforeHtml,
            // "...switch the insertion mode to 'before html', then reprocess
            // the token."
            _ => self.reprocess_in(InsertionMode::BeforeHtml, token),
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    fn before_html_mode(&mut self, token: &Token) {
        match token {
            Token::Doctype { .. } => self.issue("unexpected DOCTYPE"),
            Token::Comment(data) => self.insert_comment(&data.clone()),
            Token::Character(c) if c.is_ascii_whitespace() => {}
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let _ = self.insert_and_push("html", attributes);
                self.insertion_mode = InsertionMode::BeforeHead;
            }
            // "Create an html element... Switch the insertion mode to
            // 'before head', then reprocess the token."
            _ => {
                let _ = self.insert_and_push("html", &[]);
                self.reprocess_in(InsertionMode::BeforeHead, token);
            }
        }
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    fn before_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character(c) if c.is_ascii_whitespace() => {}
            Token::Comment(data) => self.insert_comment(&data.clone()),
            Token::Doctype { .. } => self.issue("unexpected DOCTYPE"),
            Token::StartTag {
                name, attributes, ..
            } if name == "head" => {
                let head = self.insert_and_push("head", attributes);
                self.head_element_pointer = Some(head);
                self.insertion_mode = InsertionMode::InHead;
            }
            // "Insert an HTML element for a 'head' start tag token with no
            // attributes... reprocess the current token."
            _ => {
                let head = self.insert_and_push("head", &[]);
                self.head_element_pointer = Some(head);
                self.reprocess_in(InsertionMode::InHead, token);
            }
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    fn in_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character(c) if c.is_ascii_whitespace() => self.insert_character(*c),
            Token::Comment(data) => self.insert_comment(&data.clone()),
            Token::Doctype { .. } => self.issue("unexpected DOCTYPE"),
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "Insert an HTML element for the token. Immediately pop the
                // current node off the stack of open elements."
                "base" | "link" | "meta" => {
                    let _ = self.insert_element(name, attributes);
                }
                // "Follow the generic raw text element parsing algorithm" —
                // the tokenizer already switched itself for script/style;
                // title content arrives as ordinary characters.
                "title" | "style" | "script" | "noscript" => {
                    let _ = self.insert_and_push(name, attributes);
                    self.original_insertion_mode = Some(InsertionMode::InHead);
                    self.insertion_mode = InsertionMode::Text;
                }
                // "Pop the current node (which will be the head element)...
                // switch the insertion mode to 'after head'... reprocess."
                _ => {
                    let _ = self.stack_of_open_elements.pop();
                    self.reprocess_in(InsertionMode::AfterHead, token);
                }
            },
            Token::EndTag { name } if name == "head" => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::AfterHead;
            }
            Token::EndTag { name } if name == "html" || name == "body" => {
                let _ = self.stack_of_open_elements.pop();
                self.reprocess_in(InsertionMode::AfterHead, token);
            }
            Token::EndTag { name } => {
                self.issue(&format!("unexpected end tag </{name}> in head"));
            }
            _ => {
                let _ = self.stack_of_open_elements.pop();
                self.reprocess_in(InsertionMode::AfterHead, token);
            }
        }
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    fn after_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character(c) if c.is_ascii_whitespace() => {}
            Token::Comment(data) => self.insert_comment(&data.clone()),
            Token::Doctype { .. } => self.issue("unexpected DOCTYPE"),
            Token::StartTag {
                name, attributes, ..
            } if name == "body" => {
                let _ = self.insert_and_push("body", attributes);
                self.insertion_mode = InsertionMode::InBody;
            }
            // "Insert an HTML element for a 'body' start tag token with no
            // attributes... reprocess the current token."
            _ => {
                let _ = self.insert_and_push("body", &[]);
                self.reprocess_in(InsertionMode::InBody, token);
            }
        }
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    fn in_body_mode(&mut self, token: &Token) {
        match token {
            Token::Character(c) => self.insert_character(*c),
            Token::Comment(data) => self.insert_comment(&data.clone()),
            Token::Doctype { .. } => self.issue("unexpected DOCTYPE"),

            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let name = name.clone();
                let attributes = attributes.clone();

                // "If the stack of open elements has a p element in button
                // scope, then close a p element." Simplified to the two
                // auto-closers real pages lean on.
                match name.as_str() {
                    "p" | "div" | "ul" | "ol" | "table" | "h1" | "h2" | "h3" | "h4" | "h5"
                    | "h6" | "form" | "section" | "article" => {
                        self.close_implied("p");
                    }
                    "li" => self.close_implied("li"),
                    "td" | "th" | "tr" => {
                        self.close_implied("td");
                        self.close_implied("th");
                        if name == "tr" {
                            self.close_implied("tr");
                        }
                    }
                    _ => {}
                }

                if name == "script" || name == "style" {
                    let _ = self.insert_and_push(&name, &attributes);
                    self.original_insertion_mode = Some(InsertionMode::InBody);
                    self.insertion_mode = InsertionMode::Text;
                } else if is_void_element(&name) || *self_closing {
                    // "Insert an HTML element for the token. Immediately pop
                    // the current node off the stack of open elements."
                    let _ = self.insert_element(&name, &attributes);
                } else {
                    let _ = self.insert_and_push(&name, &attributes);
                }
            }

            Token::EndTag { name } => match name.as_str() {
                "body" | "html" => self.insertion_mode = InsertionMode::AfterBody,
                _ => self.close_element(&name.clone()),
            },

            Token::EndOfFile => self.stopped = true,
        }
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    fn text_mode(&mut self, token: &Token) {
        match token {
            Token::Character(c) => self.insert_character(*c),
            Token::EndTag { .. } => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InBody);
            }
            Token::EndOfFile => {
                self.issue("end of file inside raw text element");
                self.stopped = true;
            }
            _ => {}
        }
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    fn after_body_mode(&mut self, token: &Token) {
        match token {
            Token::Character(c) if c.is_ascii_whitespace() => {}
            Token::Comment(data) => self.insert_comment(&data.clone()),
            Token::EndTag { name } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterAfterBody;
            }
            Token::EndOfFile => self.stopped = true,
            // "...this is a parse error. Switch the insertion mode to
            // 'in body' and reprocess the token."
            _ => {
                self.issue("content after </body>");
                self.reprocess_in(InsertionMode::InBody, token);
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    fn after_after_body_mode(&mut self, token: &Token) {
        match token {
            Token::Comment(data) => self.insert_comment(&data.clone()),
            Token::Character(c) if c.is_ascii_whitespace() => {}
            Token::EndOfFile => self.stopped = true,
            _ => {
                self.issue("content after </html>");
                self.reprocess_in(InsertionMode::InBody, token);
            }
        }
    }

    // ===== Stack manipulation =====

    /// Close the nearest open `tag` if it is the current node.
    ///
    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    /// "...generate implied end tags" — a new block or list item implicitly
    /// ends an open p/li/td. Only the immediate case is handled; deeper
    /// misnesting falls through to `close_element`'s recovery.
    fn close_implied(&mut self, tag: &str) {
        if self.current_tag_name() == Some(tag) {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// Pop the stack of open elements through the nearest element with the
    /// given tag name.
    ///
    /// [§ 13.2.6.4.7 "Any other end tag"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    /// "If node is an HTML element with the same tag name as the token, then
    /// pop all the nodes from the current node up to node, including node,
    /// then stop these steps. Otherwise... ignore the token."
    fn close_element(&mut self, tag: &str) {
        let position = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| {
                self.tree
                    .as_element(id)
                    .is_some_and(|e| e.tag_name.eq_ignore_ascii_case(tag))
            });

        match position {
            Some(index) => self.stack_of_open_elements.truncate(index),
            None => {
                self.issue(&format!("end tag </{tag}> with no matching start tag"));
                warn_once("html", &format!("ignoring stray end tag </{tag}>"));
            }
        }
    }
}

/// Print the tree for debugging, indented two spaces per depth level.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let pad = "  ".repeat(indent);
    match tree.get(id).map(|n| &n.node_type) {
        Some(NodeType::Document) => println!("{pad}#document"),
        Some(NodeType::Element(data)) => {
            let mut attrs: Vec<String> = data
                .attrs
                .iter()
                .map(|(k, v)| format!("{k}=\"{v}\""))
                .collect();
            attrs.sort();
            if attrs.is_empty() {
                println!("{pad}<{}>", data.tag_name);
            } else {
                println!("{pad}<{} {}>", data.tag_name, attrs.join(" "));
            }
        }
        Some(NodeType::Text(text)) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                println!("{pad}\"{trimmed}\"");
            }
        }
        Some(NodeType::Comment(data)) => println!("{pad}<!-- {data} -->"),
        None => {}
    }
    for &child in tree.children(id) {
        print_tree(tree, child, indent + 1);
    }
}
