//! HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! "Implementations must act as if they used the following state machine to
//! tokenize HTML."
//!
//! The machine below keeps the states a clipping snapshot actually
//! exercises: data, tags, attributes, comments, DOCTYPE, and a raw-text
//! mode for `<script>`/`<style>` bodies. Character tokens are emitted one
//! code point at a time, as the spec describes; the tree builder coalesces
//! them into text nodes.

use strum_macros::Display;

/// A single attribute on a tag token.
///
/// [§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
/// "Start and end tag tokens have a tag name, a self-closing flag, and a
/// list of attributes, each of which has a name and a value."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, lowercased during tokenization.
    pub name: String,
    /// Attribute value with character references resolved.
    pub value: String,
}

/// Output of the tokenizer.
///
/// [§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
/// "The output of the tokenization step is a series of zero or more of the
/// following tokens: DOCTYPE, start tag, end tag, comment, character,
/// end-of-file."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A `<!DOCTYPE ...>` token; only the name is retained.
    Doctype {
        /// The DOCTYPE name (normally "html").
        name: String,
    },
    /// A start tag with its attributes.
    StartTag {
        /// Tag name, lowercased.
        name: String,
        /// Attributes in source order (first occurrence wins on duplicates).
        attributes: Vec<Attribute>,
        /// "/>" was present.
        self_closing: bool,
    },
    /// An end tag.
    EndTag {
        /// Tag name, lowercased.
        name: String,
    },
    /// A single character of document text.
    Character(char),
    /// A `<!-- ... -->` comment.
    Comment(String),
    /// End of the input stream.
    EndOfFile,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. Each state corresponds to a section in
/// § 13.2.5; states this tool never reaches (script-data escaping, CDATA,
/// RCDATA) are omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    Doctype,
    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    BeforeDoctypeName,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DoctypeName,
    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    AfterDoctypeName,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    /// (entered after a `<script>` or `<style>` start tag)
    RawText,
    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    RawTextLessThanSign,
    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    RawTextEndTagOpen,
    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    RawTextEndTagName,
}

/// The small named character reference table a clipping snapshot meets.
///
/// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
///
/// The full table has over two thousand entries; unknown names are passed
/// through literally, which is what browsers render for unterminated
/// references anyway.
const NAMED_REFERENCES: [(&str, char); 14] = [
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("copy", '©'),
    ("ndash", '–'),
    ("mdash", '—'),
    ("hellip", '…'),
    ("lsquo", '\u{2018}'),
    ("rsquo", '\u{2019}'),
    ("ldquo", '\u{201c}'),
    ("rdquo", '\u{201d}'),
];

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The HTML tokenizer. Create with the input, [`run`](Tokenizer::run) to
/// completion, then take the tokens with [`into_tokens`](Tokenizer::into_tokens).
pub struct Tokenizer {
    /// Input as code points for O(1) lookahead.
    input: Vec<char>,
    /// Index of the next code point to consume.
    pos: usize,
    /// Current state of the machine.
    state: TokenizerState,
    /// Output token stream.
    tokens: Vec<Token>,

    /// Tag token under construction.
    current_tag_name: String,
    /// Attributes of the tag under construction.
    current_attributes: Vec<Attribute>,
    /// Name buffer of the attribute under construction.
    current_attr_name: String,
    /// Value buffer of the attribute under construction.
    current_attr_value: String,
    /// Whether the tag under construction is an end tag.
    current_is_end_tag: bool,
    /// Whether "/>" was seen.
    current_self_closing: bool,

    /// Comment or DOCTYPE-name text under construction.
    current_text: String,

    /// The element name whose raw text we are inside (`script`/`style`).
    raw_text_tag: String,
    /// Buffer for a potential `</tag` sequence inside raw text.
    raw_end_tag_buffer: String,
}

impl Tokenizer {
    /// Create a tokenizer over the given input.
    #[must_use]
    pub fn new(input: String) -> Self {
        Tokenizer {
            input: input.chars().collect(),
            pos: 0,
            state: TokenizerState::Data,
            tokens: Vec::new(),
            current_tag_name: String::new(),
            current_attributes: Vec::new(),
            current_attr_name: String::new(),
            current_attr_value: String::new(),
            current_is_end_tag: false,
            current_self_closing: false,
            current_text: String::new(),
            raw_text_tag: String::new(),
            raw_end_tag_buffer: String::new(),
        }
    }

    /// Consume the tokens, ending the tokenizer's life.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Run the state machine over the whole input.
    ///
    /// [§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    /// "The exact behavior of certain states depends on the insertion mode" —
    /// we avoid that coupling by switching to raw text directly on emitting
    /// a `<script>`/`<style>` start tag, which is the only feedback the
    /// reduced grammar needs.
    pub fn run(&mut self) {
        loop {
            let Some(c) = self.next_char() else {
                self.handle_eof();
                break;
            };
            self.step(c);
        }
    }

    /// Consume the next input code point.
    fn next_char(&mut self) -> Option<char> {
        let c = self.input.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// Peek without consuming.
    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    /// Reconsume the current input character in a new state.
    ///
    /// "Reconsume the current input character in the ... state" appears
    /// throughout § 13.2.5; backing up the position is the direct encoding.
    fn reconsume_in(&mut self, state: TokenizerState) {
        self.pos -= 1;
        self.state = state;
    }

    /// Check (case-insensitively) whether the input continues with `s`.
    fn lookahead_matches(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, expected)| {
            self.input
                .get(self.pos + i)
                .is_some_and(|&c| c.eq_ignore_ascii_case(&expected))
        })
    }

    /// Dispatch one consumed character according to the current state.
    fn step(&mut self, c: char) {
        match self.state {
            TokenizerState::Data => self.data_state(c),
            TokenizerState::TagOpen => self.tag_open_state(c),
            TokenizerState::EndTagOpen => self.end_tag_open_state(c),
            TokenizerState::TagName => self.tag_name_state(c),
            TokenizerState::BeforeAttributeName => self.before_attribute_name_state(c),
            TokenizerState::AttributeName => self.attribute_name_state(c),
            TokenizerState::AfterAttributeName => self.after_attribute_name_state(c),
            TokenizerState::BeforeAttributeValue => self.before_attribute_value_state(c),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.attribute_value_quoted_state(c, '"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.attribute_value_quoted_state(c, '\'');
            }
            TokenizerState::AttributeValueUnquoted => self.attribute_value_unquoted_state(c),
            TokenizerState::AfterAttributeValueQuoted => self.after_attribute_value_quoted_state(c),
            TokenizerState::SelfClosingStartTag => self.self_closing_start_tag_state(c),
            TokenizerState::BogusComment => self.bogus_comment_state(c),
            TokenizerState::MarkupDeclarationOpen => self.markup_declaration_open_state(c),
            TokenizerState::CommentStart => self.comment_start_state(c),
            TokenizerState::CommentStartDash => self.comment_start_dash_state(c),
            TokenizerState::Comment => self.comment_state(c),
            TokenizerState::CommentEndDash => self.comment_end_dash_state(c),
            TokenizerState::CommentEnd => self.comment_end_state(c),
            TokenizerState::Doctype => self.doctype_state(c),
            TokenizerState::BeforeDoctypeName => self.before_doctype_name_state(c),
            TokenizerState::DoctypeName => self.doctype_name_state(c),
            TokenizerState::AfterDoctypeName => self.after_doctype_name_state(c),
            TokenizerState::RawText => self.raw_text_state(c),
            TokenizerState::RawTextLessThanSign => self.raw_text_less_than_sign_state(c),
            TokenizerState::RawTextEndTagOpen => self.raw_text_end_tag_open_state(c),
            TokenizerState::RawTextEndTagName => self.raw_text_end_tag_name_state(c),
        }
    }

    /// Unfinished constructs at end of input are dropped; the builder sees a
    /// clean EndOfFile.
    fn handle_eof(&mut self) {
        if self.state == TokenizerState::Comment
            || self.state == TokenizerState::CommentEndDash
            || self.state == TokenizerState::CommentEnd
        {
            let comment = std::mem::take(&mut self.current_text);
            self.tokens.push(Token::Comment(comment));
        }
        self.tokens.push(Token::EndOfFile);
    }

    // ===== Data and references =====

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn data_state(&mut self, c: char) {
        match c {
            '<' => self.state = TokenizerState::TagOpen,
            '&' => {
                let decoded = self.consume_character_reference();
                for ch in decoded.chars() {
                    self.tokens.push(Token::Character(ch));
                }
            }
            _ => self.tokens.push(Token::Character(c)),
        }
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// The `&` has been consumed. Attempts a named or numeric reference;
    /// on failure returns the text consumed so far literally ("flush code
    /// points consumed as a character reference").
    fn consume_character_reference(&mut self) -> String {
        // Numeric: &#123; or &#x1F;
        if self.peek_char() == Some('#') {
            let start = self.pos;
            self.pos += 1;
            let hex = matches!(self.peek_char(), Some('x' | 'X'));
            if hex {
                self.pos += 1;
            }
            let mut digits = String::new();
            while self.peek_char().is_some_and(|ch| {
                if hex {
                    ch.is_ascii_hexdigit()
                } else {
                    ch.is_ascii_digit()
                }
            }) {
                digits.push(self.input[self.pos]);
                self.pos += 1;
            }
            if !digits.is_empty() && self.peek_char() == Some(';') {
                self.pos += 1;
                let radix = if hex { 16 } else { 10 };
                if let Some(decoded) =
                    u32::from_str_radix(&digits, radix).ok().and_then(char::from_u32)
                {
                    return decoded.to_string();
                }
            }
            // Not a well-formed numeric reference; emit literally.
            self.pos = start;
            return "&".to_string();
        }

        // Named: longest match against the supported table.
        for (name, decoded) in NAMED_REFERENCES {
            let with_semicolon = format!("{name};");
            if self.lookahead_matches(&with_semicolon) {
                self.pos += with_semicolon.len();
                return decoded.to_string();
            }
        }

        "&".to_string()
    }

    // ===== Tags =====

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn tag_open_state(&mut self, c: char) {
        match c {
            '!' => self.state = TokenizerState::MarkupDeclarationOpen,
            '/' => self.state = TokenizerState::EndTagOpen,
            _ if c.is_ascii_alphabetic() => {
                self.current_tag_name.clear();
                self.current_attributes.clear();
                self.current_is_end_tag = false;
                self.current_self_closing = false;
                self.reconsume_in(TokenizerState::TagName);
            }
            // "This is an invalid-first-character-of-tag-name parse error.
            // Emit a U+003C LESS-THAN SIGN character token."
            _ => {
                self.tokens.push(Token::Character('<'));
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn end_tag_open_state(&mut self, c: char) {
        if c.is_ascii_alphabetic() {
            self.current_tag_name.clear();
            self.current_attributes.clear();
            self.current_is_end_tag = true;
            self.current_self_closing = false;
            self.reconsume_in(TokenizerState::TagName);
        } else {
            // "This is a bogus comment..."
            self.current_text.clear();
            self.reconsume_in(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn tag_name_state(&mut self, c: char) {
        match c {
            '\t' | '\n' | '\x0c' | ' ' => self.state = TokenizerState::BeforeAttributeName,
            '/' => self.state = TokenizerState::SelfClosingStartTag,
            '>' => self.emit_current_tag(),
            _ => self.current_tag_name.push(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn before_attribute_name_state(&mut self, c: char) {
        match c {
            '\t' | '\n' | '\x0c' | ' ' => {}
            '/' | '>' => self.reconsume_in(TokenizerState::AfterAttributeName),
            _ => {
                self.current_attr_name.clear();
                self.current_attr_value.clear();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn attribute_name_state(&mut self, c: char) {
        match c {
            '\t' | '\n' | '\x0c' | ' ' | '/' | '>' => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            '=' => self.state = TokenizerState::BeforeAttributeValue,
            _ => self.current_attr_name.push(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn after_attribute_name_state(&mut self, c: char) {
        match c {
            '\t' | '\n' | '\x0c' | ' ' => {}
            '=' => self.state = TokenizerState::BeforeAttributeValue,
            '/' => {
                self.finish_attribute();
                self.state = TokenizerState::SelfClosingStartTag;
            }
            '>' => {
                self.finish_attribute();
                self.emit_current_tag();
            }
            _ => {
                self.finish_attribute();
                self.current_attr_name.clear();
                self.current_attr_value.clear();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn before_attribute_value_state(&mut self, c: char) {
        match c {
            '\t' | '\n' | '\x0c' | ' ' => {}
            '"' => self.state = TokenizerState::AttributeValueDoubleQuoted,
            '\'' => self.state = TokenizerState::AttributeValueSingleQuoted,
            '>' => {
                self.finish_attribute();
                self.emit_current_tag();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36-37 Attribute value (quoted) states](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    fn attribute_value_quoted_state(&mut self, c: char, quote: char) {
        match c {
            _ if c == quote => {
                self.finish_attribute();
                self.state = TokenizerState::AfterAttributeValueQuoted;
            }
            '&' => {
                let decoded = self.consume_character_reference();
                self.current_attr_value.push_str(&decoded);
            }
            _ => self.current_attr_value.push(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn attribute_value_unquoted_state(&mut self, c: char) {
        match c {
            '\t' | '\n' | '\x0c' | ' ' => {
                self.finish_attribute();
                self.state = TokenizerState::BeforeAttributeName;
            }
            '>' => {
                self.finish_attribute();
                self.emit_current_tag();
            }
            '&' => {
                let decoded = self.consume_character_reference();
                self.current_attr_value.push_str(&decoded);
            }
            _ => self.current_attr_value.push(c),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn after_attribute_value_quoted_state(&mut self, c: char) {
        match c {
            '\t' | '\n' | '\x0c' | ' ' => self.state = TokenizerState::BeforeAttributeName,
            '/' => self.state = TokenizerState::SelfClosingStartTag,
            '>' => self.emit_current_tag(),
            _ => self.reconsume_in(TokenizerState::BeforeAttributeName),
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn self_closing_start_tag_state(&mut self, c: char) {
        if c == '>' {
            self.current_self_closing = true;
            self.emit_current_tag();
        } else {
            self.reconsume_in(TokenizerState::BeforeAttributeName);
        }
    }

    /// Move the attribute under construction into the tag's list.
    ///
    /// [§ 13.2.5.33](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    /// "If there is already an attribute on the token with the exact same
    /// name, then this is a duplicate-attribute parse error and the new
    /// attribute must be removed from the token."
    fn finish_attribute(&mut self) {
        if self.current_attr_name.is_empty() {
            return;
        }
        let name = std::mem::take(&mut self.current_attr_name);
        let value = std::mem::take(&mut self.current_attr_value);
        if !self.current_attributes.iter().any(|a| a.name == name) {
            self.current_attributes.push(Attribute { name, value });
        }
    }

    /// Emit the tag under construction and pick the next state.
    fn emit_current_tag(&mut self) {
        self.state = TokenizerState::Data;
        let name = std::mem::take(&mut self.current_tag_name);

        if self.current_is_end_tag {
            self.tokens.push(Token::EndTag { name });
        } else {
            // RAWTEXT feedback: the content of these elements is text until
            // the matching end tag, never markup.
            if name == "script" || name == "style" {
                self.raw_text_tag.clone_from(&name);
                self.state = TokenizerState::RawText;
            }
            self.tokens.push(Token::StartTag {
                name,
                attributes: std::mem::take(&mut self.current_attributes),
                self_closing: self.current_self_closing,
            });
        }
    }

    // ===== Comments and DOCTYPE =====

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn markup_declaration_open_state(&mut self, c: char) {
        if c == '-' && self.peek_char() == Some('-') {
            self.pos += 1;
            self.current_text.clear();
            self.state = TokenizerState::CommentStart;
        } else if c.eq_ignore_ascii_case(&'d') && self.lookahead_matches("octype") {
            self.pos += "octype".len();
            self.state = TokenizerState::Doctype;
        } else {
            self.current_text.clear();
            self.reconsume_in(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn bogus_comment_state(&mut self, c: char) {
        if c == '>' {
            let comment = std::mem::take(&mut self.current_text);
            self.tokens.push(Token::Comment(comment));
            self.state = TokenizerState::Data;
        } else {
            self.current_text.push(c);
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn comment_start_state(&mut self, c: char) {
        match c {
            '-' => self.state = TokenizerState::CommentStartDash,
            '>' => {
                // "abrupt-closing-of-empty-comment parse error"
                self.tokens.push(Token::Comment(String::new()));
                self.state = TokenizerState::Data;
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    fn comment_start_dash_state(&mut self, c: char) {
        match c {
            '-' => self.state = TokenizerState::CommentEnd,
            '>' => {
                self.tokens.push(Token::Comment(String::new()));
                self.state = TokenizerState::Data;
            }
            _ => {
                self.current_text.push('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn comment_state(&mut self, c: char) {
        if c == '-' {
            self.state = TokenizerState::CommentEndDash;
        } else {
            self.current_text.push(c);
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn comment_end_dash_state(&mut self, c: char) {
        if c == '-' {
            self.state = TokenizerState::CommentEnd;
        } else {
            self.current_text.push('-');
            self.reconsume_in(TokenizerState::Comment);
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn comment_end_state(&mut self, c: char) {
        match c {
            '>' => {
                let comment = std::mem::take(&mut self.current_text);
                self.tokens.push(Token::Comment(comment));
                self.state = TokenizerState::Data;
            }
            '-' => self.current_text.push('-'),
            _ => {
                self.current_text.push_str("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn doctype_state(&mut self, c: char) {
        match c {
            '\t' | '\n' | '\x0c' | ' ' => self.state = TokenizerState::BeforeDoctypeName,
            _ => self.reconsume_in(TokenizerState::BeforeDoctypeName),
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    fn before_doctype_name_state(&mut self, c: char) {
        match c {
            '\t' | '\n' | '\x0c' | ' ' => {}
            _ => {
                self.current_text.clear();
                self.current_text.push(c.to_ascii_lowercase());
                self.state = TokenizerState::DoctypeName;
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn doctype_name_state(&mut self, c: char) {
        match c {
            '>' => {
                let name = std::mem::take(&mut self.current_text);
                self.tokens.push(Token::Doctype { name });
                self.state = TokenizerState::Data;
            }
            '\t' | '\n' | '\x0c' | ' ' => {
                let name = std::mem::take(&mut self.current_text);
                self.tokens.push(Token::Doctype { name });
                self.state = TokenizerState::AfterDoctypeName;
            }
            _ => self.current_text.push(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    ///
    /// Public/system identifiers are skipped wholesale; the builder only
    /// cares that a DOCTYPE existed.
    fn after_doctype_name_state(&mut self, c: char) {
        if c == '>' {
            self.state = TokenizerState::Data;
        }
    }

    // ===== Raw text (script/style bodies) =====

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    fn raw_text_state(&mut self, c: char) {
        if c == '<' {
            self.state = TokenizerState::RawTextLessThanSign;
        } else {
            self.tokens.push(Token::Character(c));
        }
    }

    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    fn raw_text_less_than_sign_state(&mut self, c: char) {
        if c == '/' {
            self.raw_end_tag_buffer.clear();
            self.state = TokenizerState::RawTextEndTagOpen;
        } else {
            self.tokens.push(Token::Character('<'));
            self.reconsume_in(TokenizerState::RawText);
        }
    }

    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    fn raw_text_end_tag_open_state(&mut self, c: char) {
        if c.is_ascii_alphabetic() {
            self.reconsume_in(TokenizerState::RawTextEndTagName);
        } else {
            self.tokens.push(Token::Character('<'));
            self.tokens.push(Token::Character('/'));
            self.reconsume_in(TokenizerState::RawText);
        }
    }

    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    ///
    /// "If the current end tag token is an appropriate end tag token" — the
    /// buffered name must match the element whose raw text we are inside;
    /// anything else is just text.
    fn raw_text_end_tag_name_state(&mut self, c: char) {
        let is_appropriate = self.raw_end_tag_buffer.eq_ignore_ascii_case(&self.raw_text_tag);
        match c {
            '>' if is_appropriate => {
                self.tokens.push(Token::EndTag {
                    name: self.raw_text_tag.clone(),
                });
                self.raw_text_tag.clear();
                self.state = TokenizerState::Data;
            }
            _ if c.is_ascii_alphabetic() => {
                self.raw_end_tag_buffer.push(c.to_ascii_lowercase());
            }
            // Not the matching end tag after all: flush "</buffer" as text.
            _ => {
                self.tokens.push(Token::Character('<'));
                self.tokens.push(Token::Character('/'));
                let buffered: Vec<char> = self.raw_end_tag_buffer.chars().collect();
                for ch in buffered {
                    self.tokens.push(Token::Character(ch));
                }
                self.reconsume_in(TokenizerState::RawText);
            }
        }
    }
}
