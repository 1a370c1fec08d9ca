//! Selector string parsing.
//!
//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! "The grammar of Selectors is defined in terms of CSS syntax."
//!
//! Supports the grammar the clipping workflow meets:
//! - Type selectors: `div`, `input`
//! - Class selectors: `.row`
//! - ID selectors: `#app`
//! - Universal selector: `*`
//! - Attribute selectors: `[name]`, `[name="email"]`, `~=`, `|=`, `^=`, `$=`, `*=`
//! - Structural pseudo-classes incl. the integer form of `:nth-of-type()`
//! - Compound selectors: `li.row:nth-of-type(2)`
//! - Complex selectors with all four combinators
//!
//! Identifiers may contain CSS escapes (`\31 st`, `a\.b`) — the generator
//! escapes everything it emits, so the parser must be able to read its own
//! output back. Returns `None` for selectors outside this grammar.

use std::iter::Peekable;
use std::str::Chars;

use crate::model::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, ParsedSelector, PseudoClass,
    SimpleSelector,
};

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

/// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
///
/// "If the next input code point is a hex digit, consume as many hex digits
/// as possible, but no more than 5 [6 total]... If the next input code point
/// is whitespace, consume it as well."
///
/// The leading backslash has already been consumed. Returns `None` for an
/// escape the grammar forbids (backslash-newline or backslash-EOF).
fn consume_escape(chars: &mut Peekable<Chars<'_>>) -> Option<char> {
    let &first = chars.peek()?;

    if first.is_ascii_hexdigit() {
        let mut hex = String::new();
        while hex.len() < 6 && chars.peek().is_some_and(char::is_ascii_hexdigit) {
            hex.push(chars.next()?);
        }
        if chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            let _ = chars.next();
        }
        let code_point = u32::from_str_radix(&hex, 16).ok()?;
        // "...zero, or a surrogate, or greater than the maximum allowed code
        // point, return U+FFFD."
        Some(char::from_u32(code_point).unwrap_or('\u{FFFD}'))
    } else if first == '\n' {
        None
    } else {
        chars.next()
    }
}

/// Collect an identifier, decoding CSS escapes as they appear.
fn collect_ident(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let mut ident = String::new();

    loop {
        match chars.peek() {
            Some(&c) if is_ident_char(c) => {
                ident.push(c);
                let _ = chars.next();
            }
            Some('\\') => {
                let _ = chars.next();
                ident.push(consume_escape(chars)?);
            }
            _ => break,
        }
    }

    Some(ident)
}

/// Parse an attribute value inside `[attr=value]`.
/// Handles both quoted (`"val"`, `'val'`) and unquoted ident values.
fn parse_attr_value(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    // Skip whitespace before value
    while chars.peek().is_some_and(|&ch| ch.is_ascii_whitespace()) {
        let _ = chars.next();
    }

    match chars.peek() {
        Some(&q @ ('"' | '\'')) => {
            let _ = chars.next(); // consume opening quote
            let mut val = String::new();
            while let Some(ch) = chars.next() {
                match ch {
                    c if c == q => return Some(val),
                    '\\' => val.push(consume_escape(chars)?),
                    c => val.push(c),
                }
            }
            None // unterminated string
        }
        Some(_) => {
            let val = collect_ident(chars)?;
            if val.is_empty() { None } else { Some(val) }
        }
        None => None,
    }
}

/// Parse one attribute selector after the opening `[`.
fn parse_attribute(chars: &mut Peekable<Chars<'_>>) -> Option<AttributeSelector> {
    // Skip whitespace inside brackets
    while chars.peek().is_some_and(|&ch| ch.is_ascii_whitespace()) {
        let _ = chars.next();
    }

    let attr_name = collect_ident(chars)?;
    if attr_name.is_empty() {
        return None;
    }

    while chars.peek().is_some_and(|&ch| ch.is_ascii_whitespace()) {
        let _ = chars.next();
    }

    // What follows: ']', '=', or one of '~= |= ^= $= *='
    let selector = match chars.peek() {
        Some(']') => {
            let _ = chars.next();
            return Some(AttributeSelector::Exists(attr_name));
        }
        Some('=') => {
            let _ = chars.next();
            AttributeSelector::Equals(attr_name, parse_attr_value(chars)?)
        }
        Some(&op @ ('~' | '|' | '^' | '$' | '*')) => {
            let _ = chars.next();
            if chars.next() != Some('=') {
                return None;
            }
            let val = parse_attr_value(chars)?;
            match op {
                '~' => AttributeSelector::Includes(attr_name, val),
                '|' => AttributeSelector::DashMatch(attr_name, val),
                '^' => AttributeSelector::PrefixMatch(attr_name, val),
                '$' => AttributeSelector::SuffixMatch(attr_name, val),
                _ => AttributeSelector::SubstringMatch(attr_name, val),
            }
        }
        _ => return None,
    };

    while chars.peek().is_some_and(|&ch| ch.is_ascii_whitespace()) {
        let _ = chars.next();
    }
    if chars.next() != Some(']') {
        return None;
    }

    Some(selector)
}

/// Parse a pseudo-class or pseudo-element after the first `:`.
///
/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
/// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
///
/// Unknown names degrade to [`SimpleSelector::NeverMatch`] — presence of an
/// unsupported pseudo must not make the whole selector unparseable.
fn parse_pseudo(chars: &mut Peekable<Chars<'_>>) -> Option<SimpleSelector> {
    // '::' marks a pseudo-element
    let is_pseudo_element = chars.peek() == Some(&':');
    if is_pseudo_element {
        let _ = chars.next();
    }

    let pseudo_name = collect_ident(chars)?;
    if pseudo_name.is_empty() {
        return None;
    }

    // If followed by '(', consume the balanced argument text.
    let mut argument: Option<String> = None;
    if chars.peek() == Some(&'(') {
        let _ = chars.next();
        let mut depth = 1u32;
        let mut arg = String::new();
        for ch in chars.by_ref() {
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            arg.push(ch);
        }
        if depth != 0 {
            return None; // unbalanced parentheses
        }
        argument = Some(arg);
    }

    if is_pseudo_element {
        // We never render ::before, ::after, etc.
        return Some(SimpleSelector::NeverMatch);
    }

    let pseudo = match pseudo_name.to_ascii_lowercase().as_str() {
        "root" => PseudoClass::Root,
        "first-child" => PseudoClass::FirstChild,
        "last-child" => PseudoClass::LastChild,
        "first-of-type" => PseudoClass::FirstOfType,
        "last-of-type" => PseudoClass::LastOfType,
        "only-child" => PseudoClass::OnlyChild,
        "empty" => PseudoClass::Empty,
        "disabled" => PseudoClass::Disabled,
        "enabled" => PseudoClass::Enabled,

        // Only the integer form the generator emits; `an+b` notation and
        // `odd`/`even` degrade to NeverMatch like other functional pseudos.
        "nth-of-type" => {
            return Some(argument.as_deref().map_or(
                SimpleSelector::NeverMatch,
                |arg| match arg.trim().parse::<usize>() {
                    Ok(n) if n > 0 => SimpleSelector::PseudoClass(PseudoClass::NthOfType(n)),
                    _ => SimpleSelector::NeverMatch,
                },
            ));
        }

        // Interactive states, :nth-child, :not, :is, :where, :has, unknown
        _ => return Some(SimpleSelector::NeverMatch),
    };

    Some(SimpleSelector::PseudoClass(pseudo))
}

/// Parse a raw selector string into a [`ParsedSelector`].
///
/// Returns `None` for syntax outside the supported grammar. Callers treat
/// that as "matches nothing" rather than an error.
#[must_use]
pub fn parse_selector(raw: &str) -> Option<ParsedSelector> {
    /// Flush the current identifier as a type selector into the compound.
    fn flush_ident(ident: &mut String, compound: &mut Vec<SimpleSelector>) {
        if !ident.is_empty() {
            compound.push(SimpleSelector::Type(ident.clone()));
            ident.clear();
        }
    }

    /// Flush the current compound selector into the compounds list.
    /// Returns true if a non-empty compound was flushed.
    fn flush_compound(
        ident: &mut String,
        compound: &mut Vec<SimpleSelector>,
        compounds: &mut Vec<CompoundSelector>,
    ) -> bool {
        flush_ident(ident, compound);
        if compound.is_empty() {
            return false;
        }
        compounds.push(CompoundSelector {
            simple_selectors: std::mem::take(compound),
        });
        true
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    // "A complex selector is a chain of one or more compound selectors
    // separated by combinators."
    //
    // Parse left-to-right, collecting compounds and the combinators between
    // them; afterwards the rightmost compound becomes the subject.
    let mut compounds: Vec<CompoundSelector> = Vec::new();
    let mut combinators_between: Vec<Combinator> = Vec::new();

    let mut chars = trimmed.chars().peekable();
    let mut current_compound: Vec<SimpleSelector> = Vec::new();
    let mut current_ident = String::new();

    while let Some(c) = chars.next() {
        match c {
            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            '.' => {
                flush_ident(&mut current_ident, &mut current_compound);
                let class_name = collect_ident(&mut chars)?;
                if class_name.is_empty() {
                    return None;
                }
                current_compound.push(SimpleSelector::Class(class_name));
            }

            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            '#' => {
                flush_ident(&mut current_ident, &mut current_compound);
                let id = collect_ident(&mut chars)?;
                if id.is_empty() {
                    return None;
                }
                current_compound.push(SimpleSelector::Id(id));
            }

            // [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
            '*' => {
                flush_ident(&mut current_ident, &mut current_compound);
                current_compound.push(SimpleSelector::Universal);
            }

            // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
            //
            // Whitespace may be the descendant combinator, or padding around
            // an explicit combinator — look ahead to decide.
            ' ' | '\t' | '\n' | '\r' => {
                // Skip leading whitespace
                if current_ident.is_empty() && current_compound.is_empty() && compounds.is_empty() {
                    continue;
                }

                while chars.peek().is_some_and(|&ch| ch.is_ascii_whitespace()) {
                    let _ = chars.next();
                }

                match chars.peek() {
                    // Trailing whitespace
                    None => {
                        let _ = flush_compound(
                            &mut current_ident,
                            &mut current_compound,
                            &mut compounds,
                        );
                    }

                    // Explicit combinator follows; its own arm flushes.
                    Some('>' | '+' | '~') => {
                        flush_ident(&mut current_ident, &mut current_compound);
                    }

                    // "A descendant combinator is whitespace that separates
                    // two compound selectors."
                    Some(_) => {
                        if !flush_compound(
                            &mut current_ident,
                            &mut current_compound,
                            &mut compounds,
                        ) {
                            continue;
                        }
                        combinators_between.push(Combinator::Descendant);
                    }
                }
            }

            // [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
            '>' => {
                if !flush_compound(&mut current_ident, &mut current_compound, &mut compounds) {
                    return None; // '>' without a left-hand side
                }
                while chars.peek().is_some_and(|&ch| ch.is_ascii_whitespace()) {
                    let _ = chars.next();
                }
                combinators_between.push(Combinator::Child);
            }

            // [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
            '+' => {
                if !flush_compound(&mut current_ident, &mut current_compound, &mut compounds) {
                    return None;
                }
                while chars.peek().is_some_and(|&ch| ch.is_ascii_whitespace()) {
                    let _ = chars.next();
                }
                combinators_between.push(Combinator::NextSibling);
            }

            // [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
            '~' => {
                if !flush_compound(&mut current_ident, &mut current_compound, &mut compounds) {
                    return None;
                }
                while chars.peek().is_some_and(|&ch| ch.is_ascii_whitespace()) {
                    let _ = chars.next();
                }
                combinators_between.push(Combinator::SubsequentSibling);
            }

            // [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
            ':' => {
                flush_ident(&mut current_ident, &mut current_compound);
                current_compound.push(parse_pseudo(&mut chars)?);
            }

            // [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
            '[' => {
                flush_ident(&mut current_ident, &mut current_compound);
                current_compound.push(SimpleSelector::Attribute(parse_attribute(&mut chars)?));
            }

            // CSS escape opening a type selector (`\31 23` etc.)
            '\\' => {
                current_ident.push(consume_escape(&mut chars)?);
            }

            // Identifier characters - part of a type selector
            _ if current_ident.is_empty() && (is_ident_start_char(c) || c == '-') => {
                current_ident.push(c);
            }
            _ if !current_ident.is_empty() && is_ident_char(c) => {
                current_ident.push(c);
            }

            // Unsupported selector syntax
            _ => {
                return None;
            }
        }
    }

    // Flush the final compound selector
    let _ = flush_compound(&mut current_ident, &mut current_compound, &mut compounds);

    if compounds.is_empty() {
        return None;
    }

    // "A B C" has 3 compounds and 2 combinators — anything else is malformed.
    if compounds.len() != combinators_between.len() + 1 {
        return None;
    }

    // [§ 4.3](https://www.w3.org/TR/selectors-4/#complex)
    // "The elements represented by a complex selector are the elements
    // matched by the last compound selector in the complex selector."
    let subject = compounds.pop()?;

    // Build the chain in right-to-left order so matching walks up from the
    // subject: for "A > B C" → [(Descendant, B), (Child, A)].
    let mut combinator_chain = Vec::new();
    for (compound, combinator) in compounds
        .into_iter()
        .zip(combinators_between.into_iter())
        .rev()
    {
        combinator_chain.push((combinator, compound));
    }

    let complex = ComplexSelector {
        subject,
        combinators: combinator_chain,
    };

    // [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    let specificity = complex.calculate_specificity();

    Some(ParsedSelector {
        complex,
        specificity,
    })
}
