//! CSS identifier and string escaping.
//!
//! Every identifier fragment the generator interpolates into a selector
//! (ids, names, classes) passes through these transforms first, so the
//! produced selector is syntactically valid by construction — a correctness
//! invariant, not a runtime-checked error.
//!
//! Implements [CSSOM § 2.1](https://drafts.csswg.org/cssom/#common-serializing-idioms).

/// [CSSOM serialize an identifier](https://drafts.csswg.org/cssom/#serialize-an-identifier)
///
/// "To serialize an identifier means to create a string represented by the
/// concatenation of, for each character of the identifier:"
///
/// The result is safe to interpolate after `#` or `.` in a selector.
#[must_use]
pub fn escape_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let chars: Vec<char> = ident.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            // "If the character is NULL (U+0000), then the REPLACEMENT
            // CHARACTER (U+FFFD)."
            '\0' => out.push('\u{FFFD}'),

            // "If the character is in the range [\1-\1f] or is U+007F,
            // then the character escaped as code point."
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_code_point_escape(&mut out, c),

            // "If the character is the first character and is in the range
            // [0-9], then the character escaped as code point."
            '0'..='9' if i == 0 => push_code_point_escape(&mut out, c),

            // "If the character is the second character and is in the range
            // [0-9] and the first character is a '-', then the character
            // escaped as code point."
            '0'..='9' if i == 1 && chars[0] == '-' => push_code_point_escape(&mut out, c),

            // "If the character is the first character and is a '-', and
            // there is no second character, then the escaped character."
            '-' if i == 0 && chars.len() == 1 => {
                out.push('\\');
                out.push('-');
            }

            // "If the character is not handled by one of the above rules and
            // is greater than or equal to U+0080, is '-' or '_', or is in one
            // of the ranges [0-9], [A-Z], or [a-z], then the character itself."
            _ if c >= '\u{80}' || c == '-' || c == '_' || c.is_ascii_alphanumeric() => {
                out.push(c);
            }

            // "Otherwise, the escaped character."
            _ => {
                out.push('\\');
                out.push(c);
            }
        }
    }

    out
}

/// [CSSOM serialize a string](https://drafts.csswg.org/cssom/#serialize-a-string)
///
/// "To serialize a string means to create a string represented by '"'...":
///  - If the character is NULL, then the REPLACEMENT CHARACTER.
///  - If the character is in the range [\1-\1f] or is U+007F, the character
///    escaped as code point.
///  - If the character is '"' or '\', the escaped character."
///
/// The surrounding quotes are NOT added here; the caller interpolates the
/// result inside `[name="..."]`.
#[must_use]
pub fn escape_attribute_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_code_point_escape(&mut out, c),
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}

/// "...escaped as code point means a '\', followed by the code point in
/// hexadecimal, followed by a single SPACE."
fn push_code_point_escape(out: &mut String, c: char) {
    out.push_str(&format!("\\{:x} ", c as u32));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ident_unchanged() {
        assert_eq!(escape_ident("nav-item"), "nav-item");
        assert_eq!(escape_ident("_private"), "_private");
        assert_eq!(escape_ident("checkout2"), "checkout2");
    }

    #[test]
    fn test_leading_digit_code_point_escaped() {
        assert_eq!(escape_ident("1st"), "\\31 st");
    }

    #[test]
    fn test_hyphen_digit_code_point_escaped() {
        assert_eq!(escape_ident("-1st"), "-\\31 st");
    }

    #[test]
    fn test_lone_hyphen_escaped() {
        assert_eq!(escape_ident("-"), "\\-");
    }

    #[test]
    fn test_special_characters_backslash_escaped() {
        assert_eq!(escape_ident("a.b"), "a\\.b");
        assert_eq!(escape_ident("a:b"), "a\\:b");
        assert_eq!(escape_ident("a b"), "a\\ b");
        assert_eq!(escape_ident("a#b"), "a\\#b");
    }

    #[test]
    fn test_null_replaced() {
        assert_eq!(escape_ident("a\0b"), "a\u{FFFD}b");
    }

    #[test]
    fn test_control_character_code_point_escaped() {
        assert_eq!(escape_ident("a\u{1}b"), "a\\1 b");
    }

    #[test]
    fn test_non_ascii_unchanged() {
        assert_eq!(escape_ident("café"), "café");
    }

    #[test]
    fn test_attribute_value_quotes_and_backslash() {
        assert_eq!(escape_attribute_value(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_attribute_value(r"a\b"), r"a\\b");
    }
}
