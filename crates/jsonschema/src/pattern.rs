//! ECMA 262 regular-expression adapter.
//!
//! JSON Schema patterns are specified against ECMA 262 semantics, which
//! differ from `fancy_regex`'s Rust-flavoured syntax in a few character
//! classes. This translates just those differences; `fancy_regex` already
//! supports Unicode property escapes and the inline `(?i)` flag, so nothing
//! further is needed for those.
use std::ops::Index;

use once_cell::sync::Lazy;

static CONTROL_GROUPS_RE: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"\\c[A-Za-z]").expect("valid regex"));

/// Compiles an ECMA 262-flavoured pattern into a [`fancy_regex::Regex`].
#[allow(clippy::result_large_err)]
pub fn convert_regex(pattern: &str) -> Result<fancy_regex::Regex, fancy_regex::Error> {
    let rewritten = CONTROL_GROUPS_RE.replace_all(pattern, replace_control_group);
    let mut out = String::with_capacity(rewritten.len());
    let mut chars = rewritten.chars().peekable();
    while let Some(current) = chars.next() {
        if current == '\\' {
            if let Some(next) = chars.next() {
                match next {
                    'd' => out.push_str("[0-9]"),
                    'D' => out.push_str("[^0-9]"),
                    'w' => out.push_str("[A-Za-z0-9_]"),
                    'W' => out.push_str("[^A-Za-z0-9_]"),
                    's' => out.push_str("[ \t\n\r\u{000b}\u{000c}\u{2003}\u{feff}\u{2029}\u{00a0}]"),
                    'S' => out.push_str("[^ \t\n\r\u{000b}\u{000c}\u{2003}\u{feff}\u{2029}\u{00a0}]"),
                    _ => {
                        out.push(current);
                        out.push(next);
                    }
                }
            } else {
                out.push(current);
            }
        } else {
            out.push(current);
        }
    }
    fancy_regex::Regex::new(&out)
}

#[allow(clippy::arithmetic_side_effects)]
fn replace_control_group(captures: &regex::Captures) -> String {
    ((captures.index(0).trim_start_matches(r"\c").chars().next().expect("guaranteed by the regex rule").to_ascii_uppercase() as u8 - 64) as char)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(r"^[\w\-\.\+]+$", "CC-BY-4.0", true)]
    #[test_case(r"^[\w\-\.\+]+$", "CC-BY-!", false)]
    #[test_case(r"^\W+$", "1_0", false)]
    #[test_case(r"\\w", r"\w", true)]
    fn regex_matches(pattern: &str, text: &str, is_matching: bool) {
        let compiled = convert_regex(pattern).expect("valid regex");
        assert_eq!(compiled.is_match(text).expect("valid pattern"), is_matching);
    }

    #[test]
    fn supports_unicode_property_escapes() {
        let compiled = convert_regex(r"^\p{L}+$").expect("valid regex");
        assert!(compiled.is_match("héllo").unwrap());
        assert!(!compiled.is_match("h3llo").unwrap());
    }

    #[test]
    fn supports_inline_case_insensitive_flag() {
        let compiled = convert_regex(r"(?i)^abc$").expect("valid regex");
        assert!(compiled.is_match("ABC").unwrap());
    }

    #[test_case(r"\")]
    #[test_case(r"\d\")]
    fn invalid_escape_sequences_are_rejected(pattern: &str) {
        assert!(convert_regex(pattern).is_err());
    }
}
