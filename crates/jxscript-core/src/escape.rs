//! Value → literal text.
//!
//! [`format_value`] is the one boundary through which caller data enters a
//! generated script. Everything else that interpolates a value goes through
//! it, or through [`escape_search_query`] when the value lands inside the
//! application's search grammar.

use jxscript_types::LiteralValue;

/// Words the target dialect will not accept as binding names.
pub const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "implements", "import", "in", "instanceof", "interface", "let", "new", "null", "package",
    "private", "protected", "public", "return", "static", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with", "yield", "await", "arguments",
    "eval", "undefined", "NaN", "Infinity",
];

/// Characters with meaning in the application's search query grammar.
const SEARCH_SPECIALS: &[char] = &['(', ')', '[', ']', '*', '?'];

/// Escape a string so it can sit between matching quote delimiters.
///
/// Order is part of the contract: backslashes first, then quotes, then
/// control whitespace. NUL is dropped. U+2028/U+2029 are escaped because
/// older engines treat them as line terminators inside literals.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0C}' => out.push_str("\\f"),
            '\u{0B}' => out.push_str("\\v"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            '\0' => {}
            other => out.push(other),
        }
    }
    out
}

/// [`escape`] for optional input. Nullish maps to the empty string.
///
/// Not the same contract as [`format_value`], which renders nullish as `null`.
pub fn escape_nullable(input: Option<&str>) -> String {
    input.map(escape).unwrap_or_default()
}

/// Escape a query for the application's search grammar, then for the literal.
///
/// Parentheses, brackets, `*` and `?` get a backslash at the search level;
/// that backslash is itself escaped by the base pass.
pub fn escape_search_query(query: &str) -> String {
    let mut semantic = String::with_capacity(query.len() + 4);
    for ch in query.chars() {
        if SEARCH_SPECIALS.contains(&ch) {
            semantic.push('\\');
        }
        semantic.push(ch);
    }
    escape(&semantic)
}

/// Render a value as literal script text.
pub fn format_value(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Null => "null".to_string(),
        LiteralValue::Bool(b) => b.to_string(),
        LiteralValue::Number(n) => format_number(*n),
        LiteralValue::String(s) => quote(s),
        LiteralValue::List(items) => {
            let parts: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", parts.join(", "))
        }
        LiteralValue::Map(map) => {
            if map.is_empty() {
                return "{}".to_string();
            }
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), format_value(v)))
                .collect();
            format!("{{ {} }}", parts.join(", "))
        }
    }
}

/// Render a list of strings as an array literal.
///
/// The canonical way to produce text for a `raw` binding.
pub fn format_string_array<S: AsRef<str>>(items: &[S]) -> String {
    let parts: Vec<String> = items.iter().map(|s| quote(s.as_ref())).collect();
    format!("[{}]", parts.join(", "))
}

/// Render a number the way the dialect's `String(n)` would.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        // -0 stringifies as "0"
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        exponential(n)
    } else {
        n.to_string()
    }
}

/// `1e+21`, `1.5e-7`: shortest digits with an explicitly signed exponent.
fn exponential(n: f64) -> String {
    let text = format!("{:e}", n);
    match text.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{}e{}", mantissa, exp),
        Some((mantissa, exp)) => format!("{}e+{}", mantissa, exp),
        None => text,
    }
}

/// Escape and wrap in double quotes.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape(s))
}

/// Whether `name` is usable as an identifier in the target dialect.
///
/// ASCII only: `[A-Za-z_$][A-Za-z0-9_$]*`. Reserved words are checked
/// separately by [`is_reserved_word`].
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Make text that is already written in escaped form safe between double quotes.
///
/// Escape sequences the caller wrote (`\d`, `\"`) pass through untouched.
/// Bare quotes and line terminators are escaped, and a backslash that would
/// swallow a line terminator or the closing quote is doubled, so the result can
/// never end the literal early.
pub fn seal_escaped(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.peek() {
                Some(&next) if !is_line_terminator(next) && next != '\0' => {
                    out.push('\\');
                    out.push(next);
                    chars.next();
                }
                _ => out.push_str("\\\\"),
            },
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            '\0' => {}
            other => out.push(other),
        }
    }
    out
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::BTreeMap;

    #[test]
    fn backslash_escaped_before_quotes() {
        // A quote's escape must not itself be re-escaped.
        assert_eq!(escape(r#"\""#), r#"\\\""#);
    }

    #[test]
    fn quotes_and_whitespace() {
        assert_eq!(escape(r#"He said "hi""#), r#"He said \"hi\""#);
        assert_eq!(escape("it's"), r"it\'s");
        assert_eq!(escape("a\nb\rc\td"), r"a\nb\rc\td");
        assert_eq!(escape("\u{0C}\u{0B}"), r"\f\v");
    }

    #[test]
    fn nul_is_dropped() {
        assert_eq!(escape("a\0b"), "ab");
    }

    #[test]
    fn nullable_is_empty() {
        assert_eq!(escape_nullable(None), "");
        assert_eq!(escape_nullable(Some("x\"")), "x\\\"");
    }

    #[test]
    fn search_query_specials() {
        assert_eq!(escape_search_query("a(b)*"), r"a\\(b\\)\\*");
        assert_eq!(escape_search_query("[x]?"), r"\\[x\\]\\?");
        assert_eq!(escape_search_query("plain"), "plain");
    }

    #[test]
    fn scalars() {
        assert_eq!(format_value(&LiteralValue::Null), "null");
        assert_eq!(format_value(&LiteralValue::Number(42.0)), "42");
        assert_eq!(format_value(&LiteralValue::Number(-1.5)), "-1.5");
        assert_eq!(format_value(&LiteralValue::Bool(true)), "true");
        assert_eq!(format_value(&"x".into()), "\"x\"");
    }

    #[test]
    fn non_finite_numbers() {
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(-0.0), "0");
    }

    #[rstest]
    #[case::large(1e21, "1e+21")]
    #[case::large_fraction(1.5e22, "1.5e+22")]
    #[case::negative_large(-2e25, "-2e+25")]
    #[case::below_threshold(1e20, "100000000000000000000")]
    #[case::small(1e-7, "1e-7")]
    #[case::small_fraction(-2.5e-8, "-2.5e-8")]
    #[case::smallest_fixed(0.000001, "0.000001")]
    #[case::plain(0.5, "0.5")]
    fn number_text_matches_string_conversion(#[case] n: f64, #[case] expected: &str) {
        assert_eq!(format_number(n), expected);
    }

    #[test]
    fn list_and_map() {
        let list = LiteralValue::List(vec![1i64.into(), "a\"b".into(), LiteralValue::Null]);
        assert_eq!(format_value(&list), r#"[1, "a\"b", null]"#);

        let mut map = BTreeMap::new();
        map.insert("k'ey".to_string(), LiteralValue::Bool(false));
        map.insert("a".to_string(), LiteralValue::List(vec![]));
        assert_eq!(
            format_value(&LiteralValue::Map(map)),
            r#"{ "a": [], "k\'ey": false }"#
        );
        assert_eq!(format_value(&LiteralValue::Map(BTreeMap::new())), "{}");
    }

    #[test]
    fn string_array() {
        assert_eq!(format_string_array(&["a", "b\"c"]), r#"["a", "b\"c"]"#);
        assert_eq!(format_string_array::<&str>(&[]), "[]");
    }

    #[test]
    fn identifiers() {
        assert!(is_valid_identifier("recordUuid"));
        assert!(is_valid_identifier("_x1"));
        assert!(is_valid_identifier("$"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1abc"));
        assert!(!is_valid_identifier("a-b"));
        assert!(!is_valid_identifier("a b"));
        assert!(!is_valid_identifier("naïve"));
        assert!(is_reserved_word("class"));
        assert!(!is_reserved_word("klass"));
    }

    #[test]
    fn sealed_keeps_written_escapes() {
        assert_eq!(seal_escaped(r"\\d+\\s"), r"\\d+\\s");
        assert_eq!(seal_escaped(r#"a\"b"#), r#"a\"b"#);
    }

    #[test]
    fn sealed_cannot_close_the_literal() {
        assert_eq!(seal_escaped(r#"say "hi""#), r#"say \"hi\""#);
        // A trailing lone backslash would escape the closing quote.
        assert_eq!(seal_escaped("end\\"), r"end\\");
        assert_eq!(seal_escaped("a\\\nb"), r"a\\\nb");
        assert_eq!(seal_escaped("x\0y"), "xy");
    }
}
