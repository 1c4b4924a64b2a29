//! Escaping laws, checked by reading generated literals back.

use jxscript_core::escape::{escape, escape_search_query, format_value, quote};
use jxscript_core::ScriptBuilder;
use jxscript_testutil::literal::{extract_string_var, parse_string_literal};
use jxscript_types::{EscapeMode, LiteralValue};
use proptest::prelude::*;

fn without_nul(s: &str) -> String {
    s.chars().filter(|c| *c != '\0').collect()
}

fn scalar() -> impl Strategy<Value = LiteralValue> {
    prop_oneof![
        Just(LiteralValue::Null),
        any::<bool>().prop_map(LiteralValue::Bool),
        (-1.0e6f64..1.0e6).prop_map(LiteralValue::Number),
        any::<String>().prop_map(LiteralValue::String),
    ]
}

proptest! {
    #[test]
    fn double_quoted_round_trip(s in any::<String>()) {
        let (value, used) = parse_string_literal(&quote(&s)).unwrap();
        prop_assert_eq!(value, without_nul(&s));
        prop_assert_eq!(used, quote(&s).len());
    }

    #[test]
    fn single_quoted_round_trip(s in any::<String>()) {
        let literal = format!("'{}'", escape(&s));
        let (value, _) = parse_string_literal(&literal).unwrap();
        prop_assert_eq!(value, without_nul(&s));
    }

    #[test]
    fn hostile_text_round_trip(s in r#"[\\"'\n\r\t\x00\u{2028}a${}]{0,40}"#) {
        let (value, _) = parse_string_literal(&quote(&s)).unwrap();
        prop_assert_eq!(value, without_nul(&s));
    }

    #[test]
    fn search_query_reads_back_with_search_escapes(s in "[a-z()\\[\\]*? ]{0,30}") {
        let literal = format!("\"{}\"", escape_search_query(&s));
        let (value, _) = parse_string_literal(&literal).unwrap();
        let mut expected = String::new();
        for ch in s.chars() {
            if "()[]*?".contains(ch) {
                expected.push('\\');
            }
            expected.push(ch);
        }
        prop_assert_eq!(value, expected);
    }

    #[test]
    fn list_formatting_is_compositional(items in prop::collection::vec(scalar(), 0..8)) {
        let parts: Vec<String> = items.iter().map(format_value).collect();
        let expected = format!("[{}]", parts.join(", "));
        prop_assert_eq!(format_value(&LiteralValue::List(items)), expected);
    }

    #[test]
    fn builder_variable_reads_back(s in any::<String>()) {
        let script = ScriptBuilder::new()
            .add_variable("value", s.as_str(), EscapeMode::String)
            .unwrap()
            .build()
            .unwrap();
        prop_assert_eq!(extract_string_var(&script, "value").unwrap(), without_nul(&s));
    }
}

#[test]
fn embedded_quotes_survive_the_builder() {
    let script = ScriptBuilder::new()
        .add_variable("value", r#"He said "hi""#, EscapeMode::String)
        .unwrap()
        .add_code("return JSON.stringify({ value: value });")
        .build()
        .unwrap();
    assert_eq!(extract_string_var(&script, "value").unwrap(), r#"He said "hi""#);
}

#[test]
fn nullish_formats_as_null() {
    assert_eq!(format_value(&LiteralValue::Null), "null");
    assert_eq!(format_value(&LiteralValue::from(None::<String>)), "null");
    assert_eq!(format_value(&42i64.into()), "42");
    assert_eq!(format_value(&true.into()), "true");
}
