//! Values a caller can bind into a generated script.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A value that can be rendered as literal script text.
///
/// Maps are keyed in sorted order so the same input always renders to the
/// same text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    /// `null` / `undefined` on the script side.
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<LiteralValue>),
    Map(BTreeMap<String, LiteralValue>),
}

impl LiteralValue {
    /// Returns true for the nullish value.
    pub fn is_null(&self) -> bool {
        matches!(self, LiteralValue::Null)
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            LiteralValue::Null => "null",
            LiteralValue::Bool(_) => "boolean",
            LiteralValue::Number(_) => "number",
            LiteralValue::String(_) => "string",
            LiteralValue::List(_) => "list",
            LiteralValue::Map(_) => "map",
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::String(s.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::String(s)
    }
}

impl From<&String> for LiteralValue {
    fn from(s: &String) -> Self {
        LiteralValue::String(s.clone())
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        LiteralValue::Bool(b)
    }
}

impl From<f64> for LiteralValue {
    fn from(n: f64) -> Self {
        LiteralValue::Number(n)
    }
}

impl From<i64> for LiteralValue {
    fn from(n: i64) -> Self {
        LiteralValue::Number(n as f64)
    }
}

impl From<i32> for LiteralValue {
    fn from(n: i32) -> Self {
        LiteralValue::Number(f64::from(n))
    }
}

impl From<u32> for LiteralValue {
    fn from(n: u32) -> Self {
        LiteralValue::Number(f64::from(n))
    }
}

impl<T: Into<LiteralValue>> From<Option<T>> for LiteralValue {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(LiteralValue::Null)
    }
}

impl<T: Into<LiteralValue>> From<Vec<T>> for LiteralValue {
    fn from(items: Vec<T>) -> Self {
        LiteralValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, LiteralValue>> for LiteralValue {
    fn from(map: BTreeMap<String, LiteralValue>) -> Self {
        LiteralValue::Map(map)
    }
}

impl From<serde_json::Value> for LiteralValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => LiteralValue::Null,
            serde_json::Value::Bool(b) => LiteralValue::Bool(b),
            // Every JSON number fits an f64 closely enough for a script literal.
            serde_json::Value::Number(n) => LiteralValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => LiteralValue::String(s),
            serde_json::Value::Array(items) => {
                LiteralValue::List(items.into_iter().map(LiteralValue::from).collect())
            }
            serde_json::Value::Object(map) => LiteralValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, LiteralValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// How a named binding's value is rendered into the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeMode {
    /// Escaped and quoted. The default.
    #[default]
    String,
    /// Inserted verbatim. The caller vouches that the text is already safe.
    Raw,
    /// Stringified without quotes; must be numeric.
    Number,
    /// Stringified without quotes; must be `true` or `false`.
    Boolean,
}

impl EscapeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscapeMode::String => "string",
            EscapeMode::Raw => "raw",
            EscapeMode::Number => "number",
            EscapeMode::Boolean => "boolean",
        }
    }
}

impl fmt::Display for EscapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown escape mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown escape mode '{0}' (expected string, raw, number, or boolean)")]
pub struct ParseEscapeModeError(pub String);

impl FromStr for EscapeMode {
    type Err = ParseEscapeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(EscapeMode::String),
            "raw" => Ok(EscapeMode::Raw),
            "number" => Ok(EscapeMode::Number),
            "boolean" | "bool" => Ok(EscapeMode::Boolean),
            other => Err(ParseEscapeModeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn option_none_is_null() {
        let v: LiteralValue = Option::<String>::None.into();
        assert!(v.is_null());
    }

    #[test]
    fn json_object_converts_recursively() {
        let json = serde_json::json!({"b": [1, "two", null], "a": true});
        let value = LiteralValue::from(json);

        let LiteralValue::Map(map) = value else {
            panic!("expected map");
        };
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            map["b"],
            LiteralValue::List(vec![
                LiteralValue::Number(1.0),
                LiteralValue::String("two".into()),
                LiteralValue::Null,
            ])
        );
    }

    #[rstest]
    #[case::string("string", EscapeMode::String)]
    #[case::raw("raw", EscapeMode::Raw)]
    #[case::number("number", EscapeMode::Number)]
    #[case::boolean("boolean", EscapeMode::Boolean)]
    #[case::bool_alias("bool", EscapeMode::Boolean)]
    fn escape_mode_parses(#[case] input: &str, #[case] expected: EscapeMode) {
        assert_eq!(input.parse::<EscapeMode>(), Ok(expected));
    }

    #[test]
    fn escape_mode_rejects_unknown() {
        let err = "quoted".parse::<EscapeMode>().unwrap_err();
        assert!(err.to_string().contains("quoted"));
    }

    #[test]
    fn default_mode_is_string() {
        assert_eq!(EscapeMode::default(), EscapeMode::String);
    }
}
