//! Function-dependency analysis.
//!
//! Finds identifiers called as free functions that the script never defines
//! and the host does not provide. There is no symbol table or scope graph
//! here: definitions are `function name(`, `var|let|const name = function`,
//! and function parameters, collected script-wide.
//!
//! This is a heuristic. It over-reports when a function is reached through a
//! variable assigned something other than a function expression (for
//! example `var f = pick(a, b); f();`), and under-reports when a name is
//! defined in one function and called from an unrelated scope. Run it over
//! stripped code only, or words inside strings will be taken for calls.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::scanner::line_at;
use super::symbols::KnownSymbols;

static FUNCTION_DECL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bfunction\s+([A-Za-z_$][\w$]*)\s*\(").ok());

static FUNCTION_ASSIGN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b(?:var|let|const)\s+([A-Za-z_$][\w$]*)\s*=\s*function\b").ok()
});

static FUNCTION_PARAMS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bfunction\b[^(]*\(([^)]*)\)").ok());

static CALL_SITE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_$][\w$]*)\s*\(").ok());

/// A free call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub name: String,
    pub line: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Every name the script defines as a function or parameter.
pub fn defined_names(code: &str) -> HashSet<String> {
    let mut names = HashSet::new();

    for re in [&*FUNCTION_DECL, &*FUNCTION_ASSIGN].into_iter().flatten() {
        for caps in re.captures_iter(code) {
            if let Some(name) = caps.get(1) {
                names.insert(name.as_str().to_string());
            }
        }
    }

    if let Some(re) = FUNCTION_PARAMS.as_ref() {
        for caps in re.captures_iter(code) {
            let Some(params) = caps.get(1) else { continue };
            for param in params.as_str().split(',') {
                let param = param.trim();
                if !param.is_empty() && param.chars().all(is_ident_char) {
                    names.insert(param.to_string());
                }
            }
        }
    }

    names
}

/// Call sites of free functions: not member calls, not keywords, not the
/// name in a `function name(` declaration. First occurrence per name.
pub fn free_calls(code: &str) -> Vec<CallSite> {
    let Some(re) = CALL_SITE.as_ref() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut calls = Vec::new();

    for caps in re.captures_iter(code) {
        let Some(name) = caps.get(1) else { continue };
        let before = &code[..name.start()];

        // Mid-identifier match (e.g. a digit-led token); not a call site.
        if before.chars().last().is_some_and(is_ident_char) {
            continue;
        }

        let preceding = before.trim_end();
        if preceding.ends_with('.') {
            continue;
        }
        if preceding.ends_with("function")
            && preceding[..preceding.len() - "function".len()]
                .chars()
                .last()
                .is_none_or(|c| !is_ident_char(c))
        {
            continue;
        }

        let name_str = name.as_str();
        if KnownSymbols::is_keyword(name_str) {
            continue;
        }
        if seen.insert(name_str.to_string()) {
            calls.push(CallSite {
                name: name_str.to_string(),
                line: line_at(code, name.start()),
            });
        }
    }

    calls
}

/// Calls with no definition in the script and no entry in `known`.
pub fn undefined_calls(code: &str, known: &KnownSymbols) -> Vec<CallSite> {
    let defined = defined_names(code);
    free_calls(code)
        .into_iter()
        .filter(|call| !defined.contains(&call.name) && !known.is_bound(&call.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::scanner::strip;

    fn missing(source: &str) -> Vec<String> {
        let stripped = strip(source);
        undefined_calls(&stripped.code, &KnownSymbols::host())
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    #[test]
    fn declared_functions_are_defined() {
        let code = "function a(x, y) {}\nvar b = function () {};\nconst c = function named() {};";
        let names = defined_names(code);
        for expected in ["a", "b", "c", "named", "x", "y"] {
            assert!(names.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn reports_undefined_call() {
        assert_eq!(missing("var r = lookupThing(1);"), vec!["lookupThing"]);
    }

    #[test]
    fn defined_and_builtin_calls_are_fine() {
        let source = r#"
function helper(cb) { return cb(); }
var n = parseInt("4", 10);
var app = Application("Finder");
helper(function () { return String(n); });
"#;
        assert!(missing(source).is_empty(), "{:?}", missing(source));
    }

    #[test]
    fn member_calls_are_not_free_calls() {
        assert!(missing("record.name(); app . databases ();").is_empty());
    }

    #[test]
    fn keywords_are_not_calls() {
        assert!(missing("if (a) { while (b) { switch (c) {} } } for (;;) {}").is_empty());
    }

    #[test]
    fn words_inside_strings_are_ignored() {
        assert!(missing(r#"var s = "call functionName()";"#).is_empty());
        assert!(missing("var s = 'run helper(x)';").is_empty());
    }

    #[test]
    fn declaration_name_is_not_a_call() {
        let calls = free_calls("function orphan() {}");
        assert!(calls.is_empty());
    }

    #[test]
    fn first_occurrence_line() {
        let calls = free_calls("\n\nfoo();\nfoo();");
        assert_eq!(
            calls,
            vec![CallSite {
                name: "foo".into(),
                line: 3
            }]
        );
    }

    #[test]
    fn injected_symbols_suppress_reports() {
        let stripped = strip("customBridge(1);");
        let known = KnownSymbols::host().with(["customBridge"]);
        assert!(undefined_calls(&stripped.code, &known).is_empty());
    }
}
