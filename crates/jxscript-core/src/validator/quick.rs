//! Pre-flight check: only the patterns that always break execution.

use jxscript_types::QuickValidation;

use super::dependencies::{defined_names, free_calls};
use super::rules;
use super::scanner;

pub(super) fn run(script: &str, critical_helpers: &[String]) -> QuickValidation {
    let stripped = scanner::strip(script);
    let mut issues = Vec::new();

    if script.contains("${") {
        issues.push("Contains '${', template interpolation is not supported".to_string());
    }

    if stripped.code.contains("console.") {
        issues.push("Contains console output, which corrupts the result".to_string());
    }

    if rules::OBJECT_RETURN_RULE
        .as_ref()
        .is_some_and(|rule| rule.pattern.is_match(&stripped.code))
    {
        issues.push("Returns an object literal directly; wrap it in JSON.stringify()".to_string());
    }

    let defined = defined_names(&stripped.code);
    for call in free_calls(&stripped.code) {
        if critical_helpers.iter().any(|h| *h == call.name) && !defined.contains(&call.name) {
            issues.push(format!(
                "Helper '{}' is called but not defined (line {})",
                call.name, call.line
            ));
        }
    }

    QuickValidation::from_issues(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CRITICAL_HELPERS;

    fn quick(script: &str) -> QuickValidation {
        let helpers: Vec<String> = DEFAULT_CRITICAL_HELPERS.iter().map(|s| s.to_string()).collect();
        run(script, &helpers)
    }

    #[test]
    fn clean_script_passes() {
        let result = quick("(function () { return JSON.stringify({ ok: true }); })();");
        assert!(result.valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn each_issue_is_reported() {
        let script = "var a = `${x}`;\nconsole.log(a);\nreturn { a: 1 };\ngetRecord(1);";
        let result = quick(script);
        assert!(!result.valid);
        assert_eq!(result.issues.len(), 4, "{:?}", result.issues);
    }

    #[test]
    fn defined_helper_is_fine() {
        let script = "function safeGet(o, k) { return o[k]; }\nsafeGet(a, \"b\");";
        assert!(quick(script).valid);
    }

    #[test]
    fn console_in_string_is_fine() {
        assert!(quick("var s = \"console.log\";").valid);
    }

    #[test]
    fn non_critical_undefined_call_is_ignored() {
        assert!(quick("somethingElse();").valid);
    }
}
