//! Pattern rule tables.
//!
//! Each table is an ordered list of `(pattern, message, type, severity)`.
//! A rule reports at most once per script, at the line of its first match.

use std::sync::LazyLock;

use jxscript_types::{FindingType, Severity, ValidationFinding, ValidationResult};
use regex::Regex;

use super::scanner::line_at;

/// Uncompiled rule.
pub(crate) struct RuleSpec {
    pub pattern: &'static str,
    pub message: &'static str,
    pub finding_type: FindingType,
    pub severity: Severity,
}

pub(crate) struct Rule {
    pub pattern: Regex,
    pub message: &'static str,
    pub finding_type: FindingType,
    pub severity: Severity,
}

impl Rule {
    /// First match in `text`, as a finding.
    pub fn check(&self, text: &str) -> Option<ValidationFinding> {
        let found = self.pattern.find(text)?;
        let finding = match self.severity {
            Severity::Error => ValidationFinding::error(self.finding_type, self.message),
            Severity::Warning => ValidationFinding::warning(self.finding_type, self.message),
        };
        Some(finding.at_line(line_at(text, found.start())))
    }
}

const fn error(pattern: &'static str, finding_type: FindingType, message: &'static str) -> RuleSpec {
    RuleSpec {
        pattern,
        message,
        finding_type,
        severity: Severity::Error,
    }
}

const fn warning(pattern: &'static str, finding_type: FindingType, message: &'static str) -> RuleSpec {
    RuleSpec {
        pattern,
        message,
        finding_type,
        severity: Severity::Warning,
    }
}

/// Dynamic execution and output sinks. Runs over stripped code.
pub(crate) const DANGEROUS: &[RuleSpec] = &[
    error(
        r"\beval\s*\(",
        FindingType::Security,
        "eval() executes arbitrary code and is not allowed",
    ),
    error(
        r"\bnew\s+Function\s*\(",
        FindingType::Security,
        "new Function() compiles code at runtime and is not allowed",
    ),
    error(
        r"\bset(?:Timeout|Interval)\s*\(",
        FindingType::Security,
        "setTimeout/setInterval schedule dynamic code and are not allowed",
    ),
    error(
        r"\.(?:inner|outer)HTML\s*=",
        FindingType::Security,
        "Assigning innerHTML/outerHTML is an injection sink",
    ),
    error(
        r"\bdocument\.write(?:ln)?\s*\(",
        FindingType::Security,
        "document.write() is an injection sink",
    ),
    error(
        r"\bconsole\.[A-Za-z]+\s*\(",
        FindingType::Compatibility,
        "console output corrupts the result channel; return data instead of logging it",
    ),
    error(
        r"\bdebugger\b",
        FindingType::Compatibility,
        "debugger statements halt the interpreter",
    ),
];

/// Syntax the target dialect rejects. Runs over stripped code.
pub(crate) const DIALECT: &[RuleSpec] = &[
    error(
        r"=>",
        FindingType::Compatibility,
        "Arrow functions are not supported; use function expressions",
    ),
    error(
        r"\.\.\.\s*[A-Za-z_$\[\{(]",
        FindingType::Compatibility,
        "Spread and rest syntax is not supported",
    ),
    error(
        r"\b(?:var|let|const)\s*[\{\[]",
        FindingType::Compatibility,
        "Destructuring assignment is not supported",
    ),
    error(
        r"(?:^|[^.\w$])class\s+[A-Za-z_$][\w$]*",
        FindingType::Compatibility,
        "Class declarations are not supported; use functions",
    ),
    error(
        r"(?:[^=!<>]=|\breturn)\s*\{\s*[A-Za-z_$][\w$]*\s*[,}]",
        FindingType::Compatibility,
        "Object property shorthand is not supported; write key: value",
    ),
];

/// The most common authoring mistake, checked on its own.
pub(crate) const OBJECT_RETURN: RuleSpec = error(
    r"\breturn\s*\{",
    FindingType::Compatibility,
    "Returning an object literal directly is not supported; return JSON.stringify({...}) instead",
);

/// Escaping heuristics over raw source.
pub(crate) const ESCAPING: &[RuleSpec] = &[
    warning(
        r"\\{3,}",
        FindingType::Escaping,
        "Three or more consecutive backslashes; check for double escaping",
    ),
    warning(
        r#"\.split\(\s*(?:"[^"\n]*\\\\[^"\n]*"|'[^'\n]*\\\\[^'\n]*')"#,
        FindingType::Escaping,
        "Complex escaping inside split(); prefer a regex literal or a named pattern",
    ),
];

/// Uninitialized-variable smell. Runs over stripped code.
pub(crate) const UNDEFINED_TOKEN: RuleSpec = warning(
    r"\bundefined\b",
    FindingType::Compatibility,
    "Literal 'undefined' used; prefer null or a typeof check",
);

/// Collection calls that load every item at once.
pub(crate) const BULK_COLLECTION: &str = r"\.(?:records|contents|everyItem|allRecords)\s*\(\s*\)";

pub(crate) fn compile(specs: &[RuleSpec]) -> Vec<Rule> {
    specs.iter().filter_map(compile_one).collect()
}

pub(crate) fn compile_one(spec: &RuleSpec) -> Option<Rule> {
    match Regex::new(spec.pattern) {
        Ok(pattern) => Some(Rule {
            pattern,
            message: spec.message,
            finding_type: spec.finding_type,
            severity: spec.severity,
        }),
        Err(e) => {
            tracing::error!("validator rule '{}' failed to compile: {}", spec.pattern, e);
            None
        }
    }
}

pub(crate) static DANGEROUS_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| compile(DANGEROUS));
pub(crate) static DIALECT_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| compile(DIALECT));
pub(crate) static ESCAPING_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| compile(ESCAPING));
pub(crate) static OBJECT_RETURN_RULE: LazyLock<Option<Rule>> =
    LazyLock::new(|| compile_one(&OBJECT_RETURN));
pub(crate) static UNDEFINED_RULE: LazyLock<Option<Rule>> =
    LazyLock::new(|| compile_one(&UNDEFINED_TOKEN));
pub(crate) static BULK_RULE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(BULK_COLLECTION).ok());

/// Run every rule in `rules` over `text`.
pub(crate) fn apply(rules: &[Rule], text: &str, result: &mut ValidationResult) {
    for rule in rules {
        if let Some(finding) = rule.check(text) {
            result.push(finding);
        }
    }
}
