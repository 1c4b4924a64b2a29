//! Validator case files.
//!
//! Format:
//!
//! ```text
//! # test: arrow_function
//! # expect: invalid
//! ---
//! var f = function () { return [1].map((x) => x); };
//! ---
//! error: compatibility: Arrow functions
//! !error: security
//! ===
//! ```
//!
//! `# expect:` is `valid` or `invalid` and is checked against
//! `ValidationResult::valid`. Each expectation line is
//! `<severity>: <type>[: <message substring>]` or `suggestion: <substring>`;
//! a leading `!` asserts that no such finding exists.

use jxscript_core::validator::Validator;
use jxscript_types::{Severity, ValidationResult};

use crate::{TestResult, TestSummary};

/// One case from a `.test` file.
#[derive(Debug, Clone)]
pub struct ValidatorTestCase {
    pub name: String,
    /// Line of the `# test:` header (1-indexed).
    pub line_number: usize,
    pub script: String,
    pub expect_valid: bool,
    pub expectations: Vec<Expectation>,
}

/// One expected (or forbidden) finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    pub negated: bool,
    pub kind: ExpectedKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedKind {
    Finding {
        severity: Severity,
        finding_type: String,
        contains: String,
    },
    Suggestion {
        contains: String,
    },
}

impl Expectation {
    /// Parse one expectation line. `None` when the line is not one.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (negated, line) = match line.strip_prefix('!') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, line),
        };
        let (head, rest) = line.split_once(':')?;
        let rest = rest.trim();

        let kind = match head.trim() {
            "suggestion" => ExpectedKind::Suggestion {
                contains: rest.to_string(),
            },
            "error" | "warning" => {
                let severity = if head.trim() == "error" {
                    Severity::Error
                } else {
                    Severity::Warning
                };
                let (finding_type, contains) = match rest.split_once(':') {
                    Some((t, c)) => (t.trim(), c.trim()),
                    None => (rest, ""),
                };
                ExpectedKind::Finding {
                    severity,
                    finding_type: finding_type.to_string(),
                    contains: contains.to_string(),
                }
            }
            _ => return None,
        };

        Some(Self { negated, kind })
    }

    fn matches(&self, result: &ValidationResult) -> bool {
        let found = match &self.kind {
            ExpectedKind::Finding {
                severity,
                finding_type,
                contains,
            } => result.findings().any(|f| {
                f.severity == *severity
                    && f.finding_type.as_str() == finding_type
                    && f.message.contains(contains.as_str())
            }),
            ExpectedKind::Suggestion { contains } => {
                result.suggestions.iter().any(|s| s.contains(contains.as_str()))
            }
        };
        found != self.negated
    }

    fn describe(&self) -> String {
        let body = match &self.kind {
            ExpectedKind::Finding {
                severity,
                finding_type,
                contains,
            } => format!("{}: {}: {}", severity, finding_type, contains),
            ExpectedKind::Suggestion { contains } => format!("suggestion: {}", contains),
        };
        if self.negated {
            format!("no {}", body)
        } else {
            body
        }
    }
}

/// Parse the `.test` format into cases.
pub fn parse_validator_tests(content: &str) -> Vec<ValidatorTestCase> {
    let mut cases = Vec::new();
    let lines: Vec<&str> = content.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let Some(name) = lines[i].trim().strip_prefix("# test:") else {
            i += 1;
            continue;
        };
        let name = name.trim().to_string();
        let start_line = i + 1;
        i += 1;

        let mut expect_valid = true;
        if let Some(expect) = lines.get(i).and_then(|l| l.trim().strip_prefix("# expect:")) {
            expect_valid = expect.trim() != "invalid";
            i += 1;
        }

        while i < lines.len() && lines[i].trim() != "---" {
            i += 1;
        }
        i += 1;

        let mut script_lines = Vec::new();
        while i < lines.len() && lines[i].trim() != "---" {
            script_lines.push(lines[i]);
            i += 1;
        }
        i += 1;

        let mut expectations = Vec::new();
        while i < lines.len() && lines[i].trim() != "===" {
            if let Some(expectation) = Expectation::parse(lines[i]) {
                expectations.push(expectation);
            }
            i += 1;
        }
        i += 1;

        cases.push(ValidatorTestCase {
            name,
            line_number: start_line,
            script: script_lines.join("\n"),
            expect_valid,
            expectations,
        });
    }

    cases
}

impl ValidatorTestCase {
    pub fn run(&self, validator: &Validator) -> TestResult {
        if self.script.trim().is_empty() {
            return TestResult::Error {
                message: "case has no script".to_string(),
            };
        }

        let result = validator.validate(&self.script);

        if result.valid != self.expect_valid {
            return TestResult::Fail {
                expected: if self.expect_valid { "valid" } else { "invalid" }.to_string(),
                actual: result.to_string(),
            };
        }

        for expectation in &self.expectations {
            if !expectation.matches(&result) {
                return TestResult::Fail {
                    expected: expectation.describe(),
                    actual: result.to_string(),
                };
            }
        }

        TestResult::Pass
    }
}

/// Run every case with the default validator.
pub fn run_validator_tests(cases: &[ValidatorTestCase]) -> TestSummary {
    let validator = Validator::new();
    let mut summary = TestSummary::new();
    for case in cases {
        summary.record(&case.name, case.line_number, case.run(&validator));
    }
    summary
}
