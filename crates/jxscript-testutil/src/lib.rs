//! Test utilities for jxscript.
//!
//! - `tests/validator/*.test`: script cases with expected findings
//! - [`literal`]: a tiny interpreter for string literals and `var` declarations,
//!   used to check that escaped values read back exactly

pub mod literal;
pub mod validator;

use std::fmt;

/// The result of running a single test case.
#[derive(Debug, Clone)]
pub enum TestResult {
    Pass,
    Fail { expected: String, actual: String },
    /// The case itself is malformed.
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, TestResult::Fail { .. })
    }
}

/// Summary of running multiple test cases.
#[derive(Debug, Default)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub failures: Vec<TestFailure>,
}

/// A single test failure with context.
#[derive(Debug, Clone)]
pub struct TestFailure {
    pub name: String,
    pub line: usize,
    pub result: TestResult,
}

impl TestSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, line: usize, result: TestResult) {
        match &result {
            TestResult::Pass => self.passed += 1,
            TestResult::Fail { .. } | TestResult::Error { .. } => {
                if result.is_fail() {
                    self.failed += 1;
                } else {
                    self.errors += 1;
                }
                self.failures.push(TestFailure {
                    name: name.into(),
                    line,
                    result,
                });
            }
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errors
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{}", "═".repeat(60))?;
        writeln!(f, "Validator cases: {} total", self.total())?;
        writeln!(
            f,
            "  ✓ {} passed  ✗ {} failed  ⚠ {} errors",
            self.passed, self.failed, self.errors
        )?;

        for failure in &self.failures {
            writeln!(f, "\n  {} (line {})", failure.name, failure.line)?;
            match &failure.result {
                TestResult::Fail { expected, actual } => {
                    writeln!(f, "    expected: {}", expected)?;
                    for line in actual.lines() {
                        writeln!(f, "    | {}", line)?;
                    }
                }
                TestResult::Error { message } => writeln!(f, "    error: {}", message)?,
                TestResult::Pass => {}
            }
        }
        writeln!(f, "{}", "═".repeat(60))
    }
}
