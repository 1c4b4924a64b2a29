//! Validation findings and the results that carry them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of problem a finding describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingType {
    /// The script would not parse at all.
    Syntax,
    /// Probable corruption of a literal boundary. Heuristic.
    Escaping,
    /// Valid host syntax the target dialect rejects, or a runtime-breaking idiom.
    Compatibility,
    /// A dynamic-execution or injection sink.
    Security,
}

impl FindingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingType::Syntax => "syntax",
            FindingType::Escaping => "escaping",
            FindingType::Compatibility => "compatibility",
            FindingType::Security => "security",
        }
    }
}

impl fmt::Display for FindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity level for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Do not execute.
    Error,
    /// Execute, but record for review.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One diagnostic produced by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    #[serde(rename = "type")]
    pub finding_type: FindingType,
    pub message: String,
    /// 1-based line number, when the location is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub severity: Severity,
}

impl ValidationFinding {
    pub fn error(finding_type: FindingType, message: impl Into<String>) -> Self {
        Self {
            finding_type,
            message: message.into(),
            line: None,
            severity: Severity::Error,
        }
    }

    pub fn warning(finding_type: FindingType, message: impl Into<String>) -> Self {
        Self {
            finding_type,
            message: message.into(),
            line: None,
            severity: Severity::Warning,
        }
    }

    /// Attach a line number.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(
                f,
                "{} [{}] line {}: {}",
                self.severity, self.finding_type, line, self.message
            ),
            None => write!(f, "{} [{}]: {}", self.severity, self.finding_type, self.message),
        }
    }
}

/// Outcome of a full validation run.
///
/// `valid` is true iff `errors` is empty. Use [`ValidationResult::push`] rather
/// than touching the lists directly so the flag stays in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationFinding>,
    pub warnings: Vec<ValidationFinding>,
    pub suggestions: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    /// An empty, valid result.
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Record a finding in the list matching its severity.
    pub fn push(&mut self, finding: ValidationFinding) {
        match finding.severity {
            Severity::Error => {
                self.valid = false;
                self.errors.push(finding);
            }
            Severity::Warning => self.warnings.push(finding),
        }
    }

    /// Record an advisory suggestion. Never affects validity.
    pub fn suggest(&mut self, suggestion: impl Into<String>) {
        let suggestion = suggestion.into();
        if !self.suggestions.contains(&suggestion) {
            self.suggestions.push(suggestion);
        }
    }

    /// All findings, errors first.
    pub fn findings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.errors.iter().chain(self.warnings.iter())
    }

    /// True when there is nothing at all to report.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.suggestions.is_empty()
    }

    /// Whether any finding of the given type was recorded.
    pub fn has_type(&self, finding_type: FindingType) -> bool {
        self.findings().any(|f| f.finding_type == finding_type)
    }

    /// Whether any error mentions the given text.
    pub fn has_error_containing(&self, needle: &str) -> bool {
        self.errors.iter().any(|f| f.message.contains(needle))
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return writeln!(f, "script is valid, no findings");
        }
        writeln!(
            f,
            "script is {} ({} errors, {} warnings, {} suggestions)",
            if self.valid { "valid" } else { "invalid" },
            self.errors.len(),
            self.warnings.len(),
            self.suggestions.len()
        )?;
        for finding in self.findings() {
            writeln!(f, "  {}", finding)?;
        }
        for suggestion in &self.suggestions {
            writeln!(f, "  suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

/// Outcome of the cheap pre-flight check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuickValidation {
    pub valid: bool,
    pub issues: Vec<String>,
}

impl QuickValidation {
    pub fn from_issues(issues: Vec<String>) -> Self {
        Self {
            valid: issues.is_empty(),
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_error_invalidates() {
        let mut result = ValidationResult::new();
        assert!(result.valid);

        result.push(ValidationFinding::warning(FindingType::Escaping, "odd"));
        assert!(result.valid, "warnings never invalidate");

        result.push(ValidationFinding::error(FindingType::Security, "eval"));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn suggestions_are_deduplicated() {
        let mut result = ValidationResult::new();
        result.suggest("use join");
        result.suggest("use join");
        assert_eq!(result.suggestions.len(), 1);
        assert!(result.valid);
    }

    #[test]
    fn finding_display_includes_line() {
        let finding = ValidationFinding::error(FindingType::Syntax, "unbalanced").at_line(3);
        assert_eq!(finding.to_string(), "error [syntax] line 3: unbalanced");
    }

    #[test]
    fn finding_serializes_type_field() {
        let finding = ValidationFinding::warning(FindingType::Compatibility, "x");
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["type"], "compatibility");
        assert_eq!(json["severity"], "warning");
        assert!(json.get("line").is_none());
    }

    #[test]
    fn quick_validation_validity_tracks_issues() {
        assert!(QuickValidation::from_issues(vec![]).valid);
        assert!(!QuickValidation::from_issues(vec!["bad".into()]).valid);
    }
}
