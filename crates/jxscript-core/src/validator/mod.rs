//! Static validation of generated scripts.
//!
//! A best-effort linter for the target dialect, not a parser. It runs over
//! program text before the script reaches the external interpreter, where
//! failures are slow and opaque. Passes:
//!
//! - **Structure**: delimiters balance, literals terminate
//! - **Dangerous patterns**: dynamic evaluation, timers, DOM sinks, console output
//! - **Dialect**: arrow functions, spread, destructuring, classes, shorthand,
//!   template interpolation, direct object-literal returns
//! - **Escaping heuristics**: backslash runs, raw newlines and `${` in strings,
//!   complex `split()` arguments
//! - **Common mistakes**: literal `undefined`, functions called but never defined
//! - **Performance**: deep loop nesting, bulk collection calls, string
//!   concatenation in loops (suggestions only)
//!
//! Everything except the escaping pass runs over the stripped text from
//! [`scanner::strip`], so words inside strings and comments are invisible.
//!
//! # Example
//!
//! ```
//! use jxscript_core::validator::validate;
//!
//! let result = validate("(function () { return { ok: true }; })();");
//! assert!(!result.valid);
//! ```

mod dependencies;
mod quick;
mod rules;
pub mod scanner;
mod structure;
mod symbols;

use jxscript_types::{FindingType, QuickValidation, ValidationFinding, ValidationResult};

use crate::config::ValidatorConfig;

pub use dependencies::{defined_names, free_calls, undefined_calls, CallSite};
pub use structure::{check_delimiters, loop_shape, LoopShape};
pub use symbols::KnownSymbols;

use scanner::{LiteralKind, Stripped};

/// Validate with the default configuration.
pub fn validate(script: &str) -> ValidationResult {
    Validator::new().validate(script)
}

/// Quick pre-flight check with the default configuration.
pub fn quick_validate(script: &str) -> QuickValidation {
    Validator::new().quick_validate(script)
}

/// A configured validator. Stateless between calls.
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidatorConfig,
    symbols: KnownSymbols,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        let symbols = config.symbols();
        Self { config, symbols }
    }

    /// Replace the allowlist used for dependency analysis.
    pub fn with_symbols(mut self, symbols: KnownSymbols) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn symbols(&self) -> &KnownSymbols {
        &self.symbols
    }

    /// Run every pass. Never fails; all diagnostics are in the result.
    pub fn validate(&self, script: &str) -> ValidationResult {
        let stripped = scanner::strip(script);
        let mut result = ValidationResult::new();

        self.check_structure(&stripped, &mut result);
        rules::apply(&rules::DANGEROUS_RULES, &stripped.code, &mut result);
        self.check_dialect(&stripped, &mut result);
        self.check_escaping(script, &stripped, &mut result);
        self.check_common_mistakes(&stripped, &mut result);
        self.check_performance(&stripped, &mut result);

        tracing::debug!(
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            suggestions = result.suggestions.len(),
            "validated script"
        );

        result
    }

    /// The always-fatal subset, for a cheap check before [`Validator::validate`].
    pub fn quick_validate(&self, script: &str) -> QuickValidation {
        quick::run(script, &self.config.critical_helpers)
    }

    fn check_structure(&self, stripped: &Stripped, result: &mut ValidationResult) {
        if let Some(finding) = check_delimiters(&stripped.code) {
            result.push(finding);
        }
        for literal in &stripped.literals {
            // Raw newlines are reported by the escaping pass.
            if !literal.terminated && !literal.raw_newline {
                let what = match literal.kind {
                    LiteralKind::Template => "template literal",
                    LiteralKind::Regex => "regex literal",
                    _ => "string literal",
                };
                result.push(
                    ValidationFinding::error(FindingType::Syntax, format!("Unterminated {}", what))
                        .at_line(literal.line),
                );
            }
        }
    }

    fn check_dialect(&self, stripped: &Stripped, result: &mut ValidationResult) {
        rules::apply(&rules::DIALECT_RULES, &stripped.code, result);

        if let Some(literal) = stripped
            .literals
            .iter()
            .find(|l| l.kind == LiteralKind::Template && l.has_interpolation_marker())
        {
            result.push(
                ValidationFinding::error(
                    FindingType::Compatibility,
                    "Template literal interpolation is not supported; concatenate strings instead",
                )
                .at_line(literal.line),
            );
        }

        if let Some(finding) = rules::OBJECT_RETURN_RULE
            .as_ref()
            .and_then(|rule| rule.check(&stripped.code))
        {
            result.push(finding);
        }
    }

    fn check_escaping(&self, script: &str, stripped: &Stripped, result: &mut ValidationResult) {
        rules::apply(&rules::ESCAPING_RULES, script, result);

        if let Some(literal) = stripped.literals.iter().find(|l| l.raw_newline) {
            result.push(
                ValidationFinding::warning(
                    FindingType::Escaping,
                    "Unescaped newline inside a string literal; use \\n",
                )
                .at_line(literal.line),
            );
        }

        if let Some(literal) = stripped
            .literals
            .iter()
            .find(|l| l.is_quoted_string() && l.has_interpolation_marker())
        {
            result.push(
                ValidationFinding::warning(
                    FindingType::Escaping,
                    "'${' inside a plain string is not interpolated; a value was probably never substituted",
                )
                .at_line(literal.line),
            );
        }
    }

    fn check_common_mistakes(&self, stripped: &Stripped, result: &mut ValidationResult) {
        if let Some(finding) = rules::UNDEFINED_RULE
            .as_ref()
            .and_then(|rule| rule.check(&stripped.code))
        {
            result.push(finding);
        }

        let missing = undefined_calls(&stripped.code, &self.symbols);
        tracing::trace!(missing = missing.len(), "function dependency analysis");
        for call in missing {
            result.push(
                ValidationFinding::error(
                    FindingType::Compatibility,
                    format!("Function '{}' is called but not defined", call.name),
                )
                .at_line(call.line),
            );
        }
    }

    fn check_performance(&self, stripped: &Stripped, result: &mut ValidationResult) {
        let shape = loop_shape(&stripped.code);
        if shape.max_depth > self.config.max_loop_depth {
            let at = shape
                .deepest_line
                .map(|l| format!(" (line {})", l))
                .unwrap_or_default();
            result.suggest(format!(
                "Loops nested {} deep{}; the application bridge is slow per call, consider flattening",
                shape.max_depth, at
            ));
        }

        if let Some(line) = shape.concat_in_loop {
            result.suggest(format!(
                "String concatenation inside a loop (line {}); collect parts in an array and join()",
                line
            ));
        }

        if let Some(found) = rules::BULK_RULE
            .as_ref()
            .and_then(|bulk| bulk.find(&stripped.code))
        {
            result.suggest(format!(
                "Bulk collection call (line {}) loads every item; narrow with search() or whose()",
                scanner::line_at(&stripped.code, found.start())
            ));
        }
    }
}
