//! Handing scripts to the external interpreter.
//!
//! The interpreter itself lives outside this crate, behind [`ScriptExecutor`].
//! [`ScriptRunner`] puts the validator in front of it: scripts with
//! error-severity findings never reach the executor.

use jxscript_types::ValidationResult;
use serde_json::Value;

use crate::config::RunnerConfig;
use crate::validator::Validator;

#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// Blocked before execution.
    #[error(
        "validation failed ({} errors, {} warnings){}",
        .0.errors.len(),
        .0.warnings.len(),
        first_finding(&.0)
    )]
    ValidationFailed(ValidationResult),

    /// The interpreter's own diagnostic, as it reported it.
    #[error("interpreter error: {0}")]
    Interpreter(String),
}

fn first_finding(result: &ValidationResult) -> String {
    result
        .findings()
        .next()
        .map(|f| format!(": {}", f))
        .unwrap_or_default()
}

/// Runs a finished script and returns its parsed result.
pub trait ScriptExecutor {
    fn execute(&self, script: &str) -> Result<Value, ExecutionError>;
}

impl<F> ScriptExecutor for F
where
    F: Fn(&str) -> Result<Value, ExecutionError>,
{
    fn execute(&self, script: &str) -> Result<Value, ExecutionError> {
        self(script)
    }
}

/// Validates, then executes.
#[derive(Debug, Clone, Default)]
pub struct ScriptRunner {
    config: RunnerConfig,
    validator: Validator,
}

impl ScriptRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            validator: Validator::new(),
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Validate `script` and, unless blocked, run it on `executor`.
    pub fn run<E: ScriptExecutor + ?Sized>(
        &self,
        executor: &E,
        script: &str,
    ) -> Result<Value, ExecutionError> {
        if !self.config.skip_validation {
            let result = self.validator.validate(script);
            let blocked = !result.valid
                || (self.config.block_on_warnings && !result.warnings.is_empty());

            if blocked {
                tracing::warn!(
                    errors = result.errors.len(),
                    warnings = result.warnings.len(),
                    "script blocked by validation"
                );
                return Err(ExecutionError::ValidationFailed(result));
            }

            for finding in &result.warnings {
                tracing::warn!("{}", finding);
            }
            for suggestion in &result.suggestions {
                tracing::info!("suggestion: {}", suggestion);
            }
        }

        executor.execute(script)
    }
}
