//! jxscript core: generate, parameterize and check automation scripts.
//!
//! Scripts target a restricted JavaScript dialect run by an external
//! interpreter that drives a desktop application. Failures there are slow
//! and opaque, so this crate does as much as it can up front:
//!
//! - [`escape`]: value → literal text that cannot break out of its literal
//! - [`fragments`]: reusable helper bodies, spliced in dependency order
//! - [`builder`]: assembles bindings, fragments and body into one IIFE
//! - [`validator`]: a rule-table linter for the dialect, run before execution
//! - [`runner`]: the seam to the interpreter, gated on validation
//!
//! Everything here is synchronous and holds no shared state.

pub mod builder;
pub mod config;
pub mod error;
pub mod escape;
pub mod fragments;
pub mod patterns;
pub mod runner;
pub mod validator;

pub use builder::ScriptBuilder;
pub use config::{BuilderConfig, Config, RunnerConfig, ValidatorConfig};
pub use error::{ScriptError, ScriptResult};
pub use fragments::{Fragment, FragmentLibrary};
pub use runner::{ExecutionError, ScriptExecutor, ScriptRunner};
pub use validator::{quick_validate, validate, KnownSymbols, Validator};

pub use jxscript_types::{
    EscapeMode, FindingType, LiteralValue, QuickValidation, Severity, ValidationFinding,
    ValidationResult,
};
