//! Errors raised while assembling a script.
//!
//! These are caller or authoring bugs: a bad identifier, a value that does not
//! fit its escape mode, a fragment that depends on something nobody defines.
//! They fail loudly at build time instead of producing a broken script.

use jxscript_types::EscapeMode;

/// Result alias for builder and fragment operations.
pub type ScriptResult<T> = Result<T, ScriptError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("'{name}' is not a valid identifier")]
    InvalidIdentifier { name: String },

    #[error("'{name}' is a reserved word and cannot be used as a binding name")]
    ReservedWord { name: String },

    #[error("'{name}' is already bound in this script")]
    DuplicateBinding { name: String },

    #[error("binding '{name}' uses {mode} mode but its value is a {found}")]
    ModeMismatch {
        name: String,
        mode: EscapeMode,
        found: String,
    },

    #[error("invalid regex flags '{flags}' for '{name}'")]
    InvalidRegexFlags { name: String, flags: String },

    #[error("unknown fragment '{name}'")]
    UnknownFragment { name: String },

    #[error("unknown regex pattern '{name}'")]
    UnknownPattern { name: String },

    #[error("fragment '{fragment}' depends on '{dependency}', which is neither a fragment nor a known built-in")]
    UnresolvedDependency { fragment: String, dependency: String },

    #[error("fragment dependency cycle: {}", cycle.join(" -> "))]
    DependencyCycle { cycle: Vec<String> },
}
