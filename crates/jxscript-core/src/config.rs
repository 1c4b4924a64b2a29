//! Configuration for the builder, validator, and runner.
//!
//! Every section deserializes with defaults for missing keys, so an empty
//! TOML file is a valid configuration:
//!
//! ```toml
//! [validator]
//! max_loop_depth = 2
//! extra_builtins = ["myBridgeCall"]
//!
//! [builder]
//! application = "DEVONthink"
//!
//! [runner]
//! block_on_warnings = false
//! ```

use serde::Deserialize;

use crate::validator::KnownSymbols;

/// Helpers whose absence `quick_validate` always treats as fatal.
pub const DEFAULT_CRITICAL_HELPERS: &[&str] = &[
    "getRecord",
    "findDatabase",
    "safeGet",
    "isGroup",
    "recordSummary",
    "successResult",
    "errorResult",
];

/// Validator thresholds and the injectable allowlist.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Loop bodies nested deeper than this produce a suggestion.
    pub max_loop_depth: usize,
    /// Names added to the host built-ins for dependency analysis.
    pub extra_builtins: Vec<String>,
    /// Names `quick_validate` checks for call-without-definition.
    pub critical_helpers: Vec<String>,
    /// Start from the host built-ins. When false, only `extra_builtins` count.
    pub host_builtins: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_loop_depth: 2,
            extra_builtins: Vec::new(),
            critical_helpers: DEFAULT_CRITICAL_HELPERS.iter().map(|s| s.to_string()).collect(),
            host_builtins: true,
        }
    }
}

impl ValidatorConfig {
    /// The allowlist this configuration describes.
    pub fn symbols(&self) -> KnownSymbols {
        let base = if self.host_builtins {
            KnownSymbols::host()
        } else {
            KnownSymbols::empty()
        };
        base.with(self.extra_builtins.iter().cloned())
    }

    pub fn with_max_loop_depth(mut self, depth: usize) -> Self {
        self.max_loop_depth = depth;
        self
    }

    pub fn with_extra_builtins<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_builtins.extend(names.into_iter().map(Into::into));
        self
    }
}

/// How the builder frames a script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Application the harness binds.
    pub application: String,
    /// Variable name of the application handle.
    pub handle: String,
    /// Extra names fragment dependencies may point at without being fragments.
    pub extra_builtins: Vec<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            application: "DEVONthink".to_string(),
            handle: "app".to_string(),
            extra_builtins: Vec::new(),
        }
    }
}

impl BuilderConfig {
    pub fn for_application(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            ..Self::default()
        }
    }
}

/// Policy for handing scripts to the executor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Hand scripts over without validating them.
    pub skip_validation: bool,
    /// Treat warnings as blocking too.
    pub block_on_warnings: bool,
}

impl RunnerConfig {
    pub fn with_skip_validation(mut self, skip: bool) -> Self {
        self.skip_validation = skip;
        self
    }

    pub fn with_block_on_warnings(mut self, block: bool) -> Self {
        self.block_on_warnings = block;
        self
    }
}

/// All sections together, as read from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub validator: ValidatorConfig,
    pub builder: BuilderConfig,
    pub runner: RunnerConfig,
}
