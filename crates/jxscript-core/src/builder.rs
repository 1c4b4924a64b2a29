//! Script assembly.
//!
//! [`ScriptBuilder`] is a consuming builder: each `add_*` call takes the
//! builder by value and hands it back, or fails with a [`ScriptError`] when
//! the call would produce a broken script. Nothing is shared between builds.
//!
//! Output layout, in order:
//!
//! 1. harness opening (an IIFE binding the application handle)
//! 2. fragments, dependencies first
//! 3. variable and regex declarations, in call order
//! 4. main body blocks, in call order
//! 5. harness closing
//!
//! ```
//! use jxscript_core::builder::ScriptBuilder;
//! use jxscript_types::EscapeMode;
//!
//! let script = ScriptBuilder::new()
//!     .add_variable("uuid", "1234-ABCD", EscapeMode::String)?
//!     .add_fragment("getRecord")?
//!     .add_try_catch("var record = getRecord(uuid, null, null);\nreturn JSON.stringify({ found: !!record });", None)
//!     .build()?;
//! assert!(script.starts_with("(function () {"));
//! # Ok::<(), jxscript_core::error::ScriptError>(())
//! ```

use std::collections::HashSet;

use jxscript_types::{EscapeMode, LiteralValue, ValidationResult};

use crate::config::BuilderConfig;
use crate::error::{ScriptError, ScriptResult};
use crate::escape::{
    escape, format_number, format_value, is_reserved_word, is_valid_identifier, quote,
    seal_escaped,
};
use crate::fragments::{Fragment, FragmentLibrary};
use crate::patterns;
use crate::validator::{KnownSymbols, Validator};

/// Flags the target regex engine understands.
const REGEX_FLAGS: &str = "dgimsuy";

/// Handler used by [`ScriptBuilder::add_try_catch`] when none is given.
const DEFAULT_CATCH: &str =
    "return JSON.stringify({ success: false, error: String(e && e.message ? e.message : e) });";

/// Accumulates bindings, fragments and body blocks for one script.
#[derive(Debug, Clone)]
pub struct ScriptBuilder {
    config: BuilderConfig,
    library: FragmentLibrary,
    builtins: KnownSymbols,
    /// Every name a declaration or fragment claims.
    bound: HashSet<String>,
    fragments: Vec<String>,
    declarations: Vec<String>,
    body: Vec<String>,
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptBuilder {
    /// A builder over the standard fragment library.
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        let builtins = KnownSymbols::host().with(config.extra_builtins.iter().cloned());
        let mut bound = HashSet::new();
        bound.insert(config.handle.clone());
        Self {
            config,
            library: FragmentLibrary::standard(),
            builtins,
            bound,
            fragments: Vec::new(),
            declarations: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Swap the fragment library. Fragments already selected must exist in it
    /// by the time [`ScriptBuilder::build`] runs.
    pub fn with_library(mut self, library: FragmentLibrary) -> Self {
        self.library = library;
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn library(&self) -> &FragmentLibrary {
        &self.library
    }

    /// Bind `name` to `value`, rendered according to `mode`.
    pub fn add_variable(
        mut self,
        name: &str,
        value: impl Into<LiteralValue>,
        mode: EscapeMode,
    ) -> ScriptResult<Self> {
        self.claim(name)?;
        let literal = render_binding(name, &value.into(), mode)?;
        self.declarations.push(format!("var {} = {};", name, literal));
        Ok(self)
    }

    /// Bind a regex whose pattern is already written as string-literal content.
    ///
    /// Two-stage contract: the text is placed inside a string literal as
    /// written, then the interpreter compiles the string as a regex. A
    /// backslash the regex should see must therefore arrive doubled (`\\d+`
    /// for `\d+`). Bare quotes and line breaks are still escaped so the
    /// literal cannot be broken. Prefer [`ScriptBuilder::add_regex_source`].
    pub fn add_regex_pattern(self, name: &str, pattern: &str, flags: &str) -> ScriptResult<Self> {
        self.push_regex(name, seal_escaped(pattern), flags)
    }

    /// Bind a regex given as the regex engine should see it (`\d+`).
    /// Both escaping layers are applied here.
    pub fn add_regex_source(self, name: &str, pattern: &str, flags: &str) -> ScriptResult<Self> {
        self.push_regex(name, escape(pattern), flags)
    }

    /// Bind an entry of the regex catalog under `name`.
    pub fn add_catalog_pattern(self, name: &str, entry: &str) -> ScriptResult<Self> {
        let pattern = patterns::lookup(entry).ok_or_else(|| ScriptError::UnknownPattern {
            name: entry.to_string(),
        })?;
        self.add_regex_source(name, pattern.pattern, pattern.flags)
    }

    /// Register a fragment under `name` and include it.
    pub fn add_function(mut self, name: &str, fragment: Fragment) -> ScriptResult<Self> {
        self.claim(name)?;
        self.library.insert(name, fragment);
        self.fragments.push(name.to_string());
        Ok(self)
    }

    /// Include a fragment from the library. Adding the same fragment twice
    /// is a no-op.
    pub fn add_fragment(mut self, name: &str) -> ScriptResult<Self> {
        if self.fragments.iter().any(|f| f == name) {
            return Ok(self);
        }
        if !self.library.contains(name) {
            return Err(ScriptError::UnknownFragment {
                name: name.to_string(),
            });
        }
        self.claim(name)?;
        self.fragments.push(name.to_string());
        Ok(self)
    }

    /// Append a main-body block as written.
    pub fn add_code(mut self, code: impl Into<String>) -> Self {
        self.body.push(code.into());
        self
    }

    /// Append a main-body block wrapped in `try`/`catch`.
    ///
    /// The handler sees the exception as `e`. Without one, the block returns
    /// a serialized `{ success: false, error }` object.
    pub fn add_try_catch(mut self, body: &str, handler: Option<&str>) -> Self {
        let handler = handler.unwrap_or(DEFAULT_CATCH);
        self.body.push(format!(
            "try {{\n{}\n}} catch (e) {{\n{}\n}}",
            indent(body),
            indent(handler)
        ));
        self
    }

    /// Render the script.
    ///
    /// Resolves the fragment closure and its order, and checks that every
    /// dependency outside the library is a known built-in. Does not run the
    /// validator; see [`ScriptBuilder::build_checked`].
    pub fn build(&self) -> ScriptResult<String> {
        let handle = &self.config.handle;
        if !is_valid_identifier(handle) {
            return Err(ScriptError::InvalidIdentifier {
                name: handle.clone(),
            });
        }

        let fragments = self.render_fragments()?;

        let mut script = String::from("(function () {\n");
        script.push_str(&format!(
            "  var {} = Application({});\n",
            handle,
            quote(&self.config.application)
        ));
        script.push_str(&format!("  {}.includeStandardAdditions = true;\n", handle));

        let declarations = self.declarations.join("\n");
        let body = self.body.join("\n\n");
        for section in [fragments.as_str(), declarations.as_str(), body.as_str()] {
            if !section.is_empty() {
                script.push('\n');
                script.push_str(&indent(section));
                script.push('\n');
            }
        }
        script.push_str("})();\n");

        tracing::debug!(
            fragments = self.fragments.len(),
            declarations = self.declarations.len(),
            blocks = self.body.len(),
            bytes = script.len(),
            "built script"
        );

        Ok(script)
    }

    /// Build, then validate the result.
    pub fn build_checked(&self, validator: &Validator) -> ScriptResult<(String, ValidationResult)> {
        let script = self.build()?;
        let result = validator.validate(&script);
        Ok((script, result))
    }

    fn claim(&mut self, name: &str) -> ScriptResult<()> {
        if !is_valid_identifier(name) {
            return Err(ScriptError::InvalidIdentifier {
                name: name.to_string(),
            });
        }
        if is_reserved_word(name) {
            return Err(ScriptError::ReservedWord {
                name: name.to_string(),
            });
        }
        if !self.bound.insert(name.to_string()) {
            return Err(ScriptError::DuplicateBinding {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn push_regex(mut self, name: &str, literal_body: String, flags: &str) -> ScriptResult<Self> {
        self.claim(name)?;
        check_flags(name, flags)?;
        let declaration = if flags.is_empty() {
            format!("var {} = new RegExp(\"{}\");", name, literal_body)
        } else {
            format!("var {} = new RegExp(\"{}\", \"{}\");", name, literal_body, flags)
        };
        self.declarations.push(declaration);
        Ok(self)
    }

    fn render_fragments(&self) -> ScriptResult<String> {
        if self.fragments.is_empty() {
            return Ok(String::new());
        }

        let selected: Vec<&str> = self.fragments.iter().map(|s| s.as_str()).collect();
        let closure = self.library.with_dependencies(&selected)?;
        let names: Vec<&str> = closure.iter().map(|s| s.as_str()).collect();
        let ordered = self.library.resolve_order(&names)?;

        for (name, fragment) in &ordered {
            // Pulled in as a dependency, but a declaration already took the name.
            if !self.fragments.iter().any(|f| f == *name) && self.bound.contains(*name) {
                return Err(ScriptError::DuplicateBinding {
                    name: name.to_string(),
                });
            }
            for dep in &fragment.dependencies {
                if !self.library.contains(dep) && !self.builtins.is_bound(dep) {
                    return Err(ScriptError::UnresolvedDependency {
                        fragment: name.to_string(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        tracing::trace!(order = ?ordered.iter().map(|(n, _)| *n).collect::<Vec<_>>(), "fragment order");

        let bodies: Vec<&str> = ordered.iter().map(|(_, f)| f.code.as_str()).collect();
        Ok(bodies.join("\n\n"))
    }
}

/// Literal text for one binding, enforcing its escape mode.
fn render_binding(name: &str, value: &LiteralValue, mode: EscapeMode) -> ScriptResult<String> {
    let mismatch = || ScriptError::ModeMismatch {
        name: name.to_string(),
        mode,
        found: value.kind().to_string(),
    };

    match mode {
        EscapeMode::String => Ok(format_value(value)),
        EscapeMode::Raw => Ok(match value {
            LiteralValue::String(s) => s.clone(),
            other => format_value(other),
        }),
        EscapeMode::Number => match value {
            LiteralValue::Number(n) => Ok(format_number(*n)),
            LiteralValue::String(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(format_number(n)),
                _ => Err(mismatch()),
            },
            _ => Err(mismatch()),
        },
        EscapeMode::Boolean => match value {
            LiteralValue::Bool(b) => Ok(b.to_string()),
            LiteralValue::String(s) if s == "true" || s == "false" => Ok(s.clone()),
            _ => Err(mismatch()),
        },
    }
}

fn check_flags(name: &str, flags: &str) -> ScriptResult<()> {
    let mut seen = HashSet::new();
    for flag in flags.chars() {
        if !REGEX_FLAGS.contains(flag) || !seen.insert(flag) {
            return Err(ScriptError::InvalidRegexFlags {
                name: name.to_string(),
                flags: flags.to_string(),
            });
        }
    }
    Ok(())
}

/// Indent every non-empty line by two spaces.
fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("  {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
