//! The `jxscript` command line.
//!
//! ```bash
//! jxscript validate script.js
//! jxscript validate --quick --json - < script.js
//! jxscript escape --format 'He said "hi"'
//! jxscript fragments getRecord collectChildren
//! jxscript build --var uuid=1234 --var limit:number=10 --fragment getRecord --body body.js --try
//! ```

pub mod config;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use jxscript_core::escape::{escape, escape_search_query};
use jxscript_core::{Config, EscapeMode, FragmentLibrary, ScriptBuilder, Validator, patterns};

#[derive(Debug, Parser)]
#[command(name = "jxscript", version)]
#[command(about = "Escape, assemble and statically check automation scripts")]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/jxscript/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a script; exits non-zero when it has errors
    Validate {
        /// Only the always-fatal checks
        #[arg(long)]
        quick: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Script file, or `-` for stdin
        file: PathBuf,
    },

    /// Escape a value for a string literal
    Escape {
        /// Also escape search-grammar characters
        #[arg(long)]
        search: bool,

        /// Wrap the result in double quotes
        #[arg(long)]
        format: bool,

        value: String,
    },

    /// List fragments, or print the resolved order of the named ones
    Fragments {
        /// Print fragment code instead of names
        #[arg(long)]
        code: bool,

        names: Vec<String>,
    },

    /// List the regex pattern catalog
    Patterns,

    /// Assemble a script from bindings, fragments and a body
    Build {
        /// Binding as NAME=VALUE or NAME:MODE=VALUE (mode: string, raw, number, boolean)
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,

        /// Fragment to include (dependencies are pulled in)
        #[arg(long = "fragment", value_name = "NAME")]
        fragments: Vec<String>,

        /// Main body file, or `-` for stdin
        #[arg(long)]
        body: Option<PathBuf>,

        /// Wrap the body in try/catch with the default handler
        #[arg(long = "try")]
        wrap_try: bool,
    },
}

/// A `--var` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSpec {
    pub name: String,
    pub mode: EscapeMode,
    pub value: String,
}

impl VarSpec {
    pub fn parse(spec: &str) -> Result<Self> {
        let Some((lhs, value)) = spec.split_once('=') else {
            bail!("binding '{}' must look like NAME=VALUE", spec);
        };
        let (name, mode) = match lhs.split_once(':') {
            Some((name, mode)) => (name, mode.parse::<EscapeMode>()?),
            None => (lhs, EscapeMode::String),
        };
        Ok(Self {
            name: name.trim().to_string(),
            mode,
            value: value.to_string(),
        })
    }
}

/// Run a parsed command line. `Ok(false)` means the script under test was
/// rejected; the caller turns that into a non-zero exit.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<bool> {
    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Validate { quick, json, file } => validate(&config, &file, quick, json, out),
        Command::Escape {
            search,
            format,
            value,
        } => {
            let body = if search {
                escape_search_query(&value)
            } else {
                escape(&value)
            };
            if format {
                writeln!(out, "\"{}\"", body)?;
            } else {
                writeln!(out, "{}", body)?;
            }
            Ok(true)
        }
        Command::Fragments { code, names } => fragments(&names, code, out),
        Command::Patterns => {
            for pattern in patterns::all() {
                writeln!(
                    out,
                    "{:<20} /{}/{}  {}",
                    pattern.name, pattern.pattern, pattern.flags, pattern.description
                )?;
            }
            Ok(true)
        }
        Command::Build {
            vars,
            fragments,
            body,
            wrap_try,
        } => build(&config, &vars, &fragments, body.as_deref(), wrap_try, out),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn validate(config: &Config, file: &Path, quick: bool, json: bool, out: &mut dyn Write) -> Result<bool> {
    let script = read_input(file)?;
    let validator = Validator::with_config(config.validator.clone());

    if quick {
        let result = validator.quick_validate(&script);
        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        } else if result.valid {
            writeln!(out, "quick check passed")?;
        } else {
            for issue in &result.issues {
                writeln!(out, "{}", issue)?;
            }
        }
        return Ok(result.valid);
    }

    let result = validator.validate(&script);
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        write!(out, "{}", result)?;
    }
    Ok(result.valid)
}

fn fragments(names: &[String], code: bool, out: &mut dyn Write) -> Result<bool> {
    let library = FragmentLibrary::standard();

    if names.is_empty() {
        for name in library.names() {
            let deps = library
                .get(name)
                .map(|f| f.dependencies.join(", "))
                .unwrap_or_default();
            if deps.is_empty() {
                writeln!(out, "{}", name)?;
            } else {
                writeln!(out, "{:<18} depends on: {}", name, deps)?;
            }
        }
        return Ok(true);
    }

    let selected: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
    if code {
        writeln!(out, "{}", library.render(&selected)?)?;
        return Ok(true);
    }

    let closure = library.with_dependencies(&selected)?;
    let closure: Vec<&str> = closure.iter().map(|s| s.as_str()).collect();
    for (name, _) in library.resolve_order(&closure)? {
        writeln!(out, "{}", name)?;
    }
    Ok(true)
}

fn build(
    config: &Config,
    vars: &[String],
    fragments: &[String],
    body: Option<&Path>,
    wrap_try: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    let mut builder = ScriptBuilder::with_config(config.builder.clone());

    for spec in vars {
        let var = VarSpec::parse(spec)?;
        builder = builder.add_variable(&var.name, var.value.as_str(), var.mode)?;
    }
    for name in fragments {
        builder = builder.add_fragment(name)?;
    }
    if let Some(path) = body {
        let text = read_input(path)?;
        builder = if wrap_try {
            builder.add_try_catch(text.trim_end(), None)
        } else {
            builder.add_code(text.trim_end())
        };
    }

    let validator = Validator::with_config(config.validator.clone());
    let (script, result) = builder.build_checked(&validator)?;
    write!(out, "{}", script)?;

    if !result.is_clean() {
        eprint!("{}", result);
    }
    Ok(result.valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn run_args(args: &[&str]) -> (bool, String) {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        let ok = run(cli, &mut out).unwrap();
        (ok, String::from_utf8(out).unwrap())
    }

    fn empty_config() -> tempfile::NamedTempFile {
        tempfile::NamedTempFile::new().unwrap()
    }

    #[test]
    fn var_spec_forms() {
        assert_eq!(
            VarSpec::parse("q=a=b").unwrap(),
            VarSpec {
                name: "q".into(),
                mode: EscapeMode::String,
                value: "a=b".into()
            }
        );
        assert_eq!(VarSpec::parse("n:number=4").unwrap().mode, EscapeMode::Number);
        assert!(VarSpec::parse("novalue").is_err());
        assert!(VarSpec::parse("x:weird=1").is_err());
    }

    #[test]
    fn escape_command() {
        let config = empty_config();
        let path = config.path().to_str().unwrap();
        let (ok, out) = run_args(&["jxscript", "--config", path, "escape", "--format", "say \"hi\""]);
        assert!(ok);
        assert_eq!(out, "\"say \\\"hi\\\"\"\n");

        let (_, out) = run_args(&["jxscript", "--config", path, "escape", "--search", "a(b)"]);
        assert_eq!(out, "a\\\\(b\\\\)\n");
    }

    #[test]
    fn validate_command_exit_status() {
        let config = empty_config();
        let path = config.path().to_str().unwrap();

        let mut good = tempfile::NamedTempFile::new().unwrap();
        writeln!(good, "(function () {{ return JSON.stringify({{ ok: true }}); }})();").unwrap();
        let (ok, out) = run_args(&["jxscript", "--config", path, "validate", good.path().to_str().unwrap()]);
        assert!(ok, "{}", out);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "(function () {{ return {{ ok: true }}; }})();").unwrap();
        let (ok, out) = run_args(&["jxscript", "--config", path, "validate", "--json", bad.path().to_str().unwrap()]);
        assert!(!ok);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["valid"], false);
        assert_eq!(parsed["errors"][0]["type"], "compatibility");

        let (ok, out) = run_args(&["jxscript", "--config", path, "validate", "--quick", bad.path().to_str().unwrap()]);
        assert!(!ok);
        assert!(out.contains("JSON.stringify"));
    }

    #[test]
    fn fragments_command() {
        let config = empty_config();
        let path = config.path().to_str().unwrap();

        let (_, listing) = run_args(&["jxscript", "--config", path, "fragments"]);
        assert!(listing.lines().any(|l| l.starts_with("getRecord") && l.contains("findDatabase")));

        let (_, order) = run_args(&["jxscript", "--config", path, "fragments", "getRecord"]);
        assert_eq!(order, "findDatabase\ngetRecord\n");
    }

    #[test]
    fn patterns_command() {
        let config = empty_config();
        let (_, out) = run_args(&["jxscript", "--config", config.path().to_str().unwrap(), "patterns"]);
        assert_eq!(out.lines().count(), patterns::all().len());
        assert!(out.contains("themeHeader"));
    }

    #[test]
    fn build_command() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "[builder]\napplication = \"Finder\"").unwrap();
        let mut body = tempfile::NamedTempFile::new().unwrap();
        writeln!(body, "return JSON.stringify({{ name: name, n: n }});").unwrap();

        let (ok, out) = run_args(&[
            "jxscript",
            "--config",
            config.path().to_str().unwrap(),
            "build",
            "--var",
            "name=He said \"hi\"",
            "--var",
            "n:number=3",
            "--fragment",
            "safeGet",
            "--body",
            body.path().to_str().unwrap(),
            "--try",
        ]);
        assert!(ok, "{}", out);
        assert!(out.contains("Application(\"Finder\")"));
        assert!(out.contains("var name = \"He said \\\"hi\\\"\";"));
        assert!(out.contains("var n = 3;"));
        assert!(out.contains("function safeGet("));
        assert!(out.contains("} catch (e) {"));
    }
}
