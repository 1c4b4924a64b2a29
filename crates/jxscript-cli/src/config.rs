//! Config file location and loading.
//!
//! | Purpose | Default |
//! |---------|---------|
//! | Config | `$XDG_CONFIG_HOME/jxscript/config.toml` |
//!
//! A missing default file means built-in defaults. A path given with
//! `--config` must exist.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use jxscript_core::Config;

/// `$XDG_CONFIG_HOME/jxscript`, or `~/.config/jxscript` when that cannot be
/// determined.
pub fn config_dir() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| home_fallback().join(".config"))
        .join("jxscript")
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

fn home_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

/// Load the explicit file if given, else the default file if present.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => read(path),
        None => {
            let path = default_config_path();
            if path.is_file() {
                read(&path)
            } else {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Config::default())
            }
        }
    }
}

fn read(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_path_is_under_jxscript() {
        assert!(config_dir().ends_with("jxscript"));
        assert!(default_config_path().ends_with("jxscript/config.toml"));
    }

    #[test]
    fn explicit_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[validator]\nmax_loop_depth = 4\nextra_builtins = [\"bridge\"]\n\n[builder]\napplication = \"Finder\"\n\n[runner]\nblock_on_warnings = true"
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.validator.max_loop_depth, 4);
        assert_eq!(config.validator.extra_builtins, vec!["bridge".to_string()]);
        assert_eq!(config.builder.application, "Finder");
        assert_eq!(config.builder.handle, "app");
        assert!(config.runner.block_on_warnings);
    }

    #[test]
    fn empty_file_is_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(load(Some(file.path())).unwrap(), Config::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[validator]\nmax_loop_depth = \"deep\"").unwrap();
        let err = load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
