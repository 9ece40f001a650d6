//! Command implementations

pub mod destroy;
pub mod verify;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::{DEFAULT_CONFIG_FILE, FileConfig};
use crate::domain::error::ConfigError;

/// Load the YAML config file. An explicit `--config` path must exist; the
/// default `stackcheck.yaml` is optional and silently skipped when absent.
///
/// # Errors
///
/// Returns an error when an explicitly named file is missing, unreadable,
/// or not valid YAML.
pub fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    let explicit = path.is_some();
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
    if !path.exists() {
        if explicit {
            anyhow::bail!("config file not found: {}", path.display());
        }
        return Ok(FileConfig::default());
    }
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Check that the configured stack directory exists before running terraform
/// in it.
///
/// # Errors
///
/// Returns `ConfigError::MissingStackDir` when the directory is absent.
pub fn ensure_stack_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(ConfigError::MissingStackDir(dir.display().to_string()).into());
    }
    Ok(())
}

/// The caller's PATH value, threaded into the pure config resolution.
#[must_use]
pub fn current_path() -> Option<String> {
    std::env::var("PATH").ok()
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_config_is_an_error() {
        let err = load_file_config(Some(Path::new("/definitely/not/here.yaml")))
            .expect_err("should fail");
        assert!(err.to_string().contains("not found"), "got: {err}");
    }

    #[test]
    fn explicit_path_must_exist_even_with_default_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_file_config(Some(dir.path().join("stackcheck.yaml").as_path()));
        assert!(cfg.is_err(), "explicit path must exist");
    }

    #[test]
    fn reads_yaml_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stackcheck.yaml");
        std::fs::write(&path, "label_prefix: demo01\nsubscription: sub-1\n").expect("write");
        let cfg = load_file_config(Some(&path)).expect("loads");
        assert_eq!(cfg.label_prefix.as_deref(), Some("demo01"));
        assert_eq!(cfg.subscription.as_deref(), Some("sub-1"));
    }

    #[test]
    fn invalid_yaml_names_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stackcheck.yaml");
        std::fs::write(&path, ":\n  - not yaml").expect("write");
        let err = load_file_config(Some(&path)).expect_err("should fail");
        assert!(err.to_string().contains("parsing"), "got: {err}");
    }

    #[test]
    fn missing_stack_dir_is_an_error() {
        let err = ensure_stack_dir(Path::new("/definitely/not/here")).expect_err("should fail");
        assert!(err.to_string().contains("not found"), "got: {err}");
    }
}
