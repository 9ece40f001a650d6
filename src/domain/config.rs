//! Domain types and validators for stackcheck configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access. The command
//! layer reads `stackcheck.yaml` and the process environment and hands the
//! raw data in here for merging and validation.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::topology::ExpectedImage;

// ── Constants ────────────────────────────────────────────────────────────────

/// Terraform variable that seeds Azure resource names.
pub const VAR_LABEL_PREFIX: &str = "labelPrefix";

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "stackcheck.yaml";

const LABEL_PREFIX_MIN: usize = 3;
const LABEL_PREFIX_MAX: usize = 16;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `stackcheck.yaml`. Every field is
/// optional; CLI flags override file values.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    /// Azure subscription the inspector queries.
    pub subscription: Option<String>,
    /// Directory holding the Terraform root module.
    pub stack_dir: Option<PathBuf>,
    /// Value for the resource-naming variable.
    pub label_prefix: Option<String>,
    /// Expected base image of the deployed VM.
    pub image: Option<ExpectedImage>,
    /// Directories prepended to PATH for the spawned tool processes.
    #[serde(default)]
    pub extra_path: Vec<PathBuf>,
}

/// Flag values collected by clap, merged over the file config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub stack_dir: Option<PathBuf>,
    pub label_prefix: Option<String>,
    pub subscription: Option<String>,
    pub expect_version: Option<String>,
}

/// Resolved provisioner settings.
#[derive(Debug, Clone)]
pub struct StackConfig {
    pub stack_dir: PathBuf,
    pub label_prefix: String,
    /// Environment entries set on every spawned tool process. PATH overrides
    /// are explicit configuration here, never ambient process mutation.
    pub env_overrides: Vec<(String, String)>,
}

/// Fully resolved settings for a verification run.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub stack: StackConfig,
    pub subscription: String,
    pub expected: ExpectedImage,
}

// ── Resolution ───────────────────────────────────────────────────────────────

impl StackConfig {
    /// Merge CLI flags over file config. `current_path` is the caller's PATH
    /// value, threaded in so this stays pure.
    ///
    /// # Errors
    ///
    /// Returns an error when no label prefix is configured, when the prefix
    /// is invalid, or when the PATH override cannot be joined.
    pub fn resolve(
        file: &FileConfig,
        cli: &CliOverrides,
        current_path: Option<&str>,
    ) -> Result<Self> {
        let stack_dir = cli
            .stack_dir
            .clone()
            .or_else(|| file.stack_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let label_prefix = cli
            .label_prefix
            .clone()
            .or_else(|| file.label_prefix.clone())
            .unwrap_or_default();
        validate_label_prefix(&label_prefix)?;

        let mut env_overrides = Vec::new();
        if let Some(path) = path_override(&file.extra_path, current_path)? {
            env_overrides.push(("PATH".to_string(), path));
        }

        Ok(Self {
            stack_dir,
            label_prefix,
            env_overrides,
        })
    }
}

impl VerifyConfig {
    /// Resolve everything a verification run needs.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing subscription, a missing or invalid
    /// label prefix, or an unjoinable PATH override.
    pub fn resolve(
        file: &FileConfig,
        cli: &CliOverrides,
        current_path: Option<&str>,
    ) -> Result<Self> {
        let stack = StackConfig::resolve(file, cli, current_path)?;
        let subscription = cli
            .subscription
            .clone()
            .or_else(|| file.subscription.clone())
            .ok_or(ConfigError::MissingSubscription)?;

        let mut expected = file.image.clone().unwrap_or_default();
        if let Some(version) = &cli.expect_version {
            expected.version = Some(version.clone());
        }

        Ok(Self {
            stack,
            subscription,
            expected,
        })
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates the resource-naming prefix: a lowercase letter followed by
/// lowercase letters or digits, 3 to 16 characters. The prefix seeds Azure
/// resource names, which reject most other characters.
///
/// # Errors
///
/// Returns `ConfigError::InvalidLabelPrefix` when the prefix does not match.
pub fn validate_label_prefix(prefix: &str) -> Result<()> {
    let mut chars = prefix.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    let valid_len = (LABEL_PREFIX_MIN..=LABEL_PREFIX_MAX).contains(&prefix.len());
    if !(valid_start && valid_rest && valid_len) {
        return Err(ConfigError::InvalidLabelPrefix(prefix.to_string()).into());
    }
    Ok(())
}

/// Builds the PATH value with `extra` entries prepended to `current`.
/// Returns `None` when there is nothing to prepend.
///
/// # Errors
///
/// Returns an error when an entry contains the platform path separator.
pub fn path_override(extra: &[PathBuf], current: Option<&str>) -> Result<Option<String>> {
    if extra.is_empty() {
        return Ok(None);
    }
    let mut entries: Vec<PathBuf> = extra.to_vec();
    if let Some(current) = current {
        entries.extend(std::env::split_paths(current));
    }
    let joined = std::env::join_paths(entries)?;
    Ok(Some(joined.to_string_lossy().into_owned()))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
