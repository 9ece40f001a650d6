//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Errors raised while bringing the stack up or tearing it down.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("terraform {phase} failed:\n{stderr}")]
    CommandFailed { phase: &'static str, stderr: String },

    #[error("terraform output is missing '{0}'")]
    MissingOutput(String),

    #[error("terraform output is not valid JSON: {0}")]
    MalformedOutputs(String),

    #[error(
        "terraform {found} is too old (need >= {required}). Upgrade: https://developer.hashicorp.com/terraform/install"
    )]
    UnsupportedVersion { required: String, found: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Invalid label prefix '{0}': must start with a lowercase letter and contain only lowercase letters and digits (3-16 chars)"
    )]
    InvalidLabelPrefix(String),

    #[error(
        "No subscription configured. Set 'subscription' in stackcheck.yaml, pass --subscription, or export AZURE_SUBSCRIPTION_ID."
    )]
    MissingSubscription,

    #[error("Stack directory not found: {0}")]
    MissingStackDir(String),
}
