//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails, plus the machine-readable report renderer.

use anyhow::{Context, Result};

use crate::domain::report::VerificationReport;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails (should not happen in
/// practice — `serde_json` only fails on non-finite floats and maps with
/// non-string keys, neither of which appear here).
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Render a verification report as pretty-printed JSON, with the overall
/// verdict attached.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_report(report: &VerificationReport) -> Result<String> {
    let mut value = serde_json::to_value(report).context("JSON serialization failed")?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("passed".to_string(), serde_json::json!(report.passed()));
    }
    serde_json::to_string_pretty(&value).context("JSON serialization failed")
}
