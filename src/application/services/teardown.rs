//! Standalone teardown of a stack left behind by an interrupted run.

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, Provisioner};

/// Destroy the stack in the configured directory.
///
/// # Errors
///
/// Returns an error when the destroy command fails.
pub async fn run(provisioner: &impl Provisioner, reporter: &impl ProgressReporter) -> Result<()> {
    reporter.step("destroying stack...");
    provisioner
        .destroy()
        .await
        .context("destroying the stack")?;
    reporter.success("stack destroyed");
    Ok(())
}
