//! `stackcheck verify` — provision the stack, verify the deployed topology,
//! tear the stack down, and report per-check results.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::application::services::verify;
use crate::commands::{current_path, ensure_stack_dir, load_file_config};
use crate::domain::config::{CliOverrides, VerifyConfig};
use crate::infra::azure::AzureCli;
use crate::infra::terraform::TerraformCli;
use crate::output::human::HumanRenderer;
use crate::output::{OutputContext, TerminalReporter, json};

/// Arguments for the verify command.
#[derive(Args)]
pub struct VerifyArgs {
    /// Path to a YAML config file (default: ./stackcheck.yaml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the Terraform root module
    #[arg(long, value_name = "DIR")]
    pub stack_dir: Option<PathBuf>,

    /// Prefix seeding the provisioned resource names
    #[arg(long)]
    pub label_prefix: Option<String>,

    /// Azure subscription to query
    #[arg(long, env = "STACKCHECK_SUBSCRIPTION")]
    pub subscription: Option<String>,

    /// Also compare the image version against this value
    #[arg(long, value_name = "VERSION")]
    pub expect_version: Option<String>,
}

impl VerifyArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            stack_dir: self.stack_dir.clone(),
            label_prefix: self.label_prefix.clone(),
            subscription: self
                .subscription
                .clone()
                .or_else(|| std::env::var("AZURE_SUBSCRIPTION_ID").ok()),
            expect_version: self.expect_version.clone(),
        }
    }
}

/// Run `stackcheck verify`.
///
/// # Errors
///
/// Returns an error when configuration is invalid, provisioning fails, or
/// the run did not pass (failed checks, a run fault, or a failed teardown).
pub async fn run(ctx: &OutputContext, json_mode: bool, args: &VerifyArgs) -> Result<()> {
    let file = load_file_config(args.config.as_deref())?;
    let config = VerifyConfig::resolve(&file, &args.overrides(), current_path().as_deref())?;
    ensure_stack_dir(&config.stack.stack_dir)?;

    let terraform = TerraformCli::from_config(&config.stack);
    terraform.check_prerequisites().await?;
    let azure = AzureCli::from_subscription(
        config.subscription.clone(),
        config.stack.env_overrides.clone(),
    );
    let reporter = TerminalReporter::new(ctx);

    let report = match verify::run(&terraform, &azure, &config.expected, &reporter).await {
        Ok(report) => report,
        Err(e) => {
            if json_mode {
                println!("{}", json::format_error(&format!("{e:#}"), "provision_failed")?);
            }
            return Err(e);
        }
    };

    if json_mode {
        println!("{}", json::render_report(&report)?);
    } else {
        HumanRenderer::new(ctx).render_report(&report);
    }

    if !report.passed() {
        if report.verification_passed() {
            anyhow::bail!("teardown failed; the stack may still be provisioned");
        }
        anyhow::bail!(
            "verification failed ({} of {} checks failed)",
            report.failed_checks(),
            report.checks.len()
        );
    }
    Ok(())
}
