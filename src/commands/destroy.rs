//! `stackcheck destroy` — manual teardown of a stack left behind by an
//! interrupted run.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::application::services::teardown;
use crate::commands::{current_path, ensure_stack_dir, load_file_config};
use crate::domain::config::{CliOverrides, StackConfig};
use crate::infra::terraform::TerraformCli;
use crate::output::{OutputContext, TerminalReporter};

/// Arguments for the destroy command.
#[derive(Args)]
pub struct DestroyArgs {
    /// Path to a YAML config file (default: ./stackcheck.yaml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the Terraform root module
    #[arg(long, value_name = "DIR")]
    pub stack_dir: Option<PathBuf>,

    /// Prefix seeding the provisioned resource names
    #[arg(long)]
    pub label_prefix: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run `stackcheck destroy`.
///
/// # Errors
///
/// Returns an error when configuration is invalid or the destroy fails.
pub async fn run(ctx: &OutputContext, args: &DestroyArgs) -> Result<()> {
    let file = load_file_config(args.config.as_deref())?;
    let overrides = CliOverrides {
        stack_dir: args.stack_dir.clone(),
        label_prefix: args.label_prefix.clone(),
        ..CliOverrides::default()
    };
    let config = StackConfig::resolve(&file, &overrides, current_path().as_deref())?;
    ensure_stack_dir(&config.stack_dir)?;

    if !confirmed(args)? {
        println!("Cancelled.");
        return Ok(());
    }

    let terraform = TerraformCli::from_config(&config);
    terraform.check_prerequisites().await?;
    let reporter = TerminalReporter::new(ctx);
    teardown::run(&terraform, &reporter).await
}

/// Prompt before destroying. Skipped with `--yes` or in CI, where no TTY is
/// available to answer.
fn confirmed(args: &DestroyArgs) -> Result<bool> {
    if args.yes || std::env::var_os("CI").is_some() {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt("Destroy the provisioned stack?")
        .default(false)
        .interact()?;
    Ok(confirmed)
}
