//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::output::OutputContext;

/// End-to-end topology verification for Terraform-provisioned Azure stacks
#[derive(Parser)]
#[command(
    name = "stackcheck",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision the stack, verify its topology, and tear it down
    Verify(commands::verify::VerifyArgs),

    /// Tear down a stack left behind by an interrupted run
    Destroy(commands::destroy::DestroyArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            no_color,
            quiet,
            json,
            command,
        } = self;
        match command {
            Command::Version => {
                commands::version::run(json);
                Ok(())
            }
            Command::Verify(args) => {
                // JSON mode keeps stdout machine-readable, so progress lines
                // are suppressed the same way --quiet suppresses them.
                let ctx = OutputContext::new(no_color, quiet || json);
                commands::verify::run(&ctx, json, &args).await
            }
            Command::Destroy(args) => {
                let ctx = OutputContext::new(no_color, quiet || json);
                commands::destroy::run(&ctx, &args).await
            }
        }
    }
}
