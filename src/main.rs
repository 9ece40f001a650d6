//! Stackcheck CLI - End-to-end topology verification for Terraform-provisioned Azure stacks

use clap::Parser;

use stackcheck_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
