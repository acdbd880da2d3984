use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use tempfiles::{cli::Cli, runtime::Orchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let result = match Orchestrator::new(cli) {
        Ok(orchestrator) => orchestrator.run().await,
        Err(e) => Err(e),
    };

    // Classified failures carry a user-facing message; exit non-zero with it
    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
