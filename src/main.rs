use anyhow::Result;
use clap::Parser;

use medihelp::{cli::Cli, runtime::Orchestrator, utils::init_logger};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logger(cli.verbose);

    let orchestrator = Orchestrator::new(cli)?;
    let success = orchestrator.run().await?;

    // Exit with appropriate code
    if !success {
        std::process::exit(1);
    }

    Ok(())
}
