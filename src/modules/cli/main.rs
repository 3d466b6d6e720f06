//! Asterbench CLI
//!
//! Command-line benchmark client for SQL++ query services.

use asterbench_cli::{Cli, Commands};
use asterbench_core::AsterbenchError;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AsterbenchError> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = cli.load_config()?;

    // Execute command
    match cli.command {
        Commands::Schema(cmd) => cmd.execute(config).await?,
        Commands::Read(cmd) => cmd.execute(config).await?,
        Commands::Scan(cmd) => cmd.execute(config).await?,
        Commands::Insert(cmd) => cmd.execute(config).await?,
        Commands::Update(cmd) => cmd.execute(config).await?,
        Commands::Delete(cmd) => cmd.execute(config).await?,
        Commands::Load(cmd) => cmd.execute(config).await?,
    }

    Ok(())
}
