//! mediashelf CLI binary.
//!
//! Operator access to the collection store:
//! - List and inspect collections
//! - Create a collection from local files
//! - Delete a collection

use clap::Parser;
use mediashelf::cli::{Cli, handle_command};
use mediashelf::{FileSystemCollections, ShelfConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --verbose picks debug over info.
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ShelfConfig::from_file(path)?,
        None => ShelfConfig::load()?,
    };
    tracing::debug!(root = %config.storage_root().display(), "Loaded configuration");

    let store = FileSystemCollections::new(config).await?;
    let succeeded = handle_command(&store, cli.command, &mut std::io::stdout()).await?;

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
