mod cli;
mod commands;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use shelf_repo::{RepoInteractors, ReqwestRepoApi};
use shelf_storage::FilesystemRepoStorage;
use tracing_subscriber::EnvFilter;

use crate::cli::Commands;
use crate::commands::{handle_config_command, handle_repo_command};
use crate::config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = cli::Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config_path = cli.config.unwrap_or_else(Config::default_path);

    match cli.command {
        Commands::Config { command } => handle_config_command(command, &config_path).await?,
        Commands::Repo { command } => {
            let config = Config::load(&config_path).await?;
            let data_dir = cli
                .data_dir
                .unwrap_or_else(|| PathBuf::from(&config.storage.path));

            let storage = Arc::new(FilesystemRepoStorage::open(&data_dir).await?);
            tracing::debug!(
                "Using repository list at {}",
                storage.document_path().display()
            );
            let api = Arc::new(ReqwestRepoApi::new(&config.network.api_config())?);

            handle_repo_command(command, RepoInteractors::new(storage, api)).await?;
        }
    }

    Ok(())
}
