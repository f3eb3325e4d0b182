use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use survey_store::config::Config;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&config.logging.file)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting survey-store");
    debug!("Using config: {:?}", config);

    // Handle commands
    match cli.command {
        Commands::Validate(args) => {
            cli::commands::handle_validate_command(args).await?;
        }
        Commands::Replay(args) => {
            cli::commands::handle_replay_command(args, config.output.pretty).await?;
        }
        Commands::Load(args) => {
            cli::commands::handle_load_command(args).await?;
        }
        Commands::Create(args) => {
            cli::commands::handle_create_command(args, &config).await?;
        }
    }

    Ok(())
}
