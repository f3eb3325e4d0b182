use super::commands::create::CreateCommand;
use super::commands::load::LoadCommand;
use super::commands::replay::ReplayCommand;
use super::commands::validate::ValidateCommand;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "survey-store")]
#[command(about = "Client-side state store for survey questionnaires, surveys and respondents")]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a questionnaire file and report every error
    Validate(ValidateCommand),
    /// Dispatch a JSON list of store actions and print the resulting store
    Replay(ReplayCommand),
    /// Fetch entities from a fixture directory through the async runtime
    Load(LoadCommand),
    /// Build a questionnaire in the step editor and save it
    Create(CreateCommand),
}
