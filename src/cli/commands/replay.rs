use super::to_json;
use anyhow::Context;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use survey_store::store::{Store, StoreAction};

#[derive(Args)]
pub struct ReplayCommand {
    /// JSON file holding an array of store actions
    pub file: PathBuf,
    /// Print only this slice of the store (e.g. `questionnaire`, `respondentGroups`)
    #[arg(short, long)]
    pub slice: Option<String>,
}

/// Handle replay command
pub async fn handle_replay_command(cmd: ReplayCommand, pretty: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&cmd.file)
        .with_context(|| format!("Failed to read actions: {}", cmd.file.display()))?;
    let actions: Vec<StoreAction> =
        serde_json::from_str(&content).with_context(|| format!("Invalid action list in {}", cmd.file.display()))?;

    let mut store = Store::new();
    let total = actions.len();
    let mut changed = 0;
    for action in actions {
        if store.dispatch(action) {
            changed += 1;
        }
    }
    log::info!("Replayed {} actions, {} changed the store", total, changed);
    eprintln!("{}", format!("Replayed {} actions ({} changed the store)", total, changed).dimmed());

    let output = serde_json::to_value(&store).context("Failed to serialize store")?;
    let output = match cmd.slice {
        Some(slice) => output
            .get(&slice)
            .cloned()
            .with_context(|| format!("Unknown store slice '{}'", slice))?,
        None => output,
    };

    println!("{}", to_json(&output, pretty)?);
    Ok(())
}
