use super::read_questionnaire;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use survey_store::questionnaire::validate;

#[derive(Args)]
pub struct ValidateCommand {
    /// Questionnaire JSON file (raw or normalized response)
    pub file: PathBuf,
}

/// Handle validate command
pub async fn handle_validate_command(cmd: ValidateCommand) -> anyhow::Result<()> {
    let questionnaire = read_questionnaire(&cmd.file)?;
    let errors = validate(&questionnaire);

    println!(
        "Questionnaire {} ({} steps)",
        questionnaire.name.cyan(),
        questionnaire.steps.len()
    );

    if errors.is_empty() {
        println!("{}", "✓ No validation errors".green());
        return Ok(());
    }

    for (path, messages) in errors.iter() {
        for message in messages {
            println!("  {} {}", path.yellow(), message);
        }
    }
    println!();
    anyhow::bail!("{} validation error(s) in {}", errors.count(), cmd.file.display())
}
