pub mod create;
pub mod load;
pub mod replay;
pub mod validate;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use survey_store::questionnaire::Questionnaire;
use survey_store::store::NormalizedResponse;

pub use create::handle_create_command;
pub use load::handle_load_command;
pub use replay::handle_replay_command;
pub use validate::handle_validate_command;

/// Read a questionnaire stored either raw or as a normalized response.
pub fn read_questionnaire(path: &Path) -> Result<Questionnaire> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read questionnaire: {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))?;

    if value.get("entities").is_some() {
        let response: NormalizedResponse = serde_json::from_value(value)?;
        return response.primary("questionnaires");
    }
    serde_json::from_value(value).with_context(|| format!("Not a questionnaire: {}", path.display()))
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize output")
}
