use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use survey_store::config::Config;
use survey_store::questionnaire::{EditorAction, questionnaire_for_server};
use survey_store::runtime::{FixtureApi, Runtime, SurveyApi, actions};
use survey_store::store::{EntityFilter, FetchAction, StoreAction};

#[derive(Args)]
pub struct CreateCommand {
    /// Fixture directory the questionnaire is saved into
    #[arg(long)]
    pub fixtures: PathBuf,
    /// Project id
    #[arg(long)]
    pub project: i64,
    /// Questionnaire name
    #[arg(long)]
    pub name: String,
    /// Number of blank steps to add
    #[arg(long, default_value_t = 1)]
    pub steps: usize,
}

/// Handle create command
pub async fn handle_create_command(cmd: CreateCommand, config: &Config) -> anyhow::Result<()> {
    let api: Arc<dyn SurveyApi> = Arc::new(FixtureApi::new(&cmd.fixtures));
    let mut runtime = Runtime::default();

    runtime.dispatch(StoreAction::Editor(EditorAction::NewQuestionnaire {
        project_id: cmd.project,
        modes: config.editor.default_modes.clone(),
    }));
    runtime.dispatch(StoreAction::Editor(EditorAction::ChangeName { name: cmd.name.clone() }));
    for i in 0..cmd.steps {
        runtime.dispatch(StoreAction::Editor(EditorAction::add_step()));
        runtime.dispatch(StoreAction::Editor(EditorAction::ChangeStepTitle {
            title: format!("Question {}", i + 1),
        }));
        runtime.dispatch(StoreAction::Editor(EditorAction::AddChoice));
        runtime.dispatch(StoreAction::Editor(EditorAction::AddChoice));
    }
    runtime.dispatch(StoreAction::Editor(EditorAction::DeselectStep));

    let Some(questionnaire) = questionnaire_for_server(&runtime.store().questionnaire_editor) else {
        anyhow::bail!("Editor holds no questionnaire");
    };

    // Load the draft into the questionnaire slice so the save goes through it.
    let filter = EntityFilter::new(questionnaire.project_id, questionnaire.id);
    runtime.dispatch(StoreAction::Questionnaire(FetchAction::Fetch(filter)));
    runtime.dispatch(StoreAction::Questionnaire(FetchAction::Receive(questionnaire)));

    let open_errors = runtime.store().questionnaire.errors.count();
    if open_errors > 0 {
        println!("{}", format!("Draft has {} validation error(s) to fix later", open_errors).yellow());
    }

    runtime.execute(actions::save_questionnaire(runtime.store(), api));
    runtime.run_until_idle().await;

    let state = &runtime.store().questionnaire;
    if let Some(error) = &state.save_error {
        anyhow::bail!("Save failed: {}", error);
    }

    let id = state.data().and_then(|q| q.id).map(|id| id.to_string()).unwrap_or_default();
    println!("{}", format!("✓ Created questionnaire {} ({})", id, cmd.name).green());
    Ok(())
}
