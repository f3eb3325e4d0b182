use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use survey_store::runtime::{FixtureApi, Runtime, SurveyApi, actions};
use survey_store::store::{FetchState, Lifecycle};
use survey_store::survey::mode_label;

#[derive(Args)]
pub struct LoadCommand {
    /// Fixture directory (contains `projects/<id>/...`)
    #[arg(long)]
    pub fixtures: PathBuf,
    /// Project id
    #[arg(long)]
    pub project: i64,
    /// Questionnaire id to fetch
    #[arg(long)]
    pub questionnaire: Option<i64>,
    /// Survey id to fetch
    #[arg(long)]
    pub survey: Option<i64>,
    /// Also fetch the survey's respondent groups
    #[arg(long, requires = "survey")]
    pub respondents: bool,
    /// Panel survey id to fetch
    #[arg(long)]
    pub panel_survey: Option<i64>,
}

/// Handle load command
pub async fn handle_load_command(cmd: LoadCommand) -> anyhow::Result<()> {
    let api: Arc<dyn SurveyApi> = Arc::new(FixtureApi::new(&cmd.fixtures));
    let mut runtime = Runtime::default();

    if let Some(id) = cmd.questionnaire {
        let command = actions::fetch_questionnaire_if_needed(runtime.store(), api.clone(), cmd.project, id);
        runtime.execute(command);
    }
    if let Some(id) = cmd.survey {
        runtime.execute(actions::fetch_survey(api.clone(), cmd.project, id));
        if cmd.respondents {
            runtime.execute(actions::fetch_respondent_groups(api.clone(), cmd.project, id));
        }
    }
    if let Some(id) = cmd.panel_survey {
        runtime.execute(actions::fetch_panel_survey(api.clone(), cmd.project, id));
    }

    if runtime.pending_count() == 0 {
        println!("{}", "Nothing to load. Pass --questionnaire, --survey or --panel-survey".yellow());
        return Ok(());
    }

    println!("{}", format!("Loading {} request(s)...", runtime.pending_count()).dimmed());
    runtime.run_until_idle().await;

    let store = runtime.store();
    let mut failures = 0;
    if cmd.questionnaire.is_some() {
        failures += report("Questionnaire", &store.questionnaire, |q| {
            format!("{} ({} steps, {} errors)", q.name, q.steps.len(), store.questionnaire.errors.count())
        });
    }
    if cmd.survey.is_some() {
        failures += report("Survey", &store.survey, |s| {
            let modes: Vec<String> = s.mode.iter().map(|m| mode_label(m)).collect();
            format!("{} [{}] {}", s.name, s.state, modes.join(", "))
        });
    }
    if cmd.respondents {
        failures += report("Respondents", &store.respondent_groups, |g| {
            format!("{} groups, {} respondents", g.items.len(), g.total_respondents())
        });
    }
    if cmd.panel_survey.is_some() {
        failures += report("Panel survey", &store.panel_survey, |p| {
            format!("{} ({} occurrences)", p.name, p.occurrences.len())
        });
    }

    if failures > 0 {
        anyhow::bail!("{} request(s) failed", failures);
    }
    Ok(())
}

/// Print one slice. Returns 1 if its fetch failed.
fn report<T, F>(name: &str, state: &FetchState<T, F>, describe: impl Fn(&T) -> String) -> usize {
    let lifecycle = Lifecycle::from(state);
    let label = lifecycle.label();

    match lifecycle {
        Lifecycle::Failed(error) => {
            eprintln!("{} {} {}", format!("{}:", name).bold(), label.red(), error);
            1
        }
        other => {
            let summary = other.data().map(|data| describe(*data)).unwrap_or_default();
            println!("{} {} {}", format!("{}:", name).bold(), label.green(), summary);
            0
        }
    }
}
