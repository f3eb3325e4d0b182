//! Action creators that talk to a [`SurveyApi`].
//!
//! Each one returns a [`Command`]: the synchronous lifecycle action is
//! dispatched right away, the request itself runs as a pending future whose
//! outcome becomes the follow-up action.

use super::api::SurveyApi;
use super::command::Command;
use crate::respondents::SurveyFilter;
use crate::store::{EntityFilter, FetchAction, Store, StoreAction};
use std::sync::Arc;

fn describe(error: anyhow::Error) -> String {
    format!("{:#}", error)
}

pub fn fetch_questionnaire(api: Arc<dyn SurveyApi>, project_id: i64, id: i64) -> Command {
    let filter = EntityFilter::new(project_id, id);
    Command::batch(vec![
        Command::dispatch(StoreAction::Questionnaire(FetchAction::Fetch(filter))),
        Command::perform(
            async move { api.fetch_questionnaire(project_id, id).await },
            move |result| {
                StoreAction::Questionnaire(match result {
                    Ok(questionnaire) => FetchAction::Receive(questionnaire),
                    Err(e) => FetchAction::FetchFailed { filter, error: describe(e) },
                })
            },
        ),
    ])
}

/// Like [`fetch_questionnaire`], but does nothing while the same
/// questionnaire is already loading or loaded.
pub fn fetch_questionnaire_if_needed(store: &Store, api: Arc<dyn SurveyApi>, project_id: i64, id: i64) -> Command {
    if !store.questionnaire.needs_fetch(&EntityFilter::new(project_id, id)) {
        log::debug!("Questionnaire {} already requested", id);
        return Command::None;
    }
    fetch_questionnaire(api, project_id, id)
}

/// Save the loaded questionnaire. Nothing happens when none is loaded.
pub fn save_questionnaire(store: &Store, api: Arc<dyn SurveyApi>) -> Command {
    let Some(questionnaire) = store.questionnaire.data().cloned() else {
        log::warn!("Nothing to save: no questionnaire loaded");
        return Command::None;
    };

    Command::batch(vec![
        Command::dispatch(StoreAction::Questionnaire(FetchAction::Saving)),
        Command::perform(
            async move { api.save_questionnaire(&questionnaire).await },
            |result| {
                StoreAction::Questionnaire(match result {
                    Ok(saved) => FetchAction::Saved(Some(saved)),
                    Err(e) => FetchAction::SaveFailed(describe(e)),
                })
            },
        ),
    ])
}

pub fn fetch_survey(api: Arc<dyn SurveyApi>, project_id: i64, id: i64) -> Command {
    let filter = EntityFilter::new(project_id, id);
    Command::batch(vec![
        Command::dispatch(StoreAction::Survey(FetchAction::Fetch(filter))),
        Command::perform(
            async move { api.fetch_survey(project_id, id).await },
            move |result| {
                StoreAction::Survey(match result {
                    Ok(survey) => FetchAction::Receive(survey),
                    Err(e) => FetchAction::FetchFailed { filter, error: describe(e) },
                })
            },
        ),
    ])
}

pub fn fetch_panel_survey(api: Arc<dyn SurveyApi>, project_id: i64, id: i64) -> Command {
    let filter = EntityFilter::new(project_id, id);
    Command::batch(vec![
        Command::dispatch(StoreAction::PanelSurvey(FetchAction::Fetch(filter))),
        Command::perform(
            async move { api.fetch_panel_survey(project_id, id).await },
            move |result| {
                StoreAction::PanelSurvey(match result {
                    Ok(panel_survey) => FetchAction::Receive(panel_survey),
                    Err(e) => FetchAction::FetchFailed { filter, error: describe(e) },
                })
            },
        ),
    ])
}

pub fn fetch_respondent_groups(api: Arc<dyn SurveyApi>, project_id: i64, survey_id: i64) -> Command {
    let filter = SurveyFilter::new(project_id, survey_id);
    Command::batch(vec![
        Command::dispatch(StoreAction::RespondentGroups(FetchAction::Fetch(filter))),
        Command::perform(
            async move { api.fetch_respondent_groups(project_id, survey_id).await },
            move |result| {
                StoreAction::RespondentGroups(match result {
                    Ok(groups) => FetchAction::Receive(groups),
                    Err(e) => FetchAction::FetchFailed { filter, error: describe(e) },
                })
            },
        ),
    ])
}
