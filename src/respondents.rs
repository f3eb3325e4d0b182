//! Respondent groups uploaded to a survey and the channels they use.
//!
//! Groups are fetched as one collection per survey, so this container keys
//! its state by `{project_id, survey_id}` instead of the default entity
//! filter.

use crate::questionnaire::Mode;
use crate::store::fetch::EntityReducer;
use crate::store::filter::lenient_id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyFilter {
    pub project_id: i64,
    pub survey_id: i64,
}

impl SurveyFilter {
    pub fn new(project_id: i64, survey_id: i64) -> Self {
        Self { project_id, survey_id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSelection {
    pub id: i64,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondentGroup {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub respondents_count: u64,
    /// A few phone numbers from the uploaded file, for display.
    #[serde(default)]
    pub sample: Vec<String>,
    #[serde(default)]
    pub channels: Vec<ChannelSelection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondentGroups {
    pub project_id: i64,
    pub survey_id: i64,
    #[serde(default)]
    pub items: BTreeMap<i64, RespondentGroup>,
}

impl RespondentGroups {
    pub fn new(project_id: i64, survey_id: i64, groups: impl IntoIterator<Item = RespondentGroup>) -> Self {
        Self {
            project_id,
            survey_id,
            items: groups.into_iter().map(|g| (g.id, g)).collect(),
        }
    }

    pub fn total_respondents(&self) -> u64 {
        self.items.values().map(|g| g.respondents_count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RespondentGroupEdit {
    Uploaded { group: RespondentGroup },
    Removed { group_id: i64 },
    SelectChannels { group_id: i64, channels: Vec<ChannelSelection> },
    /// Drop channels whose mode the survey no longer uses.
    RetainChannelsForModes { modes: Vec<Mode> },
}

pub fn apply(groups: &RespondentGroups, edit: &RespondentGroupEdit) -> Option<RespondentGroups> {
    let mut next = groups.clone();

    match edit {
        RespondentGroupEdit::Uploaded { group } => {
            next.items.insert(group.id, group.clone());
        }
        RespondentGroupEdit::Removed { group_id } => {
            next.items.remove(group_id)?;
        }
        RespondentGroupEdit::SelectChannels { group_id, channels } => {
            next.items.get_mut(group_id)?.channels = channels.clone();
        }
        RespondentGroupEdit::RetainChannelsForModes { modes } => {
            for group in next.items.values_mut() {
                group.channels.retain(|c| modes.contains(&c.mode));
            }
        }
    }

    (next != *groups).then_some(next)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RespondentGroupReducer;

impl EntityReducer for RespondentGroupReducer {
    type Data = RespondentGroups;
    type Edit = RespondentGroupEdit;
    type Filter = SurveyFilter;

    fn filter_of(&self, data: &RespondentGroups) -> SurveyFilter {
        SurveyFilter::new(data.project_id, data.survey_id)
    }

    fn reduce(&self, data: &RespondentGroups, edit: &RespondentGroupEdit) -> Option<RespondentGroups> {
        apply(data, edit)
    }
}
