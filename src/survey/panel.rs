use crate::store::fetch::EntityReducer;
use crate::store::filter::{EntityFilter, Identified, lenient_id, lenient_optional_id};
use serde::{Deserialize, Serialize};

/// A recurring survey; each occurrence is a regular survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSurvey {
    #[serde(default, deserialize_with = "lenient_optional_id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient_id")]
    pub project_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub occurrences: Vec<i64>,
}

impl PanelSurvey {
    pub fn latest_occurrence(&self) -> Option<i64> {
        self.occurrences.last().copied()
    }
}

impl Identified for PanelSurvey {
    fn project_id(&self) -> i64 {
        self.project_id
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// Panel surveys are only fetched, never edited locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelSurveyEdit {}

#[derive(Debug, Clone, Copy, Default)]
pub struct PanelSurveyReducer;

impl EntityReducer for PanelSurveyReducer {
    type Data = PanelSurvey;
    type Edit = PanelSurveyEdit;
    type Filter = EntityFilter;

    fn filter_of(&self, data: &PanelSurvey) -> EntityFilter {
        EntityFilter::of(data)
    }

    fn reduce(&self, _data: &PanelSurvey, edit: &PanelSurveyEdit) -> Option<PanelSurvey> {
        match *edit {}
    }
}
