use super::models::Survey;
use crate::questionnaire::Mode;
use crate::store::fetch::EntityReducer;
use crate::store::filter::EntityFilter;
use crate::store::validation::ValidationErrors;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurveyEdit {
    ChangeName { name: String },
    /// Choose a mode combination. With mode comparison on, a new
    /// combination is added next to the existing ones.
    SelectModes { modes: Vec<Mode> },
    RemoveModeCombination { modes: Vec<Mode> },
    ChangeModeComparison,
    SelectQuestionnaires { ids: Vec<i64> },
    ChangeCutoff { cutoff: Option<i64> },
}

impl SurveyEdit {
    /// Whether the edit can change the survey's mode list.
    pub fn touches_modes(&self) -> bool {
        matches!(
            self,
            SurveyEdit::SelectModes { .. } | SurveyEdit::RemoveModeCombination { .. } | SurveyEdit::ChangeModeComparison
        )
    }
}

pub fn apply(survey: &Survey, edit: &SurveyEdit) -> Option<Survey> {
    let mut next = survey.clone();

    match edit {
        SurveyEdit::ChangeName { name } => next.name = name.clone(),
        SurveyEdit::SelectModes { modes } => {
            if modes.is_empty() {
                return None;
            }
            if !next.mode_comparison {
                next.mode = vec![modes.clone()];
            } else if !next.mode.contains(modes) {
                next.mode.push(modes.clone());
            }
        }
        SurveyEdit::RemoveModeCombination { modes } => next.mode.retain(|m| m != modes),
        SurveyEdit::ChangeModeComparison => {
            next.mode_comparison = !next.mode_comparison;
            if !next.mode_comparison {
                next.mode.truncate(1);
            }
        }
        SurveyEdit::SelectQuestionnaires { ids } => next.questionnaire_ids = ids.clone(),
        SurveyEdit::ChangeCutoff { cutoff } => next.cutoff = *cutoff,
    }

    (next != *survey).then_some(next)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SurveyReducer;

impl EntityReducer for SurveyReducer {
    type Data = Survey;
    type Edit = SurveyEdit;
    type Filter = EntityFilter;

    fn filter_of(&self, data: &Survey) -> EntityFilter {
        EntityFilter::of(data)
    }

    fn reduce(&self, data: &Survey, edit: &SurveyEdit) -> Option<Survey> {
        if !data.is_editable() {
            log::warn!("Survey {:?} is {} and cannot be edited", data.id, data.state);
            return None;
        }
        apply(data, edit)
    }

    fn validate(&self, data: &Survey) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if data.mode.is_empty() {
            errors.add("mode", "A mode must be selected");
        }
        if data.questionnaire_ids.is_empty() {
            errors.add("questionnaireIds", "A questionnaire must be selected");
        }
        if data.mode_comparison && data.questionnaire_ids.len() > 1 {
            errors.add("modeComparison", "Mode comparison requires a single questionnaire");
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey() -> Survey {
        Survey {
            id: Some(3),
            project_id: 1,
            name: "Baseline".into(),
            state: "not_ready".into(),
            questionnaire_ids: vec![10],
            mode: vec![vec![Mode::Sms]],
            mode_comparison: false,
            cutoff: None,
        }
    }

    #[test]
    fn test_select_modes_replaces_without_comparison() {
        let edit = SurveyEdit::SelectModes {
            modes: vec![Mode::Ivr, Mode::Sms],
        };
        let next = apply(&survey(), &edit).unwrap();
        assert_eq!(next.mode, vec![vec![Mode::Ivr, Mode::Sms]]);
        assert!(apply(&next, &edit).is_none());
    }

    #[test]
    fn test_mode_comparison_collects_combinations() {
        let s = apply(&survey(), &SurveyEdit::ChangeModeComparison).unwrap();
        let s = apply(&s, &SurveyEdit::SelectModes { modes: vec![Mode::Ivr] }).unwrap();
        assert_eq!(s.mode, vec![vec![Mode::Sms], vec![Mode::Ivr]]);
        assert!(apply(&s, &SurveyEdit::SelectModes { modes: vec![Mode::Ivr] }).is_none());

        let s = apply(&s, &SurveyEdit::ChangeModeComparison).unwrap();
        assert!(!s.mode_comparison);
        assert_eq!(s.mode, vec![vec![Mode::Sms]]);
    }

    #[test]
    fn test_remove_combination_and_validation() {
        let s = apply(&survey(), &SurveyEdit::RemoveModeCombination { modes: vec![Mode::Sms] }).unwrap();
        assert!(s.mode.is_empty());
        let errors = SurveyReducer.validate(&s);
        assert_eq!(errors.get("mode"), &["A mode must be selected".to_string()]);
    }

    #[test]
    fn test_running_survey_is_locked() {
        let mut s = survey();
        s.state = "running".into();
        assert!(SurveyReducer.reduce(&s, &SurveyEdit::ChangeName { name: "x".into() }).is_none());
    }

    #[test]
    fn test_empty_mode_selection_ignored() {
        assert!(apply(&survey(), &SurveyEdit::SelectModes { modes: vec![] }).is_none());
    }
}
