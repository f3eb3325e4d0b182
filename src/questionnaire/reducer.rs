//! Edits applied to a loaded questionnaire.
//!
//! Steps are addressed by id, choices by their position inside the step.
//! Every edit builds a new questionnaire and reports `None` when the result
//! equals the input, so unknown step ids and out-of-range choice indexes
//! are no-ops.

use super::models::{AudioSource, Choice, IvrPrompt, Mode, Questionnaire, Step, StepType};
use super::validation;
use crate::store::fetch::EntityReducer;
use crate::store::filter::EntityFilter;
use crate::store::validation::ValidationErrors;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionnaireEdit {
    ChangeName { name: String },
    ToggleMode { mode: Mode },
    AddStep { step_id: String },
    DeleteStep { step_id: String },
    MoveStep { step_id: String, index: usize },
    ChangeStepTitle { step_id: String, title: String },
    ChangeStepType { step_id: String, step_type: StepType },
    ChangeStepStore { step_id: String, store: String },
    ChangeStepSmsPrompt { step_id: String, prompt: String },
    ChangeStepIvrPrompt { step_id: String, text: String, audio_source: AudioSource },
    ChangeStepIvrAudioId { step_id: String, audio_id: String },
    AddChoice { step_id: String },
    DeleteChoice { step_id: String, index: usize },
    ChangeChoice { step_id: String, change: ChoiceChange },
}

/// New contents for the choice at `index`. Response lists are given as
/// comma-separated text, the way they are typed in the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceChange {
    pub index: usize,
    pub response: String,
    #[serde(default)]
    pub sms_values: String,
    #[serde(default)]
    pub ivr_values: String,
    #[serde(default)]
    pub skip_logic: Option<String>,
    #[serde(default)]
    pub auto_complete: bool,
}

impl QuestionnaireEdit {
    /// Add a step under a freshly generated id.
    pub fn add_step() -> Self {
        QuestionnaireEdit::AddStep {
            step_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn change_name(name: impl Into<String>) -> Self {
        QuestionnaireEdit::ChangeName { name: name.into() }
    }

    pub fn toggle_mode(mode: Mode) -> Self {
        QuestionnaireEdit::ToggleMode { mode }
    }

    pub fn change_step_title(step_id: impl Into<String>, title: impl Into<String>) -> Self {
        QuestionnaireEdit::ChangeStepTitle {
            step_id: step_id.into(),
            title: title.into(),
        }
    }

    pub fn change_step_sms_prompt(step_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        QuestionnaireEdit::ChangeStepSmsPrompt {
            step_id: step_id.into(),
            prompt: prompt.into(),
        }
    }

    pub fn add_choice(step_id: impl Into<String>) -> Self {
        QuestionnaireEdit::AddChoice { step_id: step_id.into() }
    }

    pub fn delete_choice(step_id: impl Into<String>, index: usize) -> Self {
        QuestionnaireEdit::DeleteChoice {
            step_id: step_id.into(),
            index,
        }
    }

    pub fn change_choice(step_id: impl Into<String>, change: ChoiceChange) -> Self {
        QuestionnaireEdit::ChangeChoice {
            step_id: step_id.into(),
            change,
        }
    }
}

/// Apply `edit`, returning the new questionnaire or `None` if nothing changed.
pub fn apply(questionnaire: &Questionnaire, edit: &QuestionnaireEdit) -> Option<Questionnaire> {
    let mut next = questionnaire.clone();

    match edit {
        QuestionnaireEdit::ChangeName { name } => next.name = name.clone(),
        QuestionnaireEdit::ToggleMode { mode } => toggle_mode(&mut next.modes, *mode),
        QuestionnaireEdit::AddStep { step_id } => {
            if next.step_index(step_id).is_some() {
                log::warn!("Step {} already exists", step_id);
                return None;
            }
            next.steps.push(Step::new(step_id.clone()));
        }
        QuestionnaireEdit::DeleteStep { step_id } => next.steps.retain(|s| s.id != *step_id),
        QuestionnaireEdit::MoveStep { step_id, index } => {
            let from = next.step_index(step_id)?;
            let step = next.steps.remove(from);
            let to = (*index).min(next.steps.len());
            next.steps.insert(to, step);
        }
        QuestionnaireEdit::ChangeStepTitle { step_id, title } => {
            step_mut(&mut next, step_id)?.title = title.clone();
        }
        QuestionnaireEdit::ChangeStepType { step_id, step_type } => {
            let step = step_mut(&mut next, step_id)?;
            if step.step_type != *step_type {
                step.step_type = *step_type;
                step.choices.clear();
            }
        }
        QuestionnaireEdit::ChangeStepStore { step_id, store } => {
            step_mut(&mut next, step_id)?.store = store.clone();
        }
        QuestionnaireEdit::ChangeStepSmsPrompt { step_id, prompt } => {
            step_mut(&mut next, step_id)?.prompt.sms = prompt.clone();
        }
        QuestionnaireEdit::ChangeStepIvrPrompt {
            step_id,
            text,
            audio_source,
        } => {
            let ivr = step_mut(&mut next, step_id)?.prompt.ivr.get_or_insert_with(IvrPrompt::default);
            ivr.text = text.clone();
            ivr.audio_source = *audio_source;
        }
        QuestionnaireEdit::ChangeStepIvrAudioId { step_id, audio_id } => {
            let ivr = step_mut(&mut next, step_id)?.prompt.ivr.get_or_insert_with(IvrPrompt::default);
            ivr.audio_id = Some(audio_id.clone());
            ivr.audio_source = AudioSource::Upload;
        }
        QuestionnaireEdit::AddChoice { step_id } => {
            step_mut(&mut next, step_id)?.choices.push(Choice::default());
        }
        QuestionnaireEdit::DeleteChoice { step_id, index } => {
            let step = step_mut(&mut next, step_id)?;
            if *index >= step.choices.len() {
                log::debug!("Choice {} out of range in step {}", index, step_id);
                return None;
            }
            step.choices.remove(*index);
        }
        QuestionnaireEdit::ChangeChoice { step_id, change } => {
            let (sms, ivr) = choice_responses(questionnaire, step_id, change);
            let step = step_mut(&mut next, step_id)?;
            let Some(choice) = step.choices.get_mut(change.index) else {
                log::debug!("Choice {} out of range in step {}", change.index, step_id);
                return None;
            };
            choice.value = change.response.clone();
            choice.responses.sms = sms;
            choice.responses.ivr = ivr;
            choice.skip_logic = change.skip_logic.clone();
        }
    }

    (next != *questionnaire).then_some(next)
}

fn step_mut<'a>(questionnaire: &'a mut Questionnaire, step_id: &str) -> Option<&'a mut Step> {
    let step = questionnaire.steps.iter_mut().find(|s| s.id == step_id);
    if step.is_none() {
        log::debug!("No step {} in questionnaire {:?}", step_id, questionnaire.id);
    }
    step
}

fn toggle_mode(modes: &mut Vec<Mode>, mode: Mode) {
    if modes.contains(&mode) {
        modes.retain(|m| *m != mode);
    } else {
        modes.push(mode);
    }
}

/// Response lists for a changed choice, autocompleted from an existing choice
/// with the same value when both lists were left blank.
fn choice_responses(questionnaire: &Questionnaire, step_id: &str, change: &ChoiceChange) -> (Vec<String>, Vec<String>) {
    let blank = change.sms_values.is_empty() && change.ivr_values.is_empty();
    if change.auto_complete && blank && !change.response.trim().is_empty() {
        if let Some(existing) = find_choice_by_value(questionnaire, &change.response, (step_id, change.index)) {
            return (existing.responses.sms.clone(), existing.responses.ivr.clone());
        }
    }

    (split_values(&change.sms_values), split_values(&change.ivr_values))
}

fn find_choice_by_value<'a>(
    questionnaire: &'a Questionnaire,
    value: &str,
    (skip_step, skip_index): (&str, usize),
) -> Option<&'a Choice> {
    questionnaire.steps.iter().find_map(|step| {
        step.choices
            .iter()
            .enumerate()
            .find(|(i, choice)| choice.value == value && !(step.id == skip_step && *i == skip_index))
            .map(|(_, choice)| choice)
    })
}

/// Split comma-separated input into trimmed, non-empty tokens.
pub fn split_values(values: &str) -> Vec<String> {
    values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

/// Questionnaire entity for the fetch-state container.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionnaireReducer;

impl EntityReducer for QuestionnaireReducer {
    type Data = Questionnaire;
    type Edit = QuestionnaireEdit;
    type Filter = EntityFilter;

    fn filter_of(&self, data: &Questionnaire) -> EntityFilter {
        EntityFilter::of(data)
    }

    fn reduce(&self, data: &Questionnaire, edit: &QuestionnaireEdit) -> Option<Questionnaire> {
        apply(data, edit)
    }

    fn adopts_saved(&self, current: &EntityFilter, saved: &EntityFilter) -> bool {
        current.adopts(saved)
    }

    /// Local edits survive; only the server-assigned identity is taken.
    fn merge_saved(&self, local: Option<&Questionnaire>, saved: Questionnaire) -> Questionnaire {
        match local {
            Some(local) => Questionnaire {
                id: saved.id,
                project_id: saved.project_id,
                ..local.clone()
            },
            None => saved,
        }
    }

    fn validate(&self, data: &Questionnaire) -> ValidationErrors {
        validation::validate(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questionnaire() -> Questionnaire {
        let mut step = Step::new("s1");
        step.choices = vec![Choice {
            value: "Yes".into(),
            responses: super::super::models::Responses {
                sms: vec!["1".into()],
                ivr: vec!["1".into()],
            },
            skip_logic: None,
        }];

        Questionnaire {
            id: Some(5),
            project_id: 1,
            name: "Q".into(),
            modes: vec![Mode::Sms],
            steps: vec![step, Step::new("s2")],
        }
    }

    #[test]
    fn test_split_values() {
        assert_eq!(split_values(" 1, y ,,yes "), vec!["1", "y", "yes"]);
        assert!(split_values("").is_empty());
        assert!(split_values(" , ").is_empty());
    }

    #[test]
    fn test_add_and_delete_step() {
        let q = questionnaire();
        let added = apply(&q, &QuestionnaireEdit::AddStep { step_id: "s3".into() }).unwrap();
        assert_eq!(added.steps.len(), 3);
        assert_eq!(added.steps[2].step_type, StepType::MultipleChoice);
        assert_eq!(added.steps[2].prompt.ivr.as_ref().unwrap().audio_source, AudioSource::Tts);

        let removed = apply(&added, &QuestionnaireEdit::DeleteStep { step_id: "s1".into() }).unwrap();
        assert_eq!(removed.steps.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(), vec!["s2", "s3"]);

        assert!(apply(&q, &QuestionnaireEdit::DeleteStep { step_id: "nope".into() }).is_none());
        assert!(apply(&q, &QuestionnaireEdit::AddStep { step_id: "s1".into() }).is_none());
    }

    #[test]
    fn test_generated_step_ids_are_unique() {
        assert_ne!(QuestionnaireEdit::add_step(), QuestionnaireEdit::add_step());
    }

    #[test]
    fn test_move_step() {
        let q = questionnaire();
        let moved = apply(&q, &QuestionnaireEdit::MoveStep { step_id: "s1".into(), index: 9 }).unwrap();
        assert_eq!(moved.steps[1].id, "s1");
        assert!(apply(&q, &QuestionnaireEdit::MoveStep { step_id: "s1".into(), index: 0 }).is_none());
    }

    #[test]
    fn test_change_step_type_clears_choices() {
        let q = questionnaire();
        let edit = QuestionnaireEdit::ChangeStepType {
            step_id: "s1".into(),
            step_type: StepType::Numeric,
        };
        let changed = apply(&q, &edit).unwrap();
        assert_eq!(changed.steps[0].step_type, StepType::Numeric);
        assert!(changed.steps[0].choices.is_empty());

        let same = QuestionnaireEdit::ChangeStepType {
            step_id: "s1".into(),
            step_type: StepType::MultipleChoice,
        };
        assert!(apply(&q, &same).is_none());
    }

    #[test]
    fn test_ivr_prompt_and_audio() {
        let q = questionnaire();
        let prompt = QuestionnaireEdit::ChangeStepIvrPrompt {
            step_id: "s1".into(),
            text: "Press 1".into(),
            audio_source: AudioSource::Tts,
        };
        let q = apply(&q, &prompt).unwrap();
        assert_eq!(q.steps[0].prompt.ivr.as_ref().unwrap().text, "Press 1");

        let audio = QuestionnaireEdit::ChangeStepIvrAudioId {
            step_id: "s1".into(),
            audio_id: "abc".into(),
        };
        let q = apply(&q, &audio).unwrap();
        let ivr = q.steps[0].prompt.ivr.as_ref().unwrap();
        assert_eq!(ivr.audio_source, AudioSource::Upload);
        assert_eq!(ivr.audio_id.as_deref(), Some("abc"));
        assert_eq!(ivr.text, "Press 1");
    }

    #[test]
    fn test_choice_add_change_delete() {
        let q = apply(&questionnaire(), &QuestionnaireEdit::add_choice("s2")).unwrap();
        assert_eq!(q.steps[1].choices.len(), 1);

        let change = ChoiceChange {
            index: 0,
            response: "No".into(),
            sms_values: "2, n ,".into(),
            ivr_values: "2".into(),
            skip_logic: Some("end".into()),
            auto_complete: false,
        };
        let q = apply(&q, &QuestionnaireEdit::change_choice("s2", change)).unwrap();
        let choice = &q.steps[1].choices[0];
        assert_eq!(choice.value, "No");
        assert_eq!(choice.responses.sms, vec!["2", "n"]);
        assert_eq!(choice.responses.ivr, vec!["2"]);
        assert_eq!(choice.skip_logic.as_deref(), Some("end"));

        assert!(apply(&q, &QuestionnaireEdit::delete_choice("s2", 4)).is_none());
        let q = apply(&q, &QuestionnaireEdit::delete_choice("s2", 0)).unwrap();
        assert!(q.steps[1].choices.is_empty());
    }

    #[test]
    fn test_change_choice_out_of_range_is_noop() {
        let change = ChoiceChange {
            index: 3,
            response: "x".into(),
            ..Default::default()
        };
        assert!(apply(&questionnaire(), &QuestionnaireEdit::change_choice("s1", change)).is_none());
    }

    #[test]
    fn test_autocomplete_copies_existing_responses() {
        let q = apply(&questionnaire(), &QuestionnaireEdit::add_choice("s2")).unwrap();
        let change = ChoiceChange {
            index: 0,
            response: "Yes".into(),
            auto_complete: true,
            ..Default::default()
        };
        let q = apply(&q, &QuestionnaireEdit::change_choice("s2", change)).unwrap();
        let choice = &q.steps[1].choices[0];
        assert_eq!(choice.responses.sms, vec!["1"]);
        assert_eq!(choice.responses.ivr, vec!["1"]);
    }

    #[test]
    fn test_autocomplete_skipped_when_values_given() {
        let q = apply(&questionnaire(), &QuestionnaireEdit::add_choice("s2")).unwrap();
        let change = ChoiceChange {
            index: 0,
            response: "Yes".into(),
            sms_values: "y".into(),
            auto_complete: true,
            ..Default::default()
        };
        let q = apply(&q, &QuestionnaireEdit::change_choice("s2", change)).unwrap();
        assert_eq!(q.steps[1].choices[0].responses.sms, vec!["y"]);
        assert!(q.steps[1].choices[0].responses.ivr.is_empty());
    }

    #[test]
    fn test_autocomplete_needs_untouched_inputs() {
        let q = apply(&questionnaire(), &QuestionnaireEdit::add_choice("s2")).unwrap();
        let change = ChoiceChange {
            index: 0,
            response: "Yes".into(),
            sms_values: " ".into(),
            auto_complete: true,
            ..Default::default()
        };
        let q = apply(&q, &QuestionnaireEdit::change_choice("s2", change)).unwrap();
        assert!(q.steps[1].choices[0].responses.sms.is_empty());
        assert!(q.steps[1].choices[0].responses.ivr.is_empty());
    }

    #[test]
    fn test_merge_saved_keeps_local_edits() {
        let mut local = questionnaire();
        local.id = None;
        local.name = "Local".into();
        let mut saved = questionnaire();
        saved.id = Some(42);
        saved.name = "Server".into();

        let merged = QuestionnaireReducer.merge_saved(Some(&local), saved.clone());
        assert_eq!(merged.id, Some(42));
        assert_eq!(merged.name, "Local");

        assert_eq!(QuestionnaireReducer.merge_saved(None, saved.clone()), saved);
    }

    #[test]
    fn test_toggle_mode() {
        let q = questionnaire();
        let q = apply(&q, &QuestionnaireEdit::toggle_mode(Mode::Ivr)).unwrap();
        assert_eq!(q.modes, vec![Mode::Sms, Mode::Ivr]);
        let q = apply(&q, &QuestionnaireEdit::toggle_mode(Mode::Sms)).unwrap();
        assert_eq!(q.modes, vec![Mode::Ivr]);
    }

    #[test]
    fn test_unchanged_title_is_noop() {
        let q = questionnaire();
        assert!(apply(&q, &QuestionnaireEdit::change_step_title("s1", "")).is_none());
        assert!(apply(&q, &QuestionnaireEdit::change_name("Q")).is_none());
    }

    #[test]
    fn test_edit_serialization_is_tagged() {
        let edit = QuestionnaireEdit::change_step_title("s1", "Age");
        let json = serde_json::to_value(&edit).unwrap();
        assert_eq!(json, serde_json::json!({"type": "change_step_title", "step_id": "s1", "title": "Age"}));
    }
}
