//! Questionnaire editor state with normalized step storage.
//!
//! Steps are kept in a table keyed by id plus an ordered id list, and one
//! step can be selected as the target of step-level edits.
//! [`questionnaire_for_server`] turns the editor back into a questionnaire
//! payload with steps in display order.

use super::models::{Choice, Mode, Questionnaire, Step};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireHeader {
    pub id: Option<i64>,
    pub project_id: i64,
    pub name: String,
    pub modes: Vec<Mode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTable {
    pub ids: Vec<String>,
    pub items: HashMap<String, Step>,
    pub current: Option<String>,
}

impl StepTable {
    /// Steps in display order.
    pub fn ordered(&self) -> impl Iterator<Item = &Step> {
        self.ids.iter().filter_map(|id| self.items.get(id))
    }

    pub fn current(&self) -> Option<&Step> {
        self.current.as_ref().and_then(|id| self.items.get(id))
    }

    fn current_mut(&mut self) -> Option<&mut Step> {
        let id = self.current.as_ref()?;
        self.items.get_mut(id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireEditor {
    pub questionnaire: Option<QuestionnaireHeader>,
    pub steps: StepTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorAction {
    Initialize { questionnaire: Questionnaire },
    NewQuestionnaire { project_id: i64, modes: Vec<Mode> },
    ChangeName { name: String },
    /// Replace the mode list from comma-separated text such as `"sms,ivr"`.
    ChangeModes { modes: String },
    SelectStep { step_id: String },
    DeselectStep,
    AddStep { step: Step },
    DeleteStep,
    ChangeStepTitle { title: String },
    AddChoice,
    DeleteChoice { index: usize },
}

impl EditorAction {
    /// Append a blank step under a freshly generated id.
    pub fn add_step() -> Self {
        EditorAction::AddStep {
            step: Step::new(uuid::Uuid::new_v4().to_string()),
        }
    }
}

impl QuestionnaireEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.current()
    }

    /// Apply `action` in place. Returns `false` when nothing changed.
    pub fn update(&mut self, action: EditorAction) -> bool {
        match action {
            EditorAction::Initialize { questionnaire } => {
                self.questionnaire = Some(QuestionnaireHeader {
                    id: questionnaire.id,
                    project_id: questionnaire.project_id,
                    name: questionnaire.name,
                    modes: questionnaire.modes,
                });
                self.steps.ids = questionnaire.steps.iter().map(|s| s.id.clone()).collect();
                self.steps.items = questionnaire.steps.into_iter().map(|s| (s.id.clone(), s)).collect();
                self.steps.current = None;
                true
            }
            EditorAction::NewQuestionnaire { project_id, modes } => {
                self.questionnaire = Some(QuestionnaireHeader {
                    id: None,
                    project_id,
                    name: String::new(),
                    modes,
                });
                true
            }
            EditorAction::ChangeName { name } => match self.questionnaire.as_mut() {
                Some(header) if header.name != name => {
                    header.name = name;
                    true
                }
                _ => false,
            },
            EditorAction::ChangeModes { modes } => {
                let Some(header) = self.questionnaire.as_mut() else {
                    return false;
                };
                let parsed = parse_modes(&modes);
                if header.modes == parsed {
                    return false;
                }
                header.modes = parsed;
                true
            }
            EditorAction::SelectStep { step_id } => {
                if !self.steps.items.contains_key(&step_id) {
                    log::debug!("Cannot select unknown step {}", step_id);
                    return false;
                }
                let changed = self.steps.current.as_deref() != Some(step_id.as_str());
                self.steps.current = Some(step_id);
                changed
            }
            EditorAction::DeselectStep => self.steps.current.take().is_some(),
            EditorAction::AddStep { step } => {
                if self.steps.items.contains_key(&step.id) {
                    log::warn!("Step {} already exists", step.id);
                    return false;
                }
                self.steps.ids.push(step.id.clone());
                self.steps.current = Some(step.id.clone());
                self.steps.items.insert(step.id.clone(), step);
                true
            }
            EditorAction::DeleteStep => {
                let Some(current) = self.steps.current.take() else {
                    return false;
                };
                self.steps.ids.retain(|id| *id != current);
                self.steps.items.remove(&current);
                true
            }
            EditorAction::ChangeStepTitle { title } => match self.steps.current_mut() {
                Some(step) if step.title != title => {
                    step.title = title;
                    true
                }
                _ => false,
            },
            EditorAction::AddChoice => match self.steps.current_mut() {
                Some(step) => {
                    step.choices.push(Choice::new("Untitled option"));
                    true
                }
                None => false,
            },
            EditorAction::DeleteChoice { index } => match self.steps.current_mut() {
                Some(step) if index < step.choices.len() => {
                    step.choices.remove(index);
                    true
                }
                _ => false,
            },
        }
    }
}

fn parse_modes(modes: &str) -> Vec<Mode> {
    let mut parsed = Vec::new();
    for token in modes.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse::<Mode>() {
            Ok(mode) if !parsed.contains(&mode) => parsed.push(mode),
            Ok(_) => {}
            Err(e) => log::debug!("Skipping mode: {}", e),
        }
    }
    parsed
}

/// Rebuild the questionnaire payload, steps ordered as displayed.
pub fn questionnaire_for_server(editor: &QuestionnaireEditor) -> Option<Questionnaire> {
    let header = editor.questionnaire.as_ref()?;
    Some(Questionnaire {
        id: header.id,
        project_id: header.project_id,
        name: header.name.clone(),
        modes: header.modes.clone(),
        steps: editor.steps.ordered().cloned().collect(),
    })
}
