//! The application store: one fetch-state container per entity plus the
//! editor and simulation slices, all updated through [`Store::dispatch`].

pub mod envelope;
pub mod fetch;
pub mod filter;
pub mod lifecycle;
pub mod validation;

pub use envelope::NormalizedResponse;
pub use fetch::{EntityReducer, FetchAction, FetchReducer, FetchState};
pub use filter::{EntityFilter, Identified};
pub use lifecycle::Lifecycle;
pub use validation::ValidationErrors;

use crate::questionnaire::{EditorAction, Questionnaire, QuestionnaireEdit, QuestionnaireEditor, QuestionnaireReducer};
use crate::respondents::{RespondentGroupEdit, RespondentGroupReducer, RespondentGroups, SurveyFilter};
use crate::simulation::{Simulation, SimulationAction, SimulationNotice};
use crate::survey::{PanelSurvey, PanelSurveyEdit, PanelSurveyReducer, Survey, SurveyEdit, SurveyReducer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "slice", content = "action", rename_all = "snake_case")]
pub enum StoreAction {
    Questionnaire(FetchAction<Questionnaire, QuestionnaireEdit>),
    Survey(FetchAction<Survey, SurveyEdit>),
    PanelSurvey(FetchAction<PanelSurvey, PanelSurveyEdit>),
    RespondentGroups(FetchAction<RespondentGroups, RespondentGroupEdit, SurveyFilter>),
    Editor(EditorAction),
    Simulation(SimulationAction),
}

impl StoreAction {
    /// Name of the slice the action targets.
    pub fn slice(&self) -> &'static str {
        match self {
            StoreAction::Questionnaire(_) => "questionnaire",
            StoreAction::Survey(_) => "survey",
            StoreAction::PanelSurvey(_) => "panel_survey",
            StoreAction::RespondentGroups(_) => "respondent_groups",
            StoreAction::Editor(_) => "editor",
            StoreAction::Simulation(_) => "simulation",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub questionnaire: FetchState<Questionnaire>,
    pub survey: FetchState<Survey>,
    pub panel_survey: FetchState<PanelSurvey>,
    pub respondent_groups: FetchState<RespondentGroups, SurveyFilter>,
    pub questionnaire_editor: QuestionnaireEditor,
    pub simulation: Option<Simulation>,
    #[serde(skip)]
    pub simulation_notice: Option<SimulationNotice>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action. Returns `false` when no slice changed.
    pub fn dispatch(&mut self, action: StoreAction) -> bool {
        log::debug!("Dispatching {} action", action.slice());

        match action {
            StoreAction::Questionnaire(action) => {
                FetchReducer::new(QuestionnaireReducer).update(&mut self.questionnaire, action)
            }
            StoreAction::Survey(action) => {
                let touches_modes = matches!(&action, FetchAction::Edit(edit) if edit.touches_modes());
                let changed = FetchReducer::new(SurveyReducer).update(&mut self.survey, action);
                if changed && touches_modes {
                    self.sync_channels_with_survey_modes();
                }
                changed
            }
            StoreAction::PanelSurvey(action) => {
                FetchReducer::new(PanelSurveyReducer).update(&mut self.panel_survey, action)
            }
            StoreAction::RespondentGroups(action) => {
                FetchReducer::new(RespondentGroupReducer).update(&mut self.respondent_groups, action)
            }
            StoreAction::Editor(action) => self.questionnaire_editor.update(action),
            StoreAction::Simulation(action) => self.update_simulation(action),
        }
    }

    /// Drop respondent channels for modes the loaded survey no longer uses.
    fn sync_channels_with_survey_modes(&mut self) {
        let Some(survey) = self.survey.data() else {
            return;
        };
        let same_survey = self
            .respondent_groups
            .data()
            .is_some_and(|groups| groups.project_id == survey.project_id && Some(groups.survey_id) == survey.id);
        if !same_survey {
            return;
        }

        let modes = survey.active_modes();
        let edit = RespondentGroupEdit::RetainChannelsForModes { modes };
        if FetchReducer::new(RespondentGroupReducer).update(&mut self.respondent_groups, FetchAction::Edit(edit)) {
            log::debug!("Dropped respondent channels for modes no longer in use");
        }
    }

    fn update_simulation(&mut self, action: SimulationAction) -> bool {
        match action {
            SimulationAction::Started { simulation } => {
                log::info!("Simulation started for respondent {}", simulation.respondent_id);
                self.simulation = Some(simulation);
                self.simulation_notice = None;
                true
            }
            SimulationAction::MessageResult { result } => {
                let Some(simulation) = self.simulation.as_mut() else {
                    log::debug!("Ignoring simulation result: no simulation running");
                    return false;
                };
                self.simulation_notice = simulation.apply_result(result);
                if let Some(notice) = self.simulation_notice {
                    log::info!("{}", notice.message());
                }
                true
            }
            SimulationAction::Closed => {
                self.simulation_notice = None;
                self.simulation.take().is_some()
            }
        }
    }
}
