//! Chat-style simulation of a questionnaire over SMS.

use crate::questionnaire::{Mode, Questionnaire};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
    Active,
    Ended,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `"ao"` for messages sent to the respondent, `"at"` for replies.
    #[serde(rename = "type")]
    pub message_type: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub step_id: String,
    #[serde(default)]
    pub response: Option<String>,
}

/// Server reply to a message sent into a running simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    #[serde(default)]
    pub messages_history: Vec<ChatMessage>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    pub simulation_status: SimulationStatus,
    #[serde(default)]
    pub disposition: String,
    #[serde(default)]
    pub current_step: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub messages_history: Vec<ChatMessage>,
    pub submissions: Vec<Submission>,
    pub simulation_status: SimulationStatus,
    pub disposition: String,
    pub respondent_id: String,
    pub current_step: Option<String>,
    pub questionnaire: Questionnaire,
}

/// Something the user should be told after applying a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationNotice {
    Ended,
    Expired,
}

impl SimulationNotice {
    pub fn message(&self) -> &'static str {
        match self {
            SimulationNotice::Ended => "This simulation is ended. Please refresh to start a new one",
            SimulationNotice::Expired => "This simulation is expired. Please refresh to start a new one",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimulationAction {
    Started { simulation: Simulation },
    MessageResult { result: SimulationResult },
    Closed,
}

impl Simulation {
    /// Only SMS simulations are supported.
    pub fn supports(mode: Mode) -> bool {
        mode == Mode::Sms
    }

    pub fn is_finished(&self) -> bool {
        self.simulation_status != SimulationStatus::Active
    }

    /// Merge a message result. An expired result keeps the transcript so the
    /// user can still read it; only the status changes.
    pub fn apply_result(&mut self, result: SimulationResult) -> Option<SimulationNotice> {
        match result.simulation_status {
            SimulationStatus::Expired => {
                self.simulation_status = SimulationStatus::Expired;
                Some(SimulationNotice::Expired)
            }
            status => {
                self.messages_history = result.messages_history;
                self.submissions = result.submissions;
                self.simulation_status = status;
                self.disposition = result.disposition;
                self.current_step = result.current_step;
                (status == SimulationStatus::Ended).then_some(SimulationNotice::Ended)
            }
        }
    }

    /// Submitted response for a step, if any.
    pub fn response_for(&self, step_id: &str) -> Option<&str> {
        self.submissions
            .iter()
            .find(|s| s.step_id == step_id)
            .and_then(|s| s.response.as_deref())
    }
}
