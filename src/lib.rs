//! Client-side state store for a survey platform: generic fetch-state
//! containers, per-entity reducers for questionnaires, surveys, respondent
//! groups and simulations, and a small async runtime to drive them.

pub mod config;
pub mod questionnaire;
pub mod respondents;
pub mod runtime;
pub mod simulation;
pub mod store;
pub mod survey;
