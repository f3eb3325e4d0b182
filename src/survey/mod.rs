//! Surveys and panel surveys.

pub mod models;
pub mod panel;
pub mod reducer;

pub use models::{Survey, mode_label};
pub use panel::{PanelSurvey, PanelSurveyEdit, PanelSurveyReducer};
pub use reducer::{SurveyEdit, SurveyReducer};
