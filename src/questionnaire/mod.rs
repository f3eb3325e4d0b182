//! Questionnaires: models, edits, validation and the step editor.

pub mod editor;
pub mod models;
pub mod reducer;
pub mod validation;

pub use editor::{EditorAction, QuestionnaireEditor, questionnaire_for_server};
pub use models::{AudioSource, Choice, IvrPrompt, Mode, Prompt, Questionnaire, Responses, Step, StepType};
pub use reducer::{ChoiceChange, QuestionnaireEdit, QuestionnaireReducer};
pub use validation::validate;
