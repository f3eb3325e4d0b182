use crate::store::filter::{Identified, lenient_id, lenient_optional_id};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Communication channel a questionnaire or survey runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Sms,
    Ivr,
    Mobileweb,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Sms => "SMS",
            Mode::Ivr => "Phone call",
            Mode::Mobileweb => "Mobile Web",
        }
    }

    /// Label used mid-sentence, as in "SMS with phone call fallback".
    pub fn fallback_label(&self) -> &'static str {
        match self {
            Mode::Sms => "SMS",
            Mode::Ivr => "phone call",
            Mode::Mobileweb => "Mobile Web",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Sms => "sms",
            Mode::Ivr => "ivr",
            Mode::Mobileweb => "mobileweb",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sms" => Ok(Mode::Sms),
            "ivr" => Ok(Mode::Ivr),
            "mobileweb" => Ok(Mode::Mobileweb),
            other => Err(format!("Unknown mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepType {
    MultipleChoice,
    Numeric,
    Explanation,
    LanguageSelection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioSource {
    #[default]
    Tts,
    Upload,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IvrPrompt {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub audio_source: AudioSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    #[serde(default)]
    pub sms: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ivr: Option<IvrPrompt>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Responses {
    #[serde(default)]
    pub sms: Vec<String>,
    #[serde(default)]
    pub ivr: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub value: String,
    #[serde(default)]
    pub responses: Responses,
    #[serde(default)]
    pub skip_logic: Option<String>,
}

impl Choice {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub store: String,
    #[serde(default)]
    pub prompt: Prompt,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl Step {
    /// Blank multiple-choice step with a text-to-speech voice prompt.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            step_type: StepType::MultipleChoice,
            title: String::new(),
            store: String::new(),
            prompt: Prompt {
                sms: String::new(),
                ivr: Some(IvrPrompt::default()),
            },
            choices: Vec::new(),
        }
    }

    pub fn is_multiple_choice(&self) -> bool {
        self.step_type == StepType::MultipleChoice
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    #[serde(default, deserialize_with = "lenient_optional_id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient_id")]
    pub project_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Questionnaire {
    pub fn has_mode(&self, mode: Mode) -> bool {
        self.modes.contains(&mode)
    }

    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn step_index(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }
}

impl Identified for Questionnaire {
    fn project_id(&self) -> i64 {
        self.project_id
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_api_payload() {
        let questionnaire: Questionnaire = serde_json::from_value(json!({
            "id": "3",
            "projectId": "1",
            "name": "Health",
            "modes": ["sms", "ivr"],
            "steps": [{
                "id": "a1",
                "type": "multiple-choice",
                "title": "Smokes?",
                "store": "smokes",
                "prompt": {"sms": "Do you smoke?", "ivr": {"text": "Do you smoke?", "audioSource": "tts"}},
                "choices": [{"value": "Yes", "responses": {"sms": ["1"], "ivr": ["1"]}, "skipLogic": null}]
            }]
        }))
        .unwrap();

        assert_eq!(questionnaire.id, Some(3));
        assert_eq!(questionnaire.project_id, 1);
        assert!(questionnaire.has_mode(Mode::Ivr));
        assert_eq!(questionnaire.steps[0].step_type, StepType::MultipleChoice);
        assert_eq!(questionnaire.step_index("a1"), Some(0));
        assert_eq!(
            questionnaire.steps[0].prompt.ivr.as_ref().unwrap().audio_source,
            AudioSource::Tts
        );
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("SMS".parse::<Mode>(), Ok(Mode::Sms));
        assert_eq!(" ivr ".parse::<Mode>(), Ok(Mode::Ivr));
        assert!("fax".parse::<Mode>().is_err());
        assert_eq!(serde_json::to_value(Mode::Mobileweb).unwrap(), json!("mobileweb"));
    }
}
