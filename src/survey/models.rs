use crate::questionnaire::Mode;
use crate::store::filter::{Identified, lenient_id, lenient_optional_id};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    #[serde(default, deserialize_with = "lenient_optional_id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient_id")]
    pub project_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default)]
    pub questionnaire_ids: Vec<i64>,
    /// Mode combinations: primary mode first, then fallbacks.
    #[serde(default)]
    pub mode: Vec<Vec<Mode>>,
    #[serde(default)]
    pub mode_comparison: bool,
    #[serde(default)]
    pub cutoff: Option<i64>,
}

fn default_state() -> String {
    "not_ready".to_string()
}

impl Survey {
    /// Every mode used by any combination, without duplicates.
    pub fn active_modes(&self) -> Vec<Mode> {
        let mut modes: Vec<Mode> = Vec::new();
        for mode in self.mode.iter().flatten() {
            if !modes.contains(mode) {
                modes.push(*mode);
            }
        }
        modes
    }

    pub fn is_editable(&self) -> bool {
        matches!(self.state.as_str(), "not_ready" | "ready")
    }
}

impl Identified for Survey {
    fn project_id(&self) -> i64 {
        self.project_id
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// Label for a mode combination, e.g. "SMS with phone call fallback".
pub fn mode_label(modes: &[Mode]) -> String {
    match modes {
        [] => "No mode".to_string(),
        [primary] => primary.label().to_string(),
        [primary, fallbacks @ ..] => {
            let fallbacks: Vec<String> = fallbacks.iter().map(|m| m.fallback_label().to_string()).collect();
            format!("{} with {} fallback", primary.label(), fallbacks.join(" and "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_label() {
        assert_eq!(mode_label(&[Mode::Sms]), "SMS");
        assert_eq!(mode_label(&[Mode::Sms, Mode::Ivr]), "SMS with phone call fallback");
        assert_eq!(mode_label(&[Mode::Ivr, Mode::Sms]), "Phone call with SMS fallback");
        assert_eq!(mode_label(&[]), "No mode");
    }

    #[test]
    fn test_defaults_and_active_modes() {
        let survey: Survey = serde_json::from_value(json!({
            "id": 2,
            "projectId": "1",
            "mode": [["sms", "ivr"], ["ivr"]]
        }))
        .unwrap();

        assert_eq!(survey.state, "not_ready");
        assert!(survey.is_editable());
        assert_eq!(survey.active_modes(), vec![Mode::Sms, Mode::Ivr]);
    }
}
