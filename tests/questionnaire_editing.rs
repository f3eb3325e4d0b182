//! Integration tests for questionnaire edits and the validation they trigger.

use serde_json::json;
use survey_store::questionnaire::{ChoiceChange, Mode, Questionnaire, QuestionnaireEdit};
use survey_store::store::{EntityFilter, FetchAction, Store, StoreAction};

fn loaded(q: serde_json::Value) -> Store {
    let questionnaire: Questionnaire = serde_json::from_value(q).unwrap();
    let mut store = Store::new();
    store.dispatch(StoreAction::Questionnaire(FetchAction::Fetch(EntityFilter::of(&questionnaire))));
    store.dispatch(StoreAction::Questionnaire(FetchAction::Receive(questionnaire)));
    store
}

fn edit(store: &mut Store, edit: QuestionnaireEdit) -> bool {
    store.dispatch(StoreAction::Questionnaire(FetchAction::Edit(edit)))
}

fn choice(value: &str, sms: &[&str], ivr: &[&str]) -> serde_json::Value {
    json!({"value": value, "responses": {"sms": sms, "ivr": ivr}})
}

fn smoking_questionnaire() -> serde_json::Value {
    json!({
        "id": 1,
        "projectId": 1,
        "name": "Smoking",
        "modes": ["sms"],
        "steps": [
            {
                "id": "s1",
                "type": "multiple-choice",
                "title": "Do you smoke?",
                "store": "smokes",
                "prompt": {"sms": "Do you smoke?", "ivr": {"text": "", "audioSource": "tts"}},
                "choices": [choice("Yes", &["y", "1"], &["1"]), choice("No", &["n", "2"], &["2"])]
            },
            {
                "id": "s2",
                "type": "multiple-choice",
                "title": "Do you exercise?",
                "store": "exercises",
                "prompt": {"sms": "Do you exercise?", "ivr": {"text": "", "audioSource": "tts"}},
                "choices": [choice("Yes", &[], &[]), choice("No", &["n"], &["2"])]
            }
        ]
    })
}

/// Loading validates right away: the one choice without SMS responses is flagged
#[test]
fn test_loaded_questionnaire_is_validated() {
    let store = loaded(smoking_questionnaire());
    let errors = &store.questionnaire.errors;

    assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["steps[1].choices[0].sms"]);
}

/// Duplicate response values are flagged on the later choice only
#[test]
fn test_duplicate_responses_are_flagged() {
    let mut store = loaded(smoking_questionnaire());
    let change = ChoiceChange {
        index: 1,
        response: "Yes".into(),
        sms_values: "y, 3".into(),
        ivr_values: "3".into(),
        ..Default::default()
    };
    assert!(edit(&mut store, QuestionnaireEdit::change_choice("s1", change)));

    let errors = &store.questionnaire.errors;
    assert_eq!(errors.get("steps[0].choices[1].value"), ["Value already used in a previous response"]);
    assert_eq!(errors.get("steps[0].choices[1].sms"), ["Value \"y\" already used in a previous response"]);
    assert!(!errors.contains("steps[0].choices[0].value"));
    assert!(!errors.contains("steps[0].choices[1].ivr"));
}

/// Voice prompts are only required once the questionnaire uses phone calls
#[test]
fn test_prompt_errors_follow_modes() {
    let mut store = loaded(smoking_questionnaire());
    assert!(!store.questionnaire.errors.contains("steps[0].prompt.ivr.text"));

    edit(&mut store, QuestionnaireEdit::toggle_mode(Mode::Ivr));
    let errors = &store.questionnaire.errors;
    assert_eq!(errors.get("steps[0].prompt.ivr.text"), ["Voice prompt must not be blank"]);
    assert_eq!(errors.get("steps[1].choices[0].ivr"), ["\"Phone call\" must not be blank"]);

    edit(&mut store, QuestionnaireEdit::toggle_mode(Mode::Sms));
    let errors = &store.questionnaire.errors;
    assert!(!errors.contains("steps[1].choices[0].sms"));
    assert!(errors.contains("steps[0].prompt.ivr.text"));

    edit(&mut store, QuestionnaireEdit::toggle_mode(Mode::Ivr));
    assert!(store.questionnaire.errors.is_empty());
}

/// Entering a known response with blank lists copies the earlier choice's lists
#[test]
fn test_autocomplete_from_previous_step() {
    let mut store = loaded(smoking_questionnaire());
    let change = ChoiceChange {
        index: 0,
        response: "Yes".into(),
        auto_complete: true,
        ..Default::default()
    };
    assert!(edit(&mut store, QuestionnaireEdit::change_choice("s2", change)));

    let q = store.questionnaire.data().unwrap();
    let choice = &q.step("s2").unwrap().choices[0];
    assert_eq!(choice.responses.sms, vec!["y", "1"]);
    assert_eq!(choice.responses.ivr, vec!["1"]);
    assert!(store.questionnaire.errors.is_empty());
}

/// Autocomplete never overrides values the user typed
#[test]
fn test_autocomplete_keeps_typed_values() {
    let mut store = loaded(smoking_questionnaire());
    let change = ChoiceChange {
        index: 0,
        response: "Yes".into(),
        sms_values: "yes".into(),
        auto_complete: true,
        ..Default::default()
    };
    edit(&mut store, QuestionnaireEdit::change_choice("s2", change));

    let q = store.questionnaire.data().unwrap();
    let choice = &q.step("s2").unwrap().choices[0];
    assert_eq!(choice.responses.sms, vec!["yes"]);
    assert!(choice.responses.ivr.is_empty());
}

/// New steps start out invalid until filled in
#[test]
fn test_added_step_needs_prompt_and_choices() {
    let mut store = loaded(smoking_questionnaire());
    edit(
        &mut store,
        QuestionnaireEdit::AddStep {
            step_id: "s3".into(),
        },
    );

    let errors = &store.questionnaire.errors;
    assert_eq!(errors.get("steps[2].prompt.sms"), ["SMS prompt must not be blank"]);
    assert_eq!(errors.get("steps[2].choices"), ["Must have at least two responses"]);

    edit(&mut store, QuestionnaireEdit::DeleteStep { step_id: "s3".into() });
    assert!(!store.questionnaire.errors.contains("steps[2].choices"));
}
