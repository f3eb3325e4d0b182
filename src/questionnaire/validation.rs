use super::models::{AudioSource, Choice, Mode, Questionnaire, Step};
use crate::store::validation::ValidationErrors;
use once_cell::sync::Lazy;
use regex::Regex;

static IVR_RESPONSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9#*]*$").expect("valid IVR response pattern"));

struct Context {
    sms: bool,
    ivr: bool,
    errors: ValidationErrors,
}

/// Recompute every validation error of a questionnaire.
pub fn validate(questionnaire: &Questionnaire) -> ValidationErrors {
    let mut context = Context {
        sms: questionnaire.has_mode(Mode::Sms),
        ivr: questionnaire.has_mode(Mode::Ivr),
        errors: ValidationErrors::new(),
    };

    for (i, step) in questionnaire.steps.iter().enumerate() {
        validate_step(&format!("steps[{}]", i), step, &mut context);
    }

    context.errors
}

fn validate_step(path: &str, step: &Step, context: &mut Context) {
    if context.sms && is_blank(&step.prompt.sms) {
        context.errors.add(format!("{}.prompt.sms", path), "SMS prompt must not be blank");
    }

    if context.ivr {
        if let Some(ivr) = &step.prompt.ivr {
            if ivr.audio_source == AudioSource::Tts && is_blank(&ivr.text) {
                context.errors.add(format!("{}.prompt.ivr.text", path), "Voice prompt must not be blank");
            }
        }
    }

    if step.is_multiple_choice() {
        validate_choices(&format!("{}.choices", path), &step.choices, context);
    }
}

fn validate_choices(path: &str, choices: &[Choice], context: &mut Context) {
    if choices.len() < 2 {
        context.errors.add(path, "Must have at least two responses");
    }

    for (i, choice) in choices.iter().enumerate() {
        validate_choice(&format!("{}[{}]", path, i), choice, context);
    }

    let mut values: Vec<&str> = Vec::new();
    let mut sms: Vec<&str> = Vec::new();
    let mut ivr: Vec<&str> = Vec::new();

    for (i, choice) in choices.iter().enumerate() {
        if values.contains(&choice.value.as_str()) {
            context
                .errors
                .add(format!("{}[{}].value", path, i), "Value already used in a previous response");
        }

        for value in &choice.responses.sms {
            if sms.contains(&value.as_str()) {
                context.errors.add(
                    format!("{}[{}].sms", path, i),
                    format!("Value \"{}\" already used in a previous response", value),
                );
            }
        }

        for value in &choice.responses.ivr {
            if ivr.contains(&value.as_str()) {
                context.errors.add(
                    format!("{}[{}].ivr", path, i),
                    format!("Value \"{}\" already used in a previous response", value),
                );
            }
        }

        values.push(&choice.value);
        sms.extend(choice.responses.sms.iter().map(String::as_str));
        ivr.extend(choice.responses.ivr.iter().map(String::as_str));
    }
}

fn validate_choice(path: &str, choice: &Choice, context: &mut Context) {
    if is_blank(&choice.value) {
        context.errors.add(format!("{}.value", path), "Response must not be blank");
    }

    if context.sms && choice.responses.sms.is_empty() {
        context.errors.add(format!("{}.sms", path), "SMS must not be blank");
    }

    if context.ivr {
        if choice.responses.ivr.is_empty() {
            context.errors.add(format!("{}.ivr", path), "\"Phone call\" must not be blank");
        }

        if choice.responses.ivr.iter().any(|value| !IVR_RESPONSE.is_match(value)) {
            context.errors.add(
                format!("{}.ivr", path),
                "\"Phone call\" must only consist of single digits, \"#\" or \"*\"",
            );
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
