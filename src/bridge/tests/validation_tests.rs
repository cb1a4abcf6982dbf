//! Unit tests for the template validator.

use super::fixtures::{message, validator};
use crate::bridge::{
    error::ValidationError,
    ports::validator::{RequestValidator, ValidationPolicy},
    templates::TemplateRegistry,
    validation::TemplateValidator,
};
use rstest::rstest;
use serde_json::{Value, json};

fn klat_context() -> Value {
    json!({
        "client": "browser",
        "source": "klat",
        "destination": "skills",
        "ident": "abc"
    })
}

// ============================================================================
// Template selection by message type
// ============================================================================

#[rstest]
fn utterance_with_audio_file_passes(validator: TemplateValidator) {
    let request = message(
        "recognizer_loop:utterance",
        json!({"audio_file": "1", "lang": "1"}),
        json!({}),
    );
    let validated = validator.validate(request.clone()).expect("valid request");
    assert_eq!(validated, request);
}

#[rstest]
fn missing_audio_file_names_the_field(validator: TemplateValidator) {
    let request = message("recognizer_loop:utterance", json!({"lang": "1"}), json!({}));
    let rejection = validator.validate(request).expect_err("audio_file is required");
    assert_eq!(
        rejection.error(),
        &ValidationError::missing_field("data.audio_file")
    );
    assert_eq!(rejection.error().path(), Some("data.audio_file"));
}

#[rstest]
fn wrong_type_is_reported_with_expected_and_actual(validator: TemplateValidator) {
    let request = message("neon.get_tts", json!({"text": 42, "lang": "en-us"}), json!({}));
    let rejection = validator.validate(request).expect_err("text must be a string");
    assert_eq!(
        rejection.error().to_string(),
        "data.text should be string, but number provided"
    );
}

#[rstest]
fn caller_fields_survive_validation(validator: TemplateValidator) {
    let request = message(
        "neon.get_stt",
        json!({"audio_file": "a.wav", "lang": "en-us", "extra": {"nested": true}}),
        json!({"custom": 1}),
    );
    let validated = validator.validate(request).expect("valid request");
    assert_eq!(validated.data().get("extra"), Some(&json!({"nested": true})));
    assert_eq!(validated.context().get("custom"), Some(&json!(1)));
}

#[rstest]
fn validation_is_idempotent(validator: TemplateValidator) {
    let request = message(
        "chat.message",
        json!({"utterance": "hi"}),
        json!({"client": "browser", "source": "klat", "destination": "x", "ident": "1",
               "request_skills": ["klat_context"]}),
    );
    let once = validator.validate(request).expect("valid request");
    let twice = validator.validate(once.clone()).expect("still valid");
    assert_eq!(once, twice);
}

// ============================================================================
// Template selection by context.request_skills
// ============================================================================

#[rstest]
fn requested_templates_fill_defaults(validator: TemplateValidator) {
    let mut context = klat_context();
    context["request_skills"] = json!(["klat_context"]);
    let request = message("chat.message", json!({}), context);

    let validated = validator.validate(request).expect("valid request");
    let context = validated.context();
    assert_eq!(context.get("client_name"), Some(&json!("pyklatchat")));
    assert_eq!(context.get("username"), Some(&json!("guest")));
    assert_eq!(context.get("neon_should_respond"), Some(&json!(true)));
    assert_eq!(context.get("nick_profiles"), Some(&json!({})));
    assert_eq!(context.get("client"), Some(&json!("browser")));
}

#[rstest]
fn caller_values_override_defaults(validator: TemplateValidator) {
    let mut context = klat_context();
    context["request_skills"] = json!(["klat_context"]);
    context["username"] = json!("alice");
    let request = message("chat.message", json!({}), context);

    let validated = validator.validate(request).expect("valid request");
    assert_eq!(validated.context().get("username"), Some(&json!("alice")));
}

#[rstest]
fn rejection_keeps_defaults_from_earlier_templates(validator: TemplateValidator) {
    let mut context = klat_context();
    context["request_skills"] = json!(["klat_context", "stt"]);
    let request = message("chat.message", json!({"lang": "en-us"}), context);

    let rejection = validator.validate(request).expect_err("stt needs audio_file");
    assert_eq!(rejection.error().path(), Some("data.audio_file"));
    assert_eq!(
        rejection.message().context().get("client_name"),
        Some(&json!("pyklatchat"))
    );
}

#[rstest]
fn unknown_requested_templates_are_skipped(validator: TemplateValidator) {
    let request = message(
        "chat.message",
        json!({}),
        json!({"request_skills": ["no_such_template"]}),
    );
    let validated = validator.validate(request.clone()).expect("nothing to check");
    assert_eq!(validated, request);
}

#[rstest]
fn known_templates_still_apply_beside_unknown_ones(validator: TemplateValidator) {
    let request = message(
        "chat.message",
        json!({}),
        json!({"request_skills": ["no_such_template", "tts"]}),
    );
    let rejection = validator.validate(request).expect_err("tts needs text");
    assert_eq!(rejection.error().path(), Some("data.text"));
}

#[rstest]
#[case(json!("klat_context"), "context.request_skills", "list<string>", "string")]
#[case(json!(["klat_context", 3]), "context.request_skills[1]", "string", "number")]
fn malformed_request_skills_are_rejected(
    validator: TemplateValidator,
    #[case] skills: Value,
    #[case] path: &str,
    #[case] expected: &str,
    #[case] actual: &'static str,
) {
    let request = message("chat.message", json!({}), json!({"request_skills": skills}));
    let rejection = validator.validate(request).expect_err("malformed skills");
    assert_eq!(
        rejection.error(),
        &ValidationError::type_mismatch(path, expected, actual)
    );
}

// ============================================================================
// Validation policy
// ============================================================================

#[rstest]
#[case(json!({}))]
#[case(json!({"request_skills": []}))]
#[case(json!({"request_skills": null}))]
fn strict_policy_rejects_unmatched_messages(validator: TemplateValidator, #[case] context: Value) {
    let request = message("chat.message", json!({}), context);
    let rejection = validator.validate(request).expect_err("no template applies");
    assert_eq!(
        rejection.error(),
        &ValidationError::UnableToValidate {
            msg_type: "chat.message".to_owned()
        }
    );
}

#[test]
fn permissive_policy_passes_unmatched_messages() {
    let validator =
        TemplateValidator::with_registry(TemplateRegistry::with_builtin(), ValidationPolicy::Permissive);
    let request = message("chat.message", json!({"anything": 1}), json!({}));
    let validated = validator.validate(request.clone()).expect("permissive");
    assert_eq!(validated, request);
}
