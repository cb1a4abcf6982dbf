//! Templates for the request types the bridge understands out of the box.

use super::TemplateRegistry;
use crate::bridge::domain::{FieldSpec, FieldType, Template};
use serde_json::json;

/// Message type emitted by voice clients with a recorded utterance.
pub const UTTERANCE_MESSAGE: &str = "recognizer_loop:utterance";
/// Message type requesting a transcription.
pub const GET_STT_MESSAGE: &str = "neon.get_stt";
/// Message type requesting synthesized speech.
pub const GET_TTS_MESSAGE: &str = "neon.get_tts";

/// Audio file and language for a transcription request.
#[must_use]
pub fn speech_to_text() -> Template {
    Template::new("stt")
        .with_data_field(FieldSpec::required("audio_file", FieldType::String))
        .with_data_field(FieldSpec::required("lang", FieldType::String))
}

/// Text and language for a speech synthesis request.
#[must_use]
pub fn text_to_speech() -> Template {
    Template::new("tts")
        .with_data_field(FieldSpec::required("text", FieldType::String))
        .with_data_field(FieldSpec::required("lang", FieldType::String))
}

/// Already-transcribed utterances.
#[must_use]
pub fn utterance() -> Template {
    Template::new("utterance")
        .with_data_field(FieldSpec::required(
            "utterances",
            FieldType::list_of(FieldType::String),
        ))
        .with_data_field(FieldSpec::required("lang", FieldType::String))
}

/// Client and chat metadata expected from chat frontends.
#[must_use]
pub fn klat_context() -> Template {
    Template::new("klat_context")
        .with_context_field(FieldSpec::required("client", FieldType::String))
        .with_context_field(FieldSpec::required("source", FieldType::String))
        .with_context_field(FieldSpec::required("destination", FieldType::String))
        .with_context_field(FieldSpec::required("ident", FieldType::String))
        .with_context_field(FieldSpec::optional(
            "client_name",
            FieldType::String,
            json!("pyklatchat"),
        ))
        .with_context_field(FieldSpec::optional(
            "username",
            FieldType::String,
            json!("guest"),
        ))
        .with_context_field(FieldSpec::optional(
            "neon_should_respond",
            FieldType::Boolean,
            json!(true),
        ))
        .with_context_field(FieldSpec::optional(
            "timing",
            FieldType::mapping(),
            json!({}),
        ))
        .with_context_field(FieldSpec::optional(
            "klat_data",
            FieldType::mapping(),
            json!({}),
        ))
        .with_context_field(FieldSpec::optional(
            "nick_profiles",
            FieldType::mapping(),
            json!({}),
        ))
}

/// Registers every built-in template under its name and the message types it covers.
pub fn register(registry: &mut TemplateRegistry) {
    let stt = speech_to_text();
    registry.insert_as(UTTERANCE_MESSAGE, stt.clone());
    registry.insert_as(GET_STT_MESSAGE, stt.clone());
    registry.insert(stt);

    let tts = text_to_speech();
    registry.insert_as(GET_TTS_MESSAGE, tts.clone());
    registry.insert(tts);

    registry.insert(utterance());
    registry.insert(klat_context());
}
