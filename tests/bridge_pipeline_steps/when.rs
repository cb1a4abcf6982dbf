//! When steps for bridge pipeline BDD scenarios.

use super::world::{BridgeWorld, run_async};
use eyre::WrapErr;
use mq_bus_bridge::bridge::{
    adapters::codec::encode_payload,
    domain::{Context, Message},
};
use rstest_bdd_macros::when;
use serde_json::{Map, Value, json};

fn deliver(world: &mut BridgeWorld, request: &Value) -> Result<(), eyre::Report> {
    let body = encode_payload(request);
    let result = run_async(world.service()?.handle_inbound(&body));
    world.last_inbound = Some(result);
    Ok(())
}

fn emit(world: &mut BridgeWorld, msg_type: &str, data: Value, context: Value) -> Result<(), eyre::Report> {
    let (Value::Object(data), Value::Object(context)) = (data, context) else {
        return Err(eyre::eyre!("event data and context must be JSON objects"));
    };
    let event = Message::new(msg_type, data, Context::from_map(context))
        .wrap_err("build bus event for scenario")?;
    let result = run_async(world.service()?.handle_bus_event(event));
    world.last_bus_event = Some(result);
    Ok(())
}

#[when(r#"the queue delivers a "{msg_type}" request with audio file "{audio}" and language "{lang}""#)]
fn deliver_audio_request(
    world: &mut BridgeWorld,
    msg_type: String,
    audio: String,
    lang: String,
) -> Result<(), eyre::Report> {
    deliver(
        world,
        &json!({"type": msg_type, "data": {"audio_file": audio, "lang": lang}, "context": {}}),
    )
}

#[when(r#"the queue delivers a "{msg_type}" request with language "{lang}" only"#)]
fn deliver_request_without_audio(
    world: &mut BridgeWorld,
    msg_type: String,
    lang: String,
) -> Result<(), eyre::Report> {
    deliver(
        world,
        &json!({"type": msg_type, "data": {"lang": lang}, "context": {}}),
    )
}

#[when(r#"the queue delivers a "{msg_type}" request for text "{text}" in "{lang}" routed to "{queue}""#)]
fn deliver_routed_request(
    world: &mut BridgeWorld,
    msg_type: String,
    text: String,
    lang: String,
    queue: String,
) -> Result<(), eyre::Report> {
    deliver(
        world,
        &json!({
            "msg_type": msg_type,
            "data": {"text": text, "lang": lang},
            "routing_key": queue
        }),
    )
}

#[when(r#"the bus emits "{gender}" audio "{audio}" for "{lang}" routed to "{queue}""#)]
fn emit_audio(
    world: &mut BridgeWorld,
    gender: String,
    audio: String,
    lang: String,
    queue: String,
) -> Result<(), eyre::Report> {
    let mut clips = Map::new();
    clips.insert(gender.clone(), Value::String(audio));
    let mut data = Map::new();
    data.insert(lang, json!({"genders": [gender], "audio": clips}));
    emit(
        world,
        "neon.get_tts.response",
        Value::Object(data),
        json!({"mq": {"routing_key": queue}}),
    )
}

#[when(r#"the bus emits transcripts "{transcripts}""#)]
fn emit_transcripts(world: &mut BridgeWorld, transcripts: String) -> Result<(), eyre::Report> {
    let candidates: Vec<&str> = transcripts.split(',').collect();
    emit(
        world,
        "neon.get_stt.response",
        json!({"transcripts": candidates}),
        json!({}),
    )
}

#[when("the bus emits a transcription created {seconds:i64} seconds ago")]
fn emit_old_transcription(world: &mut BridgeWorld, seconds: i64) -> Result<(), eyre::Report> {
    let created_on = chrono::Utc::now().timestamp() - seconds;
    emit(
        world,
        "neon.get_stt.response",
        json!({"transcripts": ["hello"]}),
        json!({"created_on": created_on}),
    )
}
