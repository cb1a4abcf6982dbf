//! Then steps for bridge pipeline BDD scenarios.

use super::world::BridgeWorld;
use mq_bus_bridge::bridge::{
    adapters::codec::decode_payload,
    error::FormatError,
    services::{BusOutcome, DEFAULT_REPLY_QUEUE, InboundOutcome},
};
use rstest_bdd_macros::then;
use serde_json::{Map, Value, json};

fn single_body(world: &BridgeWorld, queue: &str) -> Result<Map<String, Value>, eyre::Report> {
    let published = world.publisher.published_to(queue);
    let [message] = published.as_slice() else {
        return Err(eyre::eyre!(
            "expected one message on {queue}, found {}",
            published.len()
        ));
    };
    decode_payload(message.body()).map_err(|err| eyre::eyre!("published body is invalid: {err}"))
}

fn expect_field(body: &Map<String, Value>, field: &str, expected: &Value) -> Result<(), eyre::Report> {
    match body.get(field) {
        Some(actual) if actual == expected => Ok(()),
        other => Err(eyre::eyre!("expected {field} = {expected}, found {other:?}")),
    }
}

#[then("the request is forwarded to the bus")]
fn request_is_forwarded(world: &BridgeWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_inbound
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no inbound message was delivered"))?;
    if !matches!(result, Ok(InboundOutcome::Forwarded { .. })) {
        return Err(eyre::eyre!("expected the request to be forwarded, got {result:?}"));
    }
    if world.connector.emitted().len() != 1 {
        return Err(eyre::eyre!("expected exactly one message on the bus"));
    }
    Ok(())
}

#[then("nothing is published to the queue")]
fn nothing_published(world: &BridgeWorld) -> Result<(), eyre::Report> {
    if !world.publisher.is_empty() {
        return Err(eyre::eyre!(
            "expected no published messages, found {}",
            world.publisher.len()
        ));
    }
    Ok(())
}

#[then("nothing is forwarded to the bus")]
fn nothing_forwarded(world: &BridgeWorld) -> Result<(), eyre::Report> {
    if !world.connector.emitted().is_empty() {
        return Err(eyre::eyre!("expected nothing on the bus"));
    }
    Ok(())
}

#[then(r#"an error naming "{path}" is published to "{queue}""#)]
fn error_is_published(world: &BridgeWorld, path: String, queue: String) -> Result<(), eyre::Report> {
    let body = single_body(world, &queue)?;
    expect_field(&body, "msg_type", &json!("klat.error"))?;
    let error = body
        .get("data")
        .and_then(|data| data.get("error"))
        .and_then(Value::as_str)
        .ok_or_else(|| eyre::eyre!("error response lacks data.error"))?;
    if !error.contains(&path) {
        return Err(eyre::eyre!("expected error to name {path}, got '{error}'"));
    }
    Ok(())
}

#[then(r#"the forwarded request replies to "{queue}""#)]
fn forwarded_request_replies_to(world: &BridgeWorld, queue: String) -> Result<(), eyre::Report> {
    let emitted = world.connector.emitted();
    let forwarded = emitted
        .first()
        .ok_or_else(|| eyre::eyre!("nothing was forwarded"))?;
    match forwarded.context().mq_routing_key() {
        Some(routing_key) if routing_key == queue => Ok(()),
        other => Err(eyre::eyre!("expected mq.routing_key {queue}, found {other:?}")),
    }
}

#[then(r#"the queue "{queue}" receives audio "{audio}" for "{lang}" voiced "{gender}""#)]
fn queue_receives_audio(
    world: &BridgeWorld,
    queue: String,
    audio: String,
    lang: String,
    gender: String,
) -> Result<(), eyre::Report> {
    let body = single_body(world, &queue)?;
    expect_field(&body, "audio_data", &json!(audio))?;
    expect_field(&body, "lang", &json!(lang))?;
    expect_field(&body, "gender", &json!(gender))
}

#[then(r#"the default reply queue receives transcript "{transcript}" with alternatives "{others}""#)]
fn default_queue_receives_transcript(
    world: &BridgeWorld,
    transcript: String,
    others: String,
) -> Result<(), eyre::Report> {
    let body = single_body(world, DEFAULT_REPLY_QUEUE)?;
    expect_field(&body, "transcript", &json!(transcript))?;
    let alternatives: Vec<&str> = others.split(',').collect();
    expect_field(&body, "other_transcripts", &json!(alternatives))
}

#[then("the event is dropped as stale")]
fn event_is_stale(world: &BridgeWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_bus_event
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no bus event was emitted"))?;
    if !matches!(
        result,
        Ok(BusOutcome::Dropped {
            reason: FormatError::Stale { .. },
            ..
        })
    ) {
        return Err(eyre::eyre!("expected a stale drop, got {result:?}"));
    }
    Ok(())
}
