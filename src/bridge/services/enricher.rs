//! Turns a decoded queue payload into a [`Message`] with a canonical context.

use crate::bridge::{
    domain::{Context, Message, keys, timing, value_type_name},
    error::{ContextError, DecodeError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Top-level fields moved into a context section, in relocation order.
const RELOCATED_FIELDS: [(&str, &str); 4] = [
    (keys::ROUTING_KEY, keys::MQ),
    (keys::MESSAGE_ID, keys::MQ),
    (keys::CID, keys::KLAT_DATA),
    (keys::SID, keys::KLAT_DATA),
];

/// Context sections that must hold mappings when present.
const RESERVED_SECTIONS: [&str; 3] = [keys::MQ, keys::KLAT_DATA, keys::TIMING];

/// Normalizes raw inbound payloads before validation.
///
/// Enrichment only adds or defaults context entries. Values already present
/// under `context.mq` and `context.klat_data` are never overwritten; the
/// bridge's own `timing.mq_*` measurements always are.
#[derive(Debug, Clone)]
pub struct ContextEnricher<K>
where
    K: Clock + Send + Sync,
{
    clock: Arc<K>,
}

impl<K> ContextEnricher<K>
where
    K: Clock + Send + Sync,
{
    /// Creates an enricher reading wall-clock time from `clock`.
    #[must_use]
    pub const fn new(clock: Arc<K>) -> Self {
        Self { clock }
    }

    /// Enriches a payload using the current time.
    ///
    /// # Errors
    ///
    /// See [`ContextEnricher::enrich_at`].
    pub fn enrich(
        &self,
        raw: Map<String, Value>,
        decode_duration: Duration,
    ) -> Result<Message, DecodeError> {
        self.enrich_at(raw, decode_duration, self.clock.utc())
    }

    /// Enriches a payload as if received at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the message type is missing, when `data`
    /// or `context` are not mappings, or when a reserved context section
    /// holds a non-mapping value.
    pub fn enrich_at(
        &self,
        mut raw: Map<String, Value>,
        decode_duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<Message, DecodeError> {
        let msg_type = take_message_type(&mut raw)?;
        let data = take_mapping(&mut raw, "data")?;
        let mut context = Context::from_map(take_mapping(&mut raw, "context")?);
        ensure_reserved_sections(&context)?;

        for (field, section) in RELOCATED_FIELDS {
            match raw.remove(field) {
                None | Some(Value::Null) => {}
                Some(value) => {
                    let inserted = context.set_default_in(section, field, value)?;
                    if !inserted {
                        debug!(field, section, "kept existing context value over top-level field");
                    }
                }
            }
        }

        if !raw.is_empty() {
            let ignored: Vec<&str> = raw.keys().map(String::as_str).collect();
            debug!(msg_type = %msg_type, ?ignored, "ignoring unrecognized top-level fields");
        }

        context.record_timing(timing::INPUT_DESERIALIZE, decode_duration.as_secs_f64())?;
        if let Some(client_sent) = context.timing(keys::CLIENT_SENT) {
            context.record_timing(
                timing::INPUT_BUS_TIME,
                timing::seconds_since(client_sent, now),
            )?;
        }

        Message::new(msg_type, data, context).map_err(|_| DecodeError::MissingMessageType)
    }
}

/// Removes `msg_type` and `type`, preferring the former when it is set.
fn take_message_type(raw: &mut Map<String, Value>) -> Result<String, DecodeError> {
    let primary = raw.remove("msg_type");
    let fallback = raw.remove("type");
    let (field, value) = match primary {
        Some(value) if !is_blank(&value) => ("msg_type", value),
        _ => ("type", fallback.unwrap_or(Value::Null)),
    };
    match value {
        Value::String(msg_type) if !msg_type.trim().is_empty() => Ok(msg_type),
        Value::Null | Value::String(_) => Err(DecodeError::MissingMessageType),
        other => Err(DecodeError::invalid_field(
            field,
            "string",
            value_type_name(&other),
        )),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn take_mapping(
    raw: &mut Map<String, Value>,
    field: &str,
) -> Result<Map<String, Value>, DecodeError> {
    match raw.remove(field) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(DecodeError::invalid_field(
            field,
            "mapping",
            value_type_name(&other),
        )),
    }
}

fn ensure_reserved_sections(context: &Context) -> Result<(), ContextError> {
    for section in RESERVED_SECTIONS {
        match context.get(section) {
            None | Some(Value::Null | Value::Object(_)) => {}
            Some(other) => {
                return Err(ContextError::SectionNotMapping {
                    section: section.to_owned(),
                    actual: value_type_name(other),
                });
            }
        }
    }
    Ok(())
}
