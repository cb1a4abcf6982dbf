//! Shapes bus events into queue responses.

use crate::bridge::{
    domain::{
        Context, ERROR_EVENT, Message, ResponseKind, ResponseTimeouts, timing, value_type_name,
    },
    error::FormatError,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

/// A formatted response ready for publishing.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsePayload {
    kind: ResponseKind,
    fields: Map<String, Value>,
    context: Context,
}

impl ResponsePayload {
    /// Returns the kind of event this payload was shaped from.
    #[must_use]
    pub const fn kind(&self) -> ResponseKind {
        self.kind
    }

    /// Returns the top-level fields other than `context`.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns a single top-level field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the response context.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Renders the payload as a JSON mapping with `context` last.
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut body = self.fields;
        body.insert("context".to_owned(), Value::Object(self.context.into_map()));
        Value::Object(body)
    }
}

/// Drops stale or failed events and extracts the fields each kind needs.
#[derive(Debug, Clone)]
pub struct ResponseFormatter<K>
where
    K: Clock + Send + Sync,
{
    clock: Arc<K>,
    timeouts: ResponseTimeouts,
}

impl<K> ResponseFormatter<K>
where
    K: Clock + Send + Sync,
{
    /// Creates a formatter.
    #[must_use]
    pub const fn new(clock: Arc<K>, timeouts: ResponseTimeouts) -> Self {
        Self { clock, timeouts }
    }

    /// Returns the configured timeouts.
    #[must_use]
    pub const fn timeouts(&self) -> &ResponseTimeouts {
        &self.timeouts
    }

    /// Formats an event using the current time.
    ///
    /// # Errors
    ///
    /// See [`ResponseFormatter::format_at`].
    pub fn format(&self, event: Message, kind: ResponseKind) -> Result<ResponsePayload, FormatError> {
        self.format_at(event, kind, self.clock.utc())
    }

    /// Formats an event as if handled at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] when the event is older than the timeout for
    /// `kind`, reports an upstream error, or lacks the fields `kind` needs.
    pub fn format_at(
        &self,
        event: Message,
        kind: ResponseKind,
        now: DateTime<Utc>,
    ) -> Result<ResponsePayload, FormatError> {
        let started = Instant::now();
        let timeout = self.timeouts.for_kind(kind);
        if let Some(created_on) = event.context().created_on() {
            let age_secs = timing::seconds_since(created_on, now);
            if age_secs > timeout.as_secs_f64() {
                return Err(FormatError::Stale { age_secs, timeout });
            }
        }
        // Error events are relayed as they are; their `error` field is the payload.
        if event.msg_type() != ERROR_EVENT {
            match event.data().get("error") {
                None | Some(Value::Null) => {}
                Some(Value::String(reason)) => {
                    return Err(FormatError::UpstreamError(reason.clone()));
                }
                Some(other) => return Err(FormatError::UpstreamError(other.to_string())),
            }
        }

        let (msg_type, data, mut context) = event.into_parts();
        let fields = match kind {
            ResponseKind::TextToSpeech => extract_audio(&data)?,
            ResponseKind::SpeechToText => extract_transcripts(&data, &context)?,
            ResponseKind::Generic => {
                let mut fields = Map::new();
                fields.insert("msg_type".to_owned(), Value::String(msg_type));
                fields.insert("data".to_owned(), Value::Object(data));
                fields
            }
        };
        context.record_timing(timing::FORMAT_RESPONSE, started.elapsed().as_secs_f64())?;
        Ok(ResponsePayload {
            kind,
            fields,
            context,
        })
    }
}

/// Picks the first language entry carrying a non-null clip.
fn extract_audio(data: &Map<String, Value>) -> Result<Map<String, Value>, FormatError> {
    for (lang, entry) in data {
        let Some(audio) = entry.get("audio").and_then(Value::as_object) else {
            continue;
        };
        let clip_for = |gender: &str| {
            audio
                .get_key_value(gender)
                .filter(|(_, clip)| !clip.is_null())
        };
        let preferred = entry
            .get("genders")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .find_map(clip_for);
        let Some((gender, clip)) =
            preferred.or_else(|| audio.iter().find(|(_, clip)| !clip.is_null()))
        else {
            continue;
        };
        let mut fields = Map::new();
        fields.insert("audio_data".to_owned(), clip.clone());
        fields.insert("lang".to_owned(), Value::String(lang.clone()));
        fields.insert("gender".to_owned(), Value::String(gender.clone()));
        return Ok(fields);
    }
    Err(FormatError::NoAudio)
}

fn extract_transcripts(
    data: &Map<String, Value>,
    context: &Context,
) -> Result<Map<String, Value>, FormatError> {
    let transcripts = match data.get("transcripts") {
        None | Some(Value::Null) => {
            return Err(FormatError::MissingField {
                path: "data.transcripts".to_owned(),
            });
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(FormatError::InvalidField {
                path: "data.transcripts".to_owned(),
                expected: "list",
                actual: value_type_name(other),
            });
        }
    };
    let mut remaining = transcripts.iter();
    let primary = remaining.next().ok_or(FormatError::NoTranscripts)?;
    let others: Vec<Value> = remaining
        .filter(|candidate| *candidate != primary)
        .cloned()
        .collect();
    let lang = data
        .get("lang")
        .filter(|lang| !lang.is_null())
        .cloned()
        .or_else(|| context.lang().map(Value::from))
        .unwrap_or(Value::Null);

    let mut fields = Map::new();
    fields.insert("transcript".to_owned(), primary.clone());
    fields.insert("other_transcripts".to_owned(), Value::Array(others));
    fields.insert("lang".to_owned(), lang);
    Ok(fields)
}
