//! The message envelope exchanged between the queue and the event bus.

use super::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A typed message with a payload and per-message context.
///
/// # Invariants
///
/// - `msg_type` is never empty
/// - `data` and `context` are always mappings
///
/// # Examples
///
/// ```
/// use mq_bus_bridge::bridge::domain::{Context, Message};
/// use serde_json::{Map, json};
///
/// let mut data = Map::new();
/// data.insert("lang".to_owned(), json!("en-us"));
/// let message = Message::new("neon.get_tts", data, Context::new()).expect("valid message");
///
/// assert_eq!(message.msg_type(), "neon.get_tts");
/// assert!(Message::new("", Map::new(), Context::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MessageRepr")]
pub struct Message {
    msg_type: String,
    data: Map<String, Value>,
    context: Context,
}

#[derive(Deserialize)]
struct MessageRepr {
    #[serde(alias = "type")]
    msg_type: String,
    #[serde(default)]
    data: Map<String, Value>,
    #[serde(default)]
    context: Context,
}

impl TryFrom<MessageRepr> for Message {
    type Error = MessageError;

    fn try_from(repr: MessageRepr) -> Result<Self, Self::Error> {
        Self::new(repr.msg_type, repr.data, repr.context)
    }
}

/// Errors returned when constructing a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The message type is empty or whitespace.
    #[error("message type must not be empty")]
    EmptyType,
}

impl Message {
    /// Creates a message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::EmptyType`] if `msg_type` is blank.
    pub fn new(
        msg_type: impl Into<String>,
        data: Map<String, Value>,
        context: Context,
    ) -> Result<Self, MessageError> {
        let msg_type = msg_type.into();
        if msg_type.trim().is_empty() {
            return Err(MessageError::EmptyType);
        }
        Ok(Self {
            msg_type,
            data,
            context,
        })
    }

    /// Returns the message type.
    #[must_use]
    pub fn msg_type(&self) -> &str {
        &self.msg_type
    }

    /// Returns the payload.
    #[must_use]
    pub const fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Returns the payload for in-place normalization.
    pub const fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }

    /// Returns the context.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Returns the context for in-place enrichment.
    pub const fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Splits the message into type, payload and context.
    #[must_use]
    pub fn into_parts(self) -> (String, Map<String, Value>, Context) {
        (self.msg_type, self.data, self.context)
    }

    /// Renders the message as a `{msg_type, data, context}` mapping.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut body = Map::new();
        body.insert("msg_type".to_owned(), Value::String(self.msg_type.clone()));
        body.insert("data".to_owned(), Value::Object(self.data.clone()));
        body.insert(
            "context".to_owned(),
            Value::Object(self.context.as_map().clone()),
        );
        Value::Object(body)
    }
}
