//! Error types for decoding, validating and formatting bridge messages.
//!
//! Uses `thiserror` for typed variants that callers can inspect. Validation
//! and formatting failures are returned as data; only decode failures on
//! malformed raw input are hard failures for the caller.

use super::domain::Message;
use super::ports::{bus::BusError, queue::PublishError};
use std::time::Duration;
use thiserror::Error;

/// Errors raised when a reserved context section cannot be accessed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// A reserved section exists but does not hold a mapping.
    #[error("context.{section} must be a mapping, found {actual}")]
    SectionNotMapping {
        /// Name of the reserved section.
        section: String,
        /// JSON type found in place of the mapping.
        actual: &'static str,
    },
}

/// Errors that can occur while decoding an inbound queue payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The queue delivered an empty body.
    #[error("received an empty message body")]
    EmptyBody,

    /// The body is not valid base64.
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not valid UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The decoded text is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The decoded JSON is not a mapping.
    #[error("payload must be a mapping, found {actual}")]
    NotAMapping {
        /// JSON type found at the top level.
        actual: &'static str,
    },

    /// Neither `msg_type` nor `type` carries a non-empty message type.
    #[error("payload does not carry a message type")]
    MissingMessageType,

    /// A top-level field has the wrong shape.
    #[error("{field} must be {expected}, found {actual}")]
    InvalidField {
        /// Name of the offending field.
        field: String,
        /// Expected JSON type.
        expected: &'static str,
        /// JSON type found.
        actual: &'static str,
    },

    /// A reserved context section is malformed.
    #[error(transparent)]
    Context(#[from] ContextError),
}

impl DecodeError {
    /// Creates an invalid field error.
    #[must_use]
    pub fn invalid_field(
        field: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::InvalidField {
            field: field.into(),
            expected,
            actual,
        }
    }
}

/// Errors produced while checking a message against its templates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is absent.
    #[error("missing required field {path}")]
    MissingField {
        /// Dotted path of the missing field, e.g. `data.audio_file`.
        path: String,
    },

    /// A field is present with the wrong type.
    #[error("{path} should be {expected}, but {actual} provided")]
    TypeMismatch {
        /// Dotted path of the offending field.
        path: String,
        /// Description of the declared type.
        expected: String,
        /// JSON type found.
        actual: &'static str,
    },

    /// No template applies to the message and the policy requires one.
    #[error("unable to validate message of type '{msg_type}': no template applies")]
    UnableToValidate {
        /// The message type that could not be matched.
        msg_type: String,
    },
}

impl ValidationError {
    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            actual,
        }
    }

    /// Returns the dotted field path this error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingField { path } | Self::TypeMismatch { path, .. } => Some(path),
            Self::UnableToValidate { .. } => None,
        }
    }
}

/// A message that failed validation.
///
/// Carries the payload as it stood when the failing template aborted, so
/// defaults filled by earlier templates remain visible.
#[derive(Debug, Clone, Error)]
#[error("{error}")]
pub struct Rejection {
    #[source]
    error: ValidationError,
    message: Box<Message>,
}

impl Rejection {
    /// Creates a rejection from an error and the partially normalized message.
    #[must_use]
    pub fn new(error: ValidationError, message: Message) -> Self {
        Self {
            error,
            message: Box::new(message),
        }
    }

    /// Returns the validation error.
    #[must_use]
    pub const fn error(&self) -> &ValidationError {
        &self.error
    }

    /// Returns the message at the time of failure.
    #[must_use]
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Splits the rejection into its error and message.
    #[must_use]
    pub fn into_parts(self) -> (ValidationError, Message) {
        (self.error, *self.message)
    }
}

/// Reasons a bus event is not turned into a queue response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// The event is older than the timeout for its response kind.
    #[error("event is {age_secs:.3}s old, exceeding the {}s timeout", timeout.as_secs())]
    Stale {
        /// Age of the event in seconds.
        age_secs: f64,
        /// Timeout that applied.
        timeout: Duration,
    },

    /// The event reports an error raised upstream.
    #[error("event carries an upstream error: {0}")]
    UpstreamError(String),

    /// A field needed for extraction is absent.
    #[error("event is missing {path}")]
    MissingField {
        /// Dotted path of the missing field.
        path: String,
    },

    /// A field needed for extraction has the wrong shape.
    #[error("{path} must be {expected}, found {actual}")]
    InvalidField {
        /// Dotted path of the offending field.
        path: String,
        /// Expected JSON type.
        expected: &'static str,
        /// JSON type found.
        actual: &'static str,
    },

    /// The speech-to-text event has an empty transcript list.
    #[error("event contains no transcripts")]
    NoTranscripts,

    /// The text-to-speech event has no language entry with audio.
    #[error("event contains no synthesized audio")]
    NoAudio,

    /// The event context cannot receive timing metrics.
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// Errors surfaced by the bridge service to its caller.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The inbound payload could not be decoded.
    #[error("failed to decode inbound message: {0}")]
    Decode(#[from] DecodeError),

    /// Emitting onto the event bus failed.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// Publishing to the queue failed.
    #[error(transparent)]
    Publish(#[from] PublishError),
}
