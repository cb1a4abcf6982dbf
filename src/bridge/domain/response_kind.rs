//! Response kinds and the bus events that produce them.

use std::time::Duration;

/// Bus event announcing a chat response.
pub const RESPONSE_EVENT: &str = "klat.response";
/// Bus event announcing a user profile change.
pub const PROFILE_UPDATE_EVENT: &str = "neon.profile_update";
/// Bus event carrying an error, and the type of error replies sent to the queue.
pub const ERROR_EVENT: &str = "klat.error";
/// Bus event carrying a finished transcription.
pub const STT_RESPONSE_EVENT: &str = "neon.get_stt.response";
/// Bus event carrying synthesized speech.
pub const TTS_RESPONSE_EVENT: &str = "neon.get_tts.response";

/// Every bus event type the bridge subscribes to.
pub const SUBSCRIBED_EVENTS: [&str; 5] = [
    RESPONSE_EVENT,
    PROFILE_UPDATE_EVENT,
    ERROR_EVENT,
    STT_RESPONSE_EVENT,
    TTS_RESPONSE_EVENT,
];

/// How a bus event is reshaped before it is published to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// A transcription result.
    SpeechToText,
    /// Synthesized audio.
    TextToSpeech,
    /// Any other response, passed through unchanged.
    Generic,
}

impl ResponseKind {
    /// Returns the kind handling a subscribed bus event type.
    ///
    /// # Examples
    ///
    /// ```
    /// use mq_bus_bridge::bridge::domain::ResponseKind;
    ///
    /// assert_eq!(
    ///     ResponseKind::for_event("neon.get_stt.response"),
    ///     Some(ResponseKind::SpeechToText)
    /// );
    /// assert_eq!(ResponseKind::for_event("mycroft.ready"), None);
    /// ```
    #[must_use]
    pub fn for_event(msg_type: &str) -> Option<Self> {
        match msg_type {
            STT_RESPONSE_EVENT => Some(Self::SpeechToText),
            TTS_RESPONSE_EVENT => Some(Self::TextToSpeech),
            RESPONSE_EVENT | PROFILE_UPDATE_EVENT | ERROR_EVENT => Some(Self::Generic),
            _ => None,
        }
    }

    /// Returns the kind as a lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SpeechToText => "speech_to_text",
            Self::TextToSpeech => "text_to_speech",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum event age accepted per response kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseTimeouts {
    /// Timeout for generic responses.
    pub generic: Duration,
    /// Timeout for transcription responses.
    pub speech_to_text: Duration,
    /// Timeout for synthesized speech responses.
    pub text_to_speech: Duration,
}

impl ResponseTimeouts {
    /// Returns the timeout for a kind.
    #[must_use]
    pub const fn for_kind(&self, kind: ResponseKind) -> Duration {
        match kind {
            ResponseKind::SpeechToText => self.speech_to_text,
            ResponseKind::TextToSpeech => self.text_to_speech,
            ResponseKind::Generic => self.generic,
        }
    }
}

impl Default for ResponseTimeouts {
    fn default() -> Self {
        Self {
            generic: Duration::from_secs(30),
            speech_to_text: Duration::from_secs(60),
            text_to_speech: Duration::from_secs(60),
        }
    }
}
