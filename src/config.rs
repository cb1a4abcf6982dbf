//! Bridge configuration.
//!
//! Configuration is read from a TOML file. Every field has a default, so an
//! empty file yields a working local setup:
//!
//! ```toml
//! [mq]
//! vhost = "/neon_chat_api"
//! request_queue = "neon_chat_api_request"
//! response_queue = "neon_chat_api_response"
//! error_queue = "neon_chat_api_error"
//! reply_expiration_ms = 1000
//!
//! [bus]
//! host = "127.0.0.1"
//! port = 8181
//! route = "/core"
//!
//! [validation]
//! policy = "strict"
//! require_message_id = false
//!
//! [timeouts]
//! generic_secs = 30
//! speech_to_text_secs = 60
//! text_to_speech_secs = 60
//! ```

use crate::bridge::{domain::ResponseTimeouts, ports::validator::ValidationPolicy};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration from {path}: {source}")]
    Io {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`BridgeConfig`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Per-process identifier; generated when not configured.
    pub service_id: Uuid,
    /// Message queue settings.
    pub mq: MqConfig,
    /// Event bus settings.
    pub bus: BusConfig,
    /// Request validation settings.
    pub validation: ValidationSettings,
    /// Response staleness timeouts.
    pub timeouts: TimeoutConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            service_id: Uuid::new_v4(),
            mq: MqConfig::default(),
            bus: BusConfig::default(),
            validation: ValidationSettings::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path` relative to `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// as [`BridgeConfig::from_toml_str`].
    pub fn load(dir: &Dir, path: &Utf8Path) -> Result<Self, ConfigError> {
        let source = dir.read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Loads configuration from a path on the ambient filesystem.
    ///
    /// # Errors
    ///
    /// As [`BridgeConfig::load`]; also fails when `path` has no file name or
    /// its directory cannot be opened.
    pub fn load_from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| ConfigError::Invalid(format!("{path} does not name a file")))?;
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|source| {
            ConfigError::Io {
                path: parent.to_owned(),
                source,
            }
        })?;
        Self::load(&dir, Utf8Path::new(file_name))
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mq.vhost.trim().is_empty() {
            return Err(ConfigError::Invalid("mq.vhost must not be empty".to_owned()));
        }
        let queues = [
            ("mq.request_queue", &self.mq.request_queue),
            ("mq.response_queue", &self.mq.response_queue),
            ("mq.error_queue", &self.mq.error_queue),
        ];
        for (field, queue) in queues {
            if queue.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{field} must not be empty")));
            }
        }
        let timeouts = [
            ("timeouts.generic_secs", self.timeouts.generic_secs),
            ("timeouts.speech_to_text_secs", self.timeouts.speech_to_text_secs),
            ("timeouts.text_to_speech_secs", self.timeouts.text_to_speech_secs),
        ];
        for (field, secs) in timeouts {
            if secs == 0 {
                return Err(ConfigError::Invalid(format!("{field} must be positive")));
            }
        }
        if self.bus.port == 0 {
            return Err(ConfigError::Invalid("bus.port must be positive".to_owned()));
        }
        Ok(())
    }

    /// Returns the vhost and request queues the queue connector consumes.
    #[must_use]
    pub fn consumer_binding(&self) -> ConsumerBinding {
        ConsumerBinding {
            vhost: self.mq.vhost.clone(),
            queues: self.mq.consumer_queues(self.service_id),
        }
    }
}

/// Where the queue connector should register consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerBinding {
    /// Virtual host holding the queues.
    pub vhost: String,
    /// Queues to consume, shared queue first.
    pub queues: Vec<String>,
}

/// Message queue settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqConfig {
    /// Virtual host the queues live on.
    pub vhost: String,
    /// Shared inbound request queue.
    pub request_queue: String,
    /// Default reply queue.
    pub response_queue: String,
    /// Queue receiving validation error responses.
    pub error_queue: String,
    /// Expiration applied to published replies, in milliseconds.
    pub reply_expiration_ms: u64,
}

impl Default for MqConfig {
    fn default() -> Self {
        Self {
            vhost: "/neon_chat_api".to_owned(),
            request_queue: "neon_chat_api_request".to_owned(),
            response_queue: "neon_chat_api_response".to_owned(),
            error_queue: "neon_chat_api_error".to_owned(),
            reply_expiration_ms: 1000,
        }
    }
}

impl MqConfig {
    /// Returns the shared request queue and the one bound to `service_id`.
    #[must_use]
    pub fn consumer_queues(&self, service_id: Uuid) -> Vec<String> {
        vec![
            self.request_queue.clone(),
            format!("{}_{service_id}", self.request_queue),
        ]
    }

    /// Returns the reply expiration.
    #[must_use]
    pub const fn reply_expiration(&self) -> Duration {
        Duration::from_millis(self.reply_expiration_ms)
    }
}

/// Event bus endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Bus host.
    pub host: String,
    /// Bus port.
    pub port: u16,
    /// Websocket route on the host.
    pub route: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8181,
            route: "/core".to_owned(),
        }
    }
}

impl BusConfig {
    /// Returns the websocket URL for the bus.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("ws://{}:{}{}", self.host, self.port, self.route)
    }
}

/// Request validation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Treatment of messages no template applies to.
    pub policy: ValidationPolicy,
    /// Drop inbound messages lacking `context.mq.message_id`.
    pub require_message_id: bool,
}

/// Staleness timeouts per response kind, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Timeout for generic responses.
    pub generic_secs: u64,
    /// Timeout for speech-to-text responses.
    pub speech_to_text_secs: u64,
    /// Timeout for text-to-speech responses.
    pub text_to_speech_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            generic_secs: 30,
            speech_to_text_secs: 60,
            text_to_speech_secs: 60,
        }
    }
}

impl TimeoutConfig {
    /// Converts to the formatter's timeouts.
    #[must_use]
    pub const fn to_timeouts(&self) -> ResponseTimeouts {
        ResponseTimeouts {
            generic: Duration::from_secs(self.generic_secs),
            speech_to_text: Duration::from_secs(self.speech_to_text_secs),
            text_to_speech: Duration::from_secs(self.text_to_speech_secs),
        }
    }
}
