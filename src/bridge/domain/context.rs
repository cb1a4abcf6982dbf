//! Per-message context with accessors for the reserved sections.
//!
//! The context is a free-form mapping. A handful of keys carry routing,
//! correlation and timing information and are read through typed helpers
//! here; everything else passes through untouched.

use super::value_type_name;
use crate::bridge::error::ContextError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved context keys.
pub mod keys {
    /// Section holding queue transport metadata.
    pub const MQ: &str = "mq";
    /// Section holding legacy chat identifiers.
    pub const KLAT_DATA: &str = "klat_data";
    /// Older location of the legacy routing key.
    pub const KLAT: &str = "klat";
    /// Section holding named durations in seconds.
    pub const TIMING: &str = "timing";
    /// Epoch seconds at which the message was created.
    pub const CREATED_ON: &str = "created_on";
    /// Language code of the request.
    pub const LANG: &str = "lang";
    /// Explicit list of template names to validate against.
    pub const REQUEST_SKILLS: &str = "request_skills";
    /// Queue to reply to.
    pub const ROUTING_KEY: &str = "routing_key";
    /// Correlation identifier assigned by the queue client.
    pub const MESSAGE_ID: &str = "message_id";
    /// Legacy conversation identifier.
    pub const CID: &str = "cid";
    /// Legacy session identifier.
    pub const SID: &str = "sid";
    /// Epoch seconds at which the client sent the request.
    pub const CLIENT_SENT: &str = "client_sent";
}

/// Context mapping attached to every [`super::Message`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps an existing mapping.
    #[must_use]
    pub const fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns the underlying mapping.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the underlying mapping mutably.
    pub const fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    /// Consumes the context, returning the mapping.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a section if it is present and holds a mapping.
    #[must_use]
    pub fn section(&self, section: &str) -> Option<&Map<String, Value>> {
        self.0.get(section).and_then(Value::as_object)
    }

    /// Returns a section, inserting an empty mapping when absent or null.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::SectionNotMapping`] if the section holds a
    /// non-mapping value.
    pub fn section_entry(&mut self, section: &str) -> Result<&mut Map<String, Value>, ContextError> {
        let entry = self
            .0
            .entry(section.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        if entry.is_null() {
            *entry = Value::Object(Map::new());
        }
        let actual = value_type_name(entry);
        entry
            .as_object_mut()
            .ok_or_else(|| ContextError::SectionNotMapping {
                section: section.to_owned(),
                actual,
            })
    }

    /// Stores `value` under `section.key` unless a non-null value is present.
    ///
    /// Returns `true` when the value was written.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::SectionNotMapping`] if the section holds a
    /// non-mapping value.
    pub fn set_default_in(
        &mut self,
        section: &str,
        key: &str,
        value: Value,
    ) -> Result<bool, ContextError> {
        let target = self.section_entry(section)?;
        if target.get(key).is_some_and(|existing| !existing.is_null()) {
            return Ok(false);
        }
        target.insert(key.to_owned(), value);
        Ok(true)
    }

    /// Returns a non-empty string stored under `section.key`.
    #[must_use]
    pub fn nested_str(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Returns `mq.routing_key`.
    #[must_use]
    pub fn mq_routing_key(&self) -> Option<&str> {
        self.nested_str(keys::MQ, keys::ROUTING_KEY)
    }

    /// Returns `mq.message_id`.
    #[must_use]
    pub fn mq_message_id(&self) -> Option<&str> {
        self.nested_str(keys::MQ, keys::MESSAGE_ID)
    }

    /// Returns the legacy routing key, preferring `klat_data` over `klat`.
    #[must_use]
    pub fn klat_routing_key(&self) -> Option<&str> {
        self.nested_str(keys::KLAT_DATA, keys::ROUTING_KEY)
            .or_else(|| self.nested_str(keys::KLAT, keys::ROUTING_KEY))
    }

    /// Returns `created_on` as epoch seconds.
    #[must_use]
    pub fn created_on(&self) -> Option<f64> {
        self.0.get(keys::CREATED_ON).and_then(Value::as_f64)
    }

    /// Returns the context language.
    #[must_use]
    pub fn lang(&self) -> Option<&str> {
        self.0.get(keys::LANG).and_then(Value::as_str)
    }

    /// Returns a named timing measurement in seconds.
    #[must_use]
    pub fn timing(&self, name: &str) -> Option<f64> {
        self.section(keys::TIMING)?.get(name).and_then(Value::as_f64)
    }

    /// Records a timing measurement, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::SectionNotMapping`] if `timing` holds a
    /// non-mapping value.
    pub fn record_timing(&mut self, name: &str, seconds: f64) -> Result<(), ContextError> {
        self.section_entry(keys::TIMING)?
            .insert(name.to_owned(), Value::from(seconds));
        Ok(())
    }
}

impl From<Map<String, Value>> for Context {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
