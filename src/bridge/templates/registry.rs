//! Name-to-template lookup.

use super::builtin;
use crate::bridge::domain::Template;
use std::collections::HashMap;

/// Registry mapping message types and template names to templates.
///
/// A missing entry is not an error; the validator decides how to treat it.
///
/// # Examples
///
/// ```
/// use mq_bus_bridge::bridge::templates::TemplateRegistry;
///
/// let registry = TemplateRegistry::with_builtin();
/// assert!(registry.lookup("recognizer_loop:utterance").is_some());
/// assert!(registry.lookup("no.such.type").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in templates.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        builtin::register(&mut registry);
        registry
    }

    /// Registers a template under its own name, returning any template it replaced.
    pub fn insert(&mut self, template: Template) -> Option<Template> {
        self.templates.insert(template.name().to_owned(), template)
    }

    /// Registers a template under an additional key, returning any template it replaced.
    pub fn insert_as(&mut self, key: impl Into<String>, template: Template) -> Option<Template> {
        self.templates.insert(key.into(), template)
    }

    /// Looks up a template by message type or template name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Returns `true` if the key is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Returns the number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Returns the registered keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
