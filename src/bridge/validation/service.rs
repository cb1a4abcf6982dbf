//! Template-driven implementation of the [`RequestValidator`] port.

use crate::bridge::{
    domain::{Message, Template, keys, value_type_name},
    error::{Rejection, ValidationError},
    ports::validator::{RequestValidator, ValidationPolicy, ValidationResult},
    templates::TemplateRegistry,
    validation::rules,
};
use crate::config::ValidationSettings;
use serde_json::Value;
use tracing::debug;

/// Validator selecting templates from a [`TemplateRegistry`].
///
/// Template selection, first match wins:
/// 1. a template registered under the message type;
/// 2. the templates named in `context.request_skills`, unknown names
///    dropped, validation skipped when none resolve;
/// 3. otherwise the [`ValidationPolicy`] decides between rejection and skip.
///
/// # Examples
///
/// ```
/// use mq_bus_bridge::bridge::domain::{Context, Message};
/// use mq_bus_bridge::bridge::ports::validator::RequestValidator;
/// use mq_bus_bridge::bridge::validation::service::TemplateValidator;
/// use serde_json::{Map, json};
///
/// let mut data = Map::new();
/// data.insert("audio_file".to_owned(), json!("1"));
/// data.insert("lang".to_owned(), json!("1"));
/// let message = Message::new("recognizer_loop:utterance", data, Context::new())
///     .expect("valid message");
///
/// let validator = TemplateValidator::new();
/// assert!(validator.validate(message).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct TemplateValidator {
    registry: TemplateRegistry,
    policy: ValidationPolicy,
}

impl TemplateValidator {
    /// Creates a strict validator over the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(TemplateRegistry::with_builtin(), ValidationPolicy::default())
    }

    /// Creates a validator over the built-in templates using the configured policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use mq_bus_bridge::bridge::ports::validator::ValidationPolicy;
    /// use mq_bus_bridge::bridge::validation::TemplateValidator;
    /// use mq_bus_bridge::config::BridgeConfig;
    ///
    /// let config = BridgeConfig::from_toml_str("[validation]\npolicy = \"permissive\"\n")
    ///     .expect("valid config");
    /// let validator = TemplateValidator::from_config(&config.validation);
    /// assert_eq!(validator.policy(), ValidationPolicy::Permissive);
    /// ```
    #[must_use]
    pub fn from_config(settings: &ValidationSettings) -> Self {
        Self::with_registry(TemplateRegistry::with_builtin(), settings.policy)
    }

    /// Creates a validator over a custom registry.
    #[must_use]
    pub const fn with_registry(registry: TemplateRegistry, policy: ValidationPolicy) -> Self {
        Self { registry, policy }
    }

    /// Returns the registry.
    #[must_use]
    pub const fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Returns the policy for messages no template applies to.
    #[must_use]
    pub const fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Resolves the templates to apply, in order. An empty list means skip.
    fn select_templates(&self, message: &Message) -> Result<Vec<&Template>, ValidationError> {
        if let Some(template) = self.registry.lookup(message.msg_type()) {
            return Ok(vec![template]);
        }

        if let Some(names) = requested_templates(message)? {
            let resolved: Vec<&Template> = names
                .iter()
                .filter_map(|name| self.registry.lookup(name))
                .collect();
            if resolved.len() < names.len() {
                debug!(
                    msg_type = message.msg_type(),
                    requested = ?names,
                    resolved = resolved.len(),
                    "dropping unknown template names"
                );
            }
            return Ok(resolved);
        }

        match self.policy {
            ValidationPolicy::Strict => Err(ValidationError::UnableToValidate {
                msg_type: message.msg_type().to_owned(),
            }),
            ValidationPolicy::Permissive => Ok(Vec::new()),
        }
    }
}

impl Default for TemplateValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestValidator for TemplateValidator {
    fn validate(&self, mut message: Message) -> ValidationResult {
        let templates = match self.select_templates(&message) {
            Ok(templates) => templates,
            Err(error) => return Err(Rejection::new(error, message)),
        };

        if templates.is_empty() {
            debug!(msg_type = message.msg_type(), "no template applies; skipping validation");
            return Ok(message);
        }

        for template in templates {
            debug!(
                msg_type = message.msg_type(),
                template = template.name(),
                "applying template"
            );
            if let Err(error) = rules::apply_template(template, &mut message) {
                return Err(Rejection::new(error, message));
            }
        }
        Ok(message)
    }
}

/// Reads `context.request_skills`. An absent, null or empty list yields `None`.
fn requested_templates(message: &Message) -> Result<Option<Vec<String>>, ValidationError> {
    let path = format!("context.{}", keys::REQUEST_SKILLS);
    let expected = "list<string>";
    let items = match message.context().get(keys::REQUEST_SKILLS) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ValidationError::type_mismatch(
                path,
                expected,
                value_type_name(other),
            ));
        }
    };

    let mut names = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let name = item.as_str().ok_or_else(|| {
            ValidationError::type_mismatch(format!("{path}[{index}]"), "string", value_type_name(item))
        })?;
        names.push(name.to_owned());
    }

    Ok((!names.is_empty()).then_some(names))
}
