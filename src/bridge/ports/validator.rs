//! Validator port for inbound requests.

use crate::bridge::{domain::Message, error::Rejection};
use serde::{Deserialize, Serialize};

/// Result type for validation: the normalized message, or the rejection.
pub type ValidationResult = Result<Message, Rejection>;

/// Port for checking inbound messages before they reach the bus.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Stop at the first failing template (fail-fast)
/// - Return the payload as it stood at failure inside the [`Rejection`]
/// - Be stateless and thread-safe
pub trait RequestValidator: Send + Sync {
    /// Validates and normalizes a message.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] when a template check fails or no template
    /// applies under a strict policy.
    fn validate(&self, message: Message) -> ValidationResult;
}

/// How to treat a message that no template applies to.
///
/// # Examples
///
/// ```
/// use mq_bus_bridge::bridge::ports::validator::ValidationPolicy;
///
/// assert_eq!(ValidationPolicy::default(), ValidationPolicy::Strict);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Reject the message as unable to validate.
    #[default]
    Strict,
    /// Let the message through unchanged.
    Permissive,
}
