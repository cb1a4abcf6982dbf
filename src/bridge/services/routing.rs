//! Reply queue selection.

use crate::bridge::domain::Context;

/// Queue used when neither an override nor the context names one.
pub const DEFAULT_REPLY_QUEUE: &str = "neon_chat_api_response";

/// Chooses the queue a response is published to.
///
/// # Examples
///
/// ```
/// use mq_bus_bridge::bridge::domain::Context;
/// use mq_bus_bridge::bridge::services::RoutingResolver;
/// use serde_json::json;
///
/// let mut context = Context::new();
/// context
///     .set_default_in("mq", "routing_key", json!("mq_queue"))
///     .expect("mq is a mapping");
///
/// let resolver = RoutingResolver::default();
/// assert_eq!(resolver.resolve(&context, None), "mq_queue");
/// assert_eq!(resolver.resolve(&context, Some("errors")), "errors");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingResolver {
    default_queue: String,
}

impl RoutingResolver {
    /// Creates a resolver falling back to `default_queue`.
    #[must_use]
    pub fn new(default_queue: impl Into<String>) -> Self {
        Self {
            default_queue: default_queue.into(),
        }
    }

    /// Returns the fallback queue.
    #[must_use]
    pub fn default_queue(&self) -> &str {
        &self.default_queue
    }

    /// Resolves the destination queue, first match wins:
    /// the explicit override, the chat routing key (`klat_data`, then the
    /// legacy `klat` section), the `mq` routing key, then the default.
    ///
    /// Empty strings are treated as absent.
    #[must_use]
    pub fn resolve<'a>(&'a self, context: &'a Context, explicit: Option<&'a str>) -> &'a str {
        explicit
            .filter(|queue| !queue.is_empty())
            .or_else(|| context.klat_routing_key())
            .or_else(|| context.mq_routing_key())
            .unwrap_or(&self.default_queue)
    }
}

impl Default for RoutingResolver {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_QUEUE)
    }
}
