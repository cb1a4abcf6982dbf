//! Service wiring the queue and the event bus together.

use super::{ContextEnricher, ResponseFormatter, RoutingResolver, routing::DEFAULT_REPLY_QUEUE};
use crate::bridge::{
    adapters::codec::{decode_payload, encode_payload},
    domain::{ERROR_EVENT, Message, ResponseKind, ResponseTimeouts},
    error::{BridgeError, FormatError, Rejection},
    ports::{
        bus::BusConnection,
        queue::{OutboundMessage, QueuePublisher},
        validator::RequestValidator,
    },
};
use crate::config::BridgeConfig;
use mockable::Clock;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Queue receiving validation error responses by default.
pub const DEFAULT_ERROR_QUEUE: &str = "neon_chat_api_error";

/// Tunables for [`BridgeService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Queue validation errors are published to.
    pub error_queue: String,
    /// Queue replies go to when the context names none.
    pub default_reply_queue: String,
    /// Expiration applied to every published message.
    pub reply_expiration: Duration,
    /// Drop inbound messages lacking `context.mq.message_id`.
    pub require_message_id: bool,
    /// Staleness timeouts per response kind.
    pub timeouts: ResponseTimeouts,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            error_queue: DEFAULT_ERROR_QUEUE.to_owned(),
            default_reply_queue: DEFAULT_REPLY_QUEUE.to_owned(),
            reply_expiration: Duration::from_millis(1000),
            require_message_id: false,
            timeouts: ResponseTimeouts::default(),
        }
    }
}

impl From<&BridgeConfig> for BridgeSettings {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            error_queue: config.mq.error_queue.clone(),
            default_reply_queue: config.mq.response_queue.clone(),
            reply_expiration: config.mq.reply_expiration(),
            require_message_id: config.validation.require_message_id,
            timeouts: config.timeouts.to_timeouts(),
        }
    }
}

/// Why an inbound message was dropped without a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// `context.mq.message_id` is required but absent.
    MissingMessageId,
}

/// Result of handling one inbound queue message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    /// The message passed validation and was emitted on the bus.
    Forwarded {
        /// Type of the forwarded message.
        msg_type: String,
    },
    /// Validation failed and an error response was published.
    Rejected {
        /// Queue the error response went to.
        queue: String,
        /// Rendered validation error.
        error: String,
    },
    /// The message was dropped without a response.
    Dropped(DropReason),
}

/// Result of handling one bus event.
#[derive(Debug, Clone, PartialEq)]
pub enum BusOutcome {
    /// A response was published.
    Published {
        /// Destination queue.
        queue: String,
        /// Kind of response.
        kind: ResponseKind,
    },
    /// The event was dropped by the formatter.
    Dropped {
        /// Kind the event was formatted as.
        kind: ResponseKind,
        /// Why it was dropped.
        reason: FormatError,
    },
    /// The event type is not one the bridge answers.
    Ignored {
        /// Type of the ignored event.
        msg_type: String,
    },
}

/// Moves validated requests onto the bus and bus responses onto the queue.
///
/// The bus connection is passed in already established; the service never
/// connects on its own. Use [`BridgeService::replace_bus`] after a
/// reconnect.
pub struct BridgeService<V, P, B, K>
where
    V: RequestValidator,
    P: QueuePublisher,
    B: BusConnection,
    K: Clock + Send + Sync,
{
    validator: V,
    publisher: Arc<P>,
    bus: Arc<B>,
    enricher: ContextEnricher<K>,
    formatter: ResponseFormatter<K>,
    resolver: RoutingResolver,
    settings: BridgeSettings,
}

impl<V, P, B, K> BridgeService<V, P, B, K>
where
    V: RequestValidator,
    P: QueuePublisher,
    B: BusConnection,
    K: Clock + Send + Sync,
{
    /// Creates a bridge service.
    #[must_use]
    pub fn new(
        validator: V,
        publisher: Arc<P>,
        bus: Arc<B>,
        clock: Arc<K>,
        settings: BridgeSettings,
    ) -> Self {
        Self {
            validator,
            publisher,
            bus,
            enricher: ContextEnricher::new(Arc::clone(&clock)),
            formatter: ResponseFormatter::new(clock, settings.timeouts),
            resolver: RoutingResolver::new(settings.default_reply_queue.clone()),
            settings,
        }
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    /// Swaps in a freshly established bus connection.
    pub fn replace_bus(&mut self, bus: Arc<B>) {
        self.bus = bus;
    }

    /// Handles one inbound queue body.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Decode`] for malformed bodies,
    /// [`BridgeError::Bus`] when emitting fails and [`BridgeError::Publish`]
    /// when the error response cannot be published.
    pub async fn handle_inbound(&self, body: &[u8]) -> Result<InboundOutcome, BridgeError> {
        let started = Instant::now();
        let raw = decode_payload(body)?;
        let message = self.enricher.enrich(raw, started.elapsed())?;
        debug!(msg_type = message.msg_type(), "received inbound message");

        if self.settings.require_message_id && message.context().mq_message_id().is_none() {
            warn!(
                msg_type = message.msg_type(),
                "dropping message without context.mq.message_id"
            );
            return Ok(InboundOutcome::Dropped(DropReason::MissingMessageId));
        }

        match self.validator.validate(message) {
            Ok(validated) => {
                let msg_type = validated.msg_type().to_owned();
                self.bus.emit(validated).await?;
                info!(msg_type = %msg_type, "forwarded message to bus");
                Ok(InboundOutcome::Forwarded { msg_type })
            }
            Err(rejection) => self.publish_rejection(rejection).await,
        }
    }

    async fn publish_rejection(&self, rejection: Rejection) -> Result<InboundOutcome, BridgeError> {
        let (error, message) = rejection.into_parts();
        let reason = error.to_string();
        let queue = self
            .resolver
            .resolve(message.context(), Some(self.settings.error_queue.as_str()))
            .to_owned();

        let mut data = Map::new();
        data.insert("error".to_owned(), Value::String(reason.clone()));
        data.insert("message".to_owned(), message.to_value());
        let mut body = Map::new();
        body.insert("msg_type".to_owned(), Value::String(ERROR_EVENT.to_owned()));
        body.insert("data".to_owned(), Value::Object(data));
        body.insert(
            "context".to_owned(),
            Value::Object(message.context().as_map().clone()),
        );

        self.publish(&queue, &Value::Object(body)).await?;
        warn!(msg_type = message.msg_type(), %queue, error = %reason, "rejected inbound message");
        Ok(InboundOutcome::Rejected {
            queue,
            error: reason,
        })
    }

    /// Handles one event received from the bus.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Publish`] when the response cannot be
    /// published. Format failures are reported as [`BusOutcome::Dropped`].
    pub async fn handle_bus_event(&self, event: Message) -> Result<BusOutcome, BridgeError> {
        let Some(kind) = ResponseKind::for_event(event.msg_type()) else {
            debug!(msg_type = event.msg_type(), "ignoring unsubscribed bus event");
            return Ok(BusOutcome::Ignored {
                msg_type: event.msg_type().to_owned(),
            });
        };
        let msg_type = event.msg_type().to_owned();
        let payload = match self.formatter.format(event, kind) {
            Ok(payload) => payload,
            Err(reason) => {
                warn!(%msg_type, %kind, %reason, "dropping bus event");
                return Ok(BusOutcome::Dropped { kind, reason });
            }
        };
        let queue = self.resolver.resolve(payload.context(), None).to_owned();
        self.publish(&queue, &payload.into_value()).await?;
        info!(%msg_type, %kind, %queue, "published response");
        Ok(BusOutcome::Published { queue, kind })
    }

    async fn publish(&self, queue: &str, payload: &Value) -> Result<(), BridgeError> {
        let message = OutboundMessage::new(queue, encode_payload(payload))
            .with_expiration(self.settings.reply_expiration);
        self.publisher.publish(message).await?;
        Ok(())
    }
}
