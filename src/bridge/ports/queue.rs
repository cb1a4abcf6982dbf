//! Queue publishing port.
//!
//! The queue connector owns connections and channels; the bridge only hands
//! it encoded bodies addressed to a queue.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for publishing operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// An encoded message addressed to a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    queue: String,
    body: Vec<u8>,
    expiration: Option<Duration>,
}

impl OutboundMessage {
    /// Creates a message for `queue` with no expiration.
    #[must_use]
    pub fn new(queue: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            queue: queue.into(),
            body,
            expiration: None,
        }
    }

    /// Sets how long the message may wait in the queue.
    #[must_use]
    pub const fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Returns the destination queue.
    #[must_use]
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Returns the encoded body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the expiration, if any.
    #[must_use]
    pub const fn expiration(&self) -> Option<Duration> {
        self.expiration
    }
}

/// Port for publishing to the message queue.
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    /// Publishes a message.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] if the transport refuses or fails the publish.
    async fn publish(&self, message: OutboundMessage) -> PublishResult<()>;
}

/// Errors returned by queue publishers.
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// No channel to the broker is available.
    #[error("queue transport unavailable: {0}")]
    Unavailable(String),

    /// The broker refused the message.
    #[error("queue {queue} rejected the message: {reason}")]
    Rejected {
        /// Destination queue.
        queue: String,
        /// Reason reported by the broker.
        reason: String,
    },

    /// Any other transport failure.
    #[error("queue transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl PublishError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
