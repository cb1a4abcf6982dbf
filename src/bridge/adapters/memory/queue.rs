//! In-memory implementation of the [`QueuePublisher`] port.

use crate::bridge::ports::queue::{OutboundMessage, PublishError, PublishResult, QueuePublisher};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Records published messages instead of sending them.
///
/// Thread-safe via internal [`RwLock`]. Can be switched into a failing mode
/// to exercise publish error paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQueuePublisher {
    state: Arc<RwLock<PublisherState>>,
}

#[derive(Debug, Default)]
struct PublisherState {
    published: Vec<OutboundMessage>,
    failure: Option<String>,
}

impl InMemoryQueuePublisher {
    /// Creates an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later publish fail with [`PublishError::Unavailable`].
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn fail_with(&self, reason: impl Into<String>) -> PublishResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| PublishError::transport(std::io::Error::other(err.to_string())))?;
        state.failure = Some(reason.into());
        Ok(())
    }

    /// Returns a copy of everything published so far.
    #[must_use]
    pub fn published(&self) -> Vec<OutboundMessage> {
        self.state
            .read()
            .map(|state| state.published.clone())
            .unwrap_or_default()
    }

    /// Returns the messages published to `queue`.
    #[must_use]
    pub fn published_to(&self, queue: &str) -> Vec<OutboundMessage> {
        self.published()
            .into_iter()
            .filter(|message| message.queue() == queue)
            .collect()
    }

    /// Returns the number of published messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state
            .read()
            .map(|state| state.published.len())
            .unwrap_or(0)
    }

    /// Returns `true` if nothing has been published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl QueuePublisher for InMemoryQueuePublisher {
    async fn publish(&self, message: OutboundMessage) -> PublishResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| PublishError::transport(std::io::Error::other(err.to_string())))?;
        if let Some(reason) = state.failure.as_ref() {
            return Err(PublishError::Unavailable(reason.clone()));
        }
        state.published.push(message);
        Ok(())
    }
}
