//! Event bus ports.
//!
//! A [`BusConnector`] establishes a [`BusConnection`] once during startup.
//! The connection handle is passed explicitly to whoever emits; nothing
//! connects implicitly on first use.

use crate::bridge::domain::Message;
use crate::config::BusConfig;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for bus operations.
pub type BusResult<T> = Result<T, BusError>;

/// An established connection to the event bus.
#[async_trait]
pub trait BusConnection: Send + Sync {
    /// Emits a message onto the bus.
    ///
    /// # Errors
    ///
    /// Returns [`BusError`] if the connection is closed or the send fails.
    async fn emit(&self, message: Message) -> BusResult<()>;

    /// Closes the connection. Later emits fail with [`BusError::Closed`].
    ///
    /// # Errors
    ///
    /// Returns [`BusError`] if teardown fails.
    async fn close(&self) -> BusResult<()>;
}

/// Factory for bus connections.
#[async_trait]
pub trait BusConnector: Send + Sync {
    /// Connection type produced by this connector.
    type Connection: BusConnection;

    /// Opens a connection to the configured bus endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Connect`] if the endpoint cannot be reached.
    async fn connect(&self, config: &BusConfig) -> BusResult<Self::Connection>;
}

/// Errors returned by bus adapters.
#[derive(Debug, Clone, Error)]
pub enum BusError {
    /// No connection has been established.
    #[error("event bus is not connected")]
    NotConnected,

    /// The connection was closed.
    #[error("event bus connection is closed")]
    Closed,

    /// Connecting failed.
    #[error("failed to connect to event bus at {endpoint}: {reason}")]
    Connect {
        /// Endpoint that was dialled.
        endpoint: String,
        /// Failure description.
        reason: String,
    },

    /// Any other transport failure.
    #[error("event bus transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl BusError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
