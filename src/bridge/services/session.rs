//! Explicit bus connection lifecycle.

use crate::bridge::ports::bus::{BusConnection, BusConnector, BusError, BusResult};
use crate::config::BusConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// Owns the bus connection for a bridge process.
///
/// Connect once at startup and hand [`BusSession::connection`] to the
/// services that emit. Nothing here connects implicitly.
pub struct BusSession<C>
where
    C: BusConnector,
{
    connector: C,
    config: BusConfig,
    connection: Option<Arc<C::Connection>>,
}

impl<C> BusSession<C>
where
    C: BusConnector,
{
    /// Creates a disconnected session.
    #[must_use]
    pub const fn new(connector: C, config: BusConfig) -> Self {
        Self {
            connector,
            config,
            connection: None,
        }
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub const fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Returns `true` while a connection is held.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Establishes the connection, or returns the one already held.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Connect`] if the connector fails.
    pub async fn connect(&mut self) -> BusResult<Arc<C::Connection>> {
        if let Some(existing) = &self.connection {
            return Ok(Arc::clone(existing));
        }
        let connection = Arc::new(self.connector.connect(&self.config).await?);
        info!(endpoint = %self.config.endpoint(), "connected to event bus");
        self.connection = Some(Arc::clone(&connection));
        Ok(connection)
    }

    /// Returns the established connection.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::NotConnected`] before [`BusSession::connect`].
    pub fn connection(&self) -> BusResult<Arc<C::Connection>> {
        self.connection.clone().ok_or(BusError::NotConnected)
    }

    /// Closes the current connection, if any, and connects again.
    ///
    /// A failure to close the old connection is logged and does not stop
    /// the reconnect.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Connect`] if the new connection fails; the
    /// session is then disconnected.
    pub async fn reconnect(&mut self) -> BusResult<Arc<C::Connection>> {
        if let Some(previous) = self.connection.take()
            && let Err(err) = previous.close().await
        {
            warn!(error = %err, "failed to close previous bus connection");
        }
        info!(endpoint = %self.config.endpoint(), "reconnecting to event bus");
        self.connect().await
    }

    /// Closes the connection. Closing a disconnected session is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the connection's teardown error.
    pub async fn close(&mut self) -> BusResult<()> {
        let Some(connection) = self.connection.take() else {
            return Ok(());
        };
        connection.close().await?;
        info!(endpoint = %self.config.endpoint(), "closed event bus connection");
        Ok(())
    }
}
