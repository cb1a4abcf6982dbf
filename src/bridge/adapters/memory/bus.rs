//! In-memory implementations of the bus ports.

use crate::bridge::{
    domain::Message,
    ports::bus::{BusConnection, BusConnector, BusError, BusResult},
};
use crate::config::BusConfig;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Connector handing out [`InMemoryBusConnection`]s that share one emit log.
///
/// The shared log survives reconnects, so tests can inspect everything
/// emitted across the lifetime of a bridge.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBusConnector {
    emitted: Arc<RwLock<Vec<Message>>>,
    connects: Arc<AtomicUsize>,
    refuse: Arc<AtomicBool>,
}

impl InMemoryBusConnector {
    /// Creates a connector with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes later connection attempts fail (or succeed again).
    pub fn refuse_connections(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    /// Returns how many connections have been opened.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Returns a copy of every message emitted through any connection.
    #[must_use]
    pub fn emitted(&self) -> Vec<Message> {
        self.emitted
            .read()
            .map(|log| log.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BusConnector for InMemoryBusConnector {
    type Connection = InMemoryBusConnection;

    async fn connect(&self, config: &BusConfig) -> BusResult<Self::Connection> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(BusError::Connect {
                endpoint: config.endpoint(),
                reason: "connection refused".to_owned(),
            });
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryBusConnection {
            emitted: Arc::clone(&self.emitted),
            closed: Arc::new(AtomicBool::new(false)),
        })
    }
}

/// Connection appending emitted messages to the connector's log.
#[derive(Debug, Clone)]
pub struct InMemoryBusConnection {
    emitted: Arc<RwLock<Vec<Message>>>,
    closed: Arc<AtomicBool>,
}

impl InMemoryBusConnection {
    /// Returns `true` once the connection has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BusConnection for InMemoryBusConnection {
    async fn emit(&self, message: Message) -> BusResult<()> {
        if self.is_closed() {
            return Err(BusError::Closed);
        }
        self.emitted
            .write()
            .map_err(|err| BusError::transport(std::io::Error::other(err.to_string())))?
            .push(message);
        Ok(())
    }

    async fn close(&self) -> BusResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
